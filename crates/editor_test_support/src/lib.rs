pub mod harness;
pub mod scenario;

pub use harness::Harness;
pub use scenario::{Scenario, Step, load_scenarios};

use emails_editor::chip;
use surface::{DomSurface, Id, Surface};

pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\u{200B}' => out.push_str("\\u{200B}"),
            ch if ch < ' ' => {
                use std::fmt::Write;
                let _ = write!(&mut out, "\\u{{{:02X}}}", ch as u32);
            }
            _ => out.push(ch),
        }
    }
    out
}

/// One line per root child: `sep`, `chip valid "..."`, `chip invalid "..."`,
/// `text "..."` or `<name> "..."` for any other element.
pub fn snapshot(dom: &DomSurface, root: Id) -> Vec<String> {
    dom.children(root)
        .iter()
        .map(|&child| {
            if chip::is_separator(dom, child) {
                "sep".to_string()
            } else if chip::is_chip(dom, child) {
                let verdict = if dom.has_class(child, chip::CHIP_VALID_CLASS) {
                    "valid"
                } else {
                    "invalid"
                };
                format!("chip {verdict} \"{}\"", escape_text(&chip::chip_label(dom, child)))
            } else if dom.is_text(child) {
                format!("text \"{}\"", escape_text(&dom.text_content(child)))
            } else {
                let name = dom.element_name(child).unwrap_or("?");
                format!("<{name}> \"{}\"", escape_text(&dom.text_content(child)))
            }
        })
        .collect()
}

pub fn diff_lines(expected: &[String], actual: &[String]) -> String {
    let max = expected.len().max(actual.len());
    let mut out = String::new();
    use std::fmt::Write;
    let missing = "<missing>";
    let mismatch = (0..max).find(|&i| {
        expected.get(i).map(String::as_str).unwrap_or(missing)
            != actual.get(i).map(String::as_str).unwrap_or(missing)
    });
    if let Some(i) = mismatch {
        let start = i.saturating_sub(2);
        let end = (i + 3).min(max);
        let _ = writeln!(
            &mut out,
            "first mismatch at line {} (showing {}..={}):",
            i + 1,
            start + 1,
            end
        );
        for line_idx in start..end {
            let left = expected
                .get(line_idx)
                .map(String::as_str)
                .unwrap_or(missing);
            let right = actual.get(line_idx).map(String::as_str).unwrap_or(missing);
            let marker = if line_idx == i { ">" } else { " " };
            let _ = writeln!(&mut out, "{marker} {:>4}  expected: {left}", line_idx + 1);
            let _ = writeln!(&mut out, "{marker} {:>4}    actual: {right}", line_idx + 1);
        }
    }
    let _ = writeln!(
        &mut out,
        "expected {} lines, actual {} lines",
        expected.len(),
        actual.len()
    );
    out
}
