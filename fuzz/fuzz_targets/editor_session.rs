#![no_main]

use email_core::tokenize;
use emails_editor::{EditorEvent, EmailsEditor, EventResult, Key, chip};
use libfuzzer_sys::fuzz_target;
use surface::{Boundary, DomSurface, NativeSelection, Surface};

const ALPHABET: &[u8] = b"ab@.-, \n";

fuzz_target!(|data: &[u8]| {
    let dom = DomSurface::new();
    let host = dom.body();
    let Ok(mut editor) = EmailsEditor::builder(dom, host)
        .initial_emails(["seed@x.io", "bad"])
        .build()
    else {
        return;
    };

    for chunk in data.chunks(2) {
        let op = chunk[0] % 10;
        let arg = chunk.get(1).copied().unwrap_or(0);
        let result = match op {
            0 => editor.handle_event(EditorEvent::Focus),
            1 => editor.handle_event(EditorEvent::Blur),
            2 => {
                let ch = ALPHABET[arg as usize % ALPHABET.len()] as char;
                let typed = editor.handle_event(EditorEvent::KeyDown(Key::Other(ch.to_string())));
                if typed.as_ref().is_ok_and(|r| *r == EventResult::Continue)
                    && editor.surface_mut().insert_text(&ch.to_string()).is_ok()
                {
                    editor.handle_event(EditorEvent::Input)
                } else {
                    typed
                }
            }
            3 => editor.handle_event(EditorEvent::KeyDown(Key::Enter)),
            4 => {
                let result = editor.handle_event(EditorEvent::KeyDown(Key::Backspace));
                if matches!(result, Ok(EventResult::Continue))
                    && editor.surface_mut().delete_backward().is_ok()
                {
                    editor.handle_event(EditorEvent::Input)
                } else {
                    result
                }
            }
            5 => {
                let controls = editor
                    .surface()
                    .query_all(editor.root(), |dom, node| chip::is_remove_control(dom, node));
                match controls.get(arg as usize % controls.len().max(1)) {
                    Some(&target) => editor.handle_event(EditorEvent::Click { target }),
                    None => Ok(EventResult::Continue),
                }
            }
            6 => editor.handle_event(EditorEvent::Paste(format!("p{arg}@q.r s{arg}"))),
            7 => {
                let frames = editor.surface_mut().take_frames();
                for frame in frames {
                    editor.on_frame(frame);
                }
                Ok(EventResult::Continue)
            }
            8 => editor
                .remove_email_at_index(arg as usize % 4)
                .map(|_| EventResult::Continue)
                .or(Ok(EventResult::Continue)),
            _ => {
                // Ranged selection; an endpoint landing on free text goes inside it.
                let root = editor.root();
                let children = editor.surface().children(root).to_vec();
                let point = |index: usize| match children.get(index) {
                    Some(&node) if editor.surface().is_text(node) => {
                        Boundary::new(node, editor.surface().text_content(node).len().min(1))
                    }
                    _ => Boundary::new(root, index),
                };
                let anchor = point(usize::from(arg >> 4) % (children.len() + 1));
                let focus = point(usize::from(arg & 0x0f) % (children.len() + 1));
                editor
                    .surface_mut()
                    .set_selection(Some(NativeSelection::new(anchor, focus)));
                Ok(EventResult::Continue)
            }
        };
        if result.is_err() {
            return;
        }

        // Chips on screen always mirror the committed list.
        let root = editor.root();
        let labels: Vec<String> = chip::chips(editor.surface(), root)
            .into_iter()
            .map(|c| chip::chip_label(editor.surface(), c))
            .collect();
        let values: Vec<String> = editor.get_emails().into_iter().map(|r| r.value).collect();
        assert_eq!(labels, values);
        for value in &values {
            assert_eq!(tokenize(value), vec![value.clone()]);
        }
    }
});
