//! Chip and separator markup.
//!
//! A chip is a non-editable `span` carrying one token as its label plus a
//! removal control. Separators are zero-width non-editable markers placed
//! between chips so the caret always has a landing slot next to each chip.

use email_core::validate;
use surface::{Id, Surface, SurfaceError};

pub const ROOT_CLASS: &str = "emails-editor";
pub const CHIP_CLASS: &str = "emails-editor__email";
pub const CHIP_VALID_CLASS: &str = "emails-editor__email--valid";
pub const CHIP_INVALID_CLASS: &str = "emails-editor__email--invalid";
pub const REMOVE_CLASS: &str = "emails-editor__email-btn-remove";
pub const SEPARATOR_CLASS: &str = "emails-editor__separator";

pub const CHIP_ATTR: &str = "data-email";
pub const REMOVE_ATTR: &str = "data-email-remove";
pub const SEPARATOR_ATTR: &str = "data-email-separator";

const ZERO_WIDTH_SPACE: &str = "\u{200B}";

/// Nodes created for one rendered token.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Chip {
    pub node: Id,
    pub remove_control: Id,
}

pub fn chip_class(valid: bool) -> String {
    let modifier = if valid {
        CHIP_VALID_CLASS
    } else {
        CHIP_INVALID_CLASS
    };
    format!("{CHIP_CLASS} {modifier}")
}

/// Build a detached chip for `token`.
///
/// The label is the raw token; markup escaping is the serializer's job.
pub fn render_chip<S: Surface>(surface: &mut S, token: &str) -> Result<Chip, SurfaceError> {
    let node = surface.create_element("span");
    surface.set_flag(node, CHIP_ATTR)?;
    surface.set_attribute(node, "contenteditable", "false")?;
    surface.set_attribute(node, "class", &chip_class(validate(token)))?;

    let label = surface.create_text(token);
    surface.append_child(node, label)?;

    let remove_control = surface.create_element("span");
    surface.set_attribute(remove_control, "class", REMOVE_CLASS)?;
    surface.set_flag(remove_control, REMOVE_ATTR)?;
    surface.append_child(node, remove_control)?;

    Ok(Chip {
        node,
        remove_control,
    })
}

/// Build a detached separator marker.
pub fn render_separator<S: Surface>(surface: &mut S) -> Result<Id, SurfaceError> {
    let node = surface.create_element("span");
    surface.set_flag(node, SEPARATOR_ATTR)?;
    surface.set_attribute(node, "contenteditable", "false")?;
    surface.set_attribute(node, "class", SEPARATOR_CLASS)?;
    let text = surface.create_text(ZERO_WIDTH_SPACE);
    surface.append_child(node, text)?;
    Ok(node)
}

pub fn is_chip<S: Surface + ?Sized>(surface: &S, node: Id) -> bool {
    surface.has_attribute(node, CHIP_ATTR)
}

pub fn is_separator<S: Surface + ?Sized>(surface: &S, node: Id) -> bool {
    surface.has_attribute(node, SEPARATOR_ATTR)
}

pub fn is_remove_control<S: Surface + ?Sized>(surface: &S, node: Id) -> bool {
    surface.has_attribute(node, REMOVE_ATTR)
}

/// The token a chip displays: its direct text children, in order.
pub fn chip_label<S: Surface + ?Sized>(surface: &S, chip: Id) -> String {
    surface
        .children(chip)
        .iter()
        .filter(|c| surface.is_text(**c))
        .map(|c| surface.text_content(*c))
        .collect()
}

/// Root-level chips in document order.
pub fn chips<S: Surface + ?Sized>(surface: &S, root: Id) -> Vec<Id> {
    surface
        .children(root)
        .iter()
        .copied()
        .filter(|c| is_chip(surface, *c))
        .collect()
}

/// The root-level chip containing `node`, if any.
pub fn enclosing_chip<S: Surface + ?Sized>(surface: &S, root: Id, node: Id) -> Option<Id> {
    surface
        .top_level_child(root, node)
        .filter(|top| is_chip(surface, *top))
}

/// Current index of the chip enclosing `node`, resolved by identity.
pub fn resolve_chip_index<S: Surface + ?Sized>(surface: &S, root: Id, node: Id) -> Option<usize> {
    let chip = enclosing_chip(surface, root, node)?;
    chips(surface, root).iter().position(|c| *c == chip)
}

#[cfg(test)]
mod tests {
    use super::*;
    use surface::DomSurface;

    #[test]
    fn chip_markup_reflects_validity() {
        let mut dom = DomSurface::new();
        let body = dom.body();
        let valid = render_chip(&mut dom, "a@b.com").unwrap();
        let invalid = render_chip(&mut dom, "<nope>").unwrap();
        dom.append_child(body, valid.node).unwrap();
        dom.append_child(body, invalid.node).unwrap();

        assert_eq!(
            dom.outer_html(valid.node),
            "<span data-email contenteditable=\"false\" class=\"emails-editor__email \
             emails-editor__email--valid\">a@b.com<span class=\"emails-editor__email-btn-remove\" \
             data-email-remove></span></span>"
        );
        assert!(dom.has_class(invalid.node, CHIP_INVALID_CLASS));
        assert!(dom.outer_html(invalid.node).contains("&lt;nope&gt;"));
        assert_eq!(chip_label(&dom, invalid.node), "<nope>");
    }

    #[test]
    fn separator_is_marked_and_not_a_chip() {
        let mut dom = DomSurface::new();
        let sep = render_separator(&mut dom).unwrap();
        assert!(is_separator(&dom, sep));
        assert!(!is_chip(&dom, sep));
        assert_eq!(dom.attribute(sep, "contenteditable"), Some("false"));
    }

    #[test]
    fn index_resolves_by_identity() {
        let mut dom = DomSurface::new();
        let root = dom.body();
        let mut rendered = Vec::new();
        for token in ["a@b.com", "c@d.com", "e@f.com"] {
            let sep = render_separator(&mut dom).unwrap();
            dom.append_child(root, sep).unwrap();
            let chip = render_chip(&mut dom, token).unwrap();
            dom.append_child(root, chip.node).unwrap();
            rendered.push(chip);
        }
        assert_eq!(resolve_chip_index(&dom, root, rendered[2].remove_control), Some(2));

        dom.remove(rendered[0].node).unwrap();
        assert_eq!(resolve_chip_index(&dom, root, rendered[2].remove_control), Some(1));
        assert_eq!(resolve_chip_index(&dom, root, rendered[1].node), Some(0));
        assert_eq!(resolve_chip_index(&dom, root, root), None);
    }
}
