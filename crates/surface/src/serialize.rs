use crate::dom::{DomSurface, NodeData};
use crate::text::escape_html;
use crate::types::Id;

const VOID_ELEMENTS: &[&str] = &["br", "img", "input", "hr", "meta", "link"];

impl DomSurface {
    /// Serialize `node` and its subtree to HTML.
    pub fn outer_html(&self, node: Id) -> String {
        let mut out = String::new();
        self.write_node(node, &mut out);
        out
    }

    /// Serialize the children of `node` to HTML.
    pub fn inner_html(&self, node: Id) -> String {
        let mut out = String::new();
        if let Ok(record) = self.arena.record(node) {
            for child in &record.children {
                self.write_node(*child, &mut out);
            }
        }
        out
    }

    fn write_node(&self, node: Id, out: &mut String) {
        let Ok(record) = self.arena.record(node) else {
            return;
        };
        match &record.data {
            NodeData::Text { text } => out.push_str(&escape_html(text)),
            NodeData::Element { name, attributes } => {
                out.push('<');
                out.push_str(name);
                for (k, v) in attributes {
                    out.push(' ');
                    out.push_str(k);
                    if let Some(v) = v {
                        out.push_str("=\"");
                        out.push_str(&escape_html(v));
                        out.push('"');
                    }
                }
                out.push('>');
                if VOID_ELEMENTS.contains(&&**name) {
                    return;
                }
                for child in &record.children {
                    self.write_node(*child, out);
                }
                out.push_str("</");
                out.push_str(name);
                out.push('>');
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{DomSurface, Surface};

    #[test]
    fn serializes_attributes_flags_and_escaped_text() {
        let mut s = DomSurface::new();
        let span = s.create_element("span");
        s.set_flag(span, "data-email").unwrap();
        s.set_attribute(span, "class", "a \"b\"").unwrap();
        let text = s.create_text("<x> & y");
        s.append_child(span, text).unwrap();
        let br = s.create_element("br");
        s.append_child(span, br).unwrap();
        assert_eq!(
            s.outer_html(span),
            "<span data-email class=\"a &quot;b&quot;\">&lt;x&gt; &amp; y<br></span>"
        );
        assert_eq!(s.inner_html(span), "&lt;x&gt; &amp; y<br>");
    }
}
