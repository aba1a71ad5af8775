//! Writes an element tree out as SVG markup.

use crate::element::Element;

/// Serialize a tree as an indented SVG document, two spaces per level.
pub fn to_svg_string(root: &Element) -> String {
    let mut out = String::with_capacity(4096);
    out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    write_element(root, &mut out, 0);
    out
}

fn write_element(el: &Element, out: &mut String, depth: usize) {
    write_indent(out, depth);
    out.push('<');
    out.push_str(&el.name);
    for (key, value) in &el.attrs {
        out.push(' ');
        out.push_str(key);
        out.push_str("=\"");
        push_escaped(out, &value.to_string(), true);
        out.push('"');
    }

    let body = el.body.as_deref().filter(|b| !b.is_empty());
    if el.children.is_empty() && body.is_none() {
        out.push_str(" />\n");
        return;
    }

    if let Some(text) = body {
        // Text-only elements stay on one line so whitespace is not added to the text.
        out.push('>');
        push_escaped(out, text, false);
        if el.children.is_empty() {
            push_close(out, &el.name);
            return;
        }
        out.push('\n');
    } else {
        out.push_str(">\n");
    }

    for child in &el.children {
        write_element(child, out, depth + 1);
    }
    write_indent(out, depth);
    push_close(out, &el.name);
}

fn push_close(out: &mut String, name: &str) {
    out.push_str("</");
    out.push_str(name);
    out.push_str(">\n");
}

fn write_indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str("  ");
    }
}

/// Escape XML special characters; quotes only matter inside attributes.
fn push_escaped(out: &mut String, input: &str, attribute: bool) {
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            '\'' if attribute => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
}
