//! Emitter for the backing text format.
//!
//! Writes entries in insertion order so a re-saved file keeps its structure.
//! Strings that would lex as another scalar type, or that contain characters
//! with structural meaning, are double-quoted; everything else is emitted
//! bare. Non-scalar list elements are emitted as single-line JSON flow
//! values, which the parser reads back natively.

use crate::document::ConfigDocument;
use crate::section::ConfigSection;
use crate::value::ConfigValue;

/// Serialize a document to text, honoring its `copy_header` and
/// `parse_comments` options.
pub fn write_document(doc: &ConfigDocument) -> String {
    let mut out = String::new();
    if doc.copy_header() {
        if let Some(header) = doc.header() {
            for line in header.lines() {
                if line.is_empty() {
                    out.push_str("#\n");
                } else {
                    out.push_str("# ");
                    out.push_str(line);
                    out.push('\n');
                }
            }
            if !header.is_empty() {
                out.push('\n');
            }
        }
    }
    write_section(&mut out, doc.root(), 0, doc.parse_comments());
    out
}

fn write_section(out: &mut String, section: &ConfigSection, depth: usize, with_comments: bool) {
    let pad = "  ".repeat(depth);
    for entry in section.entries() {
        if with_comments {
            for comment in &entry.comments {
                if comment.is_empty() {
                    out.push_str(&format!("{}#\n", pad));
                } else {
                    out.push_str(&format!("{}# {}\n", pad, comment));
                }
            }
        }
        let key = render_key(&entry.key);
        match &entry.value {
            ConfigValue::Section(inner) if inner.is_empty() => {
                out.push_str(&format!("{}{}: {{}}\n", pad, key));
            }
            ConfigValue::Section(inner) => {
                out.push_str(&format!("{}{}:\n", pad, key));
                write_section(out, inner, depth + 1, with_comments);
            }
            ConfigValue::List(items) if items.is_empty() => {
                out.push_str(&format!("{}{}: []\n", pad, key));
            }
            ConfigValue::List(items) => {
                out.push_str(&format!("{}{}:\n", pad, key));
                for item in items {
                    out.push_str(&format!("{}  - {}\n", pad, render_list_item(item)));
                }
            }
            scalar => {
                out.push_str(&format!("{}{}: {}\n", pad, key, render_scalar(scalar)));
            }
        }
    }
}

fn render_list_item(item: &ConfigValue) -> String {
    match item {
        // Nested structures inside lists use single-line JSON flow style.
        ConfigValue::List(_) | ConfigValue::Section(_) => item.to_json().to_string(),
        scalar => render_scalar(scalar),
    }
}

fn render_scalar(value: &ConfigValue) -> String {
    match value {
        ConfigValue::Null => "null".to_string(),
        ConfigValue::Bool(b) => b.to_string(),
        ConfigValue::Integer(i) => i.to_string(),
        ConfigValue::Float(f) => render_float(*f),
        ConfigValue::String(s) => render_string(s),
        ConfigValue::List(_) | ConfigValue::Section(_) => value.to_json().to_string(),
    }
}

fn render_float(f: f64) -> String {
    let text = f.to_string();
    // Keep the float tag on re-parse: a bare "3" would lex as an integer.
    if f.is_finite() && !text.contains('.') {
        format!("{}.0", text)
    } else {
        text
    }
}

fn render_string(s: &str) -> String {
    if needs_quotes(s) {
        quote_double(s)
    } else {
        s.to_string()
    }
}

fn render_key(key: &str) -> String {
    if needs_quotes(key) {
        quote_double(key)
    } else {
        key.to_string()
    }
}

/// Whether a bare emission of this string would lex back as something other
/// than the same string.
fn needs_quotes(s: &str) -> bool {
    if s.is_empty() || s.trim() != s {
        return true;
    }
    if s.contains('\n') || s.contains(':') || s.contains('#') {
        return true;
    }
    if s.starts_with(['-', '[', '{', '"', '\'', '&', '*', '!', '|', '>', '%', '@', '`']) {
        return true;
    }
    if matches!(s, "true" | "false" | "null" | "~") {
        return true;
    }
    // Anything numeric must be quoted to stay a string.
    s.parse::<f64>().is_ok()
}

fn quote_double(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::ConfigDocument;

    #[test]
    fn test_basic_layout() {
        let mut doc = ConfigDocument::new();
        doc.root_mut().set("server.host", "localhost").unwrap();
        doc.root_mut().set("server.port", 25565).unwrap();
        doc.root_mut().set("debug", false).unwrap();

        let text = write_document(&doc);
        assert_eq!(
            text,
            "server:\n  host: localhost\n  port: 25565\ndebug: false\n"
        );
    }

    #[test]
    fn test_header_written_when_enabled() {
        let mut doc = ConfigDocument::new();
        doc.set_header(Some("Managed file".to_string()));
        doc.root_mut().set("k", 1).unwrap();

        let text = write_document(&doc);
        assert!(text.starts_with("# Managed file\n\n"));

        doc.set_copy_header(false);
        let text = write_document(&doc);
        assert_eq!(text, "k: 1\n");
    }

    #[test]
    fn test_comments_written_at_key_indent() {
        let mut doc = ConfigDocument::new();
        doc.root_mut().set("outer.inner", 1).unwrap();
        doc.root_mut()
            .set_comments("outer.inner", ["nested note"])
            .unwrap();

        let text = write_document(&doc);
        assert_eq!(text, "outer:\n  # nested note\n  inner: 1\n");

        doc.set_parse_comments(false);
        assert_eq!(write_document(&doc), "outer:\n  inner: 1\n");
    }

    #[test]
    fn test_string_quoting() {
        assert_eq!(render_string("plain words"), "plain words");
        assert_eq!(render_string("true"), "\"true\"");
        assert_eq!(render_string("12.5"), "\"12.5\"");
        assert_eq!(render_string(""), "\"\"");
        assert_eq!(render_string("a: b"), "\"a: b\"");
        assert_eq!(render_string("line\nbreak"), "\"line\\nbreak\"");
    }

    #[test]
    fn test_float_rendering() {
        assert_eq!(render_float(3.0), "3.0");
        assert_eq!(render_float(2.5), "2.5");
    }

    #[test]
    fn test_list_rendering() {
        let mut doc = ConfigDocument::new();
        doc.root_mut().set("xs", vec![1i64, 2]).unwrap();
        let text = write_document(&doc);
        assert_eq!(text, "xs:\n  - 1\n  - 2\n");
    }
}
