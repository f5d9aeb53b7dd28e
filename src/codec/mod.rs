//! Document codec: converts between the in-memory tree and the backing
//! text format.
//!
//! The format is a YAML-like dialect restricted to what the store needs to
//! round-trip faithfully: nested mappings via 2-space indentation, block
//! lists of scalars, quoted and unquoted scalars, full-line `#` comments
//! attached to the following key, and a leading header block. Arbitrarily
//! nested values inside lists fall back to single-line JSON flow style,
//! which the parser reads back natively.
//!
//! Round-trip property: for any document, `parse(write(doc))` reproduces the
//! same tree, key order, comments, and header (under the document's enabled
//! options).

mod parser;
mod writer;

pub use parser::{parse_document, ParsedDocument};
pub use writer::write_document;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{ConfigDocument, DocumentOptions};

    fn doc_from(text: &str) -> ConfigDocument {
        let parsed = parse_document(text, true).expect("parse failed");
        let mut doc = ConfigDocument::with_root(parsed.root, DocumentOptions::default());
        doc.set_header(parsed.header);
        doc
    }

    #[test]
    fn test_write_parse_round_trip() {
        let mut doc = ConfigDocument::new();
        doc.root_mut().set("server.host", "localhost").unwrap();
        doc.root_mut().set("server.port", 25565).unwrap();
        doc.root_mut().set("server.motd", "hello: world").unwrap();
        doc.root_mut().set("limits.ratio", 0.5).unwrap();
        doc.root_mut()
            .set("allowed", vec!["alice", "bob"])
            .unwrap();
        doc.root_mut()
            .set_comments("server.port", ["Port to bind."])
            .unwrap();
        doc.set_header(Some("Generated file\nDo not edit".to_string()));

        let text = write_document(&doc);
        let back = doc_from(&text);

        assert_eq!(back.root(), doc.root());
        assert_eq!(back.header(), Some("Generated file\nDo not edit"));
        assert_eq!(
            back.root().comments("server.port").unwrap(),
            vec!["Port to bind."]
        );
    }

    #[test]
    fn test_round_trip_preserves_key_order() {
        let text = "zeta: 1\nalpha: 2\nmid:\n  b: true\n  a: false\n";
        let doc = doc_from(text);
        assert_eq!(
            doc.root().keys("", true).unwrap(),
            vec!["zeta", "alpha", "mid", "mid.b", "mid.a"]
        );
        assert_eq!(write_document(&doc), text);
    }

    #[test]
    fn test_comments_dropped_when_disabled() {
        let text = "# for the key\nkey: 1\n";
        let parsed = parse_document(text, false).unwrap();
        assert!(parsed.root.comments("key").unwrap().is_empty());

        let parsed = parse_document(text, true).unwrap();
        assert_eq!(parsed.root.comments("key").unwrap(), vec!["for the key"]);
    }

    #[test]
    fn test_float_tag_survives_round_trip() {
        let mut doc = ConfigDocument::new();
        doc.root_mut().set("whole", 3.0).unwrap();
        let back = doc_from(&write_document(&doc));
        assert!(back.root().is_double("whole"));
        assert_eq!(back.root().get_double("whole").unwrap(), 3.0);
    }

    #[test]
    fn test_empty_containers_round_trip() {
        let mut doc = ConfigDocument::new();
        doc.root_mut().set("empty_list", Vec::<i64>::new()).unwrap();
        doc.root_mut().create_section("empty_section").unwrap();

        let back = doc_from(&write_document(&doc));
        assert!(back.root().is_list("empty_list"));
        assert!(back.root().get_list("empty_list").unwrap().is_empty());
        assert!(back.root().is_section("empty_section"));
    }

    #[test]
    fn test_tricky_strings_round_trip() {
        let mut doc = ConfigDocument::new();
        for (key, value) in [
            ("a", "true"),
            ("b", "123"),
            ("c", " padded "),
            ("d", ""),
            ("e", "# not a comment"),
            ("f", "line\nbreak"),
            ("g", "- dash"),
        ] {
            doc.root_mut().set(key, value).unwrap();
        }
        let back = doc_from(&write_document(&doc));
        for (key, value) in [
            ("a", "true"),
            ("b", "123"),
            ("c", " padded "),
            ("d", ""),
            ("e", "# not a comment"),
            ("f", "line\nbreak"),
            ("g", "- dash"),
        ] {
            assert!(back.root().is_string(key), "key {} lost its tag", key);
            assert_eq!(back.root().get_string(key).unwrap(), value, "key {}", key);
        }
    }
}
