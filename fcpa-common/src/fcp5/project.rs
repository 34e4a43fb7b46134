//! Parsed FCP5 project and its file registry

use std::collections::HashMap;

use once_cell::unsync::OnceCell;
use roxmltree::Document;
use tracing::debug;

use super::paths::decode_pathurl;
use super::sequence::Sequence;
use super::child_text;
use crate::xml::parsing_options;
use crate::{Error, Result};

const ROOT_ELEMENT: &str = "xmeml";
const SUPPORTED_VERSION: &str = "5";

/// A parsed `xmeml` version 5 document
pub struct Fcp5Project<'input> {
    doc: Document<'input>,
    /// file id → origin path, built on first lookup
    files: OnceCell<HashMap<String, String>>,
}

impl<'input> Fcp5Project<'input> {
    /// Parse project text, rejecting anything that is not FCP5 XML
    pub fn parse(text: &'input str) -> Result<Self> {
        let doc = Document::parse_with_options(text, parsing_options())
            .map_err(|e| Error::InvalidInput(format!("Invalid XML file: {}", e)))?;

        let root = doc.root_element();
        let version = root.attribute("version").map(str::trim);
        if root.tag_name().name() != ROOT_ELEMENT || version != Some(SUPPORTED_VERSION) {
            return Err(Error::InvalidInput("Not a valid FCP5 XML file".to_string()));
        }

        Ok(Self {
            doc,
            files: OnceCell::new(),
        })
    }

    /// Every sequence in the document, in document order
    pub fn sequences(&self) -> Vec<Sequence<'_, 'input>> {
        self.doc
            .descendants()
            .filter(|n| n.is_element() && n.tag_name().name() == "sequence")
            .map(|node| Sequence::new(self, node))
            .collect()
    }

    pub fn first_sequence(&self) -> Option<Sequence<'_, 'input>> {
        self.sequences().into_iter().next()
    }

    pub fn sequence_by_id(&self, id: &str) -> Option<Sequence<'_, 'input>> {
        self.sequences().into_iter().find(|s| s.id() == Some(id))
    }

    /// Origin path of the file with the given id
    pub fn file_origin(&self, id: &str) -> Option<&str> {
        self.files().get(id).map(String::as_str)
    }

    fn files(&self) -> &HashMap<String, String> {
        self.files.get_or_init(|| {
            let mut files = HashMap::new();
            for file in self
                .doc
                .descendants()
                .filter(|n| n.is_element() && n.tag_name().name() == "file")
            {
                let Some(id) = file.attribute("id") else {
                    continue;
                };
                // Exporters repeat a file id as a bare reference; the first
                // element carrying a path defines it
                if files.contains_key(id) {
                    continue;
                }
                if let Some(path) = child_text(file, "pathurl").and_then(decode_pathurl) {
                    files.insert(id.to_string(), path);
                }
            }
            debug!("Indexed {} FCP5 file references", files.len());
            files
        })
    }

    /// Whether the document declares any `<file>` with a path
    pub fn has_files(&self) -> bool {
        !self.files().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fcp5::fixtures;

    #[test]
    fn test_rejects_non_fcp5_documents() {
        for text in ["<xml/>", "<xmeml version=\"4\"/>", "<xmeml/>", "not xml", ""] {
            let err = Fcp5Project::parse(text).err().unwrap();
            assert!(err.is_client_error(), "{}", text);
        }
    }

    #[test]
    fn test_accepts_doctype_and_empty_project() {
        let project = Fcp5Project::parse(
            "<?xml version=\"1.0\"?>\n<!DOCTYPE xmeml>\n<xmeml version=\"5\"></xmeml>",
        )
        .unwrap();
        assert!(project.sequences().is_empty());
        assert!(project.first_sequence().is_none());
    }

    #[test]
    fn test_sequences_in_document_order() {
        let text = fixtures::project(&[
            fixtures::sequence("seq-1", "First", &[]),
            fixtures::sequence("seq-2", "Second", &[]),
        ]);
        let project = Fcp5Project::parse(&text).unwrap();
        let names: Vec<_> = project.sequences().iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["First", "Second"]);
        assert_eq!(project.sequence_by_id("seq-2").unwrap().name(), "Second");
    }

    #[test]
    fn test_first_file_path_wins() {
        let text = r#"<xmeml version="5">
  <file id="f1"><pathurl>file://localhost/a.wav</pathurl></file>
  <file id="f1"/>
  <file id="f1"><pathurl>file://localhost/b.wav</pathurl></file>
  <file id="f2"><pathurl>file:///media/My%20Take.wav</pathurl></file>
</xmeml>"#;
        let project = Fcp5Project::parse(text).unwrap();
        assert_eq!(project.file_origin("f1"), Some("/a.wav"));
        assert_eq!(project.file_origin("f2"), Some("/media/My Take.wav"));
        assert_eq!(project.file_origin("missing"), None);
        assert!(project.has_files());
    }

    #[test]
    fn test_bare_reference_before_definition() {
        let text = r#"<xmeml version="5">
  <file id="f1"/>
  <file id="f1"><pathurl>/late.wav</pathurl></file>
</xmeml>"#;
        let project = Fcp5Project::parse(text).unwrap();
        assert_eq!(project.file_origin("f1"), Some("/late.wav"));
    }
}
