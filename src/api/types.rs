//! Wire types for the combining service.

use serde::{Deserialize, Serialize};

/// One section entry in the `checklist_data` side channel: the section
/// name plus the form-field keys holding its files.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChecklistEntry {
    pub name: String,
    pub files: Vec<String>,
}

/// Per-page preview returned by `/get-page-info`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PagePreview {
    /// Page number, 1-indexed.
    pub page: u32,
    /// Base64 thumbnail payload.
    pub thumbnail: String,
}

/// Page metadata for one uploaded file, returned in input order by
/// `/get-page-info`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageMetadata {
    pub original_name: String,
    pub page_count: u32,
    #[serde(default)]
    pub previews: Vec<PagePreview>,
}

impl PageMetadata {
    /// Decode one page's thumbnail. `None` when the page has no preview or
    /// the payload is not valid base64.
    pub fn thumbnail_bytes(&self, page: u32) -> Option<Vec<u8>> {
        use base64::Engine as _;

        let preview = self.previews.iter().find(|p| p.page == page)?;
        // Previews may arrive as bare base64 or as a data URL
        let payload = preview
            .thumbnail
            .rsplit_once(',')
            .map(|(_, data)| data)
            .unwrap_or(&preview.thumbnail);
        base64::engine::general_purpose::STANDARD.decode(payload).ok()
    }
}

/// Output formats the `/combine` endpoint can produce.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Pdf,
    Docx,
    Pptx,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Pdf => "pdf",
            OutputFormat::Docx => "docx",
            OutputFormat::Pptx => "pptx",
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pdf" => Ok(OutputFormat::Pdf),
            "docx" => Ok(OutputFormat::Docx),
            "pptx" => Ok(OutputFormat::Pptx),
            other => Err(format!("unknown output format: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_metadata_parses_service_response() {
        let body = r#"[{"original_name":"a.pdf","page_count":2,
            "previews":[{"page":1,"thumbnail":"aGk="},{"page":2,"thumbnail":"eW8="}]}]"#;
        let records: Vec<PageMetadata> = serde_json::from_str(body).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].page_count, 2);
        assert_eq!(records[0].thumbnail_bytes(1).unwrap(), b"hi");
    }

    #[test]
    fn thumbnail_accepts_data_urls() {
        let meta = PageMetadata {
            original_name: "a.pdf".to_string(),
            page_count: 1,
            previews: vec![PagePreview {
                page: 1,
                thumbnail: "data:image/png;base64,aGk=".to_string(),
            }],
        };
        assert_eq!(meta.thumbnail_bytes(1).unwrap(), b"hi");
        assert!(meta.thumbnail_bytes(2).is_none());
    }

    #[test]
    fn output_format_round_trips() {
        assert_eq!("docx".parse::<OutputFormat>().unwrap(), OutputFormat::Docx);
        assert_eq!(OutputFormat::default().as_str(), "pdf");
        assert!("xlsx".parse::<OutputFormat>().is_err());
    }
}
