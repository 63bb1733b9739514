//! Multipart payload descriptions.
//!
//! Handlers build a [`FormPayload`], an ordered and inspectable list of
//! text and file parts; only the transport converts it into an actual
//! `reqwest::multipart::Form`. Tests assert on payloads directly without
//! touching the network.

use crate::error::{ClientError, Result};
use crate::store::FileHandle;

/// Body of one multipart part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartBody {
    Text(String),
    File {
        filename: String,
        bytes: Vec<u8>,
        mime: String,
    },
}

/// One named part of a multipart body. Field names repeat freely
/// (`files`, `files`, ...), matching FormData semantics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    pub name: String,
    pub body: PartBody,
}

/// Ordered multipart form description.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormPayload {
    parts: Vec<Part>,
}

impl FormPayload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a text field.
    pub fn text(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.parts.push(Part {
            name: name.into(),
            body: PartBody::Text(value.into()),
        });
        self
    }

    /// Append a file field, guessing the content type from the filename.
    pub fn file(&mut self, name: impl Into<String>, file: &FileHandle) -> &mut Self {
        let mime = mime_guess::from_path(file.name())
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        self.parts.push(Part {
            name: name.into(),
            body: PartBody::File {
                filename: file.name().to_string(),
                bytes: file.bytes().to_vec(),
                mime,
            },
        });
        self
    }

    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Value of the first text part with this field name.
    pub fn text_value(&self, name: &str) -> Option<&str> {
        self.parts.iter().find_map(|p| match &p.body {
            PartBody::Text(value) if p.name == name => Some(value.as_str()),
            _ => None,
        })
    }

    /// Filenames of every file part under this field name, in order.
    pub fn file_names(&self, name: &str) -> Vec<&str> {
        self.parts
            .iter()
            .filter_map(|p| match &p.body {
                PartBody::File { filename, .. } if p.name == name => Some(filename.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Field names of every file part, in order.
    pub fn file_fields(&self) -> Vec<&str> {
        self.parts
            .iter()
            .filter_map(|p| match &p.body {
                PartBody::File { .. } => Some(p.name.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Thin adapter to the reqwest form type; the only non-pure edge.
    /// Fails rather than drop a file body if a content type does not parse.
    pub fn into_form(self) -> Result<reqwest::multipart::Form> {
        let mut form = reqwest::multipart::Form::new();
        for part in self.parts {
            form = match part.body {
                PartBody::Text(value) => form.text(part.name, value),
                PartBody::File {
                    filename,
                    bytes,
                    mime,
                } => {
                    let piece = reqwest::multipart::Part::bytes(bytes)
                        .file_name(filename)
                        .mime_str(&mime)
                        .map_err(|err| {
                            ClientError::Validation(format!(
                                "invalid content type {}: {}",
                                mime, err
                            ))
                        })?;
                    form.part(part.name, piece)
                }
            };
        }
        Ok(form)
    }
}
