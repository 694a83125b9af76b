//! Decoding of `data:` URL attachments sent with a task.

use std::collections::HashMap;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Deserialize;

/// One attachment as it arrives in the task request.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct Attachment {
    /// File name the generated page refers to (`data.csv`, `input.md`, ...).
    #[serde(default)]
    pub name: Option<String>,

    /// A `data:<mime>;base64,<payload>` URL.
    #[serde(default)]
    pub url: String,
}

/// Decoded attachments keyed by file name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attachments {
    files: HashMap<String, Vec<u8>>,
}

impl Attachments {
    /// Decodes every usable attachment.
    ///
    /// Entries without a name, without a `data:` URL, or with invalid base64
    /// are skipped. Later entries win on duplicate names.
    #[must_use]
    pub fn decode(attachments: &[Attachment]) -> Self {
        let mut files = HashMap::new();

        for attachment in attachments {
            let Some(name) = attachment.name.as_deref().filter(|n| !n.is_empty()) else {
                continue;
            };
            let Some(bytes) = decode_data_url(&attachment.url) else {
                tracing::debug!(name, "Skipping attachment with unusable data URL");
                continue;
            };
            files.insert(name.to_string(), bytes);
        }

        Self { files }
    }

    /// Returns the bytes of the named attachment.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.files.get(name).map(Vec::as_slice)
    }

    /// Returns the named attachment or `default`.
    #[must_use]
    pub fn get_or<'a>(&'a self, name: &str, default: &'a [u8]) -> &'a [u8] {
        self.get(name).unwrap_or(default)
    }

    /// Number of decoded attachments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Returns true if nothing was decoded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

fn decode_data_url(url: &str) -> Option<Vec<u8>> {
    let rest = url.strip_prefix("data:")?;
    let (_, encoded) = rest.split_once(',')?;
    STANDARD.decode(encoded.trim()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attachment(name: Option<&str>, url: &str) -> Attachment {
        Attachment {
            name: name.map(ToString::to_string),
            url: url.to_string(),
        }
    }

    #[test]
    fn decodes_base64_data_url() {
        let decoded = Attachments::decode(&[attachment(
            Some("data.csv"),
            "data:text/csv;base64,cHJvZHVjdCxzYWxlcwphLDEK",
        )]);

        assert_eq!(decoded.get("data.csv"), Some(&b"product,sales\na,1\n"[..]));
    }

    #[test]
    fn skips_nameless_entries() {
        let decoded = Attachments::decode(&[
            attachment(None, "data:text/plain;base64,aGk="),
            attachment(Some(""), "data:text/plain;base64,aGk="),
        ]);

        assert!(decoded.is_empty());
    }

    #[test]
    fn skips_non_data_urls() {
        let decoded = Attachments::decode(&[attachment(
            Some("remote.png"),
            "https://example.com/remote.png",
        )]);

        assert!(decoded.get("remote.png").is_none());
    }

    #[test]
    fn skips_invalid_base64() {
        let decoded = Attachments::decode(&[
            attachment(Some("bad.bin"), "data:application/octet-stream;base64,@@@"),
            attachment(Some("good.txt"), "data:text/plain;base64,aGk="),
        ]);

        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded.get("good.txt"), Some(&b"hi"[..]));
    }

    #[test]
    fn skips_data_url_without_comma() {
        let decoded = Attachments::decode(&[attachment(Some("x"), "data:text/plain;base64")]);
        assert!(decoded.is_empty());
    }

    #[test]
    fn get_or_falls_back() {
        let decoded = Attachments::default();
        assert_eq!(decoded.get_or("input.md", b"# Title"), b"# Title");
    }

    #[test]
    fn deserializes_from_request_json() {
        let parsed: Vec<Attachment> = serde_json::from_value(serde_json::json!([
            {"name": "sample.png", "url": "data:image/png;base64,iVBORw=="},
            {"url": "data:,"}
        ]))
        .unwrap();

        assert_eq!(parsed[0].name.as_deref(), Some("sample.png"));
        assert_eq!(parsed[1].name, None);
    }
}
