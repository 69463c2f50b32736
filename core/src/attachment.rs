//! Attachment field values.
//!
//! Attachments are uploaded by URL: the client writes `[{url, filename}]`
//! into an attachment field and the server fetches the file itself. Reads
//! return the stored shape, which carries a server-side id and metadata.

use serde::{Deserialize, Serialize};

/// One file to attach, referenced by a publicly reachable URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentUpload {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

impl AttachmentUpload {
    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            filename: None,
        }
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }
}

/// An attachment as stored by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub id: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn upload_omits_missing_filename() {
        let value = serde_json::to_value(AttachmentUpload::from_url("https://files.test/a.png")).unwrap();
        assert_eq!(value, json!({"url": "https://files.test/a.png"}));
    }

    #[test]
    fn upload_with_filename() {
        let upload = AttachmentUpload::from_url("https://files.test/a.png").with_filename("logo.png");
        assert_eq!(
            serde_json::to_value(upload).unwrap(),
            json!({"url": "https://files.test/a.png", "filename": "logo.png"})
        );
    }

    #[test]
    fn stored_attachment_reads_type() {
        let attachment: Attachment = serde_json::from_value(json!({
            "id": "att1",
            "url": "https://files.test/a.png",
            "filename": "a.png",
            "size": 42,
            "type": "image/png"
        }))
        .unwrap();
        assert_eq!(attachment.mime_type.as_deref(), Some("image/png"));
        assert_eq!(attachment.size, Some(42));
    }
}
