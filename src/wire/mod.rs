use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::ResponseSchema;

/// ========================================
/// Gateway request/response contract
/// ========================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Structured,
    Text,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tx {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
}

impl Tx {
    pub fn new() -> Self {
        Self { id: Uuid::new_v4(), timestamp: Utc::now() }
    }
}

impl Default for Tx {
    fn default() -> Self {
        Self::new()
    }
}

/// A single still frame sent alongside the text instructions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InlineImage {
    pub mime_type: String,
    /// Base64 payload, no `data:` prefix.
    pub data: String,
}

impl InlineImage {
    pub fn jpeg(data: impl Into<String>) -> Self {
        Self { mime_type: "image/jpeg".into(), data: data.into() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelRequest {
    pub mode: Mode,
    pub transaction: Tx,
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<ResponseSchema>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<InlineImage>,
}

impl ModelRequest {
    pub fn structured(prompt: impl Into<String>, schema: ResponseSchema) -> Self {
        Self {
            mode: Mode::Structured,
            transaction: Tx::new(),
            prompt: prompt.into(),
            schema: Some(schema),
            image: None,
        }
    }

    pub fn text(prompt: impl Into<String>, image: Option<InlineImage>) -> Self {
        Self {
            mode: Mode::Text,
            transaction: Tx::new(),
            prompt: prompt.into(),
            schema: None,
            image,
        }
    }

    /// Copy suitable for the artifact log: the image payload is replaced by its length.
    pub fn redacted(&self) -> Self {
        let mut out = self.clone();
        if let Some(img) = out.image.as_mut() {
            img.data = format!("<{} base64 bytes elided>", img.data.len());
        }
        out
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelReply {
    pub mode: Mode,
    pub transaction: Tx,
    /// Raw text body returned by the model (JSON text in structured mode).
    pub body: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema;

    #[test]
    fn structured_request_carries_schema_and_no_image() {
        let req = ModelRequest::structured("hi", schema::training_plan_schema());
        assert_eq!(req.mode, Mode::Structured);
        assert!(req.schema.is_some());
        assert!(req.image.is_none());
    }

    #[test]
    fn redacted_request_hides_image_payload() {
        let req = ModelRequest::text("look", Some(InlineImage::jpeg("QUJDRA==")));
        let red = req.redacted();
        let img = red.image.unwrap();
        assert_eq!(img.mime_type, "image/jpeg");
        assert_eq!(img.data, "<8 base64 bytes elided>");
        assert_eq!(req.image.unwrap().data, "QUJDRA==");
    }

    #[test]
    fn serialized_text_request_omits_schema() {
        let req = ModelRequest::text("plain", None);
        let v = serde_json::to_value(&req).unwrap();
        assert_eq!(v["mode"], "text");
        assert!(v.get("schema").is_none());
        assert!(v.get("image").is_none());
    }
}
