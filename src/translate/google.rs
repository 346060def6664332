use super::{Translation, Translator};
use crate::error::TranslateError;
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://translate.googleapis.com/translate_a/single";

/// Client for the keyless Google Translate "gtx" endpoint. The source
/// language is always auto-detected.
pub struct GoogleTranslator {
    endpoint: String,
    target_language: String,
    client: reqwest::Client,
}

impl GoogleTranslator {
    pub fn new(
        endpoint: String,
        target_language: String,
        timeout: Option<Duration>,
    ) -> Result<Self, TranslateError> {
        let mut builder =
            reqwest::Client::builder().user_agent("Mozilla/5.0 (compatible; sentiview/0.1)");
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(TranslateError::Client)?;

        Ok(Self {
            endpoint,
            target_language,
            client,
        })
    }

    fn request_url(&self, text: &str) -> String {
        format!(
            "{}?client=gtx&sl=auto&tl={}&dt=t&q={}",
            self.endpoint,
            urlencoding::encode(&self.target_language),
            urlencoding::encode(text)
        )
    }
}

/// Pull the translation out of a gtx response.
///
/// The body looks like `[[["hello","hola",null,null,10], ...], null, "es", ...]`:
/// element 0 lists translated segments, element 2 is the detected source.
fn parse_gtx_response(json: &Value) -> Result<Translation, TranslateError> {
    let segments = json
        .get(0)
        .and_then(|v| v.as_array())
        .ok_or_else(|| TranslateError::Malformed("missing segment list".to_string()))?;

    let text: String = segments
        .iter()
        .filter_map(|segment| segment.get(0).and_then(|v| v.as_str()))
        .collect();

    if text.trim().is_empty() {
        return Err(TranslateError::Malformed("empty translation".to_string()));
    }

    let detected_language = json.get(2).and_then(|v| v.as_str()).map(|s| s.to_string());

    Ok(Translation {
        text,
        detected_language,
    })
}

#[async_trait]
impl Translator for GoogleTranslator {
    async fn translate(&self, text: &str) -> Result<Translation, TranslateError> {
        let response = self.client.get(self.request_url(text)).send().await?;

        if !response.status().is_success() {
            return Err(TranslateError::Status(response.status()));
        }

        let json: Value = response
            .json()
            .await
            .map_err(|e| TranslateError::Malformed(e.to_string()))?;

        let translation = parse_gtx_response(&json)?;
        tracing::debug!(
            detected = translation.detected_language.as_deref().unwrap_or("?"),
            chars = translation.text.len(),
            "translation received"
        );
        Ok(translation)
    }

    fn name(&self) -> &str {
        "google"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_single_segment() {
        let body = json!([[["I love this", "me encanta esto", null, null, 10]], null, "es"]);
        let translation = parse_gtx_response(&body).unwrap();
        assert_eq!(translation.text, "I love this");
        assert_eq!(translation.detected_language, Some("es".to_string()));
    }

    #[test]
    fn test_parse_joins_segments() {
        let body = json!([
            [
                ["The movie was great. ", "La película fue genial. ", null, null, 10],
                ["The ending was sad.", "El final fue triste.", null, null, 10]
            ],
            null,
            "es"
        ]);
        let translation = parse_gtx_response(&body).unwrap();
        assert_eq!(translation.text, "The movie was great. The ending was sad.");
    }

    #[test]
    fn test_parse_without_detected_language() {
        let body = json!([[["hello", "hello", null, null, 1]]]);
        let translation = parse_gtx_response(&body).unwrap();
        assert_eq!(translation.detected_language, None);
    }

    #[test]
    fn test_parse_rejects_missing_segments() {
        let body = json!({"error": "nope"});
        assert!(matches!(
            parse_gtx_response(&body),
            Err(TranslateError::Malformed(_))
        ));
    }

    #[test]
    fn test_parse_rejects_empty_translation() {
        let body = json!([[], null, "es"]);
        assert!(matches!(
            parse_gtx_response(&body),
            Err(TranslateError::Malformed(_))
        ));
    }

    fn translator(target: &str) -> GoogleTranslator {
        GoogleTranslator::new(DEFAULT_ENDPOINT.to_string(), target.to_string(), None).unwrap()
    }

    #[test]
    fn test_request_url_encodes_text() {
        let translator = translator("en");
        let url = translator.request_url("¿qué tal?");
        assert!(url.starts_with(DEFAULT_ENDPOINT));
        assert!(url.contains("tl=en"));
        assert!(url.contains("sl=auto"));
        assert!(url.ends_with("q=%C2%BFqu%C3%A9%20tal%3F"));
    }

    #[test]
    fn test_request_url_encodes_target_language() {
        assert!(translator("zh-CN").request_url("hola").contains("tl=zh-CN&"));

        let url = translator("en&sl=fr").request_url("hola");
        assert!(url.contains("tl=en%26sl%3Dfr&"));
        assert_eq!(url.matches("sl=").count(), 1);
    }

    #[test]
    fn test_new_with_timeout_builds_client() {
        let translator = GoogleTranslator::new(
            DEFAULT_ENDPOINT.to_string(),
            "en".to_string(),
            Some(Duration::from_secs(3)),
        );
        assert!(translator.is_ok());
    }
}
