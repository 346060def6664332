pub mod google;

use crate::config::{Provider, TranslationConfig};
use crate::error::TranslateError;
use async_trait::async_trait;
use std::sync::Arc;

pub use google::GoogleTranslator;

#[derive(Debug, Clone, PartialEq)]
pub struct Translation {
    pub text: String,
    pub detected_language: Option<String>,
}

/// Turns user text into English. Implementations may block on network I/O
/// and are only ever driven from pipeline workers.
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, text: &str) -> Result<Translation, TranslateError>;

    fn name(&self) -> &str;
}

/// Offline translator that passes text through unchanged.
#[derive(Debug, Default, Clone)]
pub struct IdentityTranslator;

#[async_trait]
impl Translator for IdentityTranslator {
    async fn translate(&self, text: &str) -> Result<Translation, TranslateError> {
        Ok(Translation {
            text: text.to_string(),
            detected_language: None,
        })
    }

    fn name(&self) -> &str {
        "none"
    }
}

pub fn from_config(config: &TranslationConfig) -> Result<Arc<dyn Translator>, TranslateError> {
    let translator: Arc<dyn Translator> = match config.provider {
        Provider::Google => Arc::new(GoogleTranslator::new(
            config.endpoint.clone(),
            config.target_language.clone(),
            config.timeout(),
        )?),
        Provider::None => Arc::new(IdentityTranslator),
    };
    Ok(translator)
}
