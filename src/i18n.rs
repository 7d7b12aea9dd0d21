use std::collections::HashMap;

use include_dir::{include_dir, Dir};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, error};

static LOCALE_DIR: Dir = include_dir!("src/locales");

pub const FALLBACK_LANGUAGE: &str = "en";

/// Every user-facing string, referenced by key. The variant name is the
/// lookup key in the catalog files.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum_macros::Display)]
pub enum MessageKey {
    Title,
    Subtitle,
    ProgressMessage,
    WordPrompt,
    Placeholder,
    TabHint,
    ValidationError,
    Correct,
    IncorrectSpelling,
    YourInput,
    CorrectLabel,
    Differences,
    PressEnterToContinue,
    WaitingForAudio,
    PracticeComplete,
    SessionCancelled,
    WordsPracticed,
    TotalAttempts,
    Accuracy,
    QuitHint,
}

#[derive(Debug, Error)]
enum I18nError {
    #[error("no catalog for language {0:?}")]
    UnknownLanguage(String),

    #[error("catalog {file} is not valid: {reason}")]
    Catalog { file: String, reason: String },
}

#[derive(Deserialize, Debug)]
struct Catalog {
    language: String,
    messages: HashMap<String, String>,
}

/// Looks up messages for one language, falling back to English and then to
/// the key itself.
#[derive(Debug, Clone)]
pub struct Localizer {
    language: String,
    messages: HashMap<String, String>,
    fallback: HashMap<String, String>,
}

impl Localizer {
    pub fn new(language: &str) -> Self {
        let fallback = load_catalog(FALLBACK_LANGUAGE)
            .map(|c| c.messages)
            .unwrap_or_else(|err| {
                error!(%err, "fallback catalog unavailable");
                HashMap::new()
            });

        let (language, messages) = match load_catalog(language) {
            Ok(catalog) => (catalog.language, catalog.messages),
            Err(err) => {
                debug!(%err, "using fallback language");
                (FALLBACK_LANGUAGE.to_string(), HashMap::new())
            }
        };

        Self {
            language,
            messages,
            fallback,
        }
    }

    /// Language actually in use after fallback.
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Translate `key`, substituting `{Name}` placeholders from `params`.
    pub fn translate(&self, key: MessageKey, params: &[(&str, String)]) -> String {
        let name = key.to_string();
        let template = self
            .messages
            .get(&name)
            .or_else(|| self.fallback.get(&name))
            .cloned()
            .unwrap_or(name);

        params
            .iter()
            .fold(template, |text, (param, value)| {
                text.replace(&format!("{{{param}}}"), value)
            })
    }

    /// Shorthand for messages without parameters.
    pub fn text(&self, key: MessageKey) -> String {
        self.translate(key, &[])
    }
}

impl Default for Localizer {
    fn default() -> Self {
        Self::new(FALLBACK_LANGUAGE)
    }
}

/// Language codes with a bundled catalog.
pub fn available_languages() -> Vec<String> {
    let mut langs: Vec<String> = LOCALE_DIR
        .files()
        .filter_map(|f| f.path().file_stem())
        .filter_map(|s| s.to_str())
        .map(str::to_string)
        .collect();
    langs.sort();
    langs
}

fn load_catalog(language: &str) -> Result<Catalog, I18nError> {
    let file_name = format!("{language}.json");
    let file = LOCALE_DIR
        .get_file(&file_name)
        .ok_or_else(|| I18nError::UnknownLanguage(language.to_string()))?;

    let contents = file.contents_utf8().ok_or_else(|| I18nError::Catalog {
        file: file_name.clone(),
        reason: "not UTF-8".to_string(),
    })?;

    serde_json::from_str(contents).map_err(|err| I18nError::Catalog {
        file: file_name,
        reason: err.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_KEYS: [MessageKey; 20] = [
        MessageKey::Title,
        MessageKey::Subtitle,
        MessageKey::ProgressMessage,
        MessageKey::WordPrompt,
        MessageKey::Placeholder,
        MessageKey::TabHint,
        MessageKey::ValidationError,
        MessageKey::Correct,
        MessageKey::IncorrectSpelling,
        MessageKey::YourInput,
        MessageKey::CorrectLabel,
        MessageKey::Differences,
        MessageKey::PressEnterToContinue,
        MessageKey::WaitingForAudio,
        MessageKey::PracticeComplete,
        MessageKey::SessionCancelled,
        MessageKey::WordsPracticed,
        MessageKey::TotalAttempts,
        MessageKey::Accuracy,
        MessageKey::QuitHint,
    ];

    #[test]
    fn test_bundled_languages() {
        assert_eq!(available_languages(), vec!["de", "en"]);
    }

    #[test]
    fn test_every_catalog_has_every_key() {
        for lang in available_languages() {
            let catalog = load_catalog(&lang).unwrap();
            assert_eq!(catalog.language, lang);
            for key in ALL_KEYS {
                assert!(
                    catalog.messages.contains_key(&key.to_string()),
                    "{lang} is missing {key}"
                );
            }
        }
    }

    #[test]
    fn test_translate_english() {
        let l10n = Localizer::new("en");
        assert_eq!(l10n.text(MessageKey::CorrectLabel), "Correct:");
        assert_eq!(
            l10n.translate(MessageKey::WordsPracticed, &[("Count", "3".into())]),
            "Words spelled correctly: 3"
        );
    }

    #[test]
    fn test_translate_german() {
        let l10n = Localizer::new("de");
        assert_eq!(l10n.language(), "de");
        assert_eq!(l10n.text(MessageKey::Differences), "Unterschiede:");
    }

    #[test]
    fn test_unknown_language_falls_back_to_english() {
        let l10n = Localizer::new("tlh");
        assert_eq!(l10n.language(), "en");
        assert_eq!(l10n.text(MessageKey::YourInput), "Your input:");
    }

    #[test]
    fn test_progress_message_parameters() {
        let l10n = Localizer::new("en");
        let text = l10n.translate(
            MessageKey::ProgressMessage,
            &[
                ("Current", "3".into()),
                ("Completed", "1".into()),
                ("Total", "2".into()),
                ("Words", "Haus".into()),
            ],
        );
        assert_eq!(text, "Word 3: 1 of 2 completed correctly Haus");
    }

    #[test]
    fn test_unused_placeholders_are_left_alone() {
        let l10n = Localizer::new("en");
        let text = l10n.translate(MessageKey::WordsPracticed, &[("Other", "x".into())]);
        assert_eq!(text, "Words spelled correctly: {Count}");
    }

    #[test]
    fn test_missing_key_falls_back() {
        let l10n = Localizer {
            language: "de".into(),
            messages: HashMap::new(),
            fallback: HashMap::from([("Title".to_string(), "Dictation Practice".to_string())]),
        };
        assert_eq!(l10n.text(MessageKey::Title), "Dictation Practice");
        assert_eq!(l10n.text(MessageKey::QuitHint), "QuitHint");
    }
}
