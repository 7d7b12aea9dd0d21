use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

use crate::session::MatchPolicy;
use crate::word::{Word, WordList};

pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";
pub const DEFAULT_LANGUAGE: &str = "en";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse YAML in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("no words found in config file {}", path.display())]
    NoWords { path: PathBuf },
}

/// On-disk shape of the word list file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub case_sensitive: Option<bool>,
    #[serde(default)]
    pub words: Vec<String>,
}

impl Config {
    pub fn language(&self) -> &str {
        match self.language.as_deref().map(str::trim) {
            Some(lang) if !lang.is_empty() => lang,
            _ => DEFAULT_LANGUAGE,
        }
    }

    pub fn match_policy(&self) -> MatchPolicy {
        match self.case_sensitive {
            Some(false) => MatchPolicy::CaseInsensitive,
            _ => MatchPolicy::CaseSensitive,
        }
    }
}

/// A loaded practice set: the words plus how answers are judged.
#[derive(Debug, Clone)]
pub struct PracticeSet {
    pub words: WordList,
    pub policy: MatchPolicy,
}

pub trait WordSource {
    fn load(&self) -> Result<PracticeSet, ConfigError>;
}

#[derive(Debug, Clone)]
pub struct YamlWordSource {
    path: PathBuf,
}

impl YamlWordSource {
    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_config(&self) -> Result<Config, ConfigError> {
        let bytes = fs::read(&self.path).map_err(|source| ConfigError::Read {
            path: self.path.clone(),
            source,
        })?;

        // an empty file is an empty mapping, which then fails the word check
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Config::default());
        }

        serde_yaml::from_slice(&bytes).map_err(|source| ConfigError::Parse {
            path: self.path.clone(),
            source,
        })
    }
}

impl Default for YamlWordSource {
    fn default() -> Self {
        Self::with_path(DEFAULT_CONFIG_PATH)
    }
}

impl WordSource for YamlWordSource {
    fn load(&self) -> Result<PracticeSet, ConfigError> {
        let cfg = self.read_config()?;

        let mut words = Vec::with_capacity(cfg.words.len());
        for (idx, raw) in cfg.words.iter().enumerate() {
            match Word::new(raw) {
                Some(word) => words.push(word),
                None => warn!(index = idx, "skipping blank word in config"),
            }
        }

        let list = WordList::new(words, cfg.language()).ok_or_else(|| ConfigError::NoWords {
            path: self.path.clone(),
        })?;

        info!(
            path = %self.path.display(),
            words = list.len(),
            language = list.language(),
            "word list loaded"
        );

        Ok(PracticeSet {
            words: list,
            policy: cfg.match_policy(),
        })
    }
}
