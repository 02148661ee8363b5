use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::registry::DEFAULT_CANDIDATES;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub letterhead: LetterheadConfig,
    pub registry: RegistryConfig,
    pub output: OutputConfig,
}

/// Fixed text and styling of reply letters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LetterheadConfig {
    pub heading: String,
    pub institution: String,
    pub department: String,
    pub font_family: String,
    pub font_size: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Explicit customer list; when absent, `candidates` are searched for
    pub path: Option<PathBuf>,
    pub candidates: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub dir: PathBuf,
}

impl Default for LetterheadConfig {
    fn default() -> Self {
        Self {
            heading: "T.C.".to_string(),
            institution: "AYTEMİZ YATIRIM BANKASI A.Ş.".to_string(),
            department: "Genel Müdürlük".to_string(),
            font_family: "Times New Roman".to_string(),
            font_size: 12,
        }
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            path: None,
            candidates: DEFAULT_CANDIDATES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
        }
    }
}

impl AppConfig {
    /// Load from `TBB_*` environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset or blank keys keep their defaults
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = AppConfig::default();

        Self {
            letterhead: LetterheadConfig {
                heading: get("TBB_HEADING").unwrap_or(defaults.letterhead.heading),
                institution: get("TBB_INSTITUTION").unwrap_or(defaults.letterhead.institution),
                department: get("TBB_DEPARTMENT").unwrap_or(defaults.letterhead.department),
                ..defaults.letterhead
            },
            registry: RegistryConfig {
                path: get("TBB_REGISTRY").map(PathBuf::from),
                ..defaults.registry
            },
            output: OutputConfig {
                dir: get("TBB_OUTPUT_DIR")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.output.dir),
            },
        }
    }
}
