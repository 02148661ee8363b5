// ⚠️ Error taxonomy - decode, registry and export failures
//
// Extraction never fails: a field that cannot be found is simply empty.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A letter file that could not be turned into text.
///
/// The `Display` form is the bracketed marker shown in place of the letter
/// text, so a failed letter stays visible in batch output.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("[Desteklenmeyen format: {extension}]")]
    UnsupportedFormat { extension: String },

    #[error("[Dosya okuma hatası: {reason}]")]
    Unreadable { path: PathBuf, reason: String },

    #[error("[Dosyadan metin çıkarılamadı]")]
    Empty { path: PathBuf },
}

impl DecodeError {
    /// Marker text for this failure
    pub fn marker(&self) -> String {
        self.to_string()
    }
}

/// Customer list could not be loaded. The previously active registry stays in place.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("failed to read customer list {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed customer list: {0}")]
    Csv(#[from] csv::Error),

    #[error("customer list has no columns")]
    NoColumns,

    #[error("unsupported customer list format: {0}")]
    UnsupportedFormat(String),
}

/// Writing a reply document or batch report failed.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("TCKN veya VKN bilgisi gerekli")]
    MissingIdentifier,

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("failed to write report: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to serialize reply: {0}")]
    Json(#[from] serde_json::Error),
}
