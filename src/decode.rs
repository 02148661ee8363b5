// 📂 Letter Decoding - file → plain text
//
// Decoding is a collaborator behind a trait: the extraction core only ever
// sees text or a decode failure.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::errors::DecodeError;

/// Extensions accepted as letter files
pub const LETTER_EXTENSIONS: &[&str] = &["docx", "pdf", "txt"];

// ============================================================================
// LETTER FORMAT
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LetterFormat {
    Docx,
    Pdf,
    Text,
}

impl LetterFormat {
    /// Detect format from the file extension (case-insensitive)
    pub fn detect(path: &Path) -> Result<Self, DecodeError> {
        let ext = extension_of(path);
        match ext.as_str() {
            "docx" => Ok(LetterFormat::Docx),
            "pdf" => Ok(LetterFormat::Pdf),
            "txt" => Ok(LetterFormat::Text),
            _ => Err(DecodeError::UnsupportedFormat {
                extension: format!(".{}", ext),
            }),
        }
    }

    /// Whether the default `FileDecoder` can read this format
    pub fn is_decodable(&self) -> bool {
        matches!(self, LetterFormat::Text)
    }
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default()
}

// ============================================================================
// DECODER TRAIT
// ============================================================================

/// TextDecoder - turns a letter file into plain text
pub trait TextDecoder {
    fn decode(&self, path: &Path) -> Result<String, DecodeError>;

    /// Decode, or return the failure marker in place of the text
    fn decode_or_marker(&self, path: &Path) -> String {
        self.decode(path).unwrap_or_else(|e| e.marker())
    }
}

/// Default decoder: plain-text letters.
///
/// Word and PDF letters are recognised but need an external text extractor,
/// so they decode to `UnsupportedFormat`.
#[derive(Debug, Clone, Default)]
pub struct FileDecoder;

impl FileDecoder {
    pub fn new() -> Self {
        FileDecoder
    }

    fn read_text(path: &Path) -> Result<String, DecodeError> {
        let bytes = fs::read(path).map_err(|e| DecodeError::Unreadable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

impl TextDecoder for FileDecoder {
    fn decode(&self, path: &Path) -> Result<String, DecodeError> {
        let text = match LetterFormat::detect(path)? {
            LetterFormat::Text => Self::read_text(path)?,
            LetterFormat::Docx | LetterFormat::Pdf => {
                return Err(DecodeError::UnsupportedFormat {
                    extension: format!(".{}", extension_of(path)),
                })
            }
        };

        if text.trim().is_empty() {
            return Err(DecodeError::Empty {
                path: path.to_path_buf(),
            });
        }
        Ok(text)
    }
}

// ============================================================================
// FOLDER ENUMERATION
// ============================================================================

pub fn is_letter_file(path: &Path) -> bool {
    path.is_file() && LETTER_EXTENSIONS.contains(&extension_of(path).as_str())
}

/// Letter files directly inside `dir`, sorted by file name
pub fn collect_letters(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("Failed to read folder: {}", dir.display()))?;

    let mut letters = Vec::new();
    for entry in entries {
        let path = entry
            .with_context(|| format!("Failed to list folder: {}", dir.display()))?
            .path();
        if is_letter_file(&path) {
            letters.push(path);
        }
    }

    letters.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(letters)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_format() {
        assert_eq!(LetterFormat::detect(Path::new("a.TXT")).unwrap(), LetterFormat::Text);
        assert_eq!(LetterFormat::detect(Path::new("a.docx")).unwrap(), LetterFormat::Docx);
        assert_eq!(
            LetterFormat::detect(Path::new("a.xls")),
            Err(DecodeError::UnsupportedFormat {
                extension: ".xls".to_string()
            })
        );
    }

    #[test]
    fn test_only_text_is_decodable() {
        assert!(LetterFormat::Text.is_decodable());
        assert!(!LetterFormat::Docx.is_decodable());
        assert!(!LetterFormat::Pdf.is_decodable());
    }

    #[test]
    fn test_decode_text_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("yazi.txt");
        fs::write(&path, "VERGİ DAİRESİ MÜDÜRLÜĞÜ\n").unwrap();

        let text = FileDecoder::new().decode(&path).unwrap();
        assert_eq!(text, "VERGİ DAİRESİ MÜDÜRLÜĞÜ\n");
    }

    #[test]
    fn test_decode_invalid_utf8_is_lossy() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("yazi.txt");
        fs::write(&path, b"Tarih \xff 05.01.2024").unwrap();

        let text = FileDecoder::new().decode(&path).unwrap();
        assert!(text.contains("05.01.2024"));
    }

    #[test]
    fn test_decode_failures_give_markers() {
        let dir = tempfile::tempdir().unwrap();
        let decoder = FileDecoder::new();

        let empty = dir.path().join("bos.txt");
        fs::write(&empty, "   \n").unwrap();
        assert_eq!(decoder.decode_or_marker(&empty), "[Dosyadan metin çıkarılamadı]");

        let pdf = dir.path().join("yazi.pdf");
        fs::write(&pdf, "%PDF-1.4").unwrap();
        assert_eq!(decoder.decode_or_marker(&pdf), "[Desteklenmeyen format: .pdf]");

        let missing = dir.path().join("yok.txt");
        assert!(decoder.decode_or_marker(&missing).starts_with("[Dosya okuma hatası:"));
    }

    #[test]
    fn test_collect_letters_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.txt", "a.pdf", "c.xlsx", "d.DOCX"] {
            fs::write(dir.path().join(name), "x").unwrap();
        }
        fs::create_dir(dir.path().join("alt.txt")).unwrap();

        let names: Vec<String> = collect_letters(dir.path())
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();

        assert_eq!(names, vec!["a.pdf", "b.txt", "d.DOCX"]);
    }
}
