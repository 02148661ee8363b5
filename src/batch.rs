// 📦 Batch Coordinator - many letters → case records → report
//
// Each letter is processed on its own: a letter that cannot be read becomes a
// failed record and the run moves on. Processing order only decides row order.

use std::path::Path;

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::composer::{ResponseComposer, ResponseDocument};
use crate::decode::TextDecoder;
use crate::errors::DecodeError;
use crate::extractor::FieldExtractor;
use crate::registry::CustomerRegistry;
use crate::resolver::{CaseRecord, CaseResolver, CustomerStatus};

// ============================================================================
// LETTER INPUT
// ============================================================================

/// One incoming letter: its file name and decoded text (or why decoding failed)
#[derive(Debug, Clone)]
pub struct Letter {
    pub name: String,
    pub content: Result<String, DecodeError>,
}

impl Letter {
    pub fn text(name: &str, text: &str) -> Self {
        Letter {
            name: name.to_string(),
            content: Ok(text.to_string()),
        }
    }

    pub fn failed(name: &str, error: DecodeError) -> Self {
        Letter {
            name: name.to_string(),
            content: Err(error),
        }
    }

    /// Decode a letter file; failures are kept on the letter, not returned
    pub fn from_path(path: &Path, decoder: &dyn TextDecoder) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        Letter {
            name,
            content: decoder.decode(path),
        }
    }
}

impl From<(String, String)> for Letter {
    fn from((name, text): (String, String)) -> Self {
        Letter {
            name,
            content: Ok(text),
        }
    }
}

// ============================================================================
// ACTION
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Customer, unknown status, or unreadable letter
    ManualReview,
    /// Confirmed non-customer: the standard reply is sent
    AutomaticReply,
}

impl Action {
    pub fn for_record(record: &CaseRecord) -> Self {
        if record.status == CustomerStatus::NotCustomer && !record.is_failed() {
            Action::AutomaticReply
        } else {
            Action::ManualReview
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Action::ManualReview => "Manuel işlem gerekli",
            Action::AutomaticReply => "Otomatik yanıt oluşturuldu",
        }
    }
}

// ============================================================================
// BATCH REPORT
// ============================================================================

/// Report column headers in export order; matches the `ReportRow` field renames
pub const REPORT_COLUMNS: [&str; 9] = [
    "Dosya",
    "Muhatap Kurum",
    "Tarih",
    "Sayı",
    "TCKN",
    "VKN",
    "Ad Soyad",
    "Müşteri mi?",
    "Aksiyon",
];

/// One report row per processed letter, in the export column order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRow {
    #[serde(rename = "Dosya")]
    pub file_name: String,

    #[serde(rename = "Muhatap Kurum")]
    pub authority: String,

    #[serde(rename = "Tarih")]
    pub letter_date: String,

    #[serde(rename = "Sayı")]
    pub reference_number: String,

    #[serde(rename = "TCKN")]
    pub national_id: String,

    #[serde(rename = "VKN")]
    pub tax_id: String,

    #[serde(rename = "Ad Soyad")]
    pub person_name: String,

    #[serde(rename = "Müşteri mi?")]
    pub customer_status: String,

    #[serde(rename = "Aksiyon")]
    pub action: String,
}

impl ReportRow {
    pub fn from_record(record: &CaseRecord) -> Self {
        let f = &record.fields;
        let customer_status = if record.is_failed() {
            "Hata"
        } else {
            record.status.label()
        };

        ReportRow {
            file_name: record.source_file_name.clone(),
            authority: f.issuing_authority.clone(),
            letter_date: f.letter_date.clone(),
            reference_number: f.reference_number.clone(),
            national_id: f.national_id.clone(),
            tax_id: f.tax_id.clone(),
            person_name: f.person_name.clone(),
            customer_status: customer_status.to_string(),
            action: Action::for_record(record).label().to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReport {
    pub rows: Vec<ReportRow>,
}

impl BatchReport {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

pub fn build_report(records: &[CaseRecord]) -> BatchReport {
    BatchReport {
        rows: records.iter().map(ReportRow::from_record).collect(),
    }
}

// ============================================================================
// BATCH SUMMARY
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Every letter in the run, failed ones included
    pub total: usize,
    pub customer_count: usize,
    pub non_customer_count: usize,
    pub unknown_count: usize,
    pub failed_count: usize,
}

impl BatchSummary {
    pub fn from_records(records: &[CaseRecord]) -> Self {
        let mut summary = BatchSummary {
            total: records.len(),
            ..Default::default()
        };

        for record in records {
            if record.is_failed() {
                summary.failed_count += 1;
                continue;
            }
            match record.status {
                CustomerStatus::Customer => summary.customer_count += 1,
                CustomerStatus::NotCustomer => summary.non_customer_count += 1,
                CustomerStatus::Unknown => summary.unknown_count += 1,
            }
        }
        summary
    }

    pub fn summary(&self) -> String {
        format!(
            "Toplam: {} | Müşteri: {} | Değil: {} | Bilinmiyor: {} | Hata: {}",
            self.total,
            self.customer_count,
            self.non_customer_count,
            self.unknown_count,
            self.failed_count
        )
    }
}

// ============================================================================
// COMPOSED REPLY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub case: CaseRecord,
    pub document: ResponseDocument,
}

// ============================================================================
// BATCH COORDINATOR
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct BatchCoordinator {
    extractor: FieldExtractor,
    composer: ResponseComposer,
}

impl BatchCoordinator {
    pub fn new(extractor: FieldExtractor, composer: ResponseComposer) -> Self {
        BatchCoordinator {
            extractor,
            composer,
        }
    }

    /// Process one letter against an optional customer list
    pub fn process(&self, letter: &Letter, registry: Option<&CustomerRegistry>) -> CaseRecord {
        match &letter.content {
            Ok(text) => {
                let fields = self.extractor.extract(text);
                CaseResolver::new(registry).resolve(&letter.name, fields)
            }
            Err(e) => {
                warn!(file = %letter.name, error = %e, "letter could not be read, recorded as failed");
                CaseRecord::failed(&letter.name, &e.marker())
            }
        }
    }

    /// Process every letter; one record per letter, in input order
    pub fn run<I>(&self, letters: I, registry: Option<&CustomerRegistry>) -> Vec<CaseRecord>
    where
        I: IntoIterator<Item = Letter>,
    {
        let records: Vec<CaseRecord> = letters
            .into_iter()
            .map(|letter| self.process(&letter, registry))
            .collect();

        info!(
            summary = %BatchSummary::from_records(&records).summary(),
            registry_loaded = registry.is_some(),
            "batch analysed"
        );
        records
    }

    /// Compose replies for confirmed non-customers only
    pub fn compose_replies(&self, records: &[CaseRecord]) -> Vec<Reply> {
        self.compose_replies_on(records, Local::now().date_naive())
    }

    pub fn compose_replies_on(&self, records: &[CaseRecord], today: NaiveDate) -> Vec<Reply> {
        records
            .iter()
            .filter(|r| Action::for_record(r) == Action::AutomaticReply)
            .map(|r| Reply {
                case: r.clone(),
                document: self.composer.compose_on(r, today),
            })
            .collect()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const KNOWN: &str = "Vergi Dairesi Müdürlüğü\nSayı: E-2024-1111111-222\n\
                         10.02.2024\nT.C. Kimlik No: 12345678901.\n";
    const STRANGER: &str = "İstanbul Cumhuriyet Başsavcılığı\n11.02.2024\n\
                            Mehmet Demir adlı şahıs, VKN 5555555555\n";

    fn registry() -> CustomerRegistry {
        CustomerRegistry::from_reader("tckn,vkn,ad\n12345678901,,Ahmet Yılmaz\n".as_bytes()).unwrap()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    fn letters() -> Vec<Letter> {
        vec![
            Letter::text("bilinen.txt", KNOWN),
            Letter::failed(
                "bozuk.pdf",
                DecodeError::UnsupportedFormat {
                    extension: ".pdf".to_string(),
                },
            ),
            Letter::text("yabanci.txt", STRANGER),
        ]
    }

    #[test]
    fn test_run_keeps_order_and_isolates_failures() {
        let reg = registry();
        let records = BatchCoordinator::default().run(letters(), Some(&reg));

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].source_file_name, "bilinen.txt");
        assert_eq!(records[0].status, CustomerStatus::Customer);
        assert_eq!(records[0].fields.person_name, "Ahmet Yılmaz");

        assert!(records[1].is_failed());
        assert_eq!(records[1].error.as_deref(), Some("[Desteklenmeyen format: .pdf]"));

        assert_eq!(records[2].status, CustomerStatus::NotCustomer);
        assert_eq!(records[2].fields.person_name, "Mehmet Demir");
        assert_eq!(records[2].fields.tax_id, "5555555555");
    }

    #[test]
    fn test_failed_letter_does_not_affect_others() {
        let reg = registry();
        let coordinator = BatchCoordinator::default();

        let with_failure = coordinator.run(letters(), Some(&reg));
        let without_failure = coordinator.run(
            letters().into_iter().filter(|l| l.content.is_ok()),
            Some(&reg),
        );

        assert_eq!(with_failure[0], without_failure[0]);
        assert_eq!(with_failure[2], without_failure[1]);
    }

    #[test]
    fn test_summary_counts() {
        let reg = registry();
        let records = BatchCoordinator::default().run(letters(), Some(&reg));
        let summary = BatchSummary::from_records(&records);

        assert_eq!(summary.total, 3);
        assert_eq!(summary.customer_count, 1);
        assert_eq!(summary.non_customer_count, 1);
        assert_eq!(summary.failed_count, 1);
        assert_eq!(summary.unknown_count, 0);
        assert_eq!(
            summary.summary(),
            "Toplam: 3 | Müşteri: 1 | Değil: 1 | Bilinmiyor: 0 | Hata: 1"
        );
    }

    #[test]
    fn test_report_actions() {
        let reg = registry();
        let records = BatchCoordinator::default().run(letters(), Some(&reg));
        let report = build_report(&records);

        assert_eq!(report.len(), 3);
        assert_eq!(report.rows[0].action, "Manuel işlem gerekli");
        assert_eq!(report.rows[0].customer_status, "Evet");
        assert_eq!(report.rows[1].customer_status, "Hata");
        assert_eq!(report.rows[1].action, "Manuel işlem gerekli");
        assert_eq!(report.rows[2].action, "Otomatik yanıt oluşturuldu");
        assert_eq!(report.rows[2].authority, "İstanbul Cumhuriyet Başsavcılığı");
    }

    #[test]
    fn test_unknown_status_needs_manual_review() {
        let records = BatchCoordinator::default().run(letters(), None);

        assert!(records.iter().all(|r| r.status == CustomerStatus::Unknown));
        assert!(build_report(&records)
            .rows
            .iter()
            .all(|row| row.action == "Manuel işlem gerekli"));
        assert_eq!(BatchSummary::from_records(&records).unknown_count, 2);
    }

    #[test]
    fn test_replies_only_for_non_customers() {
        let reg = registry();
        let coordinator = BatchCoordinator::default();
        let records = coordinator.run(letters(), Some(&reg));

        let replies = coordinator.compose_replies_on(&records, today());
        assert_eq!(replies.len(), 1);
        assert_eq!(replies[0].case.source_file_name, "yabanci.txt");
        assert!(replies[0]
            .document
            .to_plain_text()
            .contains("5555555555 Vergi Kimlik Numaralı Mehmet Demir'ın Bankamız müşterisi olmadığı"));
    }

    #[test]
    fn test_letter_from_path_keeps_decode_failure() {
        let letter = Letter::from_path(&PathBuf::from("/yok/yazi.xlsx"), &crate::decode::FileDecoder::new());

        assert_eq!(letter.name, "yazi.xlsx");
        assert!(letter.content.is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_letter_from_path_non_utf8_name() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let path = Path::new("/yok").join(OsStr::from_bytes(b"yaz\xfd.txt"));
        let letter = Letter::from_path(&path, &crate::decode::FileDecoder::new());

        assert_eq!(letter.name, "yaz\u{FFFD}.txt");
        assert!(letter.content.is_err());
    }

    #[test]
    fn test_letter_from_tuple() {
        let letter = Letter::from(("a.txt".to_string(), "metin".to_string()));
        assert_eq!(letter.content.unwrap(), "metin");
    }
}
