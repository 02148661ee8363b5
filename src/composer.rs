// 📝 Response Composer - standard reply letter from a resolved case
//
// The reply follows the official correspondence layout: heading, addressed
// authorities, date, reference to the incoming letter, body, closing and
// signature block. Wording of the body depends on customer status.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::config::LetterheadConfig;
use crate::resolver::{CaseRecord, CustomerStatus};
use crate::text::to_turkish_uppercase;

pub const DATE_FORMAT: &str = "%d.%m.%Y";

const NATIONAL_ID_LABEL: &str = "T.C. Kimlik Numaralı";
const TAX_ID_LABEL: &str = "Vergi Kimlik Numaralı";
const BODY_OPENING: &str =
    "İlgi'de kayıtlı yazınıza istinaden Bankamız nezdinde gerekli araştırma yapılmış olup,";
const CLOSING: &str = "Bilgilerinize arz ederiz.";
const SALUTATION: &str = "Saygılarımızla,";

// ============================================================================
// DOCUMENT MODEL
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Alignment {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paragraph {
    pub text: String,
    pub alignment: Alignment,
    pub bold: bool,
}

impl Paragraph {
    pub fn plain(text: &str) -> Self {
        Paragraph {
            text: text.to_string(),
            alignment: Alignment::Left,
            bold: false,
        }
    }

    pub fn blank() -> Self {
        Self::plain("")
    }

    pub fn heading(text: &str) -> Self {
        Paragraph {
            text: text.to_string(),
            alignment: Alignment::Center,
            bold: true,
        }
    }

    pub fn right(text: &str) -> Self {
        Paragraph {
            text: text.to_string(),
            alignment: Alignment::Right,
            bold: false,
        }
    }
}

/// Ordered, styled paragraphs of a reply letter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseDocument {
    pub font_family: String,
    pub font_size: u32,
    pub paragraphs: Vec<Paragraph>,
}

impl ResponseDocument {
    /// Preview text, one line per paragraph
    pub fn to_plain_text(&self) -> String {
        self.paragraphs
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

// ============================================================================
// RESPONSE COMPOSER
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct ResponseComposer {
    letterhead: LetterheadConfig,
}

impl ResponseComposer {
    pub fn new(letterhead: LetterheadConfig) -> Self {
        ResponseComposer { letterhead }
    }

    /// Compose using today's local date when the letter has none
    pub fn compose(&self, case: &CaseRecord) -> ResponseDocument {
        self.compose_on(case, Local::now().date_naive())
    }

    /// Compose with an explicit fallback date. Pure: equal inputs give equal documents.
    pub fn compose_on(&self, case: &CaseRecord, today: NaiveDate) -> ResponseDocument {
        let fields = &case.fields;
        let lh = &self.letterhead;
        let mut paragraphs = Vec::new();

        paragraphs.push(Paragraph::heading(&lh.heading));
        for line in fields.authority_lines() {
            paragraphs.push(Paragraph::heading(&to_turkish_uppercase(line)));
        }

        let date_line = if fields.letter_date.is_empty() {
            today.format(DATE_FORMAT).to_string()
        } else {
            fields.letter_date.clone()
        };
        paragraphs.push(Paragraph::right(&date_line));

        paragraphs.push(Paragraph::blank());
        paragraphs.push(Paragraph::plain(&reference_line(
            &fields.letter_date,
            &fields.reference_number,
        )));

        paragraphs.push(Paragraph::blank());
        paragraphs.push(Paragraph::plain(&body_text(case)));

        paragraphs.push(Paragraph::blank());
        paragraphs.push(Paragraph::plain(CLOSING));
        paragraphs.push(Paragraph::blank());
        paragraphs.push(Paragraph::plain(SALUTATION));
        paragraphs.push(Paragraph::blank());
        paragraphs.push(Paragraph::heading(&lh.institution));
        paragraphs.push(Paragraph::heading(&lh.department));

        ResponseDocument {
            font_family: lh.font_family.clone(),
            font_size: lh.font_size,
            paragraphs,
        }
    }
}

/// "İlgi: {date} tarihli ve {number} sayılı yazınız."
pub fn reference_line(letter_date: &str, reference_number: &str) -> String {
    format!(
        "İlgi: {} tarihli ve {} sayılı yazınız.",
        letter_date, reference_number
    )
}

/// Body paragraph. National id wins over tax id; an empty identifier still renders.
pub fn body_text(case: &CaseRecord) -> String {
    let fields = &case.fields;
    let (identifier, label) = if fields.national_id.is_empty() {
        (fields.tax_id.as_str(), TAX_ID_LABEL)
    } else {
        (fields.national_id.as_str(), NATIONAL_ID_LABEL)
    };

    let mut text = format!("{} {} {}", BODY_OPENING, identifier, label);
    let name = fields.person_name.as_str();

    match case.status {
        CustomerStatus::NotCustomer => {
            if !name.is_empty() {
                text.push_str(&format!(" {}'ın", name));
            }
            text.push_str(" Bankamız müşterisi olmadığı tespit edilmiştir.");
        }
        CustomerStatus::Customer | CustomerStatus::Unknown => {
            if !name.is_empty() {
                text.push_str(&format!(" {}", name));
            }
            text.push_str(" ile ilgili gerekli işlemler yapılmaktadır.");
        }
    }

    text
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::ExtractedFields;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    fn case(status: CustomerStatus, name: &str) -> CaseRecord {
        let fields = ExtractedFields {
            issuing_authority: "Ankara Valiliği".to_string(),
            issuing_sub_unit1: "İl Emniyet Müdürlüğü".to_string(),
            letter_date: "12.03.2024".to_string(),
            reference_number: "E-2024-1234567-890123".to_string(),
            national_id: "12345678901".to_string(),
            person_name: name.to_string(),
            ..Default::default()
        };
        CaseRecord::new("yazi.txt", fields, status)
    }

    #[test]
    fn test_paragraph_layout() {
        let doc = ResponseComposer::default().compose_on(&case(CustomerStatus::Unknown, ""), today());
        let texts: Vec<&str> = doc.paragraphs.iter().map(|p| p.text.as_str()).collect();

        assert_eq!(texts[0], "T.C.");
        assert_eq!(texts[1], "ANKARA VALİLİĞİ");
        assert_eq!(texts[2], "İL EMNİYET MÜDÜRLÜĞÜ");
        assert_eq!(texts[3], "12.03.2024");
        assert_eq!(texts[5], "İlgi: 12.03.2024 tarihli ve E-2024-1234567-890123 sayılı yazınız.");
        assert_eq!(texts[9], "Bilgilerinize arz ederiz.");
        assert_eq!(texts[11], "Saygılarımızla,");
        assert_eq!(texts[13], "AYTEMİZ YATIRIM BANKASI A.Ş.");
        assert_eq!(texts[14], "Genel Müdürlük");
        assert_eq!(texts.len(), 15);

        assert_eq!(doc.paragraphs[0].alignment, Alignment::Center);
        assert!(doc.paragraphs[1].bold);
        assert_eq!(doc.paragraphs[3].alignment, Alignment::Right);
        assert!(!doc.paragraphs[7].bold);
        assert!(doc.paragraphs[14].bold);
        assert_eq!(doc.font_family, "Times New Roman");
        assert_eq!(doc.font_size, 12);
    }

    #[test]
    fn test_not_customer_body_with_name() {
        let text = body_text(&case(CustomerStatus::NotCustomer, "Ahmet Yılmaz"));
        assert_eq!(
            text,
            "İlgi'de kayıtlı yazınıza istinaden Bankamız nezdinde gerekli araştırma yapılmış olup, \
             12345678901 T.C. Kimlik Numaralı Ahmet Yılmaz'ın Bankamız müşterisi olmadığı tespit edilmiştir."
        );
    }

    #[test]
    fn test_customer_body_with_name() {
        let text = body_text(&case(CustomerStatus::Customer, "Ahmet Yılmaz"));
        assert!(text.ends_with("12345678901 T.C. Kimlik Numaralı Ahmet Yılmaz ile ilgili gerekli işlemler yapılmaktadır."));
    }

    #[test]
    fn test_unknown_body_without_name() {
        let text = body_text(&case(CustomerStatus::Unknown, ""));
        assert!(text.ends_with("12345678901 T.C. Kimlik Numaralı ile ilgili gerekli işlemler yapılmaktadır."));
    }

    #[test]
    fn test_tax_id_label_when_no_national_id() {
        let mut record = case(CustomerStatus::NotCustomer, "");
        record.fields.national_id.clear();
        record.fields.tax_id = "1234567890".to_string();

        let text = body_text(&record);
        assert!(text.ends_with("1234567890 Vergi Kimlik Numaralı Bankamız müşterisi olmadığı tespit edilmiştir."));
    }

    #[test]
    fn test_missing_date_uses_today() {
        let mut record = case(CustomerStatus::Unknown, "");
        record.fields.letter_date.clear();
        record.fields.issuing_authority.clear();
        record.fields.issuing_sub_unit1.clear();

        let doc = ResponseComposer::default().compose_on(&record, today());
        assert_eq!(doc.paragraphs[1].text, "15.03.2024");
        assert_eq!(doc.paragraphs[1].alignment, Alignment::Right);
        assert_eq!(doc.paragraphs[3].text, "İlgi:  tarihli ve E-2024-1234567-890123 sayılı yazınız.");
    }

    #[test]
    fn test_compose_is_deterministic() {
        let composer = ResponseComposer::default();
        let record = case(CustomerStatus::NotCustomer, "Ahmet Yılmaz");

        let a = composer.compose_on(&record, today());
        let b = composer.compose_on(&record.clone(), today());
        assert_eq!(a, b);
        assert_eq!(a.to_plain_text(), b.to_plain_text());
    }

    #[test]
    fn test_custom_letterhead() {
        let letterhead = LetterheadConfig {
            institution: "ÖRNEK BANK A.Ş.".to_string(),
            department: "Hukuk Müşavirliği".to_string(),
            ..Default::default()
        };
        let doc = ResponseComposer::new(letterhead).compose_on(&case(CustomerStatus::Unknown, ""), today());
        let plain = doc.to_plain_text();

        assert!(plain.ends_with("ÖRNEK BANK A.Ş.\nHukuk Müşavirliği"));
        assert!(plain.starts_with("T.C.\nANKARA VALİLİĞİ\n"));
    }
}
