// 🔎 Field Extractor - heuristic parsing of official letters
//
// Official letters follow a fixed heading convention: the addressed
// institutions sit in the first lines, the date and reference number follow,
// and the person is identified by a national or tax id somewhere in the body.
// Each field has its own rule; a field that no rule finds stays empty.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::rules::{Capture, PatternRule, RuleEngine};
use crate::text::contains_any_folded;

/// Institutional suffixes that mark a line as an addressed authority.
pub const AUTHORITY_KEYWORDS: &[&str] = &[
    "başkanlığı",
    "müdürlüğü",
    "dairesi",
    "komutanlığı",
    "savcılığı",
    "mahkemesi",
    "kaymakamlığı",
    "valiliği",
    "defterdarlığı",
    "bakanlığı",
    "kurumu",
    "idaresi",
];

/// Only this many leading lines are scanned for authority lines.
pub const HEADER_LINES: usize = 15;

/// Reference numbers must be longer than this many characters.
pub const MIN_REFERENCE_LEN: usize = 5;

const NATIONAL_ID_LEN: usize = 11;
const TAX_ID_LEN: usize = 10;

static DATE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{2}[./]\d{2}[./]\d{4})").expect("valid date pattern"));

static NATIONAL_ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{11})\b").expect("valid national id pattern"));

static TAX_ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{10})\b").expect("valid tax id pattern"));

/// "Ahmet Yılmaz adlı", "Ahmet Yılmaz isimli", "Ahmet Yılmaz'ın"
static REFERRED_NAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"([A-ZÇĞİÖŞÜ][a-zçğıöşü]+\s+[A-ZÇĞİÖŞÜ][A-Za-zçğıöşü]+)(?:\s+adlı|\s+isimli|'[ıiuü]n)",
    )
    .expect("valid referred name pattern")
});

// ============================================================================
// EXTRACTED FIELDS
// ============================================================================

/// Structured fields recovered from one letter. Absent fields are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedFields {
    pub issuing_authority: String,
    pub issuing_sub_unit1: String,
    pub issuing_sub_unit2: String,
    /// `DD.MM.YYYY` or empty
    pub letter_date: String,
    pub reference_number: String,
    /// Exactly 11 digits or empty
    pub national_id: String,
    /// Exactly 10 digits or empty
    pub tax_id: String,
    pub person_name: String,
}

/// The identifier that drives customer resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Identifier<'a> {
    National(&'a str),
    Tax(&'a str),
}

impl<'a> Identifier<'a> {
    pub fn value(&self) -> &'a str {
        match *self {
            Identifier::National(v) | Identifier::Tax(v) => v,
        }
    }
}

impl ExtractedFields {
    /// National id when present, otherwise tax id; `None` when both are empty.
    pub fn identifier(&self) -> Option<Identifier<'_>> {
        if !self.national_id.is_empty() {
            Some(Identifier::National(&self.national_id))
        } else if !self.tax_id.is_empty() {
            Some(Identifier::Tax(&self.tax_id))
        } else {
            None
        }
    }

    /// Authority lines in heading order, skipping empty ones
    pub fn authority_lines(&self) -> impl Iterator<Item = &str> {
        [
            self.issuing_authority.as_str(),
            self.issuing_sub_unit1.as_str(),
            self.issuing_sub_unit2.as_str(),
        ]
        .into_iter()
        .filter(|line| !line.is_empty())
    }
}

// ============================================================================
// FIELD EXTRACTOR
// ============================================================================

#[derive(Debug, Clone)]
pub struct FieldExtractor {
    authority_keywords: Vec<String>,
    header_lines: usize,
    reference_rules: RuleEngine,
}

impl FieldExtractor {
    pub fn new() -> Self {
        FieldExtractor {
            authority_keywords: AUTHORITY_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            header_lines: HEADER_LINES,
            reference_rules: REFERENCE_RULES.clone(),
        }
    }

    /// Extract every field. Never fails; unmatched fields stay empty.
    pub fn extract(&self, text: &str) -> ExtractedFields {
        let mut fields = ExtractedFields::default();

        let mut authorities = self.authority_lines(text).into_iter();
        fields.issuing_authority = authorities.next().unwrap_or_default();
        fields.issuing_sub_unit1 = authorities.next().unwrap_or_default();
        fields.issuing_sub_unit2 = authorities.next().unwrap_or_default();

        fields.letter_date = extract_date(text);
        fields.reference_number = self.reference_number(text);
        fields.national_id = extract_national_id(text);
        fields.tax_id = extract_tax_id(text, &fields.national_id);
        fields.person_name = extract_person_name(text, &fields.national_id);

        fields
    }

    /// Qualifying authority lines among the header lines, at most three
    pub fn authority_lines(&self, text: &str) -> Vec<String> {
        text.split('\n')
            .take(self.header_lines)
            .map(str::trim)
            .filter(|line| line.chars().count() > 3 && self.is_authority_line(line))
            .take(3)
            .map(str::to_string)
            .collect()
    }

    fn is_authority_line(&self, line: &str) -> bool {
        contains_any_folded(line, &self.authority_keywords)
    }

    pub fn reference_number(&self, text: &str) -> String {
        self.reference_rules
            .first_match(text)
            .map(|m| m.value)
            .unwrap_or_default()
    }
}

impl Default for FieldExtractor {
    fn default() -> Self {
        Self::new()
    }
}

static REFERENCE_RULES: LazyLock<RuleEngine> = LazyLock::new(|| {
    RuleEngine::from_rules(reference_rules().expect("valid reference number patterns"))
});

static DEFAULT_EXTRACTOR: LazyLock<FieldExtractor> = LazyLock::new(FieldExtractor::new);

/// Reference-number rules in evaluation order:
/// labelled `Sayı:` field, `E-` document code, bare numeric block with suffix.
pub fn reference_rules() -> Result<Vec<PatternRule>, regex::Error> {
    let table: [(&str, &str, Capture, i32); 3] = [
        (
            "labelled",
            r"[Ss]ayı\s*:\s*([A-Za-z0-9\-\[\]\(\)\s\./]+?)(?:\n|$)",
            Capture::Group(1),
            30,
        ),
        ("e_code", r"E-\d+[-\.\d\[\]]+", Capture::Whole, 20),
        ("numeric_block", r"\d{5,}[-\.\d\[\]]+\s*[-–]\s*\d+", Capture::Whole, 10),
    ];

    table
        .into_iter()
        .map(|(id, pattern, capture, priority)| {
            PatternRule::new(id, pattern, capture)
                .map(|r| r.with_min_len(MIN_REFERENCE_LEN).with_priority(priority))
        })
        .collect()
}

/// First `DD.MM.YYYY` / `DD/MM/YYYY` date, normalized to dots
pub fn extract_date(text: &str) -> String {
    DATE_PATTERN
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().replace('/', "."))
        .unwrap_or_default()
}

/// First isolated 11-digit run
pub fn extract_national_id(text: &str) -> String {
    NATIONAL_ID_PATTERN
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .filter(|id| id.chars().count() == NATIONAL_ID_LEN)
        .unwrap_or_default()
}

/// First isolated 10-digit run that is not the national id's 10-digit prefix
pub fn extract_tax_id(text: &str, national_id: &str) -> String {
    let prefix: Option<String> = if national_id.is_empty() {
        None
    } else {
        Some(national_id.chars().take(TAX_ID_LEN).collect())
    };

    TAX_ID_PATTERN
        .captures_iter(text)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str())
        .find(|candidate| prefix.as_deref() != Some(*candidate))
        .map(str::to_string)
        .unwrap_or_default()
}

/// Person name, anchored on the national id when one was found, otherwise
/// taken from a "X adlı / X isimli / X'ın" phrase.
pub fn extract_person_name(text: &str, national_id: &str) -> String {
    let mut rules = Vec::with_capacity(2);

    if !national_id.is_empty() {
        let anchored = format!(
            r"{}\s*(?:T\.?C\.?\s*)?(?:Kimlik\s*)?(?:Numaralı)?\s*([A-ZÇĞİÖŞÜa-zçğıöşü]+\s+[A-ZÇĞİÖŞÜa-zçğıöşü]+)",
            regex::escape(national_id)
        );
        if let Ok(rule) = PatternRule::new("id_anchored", &anchored, Capture::Group(1)) {
            rules.push(rule.with_priority(10));
        }
    }

    rules.push(PatternRule {
        id: "referred".to_string(),
        pattern: REFERRED_NAME_PATTERN.clone(),
        capture: Capture::Group(1),
        min_len: 0,
        priority: 0,
    });

    RuleEngine::from_rules(rules)
        .first_match(text)
        .map(|m| m.value)
        .unwrap_or_default()
}

/// Extract with the default rule set
pub fn extract(text: &str) -> ExtractedFields {
    DEFAULT_EXTRACTOR.extract(text)
}

// ============================================================================
// TESTS
// ============================================================================
