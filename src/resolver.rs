// ⚖️ Case Resolver - extracted fields + customer status
//
// Combines what was read from a letter with what the customer list says
// about the identifier in it.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::extractor::ExtractedFields;
use crate::registry::CustomerRegistry;

// ============================================================================
// CUSTOMER STATUS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CustomerStatus {
    Customer,
    NotCustomer,
    /// No customer list was loaded
    Unknown,
}

impl CustomerStatus {
    /// Label used in batch reports
    pub fn label(&self) -> &'static str {
        match self {
            CustomerStatus::Customer => "Evet",
            CustomerStatus::NotCustomer => "Hayır",
            CustomerStatus::Unknown => "Bilinmiyor",
        }
    }

    pub fn is_customer(&self) -> bool {
        matches!(self, CustomerStatus::Customer)
    }
}

// ============================================================================
// CASE RECORD
// ============================================================================

/// Resolved outcome for one letter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseRecord {
    pub fields: ExtractedFields,
    pub status: CustomerStatus,
    pub source_file_name: String,

    /// Decode failure marker. When set, `fields` are empty and `status` is `Unknown`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CaseRecord {
    pub fn new(source_file_name: &str, fields: ExtractedFields, status: CustomerStatus) -> Self {
        CaseRecord {
            fields,
            status,
            source_file_name: source_file_name.to_string(),
            error: None,
        }
    }

    /// Record for a letter that could not be read
    pub fn failed(source_file_name: &str, marker: &str) -> Self {
        CaseRecord {
            fields: ExtractedFields::default(),
            status: CustomerStatus::Unknown,
            source_file_name: source_file_name.to_string(),
            error: Some(marker.to_string()),
        }
    }

    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }
}

// ============================================================================
// CASE RESOLVER
// ============================================================================

pub struct CaseResolver<'a> {
    registry: Option<&'a CustomerRegistry>,
}

impl<'a> CaseResolver<'a> {
    pub fn new(registry: Option<&'a CustomerRegistry>) -> Self {
        CaseResolver { registry }
    }

    /// Resolve customer status. A name from the customer list only fills an
    /// empty extracted name, it never replaces one.
    pub fn resolve(&self, source_file_name: &str, mut fields: ExtractedFields) -> CaseRecord {
        let Some(registry) = self.registry else {
            return CaseRecord::new(source_file_name, fields, CustomerStatus::Unknown);
        };

        let lookup = registry.lookup(Some(fields.national_id.as_str()), Some(fields.tax_id.as_str()));
        let status = if lookup.found {
            CustomerStatus::Customer
        } else {
            CustomerStatus::NotCustomer
        };

        if fields.person_name.is_empty() {
            if let Some(name) = lookup.display_name {
                fields.person_name = name;
            }
        }

        debug!(file = source_file_name, ?status, "case resolved");
        CaseRecord::new(source_file_name, fields, status)
    }
}

/// Resolve against an optional registry
pub fn resolve(
    source_file_name: &str,
    fields: ExtractedFields,
    registry: Option<&CustomerRegistry>,
) -> CaseRecord {
    CaseResolver::new(registry).resolve(source_file_name, fields)
}

// ============================================================================
// TESTS
// ============================================================================
