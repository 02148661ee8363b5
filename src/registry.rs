// 👥 Customer Registry - identifier → customer lookups
//
// A customer list is a column-labelled table. Column roles (national id,
// tax id, display name) are recognised from the header text, so lists
// exported from different systems load without a fixed schema.
//
// A loaded registry is never edited. Reloading builds a new registry and
// swaps the session's snapshot in one step.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::errors::RegistryError;
use crate::text::{contains_any_folded, to_turkish_lowercase};

/// Header tokens meaning "tax id". Checked before the national-id tokens so
/// that "vergi kimlik no" is not mistaken for a national id column.
pub const TAX_ID_TOKENS: &[&str] = &["vkn", "vergi"];
/// Header tokens meaning "national id" / "citizen id"
pub const NATIONAL_ID_TOKENS: &[&str] = &["tckn", "tc", "kimlik"];
/// Header tokens meaning "name"
pub const NAME_TOKENS: &[&str] = &["ad", "isim", "soyad"];
/// Header tokens meaning "customer". Only used for the name role when no
/// column carries a name token, since "Müşteri No" is usually a customer number.
pub const CUSTOMER_TOKENS: &[&str] = &["müşteri"];

/// Customer list file names looked for next to the application
pub const DEFAULT_CANDIDATES: &[&str] = &["musteri_listesi.csv", "musteriler.csv"];

// ============================================================================
// COLUMN ROLES
// ============================================================================

/// Column indexes resolved from the header row
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnRoles {
    pub national_id: Option<usize>,
    pub tax_id: Option<usize>,
    pub name: Option<usize>,
}

impl ColumnRoles {
    /// Resolve roles by case-insensitive substring match.
    ///
    /// Each column takes at most one role and the first matching column wins
    /// each role. A "customer" column is the name column only when no column
    /// carries a name token. Without any identifier column the first column
    /// becomes the national-id column.
    pub fn resolve(headers: &[String]) -> Self {
        let mut roles = ColumnRoles::default();
        let mut customer_column = None;

        for (i, header) in headers.iter().enumerate() {
            let h = header.trim();

            if contains_any_folded(h, TAX_ID_TOKENS) {
                roles.tax_id.get_or_insert(i);
            } else if contains_any_folded(h, NATIONAL_ID_TOKENS) {
                roles.national_id.get_or_insert(i);
            } else if contains_any_folded(h, NAME_TOKENS) {
                roles.name.get_or_insert(i);
            } else if contains_any_folded(h, CUSTOMER_TOKENS) {
                customer_column.get_or_insert(i);
            }
        }

        roles.name = roles.name.or(customer_column);

        if roles.national_id.is_none() && roles.tax_id.is_none() && !headers.is_empty() {
            roles.national_id = Some(0);
        }

        roles
    }
}

// ============================================================================
// LOOKUP RESULT
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Lookup {
    pub found: bool,
    pub display_name: Option<String>,
}

impl Lookup {
    pub fn not_found() -> Self {
        Lookup::default()
    }
}

// ============================================================================
// CUSTOMER REGISTRY
// ============================================================================

#[derive(Debug, Clone)]
pub struct CustomerRegistry {
    /// Normalized (lower-cased, trimmed) headers
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
    roles: ColumnRoles,
    /// Trimmed identifier → first row carrying it
    national_index: HashMap<String, usize>,
    tax_index: HashMap<String, usize>,
    source: Option<PathBuf>,
}

impl CustomerRegistry {
    /// Build a registry from a header row and string-typed rows
    pub fn from_rows(headers: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self, RegistryError> {
        if headers.is_empty() {
            return Err(RegistryError::NoColumns);
        }

        let roles = ColumnRoles::resolve(&headers);
        let columns: Vec<String> = headers
            .iter()
            .map(|h| to_turkish_lowercase(h.trim()))
            .collect();
        debug!(?roles, ?columns, "resolved customer list columns");

        let national_index = index_column(&rows, roles.national_id);
        let tax_index = index_column(&rows, roles.tax_id);

        Ok(CustomerRegistry {
            columns,
            rows,
            roles,
            national_index,
            tax_index,
            source: None,
        })
    }

    /// Load from any CSV reader (first record is the header row)
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, RegistryError> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();

        let mut rows = Vec::new();
        for result in rdr.records() {
            let record = result?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        Self::from_rows(headers, rows)
    }

    /// Load a CSV customer list. All-or-nothing: any malformed row fails the load.
    pub fn from_csv_path(path: &Path) -> Result<Self, RegistryError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();
        if ext != "csv" {
            return Err(RegistryError::UnsupportedFormat(format!(".{}", ext)));
        }

        let file = File::open(path).map_err(|source| RegistryError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let mut registry = Self::from_reader(file)?;
        registry.source = Some(path.to_path_buf());

        info!(
            path = %path.display(),
            records = registry.record_count(),
            "customer list loaded"
        );
        Ok(registry)
    }

    /// Load the first candidate file present in `dir`
    pub fn discover(dir: &Path, candidates: &[String]) -> Result<Option<Self>, RegistryError> {
        for name in candidates {
            let path = dir.join(name);
            if path.is_file() {
                return Self::from_csv_path(&path).map(Some);
            }
        }
        debug!(dir = %dir.display(), "no customer list found");
        Ok(None)
    }

    /// Look a customer up by national id, then by tax id.
    ///
    /// Empty identifiers count as not supplied.
    pub fn lookup(&self, national_id: Option<&str>, tax_id: Option<&str>) -> Lookup {
        let by_national = non_empty(national_id)
            .and_then(|id| self.national_index.get(id.trim()));
        let by_tax = || non_empty(tax_id).and_then(|id| self.tax_index.get(id.trim()));

        match by_national.or_else(by_tax) {
            Some(&row) => Lookup {
                found: true,
                display_name: self.display_name(row),
            },
            None => Lookup::not_found(),
        }
    }

    fn display_name(&self, row: usize) -> Option<String> {
        let col = self.roles.name?;
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }

    pub fn record_count(&self) -> usize {
        self.rows.len()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn roles(&self) -> &ColumnRoles {
        &self.roles
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }
}

fn non_empty(id: Option<&str>) -> Option<&str> {
    id.filter(|v| !v.trim().is_empty())
}

fn index_column(rows: &[Vec<String>], col: Option<usize>) -> HashMap<String, usize> {
    let mut index = HashMap::new();
    let Some(col) = col else {
        return index;
    };

    for (i, row) in rows.iter().enumerate() {
        let value = row.get(col).map(|v| v.trim()).unwrap_or("");
        if !value.is_empty() {
            index.entry(value.to_string()).or_insert(i);
        }
    }
    index
}

// ============================================================================
// REGISTRY SLOT
// ============================================================================

/// The session's active customer list.
///
/// Readers take an `Arc` snapshot; a reload swaps the whole registry, so
/// lookups already running finish against the snapshot they started with.
#[derive(Debug, Default)]
pub struct RegistrySlot {
    current: RwLock<Option<Arc<CustomerRegistry>>>,
}

impl RegistrySlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Option<Arc<CustomerRegistry>> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_loaded(&self) -> bool {
        self.snapshot().is_some()
    }

    /// Swap in a new registry, returning the previous one
    pub fn replace(&self, registry: CustomerRegistry) -> Option<Arc<CustomerRegistry>> {
        self.install(Arc::new(registry))
    }

    /// Load `path` and swap it in. On failure the active registry is kept.
    pub fn reload(&self, path: &Path) -> Result<Arc<CustomerRegistry>, RegistryError> {
        let registry = Arc::new(CustomerRegistry::from_csv_path(path)?);
        self.install(Arc::clone(&registry));
        Ok(registry)
    }

    fn install(&self, registry: Arc<CustomerRegistry>) -> Option<Arc<CustomerRegistry>> {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        current.replace(registry)
    }

    pub fn clear(&self) {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *current = None;
    }
}

// ============================================================================
// TESTS
// ============================================================================
