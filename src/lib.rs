// TBB Reply System - Core Library
// Reads official letters, resolves the named person against the customer list,
// and composes the standard reply.

pub mod errors;
pub mod text;
pub mod rules;
pub mod extractor;
pub mod registry;
pub mod resolver;
pub mod composer;
pub mod batch;
pub mod decode;
pub mod export;
pub mod config;

// Re-export commonly used types
pub use errors::{DecodeError, ExportError, RegistryError};
pub use rules::{Capture, PatternRule, RuleEngine, RuleMatch};
pub use extractor::{extract, ExtractedFields, FieldExtractor, Identifier};
pub use registry::{ColumnRoles, CustomerRegistry, Lookup, RegistrySlot};
pub use resolver::{resolve, CaseRecord, CaseResolver, CustomerStatus};
pub use composer::{Alignment, Paragraph, ResponseComposer, ResponseDocument};
pub use batch::{
    build_report, Action, BatchCoordinator, BatchReport, BatchSummary, Letter, Reply, ReportRow,
    REPORT_COLUMNS,
};
pub use decode::{collect_letters, is_letter_file, FileDecoder, LetterFormat, TextDecoder};
pub use export::{
    report_file_name, reply_file_name, save_replies, save_reply_json, save_reply_text,
    write_report_csv,
};
pub use config::{AppConfig, LetterheadConfig, OutputConfig, RegistryConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
