//! Docscan Common Library
//!
//! CLIとWeb(WASM)で共有される型と状態遷移

pub mod error;
pub mod kind;
pub mod render;
pub mod report;
pub mod scanner;
pub mod selection;
pub mod session;
pub mod slot;

pub use error::{Error, Result};
pub use kind::ItemKind;
pub use render::{Field, FieldLayout, ResultBlock, Section, SlotView};
pub use report::{filename_from_disposition, PdfReport, ReportMode, ReportRequest, ReportSection, DEFAULT_REPORT_NAME};
pub use scanner::{failure_message, field_name, ScanPayload, ScannerKind};
pub use selection::SelectionSet;
pub use session::SessionAggregate;
pub use slot::{ResetToken, ScannerState, SlotOutcome, Ticket, UploadSlot};

/// 開発用バックエンドのデフォルトURL
pub const DEFAULT_API_URL: &str = "http://localhost:8000";
