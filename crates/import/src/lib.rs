pub mod classify;
pub mod config;
pub mod decode;
pub mod grid;
pub mod headers;
pub mod normalize;
pub mod workbook;

pub use classify::{classify_sheet, role_from_name};
pub use config::{ConfigError, NormalizerConfig};
pub use grid::{open_path, CellValue, GridError, RawRow, Sheet, Workbook};
pub use headers::{BindingPolicy, Field, HeaderBindings, TokenTable};
pub use normalize::{RowWarning, SheetOutcome, SkipReason, SkippedRow, WarningKind};
pub use workbook::{NormalizationResult, NormalizeError, SheetSummary, WorkbookNormalizer};

/// Normalize `workbook` with the default configuration.
pub fn normalize_workbook(workbook: &Workbook) -> Result<NormalizationResult, NormalizeError> {
    WorkbookNormalizer::default().normalize(workbook)
}
