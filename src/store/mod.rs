// Store module - CSV-backed persistence for reference data and evaluation results

pub mod dictionary;
pub mod layout;
pub mod records;
pub mod reference;
pub mod table;

pub use dictionary::{ColumnSummaries, DataDictionary};
pub use layout::WorkspaceLayout;
pub use records::{LogStore, SummaryStore, LOG_COLUMNS, SUMMARY_COLUMNS};
pub use reference::{DatasetCatalog, MandateCatalog, ProductDataset};
