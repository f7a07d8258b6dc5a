//! Error types for table export

use reinhardt_datatable_query::QueryError;
use thiserror::Error;

/// Export error type
#[derive(Debug, Error)]
pub enum ExportError {
	/// Export is disabled or the format cannot be produced
	#[error("Configuration error: {0}")]
	Configuration(String),

	#[error("CSV error: {0}")]
	Csv(#[from] csv::Error),

	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	/// The workbook writer rejected a cell or failed to save
	#[error("Workbook error: {0}")]
	Workbook(String),

	/// Fetching rows failed
	#[error(transparent)]
	Query(#[from] QueryError),
}

#[cfg(feature = "xlsx")]
impl From<rust_xlsxwriter::XlsxError> for ExportError {
	fn from(err: rust_xlsxwriter::XlsxError) -> Self {
		Self::Workbook(err.to_string())
	}
}

/// Result type for export operations
pub type Result<T> = std::result::Result<T, ExportError>;
