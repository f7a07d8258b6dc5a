//! Error types for table definitions

use reinhardt_datatable_query::QueryError;
use std::path::PathBuf;
use thiserror::Error;

/// Datatable error type
#[derive(Debug, Error)]
pub enum DatatableError {
	/// The table or its settings are misconfigured
	#[error("Configuration error: {0}")]
	Configuration(String),

	/// Settings file could not be read
	#[error("IO error reading {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	/// The query source failed
	#[error(transparent)]
	Query(#[from] QueryError),

	/// Client input was rejected
	#[error("Validation error: {0}")]
	Validation(String),
}

/// Result type for datatable operations
pub type DatatableResult<T> = Result<T, DatatableError>;
