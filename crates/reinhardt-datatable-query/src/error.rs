//! Error types for query execution

use thiserror::Error;

/// Query layer error type
#[derive(Debug, Error)]
pub enum QueryError {
	/// The backing store failed to execute a statement
	#[error("Database error: {0}")]
	Database(String),

	/// A query plan could not be turned into an executable statement
	#[error("Invalid query: {0}")]
	InvalidQuery(String),
}

/// Result type for query operations
pub type QueryResult<T> = Result<T, QueryError>;
