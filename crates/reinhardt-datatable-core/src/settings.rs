//! Datatable settings loaded from TOML.
//!
//! ```toml
//! per_page = 25
//! default_sort_direction = "desc"
//!
//! [export]
//! chunk_size = 500
//! ```

use crate::error::{DatatableError, DatatableResult};
use reinhardt_datatable_query::SortDirection;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Package-wide defaults applied to every table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatatableSettings {
	/// Rows per page when a table does not set its own
	pub per_page: u64,

	/// Direction used the first time a column is sorted
	pub default_sort_direction: SortDirection,

	pub export: ExportSettings,
}

impl Default for DatatableSettings {
	fn default() -> Self {
		Self {
			per_page: 10,
			default_sort_direction: SortDirection::Asc,
			export: ExportSettings::default(),
		}
	}
}

/// Export streaming settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
	/// Rows fetched per round trip while exporting
	pub chunk_size: u64,
}

impl Default for ExportSettings {
	fn default() -> Self {
		Self { chunk_size: 1000 }
	}
}

impl DatatableSettings {
	/// Load settings from a TOML file.
	///
	/// # Errors
	///
	/// Returns error if the file cannot be read, parsed or validated.
	pub fn from_file(path: impl AsRef<Path>) -> DatatableResult<Self> {
		let content =
			std::fs::read_to_string(path.as_ref()).map_err(|source| DatatableError::Io {
				path: path.as_ref().to_path_buf(),
				source,
			})?;

		Self::from_toml(&content)
	}

	/// Parse settings from a TOML string; missing keys take their defaults.
	pub fn from_toml(content: &str) -> DatatableResult<Self> {
		let settings: Self = toml::from_str(content).map_err(|e| {
			DatatableError::Configuration(format!("Failed to parse settings: {}", e))
		})?;
		settings.validate()?;
		Ok(settings)
	}

	pub fn validate(&self) -> DatatableResult<()> {
		if self.per_page == 0 {
			return Err(DatatableError::Configuration(
				"per_page must be greater than zero".to_string(),
			));
		}
		if self.export.chunk_size == 0 {
			return Err(DatatableError::Configuration(
				"export.chunk_size must be greater than zero".to_string(),
			));
		}
		Ok(())
	}

	pub fn with_per_page(mut self, per_page: u64) -> Self {
		self.per_page = per_page;
		self
	}

	pub fn with_default_sort_direction(mut self, direction: SortDirection) -> Self {
		self.default_sort_direction = direction;
		self
	}

	pub fn with_chunk_size(mut self, chunk_size: u64) -> Self {
		self.export.chunk_size = chunk_size;
		self
	}
}
