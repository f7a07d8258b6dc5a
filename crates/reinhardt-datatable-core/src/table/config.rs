//! Search, pagination and export settings of a table

use super::registry::ColumnRegistry;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder of the search box when none is configured
pub const DEFAULT_SEARCH_PLACEHOLDER: &str = "Search...";

/// Global text search settings
///
/// By default the searchable columns are derived from the table's data
/// columns; an explicit list takes precedence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
	columns: Vec<String>,
	from_columns: bool,
	enabled: bool,
	placeholder: Option<String>,
}

impl Default for SearchConfig {
	fn default() -> Self {
		Self {
			columns: Vec::new(),
			from_columns: true,
			enabled: true,
			placeholder: None,
		}
	}
}

impl SearchConfig {
	pub fn with_columns<I, S>(mut self, columns: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.columns = columns.into_iter().map(Into::into).collect();
		self
	}

	pub fn columns(&self) -> &[String] {
		&self.columns
	}

	pub fn from_columns(mut self, from_columns: bool) -> Self {
		self.from_columns = from_columns;
		self
	}

	pub fn enabled(mut self, enabled: bool) -> Self {
		self.enabled = enabled;
		self
	}

	pub fn is_enabled(&self) -> bool {
		self.enabled
	}

	pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
		self.placeholder = Some(placeholder.into());
		self
	}

	pub fn placeholder(&self) -> &str {
		self.placeholder
			.as_deref()
			.unwrap_or(DEFAULT_SEARCH_PLACEHOLDER)
	}

	/// Columns the search term is matched against
	pub fn resolved_columns(&self, columns: &ColumnRegistry) -> Vec<String> {
		if !self.columns.is_empty() {
			return self.columns.clone();
		}
		if !self.from_columns {
			return Vec::new();
		}
		columns
			.data()
			.map(|column| column.name().to_string())
			.collect()
	}
}

/// Page size settings; `per_page` falls back to the global default
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationConfig {
	per_page: Option<u64>,
	per_page_options: Vec<u64>,
}

impl Default for PaginationConfig {
	fn default() -> Self {
		Self {
			per_page: None,
			per_page_options: vec![10, 25, 50, 100],
		}
	}
}

impl PaginationConfig {
	pub fn with_per_page(mut self, per_page: u64) -> Self {
		self.per_page = Some(per_page);
		self
	}

	pub fn per_page(&self) -> Option<u64> {
		self.per_page
	}

	/// Configured page size, else `fallback`
	pub fn per_page_or(&self, fallback: u64) -> u64 {
		self.per_page.unwrap_or(fallback)
	}

	pub fn with_per_page_options(mut self, options: Vec<u64>) -> Self {
		self.per_page_options = options;
		self
	}

	pub fn per_page_options(&self) -> &[u64] {
		&self.per_page_options
	}
}

/// Output format of an export
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
	#[default]
	Csv,
	Xlsx,
}

impl ExportFormat {
	/// Parse a request parameter; anything unrecognized is CSV
	pub fn from_param(param: &str) -> Self {
		match param.trim().to_ascii_lowercase().as_str() {
			"xlsx" => Self::Xlsx,
			_ => Self::Csv,
		}
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Csv => "csv",
			Self::Xlsx => "xlsx",
		}
	}

	pub fn extension(&self) -> &'static str {
		self.as_str()
	}

	pub fn mime_type(&self) -> &'static str {
		match self {
			Self::Csv => "text/csv",
			Self::Xlsx => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
		}
	}
}

impl fmt::Display for ExportFormat {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportConfig {
	enabled: bool,
	formats: Vec<ExportFormat>,
	name: String,
}

impl Default for ExportConfig {
	fn default() -> Self {
		Self {
			enabled: true,
			formats: vec![ExportFormat::Csv, ExportFormat::Xlsx],
			name: "export".to_string(),
		}
	}
}

impl ExportConfig {
	pub fn enabled(mut self, enabled: bool) -> Self {
		self.enabled = enabled;
		self
	}

	pub fn is_enabled(&self) -> bool {
		self.enabled
	}

	pub fn with_formats(mut self, formats: Vec<ExportFormat>) -> Self {
		self.formats = formats;
		self
	}

	pub fn formats(&self) -> &[ExportFormat] {
		&self.formats
	}

	pub fn supports(&self, format: ExportFormat) -> bool {
		self.formats.contains(&format)
	}

	pub fn with_name(mut self, name: impl Into<String>) -> Self {
		self.name = name.into();
		self
	}

	/// Base name of exported files, without extension
	pub fn name(&self) -> &str {
		&self.name
	}
}
