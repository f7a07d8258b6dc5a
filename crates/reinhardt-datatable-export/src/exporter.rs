//! Streaming a composed table query into an export sink

use crate::error::{ExportError, Result};
use crate::sink::sink_for;
use reinhardt_datatable_core::{Column, DatatableSettings, ExportFormat, QueryParams, Table};
use reinhardt_datatable_query::{Query, QuerySource, Record, SortDirection};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Finished export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportResult {
	/// Document bytes
	pub data: Vec<u8>,
	pub mime_type: String,
	/// Suggested download name, `<export name>.<extension>`
	pub filename: String,
	/// Number of data rows written, excluding the header row
	pub row_count: usize,
}

impl ExportResult {
	pub fn new(
		data: Vec<u8>,
		mime_type: impl Into<String>,
		filename: impl Into<String>,
		row_count: usize,
	) -> Self {
		Self {
			data,
			mime_type: mime_type.into(),
			filename: filename.into(),
			row_count,
		}
	}

	pub fn size_bytes(&self) -> usize {
		self.data.len()
	}
}

/// Exports the rows a table shows for a given search and filter state
///
/// Rows are fetched `chunk_size` at a time. Checkbox and action columns
/// are left out of both the header and the data rows.
///
/// # Examples
///
/// ```
/// use reinhardt_datatable_core::{Column, ExportFormat, Query, QueryParams, Table};
/// use reinhardt_datatable_export::DatatableExporter;
/// use reinhardt_datatable_query::MemorySource;
/// use serde_json::json;
///
/// # #[tokio::main]
/// # async fn main() {
/// let table = Table::new(Query::table("users"))
///     .with_columns(vec![Column::checkbox(), Column::make("name")])
///     .with_export_name("users");
/// let source = MemorySource::from_values(vec![json!({"id": 1, "name": "Ada"})]);
///
/// let export = DatatableExporter::default()
///     .export(&table, &source, &QueryParams::new(), ExportFormat::Csv)
///     .await
///     .unwrap();
///
/// assert_eq!(export.filename, "users.csv");
/// assert_eq!(export.data, b"Name\nAda\n");
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct DatatableExporter {
	chunk_size: u64,
}

impl Default for DatatableExporter {
	fn default() -> Self {
		Self::new(&DatatableSettings::default())
	}
}

impl DatatableExporter {
	pub fn new(settings: &DatatableSettings) -> Self {
		Self {
			chunk_size: settings.export.chunk_size.max(1),
		}
	}

	pub fn with_chunk_size(mut self, chunk_size: u64) -> Self {
		self.chunk_size = chunk_size.max(1);
		self
	}

	pub fn chunk_size(&self) -> u64 {
		self.chunk_size
	}

	/// Header labels of the exported columns
	pub fn headers(table: &Table) -> Vec<String> {
		table.columns().data().map(Column::label).collect()
	}

	/// Export values of one record, in header order
	pub fn row(table: &Table, record: &Record) -> Vec<Value> {
		table
			.columns()
			.data()
			.map(|column| column.export_value(record))
			.collect()
	}

	/// The composed table query, ending in a primary key ordering so that
	/// chunks fetched with separate offsets never overlap
	pub fn query(table: &Table, params: &QueryParams<'_>) -> Query {
		let mut query = table.build_query(params);
		let key = table.primary_key();
		if !query.orders().iter().any(|order| order.column == key) {
			query.order_by(key, SortDirection::Asc);
		}
		query
	}

	/// Run the export
	///
	/// # Errors
	///
	/// Fails with [`ExportError::Configuration`] before fetching anything
	/// when the table disabled export, did not declare `format`, or the
	/// format's writer is unavailable.
	pub async fn export<S>(
		&self,
		table: &Table,
		source: &S,
		params: &QueryParams<'_>,
		format: ExportFormat,
	) -> Result<ExportResult>
	where
		S: QuerySource + ?Sized,
	{
		let config = table.export();
		if !config.is_enabled() {
			return Err(ExportError::Configuration(
				"export is disabled for this table".to_string(),
			));
		}
		if !config.supports(format) {
			return Err(ExportError::Configuration(format!(
				"format '{}' is not enabled for this table",
				format
			)));
		}

		let mut sink = sink_for(format)?;

		let query = Self::query(table, params);

		sink.write_headers(&Self::headers(table))?;

		let mut offset = 0;
		let mut row_count = 0;
		loop {
			let chunk = source.fetch(&query, offset, Some(self.chunk_size)).await?;
			tracing::debug!(offset, rows = chunk.len(), "exporting chunk");

			for record in &chunk {
				sink.write_row(&Self::row(table, record))?;
			}
			row_count += chunk.len();

			if (chunk.len() as u64) < self.chunk_size {
				break;
			}
			offset += self.chunk_size;
		}

		let data = sink.finish()?;
		let filename = format!("{}.{}", config.name(), format.extension());
		tracing::info!(%filename, row_count, "table exported");

		Ok(ExportResult::new(
			data,
			format.mime_type(),
			filename,
			row_count,
		))
	}
}
