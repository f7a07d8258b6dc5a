//! Writers the exporter streams rows into

use crate::error::{ExportError, Result};
use csv::Writer;
use reinhardt_datatable_core::ExportFormat;
use reinhardt_datatable_query::display_value;
use serde_json::Value;

/// Destination of an export: one header row, then data rows
pub trait ExportSink: Send {
	fn write_headers(&mut self, headers: &[String]) -> Result<()>;

	fn write_row(&mut self, row: &[Value]) -> Result<()>;

	/// Finalize the document and return its bytes
	fn finish(self: Box<Self>) -> Result<Vec<u8>>;
}

/// Sink for `format`
///
/// # Errors
///
/// Returns [`ExportError::Configuration`] when the format's writer was not
/// compiled in, before anything is written.
pub fn sink_for(format: ExportFormat) -> Result<Box<dyn ExportSink>> {
	match format {
		ExportFormat::Csv => Ok(Box::new(CsvSink::new())),
		#[cfg(feature = "xlsx")]
		ExportFormat::Xlsx => Ok(Box::new(crate::xlsx::XlsxSink::new())),
		#[cfg(not(feature = "xlsx"))]
		ExportFormat::Xlsx => Err(ExportError::Configuration(
			"XLSX export requires the `xlsx` feature of reinhardt-datatable-export".to_string(),
		)),
	}
}

/// RFC 4180 CSV in memory
pub struct CsvSink {
	writer: Writer<Vec<u8>>,
}

impl CsvSink {
	pub fn new() -> Self {
		Self {
			writer: Writer::from_writer(Vec::new()),
		}
	}
}

impl Default for CsvSink {
	fn default() -> Self {
		Self::new()
	}
}

impl ExportSink for CsvSink {
	fn write_headers(&mut self, headers: &[String]) -> Result<()> {
		self.writer.write_record(headers)?;
		Ok(())
	}

	fn write_row(&mut self, row: &[Value]) -> Result<()> {
		self.writer.write_record(row.iter().map(display_value))?;
		Ok(())
	}

	fn finish(self: Box<Self>) -> Result<Vec<u8>> {
		self.writer
			.into_inner()
			.map_err(|e| ExportError::Io(e.into_error()))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn test_csv_sink_quotes_and_renders_cells() {
		let mut sink: Box<dyn ExportSink> = Box::new(CsvSink::new());
		sink.write_headers(&["Name".to_string(), "Note".to_string()]).unwrap();
		sink.write_row(&[json!("Ada"), json!("likes, commas")]).unwrap();
		sink.write_row(&[json!(42), Value::Null]).unwrap();

		let output = String::from_utf8(sink.finish().unwrap()).unwrap();
		assert_eq!(output, "Name,Note\nAda,\"likes, commas\"\n42,\n");
	}

	#[test]
	fn test_csv_sink_is_available() {
		assert!(sink_for(ExportFormat::Csv).is_ok());
	}

	#[cfg(not(feature = "xlsx"))]
	#[test]
	fn test_xlsx_without_feature_is_configuration_error() {
		let err = sink_for(ExportFormat::Xlsx).err().unwrap();
		assert!(matches!(err, ExportError::Configuration(_)));
	}
}
