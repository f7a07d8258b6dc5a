//! Workbook sink backed by rust_xlsxwriter

use crate::error::Result;
use crate::sink::ExportSink;
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use serde_json::Value;

/// Single-sheet XLSX workbook with a bold header row
pub struct XlsxSink {
	worksheet: Worksheet,
	row: u32,
}

impl XlsxSink {
	pub fn new() -> Self {
		Self {
			worksheet: Worksheet::new(),
			row: 0,
		}
	}
}

impl Default for XlsxSink {
	fn default() -> Self {
		Self::new()
	}
}

impl ExportSink for XlsxSink {
	fn write_headers(&mut self, headers: &[String]) -> Result<()> {
		let bold = Format::new().set_bold();
		for (col, header) in (0u16..).zip(headers) {
			self.worksheet
				.write_string_with_format(self.row, col, header.as_str(), &bold)?;
		}
		self.row += 1;
		Ok(())
	}

	fn write_row(&mut self, row: &[Value]) -> Result<()> {
		for (col, value) in (0u16..).zip(row) {
			match value {
				Value::Null => {}
				Value::Bool(b) => {
					self.worksheet.write_boolean(self.row, col, *b)?;
				}
				Value::Number(n) => match n.as_f64() {
					Some(number) => {
						self.worksheet.write_number(self.row, col, number)?;
					}
					None => {
						self.worksheet.write_string(self.row, col, n.to_string())?;
					}
				},
				Value::String(s) => {
					self.worksheet.write_string(self.row, col, s.as_str())?;
				}
				other => {
					self.worksheet.write_string(self.row, col, other.to_string())?;
				}
			}
		}
		self.row += 1;
		Ok(())
	}

	fn finish(self: Box<Self>) -> Result<Vec<u8>> {
		let mut workbook = Workbook::new();
		workbook.push_worksheet(self.worksheet);
		Ok(workbook.save_to_buffer()?)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn test_workbook_is_zip_archive() {
		let mut sink: Box<dyn ExportSink> = Box::new(XlsxSink::new());
		sink.write_headers(&["Name".to_string(), "Age".to_string()]).unwrap();
		sink.write_row(&[json!("Ada"), json!(36)]).unwrap();
		sink.write_row(&[json!(true), Value::Null]).unwrap();

		let bytes = sink.finish().unwrap();
		assert!(bytes.starts_with(b"PK"));
	}
}
