//! # Reinhardt Datatable Export
//!
//! Streams the rows of a data table into CSV or XLSX documents.
//!
//! The exporter composes the same query the table would show for the
//! given search and filter state, fetches it in chunks and writes every
//! data column through an [`ExportSink`]. Columns may declare their own
//! export value; otherwise the raw field value is written.
//!
//! ## Feature Flags
//!
//! - `xlsx`: workbook output through `rust_xlsxwriter`. Without it, XLSX
//!   exports fail with a configuration error before any row is read.

pub mod error;
pub mod exporter;
pub mod sink;
#[cfg(feature = "xlsx")]
pub mod xlsx;

pub use error::{ExportError, Result};
pub use exporter::{DatatableExporter, ExportResult};
pub use reinhardt_datatable_core::ExportFormat;
pub use sink::{CsvSink, ExportSink, sink_for};
#[cfg(feature = "xlsx")]
pub use xlsx::XlsxSink;
