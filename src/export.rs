//! CSV and XLSX export of table rows

pub use reinhardt_datatable_export::*;
