//! # Reinhardt Datatable
//!
//! Interactive data tables for Reinhardt applications: global search,
//! dropdown, date and range filters, sorting, pagination, column
//! visibility, row and bulk actions with confirmation, and CSV/XLSX
//! export.
//!
//! ## Crates
//!
//! - [`query`]: the query plan tables are composed against, with in-memory
//!   and SQL sources
//! - [`table`]: columns, filters, actions and the query composer
//! - [`export`]: streaming CSV/XLSX export
//! - [`component`]: per-user interaction state and the controller driving it
//!
//! ## Feature Flags
//!
//! - `xlsx` - Workbook export through `rust_xlsxwriter`
//!
//! ## Quick Example
//!
//! ```rust
//! use reinhardt_datatable::prelude::*;
//! use serde_json::json;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let source = MemorySource::from_values(vec![
//!     json!({"id": 1, "name": "Zebra", "active": true}),
//!     json!({"id": 2, "name": "Apple", "active": false}),
//!     json!({"id": 3, "name": "Mango", "active": true}),
//! ]);
//!
//! let datatable = Datatable::mount(
//!     || {
//!         Table::new(Query::table("animals"))
//!             .with_columns(vec![Column::checkbox(), Column::make("name")])
//!             .with_filter(Filter::make("status").with_options(vec![
//!                 FilterOption::make("active").query(|query, _| {
//!                     query.and_where(Condition::eq("active", true));
//!                 }),
//!             ]))
//!     },
//!     source,
//! )
//! .unwrap();
//!
//! let state = datatable.initial_state();
//! let state = datatable.toggle_filter(state, "status", "active");
//! let state = datatable.sort_by(state, "name");
//!
//! let page = datatable.data(&state).await.unwrap();
//! assert_eq!(page.total, 2);
//! assert_eq!(page.items[0]["name"], "Mango");
//! # }
//! ```

pub mod component;
pub mod export;
pub mod query;
pub mod table;

pub mod prelude {
	pub use crate::component::{
		ClientSubmittedSelection, ComponentEvent, Datatable, DatatableDefinition,
		InteractionState, Notification, NotificationKind, SelectionModel, ServerTrackedSelection,
		Transition,
	};
	pub use crate::export::{DatatableExporter, ExportError, ExportResult};
	pub use crate::query::{
		Condition, MemorySource, Page, Query, QuerySource, Record, RowId, SortDirection,
		SqlDialect, SqlExecutor, SqlSource,
	};
	pub use crate::table::{
		ActionResult, BulkAction, BulkActionGroup, Column, Confirmation, DatatableError,
		DatatableResult, DatatableSettings, DateFilter, ExportFormat, Filter, FilterOption,
		FilterValue, FilterValues, IconPosition, QueryParams, RangeFilter, RowAction,
		RowActionGroup, Table, TableFilter,
	};

	// External
	pub use async_trait::async_trait;
	pub use serde::{Deserialize, Serialize};
}
