//! # Reinhardt Datatable Core
//!
//! Declarative building blocks of a data table and the composer that turns
//! user input into a query.
//!
//! ## Overview
//!
//! A [`Table`] owns:
//!
//! - a base [`Query`] that every request starts from
//! - [`Column`]s, including the special checkbox and action columns
//! - [`TableFilter`]s: dropdown [`Filter`]s, [`DateFilter`]s and [`RangeFilter`]s
//! - toolbar [`BulkAction`]s and [`BulkActionGroup`]s
//! - search, pagination and export settings
//!
//! [`Table::build_query`] composes the base query with a search term,
//! filter values and a sort column. Composition never fails: unknown
//! names and malformed values are ignored.
//!
//! ## Example
//!
//! ```
//! use reinhardt_datatable_core::{
//!     Column, Condition, Filter, FilterOption, FilterValue, FilterValues, Query, QueryParams,
//!     SortDirection, Table,
//! };
//!
//! let table = Table::new(Query::table("users"))
//!     .with_columns(vec![Column::make("name"), Column::make("email")])
//!     .with_filter(Filter::make("status").with_options(vec![
//!         FilterOption::make("active").query(|query, _| {
//!             query.and_where(Condition::eq("active", true));
//!         }),
//!     ]));
//!
//! let mut filters = FilterValues::new();
//! filters.insert("status".into(), FilterValue::list(["active"]));
//!
//! let query = table.build_query(
//!     &QueryParams::new()
//!         .search("ada")
//!         .filters(&filters)
//!         .sort("name", SortDirection::Asc),
//! );
//!
//! assert!(query.has_conditions());
//! assert_eq!(query.orders()[0].column, "name");
//! ```

pub mod action;
pub mod column;
pub mod error;
pub mod filter;
pub mod resolvable;
pub mod settings;
pub mod table;
pub mod text;

pub use action::{
	ActionResult, BulkAction, BulkActionEntry, BulkActionGroup, BulkExecutable, Confirmation,
	IconPosition, RowAction, RowActionEntry, RowActionGroup,
};
pub use column::{ACTIONS_COLUMN, CHECKBOX_COLUMN, Column, ColumnKind};
pub use error::{DatatableError, DatatableResult};
pub use filter::{
	DateFilter, DatePickerOptions, DateRange, Filter, FilterKind, FilterOption, FilterValue,
	FilterValues, RangeFilter, TableFilter,
};
pub use resolvable::Resolvable;
pub use settings::{DatatableSettings, ExportSettings};
pub use table::{
	ActionRegistry, ColumnRegistry, ExportConfig, ExportFormat, FilterRegistry, PaginationConfig,
	QueryParams, SearchConfig, Table,
};
pub use text::{escape_html, humanize};

pub use reinhardt_datatable_query::{
	Condition, Page, Query, QuerySource, Record, RowId, SortDirection,
};
