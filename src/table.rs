//! Table definitions: columns, filters, actions, settings and the query
//! composer
//!
//! ## Example
//!
//! ```rust
//! use reinhardt_datatable::table::{Column, QueryParams, SortDirection, Table};
//! use reinhardt_datatable::query::Query;
//!
//! let table = Table::new(Query::table("users"))
//!     .with_columns(vec![Column::make("name").sort_by("last_name")]);
//!
//! let query = table.build_query(&QueryParams::new().sort("name", SortDirection::Desc));
//! assert_eq!(query.orders()[0].column, "last_name");
//! ```

pub use reinhardt_datatable_core::*;
