//! # Reinhardt Datatable Query
//!
//! The query capability data tables are composed against.
//!
//! ## Overview
//!
//! A [`Query`] is an unexecuted plan: a table name, a tree of [`Condition`]s
//! built from `and_where`/`or_where` calls and grouped clauses, and a list of
//! orderings. Plans are executed by a [`QuerySource`]:
//!
//! - [`MemorySource`] evaluates conditions against JSON records
//! - [`SqlSource`] compiles plans with `sea-query` and delegates execution to
//!   an [`SqlExecutor`]
//!
//! ## Example
//!
//! ```
//! use reinhardt_datatable_query::{Condition, MemorySource, Query, QuerySource, SortDirection};
//! use serde_json::json;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let source = MemorySource::from_values(vec![
//!     json!({"id": 1, "name": "Zebra"}),
//!     json!({"id": 2, "name": "Apple"}),
//! ]);
//!
//! let mut query = Query::table("animals");
//! query.order_by("name", SortDirection::Asc);
//!
//! let page = source.paginate(&query, 1, 10).await.unwrap();
//! assert_eq!(page.items[0]["name"], "Apple");
//! # }
//! ```

pub mod builder;
pub mod condition;
pub mod error;
pub mod memory;
pub mod source;
pub mod sql;
pub mod value;

pub use builder::{Boolean, OrderBy, Query, SortDirection};
pub use condition::{Condition, Operator};
pub use error::{QueryError, QueryResult};
pub use memory::MemorySource;
pub use source::{Page, QuerySource, page_offset};
pub use sql::{Relationship, SqlDialect, SqlExecutor, SqlSource};
pub use value::{
	Record, RowId, compare_values, display_value, lookup, parse_datetime, values_equal,
};
