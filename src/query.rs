//! Query plans and the sources that execute them
//!
//! See [`reinhardt_datatable_query`] for details.

pub use reinhardt_datatable_query::*;
