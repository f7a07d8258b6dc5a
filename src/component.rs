//! Interaction state and the table controller

pub use reinhardt_datatable_component::*;
