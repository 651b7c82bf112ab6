//! Error types

mod field;
mod schema;
mod table;

pub use field::*;
pub use schema::*;
pub use table::*;
