//! Row data

mod row;
mod value;

pub use row::*;
pub use value::*;
