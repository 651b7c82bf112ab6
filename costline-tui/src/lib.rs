//! Terminal ledger browser built on [`datatable`].

pub mod app;
pub mod error;
pub mod ledger;
pub mod paths;

pub use app::{App, FilterMode, Mode};
pub use error::AppError;
