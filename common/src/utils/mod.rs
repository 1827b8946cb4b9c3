//! Utility functions and helpers.

pub mod row_json;
pub mod scoped_connection;

pub use row_json::JsonRecord;
pub use scoped_connection::{OpenConnections, ScopedConnection};
