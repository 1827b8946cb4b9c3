//! Request and domain models.

pub mod catalog;
pub mod query;

pub use catalog::{ColumnEntry, FieldDescriptor, FieldGroup, SampleData, SampleTable};
pub use query::SqlQuery;
