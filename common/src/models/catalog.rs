//! Table catalog models.
//!
//! Includes the fixed listings served without touching any store.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One column of a table in the primary store's catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct ColumnEntry {
    pub table_name: String,
    pub column_name: String,
}

/// Key/value payload of a sample table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SampleData {
    pub key1: String,
    pub key2: String,
}

/// Entry of the static test table listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SampleTable {
    pub id: u32,
    pub name: String,
    pub data: SampleData,
}

impl SampleTable {
    /// The two fixed test tables.
    pub fn fixtures() -> Vec<SampleTable> {
        vec![
            SampleTable::new(1, "Table1", "value1", "value2"),
            SampleTable::new(2, "Table2", "value3", "value4"),
        ]
    }

    fn new(id: u32, name: &str, key1: &str, key2: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            data: SampleData {
                key1: key1.to_string(),
                key2: key2.to_string(),
            },
        }
    }
}

/// A selectable field inside a field group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FieldDescriptor {
    pub name: String,
    pub description: String,
    pub selected: bool,
}

/// Named group of fields, as listed by `/api/silvertables`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FieldGroup {
    pub name: String,
    pub fields: Vec<FieldDescriptor>,
}

impl FieldGroup {
    /// The two fixed field groups.
    pub fn fixtures() -> Vec<FieldGroup> {
        ["Visit Data", "Provider Data"]
            .into_iter()
            .map(|name| FieldGroup {
                name: name.to_string(),
                fields: (1..=2)
                    .map(|i| FieldDescriptor {
                        name: format!("Field{}", i),
                        description: format!("Description{}", i),
                        selected: false,
                    })
                    .collect(),
            })
            .collect()
    }
}
