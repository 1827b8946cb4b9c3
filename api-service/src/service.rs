//! 查询服务模块

use common::errors::{AppError, AppResult};
use common::models::{ColumnEntry, FieldGroup, SampleTable};
use common::utils::JsonRecord;

use crate::stores::{PrimaryStore, SecondaryStore};

/// Sample rows from the geography reference table.
pub const SAMPLE_TABLE_SQL: &str = "SELECT * FROM silver.ref_geography LIMIT 10";

/// Every column of the `silver` schema, grouped by table in column order.
/// Identifier columns are cast because `sql_identifier` has no text decoder.
pub const LIST_COLUMNS_SQL: &str = "SELECT table_name::text AS table_name, \
            column_name::text AS column_name \
     FROM information_schema.columns \
     WHERE table_schema = 'silver' \
     ORDER BY table_name, ordinal_position";

pub const TABLE_METADATA_SQL: &str = "SELECT * FROM table_metadata";

/// Endpoint logic, independent of HTTP.
pub struct QueryService {
    primary: PrimaryStore,
    secondary: SecondaryStore,
}

impl QueryService {
    pub fn new(primary: PrimaryStore, secondary: SecondaryStore) -> Self {
        Self { primary, secondary }
    }

    pub async fn sample_tables(&self) -> AppResult<Vec<JsonRecord>> {
        self.primary.fetch_all(SAMPLE_TABLE_SQL).await
    }

    pub async fn list_columns(&self) -> AppResult<Vec<ColumnEntry>> {
        self.primary.fetch_all(LIST_COLUMNS_SQL).await
    }

    pub fn test_tables(&self) -> Vec<SampleTable> {
        SampleTable::fixtures()
    }

    pub fn silver_tables(&self) -> Vec<FieldGroup> {
        FieldGroup::fixtures()
    }

    pub async fn table_metadata(&self) -> AppResult<Vec<JsonRecord>> {
        self.secondary.fetch_all(TABLE_METADATA_SQL).await
    }

    /// Executes caller-supplied SQL verbatim against the secondary store.
    ///
    /// No statement filtering happens here; `allowed` is the deployment's
    /// capability flag and is the only gate.
    pub async fn execute(&self, sql: &str, allowed: bool) -> AppResult<Vec<JsonRecord>> {
        if !allowed {
            tracing::warn!("rejected raw SQL execution: ALLOW_RAW_SQL is not enabled");
            return Err(AppError::Forbidden(
                "raw SQL execution is disabled on this deployment".to_string(),
            ));
        }
        tracing::info!(query = %sql, "Executing SQL query");
        self.secondary.fetch_all(sql).await
    }
}
