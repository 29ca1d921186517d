use crate::error::{ExecuteError, Result};
use crate::source::{Connection, ConnectionProvider};
use docgate_core::{BoxError, Document, SqlParam};
use docgate_marshal::{cursor_to_documents, field_names, infer_column_types, row_to_document};
use std::sync::Arc;
use tracing::debug;

/// Runs SQL against a connection provider and marshals results into
/// documents.
///
/// The plain entry points use the default data source; `*_from` variants
/// take an explicit data-source name and `*_on` variants run against a
/// connection the caller already holds.
pub struct QueryExecutor {
    provider: Arc<dyn ConnectionProvider>,
    default_source: String,
}

impl QueryExecutor {
    pub fn new(provider: Arc<dyn ConnectionProvider>, default_source: impl Into<String>) -> Self {
        Self {
            provider,
            default_source: default_source.into(),
        }
    }

    pub fn default_source(&self) -> &str {
        &self.default_source
    }

    /// Acquire a connection from the default data source.
    ///
    /// The connection is released when the returned box is dropped.
    pub async fn connection(&self) -> Result<Box<dyn Connection>> {
        self.connection_from(&self.default_source).await
    }

    /// Acquire a connection from the named data source.
    pub async fn connection_from(&self, source: &str) -> Result<Box<dyn Connection>> {
        self.provider.connection(source).await.map_err(|cause| {
            ExecuteError::ConnectionAcquisition {
                source_name: source.to_string(),
                source: cause,
            }
        })
    }

    /// Load the first row matching the query, or `None` when no row did.
    ///
    /// Only the first row is read; the query is not validated to match a
    /// single row.
    pub async fn load_one(&self, sql: &str, params: &[SqlParam]) -> Result<Option<Document>> {
        self.load_one_from(&self.default_source, sql, params).await
    }

    pub async fn load_one_from(
        &self,
        source: &str,
        sql: &str,
        params: &[SqlParam],
    ) -> Result<Option<Document>> {
        let connection = self.connection_from(source).await?;
        self.load_one_on(connection.as_ref(), sql, params).await
    }

    pub async fn load_one_on(
        &self,
        connection: &dyn Connection,
        sql: &str,
        params: &[SqlParam],
    ) -> Result<Option<Document>> {
        debug!("loading one row for [{}]", sql);
        let mut statement = connection.prepare(sql).map_err(|e| query_error(sql, e))?;
        let mut cursor = statement
            .query(params)
            .await
            .map_err(|e| query_error(sql, e))?;

        if !cursor.advance().map_err(|e| query_error(sql, e))? {
            return Ok(None);
        }

        let (types, names) = {
            let meta = cursor.metadata();
            (infer_column_types(meta)?, field_names(meta))
        };
        let document = row_to_document(cursor.as_ref(), &types, &names)?;
        Ok(Some(document))
    }

    /// Load every row matching the query.
    pub async fn load_many(&self, sql: &str, params: &[SqlParam]) -> Result<Vec<Document>> {
        self.load_many_from(&self.default_source, sql, params).await
    }

    pub async fn load_many_from(
        &self,
        source: &str,
        sql: &str,
        params: &[SqlParam],
    ) -> Result<Vec<Document>> {
        let connection = self.connection_from(source).await?;
        self.load_many_on(connection.as_ref(), sql, params).await
    }

    pub async fn load_many_on(
        &self,
        connection: &dyn Connection,
        sql: &str,
        params: &[SqlParam],
    ) -> Result<Vec<Document>> {
        debug!("loading rows for [{}]", sql);
        let mut statement = connection.prepare(sql).map_err(|e| query_error(sql, e))?;
        let mut cursor = statement
            .query(params)
            .await
            .map_err(|e| query_error(sql, e))?;
        let documents = cursor_to_documents(cursor.as_mut())?;
        Ok(documents)
    }

    /// Execute a statement with no result set; returns the affected row
    /// count.
    pub async fn execute(&self, sql: &str, params: &[SqlParam]) -> Result<u64> {
        self.execute_from(&self.default_source, sql, params).await
    }

    pub async fn execute_from(&self, source: &str, sql: &str, params: &[SqlParam]) -> Result<u64> {
        let connection = self.connection_from(source).await?;
        self.execute_on(connection.as_ref(), sql, params).await
    }

    pub async fn execute_on(
        &self,
        connection: &dyn Connection,
        sql: &str,
        params: &[SqlParam],
    ) -> Result<u64> {
        debug!("executing [{}]", sql);
        let mut statement = connection.prepare(sql).map_err(|e| query_error(sql, e))?;
        statement
            .execute(params)
            .await
            .map_err(|e| query_error(sql, e))
    }
}

fn query_error(sql: &str, source: BoxError) -> ExecuteError {
    ExecuteError::QueryExecution {
        sql: sql.to_string(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::Statement;
    use async_trait::async_trait;
    use chrono::{DateTime, NaiveDate, Utc};
    use docgate_core::Value;
    use docgate_marshal::{ResultCursor, ResultMetadata};
    use std::sync::Mutex;

    struct Meta {
        labels: Vec<&'static str>,
    }

    impl ResultMetadata for Meta {
        fn column_count(&self) -> usize {
            self.labels.len()
        }

        fn value_type_name(&self, _column: usize) -> Option<&str> {
            Some("BIGINT")
        }

        fn db_type_name(&self, _column: usize) -> Option<&str> {
            Some("BIGINT")
        }

        fn scale(&self, _column: usize) -> Option<i32> {
            None
        }

        fn column_label(&self, column: usize) -> &str {
            self.labels[column]
        }
    }

    struct Cursor {
        meta: Meta,
        rows: Vec<Vec<i64>>,
        row: Option<usize>,
    }

    impl ResultCursor for Cursor {
        fn metadata(&self) -> &dyn ResultMetadata {
            &self.meta
        }

        fn advance(&mut self) -> std::result::Result<bool, BoxError> {
            let next = self.row.map_or(0, |r| r + 1);
            if next < self.rows.len() {
                self.row = Some(next);
                Ok(true)
            } else {
                Ok(false)
            }
        }

        fn get_string(&self, _column: usize) -> std::result::Result<Option<String>, BoxError> {
            Err("not a string column".into())
        }

        fn get_f64(&self, _column: usize) -> std::result::Result<Option<f64>, BoxError> {
            Err("not a double column".into())
        }

        fn get_i32(&self, _column: usize) -> std::result::Result<Option<i32>, BoxError> {
            Err("not an integer column".into())
        }

        fn get_i64(&self, column: usize) -> std::result::Result<Option<i64>, BoxError> {
            Ok(Some(self.rows[self.row.unwrap()][column]))
        }

        fn get_bool(&self, _column: usize) -> std::result::Result<Option<bool>, BoxError> {
            Err("not a boolean column".into())
        }

        fn get_date(&self, _column: usize) -> std::result::Result<Option<NaiveDate>, BoxError> {
            Err("not a date column".into())
        }

        fn get_timestamp(
            &self,
            _column: usize,
        ) -> std::result::Result<Option<DateTime<Utc>>, BoxError> {
            Err("not a timestamp column".into())
        }
    }

    struct FakeStatement {
        rows: Vec<Vec<i64>>,
        fail: bool,
        bound: Arc<Mutex<Vec<Vec<SqlParam>>>>,
    }

    #[async_trait]
    impl Statement for FakeStatement {
        async fn query(
            &mut self,
            params: &[SqlParam],
        ) -> std::result::Result<Box<dyn ResultCursor>, BoxError> {
            if self.fail {
                return Err("syntax error".into());
            }
            self.bound.lock().unwrap().push(params.to_vec());
            Ok(Box::new(Cursor {
                meta: Meta {
                    labels: vec!["USER_ID", "LOGIN_COUNT"],
                },
                rows: self.rows.clone(),
                row: None,
            }))
        }

        async fn execute(&mut self, params: &[SqlParam]) -> std::result::Result<u64, BoxError> {
            if self.fail {
                return Err("constraint violation".into());
            }
            self.bound.lock().unwrap().push(params.to_vec());
            Ok(self.rows.len() as u64)
        }
    }

    struct FakeConnection {
        rows: Vec<Vec<i64>>,
        fail: bool,
        bound: Arc<Mutex<Vec<Vec<SqlParam>>>>,
    }

    impl Connection for FakeConnection {
        fn prepare(&self, _sql: &str) -> std::result::Result<Box<dyn Statement>, BoxError> {
            Ok(Box::new(FakeStatement {
                rows: self.rows.clone(),
                fail: self.fail,
                bound: Arc::clone(&self.bound),
            }))
        }
    }

    struct FakeProvider {
        rows: Vec<Vec<i64>>,
        fail_acquire: bool,
        fail_query: bool,
        bound: Arc<Mutex<Vec<Vec<SqlParam>>>>,
    }

    impl FakeProvider {
        fn with_rows(rows: Vec<Vec<i64>>) -> Self {
            Self {
                rows,
                fail_acquire: false,
                fail_query: false,
                bound: Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    #[async_trait]
    impl ConnectionProvider for FakeProvider {
        async fn connection(
            &self,
            source: &str,
        ) -> std::result::Result<Box<dyn Connection>, BoxError> {
            if self.fail_acquire {
                return Err(format!("pool exhausted for {source}").into());
            }
            Ok(Box::new(FakeConnection {
                rows: self.rows.clone(),
                fail: self.fail_query,
                bound: Arc::clone(&self.bound),
            }))
        }
    }

    fn executor(provider: FakeProvider) -> QueryExecutor {
        QueryExecutor::new(Arc::new(provider), "main")
    }

    #[tokio::test]
    async fn test_load_one_returns_first_row() {
        let executor = executor(FakeProvider::with_rows(vec![vec![1, 10], vec![2, 20]]));
        let document = executor
            .load_one("SELECT USER_ID, LOGIN_COUNT FROM USERS", &[])
            .await
            .unwrap()
            .unwrap();
        assert_eq!(document.get("userID"), Some(&Value::Int(1)));
        assert_eq!(document.get("loginCount"), Some(&Value::Int(10)));
    }

    #[tokio::test]
    async fn test_load_one_without_rows_is_none() {
        let executor = executor(FakeProvider::with_rows(vec![]));
        let result = executor
            .load_one("SELECT USER_ID FROM USERS WHERE 1=0", &[])
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_load_many_returns_all_rows() {
        let executor = executor(FakeProvider::with_rows(vec![vec![1, 10], vec![2, 20]]));
        let documents = executor
            .load_many("SELECT USER_ID, LOGIN_COUNT FROM USERS", &[])
            .await
            .unwrap();
        assert_eq!(documents.len(), 2);
        assert_eq!(documents[1].get("userID"), Some(&Value::Int(2)));
    }

    #[tokio::test]
    async fn test_acquisition_failure_names_the_source() {
        let mut provider = FakeProvider::with_rows(vec![]);
        provider.fail_acquire = true;
        let executor = executor(provider);
        let err = executor.load_one("SELECT 1", &[]).await.unwrap_err();
        match err {
            ExecuteError::ConnectionAcquisition { source_name, .. } => {
                assert_eq!(source_name, "main");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_query_failure_carries_the_sql() {
        let mut provider = FakeProvider::with_rows(vec![]);
        provider.fail_query = true;
        let executor = executor(provider);
        let err = executor
            .load_many("SELECT BROKEN", &[])
            .await
            .unwrap_err();
        match err {
            ExecuteError::QueryExecution { sql, .. } => assert_eq!(sql, "SELECT BROKEN"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_parameters_bind_in_call_order() {
        let provider = FakeProvider::with_rows(vec![vec![1, 10]]);
        let bound = Arc::clone(&provider.bound);
        let executor = executor(provider);

        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        let at = DateTime::from_timestamp_millis(1_700_000_000_000).unwrap();
        let params = vec![
            SqlParam::from(42i64),
            SqlParam::Null,
            SqlParam::from(date),
            SqlParam::from(at),
        ];
        executor
            .load_one("SELECT USER_ID, LOGIN_COUNT FROM USERS WHERE ...", &params)
            .await
            .unwrap();

        let recorded = bound.lock().unwrap();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0], params);
        assert!(matches!(recorded[0][2], SqlParam::Date(_)));
        assert!(matches!(recorded[0][3], SqlParam::Timestamp(_)));
    }

    #[tokio::test]
    async fn test_execute_returns_affected_count() {
        let executor = executor(FakeProvider::with_rows(vec![vec![1, 10], vec![2, 20]]));
        let affected = executor
            .execute("UPDATE USERS SET LOGIN_COUNT = 0", &[])
            .await
            .unwrap();
        assert_eq!(affected, 2);
    }

    #[tokio::test]
    async fn test_load_on_reuses_the_callers_connection() {
        let bound = Arc::new(Mutex::new(Vec::new()));
        let connection = FakeConnection {
            rows: vec![vec![7, 70]],
            fail: false,
            bound: Arc::clone(&bound),
        };
        let executor = executor(FakeProvider::with_rows(vec![]));

        let document = executor
            .load_one_on(&connection, "SELECT USER_ID, LOGIN_COUNT FROM USERS", &[])
            .await
            .unwrap()
            .unwrap();
        assert_eq!(document.get("userID"), Some(&Value::Int(7)));
    }
}
