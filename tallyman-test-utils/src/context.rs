//! Test context structure and utilities.
//!
//! This module provides the `TestContext` returned by `TestBuilder`. The context holds an
//! in-memory SQLite database and a mock HTTP server standing in for both zKillboard and ESI.

use mockito::{Mock, Server, ServerGuard};
use sea_orm::{sea_query::TableCreateStatement, ConnectionTrait, Database, DatabaseConnection};

use crate::error::TestError;

/// Test context structure returned by `TestBuilder`
///
/// # Usage
///
/// ```ignore
/// let mut test = TestBuilder::new().with_pipeline_tables().build().await?;
///
/// // Point the pipeline's upstream URLs at the mock server
/// let url = test.server_url();
///
/// // Insert fixtures
/// test.campaigns().insert_campaign("Jita", start).await?;
///
/// // Assert all mocks were called
/// test.assert_mocks();
/// ```
pub struct TestContext {
    /// Database connection to in-memory SQLite database
    pub db: DatabaseConnection,

    /// Mock HTTP server for zKillboard and ESI endpoints
    pub server: ServerGuard,
    /// Collection of mock HTTP endpoints for assertion
    pub(crate) mocks: Vec<Mock>,
}

impl TestContext {
    /// Create a new test context.
    ///
    /// # Returns
    /// - `Ok(TestContext)` - Fresh database and mock server
    /// - `Err(TestError::DbErr)` - Database connection failed
    pub(crate) async fn new() -> Result<Self, TestError> {
        let server = Server::new_async().await;
        let db = Database::connect("sqlite::memory:").await?;

        Ok(TestContext {
            db,
            server,
            mocks: Vec::new(),
        })
    }

    /// Base URL of the mock server, usable as both the zKillboard and ESI base URL.
    pub fn server_url(&self) -> String {
        self.server.url()
    }

    /// Create database tables from schema statements.
    pub(crate) async fn with_tables(
        &self,
        stmts: Vec<TableCreateStatement>,
    ) -> Result<(), TestError> {
        for stmt in stmts {
            self.db.execute(&stmt).await?;
        }

        Ok(())
    }

    /// Keep a mock created after `build()` alive and include it in `assert_mocks`.
    pub fn track_mock(&mut self, mock: Mock) {
        self.mocks.push(mock);
    }

    /// Assert all mock endpoints were called as expected.
    ///
    /// # Panics
    /// Panics if any mock endpoint was not called the expected number of times
    pub fn assert_mocks(&self) {
        for mock in &self.mocks {
            mock.assert();
        }
    }
}
