//! zKillboard and ESI mock endpoint creation utilities.
//!
//! Endpoints are registered with the context's mockito server and verify they were called the
//! expected number of times when `assert_mocks` runs.

use mockito::{Matcher, Mock};
use serde_json::Value;

use crate::TestContext;

impl TestContext {
    pub fn upstream<'a>(&'a mut self) -> UpstreamFixtures<'a> {
        UpstreamFixtures { setup: self }
    }
}

pub struct UpstreamFixtures<'a> {
    pub setup: &'a mut TestContext,
}

impl<'a> UpstreamFixtures<'a> {
    /// Create a mock zKillboard page served through the `pastSeconds` window.
    ///
    /// The window length depends on the current time, so any value matches.
    ///
    /// # Arguments
    /// - `scope_path` - Modifier and ID, e.g. `systemID/30000142`
    /// - `page` - 1-based page number
    /// - `entries` - Page entries to return as a JSON array
    /// - `expected_requests` - Number of times this endpoint should be called
    pub fn create_zkill_page_endpoint(
        &mut self,
        scope_path: &str,
        page: u32,
        entries: Vec<Value>,
        expected_requests: usize,
    ) -> Mock {
        self.setup
            .server
            .mock(
                "GET",
                Matcher::Regex(format!(
                    r"^/api/{}/pastSeconds/\d+/page/{}/$",
                    scope_path, page
                )),
            )
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(Value::Array(entries).to_string())
            .expect(expected_requests)
            .create()
    }

    /// Create a mock zKillboard page for one calendar month.
    pub fn create_zkill_month_endpoint(
        &mut self,
        scope_path: &str,
        year: i32,
        month: u32,
        page: u32,
        entries: Vec<Value>,
        expected_requests: usize,
    ) -> Mock {
        self.setup
            .server
            .mock(
                "GET",
                format!(
                    "/api/{}/year/{}/month/{}/page/{}/",
                    scope_path, year, month, page
                )
                .as_str(),
            )
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(Value::Array(entries).to_string())
            .expect(expected_requests)
            .create()
    }

    /// Create a mock zKillboard page that answers with a bare status code.
    pub fn create_zkill_status_endpoint(
        &mut self,
        scope_path: &str,
        page: u32,
        status: usize,
        expected_requests: usize,
    ) -> Mock {
        self.setup
            .server
            .mock(
                "GET",
                Matcher::Regex(format!(
                    r"^/api/{}/pastSeconds/\d+/page/{}/$",
                    scope_path, page
                )),
            )
            .with_status(status)
            .expect(expected_requests)
            .create()
    }

    /// Create a mock ESI killmail endpoint at `/killmails/{id}/{hash}/`.
    pub fn create_esi_killmail_endpoint(
        &mut self,
        killmail_id: i64,
        hash: &str,
        body: Value,
        expected_requests: usize,
    ) -> Mock {
        self.setup
            .server
            .mock("GET", format!("/killmails/{}/{}/", killmail_id, hash).as_str())
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .expect(expected_requests)
            .create()
    }
}
