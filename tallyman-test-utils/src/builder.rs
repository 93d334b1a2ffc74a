//! Declarative test builder.
//!
//! This module provides the `TestBuilder` API for configuring test environments before execution.
//! The builder pattern allows chaining multiple configuration methods together, with all operations
//! queued and executed during the final `build()` call.

use chrono::{DateTime, Utc};
use entity::sea_orm_active_enums::{EntityKind, LocationKind};
use sea_orm::{sea_query::TableCreateStatement, EntityTrait, Schema};
use serde_json::Value;

use crate::{error::TestError, TestContext};

/// Campaign fixture queued for insertion.
struct CampaignFixture {
    name: String,
    start_date: DateTime<Utc>,
    locations: Vec<(LocationKind, i64)>,
    /// (kind, id, corporation_id, alliance_id)
    entities: Vec<(EntityKind, i64, Option<i64>, Option<i64>)>,
}

/// Builder for declarative test initialization.
///
/// Provides an interface for setting up test environments with database tables,
/// campaign fixtures, and zKillboard/ESI endpoints. Methods can be chained together and
/// finalized with `build()` to create a complete test setup.
pub struct TestBuilder {
    // Tables to create
    tables: Vec<TableCreateStatement>,
    include_pipeline_tables: bool,

    // Database fixtures to insert
    campaigns: Vec<CampaignFixture>,

    // Pre-configured endpoint shortcuts
    zkill_pages: Vec<(String, u32, Vec<Value>, usize)>, // (scope_path, page, entries, expected_requests)
    esi_killmails: Vec<(i64, String, Value, usize)>,    // (killmail_id, hash, body, expected_requests)
}

impl TestBuilder {
    /// Create a new TestBuilder.
    pub fn new() -> Self {
        Self {
            tables: Vec::new(),
            include_pipeline_tables: false,
            campaigns: Vec::new(),
            zkill_pages: Vec::new(),
            esi_killmails: Vec::new(),
        }
    }

    /// Add every table the ingestion pipeline touches.
    ///
    /// Creates Campaign, CampaignLocation, CampaignEntity, Killmail, KillmailParticipant,
    /// CampaignKillmail, ScopeWatermark, PipelineLock and PipelineRun, parents before children.
    ///
    /// # Returns
    /// - `Self` - The builder instance for method chaining
    pub fn with_pipeline_tables(mut self) -> Self {
        self.include_pipeline_tables = true;
        self
    }

    /// Add a custom entity table to the test database.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use tallyman_test_utils::TestBuilder;
    /// use entity::prelude::*;
    ///
    /// # async fn example() -> Result<(), tallyman_test_utils::TestError> {
    /// let test = TestBuilder::new()
    ///     .with_table(PipelineLock)
    ///     .build()
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn with_table<E: EntityTrait>(mut self, entity: E) -> Self {
        let schema = Schema::new(sea_orm::DbBackend::Sqlite);
        self.tables.push(schema.create_table_from_entity(entity));
        self
    }

    /// Insert an active campaign scoped to one location.
    ///
    /// # Arguments
    /// - `name` - Campaign name
    /// - `start_date` - Campaign start
    /// - `kind` - Location kind
    /// - `location_id` - System, constellation or region ID
    pub fn with_location_campaign(
        mut self,
        name: &str,
        start_date: DateTime<Utc>,
        kind: LocationKind,
        location_id: i64,
    ) -> Self {
        self.campaigns.push(CampaignFixture {
            name: name.to_string(),
            start_date,
            locations: vec![(kind, location_id)],
            entities: Vec::new(),
        });
        self
    }

    /// Insert an active campaign tracking friendly entities.
    ///
    /// # Arguments
    /// - `entities` - (kind, id, corporation_id, alliance_id) for each tracked entity
    pub fn with_entity_campaign(
        mut self,
        name: &str,
        start_date: DateTime<Utc>,
        entities: Vec<(EntityKind, i64, Option<i64>, Option<i64>)>,
    ) -> Self {
        self.campaigns.push(CampaignFixture {
            name: name.to_string(),
            start_date,
            locations: Vec::new(),
            entities,
        });
        self
    }

    /// Add a zKillboard `pastSeconds` page endpoint.
    ///
    /// # Arguments
    /// - `scope_path` - Modifier and ID, e.g. `systemID/30000142`
    /// - `page` - 1-based page number
    /// - `entries` - Page entries returned as a JSON array
    /// - `expected_requests` - Number of times this endpoint should be called
    pub fn with_zkill_page(
        mut self,
        scope_path: &str,
        page: u32,
        entries: Vec<Value>,
        expected_requests: usize,
    ) -> Self {
        self.zkill_pages
            .push((scope_path.to_string(), page, entries, expected_requests));
        self
    }

    /// Add an ESI killmail endpoint.
    pub fn with_esi_killmail(
        mut self,
        killmail_id: i64,
        hash: &str,
        body: Value,
        expected_requests: usize,
    ) -> Self {
        self.esi_killmails
            .push((killmail_id, hash.to_string(), body, expected_requests));
        self
    }

    /// Build the test setup by creating all configured tables, fixtures, and mock endpoints.
    ///
    /// Executes all queued operations in the following order:
    /// 1. Creates database tables (pipeline tables if specified, then custom tables)
    /// 2. Inserts campaign fixtures with their locations and entities
    /// 3. Creates mock zKillboard and ESI endpoints
    ///
    /// # Returns
    /// - `Ok(TestContext)` - Fully configured test environment ready for use
    /// - `Err(TestError::DbErr)` - Database table creation or fixture insertion failed
    pub async fn build(self) -> Result<TestContext, TestError> {
        let mut setup = TestContext::new().await?;

        // 1. Create tables
        let mut all_tables = Vec::new();

        if self.include_pipeline_tables {
            let schema = Schema::new(sea_orm::DbBackend::Sqlite);
            all_tables.extend(vec![
                schema.create_table_from_entity(entity::prelude::Campaign),
                schema.create_table_from_entity(entity::prelude::CampaignLocation),
                schema.create_table_from_entity(entity::prelude::CampaignEntity),
                schema.create_table_from_entity(entity::prelude::Killmail),
                schema.create_table_from_entity(entity::prelude::KillmailParticipant),
                schema.create_table_from_entity(entity::prelude::CampaignKillmail),
                schema.create_table_from_entity(entity::prelude::ScopeWatermark),
                schema.create_table_from_entity(entity::prelude::PipelineLock),
                schema.create_table_from_entity(entity::prelude::PipelineRun),
            ]);
        }

        all_tables.extend(self.tables);
        setup.with_tables(all_tables).await?;

        // 2. Insert campaign fixtures
        for fixture in self.campaigns {
            let campaign = setup
                .campaigns()
                .insert_campaign(&fixture.name, fixture.start_date)
                .await?;

            for (kind, location_id) in fixture.locations {
                setup
                    .campaigns()
                    .insert_location(campaign.id, kind, location_id)
                    .await?;
            }

            for (kind, entity_id, corporation_id, alliance_id) in fixture.entities {
                setup
                    .campaigns()
                    .insert_entity(campaign.id, kind, entity_id, corporation_id, alliance_id)
                    .await?;
            }
        }

        // 3. Create mock endpoints
        let mut mocks = Vec::new();

        for (scope_path, page, entries, expected) in self.zkill_pages {
            mocks.push(
                setup
                    .upstream()
                    .create_zkill_page_endpoint(&scope_path, page, entries, expected),
            );
        }

        for (killmail_id, hash, body, expected) in self.esi_killmails {
            mocks.push(
                setup
                    .upstream()
                    .create_esi_killmail_endpoint(killmail_id, &hash, body, expected),
            );
        }

        // Store mocks in setup so they live as long as the test
        setup.mocks = mocks;

        Ok(setup)
    }
}

impl Default for TestBuilder {
    fn default() -> Self {
        Self::new()
    }
}
