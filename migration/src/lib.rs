pub use sea_orm_migration::prelude::*;

mod m20261017_000001_campaign;
mod m20261017_000002_campaign_location;
mod m20261017_000003_campaign_entity;
mod m20261017_000004_killmail;
mod m20261017_000005_killmail_participant;
mod m20261017_000006_scope_watermark;
mod m20261017_000007_pipeline_lock;
mod m20261017_000008_pipeline_run;
mod m20261017_000009_campaign_killmail;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20261017_000001_campaign::Migration),
            Box::new(m20261017_000002_campaign_location::Migration),
            Box::new(m20261017_000003_campaign_entity::Migration),
            Box::new(m20261017_000004_killmail::Migration),
            Box::new(m20261017_000005_killmail_participant::Migration),
            Box::new(m20261017_000006_scope_watermark::Migration),
            Box::new(m20261017_000007_pipeline_lock::Migration),
            Box::new(m20261017_000008_pipeline_run::Migration),
            Box::new(m20261017_000009_campaign_killmail::Migration),
        ]
    }
}
