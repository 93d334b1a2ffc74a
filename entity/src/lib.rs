//! sea-orm entities for the tallyman schema.

pub mod prelude;

pub mod campaign;
pub mod campaign_entity;
pub mod campaign_killmail;
pub mod campaign_location;
pub mod killmail;
pub mod killmail_participant;
pub mod pipeline_lock;
pub mod pipeline_run;
pub mod scope_watermark;
pub mod sea_orm_active_enums;
