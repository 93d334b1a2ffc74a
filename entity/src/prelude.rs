pub use super::campaign::Entity as Campaign;
pub use super::campaign_entity::Entity as CampaignEntity;
pub use super::campaign_killmail::Entity as CampaignKillmail;
pub use super::campaign_location::Entity as CampaignLocation;
pub use super::killmail::Entity as Killmail;
pub use super::killmail_participant::Entity as KillmailParticipant;
pub use super::pipeline_lock::Entity as PipelineLock;
pub use super::pipeline_run::Entity as PipelineRun;
pub use super::scope_watermark::Entity as ScopeWatermark;
