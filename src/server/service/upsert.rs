//! Idempotent killmail persistence.
//!
//! Every record is keyed by its upstream killmail ID. Re-ingesting a record either does nothing
//! (same content hash) or overwrites it in place (upstream correction), so overlapping scopes and
//! watermark overlap windows never produce duplicate rows.

use std::{
    collections::HashMap,
    sync::{Mutex, PoisonError},
};

use chrono::{DateTime, Utc};
use sea_orm::{ConnectionTrait, DatabaseConnection, TransactionTrait};

use crate::server::{
    data::{
        campaign_killmail::CampaignKillmailRepository, killmail::KillmailRepository,
        participant::ParticipantRepository,
    },
    error::Error,
    model::{
        campaign::CampaignLink,
        killmail::{Involvement, RawRecord, UpsertOutcome},
    },
    service::retry::RetryContext,
    util::time::from_db,
};

/// Default number of records committed per transaction.
pub const DEFAULT_BATCH_SIZE: usize = 100;

pub struct Upserter {
    db: DatabaseConnection,
    batch_size: usize,
    retry: RetryContext,
    /// Killmail ID to content hash and kill time for everything committed or looked up during
    /// this run.
    seen: Mutex<HashMap<i64, (String, DateTime<Utc>)>>,
}

impl Upserter {
    pub fn new(db: DatabaseConnection, batch_size: usize) -> Self {
        Self {
            db,
            batch_size: batch_size.max(1),
            retry: RetryContext::new(),
            seen: Mutex::new(HashMap::new()),
        }
    }

    /// Look up a killmail already stored with this exact content.
    ///
    /// Used by the fetch loop to avoid hydrating summary entries it would only skip.
    ///
    /// # Returns
    /// - `Ok(Some(occurred_at))` - Stored with the same content hash
    /// - `Ok(None)` - Not stored, or stored with different content
    pub async fn stored_at(
        &self,
        killmail_id: i64,
        content_hash: &str,
    ) -> Result<Option<DateTime<Utc>>, Error> {
        if let Some((hash, occurred_at)) = self.cached(killmail_id) {
            return Ok((hash == content_hash).then_some(occurred_at));
        }

        let stored = KillmailRepository::new(&self.db)
            .find_by_upstream_id(killmail_id)
            .await?;

        Ok(match stored {
            Some(model) => {
                let occurred_at = from_db(model.occurred_at);
                let matches = model.content_hash == content_hash;
                self.remember([(killmail_id, model.content_hash, occurred_at)]);
                matches.then_some(occurred_at)
            }
            None => None,
        })
    }

    /// Involvement of a stored killmail, for attributing it to campaigns without refetching.
    pub async fn stored_involvement(&self, killmail_id: i64) -> Result<Option<Involvement>, Error> {
        let Some(killmail) = KillmailRepository::new(&self.db)
            .find_by_upstream_id(killmail_id)
            .await?
        else {
            return Ok(None);
        };

        let participants = ParticipantRepository::new(&self.db)
            .find_by_killmail(killmail_id)
            .await?;

        Ok(Some(Involvement::from_stored(&killmail, &participants)))
    }

    /// Link stored killmails to the campaigns they count towards.
    pub async fn link(&self, links: &[CampaignLink]) -> Result<(), Error> {
        CampaignKillmailRepository::new(&self.db).link(links).await?;

        Ok(())
    }

    /// Persist a single record in its own transaction.
    pub async fn process(&self, record: &RawRecord) -> Result<UpsertOutcome, Error> {
        let outcomes = self.process_batch(std::slice::from_ref(record)).await?;

        outcomes
            .into_iter()
            .next()
            .ok_or_else(|| Error::InternalError("empty batch result for one record".to_string()))
    }

    /// Persist records in transactions of at most `batch_size`.
    ///
    /// Chunks commit independently: when a later chunk fails, earlier chunks stay committed and
    /// the error is returned.
    ///
    /// # Returns
    /// One outcome per record, in input order.
    pub async fn process_batch(&self, records: &[RawRecord]) -> Result<Vec<UpsertOutcome>, Error> {
        let mut outcomes = Vec::with_capacity(records.len());

        for chunk in records.chunks(self.batch_size) {
            let description = format!("batch of {} killmail(s)", chunk.len());
            let chunk_outcomes = self
                .retry
                .execute_with_retry(&description, || self.commit_chunk(chunk))
                .await?;

            self.remember(
                chunk.iter().map(|record| {
                    (
                        record.killmail_id,
                        record.content_hash.clone(),
                        record.occurred_at,
                    )
                }),
            );
            outcomes.extend(chunk_outcomes);
        }

        Ok(outcomes)
    }

    async fn commit_chunk(&self, chunk: &[RawRecord]) -> Result<Vec<UpsertOutcome>, Error> {
        let txn = self.db.begin().await?;

        let mut outcomes = Vec::with_capacity(chunk.len());
        for record in chunk {
            outcomes.push(self.persist(&txn, record).await?);
        }

        txn.commit().await?;

        Ok(outcomes)
    }

    async fn persist<C: ConnectionTrait>(
        &self,
        db: &C,
        record: &RawRecord,
    ) -> Result<UpsertOutcome, Error> {
        let killmail_repo = KillmailRepository::new(db);

        let stored_hash = match self.cached(record.killmail_id) {
            Some((hash, _)) => Some(hash),
            None => killmail_repo
                .find_by_upstream_id(record.killmail_id)
                .await?
                .map(|model| model.content_hash),
        };

        let outcome = match stored_hash {
            None => {
                if killmail_repo.insert_if_absent(record).await? {
                    UpsertOutcome::Inserted
                } else {
                    // Another scope committed the same killmail between lookup and insert
                    let winner = killmail_repo
                        .find_by_upstream_id(record.killmail_id)
                        .await?
                        .map(|model| model.content_hash);
                    self.compare_and_update(db, record, winner).await?
                }
            }
            existing => self.compare_and_update(db, record, existing).await?,
        };

        if outcome != UpsertOutcome::SkippedDuplicate {
            let participants = record.participants();
            let keep: Vec<i64> = participants.iter().map(|p| p.character_id).collect();

            let participant_repo = ParticipantRepository::new(db);
            if outcome == UpsertOutcome::Updated {
                participant_repo
                    .delete_except(record.killmail_id, &keep)
                    .await?;
            }
            participant_repo
                .upsert_participants(record.killmail_id, &participants)
                .await?;
        }

        tracing::trace!(
            killmail_id = record.killmail_id,
            "Persisted killmail: {:?}",
            outcome
        );

        Ok(outcome)
    }

    async fn compare_and_update<C: ConnectionTrait>(
        &self,
        db: &C,
        record: &RawRecord,
        stored_hash: Option<String>,
    ) -> Result<UpsertOutcome, Error> {
        match stored_hash {
            Some(hash) if hash == record.content_hash => Ok(UpsertOutcome::SkippedDuplicate),
            Some(_) => {
                KillmailRepository::new(db).upsert_killmail(record).await?;
                Ok(UpsertOutcome::Updated)
            }
            None => Err(Error::InternalError(format!(
                "killmail {} vanished between insert conflict and re-read",
                record.killmail_id
            ))),
        }
    }

    fn cached(&self, killmail_id: i64) -> Option<(String, DateTime<Utc>)> {
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&killmail_id)
            .cloned()
    }

    fn remember(&self, entries: impl IntoIterator<Item = (i64, String, DateTime<Utc>)>) {
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend(
                entries
                    .into_iter()
                    .map(|(killmail_id, hash, occurred_at)| (killmail_id, (hash, occurred_at))),
            );
    }
}
