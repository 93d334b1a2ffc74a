//! ESI killmail hydration.

use super::UpstreamHttp;
use crate::server::{
    error::fetch::FetchError,
    model::killmail::{KillmailDetail, KillmailRef, RawRecord},
};

pub struct EsiClient {
    http: UpstreamHttp,
    base_url: String,
}

impl EsiClient {
    pub fn new(http: UpstreamHttp, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Fetch the body of a summary entry and combine it with its zKillboard metadata.
    ///
    /// # Returns
    /// - `Ok(RawRecord)` - Complete killmail
    /// - `Err(FetchError::Malformed)` - ESI returned a different killmail than requested
    /// - `Err(FetchError)` - Request failed, classified like zKillboard page failures
    pub async fn killmail(&self, reference: &KillmailRef) -> Result<RawRecord, FetchError> {
        let url = format!(
            "{}/killmails/{}/{}/",
            self.base_url, reference.killmail_id, reference.zkb.hash
        );

        let detail: KillmailDetail = self.http.get_json(&url).await?;

        if detail.killmail_id != reference.killmail_id {
            return Err(FetchError::Malformed {
                url,
                reason: format!(
                    "expected killmail {}, got {}",
                    reference.killmail_id, detail.killmail_id
                ),
            });
        }

        Ok(RawRecord::from_parts(reference.zkb.clone(), detail))
    }
}
