use std::fmt;

use crate::server::error::Error;

/// Lifecycle of a pipeline run.
///
/// The run as a whole moves `Idle → Locking → Planning → Fetching → Finalizing → Idle`; each
/// scope alternates between `Fetching` and `Persisting` while it pages. A run that cannot take
/// the lock ends in `Aborted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Locking,
    Planning,
    Fetching,
    Persisting,
    Finalizing,
    Aborted,
}

impl PipelineState {
    pub fn can_transition_to(self, next: PipelineState) -> bool {
        use PipelineState::*;

        matches!(
            (self, next),
            (Idle, Locking)
                | (Locking, Planning)
                | (Locking, Aborted)
                | (Planning, Fetching)
                | (Planning, Finalizing)
                | (Fetching, Persisting)
                | (Fetching, Finalizing)
                | (Persisting, Fetching)
                | (Persisting, Finalizing)
                | (Finalizing, Idle)
                | (Aborted, Idle)
        )
    }

    /// Move to `next`, rejecting transitions the lifecycle does not allow.
    pub fn transition(&mut self, next: PipelineState) -> Result<(), Error> {
        if !self.can_transition_to(next) {
            return Err(Error::InternalError(format!(
                "invalid pipeline transition {} -> {}",
                self, next
            )));
        }

        tracing::debug!("Pipeline {} -> {}", self, next);
        *self = next;

        Ok(())
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Locking => "locking",
            Self::Planning => "planning",
            Self::Fetching => "fetching",
            Self::Persisting => "persisting",
            Self::Finalizing => "finalizing",
            Self::Aborted => "aborted",
        };
        f.write_str(name)
    }
}
