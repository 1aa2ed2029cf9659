// Operation lifecycle tracking
//
// Every tracked call moves Idle/Failed -> Loading -> Succeeded | Failed.
// Starting an operation that is already Loading or Succeeded is allowed:
// same-kind calls are not deduplicated and the last one to resolve wins.

use serde::Serialize;
use std::fmt;

/// Lifecycle phase of a tracked operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Idle,
    Loading,
    Succeeded,
    Failed,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Idle => write!(f, "idle"),
            Phase::Loading => write!(f, "loading"),
            Phase::Succeeded => write!(f, "succeeded"),
            Phase::Failed => write!(f, "failed"),
        }
    }
}

/// Phase plus the message captured on failure
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct OperationStatus {
    pub phase: Phase,
    pub error: Option<String>,
}

impl OperationStatus {
    pub fn start(&mut self) {
        self.phase = Phase::Loading;
        self.error = None;
    }

    pub fn succeed(&mut self) {
        self.phase = Phase::Succeeded;
        self.error = None;
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.phase = Phase::Failed;
        self.error = Some(message.into());
    }

    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }

    /// Whether a lazy fetch should (re)issue the request
    pub fn needs_fetch(&self) -> bool {
        matches!(self.phase, Phase::Idle | Phase::Failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle_transitions() {
        let mut status = OperationStatus::default();
        assert_eq!(status.phase, Phase::Idle);
        assert!(status.needs_fetch());

        status.start();
        assert!(status.is_loading());
        assert!(!status.needs_fetch());

        status.fail("db down");
        assert_eq!(status.phase, Phase::Failed);
        assert_eq!(status.error.as_deref(), Some("db down"));
        assert!(status.needs_fetch());

        status.start();
        assert_eq!(status.error, None);

        status.succeed();
        assert_eq!(status.phase, Phase::Succeeded);
        assert!(!status.needs_fetch());
    }
}
