//! Detector port - cheap binary ambiguity check.

use async_trait::async_trait;

use super::errors::PortError;

/// Outcome of a detection call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Detection {
    pub is_ambiguous: bool,
}

/// Port for the low-cost tier that decides whether a query is ambiguous.
///
/// Implementations validate the raw capability output themselves and return
/// `PortError::SchemaViolation` when it cannot be interpreted.
#[async_trait]
pub trait Detector: Send + Sync {
    /// Classify a query as ambiguous or clear.
    async fn classify(&self, query: &str) -> Result<Detection, PortError>;

    /// Verify the backing capability is reachable.
    ///
    /// Defaults to healthy for in-process implementations.
    async fn check_connection(&self) -> Result<(), PortError> {
        Ok(())
    }
}
