//! Device position collaborator.

use async_trait::async_trait;
use std::fmt::Debug;
use tokio_util::sync::CancellationToken;

use crate::{error::LocationError, model::Coordinates};

/// One-shot, high-accuracy position lookup.
///
/// Implementations must stop and return [`LocationError::Cancelled`] once
/// `cancel` fires.
#[async_trait]
pub trait DeviceLocator: Send + Sync + Debug {
    async fn current_position(&self, cancel: &CancellationToken) -> Result<Coordinates, LocationError>;
}

/// Locator that answers with a preset outcome (a manual fix, or an error).
#[derive(Debug, Clone)]
pub struct FixedLocator {
    outcome: Result<Coordinates, LocationError>,
}

impl FixedLocator {
    pub fn at(latitude: f64, longitude: f64) -> Self {
        Self {
            outcome: Ok(Coordinates::new(latitude, longitude)),
        }
    }

    pub fn failing(error: LocationError) -> Self {
        Self { outcome: Err(error) }
    }
}

#[async_trait]
impl DeviceLocator for FixedLocator {
    async fn current_position(&self, cancel: &CancellationToken) -> Result<Coordinates, LocationError> {
        if cancel.is_cancelled() {
            return Err(LocationError::Cancelled);
        }
        self.outcome.clone()
    }
}
