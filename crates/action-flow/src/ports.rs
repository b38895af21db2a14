use async_trait::async_trait;
use watchlater_core_types::{Target, TargetRef, TargetScope};

use crate::errors::HostError;

/// The browser-side owner of targets.
#[async_trait]
pub trait TargetHost: Send + Sync {
    /// Targets currently open in the scope, in host order.
    async fn enumerate(&self, scope: TargetScope) -> Result<Vec<TargetRef>, HostError>;

    /// Close the target.
    async fn remove(&self, target: &Target) -> Result<(), HostError>;

    /// Hard-reload the target and return its fresh reference.
    async fn refresh(&self, target: &Target) -> Result<TargetRef, HostError>;
}
