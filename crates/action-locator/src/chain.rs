//! Surface locator with fallback chain orchestration

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};
use watchlater_core_types::Target;

use crate::{errors::LocatorError, locator::ActionSurfaceLocator, paths::*, types::*};

/// Locator that tries each applicable path in order and keeps the first
/// surface that opens.
pub struct PathChainLocator {
    paths: Vec<Arc<dyn SurfacePath>>,
    controls: Arc<dyn SurfaceControls>,
}

impl PathChainLocator {
    /// Create a locator; `paths` are tried in the order given
    pub fn new(paths: Vec<Arc<dyn SurfacePath>>, controls: Arc<dyn SurfaceControls>) -> Self {
        Self { paths, controls }
    }

    /// Paths applicable to the target, in priority order
    fn applicable(&self, target: &Target) -> impl Iterator<Item = &Arc<dyn SurfacePath>> {
        let kind = target.kind;
        self.paths.iter().filter(move |path| path.applies_to(kind))
    }
}

#[async_trait]
impl ActionSurfaceLocator for PathChainLocator {
    async fn open(&self, target: &Target) -> Result<OpenOutcome, LocatorError> {
        let mut verdicts: Vec<OpenOutcome> = Vec::new();
        let mut last_error: Option<LocatorError> = None;

        for path in self.applicable(target) {
            debug!("Trying surface path: {}", path.name());

            match path.open(target).await {
                Ok(OpenOutcome::Opened { surface }) => {
                    info!(
                        target = %target.id,
                        "Opened action surface via {} path",
                        path.name()
                    );
                    return Ok(OpenOutcome::Opened { surface });
                }
                Ok(verdict) => {
                    debug!(
                        "Path {} reported absent surface: {}",
                        path.name(),
                        verdict.reason().unwrap_or_default()
                    );
                    verdicts.push(verdict);
                }
                Err(e) => {
                    warn!("Path {} failed: {}", path.name(), e);
                    last_error = Some(e);
                }
            }
        }

        if verdicts.is_empty() {
            return Err(last_error.unwrap_or_else(|| {
                LocatorError::Internal(format!(
                    "no surface path applies to {:?} layout",
                    target.kind
                ))
            }));
        }

        Ok(merge_verdicts(verdicts))
    }

    async fn find_option(
        &self,
        target: &Target,
        surface: &SurfaceHandle,
        label: &str,
    ) -> Result<Option<OptionHandle>, LocatorError> {
        self.controls.find_option(target, surface, label).await
    }

    async fn is_checked(
        &self,
        target: &Target,
        option: &OptionHandle,
    ) -> Result<bool, LocatorError> {
        self.controls.is_checked(target, option).await
    }

    async fn toggle(&self, target: &Target, option: &OptionHandle) -> Result<(), LocatorError> {
        self.controls.toggle(target, option).await
    }

    async fn dismiss(&self, target: &Target) -> Result<(), LocatorError> {
        self.controls.dismiss(target).await
    }
}

/// Combine absent verdicts from every attempted path.
///
/// Structural only when every path agrees the region is missing; any path
/// that saw the region but not the surface makes the whole open transient.
fn merge_verdicts(verdicts: Vec<OpenOutcome>) -> OpenOutcome {
    let structural = verdicts.iter().all(OpenOutcome::is_structurally_absent);
    let reasons = verdicts
        .iter()
        .filter_map(|v| v.reason())
        .collect::<Vec<_>>()
        .join("; ");

    if structural {
        OpenOutcome::structural(reasons)
    } else {
        OpenOutcome::transient(reasons)
    }
}
