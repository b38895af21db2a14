use std::sync::Arc;

use action_locator::{
    label_matches, LocatorError, OpenOutcome, OptionHandle, PathChainLocator, SurfaceControls,
    SurfaceHandle, SurfacePath,
};
use async_trait::async_trait;
use watchlater_core_types::{Target, ToggleVia};

use super::{FaultPoint, SimulatedBrowser, TabState};

/// Options rendered in every simulated save dialog.
const DIALOG_OPTIONS: [&str; 2] = ["Watch later", "Favourites"];

/// Chain locator over the simulated window, paths in fallback order.
pub fn build_locator(browser: Arc<SimulatedBrowser>) -> PathChainLocator {
    let paths = ToggleVia::fallback_chain()
        .into_iter()
        .map(|via| Arc::new(SimulatedPath::new(browser.clone(), via)) as Arc<dyn SurfacePath>)
        .collect();
    PathChainLocator::new(paths, Arc::new(SimulatedControls::new(browser)))
}

fn gone(target: &Target) -> LocatorError {
    LocatorError::StaleSurface(format!("tab {} is gone", target.id))
}

fn fault(tab: &TabState, point: FaultPoint) -> Result<(), LocatorError> {
    if tab.behaviour.fault == Some(point) {
        return Err(LocatorError::Bridge(format!(
            "page script threw during {:?} on {}",
            point, tab.id
        )));
    }
    Ok(())
}

pub struct SimulatedPath {
    browser: Arc<SimulatedBrowser>,
    via: ToggleVia,
}

impl SimulatedPath {
    pub fn new(browser: Arc<SimulatedBrowser>, via: ToggleVia) -> Self {
        Self { browser, via }
    }

    fn open_on(&self, tab: &mut TabState) -> Result<OpenOutcome, LocatorError> {
        fault(tab, FaultPoint::Open)?;
        let name = self.via.name();

        if tab.loads < tab.behaviour.structural_until_refresh {
            return Ok(OpenOutcome::structural(format!(
                "{name}: player region missing"
            )));
        }
        // The menu path is always tried last, so one not-rendered open is
        // counted once per full chain.
        if tab.transient_left > 0 {
            if self.via == ToggleVia::MenuPath {
                tab.transient_left -= 1;
            }
            return Ok(OpenOutcome::transient(format!(
                "{name}: dialog not rendered yet"
            )));
        }
        if !tab.behaviour.paths.is_empty() && !tab.behaviour.paths.contains(&self.via) {
            return Ok(OpenOutcome::transient(format!(
                "{name}: control not rendered"
            )));
        }

        tab.dialog_open = true;
        Ok(OpenOutcome::Opened {
            surface: SurfaceHandle::new(format!("{}:{}", tab.id, name), self.via),
        })
    }
}

#[async_trait]
impl SurfacePath for SimulatedPath {
    async fn open(&self, target: &Target) -> Result<OpenOutcome, LocatorError> {
        self.browser
            .with_tab(&target.id.0, |tab| self.open_on(tab))
            .unwrap_or_else(|| Err(gone(target)))
    }

    fn via(&self) -> ToggleVia {
        self.via
    }
}

pub struct SimulatedControls {
    browser: Arc<SimulatedBrowser>,
}

impl SimulatedControls {
    pub fn new(browser: Arc<SimulatedBrowser>) -> Self {
        Self { browser }
    }
}

#[async_trait]
impl SurfaceControls for SimulatedControls {
    async fn find_option(
        &self,
        target: &Target,
        _surface: &SurfaceHandle,
        label: &str,
    ) -> Result<Option<OptionHandle>, LocatorError> {
        self.browser
            .with_tab(&target.id.0, |tab| {
                fault(tab, FaultPoint::FindOption)?;
                if !tab.dialog_open {
                    return Err(LocatorError::StaleSurface("save dialog closed".into()));
                }
                if tab.option_missing_left > 0 {
                    tab.option_missing_left -= 1;
                    return Ok(None);
                }
                Ok(DIALOG_OPTIONS
                    .iter()
                    .find(|text| label_matches(text, label))
                    .map(|text| OptionHandle::new(format!("{}:{}", tab.id, text), *text)))
            })
            .unwrap_or_else(|| Err(gone(target)))
    }

    async fn is_checked(
        &self,
        target: &Target,
        _option: &OptionHandle,
    ) -> Result<bool, LocatorError> {
        self.browser
            .with_tab(&target.id.0, |tab| tab.checked)
            .ok_or_else(|| gone(target))
    }

    async fn toggle(&self, target: &Target, _option: &OptionHandle) -> Result<(), LocatorError> {
        self.browser
            .with_tab(&target.id.0, |tab| {
                fault(tab, FaultPoint::Toggle)?;
                tab.clicks += 1;
                if !tab.behaviour.never_sticks && tab.clicks > tab.behaviour.stubborn_clicks {
                    tab.checked = !tab.checked;
                }
                Ok(())
            })
            .unwrap_or_else(|| Err(gone(target)))
    }

    async fn dismiss(&self, target: &Target) -> Result<(), LocatorError> {
        self.browser
            .with_tab(&target.id.0, |tab| {
                fault(tab, FaultPoint::Dismiss)?;
                tab.dialog_open = false;
                Ok(())
            })
            .unwrap_or(Ok(()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{SessionSpec, TabBehaviour, TabSpec};
    use action_locator::ActionSurfaceLocator;
    use watchlater_core_types::{ItemId, SurfaceKind, TargetId};

    fn browser(behaviour: TabBehaviour) -> Arc<SimulatedBrowser> {
        SimulatedBrowser::new(&SessionSpec {
            tabs: vec![TabSpec::new("https://www.youtube.com/watch?v=a").with_behaviour(behaviour)],
            fail_enumeration: false,
        })
    }

    fn target(kind: SurfaceKind) -> Target {
        Target::new(
            TargetId("tab-1".into()),
            "https://www.youtube.com/watch?v=a",
            Some(ItemId("a".into())),
            kind,
        )
    }

    #[tokio::test]
    async fn standard_page_opens_via_primary() {
        let locator = build_locator(browser(TabBehaviour::default()));
        match locator.open(&target(SurfaceKind::Standard)).await.unwrap() {
            OpenOutcome::Opened { surface } => assert_eq!(surface.via, ToggleVia::PrimaryPath),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn falls_back_to_menu_when_primary_missing() {
        let locator = build_locator(browser(TabBehaviour {
            paths: vec![ToggleVia::MenuPath],
            ..TabBehaviour::default()
        }));
        match locator.open(&target(SurfaceKind::Short)).await.unwrap() {
            OpenOutcome::Opened { surface } => assert_eq!(surface.via, ToggleVia::MenuPath),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn transient_opens_count_once_per_chain() {
        let locator = build_locator(browser(TabBehaviour {
            transient_opens: 1,
            ..TabBehaviour::default()
        }));
        let t = target(SurfaceKind::Standard);
        assert!(matches!(
            locator.open(&t).await.unwrap(),
            OpenOutcome::TransientAbsent { .. }
        ));
        assert!(locator.open(&t).await.unwrap().is_opened());
    }

    #[tokio::test]
    async fn structural_until_refreshed() {
        let locator = build_locator(browser(TabBehaviour {
            structural_until_refresh: 1,
            ..TabBehaviour::default()
        }));
        let outcome = locator.open(&target(SurfaceKind::Standard)).await.unwrap();
        assert!(outcome.is_structurally_absent());
        assert_eq!(
            outcome.reason(),
            Some("primary: player region missing; menu: player region missing")
        );
    }

    #[tokio::test]
    async fn option_requires_open_dialog() {
        let locator = build_locator(browser(TabBehaviour::default()));
        let t = target(SurfaceKind::Standard);
        let surface = SurfaceHandle::new("x", ToggleVia::PrimaryPath);
        assert!(locator.find_option(&t, &surface, "watch later").await.is_err());

        locator.open(&t).await.unwrap();
        let option = locator
            .find_option(&t, &surface, "WATCH LATER")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(option.label, "Watch later");
        assert!(locator.find_option(&t, &surface, "queue").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn stubborn_clicks_are_swallowed() {
        let locator = build_locator(browser(TabBehaviour {
            stubborn_clicks: 1,
            ..TabBehaviour::default()
        }));
        let t = target(SurfaceKind::Standard);
        let option = OptionHandle::new("o", "Watch later");
        locator.toggle(&t, &option).await.unwrap();
        assert!(!locator.is_checked(&t, &option).await.unwrap());
        locator.toggle(&t, &option).await.unwrap();
        assert!(locator.is_checked(&t, &option).await.unwrap());
    }

    #[tokio::test]
    async fn faults_surface_as_bridge_errors() {
        let locator = build_locator(browser(TabBehaviour {
            fault: Some(FaultPoint::Toggle),
            ..TabBehaviour::default()
        }));
        let result = locator
            .toggle(&target(SurfaceKind::Standard), &OptionHandle::new("o", "Watch later"))
            .await;
        assert!(matches!(result, Err(LocatorError::Bridge(_))));
    }
}
