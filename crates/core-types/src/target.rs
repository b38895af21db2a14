use std::fmt;

/// Opaque handle the host uses to address one target (a browser tab).
#[cfg_attr(feature = "serde-full", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct TargetId(pub String);

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Canonical identifier of the item a target shows.
#[cfg_attr(feature = "serde-full", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct ItemId(pub String);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Layout family of the page behind a target. Each family exposes a
/// different set of paths to the action surface.
#[cfg_attr(feature = "serde-full", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde-full", serde(rename_all = "snake_case"))]
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum SurfaceKind {
    #[default]
    Standard,
    Short,
}

/// Which targets a batch enumerates.
#[cfg_attr(feature = "serde-full", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde-full", serde(rename_all = "snake_case"))]
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum TargetScope {
    #[default]
    All,
    Active,
}

/// What the host knows about a target before classification.
#[cfg_attr(feature = "serde-full", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TargetRef {
    pub id: TargetId,
    pub address: String,
    pub active: bool,
}

impl TargetRef {
    pub fn new(id: TargetId, address: impl Into<String>) -> Self {
        Self {
            id,
            address: address.into(),
            active: false,
        }
    }

    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }
}

/// A classified target. Immutable once built; a refresh produces a new one.
#[cfg_attr(feature = "serde-full", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Target {
    pub id: TargetId,
    pub address: String,
    pub item_id: Option<ItemId>,
    pub kind: SurfaceKind,
}

impl Target {
    pub fn new(
        id: TargetId,
        address: impl Into<String>,
        item_id: Option<ItemId>,
        kind: SurfaceKind,
    ) -> Self {
        Self {
            id,
            address: address.into(),
            item_id,
            kind,
        }
    }

    /// Classify a host reference with the given identifier.
    pub fn classify(target: TargetRef, identifier: &dyn crate::TargetIdentifier) -> Self {
        let (item_id, kind) = match identifier.identify(&target.address) {
            Some((item, kind)) => (Some(item), kind),
            None => (None, SurfaceKind::Standard),
        };
        Self {
            id: target.id,
            address: target.address,
            item_id,
            kind,
        }
    }

    /// Same item on a (possibly new) address after the host refreshed it.
    pub fn refreshed(&self, reference: TargetRef) -> Self {
        Self {
            id: reference.id,
            address: reference.address,
            item_id: self.item_id.clone(),
            kind: self.kind,
        }
    }

    pub fn is_actionable(&self) -> bool {
        self.item_id.is_some()
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "target={} address={}", self.id, self.address)
    }
}
