//! Target identification.
//!
//! Maps a target address to the canonical item identifier, or reports that
//! the target is not actionable.

use url::Url;

use crate::target::{ItemId, SurfaceKind};

/// Extracts an item identifier from a target address.
pub trait TargetIdentifier: Send + Sync {
    /// `None` means the target is not actionable.
    fn identify(&self, address: &str) -> Option<(ItemId, SurfaceKind)>;
}

/// Identifier for video pages: `/watch?v=<id>`, `/shorts/<id>` and the
/// `youtu.be/<id>` short links.
#[derive(Clone, Debug, Default)]
pub struct VideoUrlIdentifier;

impl VideoUrlIdentifier {
    pub fn new() -> Self {
        Self
    }
}

impl TargetIdentifier for VideoUrlIdentifier {
    fn identify(&self, address: &str) -> Option<(ItemId, SurfaceKind)> {
        let url = Url::parse(address).ok()?;
        let host = url.host_str()?;
        let host = host.strip_prefix("www.").unwrap_or(host);
        let path = url.path();

        let found = if host.ends_with("youtube.com") && path == "/watch" {
            url.query_pairs()
                .find(|(key, _)| key == "v")
                .map(|(_, value)| (value.into_owned(), SurfaceKind::Standard))
        } else if host.ends_with("youtube.com") && path.starts_with("/shorts/") {
            path.split('/')
                .nth(2)
                .map(|id| (id.to_string(), SurfaceKind::Short))
        } else if host == "youtu.be" {
            Some((path.trim_start_matches('/').to_string(), SurfaceKind::Standard))
        } else {
            None
        };

        found
            .filter(|(id, _)| !id.is_empty())
            .map(|(id, kind)| (ItemId(id), kind))
    }
}
