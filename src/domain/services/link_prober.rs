// src/domain/services/link_prober.rs
use crate::domain::health::ProbeResult;

/// Port for checking whether a URL still resolves.
///
/// Implementations never raise: transport failures classify the probe as
/// broken and an unavailable archive lookup yields `None`. Bookmark data
/// correctness must not depend on third-party availability.
pub trait LinkProber: std::fmt::Debug + Send + Sync {
    /// Probe a URL with bounded timeout and redirect count.
    fn probe(&self, url: &str) -> ProbeResult;

    /// Closest available web-archive snapshot of a URL, if any.
    fn find_archive_snapshot(&self, url: &str) -> Option<String>;
}
