//! User agent classification for the toolbar heuristic.

/// Signatures of iOS browsers that share WebKit but are not Safari.
const NON_SAFARI_IOS: &[&str] = &["crios", "fxios", "edgios", "opios"];

/// What the toolbar heuristic can do on the current platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlatformCapability {
    /// Not iOS Safari. The heuristic stays inert.
    Unsupported,
    /// iOS Safari in a browser tab. The toolbar collapses and expands on scroll.
    IosSafari,
    /// iOS Safari launched from the home screen. There is no toolbar.
    IosStandalone,
}

impl PlatformCapability {
    /// Whether the heuristic has anything to track.
    #[must_use]
    pub const fn is_ios_safari(self) -> bool {
        matches!(self, Self::IosSafari | Self::IosStandalone)
    }
}

/// Classifies a user agent string.
///
/// iOS Safari means an `iPad` or `iPhone` device token, a `WebKit` engine token
/// and none of the third-party iOS browser tokens. Matching is case-insensitive.
#[must_use]
pub fn classify_platform(user_agent: &str, is_standalone: bool) -> PlatformCapability {
    let ua = user_agent.to_ascii_lowercase();
    let ios = ua.contains("ipad") || ua.contains("iphone");
    let webkit = ua.contains("webkit");
    let third_party = NON_SAFARI_IOS.iter().any(|token| ua.contains(token));

    match (ios && webkit && !third_party, is_standalone) {
        (false, _) => PlatformCapability::Unsupported,
        (true, true) => PlatformCapability::IosStandalone,
        (true, false) => PlatformCapability::IosSafari,
    }
}
