//! Forkflow Media Library
//!
//! This library provides the media presenter used by every stage: lazy loading
//! with a lookahead margin, delivery URL derivation for the asset CDN, timed
//! auto-advance, and the full-screen lightbox with button, keyboard and swipe
//! navigation.
//!
//! The presenter does no I/O. Each input returns a list of [`Effect`]s that the
//! host carries out (timers, prefetch hints, video playback, scroll lock).

pub mod autoplay;
pub mod delivery;
pub mod lightbox;
pub mod prefetch;
pub mod presenter;
pub mod visibility;

pub use autoplay::{AutoAdvance, TimerToken};
pub use delivery::{AssetHost, DeliveryUrls};
pub use lightbox::{Key, SwipeDirection};
pub use prefetch::PrefetchCache;
pub use presenter::{LightboxView, MediaPresenter, MediaView, PresenterView};
pub use visibility::Lookahead;

use std::time::Duration;

/// Delays at which a host should retry starting playback of the current video.
/// Play failures are ignored.
pub const PLAY_RETRY_DELAYS_MS: [u64; 3] = [50, 200, 500];

/// Side effect requested by the presenter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Start a repeating auto-advance timer; deliver fires with `token`
    ScheduleAdvance { token: TimerToken, interval: Duration },
    /// Stop a previously scheduled timer
    CancelAdvance(TimerToken),
    /// Issue a background prefetch hint for a lightbox-resolution image
    Prefetch { url: String },
    /// Start playback of the inline video (fire-and-forget)
    PlayVideo { url: String },
    /// Prevent the document from scrolling while the lightbox is open
    LockScroll,
    UnlockScroll,
}

/// Presenter configuration
#[derive(Debug, Clone)]
pub struct PresenterOptions {
    /// Auto-advance interval; zero disables auto-advance
    pub autoplay_interval: Duration,
    /// Suspend auto-advance while the pointer is over the media
    pub pause_on_hover: bool,
    /// Allow click-to-expand into the lightbox
    pub enable_lightbox: bool,
    /// Stage label shown by the static placeholder
    pub label: String,
    /// Title shown in the lightbox
    pub title: Option<String>,
    /// Explicit poster image for video items
    pub poster: Option<String>,
}

impl Default for PresenterOptions {
    fn default() -> Self {
        Self {
            autoplay_interval: Duration::from_millis(4000),
            pause_on_hover: true,
            enable_lightbox: true,
            label: String::new(),
            title: None,
            poster: None,
        }
    }
}
