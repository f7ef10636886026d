//! Media presenter: gallery state machine shared with its lightbox

use crate::autoplay::{AdvanceGuard, AutoAdvance, TimerToken};
use crate::delivery::{self, DeliveryUrls, ImageTransform, POSTER_WIDTH};
use crate::lightbox::{GalleryCursor, Key, Lightbox, LightboxAction};
use crate::visibility::Lookahead;
use crate::{Effect, PrefetchCache, PresenterOptions};
use forkflow_core::{MediaKind, MediaSet};
use std::collections::HashSet;

/// What the inline slot should show
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresenterView {
    /// Static icon and stage label; click-to-expand is disabled
    Placeholder { label: String },
    Media(MediaView),
}

/// Inline rendering of the current item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaView {
    pub index: usize,
    pub count: usize,
    pub kind: MediaKind,
    /// Optimized source; `None` until the slot has been near the viewport
    pub source: Option<String>,
    /// Blurred placeholder shown while the source is loading
    pub blur_placeholder: Option<String>,
    pub loaded: bool,
    pub errored: bool,
    /// Poster frame for video items
    pub poster: Option<String>,
    /// A lone video loops; gallery videos advance when they end
    pub loop_video: bool,
    pub expandable: bool,
}

/// Rendering of the open lightbox
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LightboxView {
    pub index: usize,
    pub count: usize,
    /// "2 / 5"
    pub counter: String,
    pub kind: MediaKind,
    /// Higher-resolution source
    pub source: String,
    /// Already-cached inline image shown until `source` loads (images only)
    pub thumbnail: Option<String>,
    pub loaded: bool,
    pub title: Option<String>,
    pub show_navigation: bool,
}

/// Per-slot media presenter.
///
/// Created when the slot mounts and dropped when it unmounts; call
/// [`MediaPresenter::unmount`] first so the host releases timers and scroll lock.
#[derive(Debug)]
pub struct MediaPresenter {
    media: MediaSet,
    options: PresenterOptions,
    cursor: GalleryCursor,
    in_view: bool,
    hovered: bool,
    loaded: HashSet<String>,
    errored: HashSet<String>,
    lightbox: Lightbox,
    autoplay: AutoAdvance,
    prefetch: PrefetchCache,
}

impl MediaPresenter {
    /// Creates a presenter in the unseen state; nothing is requested yet
    pub fn new(media: MediaSet, options: PresenterOptions, prefetch: PrefetchCache) -> Self {
        let cursor = GalleryCursor::new(media.len());
        let autoplay = AutoAdvance::new(options.autoplay_interval);
        Self {
            media,
            options,
            cursor,
            in_view: false,
            hovered: false,
            loaded: HashSet::new(),
            errored: HashSet::new(),
            lightbox: Lightbox::default(),
            autoplay,
            prefetch,
        }
    }

    pub fn media(&self) -> &MediaSet {
        &self.media
    }

    pub fn current_index(&self) -> usize {
        self.cursor.index()
    }

    pub fn current_url(&self) -> Option<&str> {
        self.media.get(self.cursor.index())
    }

    pub fn current_kind(&self) -> MediaKind {
        MediaKind::from_url(self.current_url())
    }

    pub fn is_in_view(&self) -> bool {
        self.in_view
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    pub fn is_lightbox_open(&self) -> bool {
        self.lightbox.is_open()
    }

    pub fn is_loaded(&self, url: &str) -> bool {
        self.loaded.contains(url)
    }

    pub fn is_errored(&self, url: &str) -> bool {
        self.errored.contains(url)
    }

    /// Token of the running auto-advance timer, if any
    pub fn armed_timer(&self) -> Option<TimerToken> {
        self.autoplay.armed()
    }

    /// Nothing to show: empty set, or a single item that failed to load
    pub fn shows_placeholder(&self) -> bool {
        match self.media.urls() {
            [] => true,
            [only] => self.errored.contains(only),
            _ => false,
        }
    }

    /// Whether a click would open the lightbox
    pub fn is_expandable(&self) -> bool {
        self.options.enable_lightbox
            && !self.shows_placeholder()
            && self
                .current_url()
                .is_some_and(|url| !self.errored.contains(url))
    }

    /// Feeds a layout observation. The first intersection switches the
    /// presenter into view; later observations are ignored.
    pub fn observe(
        &mut self,
        top: f64,
        bottom: f64,
        viewport_height: f64,
        lookahead: &Lookahead,
    ) -> Vec<Effect> {
        if self.in_view || !lookahead.intersects(top, bottom, viewport_height) {
            return Vec::new();
        }
        self.enter_viewport()
    }

    /// One-shot transition into view: starts loading and prefetches lightbox images
    pub fn enter_viewport(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        if self.in_view {
            return effects;
        }
        self.in_view = true;
        tracing::debug!("Media slot '{}' entered the viewport", self.options.label);

        if self.options.enable_lightbox {
            for url in self.media.urls() {
                if MediaKind::from_url(Some(url)).is_video() {
                    continue;
                }
                if self.prefetch.mark(url) {
                    effects.push(Effect::Prefetch {
                        url: delivery::lightbox_url(url),
                    });
                }
            }
        }

        self.request_play(&mut effects);
        self.sync_timer(&mut effects);
        effects
    }

    /// Pointer entered (`true`) or left (`false`) the slot
    pub fn hover(&mut self, hovered: bool) -> Vec<Effect> {
        let mut effects = Vec::new();
        if self.hovered != hovered {
            self.hovered = hovered;
            self.sync_timer(&mut effects);
        }
        effects
    }

    /// The browser finished loading `url`. Sticky for the presenter's lifetime.
    pub fn media_loaded(&mut self, url: &str) {
        if self.loaded.insert(url.to_string()) {
            tracing::debug!("Media loaded: {}", url);
        }
    }

    /// The browser failed to load `url`. Terminal until the page reloads.
    pub fn media_failed(&mut self, url: &str) {
        if self.errored.insert(url.to_string()) {
            tracing::warn!("Media failed to load: {}", url);
        }
    }

    /// A timer fire from the host; stale tokens are ignored
    pub fn timer_fired(&mut self, token: TimerToken) -> Vec<Effect> {
        let mut effects = Vec::new();
        if !self.autoplay.accepts(token) {
            return effects;
        }
        if self.cursor.advance() {
            self.index_changed(&mut effects);
        }
        effects
    }

    /// The inline video reached its natural end
    pub fn video_ended(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        if !self.media.is_gallery() || self.lightbox.is_open() || !self.current_kind().is_video()
        {
            return effects;
        }
        if self.cursor.advance() {
            self.index_changed(&mut effects);
        }
        effects
    }

    /// Jump from an inline index indicator
    pub fn go_to(&mut self, index: usize) -> Vec<Effect> {
        let mut effects = Vec::new();
        if self.cursor.jump(index) {
            self.index_changed(&mut effects);
        }
        effects
    }

    /// Click on the inline slot: opens the lightbox when allowed
    pub fn click(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        if !self.is_expandable() || self.lightbox.is_open() {
            return effects;
        }
        tracing::debug!("Lightbox opened at index {}", self.cursor.index());
        self.lightbox.open();
        effects.push(Effect::LockScroll);
        self.sync_timer(&mut effects);
        effects
    }

    /// Close button, Escape, or a click outside the media content
    pub fn close_lightbox(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        if !self.lightbox.is_open() {
            return effects;
        }
        tracing::debug!("Lightbox closed at index {}", self.cursor.index());
        self.lightbox.close();
        effects.push(Effect::UnlockScroll);
        self.request_play(&mut effects);
        self.sync_timer(&mut effects);
        effects
    }

    pub fn lightbox_next(&mut self) -> Vec<Effect> {
        let action = self.lightbox.next(&mut self.cursor);
        self.apply(action)
    }

    pub fn lightbox_previous(&mut self) -> Vec<Effect> {
        let action = self.lightbox.previous(&mut self.cursor);
        self.apply(action)
    }

    pub fn lightbox_jump(&mut self, index: usize) -> Vec<Effect> {
        let action = self.lightbox.jump(&mut self.cursor, index);
        self.apply(action)
    }

    pub fn lightbox_key(&mut self, key: Key) -> Vec<Effect> {
        let action = self.lightbox.key(&mut self.cursor, key);
        self.apply(action)
    }

    pub fn touch_start(&mut self, x: f64, y: f64) {
        self.lightbox.touch_start(x, y);
    }

    pub fn touch_end(&mut self, x: f64, y: f64) -> Vec<Effect> {
        let action = self.lightbox.touch_end(&mut self.cursor, x, y);
        self.apply(action)
    }

    /// The lightbox's high-resolution image finished loading
    pub fn lightbox_media_loaded(&mut self) {
        self.lightbox.mark_hires_loaded();
    }

    /// Releases everything the host holds for this presenter
    pub fn unmount(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        self.autoplay.cancel(&mut effects);
        if self.lightbox.is_open() {
            self.lightbox.close();
            effects.push(Effect::UnlockScroll);
        }
        effects
    }

    /// Inline rendering of the current state
    pub fn view(&self) -> PresenterView {
        if self.shows_placeholder() {
            return PresenterView::Placeholder {
                label: self.options.label.clone(),
            };
        }

        let index = self.cursor.index();
        let url = self.current_url();
        let kind = MediaKind::from_url(url);
        let urls = DeliveryUrls::derive(url);
        let loaded = url.is_some_and(|u| self.loaded.contains(u));
        let errored = url.is_some_and(|u| self.errored.contains(u));
        let placeholder = urls.as_ref().and_then(|u| u.placeholder.clone());

        let poster = if kind.is_video() {
            match &self.options.poster {
                Some(poster) => Some(delivery::optimized_image_url(
                    poster,
                    &ImageTransform::with_width(POSTER_WIDTH),
                )),
                None => placeholder.clone(),
            }
        } else {
            None
        };

        PresenterView::Media(MediaView {
            index,
            count: self.media.len(),
            kind,
            source: if self.in_view {
                urls.as_ref().map(|u| u.inline.clone())
            } else {
                None
            },
            blur_placeholder: if loaded { None } else { placeholder },
            loaded,
            errored,
            poster,
            loop_video: !self.media.is_gallery(),
            expandable: self.is_expandable(),
        })
    }

    /// Rendering of the lightbox, when open
    pub fn lightbox_view(&self) -> Option<LightboxView> {
        if !self.lightbox.is_open() {
            return None;
        }
        let url = self.current_url()?;
        let kind = MediaKind::from_url(Some(url));
        let thumbnail = if kind.is_video() {
            None
        } else {
            Some(delivery::optimized_image_url(url, &ImageTransform::default()))
        };
        let count = self.media.len();

        Some(LightboxView {
            index: self.cursor.index(),
            count,
            counter: format!("{} / {}", self.cursor.index() + 1, count),
            kind,
            source: delivery::lightbox_url(url),
            thumbnail,
            loaded: self.lightbox.hires_loaded(),
            title: self.options.title.clone(),
            show_navigation: self.media.is_gallery(),
        })
    }

    fn apply(&mut self, action: LightboxAction) -> Vec<Effect> {
        match action {
            LightboxAction::Ignored => Vec::new(),
            LightboxAction::Close => self.close_lightbox(),
            LightboxAction::Moved => {
                let mut effects = Vec::new();
                self.sync_timer(&mut effects);
                effects
            }
        }
    }

    fn index_changed(&mut self, effects: &mut Vec<Effect>) {
        tracing::debug!(
            "Media slot '{}' moved to index {}",
            self.options.label,
            self.cursor.index()
        );
        self.lightbox.index_changed();
        self.request_play(effects);
        self.sync_timer(effects);
    }

    fn request_play(&self, effects: &mut Vec<Effect>) {
        if !self.in_view || self.lightbox.is_open() || !self.current_kind().is_video() {
            return;
        }
        if let Some(url) = self.current_url() {
            effects.push(Effect::PlayVideo {
                url: delivery::optimized_video_url(url, None),
            });
        }
    }

    fn sync_timer(&mut self, effects: &mut Vec<Effect>) {
        let guard = AdvanceGuard {
            in_view: self.in_view,
            hovered: self.hovered,
            pause_on_hover: self.options.pause_on_hover,
            item_count: self.media.len(),
            current_is_video: self.current_kind().is_video(),
            lightbox_open: self.lightbox.is_open(),
        };
        self.autoplay.sync(&guard, effects);
    }
}
