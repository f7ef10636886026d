//! Lightbox navigation: shared gallery cursor, keyboard and swipe input

/// Minimum horizontal travel for a touch gesture to count as a swipe
pub const SWIPE_THRESHOLD: f64 = 50.0;

/// Keys the lightbox reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    ArrowLeft,
    ArrowRight,
    Other,
}

impl Key {
    /// Maps a DOM-style key name
    pub fn from_name(name: &str) -> Self {
        match name {
            "Escape" => Key::Escape,
            "ArrowLeft" => Key::ArrowLeft,
            "ArrowRight" => Key::ArrowRight,
            _ => Key::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeDirection {
    /// Finger moved left: show the next item
    Next,
    /// Finger moved right: show the previous item
    Previous,
}

/// Classifies a touch gesture by its end-minus-start deltas.
///
/// Horizontal travel must dominate vertical travel so that vertical panning
/// never navigates.
pub fn classify_swipe(delta_x: f64, delta_y: f64, threshold: f64) -> Option<SwipeDirection> {
    if delta_x.abs() > delta_y.abs() && delta_x.abs() > threshold {
        if delta_x > 0.0 {
            Some(SwipeDirection::Previous)
        } else {
            Some(SwipeDirection::Next)
        }
    } else {
        None
    }
}

/// Remembers where a touch started until it ends
#[derive(Debug, Clone, Default)]
pub struct SwipeTracker {
    start: Option<(f64, f64)>,
}

impl SwipeTracker {
    pub fn touch_start(&mut self, x: f64, y: f64) {
        self.start = Some((x, y));
    }

    /// Completes the gesture; an end without a start is ignored
    pub fn touch_end(&mut self, x: f64, y: f64) -> Option<SwipeDirection> {
        let (start_x, start_y) = self.start.take()?;
        classify_swipe(x - start_x, y - start_y, SWIPE_THRESHOLD)
    }

    pub fn cancel(&mut self) {
        self.start = None;
    }
}

/// Current position within a media set, shared by the inline gallery and the lightbox
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GalleryCursor {
    index: usize,
    len: usize,
}

impl GalleryCursor {
    pub fn new(len: usize) -> Self {
        Self { index: 0, len }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Moves to `(index + 1) mod len`. Returns true when the index changed.
    pub fn advance(&mut self) -> bool {
        if self.len == 0 {
            return false;
        }
        self.set((self.index + 1) % self.len)
    }

    /// Moves to `(index - 1 + len) mod len`
    pub fn retreat(&mut self) -> bool {
        if self.len == 0 {
            return false;
        }
        self.set((self.index + self.len - 1) % self.len)
    }

    /// Jumps to `index`; out-of-range indices are ignored
    pub fn jump(&mut self, index: usize) -> bool {
        if index >= self.len {
            return false;
        }
        self.set(index)
    }

    fn set(&mut self, index: usize) -> bool {
        let changed = self.index != index;
        self.index = index;
        changed
    }
}

/// What a lightbox input did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightboxAction {
    Ignored,
    Moved,
    Close,
}

/// Overlay state that is not shared with the inline gallery
#[derive(Debug, Default)]
pub struct Lightbox {
    open: bool,
    hires_loaded: bool,
    swipe: SwipeTracker,
}

impl Lightbox {
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Whether the high-resolution image for the current index finished loading
    pub fn hires_loaded(&self) -> bool {
        self.hires_loaded
    }

    pub fn open(&mut self) {
        self.open = true;
        self.hires_loaded = false;
        self.swipe.cancel();
    }

    pub fn close(&mut self) {
        self.open = false;
        self.swipe.cancel();
    }

    pub fn mark_hires_loaded(&mut self) {
        if self.open {
            self.hires_loaded = true;
        }
    }

    /// Must be called whenever the shared cursor moves
    pub fn index_changed(&mut self) {
        self.hires_loaded = false;
    }

    pub fn next(&mut self, cursor: &mut GalleryCursor) -> LightboxAction {
        self.navigate(cursor, GalleryCursor::advance)
    }

    pub fn previous(&mut self, cursor: &mut GalleryCursor) -> LightboxAction {
        self.navigate(cursor, GalleryCursor::retreat)
    }

    pub fn jump(&mut self, cursor: &mut GalleryCursor, index: usize) -> LightboxAction {
        self.navigate(cursor, |c| c.jump(index))
    }

    /// Keyboard input; arrows only navigate galleries
    pub fn key(&mut self, cursor: &mut GalleryCursor, key: Key) -> LightboxAction {
        if !self.open {
            return LightboxAction::Ignored;
        }
        match key {
            Key::Escape => LightboxAction::Close,
            Key::ArrowRight if cursor.len() > 1 => self.next(cursor),
            Key::ArrowLeft if cursor.len() > 1 => self.previous(cursor),
            _ => LightboxAction::Ignored,
        }
    }

    pub fn touch_start(&mut self, x: f64, y: f64) {
        if self.open {
            self.swipe.touch_start(x, y);
        }
    }

    pub fn touch_end(&mut self, cursor: &mut GalleryCursor, x: f64, y: f64) -> LightboxAction {
        let direction = self.swipe.touch_end(x, y);
        if !self.open || cursor.len() <= 1 {
            return LightboxAction::Ignored;
        }
        match direction {
            Some(SwipeDirection::Next) => self.next(cursor),
            Some(SwipeDirection::Previous) => self.previous(cursor),
            None => LightboxAction::Ignored,
        }
    }

    fn navigate(
        &mut self,
        cursor: &mut GalleryCursor,
        step: impl FnOnce(&mut GalleryCursor) -> bool,
    ) -> LightboxAction {
        if !self.open {
            return LightboxAction::Ignored;
        }
        if step(cursor) {
            self.index_changed();
            LightboxAction::Moved
        } else {
            LightboxAction::Ignored
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_lightbox() -> Lightbox {
        let mut lightbox = Lightbox::default();
        lightbox.open();
        lightbox
    }

    #[test]
    fn test_classify_swipe() {
        assert_eq!(classify_swipe(-80.0, 10.0, SWIPE_THRESHOLD), Some(SwipeDirection::Next));
        assert_eq!(classify_swipe(80.0, 10.0, SWIPE_THRESHOLD), Some(SwipeDirection::Previous));
        assert_eq!(classify_swipe(40.0, 5.0, SWIPE_THRESHOLD), None);
        assert_eq!(classify_swipe(60.0, 120.0, SWIPE_THRESHOLD), None);
    }

    #[test]
    fn test_cursor_wraps() {
        let mut cursor = GalleryCursor::new(3);
        assert!(cursor.retreat());
        assert_eq!(cursor.index(), 2);
        assert!(cursor.advance());
        assert_eq!(cursor.index(), 0);
        assert!(!cursor.jump(3));
        assert!(cursor.jump(1));
        assert!(!cursor.jump(1));
    }

    #[test]
    fn test_empty_cursor_never_moves() {
        let mut cursor = GalleryCursor::new(0);
        assert!(!cursor.advance());
        assert!(!cursor.retreat());
        assert_eq!(cursor.index(), 0);
    }

    #[test]
    fn test_swipe_navigates_open_gallery() {
        let mut lightbox = open_lightbox();
        let mut cursor = GalleryCursor::new(3);

        lightbox.touch_start(200.0, 300.0);
        assert_eq!(lightbox.touch_end(&mut cursor, 120.0, 310.0), LightboxAction::Moved);
        assert_eq!(cursor.index(), 1);

        lightbox.touch_start(120.0, 300.0);
        assert_eq!(lightbox.touch_end(&mut cursor, 200.0, 310.0), LightboxAction::Moved);
        assert_eq!(cursor.index(), 0);

        lightbox.touch_start(100.0, 100.0);
        assert_eq!(lightbox.touch_end(&mut cursor, 110.0, 400.0), LightboxAction::Ignored);
        assert_eq!(cursor.index(), 0);
    }

    #[test]
    fn test_touch_end_without_start_is_ignored() {
        let mut lightbox = open_lightbox();
        let mut cursor = GalleryCursor::new(3);
        assert_eq!(lightbox.touch_end(&mut cursor, 0.0, 0.0), LightboxAction::Ignored);
    }

    #[test]
    fn test_keys() {
        let mut lightbox = open_lightbox();
        let mut cursor = GalleryCursor::new(2);

        assert_eq!(lightbox.key(&mut cursor, Key::ArrowRight), LightboxAction::Moved);
        assert_eq!(lightbox.key(&mut cursor, Key::ArrowLeft), LightboxAction::Moved);
        assert_eq!(lightbox.key(&mut cursor, Key::Other), LightboxAction::Ignored);
        assert_eq!(lightbox.key(&mut cursor, Key::Escape), LightboxAction::Close);

        let mut single = GalleryCursor::new(1);
        assert_eq!(lightbox.key(&mut single, Key::ArrowRight), LightboxAction::Ignored);
        assert_eq!(Key::from_name("ArrowLeft"), Key::ArrowLeft);
        assert_eq!(Key::from_name("Enter"), Key::Other);
    }

    #[test]
    fn test_closed_lightbox_ignores_input() {
        let mut lightbox = Lightbox::default();
        let mut cursor = GalleryCursor::new(3);
        assert_eq!(lightbox.next(&mut cursor), LightboxAction::Ignored);
        assert_eq!(lightbox.key(&mut cursor, Key::Escape), LightboxAction::Ignored);
        assert_eq!(cursor.index(), 0);
    }

    #[test]
    fn test_hires_flag_resets_on_move() {
        let mut lightbox = open_lightbox();
        let mut cursor = GalleryCursor::new(3);
        lightbox.mark_hires_loaded();
        assert!(lightbox.hires_loaded());
        lightbox.jump(&mut cursor, 2);
        assert!(!lightbox.hires_loaded());
    }
}
