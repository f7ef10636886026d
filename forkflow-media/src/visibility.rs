//! Viewport intersection with a lookahead margin

/// Margin by which the viewport is grown when deciding whether media is near enough to load
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lookahead {
    pub margin: f64,
}

impl Default for Lookahead {
    fn default() -> Self {
        Self { margin: 200.0 }
    }
}

impl Lookahead {
    /// Checks whether an element intersects the grown viewport.
    ///
    /// `top` and `bottom` are relative to the top of the viewport.
    pub fn intersects(&self, top: f64, bottom: f64, viewport_height: f64) -> bool {
        bottom >= -self.margin && top <= viewport_height + self.margin && bottom >= top
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inside_viewport() {
        let lookahead = Lookahead::default();
        assert!(lookahead.intersects(100.0, 400.0, 800.0));
    }

    #[test]
    fn test_below_viewport_within_margin() {
        let lookahead = Lookahead::default();
        assert!(lookahead.intersects(950.0, 1300.0, 800.0));
        assert!(!lookahead.intersects(1050.0, 1300.0, 800.0));
    }

    #[test]
    fn test_above_viewport() {
        let lookahead = Lookahead::default();
        assert!(lookahead.intersects(-600.0, -150.0, 800.0));
        assert!(!lookahead.intersects(-900.0, -250.0, 800.0));
    }
}
