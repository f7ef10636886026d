//! Auto-advance timer state
//!
//! The timer is either armed (one outstanding repeating timer, identified by a
//! token) or idle. The presenter re-evaluates its guard after every change and
//! calls [`AutoAdvance::sync`]; arming always cancels whatever was armed
//! before, so at most one timer exists per presenter.

use crate::Effect;
use std::time::Duration;

/// Identifies one scheduled timer. Fires carrying an older token are stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerToken(u64);

/// Inputs of the auto-advance guard
#[derive(Debug, Clone, Copy)]
pub struct AdvanceGuard {
    pub in_view: bool,
    pub hovered: bool,
    pub pause_on_hover: bool,
    pub item_count: usize,
    pub current_is_video: bool,
    pub lightbox_open: bool,
}

impl AdvanceGuard {
    /// Whether a timer should be running
    pub fn allows_timer(&self) -> bool {
        self.in_view
            && !(self.pause_on_hover && self.hovered)
            && self.item_count > 1
            && !self.current_is_video
            && !self.lightbox_open
    }
}

/// Repeating auto-advance timer
#[derive(Debug)]
pub struct AutoAdvance {
    interval: Duration,
    armed: Option<TimerToken>,
    next_token: u64,
}

impl AutoAdvance {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            armed: None,
            next_token: 0,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// The currently armed timer, if any
    pub fn armed(&self) -> Option<TimerToken> {
        self.armed
    }

    /// Whether a fire with this token should advance the gallery
    pub fn accepts(&self, token: TimerToken) -> bool {
        self.armed == Some(token)
    }

    /// Brings the timer in line with the guard.
    ///
    /// A running timer keeps running while the guard holds; a newly allowed
    /// timer always starts a fresh interval.
    pub fn sync(&mut self, guard: &AdvanceGuard, effects: &mut Vec<Effect>) {
        let allowed = !self.interval.is_zero() && guard.allows_timer();
        match (allowed, self.armed) {
            (true, None) => self.arm(effects),
            (false, Some(_)) => self.cancel(effects),
            _ => {}
        }
    }

    /// Cancels the armed timer, if any
    pub fn cancel(&mut self, effects: &mut Vec<Effect>) {
        if let Some(token) = self.armed.take() {
            tracing::debug!("Auto-advance timer {:?} cancelled", token);
            effects.push(Effect::CancelAdvance(token));
        }
    }

    fn arm(&mut self, effects: &mut Vec<Effect>) {
        self.cancel(effects);
        let token = TimerToken(self.next_token);
        self.next_token += 1;
        self.armed = Some(token);
        tracing::debug!("Auto-advance timer {:?} scheduled every {:?}", token, self.interval);
        effects.push(Effect::ScheduleAdvance {
            token,
            interval: self.interval,
        });
    }
}
