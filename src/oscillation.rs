use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use crate::detector::Level;

/// Number of loop iterations an oscillation indication stays lit after a trigger.
pub const OSC_DUR: u8 = 50;

/// Countdown shared between the main loop and the edge-capture handler.
///
/// The loop reads and decays it once per displayed iteration, the handler
/// re-arms it from interrupt context. Every access is a single atomic
/// operation, so a handler firing mid-iteration is never lost or torn.
#[derive(Debug, Default)]
pub struct OscillationTimer {
    remaining: AtomicU8,
}

impl OscillationTimer {
    pub fn new() -> Self {
        Self {
            remaining: AtomicU8::new(0),
        }
    }

    /// Restart the countdown at [`OSC_DUR`]
    pub fn arm(&self) {
        self.remaining.store(OSC_DUR, Ordering::SeqCst);
    }

    /// Decrement by one, flooring at zero. Returns the value after the tick.
    pub fn tick(&self) -> u8 {
        match self
            .remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |v| v.checked_sub(1))
        {
            Ok(previous) => previous - 1,
            Err(_) => 0,
        }
    }

    pub fn is_active(&self) -> bool {
        self.remaining() > 0
    }

    pub fn remaining(&self) -> u8 {
        self.remaining.load(Ordering::SeqCst)
    }
}

/// The edge-capture handler. Its only action is re-arming the shared timer.
#[derive(Debug, Clone)]
pub struct EdgeHandler {
    timer: Arc<OscillationTimer>,
}

impl EdgeHandler {
    pub fn new(timer: Arc<OscillationTimer>) -> Self {
        Self { timer }
    }

    pub fn on_edge(&self) {
        self.timer.arm();
    }
}

/// Level seen on the previous iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HistoryState {
    pub last_high: bool,
    pub last_low: bool,
}

/// Catches oscillation too slow for the edge window but fast enough to flip
/// the level between consecutive iterations.
#[derive(Debug, Default)]
pub struct TransitionTracker {
    history: HistoryState,
}

impl TransitionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compare against the previous level and re-arm `timer` on a polarity flip.
    ///
    /// History is overwritten unconditionally, floating or not. Returns whether
    /// this call armed the timer.
    pub fn observe(&mut self, level: Level, floating: bool, timer: &OscillationTimer) -> bool {
        let flipped = (level.is_high() && self.history.last_low)
            || (level.is_low() && self.history.last_high);
        let triggered = !floating && flipped;
        if triggered {
            timer.arm();
        }

        self.history = HistoryState {
            last_high: level.is_high(),
            last_low: level.is_low(),
        };
        triggered
    }

    pub fn history(&self) -> HistoryState {
        self.history
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timer_decays_to_zero() {
        let timer = OscillationTimer::new();
        timer.arm();
        for expected in (0..OSC_DUR).rev() {
            assert_eq!(timer.tick(), expected);
        }
        assert!(!timer.is_active());
        assert_eq!(timer.tick(), 0);
        assert_eq!(timer.remaining(), 0);
    }

    #[test]
    fn test_handler_rearms_shared_timer() {
        let timer = Arc::new(OscillationTimer::new());
        let handler = EdgeHandler::new(Arc::clone(&timer));
        timer.arm();
        timer.tick();
        timer.tick();
        handler.on_edge();
        assert_eq!(timer.remaining(), OSC_DUR);
    }

    #[test]
    fn test_handler_from_other_thread() {
        let timer = Arc::new(OscillationTimer::new());
        let handler = EdgeHandler::new(Arc::clone(&timer));
        std::thread::spawn(move || handler.on_edge())
            .join()
            .unwrap();
        assert!(timer.is_active());
    }

    #[test]
    fn test_flip_arms_timer() {
        let timer = OscillationTimer::new();
        let mut tracker = TransitionTracker::new();
        assert!(!tracker.observe(Level::High, false, &timer));
        assert!(tracker.observe(Level::Low, false, &timer));
        assert_eq!(timer.remaining(), OSC_DUR);
    }

    #[test]
    fn test_floating_suppresses_flip_but_keeps_history() {
        let timer = OscillationTimer::new();
        let mut tracker = TransitionTracker::new();
        tracker.observe(Level::High, false, &timer);
        assert!(!tracker.observe(Level::Low, true, &timer));
        assert!(!timer.is_active());
        assert_eq!(
            tracker.history(),
            HistoryState {
                last_high: false,
                last_low: true
            }
        );
    }

    #[test]
    fn test_dead_band_breaks_flip_chain() {
        let timer = OscillationTimer::new();
        let mut tracker = TransitionTracker::new();
        tracker.observe(Level::High, false, &timer);
        tracker.observe(Level::Indeterminate, false, &timer);
        assert!(!tracker.observe(Level::Low, false, &timer));
        assert!(!timer.is_active());
    }
}
