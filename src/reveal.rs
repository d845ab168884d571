//! Scroll-triggered reveal animations.
//!
//! Elements start hidden (transparent, shifted down) and are animated into
//! place once, the first time enough of them scrolls into view. The pieces
//! are split so everything except the browser bindings runs natively:
//!
//! * [`VisibilityDetector`] reports the first intersection of an element.
//! * [`RevealScheduler`] waits out the per-element delay and applies the style.
//! * [`ElementRegistry`] maps page slots to elements and owns the scheduler.

mod detector;
#[cfg(any(feature = "ssr", feature = "hydrate"))]
pub mod dom;
mod registry;
mod scheduler;
mod style;
mod timers;

pub use detector::{IntersectCallback, ManualDetector, ObserveOptions, VisibilityDetector};
pub use registry::{ElementRegistry, SlotKey};
pub use scheduler::{ElementId, RevealScheduler, RevealState};
pub use style::{Ease, RevealStyle, RevealTarget, Transition};
pub use timers::{ManualTimers, TimerCallback, TimerId, Timers};

/// Timing for one registration: when to reveal relative to the first
/// intersection, and how to watch for it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevealOptions {
    pub base_delay_ms: u64,
    pub stagger_ms: u64,
    pub observe: ObserveOptions,
    pub transition: Transition,
}

impl Default for RevealOptions {
    fn default() -> Self {
        Self {
            base_delay_ms: 0,
            stagger_ms: 0,
            observe: ObserveOptions::default(),
            transition: Transition::default(),
        }
    }
}

impl RevealOptions {
    pub fn with_delay(base_delay_ms: u64) -> Self {
        Self {
            base_delay_ms,
            ..Self::default()
        }
    }

    /// Options for list items: item `i` waits `base_delay_ms + i * stagger_ms`.
    pub fn staggered(base_delay_ms: u64, stagger_ms: u64) -> Self {
        Self {
            base_delay_ms,
            stagger_ms,
            ..Self::default()
        }
    }

    pub fn delay_for(&self, stagger_index: usize) -> u64 {
        let index = u64::try_from(stagger_index).unwrap_or(u64::MAX);
        self.base_delay_ms
            .saturating_add(index.saturating_mul(self.stagger_ms))
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::{cell::RefCell, rc::Rc};

    use super::{RevealStyle, RevealTarget};

    /// Stand-in for a DOM node: remembers every style applied to it.
    #[derive(Debug, Clone, Default)]
    pub struct Recorder {
        applied: Rc<RefCell<Vec<RevealStyle>>>,
    }

    impl Recorder {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn applied(&self) -> Vec<RevealStyle> {
            self.applied.borrow().clone()
        }

        pub fn reveal_count(&self) -> usize {
            self.applied
                .borrow()
                .iter()
                .filter(|s| s.is_revealed())
                .count()
        }
    }

    impl PartialEq for Recorder {
        fn eq(&self, other: &Self) -> bool {
            Rc::ptr_eq(&self.applied, &other.applied)
        }
    }

    impl RevealTarget for Recorder {
        fn apply(&self, style: &RevealStyle) {
            self.applied.borrow_mut().push(style.clone());
        }
    }
}
