use std::{cell::RefCell, collections::HashMap};

use super::ElementId;

pub type IntersectCallback = Box<dyn FnOnce()>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObserveOptions {
    /// Visible fraction of the element (0.0..=1.0) that counts as "in view".
    pub threshold: f64,
    /// Margin added around the viewport, in pixels.
    pub root_margin_px: u32,
}

impl Default for ObserveOptions {
    fn default() -> Self {
        Self {
            threshold: 0.1,
            root_margin_px: 50,
        }
    }
}

impl ObserveOptions {
    pub fn new(threshold: f64, root_margin_px: u32) -> Self {
        Self {
            threshold: threshold.clamp(0.0, 1.0),
            root_margin_px,
        }
    }

    pub fn root_margin(&self) -> String {
        format!("{}px", self.root_margin_px)
    }

    pub fn is_satisfied_by(&self, visible_fraction: f64) -> bool {
        // browsers report ratios like 0.0999999 when crossing 0.1
        visible_fraction + 1e-6 >= self.threshold
    }
}

/// Watches elements and reports, once, when each one becomes visible.
///
/// `on_intersect` fires at most once per `observe` call and the element is no
/// longer watched afterwards. `unobserve` drops the callback without calling
/// it; unknown ids are ignored.
pub trait VisibilityDetector<T> {
    fn observe(
        &self,
        id: ElementId,
        target: &T,
        options: ObserveOptions,
        on_intersect: IntersectCallback,
    );
    fn unobserve(&self, id: ElementId);
}

struct Watch {
    options: ObserveOptions,
    on_intersect: IntersectCallback,
}

/// Detector driven by hand, for tests and non-browser hosts.
#[derive(Default)]
pub struct ManualDetector {
    watched: RefCell<HashMap<ElementId, Watch>>,
}

impl ManualDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_observed(&self, id: ElementId) -> bool {
        self.watched.borrow().contains_key(&id)
    }

    pub fn observed_count(&self) -> usize {
        self.watched.borrow().len()
    }

    /// Reports how much of `id` is visible. Returns true if this crossed the
    /// threshold and the callback ran.
    pub fn report(&self, id: ElementId, visible_fraction: f64) -> bool {
        let watch = {
            let mut watched = self.watched.borrow_mut();
            let crossed = watched
                .get(&id)
                .is_some_and(|w| w.options.is_satisfied_by(visible_fraction));
            if crossed {
                watched.remove(&id)
            } else {
                None
            }
        };
        match watch {
            Some(w) => {
                (w.on_intersect)();
                true
            }
            None => false,
        }
    }

    /// Reports `id` as fully visible.
    pub fn intersect(&self, id: ElementId) -> bool {
        self.report(id, 1.0)
    }
}

impl<T> VisibilityDetector<T> for ManualDetector {
    fn observe(
        &self,
        id: ElementId,
        _target: &T,
        options: ObserveOptions,
        on_intersect: IntersectCallback,
    ) {
        self.watched.borrow_mut().insert(
            id,
            Watch {
                options,
                on_intersect,
            },
        );
    }

    fn unobserve(&self, id: ElementId) {
        self.watched.borrow_mut().remove(&id);
    }
}
