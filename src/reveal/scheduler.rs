use std::{
    cell::RefCell,
    collections::HashMap,
    fmt,
    rc::{Rc, Weak},
    time::Duration,
};

use super::{
    RevealOptions, RevealStyle, RevealTarget, TimerId, Timers, Transition, VisibilityDetector,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(u64);

impl ElementId {
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealState {
    /// Registered and waiting to scroll into view.
    Hidden,
    /// Seen; the reveal delay is running.
    Pending,
    /// Animated in. Terminal.
    Revealed,
}

enum Phase {
    Hidden,
    Pending(TimerId),
    Revealed,
}

struct Entry<T> {
    // dropped once revealed
    target: Option<T>,
    delay_ms: u64,
    transition: Transition,
    phase: Phase,
}

struct State<T> {
    next_id: u64,
    // revealed entries are kept, minus their node, until `forget`
    entries: HashMap<ElementId, Entry<T>>,
}

/// Applies each element's reveal once: after it has been seen by the detector
/// and its delay has run out.
///
/// Revealed elements are remembered (their node is dropped) so `state` and
/// `cancel` keep treating them as terminal; [`RevealScheduler::forget`]
/// releases that record.
pub struct RevealScheduler<T> {
    state: Rc<RefCell<State<T>>>,
    detector: Rc<dyn VisibilityDetector<T>>,
    timers: Rc<dyn Timers>,
}

impl<T: RevealTarget + 'static> RevealScheduler<T> {
    pub fn new(detector: Rc<dyn VisibilityDetector<T>>, timers: Rc<dyn Timers>) -> Self {
        Self {
            state: Rc::new(RefCell::new(State {
                next_id: 1,
                entries: HashMap::new(),
            })),
            detector,
            timers,
        }
    }

    /// Starts watching `target`; it is revealed `options.delay_for(stagger_index)`
    /// ms after it first intersects.
    pub fn schedule(&self, target: T, options: &RevealOptions, stagger_index: usize) -> ElementId {
        let delay_ms = options.delay_for(stagger_index);
        let id = {
            let mut state = self.state.borrow_mut();
            let id = ElementId(state.next_id);
            state.next_id += 1;
            state.entries.insert(
                id,
                Entry {
                    target: None,
                    delay_ms,
                    transition: options.transition,
                    phase: Phase::Hidden,
                },
            );
            id
        };
        log::trace!("reveal {id}: watching, delay {delay_ms}ms");

        let on_intersect = {
            let state = Rc::downgrade(&self.state);
            let timers = Rc::downgrade(&self.timers);
            Box::new(move || on_intersect(state, timers, id))
        };
        self.detector
            .observe(id, &target, options.observe, on_intersect);
        // stored after observing: a detector may report synchronously, and
        // the callback needs the state unborrowed
        if let Some(entry) = self.state.borrow_mut().entries.get_mut(&id) {
            entry.target = Some(target);
        }
        id
    }

    /// Stops watching `id` and cancels its pending reveal. Returns false if
    /// there was nothing to cancel: unknown ids and revealed elements are left
    /// untouched.
    pub fn cancel(&self, id: ElementId) -> bool {
        let removed = {
            let mut state = self.state.borrow_mut();
            let cancellable = matches!(
                state.entries.get(&id).map(|e| &e.phase),
                Some(Phase::Hidden | Phase::Pending(_))
            );
            if !cancellable {
                return false;
            }
            state.entries.remove(&id)
        };
        self.detector.unobserve(id);
        if let Some(Entry {
            phase: Phase::Pending(timer),
            ..
        }) = removed
        {
            self.timers.cancel(timer);
        }
        log::trace!("reveal {id}: cancelled");
        true
    }

    /// Drops everything known about `id`, cancelling it first if it has
    /// not been revealed. Afterwards `state(id)` is `None`.
    pub fn forget(&self, id: ElementId) {
        self.cancel(id);
        self.state.borrow_mut().entries.remove(&id);
    }

    pub fn state(&self, id: ElementId) -> Option<RevealState> {
        self.state.borrow().entries.get(&id).map(|e| match e.phase {
            Phase::Hidden => RevealState::Hidden,
            Phase::Pending(_) => RevealState::Pending,
            Phase::Revealed => RevealState::Revealed,
        })
    }

    pub fn delay_ms(&self, id: ElementId) -> Option<u64> {
        self.state.borrow().entries.get(&id).map(|e| e.delay_ms)
    }
}

fn on_intersect<T: RevealTarget + 'static>(
    state: Weak<RefCell<State<T>>>,
    timers: Weak<dyn Timers>,
    id: ElementId,
) {
    let (Some(strong), Some(timers)) = (state.upgrade(), timers.upgrade()) else {
        return;
    };
    let delay_ms = match strong.borrow().entries.get(&id) {
        Some(Entry {
            phase: Phase::Hidden,
            delay_ms,
            ..
        }) => *delay_ms,
        _ => return,
    };
    log::trace!("reveal {id}: in view, revealing in {delay_ms}ms");
    let timer = timers.start(
        Duration::from_millis(delay_ms),
        Box::new(move || reveal(state, id)),
    );
    if let Some(entry) = strong.borrow_mut().entries.get_mut(&id) {
        entry.phase = Phase::Pending(timer);
    };
}

fn reveal<T: RevealTarget>(state: Weak<RefCell<State<T>>>, id: ElementId) {
    let Some(state) = state.upgrade() else {
        return;
    };
    let (target, style) = {
        let mut state = state.borrow_mut();
        let Some(entry) = state.entries.get_mut(&id) else {
            return;
        };
        if !matches!(entry.phase, Phase::Pending(_)) {
            return;
        }
        entry.phase = Phase::Revealed;
        (entry.target.take(), RevealStyle::visible(entry.transition))
    };
    if let Some(target) = target {
        log::debug!("reveal {id}: applied");
        target.apply(&style);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reveal::{testing::Recorder, ManualDetector, ManualTimers};

    fn setup() -> (Rc<ManualDetector>, Rc<ManualTimers>, RevealScheduler<Recorder>) {
        let detector = Rc::new(ManualDetector::new());
        let timers = Rc::new(ManualTimers::new());
        let scheduler = RevealScheduler::<Recorder>::new(detector.clone(), timers.clone());
        (detector, timers, scheduler)
    }

    #[test]
    fn test_reveal_after_intersect_and_delay() {
        let (detector, timers, scheduler) = setup();
        let el = Recorder::new();
        let id = scheduler.schedule(el.clone(), &RevealOptions::with_delay(300), 0);
        assert_eq!(scheduler.state(id), Some(RevealState::Hidden));

        // delay alone does nothing before the element is seen
        timers.advance(1000);
        assert_eq!(el.reveal_count(), 0);

        assert!(detector.intersect(id));
        assert_eq!(scheduler.state(id), Some(RevealState::Pending));
        timers.advance(299);
        assert_eq!(el.reveal_count(), 0);
        timers.advance(1);
        assert_eq!(el.reveal_count(), 1);
        assert_eq!(scheduler.state(id), Some(RevealState::Revealed));
        assert_eq!(
            el.applied(),
            vec![RevealStyle::visible(Transition::default())]
        );
    }

    #[test]
    fn test_reveal_exactly_once() {
        let (detector, timers, scheduler) = setup();
        let el = Recorder::new();
        let id = scheduler.schedule(el.clone(), &RevealOptions::default(), 0);

        detector.intersect(id);
        timers.advance(0);
        // leave and re-enter the viewport a few times
        for _ in 0..3 {
            detector.report(id, 0.0);
            detector.intersect(id);
            timers.advance(1000);
        }
        assert_eq!(el.reveal_count(), 1);
        assert!(!detector.is_observed(id));
    }

    #[test]
    fn test_cancel_before_delay_elapses() {
        let (detector, timers, scheduler) = setup();
        let el = Recorder::new();
        let id = scheduler.schedule(el.clone(), &RevealOptions::with_delay(600), 0);
        detector.intersect(id);
        assert_eq!(timers.pending(), 1);

        assert!(scheduler.cancel(id));
        assert_eq!(timers.pending(), 0);
        timers.advance(10_000);
        assert!(el.applied().is_empty());
        assert_eq!(scheduler.state(id), None);
    }

    #[test]
    fn test_cancel_before_intersect() {
        let (detector, timers, scheduler) = setup();
        let el = Recorder::new();
        let id = scheduler.schedule(el.clone(), &RevealOptions::default(), 0);
        assert!(scheduler.cancel(id));
        assert!(!detector.is_observed(id));
        assert!(!detector.intersect(id));
        timers.advance(10_000);
        assert!(el.applied().is_empty());
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let (detector, timers, scheduler) = setup();
        let el = Recorder::new();
        let id = scheduler.schedule(el.clone(), &RevealOptions::default(), 0);
        assert!(scheduler.cancel(id));
        assert!(!scheduler.cancel(id));
        assert!(!scheduler.cancel(ElementId::from_raw(12345)));

        // revealed elements stay revealed
        let shown = Recorder::new();
        let shown_id = scheduler.schedule(shown.clone(), &RevealOptions::default(), 0);
        detector.intersect(shown_id);
        timers.advance(0);
        assert!(!scheduler.cancel(shown_id));
        assert!(!scheduler.cancel(shown_id));
        assert_eq!(scheduler.state(shown_id), Some(RevealState::Revealed));
        assert_eq!(shown.reveal_count(), 1);
    }

    #[test]
    fn test_independent_timers() {
        let (detector, timers, scheduler) = setup();
        let options = RevealOptions::staggered(600, 150);
        let first = Recorder::new();
        let second = Recorder::new();
        let first_id = scheduler.schedule(first.clone(), &options, 0);
        let second_id = scheduler.schedule(second.clone(), &options, 1);
        assert_eq!(scheduler.delay_ms(first_id), Some(600));
        assert_eq!(scheduler.delay_ms(second_id), Some(750));

        // second element scrolls in well before the first
        detector.intersect(second_id);
        timers.advance(750);
        assert_eq!(second.reveal_count(), 1);
        assert_eq!(first.reveal_count(), 0);

        detector.intersect(first_id);
        timers.advance(600);
        assert_eq!(first.reveal_count(), 1);
    }

    #[test]
    fn test_forget_drops_revealed_entry() {
        let (detector, timers, scheduler) = setup();
        let shown = Recorder::new();
        let shown_id = scheduler.schedule(shown.clone(), &RevealOptions::default(), 0);
        detector.intersect(shown_id);
        timers.advance(0);
        assert_eq!(scheduler.state(shown_id), Some(RevealState::Revealed));

        scheduler.forget(shown_id);
        assert_eq!(scheduler.state(shown_id), None);
        assert_eq!(shown.reveal_count(), 1);

        // forgetting a pending element also stops its timer
        let waiting = Recorder::new();
        let waiting_id = scheduler.schedule(waiting.clone(), &RevealOptions::with_delay(500), 0);
        detector.intersect(waiting_id);
        scheduler.forget(waiting_id);
        assert_eq!(timers.pending(), 0);
        timers.advance(1000);
        assert!(waiting.applied().is_empty());
    }

    #[test]
    fn test_dropped_scheduler_never_mutates() {
        let (detector, timers, scheduler) = setup();
        let el = Recorder::new();
        let id = scheduler.schedule(el.clone(), &RevealOptions::with_delay(100), 0);
        detector.intersect(id);
        drop(scheduler);
        timers.advance(1000);
        assert!(el.applied().is_empty());
    }
}
