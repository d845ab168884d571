use std::{
    cell::{Cell, RefCell},
    collections::BTreeMap,
    fmt,
    time::Duration,
};

pub type TimerCallback = Box<dyn FnOnce()>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

impl TimerId {
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timer#{}", self.0)
    }
}

/// One-shot, non-blocking delays on the UI task queue.
///
/// `start` must never run the callback before returning, even for a zero
/// delay. Cancelling a timer that already fired is a no-op.
pub trait Timers {
    fn start(&self, delay: Duration, callback: TimerCallback) -> TimerId;
    fn cancel(&self, id: TimerId);
}

/// Virtual clock for tests: time only moves when [`ManualTimers::advance`] is
/// called.
#[derive(Default)]
pub struct ManualTimers {
    now_ms: Cell<u64>,
    next_id: Cell<u64>,
    // keyed by (deadline, id) so equal deadlines fire in start order
    queue: RefCell<BTreeMap<(u64, TimerId), TimerCallback>>,
}

impl ManualTimers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms.get()
    }

    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Deadlines of the timers still waiting, in firing order.
    pub fn deadlines(&self) -> Vec<u64> {
        self.queue.borrow().keys().map(|(at, _)| *at).collect()
    }

    /// Moves the clock forward, firing every timer that falls due on the way.
    /// Returns how many fired.
    pub fn advance(&self, ms: u64) -> usize {
        let until = self.now_ms.get().saturating_add(ms);
        let mut fired = 0;
        loop {
            let next = {
                let mut queue = self.queue.borrow_mut();
                let due = queue
                    .first_key_value()
                    .is_some_and(|(&(at, _), _)| at <= until);
                if due {
                    queue.pop_first()
                } else {
                    None
                }
            };
            let Some(((at, _), callback)) = next else {
                break;
            };
            self.now_ms.set(at);
            callback();
            fired += 1;
        }
        self.now_ms.set(until);
        fired
    }
}

impl Timers for ManualTimers {
    fn start(&self, delay: Duration, callback: TimerCallback) -> TimerId {
        let id = TimerId(self.next_id.get());
        self.next_id.set(self.next_id.get() + 1);
        let delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        let at = self.now_ms.get().saturating_add(delay_ms);
        self.queue.borrow_mut().insert((at, id), callback);
        id
    }

    fn cancel(&self, id: TimerId) {
        self.queue.borrow_mut().retain(|(_, queued), _| *queued != id);
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;

    fn log_into(log: &Rc<RefCell<Vec<&'static str>>>, name: &'static str) -> TimerCallback {
        let log = log.clone();
        Box::new(move || log.borrow_mut().push(name))
    }

    #[test]
    fn test_fires_in_deadline_order() {
        let timers = ManualTimers::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        timers.start(Duration::from_millis(750), log_into(&log, "late"));
        timers.start(Duration::from_millis(600), log_into(&log, "early"));

        assert_eq!(timers.advance(599), 0);
        assert_eq!(timers.advance(1), 1);
        assert_eq!(*log.borrow(), vec!["early"]);
        assert_eq!(timers.advance(1000), 1);
        assert_eq!(*log.borrow(), vec!["early", "late"]);
        assert_eq!(timers.now_ms(), 1600);
    }

    #[test]
    fn test_zero_delay_waits_for_advance() {
        let timers = ManualTimers::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        timers.start(Duration::ZERO, log_into(&log, "now"));
        assert!(log.borrow().is_empty());
        assert_eq!(timers.advance(0), 1);
        assert_eq!(*log.borrow(), vec!["now"]);
    }

    #[test]
    fn test_cancel() {
        let timers = ManualTimers::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let id = timers.start(Duration::from_millis(10), log_into(&log, "cancelled"));
        timers.start(Duration::from_millis(20), log_into(&log, "kept"));
        timers.cancel(id);
        // cancelling twice is fine
        timers.cancel(id);
        assert_eq!(timers.pending(), 1);
        timers.advance(100);
        assert_eq!(*log.borrow(), vec!["kept"]);
    }

    #[test]
    fn test_callback_can_start_timers() {
        let timers = Rc::new(ManualTimers::new());
        let log = Rc::new(RefCell::new(Vec::new()));
        let inner_timers = timers.clone();
        let inner_log = log.clone();
        timers.start(
            Duration::from_millis(5),
            Box::new(move || {
                inner_log.borrow_mut().push("outer");
                inner_timers.start(Duration::from_millis(5), log_into(&inner_log, "inner"));
            }),
        );
        assert_eq!(timers.advance(10), 2);
        assert_eq!(*log.borrow(), vec!["outer", "inner"]);
    }
}
