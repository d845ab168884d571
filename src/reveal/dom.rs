//! Browser implementations of the reveal traits.

use std::{
    cell::{Cell, RefCell},
    collections::HashMap,
    rc::{Rc, Weak},
    time::Duration,
};

use leptos::prelude::{set_timeout_with_handle, TimeoutHandle};
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{
    js_sys::Array, Element, HtmlElement, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit,
};

use super::{
    ElementId, IntersectCallback, ObserveOptions, RevealStyle, RevealTarget, TimerCallback,
    TimerId, Timers, VisibilityDetector,
};

const ID_ATTR: &str = "data-reveal-id";

impl RevealTarget for HtmlElement {
    fn apply(&self, style: &RevealStyle) {
        let css = self.style();
        let mut result = Ok(());
        if let Some(transition) = &style.transition {
            result = result.and(css.set_property("transition", &transition.css()));
        }
        result = result
            .and(css.set_property("opacity", &style.opacity_css()))
            .and(css.set_property("transform", &style.transform_css()));
        if let Err(e) = result {
            log::warn!("reveal: couldn't set style: {e:?}");
        }
    }
}

// observers are shared by elements watched with identical options
type ObserverKey = (u64, u32);

fn observer_key(options: &ObserveOptions) -> ObserverKey {
    (options.threshold.to_bits(), options.root_margin_px)
}

struct Observer {
    observer: IntersectionObserver,
    _callback: Closure<dyn FnMut(Array, IntersectionObserver)>,
}

struct Watch {
    element: Element,
    key: ObserverKey,
    options: ObserveOptions,
    on_intersect: IntersectCallback,
}

#[derive(Default)]
struct DetectorState {
    observers: HashMap<ObserverKey, Observer>,
    watched: HashMap<ElementId, Watch>,
}

/// [`VisibilityDetector`] backed by `IntersectionObserver`.
#[derive(Default)]
pub struct DomDetector {
    state: Rc<RefCell<DetectorState>>,
}

impl DomDetector {
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure_observer(&self, options: &ObserveOptions) -> Result<(), JsValue> {
        let key = observer_key(options);
        if self.state.borrow().observers.contains_key(&key) {
            return Ok(());
        }
        let weak = Rc::downgrade(&self.state);
        let callback = Closure::<dyn FnMut(Array, IntersectionObserver)>::new(
            move |entries: Array, _observer: IntersectionObserver| {
                handle_entries(&weak, entries);
            },
        );
        let init = IntersectionObserverInit::new();
        init.set_threshold(&JsValue::from_f64(options.threshold));
        init.set_root_margin(&options.root_margin());
        let observer =
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)?;
        self.state.borrow_mut().observers.insert(
            key,
            Observer {
                observer,
                _callback: callback,
            },
        );
        Ok(())
    }
}

fn handle_entries(state: &Weak<RefCell<DetectorState>>, entries: Array) {
    let Some(state) = state.upgrade() else {
        return;
    };
    let mut fired = Vec::new();
    {
        let mut state = state.borrow_mut();
        for entry in entries.iter() {
            let entry = entry.unchecked_into::<IntersectionObserverEntry>();
            let Some(id) = entry
                .target()
                .get_attribute(ID_ATTR)
                .and_then(|raw| raw.parse::<u64>().ok())
                .map(ElementId::from_raw)
            else {
                continue;
            };
            let crossed = state.watched.get(&id).is_some_and(|w| {
                entry.is_intersecting() && w.options.is_satisfied_by(entry.intersection_ratio())
            });
            if !crossed {
                continue;
            }
            if let Some(watch) = state.watched.remove(&id) {
                if let Some(observer) = state.observers.get(&watch.key) {
                    observer.observer.unobserve(&watch.element);
                }
                let _ = watch.element.remove_attribute(ID_ATTR);
                fired.push(watch.on_intersect);
            }
        }
    }
    // run outside the borrow: callbacks may observe or unobserve again
    for on_intersect in fired {
        on_intersect();
    }
}

impl VisibilityDetector<HtmlElement> for DomDetector {
    fn observe(
        &self,
        id: ElementId,
        target: &HtmlElement,
        options: ObserveOptions,
        on_intersect: IntersectCallback,
    ) {
        if let Err(e) = self.ensure_observer(&options) {
            // never leave content stuck invisible
            log::warn!("reveal: IntersectionObserver unavailable ({e:?}), showing {id} now");
            on_intersect();
            return;
        }
        let element: Element = target.clone().into();
        if let Err(e) = element.set_attribute(ID_ATTR, &id.to_string()) {
            log::warn!("reveal: couldn't tag element {id}: {e:?}");
        }
        let key = observer_key(&options);
        let mut state = self.state.borrow_mut();
        if let Some(observer) = state.observers.get(&key) {
            observer.observer.observe(&element);
        }
        state.watched.insert(
            id,
            Watch {
                element,
                key,
                options,
                on_intersect,
            },
        );
    }

    fn unobserve(&self, id: ElementId) {
        let mut state = self.state.borrow_mut();
        if let Some(watch) = state.watched.remove(&id) {
            if let Some(observer) = state.observers.get(&watch.key) {
                observer.observer.unobserve(&watch.element);
            }
            let _ = watch.element.remove_attribute(ID_ATTR);
        }
    }
}

impl Drop for DomDetector {
    fn drop(&mut self) {
        for observer in self.state.borrow().observers.values() {
            observer.observer.disconnect();
        }
    }
}

/// [`Timers`] on top of `setTimeout`.
#[derive(Default)]
pub struct DomTimers {
    next_id: Cell<u64>,
    handles: Rc<RefCell<HashMap<TimerId, TimeoutHandle>>>,
}

impl DomTimers {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Timers for DomTimers {
    fn start(&self, delay: Duration, callback: TimerCallback) -> TimerId {
        let id = TimerId::from_raw(self.next_id.get());
        self.next_id.set(self.next_id.get() + 1);
        let handles = Rc::downgrade(&self.handles);
        let fire = move || {
            if let Some(handles) = handles.upgrade() {
                handles.borrow_mut().remove(&id);
            }
            callback();
        };
        match set_timeout_with_handle(fire, delay) {
            Ok(handle) => {
                self.handles.borrow_mut().insert(id, handle);
            }
            Err(e) => log::error!("reveal: couldn't start {id}: {e:?}"),
        }
        id
    }

    fn cancel(&self, id: TimerId) {
        if let Some(handle) = self.handles.borrow_mut().remove(&id) {
            handle.clear();
        }
    }
}

impl Drop for DomTimers {
    fn drop(&mut self) {
        for (_, handle) in self.handles.borrow_mut().drain() {
            handle.clear();
        }
    }
}
