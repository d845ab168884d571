use std::{collections::HashMap, fmt, rc::Rc};

use super::{
    ElementId, RevealOptions, RevealScheduler, RevealState, RevealTarget, Timers,
    VisibilityDetector,
};

/// A place on the page an element can be registered under.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SlotKey {
    /// Fixed slot such as "hero-title".
    Named(String),
    /// Item `index` of a list whose length can change between renders.
    Indexed { list: String, index: usize },
}

impl SlotKey {
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    pub fn indexed(list: impl Into<String>, index: usize) -> Self {
        Self::Indexed {
            list: list.into(),
            index,
        }
    }

    fn stagger_index(&self) -> usize {
        match self {
            Self::Named(_) => 0,
            Self::Indexed { index, .. } => *index,
        }
    }
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => write!(f, "{name}"),
            Self::Indexed { list, index } => write!(f, "{list}[{index}]"),
        }
    }
}

struct Registration<T> {
    id: ElementId,
    target: T,
}

/// Maps page slots to elements and hands them to the reveal scheduler.
///
/// A node lives in at most one slot; registering it again (in the same or
/// another slot) replaces the previous registration. A node is revealed at
/// most once for the registry's lifetime: once revealed it keeps its
/// [`ElementId`] wherever it is registered next.
pub struct ElementRegistry<T> {
    scheduler: RevealScheduler<T>,
    slots: HashMap<SlotKey, Registration<T>>,
    // revealed nodes that have left their slot
    revealed: Vec<Registration<T>>,
}

impl<T> ElementRegistry<T>
where
    T: RevealTarget + Clone + PartialEq + 'static,
{
    pub fn new(detector: Rc<dyn VisibilityDetector<T>>, timers: Rc<dyn Timers>) -> Self {
        Self {
            scheduler: RevealScheduler::new(detector, timers),
            slots: HashMap::new(),
            revealed: Vec::new(),
        }
    }

    /// Registers `target` under a fixed slot.
    pub fn register(&mut self, key: SlotKey, target: T, options: &RevealOptions) -> ElementId {
        self.insert(key, target, options)
    }

    /// Registers `target` as item `index` of `list`; its delay is staggered by
    /// `index`.
    pub fn register_at(
        &mut self,
        list: &str,
        index: usize,
        target: T,
        options: &RevealOptions,
    ) -> ElementId {
        self.insert(SlotKey::indexed(list, index), target, options)
    }

    fn insert(&mut self, key: SlotKey, target: T, options: &RevealOptions) -> ElementId {
        if let Some(existing) = self.slots.get(&key) {
            if existing.target == target {
                // same node mounted again: keep its one reveal
                return existing.id;
            }
        }
        self.unregister(&key);
        let elsewhere = self
            .slots
            .iter()
            .find(|(_, reg)| reg.target == target)
            .map(|(k, _)| k.clone());
        if let Some(other) = elsewhere {
            log::debug!("reveal: node moved from {other} to {key}");
            self.unregister(&other);
        }
        if let Some(pos) = self.revealed.iter().position(|reg| reg.target == target) {
            let reg = self.revealed.swap_remove(pos);
            let id = reg.id;
            log::debug!("reveal: {key} reuses {id}, already revealed");
            self.slots.insert(key, reg);
            return id;
        }

        let id = self
            .scheduler
            .schedule(target.clone(), options, key.stagger_index());
        self.slots.insert(key, Registration { id, target });
        id
    }

    /// Drops the registration in `key`, cancelling a reveal that has not
    /// happened yet. Unknown or already-removed slots are ignored.
    pub fn unregister(&mut self, key: &SlotKey) -> bool {
        match self.slots.remove(key) {
            Some(reg) => {
                if self.scheduler.state(reg.id) == Some(RevealState::Revealed) {
                    self.revealed.push(reg);
                } else {
                    self.scheduler.cancel(reg.id);
                }
                true
            }
            None => false,
        }
    }

    /// Drops whichever slot currently holds `id`. Used by owners that may be
    /// cleaned up after their slot was taken over by a newer element.
    pub fn release(&mut self, id: ElementId) -> bool {
        let key = self
            .slots
            .iter()
            .find(|(_, reg)| reg.id == id)
            .map(|(k, _)| k.clone());
        match key {
            Some(key) => self.unregister(&key),
            None => false,
        }
    }

    /// Shrinks `list` to `len` items, unregistering the slots past the end.
    /// Returns how many were removed.
    pub fn resize(&mut self, list: &str, len: usize) -> usize {
        let stale = self
            .slots
            .keys()
            .filter(|k| matches!(k, SlotKey::Indexed { list: l, index } if l == list && *index >= len))
            .cloned()
            .collect::<Vec<_>>();
        for key in &stale {
            self.unregister(key);
        }
        stale.len()
    }

    pub fn resolve(&self, key: &SlotKey) -> Option<&T> {
        self.slots.get(key).map(|reg| &reg.target)
    }

    pub fn element_id(&self, key: &SlotKey) -> Option<ElementId> {
        self.slots.get(key).map(|reg| reg.id)
    }

    pub fn state(&self, key: &SlotKey) -> Option<RevealState> {
        self.element_id(key).and_then(|id| self.scheduler.state(id))
    }

    pub fn delay_ms(&self, key: &SlotKey) -> Option<u64> {
        self.element_id(key).and_then(|id| self.scheduler.delay_ms(id))
    }

    pub fn list_len(&self, list: &str) -> usize {
        self.slots
            .keys()
            .filter(|k| matches!(k, SlotKey::Indexed { list: l, .. } if l == list))
            .count()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Unregisters everything and forgets past reveals, e.g. when the page
    /// unmounts.
    pub fn clear(&mut self) {
        let ids = self
            .slots
            .drain()
            .map(|(_, reg)| reg.id)
            .chain(self.revealed.drain(..).map(|reg| reg.id))
            .collect::<Vec<_>>();
        for id in ids {
            self.scheduler.forget(id);
        }
    }
}
