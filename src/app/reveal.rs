use leptos::{html, prelude::*};
use web_sys::HtmlElement;

use crate::reveal::{ElementId, ElementRegistry, RevealOptions, RevealStyle, SlotKey};

type Registry = ElementRegistry<HtmlElement>;

/// Page-scoped owner of the reveal registry.
///
/// The registry only exists in the browser; on the server every element is
/// rendered hidden and nothing is registered.
#[derive(Clone, Copy)]
pub struct RevealContext {
    registry: StoredValue<Option<Registry>, LocalStorage>,
}

impl RevealContext {
    pub fn provide() -> Self {
        let ctx = Self {
            registry: StoredValue::new_local(None),
        };
        provide_context(ctx);
        on_cleanup(move || {
            ctx.registry.try_update_value(clear_existing);
        });
        ctx
    }

    pub fn with_registry<R>(&self, f: impl FnOnce(&mut Registry) -> R) -> Option<R> {
        self.registry
            .try_update_value(|registry| {
                if registry.is_none() {
                    *registry = create_registry();
                }
                registry.as_mut().map(f)
            })
            .flatten()
    }

    /// Keeps a list slot in step with the rendered list.
    pub fn resize(&self, list: &str, len: usize) {
        if let Some(dropped) = self.with_registry(|registry| registry.resize(list, len)) {
            if dropped > 0 {
                log::debug!("reveal: {list} shrank to {len}, dropped {dropped}");
            }
        }
    }
}

// clears a registry that was created, without creating one
fn clear_existing(registry: &mut Option<Registry>) {
    if let Some(registry) = registry.as_mut() {
        registry.clear();
    }
}

#[cfg(feature = "hydrate")]
fn create_registry() -> Option<Registry> {
    use std::rc::Rc;

    use crate::reveal::dom::{DomDetector, DomTimers};

    log::debug!("reveal: creating registry");
    Some(ElementRegistry::new(
        Rc::new(DomDetector::new()),
        Rc::new(DomTimers::new()),
    ))
}

#[cfg(not(feature = "hydrate"))]
fn create_registry() -> Option<Registry> {
    None
}

// Registers the element behind `node_ref` once it is mounted and releases
// that registration (and only that one) on cleanup.
fn register_on_mount(
    ctx: RevealContext,
    node_ref: NodeRef<html::Div>,
    register: impl Fn(&mut Registry, HtmlElement) -> ElementId + 'static,
) {
    let registered = StoredValue::new_local(None::<ElementId>);
    Effect::new(move |_| {
        let Some(el) = node_ref.get() else {
            return;
        };
        let el: HtmlElement = el.into();
        if let Some(id) = ctx.with_registry(|registry| register(registry, el)) {
            registered.set_value(Some(id));
        }
    });
    on_cleanup(move || {
        if let Some(Some(id)) = registered.try_get_value() {
            ctx.with_registry(|registry| registry.release(id));
        }
    });
}

/// Fades its children in the first time they scroll into view.
#[component]
pub fn Reveal(
    #[prop(into)] name: String,
    #[prop(optional)] delay_ms: u64,
    #[prop(optional, into)] class: String,
    children: Children,
) -> impl IntoView {
    let ctx = expect_context::<RevealContext>();
    let node_ref = NodeRef::<html::Div>::new();
    let key = SlotKey::named(name);
    let options = RevealOptions::with_delay(delay_ms);
    register_on_mount(ctx, node_ref, move |registry, el| {
        registry.register(key.clone(), el, &options)
    });

    view! {
        <div node_ref=node_ref class=class style=RevealStyle::hidden().to_css()>
            {children()}
        </div>
    }
}

/// Item `index` of a revealed list; staggered by its position.
#[component]
pub fn RevealAt(
    #[prop(into)] list: String,
    index: usize,
    options: RevealOptions,
    #[prop(optional, into)] class: String,
    children: Children,
) -> impl IntoView {
    let ctx = expect_context::<RevealContext>();
    let node_ref = NodeRef::<html::Div>::new();
    register_on_mount(ctx, node_ref, move |registry, el| {
        registry.register_at(&list, index, el, &options)
    });

    view! {
        <div node_ref=node_ref class=class style=RevealStyle::hidden().to_css()>
            {children()}
        </div>
    }
}
