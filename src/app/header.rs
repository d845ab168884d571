use leptos::prelude::*;
use leptos_router::components::*;
use leptos_use::{signal_debounced, use_window_scroll};

/// Scroll offset past which the header turns opaque.
const SCROLLED_PX: f64 = 50.0;
const SCROLL_DEBOUNCE_MS: f64 = 100.0;

#[component]
pub fn Header() -> impl IntoView {
    let (_, scroll_y) = use_window_scroll();
    let scroll_y: Signal<f64> = signal_debounced(scroll_y, SCROLL_DEBOUNCE_MS);
    let scrolled = Memo::new(move |_| scroll_y.get() > SCROLLED_PX);

    let nav_link = |href: &'static str, label: &'static str| {
        view! {
            <a href=href class="px-3 py-2 text-sm text-neutral-300 hover:text-white transition-colors duration-200">
                {label}
            </a>
        }
    };

    view! {
        <header class=move || {
            if scrolled.get() {
                "fixed top-0 inset-x-0 z-50 bg-black/80 backdrop-blur-md shadow-lg transition-all duration-300"
            } else {
                "fixed top-0 inset-x-0 z-50 bg-transparent transition-all duration-300"
            }
        }>
            <div class="mx-auto max-w-6xl px-4 sm:px-6 lg:px-8 py-4 flex items-center justify-between">
                <A href="/" attr:class="text-xl font-bold">
                    "Alexander Morgan"
                </A>
                <nav class="flex flex-wrap items-center">
                    {nav_link("/#about", "About")}
                    {nav_link("/#skills", "Skills")}
                    {nav_link("/#projects", "Projects")}
                    {nav_link("/#contact", "Contact")}
                </nav>
            </div>
        </header>
    }
}
