mod admin;
mod header;
mod homepage;
mod projects;
mod reveal;

use admin::AdminPage;
use header::Header;
use homepage::HomePage;
use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::{components::*, path};

pub use projects::{
    add_project_server, delete_project_server, get_projects_server, upload_media_server,
};
pub use reveal::{Reveal, RevealAt, RevealContext};

pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8" />
                <meta name="viewport" content="width=device-width, initial-scale=1" />
                <AutoReload options=options.clone() />
                <HydrationScripts options />
                <meta name="color-scheme" content="dark" />
                <meta
                    name="description"
                    content="Alexander Morgan - machine learning, cloud computing and full-stack projects"
                />
                <link rel="shortcut icon" type="image/ico" href="/favicon.ico" />
                <link rel="stylesheet" id="leptos" href="/pkg/portfolio-site.css" />
                <MetaTags />
            </head>
            <body class="bg-[#121212] text-white antialiased">
                <App />
            </body>
        </html>
    }
}

#[component]
pub fn App() -> impl IntoView {
    // Provides context that manages stylesheets, titles, meta tags, etc.
    provide_meta_context();

    view! {
        <Title formatter=|title| format!("Alexander Morgan - {title}") />

        <Router>
            <Header />
            <main class="flex flex-col flex-grow items-center mx-auto w-full">
                <Routes fallback=|| "Page not found.".into_view()>
                    <Route path=path!("/") view=HomePage />
                    <Route path=path!("/adminftw") view=AdminPage />
                </Routes>
            </main>
            <Footer />
        </Router>
    }
}

#[component]
fn Footer() -> impl IntoView {
    let built = env!("BUILD_TIME");
    view! {
        <footer class="py-8 text-center text-sm text-neutral-500 border-t border-neutral-800">
            <p>"© Alexander Morgan"</p>
            <p class="mt-1">"Built " {built}</p>
        </footer>
    }
}
