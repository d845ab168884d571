use leptos::prelude::*;
use leptos::server_fn::codec::{GetUrl, Json};

#[cfg(feature = "ssr")]
use crate::projects::client::PROJECTS_CLIENT;
use crate::{
    projects::{
        listing_or_empty, MediaUpload, NewProject, Project, ProjectError, CARD_BASE_DELAY_MS,
        CARD_STAGGER_MS, PROJECTS_LIST,
    },
    reveal::RevealOptions,
};

use super::reveal::{RevealAt, RevealContext};

#[cfg(feature = "ssr")]
fn to_server_error(e: ProjectError) -> ServerFnError {
    ServerFnError::new(e.user_message())
}

/// Plain message carried by a server function error.
pub fn server_message(e: ServerFnError) -> String {
    match e {
        ServerFnError::ServerError(msg) => msg,
        other => other.to_string(),
    }
}

#[server(input = GetUrl)]
pub async fn get_projects_server() -> Result<Vec<Project>, ServerFnError> {
    Ok(PROJECTS_CLIENT.list_or_empty().await)
}

#[server(input = Json)]
pub async fn add_project_server(project: NewProject) -> Result<(), ServerFnError> {
    PROJECTS_CLIENT.add(&project).await.map_err(to_server_error)
}

#[server(input = Json)]
pub async fn delete_project_server(id: String) -> Result<(), ServerFnError> {
    PROJECTS_CLIENT.delete(&id).await.map_err(to_server_error)
}

#[server(input = Json)]
pub async fn upload_media_server(
    content_type: String,
    data: Vec<u8>,
) -> Result<MediaUpload, ServerFnError> {
    PROJECTS_CLIENT
        .upload_media(&content_type, data)
        .await
        .map_err(to_server_error)
}

/// Loads the project list; any failure shows up as an empty list.
pub async fn load_projects() -> Vec<Project> {
    listing_or_empty(
        get_projects_server()
            .await
            .map_err(|e| ProjectError::Network(server_message(e))),
    )
}

#[component]
pub fn ProjectsSection() -> impl IntoView {
    let projects = Resource::new(|| (), |_| load_projects());
    let reveal = expect_context::<RevealContext>();
    Effect::new(move |_| {
        if let Some(projects) = projects.get() {
            reveal.resize(PROJECTS_LIST, projects.len());
        }
    });
    let card_options = RevealOptions::staggered(CARD_BASE_DELAY_MS, CARD_STAGGER_MS);

    view! {
        <Transition fallback=move || {
            view! {
                <div class="grid grid-cols-1 md:grid-cols-2 lg:grid-cols-3 gap-6 w-full max-w-6xl px-4">
                    <div class="loading-skeleton h-64 rounded-xl"></div>
                    <div class="loading-skeleton h-64 rounded-xl"></div>
                    <div class="loading-skeleton h-64 rounded-xl"></div>
                </div>
            }
        }>
            {move || Suspend::new(async move {
                let projects = projects.await;
                // no grid at all when there is nothing to show
                (!projects.is_empty())
                    .then(|| {
                        view! {
                            <section id="projects" class="w-full max-w-6xl px-4 py-16">
                                <h2 class="text-3xl font-bold mb-8 text-center">"Projects"</h2>
                                <div class="grid grid-cols-1 md:grid-cols-2 lg:grid-cols-3 gap-6">
                                    {projects
                                        .into_iter()
                                        .enumerate()
                                        .map(|(index, project)| {
                                            view! {
                                                <RevealAt list=PROJECTS_LIST index options=card_options>
                                                    <ProjectCard project />
                                                </RevealAt>
                                            }
                                        })
                                        .collect_view()}
                                </div>
                            </section>
                        }
                    })
            })}
        </Transition>
    }
}

#[component]
pub fn ProjectCard(project: Project) -> impl IntoView {
    let created = project.created_at_label();
    view! {
        <article class="h-full bg-black/30 backdrop-blur-md border border-neutral-800 rounded-xl overflow-hidden hover:border-blue-500/50 transition-colors duration-300">
            <img src=project.image_url alt=project.title.clone() class="w-full h-48 object-cover" />
            <div class="p-5">
                <div class="flex items-center justify-between mb-2 text-xs">
                    <span class="px-2 py-1 rounded bg-blue-500/20 text-blue-300">
                        {project.category}
                    </span>
                    {created.map(|d| view! { <span class="text-neutral-500">{d}</span> })}
                </div>
                <h3 class="text-xl font-semibold mb-2">{project.title}</h3>
                <p class="text-sm text-neutral-400 leading-relaxed">{project.description}</p>
                <div class="flex gap-4 mt-4 text-sm">
                    {project
                        .github
                        .map(|url| {
                            view! {
                                <a
                                    href=url
                                    target="_blank"
                                    rel="noopener noreferrer"
                                    class="text-neutral-300 hover:text-white"
                                >
                                    "GitHub"
                                </a>
                            }
                        })}
                    {project
                        .website
                        .map(|url| {
                            view! {
                                <a
                                    href=url
                                    target="_blank"
                                    rel="noopener noreferrer"
                                    class="text-blue-400 hover:text-blue-300"
                                >
                                    "Live site"
                                </a>
                            }
                        })}
                </div>
            </div>
        </article>
    }
}
