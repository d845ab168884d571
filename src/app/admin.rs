use leptos::{ev::SubmitEvent, html, prelude::*, task::spawn_local};
use leptos_meta::Title;

#[cfg(feature = "hydrate")]
use codee::string::JsonSerdeWasmCodec;
#[cfg(feature = "hydrate")]
use leptos_use::storage::use_local_storage;

use super::projects::{
    add_project_server, delete_project_server, load_projects, server_message, upload_media_server,
};
use crate::projects::{NewProject, CATEGORIES};

#[cfg(feature = "hydrate")]
const DRAFT_KEY: &str = "project_draft";

#[derive(Debug, Clone, PartialEq)]
enum Status {
    Idle,
    Uploading,
    Submitting,
    Saved(String),
    Failed(String),
}

async fn read_file(file: &web_sys::File) -> Result<Vec<u8>, String> {
    let buf = wasm_bindgen_futures::JsFuture::from(file.array_buffer())
        .await
        .map_err(|e| format!("couldn't read file: {e:?}"))?;
    Ok(web_sys::js_sys::Uint8Array::new(&buf).to_vec())
}

const INPUT_CLASS: &str = "w-full px-4 py-2 bg-black/50 border border-gray-700 rounded-lg focus:outline-none focus:border-blue-500";

#[component]
pub fn AdminPage() -> impl IntoView {
    // the draft survives reloads and failed submissions
    #[cfg(feature = "hydrate")]
    let (draft, set_draft, _) = use_local_storage::<NewProject, JsonSerdeWasmCodec>(DRAFT_KEY);
    #[cfg(not(feature = "hydrate"))]
    let (draft, set_draft) = signal(NewProject::default());

    let (status, set_status) = signal(Status::Idle);
    let (version, set_version) = signal(0_u32);
    let projects = Resource::new(move || version.get(), |_| load_projects());
    let file_ref = NodeRef::<html::Input>::new();

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        let project = draft.get_untracked().normalized();
        if let Err(e) = project.validate() {
            set_status(Status::Failed(e.user_message()));
            return;
        }
        set_status(Status::Submitting);
        log::debug!("submitting project {}", project.title);
        spawn_local(async move {
            match add_project_server(project).await {
                Ok(()) => {
                    set_draft.set(NewProject::default());
                    set_status(Status::Saved("Project added successfully!".to_string()));
                    set_version.update(|v| *v += 1);
                }
                Err(e) => {
                    let msg = server_message(e);
                    log::warn!("add project failed: {msg}");
                    set_status(Status::Failed(format!("Failed to add project: {msg}")));
                }
            }
        });
    };

    let on_file = move |_| {
        let Some(file) = file_ref
            .get_untracked()
            .and_then(|input| input.files())
            .and_then(|files| files.get(0))
        else {
            return;
        };
        let content_type = match file.type_() {
            t if t.is_empty() => "application/octet-stream".to_string(),
            t => t,
        };
        set_status(Status::Uploading);
        spawn_local(async move {
            let data = match read_file(&file).await {
                Ok(data) => data,
                Err(e) => {
                    set_status(Status::Failed(e));
                    return;
                }
            };
            match upload_media_server(content_type, data).await {
                Ok(upload) => {
                    set_draft.update(|d| d.image_url = upload.url);
                    set_status(Status::Saved("Image uploaded".to_string()));
                }
                Err(e) => set_status(Status::Failed(format!(
                    "Upload failed: {}",
                    server_message(e)
                ))),
            }
        });
    };

    let on_delete = move |id: String| {
        spawn_local(async move {
            match delete_project_server(id).await {
                Ok(()) => {
                    set_status(Status::Saved("Project deleted".to_string()));
                    set_version.update(|v| *v += 1);
                }
                Err(e) => set_status(Status::Failed(format!(
                    "Failed to delete project: {}",
                    server_message(e)
                ))),
            }
        });
    };

    view! {
        <Title text="Admin" />
        <div class="w-full max-w-2xl mx-auto px-4 pt-28 pb-16">
            <h1 class="text-3xl font-bold mb-8 bg-clip-text text-transparent bg-gradient-to-r from-blue-400 to-purple-500">
                "Admin Dashboard"
            </h1>

            <div class="bg-black/30 backdrop-blur-md border border-gray-800 rounded-xl p-6">
                <h2 class="text-xl font-semibold mb-6">"Add New Project"</h2>
                <form on:submit=on_submit class="space-y-6">
                    <div>
                        <label class="block text-sm font-medium mb-2">"Title"</label>
                        <input
                            type="text"
                            class=INPUT_CLASS
                            required
                            prop:value=move || draft.with(|d| d.title.clone())
                            on:input=move |ev| set_draft.update(|d| d.title = event_target_value(&ev))
                        />
                    </div>
                    <div>
                        <label class="block text-sm font-medium mb-2">"Category"</label>
                        <select
                            class=INPUT_CLASS
                            required
                            prop:value=move || draft.with(|d| d.category.clone())
                            on:change=move |ev| {
                                set_draft.update(|d| d.category = event_target_value(&ev))
                            }
                        >
                            <option value="">"Select a category"</option>
                            {CATEGORIES
                                .into_iter()
                                .map(|c| view! { <option value=c>{c}</option> })
                                .collect_view()}
                        </select>
                    </div>
                    <div>
                        <label class="block text-sm font-medium mb-2">"Description"</label>
                        <textarea
                            class=format!("{INPUT_CLASS} h-32")
                            required
                            prop:value=move || draft.with(|d| d.description.clone())
                            on:input=move |ev| {
                                set_draft.update(|d| d.description = event_target_value(&ev))
                            }
                        ></textarea>
                    </div>
                    <div>
                        <label class="block text-sm font-medium mb-2">"Image URL"</label>
                        <input
                            type="url"
                            class=INPUT_CLASS
                            required
                            prop:value=move || draft.with(|d| d.image_url.clone())
                            on:input=move |ev| {
                                set_draft.update(|d| d.image_url = event_target_value(&ev))
                            }
                        />
                        <input
                            type="file"
                            accept="image/*"
                            class="mt-2 text-sm text-neutral-400"
                            node_ref=file_ref
                            on:change=on_file
                        />
                    </div>
                    <div>
                        <label class="block text-sm font-medium mb-2">"GitHub (optional)"</label>
                        <input
                            type="url"
                            class=INPUT_CLASS
                            prop:value=move || draft.with(|d| d.github.clone().unwrap_or_default())
                            on:input=move |ev| {
                                set_draft.update(|d| d.github = Some(event_target_value(&ev)))
                            }
                        />
                    </div>
                    <div>
                        <label class="block text-sm font-medium mb-2">"Website (optional)"</label>
                        <input
                            type="url"
                            class=INPUT_CLASS
                            prop:value=move || draft.with(|d| d.website.clone().unwrap_or_default())
                            on:input=move |ev| {
                                set_draft.update(|d| d.website = Some(event_target_value(&ev)))
                            }
                        />
                    </div>
                    <button
                        type="submit"
                        disabled=move || {
                            matches!(status.get(), Status::Submitting | Status::Uploading)
                        }
                        class="px-6 py-3 bg-gradient-to-r from-blue-500 to-purple-600 text-white rounded-lg shadow-lg hover:shadow-blue-500/25 transition-all duration-300 disabled:opacity-50"
                    >
                        "Add Project"
                    </button>
                    {move || match status.get() {
                        Status::Idle => None,
                        Status::Uploading => {
                            Some(view! { <p class="text-sm text-neutral-400">"Uploading..."</p> }.into_any())
                        }
                        Status::Submitting => {
                            Some(view! { <p class="text-sm text-neutral-400">"Saving..."</p> }.into_any())
                        }
                        Status::Saved(msg) => {
                            Some(view! { <p class="text-sm text-green-400">{msg}</p> }.into_any())
                        }
                        Status::Failed(msg) => {
                            Some(view! { <p class="text-sm text-red-400">{msg}</p> }.into_any())
                        }
                    }}
                </form>
            </div>

            <div class="mt-10">
                <h2 class="text-xl font-semibold mb-4">"Projects"</h2>
                <Transition fallback=move || view! { <div class="loading-skeleton h-24 rounded"></div> }>
                    {move || Suspend::new(async move {
                        let projects = projects.await;
                        if projects.is_empty() {
                            return view! { <p class="text-neutral-500">"No projects yet."</p> }
                                .into_any();
                        }
                        view! {
                            <ul class="space-y-2">
                                {projects
                                    .into_iter()
                                    .map(|p| {
                                        let id = p.id.clone();
                                        view! {
                                            <li class="flex items-center justify-between p-3 rounded-lg bg-black/30 border border-gray-800">
                                                <div>
                                                    <span class="font-medium">{p.title}</span>
                                                    <span class="ml-2 text-xs text-neutral-500">
                                                        {p.category}
                                                    </span>
                                                </div>
                                                <button
                                                    class="text-sm text-red-400 hover:text-red-300"
                                                    on:click=move |_| on_delete(id.clone())
                                                >
                                                    "Delete"
                                                </button>
                                            </li>
                                        }
                                    })
                                    .collect_view()}
                            </ul>
                        }
                            .into_any()
                    })}
                </Transition>
            </div>
        </div>
    }
}
