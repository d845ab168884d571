use leptos::prelude::*;
use leptos_meta::Title;

use super::{
    projects::ProjectsSection,
    reveal::{Reveal, RevealAt, RevealContext},
};
use crate::reveal::RevealOptions;

const SKILLS: [(&str, &str); 3] = [
    (
        "Artificial Intelligence / Machine Learning",
        "Model training and evaluation, data pipelines, deploying inference behind APIs.",
    ),
    (
        "Cloud Computing",
        "Serverless functions, managed databases and blob storage, CI/CD on Azure.",
    ),
    (
        "Full-Stack Development",
        "Typed frontends, REST backends and everything needed to ship them.",
    ),
];

#[component]
pub fn HomePage() -> impl IntoView {
    RevealContext::provide();
    let skill_options = RevealOptions::staggered(200, 150);

    view! {
        <Title text="Portfolio" />
        <section class="min-h-screen w-full flex items-center justify-center px-4">
            <Reveal name="hero" delay_ms=300 class="flex flex-col gap-4 items-center text-center">
                <h1 class="text-3xl md:text-7xl font-bold">"Alexander Morgan"</h1>
                <p class="font-extralight text-base md:text-3xl text-neutral-200 py-4">
                    "Artificial Intelligence/Machine Learning · Cloud Computing · Full-Stack Development"
                </p>
                <a
                    href="#projects"
                    class="bg-white rounded-full w-fit text-black px-6 py-2 font-medium"
                >
                    "See my work"
                </a>
            </Reveal>
        </section>
        <section id="about" class="w-full max-w-4xl px-4 py-16">
            <Reveal name="about">
                <h2 class="text-3xl font-bold mb-6">"About"</h2>
                <p class="text-lg text-neutral-300 leading-relaxed mb-4">
                    "I build end-to-end systems: from training models and wiring up cloud infrastructure to the web apps people actually use."
                </p>
                <p class="text-lg text-neutral-300 leading-relaxed">
                    "Lately that means serverless backends, storage-heavy pipelines and fast, accessible frontends."
                </p>
            </Reveal>
        </section>
        <section id="skills" class="w-full max-w-6xl px-4 py-16">
            <h2 class="text-3xl font-bold mb-8 text-center">"Skills"</h2>
            <div class="grid grid-cols-1 md:grid-cols-3 gap-6">
                {SKILLS
                    .into_iter()
                    .enumerate()
                    .map(|(index, (title, blurb))| {
                        view! {
                            <RevealAt
                                list="skills"
                                index
                                options=skill_options
                                class="h-full p-6 rounded-xl bg-black/30 border border-neutral-800"
                            >
                                <h3 class="text-lg font-semibold mb-2">{title}</h3>
                                <p class="text-sm text-neutral-400">{blurb}</p>
                            </RevealAt>
                        }
                    })
                    .collect_view()}
            </div>
        </section>
        <ProjectsSection />
        <section id="contact" class="w-full max-w-2xl px-4 py-16 text-center">
            <Reveal name="contact" class="bg-black/30 p-8 rounded-xl border border-neutral-800">
                <h2 class="text-3xl font-bold mb-4">"Let's Connect"</h2>
                <p class="mb-6 text-neutral-300">
                    "Have a project in mind or just want to talk shop? Reach out."
                </p>
                <div class="flex justify-center gap-6">
                    <a
                        href="https://github.com/"
                        target="_blank"
                        rel="noopener noreferrer"
                        class="text-neutral-300 hover:text-white"
                        aria-label="GitHub Profile"
                    >
                        "GitHub"
                    </a>
                    <a
                        href="https://linkedin.com/"
                        target="_blank"
                        rel="noopener noreferrer"
                        class="text-blue-400 hover:text-blue-300"
                        aria-label="LinkedIn Profile"
                    >
                        "LinkedIn"
                    </a>
                </div>
            </Reveal>
        </section>
    }
}
