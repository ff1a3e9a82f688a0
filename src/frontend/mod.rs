mod browser;
mod dom;

use std::{cell::RefCell, rc::Rc};

use gloo_events::EventListener;
use js_sys::{Array, Date};
use serde_json::json;
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use wasm_bindgen_futures::spawn_local;
use web_sys::{
    window, Document, Element, HtmlInputElement, HtmlTextAreaElement, IntersectionObserver,
    IntersectionObserverEntry, IntersectionObserverInit, MouseEvent, SubmitEvent,
};
use yew::prelude::*;

use crate::{
    contact::ContactFields,
    host::{ContentConfig, HostBridge},
    logging::{LogLevel, Logger},
    reveal::{ObserverOptions, SKILL_BAR_THRESHOLD},
    runtime::{Collaborators, Presentation, Surfaces},
    timing::Scheduler,
};

use browser::{
    config_from_document, viewport_width, BrowserDevice, BrowserScheduler, ElementSdkBridge, FetchRelay,
    LocalStoragePrefs, MathRandom,
};
use dom::{elements, reveal_target_for, DomSurface};

const NAV_SECTIONS: [(&str, &str); 6] = [
    ("home", "Home"),
    ("about", "About"),
    ("skills", "Skills"),
    ("projects", "Projects"),
    ("experience", "Experience"),
    ("contact", "Contact"),
];
const REVEAL_SELECTOR: &str = ".fade-in, .slide-in-left, .slide-in-right, .skill-category, .project-card, .timeline-item";

struct SkillCategory {
    id: &'static str,
    title: &'static str,
    skills: &'static [&'static str],
}

const SKILL_CATEGORIES: [SkillCategory; 3] = [
    SkillCategory {
        id: "skills-frontend",
        title: "Frontend",
        skills: &["HTML", "CSS", "JavaScript", "React"],
    },
    SkillCategory {
        id: "skills-backend",
        title: "Backend",
        skills: &["Node.js", "PHP", "MySQL", "MongoDB"],
    },
    SkillCategory {
        id: "skills-tools",
        title: "Tools",
        skills: &["Git", "Figma", "VS Code", "Linux"],
    },
];

const PROJECTS: [(&str, &str); 3] = [
    ("E-Commerce Storefront", "Responsive shop with cart, checkout and an admin dashboard."),
    ("Task Planner", "Drag-and-drop boards with offline sync and reminders."),
    ("Weather Dashboard", "Forecasts and charts backed by a public weather API."),
];

const TIMELINE: [(&str, &str, &str); 3] = [
    ("2024 - Present", "Freelance Developer", "Websites and web apps for small businesses."),
    ("2023", "Web Development Intern", "Built internal tools and landing pages."),
    ("2022 - Present", "B.E. Information Technology", "Coursework in algorithms, databases and networks."),
];

// Window listeners are removed when this is dropped on unmount.
struct Booted {
    presentation: Rc<Presentation>,
    _listeners: Vec<EventListener>,
}

type PresentationSlot = Rc<RefCell<Option<Booted>>>;

fn bind<E: 'static>(slot: &PresentationSlot, action: impl Fn(&Rc<Presentation>, E) + 'static) -> Callback<E> {
    let slot = Rc::clone(slot);
    Callback::from(move |event: E| {
        let presentation = slot.borrow().as_ref().map(|booted| Rc::clone(&booted.presentation));
        if let Some(presentation) = presentation {
            action(&presentation, event);
        }
    })
}

fn observe(
    document: &Document,
    selector: &str,
    options: &ObserverOptions,
    on_entry: impl Fn(&Element, bool) + 'static,
) -> Result<(), JsValue> {
    let callback = Closure::<dyn FnMut(Array)>::new(move |entries: Array| {
        for entry in entries.iter() {
            if let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() {
                on_entry(&entry.target(), entry.is_intersecting());
            }
        }
    });

    let init = IntersectionObserverInit::new();
    init.set_threshold(&JsValue::from_f64(options.threshold));
    init.set_root_margin(&options.root_margin);
    let observer = IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)?;
    for element in elements(document, selector) {
        observer.observe(&element);
    }

    callback.forget();
    Ok(())
}

fn read_contact_fields(document: &Document) -> ContactFields {
    let input = |id: &str| {
        document
            .get_element_by_id(id)
            .and_then(|element| element.dyn_into::<HtmlInputElement>().ok())
            .map(|element| element.value())
            .unwrap_or_default()
    };
    let message = document
        .get_element_by_id("message")
        .and_then(|element| element.dyn_into::<HtmlTextAreaElement>().ok())
        .map(|element| element.value())
        .unwrap_or_default();

    ContactFields {
        name: input("name"),
        email: input("email"),
        subject: input("subject"),
        message,
    }
}

fn boot() -> Result<Booted, JsValue> {
    let window = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window.document().ok_or_else(|| JsValue::from_str("no document"))?;
    let config = config_from_document(&window);
    let logger = Logger::new(config.log_level);

    let page = Rc::new(DomSurface::new(window.clone(), document.clone()));
    page.install_skill_bars();
    let scheduler: Rc<dyn Scheduler> = Rc::new(BrowserScheduler::default());
    let host = ElementSdkBridge::detect(&window, logger).map(|bridge| Rc::new(bridge) as Rc<dyn HostBridge>);

    let presentation = Presentation::new(
        config,
        Collaborators {
            scheduler,
            store: Rc::new(LocalStoragePrefs::new(window.clone())),
            device: Rc::new(BrowserDevice::new(window.clone())),
            random: Rc::new(MathRandom),
            relay: Rc::new(FetchRelay),
            host,
            surfaces: Surfaces::shared(page),
        },
    );
    let year = i32::try_from(Date::new_0().get_full_year()).unwrap_or_default();
    presentation.start(viewport_width(&window), year);

    let on_scroll = {
        let presentation = Rc::clone(&presentation);
        let scrolled = window.clone();
        EventListener::new(&window, "scroll", move |_| {
            presentation.on_scroll(scrolled.scroll_y().unwrap_or_default());
        })
    };
    let on_resize = {
        let presentation = Rc::clone(&presentation);
        let resized = window.clone();
        EventListener::new(&window, "resize", move |_| presentation.on_resize(viewport_width(&resized)))
    };
    {
        let options = presentation.observer_options();
        let presentation = Rc::clone(&presentation);
        let lookup = document.clone();
        observe(&document, REVEAL_SELECTOR, &options, move |element, intersecting| {
            if let Some(target) = reveal_target_for(&lookup, element) {
                presentation.on_reveal_intersection(target, intersecting);
            }
        })?;
    }
    {
        let presentation = Rc::clone(&presentation);
        let options = ObserverOptions {
            threshold: SKILL_BAR_THRESHOLD,
            root_margin: "0px".to_string(),
        };
        observe(&document, ".skill-category", &options, move |element, intersecting| {
            presentation.on_skill_category_visible(&element.id(), intersecting);
        })?;
    }

    Ok(Booted {
        presentation,
        _listeners: vec![on_scroll, on_resize],
    })
}

#[function_component(App)]
fn app() -> Html {
    let slot: PresentationSlot = use_mut_ref(|| None);
    let content = ContentConfig::default();

    {
        let slot = Rc::clone(&slot);
        use_effect_with((), move |_| {
            match boot() {
                Ok(booted) => *slot.borrow_mut() = Some(booted),
                Err(error) => Logger::default().event(
                    LogLevel::Warn,
                    "presentation_boot_failed",
                    json!({ "error": format!("{error:?}") }),
                ),
            }
            move || {
                slot.borrow_mut().take();
            }
        });
    }

    let navigate_to = |section: &'static str| {
        bind(&slot, move |presentation, event: MouseEvent| {
            event.prevent_default();
            presentation.navigate(section);
        })
    };
    let on_toggle_theme = bind(&slot, |presentation, _: MouseEvent| {
        presentation.toggle_theme();
    });
    let on_toggle_menu = bind(&slot, |presentation, _: MouseEvent| {
        presentation.toggle_menu();
    });
    let on_scroll_top = bind(&slot, |presentation, _: MouseEvent| presentation.scroll_to_top());
    let on_submit = bind(&slot, |presentation, event: SubmitEvent| {
        event.prevent_default();
        let Some(document) = window().and_then(|window| window.document()) else {
            return;
        };
        let fields = read_contact_fields(&document);
        let presentation = Rc::clone(presentation);
        spawn_local(async move {
            presentation.submit(fields).await;
        });
    });

    html! {
        <>
            <div id="loading" class="loading-overlay">
                <div class="loader"></div>
            </div>
            <div id="particles" class="particles"></div>

            <nav class="navbar">
                <div class="nav-container">
                    <a href="#home" class="nav-logo" onclick={navigate_to("home")}>{"HL"}</a>
                    <ul class="nav-menu">
                        { for NAV_SECTIONS.iter().map(|(id, label)| html! {
                            <li class="nav-item">
                                <a href={format!("#{id}")} class="nav-link" onclick={navigate_to(*id)}>{*label}</a>
                            </li>
                        }) }
                    </ul>
                    <button
                        id="hamburger"
                        class="hamburger"
                        type="button"
                        style="display: none;"
                        aria-label="Toggle navigation menu"
                        onclick={on_toggle_menu}
                    >
                        <i class="fas fa-bars"></i>
                    </button>
                    <div class="nav-right">
                        <button
                            id="darkModeToggle"
                            class="theme-toggle"
                            type="button"
                            aria-label="Switch to light theme"
                            onclick={on_toggle_theme}
                        >
                            <i class="fas fa-sun"></i>
                        </button>
                    </div>
                </div>
            </nav>

            <main>
                <section id="home" class="hero">
                    <div class="orb orb-1"></div>
                    <div class="orb orb-2"></div>
                    <div class="orb orb-3"></div>
                    <div id="hero-content" class="hero-content fade-in">
                        <h1 id="hero-name" class="hero-name">{content.name.clone()}</h1>
                        <p id="hero-tagline" class="hero-tagline">{content.tagline.clone()}</p>
                        <div class="hero-actions">
                            <a id="hero-cta" href="#contact" class="btn btn-primary" onclick={navigate_to("contact")}>
                                {content.cta_text.clone()}
                            </a>
                            <a id="projects-button" href="#projects" class="btn btn-secondary" onclick={navigate_to("projects")}>
                                {content.projects_button_text.clone()}
                            </a>
                        </div>
                    </div>
                </section>

                <section id="about" class="about">
                    <h2 class="section-title">{"About Me"}</h2>
                    <div class="about-content">
                        <div id="about-image" class="about-image slide-in-left">
                            <i class="fas fa-user-astronaut"></i>
                        </div>
                        <div id="about-details" class="about-details slide-in-right">
                            <p id="about-text">{content.about_text.clone()}</p>
                        </div>
                    </div>
                </section>

                <section id="skills" class="skills">
                    <h2 class="section-title">{"Skills"}</h2>
                    <div class="skills-grid">
                        { for SKILL_CATEGORIES.iter().map(|category| html! {
                            <div id={category.id} class="skill-category">
                                <h3>{category.title}</h3>
                                <div class="skill-items">
                                    { for category.skills.iter().map(|skill| html! {
                                        <span class="skill-item">{*skill}</span>
                                    }) }
                                </div>
                            </div>
                        }) }
                    </div>
                </section>

                <section id="projects" class="projects">
                    <h2 class="section-title">{"Projects"}</h2>
                    <div class="projects-grid">
                        { for PROJECTS.iter().enumerate().map(|(index, (title, summary))| {
                            let on_enter = bind(&slot, move |presentation, _: MouseEvent| presentation.card_enter(index));
                            let on_leave = bind(&slot, move |presentation, _: MouseEvent| presentation.card_leave(index));
                            html! {
                                <article
                                    id={format!("project-{index}")}
                                    class="project-card"
                                    onmouseenter={on_enter}
                                    onmouseleave={on_leave}
                                >
                                    <h3>{*title}</h3>
                                    <p>{*summary}</p>
                                </article>
                            }
                        }) }
                    </div>
                </section>

                <section id="experience" class="experience">
                    <h2 class="section-title">{"Experience"}</h2>
                    <div class="timeline">
                        { for TIMELINE.iter().enumerate().map(|(index, (period, role, detail))| html! {
                            <div id={format!("timeline-{index}")} class="timeline-item">
                                <span class="timeline-date">{*period}</span>
                                <h3>{*role}</h3>
                                <p>{*detail}</p>
                            </div>
                        }) }
                    </div>
                </section>

                <section id="contact" class="contact">
                    <h2 class="section-title">{"Get In Touch"}</h2>
                    <form id="contactForm" class="contact-form fade-in" onsubmit={on_submit}>
                        <input id="name" name="name" type="text" placeholder="Your Name" required=true />
                        <input id="email" name="email" type="email" placeholder="Your Email" required=true />
                        <input id="subject" name="subject" type="text" placeholder="Subject" />
                        <textarea id="message" name="message" rows="5" placeholder="Your Message" required=true></textarea>
                        <button id="contact-button" class="submit-btn" type="submit">
                            {content.contact_button_text.clone()}
                        </button>
                    </form>
                </section>
            </main>

            <footer class="footer">
                <div class="footer-content">
                    <p id="footer-text"></p>
                    <p id="footer-note" class="muted">{content.footer_text.clone()}</p>
                </div>
            </footer>

            <button
                id="scrollTop"
                class="scroll-top"
                type="button"
                aria-label="Back to top"
                onclick={on_scroll_top}
            >
                <i class="fas fa-arrow-up"></i>
            </button>
        </>
    }
}

pub fn run() {
    yew::Renderer::<App>::with_root(
        window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("app"))
            .expect("missing #app mount point"),
    )
    .render();
}
