use std::{cell::RefCell, collections::HashMap, time::Duration};

use wasm_bindgen::{closure::Closure, JsCast};
use web_sys::{
    Document, Element, HtmlButtonElement, HtmlElement, HtmlFormElement, ScrollBehavior, ScrollToOptions, Window,
};

use crate::{
    contact::SubmitControl,
    effects::{CardSurface, EffectsSurface, Offset},
    hero::HeroSurface,
    host::{ContentSlot, ContentSurface},
    loader::LoaderSurface,
    nav::{NavSurface, SectionBounds},
    notify::{Notification, NotificationId, NotificationSurface},
    particles::{DriftPath, ParticleSpec, ParticleSurface},
    reveal::{Entrance, RevealGroup, RevealSurface, RevealTarget, SkillBarSurface},
    theme::{Theme, ThemeSurface},
};

pub const VISIBLE_CLASS: &str = "visible";
const PENDING_LABEL: &str = r#"<i class="fas fa-spinner fa-spin"></i> Sending..."#;
const MENU_PANEL_STYLE: &str = "position: fixed; top: var(--header-height); left: 0; width: 100%; \
     background: var(--bg-color); flex-direction: column; padding: 2rem; \
     box-shadow: 0 10px 30px rgba(0, 0, 0, 0.1); transform: translateY(-100%); opacity: 0; \
     transition: transform 0.3s ease, opacity 0.3s ease; z-index: 999;";
const SKILL_BAR_STYLE: &str = "position: absolute; bottom: 0; left: 0; height: 3px; \
     background: var(--primary-color); width: 0%; transition: width 1.5s ease; border-radius: 0 0 12px 12px;";
const OVERLAY_STYLE: &str = "position: absolute; top: 0; left: 0; width: 100%; height: 100%; \
     background: linear-gradient(45deg, rgba(37, 99, 235, 0.1) 0%, rgba(124, 58, 237, 0.1) 100%); \
     opacity: 0; transition: opacity 0.3s ease; border-radius: var(--border-radius); pointer-events: none;";

pub fn reveal_target_for(document: &Document, element: &Element) -> Option<RevealTarget> {
    let id = element.id();
    if id.is_empty() {
        return None;
    }
    let classes = element.class_list();

    let grouped = [RevealGroup::SkillCategory, RevealGroup::ProjectCard, RevealGroup::TimelineItem]
        .into_iter()
        .find(|group| classes.contains(group.class_name()));
    let entrance = if let Some(group) = grouped {
        let index = elements(document, &format!(".{}", group.class_name()))
            .iter()
            .position(|candidate| candidate.id() == id)
            .unwrap_or(0);
        Entrance::Grouped(group, index)
    } else if classes.contains("slide-in-left") {
        Entrance::SlideLeft
    } else if classes.contains("slide-in-right") {
        Entrance::SlideRight
    } else if classes.contains("fade-in") {
        Entrance::FadeIn
    } else {
        return None;
    };

    Some(RevealTarget::new(id, entrance))
}

pub fn elements(document: &Document, selector: &str) -> Vec<HtmlElement> {
    let Ok(nodes) = document.query_selector_all(selector) else {
        return Vec::new();
    };
    (0..nodes.length())
        .filter_map(|index| nodes.item(index))
        .filter_map(|node| node.dyn_into::<HtmlElement>().ok())
        .collect()
}

fn set_style(element: &HtmlElement, property: &str, value: &str) {
    // Rejected values leave the previous style in place.
    let _ = element.style().set_property(property, value);
}

pub struct DomSurface {
    window: Window,
    document: Document,
    close_handlers: RefCell<HashMap<NotificationId, Closure<dyn FnMut()>>>,
    submit_label: RefCell<Option<String>>,
}

impl DomSurface {
    pub fn new(window: Window, document: Document) -> Self {
        Self {
            window,
            document,
            close_handlers: RefCell::new(HashMap::new()),
            submit_label: RefCell::new(None),
        }
    }

    fn by_id(&self, id: &str) -> Option<HtmlElement> {
        self.document
            .get_element_by_id(id)
            .and_then(|element| element.dyn_into::<HtmlElement>().ok())
    }

    fn first(&self, selector: &str) -> Option<HtmlElement> {
        self.document
            .query_selector(selector)
            .ok()
            .flatten()
            .and_then(|element| element.dyn_into::<HtmlElement>().ok())
    }

    fn nth(&self, selector: &str, index: usize) -> Option<HtmlElement> {
        elements(&self.document, selector).into_iter().nth(index)
    }

    fn scroll_smoothly(&self, top: f64) {
        let options = ScrollToOptions::new();
        options.set_top(top);
        options.set_behavior(ScrollBehavior::Smooth);
        self.window.scroll_to_with_scroll_to_options(&options);
    }

    pub fn install_skill_bars(&self) {
        for category in elements(&self.document, ".skill-category") {
            if matches!(category.query_selector(".skill-progress"), Ok(Some(_))) {
                continue;
            }
            let Ok(bar) = self.document.create_element("div") else {
                continue;
            };
            bar.set_class_name("skill-progress");
            let _ = bar.set_attribute("style", SKILL_BAR_STYLE);
            set_style(&category, "position", "relative");
            set_style(&category, "overflow", "hidden");
            let _ = category.append_child(&bar);
        }
    }

    fn notification_element(id: NotificationId) -> String {
        format!("notification-{}", id.0)
    }
}

impl ThemeSurface for DomSurface {
    fn apply_theme(&self, theme: Theme) {
        let Some(root) = self.document.document_element() else {
            return;
        };
        let _ = match theme {
            Theme::Dark => root.set_attribute("data-theme", theme.as_str()),
            Theme::Light => root.remove_attribute("data-theme"),
        };
    }

    fn set_indicator(&self, icon: &str, label: &str) {
        let Some(toggle) = self.by_id("darkModeToggle") else {
            return;
        };
        let _ = toggle.set_attribute("aria-label", label);
        if let Ok(Some(glyph)) = toggle.query_selector("i") {
            glyph.set_class_name(icon);
        }
    }
}

impl NavSurface for DomSurface {
    fn sections(&self) -> Vec<SectionBounds> {
        elements(&self.document, "section")
            .into_iter()
            .filter(|section| !section.id().is_empty())
            .map(|section| {
                SectionBounds::new(
                    section.id(),
                    f64::from(section.offset_top()),
                    f64::from(section.client_height()),
                )
            })
            .collect()
    }

    fn set_active_link(&self, section_id: Option<&str>) {
        let target = section_id.map(|id| format!("#{id}"));
        for link in elements(&self.document, ".nav-link") {
            let classes = link.class_list();
            let _ = classes.remove_1("active");
            if target.is_some() && link.get_attribute("href") == target {
                let _ = classes.add_1("active");
            }
        }
    }

    fn smooth_scroll_to(&self, top: f64) {
        self.scroll_smoothly(top);
    }

    fn install_mobile_menu(&self) {
        if let Some(hamburger) = self.by_id("hamburger") {
            set_style(&hamburger, "display", "flex");
        }
        if let Some(menu) = self.first(".nav-menu") {
            let _ = menu.set_attribute("style", MENU_PANEL_STYLE);
        }
    }

    fn set_menu_open(&self, open: bool) {
        if let Some(menu) = self.first(".nav-menu") {
            set_style(&menu, "transform", if open { "translateY(0)" } else { "translateY(-100%)" });
            set_style(&menu, "opacity", if open { "1" } else { "0" });
        }
        if let Some(glyph) = self.first("#hamburger i") {
            glyph.set_class_name(if open { "fas fa-times" } else { "fas fa-bars" });
        }
        if let Some(body) = self.document.body() {
            set_style(&body, "overflow", if open { "hidden" } else { "" });
        }
    }

    fn teardown_mobile_menu(&self) {
        if let Some(menu) = self.first(".nav-menu") {
            let _ = menu.remove_attribute("style");
        }
        if let Some(hamburger) = self.by_id("hamburger") {
            set_style(&hamburger, "display", "none");
        }
        if let Some(body) = self.document.body() {
            let _ = body.style().remove_property("overflow");
        }
    }
}

impl RevealSurface for DomSurface {
    fn reveal(&self, target: &RevealTarget, delay: Option<Duration>) {
        let Some(element) = self.by_id(&target.id) else {
            return;
        };
        if let Some(delay) = delay {
            set_style(&element, "transition-delay", &format!("{}s", delay.as_secs_f64()));
        }
        let _ = element.class_list().add_1(VISIBLE_CLASS);
    }
}

impl SkillBarSurface for DomSurface {
    fn fill_skill_bar(&self, category_id: &str, width_percent: f64) {
        let bar = self.first(&format!("#{category_id} .skill-progress"));
        if let Some(bar) = bar {
            set_style(&bar, "width", &format!("{width_percent:.1}%"));
        }
    }
}

impl EffectsSurface for DomSurface {
    fn orb_count(&self) -> usize {
        elements(&self.document, ".orb").len()
    }

    fn particle_count(&self) -> usize {
        elements(&self.document, "#particles .particle").len()
    }

    fn set_scroll_top_visible(&self, visible: bool) {
        if let Some(button) = self.by_id("scrollTop") {
            let _ = button.class_list().toggle_with_force(VISIBLE_CLASS, visible);
        }
    }

    fn set_hero_offset(&self, offset_px: f64) {
        if let Some(hero) = self.first(".hero-content") {
            set_style(&hero, "translate", &format!("0 {offset_px:.1}px"));
        }
    }

    fn set_orb_offset(&self, index: usize, offset: Offset) {
        if let Some(orb) = self.nth(".orb", index) {
            set_style(&orb, "translate", &format!("{:.1}px {:.1}px", offset.x, offset.y));
        }
    }

    fn set_particle_drift(&self, index: usize, offset_px: f64) {
        if let Some(particle) = self.nth("#particles .particle", index) {
            set_style(&particle, "translate", &format!("{offset_px:.1}px 0"));
        }
    }

    fn set_navbar_glow(&self, opacity: f64) {
        if let Some(navbar) = self.first(".navbar") {
            set_style(&navbar, "box-shadow", &format!("0 2px 20px rgba(37, 99, 235, {opacity:.3})"));
        }
    }

    fn smooth_scroll_to_top(&self) {
        self.scroll_smoothly(0.0);
    }
}

impl CardSurface for DomSurface {
    fn set_card_lifted(&self, index: usize, lifted: bool) {
        if let Some(card) = self.nth(".project-card", index) {
            let scale = if lifted { "1.02" } else { "1" };
            set_style(&card, "transform", &format!("translateY(-10px) scale({scale})"));
        }
    }

    fn attach_overlay(&self, index: usize) {
        let Some(card) = self.nth(".project-card", index) else {
            return;
        };
        if let Ok(overlay) = self.document.create_element("div") {
            overlay.set_class_name("project-overlay");
            let _ = overlay.set_attribute("style", OVERLAY_STYLE);
            let _ = card.append_child(&overlay);
        }
    }

    fn set_overlay_visible(&self, index: usize, visible: bool) {
        let Some(card) = self.nth(".project-card", index) else {
            return;
        };
        let overlay = card.query_selector(".project-overlay:last-of-type").ok().flatten();
        if let Some(overlay) = overlay.and_then(|element| element.dyn_into::<HtmlElement>().ok()) {
            set_style(&overlay, "opacity", if visible { "1" } else { "0" });
        }
    }

    fn remove_overlay(&self, index: usize) {
        let Some(card) = self.nth(".project-card", index) else {
            return;
        };
        if let Ok(Some(overlay)) = card.query_selector(".project-overlay") {
            overlay.remove();
        }
    }
}

impl ParticleSurface for DomSurface {
    fn has_particle_container(&self) -> bool {
        self.by_id("particles").is_some()
    }

    fn spawn_particles(&self, particles: &[ParticleSpec], drift: &DriftPath) {
        let Some(container) = self.by_id("particles") else {
            return;
        };
        for spec in particles {
            let Ok(particle) = self.document.create_element("div") else {
                continue;
            };
            particle.set_class_name("particle");
            let _ = particle.set_attribute("style", &spec.inline_style());
            let _ = container.append_child(&particle);
        }

        if let (Ok(style), Some(head)) = (self.document.create_element("style"), self.document.head()) {
            style.set_text_content(Some(&drift.keyframes()));
            let _ = head.append_child(&style);
        }
    }
}

impl HeroSurface for DomSurface {
    fn set_tagline(&self, text: &str) {
        if let Some(tagline) = self.by_id("hero-tagline") {
            tagline.set_text_content(Some(text));
        }
    }

    fn set_name_color(&self, color: &str) {
        if let Some(name) = self.by_id("hero-name") {
            set_style(&name, "color", color);
            set_style(&name, "transition", "color 0.5s ease");
        }
    }
}

impl NotificationSurface for DomSurface {
    fn present(&self, notification: &Notification, on_close: Box<dyn Fn()>) {
        let (Some(body), Ok(toast)) = (self.document.body(), self.document.create_element("div")) else {
            return;
        };
        toast.set_id(&Self::notification_element(notification.id));
        toast.set_class_name(&format!("notification {}", notification.severity.as_str()));
        let _ = toast.set_attribute(
            "style",
            &format!(
                "position: fixed; top: 100px; right: 20px; background: {}; color: white; \
                 padding: 1rem 1.5rem; border-radius: 8px; display: flex; align-items: center; gap: 0.75rem; \
                 box-shadow: 0 10px 25px rgba(0, 0, 0, 0.2); z-index: 10000; \
                 animation: slideInRight 0.3s ease-out; max-width: 400px;",
                notification.severity.background()
            ),
        );

        let parts = (
            self.document.create_element("i"),
            self.document.create_element("span"),
            self.document.create_element("button"),
        );
        let (Ok(icon), Ok(message), Ok(close)) = parts else {
            return;
        };
        icon.set_class_name(notification.severity.icon());
        message.set_text_content(Some(&notification.message));
        close.set_class_name("notification-close");
        close.set_inner_html(r#"<i class="fas fa-times"></i>"#);

        let handler = Closure::<dyn FnMut()>::new(move || on_close());
        let _ = close.add_event_listener_with_callback("click", handler.as_ref().unchecked_ref());
        self.close_handlers.borrow_mut().insert(notification.id, handler);

        let _ = toast.append_child(&icon);
        let _ = toast.append_child(&message);
        let _ = toast.append_child(&close);
        let _ = body.append_child(&toast);
    }

    fn begin_exit(&self, id: NotificationId) {
        if let Some(toast) = self.by_id(&Self::notification_element(id)) {
            set_style(&toast, "animation", "slideOutRight 0.3s ease-out");
        }
    }

    fn remove(&self, id: NotificationId) {
        if let Some(toast) = self.by_id(&Self::notification_element(id)) {
            toast.remove();
        }
        self.close_handlers.borrow_mut().remove(&id);
    }
}

impl SubmitControl for DomSurface {
    fn set_pending(&self, pending: bool) {
        let Some(button) = self
            .first("#contactForm .submit-btn")
            .and_then(|element| element.dyn_into::<HtmlButtonElement>().ok())
        else {
            return;
        };

        if pending {
            self.submit_label.borrow_mut().get_or_insert_with(|| button.inner_html());
            button.set_inner_html(PENDING_LABEL);
            button.set_disabled(true);
        } else {
            if let Some(label) = self.submit_label.borrow_mut().take() {
                button.set_inner_html(&label);
            }
            button.set_disabled(false);
        }
    }

    fn clear_fields(&self) {
        if let Some(form) = self
            .document
            .get_element_by_id("contactForm")
            .and_then(|element| element.dyn_into::<HtmlFormElement>().ok())
        {
            form.reset();
        }
    }
}

impl ContentSurface for DomSurface {
    fn set_text(&self, slot: ContentSlot, text: &str) {
        if let Some(element) = self.by_id(slot.element_id()) {
            element.set_text_content(Some(text));
        }
    }
}

impl LoaderSurface for DomSurface {
    fn has_overlay(&self) -> bool {
        self.by_id("loading").is_some()
    }

    fn fade_overlay(&self) {
        if let Some(overlay) = self.by_id("loading") {
            set_style(&overlay, "opacity", "0");
        }
    }

    fn hide_overlay(&self) {
        if let Some(overlay) = self.by_id("loading") {
            set_style(&overlay, "display", "none");
        }
    }

    fn entrance_targets(&self) -> Vec<RevealTarget> {
        [".fade-in", ".slide-in-left", ".slide-in-right"]
            .into_iter()
            .flat_map(|selector| elements(&self.document, selector))
            .filter_map(|element| reveal_target_for(&self.document, &element))
            .collect()
    }
}
