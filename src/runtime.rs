use std::{
    rc::{Rc, Weak},
    time::Duration,
};

use serde_json::json;

use crate::{
    config::RuntimeConfig,
    contact::{ContactFields, ContactSubmitter, FormRelay, SubmitControl, SubmitOutcome},
    device::DeviceProbe,
    effects::{CardHover, CardSurface, EffectsSurface, ScrollEffects},
    hero::{start_color_cycle, start_typing, HeroSurface, Typewriter},
    host::{attach_host, copyright_line, ContentConfig, ContentSlot, ContentSurface, HostBridge, DEFAULT_OWNER},
    loader::{start_loading_sequence, LoaderSurface},
    logging::{LogLevel, Logger},
    nav::{MenuState, NavSurface, NavigationCoordinator},
    notify::{NotificationPresenter, NotificationSurface, Severity},
    particles::{populate_particles, ParticleSurface},
    reveal::{observer_options, ObserverOptions, RevealAnimator, RevealSurface, RevealTarget, SkillBarSurface, SkillBars},
    state::PresentationState,
    storage::PreferenceStore,
    theme::{Theme, ThemeController, ThemeSurface},
    timing::{debounce, Debounced, Scheduler},
    RandomSource,
};

pub const WELCOME_DELAY: Duration = Duration::from_millis(2_000);
pub const WELCOME_MESSAGE: &str = "Welcome to my portfolio! Feel free to explore.";

pub struct Surfaces {
    pub theme: Rc<dyn ThemeSurface>,
    pub nav: Rc<dyn NavSurface>,
    pub reveal: Rc<dyn RevealSurface>,
    pub skill_bars: Rc<dyn SkillBarSurface>,
    pub effects: Rc<dyn EffectsSurface>,
    pub cards: Rc<dyn CardSurface>,
    pub particles: Rc<dyn ParticleSurface>,
    pub hero: Rc<dyn HeroSurface>,
    pub notifications: Rc<dyn NotificationSurface>,
    pub submit: Rc<dyn SubmitControl>,
    pub content: Rc<dyn ContentSurface>,
    pub loader: Rc<dyn LoaderSurface>,
}

impl Surfaces {
    pub fn shared<P>(page: Rc<P>) -> Self
    where
        P: ThemeSurface
            + NavSurface
            + RevealSurface
            + SkillBarSurface
            + EffectsSurface
            + CardSurface
            + ParticleSurface
            + HeroSurface
            + NotificationSurface
            + SubmitControl
            + ContentSurface
            + LoaderSurface
            + 'static,
    {
        Self {
            theme: page.clone(),
            nav: page.clone(),
            reveal: page.clone(),
            skill_bars: page.clone(),
            effects: page.clone(),
            cards: page.clone(),
            particles: page.clone(),
            hero: page.clone(),
            notifications: page.clone(),
            submit: page.clone(),
            content: page.clone(),
            loader: page,
        }
    }
}

pub struct Collaborators {
    pub scheduler: Rc<dyn Scheduler>,
    pub store: Rc<dyn PreferenceStore>,
    pub device: Rc<dyn DeviceProbe>,
    pub random: Rc<dyn RandomSource>,
    pub relay: Rc<dyn FormRelay>,
    pub host: Option<Rc<dyn HostBridge>>,
    pub surfaces: Surfaces,
}

pub struct Presentation {
    config: RuntimeConfig,
    logger: Logger,
    scheduler: Rc<dyn Scheduler>,
    device: Rc<dyn DeviceProbe>,
    random: Rc<dyn RandomSource>,
    host: Option<Rc<dyn HostBridge>>,
    state: Rc<PresentationState>,
    theme: ThemeController,
    nav: Rc<NavigationCoordinator>,
    effects: Rc<ScrollEffects>,
    reveal: Rc<RevealAnimator>,
    skill_bars: SkillBars,
    cards: CardHover,
    notifier: Rc<NotificationPresenter>,
    contact: ContactSubmitter,
    scroll: Debounced<f64>,
    resize: Debounced<f64>,
    particles: Rc<dyn ParticleSurface>,
    hero: Rc<dyn HeroSurface>,
    content: Rc<dyn ContentSurface>,
    loader: Rc<dyn LoaderSurface>,
}

impl Presentation {
    pub fn new(config: RuntimeConfig, collaborators: Collaborators) -> Rc<Self> {
        let Collaborators {
            scheduler,
            store,
            device,
            random,
            relay,
            host,
            surfaces,
        } = collaborators;
        let logger = Logger::new(config.log_level);
        let state = PresentationState::new();

        let theme = ThemeController::new(
            Rc::clone(&state),
            store,
            surfaces.theme,
            config.restore_persisted_theme,
            logger,
        );
        let nav = Rc::new(NavigationCoordinator::new(
            Rc::clone(&state),
            surfaces.nav,
            config.breakpoint_px,
            config.header_offset_px,
            config.section_lookahead_px,
            logger,
        ));
        let effects = Rc::new(ScrollEffects::new(
            surfaces.effects,
            Rc::clone(&device),
            config.scroll_top_threshold_px,
        ));
        let reveal = Rc::new(RevealAnimator::new(Rc::clone(&scheduler), surfaces.reveal));
        let skill_bars = SkillBars::new(Rc::clone(&scheduler), Rc::clone(&random), surfaces.skill_bars, logger);
        let cards = CardHover::new(Rc::clone(&scheduler), surfaces.cards);
        let notifier = NotificationPresenter::new(
            surfaces.notifications,
            Rc::clone(&scheduler),
            config.notification_duration,
            logger,
        );
        let contact = ContactSubmitter::new(
            config.form_endpoint.as_str(),
            relay,
            surfaces.submit,
            Rc::clone(&notifier),
            Rc::clone(&scheduler),
            config.submit_restore_delay,
            logger,
        );

        let scroll = {
            let nav = Rc::clone(&nav);
            let effects = Rc::clone(&effects);
            debounce(Rc::clone(&scheduler), config.scroll_debounce, move |scroll_y: f64| {
                nav.on_scroll(scroll_y);
                effects.on_scroll(scroll_y);
            })
        };
        let resize = {
            let nav = Rc::clone(&nav);
            debounce(Rc::clone(&scheduler), config.resize_debounce, move |width: f64| {
                nav.on_viewport_width(width);
            })
        };

        Rc::new(Self {
            config,
            logger,
            scheduler,
            device,
            random,
            host,
            state,
            theme,
            nav,
            effects,
            reveal,
            skill_bars,
            cards,
            notifier,
            contact,
            scroll,
            resize,
            particles: surfaces.particles,
            hero: surfaces.hero,
            content: surfaces.content,
            loader: surfaces.loader,
        })
    }

    pub fn start(&self, viewport_width: f64, current_year: i32) {
        let theme = self.theme.initialize();
        self.nav.on_viewport_width(viewport_width);

        start_loading_sequence(Rc::clone(&self.scheduler), Rc::clone(&self.loader), Rc::clone(&self.reveal));
        let particles = populate_particles(
            self.particles.as_ref(),
            self.random.as_ref(),
            self.device.as_ref(),
            self.config.particle_count,
            self.logger,
        );
        start_typing(Rc::clone(&self.scheduler), Rc::clone(&self.hero), Typewriter::default());
        start_color_cycle(Rc::clone(&self.scheduler), Rc::clone(&self.hero));

        self.content
            .set_text(ContentSlot::Copyright, &copyright_line(current_year, DEFAULT_OWNER));
        let hosted = attach_host(
            self.host.as_deref(),
            Rc::clone(&self.content),
            &ContentConfig::default(),
            self.logger,
        );

        let notifier: Weak<NotificationPresenter> = Rc::downgrade(&self.notifier);
        self.scheduler.set_timeout(
            WELCOME_DELAY,
            Box::new(move || {
                if let Some(notifier) = notifier.upgrade() {
                    notifier.notify(WELCOME_MESSAGE, Severity::Info);
                }
            }),
        );

        self.logger.event(
            LogLevel::Info,
            "presentation_started",
            json!({
                "theme": theme.as_str(),
                "viewport_width": viewport_width,
                "particles": particles,
                "hosted": hosted,
            }),
        );
    }

    pub fn on_scroll(&self, scroll_y: f64) {
        self.scroll.call(scroll_y);
    }

    pub fn on_resize(&self, viewport_width: f64) {
        self.resize.call(viewport_width);
    }

    pub fn toggle_theme(&self) -> Theme {
        self.theme.toggle()
    }

    pub fn toggle_menu(&self) -> MenuState {
        self.nav.toggle_menu()
    }

    pub fn navigate(&self, section_id: &str) -> bool {
        self.nav.on_link_click(section_id)
    }

    pub fn scroll_to_top(&self) {
        self.effects.scroll_to_top();
    }

    pub fn on_reveal_intersection(&self, target: RevealTarget, is_intersecting: bool) -> bool {
        self.reveal.on_intersection(target, is_intersecting)
    }

    pub fn on_skill_category_visible(&self, category_id: &str, is_intersecting: bool) {
        self.skill_bars.on_category_visible(category_id, is_intersecting);
    }

    pub fn card_enter(&self, index: usize) {
        self.cards.on_enter(index);
    }

    pub fn card_leave(&self, index: usize) {
        self.cards.on_leave(index);
    }

    pub async fn submit(&self, fields: ContactFields) -> SubmitOutcome {
        self.contact.submit(fields).await
    }

    pub fn notify(&self, message: &str, severity: Severity) {
        self.notifier.notify(message, severity);
    }

    pub fn observer_options(&self) -> ObserverOptions {
        observer_options(!self.device.is_capable())
    }

    pub fn state(&self) -> &PresentationState {
        &self.state
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn logger(&self) -> Logger {
        self.logger
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        contact::{RelayError, FAILURE_MESSAGE, VALIDATION_MESSAGE},
        effects::Offset,
        nav::{section_at, SectionBounds},
        notify::{Notification, NotificationId},
        particles::{DriftPath, ParticleSpec},
        reveal::{Entrance, RevealGroup, CONSTRAINED_THRESHOLD, DEFAULT_THRESHOLD},
        testing::{FixedDevice, ManualScheduler, MemoryStore, ScriptedRelay, SequenceRandom},
        theme::THEME_KEY,
    };
    use std::cell::{Cell, RefCell};

    #[derive(Default)]
    struct FakePage {
        applied_themes: RefCell<Vec<Theme>>,
        indicator: RefCell<Option<(String, String)>>,
        section_reads: Cell<usize>,
        active_link: RefCell<Option<String>>,
        scrolled_to: RefCell<Vec<f64>>,
        hamburger_visible: Cell<bool>,
        inline_layout: Cell<bool>,
        panel_open: Cell<bool>,
        scroll_locked: Cell<bool>,
        revealed: RefCell<Vec<(String, Option<Duration>)>>,
        skill_fills: RefCell<Vec<(String, f64)>>,
        scroll_top_visible: Cell<bool>,
        scrolled_to_top: Cell<bool>,
        lifted_cards: RefCell<Vec<usize>>,
        spawned_particles: Cell<usize>,
        taglines: RefCell<Vec<String>>,
        toasts: RefCell<Vec<(Severity, String)>>,
        pending_log: RefCell<Vec<bool>>,
        cleared: Cell<usize>,
        texts: RefCell<Vec<(ContentSlot, String)>>,
        overlay_hidden: Cell<bool>,
    }

    impl FakePage {
        fn toasts_with(&self, severity: Severity) -> Vec<String> {
            self.toasts
                .borrow()
                .iter()
                .filter(|(kind, _)| *kind == severity)
                .map(|(_, message)| message.clone())
                .collect()
        }
    }

    fn page_sections() -> Vec<SectionBounds> {
        vec![
            SectionBounds::new("home", 0.0, 700.0),
            SectionBounds::new("about", 700.0, 600.0),
            SectionBounds::new("projects", 1300.0, 900.0),
            SectionBounds::new("contact", 2200.0, 500.0),
        ]
    }

    impl ThemeSurface for FakePage {
        fn apply_theme(&self, theme: Theme) {
            self.applied_themes.borrow_mut().push(theme);
        }

        fn set_indicator(&self, icon: &str, label: &str) {
            *self.indicator.borrow_mut() = Some((icon.to_string(), label.to_string()));
        }
    }

    impl NavSurface for FakePage {
        fn sections(&self) -> Vec<SectionBounds> {
            self.section_reads.set(self.section_reads.get() + 1);
            page_sections()
        }

        fn set_active_link(&self, section_id: Option<&str>) {
            *self.active_link.borrow_mut() = section_id.map(ToString::to_string);
        }

        fn smooth_scroll_to(&self, top: f64) {
            self.scrolled_to.borrow_mut().push(top);
        }

        fn install_mobile_menu(&self) {
            self.hamburger_visible.set(true);
            self.inline_layout.set(true);
        }

        fn set_menu_open(&self, open: bool) {
            self.panel_open.set(open);
            self.scroll_locked.set(open);
        }

        fn teardown_mobile_menu(&self) {
            self.hamburger_visible.set(false);
            self.inline_layout.set(false);
            self.scroll_locked.set(false);
        }
    }

    impl RevealSurface for FakePage {
        fn reveal(&self, target: &RevealTarget, delay: Option<Duration>) {
            self.revealed.borrow_mut().push((target.id.clone(), delay));
        }
    }

    impl SkillBarSurface for FakePage {
        fn fill_skill_bar(&self, category_id: &str, width_percent: f64) {
            self.skill_fills.borrow_mut().push((category_id.to_string(), width_percent));
        }
    }

    impl EffectsSurface for FakePage {
        fn orb_count(&self) -> usize {
            3
        }

        fn particle_count(&self) -> usize {
            self.spawned_particles.get()
        }

        fn set_scroll_top_visible(&self, visible: bool) {
            self.scroll_top_visible.set(visible);
        }

        fn set_hero_offset(&self, _offset_px: f64) {}

        fn set_orb_offset(&self, _index: usize, _offset: Offset) {}

        fn set_particle_drift(&self, _index: usize, _offset_px: f64) {}

        fn set_navbar_glow(&self, _opacity: f64) {}

        fn smooth_scroll_to_top(&self) {
            self.scrolled_to_top.set(true);
        }
    }

    impl CardSurface for FakePage {
        fn set_card_lifted(&self, index: usize, lifted: bool) {
            let mut cards = self.lifted_cards.borrow_mut();
            if lifted {
                cards.push(index);
            } else {
                cards.retain(|card| *card != index);
            }
        }

        fn attach_overlay(&self, _index: usize) {}

        fn set_overlay_visible(&self, _index: usize, _visible: bool) {}

        fn remove_overlay(&self, _index: usize) {}
    }

    impl ParticleSurface for FakePage {
        fn has_particle_container(&self) -> bool {
            true
        }

        fn spawn_particles(&self, particles: &[ParticleSpec], _drift: &DriftPath) {
            self.spawned_particles.set(particles.len());
        }
    }

    impl HeroSurface for FakePage {
        fn set_tagline(&self, text: &str) {
            self.taglines.borrow_mut().push(text.to_string());
        }

        fn set_name_color(&self, _color: &str) {}
    }

    impl NotificationSurface for FakePage {
        fn present(&self, notification: &Notification, _on_close: Box<dyn Fn()>) {
            self.toasts
                .borrow_mut()
                .push((notification.severity, notification.message.clone()));
        }

        fn begin_exit(&self, _id: NotificationId) {}

        fn remove(&self, _id: NotificationId) {}
    }

    impl SubmitControl for FakePage {
        fn set_pending(&self, pending: bool) {
            self.pending_log.borrow_mut().push(pending);
        }

        fn clear_fields(&self) {
            self.cleared.set(self.cleared.get() + 1);
        }
    }

    impl ContentSurface for FakePage {
        fn set_text(&self, slot: ContentSlot, text: &str) {
            self.texts.borrow_mut().push((slot, text.to_string()));
        }
    }

    impl LoaderSurface for FakePage {
        fn has_overlay(&self) -> bool {
            true
        }

        fn fade_overlay(&self) {}

        fn hide_overlay(&self) {
            self.overlay_hidden.set(true);
        }

        fn entrance_targets(&self) -> Vec<RevealTarget> {
            vec![
                RevealTarget::new("hero-content", Entrance::FadeIn),
                RevealTarget::new("about-image", Entrance::SlideLeft),
            ]
        }
    }

    struct Harness {
        presentation: Rc<Presentation>,
        page: Rc<FakePage>,
        scheduler: Rc<ManualScheduler>,
        store: Rc<MemoryStore>,
        relay: Rc<ScriptedRelay>,
    }

    fn harness(device: FixedDevice, responses: Vec<Result<u16, RelayError>>) -> Harness {
        let page = Rc::new(FakePage::default());
        let scheduler = Rc::new(ManualScheduler::default());
        let store = Rc::new(MemoryStore::default());
        let relay = ScriptedRelay::answering(responses);
        let config = RuntimeConfig {
            log_level: LogLevel::Warn,
            ..RuntimeConfig::default()
        };

        let presentation = Presentation::new(
            config,
            Collaborators {
                scheduler: scheduler.clone(),
                store: store.clone(),
                device: Rc::new(device),
                random: Rc::new(SequenceRandom::new(vec![0.2, 0.6, 0.9])),
                relay: relay.clone(),
                host: None,
                surfaces: Surfaces::shared(page.clone()),
            },
        );

        Harness {
            presentation,
            page,
            scheduler,
            store,
            relay,
        }
    }

    fn filled_form() -> ContactFields {
        ContactFields {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            subject: String::new(),
            message: "Hello".to_string(),
        }
    }

    #[test]
    fn start_runs_the_page_load_sequence() {
        let h = harness(FixedDevice::desktop(), Vec::new());

        h.presentation.start(1440.0, 2026);

        assert_eq!(*h.page.applied_themes.borrow(), vec![Theme::Dark]);
        assert!(!h.presentation.state().menu_installed());
        assert_eq!(h.page.spawned_particles.get(), 50);
        assert!(h
            .page
            .texts
            .borrow()
            .contains(&(ContentSlot::Copyright, "© 2026 Harshal Lathiya. All rights reserved.".to_string())));

        h.scheduler.advance(Duration::from_millis(1_300));
        h.scheduler.run_frame();
        assert!(h.page.overlay_hidden.get());
        assert_eq!(h.page.revealed.borrow().len(), 2);

        h.scheduler.advance(Duration::from_millis(700));
        assert_eq!(h.page.toasts_with(Severity::Info), vec![WELCOME_MESSAGE.to_string()]);
        assert!(!h.page.taglines.borrow().is_empty());
    }

    #[test]
    fn active_link_follows_every_scroll_position() {
        let h = harness(FixedDevice::desktop(), Vec::new());
        h.presentation.start(1440.0, 2026);
        let sections = page_sections();

        for scroll_y in [0.0, 599.0, 600.0, 1250.0, 2150.0, 2599.0, 2600.0, 40.0] {
            h.presentation.on_scroll(scroll_y);
            h.scheduler.advance(Duration::from_millis(16));

            let expected = section_at(&sections, scroll_y + 100.0).map(|section| section.id.clone());
            assert_eq!(*h.page.active_link.borrow(), expected, "scroll_y = {scroll_y}");
            assert_eq!(h.presentation.state().active_section(), expected);
        }
    }

    #[test]
    fn scroll_bursts_are_handled_once_with_the_last_position() {
        let h = harness(FixedDevice::desktop(), Vec::new());

        for step in 0..10 {
            h.presentation.on_scroll(f64::from(step) * 150.0);
            h.scheduler.advance(Duration::from_millis(5));
        }
        assert_eq!(h.page.section_reads.get(), 0);

        h.scheduler.advance(Duration::from_millis(16));
        assert_eq!(h.page.section_reads.get(), 1);
        assert_eq!(h.page.active_link.borrow().as_deref(), Some("projects"));
        assert!(h.page.scroll_top_visible.get());
    }

    #[test]
    fn theme_toggle_round_trips() {
        let h = harness(FixedDevice::desktop(), Vec::new());
        h.presentation.start(1440.0, 2026);
        let indicator = h.page.indicator.borrow().clone();
        let stored = h.store.value(THEME_KEY);

        assert_eq!(h.presentation.toggle_theme(), Theme::Light);
        assert_eq!(h.presentation.toggle_theme(), Theme::Dark);

        assert_eq!(*h.page.indicator.borrow(), indicator);
        assert_eq!(h.store.value(THEME_KEY), stored);
    }

    #[test]
    fn reveal_latch_survives_repeated_intersections() {
        let h = harness(FixedDevice::desktop(), Vec::new());
        let card = RevealTarget::new("project-2", Entrance::Grouped(RevealGroup::ProjectCard, 2));

        assert!(h.presentation.on_reveal_intersection(card.clone(), true));
        for _ in 0..5 {
            assert!(!h.presentation.on_reveal_intersection(card.clone(), true));
        }
        h.scheduler.run_frame();

        assert_eq!(
            *h.page.revealed.borrow(),
            vec![("project-2".to_string(), Some(Duration::from_millis(200)))]
        );
    }

    #[test]
    fn skill_bars_fill_once_per_category() {
        let h = harness(FixedDevice::desktop(), Vec::new());

        h.presentation.on_skill_category_visible("frontend", true);
        h.presentation.on_skill_category_visible("frontend", true);
        h.scheduler.advance(Duration::from_millis(300));

        let fills = h.page.skill_fills.borrow();
        assert_eq!(fills.len(), 1);
        assert!((70.0..100.0).contains(&fills[0].1));
    }

    #[test]
    fn observer_threshold_drops_on_constrained_devices() {
        let desktop = harness(FixedDevice::desktop(), Vec::new());
        let phone = harness(FixedDevice::phone(), Vec::new());

        assert_eq!(desktop.presentation.observer_options().threshold, DEFAULT_THRESHOLD);
        assert_eq!(phone.presentation.observer_options().threshold, CONSTRAINED_THRESHOLD);
    }

    #[test]
    fn link_click_closes_open_menu_and_unlocks_scrolling() {
        let h = harness(FixedDevice::phone(), Vec::new());
        h.presentation.start(390.0, 2026);
        assert!(h.page.hamburger_visible.get());

        assert_eq!(h.presentation.toggle_menu(), MenuState::Open);
        assert!(h.page.scroll_locked.get());

        assert!(h.presentation.navigate("about"));

        assert_eq!(h.presentation.state().menu(), MenuState::Closed);
        assert!(!h.page.scroll_locked.get());
        assert_eq!(*h.page.scrolled_to.borrow(), vec![620.0]);
        assert_eq!(h.page.active_link.borrow().as_deref(), Some("about"));
    }

    #[test]
    fn widening_past_breakpoint_closes_menu_and_clears_layout() {
        let h = harness(FixedDevice::phone(), Vec::new());
        h.presentation.start(390.0, 2026);
        h.presentation.toggle_menu();

        h.presentation.on_resize(1024.0);
        h.scheduler.advance(Duration::from_millis(249));
        assert_eq!(h.presentation.state().menu(), MenuState::Open);

        h.scheduler.advance(Duration::from_millis(1));
        assert_eq!(h.presentation.state().menu(), MenuState::Closed);
        assert!(!h.page.inline_layout.get());
        assert!(!h.page.hamburger_visible.get());
        assert!(!h.page.scroll_locked.get());
    }

    #[test]
    fn card_hover_lifts_and_settles() {
        let h = harness(FixedDevice::desktop(), Vec::new());

        h.presentation.card_enter(1);
        assert_eq!(*h.page.lifted_cards.borrow(), vec![1]);
        h.presentation.card_leave(1);
        assert!(h.page.lifted_cards.borrow().is_empty());
    }

    #[test]
    fn scroll_to_top_reaches_the_surface() {
        let h = harness(FixedDevice::desktop(), Vec::new());

        h.presentation.scroll_to_top();

        assert!(h.page.scrolled_to_top.get());
    }

    #[tokio::test]
    async fn empty_email_is_rejected_without_a_request() {
        let h = harness(FixedDevice::desktop(), vec![Ok(200)]);
        let fields = ContactFields {
            email: String::new(),
            ..filled_form()
        };

        let outcome = h.presentation.submit(fields).await;

        assert!(matches!(outcome, SubmitOutcome::Failed(_)));
        assert_eq!(h.page.toasts_with(Severity::Error), vec![VALIDATION_MESSAGE.to_string()]);
        assert_eq!(h.relay.request_count(), 0);
        assert!(h.page.pending_log.borrow().is_empty());
    }

    #[tokio::test]
    async fn server_error_restores_control_with_one_error_toast() {
        let h = harness(FixedDevice::desktop(), vec![Ok(500)]);

        let outcome = h.presentation.submit(filled_form()).await;

        assert!(matches!(outcome, SubmitOutcome::Failed(_)));
        assert_eq!(*h.page.pending_log.borrow(), vec![true, false]);
        assert_eq!(h.page.toasts_with(Severity::Error), vec![FAILURE_MESSAGE.to_string()]);
        assert_eq!(h.page.cleared.get(), 0);
        assert_eq!(h.relay.request_count(), 1);
    }

    #[tokio::test]
    async fn successful_submit_posts_to_configured_endpoint() {
        let h = harness(FixedDevice::desktop(), vec![Ok(200)]);

        assert_eq!(h.presentation.submit(filled_form()).await, SubmitOutcome::Sent);

        let requests = h.relay.requests.borrow();
        assert_eq!(requests[0].0, h.presentation.config().form_endpoint.as_str());
        assert_eq!(h.page.cleared.get(), 1);
        assert_eq!(*h.page.pending_log.borrow(), vec![true]);

        h.scheduler.advance(Duration::from_millis(1_000));
        assert_eq!(*h.page.pending_log.borrow(), vec![true, false]);
    }
}
