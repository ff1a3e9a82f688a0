use std::rc::Rc;

use serde_json::json;

use crate::{
    logging::{LogLevel, Logger},
    state::PresentationState,
};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MenuState {
    Closed,
    Open,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SectionBounds {
    pub id: String,
    pub top: f64,
    pub height: f64,
}

impl SectionBounds {
    pub fn new(id: impl Into<String>, top: f64, height: f64) -> Self {
        Self {
            id: id.into(),
            top,
            height,
        }
    }

    pub fn contains(&self, position: f64) -> bool {
        position >= self.top && position < self.top + self.height
    }
}

/// First section in document order whose `[top, top + height)` holds
/// `position`.
pub fn section_at(sections: &[SectionBounds], position: f64) -> Option<&SectionBounds> {
    sections.iter().find(|section| section.contains(position))
}

pub trait NavSurface {
    fn sections(&self) -> Vec<SectionBounds>;
    fn set_active_link(&self, section_id: Option<&str>);
    fn smooth_scroll_to(&self, top: f64);
    fn install_mobile_menu(&self);
    fn set_menu_open(&self, open: bool);
    fn teardown_mobile_menu(&self);
}

pub struct NavigationCoordinator {
    state: Rc<PresentationState>,
    surface: Rc<dyn NavSurface>,
    breakpoint_px: f64,
    header_offset_px: f64,
    lookahead_px: f64,
    logger: Logger,
}

impl NavigationCoordinator {
    pub fn new(
        state: Rc<PresentationState>,
        surface: Rc<dyn NavSurface>,
        breakpoint_px: f64,
        header_offset_px: f64,
        lookahead_px: f64,
        logger: Logger,
    ) -> Self {
        Self {
            state,
            surface,
            breakpoint_px,
            header_offset_px,
            lookahead_px,
            logger,
        }
    }

    pub fn on_scroll(&self, scroll_y: f64) -> Option<String> {
        let sections = self.surface.sections();
        let active = section_at(&sections, scroll_y + self.lookahead_px).map(|section| section.id.clone());
        self.mark_active(active.clone());
        active
    }

    // The link is marked active before the smooth scroll finishes.
    pub fn on_link_click(&self, section_id: &str) -> bool {
        if self.state.menu() == MenuState::Open {
            self.close_menu("link_click");
        }

        let sections = self.surface.sections();
        let Some(target) = sections.iter().find(|section| section.id == section_id) else {
            self.logger
                .event(LogLevel::Debug, "nav_target_missing", json!({ "section": section_id }));
            return false;
        };

        self.surface
            .smooth_scroll_to((target.top - self.header_offset_px).max(0.0));
        self.mark_active(Some(target.id.clone()));
        true
    }

    pub fn toggle_menu(&self) -> MenuState {
        if !self.state.menu_installed() {
            return self.state.menu();
        }

        match self.state.menu() {
            MenuState::Closed => {
                self.state.set_menu(MenuState::Open);
                self.surface.set_menu_open(true);
                self.logger.event(LogLevel::Debug, "menu_opened", json!({}));
            }
            MenuState::Open => self.close_menu("hamburger"),
        }

        self.state.menu()
    }

    pub fn on_viewport_width(&self, width: f64) {
        let narrow = width <= self.breakpoint_px;

        if narrow && !self.state.menu_installed() {
            self.surface.install_mobile_menu();
            self.state.set_menu_installed(true);
            self.state.set_menu(MenuState::Closed);
            self.logger
                .event(LogLevel::Debug, "mobile_menu_installed", json!({ "width": width }));
        } else if !narrow && self.state.menu_installed() {
            if self.state.menu() == MenuState::Open {
                self.close_menu("resize");
            }
            self.surface.teardown_mobile_menu();
            self.state.set_menu_installed(false);
            self.logger
                .event(LogLevel::Debug, "mobile_menu_removed", json!({ "width": width }));
        }
    }

    fn close_menu(&self, reason: &str) {
        self.state.set_menu(MenuState::Closed);
        self.surface.set_menu_open(false);
        self.logger.event(LogLevel::Debug, "menu_closed", json!({ "reason": reason }));
    }

    fn mark_active(&self, section: Option<String>) {
        self.surface.set_active_link(section.as_deref());
        self.state.set_active_section(section);
    }
}
