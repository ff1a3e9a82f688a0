use std::rc::Rc;

use serde_json::json;

use crate::{
    logging::{LogLevel, Logger},
    state::PresentationState,
    storage::PreferenceStore,
};

pub const THEME_KEY: &str = "theme";

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    pub fn toggle_label(self) -> String {
        let next = self.toggled().as_str();
        format!("Switch to {next} theme")
    }

    pub fn icon(self) -> &'static str {
        match self {
            Self::Light => "fas fa-moon",
            Self::Dark => "fas fa-sun",
        }
    }
}

pub trait ThemeSurface {
    // Dark sets `data-theme="dark"` on the document root; light removes it.
    fn apply_theme(&self, theme: Theme);
    fn set_indicator(&self, icon: &str, label: &str);
}

pub struct ThemeController {
    state: Rc<PresentationState>,
    store: Rc<dyn PreferenceStore>,
    surface: Rc<dyn ThemeSurface>,
    restore_persisted: bool,
    logger: Logger,
}

impl ThemeController {
    pub fn new(
        state: Rc<PresentationState>,
        store: Rc<dyn PreferenceStore>,
        surface: Rc<dyn ThemeSurface>,
        restore_persisted: bool,
        logger: Logger,
    ) -> Self {
        Self {
            state,
            store,
            surface,
            restore_persisted,
            logger,
        }
    }

    pub fn initialize(&self) -> Theme {
        let theme = if self.restore_persisted {
            self.store
                .get(THEME_KEY)
                .and_then(|value| Theme::parse(&value))
                .unwrap_or(Theme::Dark)
        } else {
            Theme::Dark
        };

        self.commit(theme);
        theme
    }

    pub fn toggle(&self) -> Theme {
        let next = self.state.theme().toggled();
        self.commit(next);
        self.logger
            .event(LogLevel::Debug, "theme_toggled", json!({ "theme": next.as_str() }));
        next
    }

    pub fn current(&self) -> Theme {
        self.state.theme()
    }

    fn commit(&self, theme: Theme) {
        self.state.set_theme(theme);
        self.surface.apply_theme(theme);

        // In-memory state stays authoritative for the session when this fails.
        if let Err(error) = self.store.set(THEME_KEY, theme.as_str()) {
            self.logger.event(
                LogLevel::Warn,
                "theme_persist_failed",
                json!({ "theme": theme.as_str(), "error": error.to_string() }),
            );
        }

        self.surface.set_indicator(theme.icon(), &theme.toggle_label());
    }
}
