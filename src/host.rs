use std::rc::Rc;

use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

use crate::logging::{LogLevel, Logger};

pub const DEFAULT_OWNER: &str = "Harshal Lathiya";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("host configuration is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("host rejected initialization: {0}")]
    Host(String),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    pub name: String,
    pub tagline: String,
    pub cta_text: String,
    pub about_text: String,
    pub projects_button_text: String,
    pub contact_button_text: String,
    pub footer_text: String,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_OWNER.to_string(),
            tagline: "IT Student | Freelance Developer".to_string(),
            cta_text: "Get In Touch".to_string(),
            about_text: "I build fast, accessible web experiences and enjoy turning ideas into working products."
                .to_string(),
            projects_button_text: "View Projects".to_string(),
            contact_button_text: "Send Message".to_string(),
            footer_text: "Building the web, one project at a time.".to_string(),
        }
    }
}

impl ContentConfig {
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn entries(&self) -> [(ContentSlot, &str); 7] {
        [
            (ContentSlot::Name, &self.name),
            (ContentSlot::Tagline, &self.tagline),
            (ContentSlot::CallToAction, &self.cta_text),
            (ContentSlot::About, &self.about_text),
            (ContentSlot::ProjectsButton, &self.projects_button_text),
            (ContentSlot::ContactButton, &self.contact_button_text),
            (ContentSlot::Footer, &self.footer_text),
        ]
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum ContentSlot {
    Name,
    Tagline,
    CallToAction,
    About,
    ProjectsButton,
    ContactButton,
    Footer,
    Copyright,
}

impl ContentSlot {
    pub fn element_id(self) -> &'static str {
        match self {
            Self::Name => "hero-name",
            Self::Tagline => "hero-tagline",
            Self::CallToAction => "hero-cta",
            Self::About => "about-text",
            Self::ProjectsButton => "projects-button",
            Self::ContactButton => "contact-button",
            Self::Footer => "footer-note",
            Self::Copyright => "footer-text",
        }
    }
}

pub trait ContentSurface {
    fn set_text(&self, slot: ContentSlot, text: &str);
}

pub type ConfigChange = Box<dyn Fn(ContentConfig)>;

pub trait HostBridge {
    fn init(&self, defaults: &ContentConfig, on_change: ConfigChange) -> Result<(), ConfigError>;
}

pub fn render_content(surface: &dyn ContentSurface, config: &ContentConfig) {
    for (slot, text) in config.entries() {
        if !text.trim().is_empty() {
            surface.set_text(slot, text);
        }
    }
}

pub fn copyright_line(year: i32, owner: &str) -> String {
    format!("© {year} {owner}. All rights reserved.")
}

pub fn attach_host(
    host: Option<&dyn HostBridge>,
    surface: Rc<dyn ContentSurface>,
    defaults: &ContentConfig,
    logger: Logger,
) -> bool {
    let Some(host) = host else {
        return false;
    };

    let on_change: ConfigChange = Box::new(move |config: ContentConfig| {
        logger.event(LogLevel::Info, "host_config_changed", json!({ "name": config.name }));
        render_content(surface.as_ref(), &config);
    });

    match host.init(defaults, on_change) {
        Ok(()) => true,
        Err(error) => {
            logger.event(LogLevel::Warn, "host_init_failed", json!({ "error": error.to_string() }));
            false
        }
    }
}
