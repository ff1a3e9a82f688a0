use std::time::Duration;

use url::Url;

use crate::logging::LogLevel;

pub const DEFAULT_BREAKPOINT_PX: f64 = 768.0;
pub const DEFAULT_HEADER_OFFSET_PX: f64 = 80.0;
pub const DEFAULT_SECTION_LOOKAHEAD_PX: f64 = 100.0;
pub const DEFAULT_SCROLL_TOP_THRESHOLD_PX: f64 = 300.0;
pub const DEFAULT_SCROLL_DEBOUNCE_MS: u64 = 16;
pub const DEFAULT_RESIZE_DEBOUNCE_MS: u64 = 250;
pub const DEFAULT_NOTIFICATION_DURATION_MS: u64 = 5_000;
pub const DEFAULT_SUBMIT_RESTORE_DELAY_MS: u64 = 1_000;
pub const DEFAULT_PARTICLE_COUNT: usize = 50;
pub const DEFAULT_FORM_ENDPOINT: &str = "https://formspree.io/f/xeopzvgq";
const DEFAULT_LOG_LEVEL: LogLevel = LogLevel::Info;

const BREAKPOINT_PX_BOUNDS: (u64, u64) = (320, 2_560);
const HEADER_OFFSET_PX_BOUNDS: (u64, u64) = (0, 400);
const SECTION_LOOKAHEAD_PX_BOUNDS: (u64, u64) = (0, 400);
const SCROLL_TOP_THRESHOLD_PX_BOUNDS: (u64, u64) = (0, 5_000);
const SCROLL_DEBOUNCE_MS_BOUNDS: (u64, u64) = (1, 250);
const RESIZE_DEBOUNCE_MS_BOUNDS: (u64, u64) = (1, 2_000);
const NOTIFICATION_DURATION_MS_BOUNDS: (u64, u64) = (500, 60_000);
const SUBMIT_RESTORE_DELAY_MS_BOUNDS: (u64, u64) = (0, 10_000);
const PARTICLE_COUNT_BOUNDS: (usize, usize) = (0, 500);

#[derive(Clone, Debug)]
pub struct RuntimeConfig {
    pub breakpoint_px: f64,
    pub header_offset_px: f64,
    pub section_lookahead_px: f64,
    pub scroll_top_threshold_px: f64,
    pub scroll_debounce: Duration,
    pub resize_debounce: Duration,
    pub notification_duration: Duration,
    pub submit_restore_delay: Duration,
    pub particle_count: usize,
    pub form_endpoint: Url,
    pub restore_persisted_theme: bool,
    pub log_level: LogLevel,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl RuntimeConfig {
    /// Builds the config from an arbitrary key source. Unknown, unparsable or
    /// out-of-range values keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let breakpoint_px =
            parse_u64_with_bounds(&lookup, "BREAKPOINT_PX", DEFAULT_BREAKPOINT_PX as u64, BREAKPOINT_PX_BOUNDS);
        let header_offset_px = parse_u64_with_bounds(
            &lookup,
            "HEADER_OFFSET_PX",
            DEFAULT_HEADER_OFFSET_PX as u64,
            HEADER_OFFSET_PX_BOUNDS,
        );
        let section_lookahead_px = parse_u64_with_bounds(
            &lookup,
            "SECTION_LOOKAHEAD_PX",
            DEFAULT_SECTION_LOOKAHEAD_PX as u64,
            SECTION_LOOKAHEAD_PX_BOUNDS,
        );
        let scroll_top_threshold_px = parse_u64_with_bounds(
            &lookup,
            "SCROLL_TOP_THRESHOLD_PX",
            DEFAULT_SCROLL_TOP_THRESHOLD_PX as u64,
            SCROLL_TOP_THRESHOLD_PX_BOUNDS,
        );
        let scroll_debounce_ms = parse_u64_with_bounds(
            &lookup,
            "SCROLL_DEBOUNCE_MS",
            DEFAULT_SCROLL_DEBOUNCE_MS,
            SCROLL_DEBOUNCE_MS_BOUNDS,
        );
        let resize_debounce_ms = parse_u64_with_bounds(
            &lookup,
            "RESIZE_DEBOUNCE_MS",
            DEFAULT_RESIZE_DEBOUNCE_MS,
            RESIZE_DEBOUNCE_MS_BOUNDS,
        );
        let notification_duration_ms = parse_u64_with_bounds(
            &lookup,
            "NOTIFICATION_DURATION_MS",
            DEFAULT_NOTIFICATION_DURATION_MS,
            NOTIFICATION_DURATION_MS_BOUNDS,
        );
        let submit_restore_delay_ms = parse_u64_with_bounds(
            &lookup,
            "SUBMIT_RESTORE_DELAY_MS",
            DEFAULT_SUBMIT_RESTORE_DELAY_MS,
            SUBMIT_RESTORE_DELAY_MS_BOUNDS,
        );
        let particle_count =
            parse_usize_with_bounds(&lookup, "PARTICLE_COUNT", DEFAULT_PARTICLE_COUNT, PARTICLE_COUNT_BOUNDS);
        let form_endpoint = parse_http_url(&lookup, "FORM_ENDPOINT").unwrap_or_else(default_form_endpoint);
        let restore_persisted_theme = parse_bool(&lookup, "RESTORE_PERSISTED_THEME").unwrap_or(false);
        let log_level = parse_non_empty_string(&lookup, "LOG_LEVEL")
            .and_then(|value| LogLevel::parse(&value))
            .unwrap_or(DEFAULT_LOG_LEVEL);

        Self {
            breakpoint_px: breakpoint_px as f64,
            header_offset_px: header_offset_px as f64,
            section_lookahead_px: section_lookahead_px as f64,
            scroll_top_threshold_px: scroll_top_threshold_px as f64,
            scroll_debounce: Duration::from_millis(scroll_debounce_ms),
            resize_debounce: Duration::from_millis(resize_debounce_ms),
            notification_duration: Duration::from_millis(notification_duration_ms),
            submit_restore_delay: Duration::from_millis(submit_restore_delay_ms),
            particle_count,
            form_endpoint,
            restore_persisted_theme,
            log_level,
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }
}

pub fn data_attribute_name(key: &str) -> String {
    format!("data-{}", key.to_ascii_lowercase().replace('_', "-"))
}

fn default_form_endpoint() -> Url {
    Url::parse(DEFAULT_FORM_ENDPOINT).expect("default form endpoint is a valid URL")
}

fn parse_u64_with_bounds(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: u64,
    bounds: (u64, u64),
) -> u64 {
    lookup(name)
        .and_then(|value| value.trim().parse::<u64>().ok())
        .filter(|value| (bounds.0..=bounds.1).contains(value))
        .unwrap_or(default)
}

fn parse_usize_with_bounds(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: usize,
    bounds: (usize, usize),
) -> usize {
    lookup(name)
        .and_then(|value| value.trim().parse::<usize>().ok())
        .filter(|value| (bounds.0..=bounds.1).contains(value))
        .unwrap_or(default)
}

fn parse_non_empty_string(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<String> {
    lookup(name)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_http_url(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<Url> {
    let value = parse_non_empty_string(lookup, name)?;
    let parsed = Url::parse(&value).ok()?;

    if parsed.scheme() == "http" || parsed.scheme() == "https" {
        Some(parsed)
    } else {
        None
    }
}

fn parse_bool(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<bool> {
    match parse_non_empty_string(lookup, name)?.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
