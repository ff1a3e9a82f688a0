use std::{
    cell::{Cell, RefCell},
    collections::HashMap,
    rc::Rc,
    time::Duration,
};

use futures_util::future::{FutureExt, LocalBoxFuture};
use gloo_net::http::Request;
use gloo_render::{request_animation_frame, AnimationFrame};
use gloo_timers::callback::Timeout;
use js_sys::{Function, Object, Reflect, JSON};
use serde_json::json;
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{Storage, Window};

use crate::{
    config::{data_attribute_name, RuntimeConfig},
    contact::{ContactFields, FormRelay, RelayError},
    device::{DeviceProbe, DeviceSignals},
    host::{ConfigChange, ConfigError, ContentConfig, HostBridge},
    logging::{LogLevel, Logger},
    storage::{PreferenceStore, StorageError},
    timing::{Scheduler, Task, TimerHandle},
    RandomSource,
};

const FALLBACK_VIEWPORT_WIDTH: f64 = 1280.0;
const HOST_GLOBAL: &str = "elementSdk";

pub fn config_from_document(window: &Window) -> RuntimeConfig {
    let root = window.document().and_then(|document| document.document_element());
    RuntimeConfig::from_lookup(|key| root.as_ref()?.get_attribute(&data_attribute_name(key)))
}

pub fn viewport_width(window: &Window) -> f64 {
    window
        .inner_width()
        .ok()
        .and_then(|value| value.as_f64())
        .unwrap_or(FALLBACK_VIEWPORT_WIDTH)
}

fn describe(error: &JsValue) -> String {
    error.as_string().unwrap_or_else(|| format!("{error:?}"))
}

type Slots<T> = Rc<RefCell<HashMap<u64, T>>>;

// Dropping a `Timeout` or `AnimationFrame` cancels it, so each one is held
// until it fires or its handle is cleared.
#[derive(Default)]
pub struct BrowserScheduler {
    next_id: Cell<u64>,
    timers: Slots<Timeout>,
    frames: Slots<AnimationFrame>,
}

impl BrowserScheduler {
    fn next_id(&self) -> u64 {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        id
    }
}

impl Scheduler for BrowserScheduler {
    fn set_timeout(&self, delay: Duration, task: Task) -> TimerHandle {
        let id = self.next_id();
        let timers = Rc::clone(&self.timers);
        let millis = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX);
        let timeout = Timeout::new(millis, move || {
            timers.borrow_mut().remove(&id);
            task();
        });
        self.timers.borrow_mut().insert(id, timeout);
        TimerHandle(id)
    }

    fn clear_timeout(&self, handle: TimerHandle) {
        self.timers.borrow_mut().remove(&handle.0);
    }

    fn request_frame(&self, task: Task) {
        let id = self.next_id();
        let frames = Rc::clone(&self.frames);
        let frame = request_animation_frame(move |_timestamp| {
            frames.borrow_mut().remove(&id);
            task();
        });
        self.frames.borrow_mut().insert(id, frame);
    }
}

pub struct LocalStoragePrefs {
    window: Window,
}

impl LocalStoragePrefs {
    pub fn new(window: Window) -> Self {
        Self { window }
    }

    fn storage(&self) -> Option<Storage> {
        self.window.local_storage().ok().flatten()
    }
}

impl PreferenceStore for LocalStoragePrefs {
    fn get(&self, key: &str) -> Option<String> {
        self.storage()?.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let storage = self.storage().ok_or(StorageError::Unavailable)?;
        storage
            .set_item(key, value)
            .map_err(|error| StorageError::Rejected(describe(&error)))
    }
}

pub struct BrowserDevice {
    window: Window,
}

impl BrowserDevice {
    pub fn new(window: Window) -> Self {
        Self { window }
    }
}

impl DeviceProbe for BrowserDevice {
    fn signals(&self) -> DeviceSignals {
        let navigator = self.window.navigator();
        let touch_event = Reflect::has(&self.window, &JsValue::from_str("ontouchstart")).unwrap_or(false);
        let device_memory = Reflect::get(&navigator, &JsValue::from_str("deviceMemory"))
            .ok()
            .and_then(|value| value.as_f64());

        DeviceSignals {
            touch_capable: touch_event || navigator.max_touch_points() > 0,
            viewport_width: viewport_width(&self.window),
            user_agent: navigator.user_agent().unwrap_or_default(),
            logical_cores: Some(navigator.hardware_concurrency()),
            device_memory_gib: device_memory,
        }
    }
}

pub struct MathRandom;

impl RandomSource for MathRandom {
    fn next_unit(&self) -> f64 {
        js_sys::Math::random()
    }
}

pub struct FetchRelay;

impl FormRelay for FetchRelay {
    fn post<'a>(&'a self, endpoint: &'a str, fields: &'a ContactFields) -> LocalBoxFuture<'a, Result<u16, RelayError>> {
        async move {
            let response = Request::post(endpoint)
                .header("Accept", "application/json")
                .json(fields)
                .map_err(|error| RelayError::Transport(error.to_string()))?
                .send()
                .await
                .map_err(|error| RelayError::Transport(error.to_string()))?;

            Ok(response.status())
        }
        .boxed_local()
    }
}

pub struct ElementSdkBridge {
    sdk: JsValue,
    logger: Logger,
}

impl ElementSdkBridge {
    pub fn detect(window: &Window, logger: Logger) -> Option<Self> {
        let sdk = Reflect::get(window, &JsValue::from_str(HOST_GLOBAL)).ok()?;
        sdk.is_object().then_some(Self { sdk, logger })
    }
}

impl HostBridge for ElementSdkBridge {
    fn init(&self, defaults: &ContentConfig, on_change: ConfigChange) -> Result<(), ConfigError> {
        let defaults = JSON::parse(&serde_json::to_string(defaults)?)
            .map_err(|error| ConfigError::Host(describe(&error)))?;

        let logger = self.logger;
        let handler = Closure::<dyn FnMut(JsValue)>::new(move |config: JsValue| {
            let Some(raw) = JSON::stringify(&config).ok().map(String::from) else {
                return;
            };
            match ContentConfig::from_json(&raw) {
                Ok(config) => on_change(config),
                Err(error) => {
                    logger.event(LogLevel::Warn, "host_config_rejected", json!({ "error": error.to_string() }));
                }
            }
        });

        let options = Object::new();
        Reflect::set(&options, &JsValue::from_str("defaultConfig"), &defaults)
            .and_then(|_| Reflect::set(&options, &JsValue::from_str("onConfigChange"), handler.as_ref()))
            .map_err(|error| ConfigError::Host(describe(&error)))?;

        let init = Reflect::get(&self.sdk, &JsValue::from_str("init"))
            .ok()
            .and_then(|value| value.dyn_into::<Function>().ok())
            .ok_or_else(|| ConfigError::Host("host has no init function".to_string()))?;
        init.call1(&self.sdk, &options)
            .map_err(|error| ConfigError::Host(describe(&error)))?;

        // The host keeps calling back for the lifetime of the page.
        handler.forget();
        Ok(())
    }
}
