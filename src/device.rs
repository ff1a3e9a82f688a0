pub const NARROW_VIEWPORT_PX: f64 = 768.0;
const LOW_END_MAX_CORES: f64 = 2.0;
const LOW_END_MAX_MEMORY_GIB: f64 = 2.0;
const MOBILE_USER_AGENT_MARKERS: [&str; 8] = [
    "android",
    "webos",
    "iphone",
    "ipad",
    "ipod",
    "blackberry",
    "iemobile",
    "opera mini",
];

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DeviceSignals {
    pub touch_capable: bool,
    pub viewport_width: f64,
    pub user_agent: String,
    pub logical_cores: Option<f64>,
    pub device_memory_gib: Option<f64>,
}

pub trait DeviceProbe {
    fn signals(&self) -> DeviceSignals;

    fn is_touch_or_narrow(&self) -> bool {
        is_touch_or_narrow(&self.signals())
    }

    fn is_low_end_hardware(&self) -> bool {
        is_low_end_hardware(&self.signals())
    }

    // Whether parallax, orbs and particle drift run.
    fn is_capable(&self) -> bool {
        let signals = self.signals();
        !is_touch_or_narrow(&signals) && !is_low_end_hardware(&signals)
    }
}

pub fn is_touch_or_narrow(signals: &DeviceSignals) -> bool {
    signals.touch_capable || signals.viewport_width <= NARROW_VIEWPORT_PX || is_mobile_user_agent(&signals.user_agent)
}

pub fn is_low_end_hardware(signals: &DeviceSignals) -> bool {
    let few_cores = signals.logical_cores.is_some_and(|cores| cores > 0.0 && cores <= LOW_END_MAX_CORES);
    let little_memory = signals
        .device_memory_gib
        .is_some_and(|memory| memory > 0.0 && memory <= LOW_END_MAX_MEMORY_GIB);

    few_cores || little_memory
}

fn is_mobile_user_agent(user_agent: &str) -> bool {
    let lowered = user_agent.to_ascii_lowercase();
    MOBILE_USER_AGENT_MARKERS.iter().any(|marker| lowered.contains(marker))
}
