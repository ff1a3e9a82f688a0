use serde_json::json;

use crate::{
    device::DeviceProbe,
    effects::Offset,
    logging::{LogLevel, Logger},
    RandomSource,
};

const DRIFT_SPAN_PX: f64 = 50.0;

#[derive(Clone, Debug, PartialEq)]
pub struct ParticleSpec {
    pub size_px: f64,
    pub left_percent: f64,
    pub top_percent: f64,
    pub delay_s: f64,
    pub duration_s: f64,
    pub opacity: f64,
}

impl ParticleSpec {
    pub fn sample(random: &dyn RandomSource) -> Self {
        Self {
            size_px: random.next_unit() * 4.0 + 1.0,
            left_percent: random.next_unit() * 100.0,
            top_percent: random.next_unit() * 100.0,
            delay_s: random.next_unit() * 5.0,
            duration_s: random.next_unit() * 10.0 + 10.0,
            opacity: random.next_unit() * 0.3 + 0.1,
        }
    }

    pub fn inline_style(&self) -> String {
        format!(
            "position: absolute; width: {size:.2}px; height: {size:.2}px; background: var(--primary-color); \
             border-radius: 50%; left: {left:.2}%; top: {top:.2}%; opacity: {opacity:.2}; \
             animation: floatParticle {duration:.2}s linear {delay:.2}s infinite; z-index: -1;",
            size = self.size_px,
            left = self.left_percent,
            top = self.top_percent,
            opacity = self.opacity,
            duration = self.duration_s,
            delay = self.delay_s,
        )
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct DriftPath {
    pub waypoints: [Offset; 3],
}

impl DriftPath {
    pub fn sample(random: &dyn RandomSource) -> Self {
        let next = || Offset {
            x: random.next_unit() * DRIFT_SPAN_PX - DRIFT_SPAN_PX / 2.0,
            y: random.next_unit() * DRIFT_SPAN_PX - DRIFT_SPAN_PX / 2.0,
        };
        Self {
            waypoints: [next(), next(), next()],
        }
    }

    pub fn keyframes(&self) -> String {
        let [quarter, half, three_quarters] = self.waypoints;
        format!(
            "@keyframes floatParticle {{ \
             0% {{ transform: translate(0, 0) rotate(0deg); }} \
             25% {{ transform: translate({:.1}px, {:.1}px) rotate(90deg); }} \
             50% {{ transform: translate({:.1}px, {:.1}px) rotate(180deg); }} \
             75% {{ transform: translate({:.1}px, {:.1}px) rotate(270deg); }} \
             100% {{ transform: translate(0, 0) rotate(360deg); }} }}",
            quarter.x, quarter.y, half.x, half.y, three_quarters.x, three_quarters.y
        )
    }
}

pub trait ParticleSurface {
    fn has_particle_container(&self) -> bool;
    fn spawn_particles(&self, particles: &[ParticleSpec], drift: &DriftPath);
}

pub fn particle_budget(configured: usize, low_end: bool) -> usize {
    if low_end {
        configured / 2
    } else {
        configured
    }
}

pub fn populate_particles(
    surface: &dyn ParticleSurface,
    random: &dyn RandomSource,
    device: &dyn DeviceProbe,
    configured: usize,
    logger: Logger,
) -> usize {
    if !surface.has_particle_container() {
        logger.event(LogLevel::Debug, "particle_container_missing", json!({}));
        return 0;
    }

    let count = particle_budget(configured, device.is_low_end_hardware());
    let particles: Vec<ParticleSpec> = (0..count).map(|_| ParticleSpec::sample(random)).collect();
    let drift = DriftPath::sample(random);
    surface.spawn_particles(&particles, &drift);
    count
}
