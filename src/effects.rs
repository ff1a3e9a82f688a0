use std::{f64::consts::FRAC_PI_2, rc::Rc, time::Duration};

use crate::{device::DeviceProbe, timing::Scheduler};

pub const PARALLAX_FACTOR: f64 = 0.3;
pub const NAVBAR_GLOW_RAMP_PX: f64 = 100.0;
pub const NAVBAR_GLOW_MAX: f64 = 0.3;
const ORB_BASE_SPEED: f64 = 0.05;
const ORB_SWAY_PX: f64 = 20.0;
const ORB_SWAY_RATE: f64 = 0.005;
const PARTICLE_SWAY_PX: f64 = 10.0;
const PARTICLE_SWAY_RATE: f64 = 0.002;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Offset {
    pub x: f64,
    pub y: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DecorativeFrame {
    pub hero_offset: f64,
    pub orbs: Vec<Offset>,
    pub particle_drift: Vec<f64>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ScrollFrame {
    pub scroll_top_visible: bool,
    pub decorative: Option<DecorativeFrame>,
    pub navbar_glow: f64,
}

impl ScrollFrame {
    pub fn compute(
        scroll_y: f64,
        scroll_top_threshold: f64,
        capable: bool,
        orb_count: usize,
        particle_count: usize,
    ) -> Self {
        let decorative = capable.then(|| DecorativeFrame {
            hero_offset: scroll_y * PARALLAX_FACTOR,
            orbs: (0..orb_count).map(|index| orb_offset(scroll_y, index)).collect(),
            particle_drift: (0..particle_count)
                .map(|index| particle_drift(scroll_y, index))
                .collect(),
        });

        Self {
            scroll_top_visible: scroll_y > scroll_top_threshold,
            decorative,
            navbar_glow: navbar_glow(scroll_y),
        }
    }
}

pub fn orb_offset(scroll_y: f64, index: usize) -> Offset {
    let position = index as f64;
    let speed = ORB_BASE_SPEED * (position + 1.0);
    let phase = position * FRAC_PI_2;

    Offset {
        x: (scroll_y * ORB_SWAY_RATE + phase).sin() * ORB_SWAY_PX,
        y: scroll_y * speed,
    }
}

pub fn particle_drift(scroll_y: f64, index: usize) -> f64 {
    (scroll_y * PARTICLE_SWAY_RATE + index as f64).sin() * PARTICLE_SWAY_PX
}

pub fn navbar_glow(scroll_y: f64) -> f64 {
    (scroll_y.max(0.0) / NAVBAR_GLOW_RAMP_PX).min(1.0) * NAVBAR_GLOW_MAX
}

pub trait EffectsSurface {
    fn orb_count(&self) -> usize;
    fn particle_count(&self) -> usize;
    fn set_scroll_top_visible(&self, visible: bool);
    fn set_hero_offset(&self, offset_px: f64);
    fn set_orb_offset(&self, index: usize, offset: Offset);
    fn set_particle_drift(&self, index: usize, offset_px: f64);
    fn set_navbar_glow(&self, opacity: f64);
    fn smooth_scroll_to_top(&self);
}

pub struct ScrollEffects {
    surface: Rc<dyn EffectsSurface>,
    device: Rc<dyn DeviceProbe>,
    scroll_top_threshold: f64,
}

impl ScrollEffects {
    pub fn new(surface: Rc<dyn EffectsSurface>, device: Rc<dyn DeviceProbe>, scroll_top_threshold: f64) -> Self {
        Self {
            surface,
            device,
            scroll_top_threshold,
        }
    }

    pub fn on_scroll(&self, scroll_y: f64) -> ScrollFrame {
        let capable = self.device.is_capable();
        let (orb_count, particle_count) = if capable {
            (self.surface.orb_count(), self.surface.particle_count())
        } else {
            (0, 0)
        };
        let frame = ScrollFrame::compute(
            scroll_y,
            self.scroll_top_threshold,
            capable,
            orb_count,
            particle_count,
        );

        self.surface.set_scroll_top_visible(frame.scroll_top_visible);
        if let Some(decorative) = &frame.decorative {
            self.surface.set_hero_offset(decorative.hero_offset);
            for (index, offset) in decorative.orbs.iter().enumerate() {
                self.surface.set_orb_offset(index, *offset);
            }
            for (index, drift) in decorative.particle_drift.iter().enumerate() {
                self.surface.set_particle_drift(index, *drift);
            }
        }
        self.surface.set_navbar_glow(frame.navbar_glow);

        frame
    }

    pub fn scroll_to_top(&self) {
        self.surface.smooth_scroll_to_top();
    }
}

pub const CARD_OVERLAY_FADE_IN: Duration = Duration::from_millis(50);
pub const CARD_OVERLAY_FADE_OUT: Duration = Duration::from_millis(300);

pub trait CardSurface {
    fn set_card_lifted(&self, index: usize, scaled: bool);
    fn attach_overlay(&self, index: usize);
    fn set_overlay_visible(&self, index: usize, visible: bool);
    fn remove_overlay(&self, index: usize);
}

pub struct CardHover {
    scheduler: Rc<dyn Scheduler>,
    surface: Rc<dyn CardSurface>,
}

impl CardHover {
    pub fn new(scheduler: Rc<dyn Scheduler>, surface: Rc<dyn CardSurface>) -> Self {
        Self { scheduler, surface }
    }

    pub fn on_enter(&self, index: usize) {
        self.surface.set_card_lifted(index, true);
        self.surface.attach_overlay(index);

        let surface = Rc::clone(&self.surface);
        self.scheduler.set_timeout(
            CARD_OVERLAY_FADE_IN,
            Box::new(move || surface.set_overlay_visible(index, true)),
        );
    }

    pub fn on_leave(&self, index: usize) {
        self.surface.set_card_lifted(index, false);
        self.surface.set_overlay_visible(index, false);

        let surface = Rc::clone(&self.surface);
        self.scheduler.set_timeout(
            CARD_OVERLAY_FADE_OUT,
            Box::new(move || surface.remove_overlay(index)),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FixedDevice, ManualScheduler};
    use std::cell::{Cell, RefCell};

    #[derive(Default)]
    struct RecordingEffects {
        scroll_top_visible: Cell<Option<bool>>,
        hero_offsets: RefCell<Vec<f64>>,
        orb_writes: Cell<usize>,
        particle_writes: Cell<usize>,
        glow: Cell<Option<f64>>,
        scrolled_top: Cell<bool>,
    }

    impl EffectsSurface for RecordingEffects {
        fn orb_count(&self) -> usize {
            3
        }

        fn particle_count(&self) -> usize {
            50
        }

        fn set_scroll_top_visible(&self, visible: bool) {
            self.scroll_top_visible.set(Some(visible));
        }

        fn set_hero_offset(&self, offset_px: f64) {
            self.hero_offsets.borrow_mut().push(offset_px);
        }

        fn set_orb_offset(&self, _index: usize, _offset: Offset) {
            self.orb_writes.set(self.orb_writes.get() + 1);
        }

        fn set_particle_drift(&self, _index: usize, _offset_px: f64) {
            self.particle_writes.set(self.particle_writes.get() + 1);
        }

        fn set_navbar_glow(&self, opacity: f64) {
            self.glow.set(Some(opacity));
        }

        fn smooth_scroll_to_top(&self) {
            self.scrolled_top.set(true);
        }
    }

    #[test]
    fn scroll_top_button_appears_past_threshold() {
        assert!(!ScrollFrame::compute(300.0, 300.0, true, 0, 0).scroll_top_visible);
        assert!(ScrollFrame::compute(301.0, 300.0, true, 0, 0).scroll_top_visible);
    }

    #[test]
    fn navbar_glow_ramps_then_holds() {
        assert_eq!(navbar_glow(0.0), 0.0);
        assert!((navbar_glow(50.0) - NAVBAR_GLOW_MAX / 2.0).abs() < 1e-12);
        assert_eq!(navbar_glow(100.0), NAVBAR_GLOW_MAX);
        assert_eq!(navbar_glow(4_000.0), NAVBAR_GLOW_MAX);
    }

    #[test]
    fn orbs_differ_in_speed_and_phase() {
        let first = orb_offset(200.0, 0);
        let second = orb_offset(200.0, 1);

        assert!((first.y - 10.0).abs() < 1e-9);
        assert!((second.y - 20.0).abs() < 1e-9);
        assert!((first.x - second.x).abs() > 1e-6);
    }

    #[test]
    fn capable_device_gets_parallax() {
        let surface = Rc::new(RecordingEffects::default());
        let effects = ScrollEffects::new(surface.clone(), Rc::new(FixedDevice::desktop()), 300.0);

        let frame = effects.on_scroll(400.0);

        let hero_offsets = surface.hero_offsets.borrow().clone();
        assert_eq!(hero_offsets.len(), 1);
        assert!((hero_offsets[0] - 120.0).abs() < 1e-9);
        assert_eq!(surface.orb_writes.get(), 3);
        assert_eq!(surface.particle_writes.get(), 50);
        assert_eq!(surface.scroll_top_visible.get(), Some(true));
        assert_eq!(frame.navbar_glow, NAVBAR_GLOW_MAX);
    }

    #[test]
    fn constrained_device_skips_decorative_work_but_keeps_glow() {
        let surface = Rc::new(RecordingEffects::default());
        let effects = ScrollEffects::new(surface.clone(), Rc::new(FixedDevice::phone()), 300.0);

        let frame = effects.on_scroll(50.0);

        assert!(frame.decorative.is_none());
        assert!(surface.hero_offsets.borrow().is_empty());
        assert_eq!(surface.orb_writes.get(), 0);
        assert_eq!(surface.particle_writes.get(), 0);
        assert_eq!(surface.scroll_top_visible.get(), Some(false));
        assert!(surface.glow.get().is_some_and(|glow| glow > 0.0));
    }

    #[test]
    fn scroll_to_top_delegates_to_surface() {
        let surface = Rc::new(RecordingEffects::default());
        let effects = ScrollEffects::new(surface.clone(), Rc::new(FixedDevice::desktop()), 300.0);

        effects.scroll_to_top();

        assert!(surface.scrolled_top.get());
    }

    #[derive(Default)]
    struct RecordingCards {
        events: RefCell<Vec<String>>,
    }

    impl CardSurface for RecordingCards {
        fn set_card_lifted(&self, index: usize, scaled: bool) {
            self.events.borrow_mut().push(format!("lift {index} {scaled}"));
        }

        fn attach_overlay(&self, index: usize) {
            self.events.borrow_mut().push(format!("attach {index}"));
        }

        fn set_overlay_visible(&self, index: usize, visible: bool) {
            self.events.borrow_mut().push(format!("overlay {index} {visible}"));
        }

        fn remove_overlay(&self, index: usize) {
            self.events.borrow_mut().push(format!("remove {index}"));
        }
    }

    #[test]
    fn card_overlay_fades_in_and_is_removed_after_fade_out() {
        let scheduler = Rc::new(ManualScheduler::default());
        let surface = Rc::new(RecordingCards::default());
        let hover = CardHover::new(scheduler.clone(), surface.clone());

        hover.on_enter(2);
        scheduler.advance(CARD_OVERLAY_FADE_IN);
        hover.on_leave(2);
        scheduler.advance(CARD_OVERLAY_FADE_OUT);

        assert_eq!(
            *surface.events.borrow(),
            vec![
                "lift 2 true",
                "attach 2",
                "overlay 2 true",
                "lift 2 false",
                "overlay 2 false",
                "remove 2",
            ]
        );
    }
}
