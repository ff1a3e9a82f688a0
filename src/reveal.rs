use std::{cell::RefCell, collections::HashSet, rc::Rc, time::Duration};

use serde_json::json;

use crate::{
    logging::{LogLevel, Logger},
    timing::{FrameBatch, Scheduler},
    RandomSource,
};

pub const STAGGER_STEP: Duration = Duration::from_millis(100);
pub const DEFAULT_THRESHOLD: f64 = 0.1;
pub const CONSTRAINED_THRESHOLD: f64 = 0.05;
pub const BOTTOM_MARGIN_PX: u32 = 50;
pub const SKILL_BAR_THRESHOLD: f64 = 0.5;
pub const SKILL_BAR_SETTLE: Duration = Duration::from_millis(300);
const SKILL_BAR_MIN_PERCENT: f64 = 70.0;
const SKILL_BAR_SPAN_PERCENT: f64 = 30.0;
const MAX_UNIT_SAMPLE: f64 = 0.9999;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum RevealGroup {
    SkillCategory,
    ProjectCard,
    TimelineItem,
}

impl RevealGroup {
    pub fn class_name(self) -> &'static str {
        match self {
            Self::SkillCategory => "skill-category",
            Self::ProjectCard => "project-card",
            Self::TimelineItem => "timeline-item",
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Entrance {
    FadeIn,
    SlideLeft,
    SlideRight,
    Grouped(RevealGroup, usize),
}

impl Entrance {
    pub fn stagger_delay(self) -> Option<Duration> {
        match self {
            Self::Grouped(_, index) => Some(STAGGER_STEP * u32::try_from(index).unwrap_or(u32::MAX)),
            _ => None,
        }
    }
}

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct RevealTarget {
    pub id: String,
    pub entrance: Entrance,
}

impl RevealTarget {
    pub fn new(id: impl Into<String>, entrance: Entrance) -> Self {
        Self {
            id: id.into(),
            entrance,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ObserverOptions {
    pub threshold: f64,
    pub root_margin: String,
}

pub fn observer_options(constrained: bool) -> ObserverOptions {
    ObserverOptions {
        threshold: if constrained {
            CONSTRAINED_THRESHOLD
        } else {
            DEFAULT_THRESHOLD
        },
        root_margin: format!("0px 0px -{BOTTOM_MARGIN_PX}px 0px"),
    }
}

pub trait RevealSurface {
    fn reveal(&self, target: &RevealTarget, delay: Option<Duration>);
}

pub struct RevealAnimator {
    revealed: RefCell<HashSet<String>>,
    batch: FrameBatch<RevealTarget>,
}

impl RevealAnimator {
    pub fn new(scheduler: Rc<dyn Scheduler>, surface: Rc<dyn RevealSurface>) -> Self {
        let batch = FrameBatch::new(scheduler, move |targets: Vec<RevealTarget>| {
            for target in &targets {
                surface.reveal(target, target.entrance.stagger_delay());
            }
        });

        Self {
            revealed: RefCell::new(HashSet::new()),
            batch,
        }
    }

    pub fn on_intersection(&self, target: RevealTarget, is_intersecting: bool) -> bool {
        is_intersecting && self.reveal(target)
    }

    /// Latches `target` and queues it for the next frame. Returns false when
    /// it had already been revealed.
    pub fn reveal(&self, target: RevealTarget) -> bool {
        if !self.revealed.borrow_mut().insert(target.id.clone()) {
            return false;
        }
        self.batch.enqueue(target);
        true
    }

    pub fn is_revealed(&self, id: &str) -> bool {
        self.revealed.borrow().contains(id)
    }

    pub fn revealed_count(&self) -> usize {
        self.revealed.borrow().len()
    }
}

pub trait SkillBarSurface {
    fn fill_skill_bar(&self, category_id: &str, width_percent: f64);
}

pub fn skill_bar_width(sample: f64) -> f64 {
    SKILL_BAR_MIN_PERCENT + sample.clamp(0.0, MAX_UNIT_SAMPLE) * SKILL_BAR_SPAN_PERCENT
}

pub struct SkillBars {
    scheduler: Rc<dyn Scheduler>,
    random: Rc<dyn RandomSource>,
    surface: Rc<dyn SkillBarSurface>,
    filled: RefCell<HashSet<String>>,
    logger: Logger,
}

impl SkillBars {
    pub fn new(
        scheduler: Rc<dyn Scheduler>,
        random: Rc<dyn RandomSource>,
        surface: Rc<dyn SkillBarSurface>,
        logger: Logger,
    ) -> Self {
        Self {
            scheduler,
            random,
            surface,
            filled: RefCell::new(HashSet::new()),
            logger,
        }
    }

    pub fn on_category_visible(&self, category_id: &str, is_intersecting: bool) {
        if !is_intersecting || !self.filled.borrow_mut().insert(category_id.to_string()) {
            return;
        }

        let width = skill_bar_width(self.random.next_unit());
        let surface = Rc::clone(&self.surface);
        let category = category_id.to_string();
        self.scheduler.set_timeout(
            SKILL_BAR_SETTLE,
            Box::new(move || surface.fill_skill_bar(&category, width)),
        );
        self.logger.event(
            LogLevel::Debug,
            "skill_bar_scheduled",
            json!({ "category": category_id, "width": width }),
        );
    }
}
