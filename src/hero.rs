use std::{
    cell::{Cell, RefCell},
    rc::Rc,
    time::Duration,
};

use crate::timing::Scheduler;

pub const TAGLINES: [&str; 4] = [
    "IT Student | Freelance Developer",
    "Full-Stack Developer",
    "Tech Enthusiast",
    "Continuous Learner",
];
pub const NAME_COLORS: [&str; 5] = [
    "var(--primary-color)",
    "var(--secondary-color)",
    "var(--accent-color)",
    "#f59e0b",
    "#ec4899",
];

pub const TYPING_START_DELAY: Duration = Duration::from_millis(1_500);
pub const TYPE_DELAY: Duration = Duration::from_millis(100);
pub const DELETE_DELAY: Duration = Duration::from_millis(50);
pub const HOLD_DELAY: Duration = Duration::from_millis(2_000);
pub const NEXT_TAGLINE_DELAY: Duration = Duration::from_millis(500);
pub const COLOR_CYCLE_INTERVAL: Duration = Duration::from_millis(3_000);

pub trait HeroSurface {
    fn set_tagline(&self, text: &str);
    fn set_name_color(&self, color: &str);
}

/// Types a tagline one character at a time, holds it, deletes it, then
/// moves on to the next one.
#[derive(Clone, Debug)]
pub struct Typewriter {
    taglines: Vec<String>,
    tagline: usize,
    chars: usize,
    deleting: bool,
}

impl Typewriter {
    pub fn new(taglines: Vec<String>) -> Self {
        Self {
            taglines,
            tagline: 0,
            chars: 0,
            deleting: false,
        }
    }

    pub fn step(&mut self) -> (String, Duration) {
        let Some(current) = self.taglines.get(self.tagline) else {
            return (String::new(), HOLD_DELAY);
        };
        let length = current.chars().count();

        let mut delay = if self.deleting {
            self.chars = self.chars.saturating_sub(1);
            DELETE_DELAY
        } else {
            self.chars = (self.chars + 1).min(length);
            TYPE_DELAY
        };
        let text: String = current.chars().take(self.chars).collect();

        if !self.deleting && self.chars == length {
            self.deleting = true;
            delay = HOLD_DELAY;
        } else if self.deleting && self.chars == 0 {
            self.deleting = false;
            self.tagline = (self.tagline + 1) % self.taglines.len();
            delay = NEXT_TAGLINE_DELAY;
        }

        (text, delay)
    }
}

impl Default for Typewriter {
    fn default() -> Self {
        Self::new(TAGLINES.iter().map(ToString::to_string).collect())
    }
}

pub fn start_typing(scheduler: Rc<dyn Scheduler>, surface: Rc<dyn HeroSurface>, typewriter: Typewriter) {
    schedule_typing_step(scheduler, surface, Rc::new(RefCell::new(typewriter)), TYPING_START_DELAY);
}

fn schedule_typing_step(
    scheduler: Rc<dyn Scheduler>,
    surface: Rc<dyn HeroSurface>,
    typewriter: Rc<RefCell<Typewriter>>,
    delay: Duration,
) {
    let next_scheduler = Rc::clone(&scheduler);
    scheduler.set_timeout(
        delay,
        Box::new(move || {
            let (text, next_delay) = typewriter.borrow_mut().step();
            surface.set_tagline(&text);
            schedule_typing_step(next_scheduler, surface, typewriter, next_delay);
        }),
    );
}

pub fn start_color_cycle(scheduler: Rc<dyn Scheduler>, surface: Rc<dyn HeroSurface>) {
    schedule_color_step(scheduler, surface, Rc::new(Cell::new(0)));
}

fn schedule_color_step(scheduler: Rc<dyn Scheduler>, surface: Rc<dyn HeroSurface>, index: Rc<Cell<usize>>) {
    let next_scheduler = Rc::clone(&scheduler);
    scheduler.set_timeout(
        COLOR_CYCLE_INTERVAL,
        Box::new(move || {
            let next = (index.get() + 1) % NAME_COLORS.len();
            index.set(next);
            surface.set_name_color(NAME_COLORS[next]);
            schedule_color_step(next_scheduler, surface, index);
        }),
    );
}
