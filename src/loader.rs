use std::{rc::Rc, time::Duration};

use crate::{
    reveal::{RevealAnimator, RevealTarget},
    timing::Scheduler,
};

pub const OVERLAY_FADE_DELAY: Duration = Duration::from_millis(800);
pub const OVERLAY_HIDE_DELAY: Duration = Duration::from_millis(500);

pub trait LoaderSurface {
    fn has_overlay(&self) -> bool;
    fn fade_overlay(&self);
    fn hide_overlay(&self);
    fn entrance_targets(&self) -> Vec<RevealTarget>;
}

pub fn start_loading_sequence(
    scheduler: Rc<dyn Scheduler>,
    surface: Rc<dyn LoaderSurface>,
    animator: Rc<RevealAnimator>,
) {
    let hide_scheduler = Rc::clone(&scheduler);
    scheduler.set_timeout(
        OVERLAY_FADE_DELAY,
        Box::new(move || {
            if surface.has_overlay() {
                surface.fade_overlay();
            }
            hide_scheduler.set_timeout(
                OVERLAY_HIDE_DELAY,
                Box::new(move || {
                    if surface.has_overlay() {
                        surface.hide_overlay();
                    }
                    for target in surface.entrance_targets() {
                        animator.reveal(target);
                    }
                }),
            );
        }),
    );
}
