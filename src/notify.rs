use std::{
    cell::{Cell, RefCell},
    rc::{Rc, Weak},
    time::Duration,
};

use serde_json::json;

use crate::{
    logging::{LogLevel, Logger},
    timing::{Scheduler, TimerHandle},
};

pub const EXIT_ANIMATION: Duration = Duration::from_millis(300);

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Severity {
    Info,
    Success,
    Error,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Error => "error",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Self::Success => "fas fa-check-circle",
            Self::Info | Self::Error => "fas fa-exclamation-circle",
        }
    }

    pub fn background(self) -> &'static str {
        match self {
            Self::Info => "#3b82f6",
            Self::Success => "#10b981",
            Self::Error => "#ef4444",
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct NotificationId(pub u64);

#[derive(Clone, Debug, PartialEq)]
pub struct Notification {
    pub id: NotificationId,
    pub message: String,
    pub severity: Severity,
}

pub trait NotificationSurface {
    fn present(&self, notification: &Notification, on_close: Box<dyn Fn()>);
    fn begin_exit(&self, id: NotificationId);
    fn remove(&self, id: NotificationId);
}

struct Visible {
    id: NotificationId,
    auto_dismiss: Option<TimerHandle>,
    exiting: bool,
}

/// Single-slot toast presenter: a new message replaces the visible one
/// immediately.
pub struct NotificationPresenter {
    surface: Rc<dyn NotificationSurface>,
    scheduler: Rc<dyn Scheduler>,
    display: Duration,
    next_id: Cell<u64>,
    current: RefCell<Option<Visible>>,
    logger: Logger,
}

impl NotificationPresenter {
    pub fn new(
        surface: Rc<dyn NotificationSurface>,
        scheduler: Rc<dyn Scheduler>,
        display: Duration,
        logger: Logger,
    ) -> Rc<Self> {
        Rc::new(Self {
            surface,
            scheduler,
            display,
            next_id: Cell::new(0),
            current: RefCell::new(None),
            logger,
        })
    }

    pub fn notify(self: &Rc<Self>, message: impl Into<String>, severity: Severity) -> NotificationId {
        let previous = self.current.borrow_mut().take();
        if let Some(previous) = previous {
            if let Some(timer) = previous.auto_dismiss {
                self.scheduler.clear_timeout(timer);
            }
            self.surface.remove(previous.id);
        }

        let id = NotificationId(self.next_id.get() + 1);
        self.next_id.set(id.0);
        let notification = Notification {
            id,
            message: message.into(),
            severity,
        };

        let on_close = {
            let presenter = Rc::downgrade(self);
            Box::new(move || {
                if let Some(presenter) = presenter.upgrade() {
                    presenter.dismiss(id);
                }
            })
        };
        self.surface.present(&notification, on_close);

        let presenter = Rc::downgrade(self);
        let timer = self.scheduler.set_timeout(
            self.display,
            Box::new(move || {
                if let Some(presenter) = presenter.upgrade() {
                    presenter.expire(id);
                }
            }),
        );

        *self.current.borrow_mut() = Some(Visible {
            id,
            auto_dismiss: Some(timer),
            exiting: false,
        });

        self.logger.event(
            LogLevel::Debug,
            "notification_shown",
            json!({ "id": id.0, "severity": severity.as_str() }),
        );
        id
    }

    pub fn dismiss(self: &Rc<Self>, id: NotificationId) {
        let timer = {
            let mut current = self.current.borrow_mut();
            match current.as_mut() {
                Some(visible) if visible.id == id && !visible.exiting => {
                    visible.exiting = true;
                    visible.auto_dismiss.take()
                }
                _ => return,
            }
        };

        if let Some(timer) = timer {
            self.scheduler.clear_timeout(timer);
        }
        self.begin_exit(id);
    }

    pub fn visible(&self) -> Option<NotificationId> {
        self.current.borrow().as_ref().map(|visible| visible.id)
    }

    fn expire(self: &Rc<Self>, id: NotificationId) {
        {
            let mut current = self.current.borrow_mut();
            match current.as_mut() {
                Some(visible) if visible.id == id && !visible.exiting => {
                    visible.exiting = true;
                    visible.auto_dismiss = None;
                }
                _ => return,
            }
        }
        self.begin_exit(id);
    }

    fn begin_exit(self: &Rc<Self>, id: NotificationId) {
        self.surface.begin_exit(id);

        let presenter: Weak<Self> = Rc::downgrade(self);
        self.scheduler.set_timeout(
            EXIT_ANIMATION,
            Box::new(move || {
                if let Some(presenter) = presenter.upgrade() {
                    presenter.finish(id);
                }
            }),
        );
    }

    fn finish(&self, id: NotificationId) {
        let is_current = self.current.borrow().as_ref().is_some_and(|visible| visible.id == id);
        // A replacement already removed this toast.
        if !is_current {
            return;
        }
        *self.current.borrow_mut() = None;
        self.surface.remove(id);
    }
}
