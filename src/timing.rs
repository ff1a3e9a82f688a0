use std::{
    cell::{Cell, RefCell},
    rc::Rc,
    time::Duration,
};

pub type Task = Box<dyn FnOnce()>;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct TimerHandle(pub u64);

pub trait Scheduler {
    fn set_timeout(&self, delay: Duration, task: Task) -> TimerHandle;
    fn clear_timeout(&self, handle: TimerHandle);
    fn request_frame(&self, task: Task);
}

pub struct Debounced<A> {
    inner: Rc<DebounceInner<A>>,
}

struct DebounceInner<A> {
    scheduler: Rc<dyn Scheduler>,
    wait: Duration,
    pending: Cell<Option<TimerHandle>>,
    callback: Box<dyn Fn(A)>,
}

impl<A> Clone for Debounced<A> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

/// Collapses bursts of calls into one call after `wait` of quiet, carrying the
/// arguments of the last call.
pub fn debounce<A: 'static>(
    scheduler: Rc<dyn Scheduler>,
    wait: Duration,
    callback: impl Fn(A) + 'static,
) -> Debounced<A> {
    Debounced {
        inner: Rc::new(DebounceInner {
            scheduler,
            wait,
            pending: Cell::new(None),
            callback: Box::new(callback),
        }),
    }
}

impl<A: 'static> Debounced<A> {
    pub fn call(&self, args: A) {
        // The previous timer must be gone before the next one exists.
        self.cancel();

        let inner = Rc::clone(&self.inner);
        let handle = self.inner.scheduler.set_timeout(
            self.inner.wait,
            Box::new(move || {
                inner.pending.set(None);
                (inner.callback)(args);
            }),
        );
        self.inner.pending.set(Some(handle));
    }

    pub fn cancel(&self) {
        if let Some(handle) = self.inner.pending.take() {
            self.inner.scheduler.clear_timeout(handle);
        }
    }

    pub fn is_pending(&self) -> bool {
        self.inner.pending.get().is_some()
    }
}

/// FIFO queue drained by exactly one animation-frame callback no matter how
/// many items were enqueued before that frame fired.
pub struct FrameBatch<T> {
    inner: Rc<BatchInner<T>>,
}

struct BatchInner<T> {
    scheduler: Rc<dyn Scheduler>,
    queue: RefCell<Vec<T>>,
    frame_pending: Cell<bool>,
    flush: Box<dyn Fn(Vec<T>)>,
}

impl<T> Clone for FrameBatch<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: 'static> FrameBatch<T> {
    pub fn new(scheduler: Rc<dyn Scheduler>, flush: impl Fn(Vec<T>) + 'static) -> Self {
        Self {
            inner: Rc::new(BatchInner {
                scheduler,
                queue: RefCell::new(Vec::new()),
                frame_pending: Cell::new(false),
                flush: Box::new(flush),
            }),
        }
    }

    pub fn enqueue(&self, item: T) {
        self.inner.queue.borrow_mut().push(item);

        if self.inner.frame_pending.replace(true) {
            return;
        }

        let inner = Rc::clone(&self.inner);
        self.inner.scheduler.request_frame(Box::new(move || {
            let items = std::mem::take(&mut *inner.queue.borrow_mut());
            // Cleared before flushing so items enqueued by the flush itself
            // land in the next frame instead of being dropped.
            inner.frame_pending.set(false);
            (inner.flush)(items);
        }));
    }

    pub fn queued(&self) -> usize {
        self.inner.queue.borrow().len()
    }

    pub fn frame_pending(&self) -> bool {
        self.inner.frame_pending.get()
    }
}
