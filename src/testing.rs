use std::{
    cell::{Cell, RefCell},
    collections::{HashMap, VecDeque},
    rc::Rc,
    time::Duration,
};

use futures_util::future::{self, FutureExt, LocalBoxFuture};

use crate::{
    contact::{ContactFields, FormRelay, RelayError},
    device::{DeviceProbe, DeviceSignals},
    storage::{PreferenceStore, StorageError},
    timing::{Scheduler, Task, TimerHandle},
    RandomSource,
};

struct PendingTimer {
    due: Duration,
    handle: TimerHandle,
    task: Task,
}

// Timers fire only inside `advance`, frames only inside `run_frame`.
#[derive(Default)]
pub struct ManualScheduler {
    now: Cell<Duration>,
    next_id: Cell<u64>,
    timers: RefCell<Vec<PendingTimer>>,
    frames: RefCell<Vec<Task>>,
}

impl ManualScheduler {
    pub fn now(&self) -> Duration {
        self.now.get()
    }

    pub fn advance(&self, by: Duration) {
        let target = self.now.get() + by;

        loop {
            let next = {
                let mut timers = self.timers.borrow_mut();
                let earliest = timers
                    .iter()
                    .enumerate()
                    .filter(|(_, timer)| timer.due <= target)
                    .min_by_key(|(_, timer)| (timer.due, timer.handle.0))
                    .map(|(index, _)| index);
                earliest.map(|index| timers.remove(index))
            };

            let Some(timer) = next else {
                break;
            };
            self.now.set(timer.due);
            (timer.task)();
        }

        self.now.set(target);
    }

    pub fn run_frame(&self) {
        let frames = std::mem::take(&mut *self.frames.borrow_mut());
        for task in frames {
            task();
        }
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.borrow().len()
    }

    pub fn pending_frames(&self) -> usize {
        self.frames.borrow().len()
    }
}

impl Scheduler for ManualScheduler {
    fn set_timeout(&self, delay: Duration, task: Task) -> TimerHandle {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        let handle = TimerHandle(id);
        self.timers.borrow_mut().push(PendingTimer {
            due: self.now.get() + delay,
            handle,
            task,
        });
        handle
    }

    fn clear_timeout(&self, handle: TimerHandle) {
        self.timers.borrow_mut().retain(|timer| timer.handle != handle);
    }

    fn request_frame(&self, task: Task) {
        self.frames.borrow_mut().push(task);
    }
}

#[derive(Default)]
pub struct MemoryStore {
    values: RefCell<HashMap<String, String>>,
    pub fail_writes: Cell<bool>,
}

impl MemoryStore {
    pub fn value(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.value(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.fail_writes.get() {
            return Err(StorageError::Unavailable);
        }
        self.values.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

pub struct SequenceRandom {
    samples: Vec<f64>,
    cursor: Cell<usize>,
}

impl SequenceRandom {
    pub fn new(samples: Vec<f64>) -> Self {
        Self {
            samples,
            cursor: Cell::new(0),
        }
    }
}

impl RandomSource for SequenceRandom {
    fn next_unit(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let index = self.cursor.get();
        self.cursor.set(index + 1);
        self.samples[index % self.samples.len()]
    }
}

pub struct FixedDevice(pub DeviceSignals);

impl FixedDevice {
    pub fn desktop() -> Self {
        Self(DeviceSignals {
            touch_capable: false,
            viewport_width: 1440.0,
            user_agent: "Mozilla/5.0 (X11; Linux x86_64)".to_string(),
            logical_cores: Some(8.0),
            device_memory_gib: Some(8.0),
        })
    }

    pub fn phone() -> Self {
        Self(DeviceSignals {
            touch_capable: true,
            viewport_width: 390.0,
            user_agent: "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X)".to_string(),
            logical_cores: Some(6.0),
            device_memory_gib: None,
        })
    }
}

impl DeviceProbe for FixedDevice {
    fn signals(&self) -> DeviceSignals {
        self.0.clone()
    }
}

#[derive(Default)]
pub struct ScriptedRelay {
    responses: RefCell<VecDeque<Result<u16, RelayError>>>,
    pub requests: RefCell<Vec<(String, ContactFields)>>,
}

impl ScriptedRelay {
    pub fn answering(responses: Vec<Result<u16, RelayError>>) -> Rc<Self> {
        Rc::new(Self {
            responses: RefCell::new(responses.into()),
            requests: RefCell::new(Vec::new()),
        })
    }

    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }
}

impl FormRelay for ScriptedRelay {
    fn post<'a>(&'a self, endpoint: &'a str, fields: &'a ContactFields) -> LocalBoxFuture<'a, Result<u16, RelayError>> {
        self.requests.borrow_mut().push((endpoint.to_string(), fields.clone()));
        let response = self
            .responses
            .borrow_mut()
            .pop_front()
            .unwrap_or(Err(RelayError::Transport("no scripted response".to_string())));
        future::ready(response).boxed_local()
    }
}
