use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::sleep;
use std::time::Duration;

#[derive(Clone)]
pub struct StopHandle {
    flag: Arc<AtomicBool>,
}

impl StopHandle {
    pub fn stop(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Fixed-interval runner for the poll loop. The tick closure runs
/// immediately, then once per interval until a `StopHandle` fires; the
/// wait is sliced so a stop request interrupts promptly. Tests stop from
/// inside the tick closure to drive an exact number of passes.
pub struct Scheduler {
    interval: Duration,
    flag: Arc<AtomicBool>,
}

impl Scheduler {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            flag: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn handle(&self) -> StopHandle {
        StopHandle {
            flag: Arc::clone(&self.flag),
        }
    }

    pub fn run<F: FnMut()>(&self, mut tick: F) {
        while !self.stopped() {
            tick();
            if self.stopped() {
                break;
            }
            self.wait();
        }
    }

    fn stopped(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    fn wait(&self) {
        const SLICE: Duration = Duration::from_millis(250);
        let mut remaining = self.interval;
        while !self.stopped() && !remaining.is_zero() {
            let step = remaining.min(SLICE);
            sleep(step);
            remaining -= step;
        }
    }
}
