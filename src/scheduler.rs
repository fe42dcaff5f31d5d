//! Cancellable timers for delayed session transitions.

use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::game::Timer;

#[derive(Debug)]
struct Fired {
    timer: Timer,
    id: u64,
}

/// At most one armed instance per [`Timer`]. Re-arming replaces the previous
/// instance; a firing whose instance was cancelled or replaced is discarded.
pub struct Scheduler {
    tx: mpsc::UnboundedSender<Fired>,
    rx: mpsc::UnboundedReceiver<Fired>,
    armed: HashMap<Timer, (u64, JoinHandle<()>)>,
    next_id: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            tx,
            rx,
            armed: HashMap::new(),
            next_id: 0,
        }
    }

    /// Fire `timer` after `delay`. Must be called inside a tokio runtime.
    pub fn arm(&mut self, timer: Timer, delay: Duration) {
        self.cancel(timer);
        let id = self.next_id;
        self.next_id += 1;
        let tx = self.tx.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(Fired { timer, id });
        });
        log::trace!("[Scheduler] Armed {:?} for {:?}", timer, delay);
        self.armed.insert(timer, (id, handle));
    }

    pub fn cancel(&mut self, timer: Timer) {
        if let Some((_, handle)) = self.armed.remove(&timer) {
            log::trace!("[Scheduler] Cancelled {:?}", timer);
            handle.abort();
        }
    }

    pub fn cancel_all(&mut self) {
        for (_, (_, handle)) in self.armed.drain() {
            handle.abort();
        }
    }

    pub fn is_armed(&self, timer: Timer) -> bool {
        self.armed.contains_key(&timer)
    }

    pub fn has_armed(&self) -> bool {
        !self.armed.is_empty()
    }

    /// Wait for the next live timer. Cancel safe.
    pub async fn next(&mut self) -> Timer {
        loop {
            let Some(fired) = self.rx.recv().await else {
                // The scheduler holds a sender, so the channel never closes.
                return std::future::pending().await;
            };
            match self.armed.get(&fired.timer) {
                Some((id, _)) if *id == fired.id => {
                    self.armed.remove(&fired.timer);
                    return fired.timer;
                }
                _ => log::trace!("[Scheduler] Discarded stale {:?}", fired.timer),
            }
        }
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn fires_after_delay() {
        let mut scheduler = Scheduler::new();
        scheduler.arm(Timer::LockIn, Duration::from_millis(800));
        assert!(scheduler.is_armed(Timer::LockIn));
        assert_eq!(scheduler.next().await, Timer::LockIn);
        assert!(!scheduler.has_armed());
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_timer_never_fires() {
        let mut scheduler = Scheduler::new();
        scheduler.arm(Timer::CpuTurn, Duration::from_millis(10));
        scheduler.arm(Timer::LockIn, Duration::from_millis(50));
        scheduler.cancel(Timer::CpuTurn);
        assert_eq!(scheduler.next().await, Timer::LockIn);
    }

    #[tokio::test(start_paused = true)]
    async fn stale_firing_is_discarded_after_rearm() {
        let mut scheduler = Scheduler::new();
        scheduler.arm(Timer::CpuTurn, Duration::ZERO);
        // Let the first instance fire into the channel before replacing it.
        tokio::time::sleep(Duration::from_millis(1)).await;
        scheduler.arm(Timer::CpuTurn, Duration::from_millis(100));
        let start = tokio::time::Instant::now();
        assert_eq!(scheduler.next().await, Timer::CpuTurn);
        assert!(start.elapsed() >= Duration::from_millis(99));
    }
}
