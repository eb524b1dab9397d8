use std::{
    sync::atomic::{AtomicBool, AtomicU8, Ordering},
    time::{Duration, Instant},
};

use parking_lot::{Condvar, Mutex};

/// Why the engine left `Running`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The input source delivered a quit event.
    Quit,
    /// An activity failed or panicked; the others wind down so it can be joined.
    Fault,
}

const REASON_NONE: u8 = 0;
const REASON_QUIT: u8 = 1;
const REASON_FAULT: u8 = 2;

/// Cooperative shutdown signal shared by the render loop and both workers.
///
/// `running` is published with release stores and observed with acquire loads.
/// The mutex/condvar pair only exists so timed waits wake up on shutdown.
pub struct ShutdownSignal {
    running: AtomicBool,
    reason: AtomicU8,
    lock: Mutex<()>,
    wake: Condvar,
}

impl ShutdownSignal {
    #[inline]
    pub fn new() -> Self {
        Self {
            running: AtomicBool::new(false),
            reason: AtomicU8::new(REASON_NONE),
            lock: Mutex::new(()),
            wake: Condvar::new(),
        }
    }

    /// Flip to running. Called once per run, before any worker starts.
    pub(crate) fn arm(&self) {
        let _guard = self.lock.lock();
        self.reason.store(REASON_NONE, Ordering::Relaxed);
        self.running.store(true, Ordering::Release);
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Stop the run. Returns `true` if this call performed the transition.
    pub fn request(&self, reason: StopReason) -> bool {
        let _guard = self.lock.lock();
        if !self.running.load(Ordering::Acquire) {
            return false;
        }

        let code = match reason {
            StopReason::Quit => REASON_QUIT,
            StopReason::Fault => REASON_FAULT,
        };
        self.reason.store(code, Ordering::Relaxed);
        self.running.store(false, Ordering::Release);
        self.wake.notify_all();
        true
    }

    pub fn reason(&self) -> Option<StopReason> {
        if self.is_running() {
            return None;
        }
        match self.reason.load(Ordering::Relaxed) {
            REASON_QUIT => Some(StopReason::Quit),
            REASON_FAULT => Some(StopReason::Fault),
            _ => None,
        }
    }

    /// Sleep for `timeout` unless the signal stops first.
    ///
    /// Returns `true` when still running after the wait.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut guard = self.lock.lock();
        while self.is_running() {
            if self.wake.wait_until(&mut guard, deadline).timed_out() {
                return self.is_running();
            }
        }
        false
    }

    /// Guard that trips the signal with [`StopReason::Fault`] if dropped during a panic.
    #[inline]
    pub(crate) fn trip_on_unwind(&self) -> UnwindTrip<'_> {
        UnwindTrip { signal: self }
    }
}

impl Default for ShutdownSignal {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) struct UnwindTrip<'a> {
    signal: &'a ShutdownSignal,
}

impl Drop for UnwindTrip<'_> {
    fn drop(&mut self) {
        if std::thread::panicking() && self.signal.request(StopReason::Fault) {
            log::error!("activity panicked, stopping the engine");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn only_the_first_request_wins() {
        let s = ShutdownSignal::new();
        assert!(!s.is_running());
        assert!(!s.request(StopReason::Quit));

        s.arm();
        assert!(s.is_running());
        assert_eq!(s.reason(), None);

        assert!(s.request(StopReason::Quit));
        assert!(!s.request(StopReason::Fault));
        assert_eq!(s.reason(), Some(StopReason::Quit));
    }

    #[test]
    fn wait_times_out_while_running() {
        let s = ShutdownSignal::new();
        s.arm();
        let t0 = Instant::now();
        assert!(s.wait_timeout(Duration::from_millis(20)));
        assert!(t0.elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn request_wakes_a_waiter_early() {
        let s = ShutdownSignal::new();
        s.arm();
        let t0 = Instant::now();
        thread::scope(|scope| {
            scope.spawn(|| {
                thread::sleep(Duration::from_millis(20));
                s.request(StopReason::Quit);
            });
            assert!(!s.wait_timeout(Duration::from_secs(10)));
        });
        assert!(t0.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn panicking_activity_trips_the_signal() {
        let s = ShutdownSignal::new();
        s.arm();
        let joined = thread::scope(|scope| {
            scope
                .spawn(|| {
                    let _trip = s.trip_on_unwind();
                    panic!("worker failure");
                })
                .join()
        });
        assert!(joined.is_err());
        assert_eq!(s.reason(), Some(StopReason::Fault));
    }

    #[test]
    fn rearming_clears_the_previous_reason() {
        let s = ShutdownSignal::new();
        s.arm();
        s.request(StopReason::Fault);
        s.arm();
        assert!(s.is_running());
        assert_eq!(s.reason(), None);
    }
}
