//! Cross-thread control primitives for the background search.
//!
//! A running search is steered through [`SearchSignals`], a set of latches
//! shared between the controlling thread, the search worker and any timer.
//! Every flag only ever goes from `false` to `true` during one search.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    mpsc::{self, Receiver, RecvTimeoutError, Sender, SyncSender},
    Arc,
};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::warn;

/// Shared stop/timing state of one search.
#[derive(Debug)]
pub struct SearchSignals {
    abort: AtomicBool,
    timer_fired: AtomicBool,
    timer_attached: AtomicBool,
    has_result: AtomicBool,
    early_stop_ready: AtomicBool,
    time_managed: bool,
}

impl SearchSignals {
    /// `time_managed` searches let a fired timer wait for the first completed
    /// iteration instead of aborting immediately.
    pub fn new(time_managed: bool) -> Arc<Self> {
        Arc::new(Self {
            abort: AtomicBool::new(false),
            timer_fired: AtomicBool::new(false),
            timer_attached: AtomicBool::new(false),
            has_result: AtomicBool::new(false),
            early_stop_ready: AtomicBool::new(false),
            time_managed,
        })
    }

    #[inline]
    pub fn abort(&self) {
        self.abort.store(true, Ordering::SeqCst);
    }

    #[inline]
    pub fn is_aborted(&self) -> bool {
        self.abort.load(Ordering::Relaxed)
    }

    /// Timer expiry. Aborts now unless a time-managed search has no result yet;
    /// the worker then stops after its first iteration.
    pub fn fire_timer(&self) {
        self.timer_fired.store(true, Ordering::SeqCst);
        if !self.time_managed || self.has_result.load(Ordering::SeqCst) {
            self.abort();
        }
    }

    #[inline]
    pub fn timer_fired(&self) -> bool {
        self.timer_fired.load(Ordering::SeqCst)
    }

    #[inline]
    pub fn attach_timer(&self) {
        self.timer_attached.store(true, Ordering::SeqCst);
    }

    #[inline]
    pub fn timer_attached(&self) -> bool {
        self.timer_attached.load(Ordering::SeqCst)
    }

    /// Called by the worker after each completed iteration.
    pub fn publish_result(&self, early_stop_ready: bool) {
        if early_stop_ready {
            self.early_stop_ready.store(true, Ordering::SeqCst);
        }
        self.has_result.store(true, Ordering::SeqCst);
    }

    #[inline]
    pub fn has_result(&self) -> bool {
        self.has_result.load(Ordering::SeqCst)
    }

    /// A single root move or a fully searched mate: stopping now loses nothing.
    #[inline]
    pub fn early_stop_ready(&self) -> bool {
        self.early_stop_ready.load(Ordering::SeqCst)
    }
}

/// One-shot timer thread that calls [`SearchSignals::fire_timer`] unless it
/// is cancelled first. Dropping the timer cancels and joins it.
#[derive(Debug)]
pub struct SearchTimer {
    cancel: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl SearchTimer {
    pub fn start(duration: Duration, signals: Arc<SearchSignals>) -> Self {
        let (cancel, cancelled) = mpsc::channel::<()>();
        let timer_signals = Arc::clone(&signals);

        let spawned = thread::Builder::new()
            .name("search-timer".to_owned())
            .spawn(move || {
                if let Err(RecvTimeoutError::Timeout) = cancelled.recv_timeout(duration) {
                    timer_signals.fire_timer();
                }
            });

        match spawned {
            Ok(handle) => Self {
                cancel: Some(cancel),
                handle: Some(handle),
            },
            Err(err) => {
                warn!("could not spawn search timer ({err}); treating the budget as spent");
                signals.fire_timer();
                Self {
                    cancel: None,
                    handle: None,
                }
            }
        }
    }

    pub fn cancel(&mut self) {
        // Dropping the sender wakes the timer with a disconnect.
        drop(self.cancel.take());
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for SearchTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Worker side of the start handshake.
pub struct StartSignal(SyncSender<()>);

impl StartSignal {
    /// Release the thread blocked in [`StartGate::wait`].
    pub fn release(self) {
        let _ = self.0.send(());
    }
}

/// Controller side of the start handshake.
pub struct StartGate(Receiver<()>);

impl StartGate {
    /// Block until the worker has released the gate or exited.
    pub fn wait(self) -> bool {
        self.0.recv().is_ok()
    }
}

pub fn start_handshake() -> (StartSignal, StartGate) {
    let (sender, receiver) = mpsc::sync_channel(1);
    (StartSignal(sender), StartGate(receiver))
}
