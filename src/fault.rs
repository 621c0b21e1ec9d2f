//! Fault injection
//!
//! The engine consults a [`FaultPolicy`] before materializing every page. A
//! policy that reports a fault turns that load into a retryable
//! [`LoadResult::Error`](crate::result::LoadResult) without touching any
//! keys or counts.
//!
//! Policies are injected per factory, never shared through globals, so
//! tests running in parallel cannot trip each other's faults.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Decides whether the next load should fail
pub trait FaultPolicy: Send + Sync {
    /// Consume a pending fault, returning `true` if the load must fail
    fn take_fault(&self) -> bool;
}

/// Never injects a fault
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFaults;

impl FaultPolicy for NoFaults {
    fn take_fault(&self) -> bool {
        false
    }
}

/// A one-shot fault switch
///
/// Each [`arm`](Self::arm) fails exactly one subsequent load; the load
/// after it proceeds normally. Arming twice before a load still fails only
/// one load.
#[derive(Debug, Default)]
pub struct OneShotFault {
    armed: AtomicBool,
}

impl OneShotFault {
    /// Create a disarmed switch
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a switch that fails the first load
    pub fn armed() -> Self {
        Self {
            armed: AtomicBool::new(true),
        }
    }

    /// Arm the switch so the next load fails
    pub fn arm(&self) {
        self.armed.store(true, Ordering::SeqCst);
    }

    /// Disarm without consuming
    pub fn disarm(&self) {
        self.armed.store(false, Ordering::SeqCst);
    }

    /// Check whether a fault is pending
    pub fn is_armed(&self) -> bool {
        self.armed.load(Ordering::SeqCst)
    }
}

impl FaultPolicy for OneShotFault {
    fn take_fault(&self) -> bool {
        self.armed
            .compare_exchange(true, false, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }
}

/// Fails every `n`th load
///
/// Used by the simulator to exercise retry paths deterministically.
#[derive(Debug)]
pub struct EveryNth {
    every: usize,
    count: AtomicUsize,
}

impl EveryNth {
    /// Fail loads `n`, `2n`, `3n`, ...; `n == 0` never fails
    pub fn new(every: usize) -> Self {
        Self {
            every,
            count: AtomicUsize::new(0),
        }
    }
}

impl FaultPolicy for EveryNth {
    fn take_fault(&self) -> bool {
        if self.every == 0 {
            return false;
        }
        let seen = self.count.fetch_add(1, Ordering::SeqCst) + 1;
        seen % self.every == 0
    }
}
