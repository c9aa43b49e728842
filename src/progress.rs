//! Render progress shared between a running pass and its observers.

use std::sync::atomic::{AtomicU32, Ordering};

/// Receives completion fractions from the scheduler.
pub trait ProgressSink: Sync {
    fn report(&self, fraction: f32);
}

/// Lock-free progress value in [0, 1].
#[derive(Debug, Default)]
pub struct Progress(AtomicU32);

impl Progress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> f32 {
        f32::from_bits(self.0.load(Ordering::Acquire))
    }

    pub fn reset(&self) {
        self.set(0.0);
    }

    pub fn finish(&self) {
        self.set(1.0);
    }

    fn set(&self, value: f32) {
        self.0.store(value.to_bits(), Ordering::Release);
    }

    /// Resets to 0 now and forces 1 when the returned guard drops.
    pub fn begin_pass(&self) -> PassGuard<'_> {
        self.reset();
        PassGuard(self)
    }
}

impl ProgressSink for Progress {
    fn report(&self, fraction: f32) {
        self.set(fraction.clamp(0.0, 1.0));
    }
}

/// Marks the pass complete on every exit path.
pub struct PassGuard<'a>(&'a Progress);

impl Drop for PassGuard<'_> {
    fn drop(&mut self) {
        self.0.finish();
    }
}
