use std::time::{Duration, Instant};

use log::debug;

/// A scoped measurement hook around the phases of a frame build.
///
/// Scopes nest: every `end` closes the most recent unmatched `begin`.
pub trait FrameTimer {
    fn begin(&mut self, label: &'static str);

    /// Closes the innermost open scope and returns its duration, or `None` if no scope is
    /// open.
    fn end(&mut self) -> Option<Duration>;
}

/// Runs `f` inside a `label` scope of `timer`.
pub fn timed<T, R, F>(timer: &mut T, label: &'static str, f: F) -> R
where
    T: FrameTimer + ?Sized,
    F: FnOnce() -> R,
{
    timer.begin(label);
    let result = f();
    timer.end();
    result
}

/// Discards every measurement.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTimer;

impl FrameTimer for NoopTimer {
    fn begin(&mut self, _label: &'static str) {}

    fn end(&mut self) -> Option<Duration> {
        None
    }
}

/// Logs `"<label> <ms> ms"` at debug level when a scope closes.
#[derive(Debug, Default)]
pub struct LogTimer {
    stack: Vec<(&'static str, Instant)>,
}

impl LogTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of scopes currently open.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }
}

impl FrameTimer for LogTimer {
    fn begin(&mut self, label: &'static str) {
        self.stack.push((label, Instant::now()));
    }

    fn end(&mut self) -> Option<Duration> {
        let (label, start) = self.stack.pop()?;
        let elapsed = start.elapsed();
        debug!("{} {:.3} ms", label, elapsed.as_secs_f64() * 1000.0);
        Some(elapsed)
    }
}
