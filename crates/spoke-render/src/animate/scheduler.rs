//! Cooperative tween scheduler.
//!
//! Tweens are scheduled at absolute times on a [`Timeline`]; the host drives time forward with
//! [`Timeline::advance`] from its frame loop. Every active tween receives its linear progress in
//! `[0, 1]`, and its completion callback runs once, the first time progress reaches 1.
//!
//! Callbacks always run in start order (ties broken by scheduling order), so a single large
//! `advance` past the end of the timeline leaves the state exactly as a sequence of small steps
//! would.

type ProgressFn<S> = Box<dyn FnMut(&mut S, f64)>;
type CompleteFn<S> = Box<dyn FnOnce(&mut S)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TweenId(usize);

struct Tween<S> {
    id: TweenId,
    start: f64,
    duration: f64,
    on_progress: ProgressFn<S>,
    on_complete: Option<CompleteFn<S>>,
}

impl<S> Tween<S> {
    fn end(&self) -> f64 {
        self.start + self.duration
    }

    fn progress_at(&self, now: f64) -> f64 {
        if self.duration <= 0.0 {
            1.0
        } else {
            ((now - self.start) / self.duration).clamp(0.0, 1.0)
        }
    }
}

pub struct Timeline<S> {
    now: f64,
    next_id: usize,
    /// Pending tweens, kept sorted by `(start, id)`.
    pending: Vec<Tween<S>>,
    end: f64,
    cancelled: bool,
}

impl<S> Default for Timeline<S> {
    fn default() -> Self {
        Self {
            now: 0.0,
            next_id: 0,
            pending: Vec::new(),
            end: 0.0,
            cancelled: false,
        }
    }
}

impl<S> std::fmt::Debug for Timeline<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Timeline")
            .field("now", &self.now)
            .field("pending", &self.pending.len())
            .field("end", &self.end)
            .field("cancelled", &self.cancelled)
            .finish()
    }
}

impl<S> Timeline<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules a tween starting at `at` seconds that lasts `duration` seconds.
    ///
    /// Negative starts and durations are treated as zero.
    pub fn schedule(
        &mut self,
        at: f64,
        duration: f64,
        on_progress: impl FnMut(&mut S, f64) + 'static,
        on_complete: impl FnOnce(&mut S) + 'static,
    ) -> TweenId {
        let id = TweenId(self.next_id);
        self.next_id += 1;
        let tween = Tween {
            id,
            start: at.max(0.0),
            duration: duration.max(0.0),
            on_progress: Box::new(on_progress),
            on_complete: Some(Box::new(on_complete)),
        };
        self.end = self.end.max(tween.end());
        let pos = self
            .pending
            .partition_point(|t| (t.start, t.id) <= (tween.start, tween.id));
        self.pending.insert(pos, tween);
        id
    }

    /// Convenience for tweens that only report progress.
    pub fn tween(
        &mut self,
        at: f64,
        duration: f64,
        on_progress: impl FnMut(&mut S, f64) + 'static,
    ) -> TweenId {
        self.schedule(at, duration, on_progress, |_| {})
    }

    /// Schedules a zero-length callback at `at`.
    pub fn call_at(&mut self, at: f64, f: impl FnOnce(&mut S) + 'static) -> TweenId {
        self.schedule(at, 0.0, |_, _| {}, f)
    }

    /// Moves time forward by `dt` seconds and runs every tween active at the new time.
    ///
    /// Returns `true` once nothing is left pending.
    pub fn advance(&mut self, state: &mut S, dt: f64) -> bool {
        if self.cancelled {
            return true;
        }
        if dt.is_finite() && dt > 0.0 {
            self.now += dt;
        }
        let now = self.now;

        let mut i = 0;
        while i < self.pending.len() {
            if self.pending[i].start > now {
                break;
            }
            let tween = &mut self.pending[i];
            let progress = tween.progress_at(now);
            (tween.on_progress)(state, progress);
            if progress >= 1.0 {
                let mut done = self.pending.remove(i);
                if let Some(on_complete) = done.on_complete.take() {
                    on_complete(state);
                }
            } else {
                i += 1;
            }
        }
        self.pending.is_empty()
    }

    /// Jumps to the end of the timeline, running everything still pending.
    pub fn run_to_end(&mut self, state: &mut S) -> bool {
        if self.cancelled {
            return true;
        }
        self.now = self.now.max(self.end);
        self.advance(state, 0.0)
    }

    /// Drops every pending tween without running its callbacks.
    pub fn cancel(&mut self) {
        self.pending.clear();
        self.cancelled = true;
    }

    pub fn elapsed(&self) -> f64 {
        self.now
    }

    /// Time at which the last scheduled tween ends.
    pub fn end_time(&self) -> f64 {
        self.end
    }

    pub fn remaining(&self) -> f64 {
        (self.end - self.now).max(0.0)
    }

    pub fn is_finished(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}
