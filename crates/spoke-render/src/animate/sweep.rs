//! Two-sweep reveal.
//!
//! The first sweep (0° to 360°) opens the wedge clip while grid rings grow and spokes fade in as
//! the sweep line passes them. The second sweep (360° to 720°) opens an independent clip over the
//! data polygons and markers. The sweep line then fades out and everything snaps to its final
//! state.

use super::scheduler::Timeline;
use crate::scene::Scene;
use spoke_core::AnimationConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepPhase {
    Idle,
    SweepingWedges,
    SweepingData,
    Settled,
}

/// Ring growth eases out (quadratic); the sweeps themselves are linear.
fn ease_out_quad(t: f64) -> f64 {
    1.0 - (1.0 - t) * (1.0 - t)
}

#[derive(Debug)]
pub struct SweepAnimator {
    timing: AnimationConfig,
    timeline: Timeline<Scene>,
    phase: SweepPhase,
}

impl SweepAnimator {
    pub fn new(timing: AnimationConfig) -> Self {
        Self {
            timing,
            timeline: Timeline::new(),
            phase: SweepPhase::Idle,
        }
    }

    pub fn phase(&self) -> SweepPhase {
        self.phase
    }

    pub fn timeline(&self) -> &Timeline<Scene> {
        &self.timeline
    }

    /// Total length of the reveal in seconds.
    pub fn duration(&self) -> f64 {
        self.timeline.end_time()
    }

    /// Collapses `scene` to its initial reveal state and schedules the whole reveal.
    pub fn start(&mut self, scene: &mut Scene) {
        scene.prepare_reveal();
        self.timeline = Timeline::new();

        let sweep = self.timing.sweep.as_secs_f64();
        let ring = self.timing.ring.as_secs_f64();
        let stagger = self.timing.ring_stagger.as_secs_f64();
        let spoke_fade = self.timing.spoke_fade.as_secs_f64();
        let fade_out = self.timing.fade_out.as_secs_f64();

        for (i, r) in scene.rings.iter().enumerate() {
            let target = r.target_r;
            self.timeline.tween(i as f64 * stagger, ring, move |s: &mut Scene, p| {
                if let Some(r) = s.rings.get_mut(i) {
                    r.r = target * ease_out_quad(p);
                }
            });
        }

        self.timeline.tween(0.0, sweep, |s: &mut Scene, p| {
            if let Some(reveal) = &mut s.reveal {
                reveal.sweep.degrees = 360.0 * p;
                reveal.wedge_clip_degrees = 360.0 * p;
            }
        });

        // Spoke `k` lights up when the sweep line passes its slot.
        let slot_count = scene.spokes.len() * 2;
        for (i, spoke) in scene.spokes.iter().enumerate() {
            let degrees = spoke.slot as f64 * 360.0 / slot_count as f64;
            let delay = degrees / 360.0 * sweep;
            self.timeline.tween(delay, spoke_fade, move |s: &mut Scene, p| {
                if let Some(sp) = s.spokes.get_mut(i) {
                    sp.opacity = p;
                }
            });
        }

        self.timeline.tween(sweep, sweep, |s: &mut Scene, p| {
            if let Some(reveal) = &mut s.reveal {
                reveal.wedge_clip_degrees = 360.0;
                reveal.sweep.degrees = 360.0 + 360.0 * p;
                reveal.data_clip_degrees = 360.0 * p;
            }
        });

        self.timeline.tween(2.0 * sweep, fade_out, |s: &mut Scene, p| {
            if let Some(reveal) = &mut s.reveal {
                reveal.sweep.opacity = 1.0 - p;
            }
        });

        let settle_at = self.timeline.end_time();
        self.timeline.call_at(settle_at, Scene::settle_reveal);

        self.set_phase(SweepPhase::SweepingWedges);
        tracing::debug!(duration = settle_at, "scheduled sweep reveal");
    }

    /// Advances the reveal by `dt` seconds. Returns `true` once settled.
    pub fn advance(&mut self, scene: &mut Scene, dt: f64) -> bool {
        if self.phase == SweepPhase::Idle || self.phase == SweepPhase::Settled {
            return self.phase == SweepPhase::Settled;
        }
        let done = self.timeline.advance(scene, dt);
        let next = if done {
            SweepPhase::Settled
        } else if self.timeline.elapsed() < self.timing.sweep.as_secs_f64() {
            SweepPhase::SweepingWedges
        } else {
            SweepPhase::SweepingData
        };
        self.set_phase(next);
        done
    }

    /// Runs the rest of the reveal at once.
    pub fn finish(&mut self, scene: &mut Scene) {
        if self.phase == SweepPhase::Idle || self.phase == SweepPhase::Settled {
            return;
        }
        self.timeline.run_to_end(scene);
        self.set_phase(SweepPhase::Settled);
    }

    /// Drops the in-flight reveal; the scene keeps whatever state it reached.
    pub fn cancel(&mut self) {
        self.timeline.cancel();
        self.phase = SweepPhase::Idle;
    }

    fn set_phase(&mut self, next: SweepPhase) {
        if next != self.phase {
            tracing::trace!(from = ?self.phase, to = ?next, "sweep phase");
            self.phase = next;
        }
    }
}
