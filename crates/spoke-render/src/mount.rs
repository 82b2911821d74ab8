//! The mount point: the host-facing surface that owns one chart at a time.
//!
//! Every render cancels and replaces the previous scene, tooltip and reveal timeline, and bumps
//! a generation counter. Handles from earlier renders stop having any effect.

use crate::animate::{SweepAnimator, SweepPhase};
use crate::geom::Point;
use crate::interaction::{HitTarget, Tooltip, TooltipContent, apply_emphasis, hit_test};
use crate::model::RadarLayout;
use crate::scene::{Scene, escape_xml};
use spoke_core::RenderConfig;

/// Identifies one render of a [`MountPoint`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderHandle {
    generation: u64,
}

impl RenderHandle {
    pub fn generation(self) -> u64 {
        self.generation
    }
}

#[derive(Debug)]
struct Mounted {
    scene: Scene,
    tooltip: Option<Tooltip>,
    animator: Option<SweepAnimator>,
    hovered: Option<HitTarget>,
    highlight_opacity: f64,
    dim_opacity: f64,
}

#[derive(Debug)]
pub struct MountPoint {
    id: String,
    generation: u64,
    current: Option<Mounted>,
}

impl MountPoint {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            generation: 0,
            current: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Draws `layout` fully revealed.
    pub fn render(&mut self, layout: &RadarLayout, config: &RenderConfig) -> RenderHandle {
        self.mount(layout, config, false)
    }

    /// Draws `layout` collapsed and starts the sweep reveal; drive it with [`Self::advance`].
    pub fn render_animated(&mut self, layout: &RadarLayout, config: &RenderConfig) -> RenderHandle {
        self.mount(layout, config, true)
    }

    fn mount(&mut self, layout: &RadarLayout, config: &RenderConfig, animated: bool) -> RenderHandle {
        self.clear();
        self.generation += 1;

        let mut scene = Scene::build(layout, config).with_id(format!("{}-svg", self.id));
        let animator = animated.then(|| {
            let mut animator = SweepAnimator::new(config.animation);
            animator.start(&mut scene);
            animator
        });
        self.current = Some(Mounted {
            scene,
            tooltip: config.tooltip.then(Tooltip::default),
            animator,
            hovered: None,
            highlight_opacity: config.highlight_opacity,
            dim_opacity: config.dim_opacity,
        });
        tracing::debug!(mount = %self.id, generation = self.generation, animated, "rendered chart");
        RenderHandle {
            generation: self.generation,
        }
    }

    /// Removes the current chart, its tooltip and any in-flight reveal.
    pub fn clear(&mut self) {
        if let Some(mut old) = self.current.take() {
            if let Some(animator) = &mut old.animator {
                animator.cancel();
            }
            tracing::trace!(mount = %self.id, generation = self.generation, "cleared chart");
        }
    }

    pub fn is_current(&self, handle: RenderHandle) -> bool {
        self.current.is_some() && handle.generation == self.generation
    }

    /// Advances the reveal started by `handle`. Stale handles are ignored.
    ///
    /// Returns `true` when the chart is settled (static renders always are).
    pub fn advance(&mut self, handle: RenderHandle, dt: f64) -> bool {
        if !self.is_current(handle) {
            tracing::trace!(stale = handle.generation, current = self.generation, "ignoring stale advance");
            return false;
        }
        let Some(mounted) = &mut self.current else {
            return false;
        };
        match &mut mounted.animator {
            Some(animator) => animator.advance(&mut mounted.scene, dt),
            None => true,
        }
    }

    /// Runs the current reveal to completion.
    pub fn finish(&mut self, handle: RenderHandle) {
        if !self.is_current(handle) {
            return;
        }
        if let Some(Mounted {
            scene,
            animator: Some(animator),
            ..
        }) = &mut self.current
        {
            animator.finish(scene);
        }
    }

    pub fn phase(&self) -> Option<SweepPhase> {
        let mounted = self.current.as_ref()?;
        Some(
            mounted
                .animator
                .as_ref()
                .map_or(SweepPhase::Settled, SweepAnimator::phase),
        )
    }

    /// Pointer moved to `canvas_point` (canvas pixels). Updates emphasis and the tooltip and
    /// returns the hit target under the pointer, if any.
    pub fn pointer_move(&mut self, canvas_point: Point) -> Option<HitTarget> {
        let mounted = self.current.as_mut()?;
        let tooltip = mounted.tooltip.as_mut()?;
        let hit = hit_test(&mounted.scene, canvas_point);
        match hit {
            Some(target) => {
                if mounted.hovered != Some(target) {
                    apply_emphasis(
                        &mut mounted.scene,
                        Some(target.series),
                        mounted.highlight_opacity,
                        mounted.dim_opacity,
                    );
                }
                if let Some(content) = TooltipContent::for_target(&mounted.scene, target) {
                    tooltip.show(content, canvas_point);
                }
            }
            None => {
                if mounted.hovered.is_some() {
                    apply_emphasis(&mut mounted.scene, None, 0.0, 0.0);
                    tooltip.hide();
                }
            }
        }
        mounted.hovered = hit;
        hit
    }

    /// Pointer left the chart: restores fills and hides the tooltip.
    pub fn pointer_out(&mut self) {
        let Some(mounted) = self.current.as_mut() else {
            return;
        };
        apply_emphasis(&mut mounted.scene, None, 0.0, 0.0);
        if let Some(tooltip) = &mut mounted.tooltip {
            tooltip.hide();
        }
        mounted.hovered = None;
    }

    pub fn scene(&self) -> Option<&Scene> {
        self.current.as_ref().map(|m| &m.scene)
    }

    pub fn tooltip(&self) -> Option<&Tooltip> {
        self.current.as_ref().and_then(|m| m.tooltip.as_ref())
    }

    pub fn svg(&self) -> Option<String> {
        self.scene().map(Scene::to_svg)
    }

    /// The mount point's contents: the SVG plus the tooltip overlay, wrapped in a container
    /// element.
    pub fn to_markup(&self) -> String {
        let mut out = format!(r#"<div id="{}" style="position:relative">"#, escape_xml(&self.id));
        if let Some(mounted) = &self.current {
            out.push_str(&mounted.scene.to_svg());
            if let Some(tooltip) = &mounted.tooltip {
                out.push_str(&tooltip.to_markup());
            }
        }
        out.push_str("</div>");
        out
    }
}
