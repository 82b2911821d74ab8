#![forbid(unsafe_code)]

//! Headless radar chart engine.
//!
//! The pipeline is explicitly staged:
//!
//! 1. [`layout::compute_layout`] turns axes, datasets and a resolved config into absolute geometry.
//! 2. [`scene::Scene::build`] paints that geometry into a retained scene (back-to-front layers).
//! 3. [`mount::MountPoint`] owns the current scene, the tooltip overlay and the reveal timeline,
//!    and replaces all three on every render.

pub mod animate;
pub mod geom;
pub mod interaction;
pub mod layout;
pub mod model;
pub mod mount;
pub mod scene;
pub mod text;

use crate::text::{DeterministicTextMeasurer, TextMeasurer};
use std::sync::Arc;

pub use layout::compute_layout;
pub use model::RadarLayout;
pub use mount::{MountPoint, RenderHandle};
pub use scene::Scene;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] spoke_core::Error),
    #[error("layout JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Clone)]
pub struct LayoutOptions {
    pub text_measurer: Arc<dyn TextMeasurer + Send + Sync>,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            text_measurer: Arc::new(DeterministicTextMeasurer::default()),
        }
    }
}

impl std::fmt::Debug for LayoutOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayoutOptions").finish_non_exhaustive()
    }
}
