//! Pixels renderer backend.
//!
//! Holds a retained [`Scene`] of stroke and rect items plus hit regions,
//! and rasterizes it into the RGBA8 buffer the `pixels` crate presents.

mod raster;
mod scene;

pub use raster::draw_scene;
pub use scene::{Scene, SceneHitTarget};

use stroke_render_common::Renderer;

pub struct PixelsRenderer {
    scene: Scene,
}

impl PixelsRenderer {
    pub fn new() -> Self {
        Self {
            scene: Scene::new(),
        }
    }
}

impl Default for PixelsRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for PixelsRenderer {
    type Scene = Scene;
    type Error = ();

    fn scene(&self) -> &Self::Scene {
        &self.scene
    }

    fn scene_mut(&mut self) -> &mut Self::Scene {
        &mut self.scene
    }
}
