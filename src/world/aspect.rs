//! Aspect-preserving windows.
//!
//! Every accepted window has the viewport's width/height ratio, so pixels stay
//! square, and its center never leaves the world extent.

use crate::affine::AffineModel;
use crate::defaults::ExtentProvider;
use crate::log::{debug, warn};
use crate::subset::Subset;
use crate::tolerance::Tolerance;
use crate::types::Viewport;

use super::World;
use super::policy::{WindowConstraint, WindowPolicy};

/// Window policy that matches the window aspect to the viewport aspect and
/// keeps the window center inside the world.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AspectPreserving {
    max_viewport: Option<Viewport>,
}

impl AspectPreserving {
    pub fn new() -> Self {
        AspectPreserving::default()
    }

    /// Advisory upper bound on the viewport size. Exceeding it is logged, not
    /// refused.
    pub fn with_max_viewport(max: Viewport) -> Self {
        AspectPreserving {
            max_viewport: Some(max),
        }
    }

    pub fn max_viewport(&self) -> Option<Viewport> {
        self.max_viewport
    }

    pub fn set_max_viewport(&mut self, max: Option<Viewport>) {
        self.max_viewport = max;
    }

    fn exceeds_max(&self, viewport: Viewport) -> bool {
        self.max_viewport
            .is_some_and(|max| viewport.width > max.width || viewport.height > max.height)
    }
}

impl WindowConstraint for AspectPreserving {
    fn constrain_window(&self, requested: Subset, world: &Subset, viewport: Viewport) -> Subset {
        if requested.is_degenerate() {
            return requested;
        }
        let Some(viewport_aspect) = viewport.aspect() else {
            return requested;
        };

        let dim = requested.dimension();
        let mut lr = requested.lr;
        if let Some(window_aspect) = dim.aspect() {
            if !Tolerance::DEFAULT.close(window_aspect, viewport_aspect) {
                if viewport_aspect > window_aspect {
                    let width = dim.height() * viewport_aspect;
                    lr.x = requested.ul.x + dim.sign_x().as_f64() * width;
                } else {
                    let height = dim.width() / viewport_aspect;
                    lr.y = requested.ul.y + dim.sign_y().as_f64() * height;
                }
            }
        }
        let mut window = Subset::from_corners(requested.ul, lr);

        if world.is_valid() && !world.is_degenerate() {
            let center = window.center();
            if !world.is_inside(center) {
                let clamped = world.nearest_point(center);
                debug!(%center, %clamped, "window center moved inside world");
                window = Subset::from_center(clamped, window.dimension());
            }
        }
        window
    }

    fn refit_window(
        &self,
        window: &Subset,
        model: Option<&AffineModel>,
        viewport: Viewport,
    ) -> Option<Subset> {
        if self.exceeds_max(viewport) {
            warn!(%viewport, max = ?self.max_viewport, "viewport exceeds advisory maximum");
        }
        if !window.is_valid() || window.is_degenerate() {
            return None;
        }
        match model {
            // Keep the pixel size: the new lower-right pixel lands where the
            // current model already maps it.
            Some(model) if !viewport.is_empty() => {
                Some(Subset::from_corners(window.ul, model.transform(viewport.lower_right())))
            }
            _ => Some(*window),
        }
    }
}

impl World {
    /// A world whose windows follow the viewport aspect ratio.
    pub fn aspect_preserving(extents: impl ExtentProvider + 'static) -> World {
        World::with_policy(extents, WindowPolicy::AspectPreserving(AspectPreserving::new()))
    }
}
