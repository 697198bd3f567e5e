//! The world / window / viewport controller.
//!
//! A [`World`] owns three frames that must stay consistent:
//!
//! - the **world** extent: everything addressable, in world units
//! - the **window**: the visible part of the world, same units
//! - the **viewport**: the pixel grid the window is rendered onto
//!
//! plus an opaque spatial-reference token. Whenever the window or viewport
//! changes the viewport→window [`AffineModel`] is rebuilt, and observers are
//! told once per externally visible change.
//!
//! There is no explicit state tag. A world is *initialized* when it has a
//! non-degenerate extent, a non-empty viewport and a spatial reference.

mod aspect;
mod observer;
mod policy;

use std::fmt;
use std::rc::Rc;

pub use aspect::AspectPreserving;
pub use observer::{SpatialObserver, SubscriptionId};
pub use policy::{FreeWindow, WindowConstraint, WindowPolicy};

use crate::affine::AffineModel;
use crate::defaults::{ExtentCatalog, ExtentProvider};
use crate::errors::WorldError;
use crate::log::{debug, warn};
use crate::subset::Subset;
use crate::tolerance::Tolerance;
use crate::types::{Coordinate, Viewport};

use observer::Observers;

/// The cached viewport→window model.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SpatialModel {
    /// Window or viewport missing; nothing to derive from.
    Stale,
    Fresh(AffineModel),
}

impl SpatialModel {
    /// Derive the model mapping `viewport` pixels onto `window`.
    pub fn derive(window: &Subset, viewport: Viewport) -> SpatialModel {
        if viewport.is_empty() || !window.is_valid() || window.is_degenerate() {
            return SpatialModel::Stale;
        }
        let pixels = Subset::from_corners(Coordinate::ORIGIN, viewport.lower_right());
        match AffineModel::between(&pixels, window) {
            Ok(model) => SpatialModel::Fresh(model),
            Err(_e) => {
                warn!(error = %_e, %window, %viewport, "could not derive spatial model");
                SpatialModel::Stale
            }
        }
    }

    pub fn as_model(&self) -> Option<&AffineModel> {
        match self {
            SpatialModel::Stale => None,
            SpatialModel::Fresh(model) => Some(model),
        }
    }

    pub fn is_fresh(&self) -> bool {
        matches!(self, SpatialModel::Fresh(_))
    }
}

pub struct World {
    world: Subset,
    window: Subset,
    viewport: Viewport,
    spatial_reference: String,
    model: SpatialModel,
    policy: WindowPolicy,
    extents: Box<dyn ExtentProvider>,
    observers: Observers,
    revision: u64,
    batch_depth: u32,
    pending: bool,
}

impl World {
    /// An empty, uninitialized world taking windows as requested.
    pub fn new(extents: impl ExtentProvider + 'static) -> World {
        World::with_policy(extents, WindowPolicy::default())
    }

    pub fn with_policy(extents: impl ExtentProvider + 'static, policy: WindowPolicy) -> World {
        World {
            world: Subset::DEGENERATE,
            window: Subset::DEGENERATE,
            viewport: Viewport::EMPTY,
            spatial_reference: String::new(),
            model: SpatialModel::Stale,
            policy,
            extents: Box::new(extents),
            observers: Observers::default(),
            revision: 0,
            batch_depth: 0,
            pending: false,
        }
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    pub fn is_initialized(&self) -> bool {
        self.world.is_valid()
            && !self.world.is_degenerate()
            && !self.viewport.is_empty()
            && !self.spatial_reference.is_empty()
    }

    pub fn world(&self) -> Subset {
        self.world
    }

    pub fn window(&self) -> Subset {
        self.window
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// The viewport as a pixel box from the origin.
    pub fn viewport_subset(&self) -> Subset {
        Subset::from_corners(Coordinate::ORIGIN, self.viewport.lower_right())
    }

    pub fn spatial_reference(&self) -> &str {
        &self.spatial_reference
    }

    /// The current viewport→window model, `None` while stale.
    pub fn model(&self) -> Option<&AffineModel> {
        self.model.as_model()
    }

    pub fn spatial_model(&self) -> &SpatialModel {
        &self.model
    }

    pub fn policy(&self) -> &WindowPolicy {
        &self.policy
    }

    pub fn policy_mut(&mut self) -> &mut WindowPolicy {
        &mut self.policy
    }

    /// Increases by one for every externally visible change.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    // ------------------------------------------------------------------------
    // Mutators
    // ------------------------------------------------------------------------

    /// Replace the world extent. Degenerate or unchanged extents are ignored.
    pub fn set_world(&mut self, extent: Subset) -> bool {
        if extent.is_degenerate() || extent == self.world {
            return false;
        }
        debug!(%extent, "world extent changed");
        self.world = extent;
        self.changed();
        true
    }

    /// Grow the world to cover `extent`.
    ///
    /// An uninitialized world takes `extent` as both world and window, which
    /// is how the first layer added to a view bootstraps it.
    pub fn append_world(&mut self, extent: Subset) -> bool {
        if self.is_initialized() {
            let joined = self.world.join(&extent);
            return self.set_world(joined);
        }
        self.batch(|world| {
            let world_changed = world.set_world(extent);
            let window_changed = world.set_window(extent);
            world_changed || window_changed
        })
    }

    /// Replace the visible window, after the window policy has had its say.
    ///
    /// Ignored while uninitialized, for degenerate or unchanged windows, and
    /// for windows no invertible model can map onto. Every accepted window
    /// rebuilds the model from scratch.
    pub fn set_window(&mut self, requested: Subset) -> bool {
        if !self.is_initialized() {
            return false;
        }
        let window = self.policy.constrain_window(requested, &self.world, self.viewport);
        if window.is_degenerate() || (window == self.window && self.model.is_fresh()) {
            return false;
        }
        let model = SpatialModel::derive(&window, self.viewport);
        if !model.is_fresh() {
            return false;
        }
        debug!(%requested, %window, "window changed");
        self.window = window;
        self.model = model;
        self.changed();
        true
    }

    /// Resize the viewport. The window policy decides what happens to the
    /// window; observers see a single change either way.
    pub fn set_viewport(&mut self, width: u32, height: u32) -> bool {
        let viewport = Viewport::new(width, height);
        if viewport == self.viewport {
            return false;
        }
        let refit = self.policy.refit_window(&self.window, self.model(), viewport);
        self.batch(|world| {
            debug!(%viewport, "viewport changed");
            world.viewport = viewport;
            world.rebuild_model();
            world.changed();
            if let Some(window) = refit {
                world.set_window(window);
            }
        });
        true
    }

    /// Switch spatial reference.
    ///
    /// An initialized world is reset: the extent restarts from the provider's
    /// default for the new token and the window is cleared.
    pub fn set_spatial_reference(&mut self, spatial_reference: &str) -> bool {
        if spatial_reference == self.spatial_reference {
            return false;
        }
        if self.is_initialized() {
            self.world = self
                .extents
                .default_extent(spatial_reference)
                .unwrap_or(Subset::DEGENERATE);
            self.window = Subset::DEGENERATE;
            self.model = SpatialModel::Stale;
        }
        debug!(spatial_reference, world = %self.world, "spatial reference changed");
        self.spatial_reference = spatial_reference.to_string();
        self.changed();
        true
    }

    /// Back to uninitialized: no extent, no window, no spatial reference.
    /// The viewport is kept; it belongs to whoever renders.
    pub fn reset(&mut self) -> bool {
        let was_empty = !self.world.is_valid()
            && !self.window.is_valid()
            && self.spatial_reference.is_empty();
        if was_empty {
            return false;
        }
        self.world = Subset::DEGENERATE;
        self.window = Subset::DEGENERATE;
        self.spatial_reference.clear();
        self.model = SpatialModel::Stale;
        self.changed();
        true
    }

    /// Shift the window by `dx`, `dy` world units.
    pub fn pan(&mut self, dx: f64, dy: f64) -> bool {
        let window = self.window.offset(Coordinate::new(dx, dy));
        self.set_window(window)
    }

    /// Scale the window about `center`. Factors above one zoom in.
    pub fn zoom(&mut self, factor: f64, center: Coordinate) -> bool {
        if !factor.is_finite() || factor <= 0.0 || !self.window.is_valid() {
            return false;
        }
        let scale = 1.0 / factor;
        let ul = center + (self.window.ul - center) * scale;
        let lr = center + (self.window.lr - center) * scale;
        self.set_window(Subset::from_corners(ul, lr))
    }

    /// Run `f` with notifications held back, then notify once if anything
    /// changed. Nested batches flush at the outermost exit.
    pub fn batch<R>(&mut self, f: impl FnOnce(&mut World) -> R) -> R {
        self.batch_depth += 1;
        let result = f(self);
        self.batch_depth -= 1;
        if self.batch_depth == 0 && self.pending {
            self.pending = false;
            self.notify();
        }
        result
    }

    // ------------------------------------------------------------------------
    // Observers
    // ------------------------------------------------------------------------

    pub fn subscribe(&mut self, observer: Rc<dyn SpatialObserver>) -> SubscriptionId {
        self.observers.subscribe(observer)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    // ------------------------------------------------------------------------
    // Transforms
    // ------------------------------------------------------------------------

    /// Viewport pixel → world coordinate, or [`WorldError::StaleModel`]
    /// before a window and viewport exist.
    pub fn try_transform(&self, p: Coordinate) -> Result<Coordinate, WorldError> {
        self.model()
            .map(|model| model.transform(p))
            .ok_or(WorldError::StaleModel)
    }

    /// World coordinate → viewport pixel, or [`WorldError::StaleModel`].
    pub fn try_inverse_transform(&self, p: Coordinate) -> Result<Coordinate, WorldError> {
        self.model()
            .map(|model| model.inverse_transform(p))
            .ok_or(WorldError::StaleModel)
    }

    /// Viewport pixel → world coordinate.
    ///
    /// Without a fresh model this interpolates linearly between window and
    /// viewport and logs a warning: callers are expected to wait for
    /// initialization. [`World::try_transform`] reports the stale model as
    /// an error instead.
    pub fn transform(&self, p: Coordinate) -> Coordinate {
        match &self.model {
            SpatialModel::Fresh(model) => model.transform(p),
            SpatialModel::Stale => {
                warn!(%p, "transform with a stale spatial model");
                self.linear_transform(p)
            }
        }
    }

    /// World coordinate → viewport pixel.
    pub fn inverse_transform(&self, p: Coordinate) -> Coordinate {
        match &self.model {
            SpatialModel::Fresh(model) => model.inverse_transform(p),
            SpatialModel::Stale => {
                warn!(%p, "inverse transform with a stale spatial model");
                self.linear_inverse_transform(p)
            }
        }
    }

    /// Viewport box → world box.
    pub fn transform_subset(&self, pixels: &Subset) -> Subset {
        match &self.model {
            SpatialModel::Fresh(model) => model.transform_subset(pixels),
            SpatialModel::Stale => {
                let dim = pixels.dimension();
                Subset::from_corners(self.transform(pixels.ul), self.transform(pixels.lr))
                    .oriented(dim.sign_x(), dim.sign_y())
            }
        }
    }

    /// World box → viewport box.
    pub fn inverse_transform_subset(&self, extent: &Subset) -> Subset {
        match &self.model {
            SpatialModel::Fresh(model) => model.inverse_transform_subset(extent),
            SpatialModel::Stale => {
                let dim = extent.dimension();
                Subset::from_corners(
                    self.inverse_transform(extent.ul),
                    self.inverse_transform(extent.lr),
                )
                .oriented(dim.sign_x(), dim.sign_y())
            }
        }
    }

    // ------------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------------

    fn rebuild_model(&mut self) {
        self.model = SpatialModel::derive(&self.window, self.viewport);
        debug!(fresh = self.model.is_fresh(), "spatial model rebuilt");
    }

    fn changed(&mut self) {
        self.revision += 1;
        if self.batch_depth > 0 {
            self.pending = true;
        } else {
            self.notify();
        }
    }

    fn notify(&self) {
        self.observers.notify(self);
    }

    fn linear_transform(&self, p: Coordinate) -> Coordinate {
        if self.viewport.is_empty() {
            return p;
        }
        let (ul, lr) = (self.window.ul, self.window.lr);
        Coordinate::new_3d(
            ul.x + p.x * (lr.x - ul.x) / f64::from(self.viewport.width),
            ul.y + p.y * (lr.y - ul.y) / f64::from(self.viewport.height),
            p.z,
        )
    }

    fn linear_inverse_transform(&self, p: Coordinate) -> Coordinate {
        let (ul, lr) = (self.window.ul, self.window.lr);
        let tol = Tolerance::DEFAULT;
        if tol.close(ul.x, lr.x) || tol.close(ul.y, lr.y) {
            return p;
        }
        Coordinate::new_3d(
            (p.x - ul.x) * f64::from(self.viewport.width) / (lr.x - ul.x),
            (p.y - ul.y) * f64::from(self.viewport.height) / (lr.y - ul.y),
            p.z,
        )
    }
}

impl Default for World {
    fn default() -> Self {
        World::new(ExtentCatalog::default())
    }
}

/// Compares the observable frames; the model is derived from them and the
/// observers are not part of a world's value.
impl PartialEq for World {
    fn eq(&self, other: &Self) -> bool {
        self.is_initialized() == other.is_initialized()
            && self.viewport == other.viewport
            && self.world == other.world
            && self.window == other.window
            && self.spatial_reference == other.spatial_reference
    }
}

impl fmt::Debug for World {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("World")
            .field("world", &self.world)
            .field("window", &self.window)
            .field("viewport", &self.viewport)
            .field("spatial_reference", &self.spatial_reference)
            .field("model", &self.model)
            .field("policy", &self.policy)
            .field("observers", &self.observers)
            .field("revision", &self.revision)
            .finish()
    }
}
