//! How a `World` accepts window edits.
//!
//! The set of policies is closed: a window is either taken as requested or
//! bent to the viewport's aspect ratio. Dispatch goes through
//! [`WindowPolicy`] without boxing.

use enum_dispatch::enum_dispatch;

use crate::affine::AffineModel;
use crate::subset::Subset;
use crate::types::Viewport;

use super::aspect::AspectPreserving;

#[enum_dispatch]
pub trait WindowConstraint {
    /// Turn a requested window into the one the world will store.
    fn constrain_window(&self, requested: Subset, world: &Subset, viewport: Viewport) -> Subset;

    /// Window to re-apply when the viewport is about to become `viewport`.
    ///
    /// `model` is the model for the current (old) viewport, if one exists.
    /// `None` keeps the current window untouched.
    fn refit_window(
        &self,
        window: &Subset,
        model: Option<&AffineModel>,
        viewport: Viewport,
    ) -> Option<Subset>;
}

#[enum_dispatch(WindowConstraint)]
#[derive(Clone, Debug, PartialEq)]
pub enum WindowPolicy {
    Free(FreeWindow),
    AspectPreserving(AspectPreserving),
}

impl Default for WindowPolicy {
    fn default() -> Self {
        WindowPolicy::Free(FreeWindow)
    }
}

/// Windows are stored exactly as requested; a viewport change keeps the
/// window and stretches pixels instead.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FreeWindow;

impl WindowConstraint for FreeWindow {
    fn constrain_window(&self, requested: Subset, _world: &Subset, _viewport: Viewport) -> Subset {
        requested
    }

    fn refit_window(
        &self,
        _window: &Subset,
        _model: Option<&AffineModel>,
        _viewport: Viewport,
    ) -> Option<Subset> {
        None
    }
}
