//! Change notification for `World` consumers.

use std::fmt;
use std::rc::Rc;

use super::World;

/// Something that reacts to a changed world: a renderer, a navigation widget.
///
/// Observers only ever see the world through a shared reference, so they can
/// read the new state but never mutate it from inside a notification.
pub trait SpatialObserver {
    fn world_changed(&self, world: &World);
}

impl<F> SpatialObserver for F
where
    F: Fn(&World),
{
    fn world_changed(&self, world: &World) {
        self(world)
    }
}

/// Handle returned by [`World::subscribe`], used to unsubscribe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

#[derive(Default)]
pub(crate) struct Observers {
    next_id: u64,
    entries: Vec<(SubscriptionId, Rc<dyn SpatialObserver>)>,
}

impl Observers {
    pub(crate) fn subscribe(&mut self, observer: Rc<dyn SpatialObserver>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, observer));
        id
    }

    pub(crate) fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry, _)| *entry != id);
        self.entries.len() != before
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Notify in subscription order.
    pub(crate) fn notify(&self, world: &World) {
        for (_, observer) in &self.entries {
            observer.world_changed(world);
        }
    }
}

impl fmt::Debug for Observers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observers")
            .field("count", &self.entries.len())
            .finish()
    }
}
