//! Renderer interface
//!
//! The renderer is an external collaborator. The scene graph only tells it
//! which objects to consider at draw time; everything about how they are drawn
//! lives on the other side of this trait.

use crate::object::ObjectKey;

/// Draw-time registration of renderables
///
/// The scene graph never registers a key twice without unregistering it in
/// between, and every registration takes effect before the next draw.
pub trait Renderer {
    /// Start drawing `key`
    fn register(&mut self, key: ObjectKey);

    /// Stop drawing `key`
    fn unregister(&mut self, key: ObjectKey);

    /// Check whether `key` is currently registered
    fn is_registered(&self, key: ObjectKey) -> bool;
}

/// In-memory renderer that keeps an ordered draw list
///
/// Counts every call so that callers can detect registration churn.
#[derive(Debug, Default, Clone)]
pub struct RenderSet {
    draw_list: Vec<ObjectKey>,
    registrations: usize,
    unregistrations: usize,
}

impl RenderSet {
    /// Create an empty render set
    pub fn new() -> Self {
        Self::default()
    }

    /// Registered objects in registration order
    pub fn draw_list(&self) -> &[ObjectKey] {
        &self.draw_list
    }

    /// Number of registered objects
    #[inline]
    pub fn len(&self) -> usize {
        self.draw_list.len()
    }

    /// Check if nothing is registered
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.draw_list.is_empty()
    }

    /// Total number of `register` calls received
    pub fn registrations(&self) -> usize {
        self.registrations
    }

    /// Total number of `unregister` calls received
    pub fn unregistrations(&self) -> usize {
        self.unregistrations
    }
}

impl Renderer for RenderSet {
    fn register(&mut self, key: ObjectKey) {
        self.registrations += 1;
        if !self.draw_list.contains(&key) {
            self.draw_list.push(key);
        }
    }

    fn unregister(&mut self, key: ObjectKey) {
        self.unregistrations += 1;
        self.draw_list.retain(|&k| k != key);
    }

    fn is_registered(&self, key: ObjectKey) -> bool {
        self.draw_list.contains(&key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    #[test]
    fn test_register_is_idempotent() {
        let mut keys: SlotMap<ObjectKey, ()> = SlotMap::with_key();
        let a = keys.insert(());

        let mut set = RenderSet::new();
        set.register(a);
        set.register(a);
        assert_eq!(set.len(), 1);
        assert_eq!(set.registrations(), 2);
        assert!(set.is_registered(a));
    }

    #[test]
    fn test_unregister() {
        let mut keys: SlotMap<ObjectKey, ()> = SlotMap::with_key();
        let a = keys.insert(());
        let b = keys.insert(());

        let mut set = RenderSet::new();
        set.register(a);
        set.register(b);
        set.unregister(a);
        assert_eq!(set.draw_list(), &[b]);
        assert_eq!(set.unregistrations(), 1);
        assert!(!set.is_registered(a));

        set.unregister(b);
        assert!(set.is_empty());
    }
}
