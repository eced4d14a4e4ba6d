//! Scoped sensor subscriptions

use super::cell::SensorFeed;

/// Something that can deliver orientation samples into a [`SensorFeed`]
pub trait SensorSource {
    /// Start delivering at roughly `interval_ms`. Delivery stops when the
    /// returned guard is dropped or cancelled.
    fn subscribe(&mut self, feed: SensorFeed, interval_ms: u32) -> Subscription;
}

/// Guard that releases a platform listener exactly once
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    release: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(release: impl FnOnce() + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// A subscription with nothing to release (source absent or push-driven)
    pub fn detached() -> Self {
        Self { release: None }
    }

    /// Release now instead of at drop
    pub fn cancel(mut self) {
        self.release_once();
    }

    pub fn is_active(&self) -> bool {
        self.release.is_some()
    }

    fn release_once(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release_once();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_release_on_drop() {
        let released = Rc::new(Cell::new(0));
        {
            let r = released.clone();
            let _sub = Subscription::new(move || r.set(r.get() + 1));
            assert_eq!(released.get(), 0);
        }
        assert_eq!(released.get(), 1);
    }

    #[test]
    fn test_cancel_releases_once() {
        let released = Rc::new(Cell::new(0));
        let r = released.clone();
        let sub = Subscription::new(move || r.set(r.get() + 1));
        assert!(sub.is_active());
        sub.cancel();
        assert_eq!(released.get(), 1);
    }

    #[test]
    fn test_detached_is_inert() {
        let sub = Subscription::detached();
        assert!(!sub.is_active());
        drop(sub);
    }
}
