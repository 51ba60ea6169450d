//! Sentinel visibility tracking for row-based scroll views.
//!
//! Positions and sizes are in rows. A sentinel counts as visible while its
//! row lies in `[offset - margin, offset + height + margin)`.

pub const DEFAULT_ROOT_MARGIN: u32 = 2;

/// Visible window of a scrollable list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub offset: u32,
    pub height: u32,
}

impl Viewport {
    pub const fn new(offset: u32, height: u32) -> Self {
        Self { offset, height }
    }

    /// Window of `height` rows whose last row is the last of `len` rows.
    pub fn at_end(len: usize, height: u32) -> Self {
        let len = u32::try_from(len).unwrap_or(u32::MAX);
        Self::new(len.saturating_sub(height), height)
    }

    pub fn contains(&self, position: u32, margin: u32) -> bool {
        let start = self.offset.saturating_sub(margin);
        let end = self
            .offset
            .saturating_add(self.height)
            .saturating_add(margin);
        position >= start && position < end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObserverOptions {
    /// Rows beyond the viewport edges that already count as visible.
    pub root_margin: u32,
    pub enabled: bool,
}

impl Default for ObserverOptions {
    fn default() -> Self {
        Self {
            root_margin: DEFAULT_ROOT_MARGIN,
            enabled: true,
        }
    }
}

#[derive(Debug)]
struct Observation<K> {
    key: K,
    position: u32,
    fired: bool,
}

/// Watches one sentinel element and reports its first entry into view.
///
/// Each element instance, identified by its key, fires at most once.
/// Observing a different key replaces the observation and starts fresh.
#[derive(Debug)]
pub struct SentinelObserver<K> {
    options: ObserverOptions,
    observation: Option<Observation<K>>,
}

impl<K: PartialEq> SentinelObserver<K> {
    pub fn new(options: ObserverOptions) -> Self {
        Self {
            options,
            observation: None,
        }
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.options.enabled = enabled;
    }

    /// Point the observer at `target`, or release it with `None`.
    pub fn observe(&mut self, target: Option<(K, u32)>) {
        let Some((key, position)) = target else {
            self.disconnect();
            return;
        };

        if let Some(current) = self.observation.as_mut().filter(|current| current.key == key) {
            current.position = position;
            return;
        }

        self.observation = Some(Observation {
            key,
            position,
            fired: false,
        });
    }

    /// True on the sentinel's first entry into `viewport`, false afterwards.
    pub fn check(&mut self, viewport: Viewport) -> bool {
        if !self.options.enabled {
            return false;
        }
        let margin = self.options.root_margin;
        let Some(observation) = self.observation.as_mut() else {
            return false;
        };
        if observation.fired || !viewport.contains(observation.position, margin) {
            return false;
        }

        observation.fired = true;
        true
    }

    pub fn disconnect(&mut self) {
        self.observation = None;
    }

    pub fn is_observing(&self) -> bool {
        self.observation.is_some()
    }

    pub fn observed_key(&self) -> Option<&K> {
        self.observation.as_ref().map(|observation| &observation.key)
    }
}

impl<K: PartialEq> Default for SentinelObserver<K> {
    fn default() -> Self {
        Self::new(ObserverOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewport_range_includes_margin() {
        let viewport = Viewport::new(10, 5);

        assert!(!viewport.contains(7, 2));
        assert!(viewport.contains(8, 2));
        assert!(viewport.contains(16, 2));
        assert!(!viewport.contains(17, 2));
        assert!(!viewport.contains(15, 0));
    }

    #[test]
    fn at_end_saturates_for_short_lists() {
        assert_eq!(Viewport::at_end(3, 10), Viewport::new(0, 10));
        assert_eq!(Viewport::at_end(30, 10), Viewport::new(20, 10));
    }

    #[test]
    fn fires_once_per_element() {
        let mut observer = SentinelObserver::default();
        observer.observe(Some(("item-9", 9)));

        assert!(!observer.check(Viewport::new(0, 5)));
        assert!(observer.check(Viewport::new(3, 5)));
        assert!(!observer.check(Viewport::new(5, 5)));
    }

    #[test]
    fn new_key_gets_a_fresh_observation() {
        let mut observer = SentinelObserver::default();
        observer.observe(Some(("item-9", 9)));
        assert!(observer.check(Viewport::new(5, 5)));

        observer.observe(Some(("item-19", 19)));

        assert_eq!(observer.observed_key(), Some(&"item-19"));
        assert!(!observer.check(Viewport::new(5, 5)));
        assert!(observer.check(Viewport::new(15, 5)));
    }

    #[test]
    fn same_key_keeps_fired_flag_and_moves() {
        let mut observer = SentinelObserver::default();
        observer.observe(Some(("item-9", 9)));
        assert!(observer.check(Viewport::new(5, 5)));

        observer.observe(Some(("item-9", 40)));

        assert!(!observer.check(Viewport::new(38, 5)));
    }

    #[test]
    fn disabled_or_released_observer_never_fires() {
        let mut observer = SentinelObserver::new(ObserverOptions {
            root_margin: 0,
            enabled: false,
        });
        observer.observe(Some(("item-0", 0)));
        assert!(!observer.check(Viewport::new(0, 5)));

        observer.set_enabled(true);
        observer.observe(None);
        assert!(!observer.is_observing());
        assert!(!observer.check(Viewport::new(0, 5)));
    }
}
