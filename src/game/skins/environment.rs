//! Visibility of the mutually exclusive menu regions.

use bevy::prelude::*;
use tracing::{debug, warn};

/// One scene region. Exactly one is visible at a time.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum Region {
    Main,
    Showcase(u32),
}

#[derive(Debug, Clone, Copy)]
struct RegionSlot {
    region: Region,
    visible: bool,
}

/// Owns the visible flag of every known region.
///
/// Every transition hides all slots before showing its target, so the state can be
/// recovered even if a flag was flipped behind the switch's back.
#[derive(Debug, Clone)]
pub struct EnvironmentSwitch {
    slots: Vec<RegionSlot>,
}

impl Default for EnvironmentSwitch {
    fn default() -> Self {
        Self {
            slots: vec![RegionSlot {
                region: Region::Main,
                visible: true,
            }],
        }
    }
}

impl EnvironmentSwitch {
    /// Switch with the main region and `count` showcase regions, main visible.
    pub fn with_showcases(count: u32) -> Self {
        let mut switch = Self::default();
        for index in 0..count {
            switch.register(Region::Showcase(index));
        }
        switch
    }

    /// Adds a region, hidden. Registering a known region does nothing.
    pub fn register(&mut self, region: Region) {
        if self.slots.iter().any(|slot| slot.region == region) {
            return;
        }
        self.slots.push(RegionSlot {
            region,
            visible: false,
        });
    }

    pub fn show_main(&mut self) {
        self.activate(Region::Main);
    }

    /// Shows showcase `index`, or showcase 0 if `index` is unknown.
    pub fn show_showcase(&mut self, index: u32) {
        let target = if self.is_registered(Region::Showcase(index)) {
            Region::Showcase(index)
        } else if self.is_registered(Region::Showcase(0)) {
            warn!(index, "Unknown showcase region, falling back to showcase 0");
            Region::Showcase(0)
        } else {
            warn!(index, "No showcase region registered, environment left unchanged");
            return;
        };
        self.activate(target);
    }

    pub fn in_showcase(&self) -> bool {
        matches!(self.active_region(), Some(Region::Showcase(_)))
    }

    /// The visible region, or `None` if the flags are not exactly-one.
    pub fn active_region(&self) -> Option<Region> {
        let mut visible = self.slots.iter().filter(|slot| slot.visible);
        match (visible.next(), visible.next()) {
            (Some(slot), None) => Some(slot.region),
            _ => None,
        }
    }

    pub fn is_visible(&self, region: Region) -> bool {
        self.slots
            .iter()
            .any(|slot| slot.region == region && slot.visible)
    }

    #[cfg(test)]
    pub(crate) fn visible_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.visible).count()
    }

    fn is_registered(&self, region: Region) -> bool {
        self.slots.iter().any(|slot| slot.region == region)
    }

    fn activate(&mut self, target: Region) {
        for slot in &mut self.slots {
            slot.visible = false;
        }
        // Main is seeded in `default` and showcases are checked by the caller
        if let Some(slot) = self.slots.iter_mut().find(|slot| slot.region == target) {
            slot.visible = true;
        }
        debug!(region = ?target, "Environment region activated");
    }

    #[cfg(test)]
    fn force_visible(&mut self, region: Region) {
        if let Some(slot) = self.slots.iter_mut().find(|slot| slot.region == region) {
            slot.visible = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_on_main() {
        let switch = EnvironmentSwitch::with_showcases(2);
        assert_eq!(switch.active_region(), Some(Region::Main));
        assert!(!switch.in_showcase());
    }

    #[test]
    fn test_showcase_and_back() {
        let mut switch = EnvironmentSwitch::with_showcases(3);
        switch.show_showcase(2);
        assert_eq!(switch.active_region(), Some(Region::Showcase(2)));
        assert!(switch.in_showcase());
        assert!(!switch.is_visible(Region::Main));

        switch.show_main();
        assert_eq!(switch.active_region(), Some(Region::Main));
        assert_eq!(switch.visible_count(), 1);
    }

    #[test]
    fn test_repeated_calls_are_idempotent() {
        let mut switch = EnvironmentSwitch::with_showcases(1);
        switch.show_showcase(0);
        switch.show_showcase(0);
        assert_eq!(switch.active_region(), Some(Region::Showcase(0)));
        switch.show_main();
        switch.show_main();
        assert_eq!(switch.active_region(), Some(Region::Main));
    }

    #[test]
    fn test_unknown_index_falls_back_to_first_showcase() {
        let mut switch = EnvironmentSwitch::with_showcases(2);
        switch.show_showcase(9);
        assert_eq!(switch.active_region(), Some(Region::Showcase(0)));
    }

    #[test]
    fn test_no_showcase_registered_is_a_no_op() {
        let mut switch = EnvironmentSwitch::default();
        switch.show_showcase(0);
        assert_eq!(switch.active_region(), Some(Region::Main));
    }

    #[test]
    fn test_recovers_from_corrupted_flags() {
        let mut switch = EnvironmentSwitch::with_showcases(3);
        switch.force_visible(Region::Showcase(1));
        switch.force_visible(Region::Showcase(2));
        assert_eq!(switch.active_region(), None);

        switch.show_showcase(0);
        assert_eq!(switch.visible_count(), 1);
        assert_eq!(switch.active_region(), Some(Region::Showcase(0)));

        switch.force_visible(Region::Main);
        switch.show_main();
        assert_eq!(switch.visible_count(), 1);
        assert_eq!(switch.active_region(), Some(Region::Main));
    }

    #[test]
    fn test_register_is_idempotent() {
        let mut switch = EnvironmentSwitch::default();
        switch.register(Region::Showcase(0));
        switch.register(Region::Showcase(0));
        switch.register(Region::Main);
        switch.show_showcase(0);
        switch.show_main();
        assert_eq!(switch.visible_count(), 1);
    }
}
