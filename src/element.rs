//! Elemental affinities and the damage multiplier table.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Multiplier applied when the attacker's element dominates the defender's.
pub const ADVANTAGE_MULTIPLIER: f64 = 1.3;

/// Multiplier applied when the attacker's element is dominated.
pub const DISADVANTAGE_MULTIPLIER: f64 = 0.7;

/// An entity's elemental affinity.
///
/// The four primal elements form a dominance cycle
/// (fire → earth → air → water → fire). `Omni`, `Void`, and `Alliance` sit
/// outside the cycle and always deal and receive neutral damage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Reflect)]
#[serde(rename_all = "lowercase")]
pub enum Element {
    Fire,
    Water,
    Air,
    Earth,
    Omni,
    Void,
    Alliance,
}

impl Element {
    /// The element this one dominates, or `None` for neutral elements.
    #[must_use]
    pub const fn dominates(self) -> Option<Self> {
        match self {
            Self::Fire => Some(Self::Earth),
            Self::Earth => Some(Self::Air),
            Self::Air => Some(Self::Water),
            Self::Water => Some(Self::Fire),
            Self::Omni | Self::Void | Self::Alliance => None,
        }
    }
}

/// Damage multiplier for an attack of `attacker` element against a
/// `defender` element.
///
/// Returned as `f64` because damage is scaled and floored; an `f32` 1.3
/// rounds 100 × 1.3 down to 129 instead of 130.
#[must_use]
pub fn multiplier(attacker: Element, defender: Element) -> f64 {
    if attacker.dominates() == Some(defender) {
        ADVANTAGE_MULTIPLIER
    } else if defender.dominates() == Some(attacker) {
        DISADVANTAGE_MULTIPLIER
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn cycle_advantage() {
        assert_eq!(multiplier(Element::Fire, Element::Earth), 1.3);
        assert_eq!(multiplier(Element::Earth, Element::Air), 1.3);
        assert_eq!(multiplier(Element::Air, Element::Water), 1.3);
        assert_eq!(multiplier(Element::Water, Element::Fire), 1.3);
    }

    #[test]
    fn cycle_disadvantage() {
        assert_eq!(multiplier(Element::Earth, Element::Fire), 0.7);
        assert_eq!(multiplier(Element::Fire, Element::Water), 0.7);
    }

    #[test]
    fn same_element_is_neutral() {
        assert_eq!(multiplier(Element::Fire, Element::Fire), 1.0);
    }

    #[test]
    fn non_adjacent_elements_are_neutral() {
        assert_eq!(multiplier(Element::Fire, Element::Air), 1.0);
        assert_eq!(multiplier(Element::Water, Element::Earth), 1.0);
    }

    #[test]
    fn neutral_tags_never_modify_damage() {
        for other in [
            Element::Fire,
            Element::Water,
            Element::Air,
            Element::Earth,
            Element::Omni,
            Element::Void,
            Element::Alliance,
        ] {
            assert_eq!(multiplier(Element::Omni, other), 1.0);
            assert_eq!(multiplier(other, Element::Void), 1.0);
            assert_eq!(multiplier(Element::Alliance, other), 1.0);
        }
    }

    #[test]
    fn floored_damage_keeps_exact_advantage() {
        // 100 damage with advantage must floor to exactly 130.
        let raw = (100.0 * multiplier(Element::Fire, Element::Earth)).floor();
        assert_eq!(raw as i32, 130);
    }
}
