//! Card catalog: the data model for playable cards, JSON loading, level
//! scaling, and the built-in starter decks.

use bevy::reflect::Reflect;
use serde::{Deserialize, Serialize};

use crate::element::Element;

// === Constants ===

/// Number of cards a deck must contain.
pub const DECK_SIZE: usize = 6;

/// Per-level stat growth factor. Stats are multiplied by
/// `1.1^(level - 1)` and floored.
pub const LEVEL_GROWTH: f64 = 1.1;

const DEFAULT_ATTACK_INTERVAL: f32 = 1.5;
const DEFAULT_RANGE_TILES: f32 = 1.0;
const DEFAULT_SPEED_TILES: f32 = 1.5;

// === Types ===

/// Broad card classification, used for drop-zone rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardKind {
    Unit,
    Building,
    Spell,
}

/// Target selection bias for a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Reflect)]
#[serde(rename_all = "lowercase")]
pub enum TargetPriority {
    /// Nearest enemy; units win exact distance ties against towers.
    #[default]
    Default,
    /// Nearest enemy; towers win exact distance ties, and units with this
    /// priority never switch away from a tower target.
    Towers,
}

/// Which side of the battlefield a spell affects, relative to the caster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetFilter {
    Friendly,
    Enemy,
    #[default]
    All,
}

/// What a spell does to each entity it catches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectKind {
    Damage,
    Heal,
    HealOverTime,
}

/// Combat statistics for a deployable unit or building.
///
/// Distances are in tiles; they are converted to pixels when the entity is
/// spawned. A negative `attack` marks a healer: it targets allies, never
/// moves, and restores health instead of dealing damage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UnitStats {
    pub health: i32,
    pub attack: i32,
    #[serde(default = "default_attack_interval")]
    pub attack_interval: f32,
    #[serde(default = "default_range")]
    pub range: f32,
    #[serde(default = "default_speed")]
    pub speed: f32,
    /// How many copies one card play spawns.
    #[serde(default = "default_spawn_count")]
    pub spawn_count: u32,
    /// Flat bonus added to attack when striking a tower.
    #[serde(default)]
    pub building_bonus: i32,
    #[serde(default)]
    pub priority: TargetPriority,
    #[serde(default)]
    pub flying: bool,
}

fn default_attack_interval() -> f32 {
    DEFAULT_ATTACK_INTERVAL
}
fn default_range() -> f32 {
    DEFAULT_RANGE_TILES
}
fn default_speed() -> f32 {
    DEFAULT_SPEED_TILES
}
fn default_spawn_count() -> u32 {
    1
}

/// Area effect carried by a spell card. `radius` is in tiles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpellEffect {
    pub kind: EffectKind,
    pub magnitude: i32,
    pub radius: f32,
    #[serde(default)]
    pub filter: TargetFilter,
}

/// The playable payload of a card.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CardPayload {
    Unit { stats: UnitStats },
    Building { stats: UnitStats },
    Spell { effect: SpellEffect },
}

/// A single card definition. Stats are stored at `level` 1 unless the
/// deck says otherwise; [`scale_for_level`] produces upgraded copies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardData {
    pub id: String,
    pub name: String,
    pub cost: f32,
    pub element: Element,
    #[serde(default = "default_level")]
    pub level: i32,
    #[serde(flatten)]
    pub payload: CardPayload,
}

fn default_level() -> i32 {
    1
}

impl CardData {
    #[must_use]
    pub const fn kind(&self) -> CardKind {
        match self.payload {
            CardPayload::Unit { .. } => CardKind::Unit,
            CardPayload::Building { .. } => CardKind::Building,
            CardPayload::Spell { .. } => CardKind::Spell,
        }
    }

    /// Deployable stats, if this card spawns entities.
    #[must_use]
    pub const fn unit_stats(&self) -> Option<&UnitStats> {
        match &self.payload {
            CardPayload::Unit { stats } | CardPayload::Building { stats } => Some(stats),
            CardPayload::Spell { .. } => None,
        }
    }

    /// Checks the card for values the simulation cannot act on. Returns the
    /// first problem found so callers can log it and skip the play.
    pub fn validate(&self) -> Result<(), &'static str> {
        if !self.cost.is_finite() || self.cost < 0.0 {
            return Err("cost must be a non-negative number");
        }
        if self.level < 1 {
            return Err("level must be at least 1");
        }
        match &self.payload {
            CardPayload::Unit { stats } | CardPayload::Building { stats } => {
                if stats.health <= 0 {
                    return Err("unit health must be positive");
                }
                if stats.spawn_count == 0 {
                    return Err("spawn count must be at least 1");
                }
                if stats.attack_interval <= 0.0 {
                    return Err("attack interval must be positive");
                }
                if stats.range < 0.0 || stats.speed < 0.0 {
                    return Err("range and speed must be non-negative");
                }
            }
            CardPayload::Spell { effect } => {
                if effect.radius <= 0.0 {
                    return Err("spell radius must be positive");
                }
                if effect.magnitude < 0 {
                    return Err("spell magnitude must be non-negative");
                }
            }
        }
        Ok(())
    }
}

// === Level Scaling ===

/// Returns a copy of `card` with its base stats scaled to `level`.
///
/// Health, attack, building bonus, and spell magnitude grow by
/// [`LEVEL_GROWTH`] per level and are floored. Level 1 (and below) returns
/// the card unchanged. The math runs in `f64` so e.g. level 4 at base 1000
/// floors to exactly 1331. The input is treated as level 1 data regardless
/// of its `level` field; callers scale each card at most once.
#[must_use]
pub fn scale_for_level(card: &CardData, level: i32) -> CardData {
    if level <= 1 {
        return card.clone();
    }
    let factor = LEVEL_GROWTH.powi(level - 1);
    let scale = |value: i32| (f64::from(value) * factor).floor() as i32;

    let mut scaled = card.clone();
    scaled.level = level;
    match &mut scaled.payload {
        CardPayload::Unit { stats } | CardPayload::Building { stats } => {
            stats.health = scale(stats.health);
            stats.attack = if stats.attack < 0 {
                // Healers get stronger too; floor toward zero would weaken them.
                -scale(-stats.attack)
            } else {
                scale(stats.attack)
            };
            stats.building_bonus = scale(stats.building_bonus);
        }
        CardPayload::Spell { effect } => {
            effect.magnitude = scale(effect.magnitude);
        }
    }
    scaled
}

// === JSON Loading ===

/// Parses a deck from a JSON array of card objects.
pub fn deck_from_json(json: &str) -> Result<Vec<CardData>, serde_json::Error> {
    serde_json::from_str(json)
}

// === Built-in Decks ===

fn unit(
    id: &str,
    name: &str,
    cost: f32,
    element: Element,
    stats: UnitStats,
) -> CardData {
    CardData {
        id: id.to_owned(),
        name: name.to_owned(),
        cost,
        element,
        level: 1,
        payload: CardPayload::Unit { stats },
    }
}

fn spell(
    id: &str,
    name: &str,
    cost: f32,
    element: Element,
    effect: SpellEffect,
) -> CardData {
    CardData {
        id: id.to_owned(),
        name: name.to_owned(),
        cost,
        element,
        level: 1,
        payload: CardPayload::Spell { effect },
    }
}

/// Default player deck, also the fallback when a supplied deck is invalid.
#[must_use]
pub fn starter_deck() -> Vec<CardData> {
    vec![
        unit(
            "ember_whelp",
            "Ember Whelp",
            3.0,
            Element::Fire,
            UnitStats {
                health: 280,
                attack: 45,
                attack_interval: 1.2,
                range: 1.0,
                speed: 2.0,
                spawn_count: 1,
                building_bonus: 0,
                priority: TargetPriority::Default,
                flying: false,
            },
        ),
        unit(
            "stone_golem",
            "Stone Golem",
            5.0,
            Element::Earth,
            UnitStats {
                health: 900,
                attack: 60,
                attack_interval: 1.8,
                range: 1.0,
                speed: 1.0,
                spawn_count: 1,
                building_bonus: 40,
                priority: TargetPriority::Towers,
                flying: false,
            },
        ),
        unit(
            "tide_sprites",
            "Tide Sprites",
            3.0,
            Element::Water,
            UnitStats {
                health: 120,
                attack: 30,
                attack_interval: 1.0,
                range: 1.0,
                speed: 2.5,
                spawn_count: 2,
                building_bonus: 0,
                priority: TargetPriority::Default,
                flying: false,
            },
        ),
        unit(
            "gale_harpy",
            "Gale Harpy",
            4.0,
            Element::Air,
            UnitStats {
                health: 300,
                attack: 55,
                attack_interval: 1.4,
                range: 2.0,
                speed: 2.2,
                spawn_count: 1,
                building_bonus: 0,
                priority: TargetPriority::Default,
                flying: true,
            },
        ),
        unit(
            "field_medic",
            "Field Medic",
            4.0,
            Element::Omni,
            UnitStats {
                health: 350,
                attack: -25,
                attack_interval: 1.5,
                range: 3.0,
                speed: 0.0,
                spawn_count: 1,
                building_bonus: 0,
                priority: TargetPriority::Default,
                flying: false,
            },
        ),
        spell(
            "fireball",
            "Fireball",
            4.0,
            Element::Fire,
            SpellEffect {
                kind: EffectKind::Damage,
                magnitude: 150,
                radius: 2.5,
                filter: TargetFilter::Enemy,
            },
        ),
    ]
}

/// Default opponent deck.
#[must_use]
pub fn opponent_deck() -> Vec<CardData> {
    vec![
        unit(
            "cinder_imp",
            "Cinder Imp",
            2.0,
            Element::Fire,
            UnitStats {
                health: 180,
                attack: 35,
                attack_interval: 1.1,
                range: 1.0,
                speed: 2.2,
                spawn_count: 1,
                building_bonus: 0,
                priority: TargetPriority::Default,
                flying: false,
            },
        ),
        unit(
            "mud_brute",
            "Mud Brute",
            4.0,
            Element::Earth,
            UnitStats {
                health: 600,
                attack: 50,
                attack_interval: 1.6,
                range: 1.0,
                speed: 1.2,
                spawn_count: 1,
                building_bonus: 25,
                priority: TargetPriority::Towers,
                flying: false,
            },
        ),
        unit(
            "mist_serpent",
            "Mist Serpent",
            3.0,
            Element::Water,
            UnitStats {
                health: 260,
                attack: 40,
                attack_interval: 1.3,
                range: 2.0,
                speed: 1.8,
                spawn_count: 1,
                building_bonus: 0,
                priority: TargetPriority::Default,
                flying: false,
            },
        ),
        unit(
            "storm_crow",
            "Storm Crow",
            3.0,
            Element::Air,
            UnitStats {
                health: 220,
                attack: 45,
                attack_interval: 1.2,
                range: 1.0,
                speed: 2.6,
                spawn_count: 1,
                building_bonus: 0,
                priority: TargetPriority::Default,
                flying: true,
            },
        ),
        spell(
            "healing_rain",
            "Healing Rain",
            3.0,
            Element::Water,
            SpellEffect {
                kind: EffectKind::Heal,
                magnitude: 120,
                radius: 3.0,
                filter: TargetFilter::Friendly,
            },
        ),
        spell(
            "void_bolt",
            "Void Bolt",
            2.0,
            Element::Void,
            SpellEffect {
                kind: EffectKind::Damage,
                magnitude: 100,
                radius: 1.5,
                filter: TargetFilter::Enemy,
            },
        ),
    ]
}
