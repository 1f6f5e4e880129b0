//! Fire-and-forget messages the simulation emits for presentation layers.
//!
//! Nothing in the simulation reads these; the host drains the ones it cares
//! about (sound, particles, HUD) and ignores the rest.

use bevy::prelude::*;

use crate::gameplay::Side;

/// Whether a damage event landed on the player's side or the enemy's, so a
/// HUD can colour hit markers without re-resolving the victim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageClass {
    ToPlayer,
    ToEnemy,
}

impl DamageClass {
    #[must_use]
    pub const fn for_victim(side: Side) -> Self {
        match side {
            Side::Player => Self::ToPlayer,
            Side::Enemy => Self::ToEnemy,
        }
    }
}

/// A unit entered the battlefield.
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub struct UnitSpawned {
    pub position: Vec2,
    pub side: Side,
}

/// Damage was applied to an entity.
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub struct DamageApplied {
    pub amount: i32,
    pub position: Vec2,
    pub class: DamageClass,
}

/// Health was restored to an entity.
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub struct HealApplied {
    pub amount: i32,
    pub position: Vec2,
}

/// An entity's health reached zero.
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub struct EntityDestroyed {
    pub position: Vec2,
}

/// A spell resolved at a position. `radius` is in pixels.
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub struct SpellCast {
    pub position: Vec2,
    pub radius: f32,
}

pub(super) fn plugin(app: &mut App) {
    app.add_message::<UnitSpawned>()
        .add_message::<DamageApplied>()
        .add_message::<HealApplied>()
        .add_message::<EntityDestroyed>()
        .add_message::<SpellCast>();
}
