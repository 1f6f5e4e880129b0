//! Shared helpers for headless test apps.

use bevy::ecs::query::QueryFilter;
use bevy::prelude::*;

use crate::catalog::TargetPriority;
use crate::element::Element;
use crate::gameplay::battlefield::{TOWER_HEALTH, Tower};
use crate::gameplay::clock::SimTick;
use crate::gameplay::units::Unit;
use crate::gameplay::{
    AttackCooldown, CombatStats, CurrentTarget, Elemental, Health, Movement, Side, Targetable,
};

/// Asserts how many entities match the given query filter.
pub fn assert_entity_count<F: QueryFilter>(app: &mut App, expected: usize) {
    let count = app
        .world_mut()
        .query_filtered::<Entity, F>()
        .iter(app.world())
        .count();
    assert_eq!(
        count,
        expected,
        "expected {expected} entities matching filter, found {count}"
    );
}

/// Overwrites the sanitized frame delta so systems under test see a known
/// tick.
pub fn set_tick(app: &mut App, delta_secs: f32) {
    app.world_mut().resource_mut::<SimTick>().delta_secs = delta_secs;
}

/// Queues a message for the next update.
pub fn send_message<T: Message>(app: &mut App, message: T) {
    app.world_mut().resource_mut::<Messages<T>>().write(message);
}

/// Removes and returns every pending message of type `T`.
pub fn drain_messages<T: Message>(app: &mut App) -> Vec<T> {
    app.world_mut()
        .resource_mut::<Messages<T>>()
        .drain()
        .collect()
}

/// Spawns a plain fire-element fighter: 100 HP, 30 attack, 1 tile of
/// range, 1.5 tiles/s of speed.
pub fn spawn_test_unit(world: &mut World, side: Side, x: f32, y: f32) -> Entity {
    world
        .spawn((
            Unit,
            side,
            Elemental(Element::Fire),
            Health::new(100),
            CombatStats {
                attack: 30,
                attack_interval: 1.5,
                range: 20.0,
                building_bonus: 0,
                priority: TargetPriority::Default,
            },
            AttackCooldown::default(),
            CurrentTarget::default(),
            Targetable,
            Movement { speed: 30.0 },
            Transform::from_xyz(x, y, 0.0),
        ))
        .id()
}

/// Spawns a tower with the standard neutral element for its side.
pub fn spawn_test_tower(world: &mut World, side: Side, x: f32, y: f32) -> Entity {
    let element = match side {
        Side::Player => Element::Omni,
        Side::Enemy => Element::Void,
    };
    world
        .spawn((
            Tower,
            side,
            Elemental(element),
            Health::new(TOWER_HEALTH),
            CurrentTarget::default(),
            Targetable,
            Transform::from_xyz(x, y, 0.0),
        ))
        .id()
}
