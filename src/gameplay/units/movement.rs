//! Straight-line unit movement toward the current target.

use bevy::prelude::*;

use crate::gameplay::clock::{SimTick, tick_is_live};
use crate::gameplay::units::Unit;
use crate::gameplay::{CombatStats, CurrentTarget, Dead, Movement};
use crate::{SimSet, simulation_running};

/// Moves each unit toward its target until the target is inside attack
/// range. Movement stops at the range boundary rather than overshooting.
///
/// Two-phase because a unit's target may itself be a unit: steps are
/// computed against a read-only snapshot, then applied.
fn advance_units(
    tick: Res<SimTick>,
    mut queries: ParamSet<(
        Query<
            (Entity, &CurrentTarget, &Movement, &CombatStats, &Transform),
            (With<Unit>, Without<Dead>),
        >,
        Query<&mut Transform>,
    )>,
) {
    let mut movers: Vec<(Entity, Entity, Vec2, f32, f32)> = Vec::new();
    for (entity, target, movement, stats, transform) in &queries.p0() {
        if let Some(target_entity) = target.0 {
            movers.push((
                entity,
                target_entity,
                transform.translation.truncate(),
                stats.range,
                movement.speed,
            ));
        }
    }

    let mut transforms = queries.p1();
    for (entity, target_entity, position, range, speed) in movers {
        let Ok(target_transform) = transforms.get(target_entity) else {
            continue;
        };
        let goal = target_transform.translation.truncate();

        let offset = goal - position;
        let distance = offset.length();
        if distance <= range || distance < f32::EPSILON {
            continue;
        }

        // Close the gap, but never past the range boundary.
        let step = (speed * tick.delta_secs).min(distance - range);
        let new_position = position + offset / distance * step;
        if let Ok(mut transform) = transforms.get_mut(entity) {
            transform.translation.x = new_position.x;
            transform.translation.y = new_position.y;
        }
    }
}

pub(super) fn plugin(app: &mut App) {
    app.add_systems(
        Update,
        advance_units
            .in_set(SimSet::Movement)
            .run_if(simulation_running.and(tick_is_live)),
    );
}
