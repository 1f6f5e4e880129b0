//! Attack resolution: cooldown countdown, strike timing, elemental and
//! anti-tower damage math.

use bevy::ecs::query::Has;
use bevy::prelude::*;

use crate::element;
use crate::gameplay::battlefield::Tower;
use crate::gameplay::clock::{SimTick, tick_is_live};
use crate::gameplay::combat::HealthDelta;
use crate::gameplay::units::Unit;
use crate::gameplay::{
    AttackCooldown, CombatStats, CurrentTarget, Dead, Elemental, Targetable,
};
use crate::{SimSet, simulation_running};

/// Computes the damage one strike deals to a tower or unit target.
/// The building bonus applies only against towers; the elemental
/// multiplier scales the sum, and the result is floored.
#[must_use]
pub fn strike_damage(
    stats: &CombatStats,
    attacker_element: element::Element,
    target_element: element::Element,
    target_is_tower: bool,
) -> i32 {
    let mut base = stats.attack;
    if target_is_tower {
        base += stats.building_bonus;
    }
    let scaled = f64::from(base) * element::multiplier(attacker_element, target_element);
    scaled.floor() as i32
}

/// Fires attacks for every living unit with a target in range.
///
/// The cooldown only counts down while the target is in range, so a unit
/// that walks between targets does not bank strikes. Healers (negative
/// attack) emit a negative delta, which the damage system applies as a
/// heal; elemental scaling and tower bonuses never apply to heals.
fn resolve_attacks(
    tick: Res<SimTick>,
    mut attackers: Query<
        (
            &Elemental,
            &CombatStats,
            &mut AttackCooldown,
            &CurrentTarget,
            &Transform,
        ),
        (With<Unit>, Without<Dead>),
    >,
    targets: Query<
        (&Elemental, &Transform, Has<Tower>),
        (With<Targetable>, Without<Dead>),
    >,
    mut deltas: MessageWriter<HealthDelta>,
) {
    for (elemental, stats, mut cooldown, target, transform) in &mut attackers {
        let Some(target_entity) = target.0 else {
            continue;
        };
        let Ok((target_elemental, target_transform, target_is_tower)) =
            targets.get(target_entity)
        else {
            continue;
        };

        let distance = transform
            .translation
            .truncate()
            .distance(target_transform.translation.truncate());
        if distance > stats.range {
            continue;
        }

        if cooldown.0 > 0.0 {
            cooldown.0 -= tick.delta_secs;
            continue;
        }
        cooldown.0 = stats.attack_interval;

        let amount = if stats.attack < 0 {
            stats.attack
        } else {
            strike_damage(stats, elemental.0, target_elemental.0, target_is_tower)
        };
        deltas.write(HealthDelta {
            target: target_entity,
            amount,
        });
    }
}

pub(super) fn plugin(app: &mut App) {
    app.add_systems(
        Update,
        resolve_attacks
            .in_set(SimSet::Combat)
            .run_if(simulation_running.and(tick_is_live)),
    );
}
