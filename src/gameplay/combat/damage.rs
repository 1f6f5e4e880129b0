//! Centralized health mutation. Every damage and heal in the simulation
//! flows through [`HealthDelta`] so clamping, the death latch, and the
//! outgoing signals live in one system.

use bevy::ecs::query::Has;
use bevy::prelude::*;

use crate::gameplay::battlefield::Tower;
use crate::gameplay::combat::death::DeathTimer;
use crate::gameplay::{Dead, Health, Side};
use crate::signals::{DamageApplied, DamageClass, EntityDestroyed, HealApplied};
use crate::{SimSet, simulation_running};

/// A pending health change. Positive `amount` is damage, negative is a
/// heal.
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub struct HealthDelta {
    pub target: Entity,
    pub amount: i32,
}

/// Applies queued health deltas.
///
/// Damage clamps at zero and latches [`Dead`] the moment health runs out;
/// units additionally get a death telegraph timer. Heals clamp at max
/// health. An entity that died earlier this frame ignores every further
/// delta, including heals.
fn apply_health_deltas(
    mut deltas: MessageReader<HealthDelta>,
    mut commands: Commands,
    mut victims: Query<(&mut Health, &Side, &Transform, Has<Dead>, Has<Tower>)>,
    mut damage_out: MessageWriter<DamageApplied>,
    mut heal_out: MessageWriter<HealApplied>,
    mut destroyed_out: MessageWriter<EntityDestroyed>,
) {
    for delta in deltas.read() {
        let Ok((mut health, side, transform, dead, is_tower)) = victims.get_mut(delta.target)
        else {
            continue;
        };
        // `Dead` is inserted via commands, so also treat zero health as
        // dead to latch within the same batch of deltas.
        if dead || health.current <= 0 {
            continue;
        }
        let position = transform.translation.truncate();

        if delta.amount < 0 {
            health.current = (health.current - delta.amount).min(health.max);
            heal_out.write(HealApplied {
                amount: -delta.amount,
                position,
            });
        } else {
            health.current -= delta.amount;
            damage_out.write(DamageApplied {
                amount: delta.amount,
                position,
                class: DamageClass::for_victim(*side),
            });
            if health.current <= 0 {
                health.current = 0;
                let mut victim = commands.entity(delta.target);
                victim.insert(Dead);
                if !is_tower {
                    victim.insert(DeathTimer::default());
                }
                destroyed_out.write(EntityDestroyed { position });
            }
        }
    }
}

pub(super) fn plugin(app: &mut App) {
    app.add_message::<HealthDelta>();

    app.add_systems(
        Update,
        apply_health_deltas
            .in_set(SimSet::Damage)
            .run_if(simulation_running),
    );
}
