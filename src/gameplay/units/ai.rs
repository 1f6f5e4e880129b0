//! Target acquisition: validity checks, nearest-candidate search over the
//! combined unit and tower pool, and the opportunistic switch from a tower
//! to a close-by unit.

use bevy::ecs::query::Has;
use bevy::prelude::*;

use crate::catalog::TargetPriority;
use crate::gameplay::battlefield::Tower;
use crate::gameplay::clock::tick_is_live;
use crate::gameplay::units::Unit;
use crate::gameplay::{CombatStats, CurrentTarget, Dead, Side, Targetable};
use crate::{SimSet, simulation_running};

// === Constants ===

/// A default-priority unit locked onto a tower abandons it for an enemy
/// unit that wanders closer than this (pixels).
pub const PROXIMITY_SWITCH_RADIUS: f32 = 100.0;

// === Helper Functions ===

fn nearest(
    from: Vec2,
    candidates: impl Iterator<Item = (Entity, Vec2)>,
) -> Option<(Entity, f32)> {
    let mut best: Option<(Entity, f32)> = None;
    for (entity, position) in candidates {
        let distance = from.distance(position);
        if best.is_none_or(|(_, d)| distance < d) {
            best = Some((entity, distance));
        }
    }
    best
}

// === Systems ===

/// Picks a target for every living unit.
///
/// Healers (negative attack) seek the nearest ally unit. Fighters seek
/// the single nearest opposing entity across units and towers alike; the
/// card's priority only decides which class wins an exact distance tie.
/// A fighter already on a valid target keeps it, except that a
/// default-priority fighter sitting on a tower switches to an enemy unit
/// that is both closer than the tower and inside
/// [`PROXIMITY_SWITCH_RADIUS`].
fn acquire_targets(
    mut seekers: Query<
        (Entity, &Side, &Transform, &CombatStats, &mut CurrentTarget),
        (With<Unit>, Without<Dead>),
    >,
    candidates: Query<
        (Entity, &Side, &Transform, Has<Tower>, Has<Unit>),
        (With<Targetable>, Without<Dead>),
    >,
) {
    for (seeker, side, transform, stats, mut current) in &mut seekers {
        let position = transform.translation.truncate();
        let healing = stats.attack < 0;

        let valid = current.0.and_then(|entity| {
            let (_, candidate_side, candidate_transform, is_tower, _) =
                candidates.get(entity).ok()?;
            let wants_allies = healing;
            let is_ally = candidate_side == side;
            (is_ally == wants_allies).then(|| {
                (
                    entity,
                    position.distance(candidate_transform.translation.truncate()),
                    is_tower,
                )
            })
        });

        if healing {
            if valid.is_none() {
                current.0 = nearest(
                    position,
                    candidates.iter().filter_map(|(e, s, t, _, is_unit)| {
                        (s == side && is_unit && e != seeker)
                            .then(|| (e, t.translation.truncate()))
                    }),
                )
                .map(|(e, _)| e);
            }
            continue;
        }

        match valid {
            Some((tower, tower_distance, true)) if stats.priority == TargetPriority::Default => {
                // Locked on a tower: check for a closer enemy unit nearby.
                let closer_unit = nearest(
                    position,
                    candidates.iter().filter_map(|(e, s, t, _, is_unit)| {
                        (s != side && is_unit).then(|| (e, t.translation.truncate()))
                    }),
                )
                .filter(|&(_, d)| d < tower_distance && d < PROXIMITY_SWITCH_RADIUS);
                current.0 = Some(closer_unit.map_or(tower, |(e, _)| e));
            }
            Some(_) => {}
            None => {
                let units = || {
                    candidates.iter().filter_map(|(e, s, t, is_tower, _)| {
                        (s != side && !is_tower).then(|| (e, t.translation.truncate()))
                    })
                };
                let towers = || {
                    candidates.iter().filter_map(|(e, s, t, is_tower, _)| {
                        (s != side && is_tower).then(|| (e, t.translation.truncate()))
                    })
                };
                // One pass over the combined pool; strict `<` in `nearest`
                // means the class chained first wins exact ties.
                let pick = match stats.priority {
                    TargetPriority::Towers => nearest(position, towers().chain(units())),
                    TargetPriority::Default => nearest(position, units().chain(towers())),
                };
                current.0 = pick.map(|(e, _)| e);
            }
        }
    }
}

// === Plugin ===

pub(super) fn plugin(app: &mut App) {
    app.add_systems(
        Update,
        acquire_targets
            .in_set(SimSet::Targeting)
            .run_if(simulation_running.and(tick_is_live)),
    );
}

#[cfg(test)]
mod integration_tests {
    use super::*;
    use crate::testing::{spawn_test_tower, spawn_test_unit};
    use pretty_assertions::assert_eq;

    fn create_targeting_test_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_systems(Update, acquire_targets);
        app
    }

    fn target_of(app: &App, unit: Entity) -> Option<Entity> {
        app.world().get::<CurrentTarget>(unit).unwrap().0
    }

    #[test]
    fn picks_globally_nearest_enemy() {
        let mut app = create_targeting_test_app();
        let world = app.world_mut();

        let seeker = spawn_test_unit(world, Side::Player, 200.0, 400.0);
        let near_unit = spawn_test_unit(world, Side::Enemy, 200.0, 380.0);
        spawn_test_tower(world, Side::Enemy, 200.0, 350.0);

        app.update();

        assert_eq!(target_of(&app, seeker), Some(near_unit));
    }

    #[test]
    fn adjacent_tower_beats_distant_unit() {
        let mut app = create_targeting_test_app();
        let world = app.world_mut();

        let seeker = spawn_test_unit(world, Side::Player, 200.0, 400.0);
        let tower = spawn_test_tower(world, Side::Enemy, 200.0, 390.0);
        spawn_test_unit(world, Side::Enemy, 200.0, 100.0);

        app.update();

        // 10px tower wins over a 300px unit even at default priority.
        assert_eq!(target_of(&app, seeker), Some(tower));
    }

    #[test]
    fn units_win_exact_distance_ties() {
        let mut app = create_targeting_test_app();
        let world = app.world_mut();

        let seeker = spawn_test_unit(world, Side::Player, 200.0, 400.0);
        let unit = spawn_test_unit(world, Side::Enemy, 200.0, 380.0);
        spawn_test_tower(world, Side::Enemy, 200.0, 420.0);

        app.update();

        assert_eq!(target_of(&app, seeker), Some(unit));
    }

    #[test]
    fn tower_priority_breaks_distance_ties_toward_towers() {
        let mut app = create_targeting_test_app();
        let world = app.world_mut();

        let seeker = spawn_test_unit(world, Side::Player, 200.0, 400.0);
        world
            .entity_mut(seeker)
            .get_mut::<CombatStats>()
            .unwrap()
            .priority = TargetPriority::Towers;
        spawn_test_unit(world, Side::Enemy, 200.0, 380.0);
        let tower = spawn_test_tower(world, Side::Enemy, 200.0, 420.0);

        app.update();

        assert_eq!(target_of(&app, seeker), Some(tower));
    }

    #[test]
    fn falls_back_to_towers_when_no_units_remain() {
        let mut app = create_targeting_test_app();
        let world = app.world_mut();

        let seeker = spawn_test_unit(world, Side::Player, 200.0, 400.0);
        let tower = spawn_test_tower(world, Side::Enemy, 200.0, 60.0);

        app.update();

        assert_eq!(target_of(&app, seeker), Some(tower));
    }

    #[test]
    fn dead_target_is_replaced() {
        let mut app = create_targeting_test_app();
        let world = app.world_mut();

        let seeker = spawn_test_unit(world, Side::Player, 200.0, 400.0);
        let victim = spawn_test_unit(world, Side::Enemy, 200.0, 350.0);
        let other = spawn_test_unit(world, Side::Enemy, 200.0, 300.0);

        app.update();
        assert_eq!(target_of(&app, seeker), Some(victim));

        app.world_mut().entity_mut(victim).insert(Dead);
        app.update();

        assert_eq!(target_of(&app, seeker), Some(other));
    }

    #[test]
    fn switches_from_tower_to_nearby_unit() {
        let mut app = create_targeting_test_app();
        let world = app.world_mut();

        let seeker = spawn_test_unit(world, Side::Player, 200.0, 400.0);
        let tower = spawn_test_tower(world, Side::Enemy, 200.0, 250.0);

        app.update();
        assert_eq!(target_of(&app, seeker), Some(tower));

        // An enemy unit appears 50px away: closer than the tower and
        // inside the switch radius.
        let ambusher = spawn_test_unit(app.world_mut(), Side::Enemy, 200.0, 350.0);
        app.update();

        assert_eq!(target_of(&app, seeker), Some(ambusher));
    }

    #[test]
    fn keeps_tower_when_unit_is_outside_switch_radius() {
        let mut app = create_targeting_test_app();
        let world = app.world_mut();

        let seeker = spawn_test_unit(world, Side::Player, 200.0, 400.0);
        let tower = spawn_test_tower(world, Side::Enemy, 200.0, 280.0);

        app.update();
        assert_eq!(target_of(&app, seeker), Some(tower));

        // Closer than the tower (110px vs 120px) but beyond the 100px
        // switch radius.
        spawn_test_unit(app.world_mut(), Side::Enemy, 200.0, 290.0);
        app.update();

        assert_eq!(target_of(&app, seeker), Some(tower));
    }

    #[test]
    fn healer_targets_nearest_ally_unit() {
        let mut app = create_targeting_test_app();
        let world = app.world_mut();

        let healer = spawn_test_unit(world, Side::Player, 200.0, 500.0);
        world
            .entity_mut(healer)
            .get_mut::<CombatStats>()
            .unwrap()
            .attack = -25;
        let ally = spawn_test_unit(world, Side::Player, 200.0, 450.0);
        spawn_test_unit(world, Side::Enemy, 200.0, 480.0);

        app.update();

        assert_eq!(target_of(&app, healer), Some(ally));
    }

    #[test]
    fn no_candidates_leaves_target_empty() {
        let mut app = create_targeting_test_app();
        let seeker = spawn_test_unit(app.world_mut(), Side::Player, 200.0, 400.0);

        app.update();

        assert_eq!(target_of(&app, seeker), None);
    }
}
