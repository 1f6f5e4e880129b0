//! Deployable units: the spawn archetype and the targeting and movement
//! sub-plugins.

pub mod ai;
pub mod movement;

use bevy::prelude::*;
use rand::Rng;

use crate::catalog::UnitStats;
use crate::element::Element;
use crate::gameplay::{
    AttackCooldown, CombatStats, CurrentTarget, Elemental, Flying, Health, Movement, Side,
    SimRng, Targetable, tiles_to_pixels,
};
use crate::signals::UnitSpawned;

// === Constants ===

/// Scatter spread in pixels per extra copy when a card spawns several
/// units at once.
pub const SCATTER_PER_COPY: f32 = 15.0;

// === Components ===

/// Marker for deployed units (as opposed to towers).
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Unit;

// === Spawning ===

/// Spawns one unit from catalog stats. Single source of truth for the unit
/// archetype: healers (negative attack) and zero-speed deployables
/// (buildings) are spawned without [`Movement`] so they hold their
/// position.
pub fn spawn_unit(
    commands: &mut Commands,
    name: &str,
    stats: &UnitStats,
    element: Element,
    side: Side,
    position: Vec2,
) -> Entity {
    let mut entity = commands.spawn((
        Name::new(name.to_owned()),
        Unit,
        side,
        Elemental(element),
        Health::new(stats.health),
        CombatStats {
            attack: stats.attack,
            attack_interval: stats.attack_interval,
            range: tiles_to_pixels(stats.range),
            building_bonus: stats.building_bonus,
            priority: stats.priority,
        },
        AttackCooldown::default(),
        CurrentTarget::default(),
        Targetable,
        Transform::from_xyz(position.x, position.y, 0.0),
    ));
    if stats.attack >= 0 && stats.speed > 0.0 {
        entity.insert(Movement {
            speed: tiles_to_pixels(stats.speed),
        });
    }
    if stats.flying {
        entity.insert(Flying);
    }
    entity.id()
}

/// Spawns every copy a card play produces, scattering copies around the
/// drop point, and announces each spawn.
pub fn spawn_card_units(
    commands: &mut Commands,
    rng: &mut SimRng,
    name: &str,
    stats: &UnitStats,
    element: Element,
    side: Side,
    position: Vec2,
    spawned: &mut MessageWriter<UnitSpawned>,
) {
    let spread = SCATTER_PER_COPY * (stats.spawn_count.saturating_sub(1)) as f32;
    for _ in 0..stats.spawn_count {
        let offset = if spread > 0.0 {
            Vec2::new(
                (rng.0.random::<f32>() - 0.5) * 2.0 * spread,
                (rng.0.random::<f32>() - 0.5) * 2.0 * spread,
            )
        } else {
            Vec2::ZERO
        };
        let at = position + offset;
        spawn_unit(commands, name, stats, element, side, at);
        spawned.write(UnitSpawned { position: at, side });
    }
}

// === Plugin ===

pub(super) fn plugin(app: &mut App) {
    app.register_type::<Unit>();

    app.add_plugins((ai::plugin, movement::plugin));
}

#[cfg(test)]
mod integration_tests {
    use super::*;
    use crate::catalog::TargetPriority;
    use crate::testing::assert_entity_count;
    use pretty_assertions::assert_eq;

    fn test_stats(attack: i32) -> UnitStats {
        UnitStats {
            health: 100,
            attack,
            attack_interval: 1.5,
            range: 1.0,
            speed: 1.5,
            spawn_count: 1,
            building_bonus: 0,
            priority: TargetPriority::Default,
            flying: false,
        }
    }

    fn spawn_in_world(world: &mut World, stats: &UnitStats) -> Entity {
        let mut queue = bevy::ecs::world::CommandQueue::default();
        let mut commands = Commands::new(&mut queue, world);
        let id = spawn_unit(
            &mut commands,
            "Test Unit",
            stats,
            Element::Fire,
            Side::Player,
            Vec2::new(100.0, 400.0),
        );
        queue.apply(world);
        id
    }

    #[test]
    fn spawned_unit_carries_combat_archetype() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);

        let id = spawn_in_world(app.world_mut(), &test_stats(45));

        let stats = app.world().get::<CombatStats>(id).unwrap();
        assert_eq!(stats.attack, 45);
        assert_eq!(stats.range, 20.0); // 1 tile
        let movement = app.world().get::<Movement>(id).unwrap();
        assert_eq!(movement.speed, 30.0); // 1.5 tiles/s
        assert!(app.world().get::<Targetable>(id).is_some());
    }

    #[test]
    fn healer_spawns_without_movement() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);

        let id = spawn_in_world(app.world_mut(), &test_stats(-25));

        assert!(app.world().get::<Movement>(id).is_none());
        assert_entity_count::<With<Unit>>(&mut app, 1);
    }

    fn spawn_three_sprites(
        mut commands: Commands,
        mut rng: ResMut<SimRng>,
        mut spawned: MessageWriter<UnitSpawned>,
    ) {
        let mut stats = test_stats(30);
        stats.spawn_count = 3;
        spawn_card_units(
            &mut commands,
            &mut rng,
            "Sprite",
            &stats,
            Element::Water,
            Side::Player,
            Vec2::new(200.0, 450.0),
            &mut spawned,
        );
    }

    #[test]
    fn multi_spawn_scatters_copies() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_message::<UnitSpawned>();
        app.init_resource::<SimRng>();
        app.add_systems(Update, spawn_three_sprites.run_if(run_once));

        app.update();

        assert_entity_count::<With<Unit>>(&mut app, 3);
        let spawned: Vec<_> = app
            .world_mut()
            .resource_mut::<Messages<UnitSpawned>>()
            .drain()
            .collect();
        assert_eq!(spawned.len(), 3);
        // Copies land near the drop point, not on top of each other.
        for message in &spawned {
            assert!(message.position.distance(Vec2::new(200.0, 450.0)) <= 60.0);
        }
    }
}
