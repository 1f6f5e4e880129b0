//! Battlefield layout: arena dimensions, tower placement, and drop-zone
//! rules for card deployment.

use bevy::prelude::*;

use crate::catalog::CardKind;
use crate::gameplay::{CurrentTarget, Elemental, Health, Side, Targetable};
use crate::gameplay::units::Unit;
use crate::element::Element;

// === Constants ===

/// Arena width in pixels.
pub const ARENA_WIDTH: f32 = 400.0;

/// Arena height in pixels. The y axis grows downward: the enemy holds the
/// top half, the player the bottom half.
pub const ARENA_HEIGHT: f32 = 600.0;

/// World-pixel length of one battlefield tile. Catalog ranges, speeds, and
/// spell radii are given in tiles and converted with this factor.
pub const PIXELS_PER_TILE: f32 = 20.0;

/// Hit points of every tower.
pub const TOWER_HEALTH: i32 = 1000;

const MAIN_TOWER_MARGIN: f32 = 0.10;
const SIDE_TOWER_MARGIN: f32 = 0.20;

// === Components ===

/// Marker for all towers. Attacks against towers add the attacker's
/// building bonus.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Tower;

/// Marker for the two main towers whose destruction ends the match.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct MainTower;

// === Helper Functions ===

/// Positions of a side's three towers: main first, then the two flank
/// towers.
#[must_use]
pub fn tower_positions(side: Side) -> [Vec2; 3] {
    let (main_y, flank_y) = match side {
        Side::Enemy => (
            ARENA_HEIGHT * MAIN_TOWER_MARGIN,
            ARENA_HEIGHT * SIDE_TOWER_MARGIN,
        ),
        Side::Player => (
            ARENA_HEIGHT * (1.0 - MAIN_TOWER_MARGIN),
            ARENA_HEIGHT * (1.0 - SIDE_TOWER_MARGIN),
        ),
    };
    [
        Vec2::new(ARENA_WIDTH * 0.5, main_y),
        Vec2::new(ARENA_WIDTH * SIDE_TOWER_MARGIN, flank_y),
        Vec2::new(ARENA_WIDTH * (1.0 - SIDE_TOWER_MARGIN), flank_y),
    ]
}

/// Validates a card drop position. Spells may be cast anywhere; units and
/// buildings must land on their own half of the arena.
#[must_use]
pub fn is_valid_drop_zone(position: Vec2, side: Side, kind: CardKind) -> bool {
    match kind {
        CardKind::Spell => true,
        CardKind::Unit | CardKind::Building => match side {
            Side::Player => position.y >= ARENA_HEIGHT * 0.5,
            Side::Enemy => position.y < ARENA_HEIGHT * 0.5,
        },
    }
}

// === Systems ===

/// Clears leftover combatants from the previous battle and raises both
/// sides' towers. Player towers are `Omni`, enemy towers `Void`; both sit
/// outside the elemental cycle, so towers always take neutral damage.
pub(crate) fn reset_battlefield(
    mut commands: Commands,
    leftovers: Query<Entity, Or<(With<Unit>, With<Tower>)>>,
) {
    for entity in &leftovers {
        commands.entity(entity).despawn();
    }

    for side in [Side::Player, Side::Enemy] {
        let element = match side {
            Side::Player => Element::Omni,
            Side::Enemy => Element::Void,
        };
        let [main, left, right] = tower_positions(side);

        commands.spawn((
            Name::new("Main Tower"),
            Tower,
            MainTower,
            side,
            Elemental(element),
            Health::new(TOWER_HEALTH),
            Targetable,
            CurrentTarget::default(),
            Transform::from_xyz(main.x, main.y, 0.0),
        ));
        for position in [left, right] {
            commands.spawn((
                Name::new("Side Tower"),
                Tower,
                side,
                Elemental(element),
                Health::new(TOWER_HEALTH),
                Targetable,
                CurrentTarget::default(),
                Transform::from_xyz(position.x, position.y, 0.0),
            ));
        }
    }
}

// === Plugin ===

pub(super) fn plugin(app: &mut App) {
    app.register_type::<Tower>().register_type::<MainTower>();
}
