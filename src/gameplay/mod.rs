//! Simulation domain: shared components, battle setup, and the sub-plugins
//! for economy, units, combat, spells, the scripted opponent, and the win
//! evaluator.

pub mod battlefield;
pub mod clock;
pub mod combat;
pub mod deploy;
pub mod economy;
pub mod endgame;
pub mod opponent;
pub mod spells;
pub mod units;

use bevy::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::BattleState;
use crate::catalog::{self, CardData, TargetPriority};
use crate::element::Element;
use crate::gameplay::battlefield::PIXELS_PER_TILE;
use crate::gameplay::opponent::Difficulty;

// === Components ===

/// Which army an entity belongs to.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
#[reflect(Component)]
pub enum Side {
    Player,
    Enemy,
}

impl Side {
    #[must_use]
    pub const fn opposing(self) -> Self {
        match self {
            Self::Player => Self::Enemy,
            Self::Enemy => Self::Player,
        }
    }
}

/// Current and maximum hit points. Mutated only by the damage intake
/// system so clamping and death detection happen in one place.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Health {
    pub current: i32,
    pub max: i32,
}

impl Health {
    #[must_use]
    pub const fn new(max: i32) -> Self {
        Self { current: max, max }
    }
}

/// One-way latch inserted when health reaches zero. Dead entities are
/// skipped by every simulation system and ignore further health changes.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Dead;

/// Marker for entities that units and spells may select as targets.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Targetable;

/// The entity this unit is currently focused on, if any. Revalidated every
/// frame before use; a stale id is treated as no target.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct CurrentTarget(pub Option<Entity>);

/// Combat parameters, in pixels and seconds. A negative `attack` marks a
/// healer that restores ally health instead of dealing damage.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct CombatStats {
    pub attack: i32,
    pub attack_interval: f32,
    pub range: f32,
    pub building_bonus: i32,
    pub priority: TargetPriority,
}

/// Seconds until this unit may strike again. Counts down only while a
/// target is in range and resets to the attack interval on each strike.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct AttackCooldown(pub f32);

/// Movement speed in pixels per second. Stationary entities (towers,
/// healers) simply lack this component.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Movement {
    pub speed: f32,
}

/// Elemental affinity used by the damage multiplier table.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Elemental(pub Element);

/// Marker for airborne units. Purely descriptive; presentation layers use
/// it to lift sprites off the ground.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Flying;

// === Resources ===

/// The deterministic random stream every simulation roll draws from.
/// Reseeded from [`BattleSetup::seed`] when a battle starts.
#[derive(Resource, Debug)]
pub struct SimRng(pub StdRng);

impl Default for SimRng {
    fn default() -> Self {
        Self(StdRng::seed_from_u64(0))
    }
}

/// Battle configuration. The host overwrites this resource, then moves
/// [`BattleState`] to `Running`.
#[derive(Resource, Debug, Clone)]
pub struct BattleSetup {
    pub player_deck: Vec<CardData>,
    pub opponent_deck: Vec<CardData>,
    pub difficulty: Difficulty,
    pub seed: u64,
}

impl Default for BattleSetup {
    fn default() -> Self {
        Self {
            player_deck: catalog::starter_deck(),
            opponent_deck: catalog::opponent_deck(),
            difficulty: Difficulty::default(),
            seed: 0,
        }
    }
}

/// The player's validated deck for this battle. The simulation never draws
/// from it; it exists so hosts can build hand UIs against the same deck the
/// battle was initialized with.
#[derive(Resource, Debug, Clone, Default)]
pub struct PlayerDeck(pub Vec<CardData>);

// === Helper Functions ===

/// Converts a distance in tiles to battlefield pixels.
#[must_use]
pub fn tiles_to_pixels(tiles: f32) -> f32 {
    tiles * PIXELS_PER_TILE
}

/// Returns `deck` if it is a full, valid deck; otherwise logs the problem
/// and substitutes the starter deck.
#[must_use]
pub fn validated_deck(deck: &[CardData]) -> Vec<CardData> {
    if deck.len() != catalog::DECK_SIZE {
        warn!(
            "deck has {} cards, expected {}; substituting starter deck",
            deck.len(),
            catalog::DECK_SIZE
        );
        return catalog::starter_deck();
    }
    for card in deck {
        if let Err(reason) = card.validate() {
            warn!(
                "card '{}' is invalid ({reason}); substituting starter deck",
                card.id
            );
            return catalog::starter_deck();
        }
    }
    deck.to_vec()
}

// === Systems ===

/// First step of battle setup: reseed the random stream and validate the
/// player's deck. The rest of the setup chain runs after this.
fn seed_battle(mut rng: ResMut<SimRng>, mut deck: ResMut<PlayerDeck>, setup: Res<BattleSetup>) {
    rng.0 = StdRng::seed_from_u64(setup.seed);
    deck.0 = validated_deck(&setup.player_deck)
        .iter()
        .map(|card| catalog::scale_for_level(card, card.level))
        .collect();
    info!(
        "battle starting: difficulty {:?}, seed {}",
        setup.difficulty, setup.seed
    );
}

// === Plugin ===

pub(super) fn plugin(app: &mut App) {
    app.register_type::<Side>()
        .register_type::<Health>()
        .register_type::<Dead>()
        .register_type::<Targetable>()
        .register_type::<CurrentTarget>()
        .register_type::<CombatStats>()
        .register_type::<AttackCooldown>()
        .register_type::<Movement>()
        .register_type::<Elemental>()
        .register_type::<Flying>();

    app.init_resource::<SimRng>()
        .init_resource::<BattleSetup>()
        .init_resource::<PlayerDeck>();

    // Setup runs as one chain so later steps can rely on the reseeded RNG
    // and validated decks.
    app.add_systems(
        OnEnter(BattleState::Running),
        (
            seed_battle,
            battlefield::reset_battlefield,
            clock::reset_clock,
            economy::reset_elixir,
            endgame::reset_result,
            opponent::reset_opponent,
        )
            .chain(),
    );

    app.add_plugins((
        clock::plugin,
        battlefield::plugin,
        economy::plugin,
        units::plugin,
        combat::plugin,
        deploy::plugin,
        opponent::plugin,
        endgame::plugin,
    ));
}
