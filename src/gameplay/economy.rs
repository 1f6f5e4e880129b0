//! Economy: per-side elixir pools and regeneration.

use bevy::prelude::*;

use crate::gameplay::clock::{SimTick, tick_is_live};
use crate::gameplay::{BattleSetup, Side};
use crate::{SimSet, simulation_running};

// === Constants ===

/// Elixir each side holds when a battle starts.
pub const STARTING_ELIXIR: f32 = 3.0;

/// Elixir cap; regeneration saturates here.
pub const MAX_ELIXIR: f32 = 10.0;

/// Base regeneration in elixir per second. The opponent's difficulty
/// profile multiplies this for its own pool.
pub const BASE_ELIXIR_RATE: f32 = 1.0;

// === Types ===

/// One side's elixir pool.
#[derive(Debug, Clone, Copy, Reflect)]
pub struct ElixirPool {
    pub current: f32,
    pub rate: f32,
}

impl ElixirPool {
    #[must_use]
    pub const fn new(rate: f32) -> Self {
        Self {
            current: STARTING_ELIXIR,
            rate,
        }
    }

    pub fn regenerate(&mut self, delta_secs: f32) {
        self.current = (self.current + self.rate * delta_secs).min(MAX_ELIXIR);
    }

    #[must_use]
    pub fn can_afford(&self, cost: f32) -> bool {
        self.current >= cost
    }

    /// Deducts `cost`, never dropping below zero. Callers should check
    /// [`Self::can_afford`] first; the clamp keeps the pool in range even
    /// when they do not.
    pub fn spend(&mut self, cost: f32) {
        self.current = (self.current - cost).max(0.0);
    }
}

// === Resources ===

/// Both sides' elixir.
#[derive(Resource, Debug, Clone, Copy, Reflect)]
#[reflect(Resource)]
pub struct Elixir {
    player: ElixirPool,
    enemy: ElixirPool,
}

impl Default for Elixir {
    fn default() -> Self {
        Self {
            player: ElixirPool::new(BASE_ELIXIR_RATE),
            enemy: ElixirPool::new(BASE_ELIXIR_RATE),
        }
    }
}

impl Elixir {
    #[must_use]
    pub const fn pool(&self, side: Side) -> &ElixirPool {
        match side {
            Side::Player => &self.player,
            Side::Enemy => &self.enemy,
        }
    }

    pub const fn pool_mut(&mut self, side: Side) -> &mut ElixirPool {
        match side {
            Side::Player => &mut self.player,
            Side::Enemy => &mut self.enemy,
        }
    }
}

// === Systems ===

pub(crate) fn reset_elixir(mut elixir: ResMut<Elixir>, setup: Res<BattleSetup>) {
    let enemy_rate = BASE_ELIXIR_RATE * setup.difficulty.profile().elixir_rate_multiplier;
    elixir.player = ElixirPool::new(BASE_ELIXIR_RATE);
    elixir.enemy = ElixirPool::new(enemy_rate);
}

fn regenerate_elixir(tick: Res<SimTick>, mut elixir: ResMut<Elixir>) {
    elixir.player.regenerate(tick.delta_secs);
    elixir.enemy.regenerate(tick.delta_secs);
}

// === Plugin ===

pub(super) fn plugin(app: &mut App) {
    app.register_type::<Elixir>().init_resource::<Elixir>();

    app.add_systems(
        Update,
        regenerate_elixir
            .in_set(SimSet::Economy)
            .run_if(simulation_running.and(tick_is_live)),
    );
}
