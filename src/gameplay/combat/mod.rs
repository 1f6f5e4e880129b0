//! Combat: attack resolution, centralized health mutation, and death
//! handling.

pub mod attack;
pub mod damage;
pub mod death;

use bevy::prelude::*;

pub use damage::HealthDelta;

pub(super) fn plugin(app: &mut App) {
    app.add_plugins((attack::plugin, damage::plugin, death::plugin));
}
