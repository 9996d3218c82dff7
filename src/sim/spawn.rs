//! Obstacle and pickup spawning
//!
//! A countdown timer fires a weighted random spawn just off the right edge.
//! Harder kinds gain probability as difficulty rises and the interval shrinks
//! with the square root of the difficulty multiplier.

use glam::Vec2;
use rand::Rng;

use super::state::{
    COCONUT_GROUND_Y_OFFSET, DOG_Y_OFFSET, Entity, EntityKind, FALL_RADIUS, FALL_START_Y,
    GameEvent, GameState, Marker, PickupKind,
};
use crate::consts::*;
use crate::tuning::Tuning;

/// Spawn x for ground coconuts and pickups
pub const SPAWN_X_NEAR: f32 = FIELD_WIDTH + 40.0;
/// Spawn x for bats and dogs
pub const SPAWN_X_FAR: f32 = FIELD_WIDTH + 60.0;
/// Bat altitude range (bottom of the hitbox)
pub const BAT_Y_MIN: f32 = 135.0;
pub const BAT_Y_MAX: f32 = 195.0;
/// Falling coconut initial speed range
pub const FALL_VY_MIN: f32 = 420.0;
pub const FALL_VY_MAX: f32 = 700.0;
/// Pickup height range (bottom of the hitbox)
pub const PICKUP_Y_MIN: f32 = GROUND_Y - 95.0;
pub const PICKUP_Y_MAX: f32 = GROUND_Y - 30.0;
/// Palms closer than this ahead of the player don't drop coconuts
pub const FALL_ANCHOR_LEAD: f32 = 200.0;
/// Extra distance behind the first coconut of a combo
pub const COMBO_GAP: f32 = 90.0;

/// What to spawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnKind {
    Coconut,
    Bat,
    Falling,
    Dog,
    Pickup(PickupKind),
}

/// Spawn probabilities for a difficulty level; the coconut takes the rest
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnWeights {
    pub dog: f32,
    pub bat: f32,
    pub falling: f32,
    pub pickup: f32,
}

impl SpawnWeights {
    pub fn for_difficulty(difficulty: f32) -> Self {
        let d = (difficulty - 1.0).max(0.0);
        Self {
            dog: (0.16 + 0.02 * d).min(0.26),
            bat: (0.15 + 0.02 * d).min(0.25),
            falling: (0.22 + 0.02 * d).min(0.30),
            pickup: 0.06,
        }
    }

    /// Share left for the plain ground coconut
    pub fn coconut(&self) -> f32 {
        (1.0 - self.dog - self.bat - self.falling - self.pickup).max(0.0)
    }

    /// Map a uniform roll in [0, 1) to a kind
    pub fn choose(&self, roll: f32) -> SpawnKind {
        let mut edge = self.dog;
        if roll < edge {
            return SpawnKind::Dog;
        }
        edge += self.bat;
        if roll < edge {
            return SpawnKind::Bat;
        }
        edge += self.falling;
        if roll < edge {
            return SpawnKind::Falling;
        }
        edge += self.pickup / 2.0;
        if roll < edge {
            return SpawnKind::Pickup(PickupKind::Boost);
        }
        edge += self.pickup / 2.0;
        if roll < edge {
            return SpawnKind::Pickup(PickupKind::SlowMo);
        }
        SpawnKind::Coconut
    }
}

/// Interval until the next spawn. `jitter_roll` is uniform in [-1, 1]; the
/// floor applies again after jitter.
pub fn next_interval(tuning: &Tuning, difficulty: f32, jitter_roll: f32) -> f32 {
    let base = tuning.spawn_interval(difficulty);
    let jittered = base * (1.0 + tuning.spawn_jitter * jitter_roll.clamp(-1.0, 1.0));
    jittered.max(tuning.spawn_min)
}

/// x of the palm a falling coconut drops from: the nearest one well ahead of
/// the player, else the first palm in the ring
pub fn falling_anchor(markers: &[Marker], player_x: f32) -> f32 {
    markers
        .iter()
        .map(|m| m.x)
        .filter(|&x| x > player_x + FALL_ANCHOR_LEAD)
        .min_by(|a, b| a.total_cmp(b))
        .or_else(|| markers.first().map(|m| m.x))
        .unwrap_or(SPAWN_X_NEAR)
}

/// Create an entity of the given kind and append it to the live list
pub fn spawn_entity(state: &mut GameState, kind: SpawnKind) -> u32 {
    let (pos, entity_kind) = match kind {
        SpawnKind::Coconut => (
            Vec2::new(SPAWN_X_NEAR, GROUND_Y - COCONUT_GROUND_Y_OFFSET),
            EntityKind::Coconut,
        ),
        SpawnKind::Bat => (
            Vec2::new(SPAWN_X_FAR, state.rng.random_range(BAT_Y_MIN..BAT_Y_MAX)),
            EntityKind::Bat {
                anim_t: 0.0,
                wiggle_t: state.rng.random_range(0.0..10.0),
            },
        ),
        SpawnKind::Falling => (
            Vec2::new(
                falling_anchor(&state.markers, state.player.pos.x),
                FALL_START_Y,
            ),
            EntityKind::Falling {
                radius: FALL_RADIUS,
                vy: state.rng.random_range(FALL_VY_MIN..FALL_VY_MAX),
            },
        ),
        SpawnKind::Dog => (
            Vec2::new(SPAWN_X_FAR, GROUND_Y + DOG_Y_OFFSET),
            EntityKind::Dog { anim_t: 0.0 },
        ),
        SpawnKind::Pickup(pickup) => (
            Vec2::new(
                SPAWN_X_NEAR,
                state.rng.random_range(PICKUP_Y_MIN..PICKUP_Y_MAX),
            ),
            EntityKind::Pickup {
                kind: pickup,
                bob_t: 0.0,
            },
        ),
    };

    let id = state.next_entity_id();
    let class = entity_kind.class();
    state.entities.push(Entity::new(id, pos, entity_kind));
    state.push_event(GameEvent::Spawned { id, kind: class });
    log::debug!(
        "Spawned {} #{} at ({:.0}, {:.0})",
        class.name(),
        id,
        pos.x,
        pos.y
    );
    id
}

/// Count the spawn timer down by (time-scaled) `dt` and spawn when it expires
pub fn update_spawner(state: &mut GameState, dt: f32) {
    state.spawn_timer -= dt;
    if state.spawn_timer > 0.0 {
        return;
    }

    let weights = SpawnWeights::for_difficulty(state.difficulty);
    let roll: f32 = state.rng.random();
    spawn_entity(state, weights.choose(roll));

    if state.difficulty >= state.tuning.combo_min_difficulty
        && state.rng.random::<f32>() < state.tuning.combo_chance
    {
        let id = spawn_entity(state, SpawnKind::Coconut);
        if let Some(entity) = state.entities.iter_mut().find(|e| e.id == id) {
            entity.pos.x += COMBO_GAP;
        }
    }

    let jitter = state.rng.random_range(-1.0..=1.0);
    state.spawn_timer = next_interval(&state.tuning, state.difficulty, jitter);
}
