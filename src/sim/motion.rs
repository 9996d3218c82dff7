//! World scrolling: palm markers and entity motion

use rand::Rng;

use super::state::{
    BAT_SPEED, BAT_WIGGLE_AMP, BAT_WIGGLE_RATE, COCONUT_LAND_Y_OFFSET, DOG_SPEED, DOG_Y_OFFSET,
    EntityKind, GameEvent, GameState, KICK_SPIN_RATE, Marker,
};
use crate::consts::*;

/// Palms wrap once fully past this x
pub const MARKER_WRAP_X: f32 = -200.0;
/// Random gap between the furthest palm and a wrapped one
pub const MARKER_GAP_MIN: f32 = 260.0;
pub const MARKER_GAP_MAX: f32 = 420.0;

/// Scroll palms left and recycle the ones that left the screen
pub fn advance_markers<R: Rng>(markers: &mut [Marker], scroll: f32, dt: f32, rng: &mut R) {
    for marker in markers.iter_mut() {
        marker.x -= scroll * dt;
    }

    let mut max_x = markers.iter().map(|m| m.x).fold(f32::MIN, f32::max);
    for marker in markers.iter_mut() {
        if marker.x < MARKER_WRAP_X {
            marker.x = max_x + rng.random_range(MARKER_GAP_MIN..MARKER_GAP_MAX);
            max_x = marker.x;
        }
    }
}

/// Move every entity by one (time-scaled) step, land falling coconuts and
/// drop whatever left the field
pub fn advance_entities(state: &mut GameState, scroll: f32, dt: f32) {
    let land_y = GROUND_Y - COCONUT_LAND_Y_OFFSET;
    let gravity = state.tuning.gravity;
    let mut landed = Vec::new();

    for entity in state.entities.iter_mut() {
        if let Some(kick) = entity.kicked.as_mut() {
            entity.pos += kick.vel * dt;
            kick.vel.y += gravity * dt;
            kick.spin += KICK_SPIN_RATE * dt;
            continue;
        }

        match &mut entity.kind {
            EntityKind::Coconut => {
                entity.pos.x -= scroll * dt;
            }
            EntityKind::Bat { anim_t, wiggle_t } => {
                entity.pos.x -= scroll * BAT_SPEED * dt;
                *anim_t += dt;
                *wiggle_t += dt * BAT_WIGGLE_RATE;
                entity.pos.y += wiggle_t.sin() * BAT_WIGGLE_AMP * dt;
            }
            EntityKind::Falling { vy, .. } => {
                entity.pos.x -= scroll * dt;
                entity.pos.y += *vy * dt;
            }
            EntityKind::Dog { anim_t } => {
                entity.pos.x -= scroll * DOG_SPEED * dt;
                *anim_t += dt;
                entity.pos.y = GROUND_Y + DOG_Y_OFFSET;
            }
            EntityKind::Pickup { bob_t, .. } => {
                entity.pos.x -= scroll * dt;
                *bob_t += dt;
            }
        }

        if matches!(entity.kind, EntityKind::Falling { .. })
            && entity.pos.y >= land_y
            && entity.land(land_y)
        {
            log::debug!("Coconut {} landed", entity.id);
            landed.push(entity.id);
        }
    }
    for id in landed {
        state.push_event(GameEvent::Landed { id });
    }

    state.entities.retain(|e| {
        e.pos.x >= DESPAWN_X && e.pos.y >= DESPAWN_TOP && e.pos.y <= DESPAWN_BOTTOM
    });
}
