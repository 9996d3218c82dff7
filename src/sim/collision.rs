//! Axis-aligned collision detection and response
//!
//! The player's box shrinks while sliding; every entity kind anchors its box
//! differently relative to its stored position.

use serde::{Deserialize, Serialize};

use super::state::{
    BAT_HIT_H, BAT_HIT_W, COCONUT_H, COCONUT_W, DOG_HIT_H, DOG_HIT_W, Entity, EntityKind,
    GameEvent, GameState, PICKUP_SIZE, PickupKind, Player, RunStatus,
};

/// Axis-aligned rectangle, y growing downward
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Strict overlap; touching edges don't count
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.x + other.w
            && self.x + self.w > other.x
            && self.y < other.y + other.h
            && self.y + self.h > other.y
    }
}

/// The player's hitbox this frame
pub fn player_hitbox(player: &Player) -> Rect {
    let h = player.effective_height();
    Rect::new(player.pos.x, player.pos.y - h, player.w, h)
}

/// An entity's hitbox, anchored per kind
pub fn entity_hitbox(entity: &Entity) -> Rect {
    let p = entity.pos;
    match entity.kind {
        EntityKind::Coconut => Rect::new(p.x, p.y, COCONUT_W, COCONUT_H),
        EntityKind::Bat { .. } => Rect::new(p.x, p.y - BAT_HIT_H, BAT_HIT_W, BAT_HIT_H),
        EntityKind::Falling { radius, .. } => {
            Rect::new(p.x - radius, p.y - radius, radius * 2.0, radius * 2.0)
        }
        EntityKind::Dog { .. } => Rect::new(p.x, p.y - DOG_HIT_H, DOG_HIT_W, DOG_HIT_H),
        EntityKind::Pickup { .. } => Rect::new(p.x, p.y - PICKUP_SIZE, PICKUP_SIZE, PICKUP_SIZE),
    }
}

/// Classified collision verdict
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Contact {
    /// Touched a hazard
    Obstacle { index: usize, id: u32 },
    /// Touched a collectible
    Pickup {
        index: usize,
        id: u32,
        kind: PickupKind,
    },
}

/// First live entity (in list order) overlapping the player
pub fn find_contact(player: &Player, entities: &[Entity]) -> Option<Contact> {
    let pr = player_hitbox(player);
    entities
        .iter()
        .enumerate()
        .filter(|(_, e)| e.can_collide())
        .find(|(_, e)| pr.overlaps(&entity_hitbox(e)))
        .map(|(index, e)| match e.kind {
            EntityKind::Pickup { kind, .. } => Contact::Pickup {
                index,
                id: e.id,
                kind,
            },
            _ => Contact::Obstacle { index, id: e.id },
        })
}

/// Apply this frame's collision verdict to the run
pub fn resolve_collisions(state: &mut GameState) -> Option<Contact> {
    let contact = find_contact(&state.player, &state.entities)?;

    match contact {
        Contact::Pickup { index, kind, .. } => {
            state.entities.remove(index);
            let stored = state.inventory.push(kind);
            log::debug!("Picked up {:?} (stored: {})", kind, stored);
            state.push_event(GameEvent::PickedUp { kind, stored });
        }
        Contact::Obstacle { index, id } => {
            if state.effects.immune() {
                let scroll = state.scroll_speed();
                if let Some(entity) = state.entities.get_mut(index) {
                    entity.kick(scroll);
                }
                let bonus = state.tuning.kick_bonus;
                state.score += bonus;
                log::debug!("Kicked entity {} (+{})", id, bonus);
                state.push_event(GameEvent::Kicked { id, bonus });
            } else if state.status == RunStatus::Running {
                state.end_run();
            }
        }
    }

    Some(contact)
}
