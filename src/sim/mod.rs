//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Delta time is always an explicit parameter
//! - Seeded RNG only
//! - Stable iteration order (entity list order, ids ascending)
//! - No rendering or platform dependencies

pub mod collision;
pub mod items;
pub mod motion;
pub mod player;
pub mod score;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{Contact, Rect, entity_hitbox, find_contact, player_hitbox};
pub use items::{ActiveEffects, Inventory};
pub use score::{achievement_for_score, difficulty_for_elapsed};
pub use state::{
    Entity, EntityClass, EntityKind, GameEvent, GameState, Kick, Marker, PickupKind, Player,
    RunStatus, Slide, SlidePhase,
};
pub use tick::{Intent, TickInput, tick};
