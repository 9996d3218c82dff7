//! Inventory and timed power-up effects

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::state::{GameEvent, GameState, PickupKind};
use crate::consts::INVENTORY_CAPACITY;
use crate::tuning::Tuning;

/// Bounded FIFO of collected pickups
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Inventory {
    items: VecDeque<PickupKind>,
}

impl Inventory {
    /// Store a pickup at the back; returns false if the inventory is full
    pub fn push(&mut self, kind: PickupKind) -> bool {
        if self.is_full() {
            return false;
        }
        self.items.push_back(kind);
        true
    }

    /// Remove the oldest pickup
    pub fn pop_front(&mut self) -> Option<PickupKind> {
        self.items.pop_front()
    }

    pub fn front(&self) -> Option<PickupKind> {
        self.items.front().copied()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= INVENTORY_CAPACITY
    }

    pub fn to_vec(&self) -> Vec<PickupKind> {
        self.items.iter().copied().collect()
    }
}

/// Remaining real seconds of each timed effect
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActiveEffects {
    pub boost_t: f32,
    pub slowmo_t: f32,
}

impl ActiveEffects {
    /// Start (or refresh) the effect of a pickup
    pub fn apply(&mut self, kind: PickupKind, tuning: &Tuning) {
        match kind {
            PickupKind::Boost => self.boost_t = tuning.boost_duration,
            PickupKind::SlowMo => self.slowmo_t = tuning.slowmo_duration,
        }
    }

    /// Count effects down by real (unscaled) time
    pub fn tick(&mut self, real_dt: f32) {
        self.boost_t = (self.boost_t - real_dt).max(0.0);
        self.slowmo_t = (self.slowmo_t - real_dt).max(0.0);
    }

    /// Hazards are kicked away instead of ending the run
    pub fn immune(&self) -> bool {
        self.boost_t > 0.0
    }

    pub fn slowmo(&self) -> bool {
        self.slowmo_t > 0.0
    }

    pub fn time_scale(&self, tuning: &Tuning) -> f32 {
        if self.slowmo() {
            tuning.slowmo_time_scale
        } else {
            1.0
        }
    }

    pub fn jump_multiplier(&self, tuning: &Tuning) -> f32 {
        if self.immune() {
            tuning.boost_jump_mult
        } else {
            1.0
        }
    }

    pub fn scroll_multiplier(&self, tuning: &Tuning) -> f32 {
        if self.immune() {
            tuning.boost_scroll_mult
        } else {
            1.0
        }
    }
}

/// Consume the oldest held item and apply its effect
pub fn use_item(state: &mut GameState) -> Option<PickupKind> {
    let kind = state.inventory.pop_front()?;
    state.effects.apply(kind, &state.tuning);
    state.push_event(GameEvent::ItemUsed { kind });
    log::debug!("Used {:?}", kind);
    Some(kind)
}

/// Throw away the oldest held item
pub fn discard_item(state: &mut GameState) -> Option<PickupKind> {
    let kind = state.inventory.pop_front()?;
    state.push_event(GameEvent::ItemDiscarded { kind });
    log::debug!("Discarded {:?}", kind);
    Some(kind)
}
