//! Game state and core simulation types
//!
//! Everything a run needs lives in [`GameState`]; a reset rebuilds it from
//! scratch.

use glam::Vec2;
use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::items::{ActiveEffects, Inventory};
use super::score::achievement_for_score;
use crate::consts::*;
use crate::tuning::Tuning;

/// Run lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunStatus {
    /// Waiting for the first input
    Idle,
    /// Simulating
    Running,
    /// Run ended; frozen until reset
    Over,
}

/// Slide (duck) phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SlidePhase {
    #[default]
    None,
    /// Crouching down
    In,
    /// Holding the low pose
    Hold,
    /// Standing back up
    Out,
}

/// Slide sub-state machine
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Slide {
    pub phase: SlidePhase,
    /// Animation frame, 0..=SLIDE_LAST_FRAME; drives the hitbox height
    pub frame: u8,
    /// Fractional frame accumulator
    pub accum: f32,
    /// Seconds spent in the hold phase
    pub hold_t: f32,
    /// Slide control currently held down
    pub held: bool,
    /// Slide requested while airborne, fires on landing
    pub queued: bool,
}

impl Slide {
    pub fn is_active(&self) -> bool {
        self.phase != SlidePhase::None
    }

    /// Enter the `In` phase from `None`
    pub fn start(&mut self) {
        if self.phase == SlidePhase::None {
            self.phase = SlidePhase::In;
            self.frame = 0;
            self.accum = 0.0;
            self.hold_t = 0.0;
        }
    }

    /// Jump to the standing-up frames
    pub fn enter_out(&mut self) {
        self.phase = SlidePhase::Out;
        self.frame = self.frame.max(SLIDE_OUT_FIRST_FRAME);
        self.accum = 0.0;
    }

    /// Return to `None`, clearing timers (the held flag survives for chaining)
    pub fn finish(&mut self) {
        self.phase = SlidePhase::None;
        self.frame = 0;
        self.accum = 0.0;
        self.hold_t = 0.0;
    }
}

/// The runner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// x is the fixed lane, y the feet (bottom of the hitbox)
    pub pos: Vec2,
    /// Vertical velocity (negative is up)
    pub vy: f32,
    pub w: f32,
    pub h: f32,
    pub on_ground: bool,
    pub slide: Slide,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: Vec2::new(PLAYER_X, GROUND_Y),
            vy: 0.0,
            w: PLAYER_W,
            h: PLAYER_H,
            on_ground: true,
            slide: Slide::default(),
        }
    }
}

/// Collectible item types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PickupKind {
    /// Immunity plus a speed and jump-height boost
    Boost,
    /// Slows simulation time
    SlowMo,
}

// Ground coconut
pub const COCONUT_W: f32 = 26.0;
pub const COCONUT_H: f32 = 22.0;
pub const COCONUT_GROUND_Y_OFFSET: f32 = 20.0;
/// Falling coconuts settle here (top of the ground hitbox)
pub const COCONUT_LAND_Y_OFFSET: f32 = 22.0;

// Bat
pub const BAT_HIT_W: f32 = 36.0;
pub const BAT_HIT_H: f32 = 18.0;
pub const BAT_SPEED: f32 = 1.2;
pub const BAT_WIGGLE_RATE: f32 = 6.5;
pub const BAT_WIGGLE_AMP: f32 = 10.0;

// Falling coconut
pub const FALL_RADIUS: f32 = 12.0;
pub const FALL_START_Y: f32 = 60.0;

// Dog
pub const DOG_HIT_W: f32 = 34.0;
pub const DOG_HIT_H: f32 = 22.0;
pub const DOG_SPEED: f32 = 1.12;
pub const DOG_Y_OFFSET: f32 = 10.0;

// Pickups
pub const PICKUP_SIZE: f32 = 20.0;

// Kicked hazards
pub const KICK_LAUNCH_VY: f32 = -520.0;
pub const KICK_SCROLL_FRACTION: f32 = 0.5;
pub const KICK_SPIN_RATE: f32 = 12.0;

/// Entity variants and their per-kind motion accumulators
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EntityKind {
    /// Ground hazard; `pos` is the top-left of its hitbox
    Coconut,
    /// Flying hazard; `pos.y` is the bottom of its hitbox
    Bat { anim_t: f32, wiggle_t: f32 },
    /// Falling hazard; `pos` is the centre
    Falling { radius: f32, vy: f32 },
    /// Faster ground hazard; `pos.y` is the bottom of its hitbox
    Dog { anim_t: f32 },
    /// Collectible; `pos.y` is the bottom of its hitbox
    Pickup { kind: PickupKind, bob_t: f32 },
}

/// Entity kind without its per-kind state, for events and render views
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityClass {
    Coconut,
    Bat,
    Falling,
    Dog,
    Pickup,
}

impl EntityClass {
    pub fn name(self) -> &'static str {
        match self {
            EntityClass::Coconut => "coconut",
            EntityClass::Bat => "bat",
            EntityClass::Falling => "falling",
            EntityClass::Dog => "dog",
            EntityClass::Pickup => "pickup",
        }
    }

    /// Hazards that stay on (or land on) the running surface
    pub fn is_ground_hazard(self) -> bool {
        matches!(
            self,
            EntityClass::Coconut | EntityClass::Dog | EntityClass::Falling
        )
    }
}

impl EntityKind {
    pub fn is_pickup(&self) -> bool {
        matches!(self, EntityKind::Pickup { .. })
    }

    pub fn class(&self) -> EntityClass {
        match self {
            EntityKind::Coconut => EntityClass::Coconut,
            EntityKind::Bat { .. } => EntityClass::Bat,
            EntityKind::Falling { .. } => EntityClass::Falling,
            EntityKind::Dog { .. } => EntityClass::Dog,
            EntityKind::Pickup { .. } => EntityClass::Pickup,
        }
    }

    pub fn name(&self) -> &'static str {
        self.class().name()
    }
}

/// Ballistic exit of a hazard knocked away by an immune player
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Kick {
    pub vel: Vec2,
    pub spin: f32,
}

/// An obstacle or pickup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: u32,
    pub pos: Vec2,
    pub kind: EntityKind,
    /// Set once the entity has been kicked; kicked entities never collide
    pub kicked: Option<Kick>,
}

impl Entity {
    pub fn new(id: u32, pos: Vec2, kind: EntityKind) -> Self {
        Self {
            id,
            pos,
            kind,
            kicked: None,
        }
    }

    pub fn can_collide(&self) -> bool {
        self.kicked.is_none()
    }

    /// Turn a falling coconut into a ground coconut resting at `land_y`.
    ///
    /// Returns false (and changes nothing) for any other kind.
    pub fn land(&mut self, land_y: f32) -> bool {
        match self.kind {
            EntityKind::Falling { .. } => {
                self.pos.y = land_y;
                self.kind = EntityKind::Coconut;
                true
            }
            _ => false,
        }
    }

    /// Knock the hazard away; it keeps drifting left while it arcs off screen
    pub fn kick(&mut self, scroll: f32) {
        if self.kicked.is_none() {
            self.kicked = Some(Kick {
                vel: Vec2::new(-scroll * KICK_SCROLL_FRACTION, KICK_LAUNCH_VY),
                spin: 0.0,
            });
        }
    }
}

/// Decorative palm tree; anchors falling coconuts
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub x: f32,
}

/// Palm positions at the start of a run
pub const MARKER_START_X: [f32; 4] = [650.0, 980.0, 1310.0, 1700.0];

/// Events kept when the host never drains them; the oldest are dropped
pub const MAX_PENDING_EVENTS: usize = 256;

/// Discrete things that happened during a step, drained by the host
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum GameEvent {
    RunStarted,
    Spawned { id: u32, kind: EntityClass },
    Landed { id: u32 },
    PickedUp { kind: PickupKind, stored: bool },
    ItemUsed { kind: PickupKind },
    ItemDiscarded { kind: PickupKind },
    Kicked { id: u32, bonus: f32 },
    GameOver { score: u32, achievement: &'static str },
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed this run was created with
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub tuning: Tuning,
    pub status: RunStatus,
    /// Real seconds spent running
    pub elapsed: f32,
    pub score: f32,
    /// Scales scroll speed, score rate and spawn frequency
    pub difficulty: f32,
    pub player: Player,
    /// Live obstacles and pickups, in spawn order
    pub entities: Vec<Entity>,
    pub markers: Vec<Marker>,
    /// Seconds until the next spawn
    pub spawn_timer: f32,
    pub inventory: Inventory,
    pub effects: ActiveEffects,
    /// Pending events, oldest first; capped at MAX_PENDING_EVENTS
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a new game state with the given seed
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            tuning,
            status: RunStatus::Idle,
            elapsed: 0.0,
            score: 0.0,
            difficulty: 1.0,
            player: Player::default(),
            entities: Vec::new(),
            markers: MARKER_START_X.iter().map(|&x| Marker { x }).collect(),
            spawn_timer: 0.0,
            inventory: Inventory::default(),
            effects: ActiveEffects::default(),
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Rebuild every piece of run state. The next seed is drawn from the
    /// current RNG so a session stays reproducible from its first seed.
    pub fn reset(&mut self) {
        let seed = self.rng.next_u64();
        let tuning = std::mem::take(&mut self.tuning);
        let events = std::mem::take(&mut self.events);
        *self = Self::new(seed, tuning);
        self.events = events;
        log::info!("Run reset (seed {})", seed);
    }

    /// Queue an event for the host, dropping the oldest once the cap is hit
    pub fn push_event(&mut self, event: GameEvent) {
        if self.events.len() >= MAX_PENDING_EVENTS {
            self.events.remove(0);
        }
        self.events.push(event);
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Idle -> Running, only once assets are ready
    pub fn try_start(&mut self, assets_ready: bool) -> bool {
        if self.status == RunStatus::Idle && assets_ready {
            self.status = RunStatus::Running;
            self.push_event(GameEvent::RunStarted);
            log::info!("Run started (seed {})", self.seed);
        }
        self.status == RunStatus::Running
    }

    /// Running -> Over
    pub fn end_run(&mut self) {
        if self.status != RunStatus::Running {
            return;
        }
        self.status = RunStatus::Over;
        let score = self.final_score();
        let achievement = achievement_for_score(score);
        log::info!("Game over: {} ({})", score, achievement);
        self.push_event(GameEvent::GameOver { score, achievement });
    }

    /// Integer score reported to the leaderboard
    pub fn final_score(&self) -> u32 {
        self.score.max(0.0).floor() as u32
    }

    /// Horizontal world speed (px/s) before time scaling
    pub fn scroll_speed(&self) -> f32 {
        self.tuning.base_scroll * self.difficulty * self.effects.scroll_multiplier(&self.tuning)
    }

    /// Simulation time multiplier from active effects
    pub fn time_scale(&self) -> f32 {
        self.effects.time_scale(&self.tuning)
    }
}
