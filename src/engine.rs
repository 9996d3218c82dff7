//! Engine aggregate
//!
//! Owns the game state, the frame clock and the asset ready gate. Hosts drive
//! it once per animation frame and read back an immutable [`Snapshot`] to
//! render.

use glam::Vec2;
use serde::Serialize;

use crate::clock::FrameClock;
use crate::highscores::{self, ScoreEntry};
use crate::sim::{
    EntityClass, EntityKind, GameEvent, GameState, Intent, PickupKind, Rect, RunStatus, SlidePhase, TickInput,
    achievement_for_score, entity_hitbox, player_hitbox, tick,
};
use crate::tuning::Tuning;

/// Player pose for rendering
#[derive(Debug, Clone, Serialize)]
pub struct PlayerView {
    pub pos: Vec2,
    pub on_ground: bool,
    pub slide_phase: SlidePhase,
    pub slide_frame: u8,
    pub hitbox: Rect,
}

/// One live entity for rendering
#[derive(Debug, Clone, Serialize)]
pub struct EntityView {
    pub id: u32,
    pub kind: EntityClass,
    pub pickup: Option<PickupKind>,
    pub pos: Vec2,
    pub hitbox: Rect,
    pub kicked: bool,
    /// Kick rotation in radians, 0 unless kicked
    pub spin: f32,
}

/// Timed effect flags and remaining time
#[derive(Debug, Clone, Serialize)]
pub struct EffectsView {
    pub immune: bool,
    pub boost_remaining: f32,
    pub slowmo: bool,
    pub slowmo_remaining: f32,
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub status: RunStatus,
    pub ready: bool,
    pub player: PlayerView,
    pub entities: Vec<EntityView>,
    pub markers: Vec<f32>,
    /// Floored score shown in the HUD
    pub score: u32,
    pub raw_score: f32,
    pub difficulty: f32,
    pub achievement: &'static str,
    pub inventory: Vec<PickupKind>,
    pub effects: EffectsView,
}

impl Snapshot {
    pub fn capture(state: &GameState, ready: bool) -> Self {
        let player = &state.player;
        let score = state.final_score();

        Self {
            status: state.status,
            ready,
            player: PlayerView {
                pos: player.pos,
                on_ground: player.on_ground,
                slide_phase: player.slide.phase,
                slide_frame: player.slide.frame,
                hitbox: player_hitbox(player),
            },
            entities: state
                .entities
                .iter()
                .map(|e| EntityView {
                    id: e.id,
                    kind: e.kind.class(),
                    pickup: match e.kind {
                        EntityKind::Pickup { kind, .. } => Some(kind),
                        _ => None,
                    },
                    pos: e.pos,
                    hitbox: entity_hitbox(e),
                    kicked: e.kicked.is_some(),
                    spin: e.kicked.map(|k| k.spin).unwrap_or(0.0),
                })
                .collect(),
            markers: state.markers.iter().map(|m| m.x).collect(),
            score,
            raw_score: state.score,
            difficulty: state.difficulty,
            achievement: achievement_for_score(score),
            inventory: state.inventory.to_vec(),
            effects: EffectsView {
                immune: state.effects.immune(),
                boost_remaining: state.effects.boost_t,
                slowmo: state.effects.slowmo(),
                slowmo_remaining: state.effects.slowmo_t,
            },
        }
    }
}

/// The game engine: simulation state plus loop bookkeeping
#[derive(Debug, Clone)]
pub struct Engine {
    state: GameState,
    clock: FrameClock,
    ready: bool,
}

impl Engine {
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        log::info!("Engine created (seed {})", seed);
        Self {
            state: GameState::new(seed, tuning),
            clock: FrameClock::new(),
            ready: false,
        }
    }

    /// Asset layer reports whether visuals are loaded
    pub fn set_ready(&mut self, ready: bool) {
        if ready != self.ready {
            log::info!("Assets ready: {}", ready);
        }
        self.ready = ready;
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Animation-frame callback. `now_ms` is the host's monotonic timestamp;
    /// the first call after creation or reset steps with dt = 0.
    pub fn frame(&mut self, now_ms: f64, intents: &[Intent]) -> Snapshot {
        let dt = self.clock.advance(now_ms);
        self.step(dt, intents)
    }

    /// Apply intents and advance by `dt` seconds
    pub fn step(&mut self, dt: f32, intents: &[Intent]) -> Snapshot {
        let input = TickInput {
            intents: intents.to_vec(),
            assets_ready: self.ready,
        };
        tick(&mut self.state, &input, dt);
        if intents.contains(&Intent::Reset) {
            self.clock.restart();
        }
        self.snapshot()
    }

    /// Back to idle with fresh state; pending events are kept
    pub fn reset(&mut self) {
        self.state.reset();
        self.clock.restart();
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.state, self.ready)
    }

    /// Take the events produced since the last drain. Hosts should drain
    /// once per frame; undrained events are capped at `MAX_PENDING_EVENTS`.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.state.events)
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn status(&self) -> RunStatus {
        self.state.status
    }

    /// Whether the finished run earns a leaderboard prompt against `top`
    pub fn should_submit(&self, top: &[ScoreEntry]) -> bool {
        self.state.status == RunStatus::Over && highscores::qualifies(top, self.state.final_score())
    }
}
