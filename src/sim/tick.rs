//! Simulation step
//!
//! Applies this frame's input intents, then advances the run by one step.

use serde::{Deserialize, Serialize};

use super::collision::resolve_collisions;
use super::items::{discard_item, use_item};
use super::motion::{advance_entities, advance_markers};
use super::score::accrue;
use super::spawn::update_spawner;
use super::state::{GameState, RunStatus};

/// Discrete input from the host, independent of the originating device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intent {
    JumpPress,
    JumpRelease,
    SlidePress,
    SlideRelease,
    UseItem,
    DiscardItem,
    Reset,
}

/// Input for a single step
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Intents in the order they arrived
    pub intents: Vec<Intent>,
    /// Visual assets are loaded; the run may start
    pub assets_ready: bool,
}

/// Apply one intent. Anything not allowed in the current state is a no-op.
pub fn apply_intent(state: &mut GameState, intent: Intent, assets_ready: bool) {
    match intent {
        Intent::Reset => state.reset(),
        Intent::JumpPress => {
            if state.try_start(assets_ready) {
                let velocity =
                    state.tuning.jump_velocity * state.effects.jump_multiplier(&state.tuning);
                state.player.jump(velocity);
            }
        }
        Intent::JumpRelease => {
            if state.status == RunStatus::Running {
                state.player.cut_jump(state.tuning.jump_cut);
            }
        }
        Intent::SlidePress => {
            if state.try_start(assets_ready) {
                state.player.begin_slide();
            }
        }
        Intent::SlideRelease => {
            if state.status == RunStatus::Running {
                state.player.end_slide();
            }
        }
        Intent::UseItem => {
            if state.status == RunStatus::Running {
                use_item(state);
            }
        }
        Intent::DiscardItem => {
            if state.status == RunStatus::Running {
                discard_item(state);
            }
        }
    }
}

/// Advance the game by one step of `dt` real seconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    for &intent in &input.intents {
        apply_intent(state, intent, input.assets_ready);
    }

    // Idle and game-over screens don't simulate
    if state.status != RunStatus::Running {
        return;
    }

    let real_dt = dt.max(0.0);
    // Slow motion scales all motion; score and effect timers run on real time
    let sim_dt = real_dt * state.time_scale();

    accrue(state, real_dt);
    state.effects.tick(real_dt);

    state.player.step(sim_dt, &state.tuning);

    let scroll = state.scroll_speed();
    advance_markers(&mut state.markers, scroll, sim_dt, &mut state.rng);
    update_spawner(state, sim_dt);
    advance_entities(state, scroll, sim_dt);

    resolve_collisions(state);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::state::{
        COCONUT_GROUND_Y_OFFSET, Entity, EntityKind, GameEvent, PickupKind, SlidePhase,
    };
    use crate::tuning::Tuning;
    use glam::Vec2;
    use proptest::prelude::*;

    const DT: f32 = 1.0 / 60.0;

    fn input(intents: &[Intent]) -> TickInput {
        TickInput {
            intents: intents.to_vec(),
            assets_ready: true,
        }
    }

    /// Running state with spawning pushed far into the future
    fn quiet_running_state() -> GameState {
        let mut state = GameState::new(12345, Tuning::default());
        state.try_start(true);
        state.spawn_timer = f32::MAX;
        state
    }

    #[test]
    fn test_tick_idle_to_running() {
        let mut state = GameState::new(12345, Tuning::default());
        assert_eq!(state.status, RunStatus::Idle);

        // No input: stays idle and nothing moves
        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.status, RunStatus::Idle);
        assert_eq!(state.score, 0.0);

        tick(&mut state, &input(&[Intent::JumpPress]), DT);
        assert_eq!(state.status, RunStatus::Running);
        assert!(!state.player.on_ground);
        assert!(state.events.contains(&GameEvent::RunStarted));
    }

    #[test]
    fn test_not_ready_blocks_start() {
        let mut state = GameState::new(12345, Tuning::default());
        let not_ready = TickInput {
            intents: vec![Intent::JumpPress, Intent::SlidePress],
            assets_ready: false,
        };
        tick(&mut state, &not_ready, DT);
        assert_eq!(state.status, RunStatus::Idle);
        assert!(state.player.on_ground);
        assert_eq!(state.player.slide.phase, SlidePhase::None);
    }

    #[test]
    fn test_slide_press_starts_run() {
        let mut state = GameState::new(12345, Tuning::default());
        tick(&mut state, &input(&[Intent::SlidePress]), DT);
        assert_eq!(state.status, RunStatus::Running);
        assert_eq!(state.player.slide.phase, SlidePhase::In);
    }

    #[test]
    fn test_double_jump_press_same_frame() {
        let mut a = quiet_running_state();
        let mut b = quiet_running_state();
        tick(&mut a, &input(&[Intent::JumpPress]), DT);
        tick(&mut b, &input(&[Intent::JumpPress, Intent::JumpPress]), DT);
        assert_eq!(a.player, b.player);
    }

    #[test]
    fn test_short_hop_is_lower() {
        let mut full = quiet_running_state();
        let mut short = quiet_running_state();
        tick(&mut full, &input(&[Intent::JumpPress]), DT);
        tick(&mut short, &input(&[Intent::JumpPress, Intent::JumpRelease]), DT);

        let mut full_apex = GROUND_Y;
        let mut short_apex = GROUND_Y;
        for _ in 0..60 {
            tick(&mut full, &TickInput::default(), DT);
            tick(&mut short, &TickInput::default(), DT);
            full_apex = full_apex.min(full.player.pos.y);
            short_apex = short_apex.min(short.player.pos.y);
        }
        assert!(short_apex > full_apex);
    }

    #[test]
    fn test_ground_hazard_scenario_ends_run() {
        let mut state = quiet_running_state();
        let id = state.next_entity_id();
        state.entities.push(Entity::new(
            id,
            Vec2::new(FIELD_WIDTH + 40.0, GROUND_Y - COCONUT_GROUND_Y_OFFSET),
            EntityKind::Coconut,
        ));

        let mut frames = 0;
        while state.status == RunStatus::Running && frames < 600 {
            tick(&mut state, &TickInput::default(), DT);
            frames += 1;
        }
        assert_eq!(state.status, RunStatus::Over);
        let x = state.entities[0].pos.x;
        assert!(x < PLAYER_X + PLAYER_W && x + 26.0 > PLAYER_X);
        assert!(
            state
                .events
                .iter()
                .any(|e| matches!(e, GameEvent::GameOver { .. }))
        );

        // Frozen: further ticks change nothing
        let score = state.score;
        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.score, score);
        assert_eq!(state.entities[0].pos.x, x);
    }

    #[test]
    fn test_immune_collision_kicks() {
        let mut state = quiet_running_state();
        state.inventory.push(PickupKind::Boost);
        tick(&mut state, &input(&[Intent::UseItem]), DT);
        assert!(state.effects.immune());

        let id = state.next_entity_id();
        state.entities.push(Entity::new(
            id,
            Vec2::new(PLAYER_X + 10.0, GROUND_Y - COCONUT_GROUND_Y_OFFSET),
            EntityKind::Coconut,
        ));
        let before = state.score;
        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.status, RunStatus::Running);
        assert!(state.entities[0].kicked.is_some());
        assert!(state.score >= before + state.tuning.kick_bonus);
    }

    #[test]
    fn test_slowmo_keeps_score_rate() {
        let mut normal = quiet_running_state();
        let mut slow = quiet_running_state();
        slow.effects.apply(PickupKind::SlowMo, &slow.tuning);
        let id = slow.next_entity_id();
        slow.entities.push(Entity::new(
            id,
            Vec2::new(800.0, GROUND_Y - COCONUT_GROUND_Y_OFFSET),
            EntityKind::Coconut,
        ));
        let id = normal.next_entity_id();
        normal.entities.push(Entity::new(
            id,
            Vec2::new(800.0, GROUND_Y - COCONUT_GROUND_Y_OFFSET),
            EntityKind::Coconut,
        ));

        for _ in 0..30 {
            tick(&mut normal, &TickInput::default(), DT);
            tick(&mut slow, &TickInput::default(), DT);
        }
        assert!((normal.score - slow.score).abs() < 1e-3);
        // The world moved less under slow motion
        assert!(slow.entities[0].pos.x > normal.entities[0].pos.x);
    }

    #[test]
    fn test_items_ignored_when_idle() {
        let mut state = GameState::new(1, Tuning::default());
        state.inventory.push(PickupKind::SlowMo);
        tick(
            &mut state,
            &TickInput {
                intents: vec![Intent::UseItem, Intent::DiscardItem],
                assets_ready: false,
            },
            DT,
        );
        assert_eq!(state.inventory.len(), 1);
        assert!(!state.effects.slowmo());
    }

    #[test]
    fn test_discard_item() {
        let mut state = quiet_running_state();
        state.inventory.push(PickupKind::SlowMo);
        state.inventory.push(PickupKind::Boost);
        tick(&mut state, &input(&[Intent::DiscardItem]), DT);
        assert_eq!(state.inventory.to_vec(), vec![PickupKind::Boost]);
        assert!(!state.effects.slowmo());
    }

    #[test]
    fn test_reset_restores_initial_values() {
        let mut state = quiet_running_state();
        state.inventory.push(PickupKind::Boost);
        tick(&mut state, &input(&[Intent::UseItem, Intent::JumpPress]), DT);
        for _ in 0..20 {
            tick(&mut state, &TickInput::default(), DT);
        }
        state.spawn_timer = 0.0;
        tick(&mut state, &input(&[Intent::SlidePress]), DT);
        state.end_run();

        tick(&mut state, &input(&[Intent::Reset]), DT);
        let fresh = GameState::new(state.seed, Tuning::default());
        assert_eq!(state.status, RunStatus::Idle);
        assert_eq!(state.player, fresh.player);
        assert!(state.entities.is_empty());
        assert_eq!(state.spawn_timer, 0.0);
        assert_eq!(state.difficulty, 1.0);
        assert_eq!(state.score, 0.0);
        assert_eq!(state.elapsed, 0.0);
        assert!(state.inventory.is_empty());
        assert_eq!(state.effects, fresh.effects);
        assert_eq!(state.markers, fresh.markers);
    }

    #[test]
    fn test_determinism() {
        // Same seed and inputs produce identical runs
        let mut state1 = GameState::new(99999, Tuning::default());
        let mut state2 = GameState::new(99999, Tuning::default());

        let script = [
            input(&[Intent::JumpPress]),
            TickInput::default(),
            input(&[Intent::JumpRelease]),
            TickInput::default(),
            input(&[Intent::SlidePress]),
        ];

        for _ in 0..40 {
            for step in &script {
                tick(&mut state1, step, DT);
                tick(&mut state2, step, DT);
            }
        }

        assert_eq!(state1.status, state2.status);
        assert_eq!(state1.score, state2.score);
        assert_eq!(state1.entities, state2.entities);
        assert_eq!(state1.player, state2.player);
    }

    proptest! {
        #[test]
        fn prop_score_and_difficulty_monotonic(seed in any::<u64>(), steps in 1usize..400) {
            let mut state = GameState::new(seed, Tuning::default());
            tick(&mut state, &input(&[Intent::JumpPress]), DT);
            for _ in 0..steps {
                let (score, difficulty) = (state.score, state.difficulty);
                tick(&mut state, &TickInput::default(), DT);
                prop_assert!(state.score >= score);
                prop_assert!(state.difficulty >= difficulty);
            }
        }
    }
}
