//! Coconut Dash headless runner
//!
//! Plays one run with a simple autopilot at 60 frames per second, then offers
//! the result to a JSON-file leaderboard.
//!
//! Usage: `coconut-dash [seed] [name]`
//! - `COCONUT_TUNING`: optional path to a tuning JSON file
//! - `COCONUT_SCORES`: leaderboard file (default `highscores.json`)
//! - `RUST_LOG`: log filter

use std::time::{SystemTime, UNIX_EPOCH};

use coconut_dash::consts::*;
use coconut_dash::engine::{EntityView, Snapshot};
use coconut_dash::highscores::{FileLeaderboard, LeaderboardService, SubmitRequest};
use coconut_dash::sim::{EntityClass, GameEvent, Intent, RunStatus};
use coconut_dash::{Engine, Tuning};

const FRAME_MS: f64 = 1000.0 / 60.0;
/// Give up after ten minutes of game time
const MAX_FRAMES: u32 = 60 * 600;
/// How far ahead of the player the autopilot reacts (px)
const LOOKAHEAD: f32 = 70.0;

/// Reacts to whatever is about to reach the player lane
#[derive(Debug, Default)]
struct Autopilot {
    sliding: bool,
}

impl Autopilot {
    fn decide(&mut self, snap: &Snapshot) -> Vec<Intent> {
        let mut intents = Vec::new();
        if snap.status != RunStatus::Running {
            return intents;
        }

        let player = &snap.player;
        let standing_top = GROUND_Y - PLAYER_H;
        let ahead = |e: &&EntityView| {
            !e.kicked
                && e.hitbox.x + e.hitbox.w > player.pos.x
                && e.hitbox.x < player.pos.x + PLAYER_W + LOOKAHEAD
        };

        let threats: Vec<&EntityView> = snap
            .entities
            .iter()
            .filter(ahead)
            .filter(|e| e.pickup.is_none())
            .collect();
        let low_flyer = threats
            .iter()
            .any(|e| e.kind == EntityClass::Bat && e.hitbox.y + e.hitbox.h > standing_top);
        let ground = threats.iter().any(|e| e.kind.is_ground_hazard());

        if !threats.is_empty() && !snap.effects.immune && !snap.inventory.is_empty() {
            intents.push(Intent::UseItem);
        }

        if low_flyer && !ground {
            if !self.sliding {
                intents.push(Intent::SlidePress);
                self.sliding = true;
            }
        } else {
            if self.sliding {
                intents.push(Intent::SlideRelease);
                self.sliding = false;
            }
            if ground && player.on_ground {
                intents.push(Intent::JumpPress);
            }
        }
        intents
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or(0)
        });
    let name = args.next();

    let tuning = match std::env::var("COCONUT_TUNING") {
        Ok(path) => Tuning::load_or_default(path),
        Err(_) => Tuning::default(),
    };
    let scores_path =
        std::env::var("COCONUT_SCORES").unwrap_or_else(|_| "highscores.json".to_string());

    log::info!("Coconut Dash (native) starting, seed {}", seed);

    let mut engine = Engine::new(seed, tuning);
    let mut pilot = Autopilot::default();
    let mut now_ms = 0.0;

    engine.set_ready(true);
    let mut snap = engine.frame(now_ms, &[Intent::JumpPress]);

    let mut frames = 0;
    let mut report = None;
    while report.is_none() && frames < MAX_FRAMES {
        now_ms += FRAME_MS;
        let intents = pilot.decide(&snap);
        snap = engine.frame(now_ms, &intents);
        frames += 1;

        for event in engine.drain_events() {
            match event {
                GameEvent::GameOver { score, achievement } => report = Some((score, achievement)),
                GameEvent::Kicked { id, bonus } => println!("  kicked #{} (+{})", id, bonus),
                GameEvent::ItemUsed { kind } => println!("  used {:?}", kind),
                _ => {}
            }
        }
    }

    let Some((score, achievement)) = report else {
        println!(
            "Autopilot survived {} frames, score {}; stopping",
            frames, snap.score
        );
        return;
    };
    println!(
        "Game over after {:.1}s: {} points ({})",
        engine.state().elapsed,
        score,
        achievement
    );

    let mut board = FileLeaderboard::open(&scores_path);
    if !engine.should_submit(&board.scores().entries) {
        println!("Not a Top-{} score", coconut_dash::highscores::MAX_HIGH_SCORES);
        return;
    }

    let request = SubmitRequest {
        name,
        score: Some(score as f64),
        achievement: Some(achievement.to_string()),
    };
    match board.submit_score(&request) {
        Ok(response) => {
            println!("\nTop scores:");
            for (i, entry) in response.scores.iter().enumerate() {
                println!(
                    "{:>2}. {:<18} {:>8}  {}",
                    i + 1,
                    entry.name,
                    entry.score,
                    entry.achievement
                );
            }
        }
        Err(e) => log::warn!("Could not submit score: {}", e),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Web hosts drive `Engine` directly through the library
}
