//! Difficulty ramp, score accrual and milestone labels

use super::state::GameState;

/// Score thresholds and their labels, highest first
pub const ACHIEVEMENTS: [(u32, &str); 5] = [
    (1800, "Destroyer of coconuts"),
    (1300, "Island sprint legend"),
    (900, "Bat dodger"),
    (500, "Coconut dodger"),
    (200, "Palm trainee"),
];

/// Label for scores below every threshold
pub const DEFAULT_ACHIEVEMENT: &str = "Coconut apprentice";

/// Difficulty multiplier after `elapsed` real seconds
#[inline]
pub fn difficulty_for_elapsed(elapsed: f32, ramp: f32) -> f32 {
    1.0 + elapsed.max(0.0) * ramp
}

/// Milestone label for a final score
pub fn achievement_for_score(score: u32) -> &'static str {
    ACHIEVEMENTS
        .iter()
        .find(|(threshold, _)| score >= *threshold)
        .map(|(_, label)| *label)
        .unwrap_or(DEFAULT_ACHIEVEMENT)
}

/// Advance run time, difficulty and score by real (unscaled) time
pub fn accrue(state: &mut GameState, real_dt: f32) {
    let real_dt = real_dt.max(0.0);
    state.elapsed += real_dt;
    state.difficulty = difficulty_for_elapsed(state.elapsed, state.tuning.speed_ramp);
    state.score += real_dt * state.tuning.score_rate * state.difficulty;
}
