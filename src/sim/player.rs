//! Player physics and the slide state machine

use super::state::{Player, SlidePhase};
use crate::consts::*;
use crate::tuning::Tuning;

/// Hitbox height for a slide animation frame.
///
/// Full height at the boundary frames, low at the two middle frames and the
/// mean of both on the transitional frames.
pub fn slide_height(frame: u8, full: f32) -> f32 {
    match frame {
        0 | 5 => full,
        1 | 4 => (full + SLIDE_LOW_H) / 2.0,
        _ => SLIDE_LOW_H,
    }
}

impl Player {
    /// Start a jump with the given upward speed.
    ///
    /// Only allowed from the ground and while not sliding.
    pub fn jump(&mut self, velocity: f32) -> bool {
        if !self.on_ground || self.slide.is_active() {
            return false;
        }
        self.vy = -velocity;
        self.on_ground = false;
        true
    }

    /// Shorten the jump if still rising
    pub fn cut_jump(&mut self, factor: f32) {
        if self.vy < 0.0 {
            self.vy *= factor;
        }
    }

    /// Slide control pressed
    pub fn begin_slide(&mut self) {
        self.slide.held = true;
        if !self.on_ground {
            self.slide.queued = true;
            return;
        }
        self.slide.start();
    }

    /// Slide control released
    pub fn end_slide(&mut self) {
        self.slide.held = false;
        if !self.on_ground && self.slide.phase == SlidePhase::None {
            self.slide.queued = false;
            return;
        }
        if matches!(self.slide.phase, SlidePhase::In | SlidePhase::Hold) {
            self.slide.enter_out();
        }
    }

    /// Height of the collision box this frame
    pub fn effective_height(&self) -> f32 {
        if self.slide.is_active() {
            slide_height(self.slide.frame, self.h)
        } else {
            self.h
        }
    }

    /// Vertical integration; returns true if the player is resting on the ground
    pub fn integrate(&mut self, dt: f32, gravity: f32) -> bool {
        self.vy += gravity * dt;
        self.pos.y += self.vy * dt;

        // The ground only catches a descending player
        if self.pos.y >= GROUND_Y && self.vy >= 0.0 {
            self.pos.y = GROUND_Y;
            self.vy = 0.0;
            self.on_ground = true;
        } else {
            self.on_ground = false;
        }
        self.on_ground
    }

    /// Advance the slide phases by (time-scaled) `dt`
    pub fn update_slide(&mut self, dt: f32, tuning: &Tuning) {
        let on_ground = self.on_ground;
        let slide = &mut self.slide;

        match slide.phase {
            SlidePhase::None => {}
            SlidePhase::In => {
                slide.accum += dt * tuning.slide_in_fps;
                while slide.accum >= 1.0 {
                    slide.accum -= 1.0;
                    slide.frame = (slide.frame + 1).min(SLIDE_IN_LAST_FRAME);
                }
                if slide.frame >= SLIDE_IN_LAST_FRAME {
                    slide.phase = SlidePhase::Hold;
                    slide.hold_t = 0.0;
                    slide.accum = 0.0;
                }
                // Released early: skip the hold
                if !slide.held && slide.frame >= 1 {
                    slide.enter_out();
                }
            }
            SlidePhase::Hold => {
                slide.hold_t += dt;
                slide.accum += dt * tuning.slide_hold_toggle_rate;
                if slide.accum >= 1.0 {
                    slide.accum = 0.0;
                    let [a, b] = SLIDE_HOLD_FRAMES;
                    slide.frame = if slide.frame == a { b } else { a };
                }
                if !slide.held || slide.hold_t >= tuning.slide_hold_max {
                    slide.enter_out();
                }
            }
            SlidePhase::Out => {
                slide.accum += dt * tuning.slide_out_fps;
                while slide.accum >= 1.0 {
                    slide.accum -= 1.0;
                    slide.frame = (slide.frame + 1).min(SLIDE_LAST_FRAME);
                }
                if slide.frame >= SLIDE_LAST_FRAME {
                    slide.finish();
                    // Chain straight into another slide while the control is held
                    if slide.held && on_ground {
                        slide.start();
                    }
                }
            }
        }
    }

    /// One simulation step: slide animation, then vertical physics.
    ///
    /// A slide queued (or held) in the air starts on the step that lands.
    pub fn step(&mut self, dt: f32, tuning: &Tuning) {
        self.update_slide(dt, tuning);

        let was_in_air = !self.on_ground;
        let grounded = self.integrate(dt, tuning.gravity);

        if grounded
            && was_in_air
            && self.slide.phase == SlidePhase::None
            && (self.slide.queued || self.slide.held)
        {
            self.slide.queued = false;
            self.slide.start();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const DT: f32 = 1.0 / 60.0;

    fn run_until_grounded(player: &mut Player, tuning: &Tuning) -> usize {
        let mut steps = 0;
        while !player.on_ground && steps < 1000 {
            player.step(DT, tuning);
            steps += 1;
        }
        steps
    }

    #[test]
    fn test_slide_height_table() {
        let full = PLAYER_H;
        assert_eq!(slide_height(0, full), full);
        assert_eq!(slide_height(5, full), full);
        assert_eq!(slide_height(2, full), SLIDE_LOW_H);
        assert_eq!(slide_height(3, full), SLIDE_LOW_H);
        assert_eq!(slide_height(1, full), (full + SLIDE_LOW_H) / 2.0);
        assert_eq!(slide_height(4, full), (full + SLIDE_LOW_H) / 2.0);
    }

    #[test]
    fn test_jump_is_idempotent_in_air() {
        let tuning = Tuning::default();
        let mut player = Player::default();
        assert!(player.jump(tuning.jump_velocity));
        let after_first = player.clone();
        assert!(!player.jump(tuning.jump_velocity));
        assert_eq!(player, after_first);
        assert_eq!(player.vy, -tuning.jump_velocity);
    }

    #[test]
    fn test_cannot_jump_while_sliding() {
        let mut player = Player::default();
        player.begin_slide();
        assert_eq!(player.slide.phase, SlidePhase::In);
        assert!(!player.jump(410.0));
        assert!(player.on_ground);
    }

    #[test]
    fn test_cut_jump_only_when_rising() {
        let mut player = Player::default();
        player.jump(400.0);
        player.cut_jump(0.5);
        assert_eq!(player.vy, -200.0);

        player.vy = 100.0;
        player.cut_jump(0.5);
        assert_eq!(player.vy, 100.0);
    }

    #[test]
    fn test_jump_survives_zero_step() {
        let tuning = Tuning::default();
        let mut player = Player::default();
        player.jump(tuning.jump_velocity);
        player.step(0.0, &tuning);
        assert!(!player.on_ground);
        assert_eq!(player.vy, -tuning.jump_velocity);
    }

    #[test]
    fn test_full_jump_lands() {
        let tuning = Tuning::default();
        let mut player = Player::default();
        player.jump(tuning.jump_velocity);
        let steps = run_until_grounded(&mut player, &tuning);
        assert!(steps > 1 && steps < 1000);
        assert_eq!(player.pos.y, GROUND_Y);
        assert_eq!(player.vy, 0.0);
    }

    #[test]
    fn test_queued_slide_fires_on_landing() {
        let tuning = Tuning::default();
        let mut player = Player::default();
        player.jump(tuning.jump_velocity);
        player.step(DT, &tuning);
        assert!(!player.on_ground);

        player.begin_slide();
        assert!(player.slide.queued);
        assert_eq!(player.slide.phase, SlidePhase::None);

        while !player.on_ground {
            assert_eq!(player.slide.phase, SlidePhase::None);
            player.step(DT, &tuning);
        }
        assert_eq!(player.slide.phase, SlidePhase::In);
        assert_eq!(player.slide.frame, 0);
        assert!(!player.slide.queued);
    }

    #[test]
    fn test_release_in_air_cancels_queue() {
        let tuning = Tuning::default();
        let mut player = Player::default();
        player.jump(tuning.jump_velocity);
        player.step(DT, &tuning);
        player.begin_slide();
        player.end_slide();
        assert!(!player.slide.queued);
        run_until_grounded(&mut player, &tuning);
        assert_eq!(player.slide.phase, SlidePhase::None);
    }

    #[test]
    fn test_slide_cycle_while_held() {
        let tuning = Tuning::default();
        let mut player = Player::default();
        player.begin_slide();

        // 16 fps: two frames take 0.125s
        for _ in 0..10 {
            player.step(DT, &tuning);
        }
        assert_eq!(player.slide.phase, SlidePhase::Hold);
        assert!(matches!(player.slide.frame, 2 | 3));
        assert_eq!(player.effective_height(), SLIDE_LOW_H);

        player.end_slide();
        assert_eq!(player.slide.phase, SlidePhase::Out);
        assert_eq!(player.slide.frame, SLIDE_OUT_FIRST_FRAME);

        for _ in 0..10 {
            player.step(DT, &tuning);
        }
        assert_eq!(player.slide.phase, SlidePhase::None);
        assert_eq!(player.slide.frame, 0);
        assert_eq!(player.effective_height(), PLAYER_H);
    }

    #[test]
    fn test_hold_times_out() {
        let tuning = Tuning::default();
        let mut player = Player::default();
        player.begin_slide();
        let mut saw_out = false;
        for _ in 0..((tuning.slide_hold_max / DT) as usize + 30) {
            player.step(DT, &tuning);
            if player.slide.phase == SlidePhase::Out {
                saw_out = true;
                break;
            }
        }
        assert!(saw_out);
        assert!(player.slide.held);
    }

    #[test]
    fn test_slide_chains_while_held() {
        let tuning = Tuning::default();
        let mut player = Player::default();
        player.begin_slide();
        player.slide.phase = SlidePhase::Out;
        player.slide.frame = SLIDE_OUT_FIRST_FRAME;
        for _ in 0..10 {
            player.step(DT, &tuning);
            if player.slide.phase == SlidePhase::In {
                break;
            }
        }
        assert_eq!(player.slide.phase, SlidePhase::In);
    }

    #[test]
    fn test_quick_tap_skips_hold() {
        let mut player = Player::default();
        player.begin_slide();
        // Released before the first frame advanced: forced straight to out
        player.end_slide();
        assert_eq!(player.slide.phase, SlidePhase::Out);
        assert_eq!(player.slide.frame, SLIDE_OUT_FIRST_FRAME);
    }

    proptest! {
        #[test]
        fn prop_falls_monotonically_until_grounded(dt in 0.001f32..0.033, vy in -600.0f32..0.0) {
            let tuning = Tuning::default();
            let mut player = Player::default();
            player.vy = vy;
            player.on_ground = false;
            player.pos.y = GROUND_Y - 80.0;
            // Past the apex every step moves down
            while player.vy < 0.0 {
                player.step(dt, &tuning);
            }
            let mut last_y = player.pos.y;
            let mut steps = 0;
            while !player.on_ground && steps < 10_000 {
                player.step(dt, &tuning);
                prop_assert!(player.pos.y >= last_y);
                last_y = player.pos.y;
                steps += 1;
            }
            prop_assert!(player.on_ground);
            prop_assert_eq!(player.vy, 0.0);
            prop_assert!(player.pos.y <= GROUND_Y);
        }
    }
}
