use std::collections::VecDeque;

use rand::Rng;

use crate::{
    constants::game,
    sim::{Bird, DifficultyParams, Tube},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Running,
    /// Terminal for the round; the simulation freezes until the caller
    /// feeds a restart (flap) or cancel input.
    GameOver,
}

/// Discrete inputs applied at the top of a tick, in arrival order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundInput {
    Flap,
    Cancel,
}

/// One round of play: the bird, the active tube stream, the score and
/// the spawn clock. Stepped by `tick`, which the game page calls once
/// per frame; restarting after game over reuses the same difficulty.
#[derive(Debug)]
pub struct Round {
    bird: Bird,
    tubes: VecDeque<Tube>,
    score: u32,
    spawn_timer: f32,
    elapsed: f32,
    phase: Phase,
    params: DifficultyParams,
}

impl Round {
    pub fn new(params: DifficultyParams) -> Self {
        Round {
            bird: Bird::new(game::BIRD_START_X, game::WORLD_HEIGHT / 2.0),
            tubes: VecDeque::new(),
            score: 0,
            spawn_timer: 0.0,
            elapsed: 0.0,
            phase: Phase::Running,
            params,
        }
    }

    pub fn bird(&self) -> &Bird {
        &self.bird
    }

    pub fn tubes(&self) -> impl Iterator<Item = &Tube> {
        self.tubes.iter()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn params(&self) -> DifficultyParams {
        self.params
    }

    /// Advances the simulation by one tick. Returns `Some(final_score)`
    /// when the round ends (cancel input), `None` while it keeps going.
    pub fn tick(&mut self, dt: f32, inputs: &[RoundInput]) -> Option<u32> {
        for input in inputs {
            match (self.phase, input) {
                (Phase::Running, RoundInput::Flap) => self.bird.flap(),
                (Phase::GameOver, RoundInput::Flap) => self.restart(),
                (_, RoundInput::Cancel) => return Some(self.score),
            }
        }

        if self.phase == Phase::GameOver {
            return None;
        }

        self.elapsed += dt;
        self.spawn_timer += dt;
        self.bird.update(dt);

        if self.spawn_timer >= self.params.spawn_interval {
            self.spawn_timer = 0.0;
            let gap_y = sample_gap_center(&mut rand::thread_rng(), self.params.gap_height);
            self.tubes.push_back(Tube::new(game::TUBE_SPAWN_X, gap_y, self.params.gap_height));
        }

        for tube in self.tubes.iter_mut() {
            tube.advance(self.params.speed);
            if !tube.passed && self.bird.x > tube.right_edge() {
                tube.passed = true;
                self.score += 1;
            }
        }
        self.tubes.retain(|tube| !tube.off_screen());

        if self.tubes.iter().any(|tube| tube.collides(&self.bird)) {
            self.kill();
        }

        // Soft ceiling: clamp and stop, the round goes on.
        if self.bird.y - self.bird.radius < 0.0 {
            self.bird.y = self.bird.radius;
            self.bird.vy = 0.0;
        }
        // Hard floor: the round ends.
        if self.bird.y + self.bird.radius > game::GROUND_LINE {
            self.kill();
        }

        None
    }

    fn kill(&mut self) {
        self.bird.alive = false;
        self.phase = Phase::GameOver;
    }

    /// Fresh bird, empty tube stream, zero score; difficulty unchanged.
    fn restart(&mut self) {
        *self = Round::new(self.params);
    }
}

/// Draws a gap center that keeps the whole gap between the ceiling
/// margin and the ground strip. A degenerate configuration (margins
/// swallowing the whole playable band) collapses to the midpoint
/// instead of handing `gen_range` an empty interval.
pub fn sample_gap_center<R: Rng + ?Sized>(rng: &mut R, gap_height: f32) -> f32 {
    let lo = game::GAP_MARGIN + gap_height / 2.0;
    let hi = game::WORLD_HEIGHT - game::GAP_MARGIN - gap_height / 2.0 - game::GROUND_OFFSET;
    if hi <= lo {
        return (lo + hi) / 2.0;
    }
    rng.gen_range(lo..=hi)
}
