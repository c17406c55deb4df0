use std::fmt;
use std::time::{Duration, Instant};

use rand::{SeedableRng, rngs::StdRng};
use tracing::{debug, info, trace};

use super::{
    config::GameConfig,
    direction::Direction,
    error::ConfigError,
    scheduler::{ManualScheduler, RealtimeScheduler, TickHandle, TickScheduler},
    state::{CollisionType, GameState, Position, Snake},
    step::{self, StepResult},
};

/// How a game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    /// The snake hit a wall or itself
    Collision(CollisionType),
    /// The snake covers the whole grid
    Victory,
}

/// Lifecycle phase of the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No game in progress
    Ready,
    Running,
    Paused,
    /// The last game ended; its board and score stay visible until the next start
    Over(GameOutcome),
}

/// Snapshot returned by [`GameEngine::state`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineStatus {
    pub running: bool,
    pub paused: bool,
    pub score: u32,
}

/// Payload of the game-over notification, frozen at the moment the game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameOverReport {
    pub score: u32,
    /// Whole seconds between start and the end of the game
    pub duration_secs: u64,
    pub outcome: GameOutcome,
}

type ScoreCallback = Box<dyn FnMut(u32)>;
type GameOverCallback = Box<dyn FnMut(GameOverReport)>;

/// The game engine: owns one board and runs the lifecycle around it.
///
/// Ticks are paced through the scheduler port `S`. Every handle the engine
/// asks for must be given back through [`GameEngine::fire`]; handles that were
/// cancelled by `pause` or `stop` are recognised and ignored.
pub struct GameEngine<S: TickScheduler> {
    config: GameConfig,
    scheduler: S,
    rng: StdRng,
    state: GameState,
    phase: Phase,
    started_at: Option<Duration>,
    final_elapsed: Duration,
    pending_tick: Option<TickHandle>,
    pending_notice: Option<(TickHandle, GameOverReport)>,
    on_score_update: Option<ScoreCallback>,
    on_game_over: Option<GameOverCallback>,
}

impl<S: TickScheduler> GameEngine<S> {
    /// Create an engine seeded from system entropy
    pub fn new(config: GameConfig, scheduler: S) -> Result<Self, ConfigError> {
        Self::with_rng(config, scheduler, StdRng::from_entropy())
    }

    /// Create an engine whose food sequence is reproducible
    pub fn with_seed(config: GameConfig, scheduler: S, seed: u64) -> Result<Self, ConfigError> {
        Self::with_rng(config, scheduler, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: GameConfig, scheduler: S, mut rng: StdRng) -> Result<Self, ConfigError> {
        config.validate()?;
        let state = Self::fresh_board(&config, &mut rng);

        Ok(Self {
            config,
            scheduler,
            rng,
            state,
            phase: Phase::Ready,
            started_at: None,
            final_elapsed: Duration::ZERO,
            pending_tick: None,
            pending_notice: None,
            on_score_update: None,
            on_game_over: None,
        })
    }

    /// Install the callback fired after every food eaten
    pub fn on_score_update(mut self, callback: impl FnMut(u32) + 'static) -> Self {
        self.on_score_update = Some(Box::new(callback));
        self
    }

    /// Install the callback fired once when a game ends
    pub fn on_game_over(mut self, callback: impl FnMut(GameOverReport) + 'static) -> Self {
        self.on_game_over = Some(Box::new(callback));
        self
    }

    /// Start a new game, or resume a paused one. No-op while running.
    pub fn start(&mut self) {
        match self.phase {
            Phase::Paused => self.resume(),
            Phase::Running => {}
            Phase::Ready | Phase::Over(_) => {
                // A previous game's delayed notice must not leak into this one
                self.flush_notice();

                self.state = Self::fresh_board(&self.config, &mut self.rng);
                self.started_at = Some(self.scheduler.now());
                self.final_elapsed = Duration::ZERO;
                self.phase = Phase::Running;
                info!(
                    width = self.config.grid_width,
                    height = self.config.grid_height,
                    "game started"
                );
                self.schedule_tick();
            }
        }
    }

    pub fn pause(&mut self) {
        if self.phase != Phase::Running {
            return;
        }
        self.phase = Phase::Paused;
        self.cancel_tick();
        info!(score = self.state.score, "game paused");
    }

    /// Resume a paused game; the next tick waits a full interval
    pub fn resume(&mut self) {
        if self.phase != Phase::Paused {
            return;
        }
        self.phase = Phase::Running;
        self.schedule_tick();
        info!(score = self.state.score, "game resumed");
    }

    pub fn toggle_pause(&mut self) {
        if self.phase == Phase::Paused {
            self.resume();
        } else {
            self.pause();
        }
    }

    /// Abandon whatever is going on.
    ///
    /// A game in progress is not reported. A game that already ended but whose
    /// delayed notice has not fired yet is reported right away.
    pub fn stop(&mut self) {
        self.cancel_tick();
        self.flush_notice();
        if self.phase != Phase::Ready {
            info!(score = self.state.score, "game stopped");
        }
        self.phase = Phase::Ready;
    }

    /// Request a turn for the next tick.
    ///
    /// Returns false, leaving the pending direction alone, when `direction`
    /// would reverse the last committed move.
    pub fn set_direction(&mut self, direction: Direction) -> bool {
        if self.state.snake.direction.is_opposite(direction) {
            return false;
        }
        self.state.pending_direction = direction;
        true
    }

    /// Deliver a due timer handle
    pub fn fire(&mut self, handle: TickHandle) {
        if self.pending_tick == Some(handle) {
            self.pending_tick = None;
            self.tick();
        } else if matches!(self.pending_notice, Some((pending, _)) if pending == handle) {
            if let Some((_, report)) = self.pending_notice.take() {
                self.notify_game_over(report);
            }
        } else {
            trace!(?handle, "ignoring stale timer");
        }
    }

    pub fn state(&self) -> EngineStatus {
        EngineStatus {
            running: matches!(self.phase, Phase::Running | Phase::Paused),
            paused: self.phase == Phase::Paused,
            score: self.state.score,
        }
    }

    pub fn score(&self) -> u32 {
        self.state.score
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Board for rendering
    pub fn game_state(&self) -> &GameState {
        &self.state
    }

    /// Current tick interval
    pub fn speed(&self) -> Duration {
        Duration::from_millis(self.state.speed_ms)
    }

    /// Time since the current game started, frozen once it ends
    pub fn elapsed(&self) -> Duration {
        match (self.phase, self.started_at) {
            (Phase::Over(_), _) => self.final_elapsed,
            (Phase::Running | Phase::Paused, Some(started_at)) => {
                self.scheduler.now().saturating_sub(started_at)
            }
            _ => Duration::ZERO,
        }
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    fn tick(&mut self) {
        if self.phase != Phase::Running {
            return;
        }

        let result = step::step(&mut self.state, &self.config, &mut self.rng);

        if result.info.ate_food {
            debug!(score = self.state.score, speed_ms = self.state.speed_ms, "food eaten");
            if let Some(callback) = self.on_score_update.as_mut() {
                callback(self.state.score);
            }
        }

        match Self::outcome_of(&result) {
            Some(outcome) => self.finish(outcome),
            None => self.schedule_tick(),
        }
    }

    fn outcome_of(result: &StepResult) -> Option<GameOutcome> {
        if !result.terminated {
            return None;
        }
        if result.info.grid_filled {
            return Some(GameOutcome::Victory);
        }
        result.info.collision_type.map(GameOutcome::Collision)
    }

    fn finish(&mut self, outcome: GameOutcome) {
        let now = self.scheduler.now();
        self.final_elapsed = self
            .started_at
            .map(|started_at| now.saturating_sub(started_at))
            .unwrap_or_default();
        self.phase = Phase::Over(outcome);

        let report = GameOverReport {
            score: self.state.score,
            duration_secs: self.final_elapsed.as_secs(),
            outcome,
        };
        info!(
            score = report.score,
            duration_secs = report.duration_secs,
            ?outcome,
            "game over"
        );

        let delay = self.config.game_over_delay();
        if delay.is_zero() {
            self.notify_game_over(report);
        } else {
            let handle = self.scheduler.schedule(delay);
            self.pending_notice = Some((handle, report));
        }
    }

    fn notify_game_over(&mut self, report: GameOverReport) {
        if let Some(callback) = self.on_game_over.as_mut() {
            callback(report);
        }
    }

    /// Deliver a still-delayed game-over notice now
    fn flush_notice(&mut self) {
        if let Some((handle, report)) = self.pending_notice.take() {
            self.scheduler.cancel(handle);
            self.notify_game_over(report);
        }
    }

    fn schedule_tick(&mut self) {
        self.cancel_tick();
        let handle = self.scheduler.schedule(self.speed());
        self.pending_tick = Some(handle);
    }

    fn cancel_tick(&mut self) {
        if let Some(handle) = self.pending_tick.take() {
            self.scheduler.cancel(handle);
        }
    }

    /// Snake centred on the grid heading right, food placed off it
    fn fresh_board(config: &GameConfig, rng: &mut StdRng) -> GameState {
        let center_x = (config.grid_width / 2) as i32;
        let center_y = (config.grid_height / 2) as i32;

        let snake = Snake::new(
            Position::new(center_x, center_y),
            Direction::Right,
            config.initial_snake_length,
        );

        let food = step::spawn_food(&snake, config.grid_width, config.grid_height, rng);

        GameState::new(
            snake,
            food,
            config.grid_width,
            config.grid_height,
            config.initial_speed_ms,
        )
    }
}

impl GameEngine<ManualScheduler> {
    /// Move virtual time forward by `dt`, firing every timer that comes due,
    /// including ticks scheduled along the way
    pub fn advance(&mut self, dt: Duration) {
        let target = self.scheduler.now() + dt;
        while self
            .scheduler
            .next_deadline()
            .is_some_and(|deadline| deadline <= target)
        {
            if let Some(handle) = self.scheduler.advance_to_next() {
                self.fire(handle);
            }
        }
        let remaining = target.saturating_sub(self.scheduler.now());
        self.scheduler.advance_clock(remaining);
    }

    /// Jump straight to the next timer and fire it.
    /// Returns false when nothing is scheduled.
    pub fn run_next(&mut self) -> bool {
        match self.scheduler.advance_to_next() {
            Some(handle) => {
                self.fire(handle);
                true
            }
            None => false,
        }
    }
}

impl GameEngine<RealtimeScheduler> {
    /// When the host should wake up next
    pub fn next_deadline(&self) -> Option<Instant> {
        self.scheduler.next_deadline()
    }

    /// Fire every timer due by now
    pub fn fire_due(&mut self) {
        for handle in self.scheduler.take_due(Instant::now()) {
            self.fire(handle);
        }
    }
}

impl<S: TickScheduler> fmt::Debug for GameEngine<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameEngine")
            .field("phase", &self.phase)
            .field("score", &self.state.score)
            .field("speed_ms", &self.state.speed_ms)
            .field("snake_len", &self.state.snake.len())
            .finish_non_exhaustive()
    }
}
