use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::{UnboundedReceiver, unbounded_channel};
use tokio::time::interval;
use tracing::{info, warn};

use crate::game::{GameConfig, GameEngine, GameOverReport, Phase, RealtimeScheduler};
use crate::history::{DEFAULT_LISTING, GameRecord, HistoryBook};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::GameMetrics;
use crate::render::{Renderer, renderer::View};

/// Who is playing and where their history lives
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    /// `None` plays as a guest: nothing is recorded
    pub player: Option<String>,
    pub history_path: Option<PathBuf>,
    /// Fixed food sequence, mostly for demos
    pub seed: Option<u64>,
}

/// Notifications forwarded from the engine callbacks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EngineEvent {
    Score(u32),
    GameOver(GameOverReport),
}

pub struct HumanMode {
    engine: GameEngine<RealtimeScheduler>,
    engine_events: UnboundedReceiver<EngineEvent>,
    metrics: GameMetrics,
    history: HistoryBook,
    options: SessionOptions,
    renderer: Renderer,
    input_handler: InputHandler,
    should_quit: bool,
}

impl HumanMode {
    pub fn new(config: GameConfig, options: SessionOptions) -> Result<Self> {
        let history = match &options.history_path {
            Some(path) => HistoryBook::load(path)?,
            None => HistoryBook::new(),
        };

        let (tx, engine_events) = unbounded_channel();
        let score_tx = tx.clone();
        let scheduler = RealtimeScheduler::new();
        let engine = match options.seed {
            Some(seed) => GameEngine::with_seed(config, scheduler, seed),
            None => GameEngine::new(config, scheduler),
        }
        .context("Invalid game configuration")?
        .on_score_update(move |score| {
            let _ = score_tx.send(EngineEvent::Score(score));
        })
        .on_game_over(move |report| {
            let _ = tx.send(EngineEvent::GameOver(report));
        });

        let stored_high_score = options
            .player
            .as_deref()
            .map_or(0, |player| history.high_score(player));

        Ok(Self {
            engine,
            engine_events,
            metrics: GameMetrics::new(stored_high_score),
            history,
            options,
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            should_quit: false,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        self.shutdown();

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        // Render at 30 FPS (33ms per frame)
        let render_interval = Duration::from_millis(33);
        let mut render_timer = interval(render_interval);

        // Raw mode turns Ctrl+C into a key event; this catches SIGINT sent from outside
        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);

        loop {
            let deadline = self.engine.next_deadline();

            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event)?;
                    }
                }

                // Engine timers: ticks and the delayed game-over notice
                _ = sleep_until(deadline) => {
                    self.engine.fire_due();
                    self.drain_engine_events();
                }

                // Render frame
                _ = render_timer.tick() => {
                    self.metrics.update(self.engine.elapsed());
                    let recent = self.recent_games();
                    let view = View {
                        state: self.engine.game_state(),
                        phase: self.engine.phase(),
                        metrics: &self.metrics,
                        recent: &recent,
                    };
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &view);
                    }).context("Failed to draw frame")?;
                }

                // Handle Ctrl+C
                _ = &mut ctrl_c => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) -> Result<()> {
        if let Event::Key(key) = event {
            // Only process key press events, not release
            if key.kind != KeyEventKind::Press {
                return Ok(());
            }

            match self.input_handler.handle_key_event(key) {
                KeyAction::Turn(direction) => {
                    self.engine.set_direction(direction);
                }
                KeyAction::StartOrPause => {
                    if self.engine.phase() == Phase::Running {
                        self.engine.pause();
                    } else {
                        self.start_game();
                    }
                }
                KeyAction::TogglePause => self.engine.toggle_pause(),
                KeyAction::Restart => {
                    self.engine.stop();
                    self.start_game();
                }
                KeyAction::Quit => {
                    self.should_quit = true;
                }
                KeyAction::None => {}
            }

            self.drain_engine_events();
        }

        Ok(())
    }

    /// Start a new game, or resume the paused one
    fn start_game(&mut self) {
        let fresh = self.engine.phase() != Phase::Paused;
        self.engine.start();
        if fresh {
            // A delayed game-over notice may have been flushed by start
            self.drain_engine_events();
            self.metrics.on_game_start();
        }
    }

    /// Stop the engine and record a game whose notice was still delayed
    fn shutdown(&mut self) {
        self.engine.stop();
        self.drain_engine_events();
    }

    fn drain_engine_events(&mut self) {
        while let Ok(event) = self.engine_events.try_recv() {
            match event {
                EngineEvent::Score(score) => self.metrics.on_score_update(score),
                EngineEvent::GameOver(report) => self.record_game(report),
            }
        }
    }

    fn record_game(&mut self, report: GameOverReport) {
        self.metrics.on_game_over(report);

        let Some(player) = self.options.player.as_deref() else {
            return;
        };
        self.history.record(player, report.score, report.duration_secs);
        info!(player, score = report.score, "game recorded");

        if let Some(path) = &self.options.history_path {
            if let Err(err) = self.history.save(path) {
                warn!(error = %format!("{err:#}"), "could not save history");
            }
        }
    }

    fn recent_games(&self) -> Vec<&GameRecord> {
        self.options
            .player
            .as_deref()
            .map(|player| self.history.recent(player, DEFAULT_LISTING))
            .unwrap_or_default()
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}

/// Sleep until `deadline`, or forever when nothing is scheduled
async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline.into()).await,
        None => std::future::pending().await,
    }
}
