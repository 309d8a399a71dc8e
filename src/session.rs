//! Session controller
//!
//! Wraps one [`SimState`] in the Menu -> Playing -> GameOver state machine,
//! feeds it sanitized input once per tick and turns simulation events into
//! announcer requests. Commentary never blocks a tick: requests are dispatched
//! through the [`CommentaryHub`] and whatever has arrived is applied at the
//! start of the next tick.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use crate::commentary::{CommentaryContext, CommentaryEvent, CommentaryHub, Narrator};
use crate::config::SimConfig;
use crate::error::ConfigResult;
use crate::input::{InputFilter, InputSnapshot};
use crate::sim::{GameEvent, RenderSnapshot, SimState, tick};

/// Top-level screen state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Menu,
    Playing,
    GameOver,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::Menu => "menu",
            SessionState::Playing => "playing",
            SessionState::GameOver => "game_over",
        }
    }
}

/// One game from menu to game over (and again, on reboot)
#[derive(Debug)]
pub struct GameSession {
    config: SimConfig,
    state: SimState,
    phase: SessionState,
    commentary: CommentaryHub,
    filter: InputFilter,
    /// Best score this process has seen (not persisted)
    high_score: u64,
    snapshot: RenderSnapshot,
}

impl GameSession {
    /// Validate the config and set up a session sitting on the menu
    pub fn new(config: SimConfig, narrator: Arc<dyn Narrator>) -> ConfigResult<Self> {
        config.validate()?;
        let seed = config.seed.unwrap_or_else(rand::random);
        let state = SimState::new(&config, seed);
        let snapshot = RenderSnapshot::capture(&state, &config, SessionState::Menu, 0);
        log::info!("Session created (seed {})", seed);

        Ok(Self {
            filter: InputFilter::new(config.bounds.center()),
            commentary: CommentaryHub::new(narrator),
            config,
            state,
            phase: SessionState::Menu,
            high_score: 0,
            snapshot,
        })
    }

    /// Begin (or reboot) a run. Only valid from Menu or GameOver.
    pub fn start(&mut self) -> bool {
        if self.phase == SessionState::Playing {
            log::warn!("start() ignored: session already playing");
            return false;
        }

        self.state.reset(&self.config);
        self.filter = InputFilter::new(self.config.bounds.center());
        self.commentary.invalidate();
        self.phase = SessionState::Playing;
        self.commentary.request(
            CommentaryEvent::Start,
            CommentaryContext {
                score: 0,
                wave: 1,
                enemies_killed: None,
            },
        );
        self.snapshot = self.capture();
        log::info!("Session started");
        true
    }

    /// Advance one frame.
    ///
    /// Outside Playing the simulation is frozen, but finished commentary is
    /// still applied so the game-over line can land.
    pub fn tick(&mut self, raw: &InputSnapshot) -> (RenderSnapshot, SessionState) {
        self.commentary.drain();

        if self.phase == SessionState::Playing {
            let input = self.filter.ingest(raw, &self.config.bounds);
            let events = tick(&mut self.state, &input, &self.config);
            for event in events {
                self.handle_event(event);
            }
            self.high_score = self.high_score.max(self.state.score());
            self.snapshot = self.capture();
        }

        (self.snapshot.clone(), self.phase)
    }

    fn handle_event(&mut self, event: GameEvent) {
        // Events after a death in the same tick belong to the finished run
        if self.phase != SessionState::Playing {
            return;
        }
        let trigger = match event {
            GameEvent::WaveAdvanced { .. } => CommentaryEvent::LevelUp,
            GameEvent::KillStreak => CommentaryEvent::KillStreak,
            GameEvent::LowHealth { .. } => CommentaryEvent::LowHealth,
            GameEvent::PlayerDied => {
                self.phase = SessionState::GameOver;
                self.high_score = self.high_score.max(self.state.score());
                log::info!(
                    "Game over: score {}, wave {}, {} kills",
                    self.state.score(),
                    self.state.current_wave(&self.config),
                    self.state.enemies_killed
                );
                CommentaryEvent::GameOver
            }
            _ => return,
        };
        let context = self.context();
        self.commentary.request(trigger, context);
    }

    fn context(&self) -> CommentaryContext {
        CommentaryContext {
            score: self.state.score(),
            wave: self.state.current_wave(&self.config),
            enemies_killed: Some(self.state.enemies_killed),
        }
    }

    fn capture(&self) -> RenderSnapshot {
        RenderSnapshot::capture(&self.state, &self.config, self.phase, self.high_score)
    }

    /// Currently displayed announcer line
    pub fn commentary(&self) -> &str {
        self.commentary.text()
    }

    /// Latest snapshot, without ticking
    pub fn snapshot(&self) -> &RenderSnapshot {
        &self.snapshot
    }

    pub fn phase(&self) -> SessionState {
        self.phase
    }

    pub fn high_score(&self) -> u64 {
        self.high_score
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Direct simulation access for tools and tests
    pub fn sim(&self) -> &SimState {
        &self.state
    }

    pub fn sim_mut(&mut self) -> &mut SimState {
        &mut self.state
    }

    /// Block until outstanding commentary has landed (or `timeout` passes)
    pub fn wait_for_commentary(&mut self, timeout: Duration) -> bool {
        self.commentary.wait_idle(timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commentary::CannedNarrator;
    use crate::sim::EnemyKind;
    use glam::Vec2;

    fn session() -> GameSession {
        let mut config = SimConfig::default().with_seed(7);
        config.weapon.auto_fire = false;
        GameSession::new(config, Arc::new(CannedNarrator::new())).unwrap()
    }

    #[test]
    fn test_new_session_on_menu() {
        let mut s = session();
        assert_eq!(s.phase(), SessionState::Menu);
        let (snap, phase) = s.tick(&InputSnapshot::default());
        assert_eq!(phase, SessionState::Menu);
        assert_eq!(snap.tick, 0);
        assert_eq!(s.sim().time_ticks, 0);
    }

    #[test]
    fn test_start_only_from_menu_or_game_over() {
        let mut s = session();
        assert!(s.start());
        assert!(!s.start());
        assert_eq!(s.phase(), SessionState::Playing);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = SimConfig::default().with_bounds(0.0, 800.0);
        assert!(GameSession::new(config, Arc::new(CannedNarrator::new())).is_err());
    }

    #[test]
    fn test_playing_ticks_advance() {
        let mut s = session();
        s.start();
        let input = InputSnapshot {
            movement: Vec2::X,
            aim: Vec2::new(1000.0, 400.0),
            ..Default::default()
        };
        let (snap, phase) = s.tick(&input);
        assert_eq!(phase, SessionState::Playing);
        assert_eq!(snap.tick, 1);
        assert!(snap.player.pos.x > 600.0);
    }

    #[test]
    fn test_death_moves_to_game_over_once() {
        let mut s = session();
        s.start();
        let pos = s.sim().player.pos;
        let stats = s.config().enemies.basic.clone();
        let sim = s.sim_mut();
        sim.player.hp = 10;
        sim.store.spawn_enemy(EnemyKind::Basic, pos, &stats, 1);

        let (_, phase) = s.tick(&InputSnapshot::default());
        assert_eq!(phase, SessionState::GameOver);
        assert_eq!(s.sim().player.hp, 0);

        // Frozen afterwards
        let ticks = s.sim().time_ticks;
        let (_, phase) = s.tick(&InputSnapshot::default());
        assert_eq!(phase, SessionState::GameOver);
        assert_eq!(s.sim().time_ticks, ticks);
    }

    #[test]
    fn test_reboot_resets_run() {
        let mut s = session();
        s.start();
        let sim = s.sim_mut();
        sim.player.score = 1200;
        sim.player.hp = 0;
        sim.death_reported = true;
        s.phase = SessionState::GameOver;
        s.high_score = 1200;

        assert!(s.start());
        let snap = s.snapshot();
        assert_eq!(snap.score, 0);
        assert_eq!(snap.hp, 100);
        assert_eq!(snap.wave, 1);
        assert!(snap.enemies.is_empty());
        assert_eq!(s.high_score(), 1200);
    }

    #[test]
    fn test_session_state_serializes_like_as_str() {
        for phase in [
            SessionState::Menu,
            SessionState::Playing,
            SessionState::GameOver,
        ] {
            let json = serde_json::to_string(&phase).unwrap();
            assert_eq!(json, format!("\"{}\"", phase.as_str()));
        }
    }

    #[test]
    fn test_start_line_lands() {
        let mut s = session();
        s.start();
        assert!(s.wait_for_commentary(Duration::from_secs(5)));
        assert_ne!(s.commentary(), crate::consts::INITIAL_COMMENTARY);
    }
}
