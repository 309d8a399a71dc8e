//! Announcer commentary
//!
//! The narrator (an LLM call, a canned table, anything) is an external
//! collaborator. Requests are fire-and-forget: each one runs on its own worker
//! thread and the reply comes back over an `mpsc` channel that the session
//! drains once per tick. Replies are tagged with the generation they were
//! issued in; a session reset bumps the generation so stale lines are dropped.
//! Within a generation the last reply to arrive wins.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::consts::INITIAL_COMMENTARY;

/// Announcer trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommentaryEvent {
    Start,
    KillStreak,
    LowHealth,
    GameOver,
    LevelUp,
}

impl CommentaryEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommentaryEvent::Start => "start",
            CommentaryEvent::KillStreak => "kill_streak",
            CommentaryEvent::LowHealth => "low_health",
            CommentaryEvent::GameOver => "game_over",
            CommentaryEvent::LevelUp => "level_up",
        }
    }
}

/// Game-state snapshot handed to the narrator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentaryContext {
    pub score: u64,
    pub wave: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enemies_killed: Option<u32>,
}

/// Produces one line of commentary.
///
/// May block (network call); it always runs off the tick thread. Failures
/// should come back as an empty string, which leaves the displayed text alone.
pub trait Narrator: Send + Sync {
    fn commentary(&self, event: CommentaryEvent, context: &CommentaryContext) -> String;
}

impl<F> Narrator for F
where
    F: Fn(CommentaryEvent, &CommentaryContext) -> String + Send + Sync,
{
    fn commentary(&self, event: CommentaryEvent, context: &CommentaryContext) -> String {
        self(event, context)
    }
}

/// Offline announcer used when no text backend is configured
#[derive(Debug, Default)]
pub struct CannedNarrator {
    cursor: AtomicUsize,
}

impl CannedNarrator {
    pub fn new() -> Self {
        Self::default()
    }

    fn lines(event: CommentaryEvent) -> &'static [&'static str] {
        match event {
            CommentaryEvent::Start => &[
                "Simulated AI: System Ready.",
                "Pilot synced. Try not to embarrass the arena.",
            ],
            CommentaryEvent::KillStreak => &[
                "Clean kills. The crowd noticed.",
                "Somebody tell the swarm about you.",
            ],
            CommentaryEvent::LowHealth => &[
                "Hull critical. Maybe stop touching things?",
                "Warning: pilot leaking sparks.",
            ],
            CommentaryEvent::GameOver => &[
                "Signal lost. Reboot and redeem yourself.",
                "Critical failure. The arena remembers.",
            ],
            CommentaryEvent::LevelUp => &[
                "New wave inbound. Show them what you've got.",
                "Difficulty rising. So is your ego.",
            ],
        }
    }
}

impl Narrator for CannedNarrator {
    fn commentary(&self, event: CommentaryEvent, context: &CommentaryContext) -> String {
        let lines = Self::lines(event);
        let i = self.cursor.fetch_add(1, Ordering::Relaxed) % lines.len();
        match event {
            CommentaryEvent::GameOver => format!("{} Final score: {}.", lines[i], context.score),
            CommentaryEvent::LevelUp => format!("Wave {}. {}", context.wave, lines[i]),
            _ => lines[i].to_string(),
        }
    }
}

/// A finished commentary request
#[derive(Debug, Clone)]
struct Reply {
    generation: u64,
    event: CommentaryEvent,
    text: String,
}

/// Dispatches requests and applies replies to the displayed text slot
pub struct CommentaryHub {
    narrator: Arc<dyn Narrator>,
    reply_tx: mpsc::Sender<Reply>,
    reply_rx: mpsc::Receiver<Reply>,
    generation: u64,
    in_flight: usize,
    text: String,
}

impl std::fmt::Debug for CommentaryHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommentaryHub")
            .field("generation", &self.generation)
            .field("in_flight", &self.in_flight)
            .field("text", &self.text)
            .finish()
    }
}

impl CommentaryHub {
    pub fn new(narrator: Arc<dyn Narrator>) -> Self {
        let (reply_tx, reply_rx) = mpsc::channel();
        Self {
            narrator,
            reply_tx,
            reply_rx,
            generation: 0,
            in_flight: 0,
            text: INITIAL_COMMENTARY.to_string(),
        }
    }

    /// Currently displayed line
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Requests dispatched but not yet drained
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Start a new generation; replies from earlier ones will be discarded
    pub fn invalidate(&mut self) {
        self.generation += 1;
    }

    /// Fire a request without waiting for it
    pub fn request(&mut self, event: CommentaryEvent, context: CommentaryContext) {
        let narrator = Arc::clone(&self.narrator);
        let tx = self.reply_tx.clone();
        let generation = self.generation;
        log::debug!(
            "Commentary request {} (gen {}, score {}, wave {})",
            event.as_str(),
            generation,
            context.score,
            context.wave
        );

        let job = move || {
            // A panicking narrator degrades to "no update"
            let text = catch_unwind(AssertUnwindSafe(|| narrator.commentary(event, &context)))
                .unwrap_or_default();
            let _ = tx.send(Reply {
                generation,
                event,
                text,
            });
        };

        // No threads on the web; run inline and let the next drain pick it up
        #[cfg(target_arch = "wasm32")]
        {
            job();
            self.in_flight += 1;
        }

        #[cfg(not(target_arch = "wasm32"))]
        match std::thread::Builder::new()
            .name(format!("commentary-{}", event.as_str()))
            .spawn(job)
        {
            Ok(_) => self.in_flight += 1,
            Err(e) => log::warn!("Failed to dispatch {} commentary: {}", event.as_str(), e),
        }
    }

    /// Apply every reply that has arrived. Returns true if the text changed.
    pub fn drain(&mut self) -> bool {
        let mut changed = false;
        while let Ok(reply) = self.reply_rx.try_recv() {
            changed |= self.apply(reply);
        }
        changed
    }

    /// Block until every in-flight request has replied or `timeout` passes.
    /// Returns true if nothing is left in flight.
    pub fn wait_idle(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while self.in_flight > 0 {
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            match self.reply_rx.recv_timeout(deadline - now) {
                Ok(reply) => {
                    self.apply(reply);
                }
                Err(_) => break,
            }
        }
        self.in_flight == 0
    }

    fn apply(&mut self, reply: Reply) -> bool {
        self.in_flight = self.in_flight.saturating_sub(1);
        if reply.generation != self.generation {
            log::debug!(
                "Discarding stale {} commentary (gen {} != {})",
                reply.event.as_str(),
                reply.generation,
                self.generation
            );
            return false;
        }
        let text = reply.text.trim();
        if text.is_empty() {
            return false;
        }
        self.text = text.to_string();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    const WAIT: Duration = Duration::from_secs(5);

    fn ctx(score: u64, wave: u32) -> CommentaryContext {
        CommentaryContext {
            score,
            wave,
            enemies_killed: None,
        }
    }

    #[test]
    fn test_initial_text() {
        let hub = CommentaryHub::new(Arc::new(CannedNarrator::new()));
        assert_eq!(hub.text(), "System: Waiting for pilot...");
    }

    #[test]
    fn test_reply_updates_text() {
        let narrator = |event: CommentaryEvent, c: &CommentaryContext| {
            format!("{} at {}", event.as_str(), c.score)
        };
        let mut hub = CommentaryHub::new(Arc::new(narrator));
        hub.request(CommentaryEvent::KillStreak, ctx(120, 1));
        assert!(hub.wait_idle(WAIT));
        assert_eq!(hub.text(), "kill_streak at 120");
    }

    #[test]
    fn test_empty_reply_keeps_text() {
        let mut hub = CommentaryHub::new(Arc::new(|_: CommentaryEvent, _: &CommentaryContext| {
            String::from("   ")
        }));
        hub.request(CommentaryEvent::Start, ctx(0, 1));
        assert!(hub.wait_idle(WAIT));
        assert_eq!(hub.text(), INITIAL_COMMENTARY);
    }

    #[test]
    fn test_panicking_narrator_is_contained() {
        let mut hub = CommentaryHub::new(Arc::new(
            |_: CommentaryEvent, _: &CommentaryContext| -> String { panic!("backend down") },
        ));
        hub.request(CommentaryEvent::GameOver, ctx(10, 1));
        assert!(hub.wait_idle(WAIT));
        assert_eq!(hub.in_flight(), 0);
        assert_eq!(hub.text(), INITIAL_COMMENTARY);
    }

    #[test]
    fn test_stale_generation_discarded() {
        // Hold the narrator until the generation has moved on
        let gate = Arc::new(Mutex::new(()));
        let held = gate.lock().unwrap();
        let worker_gate = Arc::clone(&gate);
        let narrator = move |_: CommentaryEvent, _: &CommentaryContext| {
            let _guard = worker_gate.lock().unwrap_or_else(|e| e.into_inner());
            String::from("old news")
        };
        let mut hub = CommentaryHub::new(Arc::new(narrator));
        hub.request(CommentaryEvent::Start, ctx(0, 1));
        hub.invalidate();
        drop(held);

        assert!(hub.wait_idle(WAIT));
        assert_eq!(hub.text(), INITIAL_COMMENTARY);
        assert_eq!(hub.generation(), 1);
    }

    #[test]
    fn test_canned_narrator_lines() {
        let narrator = CannedNarrator::new();
        let over = narrator.commentary(CommentaryEvent::GameOver, &ctx(1500, 4));
        assert!(over.ends_with("Final score: 1500."));
        let up = narrator.commentary(CommentaryEvent::LevelUp, &ctx(500, 2));
        assert!(up.starts_with("Wave 2."));
        assert!(!narrator.commentary(CommentaryEvent::Start, &ctx(0, 1)).is_empty());
    }

    #[test]
    fn test_event_names() {
        assert_eq!(CommentaryEvent::KillStreak.as_str(), "kill_streak");
        let json = serde_json::to_string(&CommentaryEvent::LowHealth).unwrap();
        assert_eq!(json, "\"low_health\"");
    }
}
