use std::time::Instant;

use chrono::{DateTime, Utc};
use log::{debug, info};

use crate::session::clock::{ClockSignal, DEFAULT_DURATION_SECS, SessionClock};
use crate::session::error::SessionError;
use crate::session::judge::{self, WordStat};
use crate::session::metrics::SessionReport;
use crate::session::sampler::WordSampler;

pub const DEFAULT_WORD_COUNT: usize = 200;
pub const DEFAULT_WINDOW_SIZE: usize = 8;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    pub word_count: usize,
    /// Words visible ahead of the cursor. Only the front-end reads this.
    pub window_size: usize,
    pub duration_secs: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            word_count: DEFAULT_WORD_COUNT,
            window_size: DEFAULT_WINDOW_SIZE,
            duration_secs: DEFAULT_DURATION_SECS,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    NotStarted,
    Running,
    Finished,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Keystroke {
    Char(char),
    Backspace,
    /// The word delimiter (space or enter in the front-end).
    Submit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    Key(Keystroke),
    Tick,
    Reset,
}

/// What the host must do with its tick source after an event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClockCommand {
    Arm,
    Stop,
}

#[derive(Clone, Debug)]
pub struct SessionState {
    pub words: Vec<String>,
    pub current_index: usize,
    pub input: String,
    pub backspaces: u32,
    pub word_started_at: Option<Instant>,
    pub stats: Vec<WordStat>,
    pub phase: Phase,
    pub time_remaining: u32,
    /// Set once, on the transition to `Finished`.
    pub finished_at: Option<DateTime<Utc>>,
}

impl SessionState {
    fn new(words: Vec<String>, duration_secs: u32) -> Self {
        Self {
            words,
            current_index: 0,
            input: String::new(),
            backspaces: 0,
            word_started_at: None,
            stats: Vec::new(),
            phase: Phase::NotStarted,
            time_remaining: duration_secs,
            finished_at: None,
        }
    }

    pub fn current_word(&self) -> &str {
        self.words
            .get(self.current_index)
            .map(String::as_str)
            .unwrap_or("")
    }
}

pub struct SessionEngine {
    config: SessionConfig,
    sampler: WordSampler,
    clock: SessionClock,
    state: SessionState,
}

impl SessionEngine {
    pub fn new(config: SessionConfig, mut sampler: WordSampler) -> Result<Self, SessionError> {
        if config.duration_secs == 0 {
            return Err(SessionError::InvalidArgument("duration must be positive"));
        }
        if config.window_size == 0 {
            return Err(SessionError::InvalidArgument("window size must be positive"));
        }
        let words = sampler.sample(config.word_count)?;
        let clock = SessionClock::new(config.duration_secs);
        let state = SessionState::new(words, config.duration_secs);
        Ok(Self {
            config,
            sampler,
            clock,
            state,
        })
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn stats(&self) -> &[WordStat] {
        &self.state.stats
    }

    pub fn current_word(&self) -> &str {
        self.state.current_word()
    }

    pub fn input(&self) -> &str {
        &self.state.input
    }

    pub fn time_remaining(&self) -> u32 {
        self.state.time_remaining
    }

    pub fn clock_armed(&self) -> bool {
        self.clock.is_armed()
    }

    /// The current word followed by up to `window - 1` upcoming words.
    pub fn upcoming(&self, window: usize) -> &[String] {
        let start = self.state.current_index.min(self.state.words.len());
        let end = start.saturating_add(window).min(self.state.words.len());
        &self.state.words[start..end]
    }

    pub fn report(&self) -> Option<SessionReport> {
        let finished_at = self.state.finished_at?;
        SessionReport::from_stats(&self.state.stats, self.config.duration_secs, finished_at)
    }

    pub fn apply(&mut self, event: SessionEvent) -> Option<ClockCommand> {
        self.apply_at(event, Instant::now())
    }

    pub fn apply_at(&mut self, event: SessionEvent, now: Instant) -> Option<ClockCommand> {
        match event {
            SessionEvent::Key(Keystroke::Char(ch)) => self.on_char(ch, now),
            SessionEvent::Key(Keystroke::Backspace) => {
                self.on_backspace();
                None
            }
            SessionEvent::Key(Keystroke::Submit) => self.on_submit(now),
            SessionEvent::Tick => self.on_tick(),
            SessionEvent::Reset => self.reset(),
        }
    }

    fn on_char(&mut self, ch: char, now: Instant) -> Option<ClockCommand> {
        match self.state.phase {
            Phase::NotStarted => {
                if ch.is_whitespace() {
                    return None;
                }
                self.state.input.push(ch);
                self.state.phase = Phase::Running;
                self.state.word_started_at = Some(now);
                self.clock.start();
                self.state.time_remaining = self.clock.remaining();
                info!(
                    "session started: {} words, {}s",
                    self.state.words.len(),
                    self.config.duration_secs
                );
                Some(ClockCommand::Arm)
            }
            Phase::Running => {
                self.state.input.push(ch);
                None
            }
            Phase::Finished => None,
        }
    }

    fn on_backspace(&mut self) {
        if self.state.phase != Phase::Running {
            return;
        }
        self.state.backspaces += 1;
        self.state.input.pop();
    }

    fn on_submit(&mut self, now: Instant) -> Option<ClockCommand> {
        if self.state.phase != Phase::Running || self.state.input.is_empty() {
            return None;
        }

        let elapsed_ms = self
            .state
            .word_started_at
            .map(|start| now.saturating_duration_since(start).as_millis() as u64)
            .unwrap_or(0);
        let stat = judge::finalize(
            self.state.current_word(),
            &self.state.input,
            elapsed_ms,
            self.state.backspaces,
        );
        debug!(
            "word {} '{}': correct={} {}ms backspaces={}",
            self.state.current_index, stat.word, stat.correct, stat.time_to_type_ms, stat.backspaces
        );
        self.state.stats.push(stat);
        self.state.input.clear();
        self.state.backspaces = 0;
        self.state.word_started_at = Some(now);

        if self.state.current_index + 1 < self.state.words.len() {
            self.state.current_index += 1;
            None
        } else {
            info!("session finished: out of words");
            self.finish()
        }
    }

    fn on_tick(&mut self) -> Option<ClockCommand> {
        if self.state.phase != Phase::Running {
            return None;
        }
        match self.clock.on_tick() {
            ClockSignal::Ignored => None,
            ClockSignal::Remaining(secs) => {
                self.state.time_remaining = secs;
                None
            }
            ClockSignal::Expired => {
                self.state.time_remaining = 0;
                info!(
                    "session finished: time expired after {} words",
                    self.state.stats.len()
                );
                self.finish()
            }
        }
    }

    fn finish(&mut self) -> Option<ClockCommand> {
        self.state.phase = Phase::Finished;
        self.state.finished_at = Some(Utc::now());
        self.clock.stop();
        Some(ClockCommand::Stop)
    }

    fn reset(&mut self) -> Option<ClockCommand> {
        let was_armed = self.clock.is_armed();
        self.clock.stop();
        // Word count and vocabulary were validated in `new`, so this cannot fail.
        let words = self
            .sampler
            .sample(self.config.word_count)
            .unwrap_or_else(|_| self.state.words.clone());
        self.state = SessionState::new(words, self.config.duration_secs);
        info!("session reset");
        was_armed.then_some(ClockCommand::Stop)
    }
}
