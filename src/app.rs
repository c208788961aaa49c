use log::warn;

use typecoach::coach::{self, FeedbackProvider, FeedbackRequest};
use typecoach::config::Config;
use typecoach::session::{
    ClockCommand, Keystroke, Phase, SessionEngine, SessionEvent, SessionReport, WordStat,
};

use crate::event::ClockDriver;
use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Typing,
    Result,
}

#[derive(Clone, Debug, PartialEq)]
pub enum FeedbackState {
    NotRequested,
    Ready(String),
    Failed(String),
}

pub struct App {
    pub screen: AppScreen,
    pub engine: SessionEngine,
    pub config: Config,
    pub theme: Theme,
    pub feedback: FeedbackState,
    pub last_report: Option<SessionReport>,
    /// Stats of the most recent finished session, kept across resets for `--print-stats`.
    pub last_stats: Vec<WordStat>,
    pub should_quit: bool,
    coach: Box<dyn FeedbackProvider>,
    clock: ClockDriver,
}

impl App {
    pub fn new(config: Config, engine: SessionEngine, clock: ClockDriver) -> Self {
        let coach = config.feedback_provider();
        Self {
            screen: AppScreen::Typing,
            engine,
            config,
            theme: Theme::default(),
            feedback: FeedbackState::NotRequested,
            last_report: None,
            last_stats: Vec::new(),
            should_quit: false,
            coach,
            clock,
        }
    }

    pub fn type_char(&mut self, ch: char) {
        if ch == ' ' {
            self.submit();
        } else {
            self.dispatch(SessionEvent::Key(Keystroke::Char(ch)));
        }
    }

    pub fn submit(&mut self) {
        self.dispatch(SessionEvent::Key(Keystroke::Submit));
    }

    pub fn backspace(&mut self) {
        self.dispatch(SessionEvent::Key(Keystroke::Backspace));
    }

    pub fn on_clock_tick(&mut self, id: u64) {
        // Ticks from a cancelled ticker may still be queued.
        if self.clock.accepts(id) {
            self.dispatch(SessionEvent::Tick);
        }
    }

    pub fn restart(&mut self) {
        self.dispatch(SessionEvent::Reset);
        self.feedback = FeedbackState::NotRequested;
        self.screen = AppScreen::Typing;
    }

    pub fn request_feedback(&mut self) {
        if matches!(self.feedback, FeedbackState::Ready(_)) {
            return;
        }
        self.feedback = match coach::request_feedback(self.coach.as_ref(), &self.last_stats) {
            Ok(text) => FeedbackState::Ready(text),
            Err(err) => {
                warn!("feedback from '{}' failed: {err}", self.coach.name());
                FeedbackState::Failed(err.to_string())
            }
        };
    }

    pub fn can_request_feedback(&self) -> bool {
        self.screen == AppScreen::Result
            && !self.last_stats.is_empty()
            && !matches!(self.feedback, FeedbackState::Ready(_))
    }

    /// JSON handoff for an external coach; `None` when no words were submitted.
    pub fn export_json(&self) -> Option<String> {
        let request = FeedbackRequest::new(&self.last_stats, self.last_report.clone()).ok()?;
        request.to_json().ok()
    }

    fn dispatch(&mut self, event: SessionEvent) {
        match self.engine.apply(event) {
            Some(ClockCommand::Arm) => self.clock.arm(),
            Some(ClockCommand::Stop) => self.clock.stop(),
            None => {}
        }
        if self.screen == AppScreen::Typing && self.engine.phase() == Phase::Finished {
            self.on_finished();
        }
    }

    fn on_finished(&mut self) {
        self.last_stats = self.engine.stats().to_vec();
        self.last_report = self.engine.report();
        self.feedback = FeedbackState::NotRequested;
        self.screen = AppScreen::Result;
    }
}
