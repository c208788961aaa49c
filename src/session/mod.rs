pub mod clock;
pub mod engine;
pub mod error;
pub mod judge;
pub mod metrics;
pub mod sampler;

pub use engine::{
    ClockCommand, Keystroke, Phase, SessionConfig, SessionEngine, SessionEvent, SessionState,
};
pub use error::SessionError;
pub use judge::WordStat;
pub use metrics::SessionReport;
