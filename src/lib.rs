// Library half of the crate: the session engine and everything it needs that does not
// touch the terminal. The binary in main.rs hosts it; benches and tests import it directly.
pub mod coach;
pub mod config;
pub mod session;
pub mod vocabulary;
