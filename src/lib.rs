// Library surface for headless/integration tests and reuse.
// Keep this lean to avoid coupling to bin-only types in main.rs.
pub mod app_dirs;
pub mod config;
pub mod division;
pub mod engine;
pub mod logging;
pub mod question;
pub mod resolver;
pub mod runtime;
pub mod session;
pub mod setup;
pub mod summary;
pub mod util;

pub use engine::{Phase, QuestionEngine, TimeLeft};
pub use resolver::{resolve, ConfigError, RawInputs};
pub use session::SessionConfig;
pub use summary::{SessionSummary, Verdict};
