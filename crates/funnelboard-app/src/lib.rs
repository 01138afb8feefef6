//! Funnelboard Application
//!
//! Headless shell around the core engine: keyboard shortcut bindings and
//! scripted session replay.

pub mod session;
pub mod shortcuts;

pub use session::{
    ReplayError, ReplayReport, ReplayStats, SessionEvent, load_config, parse_session, replay,
    replay_file, write_report,
};
pub use shortcuts::{Shortcut, ShortcutRegistry};
