//! Ambient logging setup, activating the `simplelog` dependency the
//! teacher crate's own manifest names but leaves disabled.
//!
//! This crate is a library with a single `emit()` entry point (§5); it
//! never installs a logger on its own. `init()` is a convenience a
//! driver binary (or a test harness) can call once at startup, the same
//! role `simplelog::TermLogger::init` plays for any `log`-facade crate.

use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};

/// Install a terminal logger at `level`. Safe to call more than once only
/// in the sense that `log`'s own global logger rejects a second
/// `set_logger` call; callers that might run this twice (e.g. repeated
/// test setup) should guard it themselves.
pub fn init(level: LevelFilter) -> Result<(), log::SetLoggerError> {
  TermLogger::init(level, Config::default(), TerminalMode::Mixed, ColorChoice::Auto)
}
