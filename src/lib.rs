// Library surface for headless/integration tests and reuse.
// Terminal setup and argument parsing stay in main.rs.
pub mod app_dirs;
pub mod config;
pub mod diff;
pub mod i18n;
pub mod keys;
pub mod logging;
pub mod queue;
pub mod runtime;
pub mod session;
pub mod shuffle;
pub mod speech;
pub mod ui;
pub mod word;
