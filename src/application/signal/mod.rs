pub mod formatter;
pub mod generator;

pub use formatter::format_signal_message;
pub use generator::{SignalConfig, SignalGenerator};
