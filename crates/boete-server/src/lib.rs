//! Runtime wiring for the Boete server binary: configuration loading and the
//! in-process notification channel.

pub mod notify;
pub mod settings;

pub use notify::{ChannelNotifier, NotifyError};
pub use settings::ServerConfig;
