use clap::ValueEnum;
use strum::{Display, EnumIter, EnumString};
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Registry, fmt, layer::SubscriberExt, reload, util::SubscriberInitExt,
};

#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Display, EnumString, EnumIter,
    ValueEnum,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Parse a level from the config file. Unknown values fall back to `info`.
    pub fn from_config(value: &str) -> Self {
        value.trim().parse().unwrap_or_else(|_| {
            warn!("Unknown log level '{value}', using info");
            LogLevel::Info
        })
    }
}

/// Handle to the installed subscriber, used to change the level while running.
pub struct Logger {
    handle: reload::Handle<EnvFilter, Registry>,
    level: LogLevel,
    /// `RUST_LOG` was set and takes precedence over every other source
    env_override: bool,
}

impl Logger {
    /// Install the global subscriber. Lines go to stderr.
    pub fn init(level: LogLevel) -> Self {
        let (filter, env_override) = match EnvFilter::try_from_default_env() {
            Ok(filter) => (filter, true),
            Err(_) => (EnvFilter::new(level.to_string()), false),
        };
        let (filter, handle) = reload::Layer::new(filter);

        let result = tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init();
        if let Err(err) = result {
            eprintln!("Failed to install logger: {err}");
        }

        Self {
            handle,
            level,
            env_override,
        }
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub fn set_level(&mut self, level: LogLevel) {
        if self.env_override || level == self.level {
            return;
        }

        match self
            .handle
            .modify(|filter| *filter = EnvFilter::new(level.to_string()))
        {
            Ok(()) => {
                self.level = level;
                info!("Log level changed to {level}");
            }
            Err(err) => warn!("Failed to change log level: {err}"),
        }
    }
}
