//! # Session configuration
//!
//! [`HorizonsConfig`] gathers everything the transport and the dialogue need to know about
//! the remote end: where it lives, how lines are terminated, how long each kind of wait may
//! last, and what the client announces during option negotiation.
//!
//! Every field has a default matching the public JPL service, so an empty TOML document is a
//! valid configuration:
//!
//! ```toml
//! host = "horizons.jpl.nasa.gov"
//! port = 6775
//! line_ending = "lf"
//! prompt_timeout_secs = 30.0
//! data_timeout_secs = 60.0
//! ```
use std::time::Duration;

use camino::Utf8Path;
use serde::{Deserialize, Serialize};

use crate::{
    constants::{HORIZONS_HOST, HORIZONS_PORT, TERMINAL_TYPE, WINDOW_SIZE},
    horizons_errors::HorizonsError,
    telnet::negotiation::OptionNegotiator,
};

/// Terminator appended to every dialogue reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineEnding {
    #[default]
    Lf,
    CrLf,
}

impl LineEnding {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HorizonsConfig {
    pub host: String,
    pub port: u16,
    pub line_ending: LineEnding,
    pub connect_timeout_secs: f64,
    /// Bound on every interactive prompt wait
    pub prompt_timeout_secs: f64,
    /// Bound on the waits for ephemeris production (`$$SOE`, `$$EOE`, `>>> Select...`)
    pub data_timeout_secs: f64,
    /// Bound on the "Working ..." wait of the series mode
    pub working_timeout_secs: f64,
    pub window_width: u16,
    pub window_height: u16,
    pub terminal_type: String,
}

impl Default for HorizonsConfig {
    fn default() -> Self {
        HorizonsConfig {
            host: HORIZONS_HOST.to_string(),
            port: HORIZONS_PORT,
            line_ending: LineEnding::Lf,
            connect_timeout_secs: 30.0,
            prompt_timeout_secs: 30.0,
            data_timeout_secs: 60.0,
            working_timeout_secs: 10.0,
            window_width: WINDOW_SIZE,
            window_height: WINDOW_SIZE,
            terminal_type: TERMINAL_TYPE.to_string(),
        }
    }
}

impl HorizonsConfig {
    /// Parse a configuration from a TOML document; absent keys keep their default value.
    pub fn from_toml_str(content: &str) -> Result<Self, HorizonsError> {
        let config: HorizonsConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML configuration file.
    pub fn from_toml_file(path: &Utf8Path) -> Result<Self, HorizonsError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Check that the configuration can drive a session.
    ///
    /// Return
    /// ------
    /// * `Err(HorizonsError::Config)` naming the first offending field
    pub fn validate(&self) -> Result<(), HorizonsError> {
        if self.host.trim().is_empty() {
            return Err(HorizonsError::Config("host must not be empty".into()));
        }
        if self.port == 0 {
            return Err(HorizonsError::Config("port must not be 0".into()));
        }
        for (name, value) in [
            ("connect_timeout_secs", self.connect_timeout_secs),
            ("prompt_timeout_secs", self.prompt_timeout_secs),
            ("data_timeout_secs", self.data_timeout_secs),
            ("working_timeout_secs", self.working_timeout_secs),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(HorizonsError::Config(format!(
                    "{name} must be a positive number of seconds, got {value}"
                )));
            }
        }
        if self.window_width == 0 || self.window_height == 0 {
            return Err(HorizonsError::Config(
                "window dimensions must be non-zero".into(),
            ));
        }
        if self.terminal_type.is_empty() || !self.terminal_type.is_ascii() {
            return Err(HorizonsError::Config(format!(
                "terminal_type must be a non-empty ASCII string, got {:?}",
                self.terminal_type
            )));
        }
        Ok(())
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs_f64(self.connect_timeout_secs)
    }

    pub fn prompt_timeout(&self) -> Duration {
        Duration::from_secs_f64(self.prompt_timeout_secs)
    }

    pub fn data_timeout(&self) -> Duration {
        Duration::from_secs_f64(self.data_timeout_secs)
    }

    pub fn working_timeout(&self) -> Duration {
        Duration::from_secs_f64(self.working_timeout_secs)
    }

    /// The negotiator announcing this configuration's window size and terminal type.
    pub fn negotiator(&self) -> OptionNegotiator {
        OptionNegotiator::new(
            self.window_width,
            self.window_height,
            self.terminal_type.clone(),
        )
    }
}
