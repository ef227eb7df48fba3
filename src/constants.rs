//! # Constants and type definitions for horizons-telnet
//!
//! This module centralizes the **telnet protocol bytes**, the **Horizons service defaults**,
//! the **unit conversion factors** and the common **type aliases** used throughout the crate.
//!
//! ## Overview
//!
//! - Telnet command and option codes (RFC 854, RFC 1073, RFC 1091)
//! - Default host, port, window size and terminal type announced to Horizons
//! - Unit conversions (days ↔ seconds, hours ↔ degrees)
//! - Core type aliases shared by the parser and the output layer

// -------------------------------------------------------------------------------------------------
// Telnet protocol bytes
// -------------------------------------------------------------------------------------------------

/// Interpret As Command: escape byte introducing every telnet command
pub const IAC: u8 = 255;
/// Refuse to let the remote perform an option
pub const DONT: u8 = 254;
/// Ask the remote to perform an option
pub const DO: u8 = 253;
/// Refuse to perform an option
pub const WONT: u8 = 252;
/// Offer to perform an option
pub const WILL: u8 = 251;
/// Subnegotiation begin
pub const SB: u8 = 250;
/// Subnegotiation end
pub const SE: u8 = 240;

/// Option 1: remote echo
pub const OPT_ECHO: u8 = 1;
/// Option 3: suppress go-ahead
pub const OPT_SGA: u8 = 3;
/// Option 24: terminal type
pub const OPT_TTYPE: u8 = 24;
/// Option 31: negotiate about window size
pub const OPT_NAWS: u8 = 31;

/// TERMINAL-TYPE subnegotiation qualifier "IS"
pub const TTYPE_IS: u8 = 0;

// -------------------------------------------------------------------------------------------------
// Horizons service defaults
// -------------------------------------------------------------------------------------------------

/// Host of the JPL Horizons telnet interface
pub const HORIZONS_HOST: &str = "horizons.jpl.nasa.gov";

/// Port of the JPL Horizons telnet interface
pub const HORIZONS_PORT: u16 = 6775;

/// Window size announced through NAWS, large enough that Horizons never paginates
pub const WINDOW_SIZE: u16 = 128;

/// Terminal type announced through TERMINAL-TYPE
pub const TERMINAL_TYPE: &str = "DEC-VT100";

// -------------------------------------------------------------------------------------------------
// Unit conversions
// -------------------------------------------------------------------------------------------------

/// Number of seconds in a Julian day
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Hours of right ascension → degrees
pub const DEG_PER_HOUR: f64 = 15.0;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in degrees
pub type Degree = f64;
/// Julian day (UTC for dialogue input, TDB for vector tables)
pub type JulianDay = f64;
/// Duration in seconds
pub type Seconds = f64;
