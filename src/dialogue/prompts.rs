//! # Horizons prompt table
//!
//! Every literal the dialogue matches or types lives here. The markers are substrings of
//! prompts written for humans and owned by JPL; when the service rewords one of them the
//! corresponding wait times out, and this file is the only place to update.
//!
//! Markers are case-sensitive and matched anywhere in the inbound stream.

// -------------------------------------------------------------------------------------------------
// Markers (remote → client)
// -------------------------------------------------------------------------------------------------

/// Main command prompt
pub const HORIZONS_PROMPT: &str = "Horizons>";
/// Body lookup confirmation, e.g. `Continue [ <cr>=yes, n=no, ? ] :`
pub const CONFIRM_MATCH: &str = "<cr>";
/// Post-lookup menu, e.g. `Select ... [E]phemeris, [F]tp, [M]ail, [R]edisplay, ?, <cr>:`
pub const EPHEMERIS_MENU: &str = "[E]phemeris";
/// Table type, e.g. `Observe, Elements, Vectors  [o,e,v,?] :`
pub const TABLE_TYPE: &str = "Observe, Elements, Vectors";
/// Origin of the coordinates, e.g. `Coordinate center [ <id>,coord,geo  ] :`
pub const COORDINATE_CENTER: &str = "Coordinate center";
pub const START_TIME: &str = "Starting UT";
pub const END_TIME: &str = "Ending   UT";
/// e.g. `Output interval [ex: 10m, 1h, 1d, ? ] :`
pub const OUTPUT_INTERVAL: &str = "Output interval";
/// e.g. `Accept default output [ cr=(y), n, ?] :`
pub const ACCEPT_DEFAULT_OUTPUT: &str = "Accept default output";
/// e.g. `Select table quantities [ <#,#..>, ?] :`
pub const TABLE_QUANTITIES: &str = "Select table quantities";
/// Printed once the ephemeris generation starts
pub const WORKING: &str = "Working ...";
pub const START_OF_EPHEMERIS: &str = "$$SOE";
pub const END_OF_EPHEMERIS: &str = "$$EOE";
/// Post-ephemeris menu, e.g. `>>> Select... [A]gain, [N]ew-case, [F]tp, [K]ermit, [M]ail, [R]edisplay, ? :`
pub const AFTER_EPHEMERIS: &str = ">>> Select...";

// -------------------------------------------------------------------------------------------------
// Replies (client → remote)
// -------------------------------------------------------------------------------------------------

/// Accept the proposed default
pub const ACCEPT: &str = "";
/// Toggle pagination off
pub const DISABLE_PAGING: &str = "PAGE";
pub const SELECT_EPHEMERIS: &str = "E";
pub const SELECT_OBSERVER_TABLE: &str = "o";
pub const SELECT_VECTORS_TABLE: &str = "v";
/// Geocentric observer
pub const GEOCENTER: &str = "geo";
/// Solar system barycentre
pub const BARYCENTER: &str = "@0";
pub const ECLIPTIC_PLANE: &str = "eclip";
/// Observer quantity 1: astrometric RA and Dec
pub const ASTROMETRIC_RA_DEC: &str = "1";
/// Step of the single-epoch vector windows
pub const VECTOR_STEP: &str = "1h";
pub const DECLINE_DEFAULT_OUTPUT: &str = "n";
pub const REFERENCE_FRAME: &str = "J2000";
/// Light-time corrections: NONE
pub const NO_CORRECTIONS: &str = "1";
/// Output units: AU and days
pub const AU_AND_DAYS: &str = "2";
/// CSV format: YES
pub const CSV_FORMAT: &str = "YES";
/// Label the cartesian output: YES
pub const LABEL_OUTPUT: &str = "YES";
/// Vector table type 3: state vector, light time, range and range rate
pub const STATE_WITH_RANGE: &str = "3";
/// From the post-ephemeris menu: run again with new times
pub const AGAIN: &str = "A";
pub const QUIT: &str = "q";

/// Render a julian day the way the time prompts expect it, with nine decimals.
pub fn jd_reply(jd: f64) -> String {
    format!("JD {jd:.9}")
}
