//! Client for the JPL Horizons telnet service.
//!
//! [`telnet`] holds the byte-level session, [`dialogue`] the scripted menu walk and
//! [`ephemeris`] the parsers turning the returned tables into typed series.

pub mod config;
pub mod constants;
pub mod conversion;
pub mod dialogue;
pub mod ephemeris;
pub mod horizons_errors;
pub mod table_output;
pub mod telnet;
pub mod time;

pub use config::{HorizonsConfig, LineEnding};
pub use dialogue::{DialogueDriver, SeriesFetch};
pub use ephemeris::{
    parse_ra_dec, parse_vectors, EphemerisSeries, RawEphemerisBlock, RaDecSample, VectorSample,
};
pub use horizons_errors::{HorizonsError, ParseEphemError};
pub use telnet::{OptionNegotiator, Session, Transport};
