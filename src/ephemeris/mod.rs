//! Ephemeris data: the raw `$$SOE`/`$$EOE` block, the typed samples and the parsers
//! converting one into the other.

pub mod parser;
pub mod raw_block;
pub mod samples;

pub use parser::{parse_ra_dec, parse_vectors};
pub use raw_block::RawEphemerisBlock;
pub use samples::{EphemerisSeries, RaDecSample, Sample, VectorSample};
