use std::time::Duration;

use thiserror::Error;

/// Line-level failures raised while turning a raw Horizons block into samples.
///
/// `line` is the 1-based position of the offending record inside the data lines
/// (0 when the failure concerns the block as a whole).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseEphemError {
    #[error("line {line}: expected {expected} fields, found {found}")]
    FieldCount {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("line {line}: expected at least {expected} tokens, found {found}")]
    TokenCount {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("line {line}: invalid number in field '{field}': {value}")]
    InvalidNumber {
        line: usize,
        field: &'static str,
        value: String,
    },

    #[error("line {line}: invalid timestamp: {value}")]
    InvalidTimestamp { line: usize, value: String },

    #[error("line {line}: invalid right ascension: {value}")]
    InvalidRa { line: usize, value: String },

    #[error("line {line}: invalid declination: {value}")]
    InvalidDec { line: usize, value: String },

    #[error("marker {0} not found in the transcript")]
    MissingMarker(&'static str),

    #[error("line {line}: epoch {jd} is earlier than the previous epoch {previous}")]
    DecreasingEpoch { line: usize, jd: f64, previous: f64 },
}

#[derive(Error, Debug)]
pub enum HorizonsError {
    #[error("Unable to connect to {host}:{port}: {source}")]
    Connection {
        host: String,
        port: u16,
        #[source]
        source: std::io::Error,
    },

    #[error("Connection to {host}:{port} not established after {timeout:?}")]
    ConnectTimeout {
        host: String,
        port: u16,
        timeout: Duration,
    },

    #[error("Connection closed by the remote while waiting for {marker:?}")]
    ConnectionClosed { marker: String },

    #[error("Session is not connected")]
    NotConnected,

    #[error("Transport I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Marker {marker:?} not received within {timeout:?}")]
    Timeout { marker: String, timeout: Duration },

    #[error("Ephemeris parse error: {0}")]
    Parse(#[from] ParseEphemError),

    #[error("Table for epoch {requested} starts at {received}, outside the requested window")]
    EpochMismatch { requested: f64, received: f64 },

    #[error("Julian day {jd} has no interior bracket in series [{first}, {last}]")]
    OutOfRange { jd: f64, first: f64, last: f64 },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Invalid TOML configuration: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("CSV table error: {0}")]
    Csv(#[from] csv::Error),
}

impl HorizonsError {
    /// True for every failure of the transport itself (unreachable, dropped, closed).
    pub fn is_connection(&self) -> bool {
        use HorizonsError::*;
        matches!(
            self,
            Connection { .. } | ConnectTimeout { .. } | ConnectionClosed { .. } | NotConnected | Io(_)
        )
    }

    /// True when an expected marker never showed up.
    pub fn is_timeout(&self) -> bool {
        matches!(self, HorizonsError::Timeout { .. })
    }
}

impl PartialEq for HorizonsError {
    fn eq(&self, other: &Self) -> bool {
        use HorizonsError::*;
        match (self, other) {
            (Connection { host: h1, port: p1, .. }, Connection { host: h2, port: p2, .. }) => {
                h1 == h2 && p1 == p2
            }
            (
                ConnectTimeout { host: h1, port: p1, timeout: t1 },
                ConnectTimeout { host: h2, port: p2, timeout: t2 },
            ) => h1 == h2 && p1 == p2 && t1 == t2,
            (ConnectionClosed { marker: a }, ConnectionClosed { marker: b }) => a == b,
            (Timeout { marker: m1, timeout: t1 }, Timeout { marker: m2, timeout: t2 }) => {
                m1 == m2 && t1 == t2
            }
            (Parse(a), Parse(b)) => a == b,
            (
                OutOfRange { jd: j1, first: f1, last: l1 },
                OutOfRange { jd: j2, first: f2, last: l2 },
            ) => j1 == j2 && f1 == f2 && l1 == l2,
            (
                EpochMismatch { requested: r1, received: x1 },
                EpochMismatch { requested: r2, received: x2 },
            ) => r1 == r2 && x1 == x2,
            (Config(a), Config(b)) => a == b,

            // not comparable: same variant is enough
            (NotConnected, NotConnected) => true,
            (Io(_), Io(_)) => true,
            (Toml(_), Toml(_)) => true,
            (Csv(_), Csv(_)) => true,

            _ => false,
        }
    }
}
