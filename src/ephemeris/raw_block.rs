use std::fmt;

use crate::{
    dialogue::prompts::{END_OF_EPHEMERIS, START_OF_EPHEMERIS},
    horizons_errors::ParseEphemError,
};

/// The delimited table Horizons prints between `$$SOE` and `$$EOE`.
///
/// `header` holds everything the remote printed before the start marker (target, centre,
/// column labels, ...), `data_lines` one string per record with line terminators removed.
/// Blank lines inside the table are dropped.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawEphemerisBlock {
    pub header: String,
    pub data_lines: Vec<String>,
}

impl RawEphemerisBlock {
    pub fn new(header: String, data_lines: Vec<String>) -> Self {
        RawEphemerisBlock { header, data_lines }
    }

    /// Extract the block from a dialogue transcript.
    ///
    /// Arguments
    /// ---------
    /// * `transcript`: raw text containing a `$$SOE` line and, after it, a `$$EOE` line;
    ///   LF and CRLF line endings are both accepted
    ///
    /// Return
    /// ------
    /// * the block, or `ParseEphemError::MissingMarker` naming the absent marker
    pub fn from_transcript(transcript: &str) -> Result<Self, ParseEphemError> {
        let mut lines = transcript.lines();

        let mut header = Vec::new();
        loop {
            match lines.next() {
                Some(line) if line.trim() == START_OF_EPHEMERIS => break,
                Some(line) => header.push(line),
                None => return Err(ParseEphemError::MissingMarker(START_OF_EPHEMERIS)),
            }
        }

        let mut data_lines = Vec::new();
        loop {
            match lines.next() {
                Some(line) if line.trim() == END_OF_EPHEMERIS => break,
                Some(line) if line.trim().is_empty() => {}
                Some(line) => data_lines.push(line.trim_end().to_string()),
                None => return Err(ParseEphemError::MissingMarker(END_OF_EPHEMERIS)),
            }
        }

        Ok(RawEphemerisBlock {
            header: header.join("\n"),
            data_lines,
        })
    }

    pub fn len(&self) -> usize {
        self.data_lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data_lines.is_empty()
    }
}

/// Render the block back as Horizons prints it, header then the delimited records.
impl fmt::Display for RawEphemerisBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.header.is_empty() {
            writeln!(f, "{}", self.header)?;
        }
        writeln!(f, "{START_OF_EPHEMERIS}")?;
        for line in &self.data_lines {
            writeln!(f, "{line}")?;
        }
        writeln!(f, "{END_OF_EPHEMERIS}")
    }
}

#[cfg(test)]
mod raw_block_test {
    use super::*;

    #[test]
    fn test_from_transcript_crlf() {
        let transcript = "Working ...\r\n  JDTDB, Calendar Date (TDB), X,\r\n$$SOE\r\n\
            2451545.0, A.D. 2000-Jan-01 12:00:00.0000, 1.0,\r\n\
            \r\n\
            2451546.0, A.D. 2000-Jan-02 12:00:00.0000, 2.0,\r\n\
            $$EOE\r\n>>> Select... [A]gain, [N]ew-case";
        let block = RawEphemerisBlock::from_transcript(transcript).unwrap();
        assert_eq!(block.header, "Working ...\n  JDTDB, Calendar Date (TDB), X,");
        assert_eq!(
            block.data_lines,
            vec![
                "2451545.0, A.D. 2000-Jan-01 12:00:00.0000, 1.0,",
                "2451546.0, A.D. 2000-Jan-02 12:00:00.0000, 2.0,",
            ]
        );
        assert_eq!(block.len(), 2);
    }

    #[test]
    fn test_missing_markers() {
        assert_eq!(
            RawEphemerisBlock::from_transcript("no table here\n"),
            Err(ParseEphemError::MissingMarker("$$SOE"))
        );
        assert_eq!(
            RawEphemerisBlock::from_transcript("$$SOE\n1, 2, 3\n"),
            Err(ParseEphemError::MissingMarker("$$EOE"))
        );
    }

    #[test]
    fn test_display_reparses() {
        let block = RawEphemerisBlock::new(
            " Target body name: GALEX".into(),
            vec!["2451545.0, A.D. 2000-Jan-01 12:00:00.0000, 1.0,".into()],
        );
        let text = block.to_string();
        assert!(text.starts_with(" Target body name: GALEX\n$$SOE\n"));
        assert_eq!(RawEphemerisBlock::from_transcript(&text).unwrap(), block);
    }

    #[test]
    fn test_empty_table() {
        let block = RawEphemerisBlock::from_transcript("$$SOE\n$$EOE\n").unwrap();
        assert!(block.is_empty());
        assert_eq!(block.header, "");
    }
}
