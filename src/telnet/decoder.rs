use crate::constants::{IAC, SB, SE};

use super::negotiation::{NegotiationEvent, TelnetCommand};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum DecodeState {
    #[default]
    Data,
    Iac,
    Negotiate(TelnetCommand),
    Subnegotiation,
    SubnegotiationIac,
}

/// Incremental splitter of a raw telnet byte stream.
///
/// Data bytes are appended to the caller's buffer, negotiation triples come back as
/// [`NegotiationEvent`]s. Subnegotiation blocks and two-byte commands (NOP, GA, ...) are
/// swallowed, NUL bytes are dropped. The state survives between calls so a sequence split
/// across two reads decodes the same as one delivered whole.
#[derive(Debug, Default)]
pub struct TelnetDecoder {
    state: DecodeState,
}

impl TelnetDecoder {
    pub fn new() -> Self {
        TelnetDecoder::default()
    }

    /// Decode one chunk of inbound bytes.
    ///
    /// Arguments
    /// ---------
    /// * `input`: raw bytes as read from the socket
    /// * `data`: buffer receiving the application data bytes
    ///
    /// Return
    /// ------
    /// * the negotiation events found in `input`, in stream order
    pub fn decode(&mut self, input: &[u8], data: &mut Vec<u8>) -> Vec<NegotiationEvent> {
        let mut events = Vec::new();

        for &byte in input {
            self.state = match self.state {
                DecodeState::Data => match byte {
                    IAC => DecodeState::Iac,
                    0 => DecodeState::Data,
                    _ => {
                        data.push(byte);
                        DecodeState::Data
                    }
                },
                DecodeState::Iac => match byte {
                    IAC => {
                        data.push(IAC);
                        DecodeState::Data
                    }
                    SB => DecodeState::Subnegotiation,
                    _ => match TelnetCommand::from_byte(byte) {
                        Some(command) => DecodeState::Negotiate(command),
                        None => DecodeState::Data,
                    },
                },
                DecodeState::Negotiate(command) => {
                    events.push(NegotiationEvent::new(command, byte.into()));
                    DecodeState::Data
                }
                DecodeState::Subnegotiation => match byte {
                    IAC => DecodeState::SubnegotiationIac,
                    _ => DecodeState::Subnegotiation,
                },
                DecodeState::SubnegotiationIac => match byte {
                    SE => DecodeState::Data,
                    _ => DecodeState::Subnegotiation,
                },
            };
        }

        events
    }
}

#[cfg(test)]
mod decoder_test {
    use super::*;
    use crate::constants::{DO, OPT_ECHO, OPT_NAWS, OPT_TTYPE, WILL};
    use crate::telnet::negotiation::TelnetOption;

    #[test]
    fn test_plain_data() {
        let mut decoder = TelnetDecoder::new();
        let mut data = Vec::new();
        let events = decoder.decode(b"Horizons> ", &mut data);
        assert!(events.is_empty());
        assert_eq!(data, b"Horizons> ");
    }

    #[test]
    fn test_negotiation_is_not_data() {
        let mut decoder = TelnetDecoder::new();
        let mut data = Vec::new();
        let mut input = vec![IAC, WILL, OPT_ECHO, b'a', IAC, DO, OPT_NAWS, b'b'];
        input.extend_from_slice(&[IAC, DO, OPT_TTYPE]);
        let events = decoder.decode(&input, &mut data);
        assert_eq!(data, b"ab");
        assert_eq!(
            events,
            vec![
                NegotiationEvent::new(TelnetCommand::Will, TelnetOption::Echo),
                NegotiationEvent::new(TelnetCommand::Do, TelnetOption::Naws),
                NegotiationEvent::new(TelnetCommand::Do, TelnetOption::TerminalType),
            ]
        );
    }

    #[test]
    fn test_split_sequence() {
        let mut decoder = TelnetDecoder::new();
        let mut data = Vec::new();
        assert!(decoder.decode(&[b'x', IAC], &mut data).is_empty());
        assert!(decoder.decode(&[WILL], &mut data).is_empty());
        let events = decoder.decode(&[OPT_ECHO, b'y'], &mut data);
        assert_eq!(
            events,
            vec![NegotiationEvent::new(TelnetCommand::Will, TelnetOption::Echo)]
        );
        assert_eq!(data, b"xy");
    }

    #[test]
    fn test_escaped_iac_nul_and_commands() {
        let mut decoder = TelnetDecoder::new();
        let mut data = Vec::new();
        // IAC IAC, CR NUL, IAC NOP (241), IAC GA (249)
        let events = decoder.decode(&[b'a', IAC, IAC, b'\r', 0, IAC, 241, IAC, 249, b'b'], &mut data);
        assert!(events.is_empty());
        assert_eq!(data, vec![b'a', IAC, b'\r', b'b']);
    }

    #[test]
    fn test_subnegotiation_is_swallowed() {
        let mut decoder = TelnetDecoder::new();
        let mut data = Vec::new();
        let events = decoder.decode(&[IAC, SB, OPT_TTYPE, 1, IAC, IAC, b'z'], &mut data);
        assert!(events.is_empty());
        assert!(data.is_empty());
        decoder.decode(&[IAC, SE, b'o', b'k'], &mut data);
        assert_eq!(data, b"ok");
    }
}
