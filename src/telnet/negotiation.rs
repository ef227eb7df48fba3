//! # Telnet option negotiation
//!
//! Horizons opens every session with a burst of option requests
//! (`WILL ECHO`, `WILL SGA`, `DO NAWS`, `DO TTYPE`) and waits for a terminal to answer them.
//! [`OptionNegotiator`] plays that terminal: it maps each inbound [`NegotiationEvent`] to
//! the bytes to send back, and keeps no state between events.
//!
//! ## Reply policy
//!
//! | Inbound              | Reply                                                      |
//! |----------------------|------------------------------------------------------------|
//! | `WILL ECHO`/`WILL SGA` | `DO <opt>`                                               |
//! | `WILL <other>`       | `DONT <other>`                                             |
//! | `DO NAWS`            | `WILL NAWS`, then `SB NAWS <w:u16 BE> <h:u16 BE> SE`       |
//! | `DO TTYPE`           | `WILL TTYPE`, then `SB TTYPE IS "<terminal>" SE`           |
//! | `DO <other>`         | `WONT <other>`                                             |
//! | `WONT`/`DONT` any    | nothing                                                    |
//!
//! The window size defaults to 128×128 so the remote never paginates, and the terminal type
//! to `DEC-VT100`.
use std::fmt;

use crate::constants::{
    DO, DONT, IAC, OPT_ECHO, OPT_NAWS, OPT_SGA, OPT_TTYPE, SB, SE, TERMINAL_TYPE, TTYPE_IS,
    WILL, WINDOW_SIZE, WONT,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TelnetCommand {
    Will,
    Wont,
    Do,
    Dont,
}

impl TelnetCommand {
    /// Decode a negotiation verb, `None` for any other command byte.
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            WILL => Some(TelnetCommand::Will),
            WONT => Some(TelnetCommand::Wont),
            DO => Some(TelnetCommand::Do),
            DONT => Some(TelnetCommand::Dont),
            _ => None,
        }
    }

    pub fn to_byte(self) -> u8 {
        match self {
            TelnetCommand::Will => WILL,
            TelnetCommand::Wont => WONT,
            TelnetCommand::Do => DO,
            TelnetCommand::Dont => DONT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TelnetOption {
    Echo,
    SuppressGoAhead,
    Naws,
    TerminalType,
    Other(u8),
}

impl From<u8> for TelnetOption {
    fn from(byte: u8) -> Self {
        match byte {
            OPT_ECHO => TelnetOption::Echo,
            OPT_SGA => TelnetOption::SuppressGoAhead,
            OPT_NAWS => TelnetOption::Naws,
            OPT_TTYPE => TelnetOption::TerminalType,
            other => TelnetOption::Other(other),
        }
    }
}

impl From<TelnetOption> for u8 {
    fn from(option: TelnetOption) -> Self {
        match option {
            TelnetOption::Echo => OPT_ECHO,
            TelnetOption::SuppressGoAhead => OPT_SGA,
            TelnetOption::Naws => OPT_NAWS,
            TelnetOption::TerminalType => OPT_TTYPE,
            TelnetOption::Other(other) => other,
        }
    }
}

/// One inbound `IAC <command> <option>` triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NegotiationEvent {
    pub command: TelnetCommand,
    pub option: TelnetOption,
}

impl NegotiationEvent {
    pub fn new(command: TelnetCommand, option: TelnetOption) -> Self {
        NegotiationEvent { command, option }
    }
}

impl fmt::Display for NegotiationEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} {:?}", self.command, self.option)
    }
}

/// Stateless answerer for inbound option negotiation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionNegotiator {
    window_width: u16,
    window_height: u16,
    terminal_type: String,
}

impl Default for OptionNegotiator {
    fn default() -> Self {
        OptionNegotiator::new(WINDOW_SIZE, WINDOW_SIZE, TERMINAL_TYPE.to_string())
    }
}

impl OptionNegotiator {
    pub fn new(window_width: u16, window_height: u16, terminal_type: String) -> Self {
        OptionNegotiator {
            window_width,
            window_height,
            terminal_type,
        }
    }

    /// Compute the bytes answering one negotiation event.
    ///
    /// Arguments
    /// ---------
    /// * `event`: the inbound `IAC <command> <option>` triple
    ///
    /// Return
    /// ------
    /// * the reply, possibly empty (`WONT` and `DONT` are never answered)
    pub fn respond(&self, event: NegotiationEvent) -> Vec<u8> {
        use TelnetCommand::*;
        use TelnetOption::*;

        let opt = u8::from(event.option);
        match (event.command, event.option) {
            (Will, Echo | SuppressGoAhead) => vec![IAC, DO, opt],
            (Will, _) => vec![IAC, DONT, opt],
            (Do, Naws) => {
                let mut payload = Vec::with_capacity(4);
                payload.extend_from_slice(&self.window_width.to_be_bytes());
                payload.extend_from_slice(&self.window_height.to_be_bytes());

                let mut reply = vec![IAC, WILL, opt];
                reply.extend(subnegotiation(opt, &payload));
                reply
            }
            (Do, TerminalType) => {
                let mut payload = vec![TTYPE_IS];
                payload.extend_from_slice(self.terminal_type.as_bytes());

                let mut reply = vec![IAC, WILL, opt];
                reply.extend(subnegotiation(opt, &payload));
                reply
            }
            (Do, _) => vec![IAC, WONT, opt],
            (Wont | Dont, _) => Vec::new(),
        }
    }
}

/// Frame a subnegotiation as `IAC SB <option> <payload> IAC SE`, doubling any 0xFF payload byte.
fn subnegotiation(option: u8, payload: &[u8]) -> Vec<u8> {
    let mut frame = Vec::with_capacity(payload.len() + 5);
    frame.extend_from_slice(&[IAC, SB, option]);
    for &byte in payload {
        if byte == IAC {
            frame.push(IAC);
        }
        frame.push(byte);
    }
    frame.extend_from_slice(&[IAC, SE]);
    frame
}

#[cfg(test)]
mod negotiation_test {
    use super::*;

    fn event(command: TelnetCommand, option: u8) -> NegotiationEvent {
        NegotiationEvent::new(command, option.into())
    }

    #[test]
    fn test_will_echo_and_sga_are_accepted() {
        let negotiator = OptionNegotiator::default();
        assert_eq!(
            negotiator.respond(event(TelnetCommand::Will, OPT_ECHO)),
            vec![IAC, DO, OPT_ECHO]
        );
        assert_eq!(
            negotiator.respond(event(TelnetCommand::Will, OPT_SGA)),
            vec![IAC, DO, OPT_SGA]
        );
    }

    #[test]
    fn test_other_will_is_declined() {
        let negotiator = OptionNegotiator::default();
        for opt in (0..=255u8).filter(|o| *o != OPT_ECHO && *o != OPT_SGA) {
            assert_eq!(
                negotiator.respond(event(TelnetCommand::Will, opt)),
                vec![IAC, DONT, opt],
                "option {opt}"
            );
        }
    }

    #[test]
    fn test_do_naws_reports_128_by_128() {
        let negotiator = OptionNegotiator::default();
        assert_eq!(
            negotiator.respond(event(TelnetCommand::Do, OPT_NAWS)),
            vec![IAC, WILL, OPT_NAWS, IAC, SB, OPT_NAWS, 0x00, 0x80, 0x00, 0x80, IAC, SE]
        );
    }

    #[test]
    fn test_do_naws_escapes_iac_in_payload() {
        let negotiator = OptionNegotiator::new(255, 0x0102, "X".into());
        assert_eq!(
            negotiator.respond(event(TelnetCommand::Do, OPT_NAWS)),
            vec![IAC, WILL, OPT_NAWS, IAC, SB, OPT_NAWS, 0x00, IAC, IAC, 0x01, 0x02, IAC, SE]
        );
    }

    #[test]
    fn test_do_ttype_announces_vt100() {
        let negotiator = OptionNegotiator::default();
        let mut expected = vec![IAC, WILL, OPT_TTYPE, IAC, SB, OPT_TTYPE, TTYPE_IS];
        expected.extend_from_slice(b"DEC-VT100");
        expected.extend_from_slice(&[IAC, SE]);
        assert_eq!(
            negotiator.respond(event(TelnetCommand::Do, OPT_TTYPE)),
            expected
        );
    }

    #[test]
    fn test_other_do_is_refused() {
        let negotiator = OptionNegotiator::default();
        assert_eq!(
            negotiator.respond(event(TelnetCommand::Do, OPT_ECHO)),
            vec![IAC, WONT, OPT_ECHO]
        );
        assert_eq!(
            negotiator.respond(event(TelnetCommand::Do, 32)),
            vec![IAC, WONT, 32]
        );
    }

    #[test]
    fn test_wont_and_dont_are_ignored() {
        let negotiator = OptionNegotiator::default();
        assert!(negotiator
            .respond(event(TelnetCommand::Wont, OPT_ECHO))
            .is_empty());
        assert!(negotiator
            .respond(event(TelnetCommand::Dont, OPT_NAWS))
            .is_empty());
    }

    #[test]
    fn test_option_byte_round_trip() {
        for byte in [OPT_ECHO, OPT_SGA, OPT_NAWS, OPT_TTYPE, 42] {
            assert_eq!(u8::from(TelnetOption::from(byte)), byte);
        }
        assert_eq!(TelnetCommand::from_byte(SB), None);
    }
}
