#![allow(dead_code)]

use std::{
    io::{ErrorKind, Read, Write},
    net::TcpListener,
    thread::{self, JoinHandle},
    time::Duration,
};

use horizons_telnet::config::HorizonsConfig;

const SERVER_READ_TIMEOUT: Duration = Duration::from_secs(5);

/// One move of the scripted fake Horizons server.
#[derive(Debug, Clone)]
pub enum Action {
    /// Write raw bytes to the client
    Send(Vec<u8>),
    /// Read until the client has sent `text` (after the previous expectation)
    Expect(String),
    Pause(Duration),
    /// Drop the connection right away
    Close,
}

pub fn send(text: &str) -> Action {
    Action::Send(text.as_bytes().to_vec())
}

pub fn expect(text: &str) -> Action {
    Action::Expect(text.to_string())
}

/// A single-connection fake Horizons endpoint on `127.0.0.1`.
///
/// Once the actions are exhausted the server keeps reading until the client closes, so
/// [`FakeHorizons::finish`] returns every byte the client ever sent.
pub struct FakeHorizons {
    pub port: u16,
    handle: JoinHandle<Vec<u8>>,
}

impl FakeHorizons {
    pub fn spawn(actions: Vec<Action>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();

        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            stream.set_read_timeout(Some(SERVER_READ_TIMEOUT)).unwrap();

            let mut received = Vec::new();
            let mut cursor = 0;
            let mut chunk = [0u8; 1024];

            for action in actions {
                match action {
                    Action::Send(bytes) => stream.write_all(&bytes).unwrap(),
                    Action::Pause(delay) => thread::sleep(delay),
                    Action::Close => return received,
                    Action::Expect(text) => loop {
                        if let Some(pos) = find(&received[cursor..], text.as_bytes()) {
                            cursor += pos + text.len();
                            break;
                        }
                        match stream.read(&mut chunk) {
                            Ok(0) => panic!(
                                "client closed while server expected {text:?}, got {:?}",
                                String::from_utf8_lossy(&received)
                            ),
                            Ok(n) => received.extend_from_slice(&chunk[..n]),
                            Err(err) => panic!("server expected {text:?}: {err}"),
                        }
                    },
                }
            }

            // drain until the client hangs up
            loop {
                match stream.read(&mut chunk) {
                    Ok(0) => break,
                    Ok(n) => received.extend_from_slice(&chunk[..n]),
                    Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                    Err(_) => break,
                }
            }
            received
        });

        FakeHorizons { port, handle }
    }

    /// Wait for the server thread and return everything the client sent.
    pub fn finish(self) -> Vec<u8> {
        self.handle.join().unwrap()
    }

    /// A configuration pointing at this server, with short waits.
    pub fn config(&self) -> HorizonsConfig {
        HorizonsConfig {
            host: "127.0.0.1".into(),
            port: self.port,
            connect_timeout_secs: 2.0,
            prompt_timeout_secs: 2.0,
            data_timeout_secs: 2.0,
            working_timeout_secs: 2.0,
            ..HorizonsConfig::default()
        }
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

/// The interactive RA/Dec exchange: each prompt is followed by the line the client must type.
pub fn ra_dec_exchange(body: &str, start: &str, stop: &str, interval: &str) -> Vec<Action> {
    let prompts = [
        ("Horizons> ", "PAGE".to_string()),
        ("\r\nHorizons> ", body.to_string()),
        ("\r\n Continue [ <cr>=yes, n=no, ? ] : ", String::new()),
        (
            "\r\n Select ... [E]phemeris, [F]tp, [M]ail, [R]edisplay, ?, <cr>: ",
            "E".into(),
        ),
        ("\r\n Observe, Elements, Vectors  [o,e,v,?] : ", "o".into()),
        ("\r\n Coordinate center [ <id>,coord,geo  ] : ", "geo".into()),
        ("\r\n Starting UT  [>=   1980-Jan-01 00:00] : ", start.into()),
        ("\r\n Ending   UT  [<=   2022-Jan-01 00:00] : ", stop.into()),
        ("\r\n Output interval [ex: 10m, 1h, 1d, ? ] : ", interval.into()),
        ("\r\n Accept default output [ cr=(y), n, ?] : ", String::new()),
        ("\r\n Select table quantities [ <#,#..>, ?] : ", "1".into()),
    ];

    prompts
        .into_iter()
        .flat_map(|(prompt, reply)| [send(prompt), expect(&format!("{reply}\n"))])
        .collect()
}

pub const RA_DEC_TABLE: &str = "\r\n\
*******************************************************************************\r\n\
 Target body name: C/2012 S1 (ISON)                {source: JPL#38}\r\n\
*******************************************************************************\r\n\
 Date__(UT)__HR:MN     R.A._(ICRF)_DEC\r\n\
*******************************************************************************\r\n\
$$SOE\r\n\
 2013-Sep-01 00:00     08 44 11.23 +19 04 44.0\r\n\
 2013-Sep-02 00:00     08 45 59.02 +18 59 06.3\r\n\
 2013-Sep-03 00:00 *m  08 47 46.19 +18 53 17.8\r\n\
$$EOE\r\n\
*******************************************************************************\r\n\
>>> Select... [A]gain, [N]ew-case, [F]tp, [K]ermit, [M]ail, [R]edisplay, ? : ";

/// A one-record CSV vectors table as printed in the series mode.
pub fn vector_table(jd: f64, working: bool) -> String {
    format!(
        "{}\r\n\
         ******************************************************************************\r\n\
         \x20           JDTDB,            Calendar Date (TDB),                      X,                      Y,                      Z,                     VX,                     VY,                     VZ,                     LT,                     RG,                     RR,\r\n\
         **************************************************************************************************************************************************************************************************************************************\r\n\
         $$SOE\r\n\
         {jd:.9}, A.D. 2007-Feb-24 00:00:00.0000, -9.174516087727740E-01,  3.802998236401430E-01,  1.626285016154088E-04, -6.891487218547610E-03, -1.592780573960130E-02,  5.416862484843399E-07,  5.738440906108950E-03,  9.935832591506541E-01, -3.155097618451282E-05,\r\n\
         $$EOE\r\n\
         **************************************************************************************************************************************************************************************************************************************\r\n\
         >>> Select... [A]gain, [N]ew-case, [F]tp, [K]ermit, [M]ail, [R]edisplay, ? : ",
        if working { "Working ...  " } else { "" }
    )
}
