//! # Dialogue driver
//!
//! [`DialogueDriver`] walks the Horizons menus through a [`Transport`] and hands back the raw
//! ephemeris text. Two modes are offered:
//!
//! * [`DialogueDriver::fetch_ra_dec`]: one geocentric observer table over a time span. Every
//!   step waits for its prompt before answering, and any failure aborts the fetch.
//! * [`DialogueDriver::fetch_series`]: one barycentric vectors table per requested epoch,
//!   all on a single session. The first epoch types the whole menu ahead, the following ones
//!   restart from the post-ephemeris menu with `A`gain. A failing epoch is recorded and the
//!   loop moves on to the next one.
//!
//! In the series mode a table must belong to the epoch that asked for it. After a timeout
//! the driver waits once more for the post-ephemeris menu, so that a late table is consumed
//! before the next `A`gain. Each table's first record must also lie in the requested
//! window; otherwise the epoch fails with [`HorizonsError::EpochMismatch`].
//!
//! Both modes finish by typing `q` (best effort) and closing the session, on success and on
//! failure alike.
//!
//! The dialogue itself is written against [`Transport`], so it can be exercised without a
//! network; the `fetch_*` entry points only add the session lifetime around it.
use tracing::{debug, info, warn};

use crate::{
    config::HorizonsConfig,
    constants::{JulianDay, SECONDS_PER_DAY},
    ephemeris::raw_block::RawEphemerisBlock,
    horizons_errors::HorizonsError,
    telnet::session::{Session, Transport},
};

use super::{
    prompts::{AFTER_EPHEMERIS, QUIT},
    script::{
        ra_dec_script, vectors_cold_script, vectors_warm_script, PromptStep, StepTimeouts,
    },
};

/// Tolerance on the first record of a table, covering the 9-decimal julian day replies.
const EPOCH_TOLERANCE_DAYS: f64 = 1.0 / SECONDS_PER_DAY;

/// Raw table obtained for one requested epoch of a series.
#[derive(Debug, Clone, PartialEq)]
pub struct EpochBlock {
    /// Position of the epoch in the request
    pub index: usize,
    pub jd: JulianDay,
    pub block: RawEphemerisBlock,
    /// Everything received for this epoch, up to the post-ephemeris menu
    pub transcript: String,
}

/// Error raised by one requested epoch of a series.
#[derive(Debug)]
pub struct EpochFailure {
    pub index: usize,
    pub jd: JulianDay,
    pub error: HorizonsError,
}

/// Outcome of a series fetch: one entry per requested epoch, either a block or a failure.
#[derive(Debug, Default)]
pub struct SeriesFetch {
    pub requested: usize,
    pub blocks: Vec<EpochBlock>,
    pub failures: Vec<EpochFailure>,
}

impl SeriesFetch {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty() && self.blocks.len() == self.requested
    }

    pub fn failed_indices(&self) -> Vec<usize> {
        self.failures.iter().map(|f| f.index).collect()
    }
}

pub struct DialogueDriver {
    config: HorizonsConfig,
}

impl DialogueDriver {
    pub fn new(config: HorizonsConfig) -> Self {
        DialogueDriver { config }
    }

    pub fn config(&self) -> &HorizonsConfig {
        &self.config
    }

    fn timeouts(&self) -> StepTimeouts {
        StepTimeouts::from(&self.config)
    }

    fn open(&self) -> Result<Session, HorizonsError> {
        Session::open_with(
            &self.config.host,
            self.config.port,
            self.config.negotiator(),
            self.config.connect_timeout(),
        )
    }

    /// Fetch a geocentric astrometric RA/Dec table for `body`.
    ///
    /// Arguments
    /// ---------
    /// * `body`: Horizons lookup string (name, designation or `DES=` form); it must resolve to
    ///   a single object, an ambiguous match ends in a timeout on the confirmation prompt
    /// * `jd_start`, `jd_end`: the time span, as julian days (UTC)
    /// * `interval`: Horizons step syntax, e.g. `1d`, `1h`, `10m`
    ///
    /// Return
    /// ------
    /// * the raw block between `$$SOE` and `$$EOE`
    /// * the first transport error, or `HorizonsError::Parse` when the markers are missing
    pub fn fetch_ra_dec(
        &self,
        body: &str,
        jd_start: JulianDay,
        jd_end: JulianDay,
        interval: &str,
    ) -> Result<RawEphemerisBlock, HorizonsError> {
        info!(body, jd_start, jd_end, interval, "fetching RA/Dec ephemeris");
        let mut session = self.open()?;
        let result = self.ra_dec_dialogue(&mut session, body, jd_start, jd_end, interval);
        self.hang_up(&mut session);
        result
    }

    /// Run the RA/Dec dialogue on an already open transport.
    pub fn ra_dec_dialogue<T: Transport>(
        &self,
        transport: &mut T,
        body: &str,
        jd_start: JulianDay,
        jd_end: JulianDay,
        interval: &str,
    ) -> Result<RawEphemerisBlock, HorizonsError> {
        let steps = ra_dec_script(body, jd_start, jd_end, interval, &self.timeouts());
        let transcripts = self.run_script(transport, &steps)?;

        // the last two waits end with $$SOE and $$EOE respectively
        let table = transcripts[transcripts.len() - 2..].concat();
        let block = RawEphemerisBlock::from_transcript(&table)?;
        info!(records = block.len(), "RA/Dec ephemeris received");
        Ok(block)
    }

    /// Fetch one barycentric vectors table per epoch of `jds`, on a single session.
    ///
    /// Arguments
    /// ---------
    /// * `body`: Horizons lookup string, resolving to a single object
    /// * `jds`: requested epochs (TDB julian days), in request order
    /// * `margin_secs`: width of the window `[jd, jd + margin]` requested for each epoch
    ///
    /// Return
    /// ------
    /// * a [`SeriesFetch`] tagging each block and each failure with its epoch index
    /// * `Err` only when no epoch is requested or the session cannot be opened
    pub fn fetch_series(
        &self,
        body: &str,
        jds: &[JulianDay],
        margin_secs: f64,
    ) -> Result<SeriesFetch, HorizonsError> {
        if jds.is_empty() {
            return Err(HorizonsError::Config("no epoch requested".into()));
        }
        info!(body, epochs = jds.len(), margin_secs, "fetching vector series");

        let mut session = self.open()?;
        let fetch = self.series_dialogue(&mut session, body, jds, margin_secs);
        self.hang_up(&mut session);

        info!(
            blocks = fetch.blocks.len(),
            failures = fetch.failures.len(),
            "vector series done"
        );
        Ok(fetch)
    }

    /// Run the series dialogue on an already open transport.
    pub fn series_dialogue<T: Transport>(
        &self,
        transport: &mut T,
        body: &str,
        jds: &[JulianDay],
        margin_secs: f64,
    ) -> SeriesFetch {
        let timeouts = self.timeouts();
        let margin_days = margin_secs / SECONDS_PER_DAY;
        let mut fetch = SeriesFetch {
            requested: jds.len(),
            ..SeriesFetch::default()
        };

        for (index, &jd) in jds.iter().enumerate() {
            let steps = if index == 0 {
                vectors_cold_script(body, jd, margin_days, &timeouts)
            } else {
                vectors_warm_script(jd, margin_days, &timeouts)
            };

            let outcome = self
                .run_script(transport, &steps)
                .and_then(|mut transcripts| {
                    let transcript = transcripts.pop().unwrap_or_default();
                    let block = RawEphemerisBlock::from_transcript(&transcript)?;
                    check_first_epoch(&block, jd, margin_days)?;
                    Ok((block, transcript))
                });

            match outcome {
                Ok((block, transcript)) => {
                    debug!(index, jd, records = block.len(), "epoch received");
                    fetch.blocks.push(EpochBlock {
                        index,
                        jd,
                        block,
                        transcript,
                    });
                }
                Err(error) => {
                    warn!(index, jd, %error, "epoch failed");
                    if error.is_timeout() || matches!(error, HorizonsError::EpochMismatch { .. }) {
                        self.resync(transport, &timeouts);
                    }
                    fetch.failures.push(EpochFailure { index, jd, error });
                }
            }
        }
        fetch
    }

    /// Execute `steps` in order and return, per step, the text received while waiting
    /// (empty for type-ahead steps).
    fn run_script<T: Transport>(
        &self,
        transport: &mut T,
        steps: &[PromptStep],
    ) -> Result<Vec<String>, HorizonsError> {
        let line_ending = self.config.line_ending.as_str();
        let mut transcripts = Vec::with_capacity(steps.len());

        for (step, PromptStep { marker, reply, timeout }) in steps.iter().enumerate() {
            let received = match marker {
                Some(marker) => transport.read_until(marker, *timeout).inspect_err(|error| {
                    warn!(step, marker, %error, "dialogue step failed");
                })?,
                None => String::new(),
            };

            if let Some(reply) = reply {
                transport
                    .send(&format!("{reply}{line_ending}"))
                    .inspect_err(|error| warn!(step, %error, "dialogue step failed"))?;
            }
            debug!(step, marker = ?marker, reply = ?reply, "dialogue step");
            transcripts.push(received);
        }
        Ok(transcripts)
    }

    /// Wait once for the post-ephemeris menu, discarding what comes before it.
    fn resync<T: Transport>(&self, transport: &mut T, timeouts: &StepTimeouts) {
        match transport.read_until(AFTER_EPHEMERIS, timeouts.data) {
            Ok(discarded) => debug!(bytes = discarded.len(), "late output discarded"),
            Err(error) => debug!(%error, "nothing left to discard"),
        }
    }

    /// Type `q` and close. A failing quit is only logged.
    fn hang_up<T: Transport>(&self, transport: &mut T) {
        let quit = format!("{QUIT}{}", self.config.line_ending.as_str());
        if let Err(error) = transport.send(&quit) {
            debug!(%error, "quit not delivered");
        }
        transport.close();
    }
}

/// Reject a table whose first record lies outside `[jd, jd + margin_days]`.
///
/// A first field that is not a number is left for the parser to report.
fn check_first_epoch(
    block: &RawEphemerisBlock,
    jd: JulianDay,
    margin_days: f64,
) -> Result<(), HorizonsError> {
    let Some(received) = block
        .data_lines
        .first()
        .and_then(|line| line.split(',').next())
        .and_then(|field| field.trim().parse::<f64>().ok())
    else {
        return Ok(());
    };

    if received < jd - EPOCH_TOLERANCE_DAYS || received > jd + margin_days + EPOCH_TOLERANCE_DAYS {
        return Err(HorizonsError::EpochMismatch {
            requested: jd,
            received,
        });
    }
    Ok(())
}
