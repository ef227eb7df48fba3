//! # Dialogue scripts
//!
//! A script is an ordered list of [`PromptStep`]s executed in sequence, with no branching:
//! wait for the step's marker (if any), then type its reply (if any). A failure is therefore
//! always attributable to one step index.
//!
//! Three scripts drive Horizons:
//!
//! * [`ra_dec_script`]: interactive walk through the observer-table menu, one marker per reply;
//! * [`vectors_cold_script`]: login, then the whole vectors menu typed ahead in one go;
//! * [`vectors_warm_script`]: from the post-ephemeris menu, re-run the same case for a new
//!   window. It assumes the remote kept the previous table settings.
use std::time::Duration;

use crate::{config::HorizonsConfig, constants::JulianDay};

use super::prompts::*;

#[derive(Debug, Clone, PartialEq)]
pub struct PromptStep {
    /// Substring to wait for; `None` types the reply right away
    pub marker: Option<&'static str>,
    /// Text typed once the marker is seen, without line terminator
    pub reply: Option<String>,
    pub timeout: Duration,
}

impl PromptStep {
    /// Wait for `marker`, then type `reply`.
    pub fn answer(marker: &'static str, reply: impl Into<String>, timeout: Duration) -> Self {
        PromptStep {
            marker: Some(marker),
            reply: Some(reply.into()),
            timeout,
        }
    }

    /// Wait for `marker` and keep what was received.
    pub fn expect(marker: &'static str, timeout: Duration) -> Self {
        PromptStep {
            marker: Some(marker),
            reply: None,
            timeout,
        }
    }

    /// Type `reply` ahead without waiting for a prompt.
    pub fn type_ahead(reply: impl Into<String>) -> Self {
        PromptStep {
            marker: None,
            reply: Some(reply.into()),
            timeout: Duration::ZERO,
        }
    }
}

/// Wait bounds of the three kinds of steps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepTimeouts {
    pub prompt: Duration,
    pub data: Duration,
    pub working: Duration,
}

impl From<&HorizonsConfig> for StepTimeouts {
    fn from(config: &HorizonsConfig) -> Self {
        StepTimeouts {
            prompt: config.prompt_timeout(),
            data: config.data_timeout(),
            working: config.working_timeout(),
        }
    }
}

/// Wait for the first prompt and switch pagination off.
pub fn login_steps(t: &StepTimeouts) -> Vec<PromptStep> {
    vec![PromptStep::answer(HORIZONS_PROMPT, DISABLE_PAGING, t.prompt)]
}

/// Observer-table dialogue for geocentric astrometric RA/Dec over `[jd_start, jd_end]`.
///
/// The last two steps capture the table: the first ends with `$$SOE`, the second with `$$EOE`.
pub fn ra_dec_script(
    body: &str,
    jd_start: JulianDay,
    jd_end: JulianDay,
    interval: &str,
    t: &StepTimeouts,
) -> Vec<PromptStep> {
    let mut steps = login_steps(t);
    steps.extend([
        PromptStep::answer(HORIZONS_PROMPT, body, t.prompt),
        PromptStep::answer(CONFIRM_MATCH, ACCEPT, t.prompt),
        PromptStep::answer(EPHEMERIS_MENU, SELECT_EPHEMERIS, t.prompt),
        PromptStep::answer(TABLE_TYPE, SELECT_OBSERVER_TABLE, t.prompt),
        PromptStep::answer(COORDINATE_CENTER, GEOCENTER, t.prompt),
        PromptStep::answer(START_TIME, jd_reply(jd_start), t.prompt),
        PromptStep::answer(END_TIME, jd_reply(jd_end), t.prompt),
        PromptStep::answer(OUTPUT_INTERVAL, interval, t.prompt),
        PromptStep::answer(ACCEPT_DEFAULT_OUTPUT, ACCEPT, t.prompt),
        PromptStep::answer(TABLE_QUANTITIES, ASTROMETRIC_RA_DEC, t.prompt),
        PromptStep::expect(START_OF_EPHEMERIS, t.data),
        PromptStep::expect(END_OF_EPHEMERIS, t.data),
    ]);
    steps
}

/// Login and first vectors table: barycentric, ecliptic J2000, AU/days, CSV,
/// over `[jd, jd + margin_days]`.
///
/// The last step's transcript holds the table.
pub fn vectors_cold_script(
    body: &str,
    jd: JulianDay,
    margin_days: f64,
    t: &StepTimeouts,
) -> Vec<PromptStep> {
    let mut steps = login_steps(t);
    steps.push(PromptStep::answer(HORIZONS_PROMPT, body, t.prompt));
    steps.extend(
        [
            ACCEPT.to_string(),
            SELECT_EPHEMERIS.to_string(),
            SELECT_VECTORS_TABLE.to_string(),
            BARYCENTER.to_string(),
            ECLIPTIC_PLANE.to_string(),
            jd_reply(jd),
            jd_reply(jd + margin_days),
            VECTOR_STEP.to_string(),
            DECLINE_DEFAULT_OUTPUT.to_string(),
            REFERENCE_FRAME.to_string(),
            NO_CORRECTIONS.to_string(),
            AU_AND_DAYS.to_string(),
            CSV_FORMAT.to_string(),
            LABEL_OUTPUT.to_string(),
            STATE_WITH_RANGE.to_string(),
        ]
        .into_iter()
        .map(PromptStep::type_ahead),
    );
    steps.push(PromptStep::expect(WORKING, t.working));
    steps.push(PromptStep::expect(AFTER_EPHEMERIS, t.data));
    steps
}

/// Same case again for `[jd, jd + margin_days]`, reusing the settings of the previous run.
pub fn vectors_warm_script(jd: JulianDay, margin_days: f64, t: &StepTimeouts) -> Vec<PromptStep> {
    let mut steps: Vec<PromptStep> = [
        AGAIN.to_string(),
        SELECT_EPHEMERIS.to_string(),
        SELECT_VECTORS_TABLE.to_string(),
        ACCEPT.to_string(),
        ECLIPTIC_PLANE.to_string(),
        jd_reply(jd),
        jd_reply(jd + margin_days),
        VECTOR_STEP.to_string(),
        ACCEPT.to_string(),
    ]
    .into_iter()
    .map(PromptStep::type_ahead)
    .collect();
    steps.push(PromptStep::expect(AFTER_EPHEMERIS, t.data));
    steps
}
