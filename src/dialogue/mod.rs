//! The scripted Horizons conversation.
//!
//! - [`prompts`]: every marker and canned reply, in one table.
//! - [`script`]: the ordered step lists of each dialogue.
//! - [`driver`]: runs a script on a transport and collects the ephemeris blocks.

pub mod driver;
pub mod prompts;
pub mod script;

pub use driver::{DialogueDriver, EpochBlock, EpochFailure, SeriesFetch};
pub use script::{PromptStep, StepTimeouts};
