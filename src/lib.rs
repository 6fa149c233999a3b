#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::unnecessary_literal_bound,
    clippy::module_name_repetitions,
    clippy::struct_field_names,
    clippy::must_use_candidate,
    clippy::new_without_default,
    clippy::return_self_not_must_use
)]

pub mod config;
pub mod core;
pub mod delivery;
pub mod error;
pub mod job;
pub mod runtime;

pub use crate::config::Config;
pub use crate::core::agent::{Summarizer, SummarizerOptions};
pub use crate::core::summary::CallSummary;
pub use crate::error::{CallerError, Result};
pub use crate::job::{DailyJob, DailyReport};
