pub mod build;
pub mod daily;

pub use build::{build_daily_job, build_email_source, build_summarizer};
pub use daily::{CallTarget, DailyJob, DailyReport, summarize_within};
