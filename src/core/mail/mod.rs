pub mod gmail;
pub mod traits;

pub use gmail::{GmailCredentials, GmailSource};
pub use traits::{EmailMessage, EmailSource};

/// Query the daily job sends when none is configured.
pub const DEFAULT_QUERY: &str = "is:unread newer_than:2d";
/// Upper bound on messages handed to the model.
pub const DEFAULT_MAX_RESULTS: u32 = 15;
