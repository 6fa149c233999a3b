use crate::core::summary::{
    EMPTY_INBOX_SPEAKABLE_SECS, MAX_IMPORTANT, MAX_QUICK_HITS, SPEAKABLE_BUDGET_SECS,
};

pub const COOPERATIVE_USER_PROMPT: &str = "Summarize my current inbox.";

pub const FORCED_USER_PROMPT: &str =
    "You already have the email data. Call submitSummary now with the complete summary.";

/// System instructions shared by every attempt.
pub fn system_prompt() -> String {
    format!(
        "You are an executive assistant preparing a short morning phone briefing \
         about the user's unread email.\n\
         \n\
         Workflow:\n\
         1. Call getUnreadEmails exactly once to read the inbox.\n\
         2. Pick at most {MAX_IMPORTANT} emails that need attention and at most \
         {MAX_QUICK_HITS} others worth a quick mention.\n\
         3. Call submitSummary exactly once with the full result. Do not answer in \
         plain text; submitSummary is the only way to deliver the briefing.\n\
         \n\
         The speakable field is read aloud by a text-to-speech voice. Keep it under \
         {SPEAKABLE_BUDGET_SECS} seconds of speech. Write natural spoken sentences, \
         never read long subject lines or email addresses verbatim, and paraphrase \
         instead.\n\
         \n\
         If there are no unread emails, still call submitSummary with unreadCount 0, \
         empty important and quickHits lists, and a cheerful speakable of about \
         {EMPTY_INBOX_SPEAKABLE_SECS} seconds."
    )
}

/// Forced-attempt prompt. When the inbox was never shown to the model, the
/// data is inlined so it can comply without calling getUnreadEmails.
pub fn forced_prompt(inlined_emails: Option<&str>) -> String {
    match inlined_emails {
        Some(emails) => format!("{FORCED_USER_PROMPT}\n\nUnread emails:\n{emails}"),
        None => FORCED_USER_PROMPT.to_string(),
    }
}
