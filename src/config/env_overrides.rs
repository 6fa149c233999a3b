use super::Config;
use std::path::PathBuf;

fn non_empty(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty())
}

fn override_string(slot: &mut Option<String>, key: &str) {
    if let Some(value) = non_empty(key) {
        *slot = Some(value);
    }
}

impl Config {
    /// Apply `DAILYCALL_*` environment variables on top of the file values.
    pub fn apply_env_overrides(&mut self) {
        override_string(&mut self.gmail.client_id, "DAILYCALL_GMAIL_CLIENT_ID");
        override_string(&mut self.gmail.client_secret, "DAILYCALL_GMAIL_CLIENT_SECRET");
        override_string(&mut self.gmail.refresh_token, "DAILYCALL_GMAIL_REFRESH_TOKEN");

        if let Some(query) = non_empty("DAILYCALL_GMAIL_QUERY") {
            self.gmail.query = query;
        }

        if let Some(raw) = non_empty("DAILYCALL_GMAIL_MAX_RESULTS")
            && let Ok(max_results) = raw.parse::<u32>()
        {
            self.gmail.max_results = max_results;
        }

        if let Some(key) = non_empty("DAILYCALL_API_KEY").or_else(|| non_empty("GEMINI_API_KEY")) {
            self.model.api_key = Some(key);
        }

        if let Some(model) = non_empty("DAILYCALL_MODEL") {
            self.model.model = model;
        }

        if let Some(raw) = non_empty("DAILYCALL_TEMPERATURE")
            && let Ok(temperature) = raw.parse::<f64>()
            && (0.0..=2.0).contains(&temperature)
        {
            self.model.temperature = temperature;
        }

        override_string(&mut self.speech.api_key, "DAILYCALL_ELEVENLABS_API_KEY");
        override_string(&mut self.speech.voice_id, "DAILYCALL_ELEVENLABS_VOICE_ID");
        if let Some(model_id) = non_empty("DAILYCALL_ELEVENLABS_MODEL_ID") {
            self.speech.model_id = model_id;
        }

        override_string(&mut self.telephony.account_sid, "DAILYCALL_TWILIO_ACCOUNT_SID");
        override_string(&mut self.telephony.auth_token, "DAILYCALL_TWILIO_AUTH_TOKEN");
        override_string(&mut self.telephony.from_number, "DAILYCALL_TWILIO_FROM_NUMBER");
        override_string(&mut self.telephony.to_number, "DAILYCALL_CALL_TO_NUMBER");
        override_string(&mut self.telephony.callback_base_url, "DAILYCALL_API_BASE_URL");

        if let Some(workspace) = non_empty("DAILYCALL_WORKSPACE") {
            self.workspace_dir = PathBuf::from(workspace);
        }
    }
}
