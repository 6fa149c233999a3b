pub mod speech;
pub mod storage;
pub mod telephony;

pub use speech::{ElevenLabsSpeech, SpeechSynthesizer};
pub use storage::{
    AudioStore, LocalAudioStore, LogSummaryStore, SummaryRecord, SummaryStore, audio_key,
};
pub use telephony::{CallPlacer, TwilioCaller, TwilioCredentials, twiml_url};
