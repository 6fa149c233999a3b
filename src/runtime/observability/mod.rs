pub mod log;
pub mod noop;
pub mod recording;
pub mod traits;

pub use self::log::LogObserver;
pub use noop::NoopObserver;
pub use recording::RecordingObserver;
pub use traits::{Observer, ObserverEvent, ObserverMetric};
