mod aggregator;
mod recording;

pub use self::aggregator::PluginAggregator;
pub use self::recording::{RecordedHook, RecordingPlugin};
