mod plugin;
mod progress;

pub use plugin::Plugin;
pub use progress::{LogProgress, ProgressCallback, SilentProgress};
