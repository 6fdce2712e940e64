/// Reports buffered between workers and the reporter before workers wait.
pub const REPORT_CHANNEL_CAPACITY: usize = 64;

pub const DEFAULT_LOG_FILTER: &str = "info";
