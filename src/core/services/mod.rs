pub mod monitor;

pub use monitor::{FrameAnalysis, MonitorService};
