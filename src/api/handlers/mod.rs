pub mod attendance;
pub mod frame;
