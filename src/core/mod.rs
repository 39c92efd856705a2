pub mod engagement;
pub mod identity;
pub mod posture;
pub mod providers;
pub mod services;
