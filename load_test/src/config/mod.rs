// Config module
// Load profiles and think-time settings

pub mod load_profiles;
pub mod wait;

pub use load_profiles::{get_load_profile, LoadProfile};
pub use wait::WaitTime;
