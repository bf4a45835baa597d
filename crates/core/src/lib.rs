pub mod availability;
pub mod clock;
pub mod config;
pub mod error;

pub use availability::*;
pub use clock::{Clock, ManualClock, Millis, SystemClock};
pub use config::Config;
pub use error::*;
