//! Domain model (IDs, countdown records, remaining-time values, errors).

pub mod countdown;
pub mod errors;
pub mod ids;
pub mod time_remaining;

pub use countdown::{
    BackgroundImage, CountType, Countdown, CountdownPatch, Customization, NewCountdown,
    WorkingHours,
};
pub use errors::{StoreError, ValidationError};
pub use ids::{CountdownId, IdParseError};
pub use time_remaining::TimeRemaining;
