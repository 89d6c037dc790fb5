pub mod time;

pub use time::{display_name, format_clock, format_remaining, format_timestamp};
