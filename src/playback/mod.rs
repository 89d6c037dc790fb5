pub mod clock;
pub mod controller;
pub mod driver;
mod frame;
pub mod resolver;

pub use clock::{Clock, ManualClock, MonotonicClock, TokioClock};
pub use controller::PlaybackController;
pub use driver::{PlaybackDriver, DEFAULT_TICK_INTERVAL};
pub use frame::{PlaybackStatus, RenderFrame};
pub use resolver::SegmentResolver;
