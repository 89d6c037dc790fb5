mod notifier;

pub use notifier::{FrameCallback, FrameNotifier};
