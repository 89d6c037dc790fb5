pub mod models;
pub mod parser;

pub use models::{Segment, SegmentTrack, UNKNOWN_SEQUENCE};
pub use parser::SrtParser;
