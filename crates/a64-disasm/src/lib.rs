pub mod model;

// Re-export commonly used types/functions for consumers
pub use model::{load_raw_bin, read_u32, read_u8, Image, Segment};
