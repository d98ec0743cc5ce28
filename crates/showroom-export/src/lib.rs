//! Export of rendered Showroom frames.
//!
//! Frames are written as numbered PNG files; a JSON manifest records the
//! state each frame was rendered from.

pub mod png;
pub mod sequence;

pub use png::{encode_png, write_png};
pub use sequence::{frame_file_name, FrameEntry, FrameSequence, Manifest, MANIFEST_FILE};
