//! Showroom application layer.
//!
//! Ties the catalog, the transition director, the renderer and the
//! diagnostic subsystem into one controller driven by a tick loop.

pub mod config;
pub mod overlay;
pub mod render;
pub mod showroom;

pub use config::{RenderConfig, SceneConfig, ShowroomConfig};
pub use overlay::{Overlay, SelectorEntry};
pub use render::{render_sequence, FrameInfo, RenderScript, Selection};
pub use showroom::{FrameState, Showroom};
