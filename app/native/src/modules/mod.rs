//! Feature modules for Glide.
//!
//! - [`compositor`] - Animation engine, decorations and the scene graph boundary

pub mod compositor;
