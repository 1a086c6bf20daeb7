// wlmark
//
// Wayland region selection overlay: dims every output, tracks a pointer
// drag, and reports the selected rectangle in display coordinates.
// Selection logic lives in core/, the protocol plumbing in wayland/.

pub mod core;
pub mod render;
pub mod shm;
pub mod wayland;

pub use crate::core::geometry::Rect;
pub use crate::core::session::{Outcome, Session};

#[cfg(test)]
mod tests;
