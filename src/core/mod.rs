//! Selection core: the state machine driving the overlay.
//!
//! Everything in this module is protocol-agnostic. The wayland layer
//! translates protocol events into [`event::SessionEvent`] values and feeds
//! them to [`session::Session::handle`], which returns a redraw directive.

pub mod event;
pub mod frame;
pub mod geometry;
pub mod output;
pub mod pointer;
pub mod session;

pub use event::{ButtonState, Redraw, SessionEvent};
pub use geometry::Rect;
pub use output::{Output, OutputId, OutputRegistry};
pub use pointer::{Pointer, PointerId, PointerSet};
pub use session::{Outcome, Session};
