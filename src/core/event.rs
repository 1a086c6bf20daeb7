use crate::core::output::OutputId;
use crate::core::pointer::PointerId;

/// Button state of a pointer device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonState {
    Released,
    Pressed,
}

/// One fully-decoded protocol event, consumed by `Session::handle`.
///
/// Handlers run to completion, one event at a time; there is no reentrancy
/// and no concurrent dispatch.
#[derive(Debug, Clone, Copy)]
pub enum SessionEvent {
    OutputAdded {
        id: OutputId,
    },
    OutputConfigured {
        id: OutputId,
        width: u32,
        height: u32,
    },
    OutputRemoved {
        id: OutputId,
    },
    PointerAdded {
        id: PointerId,
    },
    PointerMoved {
        id: PointerId,
        x: i32,
        y: i32,
    },
    PointerButton {
        id: PointerId,
        state: ButtonState,
    },
}

/// What the frame dispatcher should repaint after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redraw {
    /// Nothing changed on screen.
    None,
    /// One output was (re)configured.
    One(OutputId),
    /// The selection rectangle changed; the overlay spans every output.
    All,
}
