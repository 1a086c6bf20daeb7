//! End-to-end scenarios at the event level, with a recording frame sink in
//! place of the compositor.

use crate::core::event::{ButtonState, SessionEvent};
use crate::core::frame::plan;
use crate::core::geometry::Rect;
use crate::core::output::OutputId;
use crate::core::pointer::PointerId;
use crate::core::session::{Outcome, Session};
use crate::wayland::validate_globals;

/// Feeds events through a session and records every render call the frame
/// dispatcher would make.
struct Recorder {
    session: Session,
    frames: Vec<OutputId>,
}

impl Recorder {
    fn new() -> Self {
        Self {
            session: Session::new(),
            frames: Vec::new(),
        }
    }

    fn feed(&mut self, event: SessionEvent) {
        let redraw = self.session.handle(event);
        self.frames.extend(plan(self.session.outputs(), redraw));
    }

    fn drain_frames(&mut self) -> Vec<OutputId> {
        std::mem::take(&mut self.frames)
    }
}

const OUT: OutputId = OutputId(1);
const OUT2: OutputId = OutputId(2);
const PTR: PointerId = PointerId(0);

fn drag(rec: &mut Recorder, from: (i32, i32), to: (i32, i32)) {
    rec.feed(SessionEvent::PointerMoved {
        id: PTR,
        x: from.0,
        y: from.1,
    });
    rec.feed(SessionEvent::PointerButton {
        id: PTR,
        state: ButtonState::Pressed,
    });
    rec.feed(SessionEvent::PointerMoved {
        id: PTR,
        x: to.0,
        y: to.1,
    });
    rec.feed(SessionEvent::PointerButton {
        id: PTR,
        state: ButtonState::Released,
    });
}

#[test]
fn single_output_drag_reports_bounding_box() {
    let mut rec = Recorder::new();
    rec.feed(SessionEvent::OutputAdded { id: OUT });
    rec.feed(SessionEvent::OutputConfigured {
        id: OUT,
        width: 1920,
        height: 1080,
    });
    rec.feed(SessionEvent::PointerAdded { id: PTR });
    drag(&mut rec, (100, 100), (400, 300));

    assert!(!rec.session.running());
    let outcome = rec.session.outcome();
    assert_eq!(outcome, Outcome::Selected(Rect::new(100, 100, 300, 200)));
    match outcome {
        Outcome::Selected(rect) => assert_eq!(rect.to_string(), "100,100 300x200"),
        Outcome::Cancelled => unreachable!(),
    }
}

#[test]
fn press_release_without_motion_cancels() {
    let mut rec = Recorder::new();
    rec.feed(SessionEvent::OutputAdded { id: OUT });
    rec.feed(SessionEvent::OutputConfigured {
        id: OUT,
        width: 1920,
        height: 1080,
    });
    rec.feed(SessionEvent::PointerAdded { id: PTR });
    drag(&mut rec, (50, 50), (50, 50));

    assert!(!rec.session.running());
    assert_eq!(rec.session.outcome(), Outcome::Cancelled);
}

#[test]
fn drag_renders_every_configured_output() {
    let mut rec = Recorder::new();
    rec.feed(SessionEvent::OutputAdded { id: OUT });
    rec.feed(SessionEvent::OutputConfigured {
        id: OUT,
        width: 1920,
        height: 1080,
    });
    rec.feed(SessionEvent::OutputAdded { id: OUT2 });
    rec.feed(SessionEvent::OutputConfigured {
        id: OUT2,
        width: 1280,
        height: 1024,
    });
    rec.feed(SessionEvent::PointerAdded { id: PTR });
    rec.drain_frames();

    rec.feed(SessionEvent::PointerMoved { id: PTR, x: 10, y: 10 });
    assert_eq!(rec.drain_frames(), vec![], "hover must not render");

    rec.feed(SessionEvent::PointerButton {
        id: PTR,
        state: ButtonState::Pressed,
    });
    assert_eq!(rec.drain_frames(), vec![OUT, OUT2]);
    let at_press = rec.session.selection();

    rec.feed(SessionEvent::PointerMoved { id: PTR, x: 60, y: 90 });
    assert_eq!(rec.drain_frames(), vec![OUT, OUT2]);
    // Both outputs see the same logical rectangle.
    assert_eq!(at_press, Some(Rect::new(10, 10, 0, 0)));
    assert_eq!(rec.session.selection(), Some(Rect::new(10, 10, 50, 80)));
}

#[test]
fn configure_renders_exactly_that_output() {
    let mut rec = Recorder::new();
    rec.feed(SessionEvent::OutputAdded { id: OUT });
    rec.feed(SessionEvent::OutputConfigured {
        id: OUT,
        width: 800,
        height: 600,
    });
    assert_eq!(rec.drain_frames(), vec![OUT]);

    // A second configure with a different size re-renders once, with the
    // new size recorded.
    rec.feed(SessionEvent::OutputConfigured {
        id: OUT,
        width: 1024,
        height: 768,
    });
    assert_eq!(rec.drain_frames(), vec![OUT]);
    assert_eq!(rec.session.outputs().get(OUT).unwrap().size(), (1024, 768));
}

#[test]
fn removing_one_output_keeps_the_other_rendering() {
    let mut rec = Recorder::new();
    rec.feed(SessionEvent::OutputAdded { id: OUT });
    rec.feed(SessionEvent::OutputConfigured {
        id: OUT,
        width: 1920,
        height: 1080,
    });
    rec.feed(SessionEvent::OutputAdded { id: OUT2 });
    rec.feed(SessionEvent::OutputConfigured {
        id: OUT2,
        width: 1280,
        height: 1024,
    });
    rec.feed(SessionEvent::PointerAdded { id: PTR });
    rec.feed(SessionEvent::PointerButton {
        id: PTR,
        state: ButtonState::Pressed,
    });
    rec.drain_frames();

    rec.feed(SessionEvent::OutputRemoved { id: OUT });
    rec.feed(SessionEvent::PointerMoved { id: PTR, x: 5, y: 5 });
    assert_eq!(rec.drain_frames(), vec![OUT2]);
}

#[test]
fn missing_layer_shell_is_fatal_before_any_render() {
    let err = validate_globals(true, true, false, 1).unwrap_err();
    assert_eq!(err.to_string(), "compositor doesn't support zwlr_layer_shell_v1");
}

#[test]
fn startup_gate_covers_every_capability() {
    assert_eq!(
        validate_globals(false, true, true, 1).unwrap_err().to_string(),
        "compositor doesn't support wl_compositor"
    );
    assert_eq!(
        validate_globals(true, false, true, 1).unwrap_err().to_string(),
        "compositor doesn't support wl_shm"
    );
    assert_eq!(
        validate_globals(true, true, true, 0).unwrap_err().to_string(),
        "no wl_output"
    );
    assert!(validate_globals(true, true, true, 1).is_ok());
}

#[test]
fn two_pointers_one_result() {
    let mut rec = Recorder::new();
    rec.feed(SessionEvent::OutputAdded { id: OUT });
    rec.feed(SessionEvent::OutputConfigured {
        id: OUT,
        width: 1920,
        height: 1080,
    });
    rec.feed(SessionEvent::PointerAdded { id: PointerId(0) });
    rec.feed(SessionEvent::PointerAdded { id: PointerId(1) });

    rec.feed(SessionEvent::PointerMoved {
        id: PointerId(1),
        x: 200,
        y: 200,
    });
    rec.feed(SessionEvent::PointerButton {
        id: PointerId(1),
        state: ButtonState::Pressed,
    });
    rec.feed(SessionEvent::PointerMoved {
        id: PointerId(1),
        x: 260,
        y: 240,
    });
    rec.feed(SessionEvent::PointerButton {
        id: PointerId(1),
        state: ButtonState::Released,
    });

    assert_eq!(
        rec.session.outcome(),
        Outcome::Selected(Rect::new(200, 200, 60, 40))
    );

    // The other pointer's release after termination changes nothing.
    rec.feed(SessionEvent::PointerButton {
        id: PointerId(0),
        state: ButtonState::Released,
    });
    assert_eq!(
        rec.session.outcome(),
        Outcome::Selected(Rect::new(200, 200, 60, 40))
    );
}
