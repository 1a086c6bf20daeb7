use crate::core::event::{ButtonState, Redraw, SessionEvent};
use crate::core::geometry::Rect;
use crate::core::output::OutputRegistry;
use crate::core::pointer::{PointerId, PointerSet};

/// How the session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The user dragged out a region with positive width or height.
    Selected(Rect),
    /// Zero-area result: a press released in place, or no press at all.
    /// Indistinguishable from a deliberate cancel, treated as one.
    Cancelled,
}

/// Process-wide selection state, passed explicitly to every handler.
///
/// Owns the output set, the pointer set, the running flag, and the frozen
/// result. `running` transitions true to false exactly once, on the first
/// button release; events already queued when that happens are tolerated
/// and must not change the result.
#[derive(Debug)]
pub struct Session {
    outputs: OutputRegistry,
    pointers: PointerSet,
    running: bool,
    result: Rect,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            outputs: OutputRegistry::new(),
            pointers: PointerSet::new(),
            running: true,
            result: Rect::default(),
        }
    }

    pub fn running(&self) -> bool {
        self.running
    }

    pub fn outputs(&self) -> &OutputRegistry {
        &self.outputs
    }

    pub fn pointers(&self) -> &PointerSet {
        &self.pointers
    }

    /// The session-wide rectangle to paint, or `None` before the first
    /// press. With several pointers, the first currently-pressed one in
    /// registration order wins; only one result exists per session.
    pub fn selection(&self) -> Option<Rect> {
        self.pointers
            .iter()
            .find(|p| p.button_state() == ButtonState::Pressed)
            .map(|p| p.selection_rect())
    }

    /// Dispatches one event, run to completion, and reports what to repaint.
    pub fn handle(&mut self, event: SessionEvent) -> Redraw {
        match event {
            SessionEvent::OutputAdded { id } => {
                self.outputs.register(id);
                Redraw::None
            }
            SessionEvent::OutputConfigured { id, width, height } => {
                if self.outputs.configure(id, width, height) && self.running {
                    Redraw::One(id)
                } else {
                    Redraw::None
                }
            }
            SessionEvent::OutputRemoved { id } => {
                self.outputs.remove(id);
                Redraw::None
            }
            SessionEvent::PointerAdded { id } => {
                self.pointers.register(id);
                Redraw::None
            }
            SessionEvent::PointerMoved { id, x, y } => self.on_motion(id, x, y),
            SessionEvent::PointerButton { id, state } => self.on_button(id, state),
        }
    }

    fn on_motion(&mut self, id: PointerId, x: i32, y: i32) -> Redraw {
        let Some(pointer) = self.pointers.get_mut(id) else {
            tracing::warn!("motion for unknown pointer {:?}", id);
            return Redraw::None;
        };
        pointer.set_position(x, y);

        // The rectangle lives in a shared logical space, so a drag must
        // repaint every output, not just the one under the pointer.
        if pointer.button_state() == ButtonState::Pressed && self.running {
            Redraw::All
        } else {
            Redraw::None
        }
    }

    fn on_button(&mut self, id: PointerId, state: ButtonState) -> Redraw {
        let Some(pointer) = self.pointers.get_mut(id) else {
            tracing::warn!("button for unknown pointer {:?}", id);
            return Redraw::None;
        };
        match state {
            ButtonState::Pressed => {
                pointer.press();
                if self.running {
                    tracing::debug!("press at {:?}", pointer.position());
                    Redraw::All
                } else {
                    Redraw::None
                }
            }
            ButtonState::Released => {
                pointer.release();
                // Exactly one release terminates the session; releases from
                // events queued after that leave the result frozen.
                if self.running {
                    self.result = pointer.selection_rect();
                    self.running = false;
                    tracing::debug!("release, result {}", self.result);
                }
                Redraw::None
            }
        }
    }

    /// Teardown: drop all pointers and outputs. Called after the loop exits.
    pub fn teardown(&mut self) {
        for id in self.pointers.iter().map(|p| p.id()).collect::<Vec<_>>() {
            self.pointers.unregister(id);
        }
        for id in self.outputs.ids() {
            self.outputs.remove(id);
        }
    }

    /// Final outcome, meaningful once `running` is false.
    pub fn outcome(&self) -> Outcome {
        if self.result.is_empty() {
            Outcome::Cancelled
        } else {
            Outcome::Selected(self.result)
        }
    }
}
