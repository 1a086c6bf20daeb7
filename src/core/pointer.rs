use crate::core::event::ButtonState;
use crate::core::geometry::Rect;

/// Stable identity of a pointer device within the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PointerId(pub u32);

/// One input pointer device.
///
/// Tracks the current position in surface-local integer coordinates, the
/// position at the last button press, and the button state. The selection
/// rectangle is derived, never stored: a pure function of the two points.
#[derive(Debug)]
pub struct Pointer {
    id: PointerId,
    x: i32,
    y: i32,
    pressed_x: i32,
    pressed_y: i32,
    button_state: ButtonState,
}

impl Pointer {
    fn new(id: PointerId) -> Self {
        Self {
            id,
            x: 0,
            y: 0,
            pressed_x: 0,
            pressed_y: 0,
            button_state: ButtonState::Released,
        }
    }

    pub fn id(&self) -> PointerId {
        self.id
    }

    pub fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    pub fn button_state(&self) -> ButtonState {
        self.button_state
    }

    pub fn set_position(&mut self, x: i32, y: i32) {
        self.x = x;
        self.y = y;
    }

    /// Records the press origin at the current position.
    pub fn press(&mut self) {
        self.button_state = ButtonState::Pressed;
        self.pressed_x = self.x;
        self.pressed_y = self.y;
    }

    pub fn release(&mut self) {
        self.button_state = ButtonState::Released;
    }

    /// The candidate selection rectangle: bounding box of the press origin
    /// and the current position. Idempotent for a given pointer state.
    pub fn selection_rect(&self) -> Rect {
        Rect::from_corners(self.pressed_x, self.pressed_y, self.x, self.y)
    }
}

/// All pointer devices attached to the session, in registration order.
#[derive(Debug, Default)]
pub struct PointerSet {
    pointers: Vec<Pointer>,
}

impl PointerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, id: PointerId) {
        if self.get(id).is_some() {
            tracing::warn!("pointer {:?} registered twice, ignoring", id);
            return;
        }
        tracing::debug!("pointer {:?} added", id);
        self.pointers.push(Pointer::new(id));
    }

    /// Teardown-time removal; capability loss mid-session is not handled.
    pub fn unregister(&mut self, id: PointerId) {
        self.pointers.retain(|p| p.id != id);
    }

    pub fn get(&self, id: PointerId) -> Option<&Pointer> {
        self.pointers.iter().find(|p| p.id == id)
    }

    pub fn get_mut(&mut self, id: PointerId) -> Option<&mut Pointer> {
        self.pointers.iter_mut().find(|p| p.id == id)
    }

    pub fn len(&self) -> usize {
        self.pointers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pointers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pointer> {
        self.pointers.iter()
    }
}
