/// Axis-aligned rectangle in display coordinates.
///
/// Width and height are never negative; `from_corners` normalizes any pair
/// of opposite corners.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        debug_assert!(width >= 0 && height >= 0);
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Bounding box of two opposite corners, in any orientation.
    pub fn from_corners(ax: i32, ay: i32, bx: i32, by: i32) -> Self {
        Self {
            x: ax.min(bx),
            y: ay.min(by),
            width: (bx - ax).abs(),
            height: (by - ay).abs(),
        }
    }

    /// A zero-area rectangle signals that no selection was made.
    pub fn is_empty(&self) -> bool {
        self.width == 0 && self.height == 0
    }
}

impl std::fmt::Display for Rect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{} {}x{}", self.x, self.y, self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_corners_normalizes_all_orientations() {
        let expected = Rect::new(10, 20, 30, 40);
        assert_eq!(Rect::from_corners(10, 20, 40, 60), expected);
        assert_eq!(Rect::from_corners(40, 20, 10, 60), expected);
        assert_eq!(Rect::from_corners(10, 60, 40, 20), expected);
        assert_eq!(Rect::from_corners(40, 60, 10, 20), expected);
    }

    #[test]
    fn from_corners_never_negative() {
        for &(ax, ay, bx, by) in &[(0, 0, -5, -7), (-3, 9, 2, -1), (7, 7, 7, 7)] {
            let r = Rect::from_corners(ax, ay, bx, by);
            assert!(r.width >= 0);
            assert!(r.height >= 0);
        }
    }

    #[test]
    fn identical_corners_are_empty() {
        let r = Rect::from_corners(50, 50, 50, 50);
        assert_eq!(r, Rect::new(50, 50, 0, 0));
        assert!(r.is_empty());
    }

    #[test]
    fn display_matches_output_format() {
        assert_eq!(Rect::new(100, 100, 300, 200).to_string(), "100,100 300x200");
    }
}
