//! Overlay painter: dim layer with the selection cut out.
//!
//! Called once per redraw with the whole frame repainted; no state is
//! retained between calls. Pixels are ARGB8888, premultiplied alpha.

use crate::core::geometry::Rect;

/// Translucent black over everything outside the selection.
const DIM_ARGB: u32 = 0x6600_0000;
/// Selection interior is fully transparent so the screen shows through.
const CLEAR_ARGB: u32 = 0x0000_0000;
/// Solid white selection border.
const BORDER_ARGB: u32 = 0xFFFF_FFFF;
const BORDER_THICKNESS: i32 = 1;

/// A writable pixel buffer of known dimensions.
pub struct Canvas<'a> {
    pixels: &'a mut [u8],
    width: i32,
    height: i32,
}

impl<'a> Canvas<'a> {
    /// `pixels` must hold exactly `width * height` ARGB8888 pixels.
    pub fn new(pixels: &'a mut [u8], width: u32, height: u32) -> Self {
        debug_assert_eq!(pixels.len(), width as usize * height as usize * 4);
        Self {
            pixels,
            width: width as i32,
            height: height as i32,
        }
    }

    fn fill(&mut self, argb: u32) {
        for px in self.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&argb.to_le_bytes());
        }
    }

    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, argb: u32) {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + w).min(self.width);
        let y1 = (y + h).min(self.height);
        if x1 <= x0 || y1 <= y0 {
            return;
        }
        let bytes = argb.to_le_bytes();
        let stride = self.width as usize * 4;
        for row in y0..y1 {
            let start = row as usize * stride + x0 as usize * 4;
            let end = row as usize * stride + x1 as usize * 4;
            for px in self.pixels[start..end].chunks_exact_mut(4) {
                px.copy_from_slice(&bytes);
            }
        }
    }

    fn draw_border(&mut self, x: i32, y: i32, w: i32, h: i32, t: i32, argb: u32) {
        if w <= 0 || h <= 0 || t <= 0 {
            return;
        }
        self.fill_rect(x, y, w, t, argb);
        self.fill_rect(x, y + h - t, w, t, argb);
        self.fill_rect(x, y, t, h, argb);
        self.fill_rect(x + w - t, y, t, h, argb);
    }

    #[cfg(test)]
    fn pixel(&self, x: i32, y: i32) -> u32 {
        let offset = (y * self.width + x) as usize * 4;
        u32::from_le_bytes(self.pixels[offset..offset + 4].try_into().unwrap())
    }
}

/// Paints one frame: full-canvas dim, then the selection interior cleared
/// and outlined. `None` means no pointer has been pressed yet.
pub fn paint(canvas: &mut Canvas<'_>, selection: Option<Rect>) {
    canvas.fill(DIM_ARGB);

    if let Some(rect) = selection {
        canvas.fill_rect(rect.x, rect.y, rect.width, rect.height, CLEAR_ARGB);
        canvas.draw_border(
            rect.x,
            rect.y,
            rect.width,
            rect.height,
            BORDER_THICKNESS,
            BORDER_ARGB,
        );
    }
}
