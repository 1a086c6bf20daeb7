//! Frame dispatcher: paints one output and presents the buffer.

use wayland_client::QueueHandle;

use crate::core::output::OutputId;
use crate::render::{paint, Canvas};

use super::App;

impl App {
    /// Renders one output with the current session-wide selection.
    ///
    /// No-op if the output is unconfigured, already gone, or every buffer
    /// is still owned by the server (backpressure; the next event retries).
    pub(super) fn render_output(&mut self, id: OutputId, qh: &QueueHandle<Self>) {
        let Some(output) = self.session.outputs().get(id) else {
            return;
        };
        if !output.configured() {
            return;
        }
        let (width, height) = output.size();
        let selection = self.session.selection();

        let Some(shm) = self.shm.clone() else {
            return;
        };
        let Some(overlay) = self.outputs.get_mut(&id).and_then(|h| h.overlay.as_mut()) else {
            return;
        };

        let slot = match overlay.buffers.acquire(&shm, qh, id, width, height) {
            Ok(Some(slot)) => slot,
            Ok(None) => return,
            Err(err) => {
                self.fatal = Some(err.context("buffer allocation failed"));
                return;
            }
        };

        let mut canvas = Canvas::new(slot.pixels_mut(), width, height);
        paint(&mut canvas, selection);

        overlay.surface.attach(Some(&slot.buffer), 0, 0);
        overlay.surface.damage(0, 0, width as i32, height as i32);
        overlay.surface.commit();
        slot.busy = true;

        tracing::trace!("frame committed for {:?} ({}x{})", id, width, height);
    }
}
