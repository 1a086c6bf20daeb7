//! Shared-memory buffer slots for the overlay surfaces.
//!
//! Each output carries a small fixed set of slots (double buffering). A
//! slot is busy from the moment its buffer is committed until the server
//! sends `wl_buffer.release`. `acquire` returning `None` is backpressure,
//! not an error: the redraw is skipped and the next event retries.

use std::fs::File;
use std::os::fd::AsFd;

use anyhow::Context;
use memmap2::MmapMut;
use wayland_client::protocol::{wl_buffer, wl_shm, wl_shm_pool};
use wayland_client::{Dispatch, QueueHandle};

use crate::core::output::OutputId;

/// Slots per output. Two is enough: one on screen, one being painted.
pub const SLOT_COUNT: usize = 2;

/// User data attached to each `wl_buffer`, so a release event can be routed
/// back to the owning output's slot.
#[derive(Debug, Clone, Copy)]
pub struct BufferData {
    pub output: OutputId,
    pub slot: usize,
}

/// One mapped shm buffer plus its protocol objects.
pub struct BufferSlot {
    _file: File,
    mmap: MmapMut,
    pool: wl_shm_pool::WlShmPool,
    pub buffer: wl_buffer::WlBuffer,
    width: u32,
    height: u32,
    pub busy: bool,
}

impl BufferSlot {
    fn create<S>(
        shm: &wl_shm::WlShm,
        qh: &QueueHandle<S>,
        data: BufferData,
        width: u32,
        height: u32,
    ) -> anyhow::Result<Self>
    where
        S: Dispatch<wl_shm_pool::WlShmPool, ()>
            + Dispatch<wl_buffer::WlBuffer, BufferData>
            + 'static,
    {
        let stride = width * 4;
        let size = stride as u64 * height as u64;

        let file = tempfile::tempfile().context("creating shm backing file")?;
        file.set_len(size)
            .with_context(|| format!("sizing shm file to {size} bytes"))?;
        let mmap = unsafe { MmapMut::map_mut(&file) }.context("mapping shm file")?;

        let pool = shm.create_pool(file.as_fd(), size as i32, qh, ());
        let buffer = pool.create_buffer(
            0,
            width as i32,
            height as i32,
            stride as i32,
            wl_shm::Format::Argb8888,
            qh,
            data,
        );

        Ok(Self {
            _file: file,
            mmap,
            pool,
            buffer,
            width,
            height,
            busy: false,
        })
    }

    pub fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.mmap[..]
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn destroy(self) {
        self.buffer.destroy();
        self.pool.destroy();
    }
}

/// The slot set owned by one output.
#[derive(Default)]
pub struct BufferSlots {
    slots: [Option<BufferSlot>; SLOT_COUNT],
}

impl BufferSlots {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a free slot sized to the output, allocating or resizing it
    /// as needed. `None` while every slot is owned by the server.
    ///
    /// Allocation failure is fatal: this tool is too short-lived to degrade
    /// gracefully under memory pressure.
    pub fn acquire<S>(
        &mut self,
        shm: &wl_shm::WlShm,
        qh: &QueueHandle<S>,
        output: OutputId,
        width: u32,
        height: u32,
    ) -> anyhow::Result<Option<&mut BufferSlot>>
    where
        S: Dispatch<wl_shm_pool::WlShmPool, ()>
            + Dispatch<wl_buffer::WlBuffer, BufferData>
            + 'static,
    {
        if width == 0 || height == 0 {
            return Ok(None);
        }

        let Some(index) = self
            .slots
            .iter()
            .position(|s| s.as_ref().map_or(true, |slot| !slot.busy))
        else {
            tracing::trace!("all buffers busy for {:?}, skipping redraw", output);
            return Ok(None);
        };

        let stale = match &self.slots[index] {
            Some(slot) => slot.size() != (width, height),
            None => true,
        };
        if stale {
            if let Some(old) = self.slots[index].take() {
                old.destroy();
            }
            let data = BufferData {
                output,
                slot: index,
            };
            self.slots[index] = Some(BufferSlot::create(shm, qh, data, width, height)?);
        }

        Ok(self.slots[index].as_mut())
    }

    /// Server released the buffer in `slot`; it may be painted again.
    pub fn release(&mut self, slot: usize) {
        if let Some(Some(s)) = self.slots.get_mut(slot) {
            s.busy = false;
        }
    }

    /// Drops every slot and its protocol objects. An in-flight frame for
    /// this output is simply abandoned.
    pub fn destroy(&mut self) {
        for slot in &mut self.slots {
            if let Some(s) = slot.take() {
                s.destroy();
            }
        }
    }
}
