//! Wayland plumbing: connection, registry handshake, per-output overlay
//! surfaces, and the dispatch loop.
//!
//! Protocol events are decoded into [`SessionEvent`] values and fed to the
//! core; the redraw directive coming back drives the frame dispatcher. All
//! dispatch is single-threaded and run-to-completion.

mod frame;

use std::collections::HashMap;

use anyhow::{bail, Context};
use wayland_client::globals::{registry_queue_init, GlobalListContents};
use wayland_client::protocol::{
    wl_buffer, wl_compositor, wl_output, wl_pointer, wl_registry, wl_seat, wl_shm, wl_shm_pool,
    wl_surface,
};
use wayland_client::{Connection, Dispatch, Proxy, QueueHandle, WEnum};
use wayland_protocols_wlr::layer_shell::v1::client::{zwlr_layer_shell_v1, zwlr_layer_surface_v1};

use crate::core::event::{ButtonState, Redraw, SessionEvent};
use crate::core::output::OutputId;
use crate::core::pointer::PointerId;
use crate::core::session::{Outcome, Session};
use crate::shm::{BufferData, BufferSlots};

/// Layer-shell namespace identifying the overlay to the compositor.
const NAMESPACE: &str = "selection";

/// The overlay objects for one output. The layer surface is created only
/// after the startup gate has passed.
struct OutputHandle {
    wl_output: wl_output::WlOutput,
    overlay: Option<Overlay>,
}

struct Overlay {
    surface: wl_surface::WlSurface,
    layer_surface: zwlr_layer_surface_v1::ZwlrLayerSurfaceV1,
    buffers: BufferSlots,
}

struct PointerDevice {
    id: PointerId,
    seat: wl_seat::WlSeat,
    wl_pointer: wl_pointer::WlPointer,
}

/// Connection-side state: the core session plus every protocol object the
/// session entities map to.
pub struct App {
    session: Session,
    compositor: Option<wl_compositor::WlCompositor>,
    shm: Option<wl_shm::WlShm>,
    layer_shell: Option<zwlr_layer_shell_v1::ZwlrLayerShellV1>,
    outputs: HashMap<OutputId, OutputHandle>,
    pointers: Vec<PointerDevice>,
    next_pointer_id: u32,
    fatal: Option<anyhow::Error>,
}

impl App {
    fn new() -> Self {
        Self {
            session: Session::new(),
            compositor: None,
            shm: None,
            layer_shell: None,
            outputs: HashMap::new(),
            pointers: Vec::new(),
            next_pointer_id: 0,
            fatal: None,
        }
    }

    fn dispatch(&mut self, event: SessionEvent, qh: &QueueHandle<Self>) {
        let redraw = self.session.handle(event);
        self.apply_redraw(redraw, qh);
    }

    fn apply_redraw(&mut self, redraw: Redraw, qh: &QueueHandle<Self>) {
        if redraw == Redraw::None {
            return;
        }
        for id in crate::core::frame::plan(self.session.outputs(), redraw) {
            self.render_output(id, qh);
        }
    }

    fn add_output(
        &mut self,
        registry: &wl_registry::WlRegistry,
        name: u32,
        version: u32,
        qh: &QueueHandle<Self>,
    ) {
        let id = OutputId(name);
        let wl_output =
            registry.bind::<wl_output::WlOutput, _, _>(name, version.min(3), qh, id);
        self.outputs.insert(
            id,
            OutputHandle {
                wl_output,
                overlay: None,
            },
        );
        self.session.handle(SessionEvent::OutputAdded { id });
    }

    /// Creates the overlay surface for an output: full-screen layer surface
    /// on the overlay layer, anchored to all four edges.
    fn create_overlay(&mut self, id: OutputId, qh: &QueueHandle<Self>) {
        let (Some(compositor), Some(layer_shell)) = (&self.compositor, &self.layer_shell) else {
            return;
        };
        let Some(handle) = self.outputs.get_mut(&id) else {
            return;
        };
        if handle.overlay.is_some() {
            return;
        }

        let surface = compositor.create_surface(qh, ());
        let layer_surface = layer_shell.get_layer_surface(
            &surface,
            Some(&handle.wl_output),
            zwlr_layer_shell_v1::Layer::Overlay,
            NAMESPACE.to_owned(),
            qh,
            id,
        );
        layer_surface.set_anchor(
            zwlr_layer_surface_v1::Anchor::Top
                | zwlr_layer_surface_v1::Anchor::Bottom
                | zwlr_layer_surface_v1::Anchor::Left
                | zwlr_layer_surface_v1::Anchor::Right,
        );
        layer_surface.set_exclusive_zone(-1);
        layer_surface.set_size(0, 0);
        surface.commit();

        handle.overlay = Some(Overlay {
            surface,
            layer_surface,
            buffers: BufferSlots::new(),
        });
        tracing::debug!("overlay surface created for {:?}", id);
    }

    /// Tears down one output's protocol objects and forgets it. A frame in
    /// flight for this output is dropped with its buffers.
    fn remove_output(&mut self, id: OutputId) {
        if let Some(mut handle) = self.outputs.remove(&id) {
            if let Some(mut overlay) = handle.overlay.take() {
                overlay.buffers.destroy();
                overlay.layer_surface.destroy();
                overlay.surface.destroy();
            }
            if handle.wl_output.version() >= 3 {
                handle.wl_output.release();
            }
            self.session.handle(SessionEvent::OutputRemoved { id });
        }
    }

    fn add_pointer(&mut self, seat: &wl_seat::WlSeat, qh: &QueueHandle<Self>) {
        if self.pointers.iter().any(|p| p.seat.id() == seat.id()) {
            return;
        }
        let id = PointerId(self.next_pointer_id);
        self.next_pointer_id += 1;
        let wl_pointer = seat.get_pointer(qh, id);
        self.pointers.push(PointerDevice {
            id,
            seat: seat.clone(),
            wl_pointer,
        });
        self.session.handle(SessionEvent::PointerAdded { id });
    }

    fn teardown(&mut self) {
        for device in self.pointers.drain(..) {
            tracing::debug!("releasing pointer {:?}", device.id);
            if device.wl_pointer.version() >= 3 {
                device.wl_pointer.release();
            }
        }
        let ids: Vec<_> = self.outputs.keys().copied().collect();
        for id in ids {
            self.remove_output(id);
        }
        self.session.teardown();
    }
}

/// Startup validation gate: every required capability and at least one
/// output must be present before any surface is touched.
pub fn validate_globals(
    has_compositor: bool,
    has_shm: bool,
    has_layer_shell: bool,
    output_count: usize,
) -> anyhow::Result<()> {
    if !has_compositor {
        bail!("compositor doesn't support wl_compositor");
    }
    if !has_shm {
        bail!("compositor doesn't support wl_shm");
    }
    if !has_layer_shell {
        bail!("compositor doesn't support zwlr_layer_shell_v1");
    }
    if output_count == 0 {
        bail!("no wl_output");
    }
    Ok(())
}

/// Connects, runs the selection session to completion, and reports how it
/// ended. Blocks until the user releases a button or a fatal error occurs.
pub fn run() -> anyhow::Result<Outcome> {
    let conn = Connection::connect_to_env().context("failed to connect to Wayland display")?;
    let (globals, mut queue) =
        registry_queue_init::<App>(&conn).context("initial registry handshake failed")?;
    let qh = queue.handle();

    let mut app = App::new();
    app.compositor = globals
        .bind::<wl_compositor::WlCompositor, _, _>(&qh, 1..=4, ())
        .ok();
    app.shm = globals.bind::<wl_shm::WlShm, _, _>(&qh, 1..=1, ()).ok();
    app.layer_shell = globals
        .bind::<zwlr_layer_shell_v1::ZwlrLayerShellV1, _, _>(&qh, 1..=4, ())
        .ok();

    let registry = globals.registry();
    for global in globals.contents().clone_list() {
        match global.interface.as_str() {
            "wl_output" => app.add_output(registry, global.name, global.version, &qh),
            "wl_seat" => {
                registry.bind::<wl_seat::WlSeat, _, _>(
                    global.name,
                    global.version.min(5),
                    &qh,
                    (),
                );
            }
            _ => {}
        }
    }

    // Seats deliver their capabilities during this roundtrip.
    queue.roundtrip(&mut app).context("initial roundtrip failed")?;

    validate_globals(
        app.compositor.is_some(),
        app.shm.is_some(),
        app.layer_shell.is_some(),
        app.session.outputs().len(),
    )?;

    let ids = app.session.outputs().ids();
    for id in ids {
        app.create_overlay(id, &qh);
    }

    while app.session.running() {
        queue
            .blocking_dispatch(&mut app)
            .context("wayland dispatch failed")?;
        if let Some(err) = app.fatal.take() {
            return Err(err);
        }
    }

    app.teardown();
    let _ = conn.flush();

    Ok(app.session.outcome())
}

impl Dispatch<wl_registry::WlRegistry, GlobalListContents> for App {
    fn event(
        state: &mut Self,
        registry: &wl_registry::WlRegistry,
        event: wl_registry::Event,
        _data: &GlobalListContents,
        _conn: &Connection,
        qh: &QueueHandle<Self>,
    ) {
        match event {
            wl_registry::Event::Global {
                name,
                interface,
                version,
            } => {
                if interface == "wl_output" {
                    state.add_output(registry, name, version, qh);
                    state.create_overlay(OutputId(name), qh);
                }
            }
            wl_registry::Event::GlobalRemove { name } => {
                state.remove_output(OutputId(name));
            }
            _ => {}
        }
    }
}

impl Dispatch<zwlr_layer_surface_v1::ZwlrLayerSurfaceV1, OutputId> for App {
    fn event(
        state: &mut Self,
        layer_surface: &zwlr_layer_surface_v1::ZwlrLayerSurfaceV1,
        event: zwlr_layer_surface_v1::Event,
        data: &OutputId,
        _conn: &Connection,
        qh: &QueueHandle<Self>,
    ) {
        match event {
            zwlr_layer_surface_v1::Event::Configure {
                serial,
                width,
                height,
            } => {
                layer_surface.ack_configure(serial);
                state.dispatch(
                    SessionEvent::OutputConfigured {
                        id: *data,
                        width,
                        height,
                    },
                    qh,
                );
            }
            zwlr_layer_surface_v1::Event::Closed => {
                state.remove_output(*data);
            }
            _ => {}
        }
    }
}

impl Dispatch<wl_seat::WlSeat, ()> for App {
    fn event(
        state: &mut Self,
        seat: &wl_seat::WlSeat,
        event: wl_seat::Event,
        _data: &(),
        _conn: &Connection,
        qh: &QueueHandle<Self>,
    ) {
        if let wl_seat::Event::Capabilities {
            capabilities: WEnum::Value(caps),
        } = event
        {
            if caps.contains(wl_seat::Capability::Pointer) {
                state.add_pointer(seat, qh);
            }
        }
    }
}

impl Dispatch<wl_pointer::WlPointer, PointerId> for App {
    fn event(
        state: &mut Self,
        _pointer: &wl_pointer::WlPointer,
        event: wl_pointer::Event,
        data: &PointerId,
        _conn: &Connection,
        qh: &QueueHandle<Self>,
    ) {
        match event {
            wl_pointer::Event::Motion {
                surface_x,
                surface_y,
                ..
            } => {
                state.dispatch(
                    SessionEvent::PointerMoved {
                        id: *data,
                        x: surface_x as i32,
                        y: surface_y as i32,
                    },
                    qh,
                );
            }
            wl_pointer::Event::Button {
                state: WEnum::Value(button_state),
                ..
            } => {
                // Any button drives the selection, matching the original.
                let button_state = match button_state {
                    wl_pointer::ButtonState::Pressed => ButtonState::Pressed,
                    wl_pointer::ButtonState::Released => ButtonState::Released,
                    _ => return,
                };
                state.dispatch(
                    SessionEvent::PointerButton {
                        id: *data,
                        state: button_state,
                    },
                    qh,
                );
            }
            _ => {}
        }
    }
}

impl Dispatch<wl_buffer::WlBuffer, BufferData> for App {
    fn event(
        state: &mut Self,
        _buffer: &wl_buffer::WlBuffer,
        event: wl_buffer::Event,
        data: &BufferData,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
    ) {
        if let wl_buffer::Event::Release = event {
            if let Some(overlay) = state
                .outputs
                .get_mut(&data.output)
                .and_then(|h| h.overlay.as_mut())
            {
                overlay.buffers.release(data.slot);
            }
        }
    }
}

impl Dispatch<wl_output::WlOutput, OutputId> for App {
    fn event(
        _state: &mut Self,
        _output: &wl_output::WlOutput,
        _event: wl_output::Event,
        _data: &OutputId,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
    ) {
        // Sizes come from the layer-surface configure, not wl_output modes.
    }
}

impl Dispatch<wl_compositor::WlCompositor, ()> for App {
    fn event(
        _: &mut Self,
        _: &wl_compositor::WlCompositor,
        _: wl_compositor::Event,
        _: &(),
        _: &Connection,
        _: &QueueHandle<Self>,
    ) {
    }
}

impl Dispatch<wl_shm::WlShm, ()> for App {
    fn event(
        _: &mut Self,
        _: &wl_shm::WlShm,
        _: wl_shm::Event,
        _: &(),
        _: &Connection,
        _: &QueueHandle<Self>,
    ) {
    }
}

impl Dispatch<wl_shm_pool::WlShmPool, ()> for App {
    fn event(
        _: &mut Self,
        _: &wl_shm_pool::WlShmPool,
        _: wl_shm_pool::Event,
        _: &(),
        _: &Connection,
        _: &QueueHandle<Self>,
    ) {
    }
}

impl Dispatch<wl_surface::WlSurface, ()> for App {
    fn event(
        _: &mut Self,
        _: &wl_surface::WlSurface,
        _: wl_surface::Event,
        _: &(),
        _: &Connection,
        _: &QueueHandle<Self>,
    ) {
    }
}

impl Dispatch<zwlr_layer_shell_v1::ZwlrLayerShellV1, ()> for App {
    fn event(
        _: &mut Self,
        _: &zwlr_layer_shell_v1::ZwlrLayerShellV1,
        _: zwlr_layer_shell_v1::Event,
        _: &(),
        _: &Connection,
        _: &QueueHandle<Self>,
    ) {
    }
}
