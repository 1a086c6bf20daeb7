/// Stable identity of an output, the `wl_registry` global name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OutputId(pub u32);

/// One physical display the overlay is drawn on.
///
/// An output starts unconfigured and must never be rendered to until the
/// display server acknowledges its surface with a size.
#[derive(Debug)]
pub struct Output {
    id: OutputId,
    configured: bool,
    width: u32,
    height: u32,
}

impl Output {
    fn new(id: OutputId) -> Self {
        Self {
            id,
            configured: false,
            width: 0,
            height: 0,
        }
    }

    pub fn id(&self) -> OutputId {
        self.id
    }

    pub fn configured(&self) -> bool {
        self.configured
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Insertion-ordered set of outputs, unique by id.
///
/// Replaces intrusive list membership: entries are addressed by stable id,
/// so removal during a render pass cannot dangle.
#[derive(Debug, Default)]
pub struct OutputRegistry {
    outputs: Vec<Output>,
}

impl OutputRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an output in unconfigured state. Re-registering an id is a no-op.
    pub fn register(&mut self, id: OutputId) {
        if self.get(id).is_some() {
            tracing::warn!("output {:?} registered twice, ignoring", id);
            return;
        }
        tracing::debug!("output {:?} added", id);
        self.outputs.push(Output::new(id));
    }

    /// Marks an output configured and records its size. Idempotent: repeat
    /// configures simply update the size.
    pub fn configure(&mut self, id: OutputId, width: u32, height: u32) -> bool {
        match self.get_mut(id) {
            Some(output) => {
                output.configured = true;
                output.width = width;
                output.height = height;
                tracing::debug!("output {:?} configured {}x{}", id, width, height);
                true
            }
            None => {
                tracing::warn!("configure for unknown output {:?}", id);
                false
            }
        }
    }

    /// Drops an output. Safe with a render in flight: frames for a removed
    /// output are simply no longer dispatched.
    pub fn remove(&mut self, id: OutputId) {
        let before = self.outputs.len();
        self.outputs.retain(|o| o.id != id);
        if self.outputs.len() != before {
            tracing::debug!("output {:?} removed", id);
        }
    }

    pub fn get(&self, id: OutputId) -> Option<&Output> {
        self.outputs.iter().find(|o| o.id == id)
    }

    fn get_mut(&mut self, id: OutputId) -> Option<&mut Output> {
        self.outputs.iter_mut().find(|o| o.id == id)
    }

    pub fn len(&self) -> usize {
        self.outputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }

    /// Ids in registration order, for the all-outputs render pass.
    pub fn ids(&self) -> Vec<OutputId> {
        self.outputs.iter().map(|o| o.id).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Output> {
        self.outputs.iter()
    }
}
