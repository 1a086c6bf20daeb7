//! Redraw planning: which outputs a directive actually touches.
//!
//! Redraws are pulled, never pushed on a timer; every frame is caused by a
//! discrete event. An unconfigured output is never part of a plan.

use crate::core::event::Redraw;
use crate::core::output::{OutputId, OutputRegistry};

/// Expands a redraw directive into render targets, in registry order.
pub fn plan(registry: &OutputRegistry, redraw: Redraw) -> Vec<OutputId> {
    match redraw {
        Redraw::None => Vec::new(),
        Redraw::One(id) => registry
            .get(id)
            .filter(|o| o.configured())
            .map(|o| vec![o.id()])
            .unwrap_or_default(),
        Redraw::All => registry
            .iter()
            .filter(|o| o.configured())
            .map(|o| o.id())
            .collect(),
    }
}
