//! Per-frame pass queue features enqueue into

use crate::passes::ScriptablePass;

/// Passes enqueued for one frame
///
/// Borrowed from the features that own them; recorded in event order, with
/// enqueue order breaking ties.
#[derive(Default)]
pub struct PassQueue<'a> {
    passes: Vec<&'a dyn ScriptablePass>,
}

impl<'a> PassQueue<'a> {
    pub fn new() -> Self {
        Self { passes: Vec::new() }
    }

    pub fn enqueue(&mut self, pass: &'a dyn ScriptablePass) {
        log::trace!("Enqueued pass '{}' at {:?}", pass.name(), pass.event());
        self.passes.push(pass);
    }

    pub fn len(&self) -> usize {
        self.passes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }

    /// Passes in recording order
    pub fn into_sorted(mut self) -> Vec<&'a dyn ScriptablePass> {
        self.passes.sort_by_key(|pass| pass.event());
        self.passes
    }
}
