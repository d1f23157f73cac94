use std::sync::Arc;

use crate::buffer::graphic_buffer::GraphicBuffer;

/// Buffers indexed by slot id. Grows on demand, never shrinks.
#[derive(Debug, Default)]
pub(crate) struct SlotTable {
    slots: Vec<Option<Arc<GraphicBuffer>>>,
}

impl SlotTable {
    pub(crate) fn with_capacity(count: usize) -> Self {
        Self {
            slots: vec![None; count],
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    /// Make sure `slot` is addressable.
    pub(crate) fn ensure(&mut self, slot: usize) {
        if self.slots.len() <= slot {
            self.slots.resize(slot + 1, None);
        }
    }

    pub(crate) fn get(&self, slot: usize) -> Option<&Arc<GraphicBuffer>> {
        self.slots.get(slot).and_then(Option::as_ref)
    }

    pub(crate) fn take(&mut self, slot: usize) -> Option<Arc<GraphicBuffer>> {
        self.slots.get_mut(slot).and_then(Option::take)
    }

    /// Install `buffer` in `slot` and stamp the slot index onto it.
    pub(crate) fn install(&mut self, slot: usize, buffer: Arc<GraphicBuffer>) {
        self.ensure(slot);
        buffer.set_index(slot);
        self.slots[slot] = Some(buffer);
    }

    /// Empty every slot, yielding the buffers that were held.
    pub(crate) fn drain(&mut self) -> impl Iterator<Item = Arc<GraphicBuffer>> + '_ {
        self.slots.iter_mut().filter_map(Option::take)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/surface/slots.rs"]
mod tests;
