use std::collections::BTreeSet;
use std::sync::Mutex;

use crate::buffer::graphic_buffer::BufferHandle;
use crate::foundation::error::{SurfaceError, SurfaceResult};

/// Local service that makes buffers received from the compositor usable in this process.
pub trait BufferMapper: Send + Sync {
    /// Import `handle` so its memory can be locked.
    fn register_buffer(&self, handle: BufferHandle) -> SurfaceResult<()>;
    /// Drop the import of `handle`.
    fn unregister_buffer(&self, handle: BufferHandle) -> SurfaceResult<()>;
}

/// Bookkeeping-only [`BufferMapper`] that tracks which handles are registered.
///
/// Suitable for heap-backed buffers, which need no import step.
#[derive(Debug, Default)]
pub struct RegistryMapper {
    registered: Mutex<BTreeSet<BufferHandle>>,
}

impl RegistryMapper {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Handles currently registered, in ascending order.
    pub fn registered(&self) -> Vec<BufferHandle> {
        self.registered
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .copied()
            .collect()
    }
}

impl BufferMapper for RegistryMapper {
    fn register_buffer(&self, handle: BufferHandle) -> SurfaceResult<()> {
        let mut set = self.registered.lock().unwrap_or_else(|e| e.into_inner());
        if !set.insert(handle) {
            return Err(SurfaceError::invalid_argument(format!(
                "buffer {handle:?} already registered"
            )));
        }
        Ok(())
    }

    fn unregister_buffer(&self, handle: BufferHandle) -> SurfaceResult<()> {
        let mut set = self.registered.lock().unwrap_or_else(|e| e.into_inner());
        if !set.remove(&handle) {
            return Err(SurfaceError::invalid_argument(format!(
                "buffer {handle:?} was never registered"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/buffer/mapper.rs"]
mod tests;
