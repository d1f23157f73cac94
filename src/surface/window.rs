use std::sync::Arc;

use crate::buffer::graphic_buffer::GraphicBuffer;
use crate::foundation::error::SurfaceResult;
use crate::surface::perform::{NativeQuery, PerformRequest};

/// Smallest swap interval a surface reports.
pub const MIN_SWAP_INTERVAL: i32 = 1;
/// Largest swap interval a surface reports.
pub const MAX_SWAP_INTERVAL: i32 = 1;

/// The buffer-queue interface a rendering API drives.
///
/// This is the seam for native-window shims: a shim holds an `Arc<dyn NativeWindow>` and
/// forwards its entry points here, decoding raw arguments with [`PerformRequest::decode`] and
/// [`NativeQuery::from_raw`] first.
pub trait NativeWindow: Send + Sync {
    /// Accepted and ignored; every surface presents at interval 1.
    fn set_swap_interval(&self, interval: i32) -> SurfaceResult<()>;
    /// Reserve a slot and return its buffer.
    fn dequeue_buffer(&self) -> SurfaceResult<Arc<GraphicBuffer>>;
    /// Mark a dequeued buffer as being written.
    fn lock_buffer(&self, buffer: &GraphicBuffer) -> SurfaceResult<()>;
    /// Hand a buffer to the compositor.
    fn queue_buffer(&self, buffer: &GraphicBuffer) -> SurfaceResult<()>;
    /// Read a surface property.
    fn query(&self, what: NativeQuery) -> SurfaceResult<i32>;
    /// Apply a configuration request.
    fn perform(&self, request: PerformRequest) -> SurfaceResult<()>;
}
