use crate::foundation::error::SurfaceResult;
use crate::foundation::geometry::{Rect, Region};
use crate::remote::composer::SurfaceToken;

/// Client end of the slot ring shared with the compositor.
///
/// The ring owns slot ownership (free, dequeued, locked, queued) for both processes. Calls may
/// block (notably [`SharedBufferClient::dequeue`]) under the ring's own timeout rules.
pub trait SharedBufferClient: Send + Sync {
    /// Reserve a free slot for the producer.
    fn dequeue(&self) -> SurfaceResult<usize>;
    /// Return a reserved slot to the free pool.
    fn undo_dequeue(&self, slot: usize) -> SurfaceResult<()>;
    /// Mark a dequeued slot as being written.
    fn lock(&self, slot: usize) -> SurfaceResult<()>;
    /// Hand a slot to the compositor.
    fn queue(&self, slot: usize) -> SurfaceResult<()>;
    /// Crop to apply when the slot is displayed.
    fn set_crop(&self, slot: usize, crop: Rect) -> SurfaceResult<()>;
    /// Region of the slot that changed since its previous frame.
    fn set_dirty_region(&self, slot: usize, region: &Region) -> SurfaceResult<()>;
    /// Whether the compositor asked for the slot's buffer to be replaced. Clears the request.
    fn need_new_buffer(&self, slot: usize) -> bool;
    /// Resize the ring; `apply` performs the matching compositor-side change and its failure
    /// aborts the resize.
    fn set_buffer_count(
        &self,
        count: usize,
        apply: &dyn Fn(usize) -> SurfaceResult<()>,
    ) -> SurfaceResult<()>;
    /// Current status of the ring.
    fn status(&self) -> SurfaceResult<()>;
    /// Identity currently published for `token`; `0` disables client-side dequeue/queue.
    fn identity(&self, token: SurfaceToken) -> u32;
    /// Whether `token` still names a live surface.
    fn validate(&self, token: SurfaceToken) -> SurfaceResult<()>;
}
