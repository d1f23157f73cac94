use std::sync::{Arc, Mutex, MutexGuard, TryLockError};

use crate::buffer::copy::copy_blt;
use crate::buffer::graphic_buffer::{BufferHandle, GraphicBuffer};
use crate::buffer::info::{BufferInfo, BufferRequest};
use crate::buffer::mapper::BufferMapper;
use crate::config::SurfaceOpts;
use crate::foundation::error::{SurfaceError, SurfaceResult};
use crate::foundation::format::{PixelFormat, SurfaceFlags, Usage};
use crate::foundation::geometry::{Rect, Region};
use crate::remote::composer::{
    CapabilityResolver, RemoteSurface, SurfaceComposerClient, SurfaceToken,
};
use crate::remote::shared::SharedBufferClient;
use crate::surface::dirty::DirtyTracker;
use crate::surface::parcel::{HandleRecord, Parcel};
use crate::surface::perform::{NativeQuery, PerformRequest, ProducerApi};
use crate::surface::slots::SlotTable;
use crate::surface::window::NativeWindow;

/// Producer end of a compositor surface.
///
/// A `Surface` is built either from a [`crate::SurfaceControl`] (creator side) or from a
/// [`Parcel`] (consumer side). It drives the slot ring shared with the compositor: dequeue a
/// buffer, draw into it, queue it. [`Surface::lock`] and [`Surface::unlock_and_post`] wrap that
/// cycle for software rendering and keep the unchanged part of the previous frame.
///
/// Every method takes `&self`; configuration and the software render cycle are guarded by
/// separate locks so a slow producer never blocks a configuration change.
pub struct Surface {
    client: Option<Arc<dyn SurfaceComposerClient>>,
    remote: Option<Arc<dyn RemoteSurface>>,
    shared: Option<Box<dyn SharedBufferClient>>,
    mapper: Arc<dyn BufferMapper>,
    token: SurfaceToken,
    identity: u32,
    format: PixelFormat,
    flags: SurfaceFlags,
    initialized: bool,
    slots: Mutex<SlotTable>,
    state: Mutex<SurfaceState>,
    cycle: Mutex<RenderCycle>,
}

#[derive(Debug)]
struct SurfaceState {
    connected: Option<ProducerApi>,
    swap_rect: Option<Rect>,
    next_crop: Rect,
    info: BufferInfo,
    dirty: Region,
    width: u32,
    height: u32,
}

#[derive(Debug, Default)]
struct RenderCycle {
    locked: Option<Arc<GraphicBuffer>>,
    tracker: DirtyTracker,
}

impl std::fmt::Debug for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Surface")
            .field("token", &self.token)
            .field("identity", &self.identity)
            .field("format", &self.format)
            .field("flags", &self.flags)
            .field("initialized", &self.initialized)
            .finish_non_exhaustive()
    }
}

fn lock_ignoring_poison<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl Surface {
    pub(crate) fn from_record(
        record: HandleRecord,
        client: Option<Arc<dyn SurfaceComposerClient>>,
        remote: Option<Arc<dyn RemoteSurface>>,
        mapper: Arc<dyn BufferMapper>,
        opts: &SurfaceOpts,
    ) -> Self {
        let shared = client.as_ref().and_then(|c| {
            c.shared_buffer_client(record.token, opts.initial_buffer_count, record.identity)
        });
        let initialized = Self::init_check(record.token, client.as_deref(), shared.as_deref());
        if !initialized {
            tracing::warn!(
                token = record.token.0,
                identity = record.identity,
                "surface constructed without a usable connection"
            );
        }

        Self {
            client,
            remote,
            shared,
            mapper,
            token: record.token,
            identity: record.identity,
            format: record.format,
            flags: record.flags,
            initialized,
            slots: Mutex::new(SlotTable::with_capacity(opts.initial_buffer_count)),
            state: Mutex::new(SurfaceState {
                connected: None,
                swap_rect: None,
                next_crop: Rect::default(),
                info: BufferInfo::with_usage(opts.default_usage),
                dirty: Region::new(),
                width: record.width,
                height: record.height,
            }),
            cycle: Mutex::new(RenderCycle::default()),
        }
    }

    /// Rebuild a surface from a parcel written by [`crate::SurfaceControl::write_to_parcel`].
    ///
    /// Capability references are looked up through `resolver`; references it cannot resolve
    /// leave the surface uninitialized rather than failing. Only a malformed parcel is an error.
    pub fn from_parcel(
        parcel: &mut Parcel,
        resolver: &dyn CapabilityResolver,
        mapper: Arc<dyn BufferMapper>,
        opts: &SurfaceOpts,
    ) -> SurfaceResult<Self> {
        let record = HandleRecord::read_from(parcel)?;
        let client = record.client.and_then(|id| resolver.resolve_client(id));
        let remote = record.surface.and_then(|id| resolver.resolve_surface(id));
        tracing::debug!(
            token = record.token.0,
            identity = record.identity,
            client = client.is_some(),
            remote = remote.is_some(),
            "surface read from parcel"
        );
        Ok(Self::from_record(record, client, remote, mapper, opts))
    }

    fn init_check(
        token: SurfaceToken,
        client: Option<&dyn SurfaceComposerClient>,
        shared: Option<&dyn SharedBufferClient>,
    ) -> bool {
        let Some(client) = client else {
            return false;
        };
        if !token.is_valid() || client.init_check().is_err() {
            return false;
        }
        if shared.is_none() {
            tracing::error!(token = token.0, "shared slot state unavailable");
            return false;
        }
        true
    }

    fn state(&self) -> MutexGuard<'_, SurfaceState> {
        lock_ignoring_poison(&self.state)
    }

    fn slots(&self) -> MutexGuard<'_, SlotTable> {
        lock_ignoring_poison(&self.slots)
    }

    /// Client-local token of the surface.
    pub fn token(&self) -> SurfaceToken {
        self.token
    }

    /// Identity the surface was created with.
    pub fn identity(&self) -> u32 {
        self.identity
    }

    /// Creation flags.
    pub fn flags(&self) -> SurfaceFlags {
        self.flags
    }

    /// The compositor-side surface capability, if any.
    pub fn remote_surface(&self) -> Option<Arc<dyn RemoteSurface>> {
        self.remote.clone()
    }

    /// True when both surfaces refer to the same compositor-side surface.
    pub fn is_same_surface(&self, other: &Surface) -> bool {
        match (&self.remote, &other.remote) {
            (Some(a), Some(b)) => a.id() == b.id(),
            _ => false,
        }
    }

    /// Check that the surface is usable for dequeue/queue.
    ///
    /// Fails with `NotInitialized` for an invalid token or connection, or when the compositor
    /// has recreated the surface under a new identity; with `InvalidOperation` when the surface
    /// does not accept client buffers (published identity `0`). Other failures come from the
    /// shared ring itself.
    pub fn validate(&self) -> SurfaceResult<()> {
        self.checked_shared().map(|_| ())
    }

    fn checked_shared(&self) -> SurfaceResult<&dyn SharedBufferClient> {
        let shared = match (&self.shared, self.initialized) {
            (Some(shared), true) => &**shared,
            _ => {
                tracing::error!(
                    token = self.token.0,
                    identity = self.identity,
                    "invalid token or connection"
                );
                return Err(SurfaceError::not_initialized(format!(
                    "surface {} is not initialized",
                    self.token.0
                )));
            }
        };

        let identity = shared.identity(self.token);
        if identity == 0 {
            tracing::error!(token = self.token.0, "surface does not accept client buffers");
            return Err(SurfaceError::invalid_operation(format!(
                "surface {} does not accept client buffers",
                self.token.0
            )));
        }
        if identity != self.identity {
            tracing::error!(
                token = self.token.0,
                expected = self.identity,
                published = identity,
                "surface has been recreated"
            );
            return Err(SurfaceError::not_initialized(format!(
                "surface {} was recreated (identity {} != {})",
                self.token.0, identity, self.identity
            )));
        }

        shared.validate(self.token).inspect_err(|e| {
            tracing::error!(token = self.token.0, error = %e, "shared slot state rejected token");
        })?;
        Ok(shared)
    }

    /// Reserve a slot and return its buffer, allocating a new one when needed.
    ///
    /// A buffer is replaced when the compositor asked for it, when a geometry change is pending,
    /// or when the current one lacks requested usage bits. If no buffer can be produced the slot
    /// is handed back to the ring.
    pub fn dequeue_buffer(&self) -> SurfaceResult<Arc<GraphicBuffer>> {
        self.dequeue_slot().map(|(buffer, _)| buffer)
    }

    /// Dequeue and report whether the slot buffer was just allocated.
    #[tracing::instrument(level = "debug", skip(self), fields(token = self.token.0))]
    fn dequeue_slot(&self) -> SurfaceResult<(Arc<GraphicBuffer>, bool)> {
        let shared = self.checked_shared()?;
        let slot = shared.dequeue().inspect_err(|e| {
            tracing::error!(error = %e, "dequeue failed");
        })?;

        match self.prepare_slot(shared, slot) {
            Ok((buffer, fresh)) => {
                self.state().dirty = Region::from_rect(buffer.bounds());
                Ok((buffer, fresh))
            }
            Err(e) => {
                if let Err(undo) = shared.undo_dequeue(slot) {
                    tracing::warn!(slot, error = %undo, "undo_dequeue failed");
                }
                Err(e)
            }
        }
    }

    fn prepare_slot(
        &self,
        shared: &dyn SharedBufferClient,
        slot: usize,
    ) -> SurfaceResult<(Arc<GraphicBuffer>, bool)> {
        let mut slots = self.slots();
        slots.ensure(slot);

        let request = {
            let mut st = self.state();
            // Always consulted so the ring's request is consumed.
            let ring_wants_new = shared.need_new_buffer(slot);
            let reusable = st.info.validate_buffer(slots.get(slot).map(Arc::as_ref));
            (ring_wants_new || !reusable).then(|| st.info.request())
        };

        let fresh = request.is_some();
        if let Some(request) = request {
            let buffer = self
                .reallocate(shared, &mut slots, slot, request)
                .inspect_err(|e| {
                    tracing::error!(slot, ?request, error = %e, "buffer reallocation failed");
                })?;
            let mut st = self.state();
            st.width = buffer.width();
            st.height = buffer.height();
        }

        let buffer = slots
            .get(slot)
            .cloned()
            .ok_or_else(|| SurfaceError::out_of_memory(format!("no buffer in slot {slot}")))?;
        Ok((buffer, fresh))
    }

    fn reallocate(
        &self,
        shared: &dyn SharedBufferClient,
        slots: &mut SlotTable,
        slot: usize,
        request: BufferRequest,
    ) -> SurfaceResult<Arc<GraphicBuffer>> {
        let remote = self
            .remote
            .as_ref()
            .ok_or_else(|| SurfaceError::not_initialized("no remote surface"))?;

        if let Some(old) = slots.take(slot)
            && let Some(handle) = old.handle()
        {
            self.unregister(handle);
        }

        let buffer = remote.request_buffer(
            slot,
            request.width,
            request.height,
            request.format,
            request.usage,
        )?;
        let Some(buffer) = buffer else {
            tracing::error!(slot, usage = ?request.usage, "compositor returned no buffer");
            return Err(SurfaceError::out_of_memory(format!(
                "no buffer allocated for slot {slot}"
            )));
        };

        shared.status().inspect_err(|e| {
            tracing::error!(identity = self.identity, error = %e, "shared slot state failed");
        })?;

        let Some(handle) = buffer.handle() else {
            tracing::error!(slot, "allocated buffer has no handle");
            return Err(SurfaceError::out_of_memory(format!(
                "buffer for slot {slot} has no handle"
            )));
        };
        self.mapper.register_buffer(handle).inspect_err(|e| {
            tracing::warn!(slot, ?handle, error = %e, "register_buffer failed");
        })?;

        slots.install(slot, Arc::clone(&buffer));
        tracing::debug!(
            slot,
            slots = slots.len(),
            width = buffer.width(),
            height = buffer.height(),
            "buffer installed"
        );
        Ok(buffer)
    }

    fn unregister(&self, handle: BufferHandle) {
        if let Err(e) = self.mapper.unregister_buffer(handle) {
            tracing::warn!(?handle, error = %e, "unregister_buffer failed");
        }
    }

    fn slot_of(buffer: &GraphicBuffer) -> SurfaceResult<usize> {
        buffer.index().ok_or_else(|| {
            SurfaceError::invalid_argument("buffer was not dequeued from a surface")
        })
    }

    /// Mark a dequeued buffer as being written.
    #[tracing::instrument(level = "debug", skip_all, fields(token = self.token.0, slot = ?buffer.index()))]
    pub fn lock_buffer(&self, buffer: &GraphicBuffer) -> SurfaceResult<()> {
        let shared = self.checked_shared()?;
        let slot = Self::slot_of(buffer)?;
        shared.lock(slot).inspect_err(|e| {
            tracing::error!(error = %e, "lock failed");
        })
    }

    /// Hand a buffer to the compositor with the pending crop and dirty region.
    ///
    /// A swap rectangle, when set, replaces the dirty region.
    #[tracing::instrument(level = "debug", skip_all, fields(token = self.token.0, slot = ?buffer.index()))]
    pub fn queue_buffer(&self, buffer: &GraphicBuffer) -> SurfaceResult<()> {
        let shared = self.checked_shared()?;
        let slot = Self::slot_of(buffer)?;

        let (crop, dirty) = {
            let mut st = self.state();
            if let Some(rect) = st.swap_rect {
                st.dirty = Region::from_rect(rect);
            }
            (st.next_crop, st.dirty.clone())
        };

        shared.set_crop(slot, crop)?;
        shared.set_dirty_region(slot, &dirty)?;
        shared.queue(slot).inspect_err(|e| {
            tracing::error!(error = %e, "queue failed");
        })?;

        if let Some(client) = &self.client {
            client.signal_server();
        }
        Ok(())
    }

    /// Read a surface property.
    pub fn query(&self, what: NativeQuery) -> SurfaceResult<i32> {
        let st = self.state();
        Ok(match what {
            NativeQuery::Width => st.width as i32,
            NativeQuery::Height => st.height as i32,
            NativeQuery::Format => self.format.0,
        })
    }

    /// Apply a configuration request after validating the surface.
    pub fn perform(&self, request: PerformRequest) -> SurfaceResult<()> {
        self.validate()?;
        match request {
            PerformRequest::SetUsage(usage) => {
                self.set_usage(usage);
                Ok(())
            }
            PerformRequest::Connect(api) => self.connect(api),
            PerformRequest::Disconnect(api) => self.disconnect(api),
            PerformRequest::SetCrop(rect) => {
                self.set_crop(rect);
                Ok(())
            }
            PerformRequest::SetBufferCount(count) => self.set_buffer_count(count),
            PerformRequest::SetBuffersGeometry {
                width,
                height,
                format,
            } => self.set_buffers_geometry(width, height, format),
        }
    }

    /// Replace the usage requested for future allocations.
    pub fn set_usage(&self, usage: Usage) {
        self.state().info.set_usage(usage);
    }

    /// Claim the surface for `api`. Only [`ProducerApi::EGL`] is accepted, and only once.
    pub fn connect(&self, api: ProducerApi) -> SurfaceResult<()> {
        let mut st = self.state();
        if api != ProducerApi::EGL {
            return Err(SurfaceError::invalid_argument(format!(
                "unknown producer api {}",
                api.0
            )));
        }
        if let Some(current) = st.connected {
            return Err(SurfaceError::invalid_argument(format!(
                "already connected to api {}",
                current.0
            )));
        }
        st.connected = Some(api);
        Ok(())
    }

    /// Release the surface from `api`, which must be the connected one.
    pub fn disconnect(&self, api: ProducerApi) -> SurfaceResult<()> {
        let mut st = self.state();
        if api != ProducerApi::EGL || st.connected != Some(api) {
            return Err(SurfaceError::invalid_argument(format!(
                "api {} is not connected",
                api.0
            )));
        }
        st.connected = None;
        Ok(())
    }

    /// Currently connected producer api.
    pub fn connected_api(&self) -> Option<ProducerApi> {
        self.state().connected
    }

    /// Crop applied to the next queued buffer.
    pub fn set_crop(&self, rect: Rect) {
        self.state().next_crop = rect;
    }

    /// Resize the slot ring. The compositor-side change runs inside the ring's resize.
    pub fn set_buffer_count(&self, count: usize) -> SurfaceResult<()> {
        let shared = self
            .shared
            .as_deref()
            .ok_or_else(|| SurfaceError::not_initialized("no shared slot state"))?;
        let remote = self
            .remote
            .as_ref()
            .ok_or_else(|| SurfaceError::not_initialized("no remote surface"))?;

        shared
            .set_buffer_count(count, &|n| remote.set_buffer_count(n))
            .inspect_err(|e| {
                tracing::error!(count, error = %e, "set_buffer_count failed");
            })
    }

    /// Geometry for future allocations.
    ///
    /// `0` for both sizes keeps the compositor default. Negative values, or a single zero size,
    /// fail with `InvalidArgument` and leave the state untouched.
    pub fn set_buffers_geometry(&self, width: i32, height: i32, format: i32) -> SurfaceResult<()> {
        let bad = || {
            SurfaceError::invalid_argument(format!(
                "bad buffer geometry {width}x{height} format {format}"
            ))
        };
        let (Ok(w), Ok(h)) = (u32::try_from(width), u32::try_from(height)) else {
            return Err(bad());
        };
        if format < 0 || (w == 0) != (h == 0) {
            return Err(bad());
        }
        self.state().info.set_geometry(w, h, PixelFormat(format));
        Ok(())
    }

    /// Rectangle reported as the dirty region on every queue; `None` clears it.
    pub fn set_swap_rectangle(&self, rect: Option<Rect>) {
        self.state().swap_rect = rect;
    }

    /// The buffer most recently posted by [`Surface::unlock_and_post`].
    pub fn posted_buffer(&self) -> Option<Arc<GraphicBuffer>> {
        lock_ignoring_poison(&self.cycle).tracker.posted().cloned()
    }

    /// Start a software frame.
    ///
    /// Dequeues and locks a back buffer, copies the still-valid part of the previously posted
    /// buffer into it, and maps it for CPU access. The returned dirty region is what the caller
    /// must repaint: `dirty` clipped to the buffer when copy-back is possible, the whole buffer
    /// otherwise.
    ///
    /// Fails with `InvalidOperation` while a producer api is connected or a frame is already
    /// locked, and with `WouldBlock` when another thread is inside the render cycle.
    #[tracing::instrument(level = "debug", skip_all, fields(token = self.token.0))]
    pub fn lock(&self, dirty: Option<Region>) -> SurfaceResult<LockedSurface> {
        if let Some(api) = self.connected_api() {
            tracing::error!(api = api.0, "surface is connected to a producer api");
            return Err(SurfaceError::invalid_operation(format!(
                "surface is connected to api {}",
                api.0
            )));
        }

        let mut cycle = match self.cycle.try_lock() {
            Ok(guard) => guard,
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
            Err(TryLockError::WouldBlock) => {
                tracing::error!("render cycle entered from another thread");
                return Err(SurfaceError::would_block(
                    "surface is being locked by another thread",
                ));
            }
        };
        if cycle.locked.is_some() {
            tracing::error!("surface already locked");
            return Err(SurfaceError::invalid_operation("surface already locked"));
        }

        self.set_usage(Usage::SW_READ_WRITE_OFTEN);
        let (back, fresh) = self.dequeue_slot()?;
        if let Err(e) = self.lock_buffer(&back) {
            if let (Some(slot), Some(shared)) = (back.index(), self.shared.as_deref())
                && let Err(undo) = shared.undo_dequeue(slot)
            {
                tracing::warn!(slot, error = %undo, "undo_dequeue failed");
            }
            return Err(e);
        }

        // A newly allocated back buffer holds nothing from earlier frames.
        let discard = fresh || self.flags.contains(SurfaceFlags::DESTROY_BACKBUFFER);
        let plan = cycle.tracker.plan(&back, dirty, discard);
        self.state().dirty = plan.reported.clone();

        let mut dirty = plan.dirty;
        if let Some((front, stale)) = plan.copy_back.as_ref()
            && let Err(e) = copy_blt(&back, front, stale)
        {
            tracing::warn!(error = %e, "copy-back failed, repainting the whole buffer");
            dirty = cycle.tracker.force_full_redraw(&back);
        }

        if let Err(e) = back.lock(Usage::SW_READ_WRITE_OFTEN, dirty.bounds()) {
            tracing::warn!(handle = ?back.handle(), error = %e, "failed mapping buffer");
        }

        cycle.locked = Some(Arc::clone(&back));
        Ok(LockedSurface {
            width: back.width(),
            height: back.height(),
            stride: back.stride(),
            usage: back.usage(),
            format: back.format(),
            dirty,
            buffer: back,
        })
    }

    /// Finish a software frame: unmap the locked buffer and queue it.
    ///
    /// The buffer becomes the copy-back source of the next frame even when queueing fails.
    #[tracing::instrument(level = "debug", skip_all, fields(token = self.token.0))]
    pub fn unlock_and_post(&self) -> SurfaceResult<()> {
        let mut cycle = lock_ignoring_poison(&self.cycle);
        let Some(locked) = cycle.locked.take() else {
            tracing::error!("unlock_and_post without a locked buffer");
            return Err(SurfaceError::invalid_operation("surface is not locked"));
        };

        if let Err(e) = locked.unlock() {
            tracing::error!(handle = ?locked.handle(), error = %e, "failed unmapping buffer");
        }
        let queued = self.queue_buffer(&locked);
        cycle.tracker.set_posted(locked);
        queued
    }
}

impl NativeWindow for Surface {
    fn set_swap_interval(&self, _interval: i32) -> SurfaceResult<()> {
        Ok(())
    }

    fn dequeue_buffer(&self) -> SurfaceResult<Arc<GraphicBuffer>> {
        Surface::dequeue_buffer(self)
    }

    fn lock_buffer(&self, buffer: &GraphicBuffer) -> SurfaceResult<()> {
        Surface::lock_buffer(self, buffer)
    }

    fn queue_buffer(&self, buffer: &GraphicBuffer) -> SurfaceResult<()> {
        Surface::queue_buffer(self, buffer)
    }

    fn query(&self, what: NativeQuery) -> SurfaceResult<i32> {
        Surface::query(self, what)
    }

    fn perform(&self, request: PerformRequest) -> SurfaceResult<()> {
        Surface::perform(self, request)
    }
}

impl Drop for Surface {
    fn drop(&mut self) {
        let handles: Vec<BufferHandle> = self
            .slots()
            .drain()
            .filter_map(|b| b.handle())
            .collect();
        for handle in handles {
            self.unregister(handle);
        }
        if let Some(client) = &self.client {
            client.flush_commands();
        }
    }
}

/// A back buffer mapped for CPU drawing, returned by [`Surface::lock`].
#[derive(Debug)]
pub struct LockedSurface {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Row length in pixels.
    pub stride: u32,
    /// Usage the buffer was allocated with.
    pub usage: Usage,
    /// Pixel format.
    pub format: PixelFormat,
    /// Region the caller must repaint before posting.
    pub dirty: Region,
    buffer: Arc<GraphicBuffer>,
}

impl LockedSurface {
    /// The mapped buffer.
    pub fn buffer(&self) -> &Arc<GraphicBuffer> {
        &self.buffer
    }

    /// Read the mapped pixels.
    pub fn with_pixels(&self, f: impl FnMut(&[u8])) -> SurfaceResult<()> {
        self.buffer.with_bytes(f)
    }

    /// Write the mapped pixels.
    pub fn with_pixels_mut(&self, f: impl FnMut(&mut [u8])) -> SurfaceResult<()> {
        self.buffer.with_bytes_mut(f)
    }
}
