use std::sync::{Arc, Mutex, MutexGuard, Weak};

use crate::buffer::mapper::BufferMapper;
use crate::config::SurfaceOpts;
use crate::foundation::error::{SurfaceError, SurfaceResult};
use crate::foundation::format::SurfaceFlags;
use crate::foundation::geometry::Region;
use crate::remote::composer::{RemoteSurface, SurfaceComposerClient, SurfaceData};
use crate::surface::parcel::{HandleRecord, Parcel};
use crate::surface::swap_chain::Surface;

/// Creator-side handle of a compositor surface.
///
/// Forwards surface properties (layer, position, size, visibility, ...) to the compositor and
/// hands out the [`Surface`] used to render into it. The handle owns the compositor-side
/// lifetime: [`SurfaceControl::destroy`] (or dropping the handle) tears the surface down.
pub struct SurfaceControl {
    refs: Mutex<ControlRefs>,
    data: SurfaceData,
    flags: SurfaceFlags,
    mapper: Arc<dyn BufferMapper>,
    opts: SurfaceOpts,
    surface: Mutex<Weak<Surface>>,
}

struct ControlRefs {
    client: Option<Arc<dyn SurfaceComposerClient>>,
    remote: Option<Arc<dyn RemoteSurface>>,
}

impl std::fmt::Debug for SurfaceControl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SurfaceControl")
            .field("data", &self.data)
            .field("flags", &self.flags)
            .field("valid", &self.is_valid())
            .finish_non_exhaustive()
    }
}

impl SurfaceControl {
    /// Wrap a freshly created compositor surface.
    pub fn new(
        client: Arc<dyn SurfaceComposerClient>,
        remote: Arc<dyn RemoteSurface>,
        data: SurfaceData,
        flags: SurfaceFlags,
        mapper: Arc<dyn BufferMapper>,
    ) -> Self {
        Self {
            refs: Mutex::new(ControlRefs {
                client: Some(client),
                remote: Some(remote),
            }),
            data,
            flags,
            mapper,
            opts: SurfaceOpts::default(),
            surface: Mutex::new(Weak::new()),
        }
    }

    /// Options used for surfaces created by [`SurfaceControl::surface`].
    pub fn with_opts(mut self, opts: SurfaceOpts) -> Self {
        self.opts = opts;
        self
    }

    fn refs(&self) -> MutexGuard<'_, ControlRefs> {
        self.refs.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Surface description the handle was created with.
    pub fn data(&self) -> SurfaceData {
        self.data
    }

    /// Creation flags.
    pub fn flags(&self) -> SurfaceFlags {
        self.flags
    }

    /// True while the token is valid and the connection has not been released.
    pub fn is_valid(&self) -> bool {
        self.data.token.is_valid() && self.refs().client.is_some()
    }

    /// True when both handles refer to the same compositor-side surface.
    pub fn is_same_surface(&self, other: &SurfaceControl) -> bool {
        let a = self.refs().remote.as_ref().map(|r| r.id());
        let b = other.refs().remote.as_ref().map(|r| r.id());
        matches!((a, b), (Some(a), Some(b)) if a == b)
    }

    /// Check the handle and return the connection to forward to.
    ///
    /// Fails with `NotInitialized` once the handle was destroyed or when the token is invalid,
    /// and with the connection's own status when it never finished initializing.
    pub fn validate(&self) -> SurfaceResult<Arc<dyn SurfaceComposerClient>> {
        let token = self.data.token;
        let Some(client) = self.refs().client.clone().filter(|_| token.is_valid()) else {
            tracing::error!(token = token.0, identity = self.data.identity, "invalid token or connection");
            return Err(SurfaceError::not_initialized(format!(
                "surface control {} is not valid",
                token.0
            )));
        };
        client.init_check().inspect_err(|e| {
            tracing::error!(token = token.0, error = %e, "connection not initialized");
        })?;
        Ok(client)
    }

    /// Set the z-order.
    pub fn set_layer(&self, layer: i32) -> SurfaceResult<()> {
        self.validate()?.set_layer(self.data.token, layer)
    }

    /// Move the surface.
    pub fn set_position(&self, x: i32, y: i32) -> SurfaceResult<()> {
        self.validate()?.set_position(self.data.token, x, y)
    }

    /// Resize the surface.
    pub fn set_size(&self, width: u32, height: u32) -> SurfaceResult<()> {
        self.validate()?.set_size(self.data.token, width, height)
    }

    /// Hide the surface.
    pub fn hide(&self) -> SurfaceResult<()> {
        self.validate()?.hide(self.data.token)
    }

    /// Show the surface at `layer`.
    pub fn show(&self, layer: i32) -> SurfaceResult<()> {
        self.validate()?.show(self.data.token, layer)
    }

    /// Freeze the surface contents.
    pub fn freeze(&self) -> SurfaceResult<()> {
        self.validate()?.freeze(self.data.token)
    }

    /// Resume updating the surface contents.
    pub fn unfreeze(&self) -> SurfaceResult<()> {
        self.validate()?.unfreeze(self.data.token)
    }

    /// Update the bits of the compositor flags selected by `mask`.
    pub fn set_flags(&self, flags: u32, mask: u32) -> SurfaceResult<()> {
        self.validate()?.set_flags(self.data.token, flags, mask)
    }

    /// Region the compositor may treat as transparent.
    pub fn set_transparent_region_hint(&self, region: &Region) -> SurfaceResult<()> {
        self.validate()?
            .set_transparent_region_hint(self.data.token, region)
    }

    /// Plane alpha.
    pub fn set_alpha(&self, alpha: f32) -> SurfaceResult<()> {
        self.validate()?.set_alpha(self.data.token, alpha)
    }

    /// 2x2 transform.
    pub fn set_matrix(&self, dsdx: f32, dtdx: f32, dsdy: f32, dtdy: f32) -> SurfaceResult<()> {
        self.validate()?
            .set_matrix(self.data.token, dsdx, dtdx, dsdy, dtdy)
    }

    /// Tint shown while frozen.
    pub fn set_freeze_tint(&self, tint: u32) -> SurfaceResult<()> {
        self.validate()?.set_freeze_tint(self.data.token, tint)
    }

    /// Destroy the compositor-side surface and release both capabilities.
    ///
    /// Safe to call more than once; later calls do nothing.
    pub fn destroy(&self) {
        let (client, remote) = {
            let mut refs = self.refs();
            (refs.client.take(), refs.remote.take())
        };
        drop(remote);

        let Some(client) = client else {
            return;
        };
        if self.data.token.is_valid()
            && let Err(e) = client.destroy_surface(self.data.token)
        {
            tracing::warn!(token = self.data.token.0, error = %e, "destroy_surface failed");
        }
        client.flush_commands();
        tracing::debug!(token = self.data.token.0, "surface control destroyed");
    }

    /// Same as [`SurfaceControl::destroy`].
    pub fn release(&self) {
        self.destroy();
    }

    /// The rendering surface for this handle.
    ///
    /// Reuses the surface handed out earlier while any caller still holds it; otherwise builds a
    /// new one. The handle only keeps a weak reference.
    pub fn surface(&self) -> Arc<Surface> {
        let mut cached = self
            .surface
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(surface) = cached.upgrade() {
            return surface;
        }

        let (client, remote) = {
            let refs = self.refs();
            (refs.client.clone(), refs.remote.clone())
        };
        let record = self.record(client.as_deref(), remote.as_deref());
        let surface = Arc::new(Surface::from_record(
            record,
            client,
            remote,
            Arc::clone(&self.mapper),
            &self.opts,
        ));
        *cached = Arc::downgrade(&surface);
        surface
    }

    fn record(
        &self,
        client: Option<&dyn SurfaceComposerClient>,
        remote: Option<&dyn RemoteSurface>,
    ) -> HandleRecord {
        HandleRecord {
            client: client.map(|c| c.id()),
            surface: remote.map(|r| r.id()),
            token: self.data.token,
            identity: self.data.identity,
            width: self.data.width,
            height: self.data.height,
            format: self.data.format,
            flags: self.flags,
        }
    }

    /// Serialize a handle for another process; an absent or invalid handle writes the null
    /// record (no capabilities, token `-1`, zero geometry).
    pub fn write_to_parcel(control: Option<&SurfaceControl>, parcel: &mut Parcel) {
        let record = match control {
            Some(control) if control.is_valid() => {
                let refs = control.refs();
                control.record(refs.client.as_deref(), refs.remote.as_deref())
            }
            _ => HandleRecord::INVALID,
        };
        record.write_to(parcel);
    }
}

impl Drop for SurfaceControl {
    fn drop(&mut self) {
        self.destroy();
    }
}
