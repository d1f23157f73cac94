use std::sync::Mutex;
use std::sync::atomic::{AtomicI32, Ordering};

use crate::foundation::error::{SurfaceError, SurfaceResult};
use crate::foundation::format::{PixelFormat, Usage};
use crate::foundation::geometry::Rect;

/// Opaque native handle identifying a buffer's memory to the local mapper.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BufferHandle(pub u64);

/// Device-specific access to one buffer's pixel memory.
///
/// Pixels may only be touched between a successful [`BufferMemory::lock`] and the matching
/// [`BufferMemory::unlock`]; reads need a `SW_READ_*` lock and writes a `SW_WRITE_*` lock.
pub trait BufferMemory: Send + Sync {
    /// Map the memory for CPU access with `usage`, limited to `bounds`.
    fn lock(&self, usage: Usage, bounds: Rect) -> SurfaceResult<()>;
    /// Release the current mapping.
    fn unlock(&self) -> SurfaceResult<()>;
    /// Borrow the mapped bytes for reading.
    fn with_bytes(&self, f: &mut dyn FnMut(&[u8])) -> SurfaceResult<()>;
    /// Borrow the mapped bytes for writing.
    fn with_bytes_mut(&self, f: &mut dyn FnMut(&mut [u8])) -> SurfaceResult<()>;
}

#[derive(Debug)]
struct HeapState {
    bytes: Vec<u8>,
    mapped: Option<(Usage, Rect)>,
}

/// Heap-backed [`BufferMemory`] for tests and software fallbacks.
#[derive(Debug)]
pub struct HeapMemory {
    state: Mutex<HeapState>,
}

impl HeapMemory {
    /// Zero-filled memory of `len` bytes.
    pub fn new(len: usize) -> Self {
        Self {
            state: Mutex::new(HeapState {
                bytes: vec![0; len],
                mapped: None,
            }),
        }
    }

    /// Whether a mapping is currently held.
    pub fn is_locked(&self) -> bool {
        self.lock_state().mapped.is_some()
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, HeapState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl BufferMemory for HeapMemory {
    fn lock(&self, usage: Usage, bounds: Rect) -> SurfaceResult<()> {
        let mut st = self.lock_state();
        if st.mapped.is_some() {
            return Err(SurfaceError::invalid_operation("buffer memory already locked"));
        }
        st.mapped = Some((usage, bounds));
        Ok(())
    }

    fn unlock(&self) -> SurfaceResult<()> {
        let mut st = self.lock_state();
        if st.mapped.take().is_none() {
            return Err(SurfaceError::invalid_operation("buffer memory not locked"));
        }
        Ok(())
    }

    fn with_bytes(&self, f: &mut dyn FnMut(&[u8])) -> SurfaceResult<()> {
        let st = self.lock_state();
        let mapped = st.mapped;
        match mapped {
            Some((usage, _)) if usage.intersects(Usage::SW_READ_OFTEN) => {
                f(&st.bytes);
                Ok(())
            }
            _ => Err(SurfaceError::invalid_operation(
                "buffer memory not locked for reading",
            )),
        }
    }

    fn with_bytes_mut(&self, f: &mut dyn FnMut(&mut [u8])) -> SurfaceResult<()> {
        let mut st = self.lock_state();
        let mapped = st.mapped;
        match mapped {
            Some((usage, _)) if usage.intersects(Usage::SW_WRITE_OFTEN) => {
                f(&mut st.bytes);
                Ok(())
            }
            _ => Err(SurfaceError::invalid_operation(
                "buffer memory not locked for writing",
            )),
        }
    }
}

/// Geometry and usage of an allocated buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BufferDesc {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Row pitch in pixels (>= width).
    pub stride: u32,
    /// Pixel format.
    pub format: PixelFormat,
    /// Usage bits the buffer was allocated with.
    pub usage: Usage,
}

/// A graphics buffer handed out by the compositor for one slot.
///
/// The slot index is stamped onto the buffer when it is installed in a slot table; it is the
/// only link between a dequeue and the matching lock/queue.
pub struct GraphicBuffer {
    desc: BufferDesc,
    handle: Option<BufferHandle>,
    index: AtomicI32,
    memory: Box<dyn BufferMemory>,
}

impl std::fmt::Debug for GraphicBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphicBuffer")
            .field("desc", &self.desc)
            .field("handle", &self.handle)
            .field("index", &self.index())
            .finish_non_exhaustive()
    }
}

impl GraphicBuffer {
    /// Wrap memory obtained from an allocator.
    pub fn new(desc: BufferDesc, handle: Option<BufferHandle>, memory: Box<dyn BufferMemory>) -> Self {
        Self {
            desc,
            handle,
            index: AtomicI32::new(-1),
            memory,
        }
    }

    /// Allocate a tightly packed buffer (`stride == width`) on the heap.
    pub fn with_heap_memory(
        width: u32,
        height: u32,
        format: PixelFormat,
        usage: Usage,
        handle: BufferHandle,
    ) -> SurfaceResult<Self> {
        let bpp = format.bytes_per_pixel().ok_or_else(|| {
            SurfaceError::invalid_argument(format!("no pixel size for format {}", format.0))
        })?;
        let len = (width as usize)
            .checked_mul(height as usize)
            .and_then(|px| px.checked_mul(bpp))
            .ok_or_else(|| SurfaceError::out_of_memory("buffer size overflows"))?;
        let desc = BufferDesc {
            width,
            height,
            stride: width,
            format,
            usage,
        };
        Ok(Self::new(desc, Some(handle), Box::new(HeapMemory::new(len))))
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.desc.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.desc.height
    }

    /// Row pitch in pixels.
    pub fn stride(&self) -> u32 {
        self.desc.stride
    }

    /// Pixel format.
    pub fn format(&self) -> PixelFormat {
        self.desc.format
    }

    /// Usage bits the buffer carries.
    pub fn usage(&self) -> Usage {
        self.desc.usage
    }

    /// Native handle, `None` when the allocator returned a buffer without memory.
    pub fn handle(&self) -> Option<BufferHandle> {
        self.handle
    }

    /// Full bounds `[0, width) x [0, height)`.
    pub fn bounds(&self) -> Rect {
        Rect::from_size(self.desc.width, self.desc.height)
    }

    /// Slot index stamped by the owning slot table, if any.
    pub fn index(&self) -> Option<usize> {
        usize::try_from(self.index.load(Ordering::Acquire)).ok()
    }

    pub(crate) fn set_index(&self, index: usize) {
        let index = i32::try_from(index).unwrap_or(-1);
        self.index.store(index, Ordering::Release);
    }

    /// True when width, height and format all match.
    pub fn same_geometry(&self, other: &GraphicBuffer) -> bool {
        self.desc.width == other.desc.width
            && self.desc.height == other.desc.height
            && self.desc.format == other.desc.format
    }

    /// Map the buffer for CPU access limited to `bounds`.
    pub fn lock(&self, usage: Usage, bounds: Rect) -> SurfaceResult<()> {
        self.memory.lock(usage, bounds)
    }

    /// Release the CPU mapping.
    pub fn unlock(&self) -> SurfaceResult<()> {
        self.memory.unlock()
    }

    /// Read the mapped bytes.
    pub fn with_bytes(&self, mut f: impl FnMut(&[u8])) -> SurfaceResult<()> {
        self.memory.with_bytes(&mut f)
    }

    /// Write the mapped bytes.
    pub fn with_bytes_mut(&self, mut f: impl FnMut(&mut [u8])) -> SurfaceResult<()> {
        self.memory.with_bytes_mut(&mut f)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/buffer/graphic_buffer.rs"]
mod tests;
