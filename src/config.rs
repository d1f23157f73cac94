use crate::foundation::error::{SurfaceError, SurfaceResult};
use crate::foundation::format::Usage;

/// Options applied when a [`crate::Surface`] is constructed.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SurfaceOpts {
    /// Slots reserved up front, and the slot count announced to the shared ring.
    pub initial_buffer_count: usize,
    /// Usage requested for buffers until a producer asks for something else.
    pub default_usage: Usage,
}

impl Default for SurfaceOpts {
    fn default() -> Self {
        Self {
            initial_buffer_count: 2,
            default_usage: Usage::HW_RENDER,
        }
    }
}

impl SurfaceOpts {
    /// Parse options from JSON; missing fields take their defaults.
    pub fn from_json_str(s: &str) -> SurfaceResult<Self> {
        let opts: Self = serde_json::from_str(s)
            .map_err(|e| SurfaceError::invalid_argument(format!("surface opts: {e}")))?;
        opts.validate()?;
        Ok(opts)
    }

    /// Reject values no surface can run with.
    pub fn validate(&self) -> SurfaceResult<()> {
        if self.initial_buffer_count == 0 {
            return Err(SurfaceError::invalid_argument(
                "initial_buffer_count must be >= 1",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
