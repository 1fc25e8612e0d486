use crate::error::{Result, SystemError};
use crate::math::Point3;
use crate::topology::{FaceHandle, Surface};

/// A queued edit of a navigation surface.
#[derive(Debug, Clone)]
pub enum SurfaceCommand {
    /// Adds the triangle `a`, `b`, `c` under `handle`.
    Register {
        a: Point3,
        b: Point3,
        c: Point3,
        handle: FaceHandle,
    },
    /// Removes the face registered under `handle`.
    Unregister { handle: FaceHandle },
}

impl SurfaceCommand {
    /// Index of the layer the command edits.
    #[must_use]
    pub fn layer(&self) -> usize {
        match self {
            Self::Register { handle, .. } | Self::Unregister { handle } => handle.layer(),
        }
    }

    /// Applies the command to its layer.
    ///
    /// # Errors
    ///
    /// Returns [`SystemError::InvalidLayer`] if the layer does not exist, or
    /// the surface's error if its records are inconsistent.
    pub fn apply(self, layers: &mut [Surface]) -> Result<()> {
        let layer = self.layer();
        let surface = layers
            .get_mut(layer)
            .ok_or(SystemError::InvalidLayer(layer))?;
        match self {
            Self::Register { a, b, c, handle } => {
                surface.register_face(a, b, c, handle)?;
            }
            Self::Unregister { handle } => {
                surface.unregister_face(&handle)?;
            }
        }
        Ok(())
    }
}
