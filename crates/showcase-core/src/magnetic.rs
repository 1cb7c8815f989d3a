//! Magnetic hover offset for call-to-action buttons.

use crate::constants::{MAGNETIC_CONTENT_FACTOR, MAGNETIC_DAMPING};
use crate::error::MagneticError;
use crate::host::Rect;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MagneticOffset {
    pub dx: f64,
    pub dy: f64,
}

impl MagneticOffset {
    pub const ZERO: MagneticOffset = MagneticOffset { dx: 0.0, dy: 0.0 };

    /// Offset applied to the button's inner label.
    pub fn content(&self) -> MagneticOffset {
        MagneticOffset {
            dx: self.dx * MAGNETIC_CONTENT_FACTOR,
            dy: self.dy * MAGNETIC_CONTENT_FACTOR,
        }
    }
}

/// Offset toward the pointer: distance from the box centre over the damping.
pub fn magnetic_offset(
    client_x: f64,
    client_y: f64,
    bounds: Rect,
) -> Result<MagneticOffset, MagneticError> {
    if !client_x.is_finite() || !client_y.is_finite() {
        return Err(MagneticError::NonFinitePointer {
            x: client_x,
            y: client_y,
        });
    }
    let usable = |v: f64| v.is_finite() && v >= 0.0;
    if !usable(bounds.width)
        || !usable(bounds.height)
        || !bounds.left.is_finite()
        || !bounds.top.is_finite()
    {
        return Err(MagneticError::BadBounds {
            width: bounds.width,
            height: bounds.height,
        });
    }
    let (cx, cy) = bounds.center();
    Ok(MagneticOffset {
        dx: (client_x - cx) / MAGNETIC_DAMPING,
        dy: (client_y - cy) / MAGNETIC_DAMPING,
    })
}

/// Per-button state. Each button owns one; nothing is shared between them.
#[derive(Clone, Debug, Default)]
pub struct MagneticButton {
    offset: MagneticOffset,
}

impl MagneticButton {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn offset(&self) -> MagneticOffset {
        self.offset
    }

    /// Recompute from a pointer move. On error the previous offset is kept.
    pub fn on_move(
        &mut self,
        client_x: f64,
        client_y: f64,
        bounds: Rect,
    ) -> Result<MagneticOffset, MagneticError> {
        let offset = magnetic_offset(client_x, client_y, bounds)?;
        self.offset = offset;
        Ok(offset)
    }

    /// Pointer left: the offset is zero from now on. Returns the offset the
    /// button is animating back from.
    pub fn on_leave(&mut self) -> MagneticOffset {
        std::mem::replace(&mut self.offset, MagneticOffset::ZERO)
    }
}
