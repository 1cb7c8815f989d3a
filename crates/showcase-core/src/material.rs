//! Wood finish swatches and the dim → swap → restore card transition.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Material {
    Walnut,
    Oak,
    Maple,
}

impl Material {
    pub const ALL: [Material; 3] = [Material::Walnut, Material::Oak, Material::Maple];

    /// Look up a swatch by its `data-material` value.
    pub fn from_id(id: &str) -> Option<Self> {
        match id.trim() {
            "walnut" => Some(Self::Walnut),
            "oak" => Some(Self::Oak),
            "maple" => Some(Self::Maple),
            _ => None,
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            Self::Walnut => "walnut",
            Self::Oak => "oak",
            Self::Maple => "maple",
        }
    }

    /// CSS filter applied to product photos.
    pub fn css_filter(&self) -> &'static str {
        match self {
            Self::Walnut => "brightness(0.95) saturate(1.1)",
            Self::Oak => "brightness(1.1) saturate(0.9)",
            Self::Maple => "brightness(1.2) saturate(0.85)",
        }
    }

    /// Base colour for the 3D viewer's wooden parts (sRGB hex).
    pub fn rgb_hex(&self) -> u32 {
        match self {
            Self::Walnut => 0x5d4037,
            Self::Oak => 0xc8a165,
            Self::Maple => 0xe8d3b0,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SwapPhase {
    #[default]
    Idle,
    Dimming,
    Restoring,
}

/// Per-card swap sequence, advanced by tween completion events.
#[derive(Clone, Debug, Default)]
pub struct CardSwap {
    phase: SwapPhase,
    pending: Option<Material>,
}

impl CardSwap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> SwapPhase {
        self.phase
    }

    /// A swatch was chosen: start dimming. A later selection made before the
    /// dim finishes replaces the pending material.
    pub fn select(&mut self, swatch_id: &str) {
        self.pending = Material::from_id(swatch_id);
        self.phase = SwapPhase::Dimming;
    }

    /// Dim finished: returns the material to apply, `None` for an unknown
    /// swatch (the card keeps its current look), and moves on to restoring.
    pub fn on_dim_complete(&mut self) -> Option<Material> {
        if self.phase != SwapPhase::Dimming {
            return None;
        }
        self.phase = SwapPhase::Restoring;
        self.pending.take()
    }

    pub fn on_restore_complete(&mut self) {
        if self.phase == SwapPhase::Restoring {
            self.phase = SwapPhase::Idle;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip_and_filters_match() {
        for m in Material::ALL {
            assert_eq!(Material::from_id(m.id()), Some(m));
        }
        assert_eq!(
            Material::from_id("oak").map(|m| m.css_filter()),
            Some("brightness(1.1) saturate(0.9)")
        );
        assert_eq!(Material::from_id("teak"), None);
    }

    #[test]
    fn swap_runs_dim_then_restore() {
        let mut s = CardSwap::new();
        s.select("maple");
        assert_eq!(s.phase(), SwapPhase::Dimming);
        assert_eq!(s.on_dim_complete(), Some(Material::Maple));
        assert_eq!(s.phase(), SwapPhase::Restoring);
        s.on_restore_complete();
        assert_eq!(s.phase(), SwapPhase::Idle);
    }

    #[test]
    fn unknown_swatch_swaps_nothing() {
        let mut s = CardSwap::new();
        s.select("ebony");
        assert_eq!(s.on_dim_complete(), None);
        assert_eq!(s.phase(), SwapPhase::Restoring);
    }

    #[test]
    fn latest_selection_wins_and_stale_events_are_ignored() {
        let mut s = CardSwap::new();
        s.select("walnut");
        s.select("oak");
        assert_eq!(s.on_dim_complete(), Some(Material::Oak));
        assert_eq!(s.on_dim_complete(), None);
        s.on_restore_complete();
        s.on_restore_complete();
        assert_eq!(s.phase(), SwapPhase::Idle);
    }
}
