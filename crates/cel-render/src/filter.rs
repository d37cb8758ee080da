//! Filtering and sorting settings for draw lists

use bitflags::bitflags;
use serde::{Deserialize, Deserializer, Serialize};

/// Lowest render queue value a renderer can use
pub const MIN_RENDER_QUEUE: i32 = 0;
/// Highest render queue value a renderer can use
pub const MAX_RENDER_QUEUE: i32 = 5000;
/// Last queue value still considered opaque (alpha test included)
pub const OPAQUE_QUEUE_END: i32 = 2500;

/// Inclusive range of render queue values
///
/// Always normalised: `lower_bound() <= upper_bound()` regardless of the
/// order the bounds were given in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderQueueRange {
    lower_bound: i32,
    upper_bound: i32,
}

impl RenderQueueRange {
    /// Opaque and alpha-tested geometry
    pub const OPAQUE: Self = Self {
        lower_bound: MIN_RENDER_QUEUE,
        upper_bound: OPAQUE_QUEUE_END,
    };

    /// Blended geometry
    pub const TRANSPARENT: Self = Self {
        lower_bound: OPAQUE_QUEUE_END + 1,
        upper_bound: MAX_RENDER_QUEUE,
    };

    /// Every queue
    pub const ALL: Self = Self {
        lower_bound: MIN_RENDER_QUEUE,
        upper_bound: MAX_RENDER_QUEUE,
    };

    /// Build a range from two bounds in either order
    pub fn new(a: i32, b: i32) -> Self {
        Self {
            lower_bound: a.min(b),
            upper_bound: a.max(b),
        }
    }

    pub fn lower_bound(&self) -> i32 {
        self.lower_bound
    }

    pub fn upper_bound(&self) -> i32 {
        self.upper_bound
    }

    pub fn contains(&self, queue: i32) -> bool {
        (self.lower_bound..=self.upper_bound).contains(&queue)
    }
}

impl Default for RenderQueueRange {
    fn default() -> Self {
        Self::ALL
    }
}

/// 32-bit layer mask; bit `n` selects layer `n`
///
/// Deserialises from either an unsigned or a signed integer, so `-1` reads
/// as every layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct LayerMask(pub u32);

impl<'de> Deserialize<'de> for LayerMask {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Bits {
            Unsigned(u32),
            Signed(i32),
        }

        Ok(match Bits::deserialize(deserializer)? {
            Bits::Unsigned(bits) => Self(bits),
            Bits::Signed(bits) => Self(bits as u32),
        })
    }
}

impl LayerMask {
    pub const NONE: Self = Self(0);
    pub const ALL: Self = Self(u32::MAX);

    /// Mask selecting a single layer (`layer` must be below 32)
    pub fn layer(layer: u8) -> Self {
        Self(1u32.checked_shl(u32::from(layer)).unwrap_or(0))
    }

    pub fn with_layer(self, layer: u8) -> Self {
        Self(self.0 | Self::layer(layer).0)
    }

    pub fn contains_layer(&self, layer: u8) -> bool {
        self.0 & Self::layer(layer).0 != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

impl Default for LayerMask {
    fn default() -> Self {
        Self::ALL
    }
}

bitflags! {
    /// How a draw list orders the renderers it selected
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SortingCriteria: u32 {
        const SORTING_LAYER = 1 << 0;
        const RENDER_QUEUE = 1 << 1;
        const BACK_TO_FRONT = 1 << 2;
        const QUANTIZED_FRONT_TO_BACK = 1 << 3;
        const OPTIMIZE_STATE_CHANGES = 1 << 4;
        const CANVAS_ORDER = 1 << 5;
        const RENDERER_PRIORITY = 1 << 6;

        const COMMON_OPAQUE = Self::SORTING_LAYER.bits()
            | Self::RENDER_QUEUE.bits()
            | Self::QUANTIZED_FRONT_TO_BACK.bits()
            | Self::OPTIMIZE_STATE_CHANGES.bits()
            | Self::CANVAS_ORDER.bits();

        const COMMON_TRANSPARENT = Self::SORTING_LAYER.bits()
            | Self::RENDER_QUEUE.bits()
            | Self::BACK_TO_FRONT.bits()
            | Self::OPTIMIZE_STATE_CHANGES.bits();
    }
}

impl Default for SortingCriteria {
    fn default() -> Self {
        Self::COMMON_OPAQUE
    }
}

/// Queue range and layer mask a draw list filters renderers by
///
/// Owned by the pass that created it and never modified afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FilterConfig {
    queue: RenderQueueRange,
    layer_mask: LayerMask,
}

impl FilterConfig {
    pub fn new(queue: RenderQueueRange, layer_mask: LayerMask) -> Self {
        Self { queue, layer_mask }
    }

    /// Build from raw settings values; the queue bounds may be reversed
    pub fn from_raw(queue_min: i32, queue_max: i32, layer_mask: LayerMask) -> Self {
        Self::new(RenderQueueRange::new(queue_min, queue_max), layer_mask)
    }

    pub fn queue(&self) -> RenderQueueRange {
        self.queue
    }

    pub fn layer_mask(&self) -> LayerMask {
        self.layer_mask
    }

    pub fn accepts(&self, render_queue: i32, layer: u8) -> bool {
        self.queue.contains(render_queue) && self.layer_mask.contains_layer(layer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(2000, 3000)]
    #[case(3000, 2000)]
    #[case(2500, 2500)]
    #[case(-7, 12)]
    #[case(i32::MAX, i32::MIN)]
    fn range_is_normalised(#[case] a: i32, #[case] b: i32) {
        let range = RenderQueueRange::new(a, b);
        assert_eq!(range.lower_bound(), a.min(b));
        assert_eq!(range.upper_bound(), a.max(b));
        assert!(range.lower_bound() <= range.upper_bound());
    }

    #[test]
    fn range_normalisation_grid() {
        for a in (1000..=5000).step_by(250) {
            for b in (1000..=5000).step_by(250) {
                let range = RenderQueueRange::new(a, b);
                assert!(range.lower_bound() <= range.upper_bound());
                assert!(range.contains(a) && range.contains(b));
            }
        }
    }

    #[test]
    fn predefined_ranges_split_at_opaque_end() {
        assert!(RenderQueueRange::OPAQUE.contains(2450));
        assert!(!RenderQueueRange::OPAQUE.contains(3000));
        assert!(RenderQueueRange::TRANSPARENT.contains(3000));
        assert!(!RenderQueueRange::TRANSPARENT.contains(2500));
        assert!(RenderQueueRange::ALL.contains(0) && RenderQueueRange::ALL.contains(5000));
    }

    #[test]
    fn layer_mask_bits() {
        let mask = LayerMask::layer(3).with_layer(8);
        assert!(mask.contains_layer(3));
        assert!(mask.contains_layer(8));
        assert!(!mask.contains_layer(4));
        assert!(!LayerMask::layer(40).contains_layer(40));
        assert!(LayerMask::ALL.contains_layer(31));
        assert!(LayerMask::NONE.is_empty());
    }

    #[rstest]
    #[case("-1", LayerMask::ALL)]
    #[case("4294967295", LayerMask::ALL)]
    #[case("0", LayerMask::NONE)]
    #[case("128", LayerMask(1 << 7))]
    #[case("-2", LayerMask(!1))]
    fn layer_mask_accepts_signed_and_unsigned(#[case] json: &str, #[case] expected: LayerMask) {
        assert_eq!(serde_json::from_str::<LayerMask>(json).unwrap(), expected);
    }

    #[test]
    fn layer_mask_rejects_out_of_range() {
        assert!(serde_json::from_str::<LayerMask>("4294967296").is_err());
        assert!(serde_json::from_str::<LayerMask>("\"Everything\"").is_err());
        assert_eq!(serde_json::to_string(&LayerMask::ALL).unwrap(), "4294967295");
    }

    #[test]
    fn reversed_filter_accepts_middle_queue() {
        let filter = FilterConfig::from_raw(3000, 2000, LayerMask::layer(6));
        assert_eq!(filter.queue(), RenderQueueRange::new(2000, 3000));
        assert!(filter.accepts(2500, 6));
        assert!(!filter.accepts(2500, 7));
        assert!(!filter.accepts(3001, 6));
    }

    #[test]
    fn common_opaque_sorts_front_to_back() {
        assert!(SortingCriteria::COMMON_OPAQUE.contains(SortingCriteria::QUANTIZED_FRONT_TO_BACK));
        assert!(!SortingCriteria::COMMON_OPAQUE.contains(SortingCriteria::BACK_TO_FRONT));
        assert!(SortingCriteria::COMMON_TRANSPARENT.contains(SortingCriteria::BACK_TO_FRONT));
    }
}
