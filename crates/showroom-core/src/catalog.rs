//! The closed product catalog.
//!
//! Every [`ProductState`] maps to exactly one immutable [`StateConfig`].
//! Lookups are an exhaustive `match`, so the engine itself can never hold an
//! unknown product; only text parsing ([`ProductState::from_str`]) can fail.

use std::fmt;
use std::str::FromStr;

use crate::errors::CatalogError;
use crate::types::Color;

/// The product currently on display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum ProductState {
    Eyewear,
    Apparel,
    Timepiece,
    Headset,
}

impl ProductState {
    /// All products, in selector order.
    pub const ALL: [ProductState; 4] = [
        ProductState::Eyewear,
        ProductState::Apparel,
        ProductState::Timepiece,
        ProductState::Headset,
    ];

    /// Stable identifier used by the selector and the CLI.
    pub fn id(&self) -> &'static str {
        match self {
            ProductState::Eyewear => "EYEWEAR",
            ProductState::Apparel => "APPAREL",
            ProductState::Timepiece => "TIMEPIECE",
            ProductState::Headset => "HEADSET",
        }
    }

    /// The display configuration for this product.
    pub fn config(&self) -> &'static StateConfig {
        config(*self)
    }

    /// Whether this product renders with the VR panel grid.
    pub fn is_vr(&self) -> bool {
        matches!(self, ProductState::Headset)
    }
}

impl fmt::Display for ProductState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ProductState {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        ProductState::ALL
            .into_iter()
            .find(|state| state.id().eq_ignore_ascii_case(needle))
            .ok_or_else(|| CatalogError::UnknownProduct { id: needle.to_string() })
    }
}

/// Mesh family used to display a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum GeometryKind {
    Sphere,
    Box,
    Torus,
    Cylinder,
    WideBox,
    VrVisor,
}

impl GeometryKind {
    pub const ALL: [GeometryKind; 6] = [
        GeometryKind::Sphere,
        GeometryKind::Box,
        GeometryKind::Torus,
        GeometryKind::Cylinder,
        GeometryKind::WideBox,
        GeometryKind::VrVisor,
    ];
}

/// Immutable display configuration of one product.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct StateConfig {
    pub name: &'static str,
    pub tagline: &'static str,
    pub description: &'static str,
    pub price: &'static str,
    /// Primary color (sRGB).
    pub color: Color,
    /// Accent color used for emissive glow (sRGB).
    pub accent_color: Color,
    /// Surface roughness in [0, 1].
    pub roughness: f32,
    /// Metalness in [0, 1].
    pub metalness: f32,
    /// Camera distance from the origin.
    pub zoom: f32,
    /// Base intensity of the key light.
    pub bg_intensity: f32,
    /// Grid line color (sRGB).
    pub grid_color: Color,
    pub geometry: GeometryKind,
}

static EYEWEAR: StateConfig = StateConfig {
    name: "Vision Prime",
    tagline: "Intelligent Eye Wear",
    description: "Ultra-lightweight titanium frames with integrated holographic HUD and \
                  neural-sync technology for seamless digital overlay.",
    price: "$499.00",
    color: Color::from_rgb8(0x00, 0xf2, 0xff),
    accent_color: Color::from_rgb8(0xff, 0xff, 0xff),
    roughness: 0.1,
    metalness: 0.9,
    zoom: 6.0,
    bg_intensity: 0.5,
    grid_color: Color::from_rgb8(0x00, 0xf2, 0xff),
    geometry: GeometryKind::WideBox,
};

static APPAREL: StateConfig = StateConfig {
    name: "AeroFiber Tee",
    tagline: "Seamless Comfort",
    description: "100% organic tech-cotton blend. Designed with heat-mapping technology to \
                  provide ventilation where you need it most.",
    price: "$55.00",
    color: Color::from_rgb8(0x3e, 0x8a, 0xff),
    accent_color: Color::from_rgb8(0xe0, 0xea, 0xff),
    roughness: 1.0,
    metalness: 0.0,
    zoom: 5.5,
    bg_intensity: 0.2,
    grid_color: Color::from_rgb8(0x3e, 0x8a, 0xff),
    geometry: GeometryKind::Box,
};

static TIMEPIECE: StateConfig = StateConfig {
    name: "Horizon Chrono",
    tagline: "Precision Engineering",
    description: "A masterpiece of horology. Featuring a sapphire crystal lens and a \
                  48-hour power reserve mechanical movement.",
    price: "$1,250.00",
    color: Color::from_rgb8(0xff, 0xd7, 0x00),
    accent_color: Color::from_rgb8(0xff, 0xf9, 0xe0),
    roughness: 0.1,
    metalness: 1.0,
    zoom: 7.0,
    bg_intensity: 0.6,
    grid_color: Color::from_rgb8(0xff, 0xd7, 0x00),
    geometry: GeometryKind::Torus,
};

static HEADSET: StateConfig = StateConfig {
    name: "Neural Vision 3",
    tagline: "Beyond Reality",
    description: "The world's most advanced spatial computer. 8K dual-displays and \
                  ultra-low latency eye-tracking technology.",
    price: "$3,499.00",
    color: Color::from_rgb8(0xa8, 0x55, 0xf7),
    accent_color: Color::from_rgb8(0xf3, 0xe8, 0xff),
    roughness: 0.2,
    metalness: 0.8,
    zoom: 6.0,
    bg_intensity: 0.5,
    grid_color: Color::from_rgb8(0xa8, 0x55, 0xf7),
    geometry: GeometryKind::VrVisor,
};

/// Look up the configuration of a product.
pub fn config(state: ProductState) -> &'static StateConfig {
    match state {
        ProductState::Eyewear => &EYEWEAR,
        ProductState::Apparel => &APPAREL,
        ProductState::Timepiece => &TIMEPIECE,
        ProductState::Headset => &HEADSET,
    }
}
