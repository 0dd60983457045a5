//! RGB and CIE Lab colour arithmetic.
//!
//! Channels leaving this module are always 8-bit integers: every blend is
//! rounded half-up and clamped to [0, 255], so two colormaps built from the
//! same knots produce byte-identical textures.

use colorgrad::Color;
use palette::chromatic_adaptation::AdaptInto;
use palette::white_point::{D50, D65};
use palette::{FromColor, LinSrgb, Mix, Srgb, Xyz};

/// An 8-bit RGB colour.
pub type Rgb = [u8; 3];

/// Neutral grey that uncertain values fade towards.
pub const DEFAULT_FADING_COLOR: Rgb = [233, 233, 233];

/// A colour in CIE L*a*b* space relative to the D50 white point.
pub type Lab = palette::Lab<D50, f64>;

/// Convert an 8-bit sRGB colour to D50 Lab, Bradford-adapted from D65.
pub fn to_lab(rgb: Rgb) -> Lab {
    let [r, g, b] = to_unit(rgb);
    let linear: LinSrgb<f64> = Srgb::<f64>::new(r, g, b).into_linear();
    let xyz: Xyz<D50, f64> = Xyz::<D65, f64>::from_color(linear).adapt_into();
    Lab::from_color(xyz)
}

/// Convert D50 Lab back to 8-bit sRGB, rounding and clamping each channel.
pub fn from_lab(lab: Lab) -> Rgb {
    let xyz: Xyz<D65, f64> = Xyz::<D50, f64>::from_color(lab).adapt_into();
    let srgb: Srgb<f64> = Srgb::from_linear(LinSrgb::<f64>::from_color(xyz));
    to_rgb8([srgb.red, srgb.green, srgb.blue])
}

/// Round half-up and clamp to a byte; NaN maps to 0.
pub fn channel(value: f64) -> u8 {
    let rounded = (value + 0.5).floor();
    if rounded.is_nan() {
        0
    } else {
        rounded.clamp(0.0, 255.0) as u8
    }
}

/// Scale a [0, 1] float colour to bytes.
pub fn to_rgb8(color: [f64; 3]) -> Rgb {
    [
        channel(color[0] * 255.0),
        channel(color[1] * 255.0),
        channel(color[2] * 255.0),
    ]
}

/// Scale a byte colour back to [0, 1] floats.
pub fn to_unit(color: Rgb) -> [f64; 3] {
    [
        color[0] as f64 / 255.0,
        color[1] as f64 / 255.0,
        color[2] as f64 / 255.0,
    ]
}

/// Per-channel linear blend in sRGB.
pub fn interpolate_rgb(from: Rgb, to: Rgb, t: f64) -> Rgb {
    let mix = |a: u8, b: u8| channel(a as f64 + t * (b as f64 - a as f64));
    [
        mix(from[0], to[0]),
        mix(from[1], to[1]),
        mix(from[2], to[2]),
    ]
}

/// Blend two colours in Lab space; `t = 0` yields `from`, `t = 1` yields `to`.
pub fn interpolate_lab(from: Rgb, to: Rgb, t: f64) -> Rgb {
    from_lab(to_lab(from).mix(to_lab(to), t))
}

/// Format as a CSS `rgb(r, g, b)` string.
pub fn format_rgb(color: Rgb) -> String {
    format!("rgb({}, {}, {})", color[0], color[1], color[2])
}

/// Parse any CSS colour string (`rgb(...)`, `#rrggbb`, named colours, ...).
pub fn parse_css_color(text: &str) -> Option<Rgb> {
    let color = Color::from_html(text.trim()).ok()?;
    let [r, g, b, _] = color.to_rgba8();
    Some([r, g, b])
}
