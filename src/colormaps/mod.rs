//! Colour and opacity transfer functions.
//!
//! Colormaps turn a normalized scalar (and, for VSUPs, an uncertainty) into
//! an RGB colour; opacity maps turn the same scalar into an alpha value. Both
//! are driven by editable control points seeded from named presets.

pub mod color;
pub mod colormap;
pub mod control_points;
pub mod linear;
pub mod opacity;
pub mod presets;
mod record;
pub mod vsup;

pub use color::{Lab, Rgb, DEFAULT_FADING_COLOR};
pub use colormap::{Colormap, TextureColormap};
pub use control_points::{Bracket, ControlPoints, Lerp};
pub use linear::{ColorRamp, LinearColormap};
pub use opacity::OpacityMap;
pub use presets::{available_presets, Preset, DEFAULT_PRESET};
pub use vsup::VsupColormap;
