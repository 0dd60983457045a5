//! # tfkit
//!
//! Colour and opacity transfer functions for ensemble visualization, sampled
//! into lookup textures that stay current as the mappings are edited.
//!
//! ## Key Features
//!
//! - **Editable colormaps**: linear ramps seeded from named presets, with control points that can be added, removed and inverted
//! - **Uncertainty palettes**: value-suppressing uncertainty palettes (VSUP) over value × uncertainty, discrete or continuous
//! - **Opacity maps**: piecewise-linear alpha over the value axis
//! - **Reactive textures**: RGBA float textures that resample in place whenever their sources change
//!
//! ## Architecture
//!
//! - **Mappings** (`colormaps`): control-point lists, colour arithmetic, presets and the mapping types
//! - **Change tracking** (`reactive`): shared, versioned mappings with synchronous subscribers
//! - **Textures** (`texture`): the named registry and its cached, self-updating pixel buffers
//! - **Output** (`export`): PNG encoding for inspection and offline use

pub mod colormaps;
pub mod config;
pub mod error;
pub mod export;
pub mod logging;
pub mod reactive;
pub mod state;
pub mod texture;

pub use colormaps::{
    available_presets, Colormap, LinearColormap, OpacityMap, Rgb, TextureColormap, VsupColormap,
};
pub use config::Config;
pub use error::{Result, TfError};
pub use export::{save_png, texture_to_grayscale_image, texture_to_image};
pub use logging::{
    init_tracing, log_error, log_operation_end, log_operation_start, log_timed_operation,
};
pub use reactive::{Observable, Subscription};
pub use state::Session;
pub use texture::{PixelBuffer, Texture, TextureCache, TextureKey};
