//! Named colour presets.
//!
//! Positions are normalized to [0, 1] and colours are RGB floats in [0, 1].
//! The ParaView names ("Cool to Warm", "X Ray", ...) carry ParaView's knots;
//! the single-hue ramps are the 9-class ColorBrewer schemes and the
//! matplotlib maps are sampled every tenth of their range.

/// Preset used when none is given or a name is not in the catalog.
pub const DEFAULT_PRESET: &str = "Cool to Warm";

/// A named control-point table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Preset {
    pub name: &'static str,
    pub control_points: &'static [f64],
    pub color_points: &'static [[f64; 3]],
}

/// Look up a preset by its exact name.
pub fn find(name: &str) -> Option<&'static Preset> {
    PRESETS.iter().find(|preset| preset.name == name)
}

/// Names of every preset in catalog order.
pub fn available_presets() -> Vec<&'static str> {
    PRESETS.iter().map(|preset| preset.name).collect()
}

/// The default preset.
pub fn default_preset() -> &'static Preset {
    &PRESETS[0]
}

const COOL_TO_WARM_POSITIONS: &[f64] = &[0.0, 0.5, 1.0];
const COOL_TO_WARM_COLORS: &[[f64; 3]] = &[
    [0.23137254902, 0.298039215686, 0.752941176471],
    [0.865, 0.865, 0.865],
    [0.705882352941, 0.0156862745098, 0.149019607843],
];

const WARM_TO_COOL_POSITIONS: &[f64] = &[0.0, 0.5, 1.0];
const WARM_TO_COOL_COLORS: &[[f64; 3]] = &[
    [0.705882352941, 0.0156862745098, 0.149019607843],
    [0.865, 0.865, 0.865],
    [0.23137254902, 0.298039215686, 0.752941176471],
];

const X_RAY_POSITIONS: &[f64] = &[0.0, 1.0];
const X_RAY_COLORS: &[[f64; 3]] = &[[1.0, 1.0, 1.0], [0.0, 0.0, 0.0]];

const GRAYSCALE_POSITIONS: &[f64] = &[0.0, 1.0];
const GRAYSCALE_COLORS: &[[f64; 3]] = &[[0.0, 0.0, 0.0], [1.0, 1.0, 1.0]];

const BLACK_BODY_RADIATION_POSITIONS: &[f64] = &[0.0, 0.4, 0.8, 1.0];
const BLACK_BODY_RADIATION_COLORS: &[[f64; 3]] = &[
    [0.0, 0.0, 0.0],
    [0.901961, 0.0, 0.0],
    [0.901961, 0.901961, 0.0],
    [1.0, 1.0, 1.0],
];

const JET_POSITIONS: &[f64] = &[0.0, 0.111111, 0.36508, 0.492063, 0.619047, 0.873016, 1.0];
const JET_COLORS: &[[f64; 3]] = &[
    [0.0, 0.0, 0.5625],
    [0.0, 0.0, 1.0],
    [0.0, 1.0, 1.0],
    [0.5, 1.0, 0.5],
    [1.0, 1.0, 0.0],
    [1.0, 0.0, 0.0],
    [0.5, 0.0, 0.0],
];

const GREENS_POSITIONS: &[f64] = &[0.0, 0.125, 0.25, 0.375, 0.5, 0.625, 0.75, 0.875, 1.0];
const GREENS_COLORS: &[[f64; 3]] = &[
    [0.968627, 0.988235, 0.960784],
    [0.898039, 0.960784, 0.878431],
    [0.780392, 0.913725, 0.752941],
    [0.631373, 0.85098, 0.607843],
    [0.454902, 0.768627, 0.462745],
    [0.254902, 0.670588, 0.364706],
    [0.137255, 0.545098, 0.270588],
    [0.0, 0.427451, 0.172549],
    [0.0, 0.266667, 0.105882],
];

const BLUES_POSITIONS: &[f64] = &[0.0, 0.125, 0.25, 0.375, 0.5, 0.625, 0.75, 0.875, 1.0];
const BLUES_COLORS: &[[f64; 3]] = &[
    [0.968627, 0.984314, 1.0],
    [0.870588, 0.921569, 0.968627],
    [0.776471, 0.858824, 0.937255],
    [0.619608, 0.792157, 0.882353],
    [0.419608, 0.682353, 0.839216],
    [0.258824, 0.572549, 0.776471],
    [0.129412, 0.443137, 0.709804],
    [0.031373, 0.317647, 0.611765],
    [0.031373, 0.188235, 0.419608],
];

const REDS_POSITIONS: &[f64] = &[0.0, 0.125, 0.25, 0.375, 0.5, 0.625, 0.75, 0.875, 1.0];
const REDS_COLORS: &[[f64; 3]] = &[
    [1.0, 0.960784, 0.941176],
    [0.996078, 0.878431, 0.823529],
    [0.988235, 0.733333, 0.631373],
    [0.988235, 0.572549, 0.447059],
    [0.984314, 0.415686, 0.290196],
    [0.937255, 0.231373, 0.172549],
    [0.796078, 0.094118, 0.113725],
    [0.647059, 0.058824, 0.082353],
    [0.403922, 0.0, 0.05098],
];

const ORANGES_POSITIONS: &[f64] = &[0.0, 0.125, 0.25, 0.375, 0.5, 0.625, 0.75, 0.875, 1.0];
const ORANGES_COLORS: &[[f64; 3]] = &[
    [1.0, 0.960784, 0.921569],
    [0.996078, 0.901961, 0.807843],
    [0.992157, 0.815686, 0.635294],
    [0.992157, 0.682353, 0.419608],
    [0.992157, 0.552941, 0.235294],
    [0.945098, 0.411765, 0.07451],
    [0.85098, 0.282353, 0.003922],
    [0.65098, 0.211765, 0.011765],
    [0.498039, 0.152941, 0.015686],
];

const PURPLES_POSITIONS: &[f64] = &[0.0, 0.125, 0.25, 0.375, 0.5, 0.625, 0.75, 0.875, 1.0];
const PURPLES_COLORS: &[[f64; 3]] = &[
    [0.988235, 0.984314, 0.992157],
    [0.937255, 0.929412, 0.960784],
    [0.854902, 0.854902, 0.921569],
    [0.737255, 0.741176, 0.862745],
    [0.619608, 0.603922, 0.784314],
    [0.501961, 0.490196, 0.729412],
    [0.415686, 0.317647, 0.639216],
    [0.329412, 0.152941, 0.560784],
    [0.247059, 0.0, 0.490196],
];

const VIRIDIS_POSITIONS: &[f64] = &[0.0, 0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9, 1.0];
const VIRIDIS_COLORS: &[[f64; 3]] = &[
    [0.266667, 0.003922, 0.329412],
    [0.282353, 0.141176, 0.458824],
    [0.254902, 0.266667, 0.529412],
    [0.207843, 0.372549, 0.552941],
    [0.164706, 0.470588, 0.556863],
    [0.129412, 0.568627, 0.54902],
    [0.133333, 0.658824, 0.517647],
    [0.266667, 0.74902, 0.439216],
    [0.478431, 0.819608, 0.317647],
    [0.741176, 0.87451, 0.14902],
    [0.992157, 0.905882, 0.145098],
];

const INFERNO_POSITIONS: &[f64] = &[0.0, 0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9, 1.0];
const INFERNO_COLORS: &[[f64; 3]] = &[
    [0.0, 0.0, 0.015686],
    [0.086275, 0.043137, 0.223529],
    [0.258824, 0.039216, 0.407843],
    [0.415686, 0.090196, 0.431373],
    [0.576471, 0.14902, 0.403922],
    [0.737255, 0.215686, 0.329412],
    [0.866667, 0.317647, 0.227451],
    [0.952941, 0.470588, 0.098039],
    [0.988235, 0.647059, 0.039216],
    [0.964706, 0.843137, 0.27451],
    [0.988235, 1.0, 0.643137],
];

const PLASMA_POSITIONS: &[f64] = &[0.0, 0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9, 1.0];
const PLASMA_COLORS: &[[f64; 3]] = &[
    [0.05098, 0.031373, 0.529412],
    [0.254902, 0.015686, 0.615686],
    [0.415686, 0.0, 0.658824],
    [0.560784, 0.05098, 0.643137],
    [0.694118, 0.164706, 0.564706],
    [0.8, 0.278431, 0.470588],
    [0.882353, 0.392157, 0.384314],
    [0.94902, 0.517647, 0.294118],
    [0.988235, 0.65098, 0.211765],
    [0.988235, 0.807843, 0.145098],
    [0.941176, 0.976471, 0.129412],
];

/// Every preset, in the order offered to users.
pub static PRESETS: &[Preset] = &[
    Preset {
        name: "Cool to Warm",
        control_points: COOL_TO_WARM_POSITIONS,
        color_points: COOL_TO_WARM_COLORS,
    },
    Preset {
        name: "Warm to Cool",
        control_points: WARM_TO_COOL_POSITIONS,
        color_points: WARM_TO_COOL_COLORS,
    },
    Preset {
        name: "X Ray",
        control_points: X_RAY_POSITIONS,
        color_points: X_RAY_COLORS,
    },
    Preset {
        name: "Grayscale",
        control_points: GRAYSCALE_POSITIONS,
        color_points: GRAYSCALE_COLORS,
    },
    Preset {
        name: "Black-Body Radiation",
        control_points: BLACK_BODY_RADIATION_POSITIONS,
        color_points: BLACK_BODY_RADIATION_COLORS,
    },
    Preset {
        name: "Jet",
        control_points: JET_POSITIONS,
        color_points: JET_COLORS,
    },
    Preset {
        name: "Greens",
        control_points: GREENS_POSITIONS,
        color_points: GREENS_COLORS,
    },
    Preset {
        name: "Blues",
        control_points: BLUES_POSITIONS,
        color_points: BLUES_COLORS,
    },
    Preset {
        name: "Reds",
        control_points: REDS_POSITIONS,
        color_points: REDS_COLORS,
    },
    Preset {
        name: "Oranges",
        control_points: ORANGES_POSITIONS,
        color_points: ORANGES_COLORS,
    },
    Preset {
        name: "Purples",
        control_points: PURPLES_POSITIONS,
        color_points: PURPLES_COLORS,
    },
    Preset {
        name: "Viridis (matplotlib)",
        control_points: VIRIDIS_POSITIONS,
        color_points: VIRIDIS_COLORS,
    },
    Preset {
        name: "Inferno (matplotlib)",
        control_points: INFERNO_POSITIONS,
        color_points: INFERNO_COLORS,
    },
    Preset {
        name: "Plasma (matplotlib)",
        control_points: PLASMA_POSITIONS,
        color_points: PLASMA_COLORS,
    },
];
