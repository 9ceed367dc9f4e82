//! Color mapping functions for layer rendering.

use clap::ValueEnum;

/// An 8-bit RGB triple.
pub type Rgb = [u8; 3];

/// Color palette used to render layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ValueEnum)]
pub enum ColorPalette {
    /// Viridis colormap (perceptually uniform, colorblind-friendly).
    #[default]
    Viridis,
    /// Plasma colormap (perceptually uniform).
    Plasma,
    /// Rainbow/Spectral colormap (traditional, high contrast).
    Rainbow,
    /// Blue-White-Red diverging colormap.
    BlueRed,
}

impl ColorPalette {
    /// Get palette name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Viridis => "Viridis",
            Self::Plasma => "Plasma",
            Self::Rainbow => "Rainbow",
            Self::BlueRed => "Blue-Red",
        }
    }

    /// Map a normalized value (0.0 to 1.0) to an RGB color.
    pub fn rgb(self, t: f64) -> Rgb {
        let t = t.clamp(0.0, 1.0);

        match self {
            Self::Viridis => viridis_color(t),
            Self::Plasma => plasma_color(t),
            Self::Rainbow => rainbow_color(t),
            Self::BlueRed => bluered_color(t),
        }
    }
}

/// Two-segment linear interpolation through `lo`, `mid`, `hi`.
fn ramp(t: f64, lo: [f64; 3], mid: [f64; 3], hi: [f64; 3]) -> Rgb {
    let mut out = [0u8; 3];
    for (i, channel) in out.iter_mut().enumerate() {
        let v = if t < 0.5 {
            lo[i] + t * 2.0 * (mid[i] - lo[i])
        } else {
            mid[i] + (t - 0.5) * 2.0 * (hi[i] - mid[i])
        };
        *channel = v.round().clamp(0.0, 255.0) as u8;
    }
    out
}

/// Viridis colormap approximation.
fn viridis_color(t: f64) -> Rgb {
    ramp(t, [68.0, 1.0, 84.0], [33.0, 145.0, 140.0], [253.0, 231.0, 37.0])
}

/// Plasma colormap approximation.
fn plasma_color(t: f64) -> Rgb {
    ramp(t, [13.0, 8.0, 135.0], [204.0, 71.0, 120.0], [240.0, 249.0, 33.0])
}

/// Rainbow colormap, hue from 240° (blue) down to 0° (red).
fn rainbow_color(t: f64) -> Rgb {
    let h = (1.0 - t) * 240.0;
    let x = 1.0 - ((h / 60.0) % 2.0 - 1.0).abs();

    let (r, g, b) = if h < 60.0 {
        (1.0, x, 0.0)
    } else if h < 120.0 {
        (x, 1.0, 0.0)
    } else if h < 180.0 {
        (0.0, 1.0, x)
    } else {
        (0.0, x, 1.0)
    };

    [(r * 255.0) as u8, (g * 255.0) as u8, (b * 255.0) as u8]
}

/// Blue-White-Red diverging colormap.
fn bluered_color(t: f64) -> Rgb {
    if t < 0.5 {
        let v = (t * 2.0 * 255.0) as u8;
        [v, v, 255]
    } else {
        let v = ((1.0 - (t - 0.5) * 2.0) * 255.0) as u8;
        [255, v, v]
    }
}
