//! Color space conversions used by content classification and seam checks

/// A color in normalized HSL space
///
/// Hue is in degrees `[0, 360)`, saturation and lightness in `[0, 1]`.
/// Achromatic colors carry `hue: None` because their hue is undefined.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    /// Hue in degrees, `None` for greys
    pub hue: Option<f64>,
    /// Saturation in `[0, 1]`
    pub saturation: f64,
    /// Lightness in `[0, 1]`
    pub lightness: f64,
}

/// Convert 8-bit RGB to HSL
pub fn rgb_to_hsl(r: u8, g: u8, b: u8) -> Hsl {
    let r = f64::from(r) / 255.0;
    let g = f64::from(g) / 255.0;
    let b = f64::from(b) / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let lightness = (max + min) / 2.0;
    let delta = max - min;

    if delta <= f64::EPSILON {
        return Hsl {
            hue: None,
            saturation: 0.0,
            lightness,
        };
    }

    let saturation = if lightness > 0.5 {
        delta / (2.0 - max - min)
    } else {
        delta / (max + min)
    };

    let sector = if (max - r).abs() <= f64::EPSILON {
        (g - b) / delta + if g < b { 6.0 } else { 0.0 }
    } else if (max - g).abs() <= f64::EPSILON {
        (b - r) / delta + 2.0
    } else {
        (r - g) / delta + 4.0
    };

    Hsl {
        hue: Some((sector * 60.0).rem_euclid(360.0)),
        saturation: saturation.clamp(0.0, 1.0),
        lightness,
    }
}

/// Euclidean distance between two colors in RGB space (alpha ignored)
pub fn rgb_distance(a: [u8; 4], b: [u8; 4]) -> f64 {
    let dr = f64::from(a[0]) - f64::from(b[0]);
    let dg = f64::from(a[1]) - f64::from(b[1]);
    let db = f64::from(a[2]) - f64::from(b[2]);
    db.mul_add(db, dr.mul_add(dr, dg * dg)).sqrt()
}

/// Mean of the RGB channels, used to spot dark separator lines
pub fn mean_rgb(pixel: [u8; 4]) -> f64 {
    (f64::from(pixel[0]) + f64::from(pixel[1]) + f64::from(pixel[2])) / 3.0
}
