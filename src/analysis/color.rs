//! Histogram-based theme and material inference
//!
//! Rules are independent and may fire together: a dim mossy sheet can be both
//! `forest` and `dungeon`. Only the confidence ordering says which is stronger.

use crate::analysis::patterns::AutoTileSystem;
use crate::io::configuration::{
    COLOR_MIN_ALPHA, COLOR_SAMPLE_STRIDE_BYTES, HUE_BINS, LIGHTNESS_BINS, SATURATION_BINS,
};
use crate::math::color_space::rgb_to_hsl;
use crate::math::histogram::Histogram;
use crate::spatial::raster::RasterImage;
use serde::{Deserialize, Serialize};

/// Hue, saturation and lightness distributions of the opaque pixels
#[derive(Debug, Clone, PartialEq)]
pub struct ColorHistograms {
    /// 10 degree hue bins; greys are not binned because their hue is undefined
    pub hue: Histogram,
    /// Saturation bins over `[0, 1]`
    pub saturation: Histogram,
    /// Lightness bins over `[0, 1]`
    pub lightness: Histogram,
    /// Number of opaque pixels sampled
    pub samples: u64,
    saturation_sum: f64,
    lightness_sum: f64,
}

impl ColorHistograms {
    /// Sample every 4th pixel of the image, skipping translucent ones
    pub fn from_image(image: &RasterImage) -> Self {
        let mut histograms = Self {
            hue: Histogram::new(HUE_BINS, 360.0),
            saturation: Histogram::new(SATURATION_BINS, 1.0),
            lightness: Histogram::new(LIGHTNESS_BINS, 1.0),
            samples: 0,
            saturation_sum: 0.0,
            lightness_sum: 0.0,
        };

        let width = image.width() as usize;
        let pixel_count = width * image.height() as usize;
        let stride = (COLOR_SAMPLE_STRIDE_BYTES / 4).max(1);

        for flat in (0..pixel_count).step_by(stride) {
            let Some(pixel) = image.pixel((flat % width) as u32, (flat / width) as u32) else {
                continue;
            };
            if pixel[3] < COLOR_MIN_ALPHA {
                continue;
            }
            let hsl = rgb_to_hsl(pixel[0], pixel[1], pixel[2]);
            if let Some(hue) = hsl.hue {
                histograms.hue.add(hue);
            }
            histograms.saturation.add(hsl.saturation);
            histograms.lightness.add(hsl.lightness);
            histograms.saturation_sum += hsl.saturation;
            histograms.lightness_sum += hsl.lightness;
            histograms.samples += 1;
        }

        histograms
    }

    /// Mean saturation of sampled pixels, zero when nothing was sampled
    pub fn average_saturation(&self) -> f64 {
        if self.samples == 0 {
            0.0
        } else {
            self.saturation_sum / self.samples as f64
        }
    }

    /// Mean lightness of sampled pixels, zero when nothing was sampled
    pub fn average_lightness(&self) -> f64 {
        if self.samples == 0 {
            0.0
        } else {
            self.lightness_sum / self.samples as f64
        }
    }

    /// Share of sampled pixels whose hue falls in `[start, end)` degrees
    pub fn hue_ratio(&self, start: f64, end: f64) -> f64 {
        if self.samples == 0 {
            0.0
        } else {
            self.hue.mass_between(start, end) as f64 / self.samples as f64
        }
    }
}

/// A theme that fired with its confidence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeMatch {
    /// Theme label
    pub theme: String,
    /// Confidence in `[0, 1]`
    pub confidence: f64,
}

/// Output of the color/content classifier
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorClassification {
    /// Fired themes sorted by descending confidence
    pub themes: Vec<ThemeMatch>,
    /// Deduplicated materials in rule order
    pub materials: Vec<String>,
    /// Mean saturation of opaque samples
    pub average_saturation: f64,
    /// Mean lightness of opaque samples
    pub average_lightness: f64,
}

impl ColorClassification {
    /// Strongest theme confidence, if any theme fired
    pub fn top_confidence(&self) -> Option<f64> {
        self.themes.first().map(|theme| theme.confidence)
    }
}

/// Classify themes and materials from pixel colors
pub fn classify_colors(image: &RasterImage) -> ColorClassification {
    let histograms = ColorHistograms::from_image(image);
    if histograms.samples == 0 {
        return ColorClassification::default();
    }
    ColorClassification {
        themes: infer_themes(&histograms),
        materials: infer_materials(&histograms),
        average_saturation: histograms.average_saturation(),
        average_lightness: histograms.average_lightness(),
    }
}

/// Apply every theme rule to the histograms
pub fn infer_themes(histograms: &ColorHistograms) -> Vec<ThemeMatch> {
    let saturation = histograms.average_saturation();
    let lightness = histograms.average_lightness();
    let green = histograms.hue_ratio(90.0, 150.0);
    let blue = histograms.hue_ratio(180.0, 240.0);
    let yellow = histograms.hue_ratio(40.0, 90.0);
    let red = histograms.hue_ratio(0.0, 40.0);

    let mut fired: Vec<(&str, f64)> = Vec::new();
    if green > 0.3 {
        fired.push(("forest", green.min(0.9)));
    }
    if saturation < 0.3 && (0.3..=0.7).contains(&lightness) {
        fired.push(("dungeon", 0.7));
    }
    if blue > 0.3 {
        if lightness > 0.7 {
            fired.push(("snow", blue.min(0.8)));
        } else {
            fired.push(("water", blue.min(0.85)));
        }
    }
    if yellow > 0.35 {
        fired.push(("desert", yellow.min(0.85)));
    }
    if red > 0.3 && lightness < 0.5 {
        fired.push(("lava", red.min(0.9)));
    }
    if lightness > 0.8 && saturation < 0.2 {
        fired.push(("snow", 0.75));
    }

    let mut themes: Vec<ThemeMatch> = Vec::with_capacity(fired.len());
    for (theme, confidence) in fired {
        match themes.iter_mut().find(|existing| existing.theme == theme) {
            Some(existing) => existing.confidence = existing.confidence.max(confidence),
            None => themes.push(ThemeMatch {
                theme: theme.to_string(),
                confidence,
            }),
        }
    }
    // Stable sort keeps rule order among equal confidences
    themes.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    themes
}

/// Apply every material rule to the histograms
pub fn infer_materials(histograms: &ColorHistograms) -> Vec<String> {
    let saturation = histograms.average_saturation();
    let lightness = histograms.average_lightness();

    let rules = [
        ("grass", histograms.hue_ratio(90.0, 150.0) > 0.25),
        (
            "dirt",
            histograms.hue_ratio(20.0, 40.0) > 0.25 && lightness < 0.6,
        ),
        ("water", histograms.hue_ratio(180.0, 240.0) > 0.25),
        (
            "stone",
            saturation < 0.25 && (0.2..=0.7).contains(&lightness),
        ),
        (
            "sand",
            histograms.hue_ratio(40.0, 70.0) > 0.25 && lightness > 0.5,
        ),
        ("snow", lightness > 0.8 && saturation < 0.2),
        (
            "lava",
            histograms.hue_ratio(0.0, 20.0) > 0.25 && saturation > 0.6,
        ),
    ];

    rules
        .iter()
        .filter(|(_, fired)| *fired)
        .map(|(material, _)| (*material).to_string())
        .collect()
}

/// Guess the auto-tile system from the tile count alone
///
/// Used when pattern classification is not confident enough.
pub const fn infer_from_tile_count(tile_count: usize) -> Option<(AutoTileSystem, f64)> {
    match tile_count {
        16 => Some((AutoTileSystem::Blob16, 0.95)),
        47 | 48 => Some((AutoTileSystem::Blob47, 0.9)),
        n if n > 16 && n <= 256 && n % 16 == 0 => Some((AutoTileSystem::Wang, 0.6)),
        n if n > 1 && n < 1000 => Some((AutoTileSystem::Custom, 0.4)),
        _ => None,
    }
}
