use std::collections::BTreeMap;

use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct RGB colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<[u8; 3]> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            [
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            ]
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: group label → RGB
// ---------------------------------------------------------------------------

/// Maps group labels to distinct colours, assigned in the order given.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<String, [u8; 3]>,
    default_color: [u8; 3],
}

impl ColorMap {
    /// Build a colour map for the given group labels. Repeated labels keep
    /// their first colour.
    pub fn new<'a>(labels: impl IntoIterator<Item = &'a str>) -> Self {
        let labels: Vec<&str> = labels.into_iter().collect();
        let palette = generate_palette(labels.len());
        let mut mapping = BTreeMap::new();
        for (label, color) in labels.into_iter().zip(palette) {
            mapping.entry(label.to_string()).or_insert(color);
        }

        ColorMap {
            mapping,
            default_color: [128, 128, 128],
        }
    }

    /// Look up the colour for a group label.
    pub fn color_for(&self, label: &str) -> [u8; 3] {
        self.mapping.get(label).copied().unwrap_or(self.default_color)
    }

    /// Number of mapped labels.
    pub fn len(&self) -> usize {
        self.mapping.len()
    }

    /// Whether no label is mapped.
    pub fn is_empty(&self) -> bool {
        self.mapping.is_empty()
    }
}
