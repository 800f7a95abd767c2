// src/settings.rs

use crate::error::Result;
use image::Rgba;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// RGBA colour, written as `#RRGGBB` or `#RRGGBBAA` in settings files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(pub Rgba<u8>);

impl Color {
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Color(Rgba([r, g, b, a]))
    }

    pub fn alpha(&self) -> u8 {
        self.0[3]
    }

    pub fn with_alpha(self, a: u8) -> Self {
        let [r, g, b, _] = self.0.0;
        Self::rgba(r, g, b, a)
    }

    fn lerp(self, to: Color, t: f32) -> Color {
        let t = t.clamp(0.0, 1.0);
        let mut out = [0u8; 4];
        for (i, c) in out.iter_mut().enumerate() {
            let a = self.0[i] as f32;
            let b = to.0[i] as f32;
            *c = (a + (b - a) * t).round() as u8;
        }
        Color(Rgba(out))
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid colour {0:?}, expected #RRGGBB or #RRGGBBAA")]
pub struct ParseColorError(String);

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let err = || ParseColorError(s.to_string());
        let hex = s.strip_prefix('#').ok_or_else(err)?;
        if !(hex.len() == 6 || hex.len() == 8) || !hex.is_ascii() {
            return Err(err());
        }
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| err());
        let a = if hex.len() == 8 { byte(6)? } else { 255 };
        Ok(Color::rgba(byte(0)?, byte(2)?, byte(4)?, a))
    }
}

impl TryFrom<String> for Color {
    type Error = ParseColorError;

    fn try_from(s: String) -> std::result::Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Color> for String {
    fn from(c: Color) -> Self {
        c.to_string()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b, a] = self.0.0;
        if a == 255 {
            write!(f, "#{r:02x}{g:02x}{b:02x}")
        } else {
            write!(f, "#{r:02x}{g:02x}{b:02x}{a:02x}")
        }
    }
}

/// Stroke used for one kind of bar. The renderer only asks it for a colour
/// at a given distance from the midline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pen {
    Solid(Color),
    /// `from` at the midline, fading to `to` at the outer edge of the half.
    Gradient { from: Color, to: Color },
}

impl Pen {
    /// `t` is 0.0 at the midline and 1.0 at the image edge.
    pub fn color_at(&self, t: f32) -> Rgba<u8> {
        match *self {
            Pen::Solid(c) => c.0,
            Pen::Gradient { from, to } => from.lerp(to, t).0,
        }
    }
}

impl From<Color> for Pen {
    fn from(c: Color) -> Self {
        Pen::Solid(c)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    pub width: u32,
    pub top_height: u32,
    pub bottom_height: u32,
    pub pixels_per_peak: u32,
    pub spacer_pixels: u32,
    pub decibel_scale: bool,
    pub background_color: Color,
    pub top_peak_pen: Pen,
    pub bottom_peak_pen: Pen,
    pub top_spacer_pen: Pen,
    pub bottom_spacer_pen: Pen,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self::standard()
    }
}

impl RenderSettings {
    /// One pixel per peak, maroon over peru on beige.
    pub fn standard() -> Self {
        let top = Pen::Solid(Color::rgb(128, 0, 0));
        let bottom = Pen::Solid(Color::rgb(205, 133, 63));
        Self {
            width: 800,
            top_height: 50,
            bottom_height: 50,
            pixels_per_peak: 1,
            spacer_pixels: 0,
            decibel_scale: false,
            background_color: Color::rgb(245, 245, 220),
            top_peak_pen: top,
            bottom_peak_pen: bottom,
            top_spacer_pen: top,
            bottom_spacer_pen: bottom,
        }
    }

    /// Grey gradient blocks with a short reflection, on a transparent background.
    pub fn soundcloud_original() -> Self {
        let top_from = Color::rgb(102, 102, 102);
        let top_to = Color::rgb(170, 170, 170);
        let bottom_from = Color::rgb(190, 190, 190);
        let bottom_to = Color::rgb(235, 235, 235);
        Self {
            width: 800,
            top_height: 50,
            bottom_height: 30,
            pixels_per_peak: 4,
            spacer_pixels: 2,
            decibel_scale: false,
            background_color: Color::TRANSPARENT,
            top_peak_pen: Pen::Gradient { from: top_from, to: top_to },
            bottom_peak_pen: Pen::Gradient { from: bottom_from, to: bottom_to },
            top_spacer_pen: Pen::Gradient {
                from: top_from.with_alpha(128),
                to: top_to.with_alpha(128),
            },
            bottom_spacer_pen: Pen::Gradient {
                from: bottom_from.with_alpha(128),
                to: bottom_to.with_alpha(128),
            },
        }
    }

    /// Flat orange blocks with faded spacers, on a transparent background.
    pub fn soundcloud_blocks() -> Self {
        let top = Color::rgb(255, 118, 0);
        let bottom = Color::rgb(255, 179, 128);
        Self {
            width: 800,
            top_height: 50,
            bottom_height: 20,
            pixels_per_peak: 4,
            spacer_pixels: 2,
            decibel_scale: false,
            background_color: Color::TRANSPARENT,
            top_peak_pen: Pen::Solid(top),
            bottom_peak_pen: Pen::Solid(bottom),
            top_spacer_pen: Pen::Solid(top.with_alpha(96)),
            bottom_spacer_pen: Pen::Solid(bottom.with_alpha(96)),
        }
    }

    pub fn height(&self) -> u32 {
        self.top_height.saturating_add(self.bottom_height)
    }

    /// Columns covered by one peak group plus its spacer group.
    pub fn step(&self) -> u32 {
        self.pixels_per_peak.saturating_add(self.spacer_pixels)
    }

    pub fn save_to_disk(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    pub fn load_from_disk(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let settings = serde_json::from_reader(reader)?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_colours() {
        assert_eq!("#800000".parse::<Color>().unwrap(), Color::rgb(128, 0, 0));
        assert_eq!(
            "#ff760060".parse::<Color>().unwrap(),
            Color::rgba(255, 118, 0, 96)
        );
        assert!("800000".parse::<Color>().is_err());
        assert!("#80000".parse::<Color>().is_err());
        assert!("#zz0000".parse::<Color>().is_err());
    }

    #[test]
    fn colour_display_drops_opaque_alpha() {
        assert_eq!(Color::rgb(245, 245, 220).to_string(), "#f5f5dc");
        assert_eq!(Color::TRANSPARENT.to_string(), "#00000000");
    }

    #[test]
    fn gradient_runs_from_midline_to_edge() {
        let pen = Pen::Gradient {
            from: Color::rgb(0, 0, 0),
            to: Color::rgb(200, 100, 50),
        };
        assert_eq!(pen.color_at(0.0), Rgba([0, 0, 0, 255]));
        assert_eq!(pen.color_at(1.0), Rgba([200, 100, 50, 255]));
        assert_eq!(pen.color_at(0.5), Rgba([100, 50, 25, 255]));
        assert_eq!(pen.color_at(3.0), Rgba([200, 100, 50, 255]));
    }

    #[test]
    fn partial_json_falls_back_to_standard() {
        let json = r##"{ "width": 320, "spacer_pixels": 1, "background_color": "#00000000" }"##;
        let s: RenderSettings = serde_json::from_str(json).unwrap();
        assert_eq!(s.width, 320);
        assert_eq!(s.spacer_pixels, 1);
        assert_eq!(s.background_color, Color::TRANSPARENT);
        assert_eq!(s.top_height, RenderSettings::standard().top_height);
        assert_eq!(s.top_peak_pen, RenderSettings::standard().top_peak_pen);
    }

    #[test]
    fn pens_deserialize_from_json() {
        let json = r##"{
            "top_peak_pen": { "gradient": { "from": "#666666", "to": "#aaaaaa" } },
            "bottom_peak_pen": { "solid": "#ff7600" }
        }"##;
        let s: RenderSettings = serde_json::from_str(json).unwrap();
        assert_eq!(
            s.top_peak_pen,
            Pen::Gradient {
                from: Color::rgb(102, 102, 102),
                to: Color::rgb(170, 170, 170)
            }
        );
        assert_eq!(s.bottom_peak_pen, Pen::Solid(Color::rgb(255, 118, 0)));
    }

    #[test]
    fn save_then_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let settings = RenderSettings::soundcloud_original();

        settings.save_to_disk(&path).unwrap();
        let loaded = RenderSettings::load_from_disk(&path).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn oversized_geometry_saturates() {
        let s = RenderSettings {
            top_height: u32::MAX,
            bottom_height: 1,
            pixels_per_peak: u32::MAX - 1,
            spacer_pixels: 5,
            ..RenderSettings::standard()
        };
        assert_eq!(s.height(), u32::MAX);
        assert_eq!(s.step(), u32::MAX);
    }

    #[test]
    fn bad_colour_in_settings_is_rejected() {
        let json = r#"{ "background_color": "beige" }"#;
        assert!(serde_json::from_str::<RenderSettings>(json).is_err());
    }
}
