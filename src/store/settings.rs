//! Per-install overlay settings (`settings.json`)

use eyre::{Context, Result};
use lazy_regex::regex_is_match;
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use super::layout::DEFAULT_SESSION;

/// Overlay color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const RED: Rgb = Rgb { r: 0xFF, g: 0, b: 0 };

    /// Components scaled to [0, 1]
    pub fn to_unit(self) -> [f32; 3] {
        [self.r as f32 / 255.0, self.g as f32 / 255.0, self.b as f32 / 255.0]
    }
}

impl FromStr for Rgb {
    type Err = eyre::Report;

    /// Accepts `RRGGBB` or `#RRGGBB`
    fn from_str(s: &str) -> Result<Self> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if !regex_is_match!(r"^[0-9A-Fa-f]{6}$", hex) {
            eyre::bail!("Invalid color '{}'. Use #RRGGBB or RRGGBB.", s);
        }
        let rgb = u32::from_str_radix(hex, 16).context("Invalid hex color")?;
        Ok(Self {
            r: ((rgb >> 16) & 0xFF) as u8,
            g: ((rgb >> 8) & 0xFF) as u8,
            b: (rgb & 0xFF) as u8,
        })
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// How trail points become spline control points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RenderMode {
    /// Every point center is a control point
    #[serde(rename = "DEFAULT")]
    Linear,
    /// Consecutive points are averaged in fixed-size groups
    #[serde(rename = "GROUPED")]
    Grouped,
}

impl FromStr for RenderMode {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "DEFAULT" | "LINEAR" => Ok(RenderMode::Linear),
            "GROUPED" => Ok(RenderMode::Grouped),
            _ => eyre::bail!("Unknown render mode '{}' (use default or grouped)", s),
        }
    }
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderMode::Linear => f.write_str("DEFAULT"),
            RenderMode::Grouped => f.write_str("GROUPED"),
        }
    }
}

/// Settings keys, as named on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SettingsField {
    Color,
    Transparency,
    Mode,
    Thickness,
    GroupSize,
    Subdivisions,
    RenderDistance,
}

impl SettingsField {
    /// Key in `settings.json`
    pub fn key(&self) -> &'static str {
        match self {
            SettingsField::Color => "color",
            SettingsField::Transparency => "transparency",
            SettingsField::Mode => "mode",
            SettingsField::Thickness => "thickness",
            SettingsField::GroupSize => "groupSize",
            SettingsField::Subdivisions => "subdivisions",
            SettingsField::RenderDistance => "renderDistance",
        }
    }
}

const MAX_COUNT: u32 = 10_000;

/// Overlay settings shared by every session
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub current_session: String,
    pub color: Rgb,
    pub transparency: f32,
    pub mode: RenderMode,
    pub thickness: f64,
    pub group_size: u32,
    pub subdivisions: u32,
    pub render_distance: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            current_session: DEFAULT_SESSION.to_string(),
            color: Rgb::RED,
            transparency: 0.65,
            mode: RenderMode::Linear,
            thickness: 0.2,
            group_size: 5,
            subdivisions: 8,
            render_distance: 128,
        }
    }
}

impl Settings {
    /// Build settings from a parsed `settings.json`.
    ///
    /// Every key is read on its own. A missing key keeps its default; a key
    /// with a bad value keeps its default and is logged.
    pub fn from_json(value: &Value) -> Self {
        let mut settings = Self::default();

        let Some(obj) = value.as_object() else {
            log::warn!("settings.json is not an object, using defaults");
            return settings;
        };

        if let Some(v) = obj.get("currentSession") {
            match v.as_str() {
                Some(s) if !s.is_empty() => settings.current_session = s.to_string(),
                _ => log::warn!("Ignoring invalid currentSession: {}", v),
            }
        }

        for field in [
            SettingsField::Color,
            SettingsField::Transparency,
            SettingsField::Mode,
            SettingsField::Thickness,
            SettingsField::GroupSize,
            SettingsField::Subdivisions,
            SettingsField::RenderDistance,
        ] {
            let Some(v) = obj.get(field.key()) else {
                continue;
            };
            let raw = match v {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                other => {
                    log::warn!("Ignoring {}: unexpected value {}", field.key(), other);
                    continue;
                }
            };
            if let Err(e) = settings.apply(field, &raw) {
                log::warn!("Ignoring {} from settings file: {}", field.key(), e);
            }
        }

        settings
    }

    /// Parse and validate `value` for `field`, updating it in place.
    /// On error the settings are unchanged.
    pub fn apply(&mut self, field: SettingsField, value: &str) -> Result<()> {
        let value = value.trim();
        match field {
            SettingsField::Color => self.color = value.parse()?,
            SettingsField::Mode => self.mode = value.parse()?,
            SettingsField::Transparency => {
                let t: f32 = value.parse().context("Transparency must be a number")?;
                if !(0.0..=1.0).contains(&t) {
                    eyre::bail!("Transparency must be between 0 and 1, got {}", t);
                }
                self.transparency = t;
            }
            SettingsField::Thickness => {
                let t: f64 = value.parse().context("Thickness must be a number")?;
                if !(t > 0.0 && t <= 1.0) {
                    eyre::bail!("Thickness must be in (0, 1], got {}", t);
                }
                self.thickness = t;
            }
            SettingsField::GroupSize => self.group_size = parse_count(field, value)?,
            SettingsField::Subdivisions => self.subdivisions = parse_count(field, value)?,
            SettingsField::RenderDistance => self.render_distance = parse_count(field, value)?,
        }
        Ok(())
    }

    /// Current value of `field` as text
    pub fn get(&self, field: SettingsField) -> String {
        match field {
            SettingsField::Color => self.color.to_string(),
            SettingsField::Transparency => self.transparency.to_string(),
            SettingsField::Mode => self.mode.to_string(),
            SettingsField::Thickness => self.thickness.to_string(),
            SettingsField::GroupSize => self.group_size.to_string(),
            SettingsField::Subdivisions => self.subdivisions.to_string(),
            SettingsField::RenderDistance => self.render_distance.to_string(),
        }
    }
}

fn parse_count(field: SettingsField, value: &str) -> Result<u32> {
    let n: u32 = value
        .parse()
        .with_context(|| format!("{} must be a whole number", field.key()))?;
    if !(1..=MAX_COUNT).contains(&n) {
        eyre::bail!("{} must be between 1 and {}, got {}", field.key(), MAX_COUNT, n);
    }
    Ok(n)
}
