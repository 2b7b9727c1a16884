//! Target platforms and per-platform option resolution.
//!
//! Each platform has its own option set. User overrides are checked against a
//! static capability table ([`PlatformOption`]) that declares which platforms an
//! option applies to and what its default is. Resolution produces a typed
//! [`PlatformOptions`] record consumed by the renderer and templater.

pub mod files;
pub mod icons;

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use self::icons::SlotKind;
use crate::error::{FaviconError, FaviconResult};
use crate::icon::IconSpec;
use crate::render::color::parse_color;

// ============================================================================
// Platform
// ============================================================================

/// A platform slot: an OS or browser target with its own icons and files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub enum Platform {
    Android,
    AppleIcon,
    AppleStartup,
    Coast,
    Favicons,
    Firefox,
    Windows,
    Yandex,
}

impl Platform {
    /// Every platform, in generation order.
    pub const ALL: [Platform; 8] = [
        Platform::Android,
        Platform::AppleIcon,
        Platform::AppleStartup,
        Platform::Coast,
        Platform::Favicons,
        Platform::Firefox,
        Platform::Windows,
        Platform::Yandex,
    ];

    /// The identifier used in configuration files.
    pub fn id(self) -> &'static str {
        match self {
            Self::Android => "android",
            Self::AppleIcon => "appleIcon",
            Self::AppleStartup => "appleStartup",
            Self::Coast => "coast",
            Self::Favicons => "favicons",
            Self::Firefox => "firefox",
            Self::Windows => "windows",
            Self::Yandex => "yandex",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.id() == id)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

// ============================================================================
// Capability table
// ============================================================================

const DECORATED: &[Platform] = &[
    Platform::Android,
    Platform::AppleIcon,
    Platform::AppleStartup,
    Platform::Coast,
    Platform::Firefox,
    Platform::Windows,
    Platform::Yandex,
];

/// An option a platform may accept, with its applicable platforms and default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlatformOption {
    /// Padding around the icon, as a percentage of the slot's largest side.
    Offset,
    /// Background fill: `false`, `true`, or a color string.
    Background,
    /// Clip the background to a circle and draw the ring overlay.
    Mask,
}

impl PlatformOption {
    pub const ALL: [PlatformOption; 3] = [Self::Offset, Self::Background, Self::Mask];

    pub fn name(self) -> &'static str {
        match self {
            Self::Offset => "offset",
            Self::Background => "background",
            Self::Mask => "mask",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|o| o.name() == name)
    }

    pub fn platforms(self) -> &'static [Platform] {
        match self {
            Self::Offset | Self::Background => DECORATED,
            Self::Mask => &[Platform::Firefox],
        }
    }

    pub fn applies_to(self, platform: Platform) -> bool {
        self.platforms().contains(&platform)
    }

    pub fn default_value(self) -> Value {
        match self {
            Self::Offset => Value::from(0),
            Self::Background | Self::Mask => Value::Bool(false),
        }
    }
}

/// Offsets at or above half the side would leave nothing to draw.
const MAX_OFFSET_PERCENT: u64 = 49;

// ============================================================================
// Background
// ============================================================================

/// A resolved background: a fully transparent canvas or a color string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Background {
    Transparent,
    Color(String),
}

impl Background {
    /// Parses a color string; the literal `transparent` maps to
    /// [`Background::Transparent`].
    pub fn from_color(value: &str) -> FaviconResult<Self> {
        if value.trim().eq_ignore_ascii_case("transparent") {
            return Ok(Self::Transparent);
        }
        parse_color(value)?;
        Ok(Self::Color(value.to_string()))
    }

    pub fn is_transparent(&self) -> bool {
        matches!(self, Self::Transparent)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Transparent => "transparent",
            Self::Color(color) => color,
        }
    }
}

impl fmt::Display for Background {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// PlatformOptions
// ============================================================================

/// Fully resolved options for one platform in one generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformOptions {
    /// The platform these options were resolved for.
    pub platform: Platform,
    /// Padding percentage.
    pub offset: u32,
    /// `None` when the platform takes no background option.
    pub background: Option<Background>,
    pub mask: bool,
    /// The canvas must be opaque even for slots that allow transparency.
    pub disable_transparency: bool,
}

/// Merges user overrides with the capability table for `platform`.
///
/// Unknown or inapplicable keys are rejected before anything else is looked
/// at. Boolean backgrounds are then replaced (`false` on android becomes
/// transparent, everything else the `global_background`), and android gets
/// `disable_transparency` whenever the result is not transparent.
pub fn resolve(
    platform: Platform,
    user: &Map<String, Value>,
    global_background: &Background,
) -> FaviconResult<PlatformOptions> {
    for key in user.keys() {
        match PlatformOption::from_name(key) {
            Some(option) if option.applies_to(platform) => {}
            _ => {
                return Err(FaviconError::UnsupportedOption {
                    platform,
                    option: key.clone(),
                });
            }
        }
    }

    let value_of = |option: PlatformOption| -> Option<Value> {
        if !option.applies_to(platform) {
            return None;
        }
        Some(
            user.get(option.name())
                .cloned()
                .unwrap_or_else(|| option.default_value()),
        )
    };

    let offset = match value_of(PlatformOption::Offset) {
        Some(value) => parse_offset(&value)?,
        None => 0,
    };
    let mask = match value_of(PlatformOption::Mask) {
        Some(value) => parse_flag(PlatformOption::Mask, &value)?,
        None => false,
    };

    let background = match value_of(PlatformOption::Background) {
        None => None,
        Some(Value::Bool(false)) if platform == Platform::Android => Some(Background::Transparent),
        Some(Value::Bool(_)) => Some(global_background.clone()),
        Some(Value::String(color)) => Some(Background::from_color(&color)?),
        Some(other) => {
            return Err(FaviconError::invalid_option_value(
                PlatformOption::Background.name(),
                format!("expected a boolean or a color string, got {other}"),
            ));
        }
    };

    let disable_transparency = platform == Platform::Android
        && background.as_ref().is_some_and(|bg| !bg.is_transparent());

    let options = PlatformOptions {
        platform,
        offset,
        background,
        mask,
        disable_transparency,
    };
    check_offset_fits(&options)?;

    tracing::debug!(
        %platform,
        offset,
        mask,
        disable_transparency,
        background = options.background.as_ref().map(Background::as_str),
        "resolved platform options"
    );

    Ok(options)
}

/// Every PNG slot of the platform must keep a non-empty box after padding.
fn check_offset_fits(options: &PlatformOptions) -> FaviconResult<()> {
    for slot in icons::slots(options.platform) {
        if let SlotKind::Png(props) = slot.kind {
            IconSpec::from_slot(&props, options)
                .effective_size()
                .map_err(|_| {
                    FaviconError::invalid_option_value(
                        PlatformOption::Offset.name(),
                        format!("{}% leaves no room in {}", options.offset, slot.name),
                    )
                })?;
        }
    }
    Ok(())
}

fn parse_offset(value: &Value) -> FaviconResult<u32> {
    let offset = value.as_u64().ok_or_else(|| {
        FaviconError::invalid_option_value(
            PlatformOption::Offset.name(),
            format!("expected a non-negative integer, got {value}"),
        )
    })?;
    if offset > MAX_OFFSET_PERCENT {
        return Err(FaviconError::invalid_option_value(
            PlatformOption::Offset.name(),
            format!("{offset}% exceeds the maximum of {MAX_OFFSET_PERCENT}%"),
        ));
    }
    Ok(offset as u32)
}

fn parse_flag(option: PlatformOption, value: &Value) -> FaviconResult<bool> {
    value.as_bool().ok_or_else(|| {
        FaviconError::invalid_option_value(option.name(), format!("expected a boolean, got {value}"))
    })
}
