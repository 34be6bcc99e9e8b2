// Light control domain model
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

pub const CHANNEL_MAX: f64 = 255.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Red,
    Green,
    Blue,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::Red, Channel::Green, Channel::Blue];

    fn index(self) -> usize {
        match self {
            Channel::Red => 0,
            Channel::Green => 1,
            Channel::Blue => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Channel::Red => "red",
            Channel::Green => "green",
            Channel::Blue => "blue",
        }
    }
}

impl FromStr for Channel {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "red" => Ok(Channel::Red),
            "green" => Ok(Channel::Green),
            "blue" => Ok(Channel::Blue),
            other => Err(InputError::UnknownChannel(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("'{0}' is not a finite number")]
    NotANumber(String),
    #[error("unknown channel '{0}'")]
    UnknownChannel(String),
}

/// How out-of-range channel input is brought back into range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClampPolicy {
    /// When false only the high side is clamped, so negative and fractional
    /// input is kept as typed.
    pub clamp_low: bool,
}

impl ClampPolicy {
    pub fn apply(&self, value: f64) -> Level {
        if self.clamp_low {
            Level(value.clamp(0.0, CHANNEL_MAX).round())
        } else if value > CHANNEL_MAX {
            Level(CHANNEL_MAX)
        } else {
            Level(value)
        }
    }

    /// Parses raw widget text the way a browser reads a number: blank means
    /// zero, `0x`/`0o`/`0b` literals are accepted and `Infinity` clamps to
    /// 255. Anything that does not end up as a finite level is refused.
    pub fn parse(&self, raw: &str) -> Result<Level, InputError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(self.apply(0.0));
        }
        match parse_number(trimmed).filter(|value| !value.is_nan()) {
            Some(value) => {
                let level = self.apply(value);
                if level.value().is_finite() {
                    Ok(level)
                } else {
                    Err(InputError::NotANumber(raw.to_string()))
                }
            }
            None => Err(InputError::NotANumber(raw.to_string())),
        }
    }
}

fn parse_number(text: &str) -> Option<f64> {
    let radix = match text.get(..2) {
        Some("0x" | "0X") => 16,
        Some("0o" | "0O") => 8,
        Some("0b" | "0B") => 2,
        _ => return text.parse().ok(),
    };
    let digits = &text[2..];
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }
    u64::from_str_radix(digits, radix).ok().map(|value| value as f64)
}

/// A channel value. Always finite.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Level(f64);

impl Level {
    pub fn value(self) -> f64 {
        self.0
    }

    fn as_integer(self) -> Option<i64> {
        let value = self.0;
        (value.fract() == 0.0 && value.abs() < i64::MAX as f64).then_some(value as i64)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_integer() {
            Some(integer) => write!(f, "{}", integer),
            None => write!(f, "{}", self.0),
        }
    }
}

// Integral levels go over the wire as JSON integers.
impl Serialize for Level {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.as_integer() {
            Some(integer) => serializer.serialize_i64(integer),
            None => serializer.serialize_f64(self.0),
        }
    }
}

/// Composite of the three channel levels. Derived, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Color {
    pub red: Level,
    pub green: Level,
    pub blue: Level,
}

impl Color {
    /// CSS `rgb()` string used to paint the swatch.
    pub fn css(&self) -> String {
        format!("rgb({}, {}, {})", self.red, self.green, self.blue)
    }
}

/// Body of the brightness write. Same shape as `Color` on the wire.
pub type BrightnessCommand = Color;

/// The three channel levels behind the light panel. One value per channel;
/// the slider and the numeric box both read it.
#[derive(Debug, Clone, PartialEq)]
pub struct LightState {
    levels: [Level; 3],
    policy: ClampPolicy,
}

impl LightState {
    pub fn new(initial: f64, policy: ClampPolicy) -> Self {
        let level = policy.apply(initial);
        Self {
            levels: [level; 3],
            policy,
        }
    }

    pub fn level(&self, channel: Channel) -> Level {
        self.levels[channel.index()]
    }

    pub fn set_level(&mut self, channel: Channel, value: f64) -> Level {
        let level = self.policy.apply(value);
        self.levels[channel.index()] = level;
        level
    }

    /// Applies one input event from either widget. Bad input leaves the level untouched.
    pub fn apply_input(&mut self, channel: Channel, raw: &str) -> Result<Level, InputError> {
        let level = self.policy.parse(raw)?;
        self.levels[channel.index()] = level;
        Ok(level)
    }

    pub fn color(&self) -> Color {
        Color {
            red: self.level(Channel::Red),
            green: self.level(Channel::Green),
            blue: self.level(Channel::Blue),
        }
    }

    pub fn command(&self) -> BrightnessCommand {
        self.color()
    }
}
