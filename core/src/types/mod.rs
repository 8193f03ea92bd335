//! Generic types used throughout the core codebase.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

mod players;

pub use players::{PlayerError, Players};

/// A position in the roster. Positions shift down when an earlier player is
/// removed, so an index is only meaningful against the roster it was taken
/// from.
#[derive(Debug, Copy, Clone, Serialize, Deserialize, Hash, Eq, PartialEq, Ord, PartialOrd)]
#[serde(transparent)]
pub struct PlayerIndex(pub usize);

/// Information tracked about a player throughout the session.
#[derive(Debug, Clone, Serialize, Deserialize, Hash, Eq, PartialEq)]
pub struct Player {
    pub(crate) name: String,
    pub(crate) verloren: u32,
    pub(crate) durchmarsch: u32,
}

impl Player {
    pub(crate) fn new(name: String) -> Self {
        Self {
            name,
            verloren: 0,
            durchmarsch: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn verloren(&self) -> u32 {
        self.verloren
    }

    pub fn durchmarsch(&self) -> u32 {
        self.durchmarsch
    }

    /// The number of penalty points which are multiplied by the stake.
    pub fn points(&self) -> u64 {
        u64::from(self.verloren) + u64::from(self.durchmarsch)
    }

    #[must_use]
    fn apply(&self, penalty: Penalty) -> Self {
        Self {
            name: self.name.clone(),
            verloren: self.verloren.saturating_add(penalty.verloren),
            durchmarsch: self.durchmarsch.saturating_add(penalty.durchmarsch),
        }
    }
}

/// The counters to add to a single player when a round ends.
#[derive(Debug, Copy, Clone, Default, Serialize, Deserialize, Hash, Eq, PartialEq)]
pub struct Penalty {
    pub verloren: u32,
    pub durchmarsch: u32,
}

impl Penalty {
    pub fn is_empty(self) -> bool {
        self.verloren == 0 && self.durchmarsch == 0
    }
}

/// The stake ("Einsatz") each penalty point is worth.
///
/// Any value is accepted, including zero, negative numbers and NaN. A NaN
/// stake serializes as `null` and comes back as the default stake of 1.
#[derive(Debug, Copy, Clone, Serialize, PartialEq)]
#[serde(transparent)]
pub struct Factor(f64);

impl Factor {
    pub const DEFAULT: Factor = Factor(1.0);

    pub fn new(value: f64) -> Self {
        Factor(value)
    }

    /// Interpret text typed into the stake field. Unparsable input becomes
    /// NaN rather than an error.
    pub fn parse_input(input: &str) -> Self {
        let input = input.trim();
        // Only the spelled-out "Infinity" counts; "inf" and "nan" do not.
        let infinity = input.trim_start_matches(&['+', '-'][..]) == "Infinity";
        let value = match input.parse::<f64>() {
            Ok(v) if v.is_finite() || infinity => v,
            _ => f64::NAN,
        };
        Factor(value)
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// The monetary total for `points`, formatted with exactly two decimals.
    pub fn total(self, points: u64) -> String {
        to_fixed_2(points as f64 * self.0)
    }
}

/// Two decimals, rounding exact halves away from zero. Non-finite values
/// render as `NaN`, `Infinity` and `-Infinity`.
fn to_fixed_2(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        let sign = if value < 0.0 { "-" } else { "" };
        return format!("{}Infinity", sign);
    }
    // Avoid rendering "-0.00" for a negative stake on zero points.
    if value == 0.0 {
        return "0.00".to_string();
    }
    // An exact half at the thousandths place needs a multiple of 1/8, where
    // scaling by 100 is exact.
    let hundredths = value * 100.0;
    let value = if (value * 8.0).fract() == 0.0 && hundredths.fract().abs() == 0.5 {
        (hundredths + 0.5f64.copysign(hundredths)) / 100.0
    } else {
        value
    };
    format!("{:.2}", value)
}

impl Default for Factor {
    fn default() -> Self {
        Factor::DEFAULT
    }
}

impl<'de> Deserialize<'de> for Factor {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<f64>::deserialize(deserializer)?
            .map(Factor)
            .unwrap_or_default())
    }
}

impl fmt::Display for Factor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The stage of the round in which a Schock-Aus happened.
#[derive(Debug, Copy, Clone, Serialize, Deserialize, Hash, Eq, PartialEq)]
pub enum Phase {
    FirstHalf,
    SecondHalf,
    Final,
}

impl Phase {
    pub const ALL: [Phase; 3] = [Phase::FirstHalf, Phase::SecondHalf, Phase::Final];

    pub fn label(self) -> &'static str {
        match self {
            Phase::FirstHalf => "1. Hälfte",
            Phase::SecondHalf => "2. Hälfte",
            Phase::Final => "Finale",
        }
    }
}

impl Default for Phase {
    fn default() -> Self {
        Phase::FirstHalf
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
