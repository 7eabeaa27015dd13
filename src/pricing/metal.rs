//! Commodity identifiers and quality grades.
use crate::error::PricingError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The two commodities that make up the alloy. No other metals are modelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Metal {
    #[serde(alias = "copper", alias = "COPPER")]
    Copper,
    #[serde(alias = "zinc", alias = "ZINC")]
    Zinc,
}

impl Metal {
    pub const ALL: [Metal; 2] = [Metal::Copper, Metal::Zinc];

    pub fn as_str(&self) -> &'static str {
        match self {
            Metal::Copper => "Copper",
            Metal::Zinc => "Zinc",
        }
    }
}

impl fmt::Display for Metal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Metal {
    type Err = PricingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Metal::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(name))
            .ok_or_else(|| PricingError::UnsupportedMetal(s.to_string()))
    }
}

/// Market quality grade. Any unrecognised grade falls back to `Default`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Quality {
    #[default]
    Default,
    C,
    B,
    A,
    AA,
}

impl Quality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Quality::Default => "Default",
            Quality::C => "C",
            Quality::B => "B",
            Quality::A => "A",
            Quality::AA => "AA",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s.trim() {
            "AA" => Quality::AA,
            "A" => Quality::A,
            "B" => Quality::B,
            "C" => Quality::C,
            _ => Quality::Default,
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Quality {
    fn from(s: &str) -> Self { Quality::parse(s) }
}

impl From<String> for Quality {
    fn from(s: String) -> Self { Quality::parse(&s) }
}

impl From<Quality> for String {
    fn from(q: Quality) -> Self { q.as_str().to_string() }
}
