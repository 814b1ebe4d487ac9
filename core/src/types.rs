//! Shared primitive types used across every generator and validator.

use serde::{Deserialize, Serialize};
use std::fmt;

pub type CustomerId = u64;
pub type FrameworkId = u64;
pub type AdoptionId = u64;
pub type EventId = u64;
pub type ActivityId = u64;

/// The canonical generation-run identifier.
pub type RunId = String;

/// Customer size bucket. Drives almost every randomized range downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Segment {
    Startup,
    MidMarket,
    Enterprise,
}

impl Segment {
    pub const ALL: [Segment; 3] = [Segment::Startup, Segment::MidMarket, Segment::Enterprise];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Startup    => "startup",
            Self::MidMarket  => "mid_market",
            Self::Enterprise => "enterprise",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == value)
    }

    /// Inclusive employee-count bounds.
    pub fn employee_bounds(&self) -> (u64, u64) {
        match self {
            Self::Startup    => (1, 50),
            Self::MidMarket  => (51, 500),
            Self::Enterprise => (501, 10_000),
        }
    }

    /// Inclusive annual-revenue bounds in USD.
    pub fn revenue_bounds(&self) -> (u64, u64) {
        match self {
            Self::Startup    => (100_000, 5_000_000),
            Self::MidMarket  => (5_000_000, 100_000_000),
            Self::Enterprise => (100_000_000, 1_000_000_000),
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Maturity {
    Beginner,
    Intermediate,
    Advanced,
}

impl Maturity {
    pub const ALL: [Maturity; 3] = [Maturity::Beginner, Maturity::Intermediate, Maturity::Advanced];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Beginner     => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced     => "advanced",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.as_str() == value)
    }
}

impl fmt::Display for Maturity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}
