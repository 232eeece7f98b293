//! Strategy profiles: named weight vectors over the four score dimensions.

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    #[default]
    SmartBalance,
    FastestWins,
    HighImpact,
    DeadlineDriven,
}

/// Weights are conventionally normalized to 1.0; nothing renormalizes them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrategyWeights {
    pub urgency: f64,
    pub importance: f64,
    pub effort: f64,
    pub dependencies: f64,
}

impl StrategyWeights {
    pub fn total(&self) -> f64 {
        self.urgency + self.importance + self.effort + self.dependencies
    }
}

impl Strategy {
    pub const ALL: [Strategy; 4] = [
        Strategy::SmartBalance,
        Strategy::FastestWins,
        Strategy::HighImpact,
        Strategy::DeadlineDriven,
    ];

    pub fn weights(self) -> StrategyWeights {
        let (urgency, importance, effort, dependencies) = match self {
            Strategy::SmartBalance => (0.35, 0.30, 0.15, 0.20),
            Strategy::FastestWins => (0.20, 0.20, 0.50, 0.10),
            Strategy::HighImpact => (0.15, 0.60, 0.10, 0.15),
            Strategy::DeadlineDriven => (0.60, 0.20, 0.05, 0.15),
        };
        StrategyWeights {
            urgency,
            importance,
            effort,
            dependencies,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Strategy::SmartBalance => "smart_balance",
            Strategy::FastestWins => "fastest_wins",
            Strategy::HighImpact => "high_impact",
            Strategy::DeadlineDriven => "deadline_driven",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Strategy::SmartBalance => "Smart Balance",
            Strategy::FastestWins => "Fastest Wins",
            Strategy::HighImpact => "High Impact",
            Strategy::DeadlineDriven => "Deadline Driven",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Strategy::SmartBalance => "Balances urgency, importance, effort and blockers",
            Strategy::FastestWins => "Clears low-effort tasks first",
            Strategy::HighImpact => "Puts the most important work first",
            Strategy::DeadlineDriven => "Orders by how soon things are due",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim();
        Strategy::ALL
            .into_iter()
            .find(|st| st.as_str() == key)
            .ok_or_else(|| ValidationError::UnknownStrategy(key.to_string()))
    }
}

/// Resolve an optional strategy name; absent means the default profile.
pub fn resolve_strategy(name: Option<&str>) -> Result<Strategy, ValidationError> {
    match name {
        None => Ok(Strategy::default()),
        Some(s) => s.parse(),
    }
}

/// Listing row for UIs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategyProfile {
    pub id: Strategy,
    pub label: &'static str,
    pub description: &'static str,
    pub weights: StrategyWeights,
}

pub fn profiles() -> Vec<StrategyProfile> {
    Strategy::ALL
        .into_iter()
        .map(|s| StrategyProfile {
            id: s,
            label: s.label(),
            description: s.description(),
            weights: s.weights(),
        })
        .collect()
}
