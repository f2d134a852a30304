use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use super::errors::{DomainError, DomainResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrewMode {
    Hot,
    Iced,
}

impl BrewMode {
    pub fn label(&self) -> &'static str {
        match self {
            BrewMode::Hot => "Hot",
            BrewMode::Iced => "Iced",
        }
    }

    pub fn all() -> [BrewMode; 2] {
        [BrewMode::Hot, BrewMode::Iced]
    }
}

/// A single timed pour instruction with its cumulative water target
/// at base (unscaled) quantities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub offset_secs: u32,
    pub instruction: String,
    pub water_g: u32,
}

impl Step {
    fn new(offset_secs: u32, instruction: &str, water_g: u32) -> Self {
        Self {
            offset_secs,
            instruction: instruction.to_string(),
            water_g,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub mode: BrewMode,
    pub steps: Vec<Step>,
    pub coffee_g: f64,
    pub water_g: f64,
    pub ice_g: f64,
    pub grind: String,
}

impl Recipe {
    /// Checks the step-sequence invariants: at least one step, first step
    /// at 0s, strictly increasing offsets, non-decreasing water targets
    /// (pours only ever add water).
    pub fn validate(&self) -> DomainResult<()> {
        let first = self.steps.first().ok_or(DomainError::EmptyStepSequence)?;
        if first.offset_secs != 0 {
            return Err(DomainError::FirstStepNotAtZero(first.offset_secs));
        }

        for (i, pair) in self.steps.windows(2).enumerate() {
            if pair[1].offset_secs <= pair[0].offset_secs {
                return Err(DomainError::NonIncreasingOffset {
                    index: i + 1,
                    offset_secs: pair[1].offset_secs,
                });
            }
            if pair[1].water_g < pair[0].water_g {
                return Err(DomainError::DecreasingWater {
                    index: i + 1,
                    water_g: pair[1].water_g,
                });
            }
        }

        Ok(())
    }

    fn hot() -> Self {
        Self {
            mode: BrewMode::Hot,
            steps: vec![
                Step::new(0, "Pour for bloom", 60),
                Step::new(45, "First pour", 150),
                Step::new(75, "Second pour", 250),
                Step::new(105, "Third pour", 350),
                Step::new(135, "Final pour", 500),
                Step::new(210, "Drawdown complete", 500),
            ],
            coffee_g: 30.0,
            water_g: 500.0,
            ice_g: 0.0,
            grind: "Medium-fine (filter ↔ aeropress)".to_string(),
        }
    }

    fn iced() -> Self {
        Self {
            mode: BrewMode::Iced,
            steps: vec![
                Step::new(0, "Pour for bloom", 40),
                Step::new(45, "First pour", 100),
                Step::new(75, "Second pour", 160),
                Step::new(105, "Third pour", 220),
                Step::new(135, "Final pour", 300),
                Step::new(180, "Swirl & serve", 300),
            ],
            coffee_g: 30.0,
            water_g: 300.0,
            ice_g: 200.0,
            grind: "Fine (toward aeropress)".to_string(),
        }
    }
}

/// A step with its water target scaled to the selected batch size and
/// water override.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaledStep {
    pub offset_secs: u32,
    pub instruction: String,
    pub water_g: u32,
}

/// Quantities and steps derived from a recipe for one concrete brew.
/// Recomputed whenever mode, multiplier, or water override changes;
/// never stored beyond that.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaledRecipe {
    pub coffee_g: f64,
    pub water_g: f64,
    pub ice_g: f64,
    pub steps: Vec<ScaledStep>,
}

impl ScaledRecipe {
    pub fn last_index(&self) -> usize {
        self.steps.len().saturating_sub(1)
    }

    pub fn last_offset_secs(&self) -> u32 {
        self.steps.last().map(|s| s.offset_secs).unwrap_or(0)
    }
}

/// Immutable table of the built-in recipes, one per mode.
pub struct RecipeCatalog;

static HOT_RECIPE: OnceLock<Recipe> = OnceLock::new();
static ICED_RECIPE: OnceLock<Recipe> = OnceLock::new();

impl RecipeCatalog {
    /// Returns the base recipe for a mode. Total over `BrewMode`; the
    /// returned reference is the same value for the process lifetime.
    pub fn get(mode: BrewMode) -> &'static Recipe {
        match mode {
            BrewMode::Hot => HOT_RECIPE.get_or_init(Recipe::hot),
            BrewMode::Iced => ICED_RECIPE.get_or_init(Recipe::iced),
        }
    }
}
