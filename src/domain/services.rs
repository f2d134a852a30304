//! Pure brew-progression services.
//!
//! This module provides the stateless pieces of the timer core: recipe
//! scaling, step tracking against elapsed time, and brew-completion
//! detection. Everything here is a pure function over its inputs; all
//! mutable session state lives in the application layer.

use super::models::{Recipe, ScaledRecipe, ScaledStep};

/// Seconds past the final step's offset before a brew counts as done
/// and the session auto-resets.
pub const COMPLETION_GRACE_SECS: u32 = 5;

/// Scales a recipe's quantities and step targets for one concrete brew.
///
/// Two knobs combine here: the batch-size `multiplier` applies uniformly
/// to coffee, water, ice, and every step target; an optional water
/// override replaces the multiplier-scaled water mass and rescales the
/// step targets proportionally, so the guide tracks the water actually
/// poured without hand-editing each step.
///
/// # Examples
///
/// ```
/// use tbrew::domain::{BrewMode, RecipeCatalog, RecipeScaler};
///
/// let recipe = RecipeCatalog::get(BrewMode::Hot);
///
/// let full = RecipeScaler::scale(recipe, 1.0, None);
/// assert_eq!(full.coffee_g, 30.0);
/// assert_eq!(full.water_g, 500.0);
/// assert_eq!(full.steps[1].water_g, 150);
///
/// // 600g actually poured against a 500g default: every target grows 1.2x
/// let adjusted = RecipeScaler::scale(recipe, 1.0, Some(600.0));
/// assert_eq!(adjusted.steps[1].water_g, 180);
/// ```
pub struct RecipeScaler;

impl RecipeScaler {
    /// Derives a [`ScaledRecipe`] from a base recipe, a batch multiplier,
    /// and an optional explicit water mass.
    ///
    /// The proportional factor is `water / (base water * multiplier)`;
    /// when that denominator is not positive the factor falls back to 1,
    /// so a zero-water recipe scales without error.
    ///
    /// Pure and deterministic. Callers are responsible for rejecting
    /// non-positive multipliers before they get here.
    pub fn scale(recipe: &Recipe, multiplier: f64, water_override: Option<f64>) -> ScaledRecipe {
        let coffee_g = recipe.coffee_g * multiplier;
        let base_water_g = recipe.water_g * multiplier;
        let water_g = water_override.unwrap_or(base_water_g);
        let ice_g = recipe.ice_g * multiplier;

        let scale_factor = if base_water_g > 0.0 {
            water_g / base_water_g
        } else {
            1.0
        };

        let steps = recipe
            .steps
            .iter()
            .map(|step| ScaledStep {
                offset_secs: step.offset_secs,
                instruction: step.instruction.clone(),
                water_g: (step.water_g as f64 * multiplier * scale_factor).round() as u32,
            })
            .collect();

        ScaledRecipe {
            coffee_g,
            water_g,
            ice_g,
            steps,
        }
    }
}

/// Derives the active step index from elapsed time.
pub struct StepTracker;

impl StepTracker {
    /// Returns the largest index whose offset has been reached, but never
    /// less than `current_index`.
    ///
    /// The loop keeps advancing until the next boundary fails, so the
    /// index converges in a single call even when elapsed time has jumped
    /// past several step boundaries since the last evaluation. The result
    /// is monotonic in `current_index` and idempotent for a fixed
    /// `elapsed_secs`.
    ///
    /// # Examples
    ///
    /// ```
    /// use tbrew::domain::{BrewMode, RecipeCatalog, RecipeScaler, StepTracker};
    ///
    /// let scaled = RecipeScaler::scale(RecipeCatalog::get(BrewMode::Hot), 1.0, None);
    /// assert_eq!(StepTracker::advance(&scaled.steps, 0, 0), 0);
    /// assert_eq!(StepTracker::advance(&scaled.steps, 80, 0), 2);
    /// ```
    pub fn advance(steps: &[ScaledStep], elapsed_secs: u32, current_index: usize) -> usize {
        let mut index = current_index;
        while let Some(next) = steps.get(index + 1) {
            if next.offset_secs <= elapsed_secs {
                index += 1;
            } else {
                break;
            }
        }
        index
    }
}

/// Detects the end of a brew: the final step has been active for the
/// grace period.
pub struct CompletionDetector;

impl CompletionDetector {
    /// True once a running session has sat on the last step for
    /// `grace_secs` past that step's offset. The controller reacts by
    /// performing a full stop and reset; this predicate is the only
    /// automatic path from running back to idle.
    ///
    /// # Examples
    ///
    /// ```
    /// use tbrew::domain::CompletionDetector;
    ///
    /// assert!(!CompletionDetector::is_complete(true, 5, 5, 214, 210, 5));
    /// assert!(CompletionDetector::is_complete(true, 5, 5, 215, 210, 5));
    /// ```
    pub fn is_complete(
        running: bool,
        current_index: usize,
        last_index: usize,
        elapsed_secs: u32,
        last_offset_secs: u32,
        grace_secs: u32,
    ) -> bool {
        running && current_index == last_index && elapsed_secs >= last_offset_secs + grace_secs
    }
}
