//! Onboarding profile and pet data models.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Every pet any catalog variant can offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pet {
    Cat,
    Turtle,
    Fox,
    Axolotl,
    Dog,
    Cow,
    Pig,
}

impl Pet {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cat => "cat",
            Self::Turtle => "turtle",
            Self::Fox => "fox",
            Self::Axolotl => "axolotl",
            Self::Dog => "dog",
            Self::Cow => "cow",
            Self::Pig => "pig",
        }
    }
}

impl std::fmt::Display for Pet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Pet {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cat" => Ok(Self::Cat),
            "turtle" => Ok(Self::Turtle),
            "fox" => Ok(Self::Fox),
            "axolotl" => Ok(Self::Axolotl),
            "dog" => Ok(Self::Dog),
            "cow" => Ok(Self::Cow),
            "pig" => Ok(Self::Pig),
            other => Err(other.to_string()),
        }
    }
}

/// The persisted onboarding record for one user or device.
///
/// Serializes to the flat local record shape:
/// `{ "selectedPet": ..., "monthlyGoal": ..., "dailyBudget": ... }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingProfile {
    #[serde(default)]
    pub selected_pet: Option<Pet>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub monthly_goal: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub daily_budget: Option<Decimal>,
}

impl OnboardingProfile {
    /// All three fields are set.
    ///
    /// A goal or budget of exactly zero counts as unset here. Validation
    /// never accepts zero, so this only matters for hand-edited records.
    pub fn is_complete(&self) -> bool {
        let set = |v: Option<Decimal>| v.is_some_and(|d| !d.is_zero());
        self.selected_pet.is_some() && set(self.monthly_goal) && set(self.daily_budget)
    }

    /// Merge a patch into this profile. Fields absent from the patch are kept.
    pub fn merge(&mut self, patch: ProfilePatch) {
        if let Some(pet) = patch.selected_pet {
            self.selected_pet = Some(pet);
        }
        if let Some(goal) = patch.monthly_goal {
            self.monthly_goal = Some(goal);
        }
        if let Some(budget) = patch.daily_budget {
            self.daily_budget = Some(budget);
        }
    }
}

/// A partial update produced by a single onboarding step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfilePatch {
    pub selected_pet: Option<Pet>,
    pub monthly_goal: Option<Decimal>,
    pub daily_budget: Option<Decimal>,
}

impl ProfilePatch {
    pub fn pet(pet: Pet) -> Self {
        Self {
            selected_pet: Some(pet),
            ..Default::default()
        }
    }

    pub fn monthly_goal(amount: Decimal) -> Self {
        Self {
            monthly_goal: Some(amount),
            ..Default::default()
        }
    }

    pub fn daily_budget(amount: Decimal) -> Self {
        Self {
            daily_budget: Some(amount),
            ..Default::default()
        }
    }
}

/// Read model for the profile page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileView {
    pub pet: Pet,
    pub pet_display_name: String,
    pub pet_image_ref: String,
    pub monthly_goal: Decimal,
    pub daily_budget: Decimal,
    pub currency_symbol: String,
    /// `monthly_goal` with the currency symbol, e.g. `₹250`.
    pub monthly_goal_label: String,
    /// `daily_budget` with the currency symbol, e.g. `₹8.3`.
    pub daily_budget_label: String,
}

impl ProfileView {
    pub fn new(
        pet: Pet,
        pet_display_name: &str,
        pet_image_ref: &str,
        monthly_goal: Decimal,
        daily_budget: Decimal,
        currency_symbol: &str,
    ) -> Self {
        Self {
            pet,
            pet_display_name: pet_display_name.to_string(),
            pet_image_ref: pet_image_ref.to_string(),
            monthly_goal,
            daily_budget,
            currency_symbol: currency_symbol.to_string(),
            monthly_goal_label: format_amount(currency_symbol, monthly_goal),
            daily_budget_label: format_amount(currency_symbol, daily_budget),
        }
    }
}

/// Format an amount with a currency symbol, dropping trailing zeros.
pub fn format_amount(currency_symbol: &str, amount: Decimal) -> String {
    format!("{currency_symbol}{}", amount.normalize())
}

/// Keys used by the local store.
pub mod storage_keys {
    /// Fixed key for the single-device local record.
    pub const DEVICE_PROFILE: &str = "coinCritters";
}
