//! Pet catalogs and per-variant onboarding settings.
//!
//! Each app variant differs only in its pet lineup, goal presets and wheel
//! labels. They are static lookup tables selected at startup.

use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::model::Pet;

/// Which variant of the app is being served.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogVariant {
    /// Cat, turtle, fox, axolotl.
    #[default]
    Critters,
    /// Cat, dog, cow, pig.
    Farm,
}

impl FromStr for CatalogVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "critters" => Ok(Self::Critters),
            "farm" => Ok(Self::Farm),
            other => Err(format!("unknown variant '{other}' (expected critters or farm)")),
        }
    }
}

/// One selectable pet with its presentation data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PetEntry {
    pub pet: Pet,
    pub display_name: String,
    pub image_ref: String,
}

impl PetEntry {
    fn new(pet: Pet, display_name: &str) -> Self {
        Self {
            pet,
            display_name: display_name.to_string(),
            image_ref: format!("/static/images/{pet}.png"),
        }
    }
}

/// The pets offered by a variant, in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PetCatalog {
    entries: Vec<PetEntry>,
}

impl PetCatalog {
    pub fn for_variant(variant: CatalogVariant) -> Self {
        let entries = match variant {
            CatalogVariant::Critters => vec![
                PetEntry::new(Pet::Cat, "Whiskers the Cat"),
                PetEntry::new(Pet::Turtle, "Tortino The Turtle"),
                PetEntry::new(Pet::Fox, "Foxy"),
                PetEntry::new(Pet::Axolotl, "Axy"),
            ],
            // Placeholder names beyond the cat; swap in final copy when it exists.
            CatalogVariant::Farm => vec![
                PetEntry::new(Pet::Cat, "Whiskers the Cat"),
                PetEntry::new(Pet::Dog, "Biscuit the Dog"),
                PetEntry::new(Pet::Cow, "Daisy the Cow"),
                PetEntry::new(Pet::Pig, "Penny the Pig"),
            ],
        };
        Self { entries }
    }

    pub fn entries(&self) -> &[PetEntry] {
        &self.entries
    }

    pub fn entry(&self, pet: Pet) -> Option<&PetEntry> {
        self.entries.iter().find(|e| e.pet == pet)
    }

    pub fn contains(&self, pet: Pet) -> bool {
        self.entry(pet).is_some()
    }

    pub fn pets(&self) -> impl Iterator<Item = Pet> + '_ {
        self.entries.iter().map(|e| e.pet)
    }
}

/// Everything a controller needs to know about the active variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OnboardingSettings {
    pub variant: CatalogVariant,
    pub catalog: PetCatalog,
    pub currency_symbol: String,
    /// Quick-pick amounts shown on the monthly goal page.
    pub goal_presets: Vec<Decimal>,
    /// Segment labels for the profile page spin wheel.
    pub wheel_labels: Vec<String>,
}

impl OnboardingSettings {
    pub fn for_variant(variant: CatalogVariant) -> Self {
        // Placeholder presets and wheel prizes; override presets via config.
        let (goal_presets, wheel_labels) = match variant {
            CatalogVariant::Critters => (
                vec![dec!(100), dec!(250), dec!(500), dec!(1000)],
                vec!["Hat", "Scarf", "Sunglasses", "Bow Tie", "Crown", "Cape"],
            ),
            CatalogVariant::Farm => (
                vec![dec!(200), dec!(500), dec!(1000), dec!(2000)],
                vec!["Bell", "Bandana", "Straw Hat", "Flower", "Saddle", "Boots"],
            ),
        };
        Self {
            variant,
            catalog: PetCatalog::for_variant(variant),
            currency_symbol: "₹".to_string(),
            goal_presets,
            wheel_labels: wheel_labels.into_iter().map(String::from).collect(),
        }
    }

    pub fn with_currency_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.currency_symbol = symbol.into();
        self
    }

    pub fn with_goal_presets(mut self, presets: Vec<Decimal>) -> Self {
        self.goal_presets = presets;
        self
    }
}

impl Default for OnboardingSettings {
    fn default() -> Self {
        Self::for_variant(CatalogVariant::default())
    }
}
