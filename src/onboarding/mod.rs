//! Onboarding wizard: pet, monthly goal, daily budget, then profile.
//!
//! Each page view builds an `OnboardingController` from the shared
//! `ProfileStore`, runs one step action, and writes the merged profile back.
//! Variants differ only in their `OnboardingSettings`.

pub mod catalog;
pub mod controller;
pub mod model;
pub mod rewards;
pub mod routes;
pub mod state;
pub mod validation;

pub use catalog::{CatalogVariant, OnboardingSettings, PetCatalog, PetEntry};
pub use controller::{OnboardingController, PageContent, PageView, ProfileEntry};
pub use model::{OnboardingProfile, Pet, ProfilePatch, ProfileView};
pub use rewards::{SpinOutcome, SpinWheel};
pub use routes::{OnboardingRouteState, USER_ID_HEADER, onboarding_routes};
pub use state::{Advance, Step};
