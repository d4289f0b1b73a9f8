//! OnboardingController: validates step input, merges it into the profile,
//! writes through the store, and decides where the user goes next.
//!
//! A controller lives for one page view. It is built by awaiting the initial
//! load, so nothing renders from a partial profile.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::ValidationError;
use crate::store::{OwnerKey, ProfileStore};

use super::catalog::{OnboardingSettings, PetEntry};
use super::model::{OnboardingProfile, Pet, ProfilePatch, ProfileView};
use super::state::{Advance, Step};
use super::validation::{
    MAX_DAILY_BUDGET, MAX_MONTHLY_GOAL, daily_quick_picks, parse_amount, suggested_daily_budget,
};

/// Delay before the cosmetic progress bar animates in.
pub const PROGRESS_DELAY_MS: u64 = 100;

/// What the profile page shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProfileEntry {
    View(ProfileView),
    /// The profile is incomplete; send the user back to this step.
    Redirect { step: Step, path: &'static str },
}

/// Step-specific payload of a page view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PageContent {
    PetSelection {
        pets: Vec<PetEntry>,
        selected: Option<Pet>,
        continue_label: Option<String>,
    },
    MonthlyGoal {
        presets: Vec<Decimal>,
        current: Option<Decimal>,
        max: Decimal,
        currency_symbol: String,
    },
    DailyBudget {
        quick_picks: Vec<Decimal>,
        suggestion: Option<Decimal>,
        current: Option<Decimal>,
        max: Decimal,
        currency_symbol: String,
    },
    Profile {
        entry: ProfileEntry,
    },
}

/// Everything a page needs to bind its UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageView {
    pub step: Step,
    pub path: &'static str,
    pub progress_percent: u8,
    pub progress_delay_ms: u64,
    pub content: PageContent,
}

/// Owns the in-memory profile for one page view.
pub struct OnboardingController {
    store: Arc<dyn ProfileStore>,
    owner: OwnerKey,
    settings: Arc<OnboardingSettings>,
    profile: OnboardingProfile,
}

impl OnboardingController {
    /// Load the owner's profile and build a controller around it.
    ///
    /// A missing profile starts empty. A store failure also starts empty and
    /// is logged; it never fails the page.
    pub async fn load(
        store: Arc<dyn ProfileStore>,
        owner: OwnerKey,
        settings: Arc<OnboardingSettings>,
    ) -> Self {
        let profile = match store.get(&owner).await {
            Ok(Some(profile)) => profile,
            Ok(None) => {
                debug!(%owner, store = store.name(), "No saved profile, starting fresh");
                OnboardingProfile::default()
            }
            Err(e) => {
                warn!(%owner, store = store.name(), error = %e, "Failed to load profile, starting empty");
                OnboardingProfile::default()
            }
        };

        Self {
            store,
            owner,
            settings,
            profile,
        }
    }

    /// Build a controller around an already-known profile, skipping the load.
    pub fn with_profile(
        store: Arc<dyn ProfileStore>,
        owner: OwnerKey,
        settings: Arc<OnboardingSettings>,
        profile: OnboardingProfile,
    ) -> Self {
        Self {
            store,
            owner,
            settings,
            profile,
        }
    }

    /// Map a location path to its step.
    pub fn resolve_step(path: &str) -> Step {
        Step::resolve(path)
    }

    pub fn profile(&self) -> &OnboardingProfile {
        &self.profile
    }

    pub fn settings(&self) -> &OnboardingSettings {
        &self.settings
    }

    pub fn is_complete(&self) -> bool {
        self.profile.is_complete()
    }

    /// First step whose field is still unset; `Profile` once complete.
    pub fn resume_step(&self) -> Step {
        if self.profile.selected_pet.is_none() {
            Step::PetSelection
        } else if self.profile.monthly_goal.is_none() {
            Step::MonthlyGoal
        } else if self.profile.daily_budget.is_none() {
            Step::DailyBudget
        } else {
            Step::Profile
        }
    }

    /// Merge a patch and write the whole profile back.
    ///
    /// Write failures are logged; the in-memory profile stays authoritative.
    async fn update_data(&mut self, patch: ProfilePatch) {
        self.profile.merge(patch);
        if let Err(e) = self.store.put(&self.owner, &self.profile).await {
            warn!(owner = %self.owner, store = self.store.name(), error = %e, "Failed to save profile");
        }
    }

    // ── Pet selection ───────────────────────────────────────────────

    /// Select a pet from the active catalog and save it immediately.
    ///
    /// Returns the new continue-button label. Does not advance.
    pub async fn apply_pet_selection(&mut self, pet: Pet) -> Result<String, ValidationError> {
        if !self.settings.catalog.contains(pet) {
            return Err(ValidationError::UnknownPet(pet.to_string()));
        }
        self.update_data(ProfilePatch::pet(pet)).await;
        info!(owner = %self.owner, %pet, "Pet selected");
        Ok(self
            .continue_label()
            .unwrap_or_else(|| "Continue".to_string()))
    }

    /// "Continue with {display name}" for the selected pet, if any.
    pub fn continue_label(&self) -> Option<String> {
        let pet = self.profile.selected_pet?;
        let name = self
            .settings
            .catalog
            .entry(pet)
            .map(|e| e.display_name.clone())
            .unwrap_or_else(|| pet.to_string());
        Some(format!("Continue with {name}"))
    }

    /// Continue from pet selection. A no-op (`None`) until a pet is chosen.
    pub fn continue_from_pet_selection(&self) -> Option<Advance> {
        self.profile
            .selected_pet
            .map(|_| Advance::to(Step::PetSelection, Step::MonthlyGoal))
    }

    // ── Monthly goal ────────────────────────────────────────────────

    pub fn monthly_goal_presets(&self) -> &[Decimal] {
        &self.settings.goal_presets
    }

    /// Validate and save the monthly goal, then advance to the daily budget.
    pub async fn submit_monthly_goal(&mut self, raw: &str) -> Result<Advance, ValidationError> {
        let amount = parse_amount(raw, MAX_MONTHLY_GOAL)?;
        self.update_data(ProfilePatch::monthly_goal(amount)).await;
        info!(owner = %self.owner, %amount, "Monthly goal set");
        Ok(Advance::to(Step::MonthlyGoal, Step::DailyBudget))
    }

    // ── Daily budget ────────────────────────────────────────────────

    /// Monthly goal spread over 30 days, if a goal is set.
    pub fn suggested_daily_budget(&self) -> Option<Decimal> {
        self.profile.monthly_goal.map(suggested_daily_budget)
    }

    pub fn daily_budget_quick_picks(&self) -> Vec<Decimal> {
        daily_quick_picks(self.suggested_daily_budget())
    }

    /// Validate and save the daily budget, then advance to the profile.
    pub async fn submit_daily_budget(&mut self, raw: &str) -> Result<Advance, ValidationError> {
        let amount = parse_amount(raw, MAX_DAILY_BUDGET)?;
        self.update_data(ProfilePatch::daily_budget(amount)).await;
        info!(owner = %self.owner, %amount, "Daily budget set");
        Ok(Advance::to(Step::DailyBudget, Step::Profile))
    }

    // ── Profile ─────────────────────────────────────────────────────

    /// Build the profile read model, or redirect to the start if any field
    /// is missing.
    pub fn enter_profile(&self) -> ProfileEntry {
        let redirect = ProfileEntry::Redirect {
            step: Step::PetSelection,
            path: Step::PetSelection.path(),
        };
        if !self.is_complete() {
            debug!(owner = %self.owner, "Profile incomplete, redirecting");
            return redirect;
        }
        let (Some(pet), Some(goal), Some(budget)) = (
            self.profile.selected_pet,
            self.profile.monthly_goal,
            self.profile.daily_budget,
        ) else {
            return redirect;
        };
        // A stored pet from another variant's catalog cannot be shown.
        let Some(entry) = self.settings.catalog.entry(pet) else {
            warn!(owner = %self.owner, %pet, "Stored pet is not in the active catalog");
            return redirect;
        };

        ProfileEntry::View(ProfileView::new(
            pet,
            &entry.display_name,
            &entry.image_ref,
            goal,
            budget,
            &self.settings.currency_symbol,
        ))
    }

    // ── Page bindings ───────────────────────────────────────────────

    /// Bindings for the page at `step`.
    pub fn page(&self, step: Step) -> PageView {
        let content = match step {
            Step::PetSelection => PageContent::PetSelection {
                pets: self.settings.catalog.entries().to_vec(),
                selected: self.profile.selected_pet,
                continue_label: self.continue_label(),
            },
            Step::MonthlyGoal => PageContent::MonthlyGoal {
                presets: self.monthly_goal_presets().to_vec(),
                current: self.profile.monthly_goal,
                max: MAX_MONTHLY_GOAL,
                currency_symbol: self.settings.currency_symbol.clone(),
            },
            Step::DailyBudget => PageContent::DailyBudget {
                quick_picks: self.daily_budget_quick_picks(),
                suggestion: self.suggested_daily_budget(),
                current: self.profile.daily_budget,
                max: MAX_DAILY_BUDGET,
                currency_symbol: self.settings.currency_symbol.clone(),
            },
            Step::Profile => PageContent::Profile {
                entry: self.enter_profile(),
            },
        };

        PageView {
            step,
            path: step.path(),
            progress_percent: step.progress_percent(),
            progress_delay_ms: PROGRESS_DELAY_MS,
            content,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::onboarding::catalog::CatalogVariant;
    use crate::store::LocalProfileStore;
    use async_trait::async_trait;
    use rust_decimal_macros::dec;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Store whose every call fails, counting writes.
    struct BrokenStore {
        puts: AtomicUsize,
    }

    #[async_trait]
    impl ProfileStore for BrokenStore {
        fn name(&self) -> &'static str {
            "broken"
        }
        fn requires_identity(&self) -> bool {
            false
        }
        async fn get(&self, _owner: &OwnerKey) -> Result<Option<OnboardingProfile>, StoreError> {
            Err(StoreError::Query("connection refused".into()))
        }
        async fn put(&self, _owner: &OwnerKey, _p: &OnboardingProfile) -> Result<(), StoreError> {
            self.puts.fetch_add(1, Ordering::SeqCst);
            Err(StoreError::Query("connection refused".into()))
        }
    }

    fn settings() -> Arc<OnboardingSettings> {
        Arc::new(OnboardingSettings::for_variant(CatalogVariant::Critters))
    }

    async fn fresh(store: &Arc<LocalProfileStore>) -> OnboardingController {
        let store: Arc<dyn ProfileStore> = store.clone();
        OnboardingController::load(store, OwnerKey::device(), settings()).await
    }

    #[test]
    fn resolve_step_is_total() {
        assert_eq!(
            OnboardingController::resolve_step("/daily-budget/"),
            Step::DailyBudget
        );
        assert_eq!(
            OnboardingController::resolve_step("/nowhere"),
            Step::PetSelection
        );
    }

    #[tokio::test]
    async fn selected_pet_survives_reload_for_every_catalog_pet() {
        for pet in settings().catalog.pets() {
            let store = Arc::new(LocalProfileStore::in_memory());
            let mut ctl = fresh(&store).await;
            ctl.apply_pet_selection(pet).await.unwrap();

            let reloaded = fresh(&store).await;
            assert_eq!(reloaded.profile().selected_pet, Some(pet));
        }
    }

    #[tokio::test]
    async fn pet_outside_catalog_is_rejected() {
        let store = Arc::new(LocalProfileStore::in_memory());
        let mut ctl = fresh(&store).await;
        let err = ctl.apply_pet_selection(Pet::Cow).await.unwrap_err();
        assert_eq!(err, ValidationError::UnknownPet("cow".into()));
        assert!(ctl.profile().selected_pet.is_none());
    }

    #[tokio::test]
    async fn pet_selection_updates_continue_label_without_advancing() {
        let store = Arc::new(LocalProfileStore::in_memory());
        let mut ctl = fresh(&store).await;
        assert!(ctl.continue_from_pet_selection().is_none());
        assert!(ctl.continue_label().is_none());

        let label = ctl.apply_pet_selection(Pet::Turtle).await.unwrap();
        assert_eq!(label, "Continue with Tortino The Turtle");
        assert_eq!(
            ctl.continue_from_pet_selection(),
            Some(Advance::to(Step::PetSelection, Step::MonthlyGoal))
        );
    }

    #[tokio::test]
    async fn invalid_monthly_goals_leave_state_untouched() {
        let store = Arc::new(LocalProfileStore::in_memory());
        let mut ctl = fresh(&store).await;
        for raw in ["0", "-5", ""] {
            assert_eq!(
                ctl.submit_monthly_goal(raw).await,
                Err(ValidationError::EmptyOrNonPositive)
            );
        }
        assert_eq!(
            ctl.submit_monthly_goal("10001").await,
            Err(ValidationError::TooLarge { max: dec!(10000) })
        );
        assert!(ctl.profile().monthly_goal.is_none());
        assert!(store.get(&OwnerKey::device()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn monthly_goal_at_limit_advances() {
        let store = Arc::new(LocalProfileStore::in_memory());
        let mut ctl = fresh(&store).await;
        let advance = ctl.submit_monthly_goal("10000").await.unwrap();
        assert_eq!(advance.next, Step::DailyBudget);
        assert_eq!(advance.path(), "/daily-budget");
        assert_eq!(ctl.profile().monthly_goal, Some(dec!(10000)));
    }

    #[tokio::test]
    async fn daily_budget_bounds() {
        let store = Arc::new(LocalProfileStore::in_memory());
        let mut ctl = fresh(&store).await;
        assert_eq!(
            ctl.submit_daily_budget("501").await,
            Err(ValidationError::TooLarge { max: dec!(500) })
        );
        let advance = ctl.submit_daily_budget("500").await.unwrap();
        assert_eq!(advance.next, Step::Profile);
    }

    #[tokio::test]
    async fn suggestion_and_quick_picks_follow_goal() {
        let store = Arc::new(LocalProfileStore::in_memory());
        let mut ctl = fresh(&store).await;
        assert!(ctl.suggested_daily_budget().is_none());
        assert_eq!(ctl.daily_budget_quick_picks().len(), 3);

        ctl.submit_monthly_goal("300").await.unwrap();
        assert_eq!(ctl.suggested_daily_budget(), Some(dec!(10.0)));
        // 10 is already a fixed pick.
        assert_eq!(
            ctl.daily_budget_quick_picks(),
            vec![dec!(10), dec!(25), dec!(50)]
        );
    }

    #[tokio::test]
    async fn incomplete_profile_redirects_to_start() {
        let store = Arc::new(LocalProfileStore::in_memory());
        let mut ctl = fresh(&store).await;
        ctl.apply_pet_selection(Pet::Cat).await.unwrap();
        ctl.submit_monthly_goal("250").await.unwrap();

        assert!(!ctl.is_complete());
        assert_eq!(
            ctl.enter_profile(),
            ProfileEntry::Redirect {
                step: Step::PetSelection,
                path: "/"
            }
        );
    }

    #[tokio::test]
    async fn pet_from_other_variant_redirects() {
        let store = Arc::new(LocalProfileStore::in_memory());
        store
            .put(
                &OwnerKey::device(),
                &OnboardingProfile {
                    selected_pet: Some(Pet::Pig),
                    monthly_goal: Some(dec!(100)),
                    daily_budget: Some(dec!(5)),
                },
            )
            .await
            .unwrap();
        let ctl = fresh(&store).await;
        assert!(ctl.is_complete());
        assert!(matches!(ctl.enter_profile(), ProfileEntry::Redirect { .. }));
    }

    #[tokio::test]
    async fn full_flow_produces_profile_view() {
        let store = Arc::new(LocalProfileStore::in_memory());
        let mut ctl = fresh(&store).await;
        ctl.apply_pet_selection(Pet::Cat).await.unwrap();
        ctl.submit_monthly_goal("250").await.unwrap();
        assert_eq!(ctl.suggested_daily_budget(), Some(dec!(8.3)));
        ctl.submit_daily_budget("8.3").await.unwrap();

        let reloaded = fresh(&store).await;
        assert!(reloaded.is_complete());
        match reloaded.enter_profile() {
            ProfileEntry::View(view) => {
                assert_eq!(view.pet_display_name, "Whiskers the Cat");
                assert_eq!(view.pet_image_ref, "/static/images/cat.png");
                assert_eq!(view.monthly_goal_label, "₹250");
                assert_eq!(view.daily_budget_label, "₹8.3");
            }
            other => panic!("expected profile view, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn resume_step_tracks_first_missing_field() {
        let store = Arc::new(LocalProfileStore::in_memory());
        let mut ctl = fresh(&store).await;
        assert_eq!(ctl.resume_step(), Step::PetSelection);
        ctl.apply_pet_selection(Pet::Fox).await.unwrap();
        assert_eq!(ctl.resume_step(), Step::MonthlyGoal);
        ctl.submit_monthly_goal("90").await.unwrap();
        assert_eq!(ctl.resume_step(), Step::DailyBudget);
        ctl.submit_daily_budget("3").await.unwrap();
        assert_eq!(ctl.resume_step(), Step::Profile);
    }

    #[tokio::test]
    async fn read_failure_starts_empty() {
        let store: Arc<dyn ProfileStore> = Arc::new(BrokenStore {
            puts: AtomicUsize::new(0),
        });
        let ctl = OnboardingController::load(store, OwnerKey::device(), settings()).await;
        assert_eq!(ctl.profile(), &OnboardingProfile::default());
    }

    #[tokio::test]
    async fn write_failure_keeps_in_memory_state() {
        let broken = Arc::new(BrokenStore {
            puts: AtomicUsize::new(0),
        });
        let store: Arc<dyn ProfileStore> = broken.clone();
        let mut ctl = OnboardingController::load(store, OwnerKey::device(), settings()).await;

        ctl.apply_pet_selection(Pet::Fox).await.unwrap();
        let advance = ctl.submit_monthly_goal("120").await.unwrap();

        assert_eq!(advance.next, Step::DailyBudget);
        assert_eq!(ctl.profile().selected_pet, Some(Pet::Fox));
        assert_eq!(ctl.profile().monthly_goal, Some(dec!(120)));
        assert_eq!(broken.puts.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn page_bindings_per_step() {
        let store = Arc::new(LocalProfileStore::in_memory());
        let mut ctl = fresh(&store).await;
        ctl.submit_monthly_goal("250").await.unwrap();

        let pet_page = ctl.page(Step::PetSelection);
        assert_eq!(pet_page.path, "/");
        assert_eq!(pet_page.progress_delay_ms, PROGRESS_DELAY_MS);
        match pet_page.content {
            PageContent::PetSelection { pets, selected, .. } => {
                assert_eq!(pets.len(), 4);
                assert!(selected.is_none());
            }
            other => panic!("unexpected content {other:?}"),
        }

        let goal_page = ctl.page(Step::MonthlyGoal);
        match goal_page.content {
            PageContent::MonthlyGoal { presets, current, .. } => {
                assert_eq!(presets, ctl.monthly_goal_presets());
                assert_eq!(current, Some(dec!(250)));
            }
            other => panic!("unexpected content {other:?}"),
        }

        let budget_page = ctl.page(Step::DailyBudget);
        assert_eq!(budget_page.progress_percent, 75);
        match budget_page.content {
            PageContent::DailyBudget {
                quick_picks,
                suggestion,
                ..
            } => {
                assert_eq!(suggestion, Some(dec!(8.3)));
                assert!(quick_picks.contains(&dec!(8.3)));
            }
            other => panic!("unexpected content {other:?}"),
        }
    }
}
