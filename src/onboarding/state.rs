//! Onboarding state machine: which step a page belongs to.
//!
//! The step is never persisted. It is derived from the request path on every
//! page view.

use serde::{Deserialize, Serialize};

/// The steps of the onboarding wizard.
///
/// Progresses linearly: PetSelection → MonthlyGoal → DailyBudget → Profile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    #[default]
    PetSelection,
    MonthlyGoal,
    DailyBudget,
    Profile,
}

impl Step {
    pub const ALL: [Step; 4] = [
        Step::PetSelection,
        Step::MonthlyGoal,
        Step::DailyBudget,
        Step::Profile,
    ];

    /// Map a location path to its step. Unknown paths fall back to
    /// `PetSelection`.
    pub fn resolve(path: &str) -> Step {
        let path = path.split(['?', '#']).next().unwrap_or("");
        let trimmed = path.trim_end_matches('/');
        Step::ALL
            .into_iter()
            .find(|step| step.path().trim_end_matches('/') == trimmed)
            .unwrap_or_default()
    }

    /// The page path for this step.
    pub fn path(&self) -> &'static str {
        match self {
            Self::PetSelection => "/",
            Self::MonthlyGoal => "/monthly-goal",
            Self::DailyBudget => "/daily-budget",
            Self::Profile => "/profile",
        }
    }

    /// Check if a transition from `self` to `target` is valid.
    pub fn can_transition_to(&self, target: Step) -> bool {
        self.next() == Some(target)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Profile)
    }

    /// Get the next step in the linear progression, if any.
    pub fn next(&self) -> Option<Step> {
        match self {
            Self::PetSelection => Some(Self::MonthlyGoal),
            Self::MonthlyGoal => Some(Self::DailyBudget),
            Self::DailyBudget => Some(Self::Profile),
            Self::Profile => None,
        }
    }

    /// Pages that need a signed-in owner when the store is per-user.
    pub fn is_protected(&self) -> bool {
        !matches!(self, Self::PetSelection)
    }

    /// Position in the wizard as a percentage, for the progress bar.
    pub fn progress_percent(&self) -> u8 {
        match self {
            Self::PetSelection => 25,
            Self::MonthlyGoal => 50,
            Self::DailyBudget => 75,
            Self::Profile => 100,
        }
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::PetSelection => "pet_selection",
            Self::MonthlyGoal => "monthly_goal",
            Self::DailyBudget => "daily_budget",
            Self::Profile => "profile",
        };
        write!(f, "{s}")
    }
}

/// A forward move produced by a successful step action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Advance {
    pub from: Step,
    pub next: Step,
}

impl Advance {
    /// Move from `from` to `next`. Only forward single-step moves exist.
    pub fn to(from: Step, next: Step) -> Self {
        debug_assert!(
            from.can_transition_to(next),
            "invalid transition {from} -> {next}"
        );
        Self { from, next }
    }

    pub fn path(&self) -> &'static str {
        self.next.path()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_known_paths() {
        assert_eq!(Step::resolve("/"), Step::PetSelection);
        assert_eq!(Step::resolve("/monthly-goal"), Step::MonthlyGoal);
        assert_eq!(Step::resolve("/daily-budget"), Step::DailyBudget);
        assert_eq!(Step::resolve("/profile"), Step::Profile);
    }

    #[test]
    fn unknown_paths_fall_back_to_pet_selection() {
        assert_eq!(Step::resolve("/unknown/path"), Step::PetSelection);
        assert_eq!(Step::resolve(""), Step::PetSelection);
        assert_eq!(Step::resolve("/profile/extra"), Step::PetSelection);
    }

    #[test]
    fn resolve_ignores_trailing_slash_and_query() {
        assert_eq!(Step::resolve("/profile/"), Step::Profile);
        assert_eq!(Step::resolve("/daily-budget?ref=home"), Step::DailyBudget);
        assert_eq!(Step::resolve("/monthly-goal#top"), Step::MonthlyGoal);
    }

    #[test]
    fn path_round_trips_through_resolve() {
        for step in Step::ALL {
            assert_eq!(Step::resolve(step.path()), step);
        }
    }

    #[test]
    fn transitions_are_strictly_forward() {
        use Step::*;
        assert!(PetSelection.can_transition_to(MonthlyGoal));
        assert!(MonthlyGoal.can_transition_to(DailyBudget));
        assert!(DailyBudget.can_transition_to(Profile));
        // Skip
        assert!(!PetSelection.can_transition_to(DailyBudget));
        // Backward
        assert!(!DailyBudget.can_transition_to(MonthlyGoal));
        // Self
        assert!(!MonthlyGoal.can_transition_to(MonthlyGoal));
        // Terminal
        assert!(!Profile.can_transition_to(PetSelection));
    }

    #[test]
    fn next_walks_all_steps() {
        let mut current = Step::PetSelection;
        for expected in &Step::ALL[1..] {
            let next = current.next().unwrap();
            assert_eq!(next, *expected);
            current = next;
        }
        assert!(current.is_terminal());
        assert!(current.next().is_none());
    }

    #[test]
    fn advance_records_both_ends() {
        let advance = Advance::to(Step::DailyBudget, Step::Profile);
        assert_eq!(advance.from, Step::DailyBudget);
        assert_eq!(advance.path(), "/profile");
    }

    #[test]
    #[should_panic(expected = "invalid transition")]
    #[cfg(debug_assertions)]
    fn advance_rejects_skipping_steps() {
        Advance::to(Step::PetSelection, Step::Profile);
    }

    #[test]
    fn only_first_step_is_public() {
        assert!(!Step::PetSelection.is_protected());
        assert!(Step::MonthlyGoal.is_protected());
        assert!(Step::DailyBudget.is_protected());
        assert!(Step::Profile.is_protected());
    }

    #[test]
    fn display_matches_serde() {
        for step in Step::ALL {
            let json = serde_json::to_string(&step).unwrap();
            assert_eq!(format!("\"{step}\""), json);
        }
    }
}
