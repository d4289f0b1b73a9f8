//! Page and REST endpoints for the onboarding wizard.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tower_http::cors::CorsLayer;
use tracing::debug;

use crate::error::ValidationError;
use crate::store::{OwnerKey, ProfileStore};

use super::catalog::OnboardingSettings;
use super::controller::{OnboardingController, ProfileEntry};
use super::model::{OnboardingProfile, Pet};
use super::rewards::SpinWheel;
use super::state::{Advance, Step};

/// Header carrying the signed-in user's id.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Shared state for onboarding routes.
#[derive(Clone)]
pub struct OnboardingRouteState {
    pub store: Arc<dyn ProfileStore>,
    pub settings: Arc<OnboardingSettings>,
}

impl OnboardingRouteState {
    pub fn new(store: Arc<dyn ProfileStore>, settings: OnboardingSettings) -> Self {
        Self {
            store,
            settings: Arc::new(settings),
        }
    }

    /// The owner for this request, or `None` if the store needs a user id
    /// and none was sent.
    fn owner(&self, headers: &HeaderMap) -> Option<OwnerKey> {
        if !self.store.requires_identity() {
            return Some(OwnerKey::device());
        }
        headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(OwnerKey::new)
    }

    async fn controller(&self, owner: OwnerKey) -> OnboardingController {
        OnboardingController::load(Arc::clone(&self.store), owner, Arc::clone(&self.settings)).await
    }
}

// ── Helpers ─────────────────────────────────────────────────────────────

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(serde_json::json!({"error": "Sign in required"})),
    )
        .into_response()
}

fn validation_failed(err: ValidationError) -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(serde_json::json!({"error": err.to_string(), "kind": err.kind()})),
    )
        .into_response()
}

fn advanced(advance: Advance) -> Response {
    Json(serde_json::json!({"next": advance.next, "path": advance.path()})).into_response()
}

// ── Pages ───────────────────────────────────────────────────────────────

/// GET for any page path. The step comes from the path alone; unknown paths
/// render the pet selection page.
async fn page(State(state): State<OnboardingRouteState>, headers: HeaderMap, uri: Uri) -> Response {
    let step = OnboardingController::resolve_step(uri.path());

    let Some(owner) = state.owner(&headers) else {
        if step.is_protected() {
            debug!(%step, "Unauthenticated page request, redirecting");
            return Redirect::to(Step::PetSelection.path()).into_response();
        }
        let ctl = OnboardingController::with_profile(
            Arc::clone(&state.store),
            OwnerKey::new("anonymous"),
            Arc::clone(&state.settings),
            OnboardingProfile::default(),
        );
        return Json(ctl.page(step)).into_response();
    };

    let ctl = state.controller(owner).await;
    if step.is_terminal() {
        if let ProfileEntry::Redirect { path, .. } = ctl.enter_profile() {
            return Redirect::to(path).into_response();
        }
    }
    Json(ctl.page(step)).into_response()
}

// ── API ─────────────────────────────────────────────────────────────────

/// GET /api/onboarding/status
async fn get_status(State(state): State<OnboardingRouteState>, headers: HeaderMap) -> Response {
    let Some(owner) = state.owner(&headers) else {
        return unauthorized();
    };
    let ctl = state.controller(owner).await;
    Json(serde_json::json!({
        "step": ctl.resume_step(),
        "complete": ctl.is_complete(),
        "profile": ctl.profile(),
    }))
    .into_response()
}

#[derive(Debug, Deserialize)]
struct PetRequest {
    pet: String,
}

/// POST /api/onboarding/pet
async fn select_pet(
    State(state): State<OnboardingRouteState>,
    headers: HeaderMap,
    Json(body): Json<PetRequest>,
) -> Response {
    let Some(owner) = state.owner(&headers) else {
        return unauthorized();
    };
    let pet = match body.pet.parse::<Pet>() {
        Ok(pet) => pet,
        Err(unknown) => return validation_failed(ValidationError::UnknownPet(unknown)),
    };
    let mut ctl = state.controller(owner).await;
    match ctl.apply_pet_selection(pet).await {
        Ok(label) => Json(serde_json::json!({"pet": pet, "continue_label": label})).into_response(),
        Err(e) => validation_failed(e),
    }
}

/// POST /api/onboarding/continue
async fn continue_from_pet(
    State(state): State<OnboardingRouteState>,
    headers: HeaderMap,
) -> Response {
    let Some(owner) = state.owner(&headers) else {
        return unauthorized();
    };
    let ctl = state.controller(owner).await;
    match ctl.continue_from_pet_selection() {
        Some(advance) => advanced(advance),
        None => (
            StatusCode::CONFLICT,
            Json(serde_json::json!({"error": "Pick a pet first"})),
        )
            .into_response(),
    }
}

/// Raw amount input. Accepts a JSON string or number.
#[derive(Debug, Deserialize)]
struct AmountRequest {
    #[serde(default)]
    amount: serde_json::Value,
}

impl AmountRequest {
    fn raw(&self) -> String {
        match &self.amount {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Number(n) => n.to_string(),
            _ => String::new(),
        }
    }
}

/// POST /api/onboarding/monthly-goal
async fn submit_monthly_goal(
    State(state): State<OnboardingRouteState>,
    headers: HeaderMap,
    Json(body): Json<AmountRequest>,
) -> Response {
    let Some(owner) = state.owner(&headers) else {
        return unauthorized();
    };
    let mut ctl = state.controller(owner).await;
    match ctl.submit_monthly_goal(&body.raw()).await {
        Ok(advance) => advanced(advance),
        Err(e) => validation_failed(e),
    }
}

/// POST /api/onboarding/daily-budget
async fn submit_daily_budget(
    State(state): State<OnboardingRouteState>,
    headers: HeaderMap,
    Json(body): Json<AmountRequest>,
) -> Response {
    let Some(owner) = state.owner(&headers) else {
        return unauthorized();
    };
    let mut ctl = state.controller(owner).await;
    match ctl.submit_daily_budget(&body.raw()).await {
        Ok(advance) => advanced(advance),
        Err(e) => validation_failed(e),
    }
}

/// POST /api/rewards/spin
///
/// Only offered on a complete profile. The outcome is not saved.
async fn spin_wheel(State(state): State<OnboardingRouteState>, headers: HeaderMap) -> Response {
    let Some(owner) = state.owner(&headers) else {
        return unauthorized();
    };
    let ctl = state.controller(owner).await;
    if !ctl.is_complete() {
        return (
            StatusCode::CONFLICT,
            Json(serde_json::json!({"error": "Finish onboarding to unlock the wheel"})),
        )
            .into_response();
    }
    let wheel = SpinWheel::new(state.settings.wheel_labels.clone());
    let outcome = wheel.spin(&mut rand::thread_rng());
    match outcome {
        Some(outcome) => Json(outcome).into_response(),
        None => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(serde_json::json!({"error": "No rewards configured"})),
        )
            .into_response(),
    }
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "coin-critters"
    }))
}

/// Build the onboarding page and REST routes.
pub fn onboarding_routes(state: OnboardingRouteState) -> Router {
    Router::new()
        .route("/", get(page))
        .route("/monthly-goal", get(page))
        .route("/daily-budget", get(page))
        .route("/profile", get(page))
        .route("/health", get(health))
        .route("/api/onboarding/status", get(get_status))
        .route("/api/onboarding/pet", post(select_pet))
        .route("/api/onboarding/continue", post(continue_from_pet))
        .route("/api/onboarding/monthly-goal", post(submit_monthly_goal))
        .route("/api/onboarding/daily-budget", post(submit_daily_budget))
        .route("/api/rewards/spin", post(spin_wheel))
        .fallback(page)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
