//! Coin Critters: onboarding service for a gamified budgeting app.

pub mod config;
pub mod error;
pub mod onboarding;
pub mod store;
