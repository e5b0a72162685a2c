// ABOUTME: Request/response form flows for the workout planner and nutrition advisor
// ABOUTME: Explicit idle/loading/ready/failed state, one submission at a time, no reset
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FormCoach contributors

//! Workout planner and nutrition advisor flows.
//!
//! Each flow is a pure request/response round trip: collect a profile,
//! submit once, replace the displayed state with the decoded response or an
//! error message. A second submit simply repeats the cycle and replaces the
//! prior state; there is no reset operation.

use std::sync::Arc;
use tracing::{info, warn};

use crate::api::CoachApiClient;
use crate::models::{
    MealType, NutritionAdviceRequest, NutritionAdviceResponse, UserProfile, WorkoutPlanRequest,
    WorkoutPlanResponse,
};

/// Display state of a form flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowState<T> {
    /// Nothing submitted yet.
    Idle,
    /// A submission is awaiting the service; further submits are rejected.
    Loading,
    /// The last submission succeeded.
    Ready(T),
    /// The last submission failed; holds the user-visible message.
    Failed(String),
}

impl<T> FlowState<T> {
    /// True while a submission is outstanding (the form's disabled button).
    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

/// The workout planner form flow.
pub struct WorkoutPlanFlow {
    client: Arc<CoachApiClient>,
    state: FlowState<WorkoutPlanResponse>,
}

impl WorkoutPlanFlow {
    /// Create an idle flow over the given client.
    #[must_use]
    pub fn new(client: Arc<CoachApiClient>) -> Self {
        Self {
            client,
            state: FlowState::Idle,
        }
    }

    /// Current display state.
    #[must_use]
    pub fn state(&self) -> &FlowState<WorkoutPlanResponse> {
        &self.state
    }

    /// Submit the profile and replace the displayed state with the outcome.
    ///
    /// Rejected (no-op) while a previous submission is still loading.
    pub async fn submit(&mut self, profile: UserProfile) {
        if self.state.is_loading() {
            warn!("workout plan submit ignored, previous request still loading");
            return;
        }
        self.state = FlowState::Loading;

        let request = WorkoutPlanRequest::from_profile(profile);
        self.state = match self.client.workout_plan(&request).await {
            Ok(plan) => {
                info!(exercises = plan.total_exercises, "workout plan received");
                FlowState::Ready(plan)
            }
            Err(e) => FlowState::Failed(e.user_message()),
        };
    }
}

/// The nutrition advisor form flow.
pub struct NutritionAdviceFlow {
    client: Arc<CoachApiClient>,
    state: FlowState<NutritionAdviceResponse>,
}

impl NutritionAdviceFlow {
    /// Create an idle flow over the given client.
    #[must_use]
    pub fn new(client: Arc<CoachApiClient>) -> Self {
        Self {
            client,
            state: FlowState::Idle,
        }
    }

    /// Current display state.
    #[must_use]
    pub fn state(&self) -> &FlowState<NutritionAdviceResponse> {
        &self.state
    }

    /// Submit the profile for the given meal and replace the displayed state.
    ///
    /// Rejected (no-op) while a previous submission is still loading.
    pub async fn submit(&mut self, profile: UserProfile, meal_type: MealType) {
        if self.state.is_loading() {
            warn!("nutrition advice submit ignored, previous request still loading");
            return;
        }
        self.state = FlowState::Loading;

        let request = NutritionAdviceRequest::from_profile(profile, meal_type);
        self.state = match self.client.nutrition_advice(&request).await {
            Ok(advice) => {
                info!(meals = advice.nutrition_advice.len(), "nutrition advice received");
                FlowState::Ready(advice)
            }
            Err(e) => FlowState::Failed(e.user_message()),
        };
    }
}
