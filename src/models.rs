// ABOUTME: Domain models shared across the trainer loop, form flows, and coach API wire format
// ABOUTME: Serde types mirror the coach service JSON contract exactly (snake_case fields)
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FormCoach contributors

//! Data model for the FormCoach client.
//!
//! Request types are constructed fresh per submission and serialized in the
//! exact shape the coach service expects; response types tolerate unknown
//! fields so the client keeps working when the service grows its payloads.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Exercise supported by the posture-analysis endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseType {
    Squat,
    Pushup,
    Plank,
    Lunge,
    Deadlift,
}

impl ExerciseType {
    /// All supported exercises, in menu order.
    pub const ALL: [Self; 5] = [
        Self::Squat,
        Self::Pushup,
        Self::Plank,
        Self::Lunge,
        Self::Deadlift,
    ];

    /// Wire name used in the `exercise_type` form field.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Squat => "squat",
            Self::Pushup => "pushup",
            Self::Plank => "plank",
            Self::Lunge => "lunge",
            Self::Deadlift => "deadlift",
        }
    }
}

impl fmt::Display for ExerciseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExerciseType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "squat" => Ok(Self::Squat),
            "pushup" | "push-up" => Ok(Self::Pushup),
            "plank" => Ok(Self::Plank),
            "lunge" => Ok(Self::Lunge),
            "deadlift" => Ok(Self::Deadlift),
            other => Err(format!(
                "unknown exercise '{other}' (expected one of: squat, pushup, plank, lunge, deadlift)"
            )),
        }
    }
}

/// One capture-and-analyze submission. Immutable; built fresh per cycle.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    /// JPEG frame bytes.
    pub image: Bytes,
    /// Exercise the frame should be judged against.
    pub exercise_type: ExerciseType,
}

impl AnalysisRequest {
    /// Create a request for one analysis cycle.
    #[must_use]
    pub fn new(image: Bytes, exercise_type: ExerciseType) -> Self {
        Self {
            image,
            exercise_type,
        }
    }
}

/// Posture analysis returned by `POST /analyze-posture`.
///
/// `analysis_time_ms` is a float on the wire (the service reports fractional
/// milliseconds); renderers round it for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostureAnalysis {
    /// Overall form quality in `[0, 1]`.
    pub form_score: f64,
    /// Whether the service judged the form acceptable.
    pub is_correct_form: bool,
    /// Model confidence in `[0, 1]`.
    pub confidence: f64,
    /// Ordered, human-readable correction hints.
    #[serde(default)]
    pub corrections: Vec<String>,
    /// Free-form coach feedback.
    #[serde(default)]
    pub feedback: String,
    /// Server-side analysis duration in milliseconds.
    pub analysis_time_ms: f64,
    /// Echo of the analyzed exercise type.
    pub exercise_type: String,
    /// Raw landmark positions, passed through opaquely when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_points: Option<serde_json::Value>,
}

/// Self-reported fitness level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FitnessLevel {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl fmt::Display for FitnessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        };
        f.write_str(name)
    }
}

impl FromStr for FitnessLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "beginner" => Ok(Self::Beginner),
            "intermediate" => Ok(Self::Intermediate),
            "advanced" => Ok(Self::Advanced),
            other => Err(format!(
                "unknown fitness level '{other}' (expected beginner, intermediate, or advanced)"
            )),
        }
    }
}

/// Training goal options offered by the planner form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitnessGoal {
    WeightLoss,
    MuscleGain,
    Strength,
    Endurance,
    Flexibility,
    GeneralFitness,
}

impl FromStr for FitnessGoal {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "weight_loss" => Ok(Self::WeightLoss),
            "muscle_gain" => Ok(Self::MuscleGain),
            "strength" => Ok(Self::Strength),
            "endurance" => Ok(Self::Endurance),
            "flexibility" => Ok(Self::Flexibility),
            "general_fitness" => Ok(Self::GeneralFitness),
            other => Err(format!("unknown fitness goal '{other}'")),
        }
    }
}

/// Equipment the user has available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Equipment {
    Bodyweight,
    Dumbbells,
    Barbell,
    ResistanceBands,
    Kettlebell,
    PullUpBar,
}

impl FromStr for Equipment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bodyweight" => Ok(Self::Bodyweight),
            "dumbbells" => Ok(Self::Dumbbells),
            "barbell" => Ok(Self::Barbell),
            "resistance_bands" => Ok(Self::ResistanceBands),
            "kettlebell" => Ok(Self::Kettlebell),
            "pull_up_bar" => Ok(Self::PullUpBar),
            other => Err(format!("unknown equipment '{other}'")),
        }
    }
}

/// Dietary restrictions for the nutrition advisor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DietaryRestriction {
    Vegetarian,
    Vegan,
    GlutenFree,
    DairyFree,
    Keto,
    Paleo,
    LowCarb,
    HighProtein,
}

impl FromStr for DietaryRestriction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "vegetarian" => Ok(Self::Vegetarian),
            "vegan" => Ok(Self::Vegan),
            "gluten_free" => Ok(Self::GlutenFree),
            "dairy_free" => Ok(Self::DairyFree),
            "keto" => Ok(Self::Keto),
            "paleo" => Ok(Self::Paleo),
            "low_carb" => Ok(Self::LowCarb),
            "high_protein" => Ok(Self::HighProtein),
            other => Err(format!("unknown dietary restriction '{other}'")),
        }
    }
}

/// Meal the nutrition advice should target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
    PreWorkout,
    PostWorkout,
    #[default]
    General,
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Breakfast => "breakfast",
            Self::Lunch => "lunch",
            Self::Dinner => "dinner",
            Self::Snack => "snack",
            Self::PreWorkout => "pre_workout",
            Self::PostWorkout => "post_workout",
            Self::General => "general",
        };
        f.write_str(name)
    }
}

impl FromStr for MealType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "breakfast" => Ok(Self::Breakfast),
            "lunch" => Ok(Self::Lunch),
            "dinner" => Ok(Self::Dinner),
            "snack" => Ok(Self::Snack),
            "pre_workout" => Ok(Self::PreWorkout),
            "post_workout" => Ok(Self::PostWorkout),
            "general" => Ok(Self::General),
            other => Err(format!("unknown meal type '{other}'")),
        }
    }
}

/// User profile collected by the planner and nutrition forms.
///
/// No client-side validation beyond the field types; the service validates
/// semantics.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UserProfile {
    /// Age in years, if the user filled it in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    /// Self-reported level.
    pub fitness_level: FitnessLevel,
    /// Selected training goals.
    #[serde(default)]
    pub goals: Vec<FitnessGoal>,
    /// Equipment on hand.
    #[serde(default)]
    pub available_equipment: Vec<Equipment>,
    /// Active dietary restrictions.
    #[serde(default)]
    pub dietary_restrictions: Vec<DietaryRestriction>,
    /// Desired workout length in minutes.
    #[serde(default = "default_workout_duration")]
    pub workout_duration: u32,
}

fn default_workout_duration() -> u32 {
    30
}

/// Body of `POST /workout-plan`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutPlanRequest {
    /// Full profile object, as the service expects it nested.
    pub user_profile: UserProfile,
    /// Goals, repeated at the top level of the payload.
    pub goals: Vec<FitnessGoal>,
    /// Equipment, repeated at the top level of the payload.
    pub available_equipment: Vec<Equipment>,
    /// Desired workout length in minutes.
    pub workout_duration: u32,
}

impl WorkoutPlanRequest {
    /// Build the request payload from a profile, duplicating the fields the
    /// service reads from the top level.
    #[must_use]
    pub fn from_profile(profile: UserProfile) -> Self {
        Self {
            goals: profile.goals.clone(),
            available_equipment: profile.available_equipment.clone(),
            workout_duration: profile.workout_duration,
            user_profile: profile,
        }
    }
}

/// One exercise in a generated workout plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannedExercise {
    /// Display name, e.g. "Push-up".
    pub exercise_name: String,
    /// Number of sets.
    pub sets: u32,
    /// Repetitions per set.
    pub reps: u32,
    /// Hold/duration in seconds for timed exercises.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    /// Difficulty label.
    pub difficulty: String,
    /// How to perform the exercise.
    pub instructions: String,
    /// Primary muscles worked.
    #[serde(default)]
    pub target_muscles: Vec<String>,
}

/// Response of `POST /workout-plan`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutPlanResponse {
    /// Number of exercises in the plan.
    pub total_exercises: u32,
    /// Estimated total duration in minutes.
    pub estimated_duration: u32,
    /// The generated plan.
    #[serde(default)]
    pub workout_plans: Vec<PlannedExercise>,
}

/// Body of `POST /nutrition-advice`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NutritionAdviceRequest {
    /// Full profile object.
    pub user_profile: UserProfile,
    /// Restrictions, repeated at the top level of the payload.
    pub dietary_restrictions: Vec<DietaryRestriction>,
    /// Target meal.
    pub meal_type: MealType,
}

impl NutritionAdviceRequest {
    /// Build the request payload from a profile and a target meal.
    #[must_use]
    pub fn from_profile(profile: UserProfile, meal_type: MealType) -> Self {
        Self {
            dietary_restrictions: profile.dietary_restrictions.clone(),
            user_profile: profile,
            meal_type,
        }
    }
}

/// Macronutrient breakdown in grams.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Macronutrients {
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

/// Advice for one meal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealAdvice {
    /// Which meal this advice covers.
    pub meal_type: String,
    /// Approximate calories.
    pub calories: u32,
    /// Macro split.
    pub macronutrients: Macronutrients,
    /// Suggested foods.
    #[serde(default)]
    pub food_items: Vec<String>,
    /// When to eat relative to training.
    #[serde(default)]
    pub timing: String,
    /// Why this meal composition helps.
    #[serde(default)]
    pub benefits: Vec<String>,
}

/// Response of `POST /nutrition-advice`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NutritionAdviceResponse {
    /// Echo of the requested meal type.
    pub meal_type: String,
    /// One entry per suggested meal.
    #[serde(default)]
    pub nutrition_advice: Vec<MealAdvice>,
}

/// One entry of `GET /exercise-library`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryExercise {
    /// Exercise name.
    pub name: String,
    /// Difficulty label.
    pub difficulty: String,
    /// Primary muscles worked.
    #[serde(default)]
    pub target_muscles: Vec<String>,
    /// What the exercise trains.
    #[serde(default)]
    pub benefits: Vec<String>,
    /// How to perform it.
    #[serde(default)]
    pub instructions: String,
}

/// Response of `GET /exercise-library`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExerciseLibraryResponse {
    /// Reference data for supported exercises.
    #[serde(default)]
    pub exercises: Vec<LibraryExercise>,
    /// Number of entries.
    pub total_exercises: u32,
}

/// Response of `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    /// Service-reported status string, "healthy" when all is well.
    pub status: String,
    /// Server epoch seconds at response time.
    #[serde(default)]
    pub timestamp: f64,
}

impl HealthStatus {
    /// Whether the service reported itself healthy.
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}
