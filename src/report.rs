// ABOUTME: Plain-text renderers for analysis results, workout plans, and nutrition advice
// ABOUTME: Terminal stand-in for the reference client's result cards; asserted against in tests
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FormCoach contributors

//! Terminal rendering of coach service responses.

use std::fmt::Write as _;

use crate::models::{
    ExerciseLibraryResponse, NutritionAdviceResponse, PostureAnalysis, WorkoutPlanResponse,
};

const RULE_WIDTH: usize = 50;

/// Verbal score band, matching the reference client's thresholds.
#[must_use]
pub fn score_band(form_score: f64) -> &'static str {
    if form_score >= 0.8 {
        "Excellent Form!"
    } else if form_score >= 0.6 {
        "Good Form"
    } else if form_score >= 0.4 {
        "Needs Improvement"
    } else {
        "Poor Form"
    }
}

/// Render a posture analysis as a result card.
#[must_use]
pub fn render_posture_analysis(analysis: &PostureAnalysis) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", "=".repeat(RULE_WIDTH));
    let _ = writeln!(
        out,
        "Form score: {:.0}%  ({})",
        analysis.form_score * 100.0,
        score_band(analysis.form_score)
    );
    let _ = writeln!(out, "Exercise: {}", analysis.exercise_type);
    let _ = writeln!(out, "Confidence: {:.0}%", analysis.confidence * 100.0);
    let _ = writeln!(
        out,
        "Correct form: {}",
        if analysis.is_correct_form { "Yes" } else { "No" }
    );
    let _ = writeln!(out, "Analysis time: {}ms", analysis.analysis_time_ms.round());

    if !analysis.corrections.is_empty() {
        let _ = writeln!(out, "\nForm corrections:");
        for correction in &analysis.corrections {
            let _ = writeln!(out, "  - {correction}");
        }
    }
    if !analysis.feedback.is_empty() {
        let _ = writeln!(out, "\nCoach feedback: {}", analysis.feedback);
    }
    let _ = writeln!(out, "{}", "=".repeat(RULE_WIDTH));
    out
}

/// Render a generated workout plan, one block per exercise.
#[must_use]
pub fn render_workout_plan(plan: &WorkoutPlanResponse) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Your personalized workout plan");
    let _ = writeln!(out, "Total exercises: {}", plan.total_exercises);
    let _ = writeln!(out, "Estimated duration: {} minutes", plan.estimated_duration);

    for (index, exercise) in plan.workout_plans.iter().enumerate() {
        let _ = writeln!(out, "\n{}. {}", index + 1, exercise.exercise_name);
        let _ = writeln!(out, "   Sets: {}  Reps: {}", exercise.sets, exercise.reps);
        if let Some(duration) = exercise.duration {
            let _ = writeln!(out, "   Duration: {duration}s");
        }
        let _ = writeln!(out, "   Difficulty: {}", exercise.difficulty);
        let _ = writeln!(out, "   Instructions: {}", exercise.instructions);
        if !exercise.target_muscles.is_empty() {
            let _ = writeln!(out, "   Target muscles: {}", exercise.target_muscles.join(", "));
        }
    }
    out
}

/// Render nutrition advice, one block per meal.
#[must_use]
pub fn render_nutrition_advice(advice: &NutritionAdviceResponse) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Your personalized nutrition advice");
    let _ = writeln!(out, "Meal type: {}", advice.meal_type);

    for meal in &advice.nutrition_advice {
        let _ = writeln!(out, "\n{}", meal.meal_type);
        let _ = writeln!(out, "  Calories: {}", meal.calories);
        let _ = writeln!(
            out,
            "  Protein: {}g  Carbs: {}g  Fat: {}g",
            meal.macronutrients.protein, meal.macronutrients.carbs, meal.macronutrients.fat
        );
        if !meal.food_items.is_empty() {
            let _ = writeln!(out, "  Food items: {}", meal.food_items.join(", "));
        }
        if !meal.timing.is_empty() {
            let _ = writeln!(out, "  Timing: {}", meal.timing);
        }
        if !meal.benefits.is_empty() {
            let _ = writeln!(out, "  Benefits: {}", meal.benefits.join(", "));
        }
    }
    out
}

/// Render the exercise reference library.
#[must_use]
pub fn render_exercise_library(library: &ExerciseLibraryResponse) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Exercise library ({} exercises)", library.total_exercises);
    for exercise in &library.exercises {
        let _ = writeln!(out, "\n{} [{}]", exercise.name, exercise.difficulty);
        if !exercise.target_muscles.is_empty() {
            let _ = writeln!(out, "  Target muscles: {}", exercise.target_muscles.join(", "));
        }
        if !exercise.instructions.is_empty() {
            let _ = writeln!(out, "  Instructions: {}", exercise.instructions);
        }
        if !exercise.benefits.is_empty() {
            let _ = writeln!(out, "  Benefits: {}", exercise.benefits.join(", "));
        }
    }
    out
}

#[cfg(test)]
#[allow(clippy::panic, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::models::{Macronutrients, MealAdvice, PlannedExercise};

    #[test]
    fn score_bands_match_reference_thresholds() {
        assert_eq!(score_band(0.85), "Excellent Form!");
        assert_eq!(score_band(0.8), "Excellent Form!");
        assert_eq!(score_band(0.6), "Good Form");
        assert_eq!(score_band(0.42), "Needs Improvement");
        assert_eq!(score_band(0.1), "Poor Form");
    }

    #[test]
    fn posture_card_shows_score_and_corrections() {
        let analysis = PostureAnalysis {
            form_score: 0.42,
            is_correct_form: false,
            confidence: 0.9,
            corrections: vec!["Bend knees more".into()],
            feedback: "Keep going".into(),
            analysis_time_ms: 180.0,
            exercise_type: "squat".into(),
            key_points: None,
        };
        let card = render_posture_analysis(&analysis);
        assert!(card.contains("42%"));
        assert!(card.contains("Needs Improvement"));
        assert!(card.contains("Bend knees more"));
        assert!(card.contains("Keep going"));
        assert!(card.contains("180ms"));
    }

    #[test]
    fn workout_plan_renders_each_exercise_once() {
        let plan = WorkoutPlanResponse {
            total_exercises: 1,
            estimated_duration: 30,
            workout_plans: vec![PlannedExercise {
                exercise_name: "Push-up".into(),
                sets: 3,
                reps: 12,
                duration: None,
                difficulty: "beginner".into(),
                instructions: "Keep back straight".into(),
                target_muscles: vec!["chest".into()],
            }],
        };
        let text = render_workout_plan(&plan);
        assert_eq!(text.matches("Push-up").count(), 1);
        assert!(text.contains("Sets: 3  Reps: 12"));
        assert!(text.contains("Difficulty: beginner"));
        assert!(text.contains("Keep back straight"));
        assert!(text.contains("chest"));
        assert!(!text.contains("Duration:"));
    }

    #[test]
    fn nutrition_advice_renders_macros() {
        let advice = NutritionAdviceResponse {
            meal_type: "breakfast".into(),
            nutrition_advice: vec![MealAdvice {
                meal_type: "breakfast".into(),
                calories: 450,
                macronutrients: Macronutrients {
                    protein: 30.0,
                    carbs: 45.0,
                    fat: 15.0,
                },
                food_items: vec!["oats".into(), "eggs".into()],
                timing: "within an hour of waking".into(),
                benefits: vec!["sustained energy".into()],
            }],
        };
        let text = render_nutrition_advice(&advice);
        assert!(text.contains("Calories: 450"));
        assert!(text.contains("Protein: 30g"));
        assert!(text.contains("oats, eggs"));
    }
}
