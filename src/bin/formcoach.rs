// ABOUTME: FormCoach CLI - live posture trainer, workout planner, and nutrition advisor
// ABOUTME: Terminal front end over the formcoach library; profile fields become flags
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FormCoach contributors

//! FormCoach command line interface.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::info;

use formcoach::capture::JpegFileSource;
use formcoach::models::{
    DietaryRestriction, Equipment, ExerciseType, FitnessGoal, FitnessLevel, MealType, UserProfile,
};
use formcoach::planner::{FlowState, NutritionAdviceFlow, WorkoutPlanFlow};
use formcoach::{logging, report, ClientConfig, CoachApiClient, LiveTrainer, TrainerEvent};

#[derive(Parser)]
#[command(name = "formcoach", about = "AI fitness coaching client", version)]
struct Cli {
    /// Coach API base URL (overrides FORMCOACH_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Analyze a single frame
    Analyze {
        /// Path to a JPEG frame
        #[arg(long)]
        image: PathBuf,
        /// Exercise to judge the frame against
        #[arg(long, default_value = "squat")]
        exercise: ExerciseType,
    },
    /// Continuously capture and analyze frames
    Live {
        /// Path to a JPEG frame, re-read on every cycle
        #[arg(long)]
        image: PathBuf,
        /// Exercise to judge frames against
        #[arg(long, default_value = "squat")]
        exercise: ExerciseType,
        /// Cycle interval in milliseconds (default from config, 2000)
        #[arg(long)]
        interval_ms: Option<u64>,
        /// Stop after this many deliveries (default: run until Ctrl-C)
        #[arg(long)]
        cycles: Option<u32>,
    },
    /// Generate a workout plan from a profile
    Plan {
        /// Age in years
        #[arg(long)]
        age: Option<u32>,
        /// Fitness level: beginner, intermediate, advanced
        #[arg(long, default_value = "beginner")]
        fitness_level: FitnessLevel,
        /// Training goal (repeatable)
        #[arg(long = "goal")]
        goals: Vec<FitnessGoal>,
        /// Available equipment (repeatable)
        #[arg(long = "equipment", default_value = "bodyweight")]
        equipment: Vec<Equipment>,
        /// Desired workout length in minutes
        #[arg(long, default_value_t = 30)]
        duration: u32,
    },
    /// Get nutrition advice from a profile
    Nutrition {
        /// Age in years
        #[arg(long)]
        age: Option<u32>,
        /// Fitness level: beginner, intermediate, advanced
        #[arg(long, default_value = "beginner")]
        fitness_level: FitnessLevel,
        /// Training goal (repeatable)
        #[arg(long = "goal")]
        goals: Vec<FitnessGoal>,
        /// Dietary restriction (repeatable)
        #[arg(long = "restriction")]
        restrictions: Vec<DietaryRestriction>,
        /// Target meal type
        #[arg(long, default_value = "general")]
        meal_type: MealType,
    },
    /// Show the exercise reference library
    Library,
    /// Check coach service health
    Health,
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init_from_env()?;

    let cli = Cli::parse();
    let mut config = ClientConfig::from_env()?;
    if let Some(url) = &cli.api_url {
        config = config.with_api_url(url)?;
    }
    let client = Arc::new(CoachApiClient::new(&config));

    match cli.command {
        Command::Analyze { image, exercise } => analyze(client, image, exercise).await,
        Command::Live {
            image,
            exercise,
            interval_ms,
            cycles,
        } => {
            let interval = interval_ms.map_or(config.capture_interval, Duration::from_millis);
            live(client, image, exercise, interval, cycles).await
        }
        Command::Plan {
            age,
            fitness_level,
            goals,
            equipment,
            duration,
        } => {
            let profile = UserProfile {
                age,
                fitness_level,
                goals,
                available_equipment: equipment,
                dietary_restrictions: Vec::new(),
                workout_duration: duration,
            };
            plan(client, profile).await
        }
        Command::Nutrition {
            age,
            fitness_level,
            goals,
            restrictions,
            meal_type,
        } => {
            let profile = UserProfile {
                age,
                fitness_level,
                goals,
                available_equipment: Vec::new(),
                dietary_restrictions: restrictions,
                workout_duration: 30,
            };
            nutrition(client, profile, meal_type).await
        }
        Command::Library => library(&client).await,
        Command::Health => health(&client).await,
    }
}

async fn analyze(client: Arc<CoachApiClient>, image: PathBuf, exercise: ExerciseType) -> Result<()> {
    let analyzer: Arc<dyn formcoach::PostureAnalyzer> = client;
    let trainer = LiveTrainer::new(Box::new(JpegFileSource::new(image)), analyzer);
    // Single-shot path goes through the same loop as continuous mode.
    let (tx, mut rx) = mpsc::unbounded_channel();
    trainer.subscribe(move |event| {
        let _ = tx.send(event);
    });
    trainer.set_exercise(exercise);
    trainer.run_once().await;

    match rx.recv().await {
        Some(TrainerEvent::Analysis(analysis)) => {
            print!("{}", report::render_posture_analysis(&analysis));
            Ok(())
        }
        Some(TrainerEvent::Failure(error)) => {
            eprintln!("Error: {}", error.user_message());
            std::process::exit(1);
        }
        None => Ok(()),
    }
}

async fn live(
    client: Arc<CoachApiClient>,
    image: PathBuf,
    exercise: ExerciseType,
    interval: Duration,
    cycles: Option<u32>,
) -> Result<()> {
    let analyzer: Arc<dyn formcoach::PostureAnalyzer> = client;
    let trainer = LiveTrainer::new(Box::new(JpegFileSource::new(image)), analyzer);
    trainer.set_exercise(exercise);

    let (tx, mut rx) = mpsc::unbounded_channel();
    trainer.subscribe(move |event| {
        let _ = tx.send(event);
    });

    info!(interval_ms = interval.as_millis() as u64, "live analysis starting");
    trainer.start(interval);

    let mut delivered = 0_u32;
    loop {
        tokio::select! {
            event = rx.recv() => {
                match event {
                    Some(TrainerEvent::Analysis(analysis)) => {
                        println!("[{}]", chrono::Local::now().format("%H:%M:%S"));
                        print!("{}", report::render_posture_analysis(&analysis));
                    }
                    Some(TrainerEvent::Failure(error)) => {
                        eprintln!("Error: {}", error.user_message());
                    }
                    None => break,
                }
                delivered += 1;
                if cycles.is_some_and(|limit| delivered >= limit) {
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                eprintln!("stopping");
                break;
            }
        }
    }

    trainer.stop();
    Ok(())
}

async fn plan(client: Arc<CoachApiClient>, profile: UserProfile) -> Result<()> {
    let mut flow = WorkoutPlanFlow::new(client);
    flow.submit(profile).await;
    match flow.state() {
        FlowState::Ready(response) => {
            print!("{}", report::render_workout_plan(response));
            Ok(())
        }
        FlowState::Failed(message) => {
            eprintln!("Error: {message}");
            std::process::exit(1);
        }
        FlowState::Idle | FlowState::Loading => Ok(()),
    }
}

async fn nutrition(
    client: Arc<CoachApiClient>,
    profile: UserProfile,
    meal_type: MealType,
) -> Result<()> {
    let mut flow = NutritionAdviceFlow::new(client);
    flow.submit(profile, meal_type).await;
    match flow.state() {
        FlowState::Ready(response) => {
            print!("{}", report::render_nutrition_advice(response));
            Ok(())
        }
        FlowState::Failed(message) => {
            eprintln!("Error: {message}");
            std::process::exit(1);
        }
        FlowState::Idle | FlowState::Loading => Ok(()),
    }
}

async fn library(client: &CoachApiClient) -> Result<()> {
    match client.exercise_library().await {
        Ok(response) => {
            print!("{}", report::render_exercise_library(&response));
            Ok(())
        }
        Err(error) => {
            eprintln!("Error: {}", error.user_message());
            std::process::exit(1);
        }
    }
}

async fn health(client: &CoachApiClient) -> Result<()> {
    match client.health().await {
        Ok(status) => {
            println!(
                "coach service is {}",
                if status.is_healthy() { "healthy" } else { "unhealthy" }
            );
            Ok(())
        }
        Err(error) => {
            eprintln!("Error: {}", error.user_message());
            std::process::exit(1);
        }
    }
}
