use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    pub name: String,
    // Free-form: the model returns ranges such as "8-12" or "60s".
    pub sets: String,
    pub reps: String,
    pub rest: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyWorkout {
    pub day: String,
    pub focus: String,
    pub exercises: Vec<Exercise>,
}

impl DailyWorkout {
    pub fn is_rest_day(&self) -> bool {
        self.exercises.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingPlan {
    pub weekly_plan: Vec<DailyWorkout>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meal {
    pub meal_type: String,
    pub description: String,
    pub calories: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyDiet {
    pub day: String,
    pub meals: Vec<Meal>,
    pub total_calories: f64,
}

impl DailyDiet {
    pub fn meal_calories(&self) -> f64 {
        self.meals.iter().map(|m| m.calories).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DietPlan {
    pub diet_plan: Vec<DailyDiet>,
}

/// Absolute slack allowed between the meal sum and the stated daily total.
const CALORIE_SLACK_KCAL: f64 = 50.0;
/// Relative slack, applied when larger than the absolute one.
const CALORIE_SLACK_RATIO: f64 = 0.05;

/// Check that each day's meals add up to its stated total.
///
/// The plan is never rejected; mismatches come back as warnings for the caller
/// to log and show.
pub fn audit_diet(plan: &DietPlan) -> Vec<String> {
    let mut warnings = Vec::new();
    for d in &plan.diet_plan {
        let sum = d.meal_calories();
        let slack = (d.total_calories.abs() * CALORIE_SLACK_RATIO).max(CALORIE_SLACK_KCAL);
        if (sum - d.total_calories).abs() > slack {
            warnings.push(format!(
                "{}: meals add up to {:.0} kcal but the day total says {:.0} kcal",
                d.day, sum, d.total_calories
            ));
        }
    }
    warnings
}

/// Structural remarks on a training plan (never fatal).
pub fn audit_training(plan: &TrainingPlan) -> Vec<String> {
    let mut warnings = Vec::new();
    if plan.weekly_plan.len() != 7 {
        warnings.push(format!("expected 7 days, model returned {}", plan.weekly_plan.len()));
    }
    warnings
}
