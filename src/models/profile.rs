use crate::error::ProfileError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

pub const AGE_RANGE: (u32, u32) = (1, 120);
pub const WEIGHT_RANGE_KG: (f64, f64) = (10.0, 500.0);
pub const HEIGHT_RANGE_IN: (u32, u32) = (36, 96);
pub const DEFAULT_CUISINE: &str = "Indian";

pub const COMMON_CONDITIONS: &[&str] = &[
    "diabetes",
    "hypertension",
    "heart disease",
    "obesity",
    "high cholesterol",
    "kidney disease",
    "celiac disease",
    "food allergies",
];

const METERS_PER_INCH: f64 = 0.0254;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DietaryHabit {
    Vegetarian,
    NonVegetarian,
    #[default]
    Both,
}

impl DietaryHabit {
    pub const ALL: [DietaryHabit; 3] = [
        DietaryHabit::Vegetarian,
        DietaryHabit::NonVegetarian,
        DietaryHabit::Both,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DietaryHabit::Vegetarian => "vegetarian",
            DietaryHabit::NonVegetarian => "non-vegetarian",
            DietaryHabit::Both => "both",
        }
    }

    /// Lenient parse for form and CLI input. Empty or unrecognized text yields `Both`.
    pub fn parse_or_default(raw: &str) -> Self {
        let normalized = raw.trim().to_lowercase().replace(['_', ' '], "-");
        match normalized.as_str() {
            "" | "both" => DietaryHabit::Both,
            "vegetarian" | "veg" => DietaryHabit::Vegetarian,
            "non-vegetarian" | "nonvegetarian" | "non-veg" | "nonveg" => {
                DietaryHabit::NonVegetarian
            }
            other => {
                log::warn!(
                    "'{}' is not a supported food habit, using '{}'",
                    other,
                    DietaryHabit::Both.as_str()
                );
                DietaryHabit::Both
            }
        }
    }
}

impl fmt::Display for DietaryHabit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

impl BmiCategory {
    pub fn from_bmi(bmi: f64) -> Self {
        if bmi < 18.5 {
            BmiCategory::Underweight
        } else if bmi < 25.0 {
            BmiCategory::Normal
        } else if bmi < 30.0 {
            BmiCategory::Overweight
        } else {
            BmiCategory::Obese
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BmiCategory::Underweight => "Underweight",
            BmiCategory::Normal => "Normal",
            BmiCategory::Overweight => "Overweight",
            BmiCategory::Obese => "Obese",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AgeGroup {
    Child,
    Teenager,
    YoungAdult,
    Adult,
    MiddleAged,
    Senior,
}

impl AgeGroup {
    pub fn from_age(age: u32) -> Self {
        match age {
            0..=12 => AgeGroup::Child,
            13..=19 => AgeGroup::Teenager,
            20..=29 => AgeGroup::YoungAdult,
            30..=49 => AgeGroup::Adult,
            50..=64 => AgeGroup::MiddleAged,
            _ => AgeGroup::Senior,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AgeGroup::Child => "child",
            AgeGroup::Teenager => "teenager",
            AgeGroup::YoungAdult => "young adult",
            AgeGroup::Adult => "adult",
            AgeGroup::MiddleAged => "middle aged",
            AgeGroup::Senior => "senior",
        }
    }
}

/// Validated user attributes. Fields are private so a `Profile` cannot change after `new`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Profile {
    age: u32,
    weight_kg: f64,
    height_in: u32,
    nationality: String,
    habit: DietaryHabit,
    conditions: BTreeSet<String>,
}

impl Profile {
    pub fn new(age: u32, weight_kg: f64, height_in: u32) -> Result<Self, ProfileError> {
        let (min_age, max_age) = AGE_RANGE;
        if !(min_age..=max_age).contains(&age) {
            return Err(ProfileError::InvalidAge {
                value: age,
                min: min_age,
                max: max_age,
            });
        }

        // NaN fails the range check too.
        let (min_weight, max_weight) = WEIGHT_RANGE_KG;
        if !(min_weight..=max_weight).contains(&weight_kg) {
            return Err(ProfileError::InvalidWeight {
                value: weight_kg,
                min: min_weight,
                max: max_weight,
            });
        }

        let (min_height, max_height) = HEIGHT_RANGE_IN;
        if !(min_height..=max_height).contains(&height_in) {
            return Err(ProfileError::InvalidHeight {
                value: height_in,
                min: min_height,
                max: max_height,
            });
        }

        Ok(Profile {
            age,
            weight_kg,
            height_in,
            nationality: DEFAULT_CUISINE.to_string(),
            habit: DietaryHabit::default(),
            conditions: BTreeSet::new(),
        })
    }

    pub fn with_nationality(mut self, nationality: Option<&str>) -> Self {
        self.nationality = nationality
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(DEFAULT_CUISINE)
            .to_string();
        self
    }

    pub fn with_habit(mut self, habit: DietaryHabit) -> Self {
        self.habit = habit;
        self
    }

    /// Conditions are lowercased; blanks and the literal "none" are dropped.
    pub fn with_conditions<I, S>(mut self, conditions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.conditions = conditions
            .into_iter()
            .map(|c| c.as_ref().trim().to_lowercase())
            .filter(|c| !c.is_empty() && c != "none")
            .collect();
        self
    }

    pub fn age(&self) -> u32 {
        self.age
    }

    pub fn weight_kg(&self) -> f64 {
        self.weight_kg
    }

    pub fn height_in(&self) -> u32 {
        self.height_in
    }

    pub fn nationality(&self) -> &str {
        &self.nationality
    }

    pub fn habit(&self) -> DietaryHabit {
        self.habit
    }

    pub fn conditions(&self) -> &BTreeSet<String> {
        &self.conditions
    }

    pub fn height_m(&self) -> f64 {
        self.height_in as f64 * METERS_PER_INCH
    }

    /// Height as `5 ft 5 in`.
    pub fn height_display(&self) -> String {
        format!("{} ft {} in", self.height_in / 12, self.height_in % 12)
    }

    pub fn bmi(&self) -> f64 {
        let height_m = self.height_m();
        self.weight_kg / (height_m * height_m)
    }

    pub fn bmi_category(&self) -> BmiCategory {
        BmiCategory::from_bmi(self.bmi())
    }

    pub fn age_group(&self) -> AgeGroup {
        AgeGroup::from_age(self.age)
    }

    /// Dietary focus areas implied by the listed conditions, in condition order (alphabetical), no duplicates.
    pub fn dietary_considerations(&self) -> Vec<&'static str> {
        let mut needs: Vec<&'static str> = Vec::new();
        for condition in &self.conditions {
            let implied: &[&'static str] = if condition.contains("diabetes") {
                &["low-sugar", "complex-carbs", "fiber-rich"]
            } else if condition.contains("hypertension") || condition.contains("heart") {
                &["low-sodium", "heart-healthy", "omega-3"]
            } else if condition.contains("cholesterol") {
                &[
                    "low-saturated-fat",
                    "high-fiber",
                    "omega-3",
                    "plant-sterols",
                    "lean-protein",
                ]
            } else if condition.contains("kidney") {
                &["low-protein", "low-phosphorus", "fluid-controlled"]
            } else if condition.contains("obesity") {
                &["calorie-controlled", "high-fiber", "portion-controlled"]
            } else {
                &[]
            };
            for need in implied {
                if !needs.contains(need) {
                    needs.push(need);
                }
            }
        }
        needs
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let conditions = if self.conditions.is_empty() {
            "None".to_string()
        } else {
            self.conditions.iter().cloned().collect::<Vec<_>>().join(", ")
        };
        write!(
            f,
            "Age: {}, Weight: {}kg, Height: {}in, Cuisine: {}, Food Habit: {}, Health Conditions: {}",
            self.age, self.weight_kg, self.height_in, self.nationality, self.habit, conditions
        )
    }
}
