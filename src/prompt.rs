use crate::models::{DietaryHabit, MealSlot, Profile};

/// Turns a [`Profile`] into the single prompt string sent to the model.
///
/// The section keywords in the instructions are the ones [`crate::parser::ResponseParser`]
/// looks for, so the two must stay in sync through [`MealSlot::keyword`].
#[derive(Debug, Clone, Copy, Default)]
pub struct PromptBuilder;

impl PromptBuilder {
    pub fn new() -> Self {
        Self
    }

    pub fn build(&self, profile: &Profile) -> String {
        let cuisine = profile.nationality();
        format!(
            "{}\n\n{}\n\nDiet Plan:\n",
            self.system_instruction(cuisine),
            self.user_instruction(profile, cuisine)
        )
    }

    fn system_instruction(&self, cuisine: &str) -> String {
        format!(
            "You are an expert nutritionist specializing in {cuisine} cuisine. \
             Create personalized balanced diet plans with specific {cuisine} dish names and appropriate portions."
        )
    }

    fn user_instruction(&self, profile: &Profile, cuisine: &str) -> String {
        let mut out = format!(
            "Create a daily {cuisine} diet plan for a person with these details:\n\
             - Age: {} years ({})\n\
             - Weight: {} kg\n\
             - Height: {} inches ({}, {:.2} meters)\n\
             - BMI: {:.1} ({})\n\
             - Nationality/Cuisine: {cuisine}\n\
             - Food Preference: {}\n\
             - Health Conditions: {}\n",
            profile.age(),
            profile.age_group().as_str(),
            profile.weight_kg(),
            profile.height_in(),
            profile.height_display(),
            profile.height_m(),
            profile.bmi(),
            profile.bmi_category().as_str(),
            profile.habit(),
            conditions_line(profile),
        );

        out.push('\n');
        out.push_str(habit_constraint(profile.habit()));
        out.push('\n');

        let considerations = profile.dietary_considerations();
        if !profile.conditions().is_empty() {
            out.push_str("Treat the health conditions as dietary restrictions: ");
            if considerations.is_empty() {
                out.push_str("avoid foods that commonly aggravate them.");
            } else {
                out.push_str(&format!("focus on {}.", considerations.join(", ")));
            }
            out.push('\n');
        }

        out.push_str(&format!(
            "IMPORTANT: Use ONLY traditional {cuisine} dishes. Do not mix cuisines.\n\n"
        ));
        out.push_str(
            "Structure the plan in exactly four sections. Start each section with its keyword \
             alone on its own line, followed by one dish per line as a bullet:\n\n",
        );
        for slot in MealSlot::ALL {
            out.push_str(&format!("{}\n- {}\n", slot.keyword(), slot_guidance(slot, cuisine)));
        }
        out.push_str(&format!(
            "\nUse authentic {cuisine} food items only and include portion sizes."
        ));
        out
    }
}

fn conditions_line(profile: &Profile) -> String {
    if profile.conditions().is_empty() {
        "none reported".to_string()
    } else {
        profile
            .conditions()
            .iter()
            .cloned()
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn habit_constraint(habit: DietaryHabit) -> &'static str {
    match habit {
        DietaryHabit::Vegetarian => {
            "Dietary constraint: strictly vegetarian. No meat, poultry, fish, seafood, or eggs."
        }
        DietaryHabit::NonVegetarian => {
            "Dietary constraint: non-vegetarian. Include lean meat, fish, or eggs where suitable."
        }
        DietaryHabit::Both => {
            "Dietary constraint: both vegetarian and non-vegetarian dishes are acceptable."
        }
    }
}

fn slot_guidance(slot: MealSlot, cuisine: &str) -> String {
    match slot {
        MealSlot::Breakfast => format!("2-3 {cuisine} dishes with portion sizes"),
        MealSlot::Lunch => format!("3-4 {cuisine} dishes with portion sizes"),
        MealSlot::Dinner => format!("2-3 {cuisine} dishes with portion sizes"),
        MealSlot::Snacks => format!("mid-morning and evening {cuisine} snacks"),
    }
}
