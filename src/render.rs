use crate::models::{BmiCategory, MealPlan, MealSlot, Profile};
use std::fmt::Write;

const HYDRATION_TIPS: &[&str] = &[
    "Drink 8-10 glasses (2-3 liters) of water throughout the day",
    "Start your morning with warm water and lemon",
    "Carry a water bottle to track your intake",
];

const WELLNESS_TIPS: &[&str] = &[
    "Eat at regular intervals (every 3-4 hours)",
    "Practice portion control - use smaller plates",
    "Engage in at least 30 minutes of physical activity daily",
    "Get 7-8 hours of quality sleep",
];

const DISCLAIMER: &str = "This is an AI-generated dietary guide based on the information provided.\n   \
For specific medical conditions or personalized nutrition advice, please\n   \
consult a registered dietitian or healthcare provider.";

fn slot_heading(slot: MealSlot) -> &'static str {
    match slot {
        MealSlot::Breakfast => "🌅 BREAKFAST (Morning Meal)",
        MealSlot::Lunch => "🌞 LUNCH (Afternoon Meal)",
        MealSlot::Dinner => "🌙 DINNER (Evening Meal)",
        MealSlot::Snacks => "🍎 SNACKS (Between Meals)",
    }
}

fn bmi_marker(category: BmiCategory) -> &'static str {
    match category {
        BmiCategory::Normal => "✅",
        _ => "⚠️",
    }
}

/// Plain-text report: profile summary, the four meal sections, tips, and a disclaimer.
pub fn render_report(profile: &Profile, plan: &MealPlan, model: &str) -> String {
    let mut out = String::new();
    let conditions = if profile.conditions().is_empty() {
        "None".to_string()
    } else {
        profile
            .conditions()
            .iter()
            .cloned()
            .collect::<Vec<_>>()
            .join(", ")
    };

    // Writing into a String cannot fail.
    let _ = writeln!(out, "🍽️  PERSONALIZED DIET PLAN (generated by {})", model);
    let _ = writeln!(out);
    let _ = writeln!(out, "👤 PROFILE SUMMARY");
    let _ = writeln!(out, "   • Age: {} years", profile.age());
    let _ = writeln!(out, "   • Weight: {} kg", profile.weight_kg());
    let _ = writeln!(
        out,
        "   • Height: {} inches ({:.2} m)",
        profile.height_in(),
        profile.height_m()
    );
    let _ = writeln!(
        out,
        "   • BMI: {:.1} ({} {})",
        profile.bmi(),
        profile.bmi_category().as_str(),
        bmi_marker(profile.bmi_category())
    );
    let _ = writeln!(out, "   • Cuisine Type: {}", profile.nationality());
    let _ = writeln!(out, "   • Food Habit: {}", profile.habit());
    let _ = writeln!(out, "   • Health Conditions: {}", conditions);
    let _ = writeln!(out);
    let _ = writeln!(out, "📋 DAILY MEAL PLAN");

    for (slot, items) in plan.iter() {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", slot_heading(slot));
        for item in items {
            let _ = writeln!(out, "   • {}", item);
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "💧 HYDRATION");
    for tip in HYDRATION_TIPS {
        let _ = writeln!(out, "   • {}", tip);
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "💡 WELLNESS");
    for tip in WELLNESS_TIPS {
        let _ = writeln!(out, "   • {}", tip);
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "⚠️  DISCLAIMER");
    let _ = writeln!(out, "   {}", DISCLAIMER);
    out
}

/// Output format for a finished plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Text,
    Json,
}

/// Renders `plan` in `format`. The same string is printed and saved.
pub fn render_plan(
    profile: &Profile,
    plan: &MealPlan,
    model: &str,
    format: ReportFormat,
) -> Result<String, serde_json::Error> {
    match format {
        ReportFormat::Text => Ok(render_report(profile, plan, model)),
        ReportFormat::Json => serde_json::to_string_pretty(plan),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DietaryHabit;
    use crate::parser::ResponseParser;

    #[test]
    fn report_lists_sections_in_order() {
        let profile = Profile::new(30, 70.0, 65)
            .unwrap()
            .with_habit(DietaryHabit::Vegetarian)
            .with_conditions(["diabetes"]);
        let plan = ResponseParser::new().parse("DINNER\n- Roti\nBREAKFAST\n- Idli");
        let report = render_report(&profile, &plan, "gpt2");

        let breakfast = report.find("BREAKFAST (Morning Meal)").unwrap();
        let lunch = report.find("LUNCH (Afternoon Meal)").unwrap();
        let dinner = report.find("DINNER (Evening Meal)").unwrap();
        let snacks = report.find("SNACKS (Between Meals)").unwrap();
        assert!(breakfast < lunch && lunch < dinner && dinner < snacks);

        assert!(report.contains("   • Idli"));
        assert!(report.contains("   • Roti"));
        assert!(report.contains("Health Conditions: diabetes"));
        assert!(report.contains("BMI: 25.7 (Overweight"));
        assert!(report.contains("generated by gpt2"));
    }

    #[test]
    fn no_conditions_reads_none() {
        let profile = Profile::new(22, 55.0, 64).unwrap();
        let plan = ResponseParser::new().parse("");
        let report = render_report(&profile, &plan, "gpt2");
        assert!(report.contains("Health Conditions: None"));
        assert!(report.contains("[No specific items - please try again]"));
    }

    #[test]
    fn json_format_emits_only_the_plan() {
        let profile = Profile::new(30, 70.0, 65).unwrap();
        let plan = ResponseParser::new().parse("BREAKFAST\n- Idli\nLUNCH\n- Dal");
        let json = render_plan(&profile, &plan, "gpt2", ReportFormat::Json).unwrap();

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["breakfast"][0], "Idli");
        assert_eq!(value["lunch"][0], "Dal");
        assert!(!json.contains("PROFILE SUMMARY"));

        let text = render_plan(&profile, &plan, "gpt2", ReportFormat::Text).unwrap();
        assert_eq!(text, render_report(&profile, &plan, "gpt2"));
    }
}
