use crate::models::{DietaryHabit, MealPlan, MealSlot};
use once_cell::sync::Lazy;
use regex::Regex;

/// Lines the positional fallback considers.
pub const FALLBACK_LINE_LIMIT: usize = 12;
const FALLBACK_LINES_PER_SLOT: usize = 3;

static HEADER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^[\s#*\->•]*(breakfast|lunch|dinner|snacks?)(?:$|[^\p{L}\p{N}])")
        .expect("header pattern is valid")
});

static ENUMERATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+[.)]\s*").expect("enumeration pattern is valid"));

static NON_VEGETARIAN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(chicken|fish|meat|eggs?|mutton|lamb|beef|pork|prawns?|shrimps?|crab|turkey|duck|salmon|tuna)\b",
    )
    .expect("non-vegetarian pattern is valid")
});

/// Which strategy produced a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseStrategy {
    Sections,
    Positional,
}

/// Turns free-form model output into a [`MealPlan`]. Never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseParser;

impl ResponseParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse(&self, raw: &str) -> MealPlan {
        self.parse_with_strategy(raw).0
    }

    pub fn parse_with_strategy(&self, raw: &str) -> (MealPlan, ParseStrategy) {
        match parse_sections(raw) {
            Some(slots) => (MealPlan::from_slots(slots), ParseStrategy::Sections),
            None => (
                MealPlan::from_slots(parse_positional(raw)),
                ParseStrategy::Positional,
            ),
        }
    }
}

/// Keyword-sectioned extraction. `None` when no header appears anywhere.
fn parse_sections(raw: &str) -> Option<[Vec<String>; 4]> {
    let mut slots: [Vec<String>; 4] = Default::default();
    let mut current: Option<MealSlot> = None;
    let mut saw_header = false;

    for line in raw.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(slot) = header_slot(line) {
            current = Some(slot);
            saw_header = true;
            continue;
        }
        if let Some(slot) = current {
            if let Some(item) = clean_item(line) {
                slots[slot.index()].push(item);
            }
        }
    }

    saw_header.then_some(slots)
}

/// Positional fallback: the first twelve non-empty lines, three per slot.
///
/// This is a heuristic. Free text that is not laid out in meal order ends up in the wrong slots.
fn parse_positional(raw: &str) -> [Vec<String>; 4] {
    let mut slots: [Vec<String>; 4] = Default::default();
    let lines = raw
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .take(FALLBACK_LINE_LIMIT);

    for (position, line) in lines.enumerate() {
        let slot = MealSlot::ALL[position / FALLBACK_LINES_PER_SLOT];
        if let Some(item) = clean_item(line) {
            slots[slot.index()].push(item);
        }
    }
    slots
}

fn header_slot(line: &str) -> Option<MealSlot> {
    let captures = HEADER_RE.captures(line)?;
    let keyword = captures.get(1)?.as_str().to_lowercase();
    match keyword.as_str() {
        "breakfast" => Some(MealSlot::Breakfast),
        "lunch" => Some(MealSlot::Lunch),
        "dinner" => Some(MealSlot::Dinner),
        _ => Some(MealSlot::Snacks),
    }
}

fn clean_item(line: &str) -> Option<String> {
    let line = ENUMERATION_RE.replace(line.trim(), "");
    let item = line
        .trim_start_matches(|c: char| matches!(c, '-' | '*' | '•' | '+') || c.is_whitespace())
        .trim_end_matches('*')
        .trim();
    if item.is_empty() {
        None
    } else {
        Some(item.to_string())
    }
}

/// Drops lines naming meat, fish, or eggs as whole words when the habit is vegetarian; otherwise returns the text as is.
pub fn filter_non_vegetarian(text: &str, habit: DietaryHabit) -> String {
    if habit != DietaryHabit::Vegetarian {
        return text.to_string();
    }
    text.lines()
        .filter(|line| !NON_VEGETARIAN_RE.is_match(line))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MEAL_PLACEHOLDER, SNACK_FALLBACK};

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn snack_fallback() -> Vec<String> {
        strings(SNACK_FALLBACK)
    }

    #[test]
    fn parses_minimal_sections() {
        let plan = ResponseParser::new().parse("BREAKFAST\n- Oats\nLUNCH\n- Rice");

        assert_eq!(plan.breakfast(), strings(&["Oats"]).as_slice());
        assert_eq!(plan.lunch(), strings(&["Rice"]).as_slice());
        assert_eq!(plan.dinner(), strings(&[MEAL_PLACEHOLDER]).as_slice());
        assert_eq!(plan.snacks(), snack_fallback().as_slice());
    }

    #[test]
    fn headers_are_case_insensitive_and_allow_markup() {
        let raw = "Here is your plan.\n\
                   **Breakfast:** (8 AM)\n\
                   1. Masala Dosa - 2 pieces\n\
                   2) Coconut chutney\n\
                   ## lunch\n\
                   • Dal Tadka\n\
                   * Jeera rice *\n\
                   Dinner -\n\
                   + Roti\n\
                   Snack time\n\
                   - Roasted chana";
        let (plan, strategy) = ResponseParser::new().parse_with_strategy(raw);

        assert_eq!(strategy, ParseStrategy::Sections);
        assert_eq!(
            plan.breakfast(),
            strings(&["Masala Dosa - 2 pieces", "Coconut chutney"]).as_slice()
        );
        assert_eq!(plan.lunch(), strings(&["Dal Tadka", "Jeera rice"]).as_slice());
        assert_eq!(plan.dinner(), strings(&["Roti"]).as_slice());
        assert_eq!(plan.snacks(), strings(&["Roasted chana"]).as_slice());
    }

    #[test]
    fn keyword_inside_a_word_is_not_a_header() {
        let raw = "BREAKFAST\n- Lunchbox-style poha\n- Dinnerware not needed";
        let plan = ResponseParser::new().parse(raw);
        assert_eq!(plan.breakfast().len(), 2);
        assert!(plan.is_placeholder(MealSlot::Lunch));
        assert!(plan.is_placeholder(MealSlot::Dinner));
    }

    #[test]
    fn positional_fallback_distributes_first_twelve_lines() {
        let raw: String = (1..=15).map(|i| format!("line {}\n\n", i)).collect();
        let (plan, strategy) = ResponseParser::new().parse_with_strategy(&raw);

        assert_eq!(strategy, ParseStrategy::Positional);
        assert_eq!(plan.breakfast(), strings(&["line 1", "line 2", "line 3"]).as_slice());
        assert_eq!(plan.lunch(), strings(&["line 4", "line 5", "line 6"]).as_slice());
        assert_eq!(plan.dinner(), strings(&["line 7", "line 8", "line 9"]).as_slice());
        assert_eq!(plan.snacks(), strings(&["line 10", "line 11", "line 12"]).as_slice());
    }

    #[test]
    fn short_fallback_leaves_later_slots_to_placeholders() {
        let plan = ResponseParser::new().parse("Upma\nPoha\nIdli\nSambar");

        assert_eq!(plan.breakfast(), strings(&["Upma", "Poha", "Idli"]).as_slice());
        assert_eq!(plan.lunch(), strings(&["Sambar"]).as_slice());
        assert_eq!(plan.dinner(), strings(&[MEAL_PLACEHOLDER]).as_slice());
        assert_eq!(plan.snacks(), snack_fallback().as_slice());
    }

    #[test]
    fn recognized_keywords_suppress_fallback_even_when_empty() {
        let raw = "Some preamble\nBREAKFAST\nLUNCH\nDINNER\nSNACKS";
        let (plan, strategy) = ResponseParser::new().parse_with_strategy(raw);

        assert_eq!(strategy, ParseStrategy::Sections);
        for slot in MealSlot::ALL {
            assert!(plan.is_placeholder(slot), "{} should be a placeholder", slot);
        }
    }

    #[test]
    fn partial_sections_do_not_redistribute() {
        let raw = "BREAKFAST\n- Poha\n- Tea\n- Banana\n- Sprouts";
        let plan = ResponseParser::new().parse(raw);

        assert_eq!(plan.breakfast().len(), 4);
        assert!(plan.is_placeholder(MealSlot::Lunch));
    }

    #[test]
    fn empty_input_yields_all_placeholders() {
        let plan = ResponseParser::new().parse("");
        for slot in MealSlot::ALL {
            assert!(plan.is_placeholder(slot));
        }
        let plan = ResponseParser::new().parse("   \n\n---\n");
        for slot in MealSlot::ALL {
            assert!(plan.is_placeholder(slot));
        }
    }

    #[test]
    fn parsing_is_pure() {
        let raw = "BREAKFAST\n- Oats\nrandom\nDINNER\n- Khichdi";
        let parser = ResponseParser::new();
        assert_eq!(parser.parse(raw), parser.parse(raw));
    }

    #[test]
    fn vegetarian_filter_drops_meat_lines() {
        let raw = "LUNCH\n- Chicken curry\n- Dal\n- Egg bhurji\n- Rice";
        let filtered = filter_non_vegetarian(raw, DietaryHabit::Vegetarian);
        assert_eq!(filtered, "LUNCH\n- Dal\n- Rice");

        let untouched = filter_non_vegetarian(raw, DietaryHabit::Both);
        assert_eq!(untouched, raw);
    }

    #[test]
    fn vegetarian_filter_matches_whole_words_only() {
        let raw = "BREAKFAST\n- Veggie upma\n- Egg bhurji\n- Masala chai\nLUNCH\n- Baingan bharta (eggplant)\n- Mixed veggies sabzi\n- Fish fry\nDINNER\n- Roti with boiled eggs";
        let filtered = filter_non_vegetarian(raw, DietaryHabit::Vegetarian);
        assert_eq!(
            filtered,
            "BREAKFAST\n- Veggie upma\n- Masala chai\nLUNCH\n- Baingan bharta (eggplant)\n- Mixed veggies sabzi\nDINNER"
        );

        let plan = ResponseParser::new().parse(&filtered);
        assert_eq!(plan.breakfast(), strings(&["Veggie upma", "Masala chai"]).as_slice());
        assert_eq!(
            plan.lunch(),
            strings(&["Baingan bharta (eggplant)", "Mixed veggies sabzi"]).as_slice()
        );
        assert_eq!(plan.dinner(), strings(&[MEAL_PLACEHOLDER]).as_slice());
    }
}
