use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;

pub const MEAL_PLACEHOLDER: &str = "[No specific items - please try again]";
pub const SNACK_FALLBACK: &[&str] = &[
    "Fresh fruits (apple, banana, or seasonal fruit)",
    "A handful of unsalted nuts",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MealSlot {
    Breakfast,
    Lunch,
    Dinner,
    Snacks,
}

impl MealSlot {
    /// Fixed slot order.
    pub const ALL: [MealSlot; 4] = [
        MealSlot::Breakfast,
        MealSlot::Lunch,
        MealSlot::Dinner,
        MealSlot::Snacks,
    ];

    pub fn index(&self) -> usize {
        match self {
            MealSlot::Breakfast => 0,
            MealSlot::Lunch => 1,
            MealSlot::Dinner => 2,
            MealSlot::Snacks => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MealSlot::Breakfast => "breakfast",
            MealSlot::Lunch => "lunch",
            MealSlot::Dinner => "dinner",
            MealSlot::Snacks => "snacks",
        }
    }

    /// Section keyword the prompt asks the model to emit.
    pub fn keyword(&self) -> &'static str {
        match self {
            MealSlot::Breakfast => "BREAKFAST",
            MealSlot::Lunch => "LUNCH",
            MealSlot::Dinner => "DINNER",
            MealSlot::Snacks => "SNACKS",
        }
    }

    /// Content for a slot the parser left empty.
    pub fn placeholder(&self) -> Vec<String> {
        match self {
            MealSlot::Snacks => SNACK_FALLBACK.iter().map(|s| s.to_string()).collect(),
            _ => vec![MEAL_PLACEHOLDER.to_string()],
        }
    }
}

impl fmt::Display for MealSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Four meal slots in fixed order, each holding at least one item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MealPlan {
    slots: [Vec<String>; 4],
}

impl MealPlan {
    /// Fills every empty slot with its placeholder.
    pub fn from_slots(mut slots: [Vec<String>; 4]) -> Self {
        for slot in MealSlot::ALL {
            let items = &mut slots[slot.index()];
            if items.is_empty() {
                *items = slot.placeholder();
            }
        }
        MealPlan { slots }
    }

    pub fn items(&self, slot: MealSlot) -> &[String] {
        &self.slots[slot.index()]
    }

    pub fn breakfast(&self) -> &[String] {
        self.items(MealSlot::Breakfast)
    }

    pub fn lunch(&self) -> &[String] {
        self.items(MealSlot::Lunch)
    }

    pub fn dinner(&self) -> &[String] {
        self.items(MealSlot::Dinner)
    }

    pub fn snacks(&self) -> &[String] {
        self.items(MealSlot::Snacks)
    }

    pub fn iter(&self) -> impl Iterator<Item = (MealSlot, &[String])> + '_ {
        MealSlot::ALL
            .into_iter()
            .map(move |slot| (slot, self.items(slot)))
    }

    /// True when the slot still carries only its placeholder.
    pub fn is_placeholder(&self, slot: MealSlot) -> bool {
        self.items(slot) == slot.placeholder().as_slice()
    }
}

impl Serialize for MealPlan {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(MealSlot::ALL.len()))?;
        for (slot, items) in self.iter() {
            map.serialize_entry(slot.as_str(), items)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_slots_get_placeholders() {
        let plan = MealPlan::from_slots([vec!["Oats".to_string()], vec![], vec![], vec![]]);

        assert_eq!(plan.breakfast(), ["Oats".to_string()]);
        assert_eq!(plan.lunch(), [MEAL_PLACEHOLDER.to_string()]);
        assert_eq!(plan.dinner(), [MEAL_PLACEHOLDER.to_string()]);
        assert_eq!(plan.snacks().len(), SNACK_FALLBACK.len());
        assert!(plan.snacks()[0].contains("fruit"));
        assert!(plan.is_placeholder(MealSlot::Snacks));
        assert!(!plan.is_placeholder(MealSlot::Breakfast));
    }

    #[test]
    fn iterates_in_fixed_order() {
        let plan = MealPlan::from_slots(Default::default());
        let order: Vec<MealSlot> = plan.iter().map(|(slot, _)| slot).collect();
        assert_eq!(order, MealSlot::ALL.to_vec());
    }

    #[test]
    fn serializes_slots_in_order() {
        let plan = MealPlan::from_slots([
            vec!["Idli".to_string()],
            vec!["Dal".to_string()],
            vec!["Roti".to_string()],
            vec!["Chana".to_string()],
        ]);
        let json = serde_json::to_string(&plan).unwrap();
        assert_eq!(
            json,
            r#"{"breakfast":["Idli"],"lunch":["Dal"],"dinner":["Roti"],"snacks":["Chana"]}"#
        );
    }
}
