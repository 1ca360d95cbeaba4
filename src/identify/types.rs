//! Typed record shapes for an identified item.
//!
//! The category-dependent field set is a closed enum with one details variant
//! per category, so "which fields are legal for this record" is an
//! exhaustiveness question rather than a runtime lookup. Records are built by
//! the validator, never deserialized wholesale from model output.

use serde::Serialize;

/// Closed set of item categories the model may detect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Food,
    Drink,
    Dessert,
    Snack,
}

impl Category {
    /// Parse the model's category string. Unknown values are a schema
    /// violation upstream, so this returns `None` rather than defaulting.
    pub fn from_str_opt(s: &str) -> Option<Self> {
        match s {
            "food" => Some(Category::Food),
            "drink" => Some(Category::Drink),
            "dessert" => Some(Category::Dessert),
            "snack" => Some(Category::Snack),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Food => "food",
            Category::Drink => "drink",
            Category::Dessert => "dessert",
            Category::Snack => "snack",
        }
    }
}

/// Pronunciation guidance for the Vietnamese name. Each sub-field is
/// independently optional; a legacy plain-string pronunciation collapses
/// into `simplified` at the validation boundary.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pronunciation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ipa: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub simplified: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tone_guide: Option<String>,
}

/// Item naming. `vietnamese` always carries Vietnamese diacritics and is
/// never translated; `english` is in the resolved display language despite
/// the field name (kept for wire compatibility).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NameBlock {
    pub vietnamese: String,
    pub english: String,
    pub pronunciation: Pronunciation,
}

/// Calorie estimate. Both sub-fields may be absent.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Calories {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SpiceLevel {
    None,
    Mild,
    Medium,
    Hot,
}

impl SpiceLevel {
    pub fn from_str_opt(s: &str) -> Option<Self> {
        match s {
            "none" => Some(SpiceLevel::None),
            "mild" => Some(SpiceLevel::Mild),
            "medium" => Some(SpiceLevel::Medium),
            "hot" => Some(SpiceLevel::Hot),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Temperature {
    Hot,
    Cold,
    Iced,
    Room,
}

impl Temperature {
    pub fn from_str_opt(s: &str) -> Option<Self> {
        match s {
            "hot" => Some(Temperature::Hot),
            "cold" => Some(Temperature::Cold),
            "iced" => Some(Temperature::Iced),
            "room" => Some(Temperature::Room),
            _ => None,
        }
    }
}

/// Sweetness scale shared by drinks and desserts. Desserts never report
/// `none` — the validator rejects it for that category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SweetnessLevel {
    None,
    Light,
    Medium,
    Sweet,
    VerySweet,
}

impl SweetnessLevel {
    pub fn from_str_opt(s: &str) -> Option<Self> {
        match s {
            "none" => Some(SweetnessLevel::None),
            "light" => Some(SweetnessLevel::Light),
            "medium" => Some(SweetnessLevel::Medium),
            "sweet" => Some(SweetnessLevel::Sweet),
            "very_sweet" => Some(SweetnessLevel::VerySweet),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CaffeineContent {
    None,
    Low,
    Medium,
    High,
}

impl CaffeineContent {
    pub fn from_str_opt(s: &str) -> Option<Self> {
        match s {
            "none" => Some(CaffeineContent::None),
            "low" => Some(CaffeineContent::Low),
            "medium" => Some(CaffeineContent::Medium),
            "high" => Some(CaffeineContent::High),
            _ => None,
        }
    }
}

/// Category-conditioned extension fields. Exactly one variant per category;
/// fields from other categories' blocks are stripped during validation.
/// Every field is optional on input — only the base record is mandatory, and
/// an extension field that is present but holds a disallowed value fails
/// validation rather than being dropped.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum CategoryDetails {
    #[serde(rename_all = "camelCase")]
    Food {
        #[serde(skip_serializing_if = "Option::is_none")]
        spice_level: Option<SpiceLevel>,
        #[serde(skip_serializing_if = "Option::is_none")]
        serving_style: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Drink {
        #[serde(skip_serializing_if = "Option::is_none")]
        temperature: Option<Temperature>,
        #[serde(skip_serializing_if = "Option::is_none")]
        sweetness_level: Option<SweetnessLevel>,
        #[serde(skip_serializing_if = "Option::is_none")]
        caffeine_content: Option<CaffeineContent>,
        #[serde(skip_serializing_if = "Option::is_none")]
        serving_size: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Dessert {
        #[serde(skip_serializing_if = "Option::is_none")]
        sweetness_level: Option<SweetnessLevel>,
        #[serde(skip_serializing_if = "Option::is_none")]
        texture: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        best_served: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Snack {
        #[serde(skip_serializing_if = "Option::is_none")]
        spice_level: Option<SpiceLevel>,
        #[serde(skip_serializing_if = "Option::is_none")]
        texture: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        eating_occasion: Option<String>,
    },
}

impl CategoryDetails {
    /// The category this details block belongs to.
    pub fn category(&self) -> Category {
        match self {
            CategoryDetails::Food { .. } => Category::Food,
            CategoryDetails::Drink { .. } => Category::Drink,
            CategoryDetails::Dessert { .. } => Category::Dessert,
            CategoryDetails::Snack { .. } => Category::Snack,
        }
    }
}

/// Fully validated identification record: the base fields every category
/// carries plus the matched category's extension block, flattened on the wire.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DishRecord {
    pub category: Category,
    pub name: NameBlock,
    pub description: String,
    pub ingredients: Vec<String>,
    pub calories: Calories,
    pub allergens: Vec<String>,
    pub cultural_note: String,
    pub confidence: f64,
    #[serde(flatten)]
    pub details: CategoryDetails,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_round_trip() {
        for (s, c) in [
            ("food", Category::Food),
            ("drink", Category::Drink),
            ("dessert", Category::Dessert),
            ("snack", Category::Snack),
        ] {
            assert_eq!(Category::from_str_opt(s), Some(c));
            assert_eq!(c.as_str(), s);
        }
        assert_eq!(Category::from_str_opt("beverage"), None);
    }

    #[test]
    fn details_category_matches_variant() {
        let details = CategoryDetails::Drink {
            temperature: Some(Temperature::Iced),
            sweetness_level: Some(SweetnessLevel::Sweet),
            caffeine_content: Some(CaffeineContent::High),
            serving_size: Some("300ml".into()),
        };
        assert_eq!(details.category(), Category::Drink);
    }

    #[test]
    fn record_serializes_flattened_camel_case() {
        let record = DishRecord {
            category: Category::Food,
            name: NameBlock {
                vietnamese: "Phở Bò".into(),
                english: "Beef noodle soup".into(),
                pronunciation: Pronunciation {
                    ipa: Some("/fəː˧˩˧ ɓɔː˨˩/".into()),
                    simplified: Some("fuh bo".into()),
                    tone_guide: None,
                },
            },
            description: "A noodle soup.".into(),
            ingredients: vec!["rice noodles".into(), "beef".into()],
            calories: Calories {
                estimate: Some(450.0),
                range: Some("400-500".into()),
            },
            allergens: vec!["gluten".into()],
            cultural_note: "Eaten for breakfast.".into(),
            confidence: 0.95,
            details: CategoryDetails::Food {
                spice_level: Some(SpiceLevel::Mild),
                serving_style: Some("with herbs and lime".into()),
            },
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["category"], "food");
        assert_eq!(json["culturalNote"], "Eaten for breakfast.");
        assert_eq!(json["spiceLevel"], "mild");
        assert_eq!(json["servingStyle"], "with herbs and lime");
        assert_eq!(json["name"]["pronunciation"]["simplified"], "fuh bo");
        // Absent optional sub-field is omitted, not null
        assert!(json["name"]["pronunciation"].get("toneGuide").is_none());
    }

    #[test]
    fn sweetness_very_sweet_uses_snake_case() {
        let v = serde_json::to_value(SweetnessLevel::VerySweet).unwrap();
        assert_eq!(v, "very_sweet");
        assert_eq!(
            SweetnessLevel::from_str_opt("very_sweet"),
            Some(SweetnessLevel::VerySweet)
        );
    }
}
