//! Schema validation and normalization of the model's parsed JSON.
//!
//! Confirms every base field exists, checks enumerated and numeric fields
//! against their allowed sets, and keeps only the extension fields belonging
//! to the detected category. The model occasionally emits fields from more
//! than one category block; those are stripped, not errors. The legacy
//! plain-string pronunciation shape is collapsed into the canonical object
//! here so nothing downstream branches on it.

use serde_json::Value;

use super::types::{
    CaffeineContent, Calories, Category, CategoryDetails, DishRecord, NameBlock, Pronunciation,
    SpiceLevel, SweetnessLevel, Temperature,
};
use super::IdentifyError;

/// Validate a parsed model response into a typed record.
pub fn validate_record(value: &Value) -> Result<DishRecord, IdentifyError> {
    let obj = value
        .as_object()
        .ok_or_else(|| violation("response is not a JSON object"))?;

    let category_str = require_str(value, "category")?;
    let category = Category::from_str_opt(category_str)
        .ok_or_else(|| violation(&format!("unknown category \"{category_str}\"")))?;

    let name = validate_name(
        obj.get("name")
            .ok_or_else(|| violation("missing required field \"name\""))?,
    )?;

    let description = require_str(value, "description")?.to_string();
    let ingredients = require_string_array(value, "ingredients")?;
    let calories = validate_calories(obj.get("calories"))?;
    let allergens = require_string_array(value, "allergens")?;
    let cultural_note = require_str(value, "culturalNote")?.to_string();
    let confidence = validate_confidence(obj.get("confidence"))?;

    let details = validate_details(value, category)?;

    Ok(DishRecord {
        category,
        name,
        description,
        ingredients,
        calories,
        allergens,
        cultural_note,
        confidence,
        details,
    })
}

fn violation(reason: &str) -> IdentifyError {
    IdentifyError::SchemaViolation(reason.to_string())
}

// ──────────────────────────────────────────────
// Base record fields
// ──────────────────────────────────────────────

fn require_str<'a>(value: &'a Value, field: &str) -> Result<&'a str, IdentifyError> {
    match value.get(field) {
        Some(Value::String(s)) => Ok(s),
        Some(_) => Err(violation(&format!("field \"{field}\" must be a string"))),
        None => Err(violation(&format!("missing required field \"{field}\""))),
    }
}

fn require_string_array(value: &Value, field: &str) -> Result<Vec<String>, IdentifyError> {
    match value.get(field) {
        Some(Value::Array(items)) => Ok(items
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect()),
        Some(_) => Err(violation(&format!("field \"{field}\" must be an array"))),
        None => Err(violation(&format!("missing required field \"{field}\""))),
    }
}

fn optional_str(value: &Value, field: &str) -> Option<String> {
    value.get(field).and_then(|v| v.as_str()).map(str::to_string)
}

fn validate_confidence(value: Option<&Value>) -> Result<f64, IdentifyError> {
    let confidence = value
        .ok_or_else(|| violation("missing required field \"confidence\""))?
        .as_f64()
        .ok_or_else(|| violation("field \"confidence\" must be a number"))?;
    if !(0.0..=1.0).contains(&confidence) {
        return Err(violation(&format!(
            "confidence {confidence} is outside [0, 1]"
        )));
    }
    Ok(confidence)
}

fn validate_calories(value: Option<&Value>) -> Result<Calories, IdentifyError> {
    match value {
        None => Err(violation("missing required field \"calories\"")),
        // Null tolerated: both sub-fields are independently optional anyway.
        Some(Value::Null) => Ok(Calories::default()),
        Some(v @ Value::Object(_)) => {
            let estimate = match v.get("estimate") {
                None | Some(Value::Null) => None,
                Some(e) => Some(
                    e.as_f64()
                        .ok_or_else(|| violation("calories.estimate must be a number"))?,
                ),
            };
            Ok(Calories {
                estimate,
                range: optional_str(v, "range"),
            })
        }
        Some(_) => Err(violation("field \"calories\" must be an object")),
    }
}

fn validate_name(value: &Value) -> Result<NameBlock, IdentifyError> {
    if !value.is_object() {
        return Err(violation("field \"name\" must be an object"));
    }

    let vietnamese = require_str(value, "vietnamese")?.trim().to_string();
    if vietnamese.is_empty() {
        return Err(violation("name.vietnamese must be non-empty"));
    }
    let english = require_str(value, "english")?.to_string();
    let pronunciation = normalize_pronunciation(value.get("pronunciation"))?;

    Ok(NameBlock {
        vietnamese,
        english,
        pronunciation,
    })
}

/// Normalize pronunciation into the canonical object shape. The older format
/// was a plain phonetic string; it maps to `simplified` with the other
/// sub-fields absent. Each object sub-field is independently optional.
fn normalize_pronunciation(value: Option<&Value>) -> Result<Pronunciation, IdentifyError> {
    match value {
        None | Some(Value::Null) => Ok(Pronunciation::default()),
        Some(Value::String(s)) => Ok(Pronunciation {
            ipa: None,
            simplified: Some(s.clone()),
            tone_guide: None,
        }),
        Some(v @ Value::Object(_)) => Ok(Pronunciation {
            ipa: optional_str(v, "ipa"),
            simplified: optional_str(v, "simplified"),
            tone_guide: optional_str(v, "toneGuide"),
        }),
        Some(_) => Err(violation(
            "name.pronunciation must be a string or an object",
        )),
    }
}

// ──────────────────────────────────────────────
// Category extension fields
// ──────────────────────────────────────────────

/// Build the matched category's details block, reading only that category's
/// fields. Anything else in the raw JSON is ignored by construction.
fn validate_details(value: &Value, category: Category) -> Result<CategoryDetails, IdentifyError> {
    match category {
        Category::Food => Ok(CategoryDetails::Food {
            spice_level: enum_field(value, "spiceLevel", SpiceLevel::from_str_opt)?,
            serving_style: optional_str(value, "servingStyle"),
        }),
        Category::Drink => Ok(CategoryDetails::Drink {
            temperature: enum_field(value, "temperature", Temperature::from_str_opt)?,
            sweetness_level: enum_field(value, "sweetnessLevel", SweetnessLevel::from_str_opt)?,
            caffeine_content: enum_field(value, "caffeineContent", CaffeineContent::from_str_opt)?,
            serving_size: optional_str(value, "servingSize"),
        }),
        Category::Dessert => {
            let sweetness_level =
                enum_field(value, "sweetnessLevel", SweetnessLevel::from_str_opt)?;
            // Desserts use the narrower scale: "none" is not an allowed value.
            if sweetness_level == Some(SweetnessLevel::None) {
                return Err(violation("sweetnessLevel \"none\" is not valid for dessert"));
            }
            Ok(CategoryDetails::Dessert {
                sweetness_level,
                texture: optional_str(value, "texture"),
                best_served: optional_str(value, "bestServed"),
            })
        }
        Category::Snack => Ok(CategoryDetails::Snack {
            spice_level: enum_field(value, "spiceLevel", SpiceLevel::from_str_opt)?,
            texture: optional_str(value, "texture"),
            eating_occasion: optional_str(value, "eatingOccasion"),
        }),
    }
}

/// Read an optional enumerated field. Absent is fine; present but outside
/// the allowed set (or not a string) is a violation.
fn enum_field<T>(
    value: &Value,
    field: &str,
    parse: fn(&str) -> Option<T>,
) -> Result<Option<T>, IdentifyError> {
    match value.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => parse(s)
            .map(Some)
            .ok_or_else(|| violation(&format!("field \"{field}\" has disallowed value \"{s}\""))),
        Some(_) => Err(violation(&format!("field \"{field}\" must be a string"))),
    }
}
