//! Instruction text sent to the vision model.
//!
//! The prompt encodes the category-dependent output schema, the display
//! language for free-text fields, the six-tone IPA notation convention, and
//! the not-recognized fallback contract. Building is deterministic and
//! side-effect-free: identical inputs yield byte-identical output.

/// Build the identification prompt for a resolved display language.
pub fn build_prompt(display_language: &str) -> String {
    format!(
        r#"You are a Vietnamese cuisine expert and linguist. Analyze this image and identify the Vietnamese item (food, drink, dessert, snack, etc.).

Return ONLY a JSON object with NO markdown formatting or explanation.

IMPORTANT RULES:
- "vietnamese" name field must ALWAYS be in Vietnamese with proper diacritics/tones
- "pronunciation" field must be IPA transcription of the VIETNAMESE name only
- ALL other text fields must be in {display_language}
- Choose the correct "category" and include ONLY the fields relevant to that category

=== CATEGORY DETECTION ===
Detect the category based on the item:
- "food": Main dishes, soups, noodles (Phở, Bún, Cơm Tấm, Bánh Cuốn...)
- "drink": Beverages (Cà Phê, Trà, Sinh Tố, Nước Mía, Chè...)
- "dessert": Sweet treats, cakes, pastries (Bánh Flan, Bánh Bò, Bánh Chuối...)
- "snack": Street snacks (Bánh Tráng Trộn, Bột Chiên, Xôi...)

=== RESPONSE STRUCTURE BY CATEGORY ===

**FOR ALL CATEGORIES (required fields):**
{{
  "category": "food" | "drink" | "dessert" | "snack",
  "name": {{
    "vietnamese": "string (ALWAYS Vietnamese with diacritics)",
    "english": "string (in {display_language})",
    "pronunciation": {{
      "ipa": "string (IPA of Vietnamese name, e.g. /fəː˧˩˧/)",
      "simplified": "string (phonetic guide for {display_language} speakers)",
      "toneGuide": "string (tone description in {display_language})"
    }}
  }},
  "description": "string (max 100 words, in {display_language})",
  "ingredients": ["string (in {display_language})"],
  "calories": {{ "estimate": number, "range": "string" }},
  "allergens": ["string (in {display_language})"],
  "culturalNote": "string (max 50 words, in {display_language})",
  "confidence": number (0-1)
}}

**ADDITIONAL FIELDS BY CATEGORY:**

For "food" ADD:
- "spiceLevel": "none" | "mild" | "medium" | "hot"
- "servingStyle": "string (e.g., 'served with herbs and lime', in {display_language})"

For "drink" ADD:
- "temperature": "hot" | "cold" | "iced" | "room"
- "sweetnessLevel": "none" | "light" | "medium" | "sweet" | "very_sweet"
- "caffeineContent": "none" | "low" | "medium" | "high" (for coffee/tea)
- "servingSize": "string (e.g., '300ml')"

For "dessert" ADD:
- "sweetnessLevel": "light" | "medium" | "sweet" | "very_sweet"
- "texture": "string (e.g., 'soft and chewy', in {display_language})"
- "bestServed": "string (e.g., 'chilled', in {display_language})"

For "snack" ADD:
- "spiceLevel": "none" | "mild" | "medium" | "hot"
- "texture": "string (e.g., 'crispy', in {display_language})"
- "eatingOccasion": "string (e.g., 'afternoon snack', in {display_language})"

=== IPA TONE MARKERS ===
Vietnamese 6 tones:
- ngang (level): ˧
- sắc (rising): ˧˥
- huyền (falling): ˨˩
- hỏi (dipping-rising): ˧˩˧
- ngã (rising glottalized): ˧˥ˀ
- nặng (low glottalized): ˨˩ˀ

=== ERROR HANDLING ===
If image is NOT Vietnamese food/drink/dessert/snack, return:
{{"error": "NOT_VIETNAMESE_ITEM", "suggestion": "string (what the image appears to be, in {display_language})"}}"#
    )
}
