//! Declarative response schemas for the structured generation tasks.
//!
//! A [`ResponseSchema`] serializes directly into the `responseSchema` shape the
//! Gemini API expects (upper-case type tags), and can check a parsed reply
//! against its required fields and primitive types.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SchemaType {
    Object,
    Array,
    String,
    Number,
}

impl SchemaType {
    fn matches(self, v: &Value) -> bool {
        match self {
            SchemaType::Object => v.is_object(),
            SchemaType::Array => v.is_array(),
            SchemaType::String => v.is_string(),
            SchemaType::Number => v.is_number(),
        }
    }
}

impl fmt::Display for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SchemaType::Object => "object",
            SchemaType::Array => "array",
            SchemaType::String => "string",
            SchemaType::Number => "number",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseSchema {
    #[serde(rename = "type")]
    pub kind: SchemaType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, ResponseSchema>,
    /// Declared order of `properties`; Gemini emits fields in this order.
    #[serde(rename = "propertyOrdering", default, skip_serializing_if = "Vec::is_empty")]
    pub property_ordering: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<ResponseSchema>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
}

/// One place where a reply does not match its schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub path: String,
    pub reason: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.reason)
    }
}

impl ResponseSchema {
    fn leaf(kind: SchemaType) -> Self {
        Self {
            kind,
            description: None,
            properties: BTreeMap::new(),
            property_ordering: Vec::new(),
            items: None,
            required: Vec::new(),
        }
    }

    pub fn string() -> Self {
        Self::leaf(SchemaType::String)
    }

    pub fn number() -> Self {
        Self::leaf(SchemaType::Number)
    }

    pub fn array(items: ResponseSchema) -> Self {
        Self { items: Some(Box::new(items)), ..Self::leaf(SchemaType::Array) }
    }

    /// Object whose listed properties are all required.
    pub fn object<I, K>(props: I) -> Self
    where
        I: IntoIterator<Item = (K, ResponseSchema)>,
        K: Into<String>,
    {
        let mut properties = BTreeMap::new();
        let mut required = Vec::new();
        for (k, v) in props {
            let k = k.into();
            required.push(k.clone());
            properties.insert(k, v);
        }
        Self { properties, property_ordering: required.clone(), required, ..Self::leaf(SchemaType::Object) }
    }

    pub fn describe(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }

    pub fn required_fields(&self) -> &[String] {
        &self.required
    }

    /// JSON form sent as `generationConfig.responseSchema`.
    pub fn to_wire(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    pub fn validate(&self, value: &Value) -> Vec<Violation> {
        let mut out = Vec::new();
        self.walk("$", value, &mut out);
        out
    }

    fn walk(&self, path: &str, value: &Value, out: &mut Vec<Violation>) {
        if !self.kind.matches(value) {
            out.push(Violation { path: path.to_string(), reason: format!("expected {}", self.kind) });
            return;
        }
        match self.kind {
            SchemaType::Object => {
                let obj = match value.as_object() {
                    Some(o) => o,
                    None => return,
                };
                for name in &self.required {
                    if !obj.contains_key(name) {
                        out.push(Violation {
                            path: format!("{path}.{name}"),
                            reason: "missing required field".into(),
                        });
                    }
                }
                for name in &self.property_ordering {
                    if let (Some(sub), Some(v)) = (self.properties.get(name), obj.get(name)) {
                        sub.walk(&format!("{path}.{name}"), v, out);
                    }
                }
            }
            SchemaType::Array => {
                if let (Some(items), Some(arr)) = (&self.items, value.as_array()) {
                    for (i, v) in arr.iter().enumerate() {
                        items.walk(&format!("{path}[{i}]"), v, out);
                    }
                }
            }
            SchemaType::String | SchemaType::Number => {}
        }
    }
}

pub fn training_plan_schema() -> ResponseSchema {
    let exercise = ResponseSchema::object([
        ("name", ResponseSchema::string().describe("Name of the exercise.")),
        ("sets", ResponseSchema::string().describe("Number of sets (e.g., '3-4').")),
        ("reps", ResponseSchema::string().describe("Number of repetitions (e.g., '8-12').")),
        ("rest", ResponseSchema::string().describe("Rest time between sets in seconds (e.g., '60s').")),
    ]);
    let day = ResponseSchema::object([
        ("day", ResponseSchema::string().describe("Day of the week (e.g., Monday).")),
        (
            "focus",
            ResponseSchema::string().describe(
                "Main muscle group or workout type for the day (e.g., Chest & Triceps, Legs, Cardio, Rest).",
            ),
        ),
        ("exercises", ResponseSchema::array(exercise)),
    ]);
    ResponseSchema::object([(
        "weekly_plan",
        ResponseSchema::array(day).describe("A 7-day workout plan."),
    )])
}

pub fn diet_plan_schema() -> ResponseSchema {
    let meal = ResponseSchema::object([
        ("meal_type", ResponseSchema::string().describe("e.g., Breakfast, Lunch, Dinner, Snack.")),
        ("description", ResponseSchema::string().describe("Description of the meal.")),
        ("calories", ResponseSchema::number().describe("Estimated calories for the meal.")),
    ]);
    let day = ResponseSchema::object([
        ("day", ResponseSchema::string().describe("Day of the week (e.g., Monday).")),
        ("meals", ResponseSchema::array(meal)),
        ("total_calories", ResponseSchema::number().describe("Total estimated calories for the day.")),
    ]);
    ResponseSchema::object([(
        "diet_plan",
        ResponseSchema::array(day).describe("A 7-day diet plan."),
    )])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn training_schema_wire_shape() {
        let w = training_plan_schema().to_wire();
        assert_eq!(w["type"], "OBJECT");
        assert_eq!(w["required"], json!(["weekly_plan"]));
        let day = &w["properties"]["weekly_plan"]["items"];
        assert_eq!(day["type"], "OBJECT");
        assert_eq!(day["required"], json!(["day", "focus", "exercises"]));
        let ex = &day["properties"]["exercises"]["items"];
        assert_eq!(ex["properties"]["reps"]["type"], "STRING");
        assert_eq!(ex["required"], json!(["name", "sets", "reps", "rest"]));
    }

    #[test]
    fn diet_schema_uses_numbers_for_calories() {
        let w = diet_plan_schema().to_wire();
        let day = &w["properties"]["diet_plan"]["items"];
        assert_eq!(day["properties"]["total_calories"]["type"], "NUMBER");
        assert_eq!(day["properties"]["meals"]["items"]["properties"]["calories"]["type"], "NUMBER");
        assert_eq!(day["required"], json!(["day", "meals", "total_calories"]));
    }

    #[test]
    fn property_ordering_follows_declaration() {
        let w = training_plan_schema().to_wire();
        let day = &w["properties"]["weekly_plan"]["items"];
        assert_eq!(day["propertyOrdering"], json!(["day", "focus", "exercises"]));
        let meal = &diet_plan_schema().to_wire()["properties"]["diet_plan"]["items"]["properties"]["meals"]["items"];
        assert_eq!(meal["propertyOrdering"], json!(["meal_type", "description", "calories"]));
    }

    #[test]
    fn violations_are_reported_in_declared_order() {
        let v = json!({ "weekly_plan": [{ "day": 1, "focus": 2, "exercises": "none" }] });
        let paths: Vec<_> = training_plan_schema().validate(&v).into_iter().map(|v| v.path).collect();
        assert_eq!(
            paths,
            vec!["$.weekly_plan[0].day", "$.weekly_plan[0].focus", "$.weekly_plan[0].exercises"]
        );
    }

    #[test]
    fn leaf_schemas_omit_empty_collections() {
        let w = ResponseSchema::string().to_wire();
        assert_eq!(w, json!({ "type": "STRING" }));
    }

    #[test]
    fn valid_training_reply_has_no_violations() {
        let v = json!({
            "weekly_plan": [
                { "day": "Monday", "focus": "Legs", "exercises": [
                    { "name": "Squat", "sets": "3-4", "reps": "8-12", "rest": "60s" }
                ]},
                { "day": "Tuesday", "focus": "Rest", "exercises": [] }
            ]
        });
        assert!(training_plan_schema().validate(&v).is_empty());
    }

    #[test]
    fn missing_and_mistyped_fields_are_reported_with_paths() {
        let v = json!({
            "diet_plan": [
                { "day": "Monday", "meals": [
                    { "meal_type": "Lunch", "description": "Rice", "calories": "600" }
                ]}
            ]
        });
        let got = diet_plan_schema().validate(&v);
        let paths: Vec<_> = got.iter().map(|v| v.path.as_str()).collect();
        assert!(paths.contains(&"$.diet_plan[0].total_calories"));
        assert!(paths.contains(&"$.diet_plan[0].meals[0].calories"));
        assert_eq!(got.len(), 2);
    }

    #[test]
    fn wrong_root_type_stops_descent() {
        let got = training_plan_schema().validate(&json!([1, 2]));
        assert_eq!(got, vec![Violation { path: "$".into(), reason: "expected object".into() }]);
    }

    #[test]
    fn required_fields_lists_top_level_names() {
        assert_eq!(diet_plan_schema().required_fields(), ["diet_plan".to_string()]);
    }
}
