//! Field readers for persisted scenario records.
//!
//! Records come from user-edited scenario files, so every reader returns
//! `None` instead of failing and the caller substitutes a default.

use serde_json::Value;

use super::color::{channel, parse_css_color, Rgb};

pub fn string_field<'a>(record: &'a Value, field: &str) -> Option<&'a str> {
    record
        .get(field)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

pub fn bool_field(record: &Value, field: &str) -> Option<bool> {
    record.get(field).and_then(Value::as_bool)
}

pub fn number_field(record: &Value, field: &str) -> Option<f64> {
    record
        .get(field)
        .and_then(Value::as_f64)
        .filter(|v| v.is_finite())
}

/// An array whose every element is a number.
pub fn number_array_field(record: &Value, field: &str) -> Option<Vec<f64>> {
    record
        .get(field)?
        .as_array()?
        .iter()
        .map(Value::as_f64)
        .collect()
}

/// An array of `[r, g, b]` float triples.
pub fn triple_array_field(record: &Value, field: &str) -> Option<Vec<[f64; 3]>> {
    record
        .get(field)?
        .as_array()?
        .iter()
        .map(|item| {
            let items = item.as_array()?;
            if items.len() != 3 {
                return None;
            }
            Some([items[0].as_f64()?, items[1].as_f64()?, items[2].as_f64()?])
        })
        .collect()
}

/// A colour given as a CSS string, a `[r, g, b]` byte array or an `{r, g, b}` object.
pub fn color_value(value: &Value) -> Option<Rgb> {
    match value {
        Value::String(text) => parse_css_color(text),
        Value::Array(items) if items.len() == 3 => Some([
            channel(items[0].as_f64()?),
            channel(items[1].as_f64()?),
            channel(items[2].as_f64()?),
        ]),
        Value::Object(map) => Some([
            channel(map.get("r")?.as_f64()?),
            channel(map.get("g")?.as_f64()?),
            channel(map.get("b")?.as_f64()?),
        ]),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalar_fields() {
        let record = json!({"name": "Greens", "empty": "", "flag": true, "depth": 3});
        assert_eq!(string_field(&record, "name"), Some("Greens"));
        assert_eq!(string_field(&record, "empty"), None);
        assert_eq!(string_field(&record, "depth"), None);
        assert_eq!(bool_field(&record, "flag"), Some(true));
        assert_eq!(number_field(&record, "depth"), Some(3.0));
        assert_eq!(number_field(&record, "missing"), None);
    }

    #[test]
    fn test_array_fields() {
        let record = json!({
            "cps": [0, 0.5, 1],
            "mixed": [0, "x"],
            "colors": [[1, 0, 0], [0, 1, 0]],
            "short": [[1, 0], [0, 1, 0]]
        });
        assert_eq!(
            number_array_field(&record, "cps"),
            Some(vec![0.0, 0.5, 1.0])
        );
        assert_eq!(number_array_field(&record, "mixed"), None);
        assert_eq!(
            triple_array_field(&record, "colors"),
            Some(vec![[1.0, 0.0, 0.0], [0.0, 1.0, 0.0]])
        );
        assert_eq!(triple_array_field(&record, "short"), None);
    }

    #[test]
    fn test_color_value_forms() {
        assert_eq!(color_value(&json!("rgb(10, 20, 30)")), Some([10, 20, 30]));
        assert_eq!(color_value(&json!([10, 20, 30])), Some([10, 20, 30]));
        assert_eq!(
            color_value(&json!({"r": 10, "g": 20, "b": 30})),
            Some([10, 20, 30])
        );
        assert_eq!(color_value(&json!(42)), None);
        assert_eq!(color_value(&json!([10, 20])), None);
    }
}
