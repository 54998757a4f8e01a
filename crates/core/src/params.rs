//! Helpers for reading sketch parameters out of a `serde_json::Value` object
//! and for describing them in a parameter schema.
//!
//! Readers never fail: a missing or mistyped key yields the default.

use serde_json::{json, Value};

/// `params[name]` as `f64`, accepting integers too.
pub fn param_f64(params: &Value, name: &str, default: f64) -> f64 {
    params.get(name).and_then(Value::as_f64).unwrap_or(default)
}

/// `params[name]` as `f64`, clamped to `[min, max]`. Non-finite values fall back to the default.
pub fn param_f64_in(params: &Value, name: &str, default: f64, min: f64, max: f64) -> f64 {
    let v = param_f64(params, name, default);
    if v.is_finite() {
        v.clamp(min, max)
    } else {
        default
    }
}

/// `params[name]` as a non-negative integer.
pub fn param_usize(params: &Value, name: &str, default: usize) -> usize {
    params
        .get(name)
        .and_then(Value::as_u64)
        .and_then(|v| usize::try_from(v).ok())
        .unwrap_or(default)
}

/// `params[name]` as a non-negative integer that fits in `u32`, e.g. a frame count.
pub fn param_u32(params: &Value, name: &str, default: u32) -> u32 {
    params
        .get(name)
        .and_then(Value::as_u64)
        .and_then(|v| u32::try_from(v).ok())
        .unwrap_or(default)
}

pub fn param_bool(params: &Value, name: &str, default: bool) -> bool {
    params.get(name).and_then(Value::as_bool).unwrap_or(default)
}

pub fn param_string(params: &Value, name: &str, default: &str) -> String {
    params
        .get(name)
        .and_then(Value::as_str)
        .map(String::from)
        .unwrap_or_else(|| default.to_owned())
}

/// One numeric entry of a parameter schema.
pub fn number_schema(kind: &str, default: f64, min: f64, max: f64, description: &str) -> Value {
    json!({
        "type": kind,
        "default": default,
        "min": min,
        "max": max,
        "description": description,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    // ---- param_f64 ----

    #[test]
    fn param_f64_reads_floats_and_integers() {
        let params = json!({"speed": 2.5, "frames": 10});
        assert!((param_f64(&params, "speed", 1.0) - 2.5).abs() < f64::EPSILON);
        assert!((param_f64(&params, "frames", 0.0) - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn param_f64_falls_back_on_missing_or_wrong_type() {
        let params = json!({"speed": "fast", "friction": null});
        assert!((param_f64(&params, "speed", 1.0) - 1.0).abs() < f64::EPSILON);
        assert!((param_f64(&params, "friction", 0.07) - 0.07).abs() < f64::EPSILON);
        assert!((param_f64(&params, "absent", 3.0) - 3.0).abs() < f64::EPSILON);
        assert!((param_f64(&json!("not an object"), "speed", 7.0) - 7.0).abs() < f64::EPSILON);
    }

    #[test]
    fn param_f64_in_clamps() {
        let params = json!({"friction": 4.0, "spring": -1.0});
        assert_eq!(param_f64_in(&params, "friction", 0.07, 0.0, 1.0), 1.0);
        assert_eq!(param_f64_in(&params, "spring", 0.001, 0.0, 1.0), 0.0);
        assert_eq!(param_f64_in(&params, "absent", 0.5, 0.0, 1.0), 0.5);
    }

    // ---- integers ----

    #[test]
    fn param_usize_rejects_floats_and_negatives() {
        let params = json!({"lines": 12, "half": 2.5, "neg": -1});
        assert_eq!(param_usize(&params, "lines", 0), 12);
        assert_eq!(param_usize(&params, "half", 99), 99);
        assert_eq!(param_usize(&params, "neg", 5), 5);
    }

    #[test]
    fn param_u32_rejects_out_of_range() {
        let params = json!({"birth": 30, "huge": 5_000_000_000_u64});
        assert_eq!(param_u32(&params, "birth", 0), 30);
        assert_eq!(param_u32(&params, "huge", 7), 7);
    }

    // ---- param_bool / param_string ----

    #[test]
    fn param_bool_requires_boolean() {
        let params = json!({"texture": false, "numeric": 1});
        assert!(!param_bool(&params, "texture", true));
        assert!(!param_bool(&params, "numeric", false));
        assert!(param_bool(&params, "absent", true));
    }

    #[test]
    fn param_string_reads_strings_only() {
        let params = json!({"blend": "burn", "empty": "", "number": 42});
        assert_eq!(param_string(&params, "blend", "multiply"), "burn");
        assert_eq!(param_string(&params, "empty", "x"), "");
        assert_eq!(param_string(&params, "number", "fallback"), "fallback");
    }

    // ---- schema ----

    #[test]
    fn number_schema_has_expected_keys() {
        let entry = number_schema("number", 0.07, 0.0, 1.0, "friction");
        assert_eq!(entry["type"], "number");
        assert_eq!(entry["default"], 0.07);
        assert_eq!(entry["max"], 1.0);
        assert_eq!(entry["description"], "friction");
    }
}
