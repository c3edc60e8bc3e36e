use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::ApiError;
use crate::model::{bmi, Athlete, Level, Occupation, SleepQuality};

/// A validated `POST /predict` payload.
///
/// Categorical fields keep their `Unknown` variant here; rejecting them is
/// left to feature encoding so that missing and malformed fields are
/// reported first.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionRequest {
    pub occupation: Occupation,
    pub age: i64,
    pub sleep_duration: f64,
    pub heart_rate: f64,
    pub physical_activity: Level,
    pub stress_level: Level,
    pub athlete: Athlete,
    pub height: f64,
    pub weight: f64,
}

impl PredictionRequest {
    /// Extracts fields in a fixed order, so the first missing or malformed
    /// field is the one reported.
    pub fn from_json(body: &Value) -> Result<Self, ApiError> {
        let obj = body
            .as_object()
            .ok_or_else(|| ApiError::MalformedBody("Request body must be a JSON object".into()))?;

        let occupation = Occupation::from_label(label(required(obj, "occupation")?));
        let age = integer("age", required(obj, "age")?)?;
        let sleep_duration = real("sleep_duration", required(obj, "sleep_duration")?)?;
        let heart_rate = real("heart_rate", required(obj, "heart_rate")?)?;
        let physical_activity = Level::from_label(label(required(obj, "physical_activity")?));
        let stress_level = Level::from_label(label(required(obj, "stress_level")?));
        let athlete = Athlete::from_label(label(required(obj, "athlete")?));
        let height = real("height", required(obj, "height")?)?;
        let weight = real("weight", required(obj, "weight")?)?;

        if height <= 0.0 {
            return Err(ApiError::invalid_value("height", "must be greater than zero"));
        }
        if weight <= 0.0 {
            return Err(ApiError::invalid_value("weight", "must be greater than zero"));
        }
        if !bmi(height, weight).is_finite() {
            return Err(ApiError::invalid_value(
                "height",
                "height and weight do not give a finite BMI",
            ));
        }

        Ok(Self {
            occupation,
            age,
            sleep_duration,
            heart_rate,
            physical_activity,
            stress_level,
            athlete,
            height,
            weight,
        })
    }
}

fn required<'a>(obj: &'a Map<String, Value>, field: &'static str) -> Result<&'a Value, ApiError> {
    obj.get(field).ok_or(ApiError::MissingField(field))
}

// Non-string categories can never match a table entry.
fn label(value: &Value) -> &str {
    value.as_str().unwrap_or_default()
}

fn integer(field: &'static str, value: &Value) -> Result<i64, ApiError> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Ok(i);
            }
            match n.as_f64() {
                Some(f) if f.is_finite() && f.abs() < i64::MAX as f64 => Ok(f.trunc() as i64),
                _ => Err(ApiError::invalid_value(field, format!("{n} is out of range"))),
            }
        }
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| ApiError::invalid_value(field, format!("cannot parse {s:?} as an integer"))),
        other => Err(ApiError::invalid_value(
            field,
            format!("expected an integer, got {}", kind(other)),
        )),
    }
}

fn real(field: &'static str, value: &Value) -> Result<f64, ApiError> {
    let parsed = match value {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| ApiError::invalid_value(field, format!("{n} is out of range")))?,
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| ApiError::invalid_value(field, format!("cannot parse {s:?} as a number")))?,
        other => {
            return Err(ApiError::invalid_value(
                field,
                format!("expected a number, got {}", kind(other)),
            ))
        }
    };

    if !parsed.is_finite() {
        return Err(ApiError::invalid_value(field, "must be a finite number"));
    }
    Ok(parsed)
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[derive(Debug, Serialize)]
pub struct PredictionResponse {
    pub predicted_sleep_quality: SleepQuality,
}
