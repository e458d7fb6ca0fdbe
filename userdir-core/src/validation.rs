//! # Load pipeline
//!
//! Turns raw JSON records into [`User`]s according to the configured
//! [`ValidationPolicy`].
//!
//! 1. A record that is not a JSON object cannot be repaired: it is an error
//!    under `Strict` and skipped otherwise.
//! 2. Required fields that are absent or `null` are missing. `Strict` fails,
//!    `Skip` drops the record, `AutoFix` substitutes placeholders (the record
//!    index for the id).
//! 3. The id must convert to an `i64`: integers, booleans, finite floats
//!    (truncated toward zero) and decimal integer strings do. Invalid ids
//!    follow the same policy split.
//! 4. Optional fields that are absent or `null` always receive placeholders.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::metrics::names;
use crate::{DirectoryConfig, DirectoryError, Field, Metrics, Result, User, ValidationPolicy};

/// Result of validating one record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Validated {
    /// Accepted unchanged (optional placeholders aside).
    Clean(User),
    /// Accepted after auto-fixing missing fields or an invalid id.
    Fixed(User),
    /// Dropped, with the reason.
    Skipped(String),
}

impl Validated {
    pub fn into_user(self) -> Option<User> {
        match self {
            Validated::Clean(user) | Validated::Fixed(user) => Some(user),
            Validated::Skipped(_) => None,
        }
    }
}

/// Summary of one load into a store.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    /// Records handed to the load.
    pub received: usize,
    /// Distinct ids the load left in the store.
    pub loaded: usize,
    /// Accepted records that needed repairs.
    pub auto_fixed: usize,
    pub skipped: usize,
    /// Accepted records whose id was already taken; they replaced the earlier record.
    pub duplicates: usize,
}

/// Validates a single raw record. `index` is the record's position and
/// doubles as the repaired id under `AutoFix`.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use userdir_core::{validate_record, DirectoryConfig, Validated};
///
/// let config = DirectoryConfig::default();
/// let outcome = validate_record(&json!({"id": "7", "name": "Ada"}), 0, &config).unwrap();
/// match outcome {
///     Validated::Fixed(user) => {
///         assert_eq!(user.id, 7);
///         assert_eq!(user.email, "UNKNOWN");
///     }
///     other => panic!("unexpected {:?}", other),
/// }
/// ```
pub fn validate_record(record: &Value, index: usize, config: &DirectoryConfig) -> Result<Validated> {
    let Some(object) = record.as_object() else {
        let reason = format!("record at index {} is not an object", index);
        tracing::error!(index, "{}", reason);
        return reject(config.validation, index, reason);
    };

    let missing: Vec<Field> = config
        .required_fields
        .iter()
        .copied()
        .filter(|field| is_absent(object, *field))
        .collect();

    let mut fixed = false;
    if !missing.is_empty() {
        let listed = missing.iter().map(|f| f.as_str()).collect::<Vec<_>>().join(", ");
        let reason = format!("record at index {} is missing fields: {}", index, listed);
        tracing::warn!(index, missing = %listed, "record is missing required fields");
        match config.validation {
            ValidationPolicy::AutoFix => fixed = true,
            policy => return reject(policy, index, reason),
        }
    }

    let id = match object.get(Field::Id.as_str()).and_then(parse_id) {
        Some(id) => id,
        None => {
            let raw = object.get(Field::Id.as_str()).cloned().unwrap_or(Value::Null);
            match config.validation {
                ValidationPolicy::AutoFix => {
                    tracing::debug!(index, id = %raw, "repairing id from record index");
                    fixed = true;
                    index as i64
                }
                policy => {
                    let reason = format!("record at index {} has invalid id: {}", index, raw);
                    tracing::error!(index, id = %raw, "record has an invalid id");
                    return reject(policy, index, reason);
                }
            }
        }
    };

    let mut user = User::new(id, String::new(), String::new());
    for field in Field::ALL.into_iter().filter(|f| *f != Field::Id) {
        let text = match object.get(field.as_str()) {
            None | Some(Value::Null) => field.placeholder().unwrap_or_default().to_string(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        };
        user.set_text(field, text);
    }

    if fixed {
        tracing::debug!(index, id, "auto-fixed record");
        Ok(Validated::Fixed(user))
    } else {
        Ok(Validated::Clean(user))
    }
}

/// Validates a batch, counting outcomes into `metrics`. Auto-fixed records
/// count as both fixed and passed.
///
/// Fails on the first rejected record under `Strict`; nothing is returned
/// for the records validated before it.
pub(crate) fn validate_all(
    records: &[Value],
    first_index: usize,
    config: &DirectoryConfig,
    metrics: Option<&Metrics>,
) -> Result<(Vec<User>, LoadReport)> {
    let mut report = LoadReport {
        received: records.len(),
        ..LoadReport::default()
    };
    let mut users = Vec::with_capacity(records.len());

    for (offset, record) in records.iter().enumerate() {
        let outcome = match validate_record(record, first_index + offset, config) {
            Ok(outcome) => outcome,
            Err(e) => {
                count(metrics, names::VALIDATION_ERRORS);
                return Err(e);
            }
        };

        match outcome {
            Validated::Clean(user) => {
                count(metrics, names::VALIDATION_PASSED);
                users.push(user);
            }
            Validated::Fixed(user) => {
                count(metrics, names::VALIDATION_AUTO_FIXED);
                count(metrics, names::VALIDATION_PASSED);
                report.auto_fixed += 1;
                users.push(user);
            }
            Validated::Skipped(reason) => {
                tracing::warn!(index = first_index + offset, %reason, "skipping record");
                count(metrics, names::VALIDATION_SKIPPED);
                report.skipped += 1;
            }
        }
    }

    Ok((users, report))
}

fn count(metrics: Option<&Metrics>, name: &str) {
    if let Some(metrics) = metrics {
        metrics.increment(name, 1);
    }
}

fn reject(policy: ValidationPolicy, index: usize, reason: String) -> Result<Validated> {
    match policy {
        ValidationPolicy::Strict => Err(DirectoryError::Validation { index, reason }),
        ValidationPolicy::Skip | ValidationPolicy::AutoFix => Ok(Validated::Skipped(reason)),
    }
}

fn is_absent(object: &Map<String, Value>, field: Field) -> bool {
    matches!(object.get(field.as_str()), None | Some(Value::Null))
}

/// Converts a JSON id to `i64`.
///
/// Floats are truncated toward zero and booleans read as 0 and 1. Strings must
/// hold a decimal integer. Values outside the `i64` range are rejected.
fn parse_id(value: &Value) -> Option<i64> {
    // 2^63 is exact as f64; anything at or above it does not fit.
    const UPPER: f64 = 9_223_372_036_854_775_808.0;

    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .map(f64::trunc)
                .filter(|f| f.is_finite() && *f >= -UPPER && *f < UPPER)
                .map(|f| f as i64)
        }),
        Value::Bool(b) => Some(i64::from(*b)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
