//! # Filters
//!
//! Predicates over [`User`] records.
//!
//! - [`FieldMatch`] - exact equality on one field
//! - [`SubstringMatch`] - substring search on one field, optionally case-insensitive
//! - [`Composite`] - all-of / any-of over other filters
//! - [`Criteria`] - the dict-style filter used by the store cache: name and
//!   email match by substring, every other field by equality
//!
//! Any `Fn(&User) -> bool` closure is a filter as well.
//!
//! ```
//! use userdir_core::{Criteria, Field, User, UserFilter};
//!
//! let bob = User::new(2, "Bob Jones", "bob@test.com").with_role("User");
//! let criteria = Criteria::new().with(Field::Name, "jones").with(Field::Role, "User");
//! assert!(criteria.matches(&bob));
//! ```

use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt::Write as _;

use crate::{CacheableKey, DirectoryError, Field, Result, User};

/// A predicate over users.
pub trait UserFilter: Send + Sync {
    fn matches(&self, user: &User) -> bool;
}

impl<F> UserFilter for F
where
    F: Fn(&User) -> bool + Send + Sync,
{
    fn matches(&self, user: &User) -> bool {
        self(user)
    }
}

/// Substring test honouring case sensitivity.
fn contains_text(haystack: &str, needle: &str, case_sensitive: bool) -> bool {
    if case_sensitive {
        haystack.contains(needle)
    } else {
        haystack.to_lowercase().contains(&needle.to_lowercase())
    }
}

/// Exact, case-sensitive equality on one field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldMatch {
    pub field: Field,
    pub value: String,
}

impl FieldMatch {
    pub fn new(field: Field, value: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
        }
    }
}

impl UserFilter for FieldMatch {
    fn matches(&self, user: &User) -> bool {
        user.get(self.field) == self.value.as_str()
    }
}

/// Substring search on one field. Case-insensitive unless told otherwise.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubstringMatch {
    pub field: Field,
    pub needle: String,
    pub case_sensitive: bool,
}

impl SubstringMatch {
    pub fn new(field: Field, needle: impl Into<String>) -> Self {
        Self {
            field,
            needle: needle.into(),
            case_sensitive: false,
        }
    }

    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }
}

impl UserFilter for SubstringMatch {
    fn matches(&self, user: &User) -> bool {
        contains_text(&user.get(self.field), &self.needle, self.case_sensitive)
    }
}

/// How a [`Composite`] combines its members.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum MatchMode {
    /// Every member must match. No members: everything matches.
    #[default]
    All,
    /// At least one member must match. No members: nothing matches.
    Any,
}

/// A combination of filters.
pub struct Composite {
    filters: Vec<Box<dyn UserFilter>>,
    mode: MatchMode,
}

impl Composite {
    pub fn new(mode: MatchMode) -> Self {
        Self {
            filters: Vec::new(),
            mode,
        }
    }

    pub fn all() -> Self {
        Self::new(MatchMode::All)
    }

    pub fn any() -> Self {
        Self::new(MatchMode::Any)
    }

    pub fn push(mut self, filter: impl UserFilter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

impl UserFilter for Composite {
    fn matches(&self, user: &User) -> bool {
        match self.mode {
            MatchMode::All => self.filters.iter().all(|f| f.matches(user)),
            MatchMode::Any => self.filters.iter().any(|f| f.matches(user)),
        }
    }
}

impl std::fmt::Debug for Composite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Composite")
            .field("filters", &self.filters.len())
            .field("mode", &self.mode)
            .finish()
    }
}

/// Field = value conditions, all of which must hold.
///
/// Name and email conditions are substring matches and honour
/// `case_sensitive` (off by default). Every other field is compared for exact,
/// case-sensitive equality. Empty criteria match every user.
///
/// Criteria are the cache key of the store's filter cache, see
/// [`CacheableKey`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Criteria {
    conditions: BTreeMap<Field, String>,
    case_sensitive: bool,
}

impl Criteria {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) the condition on `field`.
    pub fn with(mut self, field: Field, value: impl Into<String>) -> Self {
        self.conditions.insert(field, value.into());
        self
    }

    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    pub fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    /// Builds criteria from `(field name, value)` pairs.
    ///
    /// ```
    /// use userdir_core::{Criteria, Field};
    ///
    /// let criteria = Criteria::from_pairs([("role", "User"), ("status", "Active")]).unwrap();
    /// assert_eq!(criteria.get(Field::Status), Some("Active"));
    /// assert!(Criteria::from_pairs([("shoe_size", "42")]).is_err());
    /// ```
    pub fn from_pairs<'a, I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        pairs
            .into_iter()
            .try_fold(Self::new(), |criteria, (name, value)| {
                Ok(criteria.with(name.parse()?, value))
            })
    }

    /// Builds criteria from a JSON object such as `{"role": "User", "id": 3}`.
    ///
    /// String, number and boolean values are accepted; anything else is an error.
    pub fn from_json(value: &Value) -> Result<Self> {
        let object = value.as_object().ok_or_else(|| {
            DirectoryError::InvalidCriteria(format!("expected a JSON object, got {}", value))
        })?;

        let mut criteria = Self::new();
        for (name, raw) in object {
            let field: Field = name.parse()?;
            let text = match raw {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                other => {
                    return Err(DirectoryError::InvalidCriteria(format!(
                        "value for '{}' must be a string, number or boolean, got {}",
                        name, other
                    )))
                }
            };
            criteria = criteria.with(field, text);
        }
        Ok(criteria)
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.conditions.get(&field).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Conditions in canonical field order.
    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.conditions.iter().map(|(f, v)| (*f, v.as_str()))
    }
}

impl UserFilter for Criteria {
    fn matches(&self, user: &User) -> bool {
        self.conditions.iter().all(|(field, value)| {
            let actual = user.get(*field);
            if field.is_substring_matched() {
                contains_text(&actual, value, self.case_sensitive)
            } else {
                actual == value.as_str()
            }
        })
    }
}

impl CacheableKey for Criteria {
    /// `cs=<0|1>` followed by `;field=<debug-escaped value>` per condition.
    ///
    /// ```
    /// use userdir_core::{CacheableKey, Criteria, Field};
    ///
    /// let key = Criteria::new().with(Field::Role, "User").to_cache_key();
    /// assert_eq!(key, "cs=0;role=\"User\"");
    /// ```
    fn to_cache_key(&self) -> String {
        let mut key = String::from(if self.case_sensitive { "cs=1" } else { "cs=0" });
        for (field, value) in &self.conditions {
            let _ = write!(key, ";{}={:?}", field.as_str(), value);
        }
        key
    }
}
