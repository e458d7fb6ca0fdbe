use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::DirectoryError;

/// A field of the user schema.
///
/// The declaration order is the canonical display order: every formatter and
/// every cache key walks fields in this order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Id,
    Name,
    Email,
    Role,
    Status,
    JoinDate,
    LastLogin,
}

/// An ordered set of fields. Iteration follows the canonical field order.
pub type FieldSet = BTreeSet<Field>;

impl Field {
    /// All fields in canonical order.
    pub const ALL: [Field; 7] = [
        Field::Id,
        Field::Name,
        Field::Email,
        Field::Role,
        Field::Status,
        Field::JoinDate,
        Field::LastLogin,
    ];

    /// The record key of this field (`"join_date"`, ...).
    pub const fn as_str(self) -> &'static str {
        match self {
            Field::Id => "id",
            Field::Name => "name",
            Field::Email => "email",
            Field::Role => "role",
            Field::Status => "status",
            Field::JoinDate => "join_date",
            Field::LastLogin => "last_login",
        }
    }

    /// Human readable label used by the text formatters.
    pub const fn label(self) -> &'static str {
        match self {
            Field::Id => "ID",
            Field::Name => "Name",
            Field::Email => "Email",
            Field::Role => "Role",
            Field::Status => "Status",
            Field::JoinDate => "Join Date",
            Field::LastLogin => "Last Login",
        }
    }

    /// Value substituted for a missing text field. The id has no placeholder:
    /// it is repaired from the record position instead.
    pub const fn placeholder(self) -> Option<&'static str> {
        match self {
            Field::Id => None,
            Field::Name | Field::Email | Field::Role | Field::Status => Some("UNKNOWN"),
            Field::JoinDate | Field::LastLogin => Some("1970-01-01"),
        }
    }

    /// Whether criteria on this field match by substring rather than equality.
    pub const fn is_substring_matched(self) -> bool {
        matches!(self, Field::Name | Field::Email)
    }

    /// Every field, as a set.
    pub fn all() -> FieldSet {
        Field::ALL.into_iter().collect()
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Field {
    type Err = DirectoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        Field::ALL
            .into_iter()
            .find(|field| field.as_str() == lowered)
            .ok_or_else(|| DirectoryError::UnknownField(s.to_string()))
    }
}

/// A validated user record.
///
/// Every field is always present: the load pipeline fills gaps with
/// placeholders before a `User` is built.
///
/// # Examples
///
/// ```
/// use userdir_core::{Field, User};
///
/// let user = User::new(7, "Ada Lovelace", "ada@example.com").with_role("Admin");
/// assert_eq!(user.get(Field::Id), "7");
/// assert_eq!(user.get(Field::Role), "Admin");
/// assert_eq!(user.get(Field::Status), "UNKNOWN");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: String,
    pub status: String,
    pub join_date: String,
    pub last_login: String,
}

impl User {
    /// Creates a user with the given identity; the remaining fields hold their placeholders.
    pub fn new(id: i64, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
            role: placeholder(Field::Role),
            status: placeholder(Field::Status),
            join_date: placeholder(Field::JoinDate),
            last_login: placeholder(Field::LastLogin),
        }
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = role.into();
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    pub fn with_join_date(mut self, join_date: impl Into<String>) -> Self {
        self.join_date = join_date.into();
        self
    }

    pub fn with_last_login(mut self, last_login: impl Into<String>) -> Self {
        self.last_login = last_login.into();
        self
    }

    /// Returns the textual value of `field`. Only the id needs formatting.
    pub fn get(&self, field: Field) -> Cow<'_, str> {
        match field {
            Field::Id => Cow::Owned(self.id.to_string()),
            Field::Name => Cow::Borrowed(&self.name),
            Field::Email => Cow::Borrowed(&self.email),
            Field::Role => Cow::Borrowed(&self.role),
            Field::Status => Cow::Borrowed(&self.status),
            Field::JoinDate => Cow::Borrowed(&self.join_date),
            Field::LastLogin => Cow::Borrowed(&self.last_login),
        }
    }

    /// Sets a text field. Setting `Field::Id` is ignored; ids are typed.
    pub(crate) fn set_text(&mut self, field: Field, value: String) {
        match field {
            Field::Id => {}
            Field::Name => self.name = value,
            Field::Email => self.email = value,
            Field::Role => self.role = value,
            Field::Status => self.status = value,
            Field::JoinDate => self.join_date = value,
            Field::LastLogin => self.last_login = value,
        }
    }
}

fn placeholder(field: Field) -> String {
    field.placeholder().unwrap_or_default().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_order_is_canonical() {
        let set: FieldSet = [Field::LastLogin, Field::Id, Field::Email].into_iter().collect();
        let ordered: Vec<Field> = set.into_iter().collect();
        assert_eq!(ordered, vec![Field::Id, Field::Email, Field::LastLogin]);
    }

    #[test]
    fn test_field_from_str() {
        assert_eq!("join_date".parse::<Field>().unwrap(), Field::JoinDate);
        assert_eq!(" Email ".parse::<Field>().unwrap(), Field::Email);
        assert!(matches!(
            "nickname".parse::<Field>(),
            Err(DirectoryError::UnknownField(name)) if name == "nickname"
        ));
    }

    #[test]
    fn test_labels() {
        assert_eq!(Field::Id.label(), "ID");
        assert_eq!(Field::JoinDate.label(), "Join Date");
        assert_eq!(Field::LastLogin.label(), "Last Login");
    }

    #[test]
    fn test_new_user_uses_placeholders() {
        let user = User::new(1, "Alice", "alice@test.com");
        assert_eq!(user.role, "UNKNOWN");
        assert_eq!(user.join_date, "1970-01-01");
    }

    #[test]
    fn test_get_and_set_text() {
        let mut user = User::new(42, "Bob", "bob@test.com");
        user.set_text(Field::Status, "Active".to_string());
        user.set_text(Field::Id, "999".to_string());
        assert_eq!(user.get(Field::Status), "Active");
        assert_eq!(user.get(Field::Id), "42");
    }

    #[test]
    fn test_serde_uses_snake_case_keys() {
        let user = User::new(3, "Cy", "cy@test.com").with_join_date("2024-01-01");
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["id"], 3);
        assert_eq!(json["join_date"], "2024-01-01");
    }
}
