//! # Formatters
//!
//! Render users as text or JSON.
//!
//! | Mode      | Output per user                                             |
//! |-----------|-------------------------------------------------------------|
//! | `Compact` | `ID: 1 \| Name: Alice \| Email: alice@test.com \| ...`       |
//! | `Verbose` | `User ID: 1` followed by one indented `Label: value` line    |
//! | `Json`    | `{"id": 1, "name": "Alice", ...}`                           |
//! | `Table`   | aligned columns under a header row                          |
//! | `Export`  | verbose blocks framed by `USER_EXPORT_START`/`USER_EXPORT_END` |

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::{DirectoryError, Field, FieldSet, Result, User};

const EXPORT_RULE_WIDTH: usize = 80;

/// Output format selector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatMode {
    #[default]
    Compact,
    Verbose,
    #[serde(alias = "json_like")]
    Json,
    Table,
    Export,
}

impl FormatMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            FormatMode::Compact => "compact",
            FormatMode::Verbose => "verbose",
            FormatMode::Json => "json",
            FormatMode::Table => "table",
            FormatMode::Export => "export",
        }
    }
}

impl fmt::Display for FormatMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// ```
/// use userdir_core::FormatMode;
///
/// assert_eq!("json_like".parse::<FormatMode>().unwrap(), FormatMode::Json);
/// assert!("xml".parse::<FormatMode>().is_err());
/// ```
impl FromStr for FormatMode {
    type Err = DirectoryError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "compact" => Ok(FormatMode::Compact),
            "verbose" => Ok(FormatMode::Verbose),
            "json" | "json_like" => Ok(FormatMode::Json),
            "table" => Ok(FormatMode::Table),
            "export" => Ok(FormatMode::Export),
            _ => Err(DirectoryError::UnsupportedFormat(s.to_string())),
        }
    }
}

/// Which fields to render: an optional allow-list minus a deny-list.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldSelection {
    pub include: Option<FieldSet>,
    pub exclude: FieldSet,
}

impl FieldSelection {
    /// Every field.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn only(fields: impl IntoIterator<Item = Field>) -> Self {
        Self {
            include: Some(fields.into_iter().collect()),
            exclude: FieldSet::new(),
        }
    }

    pub fn excluding(mut self, fields: impl IntoIterator<Item = Field>) -> Self {
        self.exclude.extend(fields);
        self
    }

    /// The selected fields in canonical order.
    pub fn resolve(&self) -> Vec<Field> {
        Field::ALL
            .into_iter()
            .filter(|f| self.include.as_ref().map_or(true, |inc| inc.contains(f)))
            .filter(|f| !self.exclude.contains(f))
            .collect()
    }
}

/// Options shared by every `format_users` call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderOptions {
    pub fields: FieldSelection,
    /// Append `Total users processed: N` after the users.
    pub show_total: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            fields: FieldSelection::all(),
            show_total: true,
        }
    }
}

impl RenderOptions {
    pub fn with_fields(mut self, fields: FieldSelection) -> Self {
        self.fields = fields;
        self
    }

    pub fn with_total(mut self, show_total: bool) -> Self {
        self.show_total = show_total;
        self
    }
}

/// Renders users.
pub trait Formatter: Send + Sync {
    /// Renders one user restricted to `fields` (canonical order).
    fn format_user(&self, user: &User, fields: &[Field]) -> String;

    /// Renders a list, one user per line block, joined with `\n`.
    ///
    /// With `show_total` the line `Total users processed: N` follows after a
    /// blank line; an empty list then renders only that line.
    fn format_users(&self, users: &[User], options: &RenderOptions) -> String {
        let fields = options.fields.resolve();
        let body = users
            .iter()
            .map(|u| self.format_user(u, &fields))
            .collect::<Vec<_>>()
            .join("\n");
        append_total(body, users.len(), options.show_total)
    }
}

fn append_total(body: String, count: usize, show_total: bool) -> String {
    if !show_total {
        return body;
    }
    if body.is_empty() {
        format!("Total users processed: {}", count)
    } else {
        format!("{}\n\nTotal users processed: {}", body, count)
    }
}

/// `ID: 1 | Name: Alice | Email: alice@test.com | Role: Admin | ...`
#[derive(Clone, Copy, Debug, Default)]
pub struct CompactFormatter;

impl Formatter for CompactFormatter {
    fn format_user(&self, user: &User, fields: &[Field]) -> String {
        fields
            .iter()
            .map(|f| format!("{}: {}", f.label(), user.get(*f)))
            .collect::<Vec<_>>()
            .join(" | ")
    }
}

/// A `User ID: N` header followed by one indented line per other field.
#[derive(Clone, Copy, Debug, Default)]
pub struct VerboseFormatter;

impl Formatter for VerboseFormatter {
    fn format_user(&self, user: &User, fields: &[Field]) -> String {
        let mut out = format!("User ID: {}", user.id);
        for field in fields.iter().filter(|f| **f != Field::Id) {
            out.push_str("\n  ");
            out.push_str(field.label());
            out.push_str(": ");
            out.push_str(&user.get(*field));
        }
        out
    }
}

/// One JSON object per user with `"key": value` spacing and the id as a number.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn format_user(&self, user: &User, fields: &[Field]) -> String {
        let members = fields
            .iter()
            .map(|f| {
                let value = match f {
                    Field::Id => Value::from(user.id),
                    other => Value::String(user.get(*other).into_owned()),
                };
                format!("{}: {}", Value::String(f.as_str().to_string()), value)
            })
            .collect::<Vec<_>>()
            .join(", ");
        format!("{{{}}}", members)
    }
}

/// Aligned columns: header row, dash rule, one row per user.
#[derive(Clone, Copy, Debug, Default)]
pub struct TableFormatter;

impl TableFormatter {
    fn render_row(cells: &[String], widths: &[usize]) -> String {
        cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| {
                let pad = width.saturating_sub(cell.chars().count());
                format!("{}{}", cell, " ".repeat(pad))
            })
            .collect::<Vec<_>>()
            .join(" | ")
            .trim_end()
            .to_string()
    }
}

impl Formatter for TableFormatter {
    fn format_user(&self, user: &User, fields: &[Field]) -> String {
        let cells: Vec<String> = fields.iter().map(|f| user.get(*f).into_owned()).collect();
        cells.join(" | ")
    }

    fn format_users(&self, users: &[User], options: &RenderOptions) -> String {
        let fields = options.fields.resolve();
        if users.is_empty() || fields.is_empty() {
            return append_total(String::new(), users.len(), options.show_total);
        }

        let header: Vec<String> = fields.iter().map(|f| f.label().to_string()).collect();
        let rows: Vec<Vec<String>> = users
            .iter()
            .map(|u| fields.iter().map(|f| u.get(*f).into_owned()).collect())
            .collect();

        let widths: Vec<usize> = (0..fields.len())
            .map(|col| {
                rows.iter()
                    .map(|row| row[col].chars().count())
                    .chain(std::iter::once(header[col].chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let rule = widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("-+-");

        let mut lines = Vec::with_capacity(rows.len() + 2);
        lines.push(Self::render_row(&header, &widths));
        lines.push(rule);
        lines.extend(rows.iter().map(|row| Self::render_row(row, &widths)));

        append_total(lines.join("\n"), users.len(), options.show_total)
    }
}

/// Frames every user between `USER_EXPORT_START` and `USER_EXPORT_END`.
///
/// Each user is rendered by the inner formatter (verbose by default) and
/// followed by a rule of 80 dashes. `show_total` is ignored: the frame is the
/// summary.
pub struct ExportFormatter {
    inner: Box<dyn Formatter>,
}

impl ExportFormatter {
    pub fn new(inner: Box<dyn Formatter>) -> Self {
        Self { inner }
    }
}

impl Default for ExportFormatter {
    fn default() -> Self {
        Self::new(Box::new(VerboseFormatter))
    }
}

impl fmt::Debug for ExportFormatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExportFormatter").finish_non_exhaustive()
    }
}

impl Formatter for ExportFormatter {
    fn format_user(&self, user: &User, fields: &[Field]) -> String {
        self.inner.format_user(user, fields)
    }

    fn format_users(&self, users: &[User], options: &RenderOptions) -> String {
        let fields = options.fields.resolve();
        let rule_heavy = "=".repeat(EXPORT_RULE_WIDTH);
        let rule_light = "-".repeat(EXPORT_RULE_WIDTH);

        let mut out = String::with_capacity(64 + users.len() * 256);
        out.push_str("USER_EXPORT_START\n");
        out.push_str(&rule_heavy);
        out.push('\n');
        for user in users {
            out.push_str(&self.inner.format_user(user, &fields));
            out.push('\n');
            out.push_str(&rule_light);
            out.push('\n');
        }
        out.push_str("USER_EXPORT_END\n");
        out
    }
}

/// Returns the formatter for `mode`.
pub fn formatter_for(mode: FormatMode) -> Box<dyn Formatter> {
    match mode {
        FormatMode::Compact => Box::new(CompactFormatter),
        FormatMode::Verbose => Box::new(VerboseFormatter),
        FormatMode::Json => Box::new(JsonFormatter),
        FormatMode::Table => Box::new(TableFormatter),
        FormatMode::Export => Box::new(ExportFormatter::default()),
    }
}

/// Renders users with the formatter for `mode`.
pub fn render(users: &[User], mode: FormatMode, options: &RenderOptions) -> String {
    formatter_for(mode).format_users(users, options)
}

/// A pretty-printed JSON array of complete user records.
pub fn to_json_document(users: &[User]) -> Result<String> {
    Ok(serde_json::to_string_pretty(users)?)
}
