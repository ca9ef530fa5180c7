use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::model::{CellValue, Column, Dataset, DatasetError};

// ---------------------------------------------------------------------------
// Chart kinds and axis roles
// ---------------------------------------------------------------------------

/// How a column is treated for a given chart kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisRole {
    /// Labels. Any text value qualifies.
    Categorical,
    /// Magnitudes. Every value must parse as a float.
    Numeric,
}

impl AxisRole {
    /// The message shown when a value fails this role's predicate.
    pub fn requirement(self) -> &'static str {
        match self {
            AxisRole::Categorical => "ALL INPUTS MUST BE CATEGORICAL",
            AxisRole::Numeric => "ALL INPUTS MUST BE NUMERICAL",
        }
    }

    /// Whether `value` satisfies this role's predicate.
    pub fn accepts(self, value: &CellValue) -> bool {
        match self {
            AxisRole::Categorical => is_categorical(value),
            AxisRole::Numeric => is_number(value),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChartKind {
    Scatter,
    Bar,
    Histogram,
    Pie,
}

impl ChartKind {
    pub const ALL: [ChartKind; 4] = [
        ChartKind::Scatter,
        ChartKind::Bar,
        ChartKind::Histogram,
        ChartKind::Pie,
    ];

    /// Roles of the first and second column.
    pub fn axis_roles(self) -> (AxisRole, AxisRole) {
        match self {
            ChartKind::Scatter => (AxisRole::Numeric, AxisRole::Numeric),
            ChartKind::Bar | ChartKind::Histogram | ChartKind::Pie => {
                (AxisRole::Categorical, AxisRole::Numeric)
            }
        }
    }

    /// Column names the text-entry path uses for this kind.
    pub fn default_column_names(self) -> (&'static str, &'static str) {
        match self {
            ChartKind::Scatter => ("x", "y"),
            ChartKind::Bar | ChartKind::Histogram | ChartKind::Pie => ("category", "value"),
        }
    }

    /// Labels for the entry fields. Histogram only takes values.
    pub fn field_labels(self) -> (Option<&'static str>, &'static str) {
        match self {
            ChartKind::Scatter => (
                Some("X values (comma separated)"),
                "Y values (comma separated)",
            ),
            ChartKind::Bar | ChartKind::Pie => (
                Some("Categories (comma separated)"),
                "Values (comma separated)",
            ),
            ChartKind::Histogram => (None, "Values (comma separated)"),
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ChartKind::Scatter => "Scatter Plot",
            ChartKind::Bar => "Bar Graph",
            ChartKind::Histogram => "Histogram",
            ChartKind::Pie => "Pie Chart",
        };
        f.write_str(label)
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, PartialEq)]
pub enum BuildError {
    #[error("Both lists must be of the same length ({left} vs {right})")]
    LengthMismatch { left: usize, right: usize },

    #[error("**{}!** Column '{column}' has '{value}' at position {index}", .role.requirement())]
    TypeValidation {
        column: String,
        role: AxisRole,
        index: usize,
        value: String,
    },

    #[error("Both columns are named '{0}'")]
    DuplicateColumn(String),
}

// ---------------------------------------------------------------------------
// Predicates
// ---------------------------------------------------------------------------

/// Whether the value round-trips through a float parse.
pub fn is_number(value: &CellValue) -> bool {
    match value {
        CellValue::Integer(_) | CellValue::Float(_) => true,
        CellValue::String(s) => s.trim().parse::<f64>().is_ok(),
        CellValue::Bool(_) | CellValue::Null => false,
    }
}

/// Any text value is a category, numeric-looking or not.
pub fn is_categorical(value: &CellValue) -> bool {
    value.is_string()
}

pub fn is_numeric_list(values: &[CellValue]) -> bool {
    values.iter().all(is_number)
}

pub fn is_categorical_list(values: &[CellValue]) -> bool {
    values.iter().all(is_categorical)
}

fn validate(column: &str, role: AxisRole, values: &[CellValue]) -> Result<(), BuildError> {
    match values.iter().position(|v| !role.accepts(v)) {
        None => Ok(()),
        Some(index) => Err(BuildError::TypeValidation {
            column: column.to_string(),
            role,
            index,
            value: values[index].to_string(),
        }),
    }
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

/// Validate two parallel value lists against `kind`'s axis roles and package
/// them as a two-column dataset. Values are kept exactly as given.
pub fn build_dataset<A, B>(
    kind: ChartKind,
    first_name: &str,
    second_name: &str,
    first: A,
    second: B,
) -> Result<Dataset, BuildError>
where
    A: IntoIterator,
    A::Item: Into<CellValue>,
    B: IntoIterator,
    B::Item: Into<CellValue>,
{
    let first: Vec<CellValue> = first.into_iter().map(Into::into).collect();
    let second: Vec<CellValue> = second.into_iter().map(Into::into).collect();

    if first.len() != second.len() {
        return Err(BuildError::LengthMismatch {
            left: first.len(),
            right: second.len(),
        });
    }

    let (first_role, second_role) = kind.axis_roles();
    validate(first_name, first_role, &first)?;
    validate(second_name, second_role, &second)?;

    Dataset::from_columns(vec![
        Column::new(first_name, first),
        Column::new(second_name, second),
    ])
    .map_err(|e| match e {
        DatasetError::DuplicateColumn(name) => BuildError::DuplicateColumn(name),
        // Lengths were checked above.
        DatasetError::RaggedColumn {
            expected, actual, ..
        } => BuildError::LengthMismatch {
            left: expected,
            right: actual,
        },
    })
}

pub fn build_scatter_dataset<A, B>(
    name_x: &str,
    name_y: &str,
    values_x: A,
    values_y: B,
) -> Result<Dataset, BuildError>
where
    A: IntoIterator,
    A::Item: Into<CellValue>,
    B: IntoIterator,
    B::Item: Into<CellValue>,
{
    build_dataset(ChartKind::Scatter, name_x, name_y, values_x, values_y)
}

pub fn build_bar_dataset<A, B>(
    name_category: &str,
    name_value: &str,
    categories: A,
    values: B,
) -> Result<Dataset, BuildError>
where
    A: IntoIterator,
    A::Item: Into<CellValue>,
    B: IntoIterator,
    B::Item: Into<CellValue>,
{
    build_dataset(ChartKind::Bar, name_category, name_value, categories, values)
}

pub fn build_histogram_dataset<A, B>(
    name_category: &str,
    name_value: &str,
    categories: A,
    values: B,
) -> Result<Dataset, BuildError>
where
    A: IntoIterator,
    A::Item: Into<CellValue>,
    B: IntoIterator,
    B::Item: Into<CellValue>,
{
    build_dataset(
        ChartKind::Histogram,
        name_category,
        name_value,
        categories,
        values,
    )
}

pub fn build_pie_dataset<A, B>(
    name_category: &str,
    name_value: &str,
    categories: A,
    values: B,
) -> Result<Dataset, BuildError>
where
    A: IntoIterator,
    A::Item: Into<CellValue>,
    B: IntoIterator,
    B::Item: Into<CellValue>,
{
    build_dataset(ChartKind::Pie, name_category, name_value, categories, values)
}

// ---------------------------------------------------------------------------
// Text-entry helpers
// ---------------------------------------------------------------------------

/// Split a comma-separated entry field into raw values. Values are not
/// trimmed; an empty field yields a single empty value.
pub fn split_field(raw: &str) -> Vec<String> {
    raw.split(',').map(str::to_string).collect()
}

/// The constant category column the histogram entry path pre-fills.
pub fn histogram_categories(n: usize) -> Vec<String> {
    vec!["category".to_string(); n]
}
