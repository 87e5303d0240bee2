//! Rows of the two recipe tables and their CSV form.

use std::convert::TryFrom;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::client::plc_types::parse_int_prefix;

pub const DELIMITER: char = ';';
pub const NEVER_SAVED: &str = "---";
pub const RECIPE_HEADER: &str = "RecipeId;ProductName;VariantName;Description;LastSaved";
pub const VALUE_HEADER: &str = "RecipeId;PLCRid;PLCVariable;PLCValue";

pub type RecipeId = u32;

#[derive(Debug, Clone, PartialEq)]
pub struct RecipeRecord {
    pub recipe_id: RecipeId,
    pub product_name: String,
    pub variant_name: String,
    pub description: String,
    /// RFC 3339 timestamp or [`NEVER_SAVED`].
    pub last_saved: String,
}

impl RecipeRecord {
    pub fn new(recipe_id: RecipeId, product_name: &str, variant_name: &str, description: &str) -> Self {
        RecipeRecord {
            recipe_id,
            product_name: product_name.to_owned(),
            variant_name: variant_name.to_owned(),
            description: description.to_owned(),
            last_saved: NEVER_SAVED.to_owned(),
        }
    }

    /// Label shown in the recipe field of the HMI.
    pub fn display_name(&self) -> String {
        format!("{} / {} / {}", self.recipe_id, self.product_name, self.variant_name)
    }

    pub fn was_saved(&self) -> bool {
        DateTime::parse_from_rfc3339(&self.last_saved).is_ok()
    }

    pub fn mark_saved(&mut self, at: DateTime<Utc>) {
        self.last_saved = at.to_rfc3339_opts(SecondsFormat::Millis, true);
    }

    pub fn to_csv_row(&self) -> String {
        join_row(&[
            &self.recipe_id.to_string(),
            &self.product_name,
            &self.variant_name,
            &self.description,
            &self.last_saved,
        ])
    }

    /// `None` for rows without a numeric id.
    pub fn from_csv_row(line: &str) -> Option<Self> {
        let mut columns = line.split(DELIMITER);
        let recipe_id = parse_recipe_id(columns.next()?)?;
        let mut next = || columns.next().unwrap_or("").to_owned();
        let product_name = next();
        let variant_name = next();
        let description = next();
        let mut last_saved = next();
        if last_saved.is_empty() {
            last_saved = NEVER_SAVED.to_owned();
        }
        Some(RecipeRecord {
            recipe_id,
            product_name,
            variant_name,
            description,
            last_saved,
        })
    }
}

/// One stored field value of one controller record in one recipe.
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeValueOverride {
    pub recipe_id: RecipeId,
    pub record_id: String,
    pub field_name: String,
    pub value: String,
}

impl RecipeValueOverride {
    pub fn new(recipe_id: RecipeId, record_id: &str, field_name: &str, value: &str) -> Self {
        RecipeValueOverride {
            recipe_id,
            record_id: record_id.to_owned(),
            field_name: field_name.to_owned(),
            value: value.to_owned(),
        }
    }

    pub fn to_csv_row(&self) -> String {
        join_row(&[
            &self.recipe_id.to_string(),
            &self.record_id,
            &self.field_name,
            &self.value,
        ])
    }

    pub fn from_csv_row(line: &str) -> Option<Self> {
        let mut columns = line.split(DELIMITER);
        let recipe_id = parse_recipe_id(columns.next()?)?;
        let mut next = || columns.next().unwrap_or("").to_owned();
        Some(RecipeValueOverride {
            recipe_id,
            record_id: next(),
            field_name: next(),
            value: next(),
        })
    }
}

fn parse_recipe_id(column: &str) -> Option<RecipeId> {
    parse_int_prefix(column).and_then(|id| RecipeId::try_from(id).ok())
}

/// Delimiters and line breaks inside a column would break the row layout.
fn escape(column: &str) -> String {
    column
        .chars()
        .map(|c| match c {
            DELIMITER => ',',
            '\n' | '\r' => ' ',
            c => c,
        })
        .collect()
}

fn join_row(columns: &[&str]) -> String {
    columns
        .iter()
        .map(|c| escape(c))
        .collect::<Vec<_>>()
        .join(&DELIMITER.to_string())
}

/// Parses a whole table file. The first line is the header.
pub fn parse_table<T, F>(content: &str, parse_row: F) -> Vec<T>
where
    F: Fn(&str) -> Option<T>,
{
    content
        .split('\n')
        .skip(1)
        .map(|line| line.trim_end_matches('\r'))
        .filter_map(parse_row)
        .collect()
}

pub fn write_table<I>(header: &str, rows: I) -> String
where
    I: IntoIterator<Item = String>,
{
    std::iter::once(header.to_owned())
        .chain(rows)
        .collect::<Vec<_>>()
        .join("\n")
}
