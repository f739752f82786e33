//! Project field resolution.
//!
//! Locates a named single-select field (and a named option within it) in a
//! project's field list. Matching is case-insensitive exact; when several
//! fields match a name differing only in case, the first one wins and the
//! ambiguity is flagged in the log.

use ghp_core::{Error, Result};
use serde::Deserialize;
use serde_json::Value;

/// One selectable option of a single-select field.
#[derive(Debug, Clone, Deserialize)]
pub struct FieldOption {
    pub id: String,
    pub name: String,
}

/// A single-select project field with its options.
#[derive(Debug, Clone, Deserialize)]
pub struct SingleSelectField {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub options: Vec<FieldOption>,
}

/// Find a single-select field by name in a fetched field page.
///
/// `nodes` is the raw `fields.nodes` array; entries that are not
/// single-select (empty fragment objects, other field kinds) are skipped.
/// Fails with `FieldNotFound` listing every field name present.
pub fn single_select_by_name(nodes: &[Value], name: &str) -> Result<SingleSelectField> {
    let mut matches = nodes.iter().filter(|node| {
        node.get("dataType").and_then(Value::as_str) == Some("SINGLE_SELECT")
            && node
                .get("name")
                .and_then(Value::as_str)
                .is_some_and(|field| field.eq_ignore_ascii_case(name))
    });

    let Some(found) = matches.next() else {
        return Err(Error::FieldNotFound {
            field: name.to_string(),
            available: field_names(nodes),
        });
    };

    if matches.next().is_some() {
        tracing::warn!(
            field = name,
            "Multiple fields match this name case-insensitively; using the first"
        );
    }

    serde_json::from_value(found.clone()).map_err(Error::from)
}

/// Find an option by name within a single-select field.
///
/// Fails with `OptionNotFound` listing every option name present.
pub fn option_by_name<'a>(field: &'a SingleSelectField, value: &str) -> Result<&'a FieldOption> {
    let mut matches = field
        .options
        .iter()
        .filter(|option| option.name.eq_ignore_ascii_case(value));

    let Some(found) = matches.next() else {
        return Err(Error::OptionNotFound {
            value: value.to_string(),
            field: field.name.clone(),
            available: field
                .options
                .iter()
                .map(|o| o.name.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        });
    };

    if matches.next().is_some() {
        tracing::warn!(
            field = field.name.as_str(),
            option = value,
            "Multiple options match this name case-insensitively; using the first"
        );
    }

    Ok(found)
}

fn field_names(nodes: &[Value]) -> String {
    nodes
        .iter()
        .filter_map(|node| node.get("name").and_then(Value::as_str))
        .collect::<Vec<_>>()
        .join(", ")
}
