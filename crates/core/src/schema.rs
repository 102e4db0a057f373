//! Parameter schemas for the list actions.

use helpdesk_common::validation::{Constraint, Schema, Validator};
use helpdesk_domain::constants::{PARAM_LIMIT, PARAM_OFFSET};
use helpdesk_domain::{HelpdeskError, ListEndpoint, Result, SearchParams};
use once_cell::sync::Lazy;
use serde_json::Value;

const SORT_VALUES: &[&str] = &["ASC", "DESC"];

fn base_list_schema() -> Schema {
    Schema::new("params")
        .field("sort", Constraint::OneOf(SORT_VALUES))
        .field(PARAM_LIMIT, Constraint::Uint)
        .field(PARAM_OFFSET, Constraint::Uint)
}

static DEPARTMENTS: Lazy<Schema> = Lazy::new(|| {
    base_list_schema().field("pid", Constraint::Uint).field("name", Constraint::Text { max: 128 })
});

static TOPICS: Lazy<Schema> = Lazy::new(|| {
    base_list_schema()
        .field("is_active", Constraint::Bool)
        .field("name", Constraint::Text { max: 32 })
});

static TAGS: Lazy<Schema> = Lazy::new(|| {
    base_list_schema()
        .field("is_active", Constraint::Bool)
        .field("name", Constraint::Text { max: 255 })
});

static AGENTS: Lazy<Schema> = Lazy::new(|| {
    base_list_schema()
        .field("is_locked", Constraint::Bool)
        .field("on_vacation", Constraint::Bool)
        .field("department_id", Constraint::Uint)
        .field("name", Constraint::Text { max: 64 })
});

static TEAMS: Lazy<Schema> = Lazy::new(|| {
    base_list_schema()
        .field("is_empty", Constraint::Bool)
        .field("is_active", Constraint::Bool)
        .field("name", Constraint::Text { max: 125 })
});

/// Schema applied to the params of `endpoint`'s list action.
pub fn list_schema(endpoint: ListEndpoint) -> &'static Schema {
    match endpoint {
        ListEndpoint::Departments => &DEPARTMENTS,
        ListEndpoint::Topics => &TOPICS,
        ListEndpoint::Tags => &TAGS,
        ListEndpoint::Agents => &AGENTS,
        ListEndpoint::Teams => &TEAMS,
    }
}

/// Validate raw call params and turn them into request search parameters.
///
/// Undeclared fields are dropped and the first failing field wins.
///
/// # Errors
/// [`HelpdeskError::Validation`] carrying the caller-facing message.
pub fn validate_list_params(endpoint: ListEndpoint, params: Option<&Value>) -> Result<SearchParams> {
    let normalized = Validator::new(list_schema(endpoint)).validate(params).map_err(|err| {
        HelpdeskError::Validation(err.first_message().unwrap_or("invalid params").to_string())
    })?;

    Ok(normalized.into_iter().map(|(key, value)| (key, render(&value))).collect())
}

fn render(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
