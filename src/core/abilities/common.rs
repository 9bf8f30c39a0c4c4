use crate::core::query::MAX_PER_PAGE;
use crate::core::schema::{
    ArraySchema, BooleanSchema, IntegerSchema, ObjectSchema, Schema, StringSchema,
};
use crate::error::{AbilityError, StoreError, ValidationError};
use crate::security::CallerContext;
use crate::store::{ContentEntity, ContentStore, EntityKind};
use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;

pub(crate) const CATEGORY: &str = "content";

pub(crate) fn format_date(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Accepts RFC 3339, or a naive `YYYY-MM-DD[ T]HH:MM:SS` / `YYYY-MM-DD` taken as UTC.
pub(crate) fn parse_date(field: &str, raw: &str) -> Result<DateTime<Utc>, ValidationError> {
    let raw = raw.trim();
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Ok(at.with_timezone(&Utc));
    }
    for pattern in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, pattern) {
            return Ok(naive.and_utc());
        }
    }
    if let Some(naive) = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
    {
        return Ok(naive.and_utc());
    }
    Err(ValidationError::InvalidFormat {
        field: field.to_string(),
        message: format!("`{raw}` is not an ISO 8601 date"),
    })
}

pub(crate) fn to_output<T: Serialize>(value: &T) -> Result<Value, AbilityError> {
    serde_json::to_value(value).map_err(|e| AbilityError::Internal(e.to_string()))
}

pub(crate) fn not_found_message(kind: EntityKind) -> String {
    format!("{} not found.", kind.label())
}

/// Fetch an entity of the expected kind, mapping absence to the caller-facing message.
pub(crate) async fn fetch_entity(
    store: &dyn ContentStore,
    id: u64,
    kind: EntityKind,
) -> Result<ContentEntity, AbilityError> {
    store
        .get(id, kind)
        .await
        .map_err(|e| e.or_not_found(&not_found_message(kind)))
}

/// Resolve an author login; unknown or absent logins fall back to the caller.
pub(crate) async fn resolve_author(
    store: &dyn ContentStore,
    login: Option<&str>,
    caller: &CallerContext,
) -> Result<u64, AbilityError> {
    let Some(login) = login.filter(|l| !l.is_empty()) else {
        return Ok(caller.user_id);
    };
    match store.find_user_by_login(login).await? {
        Some(user) => Ok(user.id),
        None => {
            tracing::debug!(login, "unknown author login, using caller");
            Ok(caller.user_id)
        }
    }
}

pub(crate) async fn ensure_media_exists(
    store: &dyn ContentStore,
    media_id: u64,
) -> Result<(), AbilityError> {
    store
        .get_media(media_id)
        .await
        .map(|_| ())
        .map_err(|e| e.or_not_found("Media not found."))
}

/// URL of the featured image, or `""` when none is set or it has gone away.
pub(crate) async fn featured_image_url(
    store: &dyn ContentStore,
    media_id: Option<u64>,
) -> Result<String, AbilityError> {
    let Some(media_id) = media_id else {
        return Ok(String::new());
    };
    match store.get_media(media_id).await {
        Ok(asset) => Ok(asset.url),
        Err(StoreError::NotFound { .. }) => Ok(String::new()),
        Err(err) => Err(err.into()),
    }
}

pub(crate) async fn term_slugs(
    store: &dyn ContentStore,
    ids: &[u64],
) -> Result<Vec<String>, AbilityError> {
    Ok(store
        .terms_by_ids(ids)
        .await?
        .into_iter()
        .map(|t| t.slug)
        .collect())
}

pub(crate) async fn term_names(
    store: &dyn ContentStore,
    ids: &[u64],
) -> Result<Vec<String>, AbilityError> {
    Ok(store
        .terms_by_ids(ids)
        .await?
        .into_iter()
        .map(|t| t.name)
        .collect())
}

// ── Schema fragments ─────────────────────────────────────────────────────────

pub(crate) fn text(description: &str) -> StringSchema {
    StringSchema::new().describe(description)
}

pub(crate) fn integer(description: &str) -> IntegerSchema {
    IntegerSchema::new().describe(description)
}

pub(crate) fn flag(description: &str, default: bool) -> BooleanSchema {
    BooleanSchema::new().default_value(default).describe(description)
}

pub(crate) fn strings(description: &str) -> ArraySchema {
    ArraySchema::of(StringSchema::new()).describe(description)
}

pub(crate) fn id_property(description: &str) -> IntegerSchema {
    IntegerSchema::new().min(1).describe(description)
}

pub(crate) fn per_page_property(default: i64, description: &str) -> IntegerSchema {
    IntegerSchema::new()
        .min(1)
        .max(MAX_PER_PAGE)
        .default_value(default)
        .describe(description)
}

pub(crate) fn page_property() -> IntegerSchema {
    IntegerSchema::new()
        .min(1)
        .default_value(1)
        .describe("Page number for pagination.")
}

pub(crate) fn order_property(default: &str) -> StringSchema {
    StringSchema::new()
        .one_of(&["ASC", "DESC"])
        .default_value(default)
        .describe("Sort order.")
}

pub(crate) fn by_id_input(description: &str) -> ObjectSchema {
    ObjectSchema::new()
        .property("id", id_property(description))
        .required(&["id"])
        .closed()
}

pub(crate) fn delete_input(description: &str) -> ObjectSchema {
    ObjectSchema::new()
        .property("id", id_property(description))
        .property(
            "force",
            flag("If true, permanently deletes instead of trashing.", false),
        )
        .required(&["id"])
        .closed()
}

/// Output object whose listed fields are all present.
pub(crate) fn output(fields: Vec<(&str, Schema)>) -> ObjectSchema {
    fields
        .into_iter()
        .fold(ObjectSchema::new(), |schema, (name, property)| {
            schema.property(name, property).required(&[name])
        })
}

pub(crate) fn out_int() -> Schema {
    IntegerSchema::new().into()
}

pub(crate) fn out_str() -> Schema {
    StringSchema::new().into()
}

pub(crate) fn out_bool() -> Schema {
    BooleanSchema::new().into()
}

pub(crate) fn out_strings() -> Schema {
    ArraySchema::of(StringSchema::new()).into()
}

pub(crate) fn out_list(items: ObjectSchema) -> Schema {
    ArraySchema::of(items).into()
}

pub(crate) fn with_pagination(list_key: &str, items: ObjectSchema) -> ObjectSchema {
    output(vec![
        (list_key, out_list(items)),
        ("total", out_int()),
        ("total_pages", out_int()),
    ])
}
