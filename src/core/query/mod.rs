//! Translate validated list inputs into store-level queries, and derive
//! pagination from the store's absolute match count.

use crate::error::ValidationError;
use crate::store::{EntityKind, EntityQuery, MediaQuery, OrderBy, SortOrder, StatusFilter};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub const MAX_PER_PAGE: i64 = 100;

/// List filters as they arrive from a list ability.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ListParams {
    pub status: Option<String>,
    pub search: Option<String>,
    pub category: Option<String>,
    pub tag: Option<String>,
    pub author: Option<u64>,
    pub parent: Option<u64>,
    pub orderby: Option<String>,
    pub order: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MediaListParams {
    pub mime_type: Option<String>,
    pub search: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// Per-kind defaults for entity list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryBuilder {
    kind: EntityKind,
    order_by: OrderBy,
    order: SortOrder,
    per_page: i64,
}

impl QueryBuilder {
    /// Posts: newest first.
    pub fn posts() -> Self {
        Self {
            kind: EntityKind::Post,
            order_by: OrderBy::Date,
            order: SortOrder::Desc,
            per_page: 10,
        }
    }

    /// Pages: menu order ascending.
    pub fn pages() -> Self {
        Self {
            kind: EntityKind::Page,
            order_by: OrderBy::MenuOrder,
            order: SortOrder::Asc,
            per_page: 10,
        }
    }

    pub fn build(&self, params: &ListParams) -> Result<EntityQuery, ValidationError> {
        let status = match non_empty(params.status.as_deref()) {
            Some(raw) => StatusFilter::from_str(raw).map_err(|_| ValidationError::InvalidEnumValue {
                field: "status".into(),
                value: raw.to_string(),
                allowed: vec![
                    "publish".into(),
                    "draft".into(),
                    "pending".into(),
                    "private".into(),
                    "future".into(),
                    "any".into(),
                ],
            })?,
            None => StatusFilter::Any,
        };
        let order_by = match non_empty(params.orderby.as_deref()) {
            Some(raw) => parse_token(
                "orderby",
                raw,
                &["date", "title", "modified", "menu_order", "ID"],
            )?,
            None => self.order_by,
        };
        let order = match non_empty(params.order.as_deref()) {
            Some(raw) => parse_token("order", raw, &["ASC", "DESC"])?,
            None => self.order,
        };
        let (page, per_page) = paging(params.page, params.per_page, self.per_page)?;

        Ok(EntityQuery {
            kind: self.kind,
            status,
            search: owned(params.search.as_deref()),
            category: owned(params.category.as_deref()),
            tag: owned(params.tag.as_deref()),
            author: params.author.filter(|id| *id != 0),
            parent: params.parent,
            order_by,
            order,
            page,
            per_page,
        })
    }
}

/// Media lists are always newest first; only filters and paging vary.
pub fn build_media_query(params: &MediaListParams) -> Result<MediaQuery, ValidationError> {
    let (page, per_page) = paging(params.page, params.per_page, 20)?;
    Ok(MediaQuery {
        mime_type: owned(params.mime_type.as_deref()),
        search: owned(params.search.as_deref()),
        page,
        per_page,
    })
}

/// Totals reported beside every list result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub total: u64,
    pub total_pages: u64,
}

impl Pagination {
    pub fn new(total: u64, per_page: u32) -> Self {
        let total_pages = if per_page == 0 {
            0
        } else {
            total.div_ceil(u64::from(per_page))
        };
        Self { total, total_pages }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn owned(value: Option<&str>) -> Option<String> {
    non_empty(value).map(ToString::to_string)
}

fn parse_token<T: FromStr>(field: &str, raw: &str, allowed: &[&str]) -> Result<T, ValidationError> {
    T::from_str(raw).map_err(|_| ValidationError::InvalidEnumValue {
        field: field.to_string(),
        value: raw.to_string(),
        allowed: allowed.iter().map(ToString::to_string).collect(),
    })
}

fn paging(
    page: Option<i64>,
    per_page: Option<i64>,
    default_per_page: i64,
) -> Result<(u32, u32), ValidationError> {
    let page = page.unwrap_or(1);
    let per_page = per_page.unwrap_or(default_per_page);

    let page = u32::try_from(page)
        .ok()
        .filter(|p| *p >= 1)
        .ok_or_else(|| ValidationError::OutOfRange {
            field: "page".into(),
            value: page.into(),
            bounds: ">= 1".into(),
        })?;
    let per_page = u32::try_from(per_page)
        .ok()
        .filter(|p| (1..=MAX_PER_PAGE).contains(&i64::from(*p)))
        .ok_or_else(|| ValidationError::OutOfRange {
            field: "per_page".into(),
            value: per_page.into(),
            bounds: format!("1..={MAX_PER_PAGE}"),
        })?;
    Ok((page, per_page))
}
