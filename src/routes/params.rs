use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct Pagination {
    /// Page number, default 1
    pub page: Option<i64>,
    /// Items per page, default 20, at most 100
    pub per_page: Option<i64>,
}

impl Pagination {
    /// `(page, per_page, offset)`. Pages past the addressable range yield an
    /// offset beyond every row instead of overflowing.
    pub fn normalize(&self) -> (i64, u64, u64) {
        let page = self.page.unwrap_or(1).max(1);
        let per_page = self.per_page.unwrap_or(20).clamp(1, 100);
        let offset = u64::try_from((page - 1).saturating_mul(per_page)).unwrap_or(u64::MAX);
        (page, per_page.unsigned_abs(), offset)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ProductSortBy {
    Name,
    #[default]
    CreatedAt,
    Price,
    Quantity,
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProductQuery {
    /// Page number, default 1
    pub page: Option<i64>,
    /// Items per page, default 20, at most 100
    pub per_page: Option<i64>,
    /// Case-insensitive substring of the product or category name
    pub search: Option<String>,
    pub sort_by: Option<ProductSortBy>,
    pub sort_order: Option<SortOrder>,
}

impl ProductQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination {
            page: self.page,
            per_page: self.per_page,
        }
    }
}

/// Raw `current_inventory` parameters, kept as strings so that parse
/// failures can be reported with the offending value.
#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct InventoryQuery {
    /// Exact category name
    pub category: Option<String>,
    /// Inclusive lower bound on unit_price
    pub min_price: Option<String>,
    /// Inclusive upper bound on unit_price
    pub max_price: Option<String>,
    /// `1`/`true` keeps products at or below their reorder level
    pub low_stock: Option<String>,
    pub sort_by: Option<ProductSortBy>,
    pub sort_order: Option<SortOrder>,
}
