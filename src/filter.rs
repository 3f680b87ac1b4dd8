//! Builds product predicates and orderings from request parameters.
//!
//! Raw parameters are parsed once into [`InventoryFilter`], which then
//! renders a sea-orm [`Condition`]. Every supplied filter must hold.

use sea_orm::{
    ColumnTrait, Condition, QueryFilter, QueryOrder, Select,
    sea_query::{Expr, Func, LikeExpr, SimpleExpr},
};

use crate::{
    entity::{
        categories::{self, Entity as Categories},
        products::{self, Column, Entity as Products},
    },
    error::{AppError, AppResult},
    routes::params::{InventoryQuery, ProductSortBy, SortOrder},
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InventoryFilter {
    pub category: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub low_stock: bool,
}

impl InventoryFilter {
    pub fn is_empty(&self) -> bool {
        self.category.is_none()
            && self.min_price.is_none()
            && self.max_price.is_none()
            && !self.low_stock
    }

    /// Condition over `products` joined with `categories`.
    pub fn condition(&self) -> Condition {
        let mut condition = Condition::all();

        if let Some(category) = &self.category {
            condition = condition.add(categories::Column::Name.eq(category.as_str()));
        }

        if let Some(min_price) = self.min_price {
            condition = condition.add(Column::UnitPrice.gte(min_price));
        }

        if let Some(max_price) = self.max_price {
            condition = condition.add(Column::UnitPrice.lte(max_price));
        }

        if self.low_stock {
            condition = condition.add(
                Expr::col((Products, Column::Quantity))
                    .lte(Expr::col((Products, Column::ReorderLevel))),
            );
        }

        condition
    }

    /// Restrict a product query, joining categories when the category name is needed.
    pub fn apply(&self, select: Select<Products>) -> Select<Products> {
        let select = if self.category.is_some() {
            select.inner_join(Categories)
        } else {
            select
        };
        select.filter(self.condition())
    }
}

impl TryFrom<&InventoryQuery> for InventoryFilter {
    type Error = AppError;

    fn try_from(query: &InventoryQuery) -> AppResult<Self> {
        Ok(Self {
            category: non_empty(query.category.as_deref()).map(str::to_string),
            min_price: parse_price("min_price", query.min_price.as_deref())?,
            max_price: parse_price("max_price", query.max_price.as_deref())?,
            low_stock: parse_flag("low_stock", query.low_stock.as_deref())?,
        })
    }
}

fn non_empty(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

fn parse_price(name: &str, raw: Option<&str>) -> AppResult<Option<f64>> {
    let Some(raw) = non_empty(raw) else {
        return Ok(None);
    };
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(Some(value)),
        _ => Err(AppError::Validation(format!(
            "Invalid value for {name}: '{raw}'. Expected a number."
        ))),
    }
}

fn parse_flag(name: &str, raw: Option<&str>) -> AppResult<bool> {
    let Some(raw) = non_empty(raw) else {
        return Ok(false);
    };
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(AppError::Validation(format!(
            "Invalid value for {name}: '{raw}'. Expected a boolean."
        ))),
    }
}

/// Free-text match on product name or category name.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductSearch {
    pattern: String,
}

impl ProductSearch {
    pub fn new(term: Option<&str>) -> Option<Self> {
        non_empty(term).map(|term| Self {
            pattern: format!("%{}%", escape_like(&term.to_lowercase())),
        })
    }

    pub fn apply(&self, select: Select<Products>) -> Select<Products> {
        select.inner_join(Categories).filter(
            Condition::any()
                .add(lower_like(Expr::col((Products, Column::Name)), &self.pattern))
                .add(lower_like(
                    Expr::col((Categories, categories::Column::Name)),
                    &self.pattern,
                )),
        )
    }
}

fn lower_like(col: Expr, pattern: &str) -> SimpleExpr {
    Expr::expr(Func::lower(col)).like(LikeExpr::new(pattern).escape('\\'))
}

/// Makes `%`, `_` and the escape character itself match literally.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProductOrdering {
    pub sort_by: ProductSortBy,
    pub sort_order: SortOrder,
}

impl ProductOrdering {
    pub fn new(sort_by: Option<ProductSortBy>, sort_order: Option<SortOrder>) -> Self {
        Self {
            sort_by: sort_by.unwrap_or_default(),
            sort_order: sort_order.unwrap_or_default(),
        }
    }

    pub fn column(&self) -> products::Column {
        match self.sort_by {
            ProductSortBy::Name => Column::Name,
            ProductSortBy::CreatedAt => Column::CreatedAt,
            ProductSortBy::Price => Column::UnitPrice,
            ProductSortBy::Quantity => Column::Quantity,
        }
    }

    /// Ties fall back to id so pages never shuffle.
    pub fn apply(&self, select: Select<Products>) -> Select<Products> {
        let select = match self.sort_order {
            SortOrder::Asc => select.order_by_asc(self.column()),
            SortOrder::Desc => select.order_by_desc(self.column()),
        };
        select.order_by_asc(Column::Id)
    }
}
