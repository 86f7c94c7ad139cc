// ============================================================================
// Lemon Core - Menu Item Entity
// File: crates/lemon-core/src/domain/menu_item.rs
// Description: Menu items plus the listing query (filters, search, ordering)
// ============================================================================

use std::cmp::Ordering;

use lemon_shared::constants::MAX_MONEY_UNITS;
use lemon_shared::{EntityId, Pagination};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::category::Category;
use crate::error::DomainError;

/// Menu item with its category embedded, as it is read back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: EntityId,
    pub title: String,
    pub price: Decimal,
    pub featured: bool,
    pub inventory: i32,
    pub category: Category,
}

#[derive(Debug, Clone, Validate)]
pub struct NewMenuItem {
    #[validate(length(min = 1, max = 255, message = "Title must be between 1 and 255 characters"))]
    pub title: String,
    pub price: Decimal,
    pub featured: bool,
    #[validate(range(min = 0, message = "Inventory cannot be negative"))]
    pub inventory: i32,
    pub category_id: EntityId,
}

impl NewMenuItem {
    pub fn new(
        title: String,
        price: Decimal,
        featured: bool,
        inventory: i32,
        category_id: EntityId,
    ) -> Result<Self, DomainError> {
        let item = Self {
            title: title.trim().to_string(),
            price,
            featured,
            inventory,
            category_id,
        };
        item.validate()?;
        validate_price(price)?;
        Ok(item)
    }
}

/// Partial update; `None` leaves the field untouched.
#[derive(Debug, Clone, Default, Validate)]
pub struct MenuItemChanges {
    #[validate(length(min = 1, max = 255, message = "Title must be between 1 and 255 characters"))]
    pub title: Option<String>,
    pub price: Option<Decimal>,
    pub featured: Option<bool>,
    #[validate(range(min = 0, message = "Inventory cannot be negative"))]
    pub inventory: Option<i32>,
    pub category_id: Option<EntityId>,
}

impl MenuItemChanges {
    pub fn validated(mut self) -> Result<Self, DomainError> {
        self.title = self.title.map(|t| t.trim().to_string());
        self.validate()?;
        if let Some(price) = self.price {
            validate_price(price)?;
        }
        Ok(self)
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.price.is_none()
            && self.featured.is_none()
            && self.inventory.is_none()
            && self.category_id.is_none()
    }

    /// Applies the changes in place. The caller resolves `category_id` into `category`.
    pub fn apply(&self, item: &mut MenuItem, category: Option<Category>) {
        if let Some(title) = &self.title {
            item.title = title.clone();
        }
        if let Some(price) = self.price {
            item.price = price;
        }
        if let Some(featured) = self.featured {
            item.featured = featured;
        }
        if let Some(inventory) = self.inventory {
            item.inventory = inventory;
        }
        if let Some(category) = category {
            item.category = category;
        }
    }
}

/// Prices are stored as NUMERIC(10, 2).
fn validate_price(price: Decimal) -> Result<(), DomainError> {
    if price.is_sign_negative() && !price.is_zero() {
        return Err(DomainError::ValidationError("Price cannot be negative".to_string()));
    }
    if price.normalize().scale() > 2 {
        return Err(DomainError::ValidationError(
            "Price cannot have more than 2 decimal places".to_string(),
        ));
    }
    ensure_storable(price, "Price")
}

/// Rejects amounts that do not fit a money column.
pub(crate) fn ensure_storable(amount: Decimal, what: &str) -> Result<(), DomainError> {
    if amount >= Decimal::from(MAX_MONEY_UNITS) {
        return Err(DomainError::ValidationError(format!("{} is too large", what)));
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItemSortField {
    Id,
    Title,
    Price,
    Inventory,
}

impl MenuItemSortField {
    pub fn as_str(&self) -> &'static str {
        match self {
            MenuItemSortField::Id => "id",
            MenuItemSortField::Title => "title",
            MenuItemSortField::Price => "price",
            MenuItemSortField::Inventory => "inventory",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "id" => Some(MenuItemSortField::Id),
            "title" => Some(MenuItemSortField::Title),
            "price" => Some(MenuItemSortField::Price),
            "inventory" => Some(MenuItemSortField::Inventory),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuItemOrdering {
    pub field: MenuItemSortField,
    pub descending: bool,
}

impl MenuItemOrdering {
    /// Parses `price,-inventory` style ordering parameters.
    pub fn parse_list(raw: &str) -> Result<Vec<Self>, DomainError> {
        raw.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|term| {
                let (descending, name) = match term.strip_prefix('-') {
                    Some(rest) => (true, rest),
                    None => (false, term),
                };
                MenuItemSortField::from_str(name)
                    .map(|field| Self { field, descending })
                    .ok_or_else(|| {
                        DomainError::ValidationError(format!("Cannot order by '{}'", name))
                    })
            })
            .collect()
    }

    fn compare(&self, a: &MenuItem, b: &MenuItem) -> Ordering {
        let ord = match self.field {
            MenuItemSortField::Id => a.id.cmp(&b.id),
            MenuItemSortField::Title => a.title.cmp(&b.title),
            MenuItemSortField::Price => a.price.cmp(&b.price),
            MenuItemSortField::Inventory => a.inventory.cmp(&b.inventory),
        };
        if self.descending {
            ord.reverse()
        } else {
            ord
        }
    }
}

/// Listing query for menu items.
#[derive(Debug, Clone, Default)]
pub struct MenuItemQuery {
    /// Exact title match.
    pub title: Option<String>,
    /// Exact price match.
    pub price: Option<Decimal>,
    /// Category slug.
    pub category: Option<String>,
    pub featured: Option<bool>,
    /// Case-insensitive substring search on the title.
    pub search: Option<String>,
    pub ordering: Vec<MenuItemOrdering>,
    pub pagination: Pagination,
}

impl MenuItemQuery {
    pub fn matches(&self, item: &MenuItem) -> bool {
        if let Some(title) = &self.title {
            if &item.title != title {
                return false;
            }
        }
        if let Some(price) = self.price {
            if item.price != price {
                return false;
            }
        }
        if let Some(slug) = &self.category {
            if &item.category.slug != slug {
                return false;
            }
        }
        if let Some(featured) = self.featured {
            if item.featured != featured {
                return false;
            }
        }
        if let Some(term) = &self.search {
            if !item.title.to_lowercase().contains(&term.to_lowercase()) {
                return false;
            }
        }
        true
    }

    /// Sorts by the requested ordering, falling back to id for a stable result.
    pub fn sort(&self, items: &mut [MenuItem]) {
        items.sort_by(|a, b| {
            self.ordering
                .iter()
                .map(|o| o.compare(a, b))
                .find(|ord| *ord != Ordering::Equal)
                .unwrap_or_else(|| a.id.cmp(&b.id))
        });
    }
}
