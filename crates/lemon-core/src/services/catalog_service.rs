// ============================================================================
// Lemon Core - Catalog Service
// File: crates/lemon-core/src/services/catalog_service.rs
// ============================================================================
//! Categories and menu items: public browsing, manager-only mutation.

use std::sync::Arc;

use lemon_shared::EntityId;
use tracing::{info, warn};

use crate::domain::{
    CallerContext, Category, MenuItem, MenuItemChanges, MenuItemQuery, NewCategory, NewMenuItem,
};
use crate::error::DomainError;
use crate::repositories::{CategoryRepository, MenuItemRepository};
use crate::services::policy::{authorize, Operation};

pub struct CatalogService {
    categories: Arc<dyn CategoryRepository>,
    menu_items: Arc<dyn MenuItemRepository>,
}

impl CatalogService {
    pub fn new(
        categories: Arc<dyn CategoryRepository>,
        menu_items: Arc<dyn MenuItemRepository>,
    ) -> Self {
        Self { categories, menu_items }
    }

    pub async fn list_categories(
        &self,
        caller: Option<&CallerContext>,
    ) -> Result<Vec<Category>, DomainError> {
        authorize(caller, Operation::BrowseCatalog)?;
        self.categories.list().await
    }

    pub async fn create_category(
        &self,
        caller: Option<&CallerContext>,
        category: NewCategory,
    ) -> Result<Category, DomainError> {
        authorize(caller, Operation::MutateCatalog)?;
        let created = self.categories.create(&category).await?;
        info!("Category created: {} ({})", created.id, created.slug);
        Ok(created)
    }

    /// Categories referenced by a menu item cannot be removed.
    pub async fn delete_category(
        &self,
        caller: Option<&CallerContext>,
        id: EntityId,
    ) -> Result<(), DomainError> {
        authorize(caller, Operation::MutateCatalog)?;

        if self.categories.find_by_id(id).await?.is_none() {
            return Err(DomainError::CategoryNotFound(id));
        }
        if self.categories.is_referenced(id).await? {
            warn!("Refusing to delete category {} still in use", id);
            return Err(DomainError::CategoryInUse(id));
        }
        if !self.categories.delete(id).await? {
            return Err(DomainError::CategoryNotFound(id));
        }
        info!("Category deleted: {}", id);
        Ok(())
    }

    pub async fn list_menu_items(
        &self,
        caller: Option<&CallerContext>,
        query: &MenuItemQuery,
    ) -> Result<Vec<MenuItem>, DomainError> {
        authorize(caller, Operation::BrowseCatalog)?;
        self.menu_items.list(query).await
    }

    pub async fn get_menu_item(
        &self,
        caller: Option<&CallerContext>,
        id: EntityId,
    ) -> Result<MenuItem, DomainError> {
        authorize(caller, Operation::BrowseCatalog)?;
        self.menu_items
            .find_by_id(id)
            .await?
            .ok_or(DomainError::MenuItemNotFound(id))
    }

    pub async fn create_menu_item(
        &self,
        caller: Option<&CallerContext>,
        item: NewMenuItem,
    ) -> Result<MenuItem, DomainError> {
        authorize(caller, Operation::MutateCatalog)?;
        self.require_category(item.category_id).await?;

        let created = self.menu_items.create(&item).await?;
        info!("Menu item created: {} ({})", created.id, created.title);
        Ok(created)
    }

    pub async fn update_menu_item(
        &self,
        caller: Option<&CallerContext>,
        id: EntityId,
        changes: MenuItemChanges,
    ) -> Result<MenuItem, DomainError> {
        authorize(caller, Operation::MutateCatalog)?;
        let changes = changes.validated()?;

        if changes.is_empty() {
            return self.get_menu_item(caller, id).await;
        }
        if let Some(category_id) = changes.category_id {
            self.require_category(category_id).await?;
        }

        let updated = self
            .menu_items
            .update(id, &changes)
            .await?
            .ok_or(DomainError::MenuItemNotFound(id))?;
        info!("Menu item updated: {}", id);
        Ok(updated)
    }

    pub async fn delete_menu_item(
        &self,
        caller: Option<&CallerContext>,
        id: EntityId,
    ) -> Result<(), DomainError> {
        authorize(caller, Operation::MutateCatalog)?;
        if !self.menu_items.delete(id).await? {
            return Err(DomainError::MenuItemNotFound(id));
        }
        info!("Menu item deleted: {}", id);
        Ok(())
    }

    async fn require_category(&self, id: EntityId) -> Result<Category, DomainError> {
        self.categories.find_by_id(id).await?.ok_or_else(|| {
            DomainError::ValidationError(format!("Category {} does not exist", id))
        })
    }
}
