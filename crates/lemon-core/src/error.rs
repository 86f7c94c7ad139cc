//! Domain errors

use lemon_shared::EntityId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    // Not found
    #[error("Group does not exist: {0}")]
    GroupNotFound(String),

    #[error("User does not exist: {0}")]
    UserNotFound(String),

    #[error("Category not found: {0}")]
    CategoryNotFound(EntityId),

    #[error("Menu item not found: {0}")]
    MenuItemNotFound(EntityId),

    #[error("Order not found: {0}")]
    OrderNotFound(EntityId),

    // Conflicts
    #[error("User is not in the specified group")]
    NotInGroup,

    #[error("User is already in the specified group")]
    AlreadyInGroup,

    #[error("You can't remove yourself from a group")]
    SelfRemovalForbidden,

    #[error("Menu item {0} is already in the cart")]
    DuplicateCartItem(EntityId),

    #[error("Category slug already exists: {0}")]
    CategorySlugAlreadyExists(String),

    #[error("Category {0} is referenced by menu items")]
    CategoryInUse(EntityId),

    #[error("Menu item {0} is referenced by orders")]
    MenuItemInUse(EntityId),

    #[error("Username already exists: {0}")]
    UsernameAlreadyExists(String),

    // Order placement
    #[error("Cart is empty")]
    EmptyCart,

    // Authentication / authorization
    #[error("Authentication credentials were not provided or are invalid")]
    Unauthenticated,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    // Input
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Password too short")]
    PasswordTooShort,

    #[error("Password too long")]
    PasswordTooLong,

    // Infrastructure
    #[error("Password hash error: {0}")]
    PasswordHashError(String),

    #[error("Token generation error: {0}")]
    TokenGenerationError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<validator::ValidationErrors> for DomainError {
    fn from(errors: validator::ValidationErrors) -> Self {
        DomainError::ValidationError(errors.to_string())
    }
}

impl From<lemon_security::PasswordError> for DomainError {
    fn from(error: lemon_security::PasswordError) -> Self {
        use lemon_security::PasswordError;
        match error {
            PasswordError::TooShort => DomainError::PasswordTooShort,
            PasswordError::TooLong => DomainError::PasswordTooLong,
            PasswordError::HashError(msg) => DomainError::PasswordHashError(msg),
        }
    }
}
