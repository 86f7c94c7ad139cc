// ============================================================================
// Lemon Core - Authentication Service
// File: crates/lemon-core/src/services/auth_service.rs
// ============================================================================
//! Registration, token login, and resolving bearer tokens into caller contexts

use std::sync::Arc;

use lemon_security::{JwtError, JwtService, PasswordService};
use tracing::{debug, info, warn};

use crate::domain::{CallerContext, NewUser, RoleSet, User};
use crate::error::DomainError;
use crate::repositories::{GroupRepository, UserRepository};
use crate::services::policy::{authorize, Operation};

/// Registration input
#[derive(Debug, Clone)]
pub struct Registration {
    pub username: String,
    pub email: Option<String>,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Authentication service for handling user login/register flows
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    groups: Arc<dyn GroupRepository>,
    jwt: Arc<JwtService>,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        groups: Arc<dyn GroupRepository>,
        jwt: Arc<JwtService>,
    ) -> Self {
        Self { users, groups, jwt }
    }

    /// Register a new customer (no groups)
    pub async fn register(&self, registration: Registration) -> Result<User, DomainError> {
        info!("Registration attempt for username: {}", registration.username);

        // 1. Password policy
        PasswordService::check_policy(&registration.password)?;

        // 2. Username uniqueness
        if self
            .users
            .find_by_username(registration.username.trim())
            .await?
            .is_some()
        {
            warn!("Registration failed: username already exists: {}", registration.username);
            return Err(DomainError::UsernameAlreadyExists(registration.username));
        }

        // 3. Hash password
        let password_hash = PasswordService::hash(&registration.password)?;

        // 4. Create user entity
        let new_user = NewUser::new(
            registration.username,
            registration.email,
            registration.first_name,
            registration.last_name,
            password_hash,
        )?;

        let created = self.users.create(&new_user).await?;
        info!("Registration successful for: {} ({})", created.username, created.id);
        Ok(created)
    }

    /// Login with username and password, returning a bearer token
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResult, DomainError> {
        info!("Login attempt for username: {}", username);

        let user = self.users.find_by_username(username).await?.ok_or_else(|| {
            warn!("Login failed: username not found: {}", username);
            DomainError::InvalidCredentials
        })?;

        let password_valid = PasswordService::verify(password, &user.password_hash)
            .map_err(|_| DomainError::InvalidCredentials)?;
        if !password_valid {
            warn!("Login failed: invalid password for: {}", username);
            return Err(DomainError::InvalidCredentials);
        }

        let auth_token = self
            .jwt
            .generate_access_token(user.id)
            .map_err(|e| DomainError::TokenGenerationError(e.to_string()))?;

        info!("Login successful for: {}", username);
        Ok(LoginResult {
            user,
            auth_token,
            expires_in: self.jwt.access_token_expiry(),
        })
    }

    /// Validates a bearer token and loads the caller with their roles.
    pub async fn resolve_caller(&self, token: &str) -> Result<CallerContext, DomainError> {
        let user_id = self.jwt.validate_access_token(token).map_err(|e| {
            match &e {
                JwtError::TokenExpired => debug!("Rejected expired token"),
                other => warn!("Rejected token: {}", other),
            }
            DomainError::Unauthenticated
        })?;

        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(DomainError::Unauthenticated)?;
        let roles = self.groups.roles_of(user.id).await?;

        Ok(CallerContext::new(&user, roles))
    }

    /// The caller's own profile with their roles.
    pub async fn me(&self, caller: &CallerContext) -> Result<(User, RoleSet), DomainError> {
        authorize(Some(caller), Operation::ViewProfile)?;
        let user = self
            .users
            .find_by_id(caller.user_id)
            .await?
            .ok_or_else(|| DomainError::UserNotFound(caller.user_id.to_string()))?;
        Ok((user, caller.roles.clone()))
    }

    /// Creates the configured superuser unless the username is already taken.
    pub async fn ensure_superuser(
        &self,
        username: &str,
        password: &str,
        email: &str,
    ) -> Result<User, DomainError> {
        if let Some(existing) = self.users.find_by_username(username).await? {
            if !existing.is_superuser {
                warn!("Configured admin '{}' exists but is not a superuser", username);
            }
            return Ok(existing);
        }

        PasswordService::check_policy(password)?;
        let password_hash = PasswordService::hash(password)?;
        let email = Some(email.to_string()).filter(|e| !e.is_empty());
        let new_user =
            NewUser::new(username.to_string(), email, None, None, password_hash)?.superuser();

        let created = self.users.create(&new_user).await?;
        info!("Superuser '{}' created ({})", created.username, created.id);
        Ok(created)
    }
}

/// Result of successful login
#[derive(Debug, Clone)]
pub struct LoginResult {
    pub user: User,
    pub auth_token: String,
    pub expires_in: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Role;
    use crate::repositories::group_repository::MockGroupRepository;
    use crate::repositories::user_repository::MockUserRepository;
    use chrono::Utc;

    fn stored_user(id: i64, password: &str) -> User {
        User {
            id,
            username: "mario".to_string(),
            email: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            is_superuser: false,
            password_hash: PasswordService::hash(password).unwrap(),
            date_joined: Utc::now(),
        }
    }

    fn jwt() -> Arc<JwtService> {
        Arc::new(JwtService::new("unit-test-secret", 300))
    }

    #[tokio::test]
    async fn test_register_rejects_short_password() {
        let mut users = MockUserRepository::new();
        users.expect_create().never();
        let service = AuthService::new(Arc::new(users), Arc::new(MockGroupRepository::new()), jwt());

        let result = service
            .register(Registration {
                username: "mario".to_string(),
                email: None,
                password: "short".to_string(),
                first_name: None,
                last_name: None,
            })
            .await;
        assert!(matches!(result, Err(DomainError::PasswordTooShort)));
    }

    #[tokio::test]
    async fn test_register_rejects_duplicate_username() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_username().returning(|_| Ok(Some(stored_user(1, "whatever-pass"))));
        users.expect_create().never();
        let service = AuthService::new(Arc::new(users), Arc::new(MockGroupRepository::new()), jwt());

        let result = service
            .register(Registration {
                username: "mario".to_string(),
                email: None,
                password: "lemon-pass-1".to_string(),
                first_name: None,
                last_name: None,
            })
            .await;
        assert!(matches!(result, Err(DomainError::UsernameAlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_login_and_resolve_caller() {
        let user = stored_user(3, "lemon-pass-1");
        let by_name = user.clone();
        let by_id = user.clone();

        let mut users = MockUserRepository::new();
        users.expect_find_by_username().returning(move |_| Ok(Some(by_name.clone())));
        users.expect_find_by_id().returning(move |_| Ok(Some(by_id.clone())));
        let mut groups = MockGroupRepository::new();
        groups
            .expect_roles_of()
            .returning(|_| Ok([Role::DeliveryCrew].into_iter().collect()));

        let service = AuthService::new(Arc::new(users), Arc::new(groups), jwt());
        let login = service.login("mario", "lemon-pass-1").await.unwrap();
        assert_eq!(login.expires_in, 300);

        let caller = service.resolve_caller(&login.auth_token).await.unwrap();
        assert_eq!(caller.user_id, 3);
        assert!(caller.has_role(Role::DeliveryCrew));
        assert_eq!(caller.access, crate::domain::AccessLevel::DeliveryCrew);
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let user = stored_user(3, "lemon-pass-1");
        let mut users = MockUserRepository::new();
        users.expect_find_by_username().returning(move |_| Ok(Some(user.clone())));

        let service = AuthService::new(Arc::new(users), Arc::new(MockGroupRepository::new()), jwt());
        let result = service.login("mario", "not-the-password").await;
        assert!(matches!(result, Err(DomainError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_garbage_token_unauthenticated() {
        let service = AuthService::new(
            Arc::new(MockUserRepository::new()),
            Arc::new(MockGroupRepository::new()),
            jwt(),
        );
        let result = service.resolve_caller("not.a.token").await;
        assert!(matches!(result, Err(DomainError::Unauthenticated)));
    }
}
