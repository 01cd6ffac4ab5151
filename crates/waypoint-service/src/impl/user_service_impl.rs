//! User service implementation.

use crate::cache::{cache_keys, CacheExt, CacheInterface};
use crate::dto::{
    ChangePasswordRequest, CreateUserRequest, UpdateUserRequest, UpdateUserRoleRequest, UserListResponse,
    UserResponse,
};
use crate::user_service::UserService;
use async_trait::async_trait;
use shaku::Component;
use std::sync::Arc;
use tracing::{debug, info};
use waypoint_core::{Email, NewUser, PageRequest, User, UserId, ValidateExt, WaypointError, WaypointResult};
use waypoint_repository::{RouteRepository, UserRepository};
use waypoint_security::PasswordHasherInterface;

/// Minimum password length when configuration does not say otherwise.
pub const DEFAULT_MIN_PASSWORD_LENGTH: usize = 8;

/// User service component for Shaku DI.
///
/// Users are cached by id as [`UserResponse`]. Every write evicts the entry;
/// deleting a user also evicts the routes that went with their chats.
#[derive(Component)]
#[shaku(interface = UserService)]
pub struct UserServiceComponent {
    #[shaku(inject)]
    user_repository: Arc<dyn UserRepository>,
    #[shaku(inject)]
    route_repository: Arc<dyn RouteRepository>,
    #[shaku(inject)]
    password_hasher: Arc<dyn PasswordHasherInterface>,
    #[shaku(inject)]
    cache: Arc<dyn CacheInterface>,
    #[shaku(default = DEFAULT_MIN_PASSWORD_LENGTH)]
    min_password_length: usize,
}

impl UserServiceComponent {
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        route_repository: Arc<dyn RouteRepository>,
        password_hasher: Arc<dyn PasswordHasherInterface>,
        cache: Arc<dyn CacheInterface>,
    ) -> Self {
        Self {
            user_repository,
            route_repository,
            password_hasher,
            cache,
            min_password_length: DEFAULT_MIN_PASSWORD_LENGTH,
        }
    }

    #[must_use]
    pub fn with_min_password_length(mut self, min_password_length: usize) -> Self {
        self.min_password_length = min_password_length;
        self
    }

    async fn load(&self, id: UserId) -> WaypointResult<User> {
        self.user_repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| WaypointError::not_found("User", id))
    }

    fn check_password_length(&self, password: &str) -> WaypointResult<()> {
        if password.chars().count() < self.min_password_length {
            return Err(WaypointError::validation(format!(
                "password: Password must be at least {} characters",
                self.min_password_length
            )));
        }
        Ok(())
    }

    async fn save_and_evict(&self, user: &User) -> WaypointResult<UserResponse> {
        let updated = self.user_repository.update(user).await?;
        self.cache.evict(&[cache_keys::user_by_id(updated.id)]).await;
        Ok(UserResponse::from(updated))
    }
}

#[async_trait]
impl UserService for UserServiceComponent {
    async fn create_user(&self, request: CreateUserRequest) -> WaypointResult<UserResponse> {
        debug!("Creating user: {}", request.login);

        request.validate_request()?;
        self.check_password_length(&request.password)?;

        let email = Email::new(request.email)?;
        if self.user_repository.exists_by_email(&email).await? {
            return Err(WaypointError::conflict(format!("Email '{}' already exists", email)));
        }

        let password_hash = self.password_hasher.hash(&request.password)?;
        let new_user = NewUser::new(request.login, email, password_hash).with_role(request.role.unwrap_or_default());

        let saved_user = self.user_repository.save(&new_user).await?;

        info!("User created: {}", saved_user.id);
        Ok(UserResponse::from(saved_user))
    }

    async fn get_user(&self, id: UserId) -> WaypointResult<UserResponse> {
        debug!("Getting user: {}", id);

        let cache_key = cache_keys::user_by_id(id);
        if let Some(cached) = self.cache.lookup::<UserResponse>(&cache_key).await {
            debug!("Cache hit for user: {}", id);
            return Ok(cached);
        }

        let response = UserResponse::from(self.load(id).await?);
        self.cache.store(&cache_key, &response).await;

        Ok(response)
    }

    async fn get_user_by_email(&self, email: &str) -> WaypointResult<UserResponse> {
        debug!("Getting user by email: {}", email);

        let email = Email::new(email)?;
        let user = self
            .user_repository
            .find_by_email(&email)
            .await?
            .ok_or_else(|| WaypointError::not_found("User", &email))?;

        let response = UserResponse::from(user);
        self.cache.store(&cache_keys::user_by_id(response.id), &response).await;

        Ok(response)
    }

    async fn list_users(&self, page: PageRequest) -> WaypointResult<UserListResponse> {
        debug!("Listing users, page: {}, size: {}", page.page, page.size);

        let users = self.user_repository.find_all(page).await?;
        Ok(UserListResponse::from(users))
    }

    async fn update_user(&self, id: UserId, request: UpdateUserRequest) -> WaypointResult<UserResponse> {
        debug!("Updating user: {}", id);

        request.validate_request()?;

        let mut user = self.load(id).await?;
        if request.is_empty() {
            return Ok(UserResponse::from(user));
        }

        if let Some(login) = request.login {
            user.login = login.trim().to_string();
        }

        if let Some(email) = request.email {
            let email = Email::new(email)?;
            if email != user.email && self.user_repository.exists_by_email(&email).await? {
                return Err(WaypointError::conflict(format!("Email '{}' already exists", email)));
            }
            user.email = email;
        }

        let response = self.save_and_evict(&user).await?;

        info!("User updated: {}", id);
        Ok(response)
    }

    async fn change_role(&self, id: UserId, request: UpdateUserRoleRequest) -> WaypointResult<UserResponse> {
        debug!("Changing user role: {} -> {}", id, request.role);

        let mut user = self.load(id).await?;
        user.role = request.role;

        let response = self.save_and_evict(&user).await?;

        info!("User role changed: {} -> {}", id, request.role);
        Ok(response)
    }

    async fn change_password(&self, id: UserId, request: ChangePasswordRequest) -> WaypointResult<()> {
        debug!("Changing password for user: {}", id);

        request.validate_request()?;
        self.check_password_length(&request.new_password)?;

        let mut user = self.load(id).await?;

        if !self.password_hasher.verify(&request.current_password, &user.password_hash)? {
            return Err(WaypointError::InvalidCredentials);
        }

        user.password_hash = self.password_hasher.hash(&request.new_password)?;
        self.save_and_evict(&user).await?;

        info!("Password changed for user: {}", id);
        Ok(())
    }

    async fn delete_user(&self, id: UserId) -> WaypointResult<()> {
        debug!("Deleting user: {}", id);

        let routes = self.route_repository.find_refs_by_user(id).await?;

        if !self.user_repository.delete(id).await? {
            return Err(WaypointError::not_found("User", id));
        }

        let mut keys = vec![cache_keys::user_by_id(id)];
        keys.extend(routes.iter().flat_map(|r| cache_keys::route_keys(r.id, r.chat_id)));
        self.cache.evict(&keys).await;

        info!("User deleted: {} ({} routes cascaded)", id, routes.len());
        Ok(())
    }

    async fn email_exists(&self, email: &str) -> WaypointResult<bool> {
        let email = Email::new(email)?;
        self.user_repository.exists_by_email(&email).await
    }
}

impl std::fmt::Debug for UserServiceComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserServiceComponent")
            .field("min_password_length", &self.min_password_length)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MockCacheInterface;
    use crate::r#impl::test_support::{disabled_cache, fast_hasher, seed_chat, seed_user, store};
    use std::time::Duration;
    use waypoint_core::{NewRoutePoint, Route, RouteType, UserRole};
    use waypoint_repository::{ChatRepository, MemoryStore};

    fn service_with_cache(store: &Arc<MemoryStore>, cache: Arc<dyn CacheInterface>) -> UserServiceComponent {
        UserServiceComponent::new(store.clone(), store.clone(), fast_hasher(), cache)
    }

    fn service(store: &Arc<MemoryStore>) -> UserServiceComponent {
        service_with_cache(store, disabled_cache())
    }

    fn create_request(login: &str, email: &str) -> CreateUserRequest {
        CreateUserRequest {
            login: login.to_string(),
            email: email.to_string(),
            password: "Password123".to_string(),
            role: None,
        }
    }

    #[tokio::test]
    async fn test_create_user_success() {
        let store = store();
        let service = service(&store);

        let user = service
            .create_user(create_request("newuser", " New@Example.com "))
            .await
            .unwrap();

        assert_eq!(user.login, "newuser");
        assert_eq!(user.email, "new@example.com");
        assert_eq!(user.role, UserRole::User);

        let stored = UserRepository::find_by_id(store.as_ref(), user.id).await.unwrap().unwrap();
        assert_ne!(stored.password_hash, "Password123");
        assert!(stored.password_hash.starts_with("$argon2id$"));
    }

    #[tokio::test]
    async fn test_create_user_with_role() {
        let store = store();
        let request = CreateUserRequest {
            role: Some(UserRole::Admin),
            ..create_request("boss", "boss@example.com")
        };

        let user = service(&store).create_user(request).await.unwrap();
        assert_eq!(user.role, UserRole::Admin);
    }

    #[tokio::test]
    async fn test_create_user_duplicate_email_is_case_insensitive() {
        let store = store();
        let service = service(&store);
        service.create_user(create_request("first", "rider@example.com")).await.unwrap();

        let result = service.create_user(create_request("second", "RIDER@example.com")).await;
        match result.unwrap_err() {
            WaypointError::Conflict(msg) => assert!(msg.contains("Email")),
            other => panic!("Expected Conflict error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_create_user_invalid_request() {
        let store = store();
        let result = service(&store).create_user(create_request("ab", "not-an-email")).await;
        assert!(matches!(result, Err(WaypointError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_user_respects_configured_password_length() {
        let store = store();
        let service = service(&store).with_min_password_length(12);

        let result = service.create_user(create_request("rider", "rider@example.com")).await;
        assert!(matches!(result, Err(WaypointError::Validation(msg)) if msg.contains("12")));
    }

    #[tokio::test]
    async fn test_get_user_not_found() {
        let store = store();
        let result = service(&store).get_user(UserId::new(99)).await;
        assert!(matches!(result, Err(WaypointError::NotFound { resource_type: "User", .. })));
    }

    #[tokio::test]
    async fn test_get_user_reads_through_and_populates_cache() {
        let store = store();
        let user = seed_user(&store, "rider").await;
        let key = cache_keys::user_by_id(user.id);

        let mut cache = MockCacheInterface::new();
        cache.expect_get_raw().returning(|_| Ok(None));
        cache.expect_default_ttl().return_const(Duration::from_secs(42));
        let expected_key = key.clone();
        cache
            .expect_set_raw()
            .withf(move |k, v, ttl| {
                k == expected_key && v.contains("\"login\":\"rider\"") && *ttl == Duration::from_secs(42)
            })
            .times(1)
            .returning(|_, _, _| Ok(()));

        let response = service_with_cache(&store, Arc::new(cache)).get_user(user.id).await.unwrap();
        assert_eq!(response.id, user.id);
    }

    #[tokio::test]
    async fn test_get_user_prefers_cache() {
        let store = store();
        let cached = UserResponse {
            id: UserId::new(5),
            login: "cached".to_string(),
            email: "cached@example.com".to_string(),
            role: UserRole::User,
        };
        let json = serde_json::to_string(&cached).unwrap();

        let mut cache = MockCacheInterface::new();
        cache.expect_get_raw().returning(move |_| Ok(Some(json.clone())));
        cache.expect_set_raw().never();

        let response = service_with_cache(&store, Arc::new(cache))
            .get_user(UserId::new(5))
            .await
            .unwrap();
        assert_eq!(response, cached);
    }

    #[tokio::test]
    async fn test_get_user_survives_cache_outage() {
        let store = store();
        let user = seed_user(&store, "rider").await;

        let mut cache = MockCacheInterface::new();
        cache
            .expect_get_raw()
            .returning(|_| Err(WaypointError::Cache("connection refused".to_string())));
        cache.expect_default_ttl().return_const(Duration::from_secs(300));
        cache
            .expect_set_raw()
            .returning(|_, _, _| Err(WaypointError::Cache("connection refused".to_string())));

        let response = service_with_cache(&store, Arc::new(cache)).get_user(user.id).await.unwrap();
        assert_eq!(response.login, "rider");
    }

    #[tokio::test]
    async fn test_get_user_by_email() {
        let store = store();
        let user = seed_user(&store, "rider").await;
        let service = service(&store);

        let found = service.get_user_by_email("RIDER@example.com").await.unwrap();
        assert_eq!(found.id, user.id);

        let missing = service.get_user_by_email("ghost@example.com").await;
        assert!(matches!(missing, Err(WaypointError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_list_users_pagination() {
        let store = store();
        for login in ["anna", "boris", "clara"] {
            seed_user(&store, login).await;
        }

        let page = service(&store).list_users(PageRequest::new(1, 2)).await.unwrap();
        assert_eq!(page.users.len(), 1);
        assert_eq!(page.users[0].login, "clara");
        assert_eq!(page.total_elements, 3);
        assert_eq!(page.total_pages, 2);
    }

    #[tokio::test]
    async fn test_list_users_beyond_total_is_empty() {
        let store = store();
        seed_user(&store, "anna").await;

        let page = service(&store).list_users(PageRequest::new(5, 10)).await.unwrap();
        assert!(page.users.is_empty());
        assert_eq!(page.total_elements, 1);
    }

    #[tokio::test]
    async fn test_update_user_changes_login_and_email() {
        let store = store();
        let user = seed_user(&store, "rider").await;

        let updated = service(&store)
            .update_user(
                user.id,
                UpdateUserRequest {
                    login: Some("cyclist".to_string()),
                    email: Some("Cyclist@Example.com".to_string()),
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.login, "cyclist");
        assert_eq!(updated.email, "cyclist@example.com");
    }

    #[tokio::test]
    async fn test_update_user_email_to_existing_email() {
        let store = store();
        let user = seed_user(&store, "rider").await;
        seed_user(&store, "walker").await;

        let result = service(&store)
            .update_user(
                user.id,
                UpdateUserRequest {
                    login: None,
                    email: Some("walker@example.com".to_string()),
                },
            )
            .await;
        assert!(matches!(result, Err(WaypointError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_update_user_keeping_own_email_is_allowed() {
        let store = store();
        let user = seed_user(&store, "rider").await;

        let updated = service(&store)
            .update_user(
                user.id,
                UpdateUserRequest {
                    login: Some("rider2".to_string()),
                    email: Some("rider@example.com".to_string()),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.login, "rider2");
    }

    #[tokio::test]
    async fn test_update_user_evicts_cache() {
        let store = store();
        let user = seed_user(&store, "rider").await;
        let key = cache_keys::user_by_id(user.id);

        let mut cache = MockCacheInterface::new();
        cache.expect_delete().withf(move |k| k == key).times(1).returning(|_| Ok(true));

        service_with_cache(&store, Arc::new(cache))
            .change_role(user.id, UpdateUserRoleRequest { role: UserRole::Admin })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_change_role_not_found() {
        let store = store();
        let result = service(&store)
            .change_role(UserId::new(7), UpdateUserRoleRequest { role: UserRole::Admin })
            .await;
        assert!(matches!(result, Err(WaypointError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_change_password_success() {
        let store = store();
        let service = service(&store);
        let user = service.create_user(create_request("rider", "rider@example.com")).await.unwrap();

        service
            .change_password(
                user.id,
                ChangePasswordRequest {
                    current_password: "Password123".to_string(),
                    new_password: "NewPassword456".to_string(),
                },
            )
            .await
            .unwrap();

        let stored = UserRepository::find_by_id(store.as_ref(), user.id).await.unwrap().unwrap();
        assert!(fast_hasher().verify("NewPassword456", &stored.password_hash).unwrap());
    }

    #[tokio::test]
    async fn test_change_password_wrong_current() {
        let store = store();
        let service = service(&store);
        let user = service.create_user(create_request("rider", "rider@example.com")).await.unwrap();

        let result = service
            .change_password(
                user.id,
                ChangePasswordRequest {
                    current_password: "WrongPassword".to_string(),
                    new_password: "NewPassword456".to_string(),
                },
            )
            .await;
        assert!(matches!(result, Err(WaypointError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_delete_user_cascades_and_evicts_routes() {
        let store = store();
        let user = seed_user(&store, "rider").await;
        let chat = seed_chat(&store, user.id, "Trip").await;
        let route = Route::new(chat.id, RouteType::Auto);
        RouteRepository::save(store.as_ref(), &route, &[NewRoutePoint::new("A", None, 1.0, 2.0)])
            .await
            .unwrap();

        let expected = vec![
            cache_keys::user_by_id(user.id),
            cache_keys::route_by_id(route.id),
            cache_keys::route_by_chat(chat.id),
        ];
        let mut cache = MockCacheInterface::new();
        cache
            .expect_delete()
            .withf(move |k| expected.iter().any(|e| e == k))
            .times(3)
            .returning(|_| Ok(true));

        service_with_cache(&store, Arc::new(cache)).delete_user(user.id).await.unwrap();

        assert!(ChatRepository::find_by_id(store.as_ref(), chat.id).await.unwrap().is_none());
        assert!(RouteRepository::find_by_chat(store.as_ref(), chat.id)
            .await
            .unwrap()
            .is_none());
        assert_eq!(store.route_point_count(), 0);
    }

    #[tokio::test]
    async fn test_delete_user_not_found() {
        let store = store();
        let result = service(&store).delete_user(UserId::new(404)).await;
        assert!(matches!(result, Err(WaypointError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_email_exists() {
        let store = store();
        seed_user(&store, "rider").await;
        let service = service(&store);

        assert!(service.email_exists("Rider@Example.com").await.unwrap());
        assert!(!service.email_exists("ghost@example.com").await.unwrap());
        assert!(matches!(
            service.email_exists("nope").await,
            Err(WaypointError::Validation(_))
        ));
    }
}
