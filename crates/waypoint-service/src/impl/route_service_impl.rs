//! Route service implementation.

use crate::cache::{cache_keys, CacheExt, CacheInterface};
use crate::dto::{into_new_points, CreateRouteRequest, RouteResponse, UpdateRouteRequest};
use crate::route_service::RouteService;
use async_trait::async_trait;
use shaku::Component;
use std::sync::Arc;
use tracing::{debug, info};
use waypoint_core::{ChatId, Route, RouteId, ValidateExt, WaypointError, WaypointResult};
use waypoint_repository::{ChatRepository, RouteRepository};

/// Route service component for Shaku DI.
///
/// Routes are cached as [`RouteResponse`] under both their id and their
/// chat. Every write evicts both keys.
#[derive(Component)]
#[shaku(interface = RouteService)]
pub struct RouteServiceComponent {
    #[shaku(inject)]
    route_repository: Arc<dyn RouteRepository>,
    #[shaku(inject)]
    chat_repository: Arc<dyn ChatRepository>,
    #[shaku(inject)]
    cache: Arc<dyn CacheInterface>,
}

impl RouteServiceComponent {
    pub fn new(
        route_repository: Arc<dyn RouteRepository>,
        chat_repository: Arc<dyn ChatRepository>,
        cache: Arc<dyn CacheInterface>,
    ) -> Self {
        Self {
            route_repository,
            chat_repository,
            cache,
        }
    }

    async fn load_for_chat(&self, chat_id: ChatId) -> WaypointResult<Route> {
        self.route_repository
            .find_by_chat(chat_id)
            .await?
            .ok_or_else(|| WaypointError::not_found("Route for chat", chat_id))
    }

    async fn cache_route(&self, response: &RouteResponse) {
        for key in cache_keys::route_keys(response.id, response.chat_id) {
            self.cache.store(&key, response).await;
        }
    }
}

#[async_trait]
impl RouteService for RouteServiceComponent {
    async fn create_route(&self, chat_id: ChatId, request: CreateRouteRequest) -> WaypointResult<RouteResponse> {
        debug!("Creating {} route for chat {}", request.route_type, chat_id);

        request.validate_request()?;

        if !self.chat_repository.exists(chat_id).await? {
            return Err(WaypointError::not_found("Chat", chat_id));
        }
        if self.route_repository.find_by_chat(chat_id).await?.is_some() {
            return Err(WaypointError::conflict(format!("Chat {} already has a route", chat_id)));
        }

        let route = Route::new(chat_id, request.route_type);
        let points = into_new_points(request.points);
        let saved = self.route_repository.save(&route, &points).await?;

        info!("Route {} created for chat {} with {} points", saved.id, chat_id, saved.points.len());
        Ok(RouteResponse::from(saved))
    }

    async fn get_route(&self, id: RouteId) -> WaypointResult<RouteResponse> {
        debug!("Getting route: {}", id);

        if let Some(cached) = self.cache.lookup::<RouteResponse>(&cache_keys::route_by_id(id)).await {
            debug!("Cache hit for route: {}", id);
            return Ok(cached);
        }

        let route = self
            .route_repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| WaypointError::not_found("Route", id))?;

        let response = RouteResponse::from(route);
        self.cache_route(&response).await;
        Ok(response)
    }

    async fn get_route_for_chat(&self, chat_id: ChatId) -> WaypointResult<RouteResponse> {
        debug!("Getting route for chat: {}", chat_id);

        if let Some(cached) = self
            .cache
            .lookup::<RouteResponse>(&cache_keys::route_by_chat(chat_id))
            .await
        {
            debug!("Cache hit for route of chat: {}", chat_id);
            return Ok(cached);
        }

        let response = RouteResponse::from(self.load_for_chat(chat_id).await?);
        self.cache_route(&response).await;
        Ok(response)
    }

    async fn update_route(&self, chat_id: ChatId, request: UpdateRouteRequest) -> WaypointResult<RouteResponse> {
        debug!("Updating route for chat: {}", chat_id);

        request.validate_request()?;

        let mut route = self.load_for_chat(chat_id).await?;
        if let Some(route_type) = request.route_type {
            route.route_type = route_type;
        }
        route.touch();

        let points = request.points.map(into_new_points);
        let updated = self.route_repository.update(&route, points.as_deref()).await?;

        self.cache.evict(&cache_keys::route_keys(updated.id, chat_id)).await;

        info!(
            "Route {} updated ({}, {} points)",
            updated.id,
            updated.route_type,
            updated.points.len()
        );
        Ok(RouteResponse::from(updated))
    }

    async fn delete_route(&self, chat_id: ChatId) -> WaypointResult<()> {
        debug!("Deleting route for chat: {}", chat_id);

        let route = self.load_for_chat(chat_id).await?;
        if !self.route_repository.delete(route.id).await? {
            return Err(WaypointError::not_found("Route", route.id));
        }

        self.cache.evict(&cache_keys::route_keys(route.id, chat_id)).await;

        info!("Route {} deleted from chat {}", route.id, chat_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MockCacheInterface;
    use crate::dto::RoutePointRequest;
    use crate::r#impl::test_support::{disabled_cache, seed_chat, seed_user, store};
    use chrono::Duration;
    use waypoint_core::{Chat, RouteType};
    use waypoint_repository::MemoryStore;

    fn service_with_cache(store: &Arc<MemoryStore>, cache: Arc<dyn CacheInterface>) -> RouteServiceComponent {
        RouteServiceComponent::new(store.clone(), store.clone(), cache)
    }

    fn service(store: &Arc<MemoryStore>) -> RouteServiceComponent {
        service_with_cache(store, disabled_cache())
    }

    fn point(name: &str, latitude: f64, longitude: f64) -> RoutePointRequest {
        RoutePointRequest {
            name: name.to_string(),
            address: Some(format!("{name} street")),
            latitude,
            longitude,
        }
    }

    fn create_request(names: &[&str]) -> CreateRouteRequest {
        CreateRouteRequest {
            route_type: RouteType::default(),
            points: names.iter().map(|n| point(n, 55.75, 37.61)).collect(),
        }
    }

    async fn chat(store: &MemoryStore) -> Chat {
        let user = seed_user(store, "rider").await;
        seed_chat(store, user.id, "Trip").await
    }

    #[tokio::test]
    async fn test_create_route_orders_points() {
        let store = store();
        let chat = chat(&store).await;

        let route = service(&store)
            .create_route(chat.id, create_request(&["Start", "Museum", "Finish"]))
            .await
            .unwrap();

        assert_eq!(route.chat_id, chat.id);
        assert_eq!(route.route_type, RouteType::Pedestrian);
        let names: Vec<_> = route.points.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Start", "Museum", "Finish"]);
        let positions: Vec<_> = route.points.iter().map(|p| p.position).collect();
        assert_eq!(positions, vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn test_create_route_twice_conflicts() {
        let store = store();
        let chat = chat(&store).await;
        let service = service(&store);
        service.create_route(chat.id, create_request(&["A"])).await.unwrap();

        let result = service.create_route(chat.id, create_request(&["B"])).await;
        assert!(matches!(result, Err(WaypointError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_create_route_unknown_chat() {
        let store = store();
        let result = service(&store).create_route(ChatId::new(12), create_request(&[])).await;
        assert!(matches!(result, Err(WaypointError::NotFound { resource_type: "Chat", .. })));
    }

    #[tokio::test]
    async fn test_create_route_rejects_bad_coordinates() {
        let store = store();
        let chat = chat(&store).await;
        let request = CreateRouteRequest {
            route_type: RouteType::Auto,
            points: vec![point("Nowhere", 120.0, 0.0)],
        };

        let result = service(&store).create_route(chat.id, request).await;
        assert!(matches!(result, Err(WaypointError::Validation(_))));
    }

    #[tokio::test]
    async fn test_get_route_by_id_and_chat() {
        let store = store();
        let chat = chat(&store).await;
        let service = service(&store);
        let created = service.create_route(chat.id, create_request(&["A", "B"])).await.unwrap();

        assert_eq!(service.get_route(created.id).await.unwrap(), created);
        assert_eq!(service.get_route_for_chat(chat.id).await.unwrap(), created);
        assert!(matches!(
            service.get_route(RouteId::new()).await,
            Err(WaypointError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_get_route_populates_both_keys() {
        let store = store();
        let chat = chat(&store).await;
        let created = service(&store).create_route(chat.id, create_request(&["A"])).await.unwrap();

        let expected = cache_keys::route_keys(created.id, chat.id);
        let mut cache = MockCacheInterface::new();
        cache.expect_get_raw().returning(|_| Ok(None));
        cache.expect_default_ttl().return_const(std::time::Duration::from_secs(90));
        cache
            .expect_set_raw()
            .withf(move |k, _, ttl| expected.iter().any(|e| e == k) && ttl.as_secs() == 90)
            .times(2)
            .returning(|_, _, _| Ok(()));

        service_with_cache(&store, Arc::new(cache))
            .get_route_for_chat(chat.id)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_get_route_for_chat_prefers_cache() {
        let store = store();
        let chat_id = ChatId::new(3);
        let cached = RouteResponse {
            id: RouteId::new(),
            chat_id,
            route_type: RouteType::Masstransit,
            updated_at: chrono::Utc::now(),
            points: Vec::new(),
        };
        let json = serde_json::to_string(&cached).unwrap();

        let mut cache = MockCacheInterface::new();
        cache.expect_get_raw().returning(move |_| Ok(Some(json.clone())));

        let route = service_with_cache(&store, Arc::new(cache))
            .get_route_for_chat(chat_id)
            .await
            .unwrap();
        assert_eq!(route.route_type, RouteType::Masstransit);
    }

    #[tokio::test]
    async fn test_update_route_replaces_points_and_removes_orphans() {
        let store = store();
        let chat = chat(&store).await;
        let service = service(&store);
        service
            .create_route(chat.id, create_request(&["A", "B", "C"]))
            .await
            .unwrap();
        assert_eq!(store.route_point_count(), 3);

        let updated = service
            .update_route(
                chat.id,
                UpdateRouteRequest {
                    route_type: Some(RouteType::Bicycle),
                    points: Some(vec![point("X", 10.0, 20.0)]),
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.route_type, RouteType::Bicycle);
        assert_eq!(updated.points.len(), 1);
        assert_eq!(updated.points[0].name, "X");
        assert_eq!(updated.points[0].position, 0);
        assert_eq!(store.route_point_count(), 1);
    }

    #[tokio::test]
    async fn test_update_route_without_points_keeps_them_and_refreshes_timestamp() {
        let store = store();
        let chat = chat(&store).await;
        let mut route = Route::new(chat.id, RouteType::Pedestrian);
        route.updated_at -= Duration::hours(1);
        let stale = route.updated_at;
        RouteRepository::save(store.as_ref(), &route, &into_new_points(vec![point("A", 1.0, 1.0)]))
            .await
            .unwrap();

        let updated = service(&store)
            .update_route(
                chat.id,
                UpdateRouteRequest {
                    route_type: Some(RouteType::Auto),
                    points: None,
                },
            )
            .await
            .unwrap();

        assert!(updated.updated_at > stale);
        assert_eq!(updated.points.len(), 1);
        assert_eq!(updated.route_type, RouteType::Auto);
    }

    #[tokio::test]
    async fn test_update_route_evicts_both_keys() {
        let store = store();
        let chat = chat(&store).await;
        let created = service(&store).create_route(chat.id, create_request(&["A"])).await.unwrap();

        let expected = cache_keys::route_keys(created.id, chat.id);
        let mut cache = MockCacheInterface::new();
        cache
            .expect_delete()
            .withf(move |k| expected.iter().any(|e| e == k))
            .times(2)
            .returning(|_| Ok(false));

        service_with_cache(&store, Arc::new(cache))
            .update_route(chat.id, UpdateRouteRequest::default())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_update_missing_route() {
        let store = store();
        let chat = chat(&store).await;
        let result = service(&store).update_route(chat.id, UpdateRouteRequest::default()).await;
        assert!(matches!(result, Err(WaypointError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_delete_route_removes_points() {
        let store = store();
        let chat = chat(&store).await;
        let service = service(&store);
        service.create_route(chat.id, create_request(&["A", "B"])).await.unwrap();

        service.delete_route(chat.id).await.unwrap();

        assert_eq!(store.route_point_count(), 0);
        assert!(matches!(
            service.get_route_for_chat(chat.id).await,
            Err(WaypointError::NotFound { .. })
        ));
        assert!(matches!(
            service.delete_route(chat.id).await,
            Err(WaypointError::NotFound { .. })
        ));
    }
}
