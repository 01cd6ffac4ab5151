//! Chat service implementation.

use crate::cache::{cache_keys, CacheExt, CacheInterface};
use crate::chat_service::ChatService;
use crate::dto::{ChatListResponse, ChatResponse, CreateChatRequest, RenameChatRequest};
use async_trait::async_trait;
use shaku::Component;
use std::sync::Arc;
use tracing::{debug, info};
use waypoint_core::{ChatId, NewChat, PageRequest, UserId, ValidateExt, WaypointError, WaypointResult};
use waypoint_repository::{ChatRepository, RouteRepository, UserRepository};

/// Chat service component for Shaku DI.
#[derive(Component)]
#[shaku(interface = ChatService)]
pub struct ChatServiceComponent {
    #[shaku(inject)]
    chat_repository: Arc<dyn ChatRepository>,
    #[shaku(inject)]
    user_repository: Arc<dyn UserRepository>,
    #[shaku(inject)]
    route_repository: Arc<dyn RouteRepository>,
    #[shaku(inject)]
    cache: Arc<dyn CacheInterface>,
}

impl ChatServiceComponent {
    pub fn new(
        chat_repository: Arc<dyn ChatRepository>,
        user_repository: Arc<dyn UserRepository>,
        route_repository: Arc<dyn RouteRepository>,
        cache: Arc<dyn CacheInterface>,
    ) -> Self {
        Self {
            chat_repository,
            user_repository,
            route_repository,
            cache,
        }
    }

    async fn ensure_user(&self, user_id: UserId) -> WaypointResult<()> {
        match self.user_repository.find_by_id(user_id).await? {
            Some(_) => Ok(()),
            None => Err(WaypointError::not_found("User", user_id)),
        }
    }
}

#[async_trait]
impl ChatService for ChatServiceComponent {
    async fn create_chat(&self, request: CreateChatRequest) -> WaypointResult<ChatResponse> {
        debug!("Creating chat for user: {}", request.user_id);

        request.validate_request()?;
        self.ensure_user(request.user_id).await?;

        let chat = self
            .chat_repository
            .save(&NewChat::new(request.title, request.user_id))
            .await?;

        info!("Chat created: {} (user {})", chat.id, chat.user_id);
        Ok(ChatResponse::from(chat))
    }

    async fn get_chat(&self, id: ChatId) -> WaypointResult<ChatResponse> {
        debug!("Getting chat: {}", id);

        self.chat_repository
            .find_by_id(id)
            .await?
            .map(ChatResponse::from)
            .ok_or_else(|| WaypointError::not_found("Chat", id))
    }

    async fn list_user_chats(&self, user_id: UserId, page: PageRequest) -> WaypointResult<ChatListResponse> {
        debug!("Listing chats of user {}, page: {}, size: {}", user_id, page.page, page.size);

        self.ensure_user(user_id).await?;
        let chats = self.chat_repository.find_by_user(user_id, page).await?;
        Ok(ChatListResponse::from(chats))
    }

    async fn rename_chat(&self, id: ChatId, request: RenameChatRequest) -> WaypointResult<ChatResponse> {
        debug!("Renaming chat: {}", id);

        request.validate_request()?;

        let chat = self
            .chat_repository
            .update_title(id, request.title.trim())
            .await?
            .ok_or_else(|| WaypointError::not_found("Chat", id))?;

        info!("Chat renamed: {}", id);
        Ok(ChatResponse::from(chat))
    }

    async fn delete_chat(&self, id: ChatId) -> WaypointResult<()> {
        debug!("Deleting chat: {}", id);

        let route = self.route_repository.find_by_chat(id).await?;

        if !self.chat_repository.delete(id).await? {
            return Err(WaypointError::not_found("Chat", id));
        }

        if let Some(route) = route {
            self.cache.evict(&cache_keys::route_keys(route.id, id)).await;
        }

        info!("Chat deleted: {}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MockCacheInterface;
    use crate::r#impl::test_support::{disabled_cache, seed_chat, seed_user, store};
    use std::time::Duration;
    use waypoint_core::{MessageType, NewMessage, Route, RouteType};
    use waypoint_repository::{MemoryStore, MessageRepository};

    fn service_with_cache(store: &Arc<MemoryStore>, cache: Arc<dyn CacheInterface>) -> ChatServiceComponent {
        ChatServiceComponent::new(store.clone(), store.clone(), store.clone(), cache)
    }

    fn service(store: &Arc<MemoryStore>) -> ChatServiceComponent {
        service_with_cache(store, disabled_cache())
    }

    #[tokio::test]
    async fn test_create_chat_success() {
        let store = store();
        let user = seed_user(&store, "rider").await;

        let chat = service(&store)
            .create_chat(CreateChatRequest {
                title: "  Weekend in Kazan ".to_string(),
                user_id: user.id,
            })
            .await
            .unwrap();

        assert_eq!(chat.title, "Weekend in Kazan");
        assert_eq!(chat.user_id, user.id);
    }

    #[tokio::test]
    async fn test_create_chat_unknown_owner() {
        let store = store();
        let result = service(&store)
            .create_chat(CreateChatRequest {
                title: "Orphan".to_string(),
                user_id: UserId::new(42),
            })
            .await;
        assert!(matches!(result, Err(WaypointError::NotFound { resource_type: "User", .. })));
    }

    #[tokio::test]
    async fn test_create_chat_blank_title() {
        let store = store();
        let user = seed_user(&store, "rider").await;
        let result = service(&store)
            .create_chat(CreateChatRequest {
                title: " ".to_string(),
                user_id: user.id,
            })
            .await;
        assert!(matches!(result, Err(WaypointError::Validation(_))));
    }

    #[tokio::test]
    async fn test_list_user_chats_newest_first() {
        let store = store();
        let user = seed_user(&store, "rider").await;
        let other = seed_user(&store, "walker").await;
        seed_chat(&store, user.id, "first").await;
        tokio::time::sleep(Duration::from_millis(5)).await;
        seed_chat(&store, user.id, "second").await;
        seed_chat(&store, other.id, "not mine").await;

        let chats = service(&store)
            .list_user_chats(user.id, PageRequest::first())
            .await
            .unwrap();

        let titles: Vec<_> = chats.chats.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["second", "first"]);
        assert_eq!(chats.total_elements, 2);
    }

    #[tokio::test]
    async fn test_list_user_chats_unknown_user() {
        let store = store();
        let result = service(&store).list_user_chats(UserId::new(3), PageRequest::first()).await;
        assert!(matches!(result, Err(WaypointError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_rename_chat() {
        let store = store();
        let user = seed_user(&store, "rider").await;
        let chat = seed_chat(&store, user.id, "Draft").await;
        let service = service(&store);

        let renamed = service
            .rename_chat(chat.id, RenameChatRequest { title: "Final".to_string() })
            .await
            .unwrap();
        assert_eq!(renamed.title, "Final");
        assert_eq!(renamed.created_at, chat.created_at);

        let missing = service
            .rename_chat(ChatId::new(999), RenameChatRequest { title: "x".to_string() })
            .await;
        assert!(matches!(missing, Err(WaypointError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_delete_chat_cascades_and_evicts_route() {
        let store = store();
        let user = seed_user(&store, "rider").await;
        let chat = seed_chat(&store, user.id, "Trip").await;
        MessageRepository::save(
            store.as_ref(),
            &NewMessage::new("hello", MessageType::User, chat.id, user.id),
        )
        .await
        .unwrap();
        let route = Route::new(chat.id, RouteType::Pedestrian);
        RouteRepository::save(store.as_ref(), &route, &[]).await.unwrap();

        let expected = cache_keys::route_keys(route.id, chat.id);
        let mut cache = MockCacheInterface::new();
        cache
            .expect_delete()
            .withf(move |k| expected.iter().any(|e| e == k))
            .times(2)
            .returning(|_| Ok(true));

        service_with_cache(&store, Arc::new(cache)).delete_chat(chat.id).await.unwrap();

        assert_eq!(store.message_count(), 0);
        assert!(RouteRepository::find_by_id(store.as_ref(), route.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_chat_without_route_touches_no_cache() {
        let store = store();
        let user = seed_user(&store, "rider").await;
        let chat = seed_chat(&store, user.id, "Trip").await;

        let mut cache = MockCacheInterface::new();
        cache.expect_delete().never();

        service_with_cache(&store, Arc::new(cache)).delete_chat(chat.id).await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_chat_not_found() {
        let store = store();
        let result = service(&store).delete_chat(ChatId::new(5)).await;
        assert!(matches!(result, Err(WaypointError::NotFound { resource_type: "Chat", .. })));
    }
}
