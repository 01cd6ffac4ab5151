//! In-memory repositories.
//!
//! [`MemoryStore`] implements every repository trait over one shared state
//! and mirrors the schema rules: unique emails, one route per chat,
//! required foreign keys and cascading deletes.

use crate::traits::{ChatRepository, MessageRepository, RouteRef, RouteRepository, UserRepository};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};
use waypoint_core::{
    Chat, ChatId, Email, Message, MessageId, NewChat, NewMessage, NewRoutePoint, NewUser, Page, PageRequest, Route,
    RouteId, RoutePoint, RoutePointId, User, UserId, WaypointError, WaypointResult,
};

#[derive(Default)]
struct State {
    next_id: i64,
    users: BTreeMap<UserId, User>,
    chats: BTreeMap<ChatId, Chat>,
    messages: BTreeMap<MessageId, Message>,
    routes: BTreeMap<ChatId, Route>,
}

impl State {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn email_taken(&self, email: &Email, except: Option<UserId>) -> bool {
        self.users
            .values()
            .any(|u| &u.email == email && Some(u.id) != except)
    }

    fn remove_chat(&mut self, id: ChatId) -> bool {
        self.messages.retain(|_, m| m.chat_id != id);
        self.routes.remove(&id);
        self.chats.remove(&id).is_some()
    }

    fn build_points(&mut self, route_id: RouteId, points: &[NewRoutePoint]) -> WaypointResult<Vec<RoutePoint>> {
        points
            .iter()
            .enumerate()
            .map(|(position, point)| {
                let position = i32::try_from(position)
                    .map_err(|_| WaypointError::validation("Route has too many points"))?;
                Ok(RoutePoint {
                    id: RoutePointId::new(self.next_id()),
                    route_id,
                    position,
                    name: point.name.clone(),
                    address: point.address.clone(),
                    latitude: point.latitude,
                    longitude: point.longitude,
                })
            })
            .collect()
    }
}

/// Thread-safe in-memory store implementing all repository traits.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        // A poisoned lock only means another test thread panicked mid-write.
        self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Number of stored route points across all routes.
    #[must_use]
    pub fn route_point_count(&self) -> usize {
        self.state().routes.values().map(|r| r.points.len()).sum()
    }

    /// Number of stored messages across all chats.
    #[must_use]
    pub fn message_count(&self) -> usize {
        self.state().messages.len()
    }
}

fn page_of<T: Clone>(items: &[T], page: PageRequest) -> Page<T> {
    Page::new(page.slice(items), page, items.len() as u64)
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_id(&self, id: UserId) -> WaypointResult<Option<User>> {
        Ok(self.state().users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> WaypointResult<Option<User>> {
        Ok(self.state().users.values().find(|u| &u.email == email).cloned())
    }

    async fn exists_by_email(&self, email: &Email) -> WaypointResult<bool> {
        Ok(self.state().email_taken(email, None))
    }

    async fn find_all(&self, page: PageRequest) -> WaypointResult<Page<User>> {
        let users: Vec<User> = self.state().users.values().cloned().collect();
        Ok(page_of(&users, page))
    }

    async fn save(&self, user: &NewUser) -> WaypointResult<User> {
        let mut state = self.state();
        if state.email_taken(&user.email, None) {
            return Err(WaypointError::conflict("duplicate key value violates unique constraint \"users_email_key\""));
        }
        let saved = user.clone().into_user(UserId::new(state.next_id()));
        state.users.insert(saved.id, saved.clone());
        Ok(saved)
    }

    async fn update(&self, user: &User) -> WaypointResult<User> {
        let mut state = self.state();
        if !state.users.contains_key(&user.id) {
            return Err(WaypointError::not_found("User", user.id));
        }
        if state.email_taken(&user.email, Some(user.id)) {
            return Err(WaypointError::conflict("duplicate key value violates unique constraint \"users_email_key\""));
        }
        state.users.insert(user.id, user.clone());
        Ok(user.clone())
    }

    async fn delete(&self, id: UserId) -> WaypointResult<bool> {
        let mut state = self.state();
        let owned: Vec<ChatId> = state
            .chats
            .values()
            .filter(|c| c.user_id == id)
            .map(|c| c.id)
            .collect();
        for chat_id in owned {
            state.remove_chat(chat_id);
        }
        state.messages.retain(|_, m| m.user_id != id);
        Ok(state.users.remove(&id).is_some())
    }

    async fn count(&self) -> WaypointResult<u64> {
        Ok(self.state().users.len() as u64)
    }
}

#[async_trait]
impl ChatRepository for MemoryStore {
    async fn find_by_id(&self, id: ChatId) -> WaypointResult<Option<Chat>> {
        Ok(self.state().chats.get(&id).cloned())
    }

    async fn exists(&self, id: ChatId) -> WaypointResult<bool> {
        Ok(self.state().chats.contains_key(&id))
    }

    async fn find_by_user(&self, user_id: UserId, page: PageRequest) -> WaypointResult<Page<Chat>> {
        let mut chats: Vec<Chat> = self
            .state()
            .chats
            .values()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect();
        chats.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(page_of(&chats, page))
    }

    async fn save(&self, chat: &NewChat) -> WaypointResult<Chat> {
        let mut state = self.state();
        if !state.users.contains_key(&chat.user_id) {
            return Err(WaypointError::validation(format!(
                "Referenced record does not exist: user {}",
                chat.user_id
            )));
        }
        let saved = Chat {
            id: ChatId::new(state.next_id()),
            title: chat.title.clone(),
            user_id: chat.user_id,
            created_at: Utc::now(),
        };
        state.chats.insert(saved.id, saved.clone());
        Ok(saved)
    }

    async fn update_title(&self, id: ChatId, title: &str) -> WaypointResult<Option<Chat>> {
        Ok(self.state().chats.get_mut(&id).map(|chat| {
            chat.title = title.to_string();
            chat.clone()
        }))
    }

    async fn delete(&self, id: ChatId) -> WaypointResult<bool> {
        Ok(self.state().remove_chat(id))
    }
}

#[async_trait]
impl MessageRepository for MemoryStore {
    async fn find_by_id(&self, id: MessageId) -> WaypointResult<Option<Message>> {
        Ok(self.state().messages.get(&id).cloned())
    }

    async fn find_by_chat(&self, chat_id: ChatId, page: PageRequest) -> WaypointResult<Page<Message>> {
        let mut messages: Vec<Message> = self
            .state()
            .messages
            .values()
            .filter(|m| m.chat_id == chat_id)
            .cloned()
            .collect();
        messages.sort_by(|a, b| a.send_date.cmp(&b.send_date).then(a.id.cmp(&b.id)));
        Ok(page_of(&messages, page))
    }

    async fn save(&self, message: &NewMessage) -> WaypointResult<Message> {
        let mut state = self.state();
        if !state.chats.contains_key(&message.chat_id) || !state.users.contains_key(&message.user_id) {
            return Err(WaypointError::validation("Referenced record does not exist: chat or user"));
        }
        let saved = message
            .clone()
            .into_message(MessageId::new(state.next_id()), Utc::now());
        state.messages.insert(saved.id, saved.clone());
        Ok(saved)
    }

    async fn delete(&self, id: MessageId) -> WaypointResult<bool> {
        Ok(self.state().messages.remove(&id).is_some())
    }
}

#[async_trait]
impl RouteRepository for MemoryStore {
    async fn find_by_id(&self, id: RouteId) -> WaypointResult<Option<Route>> {
        Ok(self.state().routes.values().find(|r| r.id == id).cloned())
    }

    async fn find_by_chat(&self, chat_id: ChatId) -> WaypointResult<Option<Route>> {
        Ok(self.state().routes.get(&chat_id).cloned())
    }

    async fn find_refs_by_user(&self, user_id: UserId) -> WaypointResult<Vec<RouteRef>> {
        let state = self.state();
        Ok(state
            .routes
            .values()
            .filter(|r| state.chats.get(&r.chat_id).is_some_and(|c| c.user_id == user_id))
            .map(|r| RouteRef {
                id: r.id,
                chat_id: r.chat_id,
            })
            .collect())
    }

    async fn save(&self, route: &Route, points: &[NewRoutePoint]) -> WaypointResult<Route> {
        let mut state = self.state();
        if !state.chats.contains_key(&route.chat_id) {
            return Err(WaypointError::validation(format!(
                "Referenced record does not exist: chat {}",
                route.chat_id
            )));
        }
        if state.routes.contains_key(&route.chat_id) {
            return Err(WaypointError::conflict("duplicate key value violates unique constraint \"routes_chat_id_key\""));
        }
        let mut saved = route.clone();
        saved.points = state.build_points(route.id, points)?;
        state.routes.insert(saved.chat_id, saved.clone());
        Ok(saved)
    }

    async fn update(&self, route: &Route, points: Option<&[NewRoutePoint]>) -> WaypointResult<Route> {
        let mut state = self.state();
        let new_points = points.map(|p| state.build_points(route.id, p)).transpose()?;
        let stored = state
            .routes
            .values_mut()
            .find(|r| r.id == route.id)
            .ok_or_else(|| WaypointError::not_found("Route", route.id))?;

        stored.route_type = route.route_type;
        stored.updated_at = route.updated_at;
        if let Some(points) = new_points {
            stored.points = points;
        }
        Ok(stored.clone())
    }

    async fn delete(&self, id: RouteId) -> WaypointResult<bool> {
        let mut state = self.state();
        let before = state.routes.len();
        state.routes.retain(|_, r| r.id != id);
        Ok(state.routes.len() < before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use waypoint_core::{MessageType, RouteType};

    async fn seed_user(store: &MemoryStore, email: &str) -> User {
        UserRepository::save(store, &NewUser::new("rider", Email::new(email).unwrap(), "hash"))
            .await
            .unwrap()
    }

    fn points(names: &[&str]) -> Vec<NewRoutePoint> {
        names
            .iter()
            .map(|n| NewRoutePoint::new(*n, None, 55.75, 37.61))
            .collect()
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let store = MemoryStore::new();
        seed_user(&store, "rider@example.com").await;

        let err = UserRepository::save(
            &store,
            &NewUser::new("other", Email::new("RIDER@example.com").unwrap(), "hash"),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, WaypointError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_chat_requires_existing_user() {
        let store = MemoryStore::new();
        let err = ChatRepository::save(&store, &NewChat::new("Trip", UserId::new(99)))
            .await
            .unwrap_err();
        assert!(matches!(err, WaypointError::Validation(_)));
    }

    #[tokio::test]
    async fn test_user_delete_cascades() {
        let store = MemoryStore::new();
        let user = seed_user(&store, "rider@example.com").await;
        let chat = ChatRepository::save(&store, &NewChat::new("Trip", user.id)).await.unwrap();
        MessageRepository::save(&store, &NewMessage::new("hi", MessageType::User, chat.id, user.id))
            .await
            .unwrap();
        RouteRepository::save(&store, &Route::new(chat.id, RouteType::Auto), &points(&["a", "b"]))
            .await
            .unwrap();

        assert!(UserRepository::delete(&store, user.id).await.unwrap());

        assert!(!ChatRepository::exists(&store, chat.id).await.unwrap());
        assert_eq!(store.message_count(), 0);
        assert!(RouteRepository::find_by_chat(&store, chat.id).await.unwrap().is_none());
        assert_eq!(store.route_point_count(), 0);
    }

    #[tokio::test]
    async fn test_one_route_per_chat() {
        let store = MemoryStore::new();
        let user = seed_user(&store, "rider@example.com").await;
        let chat = ChatRepository::save(&store, &NewChat::new("Trip", user.id)).await.unwrap();

        RouteRepository::save(&store, &Route::new(chat.id, RouteType::Auto), &[])
            .await
            .unwrap();
        let err = RouteRepository::save(&store, &Route::new(chat.id, RouteType::Bicycle), &[])
            .await
            .unwrap_err();
        assert!(matches!(err, WaypointError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_replacing_points_drops_old_ones() {
        let store = MemoryStore::new();
        let user = seed_user(&store, "rider@example.com").await;
        let chat = ChatRepository::save(&store, &NewChat::new("Trip", user.id)).await.unwrap();
        let route = RouteRepository::save(&store, &Route::new(chat.id, RouteType::Auto), &points(&["a", "b", "c"]))
            .await
            .unwrap();

        let updated = RouteRepository::update(&store, &route, Some(&points(&["x"])))
            .await
            .unwrap();

        assert_eq!(updated.points.len(), 1);
        assert_eq!(updated.points[0].name, "x");
        assert_eq!(updated.points[0].position, 0);
        assert_eq!(store.route_point_count(), 1);
    }

    #[tokio::test]
    async fn test_chats_newest_first_messages_oldest_first() {
        let store = MemoryStore::new();
        let user = seed_user(&store, "rider@example.com").await;
        let first = ChatRepository::save(&store, &NewChat::new("first", user.id)).await.unwrap();
        let second = ChatRepository::save(&store, &NewChat::new("second", user.id)).await.unwrap();

        let chats = ChatRepository::find_by_user(&store, user.id, PageRequest::first())
            .await
            .unwrap();
        assert_eq!(chats.content[0].id, second.id);

        for text in ["one", "two", "three"] {
            MessageRepository::save(&store, &NewMessage::new(text, MessageType::User, first.id, user.id))
                .await
                .unwrap();
        }
        let messages = MessageRepository::find_by_chat(&store, first.id, PageRequest::new(0, 2))
            .await
            .unwrap();
        assert_eq!(messages.total_elements, 3);
        assert_eq!(messages.content[0].content, "one");
        assert_eq!(messages.total_pages(), 2);
    }
}
