//! Repository trait definitions.

use async_trait::async_trait;
use waypoint_core::{
    Chat, ChatId, Email, Interface, Message, MessageId, NewChat, NewMessage, NewRoutePoint, NewUser, Page,
    PageRequest, Route, RouteId, User, UserId, WaypointResult,
};

/// User repository trait.
#[async_trait]
pub trait UserRepository: Interface + Send + Sync {
    /// Finds a user by ID.
    async fn find_by_id(&self, id: UserId) -> WaypointResult<Option<User>>;

    /// Finds a user by normalised email.
    async fn find_by_email(&self, email: &Email) -> WaypointResult<Option<User>>;

    /// Checks if an email is taken.
    async fn exists_by_email(&self, email: &Email) -> WaypointResult<bool>;

    /// Lists users ordered by id.
    async fn find_all(&self, page: PageRequest) -> WaypointResult<Page<User>>;

    /// Inserts a user. Duplicate emails surface as `Conflict`.
    async fn save(&self, user: &NewUser) -> WaypointResult<User>;

    /// Overwrites login, email, password hash and role.
    async fn update(&self, user: &User) -> WaypointResult<User>;

    /// Deletes a user together with their chats and messages.
    async fn delete(&self, id: UserId) -> WaypointResult<bool>;

    /// Counts all users.
    async fn count(&self) -> WaypointResult<u64>;
}

/// Chat repository trait.
#[async_trait]
pub trait ChatRepository: Interface + Send + Sync {
    async fn find_by_id(&self, id: ChatId) -> WaypointResult<Option<Chat>>;

    async fn exists(&self, id: ChatId) -> WaypointResult<bool>;

    /// Lists a user's chats, newest first.
    async fn find_by_user(&self, user_id: UserId, page: PageRequest) -> WaypointResult<Page<Chat>>;

    async fn save(&self, chat: &NewChat) -> WaypointResult<Chat>;

    /// Renames a chat, returning `None` if it does not exist.
    async fn update_title(&self, id: ChatId, title: &str) -> WaypointResult<Option<Chat>>;

    /// Deletes a chat together with its messages and route.
    async fn delete(&self, id: ChatId) -> WaypointResult<bool>;
}

/// Message repository trait.
#[async_trait]
pub trait MessageRepository: Interface + Send + Sync {
    async fn find_by_id(&self, id: MessageId) -> WaypointResult<Option<Message>>;

    /// Lists a chat's messages, oldest first.
    async fn find_by_chat(&self, chat_id: ChatId, page: PageRequest) -> WaypointResult<Page<Message>>;

    /// Inserts a message; `send_date` is assigned on insert.
    async fn save(&self, message: &NewMessage) -> WaypointResult<Message>;

    async fn delete(&self, id: MessageId) -> WaypointResult<bool>;
}

/// Identifies a stored route without loading its points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteRef {
    pub id: RouteId,
    pub chat_id: ChatId,
}

/// Route repository trait.
///
/// Routes are always returned with their points ordered by position.
#[async_trait]
pub trait RouteRepository: Interface + Send + Sync {
    async fn find_by_id(&self, id: RouteId) -> WaypointResult<Option<Route>>;

    async fn find_by_chat(&self, chat_id: ChatId) -> WaypointResult<Option<Route>>;

    /// Lists the routes attached to any chat owned by the user.
    async fn find_refs_by_user(&self, user_id: UserId) -> WaypointResult<Vec<RouteRef>>;

    /// Inserts a route and its points in one transaction. A second route
    /// for the same chat surfaces as `Conflict`.
    async fn save(&self, route: &Route, points: &[NewRoutePoint]) -> WaypointResult<Route>;

    /// Writes the route type and `updated_at`. When `points` is given the
    /// stored points are replaced and the old ones deleted.
    async fn update(&self, route: &Route, points: Option<&[NewRoutePoint]>) -> WaypointResult<Route>;

    async fn delete(&self, id: RouteId) -> WaypointResult<bool>;
}
