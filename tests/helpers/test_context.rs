//! Test context for dialogue tests

use chrono::{Duration, NaiveDateTime};
use FairBooking::database::DatabaseService;
use FairBooking::models::{Event, Fair, Slot};
use FairBooking::services::ServiceFactory;
use FairBooking::state::{DialogueEngine, Inbound, Reply, StateStorage, UserIdentity};
use FairBooking::utils::helpers::DATETIME_FORMAT;
use FairBooking::Result;
use super::TestDatabase;

/// Chat id configured as administrator in every test context
pub const ADMIN_ID: i64 = 1;

pub struct TestContext {
    pub database: TestDatabase,
    pub services: ServiceFactory,
    pub engine: DialogueEngine,
}

impl TestContext {
    pub async fn new() -> Result<Self> {
        Self::with_ttl(Duration::minutes(10)).await
    }

    pub async fn with_ttl(ttl: Duration) -> Result<Self> {
        let database = TestDatabase::new().await?;
        let services = ServiceFactory::new(DatabaseService::new(database.pool.clone()));
        let engine = DialogueEngine::with_options(services.clone(), StateStorage::memory(), ttl, [ADMIN_ID]);

        Ok(Self { database, services, engine })
    }

    pub async fn command(&self, user: &UserIdentity, command: &str) -> Vec<Reply> {
        self.engine
            .handle(Inbound::command(user.clone(), command))
            .await
            .expect("command should be handled")
    }

    pub async fn select(&self, user: &UserIdentity, token: impl Into<String>) -> Vec<Reply> {
        self.engine
            .handle(Inbound::callback(user.clone(), token))
            .await
            .expect("selection should be handled")
    }

    pub async fn text(&self, user: &UserIdentity, text: &str) -> Vec<Reply> {
        self.engine
            .handle(Inbound::text(user.clone(), text))
            .await
            .expect("text should be handled")
    }

    /// Whether the user has an open conversation
    pub async fn has_conversation(&self, user: &UserIdentity) -> bool {
        self.engine
            .storage()
            .find_active(user.id)
            .await
            .expect("storage should answer")
            .is_some()
    }

    pub async fn seed_fair(&self, name: &str, description: &str) -> Fair {
        self.services
            .catalog_service
            .create_fair(ADMIN_ID, name, description)
            .await
            .expect("fair should be created")
    }

    pub async fn seed_event(&self, fair_id: i64, owner: &UserIdentity, name: &str, description: &str) -> Event {
        self.services
            .catalog_service
            .create_event(fair_id, owner.upsert_request(), name, description)
            .await
            .expect("event should be created")
    }

    pub async fn seed_slot(&self, event_id: i64, start: &str, end: &str) -> Slot {
        self.services
            .booking_service
            .create_slot(event_id, at(start), at(end))
            .await
            .expect("slot should be created")
    }
}

pub fn user(id: i64, name: &str, username: &str) -> UserIdentity {
    UserIdentity::new(id, name, format!("@{}", username))
}

pub fn owner() -> UserIdentity {
    user(42, "Olivia Owner", "olivia")
}

pub fn attendee() -> UserIdentity {
    user(7, "Alan Attendee", "alan")
}

pub fn admin() -> UserIdentity {
    user(ADMIN_ID, "Ada Admin", "ada")
}

pub fn at(value: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(value, DATETIME_FORMAT).expect("valid timestamp")
}

/// Body of the only reply
pub fn single(replies: &[Reply]) -> &str {
    assert_eq!(replies.len(), 1, "expected one reply, got {:?}", replies);
    replies[0].body()
}

/// Callback tokens offered by a reply, cancel included
pub fn tokens(reply: &Reply) -> Vec<String> {
    reply.buttons().iter().map(|option| option.token.clone()).collect()
}

pub fn labels(reply: &Reply) -> Vec<String> {
    reply.buttons().iter().map(|option| option.label.clone()).collect()
}
