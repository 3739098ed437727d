//! Conversation rules of the dialogue engine

use chrono::Duration;
use FairBooking::state::messages;
use crate::helpers::*;

#[tokio::test]
async fn test_start_and_help() {
    let ctx = TestContext::new().await.expect("Failed to create test context");

    assert_eq!(single(&ctx.command(&attendee(), "/start").await), messages::START);
    assert_eq!(single(&ctx.command(&attendee(), "/help").await), messages::HELP);

    let admin_help = ctx.command(&admin(), "/help").await;
    assert!(single(&admin_help).contains("/newfair"));
    assert!(!ctx.has_conversation(&attendee()).await);
}

#[tokio::test]
async fn test_unknown_command_and_free_text() {
    let ctx = TestContext::new().await.expect("Failed to create test context");

    let replies = ctx.command(&attendee(), "/dance now").await;
    assert_eq!(single(&replies), messages::unknown_command("/dance"));

    let replies = ctx.text(&attendee(), "hello there").await;
    assert_eq!(single(&replies), messages::FREE_TEXT);
}

#[tokio::test]
async fn test_whoami_before_and_after_upsert() {
    let ctx = TestContext::new().await.expect("Failed to create test context");

    let replies = ctx.command(&attendee(), "/whoami").await;
    assert!(single(&replies).contains("not associated"));
    assert!(single(&replies).contains("7"));

    ctx.services.user_service.upsert(attendee().upsert_request()).await.unwrap();
    let replies = ctx.command(&attendee(), "/whoami").await;
    assert!(single(&replies).contains("Name: Alan Attendee"));
    assert!(single(&replies).contains("Username: @alan"));
}

#[tokio::test]
async fn test_same_command_is_already_active() {
    let ctx = TestContext::new().await.expect("Failed to create test context");
    let fair = ctx.seed_fair("TechFair", "Technology exhibitors").await;

    let first = ctx.command(&attendee(), "/fairs").await;
    assert_eq!(single(&first), messages::SELECT_FAIR);

    let again = ctx.command(&attendee(), "/fairs").await;
    assert_eq!(single(&again), messages::ALREADY_ACTIVE);
    assert!(ctx.has_conversation(&attendee()).await);

    // the pending selection is still accepted
    let replies = ctx.select(&attendee(), format!("fair_id:{}", fair.id)).await;
    assert_eq!(single(&replies), "TechFair:\n\nTechnology exhibitors");
    assert!(!ctx.has_conversation(&attendee()).await);
}

#[tokio::test]
async fn test_other_command_closes_open_conversation() {
    let ctx = TestContext::new().await.expect("Failed to create test context");
    let fair = ctx.seed_fair("TechFair", "").await;

    ctx.command(&attendee(), "/fairs").await;
    let replies = ctx.command(&attendee(), "/publish").await;

    assert_eq!(replies.len(), 2);
    assert_eq!(replies[0].body(), messages::UNRECOGNIZED);
    assert_eq!(replies[1].body(), messages::ASK_EVENT_NAME);

    // the old selection no longer belongs to the open conversation
    let stale = ctx.select(&attendee(), format!("fair_id:{}", fair.id)).await;
    assert_eq!(single(&stale), messages::UNRECOGNIZED);
    assert!(!ctx.has_conversation(&attendee()).await);
}

#[tokio::test]
async fn test_cancel_button_and_command() {
    let ctx = TestContext::new().await.expect("Failed to create test context");
    ctx.seed_fair("TechFair", "").await;

    let replies = ctx.command(&attendee(), "/fairs").await;
    assert_eq!(tokens(&replies[0]).last().map(String::as_str), Some("cancel"));
    assert_eq!(single(&ctx.select(&attendee(), "cancel").await), messages::CANCELLED);
    assert!(!ctx.has_conversation(&attendee()).await);

    ctx.command(&attendee(), "/fairs").await;
    assert_eq!(single(&ctx.command(&attendee(), "/cancel").await), messages::CANCELLED);
    assert_eq!(single(&ctx.command(&attendee(), "/cancel").await), messages::NOTHING_TO_CANCEL);
}

#[tokio::test]
async fn test_selection_without_conversation_is_stale() {
    let ctx = TestContext::new().await.expect("Failed to create test context");
    let fair = ctx.seed_fair("TechFair", "").await;

    let replies = ctx.select(&attendee(), format!("fair_id:{}", fair.id)).await;
    assert_eq!(single(&replies), messages::STALE_SELECTION);
}

#[tokio::test]
async fn test_malformed_token_closes_conversation() {
    let ctx = TestContext::new().await.expect("Failed to create test context");
    ctx.seed_fair("TechFair", "").await;

    ctx.command(&attendee(), "/fairs").await;
    let replies = ctx.select(&attendee(), "fair_id:abc").await;
    assert_eq!(single(&replies), messages::UNRECOGNIZED);
    assert!(!ctx.has_conversation(&attendee()).await);

    ctx.command(&attendee(), "/fairs").await;
    let replies = ctx.select(&attendee(), "slot_id:1").await;
    assert_eq!(single(&replies), messages::UNRECOGNIZED);
}

#[tokio::test]
async fn test_text_during_selection_closes_conversation() {
    let ctx = TestContext::new().await.expect("Failed to create test context");
    ctx.seed_fair("TechFair", "").await;

    ctx.command(&attendee(), "/book").await;
    let replies = ctx.text(&attendee(), "TechFair").await;
    assert_eq!(single(&replies), messages::UNRECOGNIZED);
    assert!(!ctx.has_conversation(&attendee()).await);
}

#[tokio::test]
async fn test_deleted_record_gives_stale_reply() {
    let ctx = TestContext::new().await.expect("Failed to create test context");
    let fair = ctx.seed_fair("TechFair", "Technology").await;

    ctx.command(&attendee(), "/fairs").await;
    ctx.services.catalog_service.delete_fair(ADMIN_ID, fair.id).await.unwrap();

    let replies = ctx.select(&attendee(), format!("fair_id:{}", fair.id)).await;
    assert_eq!(single(&replies), messages::STALE_RECORD);
    assert!(!ctx.has_conversation(&attendee()).await);
}

#[tokio::test]
async fn test_expired_conversation_is_absent() {
    let ctx = TestContext::with_ttl(Duration::seconds(-1)).await.expect("Failed to create test context");
    let fair = ctx.seed_fair("TechFair", "").await;

    let replies = ctx.command(&attendee(), "/fairs").await;
    assert_eq!(single(&replies), messages::SELECT_FAIR);

    let replies = ctx.select(&attendee(), format!("fair_id:{}", fair.id)).await;
    assert_eq!(single(&replies), messages::STALE_SELECTION);

    // a new command opens normally instead of reporting an active one
    let replies = ctx.command(&attendee(), "/fairs").await;
    assert_eq!(single(&replies), messages::SELECT_FAIR);
}

#[tokio::test]
async fn test_empty_listings_finish_immediately() {
    let ctx = TestContext::new().await.expect("Failed to create test context");

    assert_eq!(single(&ctx.command(&attendee(), "/fairs").await), messages::NO_FAIRS);
    assert_eq!(single(&ctx.command(&attendee(), "/unbook").await), messages::NO_BOOKINGS);
    assert_eq!(single(&ctx.command(&attendee(), "/mybookings").await), messages::NO_BOOKINGS);
    assert_eq!(single(&ctx.command(&attendee(), "/myevents").await), messages::NO_OWN_EVENTS);
    assert!(!ctx.has_conversation(&attendee()).await);
}

#[tokio::test]
async fn test_users_have_independent_conversations() {
    let ctx = TestContext::new().await.expect("Failed to create test context");
    ctx.seed_fair("TechFair", "").await;

    ctx.command(&attendee(), "/fairs").await;
    let replies = ctx.command(&owner(), "/fairs").await;
    assert_eq!(single(&replies), messages::SELECT_FAIR);

    ctx.select(&owner(), "cancel").await;
    assert!(ctx.has_conversation(&attendee()).await);
    assert!(!ctx.has_conversation(&owner()).await);
}
