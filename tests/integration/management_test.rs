//! Exhibitor and administrator conversations

use FairBooking::models::Availability;
use FairBooking::state::{messages, Reply, MAX_TOKEN_BYTES};
use crate::helpers::*;

const SLOT_TEXT: &str = "2025-01-10 09:00:00\n2025-01-10 09:30:00";

fn first(replies: &[Reply]) -> &Reply {
    replies.first().expect("at least one reply")
}

#[tokio::test]
async fn test_publish_event() {
    let ctx = TestContext::new().await.expect("Failed to create test context");
    let fair = ctx.seed_fair("TechFair", "").await;

    assert_eq!(single(&ctx.command(&owner(), "/publish").await), messages::ASK_EVENT_NAME);

    let replies = ctx.text(&owner(), "  AI   Talk ").await;
    assert_eq!(single(&replies), messages::SELECT_FAIR);
    let token = format!("fair_id:{}:name:AI Talk", fair.id);
    assert_eq!(tokens(first(&replies)), vec![token.clone(), "cancel".to_string()]);
    assert_eq!(labels(first(&replies))[0], "TechFair");

    let done = ctx.select(&owner(), token).await;
    assert!(single(&done).starts_with("Event created successfully!"));
    assert!(single(&done).contains("Fair: TechFair"));

    let events = ctx.services.catalog_service.events_owned_by(42).await.unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].name, "AI Talk");
    assert_eq!(events[0].description, "");
    assert!(!ctx.has_conversation(&owner()).await);
}

#[tokio::test]
async fn test_publish_rejects_empty_and_oversized_names() {
    let ctx = TestContext::new().await.expect("Failed to create test context");
    let fair = ctx.seed_fair("TechFair", "").await;

    ctx.command(&owner(), "/publish").await;
    assert_eq!(single(&ctx.text(&owner(), "   ").await), messages::EMPTY_TEXT);

    ctx.command(&owner(), "/publish").await;
    let name = "x".repeat(60);
    let prefix = format!("fair_id:{}:name:", fair.id).len();
    let replies = ctx.text(&owner(), &name).await;
    assert_eq!(single(&replies), messages::text_too_long(MAX_TOKEN_BYTES - prefix));
    assert!(!ctx.has_conversation(&owner()).await);
    assert_eq!(ctx.database.count_records("events").await.unwrap(), 0);
}

#[tokio::test]
async fn test_publish_without_fairs() {
    let ctx = TestContext::new().await.expect("Failed to create test context");

    ctx.command(&owner(), "/publish").await;
    assert_eq!(single(&ctx.text(&owner(), "AI Talk").await), messages::NO_FAIRS_CANCELLED);
}

#[tokio::test]
async fn test_change_description() {
    let ctx = TestContext::new().await.expect("Failed to create test context");
    let fair = ctx.seed_fair("TechFair", "").await;
    let event = ctx.seed_event(fair.id, &owner(), "AI Talk", "Old agenda").await;

    assert_eq!(single(&ctx.command(&owner(), "/changedes").await), messages::ASK_EVENT_DESCRIPTION);
    let replies = ctx.text(&owner(), "New agenda").await;
    assert_eq!(single(&replies), messages::SELECT_OWN_EVENT);

    let token = format!("event_id:{}:des:New agenda", event.id);
    assert_eq!(tokens(first(&replies))[0], token);

    let done = ctx.select(&owner(), token).await;
    assert!(single(&done).starts_with("Description updated successfully!"));
    assert_eq!(ctx.services.catalog_service.get_event(event.id).await.unwrap().description, "New agenda");
}

#[tokio::test]
async fn test_forged_event_of_another_owner_is_refused() {
    let ctx = TestContext::new().await.expect("Failed to create test context");
    let fair = ctx.seed_fair("TechFair", "").await;
    let target = ctx.seed_event(fair.id, &owner(), "AI Talk", "Original").await;
    ctx.seed_event(fair.id, &attendee(), "Side Show", "").await;

    ctx.command(&attendee(), "/changedes").await;
    ctx.text(&attendee(), "Hacked").await;
    let replies = ctx.select(&attendee(), format!("event_id:{}:des:Hacked", target.id)).await;
    assert_eq!(single(&replies), messages::UNRECOGNIZED);
    assert_eq!(ctx.services.catalog_service.get_event(target.id).await.unwrap().description, "Original");

    ctx.command(&attendee(), "/deleteevent").await;
    let replies = ctx.select(&attendee(), format!("event_id:{}", target.id)).await;
    assert_eq!(single(&replies), messages::UNRECOGNIZED);
    assert!(ctx.services.catalog_service.get_event(target.id).await.is_ok());

    ctx.command(&attendee(), "/newslot").await;
    ctx.text(&attendee(), SLOT_TEXT).await;
    let replies = ctx.select(&attendee(), format!("event_id:{}:time:{}", target.id, SLOT_TEXT)).await;
    assert_eq!(single(&replies), messages::UNRECOGNIZED);
    assert_eq!(ctx.database.count_records("slots").await.unwrap(), 0);
}

#[tokio::test]
async fn test_new_slot() {
    let ctx = TestContext::new().await.expect("Failed to create test context");
    let fair = ctx.seed_fair("TechFair", "").await;
    let event = ctx.seed_event(fair.id, &owner(), "AI Talk", "").await;

    assert_eq!(single(&ctx.command(&owner(), "/newslot").await), messages::ASK_SLOT_TIMES);
    let replies = ctx.text(&owner(), "2025-01-10 09:00:00\r\n2025-01-10 09:30:00\n").await;
    let token = format!("event_id:{}:time:{}", event.id, SLOT_TEXT);
    assert_eq!(tokens(first(&replies))[0], token);

    let done = ctx.select(&owner(), token).await;
    assert!(single(&done).starts_with("Slot created successfully!"));
    assert!(single(&done).contains("Start time: 2025-01-10 09:00:00"));
    assert_eq!(
        ctx.services.booking_service.availability(event.id).await.unwrap(),
        Availability::new(1, 1)
    );
}

#[tokio::test]
async fn test_new_slot_rejects_bad_input() {
    let ctx = TestContext::new().await.expect("Failed to create test context");
    let fair = ctx.seed_fair("TechFair", "").await;
    ctx.seed_event(fair.id, &owner(), "AI Talk", "").await;

    ctx.command(&owner(), "/newslot").await;
    assert_eq!(single(&ctx.text(&owner(), "tomorrow morning").await), messages::BAD_SLOT_FORMAT);

    ctx.command(&owner(), "/newslot").await;
    let inverted = "2025-01-10 10:00:00\n2025-01-10 09:00:00";
    assert_eq!(single(&ctx.text(&owner(), inverted).await), messages::BAD_SLOT_RANGE);

    ctx.command(&owner(), "/newslot").await;
    let impossible = "2025-02-30 10:00:00\n2025-02-30 11:00:00";
    assert_eq!(single(&ctx.text(&owner(), impossible).await), messages::BAD_SLOT_FORMAT);

    assert_eq!(ctx.database.count_records("slots").await.unwrap(), 0);
    assert!(!ctx.has_conversation(&owner()).await);
}

#[tokio::test]
async fn test_delete_slot() {
    let ctx = TestContext::new().await.expect("Failed to create test context");
    let fair = ctx.seed_fair("TechFair", "").await;
    let event = ctx.seed_event(fair.id, &owner(), "AI Talk", "").await;
    let slot = ctx.seed_slot(event.id, "2025-01-10 09:00:00", "2025-01-10 09:30:00").await;
    let other = ctx.seed_slot(event.id, "2025-01-10 10:00:00", "2025-01-10 10:30:00").await;

    ctx.command(&owner(), "/deleteslot").await;
    let replies = ctx.select(&owner(), format!("event_id:{}", event.id)).await;
    assert_eq!(single(&replies), "Which slot do you want to delete for AI Talk?");
    assert_eq!(labels(first(&replies))[0], "2025-01-10 09:00:00 - 2025-01-10 09:30:00");

    let replies = ctx.select(&owner(), format!("slot_id:{}", slot.id)).await;
    assert!(single(&replies).starts_with("Are you sure you want to delete:"));
    assert_eq!(labels(first(&replies))[0], messages::CONFIRM_DELETE_SLOT);

    let done = ctx.select(&owner(), format!("slot_id:{}", slot.id)).await;
    assert!(single(&done).starts_with("Slot deleted successfully!"));
    assert_eq!(ctx.database.count_records("slots").await.unwrap(), 1);

    // confirmation must name the slot that was picked
    ctx.command(&owner(), "/deleteslot").await;
    ctx.select(&owner(), format!("event_id:{}", event.id)).await;
    ctx.select(&owner(), format!("slot_id:{}", other.id)).await;
    let replies = ctx.select(&owner(), format!("slot_id:{}", slot.id)).await;
    assert_eq!(single(&replies), messages::UNRECOGNIZED);
    assert_eq!(ctx.database.count_records("slots").await.unwrap(), 1);
}

#[tokio::test]
async fn test_delete_event_removes_slots() {
    let ctx = TestContext::new().await.expect("Failed to create test context");
    let fair = ctx.seed_fair("TechFair", "").await;
    let event = ctx.seed_event(fair.id, &owner(), "AI Talk", "").await;
    let slot = ctx.seed_slot(event.id, "2025-01-10 09:00:00", "2025-01-10 09:30:00").await;
    ctx.services.booking_service.reserve_slot(slot.id, attendee().upsert_request()).await.unwrap();

    ctx.command(&owner(), "/deleteevent").await;
    let replies = ctx.select(&owner(), format!("event_id:{}", event.id)).await;
    assert!(single(&replies).contains("All the related slots will be deleted as well"));

    let done = ctx.select(&owner(), format!("event_id:{}", event.id)).await;
    assert!(single(&done).starts_with("Event deleted successfully!"));
    assert_eq!(ctx.database.count_records("events").await.unwrap(), 0);
    assert_eq!(ctx.database.count_records("slots").await.unwrap(), 0);

    assert_eq!(single(&ctx.command(&attendee(), "/mybookings").await), messages::NO_BOOKINGS);
}

#[tokio::test]
async fn test_my_events_lists_slots_and_holders() {
    let ctx = TestContext::new().await.expect("Failed to create test context");
    let fair = ctx.seed_fair("TechFair", "").await;
    let event = ctx.seed_event(fair.id, &owner(), "AI Talk", "Machine learning").await;
    let booked = ctx.seed_slot(event.id, "2025-01-10 09:00:00", "2025-01-10 09:30:00").await;
    ctx.seed_slot(event.id, "2025-01-10 10:00:00", "2025-01-10 10:30:00").await;
    ctx.services.booking_service.reserve_slot(booked.id, attendee().upsert_request()).await.unwrap();

    let replies = ctx.command(&owner(), "/myevents").await;
    assert_eq!(labels(first(&replies)), vec!["AI Talk", "/cancel"]);

    let replies = ctx.select(&owner(), format!("event_id:{}", event.id)).await;
    let text = single(&replies);
    assert!(text.contains("Description: Machine learning"));
    assert!(text.contains("Owner: Olivia Owner\nOwner Contact: @olivia"));
    assert!(text.contains("Slot booked by: Alan Attendee\nContact: @alan"));
    assert!(text.contains("2025-01-10 10:00:00\n2025-01-10 10:30:00\nSlot Available"));
}

#[tokio::test]
async fn test_admin_commands_are_restricted() {
    let ctx = TestContext::new().await.expect("Failed to create test context");
    ctx.seed_fair("TechFair", "").await;

    assert_eq!(single(&ctx.command(&attendee(), "/newfair").await), messages::ADMIN_ONLY);
    assert_eq!(single(&ctx.command(&attendee(), "/deletefair").await), messages::ADMIN_ONLY);
    assert!(!ctx.has_conversation(&attendee()).await);
}

#[tokio::test]
async fn test_admin_creates_and_deletes_fair() {
    let ctx = TestContext::new().await.expect("Failed to create test context");

    assert_eq!(single(&ctx.command(&admin(), "/newfair").await), messages::ASK_FAIR_NAME);
    assert_eq!(single(&ctx.text(&admin(), "Robotics Expo").await), messages::ASK_FAIR_DESCRIPTION);
    let done = ctx.text(&admin(), "All about robots").await;
    assert!(single(&done).starts_with("Fair created successfully!"));

    let fairs = ctx.services.catalog_service.list_fairs().await.unwrap();
    assert_eq!(fairs.len(), 1);
    assert_eq!(fairs[0].description, "All about robots");
    let fair = fairs[0].clone();
    let event = ctx.seed_event(fair.id, &owner(), "Robot Arm", "").await;

    let replies = ctx.command(&admin(), "/deletefair").await;
    assert_eq!(single(&replies), messages::SELECT_FAIR_TO_DELETE);
    let replies = ctx.select(&admin(), format!("fair_id:{}", fair.id)).await;
    assert!(single(&replies).contains("Its events will be kept"));

    let done = ctx.select(&admin(), format!("fair_id:{}", fair.id)).await;
    assert!(single(&done).starts_with("Fair deleted successfully!"));
    assert!(ctx.services.catalog_service.list_fairs().await.unwrap().is_empty());
    assert!(ctx.services.catalog_service.get_event(event.id).await.is_ok());
}
