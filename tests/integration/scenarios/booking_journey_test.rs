//! Book and unbook journey from an attendee's point of view

use FairBooking::models::Availability;
use FairBooking::state::messages;
use crate::helpers::*;

#[tokio::test]
async fn test_complete_booking_journey() {
    let ctx = TestContext::new().await.expect("Failed to create test context");
    let fair = ctx.seed_fair("TechFair", "Technology fair").await;
    let event = ctx.seed_event(fair.id, &owner(), "AI Talk", "Machine learning").await;
    let slot = ctx.seed_slot(event.id, "2025-01-10 09:00:00", "2025-01-10 09:30:00").await;
    let alan = attendee();

    // Step 1: pick the fair
    let replies = ctx.command(&alan, "/book").await;
    assert_eq!(single(&replies), messages::SELECT_FAIR);
    assert_eq!(tokens(&replies[0]), vec![format!("fair_id:{}", fair.id), "cancel".to_string()]);

    // Step 2: pick the event
    let replies = ctx.select(&alan, format!("fair_id:{}", fair.id)).await;
    assert_eq!(single(&replies), messages::SELECT_EVENT);
    assert_eq!(labels(&replies[0])[0], "AI Talk");

    // Step 3: pick the day
    let replies = ctx.select(&alan, format!("event_id:{}", event.id)).await;
    assert_eq!(single(&replies), "Please select a day for AI Talk:");
    assert_eq!(tokens(&replies[0])[0], format!("event_id:{}:day:2025-01-10", event.id));

    // Step 4: pick the time
    let replies = ctx.select(&alan, format!("event_id:{}:day:2025-01-10", event.id)).await;
    assert_eq!(single(&replies), "Please select a time for AI Talk, 2025-01-10:");
    assert_eq!(labels(&replies[0])[0], "09:00:00 - 09:30:00");

    // Step 5: reserve
    let replies = ctx.select(&alan, format!("slot_id:{}", slot.id)).await;
    let text = single(&replies);
    assert!(text.starts_with("Booking completed successfully!"));
    assert!(text.contains("Event: AI Talk"));
    assert!(text.contains("Start time: 2025-01-10 09:00:00"));
    assert!(text.contains("End time: 2025-01-10 09:30:00"));
    assert!(text.contains("User: Alan Attendee"));
    assert!(!ctx.has_conversation(&alan).await);

    let booking = &ctx.services.booking_service;
    assert_eq!(booking.availability(event.id).await.unwrap(), Availability::new(0, 1));
    assert_eq!(booking.get_slot(slot.id).await.unwrap().holder_id, Some(7));

    let replies = ctx.command(&alan, "/mybookings").await;
    assert!(single(&replies).contains("AI Talk\nstart: 2025-01-10 09:00:00\nend:   2025-01-10 09:30:00"));

    // a fully booked event is reported instead of offering days
    let bea = user(8, "Bea", "bea");
    ctx.command(&bea, "/book").await;
    ctx.select(&bea, format!("fair_id:{}", fair.id)).await;
    let replies = ctx.select(&bea, format!("event_id:{}", event.id)).await;
    assert_eq!(single(&replies), messages::all_slots_booked(1));

    // Unbook
    let replies = ctx.command(&alan, "/unbook").await;
    assert_eq!(single(&replies), messages::SELECT_BOOKING);
    assert_eq!(labels(&replies[0])[0], "AI Talk: 2025-01-10 09:00:00");

    let replies = ctx.select(&alan, format!("slot_id:{}", slot.id)).await;
    assert!(single(&replies).starts_with("Are you sure you want to unbook:"));
    assert_eq!(labels(&replies[0])[0], messages::CONFIRM_UNBOOK);

    let replies = ctx.select(&alan, format!("slot_id:{}", slot.id)).await;
    assert!(single(&replies).starts_with("Unbooking completed successfully!"));
    assert!(single(&replies).ends_with("The slot is now available"));

    assert_eq!(booking.availability(event.id).await.unwrap(), Availability::new(1, 1));
    assert_eq!(single(&ctx.command(&alan, "/mybookings").await), messages::NO_BOOKINGS);
}

#[tokio::test]
async fn test_cannot_unbook_a_slot_held_by_someone_else() {
    let ctx = TestContext::new().await.expect("Failed to create test context");
    let fair = ctx.seed_fair("TechFair", "").await;
    let event = ctx.seed_event(fair.id, &owner(), "AI Talk", "").await;
    let alan_slot = ctx.seed_slot(event.id, "2025-01-10 09:00:00", "2025-01-10 09:30:00").await;
    let bea_slot = ctx.seed_slot(event.id, "2025-01-10 10:00:00", "2025-01-10 10:30:00").await;
    let bea = user(8, "Bea", "bea");

    let booking = &ctx.services.booking_service;
    booking.reserve_slot(alan_slot.id, attendee().upsert_request()).await.unwrap();
    booking.reserve_slot(bea_slot.id, bea.upsert_request()).await.unwrap();

    ctx.command(&bea, "/unbook").await;
    let replies = ctx.select(&bea, format!("slot_id:{}", alan_slot.id)).await;
    assert_eq!(single(&replies), messages::UNRECOGNIZED);
    assert_eq!(booking.get_slot(alan_slot.id).await.unwrap().holder_id, Some(7));

    // confirming a different slot than the one picked is refused too
    ctx.command(&bea, "/unbook").await;
    ctx.select(&bea, format!("slot_id:{}", bea_slot.id)).await;
    let replies = ctx.select(&bea, format!("slot_id:{}", alan_slot.id)).await;
    assert_eq!(single(&replies), messages::UNRECOGNIZED);
    assert_eq!(booking.get_slot(bea_slot.id).await.unwrap().holder_id, Some(8));
}

#[tokio::test]
async fn test_slot_taken_between_listing_and_selection() {
    let ctx = TestContext::new().await.expect("Failed to create test context");
    let fair = ctx.seed_fair("TechFair", "").await;
    let event = ctx.seed_event(fair.id, &owner(), "AI Talk", "").await;
    let slot = ctx.seed_slot(event.id, "2025-01-10 09:00:00", "2025-01-10 09:30:00").await;
    let alan = attendee();

    ctx.command(&alan, "/book").await;
    ctx.select(&alan, format!("fair_id:{}", fair.id)).await;
    ctx.select(&alan, format!("event_id:{}", event.id)).await;
    ctx.select(&alan, format!("event_id:{}:day:2025-01-10", event.id)).await;

    ctx.services.booking_service
        .reserve_slot(slot.id, user(8, "Bea", "bea").upsert_request())
        .await
        .unwrap();

    let replies = ctx.select(&alan, format!("slot_id:{}", slot.id)).await;
    assert_eq!(single(&replies), messages::SLOT_TAKEN);
    assert!(!ctx.has_conversation(&alan).await);
}

#[tokio::test]
async fn test_book_event_without_slots() {
    let ctx = TestContext::new().await.expect("Failed to create test context");
    let fair = ctx.seed_fair("TechFair", "").await;
    let event = ctx.seed_event(fair.id, &owner(), "AI Talk", "").await;

    ctx.command(&attendee(), "/book").await;
    ctx.select(&attendee(), format!("fair_id:{}", fair.id)).await;
    let replies = ctx.select(&attendee(), format!("event_id:{}", event.id)).await;
    assert_eq!(single(&replies), messages::NO_SLOTS_YET);
}
