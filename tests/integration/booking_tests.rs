//! Appointment lifecycle tests against in-memory ports
//!
//! Drives `BookingService` directly so storage writes and notification
//! dispatches can be counted exactly.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use rstest::rstest;

use appointly::{
    config::NotificationConfig,
    models::{
        ActorRole, AppointmentPatch, AppointmentStatus, BookingRequest, NotificationAction,
        NotificationOutcome, RescheduleRequest, SessionContext, TeamMemberSnapshot,
    },
    services::{ActorLabels, AvailabilityResolver, BookingService},
    utils::AppError,
};

use crate::common::*;

struct Harness {
    store: Arc<InMemoryStore>,
    notifications: Arc<RecordingDispatcher>,
    booking: BookingService,
}

impl Harness {
    fn new(team: &[&str]) -> Self {
        let store = InMemoryStore::new();
        store.seed_user(ProfileFixtures::maria());
        store.seed_user(ProfileFixtures::li());
        store.seed_user(ProfileFixtures::owner());
        store.seed_business(BusinessFixtures::glow_studio(team));
        store.seed_service(BusinessFixtures::haircut());

        let notifications = RecordingDispatcher::new();
        let stores = store.stores();
        let booking = BookingService::new(
            stores.businesses,
            stores.services,
            stores.appointments,
            AvailabilityResolver::new(stores.users),
            notifications.clone(),
            ActorLabels::from(&NotificationConfig::default()),
        );

        Self {
            store,
            notifications,
            booking,
        }
    }

    fn booking_request(&self) -> BookingBuilder {
        BookingBuilder::new(ids::BUSINESS_ID, ids::SERVICE_ID)
    }
}

fn owner() -> SessionContext {
    SessionContext::authenticated(ids::OWNER_ID, Some("Ana Owner".to_string()))
}

fn other_owner() -> SessionContext {
    SessionContext::authenticated(ids::OTHER_OWNER_ID, None)
}

#[tokio::test]
async fn test_create_persists_snapshot_and_confirms_once() {
    let h = Harness::new(&[ids::MEMBER_ID]);
    let request = h.booking_request().team_member(ids::MEMBER_ID).build();
    let email = request.customer_email.clone();

    let outcome = h
        .booking
        .create(&SessionContext::anonymous(), request)
        .await
        .unwrap();

    let stored = h.store.appointments();
    assert_eq!(stored.len(), 1);
    assert_eq!(h.store.write_count(), 1);

    let appointment = &stored[0];
    assert_eq!(appointment, &outcome.record);
    assert_eq!(appointment.status, AppointmentStatus::Booked);
    assert_eq!(appointment.snapshot.business_name, "Glow Studio");
    assert_eq!(appointment.snapshot.service_name, "Haircut");
    assert_eq!(appointment.snapshot.service_description, "Wash and cut");
    assert_eq!(appointment.snapshot.service_duration.total_minutes(), 60);
    assert_eq!(appointment.snapshot.duration, "Duration: 1 hours 0 minutes");
    assert_eq!(
        appointment.snapshot.team_member_data,
        vec![TeamMemberSnapshot {
            id: ids::MEMBER_ID.to_string(),
            display_name: "Maria Lopez".to_string(),
        }]
    );
    assert_eq!(appointment.date, monday());
    assert_eq!(appointment.time, NaiveTime::from_hms_opt(9, 0, 0).unwrap());

    let sent = h.notifications.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].action, NotificationAction::Confirmed);
    assert_eq!(sent[0].customer_email, email);
    assert_eq!(sent[0].actor.as_deref(), Some("our team"));
    assert_eq!(sent[0].actor_role, Some(ActorRole::Admin));
    assert_eq!(sent[0].appointment.id, appointment.id);
    assert!(outcome.notification.is_delivered());
}

#[rstest]
#[case::no_business(|r: &mut BookingRequest| r.business_id.clear())]
#[case::no_service(|r: &mut BookingRequest| r.service_id.clear())]
#[case::no_date(|r: &mut BookingRequest| r.date.clear())]
#[case::no_time(|r: &mut BookingRequest| r.time = "  ".to_string())]
#[case::no_name(|r: &mut BookingRequest| r.customer_name.clear())]
#[case::no_email(|r: &mut BookingRequest| r.customer_email.clear())]
#[case::no_phone(|r: &mut BookingRequest| r.customer_phone.clear())]
#[case::bad_email(|r: &mut BookingRequest| r.customer_email = "a@b".to_string())]
#[case::bad_phone(|r: &mut BookingRequest| r.customer_phone = "abc-phone".to_string())]
#[tokio::test]
async fn test_invalid_booking_writes_and_sends_nothing(#[case] mutate: fn(&mut BookingRequest)) {
    let h = Harness::new(&[ids::MEMBER_ID]);
    let mut request = h.booking_request().build();
    mutate(&mut request);

    let err = h
        .booking
        .create(&SessionContext::anonymous(), request)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Validation(_)), "got {:?}", err);
    assert_eq!(h.store.write_count(), 0);
    assert!(h.notifications.sent().is_empty());
}

#[tokio::test]
async fn test_unknown_service_is_not_found_without_writes() {
    let h = Harness::new(&[]);
    let request = BookingBuilder::new(ids::BUSINESS_ID, uuid::Uuid::new_v4()).build();

    let err = h
        .booking
        .create(&SessionContext::anonymous(), request)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::NotFound(_)));
    assert_eq!(h.store.write_count(), 0);
    assert!(h.notifications.sent().is_empty());
}

#[tokio::test]
async fn test_member_outside_team_is_rejected() {
    let h = Harness::new(&[ids::MEMBER_ID]);
    let request = h.booking_request().team_member(ids::SECOND_MEMBER_ID).build();

    let err = h
        .booking
        .create(&SessionContext::anonymous(), request)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::NotFound(_)));
    assert!(h.store.appointments().is_empty());
}

#[tokio::test]
async fn test_all_members_snapshot_is_frozen_at_commit() {
    let h = Harness::new(&[ids::SECOND_MEMBER_ID, ids::MEMBER_ID, "member-without-profile"]);
    let outcome = h
        .booking
        .create(
            &SessionContext::anonymous(),
            h.booking_request().team_member("all").build(),
        )
        .await
        .unwrap();

    let names: Vec<&str> = outcome
        .record
        .snapshot
        .team_member_data
        .iter()
        .map(|m| m.display_name.as_str())
        .collect();
    assert_eq!(names, vec!["Li Wei", "Maria Lopez"]);

    // Shrink the team and rename the service after booking
    h.store
        .replace_business(BusinessFixtures::glow_studio(&[ids::MEMBER_ID]));
    let mut service = BusinessFixtures::haircut();
    service.name = "Premium Haircut".to_string();
    h.store.replace_service(service);

    let stored = h.booking.get(&owner(), outcome.record.id).await.unwrap();
    assert_eq!(stored.snapshot.team_member_data.len(), 2);
    assert_eq!(stored.snapshot.service_name, "Haircut");
}

#[tokio::test]
async fn test_all_with_empty_team_books_without_members() {
    let h = Harness::new(&[]);
    let outcome = h
        .booking
        .create(
            &SessionContext::anonymous(),
            h.booking_request().team_member("all").build(),
        )
        .await
        .unwrap();

    assert!(outcome.record.snapshot.team_member_data.is_empty());
}

#[tokio::test]
async fn test_failed_dispatch_keeps_committed_booking() {
    let h = Harness::new(&[ids::MEMBER_ID]);
    h.notifications.set_failing(true);

    let outcome = h
        .booking
        .create(&SessionContext::anonymous(), h.booking_request().build())
        .await
        .unwrap();

    assert!(matches!(outcome.notification, NotificationOutcome::Failed(_)));
    assert_eq!(h.store.appointments().len(), 1);
    assert_eq!(h.notifications.sent().len(), 1);
}

#[tokio::test]
async fn test_storage_failure_sends_nothing() {
    let h = Harness::new(&[ids::MEMBER_ID]);
    h.store.fail_writes(true);

    let err = h
        .booking
        .create(&SessionContext::anonymous(), h.booking_request().build())
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Storage(_)));
    assert!(h.notifications.sent().is_empty());
}

#[tokio::test]
async fn test_reschedule_keeps_identity_and_notifies_update() {
    let h = Harness::new(&[ids::MEMBER_ID]);
    let created = h
        .booking
        .create(&SessionContext::anonymous(), h.booking_request().build())
        .await
        .unwrap()
        .record;

    let outcome = h
        .booking
        .reschedule(
            &owner(),
            created.id,
            RescheduleRequest {
                date: "2026-10-26".to_string(),
                time: "14:30".to_string(),
            },
        )
        .await
        .unwrap();

    let stored = h.booking.get(&owner(), created.id).await.unwrap();
    assert_eq!(stored.id, created.id);
    assert_eq!(stored.date, NaiveDate::from_ymd_opt(2026, 10, 26).unwrap());
    assert_eq!(stored.time, NaiveTime::from_hms_opt(14, 30, 0).unwrap());
    assert_eq!(stored.customer, created.customer);
    assert_eq!(stored, outcome.record);

    assert_eq!(
        h.notifications.actions(),
        vec![NotificationAction::Confirmed, NotificationAction::Updated]
    );
    let update = h.notifications.last().unwrap();
    assert_eq!(update.actor.as_deref(), Some("Ana Owner"));
    assert_eq!(update.actor_role, Some(ActorRole::Team));
}

#[tokio::test]
async fn test_reschedule_with_bad_time_changes_nothing() {
    let h = Harness::new(&[]);
    let created = h
        .booking
        .create(&SessionContext::anonymous(), h.booking_request().build())
        .await
        .unwrap()
        .record;
    let writes = h.store.write_count();

    let err = h
        .booking
        .reschedule(
            &owner(),
            created.id,
            RescheduleRequest {
                date: "2026-10-26".to_string(),
                time: "half past two".to_string(),
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Validation(_)));
    assert_eq!(h.store.write_count(), writes);
    assert_eq!(h.notifications.sent().len(), 1);
}

#[tokio::test]
async fn test_edit_without_display_name_uses_default_actor() {
    let h = Harness::new(&[ids::MEMBER_ID]);
    let created = h
        .booking
        .create(&SessionContext::anonymous(), h.booking_request().build())
        .await
        .unwrap()
        .record;

    let unnamed_owner = SessionContext::authenticated(ids::OWNER_ID, None);
    let outcome = h
        .booking
        .edit(
            &unnamed_owner,
            created.id,
            AppointmentPatch {
                customer_phone: Some("555-0199".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(outcome.record.customer.customer_phone, "555-0199");
    assert_eq!(outcome.record.customer.customer_name, created.customer.customer_name);
    let update = h.notifications.last().unwrap();
    assert_eq!(update.action, NotificationAction::Updated);
    assert_eq!(update.actor.as_deref(), Some("A team member"));
}

#[tokio::test]
async fn test_empty_edit_still_commits_and_notifies() {
    let h = Harness::new(&[]);
    let created = h
        .booking
        .create(&SessionContext::anonymous(), h.booking_request().build())
        .await
        .unwrap()
        .record;

    h.booking
        .edit(&owner(), created.id, AppointmentPatch::default())
        .await
        .unwrap();

    assert_eq!(h.store.write_count(), 2);
    assert_eq!(h.notifications.sent().len(), 2);
}

#[tokio::test]
async fn test_cancel_removes_record_and_notifies_without_actor() {
    let h = Harness::new(&[ids::MEMBER_ID]);
    let created = h
        .booking
        .create(&SessionContext::anonymous(), h.booking_request().build())
        .await
        .unwrap()
        .record;

    let outcome = h.booking.cancel(&owner(), created.id).await.unwrap();
    assert_eq!(outcome.record, created);

    let booked = h.booking.list_booked_for_owner(&owner()).await.unwrap();
    assert!(booked.iter().all(|a| a.id != created.id));

    let err = h.booking.get(&owner(), created.id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    let cancel = h.notifications.last().unwrap();
    assert_eq!(cancel.action, NotificationAction::Canceled);
    assert_eq!(cancel.appointment, created);
    assert!(cancel.actor.is_none());
    assert!(cancel.actor_role.is_none());
}

#[tokio::test]
async fn test_double_booking_is_permitted() {
    let h = Harness::new(&[ids::MEMBER_ID]);
    for _ in 0..2 {
        h.booking
            .create(
                &SessionContext::anonymous(),
                h.booking_request().team_member(ids::MEMBER_ID).build(),
            )
            .await
            .unwrap();
    }

    let booked = h.booking.list_booked_for_owner(&owner()).await.unwrap();
    assert_eq!(booked.len(), 2);
}

#[tokio::test]
async fn test_other_owner_cannot_reach_appointment() {
    let h = Harness::new(&[]);
    h.store.seed_business(BusinessFixtures::other_business());
    let created = h
        .booking
        .create(&SessionContext::anonymous(), h.booking_request().build())
        .await
        .unwrap()
        .record;

    let err = h.booking.cancel(&other_owner(), created.id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    assert_eq!(h.store.appointments().len(), 1);
    assert_eq!(h.notifications.sent().len(), 1);
}

#[tokio::test]
async fn test_listing_without_business_is_not_found() {
    let h = Harness::new(&[]);
    let err = h
        .booking
        .list_booked_for_owner(&other_owner())
        .await
        .unwrap_err();

    match err {
        AppError::NotFound(msg) => assert_eq!(msg, "No businesses found for the user."),
        other => panic!("unexpected error: {:?}", other),
    }
}
