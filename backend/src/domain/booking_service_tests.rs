//! Tests for the booking lifecycle engine.

use std::sync::Arc;

use chrono::Duration;
use rstest::rstest;
use rust_decimal_macros::dec;

use super::*;
use crate::domain::ports::{
    MockAvailabilityCache, MockBookingRepository, MockEventRecorder, MockUnitRepository,
};
use crate::domain::{AccommodationType, ErrorCode, Unit, UnitSnapshot};
use crate::test_support::{MutableClock, fixed_instant};

type Service =
    BookingLifecycleService<MockBookingRepository, MockUnitRepository, MockEventRecorder, MockAvailabilityCache>;

struct Mocks {
    booking_repo: MockBookingRepository,
    unit_repo: MockUnitRepository,
    event_recorder: MockEventRecorder,
    availability_cache: MockAvailabilityCache,
}

impl Mocks {
    fn new() -> Self {
        Self {
            booking_repo: MockBookingRepository::new(),
            unit_repo: MockUnitRepository::new(),
            event_recorder: MockEventRecorder::new(),
            availability_cache: MockAvailabilityCache::new(),
        }
    }

    /// Audit writes and cache invalidations are best-effort side channels;
    /// most tests just let them succeed.
    fn with_quiet_side_channels(mut self) -> Self {
        self.event_recorder.expect_record().returning(|_| Ok(()));
        self.availability_cache
            .expect_invalidate()
            .returning(|| Ok(()));
        self
    }

    fn into_service(self, clock: Arc<MutableClock>, policy: BookingPolicy) -> Service {
        BookingLifecycleService::new(
            Arc::new(self.booking_repo),
            Arc::new(self.unit_repo),
            Arc::new(self.event_recorder),
            Arc::new(self.availability_cache),
            clock,
            policy,
        )
    }
}

fn available_unit(unit_id: Uuid) -> Unit {
    let now = fixed_instant();
    Unit::new(UnitSnapshot {
        id: unit_id,
        number_of_rooms: 2,
        accommodation_type: AccommodationType::Apartments,
        floor: 3,
        base_price: dec!(100.00),
        total_price: dec!(115.00),
        description: "Two-room apartment".to_owned(),
        available: true,
        created_at: now,
        updated_at: now,
    })
    .unwrap_or_else(|err| panic!("fixture unit is valid: {err}"))
}

fn unavailable_unit(unit_id: Uuid) -> Unit {
    let now = fixed_instant();
    Unit::new(UnitSnapshot {
        id: unit_id,
        number_of_rooms: 2,
        accommodation_type: AccommodationType::Flat,
        floor: 1,
        base_price: dec!(80.00),
        total_price: dec!(92.00),
        description: "Held flat".to_owned(),
        available: false,
        created_at: now,
        updated_at: now,
    })
    .unwrap_or_else(|err| panic!("fixture unit is valid: {err}"))
}

fn stored_booking(status: BookingStatus, user_id: Uuid) -> Booking {
    let now = fixed_instant();
    Booking::new(BookingSnapshot {
        id: Uuid::new_v4(),
        unit_id: Uuid::new_v4(),
        user_id,
        check_in: now + Duration::days(1),
        check_out: now + Duration::days(3),
        total_price: dec!(115.00),
        status,
        payment_deadline: now + Duration::minutes(15),
        created_at: now,
        updated_at: now,
    })
    .unwrap_or_else(|err| panic!("fixture booking is valid: {err}"))
}

fn create_request(unit_id: Uuid, user_id: Uuid) -> CreateBookingRequest {
    let now = fixed_instant();
    CreateBookingRequest {
        unit_id,
        user_id,
        check_in_date: now + Duration::days(1),
        check_out_date: now + Duration::days(3),
    }
}

#[rstest]
#[tokio::test]
async fn create_booking_quotes_price_and_deadline_exactly() {
    let unit_id = Uuid::new_v4();
    let user_id = Uuid::new_v4();
    let now = fixed_instant();
    let expected_deadline = now + Duration::minutes(15);

    let mut mocks = Mocks::new().with_quiet_side_channels();
    mocks
        .unit_repo
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(available_unit(unit_id))));
    mocks
        .booking_repo
        .expect_find_overlapping()
        .return_once(|_, _, _, _| Ok(Vec::new()));
    mocks
        .booking_repo
        .expect_create_pending()
        .times(1)
        .withf(move |booking| {
            booking.total_price() == dec!(115.00)
                && booking.payment_deadline() == expected_deadline
                && booking.status() == BookingStatus::PendingPayment
        })
        .return_once(|_| Ok(()));

    let service = mocks.into_service(Arc::new(MutableClock::new(now)), BookingPolicy::default());
    let payload = service
        .create_booking(create_request(unit_id, user_id))
        .await
        .expect("create succeeds");

    assert_eq!(payload.total_price, dec!(115.00));
    assert_eq!(payload.payment_deadline, expected_deadline);
    assert_eq!(payload.status, BookingStatus::PendingPayment);
    assert_eq!(payload.unit_id, unit_id);
    assert_eq!(payload.user_id, user_id);
}

#[rstest]
#[tokio::test]
async fn create_booking_for_missing_unit_is_not_found() {
    let mut mocks = Mocks::new();
    mocks.unit_repo.expect_find_by_id().return_once(|_| Ok(None));
    mocks.booking_repo.expect_create_pending().times(0);

    let service = mocks.into_service(
        Arc::new(MutableClock::new(fixed_instant())),
        BookingPolicy::default(),
    );
    let error = service
        .create_booking(create_request(Uuid::new_v4(), Uuid::new_v4()))
        .await
        .expect_err("unknown unit");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn create_booking_for_held_unit_is_conflict() {
    let unit_id = Uuid::new_v4();
    let mut mocks = Mocks::new();
    mocks
        .unit_repo
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(unavailable_unit(unit_id))));
    mocks.booking_repo.expect_create_pending().times(0);

    let service = mocks.into_service(
        Arc::new(MutableClock::new(fixed_instant())),
        BookingPolicy::default(),
    );
    let error = service
        .create_booking(create_request(unit_id, Uuid::new_v4()))
        .await
        .expect_err("held unit");

    assert_eq!(error.code(), ErrorCode::Conflict);
}

#[rstest]
#[case::check_in_in_the_past(-1, 2)]
#[case::check_out_before_check_in(2, 1)]
#[case::zero_length_stay(2, 2)]
#[tokio::test]
async fn create_booking_with_bad_dates_writes_nothing(
    #[case] check_in_days: i64,
    #[case] check_out_days: i64,
) {
    let unit_id = Uuid::new_v4();
    let now = fixed_instant();

    let mut mocks = Mocks::new();
    mocks
        .unit_repo
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(available_unit(unit_id))));
    mocks.booking_repo.expect_find_overlapping().times(0);
    mocks.booking_repo.expect_create_pending().times(0);

    let service = mocks.into_service(Arc::new(MutableClock::new(now)), BookingPolicy::default());
    let error = service
        .create_booking(CreateBookingRequest {
            unit_id,
            user_id: Uuid::new_v4(),
            check_in_date: now + Duration::days(check_in_days),
            check_out_date: now + Duration::days(check_out_days),
        })
        .await
        .expect_err("bad dates");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[tokio::test]
async fn create_booking_rejects_overlapping_window() {
    let unit_id = Uuid::new_v4();
    let user_id = Uuid::new_v4();

    let mut mocks = Mocks::new();
    mocks
        .unit_repo
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(available_unit(unit_id))));
    mocks
        .booking_repo
        .expect_find_overlapping()
        .return_once(move |_, _, _, _| Ok(vec![stored_booking(BookingStatus::Confirmed, user_id)]));
    mocks.booking_repo.expect_create_pending().times(0);

    let service = mocks.into_service(
        Arc::new(MutableClock::new(fixed_instant())),
        BookingPolicy::default(),
    );
    let error = service
        .create_booking(create_request(unit_id, user_id))
        .await
        .expect_err("overlap");

    assert_eq!(error.code(), ErrorCode::Conflict);
}

#[rstest]
#[tokio::test]
async fn create_booking_losing_the_race_is_conflict() {
    let unit_id = Uuid::new_v4();

    let mut mocks = Mocks::new();
    mocks
        .unit_repo
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(available_unit(unit_id))));
    mocks
        .booking_repo
        .expect_find_overlapping()
        .return_once(|_, _, _, _| Ok(Vec::new()));
    // A concurrent creator won the transactional guard first.
    mocks
        .booking_repo
        .expect_create_pending()
        .return_once(move |_| Err(BookingRepositoryError::unit_unavailable(unit_id)));

    let service = mocks.into_service(
        Arc::new(MutableClock::new(fixed_instant())),
        BookingPolicy::default(),
    );
    let error = service
        .create_booking(create_request(unit_id, Uuid::new_v4()))
        .await
        .expect_err("lost the race");

    assert_eq!(error.code(), ErrorCode::Conflict);
}

#[rstest]
#[tokio::test]
async fn create_booking_survives_audit_write_failure() {
    let unit_id = Uuid::new_v4();

    let mut mocks = Mocks::new();
    mocks
        .unit_repo
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(available_unit(unit_id))));
    mocks
        .booking_repo
        .expect_find_overlapping()
        .return_once(|_, _, _, _| Ok(Vec::new()));
    mocks
        .booking_repo
        .expect_create_pending()
        .return_once(|_| Ok(()));
    mocks
        .availability_cache
        .expect_invalidate()
        .returning(|| Ok(()));
    mocks
        .event_recorder
        .expect_record()
        .return_once(|_| Err(crate::domain::ports::EventRecorderError::write("sink down")));

    let service = mocks.into_service(
        Arc::new(MutableClock::new(fixed_instant())),
        BookingPolicy::default(),
    );
    service
        .create_booking(create_request(unit_id, Uuid::new_v4()))
        .await
        .expect("audit failure must not fail the transition");
}

#[rstest]
#[tokio::test]
async fn confirm_booking_keeps_the_unit_held() {
    let user_id = Uuid::new_v4();
    let booking = stored_booking(BookingStatus::PendingPayment, user_id);
    let booking_id = booking.id();

    let mut mocks = Mocks::new();
    mocks
        .booking_repo
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(booking)));
    mocks
        .booking_repo
        .expect_save()
        .times(1)
        .withf(|booking| booking.status() == BookingStatus::Confirmed)
        .return_once(|_| Ok(()));
    mocks.booking_repo.expect_save_releasing_unit().times(0);
    mocks.event_recorder.expect_record().returning(|_| Ok(()));
    // No cache expectation: confirming must not touch availability.

    let service = mocks.into_service(
        Arc::new(MutableClock::new(fixed_instant())),
        BookingPolicy::default(),
    );
    let payload = service
        .confirm_booking(ConfirmBookingRequest {
            booking_id,
            user_id,
        })
        .await
        .expect("confirm succeeds");

    assert_eq!(payload.status, BookingStatus::Confirmed);
}

#[rstest]
#[tokio::test]
async fn confirm_booking_by_stranger_is_forbidden() {
    let owner = Uuid::new_v4();
    let booking = stored_booking(BookingStatus::PendingPayment, owner);
    let booking_id = booking.id();

    let mut mocks = Mocks::new();
    mocks
        .booking_repo
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(booking)));
    mocks.booking_repo.expect_save().times(0);

    let service = mocks.into_service(
        Arc::new(MutableClock::new(fixed_instant())),
        BookingPolicy::default(),
    );
    let error = service
        .confirm_booking(ConfirmBookingRequest {
            booking_id,
            user_id: Uuid::new_v4(),
        })
        .await
        .expect_err("not the owner");

    assert_eq!(error.code(), ErrorCode::Forbidden);
}

#[rstest]
#[case(BookingStatus::Cancelled)]
#[case(BookingStatus::Completed)]
#[case(BookingStatus::Confirmed)]
#[tokio::test]
async fn confirm_booking_outside_pending_is_invalid_state(#[case] status: BookingStatus) {
    let user_id = Uuid::new_v4();
    let booking = stored_booking(status, user_id);
    let booking_id = booking.id();

    let mut mocks = Mocks::new();
    mocks
        .booking_repo
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(booking)));
    mocks.booking_repo.expect_save().times(0);

    let service = mocks.into_service(
        Arc::new(MutableClock::new(fixed_instant())),
        BookingPolicy::default(),
    );
    let error = service
        .confirm_booking(ConfirmBookingRequest {
            booking_id,
            user_id,
        })
        .await
        .expect_err("wrong status");

    assert_eq!(error.code(), ErrorCode::InvalidState);
}

#[rstest]
#[case(BookingStatus::PendingPayment)]
#[case(BookingStatus::Confirmed)]
#[tokio::test]
async fn cancel_booking_releases_the_unit(#[case] status: BookingStatus) {
    let user_id = Uuid::new_v4();
    let booking = stored_booking(status, user_id);
    let booking_id = booking.id();

    let mut mocks = Mocks::new().with_quiet_side_channels();
    mocks
        .booking_repo
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(booking)));
    mocks
        .booking_repo
        .expect_save_releasing_unit()
        .times(1)
        .withf(|booking| booking.status() == BookingStatus::Cancelled)
        .return_once(|_| Ok(()));

    let service = mocks.into_service(
        Arc::new(MutableClock::new(fixed_instant())),
        BookingPolicy::default(),
    );
    let payload = service
        .cancel_booking(CancelBookingRequest {
            booking_id,
            user_id,
        })
        .await
        .expect("cancel succeeds");

    assert_eq!(payload.status, BookingStatus::Cancelled);
}

#[rstest]
#[tokio::test]
async fn repeated_cancel_is_invalid_state_and_does_not_touch_the_unit() {
    let user_id = Uuid::new_v4();
    let booking = stored_booking(BookingStatus::Cancelled, user_id);
    let booking_id = booking.id();

    let mut mocks = Mocks::new();
    mocks
        .booking_repo
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(booking)));
    mocks.booking_repo.expect_save_releasing_unit().times(0);

    let service = mocks.into_service(
        Arc::new(MutableClock::new(fixed_instant())),
        BookingPolicy::default(),
    );
    let error = service
        .cancel_booking(CancelBookingRequest {
            booking_id,
            user_id,
        })
        .await
        .expect_err("second cancel");

    assert_eq!(error.code(), ErrorCode::InvalidState);
}

#[rstest]
#[tokio::test]
async fn cancel_booking_survives_cache_invalidation_failure() {
    let user_id = Uuid::new_v4();
    let booking = stored_booking(BookingStatus::PendingPayment, user_id);
    let booking_id = booking.id();

    let mut mocks = Mocks::new();
    mocks
        .booking_repo
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(booking)));
    mocks
        .booking_repo
        .expect_save_releasing_unit()
        .return_once(|_| Ok(()));
    mocks.availability_cache.expect_invalidate().returning(|| {
        Err(crate::domain::ports::AvailabilityCacheError::connection(
            "redis down",
        ))
    });
    mocks.event_recorder.expect_record().returning(|_| Ok(()));

    let service = mocks.into_service(
        Arc::new(MutableClock::new(fixed_instant())),
        BookingPolicy::default(),
    );
    service
        .cancel_booking(CancelBookingRequest {
            booking_id,
            user_id,
        })
        .await
        .expect("cache failure must not fail the transition");
}

#[rstest]
#[tokio::test]
async fn expiry_sweep_cancels_and_attributes_events_to_owners() {
    let owner = Uuid::new_v4();
    let first = stored_booking(BookingStatus::PendingPayment, owner);
    let second = stored_booking(BookingStatus::PendingPayment, owner);

    let mut mocks = Mocks::new();
    mocks
        .booking_repo
        .expect_find_by_status_and_deadline_before()
        .withf(|status, _| *status == BookingStatus::PendingPayment)
        .return_once(move |_, _| Ok(vec![first, second]));
    mocks
        .booking_repo
        .expect_save_releasing_unit()
        .times(2)
        .returning(|_| Ok(()));
    mocks.availability_cache.expect_invalidate().returning(|| Ok(()));
    mocks
        .event_recorder
        .expect_record()
        .times(2)
        .withf(move |event| {
            event.event_type == EventType::BookingExpired && event.user_id == owner
        })
        .returning(|_| Ok(()));

    let service = mocks.into_service(
        Arc::new(MutableClock::new(fixed_instant())),
        BookingPolicy::default(),
    );
    let outcome = service
        .process_expired_bookings()
        .await
        .expect("sweep succeeds");

    assert_eq!(outcome.selected, 2);
    assert_eq!(outcome.transitioned, 2);
    assert_eq!(outcome.failed, 0);
}

#[rstest]
#[tokio::test]
async fn expiry_sweep_with_nothing_selected_is_a_noop() {
    let mut mocks = Mocks::new();
    mocks
        .booking_repo
        .expect_find_by_status_and_deadline_before()
        .return_once(|_, _| Ok(Vec::new()));
    mocks.booking_repo.expect_save_releasing_unit().times(0);

    let service = mocks.into_service(
        Arc::new(MutableClock::new(fixed_instant())),
        BookingPolicy::default(),
    );
    let outcome = service
        .process_expired_bookings()
        .await
        .expect("sweep succeeds");

    assert!(outcome.is_noop());
    assert_eq!(outcome.transitioned, 0);
}

#[rstest]
#[tokio::test]
async fn expiry_sweep_continues_past_a_failing_item() {
    let owner = Uuid::new_v4();
    let first = stored_booking(BookingStatus::PendingPayment, owner);
    let second = stored_booking(BookingStatus::PendingPayment, owner);

    let mut mocks = Mocks::new().with_quiet_side_channels();
    mocks
        .booking_repo
        .expect_find_by_status_and_deadline_before()
        .return_once(move |_, _| Ok(vec![first, second]));
    let mut calls = 0_u32;
    mocks
        .booking_repo
        .expect_save_releasing_unit()
        .times(2)
        .returning_st(move |_| {
            calls += 1;
            if calls == 1 {
                Err(BookingRepositoryError::query("deadlock"))
            } else {
                Ok(())
            }
        });

    let service = mocks.into_service(
        Arc::new(MutableClock::new(fixed_instant())),
        BookingPolicy::default(),
    );
    let outcome = service
        .process_expired_bookings()
        .await
        .expect("sweep completes despite one failure");

    assert_eq!(outcome.selected, 2);
    assert_eq!(outcome.transitioned, 1);
    assert_eq!(outcome.failed, 1);
}

#[rstest]
#[tokio::test]
async fn completion_sweep_completes_confirmed_stays() {
    let owner = Uuid::new_v4();
    let booking = stored_booking(BookingStatus::Confirmed, owner);

    let mut mocks = Mocks::new();
    mocks
        .booking_repo
        .expect_find_by_status_and_checkout_before()
        .withf(|status, _| *status == BookingStatus::Confirmed)
        .return_once(move |_, _| Ok(vec![booking]));
    mocks
        .booking_repo
        .expect_save_releasing_unit()
        .times(1)
        .withf(|booking| booking.status() == BookingStatus::Completed)
        .return_once(|_| Ok(()));
    mocks.availability_cache.expect_invalidate().returning(|| Ok(()));
    mocks
        .event_recorder
        .expect_record()
        .times(1)
        .withf(|event| event.event_type == EventType::BookingCompleted)
        .returning(|_| Ok(()));

    let service = mocks.into_service(
        Arc::new(MutableClock::new(fixed_instant())),
        BookingPolicy::default(),
    );
    let outcome = service
        .process_completed_bookings()
        .await
        .expect("sweep succeeds");

    assert_eq!(outcome.transitioned, 1);
}

#[rstest]
#[tokio::test]
async fn get_booking_missing_is_not_found() {
    let mut mocks = Mocks::new();
    mocks
        .booking_repo
        .expect_find_by_id()
        .return_once(|_| Ok(None));

    let service = mocks.into_service(
        Arc::new(MutableClock::new(fixed_instant())),
        BookingPolicy::default(),
    );
    let error = service
        .get_booking(Uuid::new_v4())
        .await
        .expect_err("missing booking");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn list_user_bookings_maps_the_page() {
    let user_id = Uuid::new_v4();
    let booking = stored_booking(BookingStatus::PendingPayment, user_id);
    let booking_id = booking.id();

    let mut mocks = Mocks::new();
    mocks
        .booking_repo
        .expect_find_by_user()
        .return_once(move |_, page| Ok(pagination::Page::new(vec![booking], page, 1)));

    let service = mocks.into_service(
        Arc::new(MutableClock::new(fixed_instant())),
        BookingPolicy::default(),
    );
    let page = service
        .list_user_bookings(ListUserBookingsRequest {
            user_id,
            page: pagination::PageRequest::first(),
        })
        .await
        .expect("list succeeds");

    assert_eq!(page.content.len(), 1);
    assert_eq!(page.content[0].id, booking_id);
    assert_eq!(page.total_elements, 1);
}
