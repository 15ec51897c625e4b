//! Behaviour of the trip aggregate and its embedded packing list.

use chrono::{Duration, TimeZone};
use rstest::{fixture, rstest};

use super::*;

fn at(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, day, 0, 0, 0)
        .single()
        .expect("valid timestamp")
}

#[fixture]
fn draft() -> TripDraft {
    TripDraft {
        id: TripId::random(),
        owner: UserId::random(),
        title: "  Peru  ".to_owned(),
        destination: "Lima".to_owned(),
        start_date: at(1),
        end_date: at(10),
        items: vec![ItemDraft::named("Passport")],
        created_at: at(1),
        updated_at: at(1),
    }
}

#[fixture]
fn trip(draft: TripDraft) -> Trip {
    Trip::new(draft).expect("valid trip")
}

#[rstest]
fn new_trims_text_and_defaults_items(trip: Trip) {
    assert_eq!(trip.title(), "Peru");
    let item = trip.items().iter().next().expect("one item");
    assert_eq!(item.name(), "Passport");
    assert_eq!(item.quantity(), DEFAULT_ITEM_QUANTITY);
    assert!(!item.packed());
}

#[rstest]
fn same_day_trips_are_valid(mut draft: TripDraft) {
    draft.end_date = draft.start_date;
    assert!(Trip::new(draft).is_ok());
}

#[rstest]
#[case::blank_title(|d: &mut TripDraft| d.title = "   ".into(), "title")]
#[case::blank_destination(|d: &mut TripDraft| d.destination = String::new(), "destination")]
#[case::end_before_start(|d: &mut TripDraft| d.end_date = d.start_date - Duration::days(1), "endDate")]
#[case::blank_item(|d: &mut TripDraft| d.items = vec![ItemDraft::named(" ")], "name")]
#[case::zero_quantity(
    |d: &mut TripDraft| d.items = vec![ItemDraft { quantity: Some(0), ..ItemDraft::named("Socks") }],
    "quantity"
)]
fn new_rejects_invalid_drafts(
    mut draft: TripDraft,
    #[case] mutate: fn(&mut TripDraft),
    #[case] field: &str,
) {
    mutate(&mut draft);
    let err = Trip::new(draft).expect_err("invalid draft");
    assert_eq!(err.field(), field);
}

#[rstest]
fn new_rejects_repeated_item_ids(mut draft: TripDraft) {
    let id = ItemId::random();
    draft.items = vec![
        ItemDraft {
            id: Some(id),
            ..ItemDraft::named("Hat")
        },
        ItemDraft {
            id: Some(id),
            ..ItemDraft::named("Scarf")
        },
    ];
    assert_eq!(
        Trip::new(draft).expect_err("duplicate ids"),
        TripValidationError::DuplicateItemId { id }
    );
}

#[rstest]
fn apply_patch_updates_only_present_fields(mut trip: Trip) {
    let original_destination = trip.destination().to_owned();
    trip.apply_patch(
        TripPatch {
            title: Some("Peru & Bolivia".into()),
            ..TripPatch::default()
        },
        at(2),
    )
    .expect("patch applies");

    assert_eq!(trip.title(), "Peru & Bolivia");
    assert_eq!(trip.destination(), original_destination);
    assert_eq!(trip.updated_at(), at(2));
    assert_eq!(trip.created_at(), at(1));
}

#[rstest]
fn apply_patch_checks_merged_dates(mut trip: Trip) {
    let before = trip.clone();
    let err = trip
        .apply_patch(
            TripPatch {
                title: Some("Later".into()),
                start_date: Some(at(20)),
                ..TripPatch::default()
            },
            at(2),
        )
        .expect_err("start after existing end");

    assert!(matches!(err, TripValidationError::EndBeforeStart { .. }));
    assert_eq!(trip, before);
}

#[rstest]
fn apply_patch_replaces_whole_item_list(mut trip: Trip) {
    trip.apply_patch(
        TripPatch {
            items: Some(vec![ItemDraft::named("Tent"), ItemDraft::named("Stove")]),
            ..TripPatch::default()
        },
        at(3),
    )
    .expect("items replaced");

    let names: Vec<_> = trip.items().iter().map(Item::name).collect();
    assert_eq!(names, vec!["Tent", "Stove"]);
}

#[rstest]
fn add_item_assigns_fresh_id_and_bumps_timestamp(mut trip: Trip) {
    let existing = trip.items().iter().next().expect("item").id();
    let added = trip
        .add_item(
            ItemDraft {
                quantity: Some(3),
                ..ItemDraft::named("Socks")
            },
            at(4),
        )
        .expect("item added")
        .clone();

    assert_ne!(added.id(), existing);
    assert_eq!(added.quantity(), 3);
    assert_eq!(trip.items().len(), 2);
    assert_eq!(trip.updated_at(), at(4));
}

#[rstest]
fn add_item_rejects_negative_quantity(mut trip: Trip) {
    let err = trip
        .add_item(
            ItemDraft {
                quantity: Some(-2),
                ..ItemDraft::named("Socks")
            },
            at(4),
        )
        .expect_err("negative quantity");
    assert_eq!(err, TripValidationError::InvalidQuantity { value: -2 });
    assert_eq!(trip.items().len(), 1);
    assert_eq!(trip.updated_at(), at(1));
}

#[rstest]
fn update_item_is_atomic(mut trip: Trip) {
    let id = trip.items().iter().next().expect("item").id();
    let err = trip
        .update_item(
            id,
            ItemPatch {
                name: Some("Renamed".into()),
                quantity: Some(0),
                packed: Some(true),
            },
            at(5),
        )
        .expect_err("zero quantity");

    assert!(matches!(err, ItemMutationError::Invalid(_)));
    let item = trip.items().get(id).expect("item kept");
    assert_eq!(item.name(), "Passport");
    assert!(!item.packed());
}

#[rstest]
fn update_item_reports_missing_ids(mut trip: Trip) {
    let missing = ItemId::random();
    assert_eq!(
        trip.update_item(missing, ItemPatch::default(), at(5))
            .expect_err("missing item"),
        ItemMutationError::NotFound { item_id: missing }
    );
}

#[rstest]
fn toggle_packed_flips_each_call(mut trip: Trip) {
    let id = trip.items().iter().next().expect("item").id();
    assert!(trip.toggle_packed(id, at(6)).expect("toggle").packed());
    assert!(!trip.toggle_packed(id, at(7)).expect("toggle").packed());
    assert_eq!(trip.updated_at(), at(7));
}

#[rstest]
fn remove_item_keeps_remaining_lookups_valid(mut trip: Trip) {
    let first = trip.items().iter().next().expect("item").id();
    let second = trip
        .add_item(ItemDraft::named("Camera"), at(2))
        .expect("added")
        .id();
    let third = trip
        .add_item(ItemDraft::named("Charger"), at(2))
        .expect("added")
        .id();

    assert!(trip.remove_item(first, at(3)));
    assert!(!trip.remove_item(first, at(4)));
    assert_eq!(trip.updated_at(), at(3));
    assert_eq!(trip.items().get(second).expect("second").name(), "Camera");
    assert_eq!(trip.items().get(third).expect("third").name(), "Charger");
}

#[rstest]
fn ownership_is_checked_against_owner(trip: Trip) {
    let owner = trip.owner().clone();
    assert!(trip.is_owned_by(&owner));
    assert!(!trip.is_owned_by(&UserId::random()));
}
