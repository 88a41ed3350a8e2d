//! Integration tests for the paged list controller.
//!
//! Drives `ListController` against an in-memory booking collection and checks
//! paging bounds, filter resets, stale-response handling and deletes.

mod common;

use common::{booking, bookings, FakeBookings};
use frontdesk::models::{BookingStatus, Record};
use frontdesk::state::{
    BookingFilter, BookingFilterPatch, Filter, ListController, ListSource, NoticeLevel, Sort,
    SortOrder, StatusFilter,
};

fn controller(fake: &FakeBookings, limit: u32) -> ListController<FakeBookings> {
    ListController::new(fake.clone(), limit)
}

fn status_patch(status: BookingStatus) -> BookingFilterPatch {
    BookingFilterPatch {
        status: Some(StatusFilter::Only(status)),
        ..Default::default()
    }
}

// ============================================================================
// PAGING
// ============================================================================

#[tokio::test]
async fn page_is_clamped_to_known_bounds() {
    // Given: 20 bookings at 8 per page
    let fake = FakeBookings::with(bookings(20));
    let mut list = controller(&fake, 8);
    assert!(list.refresh().await);
    assert_eq!(list.total_pages(), 3);
    assert_eq!(list.total_items(), 20);

    // When: asking past the end
    assert_eq!(list.set_page(10), 3);
    assert!(list.is_stale());
    list.refresh().await;

    // Then: the last page is shown
    assert_eq!(list.page(), 3);
    assert_eq!(list.items().len(), 4);

    assert_eq!(list.set_page(0), 1);
    assert_eq!(list.prev_page(), 1);
}

#[tokio::test]
async fn setting_the_current_page_does_not_refetch() {
    let fake = FakeBookings::with(bookings(3));
    let mut list = controller(&fake, 8);
    list.refresh().await;

    assert_eq!(list.set_page(1), 1);
    assert!(!list.is_stale());
}

#[tokio::test]
async fn empty_collection_still_has_one_page() {
    let fake = FakeBookings::with(Vec::new());
    let mut list = controller(&fake, 8);
    list.refresh().await;

    assert!(list.items().is_empty());
    assert_eq!(list.total_pages(), 1);
    assert_eq!(list.next_page(), 1);
}

#[tokio::test]
async fn first_query_uses_default_sort() {
    let fake = FakeBookings::with(bookings(1));
    let mut list = controller(&fake, 8);
    list.refresh().await;

    let sent = &fake.queries()[0];
    assert_eq!(sent.page, 1);
    assert_eq!(sent.limit, 8);
    assert_eq!(sent.sort, Some(Sort::new("date", SortOrder::Desc)));
}

// ============================================================================
// FILTERS
// ============================================================================

#[tokio::test]
async fn filter_change_returns_to_first_page() {
    // Given: viewing page 2
    let mut data = bookings(12);
    data.push(booking("c1", "Confirmed Carl", BookingStatus::Confirmed));
    let fake = FakeBookings::with(data);
    let mut list = controller(&fake, 8);
    list.refresh().await;
    list.next_page();
    list.refresh().await;
    assert_eq!(list.page(), 2);

    // When: narrowing by status
    list.set_filter(status_patch(BookingStatus::Confirmed));

    // Then: back on page 1 with the new filter sent
    assert_eq!(list.page(), 1);
    assert!(list.is_stale());
    list.refresh().await;

    let sent = fake.queries().last().cloned().unwrap();
    assert_eq!(sent.page, 1);
    assert_eq!(sent.filter.status, StatusFilter::Only(BookingStatus::Confirmed));
    assert_eq!(list.items().len(), 1);
    assert_eq!(list.items()[0].id(), "c1");
}

#[tokio::test]
async fn sort_and_limit_changes_return_to_first_page() {
    let fake = FakeBookings::with(bookings(20));
    let mut list = controller(&fake, 8);
    list.refresh().await;
    list.set_page(3);

    list.set_sort(Sort::new("price", SortOrder::Asc));
    assert_eq!(list.page(), 1);

    list.set_page(2);
    list.set_limit(5);
    assert_eq!(list.page(), 1);
    assert_eq!(list.limit(), 5);
}

#[tokio::test]
async fn filter_patch_keeps_untouched_fields() {
    let fake = FakeBookings::with(bookings(2));
    let mut list = controller(&fake, 8);

    list.set_filter(status_patch(BookingStatus::Completed));
    list.set_filter(BookingFilterPatch {
        query: Some("jane".to_string()),
        ..Default::default()
    });

    assert_eq!(
        list.filter().status,
        StatusFilter::Only(BookingStatus::Completed)
    );
    assert_eq!(list.filter().query, "jane");
}

#[tokio::test]
async fn clear_filters_restores_defaults() {
    let fake = FakeBookings::with(bookings(20));
    let mut list = controller(&fake, 8);
    list.set_filter(status_patch(BookingStatus::Cancelled));
    list.set_sort(Sort::new("price", SortOrder::Asc));
    list.set_limit(3);

    list.clear_filters();

    assert_eq!(list.filter(), &BookingFilter::default());
    assert_eq!(list.query().sort, Some(Sort::new("date", SortOrder::Desc)));
    assert_eq!(list.limit(), 8);
    assert_eq!(list.page(), 1);
    assert!(list.is_stale());
}

#[tokio::test]
async fn empty_message_mentions_active_filters() {
    let fake = FakeBookings::with(bookings(2));
    let mut list = controller(&fake, 8);
    assert!(!list.filter().is_active());
    assert_eq!(list.empty_message(), "No bookings found");

    list.set_filter(status_patch(BookingStatus::Cancelled));
    list.refresh().await;

    assert!(list.items().is_empty());
    assert!(list.filter().is_active());
    assert_eq!(list.empty_message(), "No bookings match the current filters");
}

// ============================================================================
// CONCURRENT FETCHES
// ============================================================================

#[tokio::test]
async fn superseded_response_is_discarded() {
    let mut data = bookings(3);
    data.push(booking("c1", "Confirmed Carl", BookingStatus::Confirmed));
    let fake = FakeBookings::with(data);
    let mut list = controller(&fake, 8);

    // Given: two fetches in flight, the second for a narrower filter
    let first = list.begin_fetch();
    list.set_filter(status_patch(BookingStatus::Confirmed));
    let second = list.begin_fetch();
    assert!(second.seq() > first.seq());

    let first_result = list.source().fetch_page(first.query()).await;
    let second_result = list.source().fetch_page(second.query()).await;

    // When: the newer response lands first, then the older one
    assert!(list.apply(second, second_result));
    assert!(!list.apply(first, first_result));

    // Then: only the newer response is shown
    assert_eq!(list.items().len(), 1);
    assert_eq!(list.items()[0].id(), "c1");
    assert!(!list.is_loading());
}

#[tokio::test]
async fn response_for_an_outdated_query_leaves_list_stale() {
    let fake = FakeBookings::with(bookings(20));
    let mut list = controller(&fake, 8);
    list.refresh().await;

    let ticket = list.begin_fetch();
    let result = list.source().fetch_page(ticket.query()).await;
    // Query changes while the fetch is out, without a new fetch being issued
    list.set_page(2);

    assert!(list.apply(ticket, result));
    assert!(list.is_stale());
}

// ============================================================================
// FAILURES
// ============================================================================

#[tokio::test]
async fn failed_fetch_keeps_items_and_raises_error() {
    // Given: a loaded list
    let fake = FakeBookings::with(bookings(5));
    let mut list = controller(&fake, 8);
    list.refresh().await;
    let before = list.items().to_vec();

    // When: the next fetch fails
    fake.fail_fetches(1);
    list.set_filter(BookingFilterPatch {
        query: Some("Customer".to_string()),
        ..Default::default()
    });
    list.refresh().await;

    // Then: the old items stay and one error notice is raised
    assert_eq!(list.items(), before.as_slice());
    let notice = list.notices_mut().take().expect("error notice");
    assert_eq!(notice.level, NoticeLevel::Error);
    assert_eq!(notice.message, "Failed to load bookings");
    assert!(list.notices().current().is_none());

    // No automatic retry
    assert!(!list.is_stale());
    assert!(!list.is_loading());
}

#[tokio::test]
async fn failed_fetch_for_outdated_query_keeps_list_stale() {
    // Given: a fetch in flight, then a filter change before it answers
    let fake = FakeBookings::with(bookings(5));
    let mut list = controller(&fake, 8);
    let ticket = list.begin_fetch();
    list.set_filter(status_patch(BookingStatus::Confirmed));

    // When: the old fetch fails
    assert!(list.apply(ticket, Err(common::server_error(500))));

    // Then: the new filter still has to be fetched
    assert!(list.is_stale());
    assert!(!list.is_loading());
    assert_eq!(
        list.notices().current().map(|n| n.level),
        Some(NoticeLevel::Error)
    );
}

// ============================================================================
// DELETE
// ============================================================================

#[tokio::test]
async fn delete_removes_item_and_refreshes() {
    let fake = FakeBookings::with(bookings(3));
    let mut list = controller(&fake, 8);
    list.refresh().await;

    list.delete("b2").await.expect("delete succeeds");

    assert_eq!(fake.deleted(), vec!["b2".to_string()]);
    assert!(list.items().iter().all(|b| b.id() != "b2"));
    assert_eq!(list.total_items(), 2);
    let notice = list.notices().current().unwrap();
    assert_eq!(notice.level, NoticeLevel::Success);
    assert_eq!(notice.message, "Deleted successfully");
}

#[tokio::test]
async fn failed_delete_keeps_list_unchanged() {
    let fake = FakeBookings::with(bookings(3));
    let mut list = controller(&fake, 8);
    list.refresh().await;
    fake.fail_deletes(500, None);

    assert!(list.delete("b1").await.is_err());

    assert_eq!(list.items().len(), 3);
    assert_eq!(list.total_items(), 3);
    let notice = list.notices().current().unwrap();
    assert_eq!(notice.level, NoticeLevel::Error);
    assert_eq!(notice.message, "Failed to delete from bookings");
}

#[tokio::test]
async fn failed_delete_shows_server_message() {
    let fake = FakeBookings::with(bookings(1));
    let mut list = controller(&fake, 8);
    list.refresh().await;
    fake.fail_deletes(403, Some("Not allowed"));

    assert!(list.delete("b1").await.is_err());
    assert_eq!(list.notices().current().unwrap().message, "Not allowed");
}

#[tokio::test]
async fn delete_with_failed_refresh_keeps_local_removal() {
    let fake = FakeBookings::with(bookings(3));
    let mut list = controller(&fake, 8);
    list.refresh().await;
    fake.fail_fetches(1);

    list.delete("b1").await.expect("delete succeeds");

    assert_eq!(list.items().len(), 2);
    assert!(list.items().iter().all(|b| b.id() != "b1"));
    assert!(!list.is_loading());
    let notice = list.notices().current().unwrap();
    assert_eq!(notice.level, NoticeLevel::Warning);
}

#[tokio::test]
async fn deleting_last_item_of_last_page_moves_back() {
    // Given: 9 bookings at 8 per page, viewing page 2 with one item
    let fake = FakeBookings::with(bookings(9));
    let mut list = controller(&fake, 8);
    list.refresh().await;
    list.set_page(2);
    list.refresh().await;
    assert_eq!(list.items().len(), 1);

    // When: deleting it
    list.delete("b9").await.expect("delete succeeds");

    // Then: the page is clamped to the new last page and needs a fetch
    assert_eq!(list.total_pages(), 1);
    assert_eq!(list.page(), 1);
    assert!(list.is_stale());
    list.refresh().await;
    assert_eq!(list.items().len(), 8);
}
