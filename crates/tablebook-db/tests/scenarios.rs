//! Locate / book / bill scenarios run against SQLite-backed stores.

use std::collections::HashSet;

use tablebook_core::operations::{bill, book, get_booking, locate, update_table_status};
use tablebook_core::{
    BookingStatus, BookingStore, CoreError, NewBooking, PartyDetails, Table, TableRegistry,
    TableStatus,
};
use tablebook_db::{BookingRepository, Database, DbConfig, TableRepository};

async fn stores(layout: &[(i64, u32)]) -> (Database, TableRepository, BookingRepository) {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    let tables: Vec<Table> = layout.iter().map(|&(id, cap)| Table::new(id, cap)).collect();
    db.tables().seed(&tables).await.unwrap();
    let (t, b) = (db.tables(), db.bookings());
    (db, t, b)
}

async fn status_of(tables: &TableRepository, id: i64) -> TableStatus {
    tables.get_table(id).await.unwrap().unwrap().status
}

#[tokio::test]
async fn locate_book_bill() {
    let (_db, tables, bookings) = stores(&[(1, 2), (2, 4)]).await;

    assert_eq!(locate(&tables, 2).await.unwrap().id, 1);
    assert_eq!(locate(&tables, 2).await.unwrap().id, 2);
    assert_eq!(
        locate(&tables, 2).await.unwrap_err(),
        CoreError::NoTableAvailable { party_size: 2 }
    );

    let booking = book(
        &tables,
        &bookings,
        NewBooking::new(1, PartyDetails::new("Ada", 2)),
    )
    .await
    .unwrap();
    assert_eq!(status_of(&tables, 1).await, TableStatus::Occupied);

    let paid = bill(&tables, &bookings, booking.id).await.unwrap();
    assert_eq!(paid.status, BookingStatus::Completed);
    assert_eq!(status_of(&tables, 1).await, TableStatus::Free);
    assert_eq!(status_of(&tables, 2).await, TableStatus::Occupied);

    let stored = get_booking(&bookings, booking.id).await.unwrap();
    assert_eq!(stored.status, BookingStatus::Completed);
}

#[tokio::test]
async fn bill_unknown_booking_changes_nothing() {
    let (_db, tables, bookings) = stores(&[(1, 2), (2, 4)]).await;
    locate(&tables, 2).await.unwrap();
    let before = tables.list_tables().await.unwrap();

    let err = bill(&tables, &bookings, 999).await.unwrap_err();
    assert_eq!(err, CoreError::BookingNotFound(999));
    assert_eq!(tables.list_tables().await.unwrap(), before);
}

#[tokio::test]
async fn bill_twice_rejected() {
    let (_db, tables, bookings) = stores(&[(1, 2)]).await;
    locate(&tables, 2).await.unwrap();
    let booking = book(
        &tables,
        &bookings,
        NewBooking::new(1, PartyDetails::new("Ada", 2)),
    )
    .await
    .unwrap();

    bill(&tables, &bookings, booking.id).await.unwrap();
    let err = bill(&tables, &bookings, booking.id).await.unwrap_err();
    assert_eq!(err, CoreError::BookingNotActive(booking.id));
    assert_eq!(status_of(&tables, 1).await, TableStatus::Free);
}

#[tokio::test]
async fn booking_requires_a_located_table() {
    let (_db, tables, bookings) = stores(&[(1, 2)]).await;

    let err = book(
        &tables,
        &bookings,
        NewBooking::new(1, PartyDetails::new("Ada", 2)),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, CoreError::TableNotReserved { table_id: 1, .. }));
    assert!(bookings.find_active_by_table(1).await.unwrap().is_none());
}

#[tokio::test]
async fn waiting_for_bill_then_paid() {
    let (_db, tables, bookings) = stores(&[(1, 4)]).await;
    locate(&tables, 3).await.unwrap();
    let booking = book(
        &tables,
        &bookings,
        NewBooking::new(1, PartyDetails::new("Ada", 3)),
    )
    .await
    .unwrap();

    let table = update_table_status(&tables, &bookings, 1, TableStatus::WaitingForBill)
        .await
        .unwrap();
    assert_eq!(table.status, TableStatus::WaitingForBill);
    assert_eq!(status_of(&tables, 1).await, TableStatus::WaitingForBill);

    bill(&tables, &bookings, booking.id).await.unwrap();
    assert_eq!(status_of(&tables, 1).await, TableStatus::Free);
}

#[tokio::test]
async fn sequential_locates_hand_out_distinct_tables() {
    let layout: Vec<(i64, u32)> = (1..=6).map(|id| (id, 4)).collect();
    let (_db, tables, _bookings) = stores(&layout).await;

    let mut seen = HashSet::new();
    for _ in 0..6 {
        let table = locate(&tables, 2).await.unwrap();
        assert!(seen.insert(table.id));
    }
    assert!(locate(&tables, 1).await.is_err());
}
