//! Seat selection through UI events.

mod common;

use common::*;
use seat_booking::controllers::{Notice, UiEvent};
use seat_booking::models::SeatStatus;
use wiremock::MockServer;

#[tokio::test]
async fn test_eighth_seat_warns_and_keeps_seven() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    let (mut client, _store) = signed_in_client(&server);

    for n in 1..=7 {
        assert_eq!(client.handle(UiEvent::SeatClicked(n)).await, Notice::Updated);
    }

    let notice = client.handle(UiEvent::SeatClicked(8)).await;
    assert_eq!(
        notice,
        Notice::Warning("You can only select up to 7 seats at a time".to_string())
    );
    assert_eq!(
        client.selection().seats().iter().map(|s| s.get()).collect::<Vec<_>>(),
        (1..=7).collect::<Vec<_>>()
    );

    Ok(())
}

#[tokio::test]
async fn test_booked_seat_click_is_ignored() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    let (mut client, _store) = signed_in_client(&server);
    seats_mock(&[15]).mount(&server).await;

    client.handle(UiEvent::RefreshRequested).await;

    assert_eq!(client.handle(UiEvent::SeatClicked(15)).await, Notice::Ignored);
    assert!(client.selection().is_empty());
    assert_eq!(client.seat_map().cell(seat(15)).map(|c| c.status), Some(SeatStatus::Booked));

    Ok(())
}

#[tokio::test]
async fn test_count_change_clears_selection() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    let (mut client, _store) = signed_in_client(&server);

    client.handle(UiEvent::SeatClicked(3)).await;
    client.handle(UiEvent::SeatClicked(4)).await;
    assert_eq!(client.seat_map().cell(seat(3)).map(|c| c.status), Some(SeatStatus::Selected));

    client.handle(UiEvent::CountChanged("2".into())).await;
    assert!(client.selection().is_empty());

    Ok(())
}

#[tokio::test]
async fn test_seat_zero_is_a_warning() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    let (mut client, _store) = signed_in_client(&server);

    assert!(matches!(client.handle(UiEvent::SeatClicked(0)).await, Notice::Warning(_)));
    Ok(())
}

#[tokio::test]
async fn test_invalid_count_book_is_warning() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    let (mut client, _store) = signed_in_client(&server);

    client.handle(UiEvent::CountChanged("12".into())).await;
    let notice = client.handle(UiEvent::BookPressed).await;
    assert_eq!(
        notice,
        Notice::Warning("You can only book up to 7 seats at a time".to_string())
    );

    Ok(())
}

#[tokio::test]
async fn test_refresh_drops_seat_booked_elsewhere_from_selection() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    let (mut client, _store) = signed_in_client(&server);

    client.toggle_seat(seat(4))?;
    client.toggle_seat(seat(5))?;
    // место 5 забрал кто-то другой
    seats_mock(&[5]).expect(1).mount(&server).await;

    assert_eq!(client.handle(UiEvent::RefreshRequested).await, Notice::Updated);

    assert!(client.inventory().is_booked(seat(5)));
    assert!(!client.selection().contains(seat(5)));
    assert_eq!(client.selection().seats(), &[seat(4)]);
    assert_eq!(client.seat_map().cell(seat(5)).map(|c| c.status), Some(SeatStatus::Booked));

    Ok(())
}
