#![allow(dead_code)]

use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use seat_booking::api_client::HttpBookingApi;
use seat_booking::config::Config;
use seat_booking::models::Session;
use seat_booking::storage::MemoryTokenStore;
use seat_booking::ReservationClient;

pub type TestClient = ReservationClient<HttpBookingApi, MemoryTokenStore>;

pub const TOKEN: &str = "tok-existing";

pub fn client_for(server: &MockServer, store: MemoryTokenStore) -> TestClient {
    let config = Config::for_api(server.uri());
    let api = HttpBookingApi::from_config(&config.api).expect("http client");
    ReservationClient::new(api, store, config)
}

pub fn anonymous_client(server: &MockServer) -> TestClient {
    client_for(server, MemoryTokenStore::default())
}

/// Клиент с уже сохранённой сессией. Места не загружаются.
pub fn signed_in_client(server: &MockServer) -> (TestClient, MemoryTokenStore) {
    let store = MemoryTokenStore::with_session(Session::new(TOKEN).with_email("holder@example.com"));
    let mut client = client_for(server, store.clone());
    client.session_gate_mut().restore().expect("restore");
    (client, store)
}

pub fn seats_body(booked: &[u32]) -> Value {
    Value::Array(
        (1..=71)
            .map(|n| json!({ "seatNumber": n, "isBooked": booked.contains(&n) }))
            .collect(),
    )
}

pub fn seats_mock(booked: &[u32]) -> Mock {
    Mock::given(method("GET"))
        .and(path("/bookings/seats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(seats_body(booked)))
}

pub fn booking_body(id: &str, seats: &[u32]) -> Value {
    json!({
        "bookingId": id,
        "seats": seats.iter().map(|n| json!({ "seatNumber": n, "isBooked": true })).collect::<Vec<_>>(),
    })
}

pub fn seat(n: u32) -> seat_booking::models::SeatNumber {
    seat_booking::models::SeatNumber::new(n).expect("positive seat number")
}
