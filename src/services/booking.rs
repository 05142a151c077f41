//! Транзакция бронирования.
//!
//! Клиент не резервирует и не блокирует места сам: распределение, конфликты и
//! атомарность - зона внешнего сервиса. Здесь строится корректный запрос,
//! разбирается ответ, и локальное состояние сверяется со свежим снимком мест.
//! "Ответа ещё нет" и "запрос упал" обрабатываются одинаково: ничего не коммитится локально.

use tracing::{error, info, warn};

use crate::api_client::BookingApi;
use crate::cache::Toggled;
use crate::error::ClientError;
use crate::models::{BookingRequest, BookingResult, SeatNumber, Session};
use crate::storage::TokenStore;
use crate::ReservationClient;

impl<A: BookingApi, S: TokenStore> ReservationClient<A, S> {
    /// Меняет поле "Number of Seats". Выбор мест при этом всегда сбрасывается:
    /// выбор и бронирование по количеству - взаимоисключающие намерения.
    pub fn set_requested_count(&mut self, raw: impl Into<String>) {
        self.requested_count = raw.into();
        self.selection.clear();
    }

    /// Клик по месту.
    ///
    /// Без сессии открывается форма входа, выбор не меняется.
    /// Забронированное место выбрать нельзя.
    pub fn toggle_seat(&mut self, seat: SeatNumber) -> Result<Toggled, ClientError> {
        self.gate.require_session()?;

        if seat.get() > self.inventory.total_seats() {
            return Err(ClientError::InvalidRequest(format!(
                "Seat {} does not exist in this venue",
                seat
            )));
        }
        if self.inventory.is_booked(seat) {
            return Err(ClientError::SeatAlreadyBooked(seat));
        }

        self.selection.toggle(seat).inspect_err(|e| warn!("Seat {} not selected: {}", seat, e))
    }

    /// Бронирует количество мест из поля "Number of Seats".
    pub async fn book(&mut self) -> Result<BookingResult, ClientError> {
        let count = self.requested_count.clone();
        self.submit(&count).await
    }

    /// Бронирует `count` мест.
    ///
    /// Проверки по порядку, первая неудача побеждает: сессия, затем количество в [1, 7].
    pub async fn submit(&mut self, count: &str) -> Result<BookingResult, ClientError> {
        let session = self.gate.require_session()?;
        let request = BookingRequest::from_input(count)?;
        self.dispatch(session, request).await
    }

    /// Бронирует столько мест, сколько сейчас выбрано.
    pub async fn submit_selection(&mut self) -> Result<BookingResult, ClientError> {
        let session = self.gate.require_session()?;
        let request = BookingRequest::from_selection(&self.selection)?;
        self.dispatch(session, request).await
    }

    async fn dispatch(&mut self, session: Session, request: BookingRequest) -> Result<BookingResult, ClientError> {
        let wanted = request.number_of_seats();
        info!("Submitting booking for {} seats", wanted);

        let result = match self.api.book(&session, &request).await {
            Ok(result) => result,
            Err(e) if e.is_unauthorized() => {
                warn!("Booking rejected, session is no longer valid: {}", e);
                self.gate.expire();
                return Err(ClientError::Unauthenticated);
            }
            Err(e) => {
                // Выбор и поле количества не трогаем, чтобы можно было повторить
                error!("Booking error: {}", e);
                return Err(ClientError::BookingFailed(e.service_message().map(str::to_string)));
            }
        };

        // Частичное распределение успехом не считается
        if result.seats.len() != wanted {
            error!(
                "Booking {} allocated {} seats, {} requested",
                result.booking_id,
                result.seats.len(),
                wanted
            );
            // Состояние на сервисе могло измениться - перечитываем
            if let Err(e) = self.refresh_inventory(Some(&session)).await {
                warn!("Seat refresh after booking {} failed: {}", result.booking_id, e);
            }
            return Err(ClientError::BookingFailed(Some(format!(
                "Booking service allocated {} seats instead of {}",
                result.seats.len(),
                wanted
            ))));
        }

        info!(
            "Booking {} confirmed: seats {:?}",
            result.booking_id,
            result.seat_numbers().map(SeatNumber::get).collect::<Vec<_>>()
        );

        if let Err(e) = self.refresh_inventory(Some(&session)).await {
            warn!("Booking {} confirmed but seat refresh failed: {}", result.booking_id, e);
        }
        self.selection.clear();
        self.requested_count.clear();

        Ok(result)
    }

    /// Перечитывает снимок мест и снимает с выбора места, которые успели забронировать.
    pub async fn refresh_inventory(&mut self, session: Option<&Session>) -> Result<usize, ClientError> {
        let booked = self.inventory.refresh(&self.api, session).await?;
        let dropped = self.selection.retain_available(&self.inventory);
        if !dropped.is_empty() {
            warn!(
                "Seats {:?} were booked elsewhere and left the selection",
                dropped.iter().map(|s| s.get()).collect::<Vec<_>>()
            );
        }
        Ok(booked)
    }

    /// Локальный сброс плюс попытка отменить прежние бронирования сессии.
    ///
    /// Снимок мест перечитывается в любом случае, даже если отмена не удалась.
    pub async fn reset(&mut self) -> Result<(), ClientError> {
        let session = self.gate.session().cloned();
        self.reset_with(session).await
    }

    pub(crate) async fn reset_with(&mut self, session: Option<Session>) -> Result<(), ClientError> {
        self.selection.clear();
        self.requested_count.clear();

        let released = match session.as_ref() {
            Some(session) => match self.api.reset(session).await {
                Ok(()) => {
                    info!("Prior bookings released");
                    Ok(())
                }
                Err(e) if e.is_unauthorized() => {
                    warn!("Reset rejected, session is no longer valid: {}", e);
                    // после logout сессия уже снята, форму не открываем
                    if self.gate.is_authenticated() {
                        self.gate.expire();
                    }
                    Err(ClientError::Unauthenticated)
                }
                Err(e) => {
                    error!("Error resetting booking: {}", e);
                    Err(ClientError::from(e))
                }
            },
            None => Ok(()),
        };

        // После выхода сессии уже нет - снимок читается анонимно
        let current = self.gate.session().cloned();
        let refreshed = self.refresh_inventory(current.as_ref()).await.map(|_| ());
        released.and(refreshed)
    }
}
