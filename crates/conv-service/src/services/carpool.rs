//! Carpool service
//!
//! Participants publish offers (driver) and requests (passenger) for an
//! edition. Passengers book seats on offers; the driver accepts or rejects.

use chrono::Utc;
use conv_core::entities::{
    BookingStatus, CarpoolBooking, CarpoolOffer, CarpoolRequest, TripDirection,
};
use conv_core::{DomainError, NotificationType, Snowflake};
use tracing::{info, instrument};

use crate::dto::{
    BookingResponse, CarpoolOfferResponse, CarpoolRequestResponse, CreateBookingRequest,
    CreateCarpoolOfferRequest, CreateCarpoolRequestRequest, DecideBookingRequest,
    UpdateCarpoolOfferRequest, UpdateCarpoolRequestRequest,
};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::notification::NotificationService;
use super::permission::PermissionService;

fn check_seats(seats: i32) -> ServiceResult<()> {
    if !(1..=8).contains(&seats) {
        return Err(ServiceError::validation("seats must be between 1 and 8"));
    }
    Ok(())
}

/// Driver's answer to a booking
fn parse_booking_decision(status: &str) -> ServiceResult<BookingStatus> {
    match status.parse::<BookingStatus>()? {
        decided @ (BookingStatus::Accepted | BookingStatus::Rejected) => Ok(decided),
        _ => Err(ServiceError::validation(
            "Decision must be ACCEPTED or REJECTED",
        )),
    }
}

/// Carpool service
pub struct CarpoolService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> CarpoolService<'a> {
    /// Create a new CarpoolService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    // === Offers ===

    #[instrument(skip(self))]
    pub async fn list_offers(
        &self,
        edition_id: Snowflake,
    ) -> ServiceResult<Vec<CarpoolOfferResponse>> {
        PermissionService::new(self.ctx).load_edition(edition_id).await?;
        let offers = self.ctx.carpool_offer_repo().find_by_edition(edition_id).await?;
        Ok(offers.iter().map(CarpoolOfferResponse::from).collect())
    }

    #[instrument(skip(self))]
    pub async fn get_offer(&self, offer_id: Snowflake) -> ServiceResult<CarpoolOfferResponse> {
        let offer = self.find_offer(offer_id).await?;
        Ok(CarpoolOfferResponse::from(&offer))
    }

    #[instrument(skip(self, request))]
    pub async fn create_offer(
        &self,
        edition_id: Snowflake,
        user_id: Snowflake,
        request: CreateCarpoolOfferRequest,
    ) -> ServiceResult<CarpoolOfferResponse> {
        PermissionService::new(self.ctx).load_edition(edition_id).await?;
        check_seats(request.seats)?;

        let now = Utc::now();
        let offer = CarpoolOffer {
            id: self.ctx.generate_id(),
            edition_id,
            user_id,
            direction: request.direction.parse::<TripDirection>()?,
            trip_date: request.trip_date,
            location_city: request.location_city.trim().to_string(),
            location_address: request.location_address,
            seats: request.seats,
            description: request.description,
            phone: request.phone,
            accepted_seats: 0,
            created_at: now,
            updated_at: now,
        };
        self.ctx.carpool_offer_repo().create(&offer).await?;

        info!(offer_id = %offer.id, edition_id = %edition_id, "Carpool offer created");

        Ok(CarpoolOfferResponse::from(&offer))
    }

    #[instrument(skip(self, request))]
    pub async fn update_offer(
        &self,
        offer_id: Snowflake,
        user_id: Snowflake,
        request: UpdateCarpoolOfferRequest,
    ) -> ServiceResult<CarpoolOfferResponse> {
        let mut offer = self.find_offer(offer_id).await?;
        if !offer.is_owner(user_id) {
            return Err(DomainError::NotOwner.into());
        }

        if let Some(trip_date) = request.trip_date {
            offer.trip_date = trip_date;
        }
        if let Some(city) = request.location_city {
            offer.location_city = city.trim().to_string();
        }
        if let Some(address) = request.location_address {
            offer.location_address = Some(address);
        }
        if let Some(seats) = request.seats {
            check_seats(seats)?;
            if seats < offer.accepted_seats {
                return Err(ServiceError::validation(
                    "seats cannot drop below the seats already accepted",
                ));
            }
            offer.seats = seats;
        }
        if let Some(description) = request.description {
            offer.description = Some(description);
        }
        if let Some(phone) = request.phone {
            offer.phone = Some(phone);
        }
        offer.updated_at = Utc::now();

        self.ctx.carpool_offer_repo().update(&offer).await?;

        info!(offer_id = %offer_id, "Carpool offer updated");

        Ok(CarpoolOfferResponse::from(&offer))
    }

    #[instrument(skip(self))]
    pub async fn delete_offer(&self, offer_id: Snowflake, user_id: Snowflake) -> ServiceResult<()> {
        let offer = self.find_offer(offer_id).await?;
        if !offer.is_owner(user_id) {
            return Err(DomainError::NotOwner.into());
        }

        let passengers: Vec<Snowflake> = self
            .ctx
            .carpool_booking_repo()
            .find_by_offer(offer_id)
            .await?
            .into_iter()
            .filter(|b| matches!(b.status, BookingStatus::Pending | BookingStatus::Accepted))
            .map(|b| b.requester_id)
            .collect();

        self.ctx.carpool_offer_repo().delete(offer_id).await?;

        info!(offer_id = %offer_id, passengers = passengers.len(), "Carpool offer deleted");

        let notifications = NotificationService::new(self.ctx);
        for passenger in passengers {
            notifications
                .send(
                    notifications
                        .build(
                            passenger,
                            NotificationType::Warning,
                            "Carpool canceled",
                            format!(
                                "The ride from {} you booked was canceled by its driver",
                                offer.location_city
                            ),
                        )
                        .with_category("carpool")
                        .with_action_url(format!("/editions/{}/carpool", offer.edition_id)),
                )
                .await;
        }

        Ok(())
    }

    // === Requests ===

    #[instrument(skip(self))]
    pub async fn list_requests(
        &self,
        edition_id: Snowflake,
    ) -> ServiceResult<Vec<CarpoolRequestResponse>> {
        PermissionService::new(self.ctx).load_edition(edition_id).await?;
        let requests = self
            .ctx
            .carpool_request_repo()
            .find_by_edition(edition_id)
            .await?;
        Ok(requests.iter().map(CarpoolRequestResponse::from).collect())
    }

    #[instrument(skip(self))]
    pub async fn get_request(
        &self,
        request_id: Snowflake,
    ) -> ServiceResult<CarpoolRequestResponse> {
        let ride = self.find_request(request_id).await?;
        Ok(CarpoolRequestResponse::from(&ride))
    }

    #[instrument(skip(self, request))]
    pub async fn create_request(
        &self,
        edition_id: Snowflake,
        user_id: Snowflake,
        request: CreateCarpoolRequestRequest,
    ) -> ServiceResult<CarpoolRequestResponse> {
        PermissionService::new(self.ctx).load_edition(edition_id).await?;
        check_seats(request.seats_needed)?;

        let now = Utc::now();
        let ride = CarpoolRequest {
            id: self.ctx.generate_id(),
            edition_id,
            user_id,
            direction: request.direction.parse::<TripDirection>()?,
            trip_date: request.trip_date,
            location_city: request.location_city.trim().to_string(),
            seats_needed: request.seats_needed,
            description: request.description,
            phone: request.phone,
            created_at: now,
            updated_at: now,
        };
        self.ctx.carpool_request_repo().create(&ride).await?;

        info!(request_id = %ride.id, edition_id = %edition_id, "Carpool request created");

        Ok(CarpoolRequestResponse::from(&ride))
    }

    #[instrument(skip(self, request))]
    pub async fn update_request(
        &self,
        request_id: Snowflake,
        user_id: Snowflake,
        request: UpdateCarpoolRequestRequest,
    ) -> ServiceResult<CarpoolRequestResponse> {
        let mut ride = self.find_request(request_id).await?;
        if ride.user_id != user_id {
            return Err(DomainError::NotOwner.into());
        }

        if let Some(trip_date) = request.trip_date {
            ride.trip_date = trip_date;
        }
        if let Some(city) = request.location_city {
            ride.location_city = city.trim().to_string();
        }
        if let Some(seats) = request.seats_needed {
            check_seats(seats)?;
            ride.seats_needed = seats;
        }
        if let Some(description) = request.description {
            ride.description = Some(description);
        }
        if let Some(phone) = request.phone {
            ride.phone = Some(phone);
        }
        ride.updated_at = Utc::now();

        self.ctx.carpool_request_repo().update(&ride).await?;

        info!(request_id = %request_id, "Carpool request updated");

        Ok(CarpoolRequestResponse::from(&ride))
    }

    #[instrument(skip(self))]
    pub async fn delete_request(
        &self,
        request_id: Snowflake,
        user_id: Snowflake,
    ) -> ServiceResult<()> {
        let ride = self.find_request(request_id).await?;
        if ride.user_id != user_id {
            return Err(DomainError::NotOwner.into());
        }
        self.ctx.carpool_request_repo().delete(request_id).await?;
        info!(request_id = %request_id, "Carpool request deleted");
        Ok(())
    }

    // === Bookings ===

    /// Bookings of an offer, visible to its driver
    #[instrument(skip(self))]
    pub async fn list_bookings(
        &self,
        offer_id: Snowflake,
        user_id: Snowflake,
    ) -> ServiceResult<Vec<BookingResponse>> {
        let offer = self.find_offer(offer_id).await?;
        if !offer.is_owner(user_id) {
            return Err(DomainError::NotOwner.into());
        }
        let bookings = self.ctx.carpool_booking_repo().find_by_offer(offer_id).await?;
        Ok(bookings.iter().map(BookingResponse::from).collect())
    }

    #[instrument(skip(self, request))]
    pub async fn book(
        &self,
        offer_id: Snowflake,
        user_id: Snowflake,
        request: CreateBookingRequest,
    ) -> ServiceResult<BookingResponse> {
        let offer = self.find_offer(offer_id).await?;
        if offer.is_owner(user_id) {
            return Err(DomainError::CannotBookOwnOffer.into());
        }
        offer.ensure_room_for(request.seats)?;

        let now = Utc::now();
        let booking = CarpoolBooking {
            id: self.ctx.generate_id(),
            offer_id,
            requester_id: user_id,
            seats: request.seats,
            message: request.message,
            status: BookingStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        self.ctx.carpool_booking_repo().create(&booking).await?;

        info!(
            booking_id = %booking.id,
            offer_id = %offer_id,
            seats = booking.seats,
            "Carpool booking requested"
        );

        let notifications = NotificationService::new(self.ctx);
        notifications
            .send(
                notifications
                    .build(
                        offer.user_id,
                        NotificationType::Info,
                        "New carpool booking",
                        format!(
                            "{} seat(s) requested on your ride from {}",
                            booking.seats, offer.location_city
                        ),
                    )
                    .with_category("carpool")
                    .with_entity("carpool_booking", booking.id)
                    .with_action_url(format!("/editions/{}/carpool", offer.edition_id)),
            )
            .await;

        Ok(BookingResponse::from(&booking))
    }

    /// Driver accepts or rejects a pending booking
    #[instrument(skip(self, request))]
    pub async fn decide_booking(
        &self,
        offer_id: Snowflake,
        booking_id: Snowflake,
        user_id: Snowflake,
        request: DecideBookingRequest,
    ) -> ServiceResult<BookingResponse> {
        let status = parse_booking_decision(&request.status)?;
        let offer = self.find_offer(offer_id).await?;
        if !offer.is_owner(user_id) {
            return Err(DomainError::NotOwner.into());
        }
        let mut booking = self.find_booking(offer_id, booking_id).await?;
        if booking.status != BookingStatus::Pending {
            return Err(DomainError::BookingNotPending.into());
        }

        match status {
            BookingStatus::Accepted => self.ctx.carpool_booking_repo().accept(booking_id).await?,
            _ => {
                self.ctx
                    .carpool_booking_repo()
                    .set_status(booking_id, status)
                    .await?
            }
        }
        booking.status = status;
        booking.updated_at = Utc::now();

        info!(booking_id = %booking_id, status = status.as_str(), "Carpool booking decided");

        let (kind, title, verb) = if status == BookingStatus::Accepted {
            (NotificationType::Success, "Carpool booking accepted", "accepted")
        } else {
            (NotificationType::Info, "Carpool booking declined", "declined")
        };
        let notifications = NotificationService::new(self.ctx);
        notifications
            .send(
                notifications
                    .build(
                        booking.requester_id,
                        kind,
                        title,
                        format!("Your booking on the ride from {} was {verb}", offer.location_city),
                    )
                    .with_category("carpool")
                    .with_entity("carpool_booking", booking.id)
                    .with_action_url(format!("/editions/{}/carpool", offer.edition_id)),
            )
            .await;

        Ok(BookingResponse::from(&booking))
    }

    /// Passenger withdraws a pending or accepted booking
    #[instrument(skip(self))]
    pub async fn cancel_booking(
        &self,
        offer_id: Snowflake,
        booking_id: Snowflake,
        user_id: Snowflake,
    ) -> ServiceResult<BookingResponse> {
        let offer = self.find_offer(offer_id).await?;
        let mut booking = self.find_booking(offer_id, booking_id).await?;
        if booking.requester_id != user_id {
            return Err(DomainError::NotOwner.into());
        }
        if !matches!(booking.status, BookingStatus::Pending | BookingStatus::Accepted) {
            return Err(DomainError::BookingNotPending.into());
        }

        self.ctx
            .carpool_booking_repo()
            .set_status(booking_id, BookingStatus::Canceled)
            .await?;
        booking.status = BookingStatus::Canceled;
        booking.updated_at = Utc::now();

        info!(booking_id = %booking_id, "Carpool booking canceled");

        let notifications = NotificationService::new(self.ctx);
        notifications
            .send(
                notifications
                    .build(
                        offer.user_id,
                        NotificationType::Info,
                        "Carpool booking canceled",
                        format!(
                            "A passenger canceled {} seat(s) on your ride from {}",
                            booking.seats, offer.location_city
                        ),
                    )
                    .with_category("carpool")
                    .with_entity("carpool_booking", booking.id)
                    .with_action_url(format!("/editions/{}/carpool", offer.edition_id)),
            )
            .await;

        Ok(BookingResponse::from(&booking))
    }

    async fn find_offer(&self, offer_id: Snowflake) -> ServiceResult<CarpoolOffer> {
        self.ctx
            .carpool_offer_repo()
            .find_by_id(offer_id)
            .await?
            .ok_or_else(|| DomainError::CarpoolOfferNotFound(offer_id).into())
    }

    async fn find_request(&self, request_id: Snowflake) -> ServiceResult<CarpoolRequest> {
        self.ctx
            .carpool_request_repo()
            .find_by_id(request_id)
            .await?
            .ok_or_else(|| DomainError::CarpoolRequestNotFound(request_id).into())
    }

    async fn find_booking(
        &self,
        offer_id: Snowflake,
        booking_id: Snowflake,
    ) -> ServiceResult<CarpoolBooking> {
        self.ctx
            .carpool_booking_repo()
            .find_by_id(booking_id)
            .await?
            .filter(|b| b.offer_id == offer_id)
            .ok_or_else(|| DomainError::BookingNotFound(booking_id).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_seats() {
        assert!(check_seats(1).is_ok());
        assert!(check_seats(8).is_ok());
        assert_eq!(check_seats(0).unwrap_err().status_code(), 400);
        assert_eq!(check_seats(9).unwrap_err().status_code(), 400);
    }

    #[test]
    fn test_parse_booking_decision() {
        assert_eq!(
            parse_booking_decision("ACCEPTED").unwrap(),
            BookingStatus::Accepted
        );
        assert_eq!(
            parse_booking_decision("REJECTED").unwrap(),
            BookingStatus::Rejected
        );
        assert!(parse_booking_decision("CANCELED").is_err());
        assert!(parse_booking_decision("PENDING").is_err());
        assert!(parse_booking_decision("nope").is_err());
    }
}
