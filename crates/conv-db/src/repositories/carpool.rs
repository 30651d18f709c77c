//! PostgreSQL implementations of the carpool repositories

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use conv_core::entities::{BookingStatus, CarpoolBooking, CarpoolOffer, CarpoolRequest};
use conv_core::error::DomainError;
use conv_core::traits::{
    CarpoolBookingRepository, CarpoolOfferRepository, CarpoolRequestRepository, RepoResult,
};
use conv_core::value_objects::Snowflake;

use crate::models::{CarpoolBookingModel, CarpoolOfferModel, CarpoolRequestModel};

use super::error::{map_db_error, map_fk_violation, try_map_all};

const OFFER_SELECT: &str = r"
    SELECT o.id, o.edition_id, o.user_id, o.direction, o.trip_date, o.location_city,
           o.location_address, o.seats, o.description, o.phone,
           COALESCE((
               SELECT SUM(b.seats) FROM carpool_bookings b
               WHERE b.offer_id = o.id AND b.status = 'ACCEPTED'
           ), 0)::BIGINT AS accepted_seats,
           o.created_at, o.updated_at
    FROM carpool_offers o
";

// ============================================================================
// Offers
// ============================================================================

/// PostgreSQL implementation of CarpoolOfferRepository
#[derive(Clone)]
pub struct PgCarpoolOfferRepository {
    pool: PgPool,
}

impl PgCarpoolOfferRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CarpoolOfferRepository for PgCarpoolOfferRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<CarpoolOffer>> {
        let row = sqlx::query_as::<_, CarpoolOfferModel>(&format!("{OFFER_SELECT} WHERE o.id = $1"))
            .bind(id.into_inner())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        row.map(CarpoolOffer::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_edition(&self, edition_id: Snowflake) -> RepoResult<Vec<CarpoolOffer>> {
        let rows = sqlx::query_as::<_, CarpoolOfferModel>(&format!(
            "{OFFER_SELECT} WHERE o.edition_id = $1 ORDER BY o.trip_date, o.id"
        ))
        .bind(edition_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        try_map_all(rows)
    }

    #[instrument(skip(self, offer), fields(offer_id = %offer.id))]
    async fn create(&self, offer: &CarpoolOffer) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO carpool_offers (id, edition_id, user_id, direction, trip_date, location_city,
                                        location_address, seats, description, phone,
                                        created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            ",
        )
        .bind(offer.id.into_inner())
        .bind(offer.edition_id.into_inner())
        .bind(offer.user_id.into_inner())
        .bind(offer.direction.as_str())
        .bind(offer.trip_date)
        .bind(&offer.location_city)
        .bind(&offer.location_address)
        .bind(offer.seats)
        .bind(&offer.description)
        .bind(&offer.phone)
        .bind(offer.created_at)
        .bind(offer.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_fk_violation(e, || DomainError::EditionNotFound(offer.edition_id)))?;

        Ok(())
    }

    #[instrument(skip(self, offer), fields(offer_id = %offer.id))]
    async fn update(&self, offer: &CarpoolOffer) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE carpool_offers
            SET direction = $2, trip_date = $3, location_city = $4, location_address = $5,
                seats = $6, description = $7, phone = $8, updated_at = NOW()
            WHERE id = $1
            ",
        )
        .bind(offer.id.into_inner())
        .bind(offer.direction.as_str())
        .bind(offer.trip_date)
        .bind(&offer.location_city)
        .bind(&offer.location_address)
        .bind(offer.seats)
        .bind(&offer.description)
        .bind(&offer.phone)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::CarpoolOfferNotFound(offer.id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Snowflake) -> RepoResult<()> {
        let result = sqlx::query("DELETE FROM carpool_offers WHERE id = $1")
            .bind(id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::CarpoolOfferNotFound(id));
        }

        Ok(())
    }
}

// ============================================================================
// Requests
// ============================================================================

/// PostgreSQL implementation of CarpoolRequestRepository
#[derive(Clone)]
pub struct PgCarpoolRequestRepository {
    pool: PgPool,
}

impl PgCarpoolRequestRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CarpoolRequestRepository for PgCarpoolRequestRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<CarpoolRequest>> {
        let row = sqlx::query_as::<_, CarpoolRequestModel>(
            r"
            SELECT id, edition_id, user_id, direction, trip_date, location_city, seats_needed,
                   description, phone, created_at, updated_at
            FROM carpool_requests
            WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        row.map(CarpoolRequest::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_edition(&self, edition_id: Snowflake) -> RepoResult<Vec<CarpoolRequest>> {
        let rows = sqlx::query_as::<_, CarpoolRequestModel>(
            r"
            SELECT id, edition_id, user_id, direction, trip_date, location_city, seats_needed,
                   description, phone, created_at, updated_at
            FROM carpool_requests
            WHERE edition_id = $1
            ORDER BY trip_date, id
            ",
        )
        .bind(edition_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        try_map_all(rows)
    }

    #[instrument(skip(self, request), fields(request_id = %request.id))]
    async fn create(&self, request: &CarpoolRequest) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO carpool_requests (id, edition_id, user_id, direction, trip_date,
                                          location_city, seats_needed, description, phone,
                                          created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ",
        )
        .bind(request.id.into_inner())
        .bind(request.edition_id.into_inner())
        .bind(request.user_id.into_inner())
        .bind(request.direction.as_str())
        .bind(request.trip_date)
        .bind(&request.location_city)
        .bind(request.seats_needed)
        .bind(&request.description)
        .bind(&request.phone)
        .bind(request.created_at)
        .bind(request.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_fk_violation(e, || DomainError::EditionNotFound(request.edition_id)))?;

        Ok(())
    }

    #[instrument(skip(self, request), fields(request_id = %request.id))]
    async fn update(&self, request: &CarpoolRequest) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE carpool_requests
            SET direction = $2, trip_date = $3, location_city = $4, seats_needed = $5,
                description = $6, phone = $7, updated_at = NOW()
            WHERE id = $1
            ",
        )
        .bind(request.id.into_inner())
        .bind(request.direction.as_str())
        .bind(request.trip_date)
        .bind(&request.location_city)
        .bind(request.seats_needed)
        .bind(&request.description)
        .bind(&request.phone)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::CarpoolRequestNotFound(request.id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Snowflake) -> RepoResult<()> {
        let result = sqlx::query("DELETE FROM carpool_requests WHERE id = $1")
            .bind(id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::CarpoolRequestNotFound(id));
        }

        Ok(())
    }
}

// ============================================================================
// Bookings
// ============================================================================

/// PostgreSQL implementation of CarpoolBookingRepository
#[derive(Clone)]
pub struct PgCarpoolBookingRepository {
    pool: PgPool,
}

impl PgCarpoolBookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CarpoolBookingRepository for PgCarpoolBookingRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<CarpoolBooking>> {
        let row = sqlx::query_as::<_, CarpoolBookingModel>(
            r"
            SELECT id, offer_id, requester_id, seats, message, status, created_at, updated_at
            FROM carpool_bookings
            WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        row.map(CarpoolBooking::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_offer(&self, offer_id: Snowflake) -> RepoResult<Vec<CarpoolBooking>> {
        let rows = sqlx::query_as::<_, CarpoolBookingModel>(
            r"
            SELECT id, offer_id, requester_id, seats, message, status, created_at, updated_at
            FROM carpool_bookings
            WHERE offer_id = $1
            ORDER BY created_at
            ",
        )
        .bind(offer_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        try_map_all(rows)
    }

    #[instrument(skip(self, booking), fields(booking_id = %booking.id))]
    async fn create(&self, booking: &CarpoolBooking) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO carpool_bookings (id, offer_id, requester_id, seats, message, status,
                                          created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ",
        )
        .bind(booking.id.into_inner())
        .bind(booking.offer_id.into_inner())
        .bind(booking.requester_id.into_inner())
        .bind(booking.seats)
        .bind(&booking.message)
        .bind(booking.status.as_str())
        .bind(booking.created_at)
        .bind(booking.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_fk_violation(e, || DomainError::CarpoolOfferNotFound(booking.offer_id)))?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn set_status(&self, id: Snowflake, status: BookingStatus) -> RepoResult<()> {
        let result = sqlx::query(
            "UPDATE carpool_bookings SET status = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id.into_inner())
        .bind(status.as_str())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::BookingNotFound(id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn accept(&self, id: Snowflake) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let booking = sqlx::query_as::<_, CarpoolBookingModel>(
            r"
            SELECT id, offer_id, requester_id, seats, message, status, created_at, updated_at
            FROM carpool_bookings
            WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_db_error)?
        .ok_or(DomainError::BookingNotFound(id))
        .and_then(CarpoolBooking::try_from)?;

        if booking.status != BookingStatus::Pending {
            return Err(DomainError::BookingNotPending);
        }

        let seats = sqlx::query_scalar::<_, i32>(
            "SELECT seats FROM carpool_offers WHERE id = $1 FOR UPDATE",
        )
        .bind(booking.offer_id.into_inner())
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_db_error)?
        .ok_or(DomainError::CarpoolOfferNotFound(booking.offer_id))?;

        let accepted = sqlx::query_scalar::<_, i64>(
            r"
            SELECT COALESCE(SUM(seats), 0)::BIGINT
            FROM carpool_bookings
            WHERE offer_id = $1 AND status = 'ACCEPTED'
            ",
        )
        .bind(booking.offer_id.into_inner())
        .fetch_one(&mut *tx)
        .await
        .map_err(map_db_error)?;

        let remaining = (i64::from(seats) - accepted).max(0);
        if i64::from(booking.seats) > remaining {
            return Err(DomainError::NotEnoughSeats {
                remaining: i32::try_from(remaining).unwrap_or(0),
            });
        }

        sqlx::query(
            "UPDATE carpool_bookings SET status = 'ACCEPTED', updated_at = NOW() WHERE id = $1",
        )
        .bind(id.into_inner())
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repos_are_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgCarpoolOfferRepository>();
        assert_send_sync::<PgCarpoolRequestRepository>();
        assert_send_sync::<PgCarpoolBookingRepository>();
    }
}
