//! Carpool models

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// carpool_offers row joined with the sum of accepted booking seats
#[derive(Debug, Clone, FromRow)]
pub struct CarpoolOfferModel {
    pub id: i64,
    pub edition_id: i64,
    pub user_id: i64,
    pub direction: String,
    pub trip_date: DateTime<Utc>,
    pub location_city: String,
    pub location_address: Option<String>,
    pub seats: i32,
    pub description: Option<String>,
    pub phone: Option<String>,
    pub accepted_seats: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Database model for carpool_requests table
#[derive(Debug, Clone, FromRow)]
pub struct CarpoolRequestModel {
    pub id: i64,
    pub edition_id: i64,
    pub user_id: i64,
    pub direction: String,
    pub trip_date: DateTime<Utc>,
    pub location_city: String,
    pub seats_needed: i32,
    pub description: Option<String>,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Database model for carpool_bookings table
#[derive(Debug, Clone, FromRow)]
pub struct CarpoolBookingModel {
    pub id: i64,
    pub offer_id: i64,
    pub requester_id: i64,
    pub seats: i32,
    pub message: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
