//! Carpooling between participants of an edition

use chrono::{DateTime, Utc};
use std::str::FromStr;

use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// Whether a trip goes to the edition or back home
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TripDirection {
    ToEvent,
    FromEvent,
}

impl TripDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ToEvent => "TO_EVENT",
            Self::FromEvent => "FROM_EVENT",
        }
    }
}

impl FromStr for TripDirection {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "TO_EVENT" => Ok(Self::ToEvent),
            "FROM_EVENT" => Ok(Self::FromEvent),
            other => Err(DomainError::invalid_value("trip direction", other)),
        }
    }
}

/// Seats offered by a driver
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarpoolOffer {
    pub id: Snowflake,
    pub edition_id: Snowflake,
    pub user_id: Snowflake,
    pub direction: TripDirection,
    pub trip_date: DateTime<Utc>,
    pub location_city: String,
    pub location_address: Option<String>,
    pub seats: i32,
    pub description: Option<String>,
    pub phone: Option<String>,
    /// Seats held by accepted bookings
    pub accepted_seats: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CarpoolOffer {
    #[inline]
    pub fn remaining_seats(&self) -> i32 {
        (self.seats - self.accepted_seats).max(0)
    }

    /// Check a booking of `seats` fits
    pub fn ensure_room_for(&self, seats: i32) -> Result<(), DomainError> {
        if seats < 1 {
            return Err(DomainError::ValidationError(
                "seats must be at least 1".to_string(),
            ));
        }
        let remaining = self.remaining_seats();
        if seats > remaining {
            return Err(DomainError::NotEnoughSeats { remaining });
        }
        Ok(())
    }

    #[inline]
    pub fn is_owner(&self, user_id: Snowflake) -> bool {
        self.user_id == user_id
    }
}

/// Passenger looking for a ride
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarpoolRequest {
    pub id: Snowflake,
    pub edition_id: Snowflake,
    pub user_id: Snowflake,
    pub direction: TripDirection,
    pub trip_date: DateTime<Utc>,
    pub location_city: String,
    pub seats_needed: i32,
    pub description: Option<String>,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BookingStatus {
    Pending,
    Accepted,
    Rejected,
    Canceled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Accepted => "ACCEPTED",
            Self::Rejected => "REJECTED",
            Self::Canceled => "CANCELED",
        }
    }
}

impl FromStr for BookingStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(Self::Pending),
            "ACCEPTED" => Ok(Self::Accepted),
            "REJECTED" => Ok(Self::Rejected),
            "CANCELED" => Ok(Self::Canceled),
            other => Err(DomainError::invalid_value("booking status", other)),
        }
    }
}

/// Seat reservation on an offer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarpoolBooking {
    pub id: Snowflake,
    pub offer_id: Snowflake,
    pub requester_id: Snowflake,
    pub seats: i32,
    pub message: Option<String>,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offer(seats: i32, accepted: i32) -> CarpoolOffer {
        let now = Utc::now();
        CarpoolOffer {
            id: Snowflake::new(1),
            edition_id: Snowflake::new(100),
            user_id: Snowflake::new(7),
            direction: TripDirection::ToEvent,
            trip_date: now,
            location_city: "Grenoble".into(),
            location_address: None,
            seats,
            description: None,
            phone: None,
            accepted_seats: accepted,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_remaining_seats() {
        assert_eq!(offer(3, 1).remaining_seats(), 2);
        assert_eq!(offer(3, 5).remaining_seats(), 0);
    }

    #[test]
    fn test_ensure_room_for() {
        let o = offer(3, 1);
        assert!(o.ensure_room_for(2).is_ok());
        assert!(matches!(
            o.ensure_room_for(3),
            Err(DomainError::NotEnoughSeats { remaining: 2 })
        ));
        assert!(matches!(o.ensure_room_for(0), Err(DomainError::ValidationError(_))));
    }
}
