//! Carpool mappers

use conv_core::entities::{CarpoolBooking, CarpoolOffer, CarpoolRequest};
use conv_core::error::DomainError;
use conv_core::value_objects::Snowflake;

use crate::models::{CarpoolBookingModel, CarpoolOfferModel, CarpoolRequestModel};

impl TryFrom<CarpoolOfferModel> for CarpoolOffer {
    type Error = DomainError;

    fn try_from(model: CarpoolOfferModel) -> Result<Self, Self::Error> {
        Ok(CarpoolOffer {
            id: Snowflake::new(model.id),
            edition_id: Snowflake::new(model.edition_id),
            user_id: Snowflake::new(model.user_id),
            direction: model.direction.parse()?,
            trip_date: model.trip_date,
            location_city: model.location_city,
            location_address: model.location_address,
            seats: model.seats,
            description: model.description,
            phone: model.phone,
            accepted_seats: i32::try_from(model.accepted_seats).unwrap_or(i32::MAX),
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

impl TryFrom<CarpoolRequestModel> for CarpoolRequest {
    type Error = DomainError;

    fn try_from(model: CarpoolRequestModel) -> Result<Self, Self::Error> {
        Ok(CarpoolRequest {
            id: Snowflake::new(model.id),
            edition_id: Snowflake::new(model.edition_id),
            user_id: Snowflake::new(model.user_id),
            direction: model.direction.parse()?,
            trip_date: model.trip_date,
            location_city: model.location_city,
            seats_needed: model.seats_needed,
            description: model.description,
            phone: model.phone,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

impl TryFrom<CarpoolBookingModel> for CarpoolBooking {
    type Error = DomainError;

    fn try_from(model: CarpoolBookingModel) -> Result<Self, Self::Error> {
        Ok(CarpoolBooking {
            id: Snowflake::new(model.id),
            offer_id: Snowflake::new(model.offer_id),
            requester_id: Snowflake::new(model.requester_id),
            seats: model.seats,
            message: model.message,
            status: model.status.parse()?,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
