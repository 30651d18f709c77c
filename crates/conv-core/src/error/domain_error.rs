//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::Snowflake;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("User not found: {0}")]
    UserNotFound(Snowflake),

    #[error("Convention not found: {0}")]
    ConventionNotFound(Snowflake),

    #[error("Edition not found: {0}")]
    EditionNotFound(Snowflake),

    #[error("Collaborator not found")]
    CollaboratorNotFound,

    #[error("Volunteer application not found")]
    ApplicationNotFound,

    #[error("Volunteer team not found: {0}")]
    TeamNotFound(Snowflake),

    #[error("Time slot not found: {0}")]
    TimeSlotNotFound(Snowflake),

    #[error("Meal not found: {0}")]
    MealNotFound(Snowflake),

    #[error("Ticketing tier not found: {0}")]
    TierNotFound(Snowflake),

    #[error("Ticketing quota not found: {0}")]
    QuotaNotFound(Snowflake),

    #[error("Ticketing option not found: {0}")]
    OptionNotFound(Snowflake),

    #[error("Order not found: {0}")]
    OrderNotFound(Snowflake),

    #[error("No external ticketing configured for this edition")]
    ExternalTicketingNotConfigured,

    #[error("Notification not found: {0}")]
    NotificationNotFound(Snowflake),

    #[error("Push subscription not found")]
    SubscriptionNotFound,

    #[error("Carpool offer not found: {0}")]
    CarpoolOfferNotFound(Snowflake),

    #[error("Carpool request not found: {0}")]
    CarpoolRequestNotFound(Snowflake),

    #[error("Carpool booking not found: {0}")]
    BookingNotFound(Snowflake),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid arrival slot: {0}")]
    InvalidArrivalSlot(String),

    #[error("Invalid date range: {0}")]
    InvalidDateRange(String),

    #[error("At least one availability (setup, event, teardown) is required")]
    NoAvailabilitySelected,

    #[error("Meal {0} is not available for this volunteer")]
    MealNotEligible(Snowflake),

    #[error("Invalid {kind} value: {value}")]
    InvalidEnumValue { kind: &'static str, value: String },

    // =========================================================================
    // Authorization Errors
    // =========================================================================
    #[error("Missing right: {0}")]
    MissingRight(String),

    #[error("Only the owner can perform this action")]
    NotOwner,

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Email already in use")]
    EmailAlreadyExists,

    #[error("User is already a collaborator of this convention")]
    AlreadyCollaborator,

    #[error("Already applied to volunteer for this edition")]
    AlreadyApplied,

    #[error("A team with this name already exists")]
    TeamNameTaken,

    #[error("Volunteer already assigned to this time slot")]
    AlreadyAssigned,

    #[error("Order already imported")]
    OrderAlreadyExists,

    // =========================================================================
    // Business Rule Violations
    // =========================================================================
    #[error("The convention author cannot be added as a collaborator")]
    AuthorCannotBeCollaborator,

    #[error("Volunteer applications are closed for this edition")]
    VolunteersClosed,

    #[error("Application is no longer pending")]
    ApplicationNotPending,

    #[error("Volunteer application has not been accepted")]
    VolunteerNotAccepted,

    #[error("Time slot is full")]
    TimeSlotFull,

    #[error("Volunteer already has an overlapping time slot")]
    TimeSlotOverlap,

    #[error("Not enough seats left: {remaining} remaining")]
    NotEnoughSeats { remaining: i32 },

    #[error("Cannot book a seat on your own offer")]
    CannotBookOwnOffer,

    #[error("Booking is no longer pending")]
    BookingNotPending,

    #[error("Convention is archived")]
    ConventionArchived,

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::UserNotFound(_) => "UNKNOWN_USER",
            Self::ConventionNotFound(_) => "UNKNOWN_CONVENTION",
            Self::EditionNotFound(_) => "UNKNOWN_EDITION",
            Self::CollaboratorNotFound => "UNKNOWN_COLLABORATOR",
            Self::ApplicationNotFound => "UNKNOWN_APPLICATION",
            Self::TeamNotFound(_) => "UNKNOWN_TEAM",
            Self::TimeSlotNotFound(_) => "UNKNOWN_TIME_SLOT",
            Self::MealNotFound(_) => "UNKNOWN_MEAL",
            Self::TierNotFound(_) => "UNKNOWN_TIER",
            Self::QuotaNotFound(_) => "UNKNOWN_QUOTA",
            Self::OptionNotFound(_) => "UNKNOWN_OPTION",
            Self::OrderNotFound(_) => "UNKNOWN_ORDER",
            Self::ExternalTicketingNotConfigured => "EXTERNAL_TICKETING_NOT_CONFIGURED",
            Self::NotificationNotFound(_) => "UNKNOWN_NOTIFICATION",
            Self::SubscriptionNotFound => "UNKNOWN_SUBSCRIPTION",
            Self::CarpoolOfferNotFound(_) => "UNKNOWN_CARPOOL_OFFER",
            Self::CarpoolRequestNotFound(_) => "UNKNOWN_CARPOOL_REQUEST",
            Self::BookingNotFound(_) => "UNKNOWN_BOOKING",

            // Validation
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::InvalidArrivalSlot(_) => "INVALID_ARRIVAL_SLOT",
            Self::InvalidDateRange(_) => "INVALID_DATE_RANGE",
            Self::NoAvailabilitySelected => "NO_AVAILABILITY_SELECTED",
            Self::MealNotEligible(_) => "MEAL_NOT_ELIGIBLE",
            Self::InvalidEnumValue { .. } => "INVALID_VALUE",

            // Authorization
            Self::MissingRight(_) => "MISSING_RIGHTS",
            Self::NotOwner => "NOT_OWNER",

            // Conflict
            Self::EmailAlreadyExists => "EMAIL_ALREADY_EXISTS",
            Self::AlreadyCollaborator => "ALREADY_COLLABORATOR",
            Self::AlreadyApplied => "ALREADY_APPLIED",
            Self::TeamNameTaken => "TEAM_NAME_TAKEN",
            Self::AlreadyAssigned => "ALREADY_ASSIGNED",
            Self::OrderAlreadyExists => "ORDER_ALREADY_EXISTS",

            // Business Rules
            Self::AuthorCannotBeCollaborator => "AUTHOR_CANNOT_BE_COLLABORATOR",
            Self::VolunteersClosed => "VOLUNTEERS_CLOSED",
            Self::ApplicationNotPending => "APPLICATION_NOT_PENDING",
            Self::VolunteerNotAccepted => "VOLUNTEER_NOT_ACCEPTED",
            Self::TimeSlotFull => "TIME_SLOT_FULL",
            Self::TimeSlotOverlap => "TIME_SLOT_OVERLAP",
            Self::NotEnoughSeats { .. } => "NOT_ENOUGH_SEATS",
            Self::CannotBookOwnOffer => "CANNOT_BOOK_OWN_OFFER",
            Self::BookingNotPending => "BOOKING_NOT_PENDING",
            Self::ConventionArchived => "CONVENTION_ARCHIVED",

            // Infrastructure
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::UserNotFound(_)
                | Self::ConventionNotFound(_)
                | Self::EditionNotFound(_)
                | Self::CollaboratorNotFound
                | Self::ApplicationNotFound
                | Self::TeamNotFound(_)
                | Self::TimeSlotNotFound(_)
                | Self::MealNotFound(_)
                | Self::TierNotFound(_)
                | Self::QuotaNotFound(_)
                | Self::OptionNotFound(_)
                | Self::OrderNotFound(_)
                | Self::ExternalTicketingNotConfigured
                | Self::NotificationNotFound(_)
                | Self::SubscriptionNotFound
                | Self::CarpoolOfferNotFound(_)
                | Self::CarpoolRequestNotFound(_)
                | Self::BookingNotFound(_)
        )
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_)
                | Self::InvalidArrivalSlot(_)
                | Self::InvalidDateRange(_)
                | Self::NoAvailabilitySelected
                | Self::MealNotEligible(_)
                | Self::InvalidEnumValue { .. }
        )
    }

    /// Check if this is an authorization error
    pub fn is_authorization(&self) -> bool {
        matches!(self, Self::MissingRight(_) | Self::NotOwner)
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::EmailAlreadyExists
                | Self::AlreadyCollaborator
                | Self::AlreadyApplied
                | Self::TeamNameTaken
                | Self::AlreadyAssigned
                | Self::OrderAlreadyExists
        )
    }

    /// Check if this is a business rule violation (request well-formed but refused)
    pub fn is_business_rule(&self) -> bool {
        matches!(
            self,
            Self::AuthorCannotBeCollaborator
                | Self::VolunteersClosed
                | Self::ApplicationNotPending
                | Self::VolunteerNotAccepted
                | Self::TimeSlotFull
                | Self::TimeSlotOverlap
                | Self::NotEnoughSeats { .. }
                | Self::CannotBookOwnOffer
                | Self::BookingNotPending
                | Self::ConventionArchived
        )
    }

    /// HTTP-style status code for the error class
    pub fn status_code(&self) -> u16 {
        if self.is_not_found() {
            404
        } else if self.is_authorization() {
            403
        } else if self.is_validation() {
            400
        } else if self.is_conflict() {
            409
        } else if self.is_business_rule() {
            422
        } else {
            500
        }
    }

    pub fn invalid_value(kind: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidEnumValue {
            kind,
            value: value.into(),
        }
    }
}

impl From<crate::value_objects::ArrivalSlotError> for DomainError {
    fn from(err: crate::value_objects::ArrivalSlotError) -> Self {
        Self::InvalidArrivalSlot(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = DomainError::EditionNotFound(Snowflake::new(1));
        assert_eq!(err.code(), "UNKNOWN_EDITION");

        let err = DomainError::MissingRight("EDIT_EDITION".to_string());
        assert_eq!(err.code(), "MISSING_RIGHTS");
    }

    #[test]
    fn test_status_classes() {
        assert_eq!(DomainError::ApplicationNotFound.status_code(), 404);
        assert_eq!(DomainError::NotOwner.status_code(), 403);
        assert_eq!(DomainError::NoAvailabilitySelected.status_code(), 400);
        assert_eq!(DomainError::AlreadyApplied.status_code(), 409);
        assert_eq!(DomainError::NotEnoughSeats { remaining: 1 }.status_code(), 422);
        assert_eq!(DomainError::DatabaseError("x".into()).status_code(), 500);
    }

    #[test]
    fn test_error_display() {
        let err = DomainError::ConventionNotFound(Snowflake::new(123));
        assert_eq!(err.to_string(), "Convention not found: 123");

        let err = DomainError::invalid_value("status", "MAYBE");
        assert_eq!(err.to_string(), "Invalid status value: MAYBE");
    }

    #[test]
    fn test_arrival_error_conversion() {
        let err: DomainError = "nope"
            .parse::<crate::value_objects::ArrivalSlot>()
            .unwrap_err()
            .into();
        assert!(err.is_validation());
    }
}
