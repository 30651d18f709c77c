//! Value objects - immutable types that represent domain concepts

mod arrival;
mod rights;
mod snowflake;

pub use arrival::{ArrivalSlot, ArrivalSlotError, TimeOfDay};
pub use rights::{CollaboratorRights, EditionRights};
pub use snowflake::{Snowflake, SnowflakeGenerator, SnowflakeParseError};
