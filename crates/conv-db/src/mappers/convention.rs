//! Convention and edition mappers

use conv_core::entities::{Convention, Edition};
use conv_core::value_objects::Snowflake;

use crate::models::{ConventionModel, EditionModel};

impl From<ConventionModel> for Convention {
    fn from(model: ConventionModel) -> Self {
        Convention {
            id: Snowflake::new(model.id),
            name: model.name,
            description: model.description,
            logo: model.logo,
            author_id: Snowflake::new(model.author_id),
            is_archived: model.is_archived,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<EditionModel> for Edition {
    fn from(model: EditionModel) -> Self {
        Edition {
            id: Snowflake::new(model.id),
            convention_id: Snowflake::new(model.convention_id),
            creator_id: Snowflake::new(model.creator_id),
            name: model.name,
            description: model.description,
            start_date: model.start_date,
            end_date: model.end_date,
            city: model.city,
            country: model.country,
            address: model.address,
            image: model.image,
            is_online: model.is_online,
            volunteers_open: model.volunteers_open,
            volunteer_setup_start: model.volunteer_setup_start,
            volunteer_teardown_end: model.volunteer_teardown_end,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
