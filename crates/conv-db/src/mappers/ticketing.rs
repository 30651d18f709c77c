//! Ticketing mappers

use conv_core::entities::{
    CustomFieldMatch, ExternalTicketing, TicketingOption, TicketingOrder, TicketingOrderItem,
    TicketingQuota, TicketingTier,
};
use conv_core::error::DomainError;
use conv_core::value_objects::Snowflake;

use crate::models::{
    ExternalTicketingModel, OptionModel, OrderItemModel, OrderModel, QuotaCustomFieldModel,
    QuotaLinkModel, QuotaModel, TierModel,
};

impl From<TierModel> for TicketingTier {
    fn from(model: TierModel) -> Self {
        TicketingTier {
            id: Snowflake::new(model.id),
            edition_id: Snowflake::new(model.edition_id),
            name: model.name,
            description: model.description,
            price_cents: model.price_cents,
            position: model.position,
            is_active: model.is_active,
            external_id: model.external_id,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl TryFrom<OptionModel> for TicketingOption {
    type Error = DomainError;

    fn try_from(model: OptionModel) -> Result<Self, Self::Error> {
        Ok(TicketingOption {
            id: Snowflake::new(model.id),
            edition_id: Snowflake::new(model.edition_id),
            name: model.name,
            description: model.description,
            kind: model.kind.parse()?,
            choices: model.choices,
            is_required: model.is_required,
            position: model.position,
            external_name: model.external_name,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

impl From<OrderItemModel> for TicketingOrderItem {
    fn from(model: OrderItemModel) -> Self {
        TicketingOrderItem {
            id: Snowflake::new(model.id),
            order_id: Snowflake::new(model.order_id),
            tier_id: model.tier_id.map(Snowflake::new),
            external_id: model.external_id,
            name: model.name,
            first_name: model.first_name,
            last_name: model.last_name,
            amount_cents: model.amount_cents,
            options: model.options.0,
            custom_fields: model.custom_fields.0,
        }
    }
}

/// Build an order from its row, keeping only the item rows that belong to it
pub fn order_with_items(
    model: OrderModel,
    items: &[OrderItemModel],
) -> Result<TicketingOrder, DomainError> {
    Ok(TicketingOrder {
        id: Snowflake::new(model.id),
        edition_id: Snowflake::new(model.edition_id),
        external_id: model.external_id,
        payer_first_name: model.payer_first_name,
        payer_last_name: model.payer_last_name,
        payer_email: model.payer_email,
        amount_cents: model.amount_cents,
        status: model.status.parse()?,
        ordered_at: model.ordered_at,
        items: items
            .iter()
            .filter(|item| item.order_id == model.id)
            .cloned()
            .map(TicketingOrderItem::from)
            .collect(),
        created_at: model.created_at,
    })
}

/// Link rows of every quota in a batch
#[derive(Debug, Default)]
pub struct QuotaLinks {
    pub tiers: Vec<QuotaLinkModel>,
    pub options: Vec<QuotaLinkModel>,
    pub custom_fields: Vec<QuotaCustomFieldModel>,
}

/// Build a quota from its row and the link rows that belong to it
pub fn quota_with_links(model: QuotaModel, links: &QuotaLinks) -> TicketingQuota {
    let ids = |rows: &[QuotaLinkModel]| -> Vec<Snowflake> {
        rows.iter()
            .filter(|l| l.quota_id == model.id)
            .map(|l| Snowflake::new(l.target_id))
            .collect()
    };

    TicketingQuota {
        id: Snowflake::new(model.id),
        edition_id: Snowflake::new(model.edition_id),
        tier_ids: ids(&links.tiers),
        option_ids: ids(&links.options),
        custom_fields: links
            .custom_fields
            .iter()
            .filter(|f| f.quota_id == model.id)
            .map(|f| CustomFieldMatch {
                field_name: f.field_name.clone(),
                answer: f.answer.clone(),
            })
            .collect(),
        title: model.title,
        description: model.description,
        quantity: model.quantity,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

impl TryFrom<ExternalTicketingModel> for ExternalTicketing {
    type Error = DomainError;

    fn try_from(model: ExternalTicketingModel) -> Result<Self, Self::Error> {
        Ok(ExternalTicketing {
            id: Snowflake::new(model.id),
            edition_id: Snowflake::new(model.edition_id),
            provider: model.provider.parse()?,
            organization_slug: model.organization_slug,
            form_type: model.form_type,
            form_slug: model.form_slug,
            client_id: model.client_id,
            client_secret: model.client_secret,
            last_sync_at: model.last_sync_at,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
