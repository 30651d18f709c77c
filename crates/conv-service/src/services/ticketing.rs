//! Ticketing service
//!
//! Tiers, quotas, options and orders of an edition, plus quota statistics.
//! Writes need edition edit rights; management reads need any management
//! access. The tier list is public.

use chrono::Utc;
use conv_core::entities::{
    CustomFieldMatch, OptionKind, OrderStatus, TicketingOption, TicketingOrder,
    TicketingOrderItem, TicketingQuota, TicketingTier,
};
use conv_core::rules::compute_quota_stats;
use conv_core::{Capability, DomainError, Page, Snowflake};
use tracing::{info, instrument};

use crate::dto::{
    CreateOptionRequest, CreateOrderRequest, CreateQuotaRequest, CreateTierRequest,
    CustomFieldLinkRequest, OptionResponse, OrderResponse, PaginatedResponse, QuotaResponse,
    QuotaStatsResponse, TierResponse, UpdateOptionRequest, UpdateQuotaRequest, UpdateTierRequest,
};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::permission::PermissionService;
use super::probe;

/// Build a manual (on-site) order; item names and amounts default to the tier's
pub fn build_manual_order(
    order_id: Snowflake,
    edition_id: Snowflake,
    tiers: &[TicketingTier],
    request: CreateOrderRequest,
    mut next_id: impl FnMut() -> Snowflake,
) -> Result<TicketingOrder, DomainError> {
    let mut items = Vec::with_capacity(request.items.len());
    for input in request.items {
        let tier = match input.tier_id {
            Some(tier_id) => Some(
                tiers
                    .iter()
                    .find(|t| t.id == tier_id)
                    .ok_or(DomainError::TierNotFound(tier_id))?,
            ),
            None => None,
        };
        let name = input
            .name
            .or_else(|| tier.map(|t| t.name.clone()))
            .ok_or_else(|| {
                DomainError::ValidationError("item name or tier_id is required".to_string())
            })?;
        let options_total: i32 = input.options.iter().map(|o| o.amount_cents).sum();
        let amount_cents = input
            .amount_cents
            .unwrap_or_else(|| tier.map_or(0, |t| t.price_cents) + options_total);

        items.push(TicketingOrderItem {
            id: next_id(),
            order_id,
            tier_id: tier.map(|t| t.id),
            external_id: None,
            name,
            first_name: input.first_name,
            last_name: input.last_name,
            amount_cents,
            options: input.options,
            custom_fields: input.custom_fields,
        });
    }

    let now = Utc::now();
    Ok(TicketingOrder {
        id: order_id,
        edition_id,
        external_id: None,
        payer_first_name: request.payer_first_name,
        payer_last_name: request.payer_last_name,
        payer_email: request.payer_email,
        amount_cents: items.iter().map(|i| i.amount_cents).sum(),
        status: OrderStatus::Processed,
        ordered_at: now,
        items,
        created_at: now,
    })
}

/// Ticketing service
pub struct TicketingService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> TicketingService<'a> {
    /// Create a new TicketingService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    async fn require(
        &self,
        user_id: Snowflake,
        edition_id: Snowflake,
        capability: Capability,
    ) -> ServiceResult<()> {
        PermissionService::new(self.ctx)
            .require_edition(user_id, edition_id, capability)
            .await
            .map(|_| ())
    }

    // === Tiers ===

    #[instrument(skip(self))]
    pub async fn list_tiers(&self, edition_id: Snowflake) -> ServiceResult<Vec<TierResponse>> {
        PermissionService::new(self.ctx).load_edition(edition_id).await?;
        let tiers = self.ctx.tier_repo().find_by_edition(edition_id).await?;
        Ok(tiers.iter().map(TierResponse::from).collect())
    }

    #[instrument(skip(self, request))]
    pub async fn create_tier(
        &self,
        edition_id: Snowflake,
        user_id: Snowflake,
        request: CreateTierRequest,
    ) -> ServiceResult<TierResponse> {
        self.require(user_id, edition_id, Capability::EditEdition).await?;

        let now = Utc::now();
        let tier = TicketingTier {
            id: self.ctx.generate_id(),
            edition_id,
            name: request.name,
            description: request.description,
            price_cents: request.price_cents,
            position: request.position,
            is_active: request.is_active,
            external_id: None,
            created_at: now,
            updated_at: now,
        };
        self.ctx.tier_repo().create(&tier).await?;

        info!(tier_id = %tier.id, edition_id = %edition_id, "Tier created");

        Ok(TierResponse::from(&tier))
    }

    #[instrument(skip(self, request))]
    pub async fn update_tier(
        &self,
        edition_id: Snowflake,
        tier_id: Snowflake,
        user_id: Snowflake,
        request: UpdateTierRequest,
    ) -> ServiceResult<TierResponse> {
        self.require(user_id, edition_id, Capability::EditEdition).await?;
        let mut tier = self.find_tier(edition_id, tier_id).await?;

        if let Some(name) = request.name {
            tier.name = name;
        }
        if let Some(description) = request.description {
            tier.description = Some(description);
        }
        if let Some(price) = request.price_cents {
            tier.price_cents = price;
        }
        if let Some(position) = request.position {
            tier.position = position;
        }
        if let Some(active) = request.is_active {
            tier.is_active = active;
        }
        tier.updated_at = Utc::now();

        self.ctx.tier_repo().update(&tier).await?;

        info!(tier_id = %tier_id, "Tier updated");

        Ok(TierResponse::from(&tier))
    }

    #[instrument(skip(self))]
    pub async fn delete_tier(
        &self,
        edition_id: Snowflake,
        tier_id: Snowflake,
        user_id: Snowflake,
    ) -> ServiceResult<()> {
        self.require(user_id, edition_id, Capability::EditEdition).await?;
        self.find_tier(edition_id, tier_id).await?;
        self.ctx.tier_repo().delete(tier_id).await?;
        info!(tier_id = %tier_id, "Tier deleted");
        Ok(())
    }

    // === Quotas ===

    #[instrument(skip(self))]
    pub async fn list_quotas(
        &self,
        edition_id: Snowflake,
        user_id: Snowflake,
    ) -> ServiceResult<Vec<QuotaResponse>> {
        self.require(user_id, edition_id, Capability::AccessManagement).await?;
        let quotas = self.ctx.quota_repo().find_by_edition(edition_id).await?;
        Ok(quotas.iter().map(QuotaResponse::from).collect())
    }

    #[instrument(skip(self, request))]
    pub async fn create_quota(
        &self,
        edition_id: Snowflake,
        user_id: Snowflake,
        request: CreateQuotaRequest,
    ) -> ServiceResult<QuotaResponse> {
        self.require(user_id, edition_id, Capability::EditEdition).await?;

        let now = Utc::now();
        let quota = TicketingQuota {
            id: self.ctx.generate_id(),
            edition_id,
            title: request.title,
            description: request.description,
            quantity: request.quantity,
            tier_ids: Vec::new(),
            option_ids: Vec::new(),
            custom_fields: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        self.ctx.quota_repo().create(&quota).await?;

        info!(quota_id = %quota.id, edition_id = %edition_id, "Quota created");

        Ok(QuotaResponse::from(&quota))
    }

    #[instrument(skip(self, request))]
    pub async fn update_quota(
        &self,
        edition_id: Snowflake,
        quota_id: Snowflake,
        user_id: Snowflake,
        request: UpdateQuotaRequest,
    ) -> ServiceResult<QuotaResponse> {
        self.require(user_id, edition_id, Capability::EditEdition).await?;
        let mut quota = self.find_quota(edition_id, quota_id).await?;

        if let Some(title) = request.title {
            quota.title = title;
        }
        if let Some(description) = request.description {
            quota.description = Some(description);
        }
        if let Some(quantity) = request.quantity {
            quota.quantity = quantity;
        }
        quota.updated_at = Utc::now();

        self.ctx.quota_repo().update(&quota).await?;

        info!(quota_id = %quota_id, "Quota updated");

        Ok(QuotaResponse::from(&quota))
    }

    #[instrument(skip(self))]
    pub async fn delete_quota(
        &self,
        edition_id: Snowflake,
        quota_id: Snowflake,
        user_id: Snowflake,
    ) -> ServiceResult<()> {
        self.require(user_id, edition_id, Capability::EditEdition).await?;
        self.find_quota(edition_id, quota_id).await?;
        self.ctx.quota_repo().delete(quota_id).await?;
        info!(quota_id = %quota_id, "Quota deleted");
        Ok(())
    }

    /// Link or unlink a tier feeding the quota
    #[instrument(skip(self))]
    pub async fn set_quota_tier(
        &self,
        edition_id: Snowflake,
        quota_id: Snowflake,
        tier_id: Snowflake,
        user_id: Snowflake,
        linked: bool,
    ) -> ServiceResult<QuotaResponse> {
        self.require(user_id, edition_id, Capability::EditEdition).await?;
        self.find_quota(edition_id, quota_id).await?;
        self.find_tier(edition_id, tier_id).await?;

        if linked {
            self.ctx.quota_repo().link_tier(quota_id, tier_id).await?;
        } else if !self.ctx.quota_repo().unlink_tier(quota_id, tier_id).await? {
            return Err(ServiceError::not_found("Quota tier link", tier_id));
        }

        self.find_quota(edition_id, quota_id)
            .await
            .map(|q| QuotaResponse::from(&q))
    }

    /// Link or unlink an option feeding the quota
    #[instrument(skip(self))]
    pub async fn set_quota_option(
        &self,
        edition_id: Snowflake,
        quota_id: Snowflake,
        option_id: Snowflake,
        user_id: Snowflake,
        linked: bool,
    ) -> ServiceResult<QuotaResponse> {
        self.require(user_id, edition_id, Capability::EditEdition).await?;
        self.find_quota(edition_id, quota_id).await?;
        self.find_option(edition_id, option_id).await?;

        if linked {
            self.ctx.quota_repo().link_option(quota_id, option_id).await?;
        } else if !self.ctx.quota_repo().unlink_option(quota_id, option_id).await? {
            return Err(ServiceError::not_found("Quota option link", option_id));
        }

        self.find_quota(edition_id, quota_id)
            .await
            .map(|q| QuotaResponse::from(&q))
    }

    /// Link or unlink a custom-field answer feeding the quota
    #[instrument(skip(self, request))]
    pub async fn set_quota_custom_field(
        &self,
        edition_id: Snowflake,
        quota_id: Snowflake,
        user_id: Snowflake,
        request: CustomFieldLinkRequest,
        linked: bool,
    ) -> ServiceResult<QuotaResponse> {
        self.require(user_id, edition_id, Capability::EditEdition).await?;
        self.find_quota(edition_id, quota_id).await?;

        let field = CustomFieldMatch {
            field_name: request.field_name.trim().to_string(),
            answer: request.answer.trim().to_string(),
        };
        if linked {
            self.ctx.quota_repo().add_custom_field(quota_id, &field).await?;
        } else if !self
            .ctx
            .quota_repo()
            .remove_custom_field(quota_id, &field)
            .await?
        {
            return Err(ServiceError::not_found("Quota custom field", &field.field_name));
        }

        self.find_quota(edition_id, quota_id)
            .await
            .map(|q| QuotaResponse::from(&q))
    }

    /// Usage of every quota over processed orders
    #[instrument(skip(self))]
    pub async fn quota_stats(
        &self,
        edition_id: Snowflake,
        user_id: Snowflake,
    ) -> ServiceResult<Vec<QuotaStatsResponse>> {
        self.require(user_id, edition_id, Capability::AccessManagement).await?;

        let quotas = self.ctx.quota_repo().find_by_edition(edition_id).await?;
        let options = self.ctx.option_repo().find_by_edition(edition_id).await?;
        let orders = self.ctx.order_repo().find_all_by_edition(edition_id).await?;

        Ok(compute_quota_stats(&quotas, &options, &orders)
            .iter()
            .map(QuotaStatsResponse::from)
            .collect())
    }

    // === Options ===

    #[instrument(skip(self))]
    pub async fn list_options(
        &self,
        edition_id: Snowflake,
        user_id: Snowflake,
    ) -> ServiceResult<Vec<OptionResponse>> {
        self.require(user_id, edition_id, Capability::AccessManagement).await?;
        let options = self.ctx.option_repo().find_by_edition(edition_id).await?;
        Ok(options.iter().map(OptionResponse::from).collect())
    }

    #[instrument(skip(self, request))]
    pub async fn create_option(
        &self,
        edition_id: Snowflake,
        user_id: Snowflake,
        request: CreateOptionRequest,
    ) -> ServiceResult<OptionResponse> {
        self.require(user_id, edition_id, Capability::EditEdition).await?;

        let now = Utc::now();
        let option = TicketingOption {
            id: self.ctx.generate_id(),
            edition_id,
            name: request.name,
            description: request.description,
            kind: request.kind.parse::<OptionKind>()?,
            choices: request.choices,
            is_required: request.is_required,
            position: request.position,
            external_name: request.external_name,
            created_at: now,
            updated_at: now,
        };
        self.ctx.option_repo().create(&option).await?;

        info!(option_id = %option.id, edition_id = %edition_id, "Option created");

        Ok(OptionResponse::from(&option))
    }

    #[instrument(skip(self, request))]
    pub async fn update_option(
        &self,
        edition_id: Snowflake,
        option_id: Snowflake,
        user_id: Snowflake,
        request: UpdateOptionRequest,
    ) -> ServiceResult<OptionResponse> {
        self.require(user_id, edition_id, Capability::EditEdition).await?;
        let mut option = self.find_option(edition_id, option_id).await?;

        if let Some(name) = request.name {
            option.name = name;
        }
        if let Some(description) = request.description {
            option.description = Some(description);
        }
        if let Some(kind) = request.kind {
            option.kind = kind.parse::<OptionKind>()?;
        }
        if let Some(choices) = request.choices {
            option.choices = choices;
        }
        if let Some(required) = request.is_required {
            option.is_required = required;
        }
        if let Some(position) = request.position {
            option.position = position;
        }
        if let Some(external_name) = request.external_name {
            option.external_name = Some(external_name);
        }
        option.updated_at = Utc::now();

        self.ctx.option_repo().update(&option).await?;

        info!(option_id = %option_id, "Option updated");

        Ok(OptionResponse::from(&option))
    }

    #[instrument(skip(self))]
    pub async fn delete_option(
        &self,
        edition_id: Snowflake,
        option_id: Snowflake,
        user_id: Snowflake,
    ) -> ServiceResult<()> {
        self.require(user_id, edition_id, Capability::EditEdition).await?;
        self.find_option(edition_id, option_id).await?;
        self.ctx.option_repo().delete(option_id).await?;
        info!(option_id = %option_id, "Option deleted");
        Ok(())
    }

    // === Orders ===

    /// Newest first
    #[instrument(skip(self))]
    pub async fn list_orders(
        &self,
        edition_id: Snowflake,
        user_id: Snowflake,
        page: Page,
    ) -> ServiceResult<PaginatedResponse<OrderResponse>> {
        self.require(user_id, edition_id, Capability::AccessManagement).await?;
        let orders = self
            .ctx
            .order_repo()
            .find_by_edition(edition_id, probe(page))
            .await?;
        Ok(PaginatedResponse::from_probe(
            orders.iter().map(OrderResponse::from).collect(),
            page.limit,
            page.offset,
        ))
    }

    #[instrument(skip(self))]
    pub async fn get_order(
        &self,
        edition_id: Snowflake,
        order_id: Snowflake,
        user_id: Snowflake,
    ) -> ServiceResult<OrderResponse> {
        self.require(user_id, edition_id, Capability::AccessManagement).await?;
        let order = self
            .ctx
            .order_repo()
            .find_by_id(order_id)
            .await?
            .filter(|o| o.edition_id == edition_id)
            .ok_or(DomainError::OrderNotFound(order_id))?;
        Ok(OrderResponse::from(&order))
    }

    /// Record an on-site sale
    #[instrument(skip(self, request))]
    pub async fn create_order(
        &self,
        edition_id: Snowflake,
        user_id: Snowflake,
        request: CreateOrderRequest,
    ) -> ServiceResult<OrderResponse> {
        self.require(user_id, edition_id, Capability::EditEdition).await?;

        let tiers = self.ctx.tier_repo().find_by_edition(edition_id).await?;
        let order = build_manual_order(
            self.ctx.generate_id(),
            edition_id,
            &tiers,
            request,
            || self.ctx.generate_id(),
        )?;
        self.ctx.order_repo().create(&order).await?;

        info!(
            order_id = %order.id,
            edition_id = %edition_id,
            items = order.items.len(),
            "Manual order recorded"
        );

        Ok(OrderResponse::from(&order))
    }

    // === Lookups scoped to the edition ===

    async fn find_tier(
        &self,
        edition_id: Snowflake,
        tier_id: Snowflake,
    ) -> ServiceResult<TicketingTier> {
        self.ctx
            .tier_repo()
            .find_by_id(tier_id)
            .await?
            .filter(|t| t.edition_id == edition_id)
            .ok_or_else(|| DomainError::TierNotFound(tier_id).into())
    }

    async fn find_quota(
        &self,
        edition_id: Snowflake,
        quota_id: Snowflake,
    ) -> ServiceResult<TicketingQuota> {
        self.ctx
            .quota_repo()
            .find_by_id(quota_id)
            .await?
            .filter(|q| q.edition_id == edition_id)
            .ok_or_else(|| DomainError::QuotaNotFound(quota_id).into())
    }

    async fn find_option(
        &self,
        edition_id: Snowflake,
        option_id: Snowflake,
    ) -> ServiceResult<TicketingOption> {
        self.ctx
            .option_repo()
            .find_by_id(option_id)
            .await?
            .filter(|o| o.edition_id == edition_id)
            .ok_or_else(|| DomainError::OptionNotFound(option_id).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::OrderItemInput;
    use conv_core::ItemOption;

    fn tier() -> TicketingTier {
        let now = Utc::now();
        TicketingTier {
            id: Snowflake::new(7),
            edition_id: Snowflake::new(1),
            name: "Full pass".into(),
            description: None,
            price_cents: 4500,
            position: 0,
            is_active: true,
            external_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn item(tier_id: Option<i64>, name: Option<&str>) -> OrderItemInput {
        OrderItemInput {
            tier_id: tier_id.map(Snowflake::new),
            name: name.map(str::to_string),
            first_name: Some("Ada".into()),
            last_name: None,
            amount_cents: None,
            options: vec![],
            custom_fields: vec![],
        }
    }

    fn request(items: Vec<OrderItemInput>) -> CreateOrderRequest {
        CreateOrderRequest {
            payer_first_name: "Ada".into(),
            payer_last_name: "Lovelace".into(),
            payer_email: "ada@example.com".into(),
            items,
        }
    }

    fn ids() -> impl FnMut() -> Snowflake {
        let mut next = 100;
        move || {
            next += 1;
            Snowflake::new(next)
        }
    }

    #[test]
    fn test_manual_order_defaults_from_tier() {
        let mut with_option = item(Some(7), None);
        with_option.options = vec![ItemOption {
            name: "T-shirt".into(),
            amount_cents: 1500,
        }];

        let order = build_manual_order(
            Snowflake::new(1),
            Snowflake::new(1),
            &[tier()],
            request(vec![with_option, item(None, Some("Donation"))]),
            ids(),
        )
        .unwrap();

        assert_eq!(order.status, OrderStatus::Processed);
        assert_eq!(order.items[0].name, "Full pass");
        assert_eq!(order.items[0].amount_cents, 6000);
        assert_eq!(order.items[1].amount_cents, 0);
        assert_eq!(order.amount_cents, 6000);
        assert_eq!(order.items[0].id, Snowflake::new(101));
    }

    #[test]
    fn test_manual_order_rejects_unknown_tier_or_nameless_item() {
        let err = build_manual_order(
            Snowflake::new(1),
            Snowflake::new(1),
            &[tier()],
            request(vec![item(Some(99), None)]),
            ids(),
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::TierNotFound(_)));

        let err = build_manual_order(
            Snowflake::new(1),
            Snowflake::new(1),
            &[],
            request(vec![item(None, None)]),
            ids(),
        )
        .unwrap_err();
        assert!(err.is_validation());
    }
}
