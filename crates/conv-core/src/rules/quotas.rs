//! Ticketing quota statistics
//!
//! Each processed order item feeds a quota once for a linked tier, once per
//! linked option it carries and once per matching custom-field answer.

use std::collections::HashMap;

use crate::entities::{TicketingOption, TicketingOrder, TicketingOrderItem, TicketingQuota};
use crate::value_objects::Snowflake;

/// Usage of one quota
#[derive(Debug, Clone, PartialEq)]
pub struct QuotaStats {
    pub quota_id: Snowflake,
    pub title: String,
    pub quantity: i32,
    pub used: i32,
    pub remaining: i32,
    /// Percentage used, rounded to one decimal
    pub percentage: f64,
    pub is_full: bool,
}

impl QuotaStats {
    fn new(quota: &TicketingQuota, used: i32) -> Self {
        let quantity = quota.quantity;
        let percentage = if quantity > 0 {
            (f64::from(used) / f64::from(quantity) * 1000.0).round() / 10.0
        } else {
            0.0
        };
        Self {
            quota_id: quota.id,
            title: quota.title.clone(),
            quantity,
            used,
            remaining: (quantity - used).max(0),
            percentage,
            is_full: quantity > 0 && used >= quantity,
        }
    }
}

/// Trimmed, case-insensitive comparison
fn same_text(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

/// Hits one order item contributes to one quota
fn item_hits(
    quota: &TicketingQuota,
    option_names: &[&str],
    item: &TicketingOrderItem,
) -> i32 {
    let mut hits = 0;

    if item.tier_id.is_some_and(|tier| quota.tier_ids.contains(&tier)) {
        hits += 1;
    }

    hits += item
        .options
        .iter()
        .filter(|o| option_names.iter().any(|name| same_text(name, &o.name)))
        .count() as i32;

    hits += item
        .custom_fields
        .iter()
        .filter(|answer| {
            quota.custom_fields.iter().any(|expected| {
                same_text(&expected.field_name, &answer.name)
                    && same_text(&expected.answer, &answer.answer)
            })
        })
        .count() as i32;

    hits
}

/// Compute statistics for every quota, in quota order
pub fn compute_quota_stats(
    quotas: &[TicketingQuota],
    options: &[TicketingOption],
    orders: &[TicketingOrder],
) -> Vec<QuotaStats> {
    let options_by_id: HashMap<Snowflake, &TicketingOption> =
        options.iter().map(|o| (o.id, o)).collect();

    let items: Vec<&TicketingOrderItem> = orders
        .iter()
        .filter(|o| o.is_processed())
        .flat_map(|o| o.items.iter())
        .collect();

    quotas
        .iter()
        .map(|quota| {
            let option_names: Vec<&str> = quota
                .option_ids
                .iter()
                .filter_map(|id| options_by_id.get(id))
                .map(|o| o.match_name())
                .collect();

            let used = items
                .iter()
                .map(|item| item_hits(quota, &option_names, item))
                .sum();

            QuotaStats::new(quota, used)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{
        CustomFieldAnswer, CustomFieldMatch, ItemOption, OptionKind, OrderStatus,
    };
    use chrono::Utc;

    const TIER_FULL: i64 = 11;
    const TIER_DAY: i64 = 12;
    const OPT_MEAL: i64 = 21;

    fn quota(id: i64, quantity: i32) -> TicketingQuota {
        let now = Utc::now();
        TicketingQuota {
            id: Snowflake::new(id),
            edition_id: Snowflake::new(100),
            title: format!("Quota {id}"),
            description: None,
            quantity,
            tier_ids: vec![],
            option_ids: vec![],
            custom_fields: vec![],
            created_at: now,
            updated_at: now,
        }
    }

    fn meal_option() -> TicketingOption {
        let now = Utc::now();
        TicketingOption {
            id: Snowflake::new(OPT_MEAL),
            edition_id: Snowflake::new(100),
            name: "Repas".into(),
            description: None,
            kind: OptionKind::Checkbox,
            choices: vec![],
            is_required: false,
            position: 0,
            external_name: Some("Saturday Meal".into()),
            created_at: now,
            updated_at: now,
        }
    }

    fn item(tier: Option<i64>, options: &[&str], fields: &[(&str, &str)]) -> TicketingOrderItem {
        TicketingOrderItem {
            id: Snowflake::new(1),
            order_id: Snowflake::new(1),
            tier_id: tier.map(Snowflake::new),
            external_id: None,
            name: "Ticket".into(),
            first_name: None,
            last_name: None,
            amount_cents: 1000,
            options: options
                .iter()
                .map(|n| ItemOption {
                    name: (*n).to_string(),
                    amount_cents: 0,
                })
                .collect(),
            custom_fields: fields
                .iter()
                .map(|(n, a)| CustomFieldAnswer {
                    name: (*n).to_string(),
                    answer: (*a).to_string(),
                })
                .collect(),
        }
    }

    fn order(status: OrderStatus, items: Vec<TicketingOrderItem>) -> TicketingOrder {
        let now = Utc::now();
        TicketingOrder {
            id: Snowflake::new(1),
            edition_id: Snowflake::new(100),
            external_id: None,
            payer_first_name: "Ada".into(),
            payer_last_name: "L".into(),
            payer_email: "ada@example.com".into(),
            amount_cents: 1000,
            status,
            ordered_at: now,
            items,
            created_at: now,
        }
    }

    #[test]
    fn test_tier_counting() {
        let mut q = quota(1, 4);
        q.tier_ids = vec![Snowflake::new(TIER_FULL)];
        let orders = vec![order(
            OrderStatus::Processed,
            vec![
                item(Some(TIER_FULL), &[], &[]),
                item(Some(TIER_FULL), &[], &[]),
                item(Some(TIER_DAY), &[], &[]),
                item(None, &[], &[]),
            ],
        )];

        let stats = compute_quota_stats(&[q], &[], &orders);
        assert_eq!(stats[0].used, 2);
        assert_eq!(stats[0].remaining, 2);
        assert_eq!(stats[0].percentage, 50.0);
        assert!(!stats[0].is_full);
    }

    #[test]
    fn test_option_matches_external_name_case_insensitively() {
        let mut q = quota(1, 10);
        q.option_ids = vec![Snowflake::new(OPT_MEAL)];
        let orders = vec![order(
            OrderStatus::Processed,
            vec![
                item(None, &["saturday meal"], &[]),
                item(None, &["Repas"], &[]),
                item(None, &["SATURDAY MEAL", "T-shirt"], &[]),
            ],
        )];

        let stats = compute_quota_stats(&[q], &[meal_option()], &orders);
        assert_eq!(stats[0].used, 2);
    }

    #[test]
    fn test_option_falls_back_to_name() {
        let mut q = quota(1, 10);
        q.option_ids = vec![Snowflake::new(OPT_MEAL)];
        let mut option = meal_option();
        option.external_name = None;
        let orders = vec![order(OrderStatus::Processed, vec![item(None, &["repas"], &[])])];

        let stats = compute_quota_stats(&[q], &[option], &orders);
        assert_eq!(stats[0].used, 1);
    }

    #[test]
    fn test_custom_field_answers() {
        let mut q = quota(1, 3);
        q.custom_fields = vec![CustomFieldMatch {
            field_name: "Camping".into(),
            answer: "Oui".into(),
        }];
        let orders = vec![order(
            OrderStatus::Processed,
            vec![
                item(None, &[], &[("camping", "  oui ")]),
                item(None, &[], &[("Camping", "Non")]),
                item(None, &[], &[("Parking", "Oui")]),
                item(None, &[], &[("CAMPING", "OUI")]),
                item(None, &[], &[("Camping", "oui")]),
            ],
        )];

        let stats = compute_quota_stats(&[q], &[], &orders);
        assert_eq!(stats[0].used, 3);
        assert_eq!(stats[0].remaining, 0);
        assert!(stats[0].is_full);
        assert_eq!(stats[0].percentage, 100.0);
    }

    #[test]
    fn test_sources_add_up() {
        let mut q = quota(1, 3);
        q.tier_ids = vec![Snowflake::new(TIER_FULL)];
        q.option_ids = vec![Snowflake::new(OPT_MEAL)];
        q.custom_fields = vec![CustomFieldMatch {
            field_name: "Camping".into(),
            answer: "Oui".into(),
        }];
        let orders = vec![order(
            OrderStatus::Processed,
            vec![item(Some(TIER_FULL), &["Saturday Meal"], &[("Camping", "Oui")])],
        )];

        let stats = compute_quota_stats(&[q], &[meal_option()], &orders);
        assert_eq!(stats[0].used, 3);
    }

    #[test]
    fn test_refunded_and_canceled_orders_ignored() {
        let mut q = quota(1, 10);
        q.tier_ids = vec![Snowflake::new(TIER_FULL)];
        let orders = vec![
            order(OrderStatus::Refunded, vec![item(Some(TIER_FULL), &[], &[])]),
            order(OrderStatus::Canceled, vec![item(Some(TIER_FULL), &[], &[])]),
            order(OrderStatus::Processed, vec![item(Some(TIER_FULL), &[], &[])]),
        ];

        let stats = compute_quota_stats(&[q], &[], &orders);
        assert_eq!(stats[0].used, 1);
    }

    #[test]
    fn test_overflow_and_zero_quantity() {
        let mut over = quota(1, 1);
        over.tier_ids = vec![Snowflake::new(TIER_FULL)];
        let mut zero = quota(2, 0);
        zero.tier_ids = vec![Snowflake::new(TIER_FULL)];
        let orders = vec![order(
            OrderStatus::Processed,
            vec![item(Some(TIER_FULL), &[], &[]), item(Some(TIER_FULL), &[], &[])],
        )];

        let stats = compute_quota_stats(&[over, zero], &[], &orders);
        assert_eq!(stats[0].remaining, 0);
        assert_eq!(stats[0].percentage, 200.0);
        assert!(stats[0].is_full);

        assert_eq!(stats[1].quota_id, Snowflake::new(2));
        assert_eq!(stats[1].percentage, 0.0);
        assert!(!stats[1].is_full);
    }

    #[test]
    fn test_percentage_rounding() {
        let mut q = quota(1, 3);
        q.tier_ids = vec![Snowflake::new(TIER_FULL)];
        let orders = vec![order(OrderStatus::Processed, vec![item(Some(TIER_FULL), &[], &[])])];

        let stats = compute_quota_stats(&[q], &[], &orders);
        assert_eq!(stats[0].percentage, 33.3);
    }
}
