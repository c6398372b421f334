//! Rule-based replies: substring matching for known support questions.
//!
//! Handles order tracking, refunds, the return policy, and address changes
//! without a network call. Anything else falls through to the delegate.

use uuid::Uuid;

use super::{BotReply, ReplySource};

/// Order id used when the customer does not name one.
pub const DEFAULT_ORDER_ID: &str = "12345";

pub const ORDER_STATUS_CONFIDENCE: f64 = 0.85;
pub const REFUND_STATUS_CONFIDENCE: f64 = 0.72;
pub const RETURN_POLICY_CONFIDENCE: f64 = 0.92;
pub const ADDRESS_CHANGE_CONFIDENCE: f64 = 0.88;

const RETURN_POLICY: &str = "Our return policy allows returns within 30 days of purchase. \
Items must be in original condition with tags attached. \
Free return shipping is provided for defective items.";

const ADDRESS_CHANGE: &str = "You can change your delivery address before your order ships. \
Please contact us with your order number and new address details.";

/// Simulated order record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderStatus {
    pub order_id: String,
    pub status: &'static str,
    pub eta: &'static str,
}

/// Simulated refund record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefundStatus {
    pub order_id: String,
    pub status: &'static str,
}

/// Look up an order in the simulated order table.
pub fn order_status(_user_id: Uuid, order_id: Option<&str>) -> OrderStatus {
    let order_id = order_id.unwrap_or(DEFAULT_ORDER_ID);
    let (status, eta) = match order_id {
        "12345" => ("In Transit", "2-3 business days"),
        "12346" => ("Delivered", "Completed"),
        "12347" => ("Processing", "1-2 business days"),
        _ => ("Not Found", "N/A"),
    };
    OrderStatus {
        order_id: order_id.to_string(),
        status,
        eta,
    }
}

/// Look up a refund in the simulated refund table.
pub fn refund_status(_user_id: Uuid, order_id: Option<&str>) -> RefundStatus {
    let order_id = order_id.unwrap_or(DEFAULT_ORDER_ID);
    let status = match order_id {
        "12345" => "Processing",
        "12346" => "Completed",
        "12347" => "Pending",
        _ => "Not Found",
    };
    RefundStatus {
        order_id: order_id.to_string(),
        status,
    }
}

/// Fixed rule table evaluated in priority order.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleBook;

impl RuleBook {
    pub fn new() -> Self {
        Self
    }

    /// Answer from the rule table, or `None` when no rule matches.
    pub fn answer(&self, message: &str, user_id: Uuid) -> Option<BotReply> {
        let lower = message.to_lowercase();

        // order tracking: "order status", "track my parcel", "where is my order"
        if (lower.contains("order") && lower.contains("status"))
            || lower.contains("track")
            || lower.contains("where is my order")
        {
            let order = order_status(user_id, None);
            return Some(rule_reply(
                format!(
                    "I found your order #{}. Status: {}. Expected delivery: {}.",
                    order.order_id, order.status, order.eta
                ),
                ORDER_STATUS_CONFIDENCE,
            ));
        }

        if lower.contains("refund") {
            let refund = refund_status(user_id, None);
            return Some(rule_reply(
                format!(
                    "Your refund for order #{} is currently {}.",
                    refund.order_id, refund.status
                ),
                REFUND_STATUS_CONFIDENCE,
            ));
        }

        if lower.contains("return policy") {
            return Some(rule_reply(RETURN_POLICY, RETURN_POLICY_CONFIDENCE));
        }

        if matches_any(&lower, &["delivery address", "change address"]) {
            return Some(rule_reply(ADDRESS_CHANGE, ADDRESS_CHANGE_CONFIDENCE));
        }

        None
    }
}

fn rule_reply(content: impl Into<String>, confidence: f64) -> BotReply {
    BotReply {
        content: content.into(),
        confidence,
        source: ReplySource::Rules,
    }
}

/// Check if text contains any of the given patterns.
fn matches_any(text: &str, patterns: &[&str]) -> bool {
    patterns.iter().any(|p| text.contains(p))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answer(text: &str) -> Option<BotReply> {
        RuleBook::new().answer(text, Uuid::nil())
    }

    // ── order tracking ───────────────────────────────────────────

    #[test]
    fn order_and_status_embeds_default_order() {
        for text in [
            "What is my order status?",
            "status of my ORDER please",
            "order... any status update?",
        ] {
            let reply = answer(text).unwrap_or_else(|| panic!("should match: {text}"));
            assert!(reply.content.contains("#12345"), "{text}");
            assert_eq!(reply.confidence, 0.85);
            assert_eq!(reply.source, ReplySource::Rules);
        }
    }

    #[test]
    fn track_alone_matches_order_rule() {
        let reply = answer("Can I track my parcel?").unwrap();
        assert_eq!(reply.confidence, ORDER_STATUS_CONFIDENCE);
        assert_eq!(
            reply.content,
            "I found your order #12345. Status: In Transit. Expected delivery: 2-3 business days."
        );
    }

    #[test]
    fn where_is_my_order_matches() {
        let reply = answer("Where is my order??").unwrap();
        assert_eq!(reply.confidence, 0.85);
    }

    #[test]
    fn order_without_status_does_not_match_order_rule() {
        assert!(answer("I want to place an order").is_none());
    }

    // ── refunds ──────────────────────────────────────────────────

    #[test]
    fn refund_reply() {
        let reply = answer("When will I get my refund?").unwrap();
        assert_eq!(reply.confidence, 0.72);
        assert_eq!(
            reply.content,
            "Your refund for order #12345 is currently Processing."
        );
    }

    #[test]
    fn track_beats_refund() {
        let reply = answer("track my refund").unwrap();
        assert_eq!(reply.confidence, ORDER_STATUS_CONFIDENCE);
        assert!(reply.content.starts_with("I found your order"));
    }

    // ── FAQ ──────────────────────────────────────────────────────

    #[test]
    fn return_policy_reply() {
        let reply = answer("What's your RETURN POLICY?").unwrap();
        assert_eq!(reply.confidence, 0.92);
        assert!(reply.content.contains("30 days"));
    }

    #[test]
    fn address_change_replies() {
        for text in ["How do I update my delivery address", "can I change address?"] {
            let reply = answer(text).unwrap();
            assert_eq!(reply.confidence, 0.88, "{text}");
            assert!(reply.content.contains("before your order ships"));
        }
    }

    #[test]
    fn unrelated_message_falls_through() {
        assert!(answer("Do you sell gift cards?").is_none());
        assert!(answer("hello").is_none());
    }

    // ── lookups ──────────────────────────────────────────────────

    #[test]
    fn order_lookup_table() {
        let delivered = order_status(Uuid::nil(), Some("12346"));
        assert_eq!(delivered.status, "Delivered");
        assert_eq!(delivered.eta, "Completed");

        let unknown = order_status(Uuid::nil(), Some("99999"));
        assert_eq!(unknown.status, "Not Found");
        assert_eq!(unknown.eta, "N/A");
        assert_eq!(unknown.order_id, "99999");
    }

    #[test]
    fn refund_lookup_table() {
        assert_eq!(refund_status(Uuid::nil(), Some("12347")).status, "Pending");
        assert_eq!(refund_status(Uuid::nil(), None).order_id, DEFAULT_ORDER_ID);
        assert_eq!(refund_status(Uuid::nil(), Some("1")).status, "Not Found");
    }
}
