//! Status enums for various entities.
//!
//! String forms match the backend's wire values exactly, so the same
//! strings work for serde, `Display`, and `FromStr` (CLI arguments).

use serde::{Deserialize, Serialize};

/// Generates `Display`, `FromStr` and an `ALL` table for a unit-only enum
/// from its `(variant, "wire")` pairs.
macro_rules! wire_enum {
    ($name:ident, $what:literal, [$(($variant:ident, $wire:literal)),+ $(,)?]) => {
        impl $name {
            /// Every value, in backend declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// The backend's string for this value.
            #[must_use]
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $wire),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim() {
                    $($wire => Ok(Self::$variant),)+
                    other => Err(format!(
                        concat!("invalid ", $what, ": {}. Must be one of: {}"),
                        other,
                        Self::ALL.iter().map(Self::as_str).collect::<Vec<_>>().join(", ")
                    )),
                }
            }
        }
    };
}

/// Order lifecycle status as tracked by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Cash order waiting to be processed.
    #[default]
    Pending,
    /// Online order waiting for the gateway to confirm payment.
    AwaitingPayment,
    Paid,
    Processing,
    Shipping,
    Delivered,
    Canceled,
}

wire_enum!(OrderStatus, "order status", [
    (Pending, "pending"),
    (AwaitingPayment, "awaiting_payment"),
    (Paid, "paid"),
    (Processing, "processing"),
    (Shipping, "shipping"),
    (Delivered, "delivered"),
    (Canceled, "canceled"),
]);

impl OrderStatus {
    /// Whether an order in this status contributes to revenue.
    #[must_use]
    pub const fn counts_as_revenue(&self) -> bool {
        matches!(
            self,
            Self::Paid | Self::Processing | Self::Shipping | Self::Delivered
        )
    }
}

/// Payment status reported by the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[default]
    Pending,
    WaitingForCapture,
    Succeeded,
    Canceled,
    /// Any status this client does not know about yet.
    #[serde(other)]
    Unknown,
}

wire_enum!(PaymentStatus, "payment status", [
    (Pending, "pending"),
    (WaitingForCapture, "waiting_for_capture"),
    (Succeeded, "succeeded"),
    (Canceled, "canceled"),
    (Unknown, "unknown"),
]);

/// How the shopper pays for an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Bank card through the payment gateway.
    #[default]
    Card,
    /// Faster Payments System through the payment gateway.
    Sbp,
    /// Cash on delivery; no gateway involvement.
    Cash,
}

wire_enum!(PaymentMethod, "payment method", [
    (Card, "card"),
    (Sbp, "sbp"),
    (Cash, "cash"),
]);

impl PaymentMethod {
    /// Whether this method goes through the payment gateway.
    #[must_use]
    pub const fn is_online(&self) -> bool {
        !matches!(self, Self::Cash)
    }

    /// Gateway payment-method code, if the method is paid online.
    #[must_use]
    pub const fn gateway_code(&self) -> Option<&'static str> {
        match self {
            Self::Card => Some("bank_card"),
            Self::Sbp => Some("sbp"),
            Self::Cash => None,
        }
    }
}

/// Fragrance category used for catalog navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductCategory {
    Men,
    Women,
    Unisex,
}

wire_enum!(ProductCategory, "category", [
    (Men, "men"),
    (Women, "women"),
    (Unisex, "unisex"),
]);

/// Admin role with different permission levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AdminRole {
    /// Store management, including catalog CSV import.
    #[default]
    Admin,
    /// Full access including admin account management.
    #[serde(rename = "superadmin")]
    SuperAdmin,
}

wire_enum!(AdminRole, "admin role", [
    (Admin, "admin"),
    (SuperAdmin, "superadmin"),
]);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_order_status_wire_values() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::AwaitingPayment).unwrap(),
            "\"awaiting_payment\""
        );
        assert_eq!(
            "shipping".parse::<OrderStatus>().unwrap(),
            OrderStatus::Shipping
        );
        assert_eq!(OrderStatus::Canceled.to_string(), "canceled");
    }

    #[test]
    fn test_order_status_parse_error_lists_values() {
        let err = "lost".parse::<OrderStatus>().unwrap_err();
        assert!(err.contains("pending, awaiting_payment, paid"));
    }

    #[test]
    fn test_revenue_statuses() {
        let revenue: Vec<_> = OrderStatus::ALL
            .iter()
            .filter(|s| s.counts_as_revenue())
            .collect();
        assert_eq!(revenue.len(), 4);
        assert!(!OrderStatus::Canceled.counts_as_revenue());
        assert!(!OrderStatus::AwaitingPayment.counts_as_revenue());
    }

    #[test]
    fn test_unknown_payment_status() {
        let status: PaymentStatus = serde_json::from_str("\"expired\"").unwrap();
        assert_eq!(status, PaymentStatus::Unknown);
    }

    #[test]
    fn test_payment_method_gateway_codes() {
        assert_eq!(PaymentMethod::Card.gateway_code(), Some("bank_card"));
        assert_eq!(PaymentMethod::Sbp.gateway_code(), Some("sbp"));
        assert_eq!(PaymentMethod::Cash.gateway_code(), None);
        assert!(!PaymentMethod::Cash.is_online());
    }

    #[test]
    fn test_admin_role_wire_values() {
        let role: AdminRole = serde_json::from_str("\"superadmin\"").unwrap();
        assert_eq!(role, AdminRole::SuperAdmin);
        assert_eq!("admin".parse::<AdminRole>().unwrap(), AdminRole::Admin);
    }
}
