use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::UnknownStatus;
use crate::utils::error::{InventoryError, InventoryResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketClassStatus {
    Active,
    Inactive,
}

impl TicketClassStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketClassStatus::Active => "ACTIVE",
            TicketClassStatus::Inactive => "INACTIVE",
        }
    }
}

impl TryFrom<String> for TicketClassStatus {
    type Error = UnknownStatus;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "ACTIVE" => Ok(TicketClassStatus::Active),
            "INACTIVE" => Ok(TicketClassStatus::Inactive),
            _ => Err(UnknownStatus {
                kind: "ticket class",
                value,
            }),
        }
    }
}

/// A purchasable tier of tickets for one event.
///
/// `reserved` and `sold` are only ever changed through the capacity ledger; the
/// available quantity is derived, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct TicketClass {
    pub id: Uuid,
    pub event_id: Uuid,
    pub name: String,
    pub price: Decimal,
    pub currency: String,
    pub total: i32,
    pub reserved: i32,
    pub sold: i32,
    pub sale_start_at: Option<DateTime<Utc>>,
    pub sale_end_at: Option<DateTime<Utc>>,
    #[sqlx(try_from = "String")]
    pub status: TicketClassStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TicketClass {
    pub fn available(&self) -> i32 {
        self.total - self.reserved - self.sold
    }

    /// Active and inside the optional sale window.
    pub fn is_on_sale(&self, now: DateTime<Utc>) -> bool {
        if self.status != TicketClassStatus::Active {
            return false;
        }
        if self.sale_start_at.is_some_and(|start| now < start) {
            return false;
        }
        !self.sale_end_at.is_some_and(|end| now > end)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTicketClass {
    pub event_id: Uuid,
    pub name: String,
    pub price: Decimal,
    pub currency: String,
    pub total: i32,
    #[serde(default)]
    pub sale_start_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub sale_end_at: Option<DateTime<Utc>>,
}

impl NewTicketClass {
    pub fn validate(&self) -> InventoryResult<()> {
        if self.event_id.is_nil() {
            return Err(InventoryError::Validation("event_id is required".into()));
        }
        if self.name.trim().is_empty() {
            return Err(InventoryError::Validation("name is required".into()));
        }
        validate_name(&self.name)?;
        validate_price(self.price)?;
        if self.currency.trim().is_empty() {
            return Err(InventoryError::Validation("currency is required".into()));
        }
        validate_currency(&self.currency)?;
        if self.total <= 0 {
            return Err(InventoryError::Validation("total must be positive".into()));
        }
        validate_window(self.sale_start_at, self.sale_end_at)
    }

    pub fn into_ticket_class(self, now: DateTime<Utc>) -> TicketClass {
        TicketClass {
            id: Uuid::new_v4(),
            event_id: self.event_id,
            name: self.name.trim().to_string(),
            price: self.price,
            currency: self.currency.trim().to_uppercase(),
            total: self.total,
            reserved: 0,
            sold: 0,
            sale_start_at: self.sale_start_at,
            sale_end_at: self.sale_end_at,
            status: TicketClassStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update; `None` leaves a field untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TicketClassChanges {
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub currency: Option<String>,
    pub total: Option<i32>,
    pub sale_start_at: Option<DateTime<Utc>>,
    pub sale_end_at: Option<DateTime<Utc>>,
    pub status: Option<TicketClassStatus>,
}

impl TicketClassChanges {
    pub fn validate(&self) -> InventoryResult<()> {
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(InventoryError::Validation("name must not be blank".into()));
            }
            validate_name(name)?;
        }
        if let Some(price) = self.price {
            validate_price(price)?;
        }
        if let Some(currency) = &self.currency {
            if currency.trim().is_empty() {
                return Err(InventoryError::Validation(
                    "currency must not be blank".into(),
                ));
            }
            validate_currency(currency)?;
        }
        if self.total.is_some_and(|t| t <= 0) {
            return Err(InventoryError::Validation("total must be positive".into()));
        }
        Ok(())
    }

    /// Applies the changes to a locked row.
    ///
    /// Fails with `InvalidState` when the new total would drop below what is already
    /// held or sold, and with `Validation` when the resulting sale window is inverted.
    pub fn apply(&self, tc: &mut TicketClass, now: DateTime<Utc>) -> InventoryResult<()> {
        let mut next = tc.clone();
        if let Some(total) = self.total {
            if total < next.reserved + next.sold {
                return Err(InventoryError::InvalidState(format!(
                    "total {} is below reserved + sold ({})",
                    total,
                    next.reserved + next.sold
                )));
            }
            next.total = total;
        }
        if let Some(name) = &self.name {
            next.name = name.trim().to_string();
        }
        if let Some(price) = self.price {
            next.price = price;
        }
        if let Some(currency) = &self.currency {
            next.currency = currency.trim().to_uppercase();
        }
        if self.sale_start_at.is_some() {
            next.sale_start_at = self.sale_start_at;
        }
        if self.sale_end_at.is_some() {
            next.sale_end_at = self.sale_end_at;
        }
        if let Some(status) = self.status {
            next.status = status;
        }
        validate_window(next.sale_start_at, next.sale_end_at)?;
        next.updated_at = now;
        *tc = next;
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TicketClassFilter {
    pub event_id: Option<Uuid>,
    #[serde(default)]
    pub ids: Vec<Uuid>,
}

impl TicketClassFilter {
    pub fn matches(&self, tc: &TicketClass) -> bool {
        self.event_id.map_or(true, |event_id| tc.event_id == event_id)
            && (self.ids.is_empty() || self.ids.contains(&tc.id))
    }
}

/// Column limits of `ticket_classes`: `VARCHAR(255)` name, `VARCHAR(3)` currency,
/// `NUMERIC(12, 2)` price.
const MAX_NAME_CHARS: usize = 255;
const CURRENCY_CODE_LEN: usize = 3;
const MAX_PRICE_DIGITS_BEFORE_POINT: u32 = 10;

fn validate_name(name: &str) -> InventoryResult<()> {
    if name.trim().chars().count() > MAX_NAME_CHARS {
        return Err(InventoryError::Validation(format!(
            "name must be at most {MAX_NAME_CHARS} characters"
        )));
    }
    Ok(())
}

fn validate_currency(currency: &str) -> InventoryResult<()> {
    let code = currency.trim();
    if code.len() != CURRENCY_CODE_LEN || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(InventoryError::Validation(format!(
            "currency '{code}' must be a three-letter ISO 4217 code"
        )));
    }
    Ok(())
}

fn validate_price(price: Decimal) -> InventoryResult<()> {
    if price.is_sign_negative() {
        return Err(InventoryError::Validation(
            "price must not be negative".into(),
        ));
    }
    if price >= Decimal::from(10_i64.pow(MAX_PRICE_DIGITS_BEFORE_POINT)) {
        return Err(InventoryError::Validation("price is too large".into()));
    }
    if price.scale() > 2 && price.round_dp(2) != price {
        return Err(InventoryError::Validation(
            "price must have at most two decimal places".into(),
        ));
    }
    Ok(())
}

fn validate_window(
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
) -> InventoryResult<()> {
    match (start, end) {
        (Some(start), Some(end)) if start > end => Err(InventoryError::Validation(
            "sale_start_at must not be after sale_end_at".into(),
        )),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn new_class() -> NewTicketClass {
        NewTicketClass {
            event_id: Uuid::new_v4(),
            name: "VIP".to_string(),
            price: Decimal::new(12_500, 2),
            currency: "usd".to_string(),
            total: 100,
            sale_start_at: None,
            sale_end_at: None,
        }
    }

    #[test]
    fn test_new_ticket_class_validation() {
        assert!(new_class().validate().is_ok());

        let mut bad = new_class();
        bad.total = 0;
        assert!(matches!(bad.validate(), Err(InventoryError::Validation(_))));

        let mut bad = new_class();
        bad.name = "  ".into();
        assert!(bad.validate().is_err());

        let mut bad = new_class();
        bad.price = Decimal::new(-1, 0);
        assert!(bad.validate().is_err());

        let mut bad = new_class();
        let now = Utc::now();
        bad.sale_start_at = Some(now);
        bad.sale_end_at = Some(now - Duration::hours(1));
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_column_limits_are_validated() {
        let mut bad = new_class();
        bad.currency = "EURO".into();
        assert!(matches!(bad.validate(), Err(InventoryError::Validation(_))));

        let mut bad = new_class();
        bad.name = "x".repeat(256);
        assert!(matches!(bad.validate(), Err(InventoryError::Validation(_))));

        let mut bad = new_class();
        bad.price = Decimal::new(10_000_000_000, 0);
        assert!(bad.validate().is_err());

        let mut ok = new_class();
        ok.name = "x".repeat(255);
        ok.price = Decimal::new(999_999_999_999, 2);
        assert!(ok.validate().is_ok());

        let changes = TicketClassChanges {
            currency: Some("EURO".into()),
            ..Default::default()
        };
        assert!(matches!(
            changes.validate(),
            Err(InventoryError::Validation(_))
        ));
        let changes = TicketClassChanges {
            name: Some("y".repeat(300)),
            ..Default::default()
        };
        assert!(changes.validate().is_err());
    }

    #[test]
    fn test_available_is_derived() {
        let mut tc = new_class().into_ticket_class(Utc::now());
        tc.reserved = 30;
        tc.sold = 25;
        assert_eq!(tc.available(), 45);
        assert_eq!(tc.currency, "USD");
    }

    #[test]
    fn test_sale_window() {
        let now = Utc::now();
        let mut tc = new_class().into_ticket_class(now);
        assert!(tc.is_on_sale(now));

        tc.sale_start_at = Some(now + Duration::minutes(5));
        assert!(!tc.is_on_sale(now));

        tc.sale_start_at = None;
        tc.sale_end_at = Some(now - Duration::minutes(5));
        assert!(!tc.is_on_sale(now));

        tc.sale_end_at = None;
        tc.status = TicketClassStatus::Inactive;
        assert!(!tc.is_on_sale(now));
    }

    #[test]
    fn test_changes_cannot_shrink_below_held_capacity() {
        let now = Utc::now();
        let mut tc = new_class().into_ticket_class(now);
        tc.reserved = 10;
        tc.sold = 5;

        let shrink = TicketClassChanges {
            total: Some(14),
            ..Default::default()
        };
        assert!(matches!(
            shrink.apply(&mut tc, now),
            Err(InventoryError::InvalidState(_))
        ));
        assert_eq!(tc.total, 100);

        let ok = TicketClassChanges {
            total: Some(15),
            status: Some(TicketClassStatus::Inactive),
            ..Default::default()
        };
        ok.apply(&mut tc, now).unwrap();
        assert_eq!(tc.total, 15);
        assert_eq!(tc.status, TicketClassStatus::Inactive);
    }

    #[test]
    fn test_status_round_trips_through_text() {
        let status = TicketClassStatus::try_from("INACTIVE".to_string()).unwrap();
        assert_eq!(status.as_str(), "INACTIVE");
        assert!(TicketClassStatus::try_from("archived".to_string()).is_err());
    }
}
