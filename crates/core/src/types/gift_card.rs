//! Gift card configuration.
//!
//! Shoppers pick one of the preset amounts or enter their own, and choose
//! how the card is delivered. A custom amount, when entered, always wins
//! over the preset.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Preset gift card amounts in whole dollars.
pub const PRESET_AMOUNTS: [u32; 6] = [25, 50, 75, 100, 150, 200];

/// Preset selected when the configurator first opens.
pub const DEFAULT_AMOUNT: u32 = 50;

/// Smallest custom amount accepted.
pub const MIN_CUSTOM_AMOUNT: u32 = 10;

/// Largest custom amount accepted.
pub const MAX_CUSTOM_AMOUNT: u32 = 500;

/// Errors building a gift card selection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GiftCardError {
    #[error("{0} is not one of the preset gift card amounts")]
    UnknownPreset(u32),

    #[error("custom amount must be between 10 and 500, got {0}")]
    AmountOutOfRange(u32),

    #[error("unknown delivery method: {0}")]
    UnknownDelivery(String),
}

/// How the gift card reaches its recipient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryMethod {
    #[default]
    Email,
    Physical,
}

impl DeliveryMethod {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Physical => "physical",
        }
    }
}

impl std::str::FromStr for DeliveryMethod {
    type Err = GiftCardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "email" => Ok(Self::Email),
            "physical" => Ok(Self::Physical),
            other => Err(GiftCardError::UnknownDelivery(other.to_string())),
        }
    }
}

/// A shopper's gift card choices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GiftCardSelection {
    preset: u32,
    custom: Option<u32>,
    delivery: DeliveryMethod,
}

impl Default for GiftCardSelection {
    fn default() -> Self {
        Self {
            preset: DEFAULT_AMOUNT,
            custom: None,
            delivery: DeliveryMethod::default(),
        }
    }
}

impl GiftCardSelection {
    /// Select a preset amount, clearing any custom amount.
    ///
    /// # Errors
    ///
    /// Returns `UnknownPreset` if `amount` is not in [`PRESET_AMOUNTS`].
    pub fn with_preset(mut self, amount: u32) -> Result<Self, GiftCardError> {
        if !PRESET_AMOUNTS.contains(&amount) {
            return Err(GiftCardError::UnknownPreset(amount));
        }
        self.preset = amount;
        self.custom = None;
        Ok(self)
    }

    /// Apply the raw text of the custom amount field.
    ///
    /// Blank input clears the custom amount. Otherwise the leading digits are
    /// the amount (`"120abc"` is 120, `"12.5"` is 12); input that does not
    /// start with a digit counts as zero, which the configurator shows as `$0`.
    ///
    /// # Errors
    ///
    /// Returns `AmountOutOfRange` for numbers outside
    /// [`MIN_CUSTOM_AMOUNT`]..=[`MAX_CUSTOM_AMOUNT`].
    pub fn with_custom_input(mut self, raw: &str) -> Result<Self, GiftCardError> {
        let raw = raw.trim();
        if raw.is_empty() {
            self.custom = None;
            return Ok(self);
        }

        let Some(amount) = leading_amount(raw) else {
            self.custom = Some(0);
            return Ok(self);
        };

        if !(MIN_CUSTOM_AMOUNT..=MAX_CUSTOM_AMOUNT).contains(&amount) {
            return Err(GiftCardError::AmountOutOfRange(amount));
        }
        self.custom = Some(amount);
        Ok(self)
    }

    #[must_use]
    pub const fn with_delivery(mut self, delivery: DeliveryMethod) -> Self {
        self.delivery = delivery;
        self
    }

    /// The amount the card will carry.
    #[must_use]
    pub fn amount(&self) -> u32 {
        self.custom.unwrap_or(self.preset)
    }

    /// The highlighted preset, if no custom amount overrides it.
    #[must_use]
    pub const fn selected_preset(&self) -> Option<u32> {
        match self.custom {
            Some(_) => None,
            None => Some(self.preset),
        }
    }

    #[must_use]
    pub const fn delivery(&self) -> DeliveryMethod {
        self.delivery
    }
}

/// Whole number at the start of `raw`, after an optional `+`.
///
/// Digits beyond `u32::MAX` saturate so they still fail the range check.
fn leading_amount(raw: &str) -> Option<u32> {
    let digits = raw.strip_prefix('+').unwrap_or(raw);
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let digits = digits.get(..end).filter(|d| !d.is_empty())?;

    Some(digits.bytes().fold(0u32, |acc, b| {
        acc.saturating_mul(10).saturating_add(u32::from(b - b'0'))
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_selection() {
        let selection = GiftCardSelection::default();
        assert_eq!(selection.amount(), 50);
        assert_eq!(selection.selected_preset(), Some(50));
        assert_eq!(selection.delivery(), DeliveryMethod::Email);
    }

    #[test]
    fn test_custom_amount_overrides_preset() {
        let selection = GiftCardSelection::default()
            .with_preset(150)
            .and_then(|s| s.with_custom_input("75"))
            .expect("valid selection");
        assert_eq!(selection.amount(), 75);
        assert_eq!(selection.selected_preset(), None);
    }

    #[test]
    fn test_choosing_preset_clears_custom() {
        let selection = GiftCardSelection::default()
            .with_custom_input("320")
            .and_then(|s| s.with_preset(25))
            .expect("valid selection");
        assert_eq!(selection.amount(), 25);
    }

    #[test]
    fn test_garbage_custom_input_is_zero() {
        let selection = GiftCardSelection::default()
            .with_custom_input("lots")
            .expect("garbage is accepted");
        assert_eq!(selection.amount(), 0);
    }

    #[test]
    fn test_custom_input_uses_leading_digits() {
        let amount = |raw: &str| {
            GiftCardSelection::default()
                .with_custom_input(raw)
                .map(|s| s.amount())
        };

        assert_eq!(amount("120abc"), Ok(120));
        assert_eq!(amount("12.75"), Ok(12));
        assert_eq!(amount("+40"), Ok(40));
        assert_eq!(amount("$40"), Ok(0));
        assert_eq!(amount("-40"), Ok(0));
        assert_eq!(amount("5kg"), Err(GiftCardError::AmountOutOfRange(5)));
        assert_eq!(
            amount("99999999999"),
            Err(GiftCardError::AmountOutOfRange(u32::MAX))
        );
    }

    #[test]
    fn test_blank_custom_input_keeps_preset() {
        let selection = GiftCardSelection::default()
            .with_custom_input("   ")
            .expect("blank is accepted");
        assert_eq!(selection.amount(), DEFAULT_AMOUNT);
    }

    #[test]
    fn test_rejects_out_of_range_and_unknown_preset() {
        assert_eq!(
            GiftCardSelection::default().with_custom_input("9"),
            Err(GiftCardError::AmountOutOfRange(9))
        );
        assert_eq!(
            GiftCardSelection::default().with_custom_input("501"),
            Err(GiftCardError::AmountOutOfRange(501))
        );
        assert_eq!(
            GiftCardSelection::default().with_preset(60),
            Err(GiftCardError::UnknownPreset(60))
        );
    }

    #[test]
    fn test_delivery_method_parsing() {
        assert_eq!("physical".parse(), Ok(DeliveryMethod::Physical));
        assert!("pigeon".parse::<DeliveryMethod>().is_err());
        let selection = GiftCardSelection::default().with_delivery(DeliveryMethod::Physical);
        assert_eq!(selection.delivery().as_str(), "physical");
    }
}
