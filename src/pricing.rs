//! Purchase price computation.
//!
//! The quote is a pure function of the list price, the selected options and
//! the fee rate. Callers recompute it on every read instead of storing it.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::{ArtifyError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrintSize {
    Small,
    #[default]
    Original,
    Large,
}

impl PrintSize {
    pub fn multiplier(self) -> Decimal {
        match self {
            PrintSize::Small => Decimal::new(7, 1),
            PrintSize::Original => Decimal::ONE,
            PrintSize::Large => Decimal::new(15, 1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameOption {
    #[default]
    None,
    Wood,
    Metal,
    Floating,
}

impl FrameOption {
    pub fn surcharge(self) -> Decimal {
        match self {
            FrameOption::None => Decimal::ZERO,
            FrameOption::Wood => Decimal::from(200),
            FrameOption::Metal => Decimal::from(350),
            FrameOption::Floating => Decimal::from(450),
        }
    }
}

impl fmt::Display for PrintSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PrintSize::Small => "small",
            PrintSize::Original => "original",
            PrintSize::Large => "large",
        };
        f.write_str(name)
    }
}

impl FromStr for PrintSize {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "small" => Ok(PrintSize::Small),
            "original" => Ok(PrintSize::Original),
            "large" => Ok(PrintSize::Large),
            other => Err(format!("unknown size '{other}' (expected small, original or large)")),
        }
    }
}

impl fmt::Display for FrameOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FrameOption::None => "none",
            FrameOption::Wood => "wood",
            FrameOption::Metal => "metal",
            FrameOption::Floating => "floating",
        };
        f.write_str(name)
    }
}

impl FromStr for FrameOption {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(FrameOption::None),
            "wood" => Ok(FrameOption::Wood),
            "metal" => Ok(FrameOption::Metal),
            "floating" => Ok(FrameOption::Floating),
            other => Err(format!(
                "unknown frame '{other}' (expected none, wood, metal or floating)"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PurchaseOptions {
    pub size: PrintSize,
    pub frame: FrameOption,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub list_price: Decimal,
    /// List price after size and frame adjustments
    pub base_price: Decimal,
    pub authentication_fee: Decimal,
    pub total_price: Decimal,
    pub currency: String,
}

/// `total = round(base * (1 + fee_rate))`, whole currency units, midpoint away from zero.
pub fn total_price(base_price: Decimal, fee_rate: Decimal) -> Result<Decimal> {
    if base_price <= Decimal::ZERO {
        return Err(ArtifyError::InvalidPrice(format!(
            "base price must be positive, got {base_price}"
        )));
    }
    if fee_rate < Decimal::ZERO {
        return Err(ArtifyError::InvalidPrice(format!(
            "fee rate must not be negative, got {fee_rate}"
        )));
    }
    Ok((base_price * (Decimal::ONE + fee_rate))
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
}

pub fn adjusted_base_price(list_price: Decimal, options: PurchaseOptions) -> Decimal {
    list_price * options.size.multiplier() + options.frame.surcharge()
}

pub fn quote(
    list_price: Decimal,
    options: PurchaseOptions,
    fee_rate: Decimal,
    currency: &str,
) -> Result<PriceQuote> {
    if list_price <= Decimal::ZERO {
        return Err(ArtifyError::InvalidPrice(format!(
            "list price must be positive, got {list_price}"
        )));
    }
    let base_price = adjusted_base_price(list_price, options);
    let total_price = total_price(base_price, fee_rate)?;

    Ok(PriceQuote {
        list_price,
        authentication_fee: total_price - base_price,
        base_price: base_price.normalize(),
        total_price,
        currency: currency.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fee() -> Decimal {
        Decimal::new(2, 2)
    }

    #[test]
    fn test_total_for_observed_price() {
        assert_eq!(total_price(Decimal::from(1200), fee()).unwrap(), Decimal::from(1224));
    }

    #[test]
    fn test_total_rounds_to_whole_units() {
        // 1999 * 1.02 = 2038.98
        assert_eq!(total_price(Decimal::from(1999), fee()).unwrap(), Decimal::from(2039));
        // 25 * 1.02 = 25.5
        assert_eq!(total_price(Decimal::from(25), fee()).unwrap(), Decimal::from(26));
    }

    #[test]
    fn test_total_never_below_base() {
        for base in [1i64, 10, 99, 1200, 2500, 4500, 100_000] {
            let base = Decimal::from(base);
            assert!(total_price(base, fee()).unwrap() >= base);
        }
    }

    #[test]
    fn test_non_positive_price_rejected() {
        assert!(matches!(
            total_price(Decimal::ZERO, fee()),
            Err(ArtifyError::InvalidPrice(_))
        ));
        assert!(total_price(Decimal::from(-5), fee()).is_err());
    }

    #[test]
    fn test_quote_with_options() {
        let options = PurchaseOptions {
            size: PrintSize::Large,
            frame: FrameOption::Metal,
        };
        let q = quote(Decimal::from(2500), options, fee(), "USD").unwrap();
        assert_eq!(q.base_price, Decimal::from(4100));
        assert_eq!(q.total_price, Decimal::from(4182));
        assert_eq!(q.authentication_fee, Decimal::from(82));
    }

    #[test]
    fn test_quote_small_unframed() {
        let options = PurchaseOptions {
            size: PrintSize::Small,
            frame: FrameOption::None,
        };
        let q = quote(Decimal::from(2500), options, fee(), "USD").unwrap();
        assert_eq!(q.base_price, Decimal::from(1750));
        assert_eq!(q.total_price, Decimal::from(1785));
        assert_eq!(q.base_price + q.authentication_fee, q.total_price);
    }

    #[test]
    fn test_option_parsing() {
        assert_eq!("LARGE".parse::<PrintSize>().unwrap(), PrintSize::Large);
        assert_eq!("floating".parse::<FrameOption>().unwrap(), FrameOption::Floating);
        assert!("gold".parse::<FrameOption>().is_err());
        assert_eq!(FrameOption::Wood.to_string(), "wood");
    }
}
