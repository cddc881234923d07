use std::fmt;

use rust_decimal::Decimal;

use crate::core::{Adjustment, AdjustmentKind, round2};

/// The candidate sums the payable amount is checked against, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    /// A: bases + taxes.
    BaseAndTax,
    /// B: bases + taxes + packaging deposit.
    WithDeposit,
    /// C: bases + taxes + adjustment.
    WithAdjustment,
    /// D: bases + taxes + packaging deposit + adjustment.
    WithDepositAndAdjustment,
}

impl Tier {
    /// Evaluation order; the first matching tier wins.
    pub const ORDER: [Tier; 4] = [
        Tier::BaseAndTax,
        Tier::WithDeposit,
        Tier::WithAdjustment,
        Tier::WithDepositAndAdjustment,
    ];

    pub fn letter(&self) -> char {
        match self {
            Self::BaseAndTax => 'A',
            Self::WithDeposit => 'B',
            Self::WithAdjustment => 'C',
            Self::WithDepositAndAdjustment => 'D',
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::BaseAndTax => "sum tax base + sum taxes",
            Self::WithDeposit => "sum tax base + sum taxes + packaging deposit",
            Self::WithAdjustment => "sum tax base + sum taxes + adjustment",
            Self::WithDepositAndAdjustment => {
                "sum tax base + sum taxes + packaging deposit + adjustment"
            }
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}'", self.letter(), self.description())
    }
}

/// Deposit and adjustment as they enter the candidate sums.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PayableSlots {
    pub deposit: Option<Decimal>,
    pub adjustment: Option<Decimal>,
}

impl PayableSlots {
    /// Route the adjustment: discounts, credits and deductions fill the
    /// adjustment slot, deposit-type adjustments are added to the deposit.
    pub fn new(deposit: Option<Decimal>, adjustment: Option<&Adjustment>) -> Self {
        let Some(adjustment) = adjustment else {
            return Self {
                deposit,
                adjustment: None,
            };
        };
        match adjustment.kind {
            AdjustmentKind::Discount | AdjustmentKind::Credit | AdjustmentKind::Deduction => Self {
                deposit,
                adjustment: Some(adjustment.amount),
            },
            AdjustmentKind::PackagingDeposit | AdjustmentKind::DepositRefund => Self {
                deposit: Some(deposit.unwrap_or_default() + adjustment.amount),
                adjustment: None,
            },
        }
    }

    /// The sum for `tier`, or `None` when a required slot is empty.
    pub fn candidate(&self, tier: Tier, base: Decimal) -> Option<Decimal> {
        match tier {
            Tier::BaseAndTax => Some(base),
            Tier::WithDeposit => self.deposit.map(|d| round2(base + d)),
            Tier::WithAdjustment => self.adjustment.map(|a| round2(base + a)),
            Tier::WithDepositAndAdjustment => match (self.deposit, self.adjustment) {
                (Some(d), Some(a)) => Some(round2(base + d + a)),
                _ => None,
            },
        }
    }
}
