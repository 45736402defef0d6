//! Bit set flags carried in the second byte of several TOPS and DEEP messages.
//!
//! Each wrapper stores only the raw byte; every accessor is a pure predicate over it.

use std::fmt;

/// Security directory: a test security.
pub const TEST_SECURITY: u8 = 1 << 7;
/// Security directory: a when-issued security.
pub const WHEN_ISSUED: u8 = 1 << 6;
/// Security directory: an exchange traded product.
pub const ETP: u8 = 1 << 5;

/// Quote update: the symbol is not available for trading.
pub const QUOTE_INACTIVE: u8 = 1 << 7;
/// Quote update: the quote is from the pre-market or post-market session.
pub const QUOTE_OUTSIDE_REGULAR_SESSION: u8 = 1 << 6;

/// Sale condition: the trade resulted from an intermarket sweep order.
pub const INTERMARKET_SWEEP: u8 = 1 << 7;
/// Sale condition: the trade occurred before or after the regular market session
/// (Form T).
pub const EXTENDED_HOURS: u8 = 1 << 6;
/// Sale condition: the trade is less than one round lot.
pub const ODD_LOT: u8 = 1 << 5;
/// Sale condition: the trade is not subject to Rule 611 (trade through) of Reg NMS.
pub const TRADE_THROUGH_EXEMPT: u8 = 1 << 4;
/// Sale condition: the trade resulted from a single-price cross.
pub const SINGLE_PRICE_CROSS: u8 = 1 << 3;

/// Price level update: the order book is consistent, the event is processed.
pub const EVENT_PROCESSING_COMPLETE: u8 = 1;

macro_rules! flag_set {
    (
        $(#[$meta:meta])*
        $name:ident { $($flag:ident),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[repr(transparent)]
        #[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize), serde(transparent))]
        pub struct $name {
            raw: u8,
        }

        impl $name {
            /// Creates a new flag set from `raw`.
            pub const fn new(raw: u8) -> Self {
                Self { raw }
            }

            /// Returns the raw value.
            pub const fn raw(&self) -> u8 {
                self.raw
            }

            /// Returns `true` if all flags are unset.
            pub const fn is_empty(&self) -> bool {
                self.raw == 0
            }
        }

        impl From<u8> for $name {
            fn from(raw: u8) -> Self {
                Self { raw }
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let mut has_written_flag = false;
                for (flag, name) in [$(($flag, stringify!($flag))),+] {
                    if (self.raw & flag) > 0 {
                        if has_written_flag {
                            write!(f, " | {name}")?;
                        } else {
                            write!(f, "{name}")?;
                            has_written_flag = true;
                        }
                    }
                }
                if has_written_flag {
                    write!(f, " ({})", self.raw)
                } else {
                    write!(f, "{}", self.raw)
                }
            }
        }
    };
}

flag_set! {
    /// Flags of a [`SecurityDirectoryMsg`](crate::SecurityDirectoryMsg).
    SecurityDirectoryFlags { TEST_SECURITY, WHEN_ISSUED, ETP }
}

impl SecurityDirectoryFlags {
    /// Returns `true` if the security is a test security.
    pub const fn is_test_security(&self) -> bool {
        (self.raw & TEST_SECURITY) > 0
    }

    /// Returns `true` if the security is a when-issued security.
    pub const fn is_when_issued(&self) -> bool {
        (self.raw & WHEN_ISSUED) > 0
    }

    /// Returns `true` if the security is an exchange traded product.
    pub const fn is_etp(&self) -> bool {
        (self.raw & ETP) > 0
    }
}

flag_set! {
    /// Flags of a [`QuoteUpdateMsg`](crate::QuoteUpdateMsg).
    QuoteFlags { QUOTE_INACTIVE, QUOTE_OUTSIDE_REGULAR_SESSION }
}

impl QuoteFlags {
    /// Returns `true` if the symbol is available for trading.
    pub const fn is_active(&self) -> bool {
        (self.raw & QUOTE_INACTIVE) == 0
    }

    /// Returns `true` if the quote is from the regular market session.
    pub const fn is_regular_market_session(&self) -> bool {
        (self.raw & QUOTE_OUTSIDE_REGULAR_SESSION) == 0
    }
}

flag_set! {
    /// Sale condition flags of a trade report or trade break [`TradeMsg`](crate::TradeMsg).
    SaleConditionFlags {
        INTERMARKET_SWEEP,
        EXTENDED_HOURS,
        ODD_LOT,
        TRADE_THROUGH_EXEMPT,
        SINGLE_PRICE_CROSS,
    }
}

impl SaleConditionFlags {
    /// Returns `true` if the trade resulted from an intermarket sweep order.
    pub const fn is_iso(&self) -> bool {
        (self.raw & INTERMARKET_SWEEP) > 0
    }

    /// Returns `true` if the trade occurred before or after the regular market
    /// session.
    pub const fn is_extended_hours(&self) -> bool {
        (self.raw & EXTENDED_HOURS) > 0
    }

    /// Returns `true` if the trade is less than one round lot.
    pub const fn is_odd_lot(&self) -> bool {
        (self.raw & ODD_LOT) > 0
    }

    /// Returns `true` if the trade is exempt from Rule 611 of Reg NMS.
    pub const fn is_trade_through_exempt(&self) -> bool {
        (self.raw & TRADE_THROUGH_EXEMPT) > 0
    }

    /// Returns `true` if the trade resulted from a single-price cross.
    pub const fn is_single_price_cross(&self) -> bool {
        (self.raw & SINGLE_PRICE_CROSS) > 0
    }

    /// Returns `true` if the trade should update the last sale price.
    pub const fn is_last_sale_eligible(&self) -> bool {
        !self.is_extended_hours() && !self.is_odd_lot()
    }

    /// Returns `true` if the trade should update the high and low prices.
    pub const fn is_high_low_price_eligible(&self) -> bool {
        !self.is_extended_hours() && !self.is_odd_lot()
    }

    /// Returns `true` if the trade should count towards volume. Always `true`.
    pub const fn is_volume_eligible(&self) -> bool {
        true
    }
}

flag_set! {
    /// Event flags of a [`PriceLevelUpdateMsg`](crate::PriceLevelUpdateMsg).
    PriceLevelEventFlags { EVENT_PROCESSING_COMPLETE }
}

impl PriceLevelEventFlags {
    /// Returns `true` if the event is fully processed and the book is consistent.
    /// Updates without this flag are part of a larger atomic event.
    pub const fn is_event_processing_complete(&self) -> bool {
        (self.raw & EVENT_PROCESSING_COMPLETE) > 0
    }
}
