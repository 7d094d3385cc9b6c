//! Named views over the integer bitmasks stored on products and categories.
//!
//! `products.show_allowed`:
//!
//! | bit | meaning                 |
//! |-----|-------------------------|
//! | 0   | visible on the web shop |
//! | 1   | visible on the POS      |
//! | 2   | visible in promotions   |
//!
//! `product_categories.extra_info`:
//!
//! | bit | meaning                                   |
//! |-----|-------------------------------------------|
//! | 0   | products of this category carry sizes     |

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

const WEB_BIT: i32 = 1 << 0;
const POS_BIT: i32 = 1 << 1;
const PROMOTE_BIT: i32 = 1 << 2;

const HAS_SIZES_BIT: i32 = 1 << 0;

/// Sales channels a product may be shown on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ShowAllowed {
    pub web: bool,
    pub pos: bool,
    pub promote: bool,
}

impl ShowAllowed {
    pub fn from_bits(bits: i32) -> Self {
        Self {
            web: bits & WEB_BIT != 0,
            pos: bits & POS_BIT != 0,
            promote: bits & PROMOTE_BIT != 0,
        }
    }

    pub fn bits(self) -> i32 {
        let mut bits = 0;
        if self.web {
            bits |= WEB_BIT;
        }
        if self.pos {
            bits |= POS_BIT;
        }
        if self.promote {
            bits |= PROMOTE_BIT;
        }
        bits
    }

    /// Visibility written by an upsert. POS visibility is always on.
    pub fn for_upsert(web: bool, promote: bool) -> Self {
        Self {
            web,
            pos: true,
            promote,
        }
    }
}

/// Capabilities encoded in a category's `extra_info`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CategoryFlags {
    pub has_sizes: bool,
}

impl CategoryFlags {
    pub fn from_bits(bits: i32) -> Self {
        Self {
            has_sizes: bits & HAS_SIZES_BIT != 0,
        }
    }

    pub fn bits(self) -> i32 {
        if self.has_sizes {
            HAS_SIZES_BIT
        } else {
            0
        }
    }
}

/// Channel mask sent by a terminal when listing products.
///
/// Uses the same bit layout as [`ShowAllowed`], so a POS terminal sends `2`
/// and a client interested in web or promotion products sends `5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminalType(i32);

impl TerminalType {
    pub const WEB: TerminalType = TerminalType(WEB_BIT);
    pub const POS: TerminalType = TerminalType(POS_BIT);
    pub const PROMOTE: TerminalType = TerminalType(PROMOTE_BIT);

    pub fn from_bits(bits: i32) -> Self {
        TerminalType(bits)
    }

    pub fn bits(self) -> i32 {
        self.0
    }
}
