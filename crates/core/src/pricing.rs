// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Flat-rate pricing.
//!
//! Prices are fixed per category and are not negotiated.

use bandbook_domain::EventCategory;

pub const WEDDING_PRICE: i64 = 2000;
pub const BAPTISM_PRICE: i64 = 1000;
pub const PARTY_PRICE: i64 = 500;
pub const DEFAULT_PRICE: i64 = 300;

/// Returns the price of an engagement of the given category.
#[must_use]
pub const fn price_for_category(category: &EventCategory) -> i64 {
    match category {
        EventCategory::Wedding => WEDDING_PRICE,
        EventCategory::Baptism => BAPTISM_PRICE,
        EventCategory::Party => PARTY_PRICE,
        EventCategory::Other(_) => DEFAULT_PRICE,
    }
}
