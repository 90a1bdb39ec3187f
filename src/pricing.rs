//! Guest-scaled pricing.
//!
//! Two rules live side by side and must not be mixed up:
//! - per-dish pricing for build-your-own menus ([`price_for_guests`]), where
//!   one unit of a dish feeds `serves_people` guests
//! - whole-package pricing for set menus ([`package_price_for_guests`]), a
//!   linear scaling of the package price from its baseline headcount

use crate::data_types::cart_types::CartItem;
use crate::data_types::catalog_types::Dish;

/// Price of one dish for `guest_count` guests.
///
/// With a positive `serves_people` the dish is bought in whole servings,
/// at least one even for zero guests. Without it the price is per head.
pub fn price_for_guests(base_price: f64, serves_people: Option<u32>, guest_count: u32) -> f64 {
    match serves_people {
        Some(serves) if serves > 0 => {
            let servings = if guest_count <= serves {
                1
            } else {
                guest_count.div_ceil(serves)
            };
            base_price * f64::from(servings)
        }
        _ => base_price * f64::from(guest_count),
    }
}

/// Scales a package's `total_price` from `people_count` to `guest_count`.
/// `None` when the package has no baseline headcount.
pub fn package_price_for_guests(total_price: f64, people_count: u32, guest_count: u32) -> Option<f64> {
    if people_count == 0 {
        return None;
    }
    Some(total_price / f64::from(people_count) * f64::from(guest_count))
}

pub fn custom_menu_total<'a, I>(dishes: I, guest_count: u32) -> f64
where
    I: IntoIterator<Item = &'a Dish>,
{
    dishes
        .into_iter()
        .map(|dish| price_for_guests(dish.price, dish.serves_people, guest_count))
        .sum()
}

/// Checkout subtotal: the price captured when the item was added, or the
/// package's list price for items that never captured one.
pub fn cart_subtotal(items: &[CartItem]) -> f64 {
    items
        .iter()
        .map(|item| match item.price_at_time {
            Some(price) if price != 0.0 => price,
            _ => item.package.total_price,
        })
        .sum()
}
