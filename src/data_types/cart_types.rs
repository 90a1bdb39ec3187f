use serde::{Deserialize, Serialize};

use super::catalog_types::{default_currency, CategoryRef, CatererSummary, Dish, Package};
use super::{de_opt_price, de_price};

/// Package fields copied into a cart entry so it can be displayed without
/// refetching the package.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PackageSnapshot {
    pub id: String,
    pub name: String,
    pub people_count: u32,
    #[serde(deserialize_with = "de_price")]
    pub total_price: f64,
    #[serde(default, deserialize_with = "de_price")]
    pub price_per_person: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub cover_image_url: Option<String>,
    #[serde(default)]
    pub caterer: CatererSummary,
}

impl From<&Package> for PackageSnapshot {
    fn from(package: &Package) -> Self {
        let per_person = package.price_per_person.unwrap_or_else(|| {
            if package.people_count == 0 {
                0.0
            } else {
                package.total_price / f64::from(package.people_count)
            }
        });
        PackageSnapshot {
            id: package.id.clone(),
            name: package.name.clone(),
            people_count: package.people_count,
            total_price: package.total_price,
            price_per_person: per_person,
            currency: package.currency.clone(),
            cover_image_url: package.cover_image_url.clone(),
            caterer: package.caterer.clone().unwrap_or_default(),
        }
    }
}

/// Cart entry buffered locally until the user is signed in.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LocalCartItem {
    pub id: String,
    pub package_id: String,
    pub package: PackageSnapshot,
    pub location: Option<String>,
    pub guests: Option<u32>,
    pub date: Option<String>,
    pub price_at_time: Option<f64>,
    pub created_at: String,
    pub updated_at: String,
}

/// A cart entry before the store has given it an id and timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCartItem {
    pub package_id: String,
    pub package: PackageSnapshot,
    pub location: Option<String>,
    pub guests: Option<u32>,
    pub date: Option<String>,
    pub price_at_time: Option<f64>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CustomDishSnapshot {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub currency: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub category: Option<CategoryRef>,
}

impl From<&Dish> for CustomDishSnapshot {
    fn from(dish: &Dish) -> Self {
        CustomDishSnapshot {
            id: dish.id.clone(),
            name: dish.name.clone(),
            price: dish.price,
            currency: dish.currency.clone(),
            image_url: dish.image_url.clone(),
            category: dish.category.clone(),
        }
    }
}

/// Build-your-own menu kept locally until it can be created on the server.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CustomPackageDraft {
    pub id: String,
    pub caterer_id: String,
    pub caterer_name: String,
    pub dish_ids: Vec<String>,
    pub people_count: u32,
    pub dishes: Vec<CustomDishSnapshot>,
    pub total_price: f64,
    pub currency: String,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewCustomPackageDraft {
    pub caterer_id: String,
    pub caterer_name: String,
    pub dish_ids: Vec<String>,
    pub people_count: u32,
    pub dishes: Vec<CustomDishSnapshot>,
    pub total_price: f64,
    pub currency: String,
}

/// Cart entry as stored by the server.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CartItem {
    pub id: String,
    pub package_id: String,
    pub package: PackageSnapshot,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub guests: Option<u32>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "de_opt_price")]
    pub price_at_time: Option<f64>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct CreateCartItemRequest {
    pub package_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_type_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guests: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_at_time: Option<f64>,
}

impl From<&LocalCartItem> for CreateCartItemRequest {
    // the web client drops falsy values, so empty strings and zeroes are not sent
    fn from(item: &LocalCartItem) -> Self {
        CreateCartItemRequest {
            package_id: item.package_id.clone(),
            package_type_id: None,
            location: item.location.clone().filter(|l| !l.is_empty()),
            guests: item.guests.filter(|g| *g > 0),
            date: item.date.clone().filter(|d| !d.is_empty()),
            price_at_time: item.price_at_time.filter(|p| *p != 0.0),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CreateCustomPackageRequest {
    pub dish_ids: Vec<String>,
    pub people_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl From<&CustomPackageDraft> for CreateCustomPackageRequest {
    fn from(draft: &CustomPackageDraft) -> Self {
        CreateCustomPackageRequest {
            dish_ids: draft.dish_ids.clone(),
            people_count: draft.people_count,
            name: None,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CreateOrderRequest {
    pub cart_item_ids: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct CreateProposalRequest {
    pub caterer_id: String,
    pub vision: String,
    pub guest_count: u32,
    pub dietary_preferences: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget_per_person: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_date: Option<String>,
}
