use chrono::{DateTime, Local, NaiveDate, SecondsFormat, TimeZone, Utc};

use crate::constants::EVENT_START_HOUR;
use crate::data_backend::CateringApi;
use crate::data_types::cart_types::{
    CartItem, CreateCartItemRequest, CreateCustomPackageRequest, CreateOrderRequest,
    CreateProposalRequest, CustomDishSnapshot, CustomPackageDraft, LocalCartItem, NewCartItem,
    NewCustomPackageDraft, PackageSnapshot,
};
use crate::data_types::catalog_types::{default_currency, CatererSummary, Dish, Package};
use crate::errors::{BookingError, ValidationError};
use crate::kv_store::KeyValueStore;
use crate::local_storage::{CartStorage, CustomPackageStorage};
use crate::pricing::{cart_subtotal, custom_menu_total, package_price_for_guests};
use crate::selection::{validate_selection, SelectionSet};

/// What the customer entered in the event details sidebar.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventDetails {
    pub event_type: Option<String>,
    pub location: Option<String>,
    pub date: Option<NaiveDate>,
    pub guests: u32,
}

/// Event date as the instant the event starts, in UTC.
pub fn event_timestamp(date: NaiveDate) -> String {
    let start = date
        .and_hms_opt(EVENT_START_HOUR, 0, 0)
        .unwrap_or_else(|| date.and_time(Default::default()));
    let local: DateTime<Local> = Local
        .from_local_datetime(&start)
        .earliest()
        .unwrap_or_else(|| Utc.from_utc_datetime(&start).with_timezone(&Local));

    local
        .with_timezone(&Utc)
        .to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn require_event(event: &EventDetails) -> Result<(&str, NaiveDate), ValidationError> {
    let location = event
        .location
        .as_deref()
        .filter(|l| !l.trim().is_empty())
        .ok_or(ValidationError::MissingEventDetails("location"))?;
    let date = event
        .date
        .ok_or(ValidationError::MissingEventDetails("date"))?;
    if event.guests == 0 {
        return Err(ValidationError::MissingEventDetails("guests"));
    }
    Ok((location, date))
}

/// Checks event details and dish picks and prices the package for the
/// requested guest count.
pub fn build_cart_item_request(
    package: &Package,
    selection: &SelectionSet,
    event: &EventDetails,
) -> Result<CreateCartItemRequest, ValidationError> {
    let (location, date) = require_event(event)?;
    validate_selection(package, selection)?;

    let package_type = package
        .package_type
        .as_ref()
        .ok_or(ValidationError::MissingPackageType)?;
    let price = package_price_for_guests(package.total_price, package.people_count, event.guests)
        .ok_or_else(|| ValidationError::InvalidPeopleCount(package.id.clone()))?;

    Ok(CreateCartItemRequest {
        package_id: package.id.clone(),
        package_type_id: Some(package_type.id.clone()),
        location: Some(location.to_string()),
        guests: Some(event.guests),
        date: Some(event_timestamp(date)),
        price_at_time: Some(price),
    })
}

pub async fn add_package_to_cart(
    api: &dyn CateringApi,
    package: &Package,
    selection: &SelectionSet,
    event: &EventDetails,
) -> Result<(), BookingError> {
    let request = build_cart_item_request(package, selection, event)?;
    api.create_cart_item(&request).await?;
    log::info!("Added package {} to cart for {} guests", package.id, event.guests);

    Ok(())
}

/// Same checks as [`add_package_to_cart`], but the item is buffered locally
/// for a user who has not signed in yet.
pub fn add_package_to_local_cart<S: KeyValueStore>(
    cart: &CartStorage<S>,
    package: &Package,
    selection: &SelectionSet,
    event: &EventDetails,
) -> Result<LocalCartItem, BookingError> {
    let request = build_cart_item_request(package, selection, event)?;
    let item = cart.add_item(NewCartItem {
        package_id: request.package_id,
        package: PackageSnapshot::from(package),
        location: request.location,
        guests: request.guests,
        date: request.date,
        price_at_time: request.price_at_time,
    })?;

    Ok(item)
}

pub fn build_custom_package_request(
    dish_ids: &SelectionSet,
    guests: u32,
    caterer_name: Option<&str>,
) -> Result<CreateCustomPackageRequest, ValidationError> {
    if dish_ids.is_empty() {
        return Err(ValidationError::EmptyDishSelection);
    }

    Ok(CreateCustomPackageRequest {
        dish_ids: dish_ids.iter().cloned().collect(),
        people_count: guests,
        name: Some(format!("Custom Menu - {}", caterer_name.unwrap_or("Caterer"))),
    })
}

pub async fn create_custom_package(
    api: &dyn CateringApi,
    dish_ids: &SelectionSet,
    guests: u32,
    caterer_name: Option<&str>,
) -> Result<Package, BookingError> {
    let request = build_custom_package_request(dish_ids, guests, caterer_name)?;
    let package = api.create_custom_package(&request).await?;
    log::info!("Created custom package {} with {} dishes", package.id, request.dish_ids.len());

    Ok(package)
}

/// Buffers a build-your-own menu locally, with the dishes it was built from
/// so it can be shown without refetching them.
pub fn draft_custom_package<S: KeyValueStore>(
    drafts: &CustomPackageStorage<S>,
    caterer: &CatererSummary,
    dishes: &[Dish],
    dish_ids: &SelectionSet,
    guests: u32,
) -> Result<CustomPackageDraft, BookingError> {
    if dish_ids.is_empty() {
        return Err(ValidationError::EmptyDishSelection.into());
    }

    let chosen: Vec<&Dish> = dishes.iter().filter(|d| dish_ids.contains(&d.id)).collect();
    let currency = chosen
        .first()
        .map(|d| d.currency.clone())
        .unwrap_or_else(default_currency);

    let draft = drafts.add_package(NewCustomPackageDraft {
        caterer_id: caterer.id.clone(),
        caterer_name: caterer.display_name().to_string(),
        dish_ids: dish_ids.iter().cloned().collect(),
        people_count: guests,
        dishes: chosen.iter().map(|d| CustomDishSnapshot::from(*d)).collect(),
        total_price: custom_menu_total(chosen.iter().copied(), guests),
        currency,
    })?;

    Ok(draft)
}

/// What an order was placed for: the cart as read for the order.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderSummary {
    pub items: Vec<CartItem>,
    pub item_count: usize,
    pub subtotal: f64,
}

/// Orders everything in the signed-in user's cart. The cart is read once
/// and the summary describes exactly the items ordered.
pub async fn place_order(api: &dyn CateringApi) -> Result<OrderSummary, BookingError> {
    let items = api.get_cart_items().await?;
    if items.is_empty() {
        return Err(ValidationError::EmptyCart.into());
    }

    let request = CreateOrderRequest {
        cart_item_ids: items.iter().map(|item| item.id.clone()).collect(),
    };
    api.create_order(&request).await?;
    let summary = OrderSummary {
        item_count: items.len(),
        subtotal: cart_subtotal(&items),
        items,
    };
    log::info!(
        "Order placed: {} items, subtotal {:.2}",
        summary.item_count,
        summary.subtotal
    );

    Ok(summary)
}

/// Custom quote request. Empty location, event type and date fall back to
/// the event details the customer already entered, when there are any.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProposalDraft {
    pub caterer_id: String,
    pub vision: String,
    pub guest_count: u32,
    pub dietary_preferences: Vec<String>,
    pub budget_per_person: Option<f64>,
    pub location: Option<String>,
    pub event_type: Option<String>,
    pub event_date: Option<NaiveDate>,
}

pub fn build_proposal_request(
    draft: &ProposalDraft,
    event: Option<&EventDetails>,
) -> CreateProposalRequest {
    fn non_empty(value: &Option<String>) -> Option<String> {
        value.clone().filter(|v| !v.trim().is_empty())
    }

    CreateProposalRequest {
        caterer_id: draft.caterer_id.clone(),
        vision: draft.vision.clone(),
        guest_count: draft.guest_count,
        dietary_preferences: draft.dietary_preferences.clone(),
        budget_per_person: draft.budget_per_person,
        location: non_empty(&draft.location)
            .or_else(|| event.and_then(|e| non_empty(&e.location))),
        event_type: non_empty(&draft.event_type)
            .or_else(|| event.and_then(|e| non_empty(&e.event_type))),
        event_date: draft
            .event_date
            .or_else(|| event.and_then(|e| e.date))
            .map(|d| d.format("%Y-%m-%d").to_string()),
    }
}

pub async fn submit_proposal(
    api: &dyn CateringApi,
    draft: &ProposalDraft,
    event: Option<&EventDetails>,
) -> Result<(), BookingError> {
    let request = build_proposal_request(draft, event);
    api.create_proposal(&request).await?;
    log::info!("Proposal sent to caterer {}", request.caterer_id);

    Ok(())
}
