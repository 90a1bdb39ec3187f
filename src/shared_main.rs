use crate::constants::DEFAULT_CURRENCY;
use crate::data_types::cart_types::{CartItem, CustomPackageDraft, LocalCartItem};
use crate::data_types::catalog_types::Package;
use crate::local_storage::SyncReport;
use crate::pricing::package_price_for_guests;
use crate::selection::{CategoryProgress, SelectionSet};

pub fn logger_init(module_path: &str, verbose: bool) {
    pretty_env_logger::formatted_timed_builder()
        .filter_level(log::LevelFilter::Warn)
        .filter_module(
            module_path,
            if verbose {
                log::LevelFilter::Debug
            } else {
                log::LevelFilter::Info
            },
        )
        .filter_module(
            "partyfud_cart_rs",
            if verbose {
                log::LevelFilter::Debug
            } else {
                log::LevelFilter::Info
            },
        )
        .init();
}

pub fn fmt_price(currency: &str, amount: f64) -> String {
    format!("{} {:.2}", currency, amount)
}

pub fn package_msg(
    package: &Package,
    selected: &SelectionSet,
    progress: &[CategoryProgress],
    guests: Option<u32>,
) -> String {
    let mut msg = String::new();
    msg += &format!(
        "{} ({}) - {} for {} people\n",
        package.name,
        package.id,
        fmt_price(&package.currency, package.total_price),
        package.people_count
    );
    if let Some(caterer) = &package.caterer {
        msg += &format!("  by {}\n", caterer.display_name());
    }

    for category in progress {
        match category.limit {
            Some(limit) => msg += &format!("\n{} ({} / {} selected)\n", category.category, category.selected, limit),
            None => msg += &format!("\n{}\n", category.category),
        }
        for dish_id in &category.dish_ids {
            let name = package.dish(dish_id).map(|d| d.name.as_str()).unwrap_or(dish_id.as_str());
            let mark = if selected.contains(dish_id) { "[x]" } else { "[ ]" };
            msg += &format!("  {} {} ({})\n", mark, name, dish_id);
        }
    }

    if let Some(info) = &package.additional_info {
        msg += &format!("\n{}\n", info);
    }

    if let Some(guests) = guests {
        match package_price_for_guests(package.total_price, package.people_count, guests) {
            Some(price) => {
                msg += &format!("\nPrice for {} guests: {}\n", guests, fmt_price(&package.currency, price))
            }
            None => msg += "\nPackage has no people count, price cannot be scaled\n",
        }
    }

    msg
}

pub fn local_cart_msg(items: &[LocalCartItem]) -> String {
    if items.is_empty() {
        return "Local cart is empty.\n".to_string();
    }

    let mut msg = String::new();
    for item in items {
        msg += &format!(" • {} [{}]\n", item.package.name, item.id);
        if let Some(location) = &item.location {
            msg += &format!("     location: {}\n", location);
        }
        if let Some(guests) = item.guests {
            msg += &format!("     guests: {}\n", guests);
        }
        if let Some(date) = &item.date {
            msg += &format!("     date: {}\n", date);
        }
        let price = item.price_at_time.unwrap_or(item.package.total_price);
        msg += &format!("     {}\n", fmt_price(&item.package.currency, price));
    }
    msg
}

pub fn drafts_msg(drafts: &[CustomPackageDraft]) -> String {
    if drafts.is_empty() {
        return "No custom packages saved.\n".to_string();
    }

    let mut msg = String::new();
    for draft in drafts {
        msg += &format!(
            " • Custom menu from {} [{}], {} people, {}\n",
            draft.caterer_name,
            draft.id,
            draft.people_count,
            fmt_price(&draft.currency, draft.total_price)
        );
        for dish in &draft.dishes {
            msg += &format!("     + {}\n", dish.name);
        }
    }
    msg
}

pub fn remote_cart_msg(items: &[CartItem], subtotal: f64) -> String {
    let mut msg = String::new();
    for item in items {
        let price = item.price_at_time.unwrap_or(item.package.total_price);
        msg += &format!(
            " • {} ({} guests) {}\n",
            item.package.name,
            item.guests.unwrap_or(item.package.people_count),
            fmt_price(&item.package.currency, price)
        );
    }
    let noun = if items.len() == 1 { "item" } else { "items" };
    let currency = items
        .first()
        .map(|item| item.package.currency.as_str())
        .unwrap_or(DEFAULT_CURRENCY);
    msg += &format!("Subtotal ({} {}): {}\n", items.len(), noun, fmt_price(currency, subtotal));
    msg
}

pub fn sync_msg(what: &str, report: &SyncReport) -> String {
    let mut msg = format!("{}: {} of {} synced\n", what, report.synced, report.attempted);
    if !report.dropped.is_empty() {
        msg += &format!(
            "  not accepted by the server and discarded: {}\n",
            report.dropped.join(", ")
        );
    }
    msg
}
