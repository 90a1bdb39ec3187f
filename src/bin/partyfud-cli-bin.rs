use partyfud_cart_rs::booking::{
    add_package_to_cart, add_package_to_local_cart, create_custom_package, draft_custom_package,
    place_order, submit_proposal, EventDetails, ProposalDraft,
};
use partyfud_cart_rs::constants::{DEFAULT_API_URL, LOCAL_DB};
use partyfud_cart_rs::data_backend::{http_api::HttpCateringApi, CateringApi};
use partyfud_cart_rs::data_types::catalog_types::CatererSummary;
use partyfud_cart_rs::db_operations::SqliteStore;
use partyfud_cart_rs::local_storage::{CartStorage, CustomPackageStorage};
use partyfud_cart_rs::pricing::price_for_guests;
use partyfud_cart_rs::selection::{group_by_category, PackageSelection, SelectionSet};
use partyfud_cart_rs::shared_main::{
    drafts_msg, fmt_price, local_cart_msg, logger_init, package_msg, remote_cart_msg, sync_msg,
};

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::{sync::Arc, time::Duration};

/// Browse catering packages, pick dishes and manage the cart.
/// {n}Without a token, cart entries and custom menus are kept locally
/// until `cart sync` / `custom sync` is run while signed in.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Base URL of the catering API
    #[arg(long, env = "PARTYFUD_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,
    /// Bearer token of the signed-in user
    #[arg(short, long, env = "PARTYFUD_TOKEN")]
    token: Option<String>,
    /// SQLite file holding the local cart
    #[arg(long, env = "PARTYFUD_DB", default_value = LOCAL_DB)]
    db: String,
    /// HTTP timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout: u64,
    /// Enable verbose logging (request timings)
    #[arg(short, long)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Price one dish for a number of guests
    Price {
        #[arg(long)]
        base: f64,
        /// Guests one unit of the dish feeds
        #[arg(long)]
        serves: Option<u32>,
        #[arg(long)]
        guests: u32,
    },
    /// Show a package with its default dish selection
    Package {
        id: String,
        #[arg(long)]
        guests: Option<u32>,
        /// Dish id to select or deselect, in order
        #[arg(long = "toggle")]
        toggles: Vec<String>,
    },
    /// List a caterer's dishes by category
    Dishes {
        caterer: String,
        #[arg(long)]
        guests: Option<u32>,
    },
    /// Add a package to the cart
    Book {
        package: String,
        #[arg(long)]
        location: Option<String>,
        /// Event date, YYYY-MM-DD
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long, default_value_t = 0)]
        guests: u32,
        #[arg(long)]
        event_type: Option<String>,
        #[arg(long = "toggle")]
        toggles: Vec<String>,
    },
    /// Local cart
    Cart {
        #[command(subcommand)]
        action: BufferAction,
    },
    /// Build-your-own menus
    Custom {
        #[command(subcommand)]
        action: CustomAction,
    },
    /// Order everything in the server cart
    Checkout,
    /// Ask a caterer for a custom quote
    Propose {
        #[arg(long)]
        caterer: String,
        #[arg(long)]
        vision: String,
        #[arg(long)]
        guests: u32,
        #[arg(long = "diet")]
        dietary_preferences: Vec<String>,
        #[arg(long)]
        budget: Option<f64>,
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        event_type: Option<String>,
        #[arg(long)]
        date: Option<NaiveDate>,
    },
}

#[derive(Subcommand, Debug)]
enum BufferAction {
    List,
    Remove { id: String },
    Clear,
    /// Push to the server and empty the local buffer
    Sync,
}

#[derive(Subcommand, Debug)]
enum CustomAction {
    /// Build a menu from a caterer's dishes
    Add {
        #[arg(long)]
        caterer: String,
        #[arg(long)]
        caterer_name: Option<String>,
        #[arg(long = "dish", required = true)]
        dishes: Vec<String>,
        #[arg(long)]
        guests: u32,
    },
    #[command(flatten)]
    Buffer(BufferAction),
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    logger_init(module_path!(), args.verbose);

    run(args).await
}

async fn run(args: Args) -> Result<()> {
    log::debug!("Using API at {}", args.api_url);
    let api = HttpCateringApi::new(
        &args.api_url,
        args.token.clone(),
        Duration::from_secs(args.timeout),
    )?;
    let signed_in = args.token.is_some();

    match args.command {
        Command::Price {
            base,
            serves,
            guests,
        } => {
            println!("{:.2}", price_for_guests(base, serves, guests));
        }
        Command::Package {
            id,
            guests,
            toggles,
        } => {
            let session = open_package(&api, &id, &toggles).await?;
            print!(
                "{}",
                package_msg(session.package(), session.selected(), &session.progress(), guests)
            );
            if let Err(e) = session.validate() {
                println!("\n{}", e);
            }
        }
        Command::Dishes { caterer, guests } => {
            let dishes = api.fetch_dishes_by_caterer(&caterer).await?;
            for group in group_by_category(&dishes) {
                println!("\n{}", group.category_name);
                for dish in group.dishes {
                    let price = match guests {
                        Some(guests) => price_for_guests(dish.price, dish.serves_people, guests),
                        None => dish.price,
                    };
                    println!("  {} ({}) {}", dish.name, dish.id, fmt_price(&dish.currency, price));
                }
            }
        }
        Command::Book {
            package,
            location,
            date,
            guests,
            event_type,
            toggles,
        } => {
            let session = open_package(&api, &package, &toggles).await?;
            let event = EventDetails {
                event_type,
                location,
                date,
                guests,
            };
            if signed_in {
                add_package_to_cart(&api, session.package(), session.selected(), &event).await?;
                println!("Added to cart successfully!");
            } else {
                let cart = CartStorage::new(open_store(&args.db)?);
                let item =
                    add_package_to_local_cart(&cart, session.package(), session.selected(), &event)?;
                println!("Saved {} to the local cart, sign in and run `cart sync`", item.id);
            }
        }
        Command::Cart { action } => {
            let cart = CartStorage::new(open_store(&args.db)?);
            match action {
                BufferAction::List => print!("{}", local_cart_msg(&cart.get_items())),
                BufferAction::Remove { id } => cart.remove_item(&id)?,
                BufferAction::Clear => cart.clear()?,
                BufferAction::Sync => {
                    require_sign_in(signed_in)?;
                    let report = cart.sync_to_server(&api).await?;
                    print!("{}", sync_msg("Cart", &report));
                }
            }
        }
        Command::Custom { action } => {
            let drafts = CustomPackageStorage::new(open_store(&args.db)?);
            match action {
                CustomAction::Add {
                    caterer,
                    caterer_name,
                    dishes,
                    guests,
                } => {
                    let picked: SelectionSet = dishes.into_iter().collect();
                    if signed_in {
                        let package =
                            create_custom_package(&api, &picked, guests, caterer_name.as_deref())
                                .await?;
                        println!("Package {} created successfully!", package.id);
                    } else {
                        let menu = api.fetch_dishes_by_caterer(&caterer).await?;
                        let caterer = CatererSummary {
                            id: caterer,
                            business_name: caterer_name,
                            name: None,
                        };
                        let draft = draft_custom_package(&drafts, &caterer, &menu, &picked, guests)?;
                        print!("{}", drafts_msg(std::slice::from_ref(&draft)));
                    }
                }
                CustomAction::Buffer(BufferAction::List) => {
                    print!("{}", drafts_msg(&drafts.get_packages()))
                }
                CustomAction::Buffer(BufferAction::Remove { id }) => drafts.remove_package(&id)?,
                CustomAction::Buffer(BufferAction::Clear) => drafts.clear()?,
                CustomAction::Buffer(BufferAction::Sync) => {
                    require_sign_in(signed_in)?;
                    let report = drafts.sync_to_server(&api).await?;
                    print!("{}", sync_msg("Custom packages", &report));
                }
            }
        }
        Command::Checkout => {
            require_sign_in(signed_in)?;
            let summary = place_order(&api).await?;
            print!("{}", remote_cart_msg(&summary.items, summary.subtotal));
            println!("Order placed for {} items", summary.item_count);
        }
        Command::Propose {
            caterer,
            vision,
            guests,
            dietary_preferences,
            budget,
            location,
            event_type,
            date,
        } => {
            require_sign_in(signed_in)?;
            let draft = ProposalDraft {
                caterer_id: caterer,
                vision,
                guest_count: guests,
                dietary_preferences,
                budget_per_person: budget,
                location,
                event_type,
                event_date: date,
            };
            submit_proposal(&api, &draft, None).await?;
            println!("Request sent to caterer");
        }
    }

    Ok(())
}

async fn open_package(
    api: &dyn CateringApi,
    package_id: &str,
    toggles: &[String],
) -> Result<PackageSelection> {
    let package = api.fetch_package_by_id(package_id).await?;
    let mut session = PackageSelection::new(package);

    for dish_id in toggles {
        let category = session
            .package()
            .dish(dish_id)
            .map(|d| d.category_name().to_string())
            .unwrap_or_default();
        session.toggle(dish_id, &category)?;
    }

    Ok(session)
}

/// The local buffers live in sqlite; only commands that use them create the file.
fn open_store(db: &str) -> Result<Arc<SqliteStore>> {
    let store = SqliteStore::open(db).with_context(|| format!("opening local storage {}", db))?;
    Ok(Arc::new(store))
}

fn require_sign_in(signed_in: bool) -> Result<()> {
    if !signed_in {
        bail!("sign in first: pass --token or set PARTYFUD_TOKEN");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::path::PathBuf;

    fn scratch_db(name: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "partyfud-cli-{}-{}.sqlite",
            name,
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);
        path
    }

    fn args(db: &PathBuf, rest: &[&str]) -> Args {
        let mut argv = vec!["partyfud-cli", "--db", db.to_str().unwrap()];
        argv.extend_from_slice(rest);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn cli_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[tokio::test]
    async fn pricing_does_not_create_local_storage() {
        let db = scratch_db("price");
        run(args(&db, &["price", "--base", "100", "--serves", "10", "--guests", "25"]))
            .await
            .unwrap();
        assert!(!db.exists());
    }

    #[tokio::test]
    async fn cart_commands_open_local_storage() {
        let db = scratch_db("cart");
        run(args(&db, &["cart", "list"])).await.unwrap();
        assert!(db.exists());
        std::fs::remove_file(&db).unwrap();
    }
}
