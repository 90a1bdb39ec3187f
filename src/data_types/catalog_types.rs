use serde::{Deserialize, Serialize};

use super::{de_opt_price, de_price};
use crate::constants::{DEFAULT_CURRENCY, UNCATEGORIZED};

/// Category of a dish as delivered by the API: either a full object or
/// just the display name.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum CategoryRef {
    Detailed {
        #[serde(default)]
        id: Option<String>,
        name: String,
    },
    Named(String),
}

impl CategoryRef {
    pub fn name(&self) -> &str {
        match self {
            CategoryRef::Detailed { name, .. } => name,
            CategoryRef::Named(name) => name,
        }
    }

    pub fn id(&self) -> Option<&str> {
        match self {
            CategoryRef::Detailed { id, .. } => id.as_deref(),
            CategoryRef::Named(_) => None,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Dish {
    pub id: String,
    pub name: String,
    #[serde(deserialize_with = "de_price")]
    pub price: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    /// Number of guests one unit of this dish feeds.
    #[serde(default)]
    pub serves_people: Option<u32>,
    #[serde(default)]
    pub category: Option<CategoryRef>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl Dish {
    pub fn category_name(&self) -> &str {
        self.category
            .as_ref()
            .map(CategoryRef::name)
            .unwrap_or(UNCATEGORIZED)
    }

    pub fn category_id(&self) -> Option<&str> {
        self.category.as_ref().and_then(CategoryRef::id)
    }
}

pub(crate) fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

fn default_quantity() -> u32 {
    1
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PackageItem {
    #[serde(default)]
    pub dish: Option<Dish>,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

/// "Pick N" rule of a customisable package. `None` means every dish of the
/// category is included.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CategorySelection {
    pub category: CategoryRef,
    #[serde(default)]
    pub num_dishes_to_select: Option<u32>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CustomisationType {
    /// Dishes are picked per category within the quotas.
    Fixed,
    /// Every dish is included.
    Custom,
    #[default]
    #[serde(other)]
    Other,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PackageType {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct CatererSummary {
    pub id: String,
    #[serde(default)]
    pub business_name: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

impl CatererSummary {
    pub fn display_name(&self) -> &str {
        self.business_name
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or("Caterer")
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Package {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub customisation_type: CustomisationType,
    #[serde(default)]
    pub items: Vec<PackageItem>,
    #[serde(default)]
    pub category_selections: Vec<CategorySelection>,
    pub people_count: u32,
    #[serde(deserialize_with = "de_price")]
    pub total_price: f64,
    #[serde(default, deserialize_with = "de_opt_price")]
    pub price_per_person: Option<f64>,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub package_type: Option<PackageType>,
    #[serde(default)]
    pub caterer: Option<CatererSummary>,
    #[serde(default)]
    pub additional_info: Option<String>,
    #[serde(default)]
    pub cover_image_url: Option<String>,
}

impl Package {
    /// `FIXED` packages are the customisable ones: the user picks dishes
    /// within per-category quotas.
    pub fn enforces_quotas(&self) -> bool {
        self.customisation_type == CustomisationType::Fixed
    }

    /// Dishes of the package in item order. Items without a usable dish id
    /// are left out.
    pub fn dishes(&self) -> impl Iterator<Item = &Dish> {
        self.items
            .iter()
            .filter_map(|item| item.dish.as_ref())
            .filter(|dish| !dish.id.is_empty())
    }

    pub fn dish(&self, dish_id: &str) -> Option<&Dish> {
        self.dishes().find(|dish| dish.id == dish_id)
    }
}
