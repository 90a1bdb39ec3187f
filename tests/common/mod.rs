#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use partyfud_cart_rs::data_backend::CateringApi;
use partyfud_cart_rs::data_types::cart_types::{
    CartItem, CreateCartItemRequest, CreateCustomPackageRequest, CreateOrderRequest,
    CreateProposalRequest, NewCartItem, PackageSnapshot,
};
use partyfud_cart_rs::data_types::catalog_types::{
    CategoryRef, CategorySelection, CatererSummary, CustomisationType, Dish, Package, PackageItem,
    PackageType,
};
use partyfud_cart_rs::errors::ApiError;

/// Records every call and fails those naming a package or dish listed in
/// `reject`.
#[derive(Default)]
pub struct FakeApi {
    pub packages: Vec<Package>,
    pub dishes: Vec<Dish>,
    pub remote_cart: Mutex<Vec<CartItem>>,
    pub cart_reads: AtomicUsize,
    pub reject: HashSet<String>,
    pub cart_requests: Mutex<Vec<CreateCartItemRequest>>,
    pub custom_requests: Mutex<Vec<CreateCustomPackageRequest>>,
    pub orders: Mutex<Vec<CreateOrderRequest>>,
    pub proposals: Mutex<Vec<CreateProposalRequest>>,
}

impl FakeApi {
    pub fn rejecting(ids: &[&str]) -> Self {
        FakeApi {
            reject: ids.iter().map(|id| id.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn cart_calls(&self) -> Vec<CreateCartItemRequest> {
        self.cart_requests.lock().unwrap().clone()
    }

    pub fn custom_calls(&self) -> Vec<CreateCustomPackageRequest> {
        self.custom_requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl CateringApi for FakeApi {
    async fn fetch_package_by_id(&self, package_id: &str) -> Result<Package, ApiError> {
        self.packages
            .iter()
            .find(|p| p.id == package_id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound("package".into()))
    }

    async fn fetch_dishes_by_caterer(&self, _caterer_id: &str) -> Result<Vec<Dish>, ApiError> {
        Ok(self.dishes.clone())
    }

    async fn create_cart_item(&self, request: &CreateCartItemRequest) -> Result<(), ApiError> {
        self.cart_requests.lock().unwrap().push(request.clone());
        if self.reject.contains(&request.package_id) {
            return Err(ApiError::Rejected("Failed to add to cart".into()));
        }
        Ok(())
    }

    async fn get_cart_items(&self) -> Result<Vec<CartItem>, ApiError> {
        self.cart_reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.remote_cart.lock().unwrap().clone())
    }

    async fn create_custom_package(
        &self,
        request: &CreateCustomPackageRequest,
    ) -> Result<Package, ApiError> {
        self.custom_requests.lock().unwrap().push(request.clone());
        if request.dish_ids.iter().any(|id| self.reject.contains(id)) {
            return Err(ApiError::Rejected("Failed to create package".into()));
        }
        Ok(Package {
            id: format!("srv-{}", self.custom_requests.lock().unwrap().len()),
            name: request.name.clone().unwrap_or_else(|| "Custom Menu".into()),
            customisation_type: CustomisationType::Custom,
            items: Vec::new(),
            category_selections: Vec::new(),
            people_count: request.people_count,
            total_price: 0.0,
            price_per_person: None,
            currency: "AED".into(),
            package_type: None,
            caterer: None,
            additional_info: None,
            cover_image_url: None,
        })
    }

    async fn create_order(&self, request: &CreateOrderRequest) -> Result<(), ApiError> {
        self.orders.lock().unwrap().push(request.clone());
        Ok(())
    }

    async fn create_proposal(&self, request: &CreateProposalRequest) -> Result<(), ApiError> {
        self.proposals.lock().unwrap().push(request.clone());
        Ok(())
    }
}

pub fn dish(id: &str, category: &str, price: f64, serves_people: Option<u32>) -> Dish {
    Dish {
        id: id.into(),
        name: format!("Dish {}", id),
        price,
        currency: "AED".into(),
        serves_people,
        category: Some(CategoryRef::Named(category.into())),
        image_url: None,
    }
}

/// Set menu for 20 people: pick 2 of 3 starters and 1 of 2 mains.
pub fn set_menu() -> Package {
    let dishes = vec![
        dish("s1", "Starters", 15.0, None),
        dish("s2", "Starters", 18.0, None),
        dish("s3", "Starters", 12.0, None),
        dish("m1", "Mains", 120.0, Some(4)),
        dish("m2", "Mains", 140.0, Some(4)),
        dish("d1", "Desserts", 30.0, Some(10)),
    ];
    Package {
        id: "pkg-majlis".into(),
        name: "Majlis Set Menu".into(),
        customisation_type: CustomisationType::Fixed,
        items: dishes
            .into_iter()
            .map(|dish| PackageItem {
                dish: Some(dish),
                quantity: 1,
            })
            .collect(),
        category_selections: vec![
            CategorySelection {
                category: CategoryRef::Named("Starters".into()),
                num_dishes_to_select: Some(2),
            },
            CategorySelection {
                category: CategoryRef::Detailed {
                    id: None,
                    name: "mains".into(),
                },
                num_dishes_to_select: Some(1),
            },
        ],
        people_count: 20,
        total_price: 2000.0,
        price_per_person: Some(100.0),
        currency: "AED".into(),
        package_type: Some(PackageType {
            id: "pt-buffet".into(),
            name: Some("Buffet".into()),
        }),
        caterer: Some(CatererSummary {
            id: "cat-1".into(),
            business_name: Some("Al Fanar Catering".into()),
            name: None,
        }),
        additional_info: None,
        cover_image_url: None,
    }
}

pub fn new_cart_item(package_id: &str) -> NewCartItem {
    NewCartItem {
        package_id: package_id.into(),
        package: PackageSnapshot {
            id: package_id.into(),
            name: format!("Package {}", package_id),
            people_count: 10,
            total_price: 1000.0,
            price_per_person: 100.0,
            currency: "AED".into(),
            cover_image_url: None,
            caterer: CatererSummary::default(),
        },
        location: Some("Jumeirah".into()),
        guests: Some(15),
        date: Some("2026-12-24T14:00:00.000Z".into()),
        price_at_time: Some(1500.0),
    }
}

pub fn remote_item(id: &str, price_at_time: Option<f64>) -> CartItem {
    CartItem {
        id: id.into(),
        package_id: format!("pkg-{}", id),
        package: PackageSnapshot {
            id: format!("pkg-{}", id),
            name: format!("Package {}", id),
            people_count: 10,
            total_price: 1000.0,
            price_per_person: 100.0,
            currency: "AED".into(),
            cover_image_url: None,
            caterer: CatererSummary::default(),
        },
        location: Some("Jumeirah".into()),
        guests: Some(10),
        date: None,
        price_at_time,
    }
}
