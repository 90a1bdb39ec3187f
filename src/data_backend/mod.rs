use async_trait::async_trait;

use crate::data_types::{
    cart_types::{
        CartItem, CreateCartItemRequest, CreateCustomPackageRequest, CreateOrderRequest,
        CreateProposalRequest,
    },
    catalog_types::{Dish, Package},
};
use crate::errors::ApiError;

pub mod http_api;

/// Data-fetch and mutation endpoints of the catering marketplace.
#[async_trait]
pub trait CateringApi: Send + Sync {
    async fn fetch_package_by_id(&self, package_id: &str) -> Result<Package, ApiError>;

    async fn fetch_dishes_by_caterer(&self, caterer_id: &str) -> Result<Vec<Dish>, ApiError>;

    async fn create_cart_item(&self, request: &CreateCartItemRequest) -> Result<(), ApiError>;

    /// Cart of the signed-in user.
    async fn get_cart_items(&self) -> Result<Vec<CartItem>, ApiError>;

    async fn create_custom_package(
        &self,
        request: &CreateCustomPackageRequest,
    ) -> Result<Package, ApiError>;

    async fn create_order(&self, request: &CreateOrderRequest) -> Result<(), ApiError>;

    async fn create_proposal(&self, request: &CreateProposalRequest) -> Result<(), ApiError>;
}
