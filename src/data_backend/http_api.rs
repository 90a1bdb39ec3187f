use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use std::time::{Duration, Instant};

use super::CateringApi;
use crate::data_types::{
    cart_types::{
        CartItem, CreateCartItemRequest, CreateCustomPackageRequest, CreateOrderRequest,
        CreateProposalRequest,
    },
    catalog_types::{Dish, Package},
    ApiEnvelope,
};
use crate::errors::ApiError;

/// `CateringApi` over the marketplace's JSON REST endpoints.
pub struct HttpCateringApi {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpCateringApi {
    pub fn new(
        base_url: &str,
        token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url, token))
    }

    pub fn with_client(client: Client, base_url: &str, token: Option<String>) -> Self {
        HttpCateringApi {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        }
    }

    fn with_auth(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, what: &str) -> Result<Option<T>, ApiError> {
        let request = self.with_auth(self.client.get(format!("{}{}", self.base_url, path)));
        send(request, what).await
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        what: &str,
    ) -> Result<Option<T>, ApiError> {
        let request = self
            .with_auth(self.client.post(format!("{}{}", self.base_url, path)))
            .json(body);
        send(request, what).await
    }
}

async fn send<T: DeserializeOwned>(request: RequestBuilder, what: &str) -> Result<Option<T>, ApiError> {
    let now = Instant::now();
    let resp = request.send().await?;
    log::debug!("{} response: {} in {:.2?}", what, resp.status(), now.elapsed());

    let status = resp.status();
    if status == StatusCode::NOT_FOUND {
        return Err(ApiError::NotFound(what.to_string()));
    }

    if !status.is_success() {
        // the body only supplies the reason, any envelope fields are ignored
        let reason = resp
            .json::<ApiEnvelope<serde_json::Value>>()
            .await
            .ok()
            .and_then(|envelope| envelope.error.or(envelope.message))
            .unwrap_or_else(|| format!("{} failed with HTTP {}", what, status));
        log::warn!("{} rejected with HTTP {}: {}", what, status, reason);
        return Err(ApiError::Rejected(reason));
    }

    resp.json::<ApiEnvelope<T>>().await?.into_result()
}

#[async_trait]
impl CateringApi for HttpCateringApi {
    async fn fetch_package_by_id(&self, package_id: &str) -> Result<Package, ApiError> {
        self.get(&format!("/user/packages/{}", package_id), "package")
            .await?
            .ok_or(ApiError::MissingData)
    }

    async fn fetch_dishes_by_caterer(&self, caterer_id: &str) -> Result<Vec<Dish>, ApiError> {
        Ok(self
            .get(&format!("/user/caterers/{}/dishes", caterer_id), "caterer")
            .await?
            .unwrap_or_default())
    }

    async fn create_cart_item(&self, request: &CreateCartItemRequest) -> Result<(), ApiError> {
        self.post::<_, serde_json::Value>("/user/cart", request, "cart item")
            .await?;
        Ok(())
    }

    async fn get_cart_items(&self) -> Result<Vec<CartItem>, ApiError> {
        Ok(self.get("/user/cart", "cart").await?.unwrap_or_default())
    }

    async fn create_custom_package(
        &self,
        request: &CreateCustomPackageRequest,
    ) -> Result<Package, ApiError> {
        self.post("/user/packages/custom", request, "custom package")
            .await?
            .ok_or(ApiError::MissingData)
    }

    async fn create_order(&self, request: &CreateOrderRequest) -> Result<(), ApiError> {
        self.post::<_, serde_json::Value>("/user/orders", request, "order")
            .await?;
        Ok(())
    }

    async fn create_proposal(&self, request: &CreateProposalRequest) -> Result<(), ApiError> {
        self.post::<_, serde_json::Value>("/user/proposals", request, "proposal")
            .await?;
        Ok(())
    }
}
