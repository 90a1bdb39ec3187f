pub mod cart_types;
pub mod catalog_types;

use serde::{Deserialize, Deserializer};

use crate::errors::ApiError;

// prices arrive either as json numbers or as decimal strings ("1250.00")
#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f64),
    Text(String),
}

impl NumberOrString {
    fn into_f64<E: serde::de::Error>(self) -> Result<f64, E> {
        match self {
            NumberOrString::Number(n) => Ok(n),
            NumberOrString::Text(s) => s.trim().parse().map_err(E::custom),
        }
    }
}

pub(crate) fn de_price<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    NumberOrString::deserialize(deserializer)?.into_f64()
}

pub(crate) fn de_opt_price<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<NumberOrString>::deserialize(deserializer)?
        .map(NumberOrString::into_f64)
        .transpose()
}

/// Response wrapper used by every endpoint of the catering API.
#[derive(Deserialize, Debug)]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub success: Option<bool>,
    pub data: Option<T>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl<T> ApiEnvelope<T> {
    pub fn into_result(self) -> Result<Option<T>, ApiError> {
        if self.success == Some(false) || self.error.is_some() {
            let reason = self
                .error
                .or(self.message)
                .unwrap_or_else(|| "request was not successful".to_string());
            return Err(ApiError::Rejected(reason));
        }
        Ok(self.data)
    }
}
