use thiserror::Error;

/// User-correctable input problems. Nothing is mutated when one is returned.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("You can only select {limit} {} from {category}", item_word(.limit))]
    QuotaExceeded { limit: u32, category: String },
    #[error("Please select exactly {limit} {} from {category}", item_word(.limit))]
    QuotaUnfilled { limit: u32, category: String },
    #[error("Please complete event details: {0} missing")]
    MissingEventDetails(&'static str),
    #[error("Please select at least one dish")]
    EmptyDishSelection,
    #[error("Package type information is missing")]
    MissingPackageType,
    #[error("Your cart is empty")]
    EmptyCart,
    #[error("Package {0} has no people count to scale its price from")]
    InvalidPeopleCount(String),
}

fn item_word(limit: &u32) -> &'static str {
    if *limit == 1 {
        "item"
    } else {
        "items"
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SelectionError {
    #[error("Dishes of this package are fixed and cannot be changed")]
    NotCustomisable,
    #[error("Dish {0} is not part of this package")]
    UnknownDish(String),
    #[error("You can only select {limit} {} from {category}", item_word(.limit))]
    QuotaExceeded { limit: u32, category: String },
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("could not encode stored value: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("storage lock poisoned")]
    Poisoned,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("{0} not found")]
    NotFound(String),
    #[error("{0}")]
    Rejected(String),
    #[error("response carried no data")]
    MissingData,
}

#[derive(Debug, Error)]
pub enum BookingError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
