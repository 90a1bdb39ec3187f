pub const DEFAULT_API_URL: &str = "http://localhost:3000/api";
pub const LOCAL_DB: &str = "partyfud.sqlite";

// key names are shared with the web front-end's localStorage
pub const CART_STORAGE_KEY: &str = "partyfud_cart_items";
pub const CUSTOM_PACKAGE_STORAGE_KEY: &str = "partyfud_custom_packages";

pub const CART_ID_PREFIX: &str = "local";
pub const CUSTOM_PACKAGE_ID_PREFIX: &str = "custom";

pub const DEFAULT_CURRENCY: &str = "AED";
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Cart items are booked for 18:00 local time on the event date.
pub const EVENT_START_HOUR: u32 = 18;
