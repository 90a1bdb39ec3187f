pub mod booking;
pub mod constants;
pub mod data_backend;
pub mod data_types;
pub mod db_operations;
pub mod errors;
pub mod kv_store;
pub mod local_storage;
pub mod pricing;
pub mod selection;
pub mod shared_main;
