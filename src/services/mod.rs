pub mod auth_service;
pub mod category_service;
pub mod product_service;
pub mod supplier_service;
pub mod user_service;
