pub mod product;
pub mod promotion;
pub mod sale;
pub mod sale_item;
pub mod stock_item;
pub mod stock_movement;
pub mod user;
