pub mod items_service;

pub use items_service::ItemService;
