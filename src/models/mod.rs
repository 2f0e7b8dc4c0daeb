pub mod item;
pub mod item_status;

pub use item::*;
pub use item_status::ItemStatus;
