pub mod my_sales;

pub use my_sales::{ListingView, MySalesPage};

use crate::models::ItemId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// User-facing notification queued by a page handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Where a page asks the host to go next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    EditItem(ItemId),
    ShowItem(ItemId),
    Back,
    Login,
}

impl Navigation {
    pub fn path(&self) -> String {
        match self {
            Navigation::EditItem(id) => format!("/edit-item/{}", id),
            Navigation::ShowItem(id) => format!("/item/{}", id),
            Navigation::Back => "..".to_string(),
            Navigation::Login => "/login".to_string(),
        }
    }
}
