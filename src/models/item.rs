use chrono::{DateTime, Locale, Utc};
use serde::{Deserialize, Serialize};

use super::ItemStatus;

pub type ItemId = i64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemOwner {
    pub id: i64,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: ItemId,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub available: bool,
    pub status: ItemStatus,
    #[serde(default)]
    pub image_url: Option<String>,
    pub owner_id: i64,
    pub owner: ItemOwner,
    pub created_at: DateTime<Utc>,
}

impl Item {
    /// Copy of this item moved to `status`, with `available` kept in sync.
    pub fn with_status(&self, status: ItemStatus) -> Item {
        Item {
            available: status == ItemStatus::Available,
            status,
            ..self.clone()
        }
    }

    /// Listing date as shown to users, e.g. "28 de novembro".
    pub fn listed_on(&self) -> String {
        self.created_at
            .format_localized("%-d de %B", Locale::pt_BR)
            .to_string()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateItem {
    pub title: String,
    pub description: String,
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ItemStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ItemStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl UpdateItem {
    /// Names of the fields this update sets, in wire spelling.
    pub fn changed_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.title.is_some() {
            fields.push("title");
        }
        if self.description.is_some() {
            fields.push("description");
        }
        if self.price.is_some() {
            fields.push("price");
        }
        if self.available.is_some() {
            fields.push("available");
        }
        if self.status.is_some() {
            fields.push("status");
        }
        if self.image_url.is_some() {
            fields.push("imageUrl");
        }
        fields
    }

    pub fn is_empty(&self) -> bool {
        self.changed_fields().is_empty()
    }
}
