use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::error::{ApiError, ApiResult};
use crate::http_client::Transport;
use crate::models::{CreateItem, Item, ItemId, ItemStatus, UpdateItem};

/// Typed access to the `/items` resource.
///
/// Every call is logged on entry and on completion; failures are returned to
/// the caller unchanged.
#[derive(Clone)]
pub struct ItemService<T> {
    transport: T,
}

impl<T: Transport> ItemService<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn decode<D: DeserializeOwned>(data: Value) -> ApiResult<D> {
        serde_json::from_value(data)
            .map_err(|e| ApiError::Unknown(format!("Unexpected response payload: {}", e)))
    }

    pub async fn list_all(&self) -> ApiResult<Vec<Item>> {
        tracing::debug!("Fetching items");
        let result = self.transport.get("/items").await.and_then(|data| {
            if data.is_null() {
                Ok(Vec::new())
            } else {
                Self::decode::<Vec<Item>>(data)
            }
        });

        match result {
            Ok(items) => {
                tracing::info!(count = items.len(), "Items loaded");
                Ok(items)
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to load items");
                Err(e)
            }
        }
    }

    pub async fn get(&self, id: ItemId) -> ApiResult<Item> {
        tracing::debug!(item_id = id, "Fetching item");
        let result = self
            .transport
            .get(&format!("/items/{}", id))
            .await
            .and_then(Self::decode::<Item>);

        match result {
            Ok(item) => {
                tracing::info!(item_id = id, title = %item.title, "Item loaded");
                Ok(item)
            }
            Err(e) => {
                tracing::error!(item_id = id, error = %e, "Failed to load item");
                Err(e)
            }
        }
    }

    pub async fn create(&self, data: &CreateItem) -> ApiResult<Item> {
        tracing::info!(title = %data.title, "Creating item");
        let body = serde_json::to_value(data)
            .map_err(|e| ApiError::Unknown(format!("Failed to encode item: {}", e)))?;
        let result = self
            .transport
            .post("/items", Some(body))
            .await
            .and_then(Self::decode::<Item>);

        match result {
            Ok(item) => {
                tracing::info!(item_id = item.id, title = %item.title, "Item created");
                Ok(item)
            }
            Err(e) => {
                tracing::error!(title = %data.title, error = %e, "Failed to create item");
                Err(e)
            }
        }
    }

    pub async fn update(&self, id: ItemId, data: &UpdateItem) -> ApiResult<Item> {
        let updates = data.changed_fields();
        tracing::info!(item_id = id, updates = ?updates, "Updating item");
        let body = serde_json::to_value(data)
            .map_err(|e| ApiError::Unknown(format!("Failed to encode item update: {}", e)))?;
        let result = self
            .transport
            .put(&format!("/items/{}", id), body)
            .await
            .and_then(Self::decode::<Item>);

        match result {
            Ok(item) => {
                tracing::info!(item_id = id, "Item updated");
                Ok(item)
            }
            Err(e) => {
                tracing::error!(item_id = id, error = %e, "Failed to update item");
                Err(e)
            }
        }
    }

    pub async fn delete(&self, id: ItemId) -> ApiResult<()> {
        tracing::info!(item_id = id, "Deleting item");
        match self.transport.delete(&format!("/items/{}", id)).await {
            Ok(_) => {
                tracing::info!(item_id = id, "Item deleted");
                Ok(())
            }
            Err(e) => {
                tracing::error!(item_id = id, error = %e, "Failed to delete item");
                Err(e)
            }
        }
    }

    /// Changes the status and returns the item the server sends back.
    pub async fn update_status(&self, id: ItemId, status: ItemStatus) -> ApiResult<Item> {
        let data = self.patch_status(id, &status).await?;
        Self::decode::<Item>(data).map_err(|e| {
            tracing::error!(item_id = id, status = %status, error = %e, "Unreadable item in status response");
            e
        })
    }

    /// Changes the status without reading the returned item. The envelope's
    /// success alone confirms the change.
    pub async fn set_status(&self, id: ItemId, status: ItemStatus) -> ApiResult<()> {
        self.patch_status(id, &status).await.map(|_| ())
    }

    async fn patch_status(&self, id: ItemId, status: &ItemStatus) -> ApiResult<Value> {
        tracing::info!(item_id = id, status = %status, "Updating item status");
        let result = self
            .transport
            .patch(
                &format!("/items/{}/status", id),
                json!({ "status": status }),
            )
            .await;

        match result {
            Ok(data) => {
                tracing::info!(item_id = id, status = %status, "Item status updated");
                Ok(data)
            }
            Err(e) => {
                tracing::error!(item_id = id, status = %status, error = %e, "Failed to update item status");
                Err(e)
            }
        }
    }

    /// Any signed-in user may reserve an available item.
    pub async fn reserve(&self, id: ItemId) -> ApiResult<Item> {
        tracing::info!(item_id = id, "Reserving item");
        let result = self
            .transport
            .post(&format!("/items/{}/reserve", id), None)
            .await
            .and_then(Self::decode::<Item>);

        match result {
            Ok(item) => {
                tracing::info!(item_id = id, "Item reserved");
                Ok(item)
            }
            Err(e) => {
                tracing::error!(item_id = id, error = %e, "Failed to reserve item");
                Err(e)
            }
        }
    }

    /// Any signed-in user may buy an available or reserved item.
    pub async fn buy(&self, id: ItemId) -> ApiResult<Item> {
        tracing::info!(item_id = id, "Buying item");
        let result = self
            .transport
            .post(&format!("/items/{}/buy", id), None)
            .await
            .and_then(Self::decode::<Item>);

        match result {
            Ok(item) => {
                tracing::info!(item_id = id, "Item bought");
                Ok(item)
            }
            Err(e) => {
                tracing::error!(item_id = id, error = %e, "Failed to buy item");
                Err(e)
            }
        }
    }
}
