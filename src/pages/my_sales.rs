//! "My sales / donations" listing.
//!
//! Holds the page state a renderer draws from and exposes one handler per
//! user action. Handlers never panic on API failures: they queue a [`Notice`]
//! and leave the page in its pre-action state.

use crate::error::ApiError;
use crate::http_client::Transport;
use crate::models::{Item, ItemId, ItemStatus};
use crate::services::ItemService;
use crate::session::SessionUser;

use super::{Navigation, Notice};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListingView {
    #[default]
    Sales,
    Purchases,
}

impl ListingView {
    pub fn label(&self) -> &'static str {
        match self {
            ListingView::Sales => "Minhas vendas / doações",
            ListingView::Purchases => "Minhas compras / trocas",
        }
    }
}

pub struct MySalesPage<T> {
    items_api: ItemService<T>,
    user: Option<SessionUser>,
    view: ListingView,
    items: Vec<Item>,
    loading: bool,
    pending_delete: Option<Item>,
    delete_dialog_open: bool,
    deleting: bool,
    notices: Vec<Notice>,
    navigation: Option<Navigation>,
}

impl<T: Transport> MySalesPage<T> {
    pub fn new(items_api: ItemService<T>, user: Option<SessionUser>) -> Self {
        Self {
            items_api,
            user,
            view: ListingView::Sales,
            items: Vec::new(),
            loading: true,
            pending_delete: None,
            delete_dialog_open: false,
            deleting: false,
            notices: Vec::new(),
            navigation: None,
        }
    }

    pub fn view(&self) -> ListingView {
        self.view
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn pending_delete(&self) -> Option<&Item> {
        self.pending_delete.as_ref()
    }

    pub fn is_delete_dialog_open(&self) -> bool {
        self.delete_dialog_open
    }

    /// True while a delete request is in flight; dialog controls are disabled.
    pub fn is_deleting(&self) -> bool {
        self.deleting
    }

    pub fn navigation(&self) -> Option<&Navigation> {
        self.navigation.as_ref()
    }

    pub fn take_navigation(&mut self) -> Option<Navigation> {
        self.navigation.take()
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Fetches every item and keeps the ones owned by the session user.
    pub async fn load(&mut self) {
        let Some(user_id) = self.user.as_ref().map(|u| u.id) else {
            tracing::warn!("No signed-in user, skipping item load");
            self.loading = false;
            self.navigation = Some(Navigation::Login);
            return;
        };

        self.loading = true;
        match self.items_api.list_all().await {
            Ok(all_items) => {
                self.items = all_items
                    .into_iter()
                    .filter(|item| item.owner_id == user_id)
                    .collect();
            }
            Err(e) => self.report_error("Failed to load items", &e),
        }
        self.loading = false;
    }

    /// Switches the heading label. Both views show the same owned items.
    pub fn set_view(&mut self, view: ListingView) {
        self.view = view;
    }

    pub fn request_edit(&mut self, item: &Item) {
        self.navigation = Some(Navigation::EditItem(item.id));
    }

    pub fn request_show(&mut self, item: &Item) {
        self.navigation = Some(Navigation::ShowItem(item.id));
    }

    pub fn request_back(&mut self) {
        self.navigation = Some(Navigation::Back);
    }

    pub fn request_delete(&mut self, item: &Item) {
        self.pending_delete = Some(item.clone());
        self.delete_dialog_open = true;
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
        self.delete_dialog_open = false;
    }

    pub async fn confirm_delete(&mut self) {
        let Some(target_id) = self.pending_delete.as_ref().map(|item| item.id) else {
            return;
        };

        self.deleting = true;
        match self.items_api.delete(target_id).await {
            Ok(()) => {
                self.notices.push(Notice::success("Item deleted"));
                self.items = self
                    .items
                    .iter()
                    .filter(|item| item.id != target_id)
                    .cloned()
                    .collect();
                self.delete_dialog_open = false;
                self.pending_delete = None;
            }
            Err(e) => self.report_error("Failed to delete item", &e),
        }
        self.deleting = false;
    }

    /// Statuses the renderer should offer for the item, current one first.
    pub fn status_options(&self, id: ItemId) -> Vec<ItemStatus> {
        self.items
            .iter()
            .find(|item| item.id == id)
            .map(|item| item.status.selectable_targets())
            .unwrap_or_default()
    }

    pub async fn change_status(&mut self, id: ItemId, new_status: ItemStatus) {
        let Some(current) = self.items.iter().find(|item| item.id == id) else {
            return;
        };
        if current.status == new_status {
            return;
        }

        match self.items_api.set_status(id, new_status.clone()).await {
            Ok(()) => {
                self.notices.push(Notice::success("Status updated"));
                self.items = self
                    .items
                    .iter()
                    .map(|item| {
                        if item.id == id {
                            item.with_status(new_status.clone())
                        } else {
                            item.clone()
                        }
                    })
                    .collect();
            }
            Err(e) => self.report_error("Failed to update status", &e),
        }
    }

    fn report_error(&mut self, context: &str, err: &ApiError) {
        self.notices
            .push(Notice::error(format!("{}: {}", context, err.user_message())));
        if err.is_unauthorized() {
            self.navigation = Some(Navigation::Login);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http_client::mock::MockTransport;
    use crate::pages::NoticeLevel;
    use serde_json::{json, Value};

    fn item_json(id: i64, owner_id: i64, status: &str) -> Value {
        json!({
            "id": id,
            "title": format!("Item {}", id),
            "description": "desc",
            "price": 25.0,
            "available": status == "DISPONIVEL",
            "status": status,
            "ownerId": owner_id,
            "owner": { "id": owner_id, "name": "Owner", "email": "owner@example.com" },
            "createdAt": "2025-11-28T00:52:39Z"
        })
    }

    fn user(id: i64) -> SessionUser {
        SessionUser {
            id,
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
        }
    }

    async fn loaded_page(mock: &MockTransport, listing: Value) -> MySalesPage<MockTransport> {
        mock.respond(Ok(listing));
        let mut page = MySalesPage::new(ItemService::new(mock.clone()), Some(user(7)));
        page.load().await;
        page
    }

    fn ids(page: &MySalesPage<MockTransport>) -> Vec<ItemId> {
        page.items().iter().map(|item| item.id).collect()
    }

    #[test]
    fn test_initial_state() {
        let page = MySalesPage::new(ItemService::new(MockTransport::new()), Some(user(7)));
        assert!(page.is_loading());
        assert!(page.items().is_empty());
        assert_eq!(page.view(), ListingView::Sales);
        assert!(page.pending_delete().is_none());
        assert!(!page.is_delete_dialog_open());
    }

    #[tokio::test]
    async fn test_load_keeps_own_items_in_server_order() {
        let mock = MockTransport::new();
        let page = loaded_page(
            &mock,
            json!([
                item_json(1, 7, "DISPONIVEL"),
                item_json(2, 3, "DISPONIVEL"),
                item_json(3, 7, "RESERVADO")
            ]),
        )
        .await;

        assert_eq!(ids(&page), vec![1, 3]);
        assert!(!page.is_loading());
        assert!(page.notices().is_empty());
    }

    #[tokio::test]
    async fn test_load_failure_leaves_items_empty() {
        let mock = MockTransport::new();
        mock.respond(Err(ApiError::request(Some(500), "database offline")));
        let mut page = MySalesPage::new(ItemService::new(mock), Some(user(7)));

        page.load().await;

        assert!(!page.is_loading());
        assert!(page.items().is_empty());
        let notices = page.take_notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, NoticeLevel::Error);
        assert!(notices[0].message.contains("database offline"));
    }

    #[tokio::test]
    async fn test_load_without_user_requests_login() {
        let mock = MockTransport::new();
        let mut page = MySalesPage::new(ItemService::new(mock.clone()), None);

        page.load().await;

        assert!(mock.calls().is_empty());
        assert!(!page.is_loading());
        assert_eq!(page.navigation(), Some(&Navigation::Login));
    }

    #[tokio::test]
    async fn test_toggle_view_keeps_items() {
        let mock = MockTransport::new();
        let mut page = loaded_page(&mock, json!([item_json(1, 7, "DISPONIVEL")])).await;
        let before = page.items().to_vec();

        page.set_view(ListingView::Purchases);

        assert_eq!(page.view().label(), "Minhas compras / trocas");
        assert_eq!(page.items(), before.as_slice());
        assert_eq!(mock.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_same_status_is_a_no_op() {
        let mock = MockTransport::new();
        let mut page = loaded_page(&mock, json!([item_json(1, 7, "RESERVADO")])).await;
        let before = page.items().to_vec();

        page.change_status(1, ItemStatus::Reserved).await;

        assert_eq!(mock.calls().len(), 1);
        assert_eq!(page.items(), before.as_slice());
        assert!(page.notices().is_empty());
    }

    #[tokio::test]
    async fn test_change_status_updates_availability() {
        let mock = MockTransport::new();
        let mut page = loaded_page(
            &mock,
            json!([item_json(1, 7, "DISPONIVEL"), item_json(2, 7, "RESERVADO")]),
        )
        .await;

        mock.respond(Ok(item_json(1, 7, "RESERVADO")));
        page.change_status(1, ItemStatus::Reserved).await;
        assert_eq!(page.items()[0].status, ItemStatus::Reserved);
        assert!(!page.items()[0].available);

        mock.respond(Ok(item_json(2, 7, "DISPONIVEL")));
        page.change_status(2, ItemStatus::Available).await;
        assert_eq!(page.items()[1].status, ItemStatus::Available);
        assert!(page.items()[1].available);

        assert_eq!(mock.calls()[1].endpoint, "/items/1/status");
        assert_eq!(mock.calls()[2].endpoint, "/items/2/status");
        assert_eq!(ids(&page), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_change_status_failure_keeps_items() {
        let mock = MockTransport::new();
        let mut page = loaded_page(&mock, json!([item_json(1, 7, "DISPONIVEL")])).await;
        let before = page.items().to_vec();

        mock.respond(Err(ApiError::request(Some(422), "invalid transition")));
        page.change_status(1, ItemStatus::SoldOrDonated).await;

        assert_eq!(page.items(), before.as_slice());
        let notices = page.take_notices();
        assert!(notices[0].message.contains("invalid transition"));
    }

    #[tokio::test]
    async fn test_status_options_follow_policy() {
        let mock = MockTransport::new();
        let page = loaded_page(&mock, json!([item_json(1, 7, "DOADO_VENDIDO")])).await;
        assert_eq!(page.status_options(1), vec![ItemStatus::SoldOrDonated]);
        assert!(page.status_options(99).is_empty());
    }

    #[tokio::test]
    async fn test_request_delete_does_not_touch_items() {
        let mock = MockTransport::new();
        let mut page = loaded_page(&mock, json!([item_json(42, 7, "DISPONIVEL")])).await;
        let target = page.items()[0].clone();

        page.request_delete(&target);

        assert!(page.is_delete_dialog_open());
        assert_eq!(page.pending_delete().map(|i| i.id), Some(42));
        assert_eq!(ids(&page), vec![42]);
        assert_eq!(mock.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_confirm_delete_removes_item() {
        let mock = MockTransport::new();
        let mut page = loaded_page(
            &mock,
            json!([item_json(41, 7, "DISPONIVEL"), item_json(42, 7, "DISPONIVEL")]),
        )
        .await;
        let target = page.items()[1].clone();
        page.request_delete(&target);

        mock.respond(Ok(Value::Null));
        page.confirm_delete().await;

        assert_eq!(ids(&page), vec![41]);
        assert!(!page.is_delete_dialog_open());
        assert!(page.pending_delete().is_none());
        assert!(!page.is_deleting());
        assert_eq!(page.take_notices()[0].level, NoticeLevel::Success);
    }

    #[tokio::test]
    async fn test_failed_delete_keeps_dialog_open() {
        let mock = MockTransport::new();
        let mut page = loaded_page(&mock, json!([item_json(42, 7, "DISPONIVEL")])).await;
        let target = page.items()[0].clone();
        page.request_delete(&target);

        mock.respond(Err(ApiError::request(Some(409), "item has pending offers")));
        page.confirm_delete().await;

        assert_eq!(ids(&page), vec![42]);
        assert!(page.is_delete_dialog_open());
        assert_eq!(page.pending_delete().map(|i| i.id), Some(42));
        assert!(!page.is_deleting());
        let notices = page.take_notices();
        assert_eq!(notices[0].level, NoticeLevel::Error);
        assert!(notices[0].message.contains("item has pending offers"));
    }

    #[tokio::test]
    async fn test_cancel_delete() {
        let mock = MockTransport::new();
        let mut page = loaded_page(&mock, json!([item_json(42, 7, "DISPONIVEL")])).await;
        let target = page.items()[0].clone();
        page.request_delete(&target);

        page.cancel_delete();
        page.confirm_delete().await;

        assert!(!page.is_delete_dialog_open());
        assert!(page.pending_delete().is_none());
        assert_eq!(ids(&page), vec![42]);
        assert_eq!(mock.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_unauthorized_requests_login_without_mutation() {
        let mock = MockTransport::new();
        let mut page = loaded_page(&mock, json!([item_json(1, 7, "DISPONIVEL")])).await;
        let before = page.items().to_vec();

        mock.respond(Err(ApiError::Unauthorized { status: 403 }));
        page.change_status(1, ItemStatus::Reserved).await;

        assert_eq!(page.items(), before.as_slice());
        assert_eq!(page.take_navigation(), Some(Navigation::Login));
    }

    #[tokio::test]
    async fn test_edit_and_show_navigation() {
        let mock = MockTransport::new();
        let mut page = loaded_page(&mock, json!([item_json(5, 7, "DISPONIVEL")])).await;
        let item = page.items()[0].clone();

        page.request_edit(&item);
        assert_eq!(page.take_navigation().map(|n| n.path()), Some("/edit-item/5".to_string()));

        page.request_show(&item);
        assert_eq!(page.take_navigation(), Some(Navigation::ShowItem(5)));
        assert_eq!(ids(&page), vec![5]);
    }

    #[tokio::test]
    async fn test_status_change_confirmed_by_partial_response() {
        let mock = MockTransport::new();
        let mut page = loaded_page(&mock, json!([item_json(1, 7, "DISPONIVEL")])).await;

        mock.respond(Ok(json!({ "id": 1, "status": "RESERVADO", "available": false })));
        page.change_status(1, ItemStatus::Reserved).await;

        assert_eq!(page.items()[0].status, ItemStatus::Reserved);
        assert!(!page.items()[0].available);
        let notices = page.take_notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, NoticeLevel::Success);
    }
}
