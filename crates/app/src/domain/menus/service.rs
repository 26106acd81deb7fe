//! Menu catalog service: browsing plus the admin CRUD surface.

use std::sync::Arc;

use async_trait::async_trait;
use foodiehub::{MenuItem, RecordId, envelope};
use mockall::automock;
use tracing::{info, warn};

use crate::{
    clients::MenuApi,
    domain::menus::{MenusServiceError, models::MenuItemDraft},
};

/// Menu service over the remote catalog endpoints.
pub struct RemoteMenusService {
    api: Arc<dyn MenuApi>,
}

impl RemoteMenusService {
    #[must_use]
    pub fn new(api: Arc<dyn MenuApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl MenusService for RemoteMenusService {
    #[tracing::instrument(name = "menus.fetch", skip_all, err)]
    async fn menu(&self) -> Result<Vec<MenuItem>, MenusServiceError> {
        let body = self.api.menu().await?;
        let records = envelope::records(body);
        let fetched = records.len();

        let items: Vec<MenuItem> = records.iter().filter_map(MenuItem::from_wire).collect();

        if items.len() < fetched {
            warn!(
                dropped = fetched - items.len(),
                "dropped menu records without a resolvable id"
            );
        }

        Ok(items)
    }

    #[tracing::instrument(name = "menus.save", skip_all, fields(id = ?draft.id), err)]
    async fn save(&self, draft: &MenuItemDraft) -> Result<(), MenusServiceError> {
        let payload = draft.to_wire();

        // POST creates, PUT updates; the id decides which.
        if draft.id.is_some() {
            self.api.update_item(payload).await?;
            info!(name = %draft.name, "menu item updated");
        } else {
            self.api.add_item(payload).await?;
            info!(name = %draft.name, "menu item added");
        }

        Ok(())
    }

    #[tracing::instrument(name = "menus.delete", skip(self), err)]
    async fn delete(&self, id: &RecordId) -> Result<(), MenusServiceError> {
        self.api.delete_item(id).await?;
        Ok(())
    }
}

/// The menu catalog, browsed by everyone and edited by operators.
#[automock]
#[async_trait]
pub trait MenusService: Send + Sync {
    /// The full catalog, canonicalized; records without an id are dropped.
    async fn menu(&self) -> Result<Vec<MenuItem>, MenusServiceError>;

    /// Create (no id) or update (id set) a catalog entry.
    async fn save(&self, draft: &MenuItemDraft) -> Result<(), MenusServiceError>;

    /// Remove a catalog entry.
    async fn delete(&self, id: &RecordId) -> Result<(), MenusServiceError>;
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use testresult::TestResult;

    use crate::clients::MockMenuApi;

    use super::*;

    #[tokio::test]
    async fn menu_unwraps_envelopes_and_drops_idless_records() -> TestResult {
        let mut api = MockMenuApi::new();
        api.expect_menu().returning(|| {
            Ok(json!({"data": [
                {"menuid": 31, "name": "Margherita Pizza", "price": 799},
                {"name": "Mystery Special", "price": 1},
            ]}))
        });

        let service = RemoteMenusService::new(Arc::new(api));
        let items = service.menu().await?;

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id.as_str(), "31");

        Ok(())
    }

    #[tokio::test]
    async fn save_routes_on_the_presence_of_an_id() -> TestResult {
        let mut api = MockMenuApi::new();
        api.expect_add_item()
            .withf(|payload| payload.get("id").is_none())
            .times(1)
            .returning(|_| Ok(()));
        api.expect_update_item()
            .withf(|payload| payload["menuId"] == "31")
            .times(1)
            .returning(|_| Ok(()));

        let service = RemoteMenusService::new(Arc::new(api));

        let mut draft = MenuItemDraft {
            id: None,
            name: "Halloumi Wrap".to_owned(),
            description: String::new(),
            price: rust_decimal::Decimal::from(450),
            category: None,
            image: None,
        };

        service.save(&draft).await?;

        draft.id = RecordId::new("31");
        service.save(&draft).await?;

        Ok(())
    }
}
