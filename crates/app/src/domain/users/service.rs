//! Admin user management.

use std::sync::Arc;

use async_trait::async_trait;
use foodiehub::{RecordId, UserAccount, envelope};
use mockall::automock;
use tracing::{debug, info};

use crate::{clients::IdentityApi, domain::users::UsersServiceError};

/// User admin service over the identity endpoints.
pub struct RemoteUsersService {
    api: Arc<dyn IdentityApi>,
}

impl RemoteUsersService {
    #[must_use]
    pub fn new(api: Arc<dyn IdentityApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl UsersService for RemoteUsersService {
    #[tracing::instrument(name = "users.fetch", skip_all, err)]
    async fn users(&self) -> Result<Vec<UserAccount>, UsersServiceError> {
        let body = self.api.users().await?;

        Ok(envelope::records(body)
            .iter()
            .map(UserAccount::from_wire)
            .collect())
    }

    #[tracing::instrument(name = "users.delete", skip(self), err)]
    async fn delete_user(&self, id: &RecordId) -> Result<(), UsersServiceError> {
        // Deployed identity revisions disagree on the deletion endpoint
        // shape; probe the three observed forms in fixed order, first 2xx
        // wins.
        let by_path = match self.api.delete_user(id).await {
            Ok(()) => {
                info!(%id, "user deleted");
                return Ok(());
            }
            Err(error) => error,
        };

        debug!(%id, error = %by_path, "path-style user deletion failed, trying body form");

        let by_body = match self.api.delete_user_with_body(id).await {
            Ok(()) => {
                info!(%id, "user deleted");
                return Ok(());
            }
            Err(error) => error,
        };

        debug!(%id, error = %by_body, "body-style user deletion failed, trying POST form");

        self.api.delete_user_via_post(id).await?;
        info!(%id, "user deleted");

        Ok(())
    }
}

/// The operator's view of the registered user base.
#[automock]
#[async_trait]
pub trait UsersService: Send + Sync {
    /// Every registered account, canonicalized.
    async fn users(&self) -> Result<Vec<UserAccount>, UsersServiceError>;

    /// Remove an account, probing the deletion endpoint variants in order.
    async fn delete_user(&self, id: &RecordId) -> Result<(), UsersServiceError>;
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;
    use serde_json::json;
    use testresult::TestResult;

    use crate::clients::{ApiError, MockIdentityApi};

    use super::*;

    fn not_found() -> ApiError {
        ApiError::Status {
            status: StatusCode::NOT_FOUND,
            message: String::new(),
        }
    }

    #[tokio::test]
    async fn users_canonicalize_contact_fields() -> TestResult {
        let mut api = MockIdentityApi::new();
        api.expect_users().returning(|| {
            Ok(json!([
                {"userId": 12, "name": "Bimal", "email": "b@x.com", "phoneNumber": "98000", "role": "ADMIN"},
                {"id": 13, "fullName": "Mina", "email": "m@x.com"},
            ]))
        });

        let service = RemoteUsersService::new(Arc::new(api));
        let users = service.users().await?;

        assert_eq!(users.len(), 2);
        assert_eq!(users[0].phone, "98000");
        assert!(users[0].principal.role.is_admin());
        assert_eq!(users[1].principal.name, "Mina");

        Ok(())
    }

    #[tokio::test]
    async fn deletion_stops_at_the_first_variant_that_lands() -> TestResult {
        let mut api = MockIdentityApi::new();
        api.expect_delete_user().times(1).returning(|_| Ok(()));
        // Fallbacks must not run after a 2xx.

        let service = RemoteUsersService::new(Arc::new(api));
        service.delete_user(&RecordId::from(12_i64)).await?;

        Ok(())
    }

    #[tokio::test]
    async fn deletion_probes_all_variants_in_order() -> TestResult {
        let mut api = MockIdentityApi::new();
        api.expect_delete_user()
            .times(1)
            .returning(|_| Err(not_found()));
        api.expect_delete_user_with_body()
            .times(1)
            .returning(|_| Err(not_found()));
        api.expect_delete_user_via_post()
            .times(1)
            .returning(|_| Ok(()));

        let service = RemoteUsersService::new(Arc::new(api));
        service.delete_user(&RecordId::from(12_i64)).await?;

        Ok(())
    }

    #[tokio::test]
    async fn deletion_surfaces_the_last_error_when_every_variant_fails() {
        let mut api = MockIdentityApi::new();
        api.expect_delete_user().returning(|_| Err(not_found()));
        api.expect_delete_user_with_body()
            .returning(|_| Err(not_found()));
        api.expect_delete_user_via_post()
            .returning(|_| Err(not_found()));

        let service = RemoteUsersService::new(Arc::new(api));
        let result = service.delete_user(&RecordId::from(12_i64)).await;

        assert!(matches!(result, Err(UsersServiceError::Api(_))));
    }
}
