//! Account and session endpoints.

use async_trait::async_trait;
use reqwest::Method;
use serde_json::json;

use dishhub_core::result::PlatformResult;
use dishhub_core::traits::account::{AccountService, SessionTarget};
use dishhub_core::types::id::UserId;
use dishhub_core::types::record::{AccountRecord, SessionRecord};

use super::client::AppwriteClient;

/// Account service of the hosted platform.
#[derive(Debug, Clone)]
pub struct AppwriteAccount {
    client: AppwriteClient,
}

impl AppwriteAccount {
    pub fn new(client: AppwriteClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AccountService for AppwriteAccount {
    async fn create_account(
        &self,
        user_id: &UserId,
        email: &str,
        password: &str,
        name: &str,
    ) -> PlatformResult<AccountRecord> {
        let url = self.client.url("/account")?;
        let body = json!({
            "userId": user_id,
            "email": email,
            "password": password,
            "name": name,
        });
        self.client
            .send_json(self.client.request(Method::POST, url).json(&body))
            .await
    }

    async fn create_email_session(
        &self,
        email: &str,
        password: &str,
    ) -> PlatformResult<SessionRecord> {
        let url = self.client.url("/account/sessions/email")?;
        let body = json!({ "email": email, "password": password });
        self.client
            .send_json(self.client.request(Method::POST, url).json(&body))
            .await
    }

    async fn current_account(&self) -> PlatformResult<AccountRecord> {
        let url = self.client.url("/account")?;
        self.client
            .send_json(self.client.request(Method::GET, url))
            .await
    }

    async fn delete_session(&self, target: SessionTarget) -> PlatformResult<()> {
        let url = self
            .client
            .url(&format!("/account/sessions/{}", target.as_path_segment()))?;
        let result = self
            .client
            .send_empty(self.client.request(Method::DELETE, url))
            .await;
        if target == SessionTarget::Current {
            self.client.set_session(None);
        }
        result
    }

    fn export_session(&self) -> Option<String> {
        self.client.session()
    }

    fn import_session(&self, credential: String) {
        self.client.set_session(Some(credential));
    }
}
