//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use dishhub_auth::{RetryPolicy, SessionManager, SignUpForm};
use dishhub_core::config::{AppConfig, PlatformProvider};
use dishhub_entity::user::User;
use dishhub_platform::{MemoryPlatform, Platform};
use dishhub_service::{DishService, ImageUpload};

pub const DATABASE: &str = "db";
pub const COLLECTION: &str = "dishes";
pub const BUCKET: &str = "images";

/// Test application context over the in-memory platform
pub struct TestApp {
    pub memory: MemoryPlatform,
    pub platform: Platform,
    pub session: Arc<SessionManager>,
    pub dishes: DishService,
    pub config: AppConfig,
}

impl TestApp {
    /// Create a new test application with an anonymous, resolved session
    pub async fn new() -> Self {
        let app = Self::unresolved();
        app.session.initialize().await;
        app
    }

    /// Create a new test application whose session is still pending
    pub fn unresolved() -> Self {
        let config = test_config();
        let memory = MemoryPlatform::new("memory://dishhub", "proj");
        let platform = Platform::in_memory(memory.clone());
        let session = Arc::new(SessionManager::new(platform.account(), RetryPolicy::none()));
        let dishes = DishService::new(&platform, &config);

        Self {
            memory,
            platform,
            session,
            dishes,
            config,
        }
    }

    /// Sign up a fresh account; the session ends up authenticated
    pub async fn sign_up(&self, name: &str, email: &str) -> User {
        self.session
            .sign_up(&SignUpForm::new(name, email, "password1", "password1"))
            .await
            .expect("Failed to sign up")
    }
}

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.platform.provider = PlatformProvider::Memory;
    config.platform.endpoint = "memory://dishhub".to_string();
    config.platform.project_id = "proj".to_string();
    config.platform.database_id = DATABASE.to_string();
    config.platform.collection_id = COLLECTION.to_string();
    config.platform.bucket_id = BUCKET.to_string();
    config
}

pub fn jpeg(name: &str) -> ImageUpload {
    ImageUpload::new(name, vec![0xffu8, 0xd8, 0xff, 0xe0])
}
