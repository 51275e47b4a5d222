//! Everything a command needs, built once per invocation.
//!
//! The session credential is kept in a file between invocations so a
//! sign-in survives until sign-out.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, warn};

use dishhub_auth::{RetryPolicy, SessionManager};
use dishhub_core::config::AppConfig;
use dishhub_core::error::AppError;
use dishhub_core::result::AppResult;
use dishhub_entity::user::User;
use dishhub_platform::Platform;
use dishhub_service::DishService;

/// Configured platform, session and content repository.
#[derive(Debug)]
pub struct CliContext {
    pub config: AppConfig,
    pub platform: Platform,
    pub session: Arc<SessionManager>,
    pub dishes: DishService,
    session_file: PathBuf,
}

impl CliContext {
    /// Build the platform from configuration, restore any saved session and
    /// resolve who is signed in.
    pub async fn open(config: AppConfig) -> AppResult<Self> {
        let platform = Platform::new(&config.platform)?;
        Self::with_platform(config, platform).await
    }

    pub async fn with_platform(config: AppConfig, platform: Platform) -> AppResult<Self> {
        let session = Arc::new(SessionManager::new(
            platform.account(),
            RetryPolicy::from_config(&config.session.signup_retry),
        ));
        let dishes = DishService::new(&platform, &config);
        let session_file = PathBuf::from(&config.session.session_file);

        if let Some(credential) = read_credential(&session_file).await? {
            debug!(path = %session_file.display(), "Restoring saved session");
            session.import_session(credential);
        }
        session.initialize().await;

        Ok(Self {
            config,
            platform,
            session,
            dishes,
            session_file,
        })
    }

    /// The signed-in user, or an authentication error.
    pub fn require_user(&self) -> AppResult<User> {
        self.session
            .current_user()
            .ok_or_else(|| AppError::authentication("You must be signed in. Run `dishhub login`."))
    }

    pub fn session_file(&self) -> &Path {
        &self.session_file
    }

    /// Save the held credential, or remove the file when there is none.
    pub async fn persist_session(&self) -> AppResult<()> {
        match self.session.export_session() {
            Some(credential) => {
                if let Some(parent) = self.session_file.parent() {
                    if !parent.as_os_str().is_empty() {
                        tokio::fs::create_dir_all(parent).await?;
                    }
                }
                tokio::fs::write(&self.session_file, credential).await?;
            }
            None => match tokio::fs::remove_file(&self.session_file).await {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    warn!(path = %self.session_file.display(), error = %e, "Failed to remove session file");
                    return Err(e.into());
                }
            },
        }
        Ok(())
    }
}

async fn read_credential(path: &Path) -> AppResult<Option<String>> {
    match tokio::fs::read_to_string(path).await {
        Ok(raw) => {
            let credential = raw.trim().to_string();
            Ok((!credential.is_empty()).then_some(credential))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}
