//! Server state
//!
//! [`ServerState`] is constructed once at process start and handed to every
//! router; request handlers receive their data-access components through
//! it rather than through any global registry.

use std::sync::Arc;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use surrealdb::RecordId;

use crate::auth::{JwtService, password};
use crate::core::Config;
use crate::db::DbService;
use crate::db::models::{AdminProfile, MasterAccount, Role};
use crate::db::repository::{AccountRepository, AdminRepository};
use crate::db::sequence::{SequenceService, sequences};
use crate::ticketing::IssuanceManager;
use crate::utils::{AppError, time};

/// Shared server state. Cheap to clone; all services are behind `Arc` or
/// internally shared handles.
#[derive(Clone)]
pub struct ServerState {
    /// Server configuration (immutable after startup)
    pub config: Config,
    /// Embedded database handle
    pub db: Surreal<Db>,
    /// JWT service
    pub jwt_service: Arc<JwtService>,
    /// Identifier sequences
    pub sequences: SequenceService,
    /// Checkout and issuance workflows (owns the per-event locks)
    pub issuance: Arc<IssuanceManager>,
}

impl ServerState {
    /// Initialize the work directory, database and services
    pub async fn initialize(config: &Config) -> Result<Self, AppError> {
        config.ensure_work_dir_structure()?;

        let db_service = DbService::new(&config.database_dir()).await?;
        let db = db_service.db;

        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        let sequences = SequenceService::new(db.clone());
        let issuance = Arc::new(IssuanceManager::new(db.clone()));

        let state = Self {
            config: config.clone(),
            db,
            jwt_service,
            sequences,
            issuance,
        };

        state.ensure_bootstrap_admin().await?;

        Ok(state)
    }

    /// Create the initial admin account from ADMIN_EMAIL / ADMIN_PASSWORD
    /// when configured and not yet present. Later admins are created
    /// through the admin API.
    async fn ensure_bootstrap_admin(&self) -> Result<(), AppError> {
        let (Ok(email), Ok(pass)) = (std::env::var("ADMIN_EMAIL"), std::env::var("ADMIN_PASSWORD"))
        else {
            return Ok(());
        };

        let accounts = AccountRepository::new(self.db.clone());
        if accounts.find_by_email(&email).await?.is_some() {
            return Ok(());
        }

        let now = time::now_millis();
        let account_id = self.sequences.next_value(sequences::ACCOUNTS).await?;
        let admin_id = self.sequences.next_value(sequences::ADMINS).await?;

        AdminRepository::new(self.db.clone())
            .create(AdminProfile {
                id: None,
                admin_id,
                account: RecordId::from_table_key("account", account_id),
                display_name: "Administrator".to_string(),
                created_at: now,
            })
            .await?;

        accounts
            .create(MasterAccount {
                id: None,
                account_id,
                email: email.clone(),
                password_hash: Some(password::hash_password(&pass)?),
                role: Role::Admin,
                role_id: admin_id,
                email_verified: true,
                last_login: None,
                created_at: now,
            })
            .await?;

        tracing::info!(account_id, admin_id, "bootstrap admin created");
        Ok(())
    }

    pub fn get_db(&self) -> Surreal<Db> {
        self.db.clone()
    }

    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }
}
