//! Application state - shared across all handlers.

use std::collections::HashSet;
use std::sync::Arc;

#[cfg(feature = "postgres")]
use anyhow::Context;

use yatube_core::forms::Locale;
use yatube_core::ports::{ADMIN_ROLE, GroupRepository, PostRepository, USER_ROLE, UserRepository};
use yatube_core::services::{GroupService, PostService};
use yatube_infra::InMemoryStore;

use crate::config::AppConfig;

#[cfg(feature = "postgres")]
use migration::{Migrator, MigratorTrait};
#[cfg(feature = "postgres")]
use yatube_infra::database::{
    DatabaseConnections, PostgresGroupRepository, PostgresPostRepository, PostgresUserRepository,
};

/// Repository handles behind the services.
struct Repositories {
    users: Arc<dyn UserRepository>,
    groups: Arc<dyn GroupRepository>,
    posts: Arc<dyn PostRepository>,
}

impl Repositories {
    fn in_memory() -> Self {
        let store = Arc::new(InMemoryStore::new());
        Self {
            users: store.clone(),
            groups: store.clone(),
            posts: store,
        }
    }

    #[cfg(feature = "postgres")]
    fn postgres(db: &DatabaseConnections) -> Self {
        Self {
            users: Arc::new(PostgresUserRepository::new(db.main.clone())),
            groups: Arc::new(PostgresGroupRepository::new(db.main.clone())),
            posts: Arc::new(PostgresPostRepository::new(db.main.clone())),
        }
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: PostService,
    pub groups: GroupService,
    pub users: Arc<dyn UserRepository>,
    #[cfg(feature = "postgres")]
    pub db: Option<Arc<DatabaseConnections>>,
    pub locale: Locale,
    admin_usernames: Arc<HashSet<String>>,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    ///
    /// An unreachable database falls back to the in-memory store; a reachable
    /// one whose schema cannot be migrated aborts startup.
    pub async fn new(config: &AppConfig) -> anyhow::Result<Self> {
        #[cfg(feature = "postgres")]
        let (db, repos) = match config.database.as_ref() {
            Some(db_config) => match DatabaseConnections::init(db_config).await {
                Ok(connections) => {
                    migrate(&connections).await?;
                    let repos = Repositories::postgres(&connections);
                    (Some(Arc::new(connections)), repos)
                }
                Err(e) => {
                    tracing::error!(
                        "Failed to connect to database: {}. Using in-memory store.",
                        e
                    );
                    (None, Repositories::in_memory())
                }
            },
            None => {
                tracing::warn!("DATABASE_URL not set. Running on the in-memory store.");
                (None, Repositories::in_memory())
            }
        };

        #[cfg(not(feature = "postgres"))]
        let repos = {
            if config.database.is_some() {
                tracing::warn!("DATABASE_URL ignored: built without the postgres feature");
            }
            Repositories::in_memory()
        };

        let mut state = Self::from_repositories(repos, config.locale);
        state.admin_usernames = Arc::new(config.admin_usernames.iter().cloned().collect());
        #[cfg(feature = "postgres")]
        {
            state.db = db;
        }

        tracing::info!(
            locale = ?state.locale,
            admins = state.admin_usernames.len(),
            "Application state initialized"
        );
        Ok(state)
    }

    /// State backed by a fresh in-memory store.
    pub fn in_memory(locale: Locale, admin_usernames: &[&str]) -> Self {
        let mut state = Self::from_repositories(Repositories::in_memory(), locale);
        state.admin_usernames = Arc::new(admin_usernames.iter().map(|s| s.to_string()).collect());
        state
    }

    fn from_repositories(repos: Repositories, locale: Locale) -> Self {
        Self {
            posts: PostService::new(repos.posts, repos.groups.clone(), repos.users.clone()),
            groups: GroupService::new(repos.groups),
            users: repos.users,
            #[cfg(feature = "postgres")]
            db: None,
            locale,
            admin_usernames: Arc::default(),
        }
    }

    /// Roles carried by tokens issued to `username`.
    pub fn roles_for(&self, username: &str) -> Vec<String> {
        let mut roles = vec![USER_ROLE.to_string()];
        if self.admin_usernames.contains(username) {
            roles.push(ADMIN_ROLE.to_string());
        }
        roles
    }
}

/// Bring the schema up to date before any repository touches it.
#[cfg(feature = "postgres")]
async fn migrate(connections: &DatabaseConnections) -> anyhow::Result<()> {
    Migrator::up(&connections.main, None)
        .await
        .context("failed to apply database migrations")?;
    tracing::info!("Database schema up to date");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_role_only_for_configured_usernames() {
        let state = AppState::in_memory(Locale::Ru, &["root"]);
        assert_eq!(state.roles_for("root"), vec![USER_ROLE, ADMIN_ROLE]);
        assert_eq!(state.roles_for("leo"), vec![USER_ROLE]);
    }

    #[cfg(feature = "postgres")]
    #[actix_web::test]
    async fn test_migration_failure_is_an_error() {
        use sea_orm::{DatabaseBackend, MockDatabase};

        // Every statement on an empty mock fails, as on a broken schema.
        let connections = DatabaseConnections {
            main: MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
        };

        let err = migrate(&connections).await.unwrap_err();
        assert!(err.to_string().contains("failed to apply database migrations"));
    }
}
