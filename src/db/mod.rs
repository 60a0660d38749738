//! Database module for SQLite persistence.
//!
//! [`Database`] is the process-wide gateway: it owns the connection string and
//! creates the pool on first use. [`Repository`] hands out typed [`Table`]s.

mod answers;
mod github_repos;
mod knowledge;
mod questions;
mod reviews;
mod table;
mod tech_notes;
mod tech_stacks;

pub use github_repos::GithubRepoFilter;
pub use knowledge::KnowledgeFilter;
pub use questions::QuestionFilter;
pub use reviews::ReviewFilter;
pub use table::Table;
pub use tech_stacks::TechStackFilter;

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous,
};
use tokio::sync::OnceCell;

use crate::config::Config;
use crate::errors::AppError;
use crate::models::{Answer, GithubRepo, Question, Review, TechKnowledge, TechNote, TechStack};

/// Lazily connected store shared by all requests.
pub struct Database {
    url: Option<String>,
    max_connections: u32,
    repo: OnceCell<Repository>,
    #[cfg(test)]
    pool_inits: std::sync::atomic::AtomicUsize,
}

impl Database {
    pub fn new(url: Option<String>, max_connections: u32) -> Self {
        Self {
            url,
            max_connections,
            repo: OnceCell::new(),
            #[cfg(test)]
            pool_inits: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.database_url.clone(), config.db_max_connections)
    }

    pub fn is_configured(&self) -> bool {
        self.url.is_some()
    }

    /// Get the repository, connecting on first call.
    ///
    /// Concurrent first callers wait on the same initialization. A failed
    /// attempt leaves the cell empty so a later call can retry.
    pub async fn repo(&self) -> Result<&Repository, AppError> {
        let url = self.url.as_deref().ok_or_else(AppError::not_configured)?;

        self.repo
            .get_or_try_init(|| async {
                #[cfg(test)]
                self.pool_inits
                    .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                let pool = init_database(url, self.max_connections).await?;
                tracing::info!(
                    max_connections = self.max_connections,
                    "Database pool initialized"
                );
                Ok::<_, AppError>(Repository::new(pool))
            })
            .await
    }
}

/// Typed repository handles over one pool.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn questions(&self) -> Table<'_, Question> {
        Table::new(&self.pool)
    }

    pub fn answers(&self) -> Table<'_, Answer> {
        Table::new(&self.pool)
    }

    pub fn reviews(&self) -> Table<'_, Review> {
        Table::new(&self.pool)
    }

    pub fn tech_stacks(&self) -> Table<'_, TechStack> {
        Table::new(&self.pool)
    }

    pub fn knowledge(&self) -> Table<'_, TechKnowledge> {
        Table::new(&self.pool)
    }

    pub fn tech_notes(&self) -> Table<'_, TechNote> {
        Table::new(&self.pool)
    }

    pub fn github_repos(&self) -> Table<'_, GithubRepo> {
        Table::new(&self.pool)
    }
}

/// File path behind a `sqlite:` URL, if it names a file.
fn database_path(url: &str) -> Option<PathBuf> {
    let rest = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))?;
    let path = rest.split('?').next().unwrap_or_default();
    if path.is_empty() || path == ":memory:" {
        return None;
    }
    Some(PathBuf::from(path))
}

/// Open the connection pool and create the schema.
pub async fn init_database(url: &str, max_connections: u32) -> Result<SqlitePool, sqlx::Error> {
    // Ensure the parent directory exists
    if let Some(parent) = database_path(url).as_deref().and_then(|p| p.parent()) {
        tokio::fs::create_dir_all(parent).await.ok();
    }

    let options = SqliteConnectOptions::from_str(url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .busy_timeout(Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;

    run_migrations(&pool).await?;

    Ok(pool)
}

/// Create tables if they don't exist.
async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS questions (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            description TEXT NOT NULL,
            category TEXT NOT NULL,
            difficulty TEXT NOT NULL CHECK (difficulty IN ('easy', 'medium', 'hard')),
            tags TEXT,
            source TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS answers (
            id TEXT PRIMARY KEY,
            question_id TEXT NOT NULL REFERENCES questions(id) ON DELETE CASCADE,
            content TEXT NOT NULL,
            code_snippet TEXT,
            language TEXT,
            key_points TEXT,
            attempt_number INTEGER NOT NULL DEFAULT 1 CHECK (attempt_number >= 1),
            status TEXT NOT NULL DEFAULT 'draft' CHECK (status IN ('draft', 'completed')),
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS reviews (
            id TEXT PRIMARY KEY,
            answer_id TEXT NOT NULL REFERENCES answers(id) ON DELETE CASCADE,
            self_evaluation INTEGER CHECK (self_evaluation IS NULL OR self_evaluation BETWEEN 1 AND 5),
            improvements TEXT,
            learnings TEXT,
            ideal_answer TEXT,
            next_review_date TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS tech_stacks (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            category TEXT NOT NULL,
            subcategory TEXT,
            version TEXT,
            tags TEXT,
            proficiency_level TEXT NOT NULL DEFAULT 'beginner'
                CHECK (proficiency_level IN ('beginner', 'intermediate', 'advanced', 'expert')),
            experience_months INTEGER NOT NULL DEFAULT 0 CHECK (experience_months >= 0),
            official_website TEXT,
            documentation_url TEXT,
            github_url TEXT,
            description TEXT,
            usage_context TEXT,
            reason_for_choice TEXT,
            alternatives TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS tech_knowledge (
            id TEXT PRIMARY KEY,
            tech_stack_id TEXT NOT NULL REFERENCES tech_stacks(id) ON DELETE CASCADE,
            title TEXT NOT NULL,
            knowledge_type TEXT NOT NULL CHECK (knowledge_type IN
                ('concept', 'best-practice', 'anti-pattern', 'troubleshooting', 'tip', 'example')),
            content TEXT NOT NULL,
            code_example TEXT,
            code_language TEXT,
            related_topics TEXT,
            resources TEXT,
            importance INTEGER NOT NULL DEFAULT 3 CHECK (importance BETWEEN 1 AND 5),
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS tech_notes (
            id TEXT PRIMARY KEY,
            technology TEXT NOT NULL,
            reason_for_choice TEXT NOT NULL,
            alternatives TEXT,
            learnings TEXT,
            improvements TEXT,
            github_repo_url TEXT,
            github_repo_name TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS github_repos (
            id TEXT PRIMARY KEY,
            repo_name TEXT NOT NULL UNIQUE,
            description TEXT,
            stars INTEGER NOT NULL DEFAULT 0 CHECK (stars >= 0),
            forks INTEGER NOT NULL DEFAULT 0 CHECK (forks >= 0),
            primary_language TEXT,
            languages TEXT,
            github_url TEXT NOT NULL,
            homepage TEXT,
            last_synced_at TEXT NOT NULL,
            created_at TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes for foreign keys and list ordering
    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_questions_created_at ON questions(created_at);
        CREATE INDEX IF NOT EXISTS idx_questions_category ON questions(category);
        CREATE INDEX IF NOT EXISTS idx_answers_question_id ON answers(question_id);
        CREATE INDEX IF NOT EXISTS idx_reviews_answer_id ON reviews(answer_id);
        CREATE INDEX IF NOT EXISTS idx_tech_stacks_updated_at ON tech_stacks(updated_at);
        CREATE INDEX IF NOT EXISTS idx_tech_stacks_category ON tech_stacks(category);
        CREATE INDEX IF NOT EXISTS idx_tech_knowledge_tech_stack_id ON tech_knowledge(tech_stack_id);
        CREATE INDEX IF NOT EXISTS idx_tech_notes_created_at ON tech_notes(created_at);
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}


#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::atomic::Ordering;
    use std::sync::Arc;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_database_path_from_url() {
        assert_eq!(
            database_path("sqlite:./data/app.sqlite"),
            Some(PathBuf::from("./data/app.sqlite"))
        );
        assert_eq!(
            database_path("sqlite:///tmp/app.sqlite?mode=rwc"),
            Some(PathBuf::from("/tmp/app.sqlite"))
        );
        assert_eq!(database_path("sqlite::memory:"), None);
        assert_eq!(database_path("postgres://localhost/app"), None);
    }

    #[tokio::test]
    async fn test_unconfigured_database_fails_every_call() {
        let db = Database::new(None, 5);
        assert!(!db.is_configured());

        for _ in 0..2 {
            let err = db.repo().await.err().unwrap();
            assert!(matches!(err, AppError::Configuration(_)));
            assert_eq!(err.message(), "DATABASE_URL is not configured");
        }
    }

    #[tokio::test]
    async fn test_concurrent_first_use_initializes_once() {
        let temp_dir = TempDir::new().unwrap();
        let url = format!("sqlite:{}", temp_dir.path().join("nested/app.sqlite").display());
        let db = Arc::new(Database::new(Some(url), 5));

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let db = db.clone();
                tokio::spawn(async move {
                    let repo = db.repo().await.expect("repo");
                    repo as *const Repository as usize
                })
            })
            .collect();

        let mut addresses = HashSet::new();
        for handle in handles {
            addresses.insert(handle.await.unwrap());
        }
        assert_eq!(addresses.len(), 1);
        assert_eq!(db.pool_inits.load(Ordering::SeqCst), 1);
        assert!(temp_dir.path().join("nested/app.sqlite").exists());

        db.repo().await.unwrap();
        assert_eq!(db.pool_inits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_init_is_retried() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("blocker");
        std::fs::write(&blocker, b"not a directory").unwrap();
        let url = format!("sqlite:{}", blocker.join("app.sqlite").display());
        let db = Database::new(Some(url), 1);

        assert!(db.repo().await.is_err());
        assert_eq!(db.pool_inits.load(Ordering::SeqCst), 1);

        std::fs::remove_file(&blocker).unwrap();
        assert!(db.repo().await.is_ok());
        assert_eq!(db.pool_inits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_migrations_are_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let url = format!("sqlite:{}", temp_dir.path().join("app.sqlite").display());

        let first = init_database(&url, 1).await.unwrap();
        first.close().await;
        let second = init_database(&url, 1).await.unwrap();

        let tables: Vec<(String,)> = sqlx::query_as(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )
        .fetch_all(&second)
        .await
        .unwrap();
        let names: Vec<_> = tables.into_iter().map(|(name,)| name).collect();
        assert_eq!(
            names,
            vec![
                "answers",
                "github_repos",
                "questions",
                "reviews",
                "tech_knowledge",
                "tech_notes",
                "tech_stacks"
            ]
        );
    }
}
