//! Postgres-backed task source.
//!
//! Thin glue: one query over the trailing 6-day window with optional
//! process/task-definition filters. A row that fails to decode is skipped
//! with a warning; the rest of the batch still counts. The engine sees
//! only well-formed tasks.

use async_trait::async_trait;
use chrono::{DateTime, Local};
use sqlx::Row;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::warn;

use vigil_core::domain::{Task, TaskCategory};
use vigil_core::error::SourceError;
use vigil_core::ports::TaskSource;

const PING_DEADLINE: Duration = Duration::from_secs(5);

const FETCH_QUERY: &str = r"
    SELECT task_id, created_at, (assignee IS NULL) AS unclaimed
    FROM workflow_task
    WHERE created_at >= NOW() - INTERVAL '6 days'
      AND ($1::text IS NULL OR proc_key = $1)
      AND ($2::text[] IS NULL OR task_key = ANY($2))
";

pub struct PgTaskSource {
    pool: PgPool,
    proc_key: Option<String>,
    task_keys: Option<Vec<String>>,
}

impl PgTaskSource {
    /// Build the connection pool and verify it with one ping. This is the
    /// process's only fatal dependency: the caller aborts startup on `Err`.
    pub async fn connect(
        database_url: &str,
        proc_key: Option<String>,
        task_keys: Vec<String>,
    ) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .acquire_timeout(Duration::from_secs(5))
            .connect(database_url)
            .await?;

        sqlx::query("SELECT 1").execute(&pool).await?;

        Ok(Self {
            pool,
            proc_key,
            task_keys: if task_keys.is_empty() {
                None
            } else {
                Some(task_keys)
            },
        })
    }
}

#[async_trait]
impl TaskSource for PgTaskSource {
    async fn fetch(&self) -> Result<Vec<Task>, SourceError> {
        let rows = sqlx::query(FETCH_QUERY)
            .bind(self.proc_key.as_deref())
            .bind(self.task_keys.as_deref())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| SourceError::Query(e.to_string()))?;

        let mut tasks = Vec::with_capacity(rows.len());
        for row in rows {
            let decoded = (|| -> Result<Task, sqlx::Error> {
                let id: String = row.try_get("task_id")?;
                let created_at: DateTime<Local> = row.try_get("created_at")?;
                let unclaimed: bool = row.try_get("unclaimed")?;
                let category = if unclaimed {
                    TaskCategory::Unclaimed
                } else {
                    TaskCategory::Unfinished
                };
                Ok(Task::new(id, created_at, category))
            })();
            match decoded {
                Ok(task) => tasks.push(task),
                Err(e) => warn!(error = %e, "skipping malformed task row"),
            }
        }
        Ok(tasks)
    }

    async fn ping(&self) -> Result<(), SourceError> {
        let probe = sqlx::query("SELECT 1").execute(&self.pool);
        match tokio::time::timeout(PING_DEADLINE, probe).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(SourceError::Unreachable(e.to_string())),
            Err(_) => Err(SourceError::Unreachable("ping deadline exceeded".into())),
        }
    }
}
