//! Repository for the `programs` table.

use lms_core::types::DbId;
use sqlx::PgPool;

use crate::models::program::{CreateProgram, Program, UpdateProgram};

/// Column list for `programs` queries.
const COLUMNS: &str = "id, title, summary, created_at";

/// Provides CRUD operations for degree programmes.
pub struct ProgramRepo;

impl ProgramRepo {
    pub async fn create(pool: &PgPool, input: &CreateProgram) -> Result<Program, sqlx::Error> {
        let query = format!(
            "INSERT INTO programs (title, summary) VALUES ($1, $2) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Program>(&query)
            .bind(&input.title)
            .bind(input.summary.as_deref())
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Program>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM programs WHERE id = $1");
        sqlx::query_as::<_, Program>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List programs with an optional title/summary search.
    pub async fn list(pool: &PgPool, q: Option<&str>) -> Result<Vec<Program>, sqlx::Error> {
        let filter = if q.is_some() {
            "WHERE title ILIKE $1 OR summary ILIKE $1"
        } else {
            ""
        };
        let query = format!("SELECT {COLUMNS} FROM programs {filter} ORDER BY title");
        let mut query_as = sqlx::query_as::<_, Program>(&query);
        if let Some(q) = q {
            query_as = query_as.bind(format!("%{q}%"));
        }
        query_as.fetch_all(pool).await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProgram,
    ) -> Result<Option<Program>, sqlx::Error> {
        let query = format!(
            "UPDATE programs SET \
                 title = COALESCE($2, title), \
                 summary = COALESCE($3, summary) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Program>(&query)
            .bind(id)
            .bind(input.title.as_deref())
            .bind(input.summary.as_deref())
            .fetch_optional(pool)
            .await
    }

    /// Delete a program and (by cascade) its courses. Returns `false` if the
    /// program was not found.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM programs WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
