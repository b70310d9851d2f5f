use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{sqlite::SqliteConnection, FromRow, SqlitePool};
use uuid::Uuid;

use crate::{
    domain::{Contribution, ContributionFilter, ContributionStatus, Month},
    error::{AppError, Result},
    repository::ContributionRepository,
};

#[derive(FromRow)]
struct ContributionRow {
    id: String,
    member_id: String,
    amount: i64,
    month: String,
    year: i32,
    payment_date: NaiveDateTime,
    status: String,
    approved_by: Option<String>,
    approval_date: Option<NaiveDateTime>,
    notes: Option<String>,
}

const SELECT_COLUMNS: &str = r#"
    SELECT id, member_id, amount, month, year, payment_date,
           status, approved_by, approval_date, notes
    FROM contributions
"#;

pub struct SqliteContributionRepository {
    pool: SqlitePool,
}

impl SqliteContributionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_contribution(row: ContributionRow) -> Result<Contribution> {
        Ok(Contribution {
            id: Uuid::parse_str(&row.id).map_err(|e| AppError::Database(e.to_string()))?,
            member_id: Uuid::parse_str(&row.member_id)
                .map_err(|e| AppError::Database(e.to_string()))?,
            amount: row.amount,
            month: row.month.parse::<Month>().map_err(AppError::Database)?,
            year: row.year,
            payment_date: DateTime::from_naive_utc_and_offset(row.payment_date, Utc),
            status: row
                .status
                .parse::<ContributionStatus>()
                .map_err(AppError::Database)?,
            approved_by: row
                .approved_by
                .map(|s| Uuid::parse_str(&s).map_err(|e| AppError::Database(e.to_string())))
                .transpose()?,
            approval_date: row
                .approval_date
                .map(|dt| DateTime::from_naive_utc_and_offset(dt, Utc)),
            notes: row.notes,
        })
    }

    async fn insert_row<'e, E>(contribution: &Contribution, executor: E) -> Result<()>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        sqlx::query(
            r#"
            INSERT INTO contributions (
                id, member_id, amount, month, year, payment_date,
                status, approved_by, approval_date, notes
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(contribution.id.to_string())
        .bind(contribution.member_id.to_string())
        .bind(contribution.amount)
        .bind(contribution.month.as_str())
        .bind(contribution.year)
        .bind(contribution.payment_date.naive_utc())
        .bind(contribution.status.as_str())
        .bind(contribution.approved_by.map(|id| id.to_string()))
        .bind(contribution.approval_date.map(|dt| dt.naive_utc()))
        .bind(&contribution.notes)
        .execute(executor)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    async fn check_and_insert(
        conn: &mut SqliteConnection,
        contribution: &Contribution,
    ) -> Result<()> {
        let existing: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM contributions
            WHERE member_id = ? AND month = ? AND year = ?
            "#,
        )
        .bind(contribution.member_id.to_string())
        .bind(contribution.month.as_str())
        .bind(contribution.year)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        if existing > 0 {
            return Err(AppError::Duplicate(format!(
                "Contribution already submitted for {} {}",
                contribution.month, contribution.year
            )));
        }

        Self::insert_row(contribution, &mut *conn).await
    }
}

#[async_trait]
impl ContributionRepository for SqliteContributionRepository {
    async fn insert(&self, contribution: Contribution) -> Result<Contribution> {
        Self::insert_row(&contribution, &self.pool).await?;

        self.find_by_id(contribution.id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve created contribution".to_string())
        })
    }

    async fn insert_unique(&self, contribution: Contribution) -> Result<Contribution> {
        // BEGIN IMMEDIATE takes the write lock before the duplicate check,
        // so the check always reads the latest committed state. Of two
        // racing submissions for the same (member, month, year) the second
        // blocks on BEGIN, then observes the first's row and fails with
        // Duplicate. A deferred BEGIN would let both read an empty
        // snapshot and turn the loser's failure into a busy error.
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        sqlx::query("BEGIN IMMEDIATE")
            .execute(&mut *conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        match Self::check_and_insert(&mut conn, &contribution).await {
            Ok(()) => {
                sqlx::query("COMMIT")
                    .execute(&mut *conn)
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))?;
            }
            Err(e) => {
                let _ = sqlx::query("ROLLBACK").execute(&mut *conn).await;
                return Err(e);
            }
        }
        drop(conn);

        self.find_by_id(contribution.id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve created contribution".to_string())
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Contribution>> {
        let sql = format!("{} WHERE id = ?", SELECT_COLUMNS);
        let row = sqlx::query_as::<_, ContributionRow>(&sql)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        match row {
            Some(r) => Ok(Some(Self::row_to_contribution(r)?)),
            None => Ok(None),
        }
    }

    async fn list(&self, filter: &ContributionFilter) -> Result<Vec<Contribution>> {
        let sql = format!(
            r#"{}
            WHERE (?1 IS NULL OR member_id = ?1)
              AND (?2 IS NULL OR month = ?2)
              AND (?3 IS NULL OR year = ?3)
              AND (?4 IS NULL OR status = ?4)
            "#,
            SELECT_COLUMNS
        );

        let rows = sqlx::query_as::<_, ContributionRow>(&sql)
            .bind(filter.member_id.map(|id| id.to_string()))
            .bind(filter.month.map(|m| m.as_str()))
            .bind(filter.year)
            .bind(filter.status.map(|s| s.as_str()))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let mut contributions = rows
            .into_iter()
            .map(Self::row_to_contribution)
            .collect::<Result<Vec<_>>>()?;

        // Months are stored by name, so the calendar ordering happens here
        // rather than in SQL.
        contributions
            .sort_by_key(|c| std::cmp::Reverse((c.year, c.month.index())));

        Ok(contributions)
    }

    async fn transition(
        &self,
        id: Uuid,
        new_status: ContributionStatus,
        approved_by: Uuid,
        approval_date: DateTime<Utc>,
        notes: Option<&str>,
    ) -> Result<Contribution> {
        // The status guard lives in the WHERE clause; a concurrent
        // transition on the same record leaves rows_affected at zero for
        // the loser.
        let result = sqlx::query(
            r#"
            UPDATE contributions
            SET status = ?,
                approved_by = ?,
                approval_date = ?,
                notes = COALESCE(?, notes)
            WHERE id = ? AND status = 'Pending'
            "#,
        )
        .bind(new_status.as_str())
        .bind(approved_by.to_string())
        .bind(approval_date.naive_utc())
        .bind(notes)
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return match self.find_by_id(id).await? {
                None => Err(AppError::NotFound("Contribution not found".to_string())),
                Some(existing) => Err(AppError::InvalidTransition(format!(
                    "Contribution is already {}",
                    existing.status
                ))),
            };
        }

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve updated contribution".to_string())
        })
    }
}
