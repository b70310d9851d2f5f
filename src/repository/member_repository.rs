use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::{
    domain::{CreateMemberRequest, Member, Role},
    error::{AppError, Result},
    repository::MemberDirectory,
};

#[derive(FromRow)]
struct MemberRow {
    id: String,
    name: String,
    village_name: String,
    mobile_number: String,
    role: String,
    created_at: NaiveDateTime,
}

pub struct SqliteMemberDirectory {
    pool: SqlitePool,
}

impl SqliteMemberDirectory {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_member(row: MemberRow) -> Result<Member> {
        Ok(Member {
            id: Uuid::parse_str(&row.id).map_err(|e| AppError::Database(e.to_string()))?,
            name: row.name,
            village_name: row.village_name,
            mobile_number: row.mobile_number,
            role: row.role.parse::<Role>().map_err(AppError::Database)?,
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
        })
    }
}

#[async_trait]
impl MemberDirectory for SqliteMemberDirectory {
    async fn create(&self, request: CreateMemberRequest) -> Result<Member> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let mobile_taken: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM members WHERE mobile_number = ?")
                .bind(&request.mobile_number)
                .fetch_one(&mut *tx)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;

        if mobile_taken > 0 {
            return Err(AppError::Validation(
                "Member with this mobile number already exists".to_string(),
            ));
        }

        if request.role.is_singleton() {
            let holders: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM members WHERE role = ?")
                .bind(request.role.as_str())
                .fetch_one(&mut *tx)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;

            if holders > 0 {
                return Err(AppError::Validation(format!(
                    "A {} already exists",
                    request.role
                )));
            }
        }

        let id = Uuid::new_v4();
        let now = Utc::now().naive_utc();

        sqlx::query(
            r#"
            INSERT INTO members (id, name, village_name, mobile_number, role, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(id.to_string())
        .bind(&request.name)
        .bind(&request.village_name)
        .bind(&request.mobile_number)
        .bind(request.role.as_str())
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Database("Failed to retrieve created member".to_string()))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Member>> {
        let row = sqlx::query_as::<_, MemberRow>(
            r#"
            SELECT id, name, village_name, mobile_number, role, created_at
            FROM members
            WHERE id = ?
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        match row {
            Some(r) => Ok(Some(Self::row_to_member(r)?)),
            None => Ok(None),
        }
    }

    async fn list(&self) -> Result<Vec<Member>> {
        let rows = sqlx::query_as::<_, MemberRow>(
            r#"
            SELECT id, name, village_name, mobile_number, role, created_at
            FROM members
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        rows.into_iter().map(Self::row_to_member).collect()
    }

    async fn list_by_role(&self, role: Role) -> Result<Vec<Member>> {
        let rows = sqlx::query_as::<_, MemberRow>(
            r#"
            SELECT id, name, village_name, mobile_number, role, created_at
            FROM members
            WHERE role = ?
            ORDER BY name
            "#,
        )
        .bind(role.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        rows.into_iter().map(Self::row_to_member).collect()
    }
}
