//! PostgreSQL implementation of MembershipRepository.
//!
//! Provides persistent storage for club memberships. The
//! `memberships_club_member_key` constraint keeps one row per (club, member).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{DomainError, Email, ListingId, MembershipId, Timestamp};
use crate::domain::membership::ClubMembership;
use crate::ports::{MembershipRepository, SaveResult};

use super::{corrupt, db_error};

/// PostgreSQL implementation of the MembershipRepository port.
pub struct PostgresMembershipRepository {
    pool: PgPool,
}

impl PostgresMembershipRepository {
    /// Creates a new PostgresMembershipRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a membership.
#[derive(Debug, sqlx::FromRow)]
struct MembershipRow {
    id: Uuid,
    club_id: String,
    member_email: String,
    joined_at: DateTime<Utc>,
}

impl TryFrom<MembershipRow> for ClubMembership {
    type Error = DomainError;

    fn try_from(row: MembershipRow) -> Result<Self, Self::Error> {
        Ok(ClubMembership {
            id: MembershipId::from_uuid(row.id),
            club_id: ListingId::parse(row.club_id).map_err(|e| corrupt("club_id", e))?,
            member_email: Email::new(&row.member_email)
                .map_err(|e| corrupt("member_email", e))?,
            joined_at: Timestamp::from_datetime(row.joined_at),
        })
    }
}

#[async_trait]
impl MembershipRepository for PostgresMembershipRepository {
    async fn find(
        &self,
        club_id: &ListingId,
        member: &Email,
    ) -> Result<Option<ClubMembership>, DomainError> {
        let row: Option<MembershipRow> = sqlx::query_as(
            r#"
            SELECT id, club_id, member_email, joined_at
            FROM memberships
            WHERE club_id = $1 AND member_email = $2
            "#,
        )
        .bind(club_id.as_str())
        .bind(member.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to fetch membership", e))?;

        row.map(ClubMembership::try_from).transpose()
    }

    async fn insert(&self, membership: &ClubMembership) -> Result<SaveResult, DomainError> {
        let result = sqlx::query(
            r#"
            INSERT INTO memberships (id, club_id, member_email, joined_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (club_id, member_email) DO NOTHING
            "#,
        )
        .bind(membership.id.as_uuid())
        .bind(membership.club_id.as_str())
        .bind(membership.member_email.as_str())
        .bind(membership.joined_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to save membership", e))?;

        Ok(SaveResult::from_rows_affected(result.rows_affected()))
    }

    async fn list_by_member(&self, member: &Email) -> Result<Vec<ClubMembership>, DomainError> {
        let rows: Vec<MembershipRow> = sqlx::query_as(
            r#"
            SELECT id, club_id, member_email, joined_at
            FROM memberships
            WHERE member_email = $1
            ORDER BY joined_at DESC
            "#,
        )
        .bind(member.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to list memberships", e))?;

        rows.into_iter().map(ClubMembership::try_from).collect()
    }
}
