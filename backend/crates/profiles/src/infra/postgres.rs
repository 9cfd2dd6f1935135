//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use kernel::id::ProfileId;
use platform::pin::PinCredential;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::{
    account_pin::AccountPin, profile::Profile, verify_attempts::VerifyAttempts,
};
use crate::domain::repository::{PinRepository, ProfileRepository, VerifyAttemptsRepository};
use crate::domain::value_object::{
    account_id::AccountId, avatar_url::AvatarUrl, profile_name::ProfileName,
};
use crate::error::{ProfileError, ProfileResult};

/// PostgreSQL-backed profiles repository
#[derive(Clone)]
pub struct PgProfileRepository {
    pool: PgPool,
}

impl PgProfileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Clean up attempt counters whose window elapsed long ago
    pub async fn cleanup_expired(&self, window_ms: i64) -> ProfileResult<u64> {
        let cutoff_ms = Utc::now().timestamp_millis() - window_ms;

        let deleted = sqlx::query("DELETE FROM pin_verify_attempts WHERE window_start_ms < $1")
            .bind(cutoff_ms)
            .execute(&self.pool)
            .await?
            .rows_affected();

        tracing::info!(counters_deleted = deleted, "Cleaned up expired PIN attempt windows");

        Ok(deleted)
    }
}

// ============================================================================
// Profile Repository Implementation
// ============================================================================

impl ProfileRepository for PgProfileRepository {
    async fn create(&self, profile: &Profile) -> ProfileResult<()> {
        sqlx::query(
            r#"
            INSERT INTO profiles (
                profile_id,
                account_id,
                profile_name,
                avatar_url,
                is_main,
                sort_order,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(profile.id.as_uuid())
        .bind(profile.account_id.as_str())
        .bind(profile.name.as_str())
        .bind(profile.avatar_url.as_ref().map(|a| a.as_str()))
        .bind(profile.is_main)
        .bind(profile.sort_order)
        .bind(profile.created_at)
        .bind(profile.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn create_main_if_absent(&self, profile: &Profile) -> ProfileResult<()> {
        // Two concurrent first listings may both reach this insert; the
        // partial unique index makes the loser a no-op.
        sqlx::query(
            r#"
            INSERT INTO profiles (
                profile_id,
                account_id,
                profile_name,
                avatar_url,
                is_main,
                sort_order,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, TRUE, $5, $6, $7)
            ON CONFLICT (account_id) WHERE is_main DO NOTHING
            "#,
        )
        .bind(profile.id.as_uuid())
        .bind(profile.account_id.as_str())
        .bind(profile.name.as_str())
        .bind(profile.avatar_url.as_ref().map(|a| a.as_str()))
        .bind(profile.sort_order)
        .bind(profile.created_at)
        .bind(profile.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(
        &self,
        account_id: &AccountId,
        profile_id: ProfileId,
    ) -> ProfileResult<Option<Profile>> {
        let row = sqlx::query_as::<_, ProfileRow>(
            r#"
            SELECT
                profile_id,
                account_id,
                profile_name,
                avatar_url,
                is_main,
                sort_order,
                created_at,
                updated_at
            FROM profiles
            WHERE account_id = $1 AND profile_id = $2
            "#,
        )
        .bind(account_id.as_str())
        .bind(profile_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_profile()).transpose()
    }

    async fn list_for_account(&self, account_id: &AccountId) -> ProfileResult<Vec<Profile>> {
        let rows = sqlx::query_as::<_, ProfileRow>(
            r#"
            SELECT
                profile_id,
                account_id,
                profile_name,
                avatar_url,
                is_main,
                sort_order,
                created_at,
                updated_at
            FROM profiles
            WHERE account_id = $1
            ORDER BY is_main DESC, sort_order ASC, created_at ASC
            "#,
        )
        .bind(account_id.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(|r| r.into_profile()).collect()
    }

    async fn next_sort_order(&self, account_id: &AccountId) -> ProfileResult<i32> {
        let next = sqlx::query_scalar::<_, i32>(
            "SELECT COALESCE(MAX(sort_order), 0) + 1 FROM profiles WHERE account_id = $1",
        )
        .bind(account_id.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(next)
    }

    async fn update(&self, profile: &Profile) -> ProfileResult<()> {
        sqlx::query(
            r#"
            UPDATE profiles SET
                profile_name = $3,
                avatar_url = $4,
                updated_at = $5
            WHERE account_id = $1 AND profile_id = $2
            "#,
        )
        .bind(profile.account_id.as_str())
        .bind(profile.id.as_uuid())
        .bind(profile.name.as_str())
        .bind(profile.avatar_url.as_ref().map(|a| a.as_str()))
        .bind(profile.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, account_id: &AccountId, profile_id: ProfileId) -> ProfileResult<()> {
        sqlx::query("DELETE FROM profiles WHERE account_id = $1 AND profile_id = $2")
            .bind(account_id.as_str())
            .bind(profile_id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

// ============================================================================
// PIN Repository Implementation
// ============================================================================

impl PinRepository for PgProfileRepository {
    async fn find_pin(&self, account_id: &AccountId) -> ProfileResult<Option<AccountPin>> {
        let row = sqlx::query_as::<_, AccountPinRow>(
            r#"
            SELECT
                account_id,
                pin_salt,
                pin_hash,
                created_at,
                updated_at
            FROM account_pins
            WHERE account_id = $1
            "#,
        )
        .bind(account_id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_pin()).transpose()
    }

    async fn upsert_pin(&self, pin: &AccountPin) -> ProfileResult<()> {
        sqlx::query(
            r#"
            INSERT INTO account_pins (
                account_id,
                pin_salt,
                pin_hash,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (account_id)
            DO UPDATE SET
                pin_salt = EXCLUDED.pin_salt,
                pin_hash = EXCLUDED.pin_hash,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(pin.account_id.as_str())
        .bind(pin.credential.salt_b64())
        .bind(pin.credential.hash_b64())
        .bind(pin.created_at)
        .bind(pin.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn pin_exists(&self, account_id: &AccountId) -> ProfileResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM account_pins WHERE account_id = $1)",
        )
        .bind(account_id.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }
}

// ============================================================================
// Verify Attempts Repository Implementation
// ============================================================================

impl VerifyAttemptsRepository for PgProfileRepository {
    async fn find_attempts(
        &self,
        account_id: &AccountId,
    ) -> ProfileResult<Option<VerifyAttempts>> {
        let row = sqlx::query_as::<_, VerifyAttemptsRow>(
            r#"
            SELECT
                account_id,
                attempts_count,
                window_start_ms
            FROM pin_verify_attempts
            WHERE account_id = $1
            "#,
        )
        .bind(account_id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_attempts()))
    }

    async fn save_attempts(&self, attempts: &VerifyAttempts) -> ProfileResult<()> {
        sqlx::query(
            r#"
            INSERT INTO pin_verify_attempts (account_id, attempts_count, window_start_ms)
            VALUES ($1, $2, $3)
            ON CONFLICT (account_id)
            DO UPDATE SET
                attempts_count = EXCLUDED.attempts_count,
                window_start_ms = EXCLUDED.window_start_ms
            "#,
        )
        .bind(attempts.account_id.as_str())
        .bind(attempts.attempts_count as i32)
        .bind(attempts.window_start_ms)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn reset_attempts(&self, account_id: &AccountId) -> ProfileResult<()> {
        sqlx::query("DELETE FROM pin_verify_attempts WHERE account_id = $1")
            .bind(account_id.as_str())
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

// ============================================================================
// Row Types for sqlx mapping
// ============================================================================

#[derive(sqlx::FromRow)]
struct ProfileRow {
    profile_id: Uuid,
    account_id: String,
    profile_name: String,
    avatar_url: Option<String>,
    is_main: bool,
    sort_order: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ProfileRow {
    fn into_profile(self) -> ProfileResult<Profile> {
        let name = ProfileName::from_db(&self.profile_name)
            .map_err(|e| ProfileError::Internal(format!("Invalid profile_name: {}", e)))?;

        Ok(Profile {
            id: ProfileId::from_uuid(self.profile_id),
            account_id: AccountId::from_db(self.account_id),
            name,
            avatar_url: self.avatar_url.map(AvatarUrl::from_db),
            is_main: self.is_main,
            sort_order: self.sort_order,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct AccountPinRow {
    account_id: String,
    pin_salt: String,
    pin_hash: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl AccountPinRow {
    fn into_pin(self) -> ProfileResult<AccountPin> {
        let credential = PinCredential::from_stored(&self.pin_salt, &self.pin_hash)?;

        Ok(AccountPin {
            account_id: AccountId::from_db(self.account_id),
            credential,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct VerifyAttemptsRow {
    account_id: String,
    attempts_count: i32,
    window_start_ms: i64,
}

impl VerifyAttemptsRow {
    fn into_attempts(self) -> VerifyAttempts {
        VerifyAttempts {
            account_id: AccountId::from_db(self.account_id),
            attempts_count: self.attempts_count.max(0) as u32,
            window_start_ms: self.window_start_ms,
        }
    }
}
