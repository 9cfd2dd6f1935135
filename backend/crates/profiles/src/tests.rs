//! Unit tests for the Profiles crate
//!
//! Use-case level coverage against an in-memory repository, exercising
//! the access-control properties end to end without a database.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use kernel::id::ProfileId;

use crate::application::config::ProfilesConfig;
use crate::application::{
    CreateProfileInput, CreateProfileUseCase, DeleteProfileInput, DeleteProfileUseCase,
    ListProfilesInput, ListProfilesUseCase, PinUseCase, UpdateProfileInput, UpdateProfileUseCase,
};
use crate::domain::entity::{
    account_pin::AccountPin, profile::Profile, verify_attempts::VerifyAttempts,
};
use crate::domain::repository::{PinRepository, ProfileRepository, VerifyAttemptsRepository};
use crate::domain::value_object::account_id::AccountId;
use crate::error::{ProfileError, ProfileResult};

// ============================================================================
// In-memory repository
// ============================================================================

#[derive(Clone, Default)]
struct MemRepository {
    state: Arc<Mutex<MemState>>,
}

#[derive(Default)]
struct MemState {
    profiles: Vec<Profile>,
    pins: HashMap<String, AccountPin>,
    attempts: HashMap<String, VerifyAttempts>,
}

impl MemRepository {
    fn lock(&self) -> std::sync::MutexGuard<'_, MemState> {
        self.state.lock().expect("test repository lock poisoned")
    }

    fn seed_attempts(&self, attempts: VerifyAttempts) {
        self.lock()
            .attempts
            .insert(attempts.account_id.as_str().to_string(), attempts);
    }

    fn attempts_for(&self, account_id: &AccountId) -> Option<VerifyAttempts> {
        self.lock().attempts.get(account_id.as_str()).cloned()
    }
}

impl ProfileRepository for MemRepository {
    async fn create(&self, profile: &Profile) -> ProfileResult<()> {
        self.lock().profiles.push(profile.clone());
        Ok(())
    }

    async fn create_main_if_absent(&self, profile: &Profile) -> ProfileResult<()> {
        let mut state = self.lock();
        let exists = state
            .profiles
            .iter()
            .any(|p| p.account_id == profile.account_id && p.is_main);
        if !exists {
            state.profiles.push(profile.clone());
        }
        Ok(())
    }

    async fn find_by_id(
        &self,
        account_id: &AccountId,
        profile_id: ProfileId,
    ) -> ProfileResult<Option<Profile>> {
        Ok(self
            .lock()
            .profiles
            .iter()
            .find(|p| p.account_id == *account_id && p.id == profile_id)
            .cloned())
    }

    async fn list_for_account(&self, account_id: &AccountId) -> ProfileResult<Vec<Profile>> {
        let mut profiles: Vec<Profile> = self
            .lock()
            .profiles
            .iter()
            .filter(|p| p.account_id == *account_id)
            .cloned()
            .collect();
        profiles.sort_by(|a, b| {
            b.is_main
                .cmp(&a.is_main)
                .then(a.sort_order.cmp(&b.sort_order))
                .then(a.created_at.cmp(&b.created_at))
        });
        Ok(profiles)
    }

    async fn next_sort_order(&self, account_id: &AccountId) -> ProfileResult<i32> {
        Ok(self
            .lock()
            .profiles
            .iter()
            .filter(|p| p.account_id == *account_id)
            .map(|p| p.sort_order)
            .max()
            .unwrap_or(0)
            + 1)
    }

    async fn update(&self, profile: &Profile) -> ProfileResult<()> {
        let mut state = self.lock();
        if let Some(existing) = state
            .profiles
            .iter_mut()
            .find(|p| p.account_id == profile.account_id && p.id == profile.id)
        {
            *existing = profile.clone();
        }
        Ok(())
    }

    async fn delete(&self, account_id: &AccountId, profile_id: ProfileId) -> ProfileResult<()> {
        self.lock()
            .profiles
            .retain(|p| !(p.account_id == *account_id && p.id == profile_id));
        Ok(())
    }
}

impl PinRepository for MemRepository {
    async fn find_pin(&self, account_id: &AccountId) -> ProfileResult<Option<AccountPin>> {
        Ok(self.lock().pins.get(account_id.as_str()).cloned())
    }

    async fn upsert_pin(&self, pin: &AccountPin) -> ProfileResult<()> {
        self.lock()
            .pins
            .insert(pin.account_id.as_str().to_string(), pin.clone());
        Ok(())
    }

    async fn pin_exists(&self, account_id: &AccountId) -> ProfileResult<bool> {
        Ok(self.lock().pins.contains_key(account_id.as_str()))
    }
}

impl VerifyAttemptsRepository for MemRepository {
    async fn find_attempts(
        &self,
        account_id: &AccountId,
    ) -> ProfileResult<Option<VerifyAttempts>> {
        Ok(self.lock().attempts.get(account_id.as_str()).cloned())
    }

    async fn save_attempts(&self, attempts: &VerifyAttempts) -> ProfileResult<()> {
        self.lock()
            .attempts
            .insert(attempts.account_id.as_str().to_string(), attempts.clone());
        Ok(())
    }

    async fn reset_attempts(&self, account_id: &AccountId) -> ProfileResult<()> {
        self.lock().attempts.remove(account_id.as_str());
        Ok(())
    }
}

// ============================================================================
// Test helpers
// ============================================================================

fn account() -> AccountId {
    AccountId::new("auth0|owner").unwrap()
}

fn other_account() -> AccountId {
    AccountId::new("auth0|stranger").unwrap()
}

fn config() -> Arc<ProfilesConfig> {
    Arc::new(ProfilesConfig::default())
}

fn pin_use_case(repo: &MemRepository) -> PinUseCase<MemRepository, MemRepository> {
    PinUseCase::new(Arc::new(repo.clone()), Arc::new(repo.clone()), config())
}

fn list_use_case(repo: &MemRepository) -> ListProfilesUseCase<MemRepository> {
    ListProfilesUseCase::new(Arc::new(repo.clone()))
}

fn create_use_case(repo: &MemRepository) -> CreateProfileUseCase<MemRepository> {
    CreateProfileUseCase::new(Arc::new(repo.clone()))
}

fn update_use_case(
    repo: &MemRepository,
) -> UpdateProfileUseCase<MemRepository, MemRepository, MemRepository> {
    UpdateProfileUseCase::new(Arc::new(repo.clone()), pin_use_case(repo))
}

fn delete_use_case(
    repo: &MemRepository,
) -> DeleteProfileUseCase<MemRepository, MemRepository, MemRepository> {
    DeleteProfileUseCase::new(Arc::new(repo.clone()), pin_use_case(repo))
}

fn identity(name: &str) -> ListProfilesInput {
    ListProfilesInput {
        name: Some(name.to_string()),
        picture: Some("https://cdn.example.com/me.png".to_string()),
    }
}

async fn provision_main(repo: &MemRepository) -> Profile {
    list_use_case(repo)
        .execute(&account(), identity("Marie"))
        .await
        .unwrap()
        .remove(0)
}

async fn create_member(repo: &MemRepository, name: &str) -> Profile {
    create_use_case(repo)
        .execute(
            &account(),
            CreateProfileInput {
                name: name.to_string(),
                avatar_url: None,
            },
        )
        .await
        .unwrap()
}

async fn set_pin(repo: &MemRepository, pin: &str) {
    pin_use_case(repo)
        .set(&account(), pin.to_string())
        .await
        .unwrap();
}

// ============================================================================
// Listing and auto-provisioning
// ============================================================================

mod listing {
    use super::*;

    #[tokio::test]
    async fn test_first_listing_provisions_single_main() {
        let repo = MemRepository::default();

        let profiles = list_use_case(&repo)
            .execute(&account(), identity("Marie"))
            .await
            .unwrap();

        assert_eq!(profiles.len(), 1);
        assert!(profiles[0].is_main);
        assert_eq!(profiles[0].name.as_str(), "Marie");
        assert!(profiles[0].avatar_url.is_some());
    }

    #[tokio::test]
    async fn test_repeat_listing_is_idempotent() {
        let repo = MemRepository::default();

        let first = list_use_case(&repo)
            .execute(&account(), identity("Marie"))
            .await
            .unwrap();
        let second = list_use_case(&repo)
            .execute(&account(), identity("Renamed Later"))
            .await
            .unwrap();

        assert_eq!(second.len(), 1);
        assert_eq!(second[0].id, first[0].id);
        // The existing main profile wins over fresh identity claims
        assert_eq!(second[0].name.as_str(), "Marie");

        let mains = second.iter().filter(|p| p.is_main).count();
        assert_eq!(mains, 1);
    }

    #[tokio::test]
    async fn test_unusable_identity_claims_fall_back() {
        let repo = MemRepository::default();

        let profiles = list_use_case(&repo)
            .execute(
                &account(),
                ListProfilesInput {
                    name: Some("   ".to_string()),
                    picture: Some("not-a-url".to_string()),
                },
            )
            .await
            .unwrap();

        assert_eq!(profiles[0].name.as_str(), "Mon profil");
        assert!(profiles[0].avatar_url.is_none());
    }

    #[tokio::test]
    async fn test_listing_orders_main_first_then_sort_order() {
        let repo = MemRepository::default();
        provision_main(&repo).await;
        let second = create_member(&repo, "Second").await;
        let third = create_member(&repo, "Third").await;

        let profiles = list_use_case(&repo)
            .execute(&account(), identity("Marie"))
            .await
            .unwrap();

        assert_eq!(profiles.len(), 3);
        assert!(profiles[0].is_main);
        assert_eq!(profiles[1].id, second.id);
        assert_eq!(profiles[2].id, third.id);
    }
}

// ============================================================================
// Profile creation
// ============================================================================

mod creation {
    use super::*;

    #[tokio::test]
    async fn test_create_assigns_incrementing_sort_order() {
        let repo = MemRepository::default();
        let main = provision_main(&repo).await;
        assert_eq!(main.sort_order, 0);

        let first = create_member(&repo, "First").await;
        let second = create_member(&repo, "Second").await;

        assert_eq!(first.sort_order, 1);
        assert_eq!(second.sort_order, 2);
        assert!(!first.is_main);
    }

    #[tokio::test]
    async fn test_create_rejects_bad_name_before_store() {
        let repo = MemRepository::default();

        let result = create_use_case(&repo)
            .execute(
                &account(),
                CreateProfileInput {
                    name: "  ".to_string(),
                    avatar_url: None,
                },
            )
            .await;

        assert!(matches!(result, Err(ProfileError::InvalidName(_))));

        let long = "a".repeat(101);
        let result = create_use_case(&repo)
            .execute(
                &account(),
                CreateProfileInput {
                    name: long,
                    avatar_url: None,
                },
            )
            .await;

        assert!(matches!(result, Err(ProfileError::InvalidName(_))));
        assert!(repo.lock().profiles.is_empty());
    }

    #[tokio::test]
    async fn test_create_rejects_bad_avatar_url() {
        let repo = MemRepository::default();

        let result = create_use_case(&repo)
            .execute(
                &account(),
                CreateProfileInput {
                    name: "Kid".to_string(),
                    avatar_url: Some("ftp://nope".to_string()),
                },
            )
            .await;

        assert!(matches!(result, Err(ProfileError::InvalidAvatarUrl(_))));
    }
}

// ============================================================================
// PIN lifecycle
// ============================================================================

mod pin_lifecycle {
    use super::*;

    #[tokio::test]
    async fn test_example_flow() {
        let repo = MemRepository::default();
        let use_case = pin_use_case(&repo);

        // No PIN configured
        assert!(!use_case.status(&account()).await.unwrap());

        // Set and check status
        use_case.set(&account(), "1234".to_string()).await.unwrap();
        assert!(use_case.status(&account()).await.unwrap());

        // Correct PIN verifies
        use_case
            .verify(&account(), "1234".to_string())
            .await
            .unwrap();

        // Wrong PIN is rejected
        let result = use_case.verify(&account(), "0000".to_string()).await;
        assert!(matches!(result, Err(ProfileError::WrongPin)));

        // Four more failures exhaust the window
        for _ in 0..4 {
            let result = use_case.verify(&account(), "0000".to_string()).await;
            assert!(matches!(result, Err(ProfileError::WrongPin)));
        }

        // Sixth attempt is blocked even with the correct PIN
        let result = use_case.verify(&account(), "1234".to_string()).await;
        assert!(matches!(
            result,
            Err(ProfileError::TooManyAttempts { .. })
        ));
    }

    #[tokio::test]
    async fn test_set_overwrites_previous_pin() {
        let repo = MemRepository::default();
        let use_case = pin_use_case(&repo);

        use_case.set(&account(), "1234".to_string()).await.unwrap();
        use_case.set(&account(), "9999".to_string()).await.unwrap();

        use_case
            .verify(&account(), "9999".to_string())
            .await
            .unwrap();
        let result = use_case.verify(&account(), "1234".to_string()).await;
        assert!(matches!(result, Err(ProfileError::WrongPin)));
    }

    #[tokio::test]
    async fn test_malformed_pin_rejected_before_store() {
        let repo = MemRepository::default();
        let use_case = pin_use_case(&repo);

        let result = use_case.set(&account(), "12a4".to_string()).await;
        assert!(matches!(result, Err(ProfileError::InvalidPinFormat(_))));
        assert!(!use_case.status(&account()).await.unwrap());

        use_case.set(&account(), "1234".to_string()).await.unwrap();

        let result = use_case.verify(&account(), "123".to_string()).await;
        assert!(matches!(result, Err(ProfileError::InvalidPinFormat(_))));

        // A malformed attempt is not counted against the rate limit
        assert!(repo.attempts_for(&account()).is_none());
    }

    #[tokio::test]
    async fn test_verify_without_configured_pin() {
        let repo = MemRepository::default();
        let use_case = pin_use_case(&repo);

        let result = use_case.verify(&account(), "1234".to_string()).await;
        assert!(matches!(result, Err(ProfileError::PinNotSet)));

        // Absence of a credential is not a guessing attempt
        assert!(repo.attempts_for(&account()).is_none());
    }

    #[tokio::test]
    async fn test_successful_verify_resets_counter() {
        let repo = MemRepository::default();
        let use_case = pin_use_case(&repo);
        use_case.set(&account(), "1234".to_string()).await.unwrap();

        for _ in 0..3 {
            let _ = use_case.verify(&account(), "0000".to_string()).await;
        }
        assert_eq!(repo.attempts_for(&account()).unwrap().attempts_count, 3);

        use_case
            .verify(&account(), "1234".to_string())
            .await
            .unwrap();
        assert!(repo.attempts_for(&account()).is_none());

        // All five attempts are available again
        for _ in 0..4 {
            let result = use_case.verify(&account(), "0000".to_string()).await;
            assert!(matches!(result, Err(ProfileError::WrongPin)));
        }
    }

    #[tokio::test]
    async fn test_expired_window_unblocks() {
        let repo = MemRepository::default();
        let use_case = pin_use_case(&repo);
        use_case.set(&account(), "1234".to_string()).await.unwrap();

        // Exhausted counter whose window elapsed just over 900 s ago
        let stale_start = Utc::now().timestamp_millis() - 901_000;
        repo.seed_attempts(VerifyAttempts {
            account_id: account(),
            attempts_count: 5,
            window_start_ms: stale_start,
        });

        use_case
            .verify(&account(), "1234".to_string())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_failure_after_expired_window_starts_fresh() {
        let repo = MemRepository::default();
        let use_case = pin_use_case(&repo);
        use_case.set(&account(), "1234".to_string()).await.unwrap();

        let stale_start = Utc::now().timestamp_millis() - 901_000;
        repo.seed_attempts(VerifyAttempts {
            account_id: account(),
            attempts_count: 5,
            window_start_ms: stale_start,
        });

        let result = use_case.verify(&account(), "0000".to_string()).await;
        assert!(matches!(result, Err(ProfileError::WrongPin)));

        let attempts = repo.attempts_for(&account()).unwrap();
        assert_eq!(attempts.attempts_count, 1);
        assert!(attempts.window_start_ms > stale_start);
    }
}

// ============================================================================
// Mutation gating
// ============================================================================

mod mutation_gating {
    use super::*;

    #[tokio::test]
    async fn test_main_profile_name_changes_freely() {
        let repo = MemRepository::default();
        let main = provision_main(&repo).await;
        set_pin(&repo, "1234").await;

        let updated = update_use_case(&repo)
            .execute(
                &account(),
                UpdateProfileInput {
                    profile_id: main.id,
                    name: Some("Nouvelle Marie".to_string()),
                    avatar_url: None,
                    pin: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name.as_str(), "Nouvelle Marie");
        assert!(updated.is_main);
    }

    #[tokio::test]
    async fn test_member_update_requires_pin_when_configured() {
        let repo = MemRepository::default();
        provision_main(&repo).await;
        let member = create_member(&repo, "Enfant").await;
        set_pin(&repo, "1234").await;

        let result = update_use_case(&repo)
            .execute(
                &account(),
                UpdateProfileInput {
                    profile_id: member.id,
                    name: Some("Ado".to_string()),
                    avatar_url: None,
                    pin: None,
                },
            )
            .await;
        assert!(matches!(result, Err(ProfileError::PinRequired)));

        let result = update_use_case(&repo)
            .execute(
                &account(),
                UpdateProfileInput {
                    profile_id: member.id,
                    name: Some("Ado".to_string()),
                    avatar_url: None,
                    pin: Some("0000".to_string()),
                },
            )
            .await;
        assert!(matches!(result, Err(ProfileError::WrongPin)));

        // Nothing was mutated by the rejected requests
        let stored = repo
            .find_by_id(&account(), member.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.name.as_str(), "Enfant");

        let updated = update_use_case(&repo)
            .execute(
                &account(),
                UpdateProfileInput {
                    profile_id: member.id,
                    name: Some("Ado".to_string()),
                    avatar_url: Some("https://cdn.example.com/ado.png".to_string()),
                    pin: Some("1234".to_string()),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name.as_str(), "Ado");
        assert!(updated.avatar_url.is_some());
    }

    #[tokio::test]
    async fn test_malformed_pin_on_gated_update_never_mutates() {
        let repo = MemRepository::default();
        provision_main(&repo).await;
        let member = create_member(&repo, "Enfant").await;
        set_pin(&repo, "1234").await;

        let result = update_use_case(&repo)
            .execute(
                &account(),
                UpdateProfileInput {
                    profile_id: member.id,
                    name: Some("Ado".to_string()),
                    avatar_url: None,
                    pin: Some("12a4".to_string()),
                },
            )
            .await;
        assert!(matches!(result, Err(ProfileError::InvalidPinFormat(_))));

        let stored = repo
            .find_by_id(&account(), member.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.name.as_str(), "Enfant");

        // A malformed code is not a guessing attempt
        assert!(repo.attempts_for(&account()).is_none());
    }

    #[tokio::test]
    async fn test_member_update_without_configured_pin_proceeds() {
        // Secondary profiles stay ungated until a PIN is configured
        let repo = MemRepository::default();
        provision_main(&repo).await;
        let member = create_member(&repo, "Enfant").await;

        let updated = update_use_case(&repo)
            .execute(
                &account(),
                UpdateProfileInput {
                    profile_id: member.id,
                    name: Some("Ado".to_string()),
                    avatar_url: None,
                    pin: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name.as_str(), "Ado");
    }

    #[tokio::test]
    async fn test_update_unknown_or_foreign_profile_is_not_found() {
        let repo = MemRepository::default();
        provision_main(&repo).await;
        let member = create_member(&repo, "Enfant").await;

        let result = update_use_case(&repo)
            .execute(
                &account(),
                UpdateProfileInput {
                    profile_id: ProfileId::new(),
                    name: Some("X".to_string()),
                    avatar_url: None,
                    pin: None,
                },
            )
            .await;
        assert!(matches!(result, Err(ProfileError::ProfileNotFound)));

        // Another account cannot see, let alone mutate, the profile
        let result = update_use_case(&repo)
            .execute(
                &other_account(),
                UpdateProfileInput {
                    profile_id: member.id,
                    name: Some("X".to_string()),
                    avatar_url: None,
                    pin: None,
                },
            )
            .await;
        assert!(matches!(result, Err(ProfileError::ProfileNotFound)));
    }

    #[tokio::test]
    async fn test_gate_failures_share_the_rate_limit_window() {
        let repo = MemRepository::default();
        provision_main(&repo).await;
        let member = create_member(&repo, "Enfant").await;
        set_pin(&repo, "1234").await;

        for _ in 0..5 {
            let result = update_use_case(&repo)
                .execute(
                    &account(),
                    UpdateProfileInput {
                        profile_id: member.id,
                        name: Some("Ado".to_string()),
                        avatar_url: None,
                        pin: Some("0000".to_string()),
                    },
                )
                .await;
            assert!(matches!(result, Err(ProfileError::WrongPin)));
        }

        // The verify endpoint path sees the same exhausted counter
        let result = pin_use_case(&repo)
            .verify(&account(), "1234".to_string())
            .await;
        assert!(matches!(
            result,
            Err(ProfileError::TooManyAttempts { .. })
        ));
    }
}

// ============================================================================
// Deletion
// ============================================================================

mod deletion {
    use super::*;

    #[tokio::test]
    async fn test_main_profile_is_unconditionally_protected() {
        let repo = MemRepository::default();
        let main = provision_main(&repo).await;
        set_pin(&repo, "1234").await;

        let result = delete_use_case(&repo)
            .execute(
                &account(),
                DeleteProfileInput {
                    profile_id: main.id,
                    pin: Some("1234".to_string()),
                },
            )
            .await;

        assert!(matches!(result, Err(ProfileError::MainProfileProtected)));
        assert!(
            repo.find_by_id(&account(), main.id)
                .await
                .unwrap()
                .is_some()
        );
    }

    #[tokio::test]
    async fn test_member_deletion_is_pin_gated() {
        let repo = MemRepository::default();
        provision_main(&repo).await;
        let member = create_member(&repo, "Enfant").await;
        set_pin(&repo, "1234").await;

        let result = delete_use_case(&repo)
            .execute(
                &account(),
                DeleteProfileInput {
                    profile_id: member.id,
                    pin: Some("0000".to_string()),
                },
            )
            .await;
        assert!(matches!(result, Err(ProfileError::WrongPin)));
        assert!(
            repo.find_by_id(&account(), member.id)
                .await
                .unwrap()
                .is_some()
        );

        delete_use_case(&repo)
            .execute(
                &account(),
                DeleteProfileInput {
                    profile_id: member.id,
                    pin: Some("1234".to_string()),
                },
            )
            .await
            .unwrap();
        assert!(
            repo.find_by_id(&account(), member.id)
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_delete_unknown_profile_is_not_found() {
        let repo = MemRepository::default();
        provision_main(&repo).await;

        let result = delete_use_case(&repo)
            .execute(
                &account(),
                DeleteProfileInput {
                    profile_id: ProfileId::new(),
                    pin: None,
                },
            )
            .await;

        assert!(matches!(result, Err(ProfileError::ProfileNotFound)));
    }
}
