//! Admin account management: list users, activate/deactivate.
//!
//! Deactivation locks an account out of login without deleting its
//! posts; reactivation undoes it.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{Actor, User};
use crate::error::{DomainError, RepoError};
use crate::ports::{BaseRepository, UserRepository};

pub struct AccountService {
    users: Arc<dyn UserRepository>,
}

impl AccountService {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// All accounts, newest first. Admin only.
    pub async fn list_users(&self, actor: Actor) -> Result<Vec<User>, DomainError> {
        require_admin(actor)?;
        self.users.find_all().await.map_err(|e| {
            tracing::error!(error = %e, "user listing failed");
            DomainError::Internal("failed to list users".to_string())
        })
    }

    /// Activate or deactivate an account. Admins cannot deactivate
    /// themselves, so the last admin can't lock everyone out.
    pub async fn set_active(
        &self,
        actor: Actor,
        user_id: Uuid,
        active: bool,
    ) -> Result<User, DomainError> {
        require_admin(actor)?;

        if actor.user_id == user_id && !active {
            return Err(DomainError::Validation(
                "you cannot deactivate your own account".to_string(),
            ));
        }

        let mut user = self
            .users
            .find_by_id(user_id)
            .await
            .map_err(|e| storage_failure(user_id, e))?
            .ok_or_else(|| DomainError::user_not_found(user_id))?;

        user.is_active = active;
        let updated = self.users.update(user).await.map_err(|e| match e {
            RepoError::NotFound => DomainError::user_not_found(user_id),
            other => storage_failure(user_id, other),
        })?;

        tracing::info!(
            user_id = %user_id,
            admin_id = %actor.user_id,
            active,
            "user status changed"
        );
        Ok(updated)
    }
}

fn require_admin(actor: Actor) -> Result<(), DomainError> {
    if actor.is_admin {
        Ok(())
    } else {
        Err(DomainError::Unauthorized)
    }
}

fn storage_failure(user_id: Uuid, err: RepoError) -> DomainError {
    tracing::error!(user_id = %user_id, error = %err, "user store failure");
    DomainError::Internal("failed to update user".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::MemoryUsers;

    async fn seeded() -> (Arc<MemoryUsers>, AccountService, User) {
        let users = Arc::new(MemoryUsers::new());
        let user = users
            .save(User::new("linh".to_string(), "hash".to_string()))
            .await
            .unwrap();
        let service = AccountService::new(users.clone());
        (users, service, user)
    }

    #[tokio::test]
    async fn deactivation_round_trips() {
        let (users, service, user) = seeded().await;
        let admin = Actor::admin(Uuid::new_v4());

        let updated = service.set_active(admin, user.id, false).await.unwrap();
        assert!(!updated.is_active);
        assert!(!users.find_by_id(user.id).await.unwrap().unwrap().is_active);

        let updated = service.set_active(admin, user.id, true).await.unwrap();
        assert!(updated.is_active);
    }

    #[tokio::test]
    async fn admins_cannot_deactivate_themselves() {
        let users = Arc::new(MemoryUsers::new());
        let mut admin_user = User::new("mod".to_string(), "hash".to_string());
        admin_user.is_admin = true;
        let admin_user = users.save(admin_user).await.unwrap();
        let service = AccountService::new(users.clone());

        let err = service
            .set_active(Actor::admin(admin_user.id), admin_user.id, false)
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Validation(_)));
        assert!(
            users
                .find_by_id(admin_user.id)
                .await
                .unwrap()
                .unwrap()
                .is_active
        );
    }

    #[tokio::test]
    async fn missing_user_is_not_found() {
        let (_, service, _) = seeded().await;

        let err = service
            .set_active(Actor::admin(Uuid::new_v4()), Uuid::new_v4(), false)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn non_admin_callers_are_rejected() {
        let (_, service, user) = seeded().await;
        let caller = Actor::user(Uuid::new_v4());

        assert!(matches!(
            service.list_users(caller).await.unwrap_err(),
            DomainError::Unauthorized
        ));
        assert!(matches!(
            service.set_active(caller, user.id, false).await.unwrap_err(),
            DomainError::Unauthorized
        ));
    }

    #[tokio::test]
    async fn lists_users_newest_first() {
        let (users, service, first) = seeded().await;
        let second = users
            .save(User::new("mai".to_string(), "hash".to_string()))
            .await
            .unwrap();

        let listed = service.list_users(Actor::admin(Uuid::new_v4())).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, second.id);
        assert_eq!(listed[1].id, first.id);
    }
}
