use uuid::Uuid;

/// The authenticated caller of a service operation.
///
/// Service entry points take the capability check out of the transport
/// layer: admin-only operations inspect `is_admin` themselves and
/// return `DomainError::Unauthorized` instead of trusting route gates.
#[derive(Debug, Clone, Copy)]
pub struct Actor {
    pub user_id: Uuid,
    pub is_admin: bool,
}

impl Actor {
    pub fn user(user_id: Uuid) -> Self {
        Self {
            user_id,
            is_admin: false,
        }
    }

    pub fn admin(user_id: Uuid) -> Self {
        Self {
            user_id,
            is_admin: true,
        }
    }
}
