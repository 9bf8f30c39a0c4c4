use super::capabilities::CallerContext;
use crate::core::abilities::Ability;
use crate::error::AbilityError;

/// Evaluates an ability's single capability requirement against a caller.
///
/// The gate is all-or-nothing: there is no partial authorization and it never
/// touches the content store.
#[derive(Debug, Clone, Copy, Default)]
pub struct PermissionGate;

impl PermissionGate {
    pub const fn new() -> Self {
        Self
    }

    pub fn authorize(&self, ability: &Ability, caller: &CallerContext) -> bool {
        caller.has(ability.capability)
    }

    pub fn check(&self, ability: &Ability, caller: &CallerContext) -> Result<(), AbilityError> {
        if self.authorize(ability, caller) {
            return Ok(());
        }

        tracing::warn!(
            ability = %ability.id,
            capability = %ability.capability,
            user_id = caller.user_id,
            "ability invocation denied"
        );
        Err(AbilityError::PermissionDenied {
            ability: ability.id.clone(),
            capability: ability.capability.to_string(),
        })
    }
}
