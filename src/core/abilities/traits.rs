use crate::core::schema::TypedInput;
use crate::error::AbilityError;
use crate::security::CallerContext;
use async_trait::async_trait;
use serde_json::Value;

/// Execute side of one ability.
///
/// Handlers receive input that already passed schema validation and a caller
/// that already passed the permission gate.
#[async_trait]
pub trait AbilityHandler: Send + Sync {
    async fn execute(
        &self,
        input: TypedInput,
        caller: &CallerContext,
    ) -> Result<Value, AbilityError>;
}
