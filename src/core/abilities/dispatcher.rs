use super::registry::AbilityRegistry;
use super::types::{InvocationRequest, InvocationResult};
use crate::core::schema::{validate_input, validate_output};
use crate::error::AbilityError;
use crate::security::{CallerContext, PermissionGate};
use serde_json::Value;
use std::sync::Arc;

/// Validate, authorize and execute one invocation against a sealed registry.
///
/// Holds no per-invocation state; one dispatcher serves concurrent callers.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: Arc<AbilityRegistry>,
    gate: PermissionGate,
}

impl Dispatcher {
    pub fn new(registry: Arc<AbilityRegistry>) -> Self {
        Self {
            registry,
            gate: PermissionGate::new(),
        }
    }

    pub fn registry(&self) -> &AbilityRegistry {
        &self.registry
    }

    pub async fn dispatch(&self, request: InvocationRequest) -> InvocationResult {
        self.invoke(&request.ability_id, request.input, &request.caller)
            .await
    }

    pub async fn invoke(
        &self,
        ability_id: &str,
        input: Value,
        caller: &CallerContext,
    ) -> InvocationResult {
        match self.try_invoke(ability_id, input, caller).await {
            Ok(output) => InvocationResult::Success { output },
            Err(err) => {
                tracing::debug!(
                    ability = ability_id,
                    kind = %err.kind(),
                    error = %err,
                    "ability invocation failed"
                );
                err.into()
            }
        }
    }

    /// Same sequence as [`Dispatcher::invoke`], keeping the typed error.
    pub async fn try_invoke(
        &self,
        ability_id: &str,
        input: Value,
        caller: &CallerContext,
    ) -> Result<Value, AbilityError> {
        let ability = self.registry.lookup(ability_id)?;
        tracing::debug!(ability = %ability.id, user_id = caller.user_id, "invoking ability");

        let input = validate_input(&ability.input_schema, input)?;
        self.gate.check(ability, caller)?;

        let output = ability.handler().execute(input, caller).await?;

        if let Err(err) = validate_output(&ability.output_schema, &output) {
            tracing::warn!(
                ability = %ability.id,
                error = %err,
                "output does not match declared schema"
            );
        }
        if !ability.annotations.readonly {
            tracing::info!(ability = %ability.id, user_id = caller.user_id, "ability completed");
        }
        Ok(output)
    }
}
