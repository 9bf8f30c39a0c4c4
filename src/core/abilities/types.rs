use super::traits::AbilityHandler;
use crate::core::schema::ObjectSchema;
use crate::error::{AbilityError, ErrorKind};
use crate::security::{CallerContext, Capability};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Advisory safety hints for clients. Never enforced by the dispatcher.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Annotations {
    pub readonly: bool,
    pub destructive: bool,
    pub idempotent: bool,
}

impl Annotations {
    pub const fn read_only() -> Self {
        Self {
            readonly: true,
            destructive: false,
            idempotent: true,
        }
    }

    pub const fn creating() -> Self {
        Self {
            readonly: false,
            destructive: false,
            idempotent: false,
        }
    }

    pub const fn updating() -> Self {
        Self {
            readonly: false,
            destructive: false,
            idempotent: true,
        }
    }

    pub const fn destructive() -> Self {
        Self {
            readonly: false,
            destructive: true,
            idempotent: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct McpMeta {
    pub public: bool,
    #[serde(rename = "type")]
    pub exposure: String,
}

/// Where an ability is exposed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AbilityMeta {
    pub show_in_rest: bool,
    pub mcp: McpMeta,
}

impl Default for AbilityMeta {
    fn default() -> Self {
        Self {
            show_in_rest: true,
            mcp: McpMeta {
                public: true,
                exposure: "tool".into(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AbilityCategory {
    pub slug: String,
    pub label: String,
    pub description: String,
}

impl AbilityCategory {
    pub fn new(slug: &str, label: &str, description: &str) -> Self {
        Self {
            slug: slug.to_string(),
            label: label.to_string(),
            description: description.to_string(),
        }
    }
}

/// Immutable definition of one named operation.
pub struct Ability {
    pub id: String,
    pub label: String,
    pub description: String,
    pub category: String,
    pub input_schema: ObjectSchema,
    pub output_schema: ObjectSchema,
    pub capability: Capability,
    pub annotations: Annotations,
    pub meta: AbilityMeta,
    handler: Arc<dyn AbilityHandler>,
}

impl Ability {
    pub fn builder(id: impl Into<String>, handler: Arc<dyn AbilityHandler>) -> AbilityBuilder {
        let id = id.into();
        AbilityBuilder {
            label: id.clone(),
            id,
            description: String::new(),
            category: String::new(),
            input_schema: ObjectSchema::new().closed(),
            output_schema: ObjectSchema::new(),
            capability: Capability::Read,
            annotations: Annotations::default(),
            meta: AbilityMeta::default(),
            handler,
        }
    }

    pub(crate) fn handler(&self) -> &dyn AbilityHandler {
        self.handler.as_ref()
    }

    /// Discovery view with schemas rendered as JSON Schema documents.
    pub fn descriptor(&self) -> AbilityDescriptor {
        AbilityDescriptor {
            id: self.id.clone(),
            label: self.label.clone(),
            description: self.description.clone(),
            category: self.category.clone(),
            input_schema: self.input_schema.to_json(),
            output_schema: self.output_schema.to_json(),
            capability: self.capability,
            annotations: self.annotations,
            meta: self.meta.clone(),
        }
    }
}

impl fmt::Debug for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ability")
            .field("id", &self.id)
            .field("category", &self.category)
            .field("capability", &self.capability)
            .field("annotations", &self.annotations)
            .finish_non_exhaustive()
    }
}

pub struct AbilityBuilder {
    id: String,
    label: String,
    description: String,
    category: String,
    input_schema: ObjectSchema,
    output_schema: ObjectSchema,
    capability: Capability,
    annotations: Annotations,
    meta: AbilityMeta,
    handler: Arc<dyn AbilityHandler>,
}

impl AbilityBuilder {
    pub fn label(mut self, label: &str) -> Self {
        self.label = label.to_string();
        self
    }

    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn category(mut self, slug: &str) -> Self {
        self.category = slug.to_string();
        self
    }

    pub fn input_schema(mut self, schema: ObjectSchema) -> Self {
        self.input_schema = schema;
        self
    }

    pub fn output_schema(mut self, schema: ObjectSchema) -> Self {
        self.output_schema = schema;
        self
    }

    pub fn capability(mut self, capability: Capability) -> Self {
        self.capability = capability;
        self
    }

    pub fn annotations(mut self, annotations: Annotations) -> Self {
        self.annotations = annotations;
        self
    }

    pub fn meta(mut self, meta: AbilityMeta) -> Self {
        self.meta = meta;
        self
    }

    pub fn build(self) -> Ability {
        Ability {
            id: self.id,
            label: self.label,
            description: self.description,
            category: self.category,
            input_schema: self.input_schema,
            output_schema: self.output_schema,
            capability: self.capability,
            annotations: self.annotations,
            meta: self.meta,
            handler: self.handler,
        }
    }
}

/// Serializable description of an ability, as returned by discovery.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AbilityDescriptor {
    pub id: String,
    pub label: String,
    pub description: String,
    pub category: String,
    pub input_schema: Value,
    pub output_schema: Value,
    pub capability: Capability,
    pub annotations: Annotations,
    pub meta: AbilityMeta,
}

/// One call: which ability, with what input, on whose behalf.
#[derive(Debug, Clone)]
pub struct InvocationRequest {
    pub ability_id: String,
    pub input: Value,
    pub caller: CallerContext,
}

impl InvocationRequest {
    pub fn new(ability_id: impl Into<String>, input: Value, caller: CallerContext) -> Self {
        Self {
            ability_id: ability_id.into(),
            input,
            caller,
        }
    }
}

/// Either an output object or a structured error, never both.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum InvocationResult {
    Success {
        output: Value,
    },
    Failure {
        error_kind: ErrorKind,
        code: String,
        message: String,
        status_hint: u16,
    },
}

impl InvocationResult {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn output(&self) -> Option<&Value> {
        match self {
            Self::Success { output } => Some(output),
            Self::Failure { .. } => None,
        }
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { error_kind, .. } => Some(*error_kind),
        }
    }

    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { code, .. } => Some(code),
        }
    }
}

impl From<AbilityError> for InvocationResult {
    fn from(err: AbilityError) -> Self {
        Self::Failure {
            error_kind: err.kind(),
            code: err.code().to_string(),
            message: err.to_string(),
            status_hint: err.status_hint(),
        }
    }
}
