use crate::module::ModuleId;
use std::borrow::Cow;

/// Errors raised while registering, activating or driving modules.
#[lobby_derive::lobby_error]
pub enum ModuleError {
    /// A module with the same id is already registered.
    #[error("Module already registered{}: {module}", format_context(.context))]
    DuplicateModule { module: ModuleId, context: Option<Cow<'static, str>> },

    /// A declared dependency has no registered module.
    #[error("Missing dependency{}: `{dependency}` required by `{dependent}`", format_context(.context))]
    MissingDependency {
        dependency: ModuleId,
        dependent: ModuleId,
        context: Option<Cow<'static, str>>,
    },

    /// The dependency graph loops back onto `module`.
    #[error("Circular dependency detected involving{}: {module}", format_context(.context))]
    CircularDependency { module: ModuleId, context: Option<Cow<'static, str>> },

    /// A lifecycle hook of `module` failed.
    #[error("Module `{module}` failed{}: {message}", format_context(.context))]
    Activation { module: ModuleId, message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// No module with this id is registered.
    #[error("Unknown module{}: {module}", format_context(.context))]
    UnknownModule { module: ModuleId, context: Option<Cow<'static, str>> },

    /// The module is registered but has not been activated.
    #[error("Module is not active{}: {module}", format_context(.context))]
    NotActive { module: ModuleId, context: Option<Cow<'static, str>> },

    /// Failures raised from inside module hooks.
    #[error("Internal module error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl ModuleError {
    pub(crate) const fn duplicate(module: ModuleId) -> Self {
        Self::DuplicateModule { module, context: None }
    }

    pub(crate) const fn missing(dependency: ModuleId, dependent: ModuleId) -> Self {
        Self::MissingDependency { dependency, dependent, context: None }
    }

    pub(crate) const fn circular(module: ModuleId) -> Self {
        Self::CircularDependency { module, context: None }
    }

    pub(crate) const fn unknown(module: ModuleId) -> Self {
        Self::UnknownModule { module, context: None }
    }

    pub(crate) const fn not_active(module: ModuleId) -> Self {
        Self::NotActive { module, context: None }
    }

    /// Attributes a hook failure to `module`. Errors already attributed are kept as they are.
    pub(crate) fn hook_failed(module: ModuleId, phase: &'static str, source: Self) -> Self {
        match source {
            Self::Activation { .. } => source,
            other => Self::Activation {
                module,
                message: Cow::Owned(other.to_string()),
                context: Some(Cow::Borrowed(phase)),
            },
        }
    }

    /// The module the error is attributed to, when there is one.
    #[must_use]
    pub const fn module(&self) -> Option<ModuleId> {
        match self {
            Self::DuplicateModule { module, .. }
            | Self::CircularDependency { module, .. }
            | Self::Activation { module, .. }
            | Self::UnknownModule { module, .. }
            | Self::NotActive { module, .. } => Some(*module),
            Self::MissingDependency { dependent, .. } => Some(*dependent),
            Self::Internal { .. } => None,
        }
    }
}
