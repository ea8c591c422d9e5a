//! Native action registry.
//!
//! Native actions are grouped into providers registered under a qualified
//! type name. Each provider exposes methods; only methods carrying the action
//! marker are eligible for invocation, and each method declares its
//! parameters and result shape up front so that resolution can be validated
//! before anything runs.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::context::ActionContext;

/// Result map returned by a native action: output name → value or null.
pub type StringMap = HashMap<String, Option<String>>;

/// Handler signature of a native action method.
///
/// `Ok(None)` means the call produced no mapping and yields empty outputs.
pub type ActionFn =
    dyn Fn(&mut ActionContext<'_>) -> anyhow::Result<Option<StringMap>> + Send + Sync;

/// A declared parameter of an action method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamSpec {
    /// A named input bound from the call arguments.
    Input(String),
    /// The transient session store handle.
    TransientSession,
    /// The persisted session store handle.
    PersistedSession,
}

/// The declared result shape of an action method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReturnShape {
    /// A map from string to string -- the only invocable shape.
    StringMap,
    /// Anything else, named for error reporting.
    Other(String),
}

impl fmt::Display for ReturnShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReturnShape::StringMap => write!(f, "Map<String, String>"),
            ReturnShape::Other(name) => write!(f, "{name}"),
        }
    }
}

// ---------------------------------------------------------------------------
// ActionMethod
// ---------------------------------------------------------------------------

/// One method of an action provider.
#[derive(Clone)]
pub struct ActionMethod {
    name: String,
    marked: bool,
    params: Vec<ParamSpec>,
    returns: ReturnShape,
    handler: Arc<ActionFn>,
}

impl ActionMethod {
    /// A method marked as an action returning a string map.
    pub fn action<F>(name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&mut ActionContext<'_>) -> anyhow::Result<Option<StringMap>> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            marked: true,
            params: Vec::new(),
            returns: ReturnShape::StringMap,
            handler: Arc::new(handler),
        }
    }

    /// A method present on the provider but lacking the action marker.
    pub fn unmarked<F>(name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&mut ActionContext<'_>) -> anyhow::Result<Option<StringMap>> + Send + Sync + 'static,
    {
        Self {
            marked: false,
            ..Self::action(name, handler)
        }
    }

    /// Declare a named input parameter.
    pub fn input(mut self, name: impl Into<String>) -> Self {
        self.params.push(ParamSpec::Input(name.into()));
        self
    }

    /// Declare a transient session handle parameter.
    pub fn transient_session(mut self) -> Self {
        self.params.push(ParamSpec::TransientSession);
        self
    }

    /// Declare a persisted session handle parameter.
    pub fn persisted_session(mut self) -> Self {
        self.params.push(ParamSpec::PersistedSession);
        self
    }

    /// Override the declared result shape.
    pub fn returns(mut self, shape: ReturnShape) -> Self {
        self.returns = shape;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_marked(&self) -> bool {
        self.marked
    }

    pub fn params(&self) -> &[ParamSpec] {
        &self.params
    }

    pub fn return_shape(&self) -> &ReturnShape {
        &self.returns
    }

    /// Names of the declared input parameters, in declaration order.
    pub fn input_names(&self) -> impl Iterator<Item = &str> {
        self.params.iter().filter_map(|p| match p {
            ParamSpec::Input(name) => Some(name.as_str()),
            _ => None,
        })
    }

    pub fn wants_transient(&self) -> bool {
        self.params.contains(&ParamSpec::TransientSession)
    }

    pub fn wants_persisted(&self) -> bool {
        self.params.contains(&ParamSpec::PersistedSession)
    }

    pub(crate) fn handler(&self) -> &ActionFn {
        self.handler.as_ref()
    }
}

impl fmt::Debug for ActionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionMethod")
            .field("name", &self.name)
            .field("marked", &self.marked)
            .field("params", &self.params)
            .field("returns", &self.returns)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// ActionProvider
// ---------------------------------------------------------------------------

/// A named group of action methods, the unit of type resolution.
#[derive(Debug, Clone)]
pub struct ActionProvider {
    type_name: String,
    methods: Vec<ActionMethod>,
}

impl ActionProvider {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            methods: Vec::new(),
        }
    }

    /// Add a method. When marked names repeat, the last one wins.
    pub fn method(mut self, method: ActionMethod) -> Self {
        self.methods.push(method);
        self
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn methods(&self) -> &[ActionMethod] {
        &self.methods
    }

    /// The marked method named `name`.
    pub fn find_action(&self, name: &str) -> Option<&ActionMethod> {
        self.methods
            .iter()
            .rev()
            .find(|m| m.marked && m.name == name)
    }

    /// Whether any method, marked or not, is named `name`.
    pub fn has_method_named(&self, name: &str) -> bool {
        self.methods.iter().any(|m| m.name == name)
    }
}

// ---------------------------------------------------------------------------
// ActionRegistry
// ---------------------------------------------------------------------------

/// Registry resolving qualified type names to action providers.
#[derive(Debug, Clone, Default)]
pub struct ActionRegistry {
    providers: HashMap<String, Arc<ActionProvider>>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a provider, replacing any provider with the same type name.
    pub fn register(&mut self, provider: ActionProvider) {
        let type_name = provider.type_name.clone();
        if self
            .providers
            .insert(type_name.clone(), Arc::new(provider))
            .is_some()
        {
            tracing::warn!(type_name, "replaced existing action provider");
        } else {
            tracing::debug!(type_name, "registered action provider");
        }
    }

    pub fn resolve(&self, type_name: &str) -> Option<Arc<ActionProvider>> {
        self.providers.get(type_name).cloned()
    }

    /// Registered providers sorted by type name.
    pub fn providers(&self) -> Vec<Arc<ActionProvider>> {
        let mut providers: Vec<_> = self.providers.values().cloned().collect();
        providers.sort_by(|a, b| a.type_name.cmp(&b.type_name));
        providers
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}
