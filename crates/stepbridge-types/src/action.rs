//! Action descriptor types.
//!
//! An action is the unit of work for a single workflow step. It is either a
//! native action (a registered method resolved by type name and method name)
//! or a script whose final bindings become the step outputs.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The execution strategy an action uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// A registered native method invoked with named-parameter binding.
    Native,
    /// An embedded action script.
    Script,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionKind::Native => write!(f, "native"),
            ActionKind::Script => write!(f, "script"),
        }
    }
}

impl FromStr for ActionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "native" => Ok(ActionKind::Native),
            "script" => Ok(ActionKind::Script),
            other => Err(format!("unknown action kind: '{other}'")),
        }
    }
}

/// What to run for one action invocation. Exactly one kind is active.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActionDescriptor {
    /// Native action resolved through the action registry.
    Native {
        /// Qualified type name the action provider is registered under.
        type_name: String,
        /// Method name on that provider.
        method_name: String,
    },
    /// Embedded action script. `None` or blank text is a no-op.
    Script {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        text: Option<String>,
    },
}

impl ActionDescriptor {
    /// Build a native descriptor.
    pub fn native(type_name: impl Into<String>, method_name: impl Into<String>) -> Self {
        ActionDescriptor::Native {
            type_name: type_name.into(),
            method_name: method_name.into(),
        }
    }

    /// Build a script descriptor.
    pub fn script(text: Option<impl Into<String>>) -> Self {
        ActionDescriptor::Script {
            text: text.map(Into::into),
        }
    }

    /// Build a descriptor from the flat call form used by flow steps.
    ///
    /// Only the fields relevant to `kind` are kept.
    pub fn from_parts(
        kind: ActionKind,
        type_name: &str,
        method_name: &str,
        script_text: Option<&str>,
    ) -> Self {
        match kind {
            ActionKind::Native => Self::native(type_name, method_name),
            ActionKind::Script => Self::script(script_text),
        }
    }

    pub fn kind(&self) -> ActionKind {
        match self {
            ActionDescriptor::Native { .. } => ActionKind::Native,
            ActionDescriptor::Script { .. } => ActionKind::Script,
        }
    }

    /// A short human-readable label used in events and logs.
    pub fn label(&self) -> String {
        match self {
            ActionDescriptor::Native {
                type_name,
                method_name,
            } => format!("{type_name}::{method_name}"),
            ActionDescriptor::Script { text } => {
                let lines = text.as_deref().map(|t| t.lines().count()).unwrap_or(0);
                format!("script ({lines} lines)")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_kind_parse_and_display() {
        assert_eq!("native".parse::<ActionKind>().unwrap(), ActionKind::Native);
        assert_eq!("SCRIPT".parse::<ActionKind>().unwrap(), ActionKind::Script);
        assert!("python".parse::<ActionKind>().is_err());
        assert_eq!(ActionKind::Script.to_string(), "script");
    }

    #[test]
    fn test_from_parts_keeps_only_relevant_fields() {
        let native = ActionDescriptor::from_parts(
            ActionKind::Native,
            "demo.Actions",
            "run",
            Some("ignored = 1"),
        );
        assert_eq!(native, ActionDescriptor::native("demo.Actions", "run"));

        let script =
            ActionDescriptor::from_parts(ActionKind::Script, "ignored", "ignored", Some("x = 1"));
        assert_eq!(script.kind(), ActionKind::Script);
        assert_eq!(script, ActionDescriptor::script(Some("x = 1")));
    }

    #[test]
    fn test_label() {
        assert_eq!(
            ActionDescriptor::native("demo.Actions", "run").label(),
            "demo.Actions::run"
        );
        assert_eq!(
            ActionDescriptor::script(Some("a = 1\nb = 2")).label(),
            "script (2 lines)"
        );
        assert_eq!(ActionDescriptor::script(None::<String>).label(), "script (0 lines)");
    }

    #[test]
    fn test_descriptor_serde_tagged() {
        let json = serde_json::to_value(ActionDescriptor::native("a.B", "c")).unwrap();
        assert_eq!(json["kind"], "native");
        assert_eq!(json["type_name"], "a.B");

        let parsed: ActionDescriptor =
            serde_json::from_value(serde_json::json!({ "kind": "script" })).unwrap();
        assert_eq!(parsed, ActionDescriptor::Script { text: None });
    }
}
