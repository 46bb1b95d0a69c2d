use std::collections::BTreeMap;

use thiserror::Error;

use crate::debugger::{debugger_supports, DebuggerFeature};
use crate::window::{WindowState, WorkbenchSnapshot};

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConditionError {
    #[error("unknown condition `{0}`")]
    UnknownCondition(String),
    #[error("condition `{condition}` requires the `{property}` property")]
    MissingProperty {
        condition: &'static str,
        property: &'static str,
    },
    #[error("unknown window state `{0}`")]
    UnknownWindowState(String),
    #[error("unknown debugger feature `{0}`")]
    UnknownDebuggerFeature(String),
}

/// A visibility condition attached to a menu item or toolbar button.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Condition {
    /// The active content's file has `extension` (with leading dot, any case).
    ActiveContentExtension { extension: String },
    /// Some open window has one of `required` (or `required` is empty) and
    /// none of `excluded`.
    OpenWindowState {
        required: WindowState,
        excluded: WindowState,
    },
    DebuggerSupports(DebuggerFeature),
}

impl Condition {
    pub const ACTIVE_CONTENT_EXTENSION: &'static str = "ActiveContentExtension";
    pub const OPEN_WINDOW_STATE: &'static str = "OpenWindowState";
    pub const DEBUGGER_SUPPORTS: &'static str = "DebuggerSupports";

    /// Build a condition from its name and attribute map, as written in an
    /// add-in manifest (`<Condition name="..." key="value">`).
    pub fn from_properties(
        name: &str,
        properties: &BTreeMap<String, String>,
    ) -> Result<Self, ConditionError> {
        let get = |condition: &'static str, property: &'static str| {
            properties
                .get(property)
                .map(String::as_str)
                .ok_or(ConditionError::MissingProperty {
                    condition,
                    property,
                })
        };

        match name {
            Self::ACTIVE_CONTENT_EXTENSION => Ok(Self::ActiveContentExtension {
                extension: get(Self::ACTIVE_CONTENT_EXTENSION, "activeextension")?.to_string(),
            }),
            Self::OPEN_WINDOW_STATE => {
                let parse = |property: &str| match properties.get(property) {
                    Some(value) => value.parse::<WindowState>(),
                    None => Ok(WindowState::NONE),
                };
                Ok(Self::OpenWindowState {
                    required: parse("windowstate")?,
                    excluded: parse("nowindowstate")?,
                })
            }
            Self::DEBUGGER_SUPPORTS => Ok(Self::DebuggerSupports(
                get(Self::DEBUGGER_SUPPORTS, "debuggersupports")?.parse()?,
            )),
            other => Err(ConditionError::UnknownCondition(other.to_string())),
        }
    }

    pub fn evaluate(&self, workbench: &WorkbenchSnapshot) -> bool {
        let result = match self {
            Condition::ActiveContentExtension { extension } => {
                active_content_extension(workbench).is_some_and(|active| {
                    active.to_uppercase() == extension.to_uppercase()
                })
            }
            Condition::OpenWindowState { required, excluded } => {
                workbench.active_view().is_some()
                    && workbench.views.iter().any(|view| {
                        let state = view.state();
                        (required.is_empty() || state.intersects(*required))
                            && !state.intersects(*excluded)
                    })
            }
            Condition::DebuggerSupports(feature) => {
                debugger_supports(workbench.debugger.as_ref(), *feature)
            }
        };

        tracing::trace!(target: "scribe.workbench", condition = ?self, result, "evaluated condition");
        result
    }
}

/// Extension of the active content including the leading dot, or `""` when
/// the name has none. A leading dot counts, so `.gitignore` is its own
/// extension; a trailing dot yields `""`.
fn active_content_extension(workbench: &WorkbenchSnapshot) -> Option<String> {
    let name = workbench.active_view()?.display_name()?;
    let file_name = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let extension = match file_name.rfind('.') {
        Some(dot) if dot + 1 < file_name.len() => &file_name[dot..],
        _ => "",
    };
    Some(extension.to_string())
}
