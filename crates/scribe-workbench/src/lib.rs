//! Workbench state queries used to decide menu and toolbar visibility.
//!
//! Nothing here talks to a windowing toolkit: callers describe the workbench
//! as a [`WorkbenchSnapshot`] and [`Condition`]s are evaluated against it.

mod condition;
mod debugger;
mod dispose;
mod window;

pub use condition::{Condition, ConditionError};
pub use debugger::{debugger_supports, DebuggerDescriptor, DebuggerFeature};
pub use dispose::CallbackOnDispose;
pub use window::{ViewContent, WindowState, WorkbenchSnapshot};
