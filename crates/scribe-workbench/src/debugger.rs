use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::condition::ConditionError;

/// Capabilities advertised by the installed debugger.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebuggerDescriptor {
    pub name: String,
    pub supports_start: bool,
    pub supports_start_without_debugging: bool,
    pub supports_stop: bool,
    pub supports_execution_control: bool,
    pub supports_stepping: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DebuggerFeature {
    Start,
    StartWithoutDebugging,
    Stop,
    ExecutionControl,
    Stepping,
}

impl FromStr for DebuggerFeature {
    type Err = ConditionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Start" => Ok(Self::Start),
            "StartWithoutDebugging" => Ok(Self::StartWithoutDebugging),
            "Stop" => Ok(Self::Stop),
            "ExecutionControl" => Ok(Self::ExecutionControl),
            "Stepping" => Ok(Self::Stepping),
            other => Err(ConditionError::UnknownDebuggerFeature(other.to_string())),
        }
    }
}

/// Whether `debugger` supports `feature`.
///
/// Without a debugger, launching and stopping the program still work (the
/// workbench runs it directly), but execution control and stepping do not.
pub fn debugger_supports(debugger: Option<&DebuggerDescriptor>, feature: DebuggerFeature) -> bool {
    let Some(debugger) = debugger else {
        return matches!(
            feature,
            DebuggerFeature::Start | DebuggerFeature::StartWithoutDebugging | DebuggerFeature::Stop
        );
    };

    match feature {
        DebuggerFeature::Start => debugger.supports_start,
        DebuggerFeature::StartWithoutDebugging => debugger.supports_start_without_debugging,
        DebuggerFeature::Stop => debugger.supports_stop,
        DebuggerFeature::ExecutionControl => debugger.supports_execution_control,
        DebuggerFeature::Stepping => debugger.supports_stepping,
    }
}
