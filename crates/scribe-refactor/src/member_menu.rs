//! Context-menu model for class members.

use scribe_core::DocumentId;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberModifiers {
    pub is_override: bool,
    pub is_virtual: bool,
    pub is_abstract: bool,
}

/// Where a member is declared. `begin_line` is one-based; `0` means unknown.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberLocation {
    pub document: DocumentId,
    pub begin_line: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberInfo {
    pub name: String,
    #[serde(default)]
    pub modifiers: MemberModifiers,
    #[serde(default)]
    pub declaring_type_sealed: bool,
    #[serde(default)]
    pub location: Option<MemberLocation>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MemberCommand {
    Rename,
    GoToBase,
    FindOverrides,
    FindReferences,
}

impl MemberCommand {
    /// Menu text, with `&` marking the access key.
    pub fn label(self) -> &'static str {
        match self {
            MemberCommand::Rename => "&Rename",
            MemberCommand::GoToBase => "Go to &base class",
            MemberCommand::FindOverrides => "Find &overrides",
            MemberCommand::FindReferences => "&Find references",
        }
    }
}

/// Commands offered for `member`, in menu order.
pub fn member_commands(member: &MemberInfo) -> Vec<MemberCommand> {
    let modifiers = member.modifiers;
    let mut commands = vec![MemberCommand::Rename];

    if modifiers.is_override {
        commands.push(MemberCommand::GoToBase);
    }
    // A sealed type ends the override chain for its overriding members.
    if modifiers.is_virtual
        || modifiers.is_abstract
        || (modifiers.is_override && !member.declaring_type_sealed)
    {
        commands.push(MemberCommand::FindOverrides);
    }

    commands.push(MemberCommand::FindReferences);
    commands
}

/// Zero-based editor position to jump to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct JumpTarget {
    pub document: DocumentId,
    pub line: u32,
    pub column: u32,
}

impl JumpTarget {
    /// Start of the member's first line, or the top of the file when the
    /// declaration line is unknown.
    pub fn for_location(location: &MemberLocation) -> Self {
        Self {
            document: location.document.clone(),
            line: location.begin_line.saturating_sub(1),
            column: 0,
        }
    }
}
