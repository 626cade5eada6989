// Mon Feb 2 2026 - Alex

use std::fmt;

/// How a symbol is encoded in a stub. The declaration order is the replay
/// order: classes sort ahead of the instance variables they own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EncodeKind {
    GlobalSymbol,
    ObjectiveCClass,
    ObjectiveCClassEHType,
    ObjectiveCInstanceVariable,
}

impl fmt::Display for EncodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EncodeKind::GlobalSymbol => "global",
            EncodeKind::ObjectiveCClass => "objc-class",
            EncodeKind::ObjectiveCClassEHType => "objc-eh-type",
            EncodeKind::ObjectiveCInstanceVariable => "objc-ivar",
        };
        f.write_str(s)
    }
}
