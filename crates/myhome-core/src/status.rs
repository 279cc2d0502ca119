use serde::Serialize;

/// The last error and notice produced by a direct operation.
///
/// Each direct operation clears both when it starts and sets at most one
/// of each when it completes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatusLine {
    pub error: Option<String>,
    pub notice: Option<String>,
}

impl StatusLine {
    pub fn clear(&mut self) {
        self.error = None;
        self.notice = None;
    }
}
