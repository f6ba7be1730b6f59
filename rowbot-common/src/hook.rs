use serde::{Deserialize, Serialize};

/// The only logbook webhook event kind that gets a report
pub const RESULT_ADDED: &str = "result-added";

/// Body posted by the logbook when a result changes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HookEvent {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub result: Option<HookResultRef>,
}

impl HookEvent {
    pub fn is_result_added(&self) -> bool {
        self.kind == RESULT_ADDED
    }
}

/// Reference to the result a hook is about; the full record is fetched separately
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HookResultRef {
    pub id: u64,
    pub user_id: u64,
}
