use serde::{Deserialize, Serialize};

/// A user's tab as the client mirrors it: the persisted fields the
/// broadcast layer and the local store care about.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ClientTab {
    pub id: String,
    pub name: String,
    pub content: String,
    pub order: i64,
}
