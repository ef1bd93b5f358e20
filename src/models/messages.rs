
use serde::{Deserialize, Serialize};
use crate::models::ClientTab;

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct JoinMessage {
    pub user_id: String,
}

/// Partial update: absent fields leave the tab untouched.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TabUpdateMessage {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TabDeleteMessage {
    pub tab_id: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ContentUpdateMessage {
    pub tab_id: String,
    pub content: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TabsReorderMessage {
    pub tabs: Vec<ClientTab>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PongMessage {
    pub date: String,
}

/// Every frame a client may send. The five tab kinds are relayed to the
/// sender's group; `join` and `ping` are handled on the connection itself.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(tag = "type")]
pub enum ClientMessage {
    #[serde(rename = "join")]
    Join(JoinMessage),
    #[serde(rename = "ping")]
    Ping,
    #[serde(rename = "tab:create")]
    TabCreate(ClientTab),
    #[serde(rename = "tab:update")]
    TabUpdate(TabUpdateMessage),
    #[serde(rename = "tab:delete")]
    TabDelete(TabDeleteMessage),
    #[serde(rename = "content:update")]
    ContentUpdate(ContentUpdateMessage),
    #[serde(rename = "tabs:reorder")]
    TabsReorder(TabsReorderMessage),
}

impl ClientMessage {
    /// Whether this frame is one of the five relayed tab events.
    pub fn is_tab_event(&self) -> bool {
        !matches!(self, ClientMessage::Join(_) | ClientMessage::Ping)
    }
}

/// Frames the server originates itself. Relayed tab events are forwarded
/// as the sender's original text and never pass through this type.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(tag = "type")]
pub enum SendMessage {
    #[serde(rename = "pong")]
    Pong(PongMessage),
}
