use tracing::debug;

use crate::models::{ClientMessage, ClientTab};

/// Client-side cache of a user's tabs.
///
/// Populated once from the persistence API and then kept consistent by
/// applying the events relayed from the user's other connections. The
/// displayed sequence is always ascending by `order`; a reorder adopts the
/// incoming sequence and reassigns contiguous order values.
#[derive(Debug, Default, Clone)]
pub struct BoardStore {
    tabs: Vec<ClientTab>,
    active_tab_id: Option<String>,
}

impl BoardStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tabs(&self) -> &[ClientTab] {
        &self.tabs
    }

    /// Tabs in display order.
    pub fn sorted_tabs(&self) -> Vec<ClientTab> {
        let mut sorted = self.tabs.clone();
        sorted.sort_by_key(|tab| tab.order);
        sorted
    }

    pub fn active_tab_id(&self) -> Option<&str> {
        self.active_tab_id.as_deref()
    }

    pub fn active_tab(&self) -> Option<&ClientTab> {
        let id = self.active_tab_id.as_deref()?;
        self.tabs.iter().find(|tab| tab.id == id)
    }

    /// Replace the whole cache, e.g. from the initial bulk load. Keeps the
    /// active tab when it survives the reload, otherwise falls back to the
    /// first loaded tab.
    pub fn set_tabs(&mut self, new_tabs: Vec<ClientTab>) {
        let active_gone = self
            .active_tab_id
            .as_deref()
            .map(|id| !new_tabs.iter().any(|tab| tab.id == id))
            .unwrap_or(true);
        if active_gone && !new_tabs.is_empty() {
            self.active_tab_id = Some(new_tabs[0].id.clone());
        }
        self.tabs = new_tabs;
    }

    /// Append a tab and make it the active one.
    pub fn add_tab(&mut self, tab: ClientTab) {
        self.active_tab_id = Some(tab.id.clone());
        self.tabs.push(tab);
    }

    /// Merge a partial update into the tab. Absent fields stay untouched.
    pub fn update_tab(&mut self, id: &str, name: Option<String>, content: Option<String>) {
        if let Some(tab) = self.tabs.iter_mut().find(|tab| tab.id == id) {
            if let Some(name) = name {
                tab.name = name;
            }
            if let Some(content) = content {
                tab.content = content;
            }
        }
    }

    /// Drop a tab; the active tab falls back to the first remaining one.
    pub fn remove_tab(&mut self, id: &str) {
        self.tabs.retain(|tab| tab.id != id);
        if self.active_tab_id.as_deref() == Some(id) {
            self.active_tab_id = self.tabs.first().map(|tab| tab.id.clone());
        }
    }

    pub fn set_active_tab(&mut self, id: impl Into<String>) {
        self.active_tab_id = Some(id.into());
    }

    /// Adopt a new sequence wholesale and reassign contiguous order values,
    /// regardless of what the incoming tabs carried.
    pub fn reorder_tabs(&mut self, new_order: Vec<ClientTab>) {
        self.tabs = new_order
            .into_iter()
            .enumerate()
            .map(|(index, mut tab)| {
                tab.order = index as i64;
                tab
            })
            .collect();
    }

    /// Apply one relayed event to the local cache. Non-tab frames are
    /// ignored; they are connection-level concerns, not board state.
    pub fn apply(&mut self, msg: ClientMessage) {
        match msg {
            ClientMessage::TabCreate(tab) => self.add_tab(tab),
            ClientMessage::TabUpdate(update) => {
                self.update_tab(&update.id, update.name, update.content)
            }
            ClientMessage::TabDelete(delete) => self.remove_tab(&delete.tab_id),
            ClientMessage::ContentUpdate(update) => {
                self.update_tab(&update.tab_id, None, Some(update.content))
            }
            ClientMessage::TabsReorder(reorder) => self.reorder_tabs(reorder.tabs),
            ClientMessage::Join(_) | ClientMessage::Ping => {
                debug!("Ignoring non-tab frame in board store");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tab(id: &str, order: i64) -> ClientTab {
        ClientTab {
            id: id.to_string(),
            name: id.to_uppercase(),
            content: String::new(),
            order,
        }
    }

    #[test]
    fn set_tabs_activates_the_first_tab() {
        let mut store = BoardStore::new();
        store.set_tabs(vec![tab("a", 0), tab("b", 1)]);
        assert_eq!(store.active_tab_id(), Some("a"));
    }

    #[test]
    fn set_tabs_keeps_a_surviving_active_tab() {
        let mut store = BoardStore::new();
        store.set_tabs(vec![tab("a", 0), tab("b", 1)]);
        store.set_active_tab("b");
        store.set_tabs(vec![tab("b", 0), tab("c", 1)]);
        assert_eq!(store.active_tab_id(), Some("b"));
    }

    #[test]
    fn add_tab_appends_and_activates() {
        let mut store = BoardStore::new();
        store.set_tabs(vec![tab("a", 0)]);
        store.add_tab(tab("b", 1));
        assert_eq!(store.tabs().len(), 2);
        assert_eq!(store.active_tab_id(), Some("b"));
    }

    #[test]
    fn update_tab_merges_partial_fields() {
        let mut store = BoardStore::new();
        store.set_tabs(vec![ClientTab {
            id: "a".to_string(),
            name: "Notes".to_string(),
            content: "old".to_string(),
            order: 0,
        }]);

        store.update_tab("a", None, Some("new".to_string()));

        let tab = store.active_tab().unwrap();
        assert_eq!(tab.name, "Notes");
        assert_eq!(tab.content, "new");
    }

    #[test]
    fn remove_tab_falls_back_to_first_remaining() {
        let mut store = BoardStore::new();
        store.set_tabs(vec![tab("a", 0), tab("b", 1)]);
        store.set_active_tab("b");
        store.remove_tab("b");
        assert_eq!(store.active_tab_id(), Some("a"));

        store.remove_tab("a");
        assert_eq!(store.active_tab_id(), None);
    }

    #[test]
    fn reorder_reassigns_contiguous_order_values() {
        let mut store = BoardStore::new();
        store.set_tabs(vec![tab("a", 0), tab("b", 1), tab("c", 2)]);

        // Incoming sequence wins no matter what order values it carries.
        store.reorder_tabs(vec![tab("b", 7), tab("a", 3), tab("c", 9)]);

        let orders: Vec<(String, i64)> = store
            .tabs()
            .iter()
            .map(|t| (t.id.clone(), t.order))
            .collect();
        assert_eq!(
            orders,
            vec![
                ("b".to_string(), 0),
                ("a".to_string(), 1),
                ("c".to_string(), 2)
            ]
        );
    }

    #[test]
    fn sorted_tabs_follows_order_values() {
        let mut store = BoardStore::new();
        store.set_tabs(vec![tab("a", 2), tab("b", 0), tab("c", 1)]);
        let sorted = store.sorted_tabs();
        let ids: Vec<&str> = sorted.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c", "a"]);
    }

    #[test]
    fn apply_maps_each_event_kind() {
        let mut store = BoardStore::new();
        store.apply(ClientMessage::TabCreate(tab("a", 0)));
        store.apply(ClientMessage::TabCreate(tab("b", 1)));

        store.apply(
            serde_json::from_str(r#"{"type":"content:update","tabId":"a","content":"hello"}"#)
                .unwrap(),
        );
        assert_eq!(store.tabs()[0].content, "hello");

        store.apply(serde_json::from_str(r#"{"type":"tab:delete","tabId":"b"}"#).unwrap());
        assert_eq!(store.tabs().len(), 1);

        // Connection-level frames leave the board alone.
        store.apply(serde_json::from_str(r#"{"type":"ping"}"#).unwrap());
        assert_eq!(store.tabs().len(), 1);
    }
}
