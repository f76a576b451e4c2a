//! Notification center: cached notification list, unread counter and the
//! per-notification actions.
//!
//! The cache only changes after the backend confirms a change. The one
//! exception is `mark_all_as_read`, which marks everything locally without
//! re-fetching; such a cache is flagged and replaced by server truth on the
//! next `load` or `reconcile`.

use std::cell::RefCell;
use std::rc::Rc;

use common::model::notification::{NotificationAction, NotificationActionType, NotificationItem};
use log::{debug, info, warn};

use crate::api::{ApiGateway, ExcelApi, NotificationApi};
use crate::error::ClientResult;
use crate::ports::{FileDownloader, UserPrompt};
use crate::session::SessionStore;

/// What `execute_action` ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    Downloaded,
    Deleted,
    /// The user declined the confirmation; nothing was sent.
    Cancelled,
    /// Unknown action kind; logged and skipped.
    Ignored,
}

#[derive(Default)]
struct State {
    items: Vec<NotificationItem>,
    unread: usize,
    loading: bool,
    needs_reconcile: bool,
}

impl State {
    fn recount(&mut self) {
        self.unread = self.items.iter().filter(|n| !n.is_read).count();
    }
}

#[derive(Clone)]
pub struct NotificationCenter {
    api: NotificationApi,
    excel: ExcelApi,
    session: SessionStore,
    prompt: Rc<dyn UserPrompt>,
    downloader: Rc<dyn FileDownloader>,
    state: Rc<RefCell<State>>,
}

impl NotificationCenter {
    pub fn new(
        gateway: &ApiGateway,
        prompt: Rc<dyn UserPrompt>,
        downloader: Rc<dyn FileDownloader>,
    ) -> Self {
        Self {
            api: gateway.notifications.clone(),
            excel: gateway.excel.clone(),
            session: gateway.session().clone(),
            prompt,
            downloader,
            state: Rc::new(RefCell::new(State::default())),
        }
    }

    pub fn items(&self) -> Vec<NotificationItem> {
        self.state.borrow().items.clone()
    }

    pub fn unread_count(&self) -> usize {
        self.state.borrow().unread
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().loading
    }

    pub fn needs_reconcile(&self) -> bool {
        self.state.borrow().needs_reconcile
    }

    /// Empties the cache, e.g. on logout.
    pub fn clear(&self) {
        let mut state = self.state.borrow_mut();
        state.items.clear();
        state.needs_reconcile = false;
        state.recount();
    }

    /// Fetches every notification of `user_id` (read ones included) and
    /// replaces the cache. On failure the previous cache is kept.
    pub async fn load(&self, user_id: i64) -> ClientResult<()> {
        self.state.borrow_mut().loading = true;
        let result = self.api.list(user_id, true).await;

        let mut state = self.state.borrow_mut();
        state.loading = false;
        let outcome = match result {
            Ok(items) => {
                debug!("loaded {} notifications for user {}", items.len(), user_id);
                state.items = items;
                state.needs_reconcile = false;
                Ok(())
            }
            Err(e) => {
                warn!("could not load notifications: {}", e);
                Err(e)
            }
        };
        state.recount();
        outcome
    }

    /// Loads the notifications of the signed-in user, or empties the cache
    /// when nobody is signed in.
    pub async fn load_current_user(&self) -> ClientResult<()> {
        match self.session.get_user_id() {
            Some(user_id) => self.load(user_id).await,
            None => {
                self.clear();
                Ok(())
            }
        }
    }

    /// Re-fetches only if an optimistic update is pending.
    pub async fn reconcile(&self, user_id: i64) -> ClientResult<()> {
        if self.needs_reconcile() {
            self.load(user_id).await
        } else {
            Ok(())
        }
    }

    fn cached_read_state(&self, id: i64) -> Option<bool> {
        self.state
            .borrow()
            .items
            .iter()
            .find(|n| n.id == id)
            .map(|n| n.is_read)
    }

    /// Marks one notification read. Returns `false` without calling the
    /// backend when the cached item is already read.
    pub async fn mark_as_read(&self, id: i64) -> ClientResult<bool> {
        if self.cached_read_state(id) == Some(true) {
            return Ok(false);
        }

        let updated = self.api.mark_as_read(id).await.map_err(|e| {
            warn!("could not mark notification {} as read: {}", id, e);
            e
        })?;

        let mut state = self.state.borrow_mut();
        if let Some(slot) = state.items.iter_mut().find(|n| n.id == updated.id) {
            *slot = updated;
        }
        state.recount();
        Ok(true)
    }

    pub async fn mark_all_as_read(&self, user_id: i64) -> ClientResult<()> {
        let response = self.api.mark_all_as_read(user_id).await.map_err(|e| {
            warn!("could not mark all notifications as read: {}", e);
            e
        })?;
        debug!("backend marked {} notifications read", response.updated);

        let mut state = self.state.borrow_mut();
        for item in state.items.iter_mut() {
            item.is_read = true;
        }
        state.needs_reconcile = true;
        state.recount();
        Ok(())
    }

    pub async fn execute_action(
        &self,
        action: &NotificationAction,
        item: &NotificationItem,
    ) -> ClientResult<ActionOutcome> {
        let already_read = self.cached_read_state(item.id).unwrap_or(item.is_read);

        match action.action_type {
            NotificationActionType::Download => {
                self.downloader
                    .download(&self.excel.download_url(&action.payload));
                if !already_read {
                    if let Err(e) = self.mark_as_read(item.id).await {
                        debug!("download started but read flag not updated: {}", e);
                    }
                }
                Ok(ActionOutcome::Downloaded)
            }
            NotificationActionType::Delete => {
                let question = format!("¿Seguro que deseas eliminar {}?", action.payload);
                if !self.prompt.confirm(&question) {
                    return Ok(ActionOutcome::Cancelled);
                }

                if let Err(e) = self.excel.delete_file(&action.payload).await {
                    self.prompt.alert("Error al eliminar archivo");
                    return Err(e);
                }
                info!("deleted {} from notification {}", action.payload, item.id);

                if already_read {
                    let user_id = self
                        .session
                        .get_user_id()
                        .unwrap_or(item.user_id);
                    self.load(user_id).await?;
                } else {
                    self.mark_as_read(item.id).await?;
                }
                Ok(ActionOutcome::Deleted)
            }
            NotificationActionType::Unknown => {
                warn!(
                    "ignoring unsupported notification action {:?} on notification {}",
                    action.label, item.id
                );
                Ok(ActionOutcome::Ignored)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::Method;
    use crate::ports::{MockFileDownloader, MockUserPrompt};
    use crate::testing::{fixture, RecordingTransport};
    use common::model::user::User;
    use serde_json::json;

    fn item(id: i64, is_read: bool) -> serde_json::Value {
        json!({
            "id": id, "user_id": 1, "title": "Carga de Excel completada",
            "message": "ok", "is_read": is_read, "created_at": "2024-05-01T10:00:00",
            "actions": [
                {"action_type": "download", "label": "Descargar archivo", "payload": "r.xlsx"},
                {"action_type": "delete", "label": "Eliminar archivo", "payload": "r.xlsx"}
            ]
        })
    }

    fn center_with(
        prompt: MockUserPrompt,
        downloader: MockFileDownloader,
    ) -> (Rc<RecordingTransport>, NotificationCenter) {
        let (transport, client) = fixture();
        client
            .session()
            .save_user(&User {
                id: 1,
                username: "ana".into(),
                email: "ana@example.com".into(),
                created_at: None,
            })
            .unwrap();
        let gateway = ApiGateway::new(client);
        let center = NotificationCenter::new(&gateway, Rc::new(prompt), Rc::new(downloader));
        (transport, center)
    }

    fn center() -> (Rc<RecordingTransport>, NotificationCenter) {
        center_with(MockUserPrompt::new(), MockFileDownloader::new())
    }

    async fn loaded(center: &NotificationCenter, transport: &RecordingTransport, items: serde_json::Value) {
        transport.respond(200, &items.to_string());
        center.load(1).await.unwrap();
    }

    #[tokio::test]
    async fn load_replaces_cache_and_counts_unread() {
        let (transport, center) = center();
        loaded(&center, &transport, json!([item(1, false), item(2, true), item(3, false)])).await;

        assert_eq!(center.items().len(), 3);
        assert_eq!(center.unread_count(), 2);
        assert!(!center.is_loading());

        loaded(&center, &transport, json!([item(4, true)])).await;
        assert_eq!(center.items().len(), 1);
        assert_eq!(center.unread_count(), 0);
    }

    #[tokio::test]
    async fn failed_load_keeps_previous_cache() {
        let (transport, center) = center();
        loaded(&center, &transport, json!([item(1, false)])).await;
        transport.respond(500, r#"{"detail":"Error interno del servidor"}"#);

        assert!(center.load(1).await.is_err());
        assert_eq!(center.items().len(), 1);
        assert_eq!(center.unread_count(), 1);
    }

    #[tokio::test]
    async fn mark_all_as_read_zeroes_the_counter_until_reconciled() {
        let (transport, center) = center();
        loaded(&center, &transport, json!([item(1, false), item(2, false)])).await;
        transport.respond(200, r#"{"updated":2}"#);

        center.mark_all_as_read(1).await.unwrap();

        assert_eq!(center.unread_count(), 0);
        assert!(center.items().iter().all(|n| n.is_read));
        assert!(center.needs_reconcile());

        // Server still has one unread: reconcile adopts it.
        transport.respond(200, &json!([item(1, true), item(2, false)]).to_string());
        center.reconcile(1).await.unwrap();
        assert!(!center.needs_reconcile());
        assert_eq!(center.unread_count(), 1);

        let before = transport.request_count();
        center.reconcile(1).await.unwrap();
        assert_eq!(transport.request_count(), before);
    }

    #[tokio::test]
    async fn failed_mark_all_leaves_cache_alone() {
        let (transport, center) = center();
        loaded(&center, &transport, json!([item(1, false)])).await;
        transport.respond(500, "{}");

        assert!(center.mark_all_as_read(1).await.is_err());
        assert_eq!(center.unread_count(), 1);
        assert!(!center.needs_reconcile());
    }

    #[tokio::test]
    async fn mark_as_read_on_read_item_is_a_no_op() {
        let (transport, center) = center();
        loaded(&center, &transport, json!([item(1, true), item(2, false)])).await;
        let before = transport.request_count();

        assert!(!center.mark_as_read(1).await.unwrap());

        assert_eq!(transport.request_count(), before);
        assert_eq!(center.unread_count(), 1);
    }

    #[tokio::test]
    async fn mark_as_read_replaces_the_cached_item() {
        let (transport, center) = center();
        loaded(&center, &transport, json!([item(1, false), item(2, false)])).await;
        transport.respond(200, &item(2, true).to_string());

        assert!(center.mark_as_read(2).await.unwrap());

        let sent = transport.last_request();
        assert_eq!(sent.method, Method::Put);
        assert_eq!(sent.url, "http://localhost:8000/notifications/2/read");
        assert_eq!(center.unread_count(), 1);
        assert!(center.items().iter().find(|n| n.id == 2).unwrap().is_read);
    }

    #[tokio::test]
    async fn download_action_starts_download_and_marks_read() {
        let mut downloader = MockFileDownloader::new();
        downloader
            .expect_download()
            .withf(|url| url == "http://localhost:8000/uploads/r.xlsx")
            .times(1)
            .return_const(());
        let (transport, center) = center_with(MockUserPrompt::new(), downloader);
        loaded(&center, &transport, json!([item(1, false)])).await;
        transport.respond(200, &item(1, true).to_string());
        let notification = center.items()[0].clone();

        let outcome = center
            .execute_action(&notification.actions[0], &notification)
            .await
            .unwrap();

        assert_eq!(outcome, ActionOutcome::Downloaded);
        assert_eq!(center.unread_count(), 0);
    }

    #[tokio::test]
    async fn download_survives_a_failed_read_update() {
        let mut downloader = MockFileDownloader::new();
        downloader.expect_download().times(1).return_const(());
        let (transport, center) = center_with(MockUserPrompt::new(), downloader);
        loaded(&center, &transport, json!([item(1, false)])).await;
        transport.respond(500, "{}");
        let notification = center.items()[0].clone();

        let outcome = center
            .execute_action(&notification.actions[0], &notification)
            .await
            .unwrap();

        assert_eq!(outcome, ActionOutcome::Downloaded);
        assert_eq!(center.unread_count(), 1);
    }

    #[tokio::test]
    async fn declined_delete_sends_nothing() {
        let mut prompt = MockUserPrompt::new();
        prompt.expect_confirm().times(1).return_const(false);
        let (transport, center) = center_with(prompt, MockFileDownloader::new());
        loaded(&center, &transport, json!([item(1, false)])).await;
        let before = transport.request_count();
        let notification = center.items()[0].clone();

        let outcome = center
            .execute_action(&notification.actions[1], &notification)
            .await
            .unwrap();

        assert_eq!(outcome, ActionOutcome::Cancelled);
        assert_eq!(transport.request_count(), before);
    }

    #[tokio::test]
    async fn confirmed_delete_of_unread_item_marks_it_read() {
        let mut prompt = MockUserPrompt::new();
        prompt
            .expect_confirm()
            .withf(|q| q.contains("r.xlsx"))
            .return_const(true);
        let (transport, center) = center_with(prompt, MockFileDownloader::new());
        loaded(&center, &transport, json!([item(1, false)])).await;
        transport.respond(200, r#"{"message":"ok","deleted_file":"r.xlsx"}"#);
        transport.respond(200, &item(1, true).to_string());
        let notification = center.items()[0].clone();

        let outcome = center
            .execute_action(&notification.actions[1], &notification)
            .await
            .unwrap();

        assert_eq!(outcome, ActionOutcome::Deleted);
        let sent = transport.requests();
        let tail: Vec<_> = sent[sent.len() - 2..].iter().map(|r| (r.method, r.url.clone())).collect();
        assert_eq!(
            tail,
            vec![
                (Method::Delete, "http://localhost:8000/excel/file/r.xlsx".to_string()),
                (Method::Put, "http://localhost:8000/notifications/1/read".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn confirmed_delete_of_read_item_reloads() {
        let mut prompt = MockUserPrompt::new();
        prompt.expect_confirm().return_const(true);
        let (transport, center) = center_with(prompt, MockFileDownloader::new());
        loaded(&center, &transport, json!([item(1, true)])).await;
        transport.respond(200, r#"{"message":"ok"}"#);
        transport.respond(200, "[]");
        let notification = center.items()[0].clone();

        center
            .execute_action(&notification.actions[1], &notification)
            .await
            .unwrap();

        assert_eq!(transport.last_request().method, Method::Get);
        assert!(center.items().is_empty());
    }

    #[tokio::test]
    async fn failed_delete_alerts_the_user() {
        let mut prompt = MockUserPrompt::new();
        prompt.expect_confirm().return_const(true);
        prompt
            .expect_alert()
            .withf(|m| m == "Error al eliminar archivo")
            .times(1)
            .return_const(());
        let (transport, center) = center_with(prompt, MockFileDownloader::new());
        loaded(&center, &transport, json!([item(1, false)])).await;
        transport.respond(404, r#"{"detail":"Archivo no encontrado: r.xlsx"}"#);
        let notification = center.items()[0].clone();

        assert!(center
            .execute_action(&notification.actions[1], &notification)
            .await
            .is_err());
        assert_eq!(center.unread_count(), 1);
    }

    #[tokio::test]
    async fn unknown_action_is_ignored() {
        let (transport, center) = center();
        loaded(&center, &transport, json!([item(1, false)])).await;
        let before = transport.request_count();
        let notification = center.items()[0].clone();
        let action = NotificationAction {
            id: None,
            action_type: NotificationActionType::Unknown,
            label: "Archivar".into(),
            payload: "r.xlsx".into(),
        };

        let outcome = center.execute_action(&action, &notification).await.unwrap();

        assert_eq!(outcome, ActionOutcome::Ignored);
        assert_eq!(transport.request_count(), before);
    }

    #[tokio::test]
    async fn anonymous_load_empties_the_cache() {
        let (transport, center) = center();
        loaded(&center, &transport, json!([item(1, false)])).await;
        center.session.logout();

        center.load_current_user().await.unwrap();

        assert!(center.items().is_empty());
        assert_eq!(center.unread_count(), 0);
    }
}
