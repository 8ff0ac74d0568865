use models::message::Message;
use models::request::OperationRequest;
use serde_json::json;
use tracing::info;

use crate::collection::CollectionStore;
use crate::errors::ServiceError;

/// Which operation set the dispatcher speaks.
///
/// `Canonical` is the full contract: `get`/`add`/`update`/`delete`, with
/// store-assigned ids on append. `AppendOnly` is the legacy narrow variant:
/// only `get` and `update`, where `update` appends a record without an id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DispatchMode {
    #[default]
    Canonical,
    AppendOnly,
}

/// Structured success outcome of one dispatched operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// Full collection contents, in insertion order.
    Collection(Vec<Message>),
    /// The record just appended, with its assigned id.
    Created(Message),
    /// Append acknowledged without echoing a record (append-only mode).
    Appended,
}

impl Reply {
    /// Render the wire body for this outcome.
    pub fn into_body(self) -> serde_json::Value {
        match self {
            Reply::Collection(messages) => json!({ "status": "ok", "data": messages }),
            Reply::Created(message) => json!({ "status": "ok", "data": message }),
            Reply::Appended => json!({ "status": "updated" }),
        }
    }
}

/// One-shot interpreter for operation requests against a collection store.
///
/// Validation happens before any store call; only appends mutate the backing
/// store. Errors are terminal for the request, there are no internal retries.
#[derive(Clone)]
pub struct Dispatcher {
    store: CollectionStore,
    mode: DispatchMode,
}

impl Dispatcher {
    pub fn new(store: CollectionStore) -> Self {
        Self::with_mode(store, DispatchMode::default())
    }

    pub fn with_mode(store: CollectionStore, mode: DispatchMode) -> Self {
        Self { store, mode }
    }

    pub async fn dispatch(&self, req: OperationRequest) -> Result<Reply, ServiceError> {
        if req.action.trim().is_empty() || req.filename.trim().is_empty() {
            return Err(ServiceError::Validation("missing 'action' or 'filename'".into()));
        }

        match (self.mode, req.action.as_str()) {
            (_, "get") => {
                let messages = self.store.load(&req.filename).await?;
                Ok(Reply::Collection(messages))
            }
            (DispatchMode::Canonical, "add") => self.append(req, true).await,
            (DispatchMode::Canonical, "update") => {
                Err(ServiceError::NotImplemented("update not implemented yet".into()))
            }
            (DispatchMode::Canonical, "delete") => {
                Err(ServiceError::NotImplemented("delete not implemented yet".into()))
            }
            (DispatchMode::AppendOnly, "update") => self.append(req, false).await,
            (DispatchMode::Canonical, _) => Err(ServiceError::Validation(
                "invalid action; use: get, add, update, delete".into(),
            )),
            (DispatchMode::AppendOnly, _) => {
                Err(ServiceError::Validation("invalid action; use: get, update".into()))
            }
        }
    }

    /// Read-modify-write append. Loads the full collection, assigns the next
    /// id when requested (last id + 1, or 1 for an empty collection), and
    /// writes the whole collection back.
    async fn append(&self, req: OperationRequest, assign_id: bool) -> Result<Reply, ServiceError> {
        let (sender, receiver, body, date) = match (req.sender, req.receiver, req.message, req.date)
        {
            (Some(s), Some(r), Some(m), Some(d))
                if !s.is_empty() && !r.is_empty() && !m.is_empty() && !d.is_empty() =>
            {
                (s, r, m, d)
            }
            _ => {
                return Err(ServiceError::Validation(format!(
                    "missing fields for {}: sender, receiver, message, date",
                    req.action
                )))
            }
        };

        let mut messages = self.store.load(&req.filename).await?;
        let id = assign_id.then(|| messages.last().and_then(|m| m.id).unwrap_or(0) + 1);
        let new_msg = Message { id, sender, receiver, body, date };
        messages.push(new_msg.clone());
        self.store.save(&req.filename, &messages).await?;
        info!(collection = %req.filename, id = ?new_msg.id, "message appended");

        Ok(if assign_id { Reply::Created(new_msg) } else { Reply::Appended })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;

    use super::*;
    use crate::storage::{MemoryObjectStore, ObjectStore};

    /// Wraps the in-memory store and counts calls, so tests can assert that
    /// rejected requests never reach the backing store.
    #[derive(Default)]
    struct SpyStore {
        inner: MemoryObjectStore,
        calls: AtomicUsize,
        puts: AtomicUsize,
    }

    #[async_trait]
    impl ObjectStore for SpyStore {
        async fn exists(&self, key: &str) -> Result<bool, ServiceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.exists(key).await
        }
        async fn get(&self, key: &str) -> Result<Vec<u8>, ServiceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.get(key).await
        }
        async fn put(&self, key: &str, body: Vec<u8>) -> Result<(), ServiceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.puts.fetch_add(1, Ordering::SeqCst);
            self.inner.put(key, body).await
        }
    }

    fn dispatcher() -> Dispatcher {
        Dispatcher::new(CollectionStore::new(Arc::new(MemoryObjectStore::new())))
    }

    fn spy_dispatcher(mode: DispatchMode) -> (Dispatcher, Arc<SpyStore>) {
        let spy = Arc::new(SpyStore::default());
        let d = Dispatcher::with_mode(CollectionStore::new(spy.clone()), mode);
        (d, spy)
    }

    fn add_req(filename: &str, sender: &str, body: &str, date: &str) -> OperationRequest {
        OperationRequest {
            action: "add".into(),
            filename: filename.into(),
            sender: Some(sender.into()),
            receiver: Some("B".into()),
            message: Some(body.into()),
            date: Some(date.into()),
            id: None,
        }
    }

    fn get_req(filename: &str) -> OperationRequest {
        OperationRequest { action: "get".into(), filename: filename.into(), ..Default::default() }
    }

    #[tokio::test]
    async fn get_on_never_written_collection_is_empty() -> Result<(), anyhow::Error> {
        let d = dispatcher();
        match d.dispatch(get_req("weird name")).await? {
            Reply::Collection(messages) => assert!(messages.is_empty()),
            other => panic!("expected Collection, got {other:?}"),
        }
        Ok(())
    }

    #[tokio::test]
    async fn serial_adds_assign_dense_increasing_ids() -> Result<(), anyhow::Error> {
        let d = dispatcher();
        for expected in 1..=5i64 {
            match d.dispatch(add_req("inbox", "A", "hi", "2024-01-01")).await? {
                Reply::Created(m) => assert_eq!(m.id, Some(expected)),
                other => panic!("expected Created, got {other:?}"),
            }
        }
        match d.dispatch(get_req("inbox")).await? {
            Reply::Collection(messages) => {
                let ids: Vec<_> = messages.iter().map(|m| m.id).collect();
                assert_eq!(ids, (1..=5).map(Some).collect::<Vec<_>>());
            }
            other => panic!("expected Collection, got {other:?}"),
        }
        Ok(())
    }

    #[tokio::test]
    async fn add_then_add_then_get_returns_records_in_order() -> Result<(), anyhow::Error> {
        let d = dispatcher();

        let first = d.dispatch(add_req("chat", "A", "hi", "2024-01-01")).await?;
        assert_eq!(
            first.into_body(),
            json!({
                "status": "ok",
                "data": {"id": 1, "sender": "A", "receiver": "B", "message": "hi", "date": "2024-01-01"}
            })
        );

        let second = d.dispatch(add_req("chat", "C", "yo", "2024-01-02")).await?;
        match second {
            Reply::Created(m) => assert_eq!(m.id, Some(2)),
            other => panic!("expected Created, got {other:?}"),
        }

        match d.dispatch(get_req("chat")).await? {
            Reply::Collection(messages) => {
                assert_eq!(messages.len(), 2);
                assert_eq!(messages[0].body, "hi");
                assert_eq!(messages[1].body, "yo");
            }
            other => panic!("expected Collection, got {other:?}"),
        }
        Ok(())
    }

    #[tokio::test]
    async fn add_with_empty_required_field_never_touches_store() {
        let (d, spy) = spy_dispatcher(DispatchMode::Canonical);
        for req in [
            add_req("inbox", "", "hi", "2024-01-01"),
            add_req("inbox", "A", "", "2024-01-01"),
            add_req("inbox", "A", "hi", ""),
            OperationRequest { action: "add".into(), filename: "inbox".into(), ..Default::default() },
        ] {
            match d.dispatch(req).await {
                Err(ServiceError::Validation(_)) => {}
                other => panic!("expected Validation, got {other:?}"),
            }
        }
        assert_eq!(spy.calls.load(Ordering::SeqCst), 0);
        assert_eq!(spy.puts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn update_and_delete_are_not_implemented_and_read_only() {
        let (d, spy) = spy_dispatcher(DispatchMode::Canonical);
        for action in ["update", "delete"] {
            let req = OperationRequest {
                action: action.into(),
                filename: "inbox".into(),
                id: Some(1),
                ..Default::default()
            };
            match d.dispatch(req).await {
                Err(ServiceError::NotImplemented(_)) => {}
                other => panic!("expected NotImplemented, got {other:?}"),
            }
        }
        assert_eq!(spy.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn invalid_action_is_validation_error_without_store_call() {
        let (d, spy) = spy_dispatcher(DispatchMode::Canonical);
        let req = OperationRequest {
            action: "frobnicate".into(),
            filename: "inbox".into(),
            ..Default::default()
        };
        match d.dispatch(req).await {
            Err(ServiceError::Validation(_)) => {}
            other => panic!("expected Validation, got {other:?}"),
        }
        assert_eq!(spy.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn missing_action_or_filename_is_validation_error() {
        let d = dispatcher();
        for req in [
            OperationRequest { filename: "inbox".into(), ..Default::default() },
            OperationRequest { action: "get".into(), ..Default::default() },
            OperationRequest { action: "get".into(), filename: "   ".into(), ..Default::default() },
        ] {
            match d.dispatch(req).await {
                Err(ServiceError::Validation(_)) => {}
                other => panic!("expected Validation, got {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn append_only_mode_appends_without_ids() -> Result<(), anyhow::Error> {
        let (d, _spy) = spy_dispatcher(DispatchMode::AppendOnly);

        let mut req = add_req("guestbook", "A", "hello", "2024-01-01");
        req.action = "update".into();
        let reply = d.dispatch(req).await?;
        assert_eq!(reply, Reply::Appended);
        assert_eq!(reply.into_body(), json!({"status": "updated"}));

        match d.dispatch(get_req("guestbook")).await? {
            Reply::Collection(messages) => {
                assert_eq!(messages.len(), 1);
                assert_eq!(messages[0].id, None);
                assert_eq!(messages[0].body, "hello");
            }
            other => panic!("expected Collection, got {other:?}"),
        }
        Ok(())
    }

    #[tokio::test]
    async fn missing_fields_message_names_the_acting_operation() {
        let canonical = dispatcher();
        let req = OperationRequest {
            action: "add".into(),
            filename: "inbox".into(),
            ..Default::default()
        };
        match canonical.dispatch(req).await {
            Err(ServiceError::Validation(msg)) => {
                assert!(msg.contains("missing fields for add"), "got: {msg}");
            }
            other => panic!("expected Validation, got {other:?}"),
        }

        let (append_only, _spy) = spy_dispatcher(DispatchMode::AppendOnly);
        let req = OperationRequest {
            action: "update".into(),
            filename: "guestbook".into(),
            ..Default::default()
        };
        match append_only.dispatch(req).await {
            Err(ServiceError::Validation(msg)) => {
                assert!(msg.contains("missing fields for update"), "got: {msg}");
            }
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn append_only_mode_rejects_add_and_delete() {
        let (d, spy) = spy_dispatcher(DispatchMode::AppendOnly);
        for action in ["add", "delete"] {
            let mut req = add_req("guestbook", "A", "hello", "2024-01-01");
            req.action = action.into();
            match d.dispatch(req).await {
                Err(ServiceError::Validation(_)) => {}
                other => panic!("expected Validation, got {other:?}"),
            }
        }
        assert_eq!(spy.calls.load(Ordering::SeqCst), 0);
    }
}
