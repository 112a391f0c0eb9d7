// ── Resource list controller ──
//
// Generic fetch / filter / paginate / create-update-delete / notify over
// one entity kind. All observable state lives in `watch` channels so a
// view can subscribe; three independent state machines cover the
// collection, the edit form and the delete confirmation.

use std::future::Future;
use std::sync::Arc;

use ticketdesk_api::TicketClient;
use ticketdesk_api::models::RecordId;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::entities::Entity;
use crate::error::CoreError;
use crate::notification::{Notification, Notifier};
use crate::session::Session;
use crate::view::{self, ListView, ViewState};

// ── State machines ───────────────────────────────────────────────────

/// Collection lifecycle: `Idle → Loading → {Loaded, LoadError}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum CollectionPhase {
    Idle,
    Loading,
    Loaded,
    /// The last fetch failed. Whatever was loaded before is still shown.
    LoadError,
}

/// How the open form was started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditMode {
    Create,
    Update(RecordId),
}

/// Edit form lifecycle: `Closed → Editing → Submitting → {Closed, Editing}`.
#[derive(Debug, Clone, PartialEq)]
pub enum FormState<F> {
    Closed,
    Editing {
        mode: EditMode,
        values: F,
        /// Message from the last failed submit.
        error: Option<String>,
    },
    Submitting {
        mode: EditMode,
        values: F,
    },
}

impl<F> FormState<F> {
    pub fn is_open(&self) -> bool {
        !matches!(self, Self::Closed)
    }

    pub fn mode(&self) -> Option<EditMode> {
        match self {
            Self::Closed => None,
            Self::Editing { mode, .. } | Self::Submitting { mode, .. } => Some(*mode),
        }
    }
}

/// Delete confirmation: `Closed → Confirming → Closed`. Only the key is
/// held, never the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteState {
    Closed,
    Confirming(RecordId),
}

// ── ListController ───────────────────────────────────────────────────

/// List controller for entity kind `E`. Cheaply cloneable.
pub struct ListController<E: Entity> {
    inner: Arc<ControllerInner<E>>,
}

impl<E: Entity> Clone for ListController<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct ControllerInner<E: Entity> {
    client: TicketClient,
    session: Session,
    records: watch::Sender<Arc<Vec<Arc<E>>>>,
    phase: watch::Sender<CollectionPhase>,
    view: watch::Sender<ViewState>,
    form: watch::Sender<FormState<E::Form>>,
    deletion: watch::Sender<DeleteState>,
    notifier: Notifier,
    unmounted: CancellationToken,
}

impl<E: Entity> ListController<E> {
    /// Create an idle controller. Nothing is fetched until [`load`](Self::load).
    pub fn new(client: TicketClient, session: Session, page_size: usize) -> Self {
        let (records, _) = watch::channel(Arc::new(Vec::new()));
        let (phase, _) = watch::channel(CollectionPhase::Idle);
        let (view, _) = watch::channel(ViewState::new(page_size));
        let (form, _) = watch::channel(FormState::Closed);
        let (deletion, _) = watch::channel(DeleteState::Closed);

        Self {
            inner: Arc::new(ControllerInner {
                client,
                session,
                records,
                phase,
                view,
                form,
                deletion,
                notifier: Notifier::new(),
                unmounted: CancellationToken::new(),
            }),
        }
    }

    // ── Collection ───────────────────────────────────────────────────

    /// Fetch the whole collection.
    ///
    /// On failure the previous records stay visible, the phase becomes
    /// `LoadError` and one error notification is posted.
    pub async fn load(&self) -> Result<(), CoreError> {
        match self.fetch().await {
            Some(Ok(())) | None => Ok(()),
            Some(Err(err)) => {
                let message = format!("Could not load {}.", E::PLURAL);
                self.inner.notifier.error(message);
                Err(err)
            }
        }
    }

    /// Shared by `load` and the post-write refresh. `None` when the
    /// controller was unmounted mid-flight.
    async fn fetch(&self) -> Option<Result<(), CoreError>> {
        if self.is_unmounted() {
            return None;
        }
        self.inner.phase.send_replace(CollectionPhase::Loading);
        let scope = self.inner.session.registration_scope();
        debug!(entity = E::NAME, ?scope, "loading collection");

        let result = self.guarded(self.inner.client.list::<E>(scope)).await?;
        match result {
            Ok(items) => {
                let count = items.len();
                self.inner
                    .records
                    .send_replace(Arc::new(items.into_iter().map(Arc::new).collect()));
                self.clamp_page();
                self.inner.phase.send_replace(CollectionPhase::Loaded);
                debug!(entity = E::NAME, count, "collection loaded");
                Some(Ok(()))
            }
            Err(e) => {
                warn!(entity = E::NAME, error = %e, "collection load failed");
                self.inner.phase.send_replace(CollectionPhase::LoadError);
                Some(Err(CoreError::Fetch {
                    entity: E::PLURAL,
                    reason: e.to_string(),
                }))
            }
        }
    }

    // ── Query and paging ─────────────────────────────────────────────

    /// Replace the search text. The page is pulled back into range if the
    /// narrower result no longer reaches it.
    pub fn set_query(&self, query: impl Into<String>) {
        let query = query.into();
        let records = self.records();
        self.inner.view.send_modify(|state| {
            let matching = view::filter(&records, &query).len();
            state.page = state.page.min(view::last_page(matching, state.page_size));
            state.query = query;
        });
    }

    pub fn set_page(&self, page: usize) -> Result<(), CoreError> {
        let last = self.last_page();
        if page > last {
            return Err(CoreError::InvalidPage { page, last });
        }
        self.inner.view.send_modify(|state| state.page = page);
        Ok(())
    }

    /// Change the page size. Always goes back to the first page.
    pub fn set_page_size(&self, page_size: usize) -> Result<(), CoreError> {
        if page_size == 0 {
            return Err(CoreError::InvalidPageSize);
        }
        self.inner.view.send_modify(|state| {
            state.page_size = page_size;
            state.page = 0;
        });
        Ok(())
    }

    fn last_page(&self) -> usize {
        let records = self.records();
        let state = self.inner.view.borrow();
        view::last_page(view::filter(&records, &state.query).len(), state.page_size)
    }

    fn clamp_page(&self) {
        let last = self.last_page();
        self.inner.view.send_if_modified(|state| {
            if state.page > last {
                state.page = last;
                true
            } else {
                false
            }
        });
    }

    // ── Edit form ────────────────────────────────────────────────────

    /// Open the form with an empty template.
    pub fn begin_create(&self) {
        self.inner.form.send_replace(FormState::Editing {
            mode: EditMode::Create,
            values: E::Form::default(),
            error: None,
        });
    }

    /// Open the form prefilled from `record`.
    pub fn begin_edit(&self, record: &E) -> Result<(), CoreError> {
        let id = record.key();
        if E::update_path(id).is_none() {
            return Err(CoreError::Unsupported {
                operation: format!("editing a {}", E::NAME),
            });
        }
        self.inner.form.send_replace(FormState::Editing {
            mode: EditMode::Update(id),
            values: record.to_form(),
            error: None,
        });
        Ok(())
    }

    /// Replace the values of the open form without submitting.
    pub fn update_form(&self, values: E::Form) {
        self.inner.form.send_if_modified(|state| match state {
            FormState::Editing { values: current, .. } => {
                *current = values;
                true
            }
            _ => false,
        });
    }

    pub fn cancel_edit(&self) {
        self.inner.form.send_replace(FormState::Closed);
    }

    /// Validate and send the open form.
    ///
    /// Local validation failures never reach the network. A successful
    /// write closes the form, reloads the collection and posts one success
    /// notification; a rejected one keeps the form open with the error.
    pub async fn submit(&self, values: E::Form) -> Result<(), CoreError> {
        let Some(mode) = self.inner.form.borrow().mode() else {
            return Err(CoreError::Internal("no form is open".into()));
        };

        if let Err(err) = E::validate_for(&values, mode) {
            self.reopen(mode, values, err.to_string());
            return Err(err);
        }

        self.inner.form.send_replace(FormState::Submitting {
            mode,
            values: values.clone(),
        });

        let Some(result) = self.guarded(self.write(mode, &values)).await else {
            return Ok(());
        };

        match result {
            Ok(()) => {
                self.inner.form.send_replace(FormState::Closed);
                if let Some(Err(e)) = self.fetch().await {
                    debug!(error = %e, "refresh after write failed");
                }
                if self.is_unmounted() {
                    return Ok(());
                }
                let verb = match mode {
                    EditMode::Create => "added",
                    EditMode::Update(_) => "updated",
                };
                info!(entity = E::NAME, ?mode, "record saved");
                self.inner
                    .notifier
                    .success(format!("{} {verb} successfully.", E::LABEL));
                Ok(())
            }
            Err(err) => {
                self.reopen(mode, values, err.to_string());
                Err(err)
            }
        }
    }

    async fn write(&self, mode: EditMode, values: &E::Form) -> Result<(), CoreError> {
        let client = &self.inner.client;
        let input = E::to_input(values);
        let attachment = E::attachment(values);
        let fallback = || format!("Could not save {}.", E::NAME);

        let reply = match (mode, attachment) {
            (EditMode::Create, None) => client.create::<E>(&input).await,
            (EditMode::Create, Some((part, file))) => {
                client.create_with_attachment::<E>(part, &input, file).await
            }
            (EditMode::Update(id), None) => client.update::<E>(id, &input).await,
            (EditMode::Update(id), Some((part, file))) => {
                client
                    .update_with_attachment::<E>(id, part, &input, Some(file))
                    .await
            }
        };

        match reply {
            Ok(body) => match E::rejection(&body) {
                Some(message) => Err(CoreError::Write {
                    message,
                    status: None,
                }),
                None => Ok(()),
            },
            Err(e) => {
                warn!(entity = E::NAME, error = %e, "write rejected");
                Err(CoreError::write(&e, fallback))
            }
        }
    }

    fn reopen(&self, mode: EditMode, values: E::Form, message: String) {
        self.inner.form.send_replace(FormState::Editing {
            mode,
            values,
            error: Some(message.clone()),
        });
        self.inner.notifier.error(message);
    }

    // ── Two-step delete ──────────────────────────────────────────────

    /// Ask for confirmation before deleting `record`.
    pub fn request_delete(&self, record: &E) -> Result<(), CoreError> {
        let id = record.key();
        if E::delete_path(id).is_none() {
            return Err(CoreError::Unsupported {
                operation: format!("deleting a {}", E::NAME),
            });
        }
        self.inner.deletion.send_replace(DeleteState::Confirming(id));
        Ok(())
    }

    /// Delete the record awaiting confirmation.
    ///
    /// On success exactly that key is dropped from the local collection;
    /// nothing is refetched. On failure the collection is left alone.
    pub async fn confirm_delete(&self) -> Result<(), CoreError> {
        let DeleteState::Confirming(id) = self.inner.deletion.send_replace(DeleteState::Closed)
        else {
            return Err(CoreError::Internal("no delete is pending".into()));
        };

        let Some(result) = self.guarded(self.inner.client.delete::<E>(id)).await else {
            return Ok(());
        };

        match result {
            Ok(()) => {
                self.inner.records.send_modify(|records| {
                    let kept: Vec<Arc<E>> =
                        records.iter().filter(|r| r.key() != id).cloned().collect();
                    *records = Arc::new(kept);
                });
                self.clamp_page();
                info!(entity = E::NAME, id, "record deleted");
                self.inner
                    .notifier
                    .success(format!("{} deleted successfully.", E::LABEL));
                Ok(())
            }
            Err(e) => {
                warn!(entity = E::NAME, id, error = %e, "delete rejected");
                let err = CoreError::write(&e, || format!("Could not delete {}.", E::NAME));
                self.inner.notifier.error(err.to_string());
                Err(err)
            }
        }
    }

    /// Drop the pending delete. No request is made.
    pub fn cancel_delete(&self) {
        self.inner.deletion.send_if_modified(|state| {
            let open = *state != DeleteState::Closed;
            *state = DeleteState::Closed;
            open
        });
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Detach the view. Requests still in flight finish without touching
    /// state or posting notifications.
    pub fn unmount(&self) {
        self.inner.unmounted.cancel();
    }

    pub fn is_unmounted(&self) -> bool {
        self.inner.unmounted.is_cancelled()
    }

    async fn guarded<T>(&self, fut: impl Future<Output = T>) -> Option<T> {
        tokio::select! {
            biased;
            () = self.inner.unmounted.cancelled() => None,
            out = fut => (!self.is_unmounted()).then_some(out),
        }
    }

    // ── Reads ────────────────────────────────────────────────────────

    pub fn records(&self) -> Arc<Vec<Arc<E>>> {
        Arc::clone(&self.inner.records.borrow())
    }

    /// Look up a loaded record by key.
    pub fn get(&self, id: RecordId) -> Option<Arc<E>> {
        self.inner
            .records
            .borrow()
            .iter()
            .find(|r| r.key() == id)
            .cloned()
    }

    /// The current filtered, paged projection.
    pub fn view(&self) -> ListView<E> {
        let records = self.records();
        let state = self.inner.view.borrow().clone();
        ListView::build(&records, &state)
    }

    pub fn view_state(&self) -> ViewState {
        self.inner.view.borrow().clone()
    }

    pub fn phase(&self) -> CollectionPhase {
        *self.inner.phase.borrow()
    }

    pub fn form(&self) -> FormState<E::Form> {
        self.inner.form.borrow().clone()
    }

    pub fn deletion(&self) -> DeleteState {
        *self.inner.deletion.borrow()
    }

    pub fn notification(&self) -> Option<Notification> {
        self.inner.notifier.current()
    }

    pub fn dismiss_notification(&self) {
        self.inner.notifier.dismiss();
    }

    pub fn session(&self) -> &Session {
        &self.inner.session
    }

    // ── Subscriptions ────────────────────────────────────────────────

    pub fn subscribe_records(&self) -> watch::Receiver<Arc<Vec<Arc<E>>>> {
        self.inner.records.subscribe()
    }

    pub fn subscribe_phase(&self) -> watch::Receiver<CollectionPhase> {
        self.inner.phase.subscribe()
    }

    pub fn subscribe_view(&self) -> watch::Receiver<ViewState> {
        self.inner.view.subscribe()
    }

    pub fn subscribe_form(&self) -> watch::Receiver<FormState<E::Form>> {
        self.inner.form.subscribe()
    }

    pub fn subscribe_notifications(&self) -> watch::Receiver<Option<Notification>> {
        self.inner.notifier.subscribe()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use ticketdesk_api::models::{Category, CategoryInput, Reminder};

    fn controller<E: Entity>() -> ListController<E> {
        // Never contacted by these tests.
        let client = TicketClient::new(
            "http://127.0.0.1:1".parse().unwrap(),
            &ticketdesk_api::TransportConfig::default(),
        )
        .unwrap();
        ListController::new(client, Session::in_memory(), 5)
    }

    fn seed(ctrl: &ListController<Category>, n: i64) {
        let items = (1..=n)
            .map(|id| {
                Arc::new(Category {
                    id,
                    name: format!("Category {id}"),
                    description: None,
                })
            })
            .collect();
        ctrl.inner.records.send_replace(Arc::new(items));
    }

    #[test]
    fn page_bounds() {
        let ctrl = controller::<Category>();
        seed(&ctrl, 12);
        ctrl.set_page(2).unwrap();
        assert_eq!(ctrl.view().rows.len(), 2);
        assert!(matches!(
            ctrl.set_page(3),
            Err(CoreError::InvalidPage { page: 3, last: 2 })
        ));
        assert_eq!(ctrl.view_state().page, 2);
    }

    #[test]
    fn page_size_resets_page() {
        let ctrl = controller::<Category>();
        seed(&ctrl, 12);
        ctrl.set_page(1).unwrap();
        ctrl.set_page_size(10).unwrap();
        assert_eq!(ctrl.view_state().page, 0);
        assert_eq!(ctrl.view().page_count, 2);
        assert!(matches!(ctrl.set_page_size(0), Err(CoreError::InvalidPageSize)));
    }

    #[test]
    fn query_clamps_page() {
        let ctrl = controller::<Category>();
        seed(&ctrl, 12);
        ctrl.set_page(2).unwrap();
        ctrl.set_query("category 1");
        // "Category 1", "Category 10", "Category 11", "Category 12"
        let view = ctrl.view();
        assert_eq!(view.matching, 4);
        assert_eq!(view.page, 0);
        assert_eq!(ctrl.view_state().page, 0);
    }

    #[test]
    fn cancel_delete_leaves_everything_alone() {
        let ctrl = controller::<Category>();
        seed(&ctrl, 7);
        ctrl.set_query("category");
        ctrl.set_page(1).unwrap();
        let before = (ctrl.records(), ctrl.view_state());

        let target = ctrl.get(7).unwrap();
        ctrl.request_delete(&target).unwrap();
        assert_eq!(ctrl.deletion(), DeleteState::Confirming(7));
        ctrl.cancel_delete();
        ctrl.cancel_delete();

        assert_eq!(ctrl.deletion(), DeleteState::Closed);
        assert!(Arc::ptr_eq(&before.0, &ctrl.records()));
        assert_eq!(before.1, ctrl.view_state());
        assert_eq!(ctrl.notification(), None);
    }

    #[test]
    fn edit_form_lifecycle() {
        let ctrl = controller::<Category>();
        seed(&ctrl, 2);
        ctrl.begin_create();
        assert_eq!(ctrl.form().mode(), Some(EditMode::Create));

        let record = ctrl.get(2).unwrap();
        ctrl.begin_edit(&record).unwrap();
        let FormState::Editing { mode, values, .. } = ctrl.form() else {
            panic!("form should be open");
        };
        assert_eq!(mode, EditMode::Update(2));
        assert_eq!(values.name, "Category 2");

        ctrl.update_form(CategoryInput {
            name: "Renamed".into(),
            description: String::new(),
        });
        let FormState::Editing { values, .. } = ctrl.form() else {
            panic!("form should be open");
        };
        assert_eq!(values.name, "Renamed");

        ctrl.cancel_edit();
        assert!(!ctrl.form().is_open());
    }

    #[test]
    fn reminders_cannot_be_edited_or_deleted() {
        let ctrl = controller::<Reminder>();
        let reminder = Reminder {
            id: 1,
            customer_name: None,
            event_name: None,
            sent_at: None,
        };
        assert!(matches!(
            ctrl.begin_edit(&reminder),
            Err(CoreError::Unsupported { .. })
        ));
        assert!(matches!(
            ctrl.request_delete(&reminder),
            Err(CoreError::Unsupported { .. })
        ));
        assert_eq!(ctrl.deletion(), DeleteState::Closed);
    }

    #[tokio::test]
    async fn submit_without_open_form_is_rejected() {
        let ctrl = controller::<Category>();
        let err = ctrl.submit(CategoryInput::default()).await.unwrap_err();
        assert!(matches!(err, CoreError::Internal(_)));
    }
}
