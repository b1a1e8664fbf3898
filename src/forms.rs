//! Form controllers: local field-set state plus the submit contract.
//!
//! Both forms run `idle -> submitting -> idle` around one store call. There
//! is no re-entrancy guard; separate submissions each reach the store.

use std::time::Duration;

use tracing::{debug, warn};

use crate::{
    models::{Document, FieldSet, MovieEdit, MovieEditField, MovieId, NewMovie, NewMovieField},
    notify::Notification,
    store::{MovieStore, StoreError, StoreResult},
};

pub const CREATED_TITLE: &str = "Successfully Added";
pub const UPDATED_TITLE: &str = "Movie Updated Successfully!";

#[derive(Clone, Debug, Default)]
pub struct CreateForm {
    fields: NewMovie,
    submitting: bool,
}

impl CreateForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fields(&self) -> &NewMovie {
        &self.fields
    }

    pub fn submitting(&self) -> bool {
        self.submitting
    }

    pub fn edit(&mut self, field: NewMovieField, value: impl Into<String>) {
        self.fields.set(field, value.into());
    }

    /// Sends the whole field-set as a new document. The assigned id is not
    /// kept and the fields are not cleared.
    pub async fn submit(&mut self, store: &dyn MovieStore, timer: Duration) -> Notification {
        self.submitting = true;

        let result: StoreResult<MovieId> = async {
            let doc = self.fields.to_document()?;
            store.create(doc).await
        }
        .await;

        let notification = match result {
            Ok(id) => {
                debug!(id = %id, "movie created");
                Notification::success(CREATED_TITLE, timer)
            },
            Err(err) => {
                warn!(error = %err, "failed to create movie");
                Notification::error(err.to_string(), timer)
            },
        };

        self.submitting = false;
        notification
    }
}

#[derive(Clone, Debug)]
pub struct SubmitOutcome {
    pub notification: Notification,
    /// The view must be re-fetched from the store.
    pub reload: bool,
}

/// Handle for one in-flight fetch. Only the newest ticket may write state.
#[derive(Clone, Debug)]
pub struct LoadTicket {
    id: MovieId,
    generation: u64,
}

impl LoadTicket {
    pub fn id(&self) -> &MovieId {
        &self.id
    }
}

#[derive(Clone, Debug)]
pub struct EditForm {
    id: MovieId,
    fields: MovieEdit,
    submitting: bool,
    generation: u64,
}

impl EditForm {
    pub fn new(id: MovieId) -> Self {
        Self { id, fields: MovieEdit::default(), submitting: false, generation: 0 }
    }

    pub fn id(&self) -> &MovieId {
        &self.id
    }

    pub fn fields(&self) -> &MovieEdit {
        &self.fields
    }

    pub fn submitting(&self) -> bool {
        self.submitting
    }

    pub fn edit(&mut self, field: MovieEditField, value: impl Into<String>) {
        self.fields.set(field, value.into());
    }

    /// Starts a fetch and supersedes any fetch started earlier.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        LoadTicket { id: self.id.clone(), generation: self.generation }
    }

    /// Applies a fetch result. Returns `false` if the ticket was superseded,
    /// in which case the state is left alone. A missing document leaves the
    /// fields untouched.
    pub fn finish_load(&mut self, ticket: LoadTicket, found: Option<Document>) -> bool {
        if ticket.generation != self.generation {
            debug!(id = %ticket.id, "discarding superseded fetch");
            return false;
        }
        match found {
            Some(doc) => self.fields = MovieEdit::from_document(&doc),
            None => debug!(id = %ticket.id, "movie not found, keeping empty form"),
        }
        true
    }

    /// Fetches the document once. Store failures are not handled here.
    pub async fn load(&mut self, store: &dyn MovieStore) -> Result<(), StoreError> {
        let ticket = self.begin_load();
        let found = store.get(ticket.id()).await?;
        self.finish_load(ticket, found);
        Ok(())
    }

    /// Writes the full current field-set, changed or not.
    pub async fn submit(&mut self, store: &dyn MovieStore, timer: Duration) -> SubmitOutcome {
        self.submitting = true;

        let result: StoreResult<()> = async {
            let doc = self.fields.to_document()?;
            store.update(&self.id, doc).await
        }
        .await;

        let outcome = match result {
            Ok(()) => {
                debug!(id = %self.id, "movie updated");
                SubmitOutcome {
                    notification: Notification::success(UPDATED_TITLE, timer),
                    reload: true,
                }
            },
            Err(err) => {
                warn!(id = %self.id, error = %err, "failed to update movie");
                SubmitOutcome {
                    notification: Notification::error(err.to_string(), timer),
                    reload: false,
                }
            },
        };

        self.submitting = false;
        outcome
    }
}

#[cfg(test)]
mod tests {
    use mockall::predicate::*;
    use sea_orm::DbErr;
    use serde_json::{Value, json};

    use super::*;
    use crate::{notify::Icon, store::MockMovieStore};

    const TIMER: Duration = Duration::from_millis(3000);

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    fn db_failure(message: &str) -> StoreError {
        StoreError::Database(DbErr::Custom(message.to_string()))
    }

    #[tokio::test]
    async fn create_sends_the_exact_field_set_once() {
        let mut store = MockMovieStore::new();
        store
            .expect_create()
            .with(eq(doc(json!({
                "title": "Heat",
                "year": "1995",
                "description": "",
                "image": "https://img/heat.jpg",
                "rated": 0,
                "rating": 0,
            }))))
            .times(1)
            .returning(|_| Ok(MovieId::new("m1")));

        let mut form = CreateForm::new();
        form.edit(NewMovieField::Title, "Heat");
        form.edit(NewMovieField::Year, "1995");
        form.edit(NewMovieField::Image, "https://img/heat.jpg");

        let notification = form.submit(&store, TIMER).await;

        assert_eq!(notification.icon, Icon::Success);
        assert_eq!(notification.title, CREATED_TITLE);
        assert!(!form.submitting());
        assert_eq!(form.fields().title, "Heat");
    }

    #[tokio::test]
    async fn create_failure_reports_the_error_message() {
        let mut store = MockMovieStore::new();
        store.expect_create().times(1).returning(|_| Err(db_failure("quota exceeded")));

        let mut form = CreateForm::new();
        let notification = form.submit(&store, TIMER).await;

        assert_eq!(notification.icon, Icon::Error);
        assert!(notification.title.contains("quota exceeded"));
        assert!(!notification.buttons);
        assert!(!form.submitting());
    }

    #[tokio::test]
    async fn repeated_create_submits_each_reach_the_store() {
        let mut store = MockMovieStore::new();
        store.expect_create().times(2).returning(|_| Ok(MovieId::generate()));

        let mut first = CreateForm::new();
        let mut second = CreateForm::new();

        let (a, b) = futures::join!(first.submit(&store, TIMER), second.submit(&store, TIMER));

        assert_eq!(a.icon, Icon::Success);
        assert_eq!(b.icon, Icon::Success);
    }

    #[tokio::test]
    async fn load_fills_all_four_fields_from_the_stored_record() {
        let mut store = MockMovieStore::new();
        store.expect_get().with(eq(MovieId::new("m1"))).times(1).returning(|_| {
            Ok(Some(doc(json!({
                "name": "Alien",
                "year": "1979",
                "description": "In space",
                "image": "https://img/alien.jpg",
            }))))
        });

        let mut form = EditForm::new(MovieId::new("m1"));
        form.load(&store).await.unwrap();

        assert_eq!(
            form.fields(),
            &MovieEdit {
                name: "Alien".to_string(),
                year: "1979".to_string(),
                description: "In space".to_string(),
                image: "https://img/alien.jpg".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn load_of_missing_record_keeps_empty_fields() {
        let mut store = MockMovieStore::new();
        store.expect_get().times(1).returning(|_| Ok(None));

        let mut form = EditForm::new(MovieId::new("nope"));
        form.load(&store).await.unwrap();

        assert_eq!(form.fields(), &MovieEdit::default());
    }

    #[tokio::test]
    async fn load_failure_propagates() {
        let mut store = MockMovieStore::new();
        store.expect_get().times(1).returning(|_| Err(db_failure("offline")));

        let mut form = EditForm::new(MovieId::new("any"));

        assert!(form.load(&store).await.is_err());
        assert_eq!(form.fields(), &MovieEdit::default());
    }

    #[test]
    fn superseded_fetch_does_not_write_state() {
        let mut form = EditForm::new(MovieId::new("m1"));
        let stale = form.begin_load();
        let current = form.begin_load();

        assert!(!form.finish_load(stale, Some(doc(json!({"name": "Stale"})))));
        assert_eq!(form.fields().name, "");

        assert!(form.finish_load(current, Some(doc(json!({"name": "Fresh"})))));
        assert_eq!(form.fields().name, "Fresh");
    }

    #[tokio::test]
    async fn update_sends_the_full_field_set_and_reloads() {
        let mut store = MockMovieStore::new();
        store.expect_get().times(1).returning(|_| {
            Ok(Some(doc(json!({"name": "Matrix", "year": "1999", "description": "", "image": ""}))))
        });
        store
            .expect_update()
            .with(
                eq(MovieId::new("m1")),
                eq(doc(json!({"name": "Matrix", "year": "2000", "description": "", "image": ""}))),
            )
            .times(1)
            .returning(|_, _| Ok(()));

        let mut form = EditForm::new(MovieId::new("m1"));
        form.load(&store).await.unwrap();
        form.edit(MovieEditField::Year, "2000");
        let outcome = form.submit(&store, TIMER).await;

        assert!(outcome.reload);
        assert_eq!(outcome.notification.icon, Icon::Success);
        assert_eq!(outcome.notification.title, UPDATED_TITLE);
    }

    #[tokio::test]
    async fn update_failure_does_not_reload_and_keeps_fields() {
        let mut store = MockMovieStore::new();
        store.expect_update().times(1).returning(|id, _| {
            Err(StoreError::NotFound { collection: "movies".to_string(), id: id.clone() })
        });

        let mut form = EditForm::new(MovieId::new("missing"));
        form.edit(MovieEditField::Name, "Brazil");
        let before = form.fields().clone();

        let outcome = form.submit(&store, TIMER).await;

        assert!(!outcome.reload);
        assert_eq!(outcome.notification.icon, Icon::Error);
        assert!(outcome.notification.title.contains("no document to update"));
        assert_eq!(form.fields(), &before);
        assert!(!form.submitting());
    }
}
