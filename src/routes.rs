use std::sync::Arc;

use axum::{
    Router,
    extract::{Form, Path, State},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use axum_extra::extract::cookie::CookieJar;

use crate::{
    AppState,
    error::AppResult,
    forms::{CreateForm, EditForm},
    models::{CreateMovieRequest, MovieId, UpdateMovieRequest},
    notify, templates,
};

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/movies", post(create_movie))
        .route("/movies/new", get(new_movie))
        .route("/movies/{id}", post(update_movie))
        .route("/movies/{id}/edit", get(edit_movie))
        .with_state(state)
}

pub async fn index(State(state): State<Arc<AppState>>) -> AppResult<Html<String>> {
    let movies = state.store.list().await?;
    Ok(Html(templates::index_page(&movies)))
}

pub async fn new_movie() -> Html<String> {
    Html(templates::create_page(&CreateForm::new(), None))
}

pub async fn create_movie(
    State(state): State<Arc<AppState>>,
    Form(req): Form<CreateMovieRequest>,
) -> Html<String> {
    let mut form = CreateForm::new();
    for (field, value) in req.edits() {
        form.edit(field, value);
    }

    let notification = form.submit(&*state.store, state.config.notify_timer).await;
    Html(templates::create_page(&form, Some(&notification)))
}

pub async fn edit_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<MovieId>,
    jar: CookieJar,
) -> AppResult<(CookieJar, Html<String>)> {
    let (jar, flash) = notify::take_flash(jar);

    let mut form = EditForm::new(id);
    form.load(&*state.store).await?;

    Ok((jar, Html(templates::edit_page(&form, flash.as_ref()))))
}

/// A successful update redirects to the edit page, which re-fetches the
/// record; the notification rides along in the flash cookie.
pub async fn update_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<MovieId>,
    jar: CookieJar,
    Form(req): Form<UpdateMovieRequest>,
) -> AppResult<Response> {
    let mut form = EditForm::new(id);
    for (field, value) in req.edits() {
        form.edit(field, value);
    }

    let outcome = form.submit(&*state.store, state.config.notify_timer).await;

    if outcome.reload {
        let jar = jar.add(notify::flash_cookie(&outcome.notification)?);
        let location = format!("/movies/{}/edit", urlencoding::encode(form.id().as_str()));
        return Ok((jar, Redirect::to(&location)).into_response());
    }

    Ok(Html(templates::edit_page(&form, Some(&outcome.notification))).into_response())
}
