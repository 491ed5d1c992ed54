use crate::{AppState, error::AppError};
use axum::{
    Form,
    extract::{
        Path, State,
        rejection::{FormRejection, PathRejection},
    },
    response::Html,
};
use core_types::NewToDo;
use serde::Deserialize;
use std::sync::Arc;

/// Body of `POST /todos`, as sent by the creation form.
#[derive(Debug, Deserialize)]
pub struct CreateToDoForm {
    pub content: String,
}

/// Turns a numeric path segment into an id, rejecting anything else with 422.
fn parse_id(id: Result<Path<i64>, PathRejection>) -> Result<i64, AppError> {
    id.map(|Path(id)| id)
        .map_err(|rejection| AppError::InvalidInput(rejection.body_text()))
}

/// # GET /
pub async fn index() -> Html<String> {
    Html(views::render_index())
}

/// # GET /todos
pub async fn list_todos(State(state): State<Arc<AppState>>) -> Result<Html<String>, AppError> {
    let todos = state.db_repo.list_todos().await?;
    Ok(Html(views::render_list(&todos)))
}

/// # POST /todos
/// Creates an item and returns its row, which the form inserts just above itself.
pub async fn create_todo(
    State(state): State<Arc<AppState>>,
    form: Result<Form<CreateToDoForm>, FormRejection>,
) -> Result<Html<String>, AppError> {
    let Form(form) = form.map_err(|rejection| AppError::InvalidInput(rejection.body_text()))?;
    let new_todo = NewToDo::new(form.content)?;
    let todo = state.db_repo.create_todo(&new_todo).await?;
    Ok(Html(views::render_item(&todo)))
}

/// # POST /todos/toggle/:id
pub async fn toggle_todo(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Html<String>, AppError> {
    let id = parse_id(id)?;
    let todo = state
        .db_repo
        .toggle_todo(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("to-do {id} does not exist")))?;
    Ok(Html(views::render_item(&todo)))
}

/// # DELETE /todos/:id
/// Always answers with an empty body so the row swaps itself out, even if it was already gone.
pub async fn delete_todo(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<(), AppError> {
    let id = parse_id(id)?;
    state.db_repo.delete_todo(id).await?;
    Ok(())
}

/// # POST /clicked
pub async fn clicked() -> Html<String> {
    Html(views::render_clicked())
}
