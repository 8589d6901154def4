use crate::locks::RepoLocks;
use axum::{
    async_trait,
    extract::{FromRequestParts, Path, Query, State},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use docgit_core::{
    check_dependencies, ChangeRecord, CommitOutcome, DependencyStatus, Error, HistoryEntry,
    ProjectRegistry, Repository, Settings,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::error;

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub registry: ProjectRegistry,
    pub locks: Arc<RepoLocks>,
}

impl AppState {
    pub fn new(settings: Settings, registry: ProjectRegistry) -> Self {
        Self {
            settings: Arc::new(settings),
            registry,
            locks: Arc::new(RepoLocks::new()),
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route(
            "/api/projects",
            get(list_projects).post(add_project).delete(remove_project),
        )
        .route("/api/init", post(init_project))
        .route("/api/status", get(get_status))
        .route("/api/files", get(get_files))
        .route("/api/diff/:file_name", get(get_diff))
        .route("/api/log", get(get_log))
        .route("/api/commit", post(do_commit))
        .route("/api/restore", post(do_restore))
        .route("/api/reset", post(do_reset))
        .route("/api/revert", post(do_revert))
        .route("/api/doctor", get(get_doctor))
        .with_state(state)
}

/// Error body: `{"error": <kind>, "detail": <message>}`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    kind: &'static str,
    detail: String,
}

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        let status = match &e {
            Error::PathNotFound(_) => StatusCode::NOT_FOUND,
            Error::InvalidFileKind(_) | Error::InvalidRevision(_) | Error::NothingToCommit => {
                StatusCode::BAD_REQUEST
            }
            Error::RepositoryNotInitialized(_)
            | Error::BinaryConflict { .. }
            | Error::RepositoryBusy(_) => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!(kind = e.kind(), error = %e, "request failed");
        }
        Self {
            status,
            kind: e.kind(),
            detail: e.to_string(),
        }
    }
}

impl ApiError {
    fn bad_request(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            kind: "invalid_request",
            detail: detail.into(),
        }
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(e: tokio::task::JoinError) -> Self {
        error!(error = %e, "worker task failed");
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            kind: "worker_failed",
            detail: e.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({"error": self.kind, "detail": self.detail}));
        (self.status, body).into_response()
    }
}

type ApiResult<T> = Result<Json<T>, ApiError>;

/// `?project_path=<root>&files=<name>&files=<name>`. Each `files` value is
/// one document name; none means every document.
#[derive(Debug)]
struct ProjectQuery {
    project_path: PathBuf,
    files: Vec<String>,
}

impl ProjectQuery {
    fn from_params(params: Vec<(String, String)>) -> Result<Self, ApiError> {
        let mut project_path = None;
        let mut files = Vec::new();
        for (key, value) in params {
            match key.as_str() {
                "project_path" => project_path = Some(PathBuf::from(value)),
                "files" if !value.is_empty() => files.push(value),
                _ => {}
            }
        }

        let project_path = project_path
            .ok_or_else(|| ApiError::bad_request("missing query parameter: project_path"))?;
        Ok(Self {
            project_path,
            files,
        })
    }
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for ProjectQuery {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<Vec<(String, String)>>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::bad_request(e.body_text()))?;
        Self::from_params(params)
    }
}

/// Runs `op` on the blocking pool while holding the root's mutex.
async fn with_root<T, F>(state: &AppState, root: PathBuf, op: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(PathBuf, Settings) -> docgit_core::Result<T> + Send + 'static,
{
    let guard = state.locks.acquire(&root).await;
    let settings = Settings::clone(&state.settings);
    let result = tokio::task::spawn_blocking(move || {
        let _guard = guard;
        op(root, settings)
    })
    .await?;
    Ok(result?)
}

async fn with_repo<T, F>(state: &AppState, root: PathBuf, op: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(Repository) -> docgit_core::Result<T> + Send + 'static,
{
    with_root(state, root, move |root, settings| {
        op(Repository::open(root, settings)?)
    })
    .await
}

async fn with_registry<T, F>(state: &AppState, op: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(ProjectRegistry) -> docgit_core::Result<T> + Send + 'static,
{
    let registry = state.registry.clone();
    with_root(state, registry.path().to_path_buf(), move |_, _| op(registry)).await
}

async fn health_check() -> impl IntoResponse {
    Json(json!({"status": "ok"}))
}

async fn list_projects(State(state): State<AppState>) -> ApiResult<Vec<PathBuf>> {
    with_registry(&state, |registry| registry.list())
        .await
        .map(Json)
}

#[derive(Deserialize)]
struct AddProjectRequest {
    path: PathBuf,
}

async fn add_project(
    State(state): State<AppState>,
    Json(req): Json<AddProjectRequest>,
) -> ApiResult<Value> {
    let root = req.path;
    if !root.exists() {
        return Err(Error::PathNotFound(root).into());
    }
    let root = std::fs::canonicalize(&root).map_err(Error::from)?;

    with_root(&state, root.clone(), |root, settings| {
        Repository::bootstrap(root, settings).map(|_| ())
    })
    .await?;
    let (root, _) = with_registry(&state, move |registry| registry.add(root)).await?;

    Ok(Json(json!({"message": "Project added", "path": root})))
}

#[derive(Deserialize)]
struct RemoveProjectQuery {
    path: PathBuf,
}

async fn remove_project(
    State(state): State<AppState>,
    Query(query): Query<RemoveProjectQuery>,
) -> ApiResult<Value> {
    let removed = with_registry(&state, move |registry| registry.remove(query.path)).await?;
    Ok(Json(json!({"success": true, "removed": removed})))
}

async fn init_project(
    State(state): State<AppState>,
    query: ProjectQuery,
) -> ApiResult<Value> {
    let (_, report) = with_root(&state, query.project_path, |root, settings| {
        Repository::bootstrap(root, settings)
    })
    .await?;
    Ok(Json(json!({"success": true, "report": report})))
}

async fn get_status(
    State(state): State<AppState>,
    query: ProjectQuery,
) -> ApiResult<Vec<ChangeRecord>> {
    let ProjectQuery {
        project_path,
        files,
    } = query;
    with_repo(&state, project_path, move |repo| repo.status(&files))
        .await
        .map(Json)
}

async fn get_files(
    State(state): State<AppState>,
    query: ProjectQuery,
) -> ApiResult<Vec<String>> {
    with_repo(&state, query.project_path, |repo| repo.documents())
        .await
        .map(Json)
}

async fn get_diff(
    State(state): State<AppState>,
    Path(file_name): Path<String>,
    query: ProjectQuery,
) -> ApiResult<Value> {
    let diff = with_repo(&state, query.project_path, move |repo| {
        repo.diff(&[file_name])
    })
    .await?;
    Ok(Json(json!({"diff": diff})))
}

async fn get_log(
    State(state): State<AppState>,
    query: ProjectQuery,
) -> ApiResult<Vec<HistoryEntry>> {
    let ProjectQuery {
        project_path,
        files,
    } = query;
    with_repo(&state, project_path, move |repo| repo.log(&files))
        .await
        .map(Json)
}

#[derive(Deserialize)]
struct CommitRequest {
    message: String,
    #[serde(default)]
    files: Vec<String>,
}

async fn do_commit(
    State(state): State<AppState>,
    query: ProjectQuery,
    Json(req): Json<CommitRequest>,
) -> ApiResult<Value> {
    let outcome = with_repo(&state, query.project_path, move |repo| {
        repo.commit(&req.message, &req.files)
    })
    .await?;

    Ok(Json(match outcome {
        CommitOutcome::Committed { id } => json!({"success": true, "commit": id}),
        CommitOutcome::NothingChanged => {
            json!({"success": false, "message": "No changes to commit"})
        }
    }))
}

#[derive(Deserialize)]
struct RestoreRequest {
    commit_id: String,
    file_name: String,
}

async fn do_restore(
    State(state): State<AppState>,
    query: ProjectQuery,
    Json(req): Json<RestoreRequest>,
) -> ApiResult<Value> {
    let restored = with_repo(&state, query.project_path, move |repo| {
        repo.restore(&req.commit_id, &req.file_name)
    })
    .await?;
    Ok(Json(json!({"success": true, "restored_path": restored})))
}

#[derive(Deserialize)]
struct CommitRef {
    commit_id: String,
}

/// Hard reset. The front-end confirms with the user before calling this.
async fn do_reset(
    State(state): State<AppState>,
    query: ProjectQuery,
    Json(req): Json<CommitRef>,
) -> ApiResult<Value> {
    with_repo(&state, query.project_path, move |repo| repo.reset(&req.commit_id)).await?;
    Ok(Json(json!({"success": true})))
}

async fn do_revert(
    State(state): State<AppState>,
    query: ProjectQuery,
    Json(req): Json<CommitRef>,
) -> ApiResult<Value> {
    let outcome = with_repo(&state, query.project_path, move |repo| {
        repo.revert(&req.commit_id)
    })
    .await?;
    Ok(Json(json!({"success": true, "commit": outcome.id})))
}

async fn get_doctor(State(state): State<AppState>) -> ApiResult<Vec<DependencyStatus>> {
    let settings = Arc::clone(&state.settings);
    let report = tokio::task::spawn_blocking(move || check_dependencies(&settings)).await??;
    Ok(Json(report))
}
