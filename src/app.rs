use axum::{
    Form, Json, Router,
    extract::{Path, Query, State},
    http::{HeaderName, StatusCode, header},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post, put},
};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::error::{ExportError, FieldError};
use crate::record::{BugRecord, Field, FieldKind};
use crate::render::PageRenderer;
use crate::store::{Export, Notice, RecordStore};

/// Server configuration options.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Start with the `BUG-00126` entry in the store
    pub seed: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            seed: true,
        }
    }
}

pub struct AppState {
    store: Mutex<RecordStore>,
    pages: PageRenderer,
}

impl AppState {
    pub fn new(store: RecordStore) -> Result<Self, handlebars::TemplateError> {
        Ok(AppState {
            store: Mutex::new(store),
            pages: PageRenderer::new()?,
        })
    }

    fn store(&self) -> MutexGuard<'_, RecordStore> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Error type for web API operations.
#[derive(Debug, thiserror::Error)]
pub enum WebError {
    #[error(transparent)]
    Field(#[from] FieldError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error("failed to render page: {0}")]
    Render(#[from] handlebars::RenderError),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let (status, error) = match &self {
            WebError::Field(_) => (StatusCode::BAD_REQUEST, "Bad Request"),
            WebError::Export(e) => {
                log::error!("export failed: {e}");
                (StatusCode::INTERNAL_SERVER_ERROR, "Export Failed")
            }
            WebError::Render(e) => {
                log::error!("render failed: {e}");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
            }
        };
        let body = Json(ErrorResponse {
            error,
            details: Some(self.to_string()),
        });
        (status, body).into_response()
    }
}

#[derive(Deserialize)]
struct PageQuery {
    notice: Option<String>,
}

#[derive(Deserialize)]
struct DraftValue {
    value: String,
}

#[derive(Serialize)]
struct FieldInfo {
    name: &'static str,
    label: String,
    #[serde(flatten)]
    kind: FieldKind,
    default: String,
}

#[derive(Serialize)]
struct SubmitResponse {
    notice: Notice,
    message: &'static str,
    count: usize,
}

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(serve_page))
        .route("/bugs", post(submit_form))
        .route("/api/fields", get(get_fields))
        .route("/api/draft", get(get_draft))
        .route("/api/draft/:field", put(update_draft_field))
        .route("/api/submit", post(submit_draft))
        .route("/api/records", get(get_records))
        .route("/api/export", get(export_xlsx))
        .route("/api/export.csv", get(export_csv))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let store = if config.seed {
        RecordStore::seeded()
    } else {
        RecordStore::new()
    };
    let app_state = Arc::new(AppState::new(store)?);
    let app = build_router(app_state);

    let listener = TcpListener::bind((config.host.as_str(), config.port)).await?;
    log::info!("Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}

async fn serve_page(
    Query(params): Query<PageQuery>,
    State(state): State<Arc<AppState>>,
) -> Result<Html<String>, WebError> {
    let notice = match params.notice.as_deref() {
        Some("added") => Some(Notice::BugAdded),
        _ => None,
    };
    let store = state.store();
    Ok(Html(state.pages.render(&store, notice)?))
}

/// Fill the draft from the posted form and submit it.
///
/// Every pair is checked before the draft is touched, so a rejected form
/// leaves the draft as it was.
async fn submit_form(
    State(state): State<Arc<AppState>>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Redirect, WebError> {
    let mut scratch = BugRecord::default();
    for (name, value) in &pairs {
        let field: Field = name.parse()?;
        scratch.set(field, value)?;
    }

    let mut store = state.store();
    for (name, value) in &pairs {
        store.update_draft_field(name, value)?;
    }
    store.submit_draft();
    Ok(Redirect::to("/?notice=added"))
}

async fn get_fields() -> Json<Vec<FieldInfo>> {
    let defaults = BugRecord::default();
    Json(
        Field::ALL
            .iter()
            .map(|&field| FieldInfo {
                name: field.name(),
                label: field.label(),
                kind: field.kind(),
                default: defaults.get(field),
            })
            .collect(),
    )
}

async fn get_draft(State(state): State<Arc<AppState>>) -> Json<BugRecord> {
    Json(state.store().draft().clone())
}

async fn update_draft_field(
    Path(field): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(payload): Json<DraftValue>,
) -> Result<Json<BugRecord>, WebError> {
    let mut store = state.store();
    store.update_draft_field(&field, &payload.value)?;
    Ok(Json(store.draft().clone()))
}

async fn submit_draft(State(state): State<Arc<AppState>>) -> Json<SubmitResponse> {
    let mut store = state.store();
    let notice = store.submit_draft();
    Json(SubmitResponse {
        notice,
        message: notice.message(),
        count: store.len(),
    })
}

async fn get_records(State(state): State<Arc<AppState>>) -> Json<Vec<BugRecord>> {
    Json(state.store().records().to_vec())
}

async fn export_xlsx(State(state): State<Arc<AppState>>) -> Result<Response, WebError> {
    let export = state.store().export_to_spreadsheet()?;
    Ok(download(export))
}

async fn export_csv(State(state): State<Arc<AppState>>) -> Response {
    let export = state.store().export_csv();
    download(export)
}

fn download(export: Export) -> Response {
    let notice = match export.notice {
        Notice::BugAdded => "bug_added",
        Notice::ExcelExported => "excel_exported",
    };
    let headers = [
        (header::CONTENT_TYPE, export.content_type.to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", export.file_name),
        ),
        (HeaderName::from_static("x-notice"), notice.to_string()),
    ];
    (headers, export.bytes).into_response()
}
