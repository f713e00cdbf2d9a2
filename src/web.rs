use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    response::{Html, IntoResponse},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::signal;

use crate::config::Config;
use crate::engine::{ChatEngine, ChatReply, EngineError};
use crate::voice::{VoiceClient, VoiceError};

/// Uploaded audio clips are small; 25 MiB leaves headroom for uncompressed WAV.
const MAX_BODY_BYTES: usize = 25 * 1024 * 1024;

#[derive(Clone)]
struct SharedState {
    engine: Arc<ChatEngine>,
    voice: Arc<VoiceClient>,
    categories: Vec<String>,
}

/// Build the full router. Shared by the daemon and the tests.
pub fn build_router(engine: ChatEngine, voice: VoiceClient, categories: Vec<String>) -> Router {
    let shared_state = Arc::new(SharedState {
        engine: Arc::new(engine),
        voice: Arc::new(voice),
        categories,
    });

    router(shared_state)
}

async fn start_app(engine: ChatEngine, voice: VoiceClient, config: Config) {
    let categories = config.corpus.categories.clone();
    let app = build_router(engine, voice, categories);

    async fn shutdown_signal() {
        let ctrl_c = async {
            signal::ctrl_c()
                .await
                .expect("failed to install Ctrl+C handler");
        };

        let terminate = async {
            signal::unix::signal(signal::unix::SignalKind::terminate())
                .expect("failed to install signal handler")
                .recv()
                .await;
        };

        tokio::select! {
            _ = ctrl_c => {},
            _ = terminate => {},
        }
    }

    let listener = tokio::net::TcpListener::bind(&config.server.bind_addr)
        .await
        .unwrap();
    log::info!("listening on {}", config.server.bind_addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();
}

fn router(shared_state: Arc<SharedState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/chat", post(chat))
        .route("/suggestions", post(suggestions))
        .route("/voice-input", post(voice_input))
        .route("/voice-output", post(voice_output))
        .route("/analytics", get(analytics))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(
            tower_http::trace::TraceLayer::new_for_http()
                .make_span_with(
                    tower_http::trace::DefaultMakeSpan::new().level(tracing::Level::INFO),
                )
                .on_response(
                    tower_http::trace::DefaultOnResponse::new().level(tracing::Level::INFO),
                ),
        )
        .with_state(shared_state)
}

pub fn start_daemon(engine: ChatEngine, voice: VoiceClient, config: Config) {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .unwrap()
        .block_on(async { start_app(engine, voice, config).await });
}

// Wraps EngineError so axum can turn it into a response.
#[derive(Debug)]
struct HttpError(EngineError);

impl IntoResponse for HttpError {
    fn into_response(self) -> axum::response::Response {
        log::error!("{:?}", self.0);
        (
            axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            json!({"error": self.0.to_string()}).to_string(),
        )
            .into_response()
    }
}

impl<E> From<E> for HttpError
where
    E: Into<EngineError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

async fn index() -> Html<&'static str> {
    Html(include_str!("../static/chat.html"))
}

/// Missing keys default to empty string rather than rejecting the request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
}

async fn chat(
    State(state): State<Arc<SharedState>>,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatReply>, HttpError> {
    let engine = state.engine.clone();

    tokio::task::block_in_place(move || {
        let reply = engine.reply(&payload.message)?;
        Ok(Json(reply))
    })
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SuggestionsRequest {
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Serialize)]
pub struct SuggestionsResponse {
    pub suggestions: Vec<String>,
}

async fn suggestions(
    State(state): State<Arc<SharedState>>,
    Json(payload): Json<SuggestionsRequest>,
) -> Json<SuggestionsResponse> {
    Json(SuggestionsResponse {
        suggestions: state.engine.suggest(&payload.query),
    })
}

/// Voice failures never bubble to an HTTP error status; the frontend expects
/// a structured `{success: false, error}` body instead.
fn voice_failure(err: &VoiceError) -> Json<serde_json::Value> {
    log::error!("voice error: {err}");
    Json(json!({"error": err.to_string(), "success": false}))
}

async fn voice_input(
    State(state): State<Arc<SharedState>>,
    mut multipart: Multipart,
) -> Json<serde_json::Value> {
    let mut audio: Option<(Vec<u8>, String)> = None;

    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() == Some("audio") {
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            match field.bytes().await {
                Ok(bytes) => audio = Some((bytes.to_vec(), content_type)),
                Err(err) => {
                    return Json(json!({
                        "error": format!("could not read audio upload: {err}"),
                        "success": false,
                    }))
                }
            }
            break;
        }
    }

    let (bytes, content_type) = match audio {
        Some(audio) => audio,
        None => {
            return Json(json!({
                "error": "missing `audio` field in upload",
                "success": false,
            }))
        }
    };

    let voice = state.voice.clone();
    tokio::task::block_in_place(
        move || match voice.transcribe(&bytes, &content_type) {
            Ok(text) => Json(json!({"text": text, "success": true})),
            Err(err) => voice_failure(&err),
        },
    )
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VoiceOutputRequest {
    #[serde(default)]
    pub text: String,
}

async fn voice_output(
    State(state): State<Arc<SharedState>>,
    Json(payload): Json<VoiceOutputRequest>,
) -> Json<serde_json::Value> {
    let voice = state.voice.clone();

    tokio::task::block_in_place(move || match voice.synthesize(&payload.text) {
        Ok(audio) => Json(json!({"audio": audio, "success": true})),
        Err(err) => voice_failure(&err),
    })
}

#[derive(Debug, Serialize)]
pub struct AnalyticsResponse {
    pub total_faqs: usize,
    pub categories: Vec<String>,
    pub popular_questions: Vec<String>,
}

async fn analytics(State(state): State<Arc<SharedState>>) -> Json<AnalyticsResponse> {
    let corpus = state.engine.corpus();

    Json(AnalyticsResponse {
        total_faqs: corpus.len(),
        categories: state.categories.clone(),
        popular_questions: corpus.questions().take(5).map(str::to_string).collect(),
    })
}
