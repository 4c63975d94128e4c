use axum::{Extension, response::Json};
use serde_json::{Value, json};

use crate::{config::DeploymentMode, server::AppState};

pub async fn health(Extension(app): Extension<AppState>) -> Json<Value> {
    let deployment = match app.settings.deployment {
        DeploymentMode::Local => "local",
        DeploymentMode::Hosted => "hosted",
    };

    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "deployment": deployment,
        "sessions": app.sessions.len().await
    }))
}
