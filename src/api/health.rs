use axum::{Extension, response::Json};
use serde_json::{Value, json};

use crate::server::CallbackState;

pub async fn health(Extension(state): Extension<CallbackState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "signed_in": state.coordinator.store().is_signed_in(),
    }))
}
