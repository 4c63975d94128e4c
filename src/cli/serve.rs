use crate::{config::Settings, error, server};

pub async fn serve(settings: Settings) {
    if let Err(e) = server::start_api_server(server::AppState::new(settings)).await {
        error!("Server stopped: {}", e);
    }
}
