use crate::orchestrator::Orchestrator;

// App's shared state
pub struct AppState {
    pub orchestrator: Orchestrator,
    pub source: String,      // branding tag echoed in every response
    pub telegram_id: String, // contact echoed in success responses
}
