use std::sync::Arc;

use crate::external::github::WorkflowDispatcher;

#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<WorkflowDispatcher>,
}
