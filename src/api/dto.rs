use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    dashboard::{DashboardOutcome, SAVED_MESSAGE},
    render::{CurrentPanels, HistoryPanels},
};

/// Request body for `POST /api/dashboard`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct DashboardRequest {
    /// City name as typed by the user. Must not be blank.
    pub city: String,
    /// Optional state, province or country qualifier.
    pub region: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DashboardStatus {
    ProviderUnavailable,
    StoreWriteFailed,
    HistoryLoaded,
    HistoryEmpty,
    HistoryFailed,
}

impl DashboardStatus {
    pub fn http_status(self) -> StatusCode {
        match self {
            DashboardStatus::HistoryLoaded | DashboardStatus::HistoryEmpty => StatusCode::OK,
            DashboardStatus::ProviderUnavailable => StatusCode::BAD_GATEWAY,
            DashboardStatus::StoreWriteFailed | DashboardStatus::HistoryFailed => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// Response for `POST /api/dashboard`: the panels to draw, in order.
///
/// `current` is present whenever a reading was fetched; `history` only when
/// rows were loaded.
#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardResponse {
    pub status: DashboardStatus,
    /// `true` once the reading is durable.
    pub saved: bool,
    pub message: String,
    pub current: Option<CurrentPanels>,
    pub history: Option<HistoryPanels>,
}

impl From<DashboardOutcome> for DashboardResponse {
    fn from(outcome: DashboardOutcome) -> Self {
        let saved = outcome.saved();
        let (status, message, current, history) = match outcome {
            DashboardOutcome::ProviderUnavailable { message, .. } => {
                (DashboardStatus::ProviderUnavailable, message, None, None)
            }
            DashboardOutcome::StoreWriteFailed { current, message } => {
                (DashboardStatus::StoreWriteFailed, message, Some(current), None)
            }
            DashboardOutcome::HistoryLoaded { current, history } => (
                DashboardStatus::HistoryLoaded,
                SAVED_MESSAGE.to_owned(),
                Some(current),
                Some(history),
            ),
            DashboardOutcome::HistoryEmpty { current, message } => {
                (DashboardStatus::HistoryEmpty, message, Some(current), None)
            }
            DashboardOutcome::HistoryFailed { current, message } => {
                (DashboardStatus::HistoryFailed, message, Some(current), None)
            }
        };

        Self {
            status,
            saved,
            message,
            current,
            history,
        }
    }
}
