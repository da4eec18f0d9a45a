use crate::services::icon_service::IconServiceError;
use weatherlist_core::error::ReqwestErrorExt;
use weatherlist_core::{AppError, NetworkError};
use weatherlist_weather::IconError;

impl From<IconServiceError> for AppError {
    fn from(e: IconServiceError) -> Self {
        match e {
            IconServiceError::Client(IconError::Network(e)) => {
                AppError::Network(e.into_network_error())
            }
            IconServiceError::Client(IconError::Status(status)) => {
                AppError::Network(NetworkError::ServerError {
                    status,
                    message: format!("icon request returned {}", status),
                })
            }
            IconServiceError::Client(other) => {
                AppError::Network(NetworkError::InvalidResponse(other.to_string()))
            }
        }
    }
}
