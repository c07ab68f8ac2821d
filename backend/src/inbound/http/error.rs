//! HTTP status mapping for domain errors.
//!
//! The domain error stays HTTP-agnostic; only this adapter knows which status
//! each [`ErrorCode`] travels under.

use actix_web::http::StatusCode;

use crate::domain::ErrorCode;

/// Status code a failure of `code` is reported with.
pub const fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::Validation | ErrorCode::InvalidRequest | ErrorCode::InvalidId => {
            StatusCode::BAD_REQUEST
        }
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::Shutdown => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(ErrorCode::Validation, StatusCode::BAD_REQUEST)]
    #[case(ErrorCode::InvalidRequest, StatusCode::BAD_REQUEST)]
    #[case(ErrorCode::InvalidId, StatusCode::BAD_REQUEST)]
    #[case(ErrorCode::NotFound, StatusCode::NOT_FOUND)]
    #[case(ErrorCode::Conflict, StatusCode::CONFLICT)]
    #[case(ErrorCode::Shutdown, StatusCode::SERVICE_UNAVAILABLE)]
    #[case(ErrorCode::Internal, StatusCode::INTERNAL_SERVER_ERROR)]
    fn status_code_matches_error_code(#[case] code: ErrorCode, #[case] status: StatusCode) {
        assert_eq!(status_for(code), status);
    }

    #[rstest]
    fn client_errors_are_4xx() {
        for code in [
            ErrorCode::Validation,
            ErrorCode::InvalidRequest,
            ErrorCode::InvalidId,
            ErrorCode::NotFound,
            ErrorCode::Conflict,
        ] {
            assert!(code.is_client_error());
            assert!(status_for(code).is_client_error());
        }
        assert!(status_for(ErrorCode::Internal).is_server_error());
    }
}
