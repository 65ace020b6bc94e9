//! Tests for the typed error handling system
//!
//! These tests verify that:
//! - Errors return correct HTTP status codes
//! - Error responses are properly formatted
//! - Error conversions work correctly
//! - Error matching allows clients to handle specific cases

use axum::http::StatusCode;
use axum::response::IntoResponse;
use repair_desk::core::{
    AuthError, ConfigError, StorageError, ValidationError, error::FieldValidationError,
};
use repair_desk::prelude::*;

// =============================================================================
// HTTP Status Code Tests
// =============================================================================

mod status_code_tests {
    use super::*;

    #[test]
    fn test_order_not_found_returns_404() {
        let err = RepairError::not_found(12);
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_invalid_transition_returns_409() {
        let err = RepairError::Order(OrderError::InvalidTransition {
            id: 1,
            from: OrderStatus::Repaired,
            to: OrderStatus::Repaired,
        });
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_validation_error_returns_400() {
        let err = RepairError::field("phone", "a phone number or an email address is required");
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

        let err = RepairError::Validation(ValidationError::InvalidBody {
            message: "expected value".to_string(),
        });
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_body_too_large_returns_413() {
        let err = RepairError::Validation(ValidationError::BodyTooLarge { limit: 1024 });
        assert_eq!(err.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[test]
    fn test_auth_errors_return_401() {
        for err in [
            AuthError::MissingToken,
            AuthError::InvalidToken,
            AuthError::ExpiredToken,
            AuthError::InvalidCredentials,
        ] {
            assert_eq!(RepairError::Auth(err).status_code(), StatusCode::UNAUTHORIZED);
        }
    }

    #[test]
    fn test_rate_limited_returns_429() {
        let err = RepairError::Auth(AuthError::RateLimited { retry_after_secs: 30 });
        assert_eq!(err.status_code(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[test]
    fn test_storage_error_returns_500() {
        let err = RepairError::Storage(StorageError::ConnectionError {
            backend: "postgres".to_string(),
            message: "connection refused".to_string(),
        });
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_config_error_returns_500() {
        let err = RepairError::Config(ConfigError::MissingField {
            field: "auth.password".to_string(),
            context: "auth section".to_string(),
        });
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}

// =============================================================================
// Error Code Tests
// =============================================================================

mod error_code_tests {
    use super::*;

    #[test]
    fn test_order_error_codes() {
        assert_eq!(RepairError::not_found(1).error_code(), "ORDER_NOT_FOUND");
        let err = RepairError::Order(OrderError::InvalidTransition {
            id: 1,
            from: OrderStatus::Pending,
            to: OrderStatus::PickedUp,
        });
        assert_eq!(err.error_code(), "INVALID_STATE_TRANSITION");
    }

    #[test]
    fn test_request_error_codes() {
        assert_eq!(RepairError::field("id", "bad").error_code(), "VALIDATION_ERROR");
        assert_eq!(
            RepairError::Validation(ValidationError::BodyTooLarge { limit: 1 }).error_code(),
            "PAYLOAD_TOO_LARGE"
        );
        assert_eq!(RepairError::Auth(AuthError::InvalidToken).error_code(), "UNAUTHORIZED");
        assert_eq!(
            RepairError::Auth(AuthError::RateLimited { retry_after_secs: 1 }).error_code(),
            "RATE_LIMITED"
        );
    }

    #[test]
    fn test_server_error_codes() {
        let storage = RepairError::Storage(StorageError::Unavailable {
            backend: "postgres".to_string(),
        });
        assert_eq!(storage.error_code(), "INTERNAL_ERROR");

        let config = RepairError::Config(ConfigError::IoError {
            message: "denied".to_string(),
        });
        assert_eq!(config.error_code(), "CONFIG_ERROR");

        assert_eq!(RepairError::Internal("x".to_string()).error_code(), "INTERNAL_ERROR");
    }
}

// =============================================================================
// Error Response Format Tests
// =============================================================================

mod error_response_tests {
    use super::*;

    #[test]
    fn test_error_response_has_code_and_message() {
        let response = RepairError::not_found(7).to_response();
        assert_eq!(response.code, "ORDER_NOT_FOUND");
        assert!(response.message.contains('7'));
    }

    #[test]
    fn test_error_response_includes_order_id() {
        let response = RepairError::not_found(7).to_response();
        assert_eq!(response.details.unwrap()["id"], 7);
    }

    #[test]
    fn test_validation_errors_include_field_details() {
        let err: RepairError = vec![
            FieldValidationError::new("client_name", "is required"),
            FieldValidationError::new("device", "is required"),
        ]
        .into();
        let response = err.to_response();

        let fields = response.details.unwrap()["fields"].clone();
        assert_eq!(fields[0]["field"], "client_name");
        assert_eq!(fields[1]["field"], "device");
        assert_eq!(fields[1]["message"], "is required");
    }

    #[test]
    fn test_server_errors_hide_internals() {
        let err = RepairError::Storage(StorageError::QueryError {
            backend: "postgres".to_string(),
            message: "password authentication failed for user \"shop\"".to_string(),
        });
        let response = err.to_response();

        assert_eq!(response.message, "Internal server error");
        assert!(response.details.is_none());
    }

    #[test]
    fn test_error_response_serializes_without_empty_details() {
        let json = serde_json::to_value(RepairError::Auth(AuthError::MissingToken).to_response())
            .unwrap();
        assert_eq!(json["code"], "UNAUTHORIZED");
        assert!(json.get("details").is_none());
    }
}

// =============================================================================
// Error Conversion Tests
// =============================================================================

mod error_conversion_tests {
    use super::*;

    #[test]
    fn test_order_error_converts_to_repair_error() {
        let err: RepairError = OrderError::NotFound { id: 4 }.into();
        assert!(matches!(err, RepairError::Order(OrderError::NotFound { id: 4 })));
    }

    #[test]
    fn test_auth_error_converts_to_repair_error() {
        let err: RepairError = AuthError::InvalidCredentials.into();
        assert!(matches!(err, RepairError::Auth(AuthError::InvalidCredentials)));
    }

    #[test]
    fn test_serde_json_error_converts_to_validation_error() {
        let json_err = serde_json::from_str::<OrderUpdate>("{\"action\":\"fly\"}").unwrap_err();
        let err: RepairError = json_err.into();
        assert!(matches!(
            err,
            RepairError::Validation(ValidationError::InvalidBody { .. })
        ));
    }

    #[test]
    fn test_yaml_error_converts_to_config_error() {
        let yaml_err = serde_yaml::from_str::<AppConfig>("server: [").unwrap_err();
        let err: RepairError = yaml_err.into();
        assert_eq!(err.error_code(), "CONFIG_ERROR");
    }

    #[test]
    fn test_token_errors_convert_to_auth_errors() {
        let err: RepairError = repair_desk::auth::JwtError::ExpiredToken.into();
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
    }
}

// =============================================================================
// Error Matching Tests
// =============================================================================

mod error_matching_tests {
    use super::*;

    #[test]
    fn test_can_match_specific_order_errors() {
        let err = RepairError::Order(OrderError::InvalidTransition {
            id: 9,
            from: OrderStatus::PickedUp,
            to: OrderStatus::PickedUp,
        });

        match err {
            RepairError::Order(OrderError::InvalidTransition { id, from, .. }) => {
                assert_eq!(id, 9);
                assert!(from.is_terminal());
            }
            _ => panic!("Expected InvalidTransition"),
        }
    }

    #[test]
    fn test_can_match_validation_errors() {
        let err = RepairError::field("estimated_cost", "must not be negative");

        match err {
            RepairError::Validation(ValidationError::FieldError { field, message }) => {
                assert_eq!(field, "estimated_cost");
                assert_eq!(message, "must not be negative");
            }
            _ => panic!("Expected FieldError"),
        }
    }
}

// =============================================================================
// IntoResponse Tests
// =============================================================================

mod into_response_tests {
    use super::*;

    async fn body_json(err: RepairError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_not_found_into_response() {
        let (status, body) = body_json(RepairError::not_found(5)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "ORDER_NOT_FOUND");
        assert_eq!(body["details"]["id"], 5);
    }

    #[tokio::test]
    async fn test_internal_into_response() {
        let (status, body) = body_json(RepairError::Internal("disk on fire".to_string())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "Internal server error");
        assert!(!body.to_string().contains("disk on fire"));
    }

    #[tokio::test]
    async fn test_unauthorized_into_response() {
        let (status, body) = body_json(RepairError::Auth(AuthError::ExpiredToken)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "UNAUTHORIZED");
    }
}

// =============================================================================
// Service Error Tests
// =============================================================================

mod order_service_error_tests {
    use super::*;

    fn service() -> OrderService {
        OrderService::new(
            Arc::new(InMemoryOrderStore::new()),
            Arc::new(FixedClock::new(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap())),
        )
    }

    #[tokio::test]
    async fn test_get_unknown_order_returns_typed_error() {
        let err = service().get_order(31).await.unwrap_err();
        assert!(matches!(err, RepairError::Order(OrderError::NotFound { id: 31 })));
    }

    #[tokio::test]
    async fn test_transition_error_carries_states() {
        let service = service();
        let order = service
            .create_order(NewOrder::new("Ana", "Laptop").with_email("ana@mail.test"))
            .await
            .unwrap();

        let err = service
            .mark_picked_up(order.id, PickupDetails::same_owner())
            .await
            .unwrap_err();
        match err {
            RepairError::Order(OrderError::InvalidTransition { from, to, .. }) => {
                assert_eq!(from, OrderStatus::Pending);
                assert_eq!(to, OrderStatus::PickedUp);
            }
            other => panic!("Expected InvalidTransition, got {:?}", other),
        }
    }
}
