use crate::app_error::{AppError, ErrorCode};
use axum::Json;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the error before it gets converted into a status response.
        tracing::error!(error = %self, "Request failed");

        let code = self.code();
        match self {
            AppError::InvalidField(msg) => error_resp(StatusCode::BAD_REQUEST, code, msg, None),
            AppError::InvalidInput(msg) => error_resp(StatusCode::BAD_REQUEST, code, msg, None),
            AppError::InvalidSignature(detail) => error_resp(
                StatusCode::BAD_REQUEST,
                code,
                "Assinatura inválida".into(),
                Some(detail),
            ),
            AppError::Processor(detail) => error_resp(
                StatusCode::BAD_REQUEST,
                code,
                "Erro no processador de pagamento".into(),
                Some(detail),
            ),
            AppError::NotFound(msg) => error_resp(StatusCode::NOT_FOUND, code, msg, None),
            AppError::Store(detail) => error_resp(
                StatusCode::INTERNAL_SERVER_ERROR,
                code,
                "Erro ao acessar o banco de dados".into(),
                Some(detail),
            ),
            AppError::Internal(detail) => error_resp(
                StatusCode::INTERNAL_SERVER_ERROR,
                code,
                "Erro interno do servidor".into(),
                Some(detail),
            ),
        }
    }
}

fn error_resp(
    status: StatusCode,
    code: ErrorCode,
    message: String,
    detail: Option<String>,
) -> Response {
    let body = match detail {
        Some(detail) => {
            serde_json::json!({ "code": code.as_str(), "erro": message, "detalhes": detail })
        }
        None => serde_json::json!({ "code": code.as_str(), "erro": message }),
    };
    (status, Json(body)).into_response()
}
