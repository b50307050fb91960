use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Extension,
};
use tokio_util::io::ReaderStream;

use crate::error::Error;
use crate::middleware::auth::Claims;
use crate::AppState;

/// Write the school's score report to the exports directory and stream the
/// file back as a CSV attachment.
pub async fn export_scores(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> crate::error::Result<impl IntoResponse> {
    let school_id = claims.school_id()?;
    let path = state.report_service.export_scores_csv(school_id).await?;

    let file = tokio::fs::File::open(&path).await.map_err(Error::Io)?;
    let stream = ReaderStream::new(file);
    let body = axum::body::Body::from_stream(stream);

    let filename = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("scores_export.csv")
        .to_string();
    let disposition = format!("attachment; filename=\"{}\"", filename);

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    ))
}
