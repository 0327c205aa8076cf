//! Portal data reads.
//!
//! Every query filters on the client id from the session context, so a
//! guessed or leaked id belonging to another client resolves to NOT_FOUND
//! rather than FORBIDDEN. Existence is not disclosed across clients.

use axum::Json;
use entity::{documents, matters};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use serde_json::json;
use uuid::Uuid;

use super::{activity::log_activity, middleware::PortalContext};
use crate::{
    dto::portal::{DocumentDownload, PortalDocument, PortalMatter},
    AppError,
    AppState,
    Result,
};

/// Inner handler for listing the client's matters.
pub async fn list_matters_handler_inner(
    state: &AppState,
    ctx: PortalContext,
) -> Result<Json<Vec<PortalMatter>>> {
    let matters = matters::Entity::find()
        .filter(matters::Column::ClientId.eq(ctx.client_id))
        .order_by_desc(matters::Column::OpenedAt)
        .all(&state.db)
        .await?;

    Ok(Json(matters.iter().map(PortalMatter::from).collect()))
}

/// Inner handler for fetching one of the client's matters.
pub async fn get_matter_handler_inner(
    state: &AppState,
    ctx: PortalContext,
    matter_id: Uuid,
) -> Result<Json<PortalMatter>> {
    let matter = matters::Entity::find_by_id(matter_id)
        .filter(matters::Column::ClientId.eq(ctx.client_id))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("Matter not found"))?;

    Ok(Json(PortalMatter::from(&matter)))
}

/// Inner handler for listing the client's documents.
pub async fn list_documents_handler_inner(
    state: &AppState,
    ctx: PortalContext,
) -> Result<Json<Vec<PortalDocument>>> {
    let docs = documents::Entity::find()
        .filter(documents::Column::ClientId.eq(ctx.client_id))
        .order_by_desc(documents::Column::UploadedAt)
        .all(&state.db)
        .await?;

    Ok(Json(docs.iter().map(PortalDocument::from).collect()))
}

/// Inner handler for resolving a document download.
///
/// Returns the storage handle; the blob itself lives outside the
/// database. Downloads are recorded in the activity log.
pub async fn download_document_handler_inner(
    state: &AppState,
    ctx: PortalContext,
    document_id: Uuid,
) -> Result<Json<DocumentDownload>> {
    let doc = documents::Entity::find_by_id(document_id)
        .filter(documents::Column::ClientId.eq(ctx.client_id))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("Document not found"))?;

    log_activity(
        &state.db,
        ctx.portal_user_id,
        "document_download",
        Some(json!({ "document_id": doc.id, "file_name": doc.file_name })),
        None,
    )
    .await;

    Ok(Json(DocumentDownload {
        id:           doc.id,
        file_name:    doc.file_name,
        content_type: doc.content_type,
        storage_path: doc.storage_path,
    }))
}
