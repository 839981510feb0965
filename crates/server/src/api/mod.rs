use shared::{
    domain::{EntityId, EntityKind},
    error::{ApiError, ErrorCode},
    protocol::Entity,
};
use storage::Storage;
use tracing::{error, info};

#[derive(Clone)]
pub struct ApiContext {
    pub storage: Storage,
}

pub async fn list_entities(ctx: &ApiContext, kind: EntityKind) -> Result<Vec<Entity>, ApiError> {
    let stored = ctx
        .storage
        .list_entities(kind)
        .await
        .map_err(|err| internal(err, format!("Failed to retrieve {}", kind.collection())))?;
    info!(collection = kind.collection(), count = stored.len(), "retrieved entities");
    Ok(stored.into_iter().map(Entity::from).collect())
}

pub async fn create_entity(
    ctx: &ApiContext,
    kind: EntityKind,
    text: &str,
) -> Result<Entity, ApiError> {
    let stored = ctx
        .storage
        .insert_entity(kind, text)
        .await
        .map_err(|err| internal(err, format!("Failed to add {}", kind.label())))?;
    info!(
        kind = kind.label(),
        id = %stored.id,
        created_at = %stored.created_at,
        "entity added"
    );
    Ok(stored.into())
}

pub async fn delete_entity(
    ctx: &ApiContext,
    kind: EntityKind,
    id: &EntityId,
) -> Result<(), ApiError> {
    let removed = ctx
        .storage
        .delete_entity(kind, id)
        .await
        .map_err(|err| internal(err, format!("Failed to delete {}", kind.label())))?;
    if !removed {
        info!(kind = kind.label(), %id, "entity not found");
        return Err(ApiError::new(
            ErrorCode::NotFound,
            format!("{} not found", capitalized(kind.label())),
        ));
    }
    info!(kind = kind.label(), %id, "entity deleted");
    Ok(())
}

fn capitalized(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// storage details stay in the log; clients only see the summary
fn internal(err: anyhow::Error, message: String) -> ApiError {
    error!(error = %format!("{err:#}"), "{message}");
    ApiError::new(ErrorCode::Internal, message)
}

#[cfg(test)]
#[path = "tests/mod_tests.rs"]
mod tests;
