//! HTTP surface of a CRUD family
//!
//! Generic handlers over [`CrudService`] plus the per-family path table.

use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Path, RawQuery, Request, State},
    http::{request::Parts, StatusCode},
    routing::{get, post, put},
    Extension, Json, Router,
};
use serde::de::DeserializeOwned;

use super::{CrudService, Mapper};
use crate::context::OperationContext;
use crate::error::{AppError, AppResult};

/// Paths and conventions of one entity family
#[derive(Debug, Clone)]
pub struct RouteLayout {
    pub read: String,
    pub read_all: String,
    /// Query parameter carrying the ids of a batch read
    pub ids_param: &'static str,
    pub create: String,
    pub update: String,
    pub create_status: StatusCode,
}

impl RouteLayout {
    /// `<prefix>/:id`, `<prefix>/read/all`, `<prefix>/create`, `<prefix>/update/:id`
    pub fn conventional(prefix: &str) -> Self {
        Self {
            read: format!("{}/:id", prefix),
            read_all: format!("{}/read/all", prefix),
            ids_param: "ids",
            create: format!("{}/create", prefix),
            update: format!("{}/update/:id", prefix),
            create_status: StatusCode::OK,
        }
    }

    pub fn read(mut self, path: impl Into<String>) -> Self {
        self.read = path.into();
        self
    }

    pub fn read_all(mut self, path: impl Into<String>, ids_param: &'static str) -> Self {
        self.read_all = path.into();
        self.ids_param = ids_param;
        self
    }

    pub fn create(mut self, path: impl Into<String>) -> Self {
        self.create = path.into();
        self
    }

    pub fn update(mut self, path: impl Into<String>) -> Self {
        self.update = path.into();
        self
    }

    pub fn create_status(mut self, status: StatusCode) -> Self {
        self.create_status = status;
        self
    }
}

pub struct CrudState<M: Mapper> {
    service: Arc<CrudService<M>>,
    ids_param: &'static str,
    create_status: StatusCode,
}

impl<M: Mapper> Clone for CrudState<M> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            ids_param: self.ids_param,
            create_status: self.create_status,
        }
    }
}

/// Read, batch read, create and update routes for one family
pub fn crud_router<M: Mapper>(service: CrudService<M>, layout: RouteLayout) -> Router {
    let state = CrudState {
        service: Arc::new(service),
        ids_param: layout.ids_param,
        create_status: layout.create_status,
    };

    Router::new()
        .route(&layout.read, get(read::<M>))
        .route(&layout.read_all, get(read_all::<M>))
        .route(&layout.create, post(create::<M>))
        .route(&layout.update, put(update::<M>))
        .with_state(state)
}

/// Read-by-id only
pub fn read_only_router<M: Mapper>(service: CrudService<M>, read_path: &str) -> Router {
    let state = CrudState {
        service: Arc::new(service),
        ids_param: "ids",
        create_status: StatusCode::OK,
    };

    Router::new()
        .route(read_path, get(read::<M>))
        .with_state(state)
}

// =========================================================================
// Extractors
// =========================================================================

/// Numeric `:id` path segment; anything unparseable is a bare 404
#[derive(Debug, Clone, Copy)]
pub struct IdPath(pub i64);

#[async_trait]
impl<S> FromRequestParts<S> for IdPath
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<i64>::from_request_parts(parts, state)
            .await
            .map_err(|_| StatusCode::NOT_FOUND)?;
        Ok(IdPath(id))
    }
}

/// JSON body whose absence or malformation is a 400
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::InvalidRequest(rejection.body_text()))?;
        Ok(JsonBody(value))
    }
}

/// Collect every value of `param`, accepting both repeated parameters and
/// comma-separated lists.
pub fn parse_ids(query: Option<&str>, param: &str) -> AppResult<Vec<i64>> {
    let mut ids = Vec::new();

    for (key, value) in url::form_urlencoded::parse(query.unwrap_or_default().as_bytes()) {
        if key != param {
            continue;
        }
        for part in value.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let id = part.parse().map_err(|_| {
                AppError::InvalidRequest(format!(
                    "Invalid value '{}' for parameter '{}'",
                    part, param
                ))
            })?;
            ids.push(id);
        }
    }

    if ids.is_empty() {
        return Err(AppError::InvalidRequest(format!(
            "Required parameter '{}' is not present",
            param
        )));
    }

    Ok(ids)
}

// =========================================================================
// Handlers
// =========================================================================

fn operation_context(context: Option<Extension<OperationContext>>) -> OperationContext {
    context.map(|Extension(ctx)| ctx).unwrap_or_default()
}

async fn read<M: Mapper>(
    State(state): State<CrudState<M>>,
    IdPath(id): IdPath,
) -> AppResult<Json<M::Dto>> {
    Ok(Json(state.service.find_by_id(id).await?))
}

async fn read_all<M: Mapper>(
    State(state): State<CrudState<M>>,
    RawQuery(query): RawQuery,
) -> AppResult<Json<Vec<M::Dto>>> {
    let ids = parse_ids(query.as_deref(), state.ids_param)?;
    Ok(Json(state.service.find_all_by_id(&ids).await?))
}

async fn create<M: Mapper>(
    State(state): State<CrudState<M>>,
    context: Option<Extension<OperationContext>>,
    JsonBody(dto): JsonBody<M::Dto>,
) -> AppResult<(StatusCode, Json<M::Dto>)> {
    let context = operation_context(context);
    let created = state.service.save(dto, &context).await?;
    Ok((state.create_status, Json(created)))
}

async fn update<M: Mapper>(
    State(state): State<CrudState<M>>,
    IdPath(id): IdPath,
    context: Option<Extension<OperationContext>>,
    JsonBody(dto): JsonBody<M::Dto>,
) -> AppResult<Json<M::Dto>> {
    let context = operation_context(context);
    Ok(Json(state.service.update(id, dto, &context).await?))
}
