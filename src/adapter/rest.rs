//! REST adapter
//!
//! Serves every entity of a datasource definition. Each `get_page` call
//! decodes and validates the caller's cursor, runs the entity's page
//! strategy against a request-scoped fetcher, and re-encodes the cursor.

use super::types::{Adapter, Request, Response};
use crate::auth::{AuthScheme, Authenticator};
use crate::cursor::{self, CompositeCursor, CursorValue};
use crate::entity::{Entity, EntityRegistry, EntityStrategy};
use crate::error::{Error, Result};
use crate::http::{HttpClient, HttpClientConfig, RequestConfig};
use crate::loader::DatasourceDefinition;
use crate::pagination::{BatchFiller, CursorFamily, Page, PageFetcher, PageRequest, PageToken};
use crate::template::{self, TemplateContext};
use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;
use url::Url;

/// Adapter for REST datasources described by a YAML definition
#[derive(Debug, Clone)]
pub struct RestAdapter {
    registry: EntityRegistry,
    auth: Authenticator,
    client: HttpClient,
    vars: Value,
}

impl RestAdapter {
    /// Build an adapter from a datasource definition
    pub fn new(def: &DatasourceDefinition) -> Result<Self> {
        let registry = EntityRegistry::from_definition(def)?;
        let auth = Authenticator::new(AuthScheme::from_definition(&def.auth)?);

        let mut config = HttpClientConfig::builder().headers(&def.http.headers);
        if let Some(agent) = &def.http.user_agent {
            config = config.user_agent(agent);
        }
        let client = HttpClient::with_config(config.build())?;

        Ok(Self {
            registry,
            auth,
            client,
            vars: def.vars.clone(),
        })
    }

    /// Replace the HTTP client
    #[must_use]
    pub fn with_client(mut self, client: HttpClient) -> Self {
        self.client = client;
        self
    }

    /// Entities served by this adapter
    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    fn scope<'a>(&'a self, request: &'a Request) -> Result<RequestScope<'a>> {
        let base_url = Url::parse(&request.base_url).map_err(|e| {
            Error::invalid_page_request(format!("Invalid base URL '{}': {e}", request.base_url))
        })?;
        Ok(RequestScope {
            adapter: self,
            request,
            base_url,
        })
    }
}

#[async_trait]
impl Adapter for RestAdapter {
    fn name(&self) -> &str {
        self.registry.datasource()
    }

    async fn get_page(&self, request: &Request) -> Result<Response> {
        if request.page_size == 0 {
            return Err(Error::invalid_page_request("Page size must be at least 1"));
        }

        let entity = self.registry.get(&request.entity_id)?;
        let scope = self.scope(request)?;

        debug!(
            entity = %entity.id,
            shape = %entity.shape(),
            page_size = request.page_size,
            resumed = !request.cursor.is_empty(),
            "Getting page"
        );

        match (&entity.strategy, entity.family()) {
            (EntityStrategy::BatchEntitlement(filler), _) => scope.batch(entity, filler).await,
            (_, CursorFamily::Offset) => scope.paged::<i64>(entity).await,
            (_, CursorFamily::Token) => scope.paged::<String>(entity).await,
        }
    }
}

/// Reject cursor positions the vendor cannot be asked for (negative offsets)
fn check_positions<T: PageToken>(
    cursor: Option<&CompositeCursor<T>>,
    entity_id: &str,
) -> Result<()> {
    let Some(cursor) = cursor else {
        return Ok(());
    };

    let valid = [&cursor.cursor, &cursor.collection_cursor]
        .into_iter()
        .flatten()
        .all(<T as PageToken>::is_valid_position);
    if !valid {
        return Err(Error::invalid_page_request(format!(
            "Cursor position out of range for entity {entity_id}"
        )));
    }

    Ok(())
}

/// Everything one `get_page` call needs to reach the vendor
struct RequestScope<'a> {
    adapter: &'a RestAdapter,
    request: &'a Request,
    base_url: Url,
}

impl RequestScope<'_> {
    async fn paged<T: PageToken>(&self, entity: &Entity) -> Result<Response> {
        let cursor = cursor::decode::<T>(&self.request.cursor)?;
        cursor::validate(
            cursor.as_ref(),
            &entity.id,
            entity.shape().is_collection_member(),
        )?;
        check_positions(cursor.as_ref(), &entity.id)?;

        let page = match &entity.strategy {
            EntityStrategy::Member(advancer) => {
                advancer.advance(self, self.request.page_size, cursor).await?
            }
            _ => {
                let position = cursor.and_then(|c| c.cursor);
                let request = PageRequest::new(&entity.id, self.request.page_size)
                    .with_cursor(position);
                PageFetcher::<T>::fetch(self, request)
                    .await?
                    .map_cursor(CompositeCursor::at)
            }
        };

        into_response(page)
    }

    async fn batch(&self, entity: &Entity, filler: &BatchFiller) -> Result<Response> {
        let cursor = cursor::decode::<i64>(&self.request.cursor)?;
        cursor::validate(cursor.as_ref(), &entity.id, true)?;
        check_positions(cursor.as_ref(), &entity.id)?;

        let page = filler.fill(self, self.request.page_size, cursor).await?;
        into_response(page)
    }

    fn context(&self, entity: &Entity, collection_id: Option<&str>) -> TemplateContext {
        TemplateContext::new()
            .with_collection_id(collection_id)
            .with_filter(self.request.filter(&entity.id))
            .with_vars(self.adapter.vars.clone())
    }

    fn entity_url(&self, entity: &Entity, ctx: &TemplateContext) -> Result<Url> {
        let segments = entity
            .path
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| template::render(s, ctx))
            .collect::<Result<Vec<_>>>()?;

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                Error::invalid_page_request(format!(
                    "Base URL '{}' cannot carry a path",
                    self.request.base_url
                ))
            })?
            .pop_if_empty()
            .extend(&segments);
        Ok(url)
    }

    fn entity_query(&self, entity: &Entity, ctx: &TemplateContext) -> Result<Vec<(String, String)>> {
        let mut keys: Vec<&String> = entity.query.keys().collect();
        keys.sort();

        let mut params = Vec::with_capacity(keys.len());
        for key in keys {
            let value = template::render(&entity.query[key], ctx)?;
            if !value.is_empty() {
                params.push((key.clone(), value));
            }
        }
        Ok(params)
    }
}

#[async_trait]
impl<'a, T: PageToken> PageFetcher<T> for RequestScope<'a> {
    async fn fetch(&self, page: PageRequest<T>) -> Result<Page<T>> {
        let entity = self.adapter.registry.get(&page.entity_id)?;
        let paginator = T::paginator(&entity.pagination)?;
        let ctx = self.context(entity, page.collection_id.as_deref());

        let url = self.entity_url(entity, &ctx)?;
        let mut config = RequestConfig::new()
            .queries(self.entity_query(entity, &ctx)?)
            .queries(paginator.query_params(page.cursor.as_ref(), page.page_size));
        if let Some(timeout) = self.request.timeout() {
            config = config.timeout(timeout);
        }

        let response = self
            .adapter
            .client
            .get_json(url, &config, &self.adapter.auth, &self.request.auth_token)
            .await?;

        if !response.is_success() {
            return Ok(Page::status(response.status, response.retry_after));
        }

        let body = response.body.unwrap_or(Value::Null);
        let objects = entity.decoder().records(&body)?;
        let next_cursor =
            paginator.next_cursor(&body, objects.len(), page.page_size, page.cursor.as_ref())?;

        debug!(
            entity = %entity.id,
            collection_id = ?page.collection_id,
            returned = objects.len(),
            requested = page.page_size,
            next = ?next_cursor,
            "Fetched upstream page"
        );

        Ok(Page {
            status_code: response.status,
            retry_after: response.retry_after,
            objects,
            next_cursor,
        })
    }
}

fn into_response<T: CursorValue>(page: Page<CompositeCursor<T>>) -> Result<Response> {
    let next_cursor = if page.is_success() {
        cursor::encode(page.next_cursor.as_ref())?
    } else {
        String::new()
    };

    Ok(Response {
        status_code: page.status_code,
        retry_after: page.retry_after,
        objects: page.objects,
        next_cursor,
    })
}
