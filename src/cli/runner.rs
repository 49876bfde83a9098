//! CLI runner - executes commands

use crate::adapter::{Adapter, Request, RestAdapter};
use crate::cli::commands::{Cli, Commands, OutputFormat, PageArgs};
use crate::cursor::{self, CompositeCursor};
use crate::definitions::list_builtin;
use crate::engine::{SyncConfig, SyncEngine, SyncStatus};
use crate::entity::EntityRegistry;
use crate::error::{Error, Result, ResultExt};
use crate::loader::{load_definition, load_definition_from_str, DatasourceDefinition};
use serde_json::{json, Value};
use std::collections::HashMap;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::List => self.list_datasources(),
            Commands::Validate => self.validate(),
            Commands::Entities => self.entities(),
            Commands::Page { target, cursor } => self.page(target, cursor).await,
            Commands::Sync {
                target,
                cursor,
                max_pages,
            } => self.sync(target, cursor, *max_pages).await,
            Commands::DecodeCursor { cursor } => {
                let decoded = decode_cursor_json(cursor)?;
                self.output_message(&json!({ "type": "CURSOR", "cursor": decoded }));
                Ok(())
            }
            Commands::EncodeCursor { json } => {
                let encoded = encode_cursor_json(json)?;
                self.output_message(&json!({ "type": "CURSOR", "cursor": encoded }));
                Ok(())
            }
        }
    }

    /// Load datasource definition
    fn load_definition(&self) -> Result<DatasourceDefinition> {
        let source = self.cli.datasource.as_ref().ok_or_else(|| {
            Error::invalid_datasource_config("Datasource not specified (use -d flag)")
        })?;
        load_definition(source)
    }

    fn list_datasources(&self) -> Result<()> {
        let datasources: Vec<Value> = list_builtin()
            .into_iter()
            .filter_map(|name| {
                let yaml = crate::definitions::get_builtin(name)?;
                let def = load_definition_from_str(yaml).ok()?;
                Some(json!({
                    "name": def.name,
                    "description": def.description,
                    "entities": def.entities.iter().map(|e| e.id.as_str()).collect::<Vec<_>>(),
                }))
            })
            .collect();

        self.output_message(&json!({
            "type": "DATASOURCES",
            "datasources": datasources
        }));
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        let def = self.load_definition()?;

        self.output_message(&json!({
            "type": "LOG",
            "log": {
                "level": "INFO",
                "message": format!(
                    "Datasource '{}' v{} is valid with {} entities",
                    def.name,
                    def.version,
                    def.entities.len()
                )
            }
        }));
        Ok(())
    }

    fn entities(&self) -> Result<()> {
        let def = self.load_definition()?;
        let registry = EntityRegistry::from_definition(&def)?;

        let mut entities: Vec<Value> = registry
            .iter()
            .map(|e| {
                json!({
                    "id": e.id,
                    "path": e.path,
                    "shape": e.shape().to_string(),
                    "pagination": e.family().to_string(),
                    "parent": e.parent,
                })
            })
            .collect();
        entities.sort_by(|a, b| a["id"].as_str().cmp(&b["id"].as_str()));

        self.output_message(&json!({
            "type": "ENTITIES",
            "datasource": registry.datasource(),
            "entities": entities
        }));
        Ok(())
    }

    async fn page(&self, target: &PageArgs, cursor: &str) -> Result<()> {
        let adapter = RestAdapter::new(&self.load_definition()?)?;
        let request = build_request(target, cursor)?;

        let response = adapter.get_page(&request).await?;
        self.output_message(&json!({
            "type": "PAGE",
            "entity": request.entity_id,
            "page": response
        }));
        Ok(())
    }

    async fn sync(&self, target: &PageArgs, cursor: &str, max_pages: usize) -> Result<()> {
        let adapter = RestAdapter::new(&self.load_definition()?)?;
        let request = build_request(target, cursor)?;
        let entity = request.entity_id.clone();

        let mut engine =
            SyncEngine::new(adapter).with_config(SyncConfig::new().with_max_pages(max_pages));
        let outcome = engine
            .run_each(request, |page| {
                for object in page {
                    self.output_message(&json!({
                        "type": "RECORD",
                        "record": {
                            "entity": entity,
                            "data": object,
                            "emitted_at": chrono::Utc::now().timestamp_millis()
                        }
                    }));
                }
            })
            .await?;

        self.output_message(&json!({
            "type": "STATE",
            "state": {
                "entity": entity,
                "cursor": outcome.resume_cursor,
                "status": outcome.status,
            }
        }));

        let (level, message) = match &outcome.status {
            SyncStatus::Complete => (
                "INFO",
                format!(
                    "Synced {} records from '{entity}' in {} pages",
                    outcome.stats.records_synced, outcome.stats.pages_fetched
                ),
            ),
            SyncStatus::LimitReached => (
                "INFO",
                format!(
                    "Stopped '{entity}' after {} pages, resume with the STATE cursor",
                    outcome.stats.pages_fetched
                ),
            ),
            SyncStatus::Interrupted {
                status_code,
                retry_after,
            } => (
                "WARN",
                format!(
                    "Upstream returned {status_code} for '{entity}' (retry after: {})",
                    retry_after.as_deref().unwrap_or("-")
                ),
            ),
        };

        self.output_message(&json!({
            "type": "LOG",
            "log": { "level": level, "message": message, "stats": outcome.stats }
        }));
        Ok(())
    }

    /// Output a message
    fn output_message(&self, msg: &Value) {
        match self.cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(msg).unwrap_or_default());
            }
            OutputFormat::Pretty => {
                println!("{}", serde_json::to_string_pretty(msg).unwrap_or_default());
            }
        }
    }
}

/// Parse `ENTITY=FILTER` pairs
pub fn parse_filters(filters: &[String]) -> Result<HashMap<String, String>> {
    filters
        .iter()
        .map(|f| match f.split_once('=') {
            Some((entity, filter)) if !entity.is_empty() => {
                Ok((entity.to_string(), filter.to_string()))
            }
            _ => Err(Error::invalid_page_request(format!(
                "Filter '{f}' must look like ENTITY=FILTER"
            ))),
        })
        .collect()
}

fn build_request(target: &PageArgs, cursor: &str) -> Result<Request> {
    let mut request = Request::new(&target.entity, &target.base_url)
        .with_page_size(target.page_size)
        .with_cursor(cursor)
        .with_auth_token(&target.token)
        .with_timeout_seconds(target.timeout);
    request.filters = parse_filters(&target.filters)?;
    Ok(request)
}

/// Decode an opaque cursor into its JSON form, `null` for the empty cursor
pub(crate) fn decode_cursor_json(encoded: &str) -> Result<Value> {
    let decoded = cursor::decode::<Value>(encoded)?;
    serde_json::to_value(decoded).context("Failed to render decoded cursor")
}

/// Encode a JSON cursor into its opaque form
pub(crate) fn encode_cursor_json(json: &str) -> Result<String> {
    let parsed: CompositeCursor<Value> = serde_json::from_str(json)
        .map_err(|e| Error::invalid_page_request(format!("Invalid cursor JSON: {e}")))?;
    cursor::encode(Some(&parsed))
}
