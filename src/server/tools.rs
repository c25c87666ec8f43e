//! MCP Server tools for star catalog queries

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use rmcp::{
    RoleServer, ServerHandler,
    model::{
        CallToolRequestParam, CallToolResult, Content, Implementation, ListToolsResult,
        PaginatedRequestParam, ProtocolVersion, ServerCapabilities, ServerInfo, Tool,
    },
    schemars::{self, schema_for},
    service::RequestContext,
};
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::{json, Value};

use crate::catalogs::{
    CommandExecutor, ConeSearch, GaiaCatalog, Gsc23Catalog, LocalOverrides, Nomad1Catalog,
    SystemExecutor,
};
use crate::config::CatalogConfig;
use crate::error::CatalogError;
use crate::models::{Catalog, ConeQuery, MagnitudeFilter, MagnitudeRange, StarRecord};

/// Input for a Gaia DR3 cone search
#[derive(Debug, Clone, Deserialize, schemars::JsonSchema)]
pub struct GaiaQueryInput {
    #[schemars(description = "Right ascension in degrees (ICRS)")]
    pub ra: f64,
    #[schemars(description = "Declination in degrees (ICRS)")]
    pub dec: f64,
    #[schemars(description = "Search radius in arcseconds")]
    pub radius_arcsec: f64,
    #[schemars(description = "Maximum number of stars (default: 1000)")]
    pub max: Option<usize>,
    #[schemars(description = "Magnitude limits by band letter, e.g. {\"B\": [10, 15]}. Bands: B, R")]
    pub magnitudes: Option<BTreeMap<String, [f64; 2]>>,
}

/// Input for a GSC2.3 or NOMAD1 cone search
#[derive(Debug, Clone, Deserialize, schemars::JsonSchema)]
pub struct LocalQueryInput {
    #[schemars(description = "Right ascension in degrees (ICRS)")]
    pub ra: f64,
    #[schemars(description = "Declination in degrees (ICRS)")]
    pub dec: f64,
    #[schemars(description = "Search radius in arcseconds")]
    pub radius_arcsec: f64,
    #[schemars(description = "Maximum number of stars (default: 1000)")]
    pub max: Option<usize>,
    #[schemars(description = "Magnitude limits by band letter, e.g. {\"V\": [12, 17]}")]
    pub magnitudes: Option<BTreeMap<String, [f64; 2]>>,
    #[schemars(description = "Catalog data directory (default: configured location)")]
    pub catalog_dir: Option<String>,
    #[schemars(description = "Search program path (default: configured program)")]
    pub exefile: Option<String>,
}

fn cone_query(
    ra: f64,
    dec: f64,
    radius_arcsec: f64,
    max: Option<usize>,
    magnitudes: Option<BTreeMap<String, [f64; 2]>>,
) -> ConeQuery {
    let mag: MagnitudeFilter = magnitudes
        .unwrap_or_default()
        .into_iter()
        .map(|(band, [lo, hi])| (band, MagnitudeRange::new(lo, hi)))
        .collect();

    ConeQuery {
        ra,
        dec,
        radius_arcsec,
        max,
        mag,
    }
}

impl GaiaQueryInput {
    pub fn to_query(&self) -> ConeQuery {
        cone_query(self.ra, self.dec, self.radius_arcsec, self.max, self.magnitudes.clone())
    }
}

impl LocalQueryInput {
    pub fn to_query(&self) -> ConeQuery {
        cone_query(self.ra, self.dec, self.radius_arcsec, self.max, self.magnitudes.clone())
    }

    pub fn overrides(&self) -> LocalOverrides {
        LocalOverrides {
            catalog_dir: self.catalog_dir.as_ref().map(PathBuf::from),
            exefile: self.exefile.as_ref().map(PathBuf::from),
        }
    }
}

fn schema_to_value<T: schemars::JsonSchema>() -> Arc<serde_json::Map<String, Value>> {
    let schema = schema_for!(T);
    match serde_json::to_value(schema) {
        Ok(Value::Object(map)) => Arc::new(map),
        _ => Arc::new(serde_json::Map::new()),
    }
}

fn empty_schema() -> Arc<serde_json::Map<String, Value>> {
    let mut map = serde_json::Map::new();
    map.insert("type".into(), Value::String("object".into()));
    map.insert("properties".into(), Value::Object(serde_json::Map::new()));
    Arc::new(map)
}

fn error_response(error: &CatalogError) -> String {
    json!({
        "success": false,
        "error": error.to_string()
    })
    .to_string()
}

/// Each star carries its own `catalog` tag so results from several tools can be merged
fn stars_response<S: Into<StarRecord>>(catalog: Catalog, stars: Vec<S>) -> String {
    let stars: Vec<StarRecord> = stars.into_iter().map(Into::into).collect();
    let response = json!({
        "success": true,
        "catalog": catalog,
        "count": stars.len(),
        "stars": stars
    });
    serde_json::to_string_pretty(&response).unwrap_or_else(|e| {
        json!({
            "success": false,
            "error": format!("Failed to serialize stars: {}", e)
        })
        .to_string()
    })
}

fn parse_input<T: DeserializeOwned>(args: Value) -> Result<T, rmcp::ErrorData> {
    serde_json::from_value(args).map_err(|e| rmcp::ErrorData::invalid_params(e.to_string(), None))
}

/// Catalog queries block on the network or a child process, keep them off the runtime threads
async fn run_blocking<F>(task: F) -> Result<String, rmcp::ErrorData>
where
    F: FnOnce() -> String + Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|e| rmcp::ErrorData::internal_error(e.to_string(), None))
}

/// MCP Server for star catalog queries
#[derive(Clone)]
pub struct CatalogServer {
    config: Arc<CatalogConfig>,
    executor: Arc<dyn CommandExecutor + Send + Sync>,
}

impl CatalogServer {
    pub fn new(config: CatalogConfig) -> Self {
        Self::with_executor(config, Arc::new(SystemExecutor))
    }

    pub fn with_executor(
        config: CatalogConfig,
        executor: Arc<dyn CommandExecutor + Send + Sync>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            executor,
        }
    }

    fn query_gaia(&self, input: GaiaQueryInput) -> String {
        let catalog = match GaiaCatalog::new(self.config.gaia.clone()) {
            Ok(c) => c,
            Err(e) => return error_response(&e),
        };

        match catalog.query(&input.to_query()) {
            Ok(stars) => stars_response(Catalog::Gaia, stars),
            Err(e) => {
                tracing::warn!("Gaia query failed: {}", e);
                error_response(&e)
            }
        }
    }

    fn query_gsc23(&self, input: LocalQueryInput) -> String {
        let catalog = Gsc23Catalog::with_executor(self.config.gsc23.clone(), self.executor.clone());

        match catalog.query_with(&input.to_query(), &input.overrides()) {
            Ok(stars) => stars_response(Catalog::Gsc23, stars),
            Err(e) => {
                tracing::warn!("GSC2.3 query failed: {}", e);
                error_response(&e)
            }
        }
    }

    fn query_nomad1(&self, input: LocalQueryInput) -> String {
        let catalog =
            Nomad1Catalog::with_executor(self.config.nomad1.clone(), self.executor.clone());

        match catalog.query_with(&input.to_query(), &input.overrides()) {
            Ok(stars) => stars_response(Catalog::Nomad1, stars),
            Err(e) => {
                tracing::warn!("NOMAD1 query failed: {}", e);
                error_response(&e)
            }
        }
    }

    fn list_catalogs(&self) -> String {
        let catalogs: Vec<Value> = Catalog::all()
            .iter()
            .map(|catalog| {
                let location = match catalog {
                    Catalog::Gaia => json!({
                        "tap_url": self.config.gaia.tap_url,
                        "table": self.config.gaia.table
                    }),
                    Catalog::Gsc23 => json!({
                        "exe": self.config.gsc23.exe,
                        "data_dir": self.config.gsc23.data_dir
                    }),
                    Catalog::Nomad1 => json!({
                        "exe": self.config.nomad1.exe,
                        "data_dir": self.config.nomad1.data_dir
                    }),
                };
                let bands: Vec<String> = catalog
                    .supported_bands()
                    .iter()
                    .map(|b| b.to_string())
                    .collect();

                json!({
                    "catalog": catalog,
                    "name": catalog.to_string(),
                    "bands": bands,
                    "location": location
                })
            })
            .collect();

        let response = json!({
            "success": true,
            "catalogs": catalogs
        });

        serde_json::to_string_pretty(&response).unwrap_or_else(|e| {
            json!({
                "success": false,
                "error": e.to_string()
            })
            .to_string()
        })
    }

    fn get_tools(&self) -> Vec<Tool> {
        vec![
            Tool::new(
                "query_gaia",
                "Cone search in Gaia DR3 through the ESA archive. Returns designation, packed RA/Dec and BP/RP magnitudes.",
                schema_to_value::<GaiaQueryInput>(),
            ),
            Tool::new(
                "query_gsc23",
                "Cone search in the local GSC2.3 catalog. Returns F, J, V, N, U, B magnitudes and distance for each star.",
                schema_to_value::<LocalQueryInput>(),
            ),
            Tool::new(
                "query_nomad1",
                "Cone search in the local NOMAD1 catalog. Returns B, V, R, J, H, K magnitudes and distance for each star.",
                schema_to_value::<LocalQueryInput>(),
            ),
            Tool::new(
                "list_catalogs",
                "List available catalogs, their magnitude bands and configured locations.",
                empty_schema(),
            ),
        ]
    }
}

impl ServerHandler for CatalogServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(
                "Star catalog cone searches. Use list_catalogs to see which magnitude bands each \
                 catalog supports, then query_gaia, query_gsc23 or query_nomad1 with a position \
                 in degrees and a radius in arcseconds."
                    .to_string(),
            ),
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::ErrorData> {
        Ok(ListToolsResult {
            tools: self.get_tools(),
            next_cursor: None,
            meta: None,
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        let args: Value = Value::Object(request.arguments.clone().unwrap_or_default());

        let result = match request.name.as_ref() {
            "query_gaia" => {
                let input: GaiaQueryInput = parse_input(args)?;
                let server = self.clone();
                run_blocking(move || server.query_gaia(input)).await?
            }
            "query_gsc23" => {
                let input: LocalQueryInput = parse_input(args)?;
                let server = self.clone();
                run_blocking(move || server.query_gsc23(input)).await?
            }
            "query_nomad1" => {
                let input: LocalQueryInput = parse_input(args)?;
                let server = self.clone();
                run_blocking(move || server.query_nomad1(input)).await?
            }
            "list_catalogs" => self.list_catalogs(),
            _ => {
                return Err(rmcp::ErrorData::invalid_params(
                    format!("Unknown tool: {}", request.name),
                    None,
                ))
            }
        };

        Ok(CallToolResult::success(vec![Content::text(result)]))
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::sync::Mutex;

    use super::*;
    use crate::error::Result;

    struct CannedExecutor {
        output: &'static str,
        calls: Mutex<Vec<Vec<String>>>,
    }

    impl CommandExecutor for CannedExecutor {
        fn run(&self, _program: &Path, args: &[String]) -> Result<Vec<u8>> {
            self.calls.lock().unwrap().push(args.to_vec());
            Ok(self.output.as_bytes().to_vec())
        }
    }

    fn server(output: &'static str) -> (CatalogServer, Arc<CannedExecutor>) {
        let executor = Arc::new(CannedExecutor {
            output,
            calls: Mutex::new(Vec::new()),
        });
        let server = CatalogServer::with_executor(CatalogConfig::default(), executor.clone());
        (server, executor)
    }

    fn local_input(value: Value) -> LocalQueryInput {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_query_gsc23_tool() {
        let (server, executor) =
            server("#hdr\n1| 10.0 20.0 |12.3|---|14.1|15.0|16.2|13.9|G|1.0|+0.5\n");

        let input = local_input(json!({
            "ra": 10.0,
            "dec": 20.0,
            "radius_arcsec": 30.0,
            "magnitudes": {"V": [10.0, 16.0]},
            "catalog_dir": "/tmp/gsc"
        }));
        let response: Value = serde_json::from_str(&server.query_gsc23(input)).unwrap();

        assert_eq!(response["success"], true);
        assert_eq!(response["catalog"], "gsc23");
        assert_eq!(response["count"], 1);
        assert_eq!(response["stars"][0]["catalog"], "gsc23");
        assert_eq!(response["stars"][0]["radec"], "10.0");
        assert!(response["stars"][0]["jmag"].is_null());

        let calls = executor.calls.lock().unwrap();
        assert_eq!(calls[0][1], "/tmp/gsc");
        assert_eq!(calls[0][8], "-lV");
    }

    #[test]
    fn test_empty_overrides_and_zero_max_use_defaults() {
        let (server, executor) = server("");
        let input = local_input(json!({
            "ra": 10.0,
            "dec": 20.0,
            "radius_arcsec": 30.0,
            "max": 0,
            "catalog_dir": "",
            "exefile": ""
        }));
        let response: Value = serde_json::from_str(&server.query_nomad1(input)).unwrap();

        assert_eq!(response["success"], true);
        assert_eq!(response["count"], 0);
        let calls = executor.calls.lock().unwrap();
        assert_eq!(calls[0][1], "/data/catalogs/nomad1");
        assert_eq!(calls[0][7], "1000");
    }

    #[test]
    fn test_query_nomad1_bad_band() {
        let (server, executor) = server("");
        let input = local_input(json!({
            "ra": 10.0,
            "dec": -20.0,
            "radius_arcsec": 30.0,
            "magnitudes": {"U": [10.0, 16.0]}
        }));
        let response: Value = serde_json::from_str(&server.query_nomad1(input)).unwrap();

        assert_eq!(response["success"], false);
        assert_eq!(
            response["error"],
            "Magnitude band U not available in NOMAD1 catalog"
        );
        assert!(executor.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_list_catalogs() {
        let (server, _) = server("");
        let response: Value = serde_json::from_str(&server.list_catalogs()).unwrap();

        let catalogs = response["catalogs"].as_array().unwrap();
        assert_eq!(catalogs.len(), 3);
        assert_eq!(catalogs[0]["bands"], json!(["B", "R"]));
        assert_eq!(catalogs[2]["bands"], json!(["B", "V", "R", "J", "H", "K"]));
        assert_eq!(catalogs[1]["name"], "GSC");
        assert_eq!(catalogs[1]["location"]["exe"], "gsc23");
        assert_eq!(catalogs[0]["location"]["table"], "gaiadr3.gaia_source");
    }

    #[test]
    fn test_tools_listed() {
        let (server, _) = server("");
        let names: Vec<String> = server
            .get_tools()
            .iter()
            .map(|t| t.name.to_string())
            .collect();
        assert_eq!(
            names,
            vec!["query_gaia", "query_gsc23", "query_nomad1", "list_catalogs"]
        );
    }
}
