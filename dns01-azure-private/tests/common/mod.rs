//! 共享测试工具和辅助函数

#![allow(dead_code)]

use std::collections::{BTreeSet, HashMap, HashSet};
use std::env;
use std::sync::{Arc, Mutex};

use dns01_azure_private::{AzurePrivateDnsProvider, Config, StaticTokenAuthorizer};
use serde_json::{Value, json};
use wiremock::matchers::path_regex;
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

/// 跳过测试的宏（当环境变量缺失时）
#[macro_export]
macro_rules! skip_if_no_credentials {
    ($($var:expr),+) => {
        $(
            if std::env::var($var).is_err() {
                eprintln!("跳过测试: 缺少环境变量 {}", $var);
                return;
            }
        )+
    };
}

/// 断言 `Option` 为 `Some`，并解包返回内部值（失败则直接让测试失败）。
#[macro_export]
macro_rules! require_some {
    ($expr:expr $(,)?) => {{
        let opt = $expr;
        assert!(opt.is_some(), "expected Some(..), got None");
        let Some(val) = opt else {
            return;
        };
        val
    }};
    ($expr:expr, $($msg:tt)+) => {{
        let opt = $expr;
        assert!(opt.is_some(), "{}", format_args!($($msg)+));
        let Some(val) = opt else {
            return;
        };
        val
    }};
}

/// 断言 `Result` 为 `Ok`，并解包返回内部值（失败则直接让测试失败）。
#[macro_export]
macro_rules! require_ok {
    ($expr:expr $(,)?) => {{
        let res = $expr;
        assert!(res.is_ok(), "expected Ok(..), got {res:?}");
        let Ok(val) = res else {
            return;
        };
        val
    }};
    ($expr:expr, $($msg:tt)+) => {{
        let res = $expr;
        assert!(
            res.is_ok(),
            "{}: {res:?}",
            format_args!($($msg)+)
        );
        let Ok(val) = res else {
            return;
        };
        val
    }};
}

pub const SUBSCRIPTION: &str = "00000000-0000-0000-0000-000000000001";
pub const RESOURCE_GROUP: &str = "dns-rg";
pub const TOKEN: &str = "test-token";

/// 生成唯一的测试子域名（用于真实环境）
pub fn generate_test_domain(zone: &str) -> String {
    let uuid = uuid::Uuid::new_v4();
    format!("test-{}.{zone}", &uuid.to_string()[..8])
}

/// Zone-path prefix the fake serves.
pub fn zones_prefix() -> String {
    format!(
        "/subscriptions/{SUBSCRIPTION}/resourceGroups/{RESOURCE_GROUP}/providers/Microsoft.Network/privateDnsZones"
    )
}

/// Configuration pointing at a mock server.
pub fn test_config(server: &MockServer) -> Config {
    let mut config = Config::new(SUBSCRIPTION, RESOURCE_GROUP);
    config.resource_manager_endpoint = server.uri();
    config
}

/// Provider using the static test token.
pub fn test_provider(config: Config) -> AzurePrivateDnsProvider {
    AzurePrivateDnsProvider::new(config, Arc::new(StaticTokenAuthorizer::new(TOKEN)))
        .expect("创建 provider 失败")
}

fn error_body(code: &str, message: &str) -> Value {
    json!({ "error": { "code": code, "message": message } })
}

#[derive(Default)]
struct FakeState {
    zones: HashSet<String>,
    /// (zone, relative name) -> `properties`
    record_sets: HashMap<(String, String), Value>,
    /// "METHOD path"
    requests: Vec<String>,
}

/// In-memory stand-in for the Private DNS management API of one resource group.
#[derive(Clone, Default)]
pub struct FakeAzure {
    state: Arc<Mutex<FakeState>>,
}

impl FakeAzure {
    pub fn with_zones(zones: &[&str]) -> Self {
        let fake = Self::default();
        fake.state.lock().unwrap().zones = zones.iter().map(|z| z.to_string()).collect();
        fake
    }

    /// Mounts the fake for every path under `/subscriptions/`.
    pub async fn mount(&self, server: &MockServer) {
        Mock::given(path_regex("^/subscriptions/"))
            .respond_with(self.clone())
            .mount(server)
            .await;
    }

    /// Seeds a TXT record set; each inner slice is one record's strings.
    pub fn seed(&self, zone: &str, name: &str, ttl: u32, records: &[&[&str]]) {
        let txt_records: Vec<Value> = records.iter().map(|r| json!({ "value": r })).collect();
        self.state.lock().unwrap().record_sets.insert(
            (zone.to_string(), name.to_string()),
            json!({ "ttl": ttl, "txtRecords": txt_records }),
        );
    }

    /// First string of every stored TXT record, or `None` if the set is absent.
    pub fn txt_values(&self, zone: &str, name: &str) -> Option<BTreeSet<String>> {
        let state = self.state.lock().unwrap();
        let properties = state.record_sets.get(&(zone.to_string(), name.to_string()))?;
        Some(
            properties["txtRecords"]
                .as_array()
                .into_iter()
                .flatten()
                .filter_map(|r| r["value"][0].as_str().map(str::to_string))
                .collect(),
        )
    }

    /// Raw `properties` of a stored record set.
    pub fn properties(&self, zone: &str, name: &str) -> Option<Value> {
        let state = self.state.lock().unwrap();
        state
            .record_sets
            .get(&(zone.to_string(), name.to_string()))
            .cloned()
    }

    pub fn record_set_count(&self) -> usize {
        self.state.lock().unwrap().record_sets.len()
    }

    /// Requests seen so far, formatted as `"METHOD relative-path"` where the
    /// path is relative to the `privateDnsZones` collection.
    pub fn requests(&self) -> Vec<String> {
        self.state.lock().unwrap().requests.clone()
    }

    fn handle(&self, method: &str, zone: &str, name: Option<&str>, body: &[u8]) -> ResponseTemplate {
        let mut state = self.state.lock().unwrap();
        let zone_exists = state.zones.contains(zone);

        let Some(name) = name else {
            // Zone resource
            return if method == "GET" && zone_exists {
                ResponseTemplate::new(200).set_body_json(json!({
                    "id": format!("{}/{zone}", zones_prefix()),
                    "name": zone,
                    "type": "Microsoft.Network/privateDnsZones",
                    "location": "global",
                }))
            } else {
                ResponseTemplate::new(404).set_body_json(error_body(
                    "ResourceNotFound",
                    &format!("The Resource 'Microsoft.Network/privateDnsZones/{zone}' was not found."),
                ))
            };
        };

        if !zone_exists {
            return ResponseTemplate::new(404).set_body_json(error_body(
                "ParentResourceNotFound",
                &format!("Can not perform requested operation on nested resource. Parent resource '{zone}' not found."),
            ));
        }

        let key = (zone.to_string(), name.to_string());
        match method {
            "GET" => match state.record_sets.get(&key) {
                Some(properties) => ResponseTemplate::new(200).set_body_json(json!({
                    "name": name,
                    "type": "Microsoft.Network/privateDnsZones/TXT",
                    "etag": "etag-1",
                    "properties": properties,
                })),
                None => ResponseTemplate::new(404).set_body_json(error_body(
                    "NotFound",
                    &format!("The resource record '{name}' does not exist in resource group."),
                )),
            },
            "PUT" => {
                let Ok(payload) = serde_json::from_slice::<Value>(body) else {
                    return ResponseTemplate::new(400)
                        .set_body_json(error_body("InvalidRequestFormat", "body is not JSON"));
                };
                let properties = payload["properties"].clone();
                state.record_sets.insert(key, properties.clone());
                ResponseTemplate::new(200).set_body_json(json!({
                    "name": name,
                    "type": "Microsoft.Network/privateDnsZones/TXT",
                    "etag": "etag-2",
                    "properties": properties,
                }))
            }
            "DELETE" => match state.record_sets.remove(&key) {
                Some(_) => ResponseTemplate::new(200),
                None => ResponseTemplate::new(204),
            },
            _ => ResponseTemplate::new(405),
        }
    }
}

impl Respond for FakeAzure {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let authorized = request
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            == Some(format!("Bearer {TOKEN}").as_str());
        if !authorized {
            return ResponseTemplate::new(401).set_body_json(error_body(
                "AuthenticationFailed",
                "Authentication failed. The 'Authorization' header is missing or invalid.",
            ));
        }

        let has_api_version = request
            .url
            .query_pairs()
            .any(|(k, v)| k == "api-version" && v == "2018-09-01");
        if !has_api_version {
            return ResponseTemplate::new(400)
                .set_body_json(error_body("MissingApiVersionParameter", "api-version missing"));
        }

        let method = request.method.as_str().to_string();
        let path = request.url.path().to_string();
        let prefix = format!("{}/", zones_prefix());
        let Some(rest) = path.strip_prefix(&prefix) else {
            return ResponseTemplate::new(404)
                .set_body_json(error_body("ResourceGroupNotFound", "unexpected scope"));
        };

        self.state
            .lock()
            .unwrap()
            .requests
            .push(format!("{method} {rest}"));

        let (zone, name) = match rest.split_once("/TXT/") {
            Some((zone, name)) => (zone, Some(name)),
            None => (rest, None),
        };
        self.handle(&method, zone, name, &request.body)
    }
}

/// 真实环境测试上下文
pub struct LiveContext {
    pub provider: AzurePrivateDnsProvider,
    pub zone: String,
}

impl LiveContext {
    /// 从环境变量创建（需要 AZURE_ZONE_NAME 指向一个已存在的 private zone）
    pub fn from_env() -> Option<Self> {
        let zone = env::var("AZURE_ZONE_NAME").ok()?;
        let provider = AzurePrivateDnsProvider::from_env().ok()?;
        Some(Self { provider, zone })
    }
}
