use std::path::PathBuf;

// XOR-obfuscated service credentials embedded at compile time.
// Set ROMDEX_IGDB_APIKEY, ROMDEX_SS_DEVID and ROMDEX_SS_DEVPASSWORD env vars
// when building.
include!(concat!(env!("OUT_DIR"), "/embedded_credentials.rs"));

fn deobfuscate(data: &[u8]) -> String {
    let decoded: Vec<u8> = data
        .iter()
        .enumerate()
        .map(|(i, b)| b ^ OBFUSCATION_KEY[i % OBFUSCATION_KEY.len()])
        .collect();
    String::from_utf8(decoded).expect("embedded credentials must be valid UTF-8")
}

fn embedded_igdb_api_key() -> Option<String> {
    EMBEDDED_IGDB_API_KEY.map(deobfuscate)
}

fn embedded_ss_dev_id() -> Option<String> {
    EMBEDDED_SS_DEV_ID.map(deobfuscate)
}

fn embedded_ss_dev_password() -> Option<String> {
    EMBEDDED_SS_DEV_PASSWORD.map(deobfuscate)
}

/// Returns true if an IGDB key was embedded at compile time.
pub fn has_embedded_igdb_key() -> bool {
    EMBEDDED_IGDB_API_KEY.is_some()
}

/// Returns true if ScreenScraper dev credentials were embedded at compile time.
pub fn has_embedded_ss_dev_credentials() -> bool {
    EMBEDDED_SS_DEV_ID.is_some() && EMBEDDED_SS_DEV_PASSWORD.is_some()
}

/// Credentials for the remote catalog services.
///
/// Per-service fields are optional here; each adapter checks for what it
/// needs at construction and reports a configuration error naming the
/// missing piece.
#[derive(Debug, Clone)]
pub struct Credentials {
    /// IGDB API key, sent as the `user-key` request header.
    pub igdb_api_key: Option<String>,
    /// ScreenScraper developer id/password pair.
    pub ss_dev_id: Option<String>,
    pub ss_dev_password: Option<String>,
    /// Software name reported to ScreenScraper.
    pub ss_soft_name: String,
    /// Optional ScreenScraper user account (raises the daily allowance).
    pub ss_user_id: Option<String>,
    pub ss_user_password: Option<String>,
}

/// TOML config file format.
#[derive(Debug, Default, serde::Deserialize, serde::Serialize)]
struct ConfigFile {
    igdb: Option<IgdbConfig>,
    screenscraper: Option<ScreenScraperConfig>,
}

#[derive(Debug, Default, serde::Deserialize, serde::Serialize)]
struct IgdbConfig {
    api_key: Option<String>,
}

#[derive(Debug, Default, serde::Deserialize, serde::Serialize)]
struct ScreenScraperConfig {
    dev_id: Option<String>,
    dev_password: Option<String>,
    soft_name: Option<String>,
    user_id: Option<String>,
    user_password: Option<String>,
}

impl Credentials {
    /// Load credentials from environment variables, the config file, or
    /// embedded defaults.
    ///
    /// Priority per field: env var > config file > embedded (compile-time).
    /// Nothing is required at load time; adapters validate their own fields.
    pub fn load() -> Self {
        Self::assemble(load_config_file())
    }

    fn assemble(config: Option<ConfigFile>) -> Self {
        let igdb = config.as_ref().and_then(|c| c.igdb.as_ref());
        let ss = config.as_ref().and_then(|c| c.screenscraper.as_ref());

        let igdb_api_key = std::env::var("ROMDEX_IGDB_APIKEY")
            .ok()
            .or_else(|| igdb.and_then(|c| c.api_key.clone()))
            .or_else(embedded_igdb_api_key);

        let ss_dev_id = std::env::var("ROMDEX_SS_DEVID")
            .ok()
            .or_else(|| ss.and_then(|c| c.dev_id.clone()))
            .or_else(embedded_ss_dev_id);

        let ss_dev_password = std::env::var("ROMDEX_SS_DEVPASSWORD")
            .ok()
            .or_else(|| ss.and_then(|c| c.dev_password.clone()))
            .or_else(embedded_ss_dev_password);

        let ss_soft_name = std::env::var("ROMDEX_SS_SOFTNAME")
            .ok()
            .or_else(|| ss.and_then(|c| c.soft_name.clone()))
            .unwrap_or_else(|| "romdex".to_string());

        let ss_user_id = std::env::var("ROMDEX_SS_SSID")
            .ok()
            .or_else(|| ss.and_then(|c| c.user_id.clone()));

        let ss_user_password = std::env::var("ROMDEX_SS_SSPASSWORD")
            .ok()
            .or_else(|| ss.and_then(|c| c.user_password.clone()));

        Self {
            igdb_api_key,
            ss_dev_id,
            ss_dev_password,
            ss_soft_name,
            ss_user_id,
            ss_user_password,
        }
    }
}

/// Return the path to the credentials config file.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("romdex").join("credentials.toml"))
}

fn load_config_file() -> Option<ConfigFile> {
    let path = config_path()?;
    let content = std::fs::read_to_string(&path).ok()?;
    toml::from_str(&content).ok()
}
