use serde::Deserialize;

/// Main configuration structure for Fieldrake
///
/// Every field has a built-in default, so a config file only needs to name
/// the settings it overrides and may be omitted entirely.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub fetcher: FetcherConfig,
    pub pipeline: PipelineConfig,
    pub output: OutputConfig,
}

/// HTTP fetcher configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetcherConfig {
    /// User-Agent header sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Accept header sent with every request
    pub accept: String,

    /// Accept-Language header sent with every request
    #[serde(rename = "accept-language")]
    pub accept_language: String,

    /// Total request timeout in seconds
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// Connection establishment timeout in seconds
    #[serde(rename = "connect-timeout-secs")]
    pub connect_timeout_secs: u64,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        FetcherConfig {
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:129.0) \
                         Gecko/20100101 Firefox/129.0"
                .to_string(),
            accept: "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,\
                     image/webp,image/png,image/svg+xml,*/*;q=0.8"
                .to_string(),
            accept_language: "en-US,en;q=0.5".to_string(),
            timeout_secs: 30,
            connect_timeout_secs: 10,
        }
    }
}

/// Pipeline behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Number of concurrent page and asset fetches
    pub workers: u32,

    /// Upper bound on adaptive page discovery, overriding the site default
    #[serde(rename = "page-ceiling")]
    pub page_ceiling: Option<u32>,

    /// Whether the asset download round runs at all
    #[serde(rename = "fetch-assets")]
    pub fetch_assets: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            workers: 4,
            page_ceiling: None,
            fetch_assets: true,
        }
    }
}

/// Output location configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory the CSV file is written into
    pub directory: String,

    /// Directory for downloaded assets, overriding the site default
    #[serde(rename = "assets-directory")]
    pub assets_directory: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            directory: ".".to_string(),
            assets_directory: None,
        }
    }
}
