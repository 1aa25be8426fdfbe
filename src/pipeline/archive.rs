//! Remote dataset source: NASA Exoplanet Archive TAP queries

use std::io::Cursor;
use std::time::Duration;

use polars::prelude::*;
use reqwest::blocking::Client;
use thiserror::Error;

use crate::utils::{print_info, print_warning};

/// Default archive endpoint.
pub const DEFAULT_ARCHIVE_URL: &str = "https://exoplanetarchive.ipac.caltech.edu";

/// Columns holding logarithmic (dex) quantities whose unit annotations get stripped
/// before caching.
pub const DEX_COLUMNS: [&str; 6] = [
    "st_lum",
    "st_lumerr1",
    "st_lumerr2",
    "st_logg",
    "st_loggerr1",
    "st_loggerr2",
];

/// Errors raised while fetching a dataset from a remote source.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Invalid table name '{0}': only ASCII letters, digits and '_' are allowed")]
    InvalidTableName(String),

    #[error("Request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Archive returned HTTP {status} for table '{table}': {body}")]
    Status {
        table: String,
        status: u16,
        body: String,
    },

    #[error("Archive returned an empty response for table '{0}'")]
    EmptyResponse(String),

    #[error("Failed to parse archive response for table '{table}': {source}")]
    Parse {
        table: String,
        #[source]
        source: PolarsError,
    },
}

/// Anything that can produce a named table on demand.
pub trait DatasetSource {
    /// Fetch the full contents of `table`.
    fn fetch(&self, table: &str) -> Result<DataFrame, FetchError>;
}

/// Connection settings for the archive
#[derive(Debug, Clone)]
pub struct ArchiveConfig {
    pub base_url: String,
    pub timeout: Duration,
    /// Rows used for schema inference when parsing the response
    pub infer_schema_length: Option<usize>,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_ARCHIVE_URL.to_string(),
            timeout: Duration::from_secs(300),
            infer_schema_length: Some(10_000),
        }
    }
}

/// Blocking client for the NASA Exoplanet Archive TAP service.
pub struct NasaExoplanetArchive {
    client: Client,
    config: ArchiveConfig,
}

impl NasaExoplanetArchive {
    pub fn new() -> Result<Self, FetchError> {
        Self::with_config(ArchiveConfig::default())
    }

    pub fn with_config(config: ArchiveConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|source| FetchError::Http {
                url: config.base_url.clone(),
                source,
            })?;

        Ok(Self { client, config })
    }

    /// TAP synchronous query endpoint
    pub fn endpoint(&self) -> String {
        format!("{}/TAP/sync", self.config.base_url.trim_end_matches('/'))
    }
}

impl DatasetSource for NasaExoplanetArchive {
    fn fetch(&self, table: &str) -> Result<DataFrame, FetchError> {
        validate_table_name(table)?;

        let url = self.endpoint();
        let query = format!("select * from {}", table);

        let response = self
            .client
            .get(&url)
            .query(&[("query", query.as_str()), ("format", "csv")])
            .send()
            .map_err(|source| FetchError::Http {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(FetchError::Status {
                table: table.to_string(),
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }

        let bytes = response
            .bytes()
            .map_err(|source| FetchError::Http { url, source })?;
        if bytes.iter().all(|b| b.is_ascii_whitespace()) {
            return Err(FetchError::EmptyResponse(table.to_string()));
        }

        parse_csv_bytes(bytes.to_vec(), self.config.infer_schema_length).map_err(|source| {
            FetchError::Parse {
                table: table.to_string(),
                source,
            }
        })
    }
}

/// TAP table names are interpolated into the query, so keep them to identifiers
pub fn validate_table_name(table: &str) -> Result<(), FetchError> {
    let valid = !table.is_empty()
        && table
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(())
    } else {
        Err(FetchError::InvalidTableName(table.to_string()))
    }
}

fn parse_csv_bytes(bytes: Vec<u8>, infer_schema_length: Option<usize>) -> PolarsResult<DataFrame> {
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(infer_schema_length)
        .into_reader_with_file_handle(Cursor::new(bytes))
        .finish()
}

/// Parse a dex-annotated value such as `"-0.12 dex"` or `"1.3 [dex]"`
pub fn parse_dex_value(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    let number = ["[dex]", "(dex)", "dex"]
        .iter()
        .find_map(|unit| trimmed.strip_suffix(unit))
        .unwrap_or(trimmed)
        .trim();
    number.parse::<f64>().ok()
}

/// Strip unit annotations from the dex columns of `df`.
///
/// Text dex columns are converted to `f64`, dropping their unit suffix; numeric
/// ones are already unitless and stay as they are. A text column with any value that
/// does not parse is left untouched. Returns the processed column names.
pub fn strip_dex_units(df: &mut DataFrame) -> PolarsResult<Vec<String>> {
    let mut processed = Vec::new();

    for name in DEX_COLUMNS {
        let Some(column) = df.column(name).ok() else {
            continue;
        };
        if column.dtype() != &DataType::String {
            continue;
        }

        let mut unparsed = 0usize;
        let values: Float64Chunked = column
            .str()?
            .into_iter()
            .map(|v| match v.map(str::trim) {
                None | Some("") => None,
                Some(text) => {
                    let parsed = parse_dex_value(text);
                    if parsed.is_none() {
                        unparsed += 1;
                    }
                    parsed
                }
            })
            .collect();

        // Never trade a value for a null
        if unparsed > 0 {
            print_warning(&format!(
                "Column {} left as text: {} value(s) are not dex numbers",
                name, unparsed
            ));
            continue;
        }
        df.with_column(values.with_name(name.into()).into_series())?;

        print_info(&format!(
            "Processed column {} to remove unit conversion metadata",
            name
        ));
        processed.push(name.to_string());
    }

    Ok(processed)
}
