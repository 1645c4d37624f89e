use std::io;
use std::path::Path;

use chrono::{DateTime, Local};
use grounded_agents_model::{CompletionRequest, Error, ResponseFormat};
use serde::Serialize;
use serde_json::{Map, Value};
use tokio::fs;

/// Model asked for stock prices. It must support grounded search.
pub const STOCKS_MODEL: &str = "gemini-2.5-flash-preview-04-17";

/// Tickers logged when none are given.
pub const DEFAULT_TICKERS: [&str; 3] = ["AAPL", "MSFT", "GOOGL"];

const STOCKS_TEMPERATURE: f64 = 1.0;

/// One record of the price history.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StockEntry {
    /// ISO 8601 time with offset, e.g. `2025-05-02T14:30:00-03:00`.
    pub timestamp: String,
    /// Prices keyed by ticker, as returned by the model.
    pub stocks: Map<String, Value>,
}

impl StockEntry {
    /// Creates an entry stamped with `timestamp`.
    #[inline]
    pub fn new(stocks: Map<String, Value>, timestamp: &DateTime<Local>) -> Self {
        Self {
            timestamp: timestamp.to_rfc3339(),
            stocks,
        }
    }
}

/// Builds the search-seeded JSON completion asking for the prices of
/// `tickers`.
pub fn stocks_request<S: AsRef<str>>(model: &str, tickers: &[S]) -> CompletionRequest {
    let list = tickers
        .iter()
        .map(|ticker| ticker.as_ref())
        .collect::<Vec<_>>()
        .join(", ");
    let example = tickers
        .iter()
        .map(|ticker| format!("\"{}\": 100.00", ticker.as_ref()))
        .collect::<Vec<_>>()
        .join(", ");
    let prompt = format!(
        "Provide the current stock prices in USD for {list} in JSON format. \
         Return an object with ticker symbols as keys and prices as numbers. \
         Example: {{{example}}}"
    );

    CompletionRequest::new(model, prompt)
        .with_temperature(STOCKS_TEMPERATURE)
        .with_response_format(ResponseFormat::Json)
        .with_search(true)
}

/// Parses the model's answer, which must be a JSON object.
pub fn parse_stock_prices(text: &str) -> Result<Map<String, Value>, Error> {
    match serde_json::from_str(text) {
        Ok(Value::Object(stocks)) => Ok(stocks),
        Ok(other) => Err(Error::response_shape()
            .with_reason(format!("expected a JSON object, got `{other}`"))),
        Err(err) => Err(Error::response_shape()
            .with_reason(format!("stock prices are not JSON: {err}"))),
    }
}

/// Appends `entry` to the JSON array stored at `path`, creating the file
/// if needed. The file is rewritten pretty-printed.
pub async fn append_history(path: &Path, entry: &StockEntry) -> io::Result<()> {
    let mut history: Vec<Value> = match fs::read_to_string(path).await {
        Ok(content) => serde_json::from_str(&content)?,
        Err(err) if err.kind() == io::ErrorKind::NotFound => vec![],
        Err(err) => return Err(err),
    };
    history.push(serde_json::to_value(entry)?);

    fs::write(path, serde_json::to_string_pretty(&history)?).await?;
    debug!("appended entry {} to {}", history.len(), path.display());
    Ok(())
}
