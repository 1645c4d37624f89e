use std::io;
use std::path::Path;

use chrono::Local;
use grounded_agents_gemini::CompletionClient;
use grounded_agents_model::{CompletionRequest, Error, Transport};

use crate::report::save_report;
use crate::stocks::{
    StockEntry, append_history, parse_stock_prices, stocks_request,
};

/// A single job for an agent.
#[derive(Clone, Debug, PartialEq)]
pub enum Task {
    /// Sends a completion request, optionally seeded with grounded search
    /// context.
    Ask(CompletionRequest),
    /// Asks the search model and renders the answer with its references.
    Search(String),
    /// Asks `model` for the current prices of `tickers`.
    Stocks {
        /// Model used for the search-seeded completion.
        model: String,
        /// Ticker symbols, e.g. `AAPL`.
        tickers: Vec<String>,
    },
}

/// What a finished [`Task`] produced.
#[derive(Clone, Debug, PartialEq)]
pub enum TaskOutput {
    /// Text saved as a markdown report.
    Report(String),
    /// A record appended to the stock price history.
    Prices(StockEntry),
}

impl TaskOutput {
    /// Writes the output to `path`. Reports replace the file, prices are
    /// appended to the history it holds.
    pub async fn save(&self, path: &Path) -> io::Result<()> {
        match self {
            TaskOutput::Report(text) => save_report(path, text).await,
            TaskOutput::Prices(entry) => append_history(path, entry).await,
        }
    }
}

impl Task {
    /// Runs the task. Nothing is written until [`TaskOutput::save`].
    pub async fn run<T: Transport>(
        &self,
        client: &CompletionClient<T>,
    ) -> Result<TaskOutput, Error> {
        match self {
            Task::Ask(req) => {
                info!(
                    "asking {} (search: {}, format: {:?})",
                    req.model, req.use_search, req.response_format
                );
                client.complete(req).await.map(TaskOutput::Report)
            }
            Task::Search(prompt) => {
                info!("searching");
                client
                    .search_formatter()
                    .search_and_format(prompt)
                    .await
                    .map(TaskOutput::Report)
            }
            Task::Stocks { model, tickers } => {
                info!("logging prices of {}", tickers.join(", "));
                let text = client.complete(&stocks_request(model, tickers)).await?;
                let stocks = parse_stock_prices(&text)
                    .inspect_err(|err| error!("bad stock prices: {err}"))?;
                Ok(TaskOutput::Prices(StockEntry::new(stocks, &Local::now())))
            }
        }
    }
}
