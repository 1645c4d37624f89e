//! Ready-to-run agents that prompt Gemini and save the answers.
//!
//! The crate includes a CLI tool for using in the terminal. The pieces it
//! is made of (credential lookup, tasks, reports, the stock price history)
//! can also be used as a library.

#![deny(missing_docs)]

#[macro_use]
extern crate tracing;

mod credentials;
mod report;
mod stocks;
mod task;

pub use credentials::FileCredentialProvider;
pub use report::{REPORT_TITLE, render_report, save_report};
pub use stocks::{
    DEFAULT_TICKERS, STOCKS_MODEL, StockEntry, append_history,
    parse_stock_prices, stocks_request,
};
pub use task::{Task, TaskOutput};

/// Re-exports of [`grounded_agents_gemini`] crate.
pub mod gemini {
    pub use grounded_agents_gemini::*;
}

/// Re-exports of [`grounded_agents_model`] crate.
pub mod model {
    pub use grounded_agents_model::*;
}
