//! Command line agents: ask Gemini a question and save the answer as a
//! markdown report, or log stock prices to a JSON history.

#[macro_use]
extern crate tracing;

use std::path::PathBuf;
use std::pin::pin;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use grounded_agents::gemini::{
    CompletionClient, GeminiConfigBuilder, HttpTransport,
};
use grounded_agents::model::{
    CompletionRequest, CredentialProvider, ResponseFormat, StaticCredential,
};
use grounded_agents::{
    DEFAULT_TICKERS, FileCredentialProvider, STOCKS_MODEL, Task, TaskOutput,
};
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use tokio::select;
use tokio::time::sleep;

#[derive(Parser)]
#[command(name = "grounded-agents")]
#[command(about = "Ask Gemini and save the answer as markdown", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// File holding the API key (falls back to GEMINI_API_KEY)
    #[arg(long, global = true, default_value = "api_key.txt")]
    key_file: PathBuf,

    /// Where the report is written
    #[arg(short, long, global = true, default_value = "response.md")]
    output: PathBuf,

    /// API base URL
    #[arg(long, global = true, env = "GEMINI_BASE_URL")]
    base_url: Option<String>,

    /// Model used for grounded search
    #[arg(long, global = true, env = "GEMINI_SEARCH_MODEL")]
    search_model: Option<String>,

    /// Directory for dumping raw request and response bodies
    #[arg(long, global = true, env = "GEMINI_DUMP_DIR")]
    dump_dir: Option<PathBuf>,

    /// Abort requests after this many seconds
    #[arg(long, global = true, value_parser = clap::value_parser!(u64).range(1..))]
    timeout_secs: Option<u64>,
}

#[derive(Subcommand)]
enum Command {
    #[command(about = "Send a prompt, optionally seeded with web search results")]
    Ask {
        prompt: String,

        #[arg(short, long, default_value = "gemini-1.5-flash")]
        model: String,

        #[arg(short, long, default_value_t = 0.7)]
        temperature: f64,

        /// Ask for an application/json answer
        #[arg(long)]
        json: bool,

        /// Seed the prompt with a grounded search answer
        #[arg(long)]
        search: bool,
    },

    #[command(about = "Search the web and list the references")]
    Search { prompt: String },

    #[command(about = "Append the current stock prices to a JSON history")]
    Stocks {
        /// Comma separated ticker symbols
        #[arg(long, value_delimiter = ',', default_values_t = DEFAULT_TICKERS.map(String::from))]
        tickers: Vec<String>,

        /// JSON file holding the price history
        #[arg(long, default_value = "response.json")]
        history: PathBuf,

        #[arg(short, long, default_value = STOCKS_MODEL)]
        model: String,
    },
}

impl Command {
    fn into_task(self) -> Task {
        match self {
            Command::Ask {
                prompt,
                model,
                temperature,
                json,
                search,
            } => {
                let format = if json {
                    ResponseFormat::Json
                } else {
                    ResponseFormat::Plain
                };
                Task::Ask(
                    CompletionRequest::new(model, prompt)
                        .with_temperature(temperature)
                        .with_response_format(format)
                        .with_search(search),
                )
            }
            Command::Search { prompt } => Task::Search(prompt),
            Command::Stocks { tickers, model, .. } => {
                Task::Stocks { model, tickers }
            }
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    // Resolve the key before the spinner starts, the provider may prompt.
    let api_key = match FileCredentialProvider::new(&cli.key_file)
        .interactive(true)
        .api_key()
    {
        Ok(api_key) => api_key,
        Err(err) => {
            eprintln!("Falha ao obter a chave API: {err}");
            return ExitCode::FAILURE;
        }
    };

    let transport = match cli.timeout_secs {
        Some(secs) => match HttpTransport::with_timeout(Duration::from_secs(secs)) {
            Ok(transport) => transport,
            Err(err) => {
                eprintln!("{err}");
                return ExitCode::FAILURE;
            }
        },
        None => HttpTransport::new(),
    };

    let mut config = GeminiConfigBuilder::new();
    if let Some(base_url) = cli.base_url {
        config = config.with_base_url(base_url);
    }
    if let Some(search_model) = cli.search_model {
        config = config.with_search_model(search_model);
    }
    if let Some(dump_dir) = cli.dump_dir {
        config = config.with_dump_dir(dump_dir);
    }

    let client = CompletionClient::new(
        transport,
        StaticCredential::new(api_key),
        config.build(),
    );
    let output_path = match &cli.command {
        Command::Stocks { history, .. } => history.clone(),
        _ => cli.output,
    };
    let task = cli.command.into_task();

    let progress_style = ProgressStyle::with_template("{spinner} {wide_msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏");
    let progress_bar = ProgressBar::new_spinner();
    progress_bar.set_style(progress_style);
    progress_bar.set_message("🤔 Consultando o Gemini...");

    let mut task_fut = pin!(task.run(&client));
    let result = loop {
        select! {
            result = &mut task_fut => break result,
            _ = sleep(Duration::from_millis(100)) => progress_bar.inc(1),
        }
    };
    progress_bar.finish_and_clear();

    let output = match result {
        Ok(output) => output,
        Err(err) => {
            eprintln!("{} Erro ao invocar Gemini: {err}", "✗".bright_red());
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = output.save(&output_path).await {
        error!("failed to write {}: {err}", output_path.display());
        eprintln!("{} Erro ao gravar resposta: {err}", "✗".bright_red());
        return ExitCode::FAILURE;
    }

    match output {
        TaskOutput::Report(_) => println!(
            "{} Resposta salva em {}",
            "✔".bright_green(),
            output_path.display().bright_white()
        ),
        TaskOutput::Prices(entry) => println!(
            "{} Preços das ações salvos em {} às {}",
            "✔".bright_green(),
            output_path.display().bright_white(),
            entry.timestamp
        ),
    }
    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_timeout_rejected() {
        let args = ["grounded-agents", "--timeout-secs", "0", "search", "x"];
        assert!(Cli::try_parse_from(args).is_err());

        let args = ["grounded-agents", "--timeout-secs", "30", "search", "x"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.timeout_secs, Some(30));
    }

    #[test]
    fn test_stocks_defaults() {
        let cli = Cli::try_parse_from(["grounded-agents", "stocks"]).unwrap();
        let Command::Stocks { history, .. } = &cli.command else {
            panic!("expected the stocks command");
        };
        assert_eq!(history, &PathBuf::from("response.json"));
        assert_eq!(
            cli.command.into_task(),
            Task::Stocks {
                model: STOCKS_MODEL.to_owned(),
                tickers: vec!["AAPL".into(), "MSFT".into(), "GOOGL".into()],
            }
        );

        let cli = Cli::try_parse_from([
            "grounded-agents",
            "stocks",
            "--tickers",
            "NVDA,TSLA",
        ])
        .unwrap();
        let Task::Stocks { tickers, .. } = cli.command.into_task() else {
            panic!("expected a stocks task");
        };
        assert_eq!(tickers, ["NVDA", "TSLA"]);
    }
}
