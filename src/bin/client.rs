use std::{fs, path::PathBuf, process::ExitCode};

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use finance_tracker::{
    Transaction, TransactionForm, TransactionId,
    client::{ApiClient, ClientError, Session},
    view::{SortField, SortOrder, TransactionFilter, format_currency, render_report},
};

/// A command line client for the finance tracker server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The URL of the finance tracker server.
    #[arg(long, env = "FINANCE_TRACKER_URL", default_value = "http://127.0.0.1:3000")]
    server: String,

    /// The bearer token identifying you to the server.
    #[arg(long, env = "FINANCE_TRACKER_TOKEN", hide_env_values = true)]
    token: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print your transactions as a table.
    List(FilterArgs),
    /// Record a new transaction.
    Add(TransactionArgs),
    /// Change some fields of a transaction.
    Edit {
        /// The ID of the transaction to change.
        id: TransactionId,
        #[command(flatten)]
        fields: TransactionArgs,
    },
    /// Delete a transaction.
    Delete {
        /// The ID of the transaction to delete.
        id: TransactionId,
    },
    /// Import transactions from a CSV file with the columns date,description,category,amount,type.
    Import {
        /// The CSV file to import.
        file: PathBuf,
    },
    /// Export your transactions as CSV.
    Export {
        /// Where to write the CSV file, prints to stdout if not given.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Print expense totals per category and per month.
    Summary,
    /// Write an HTML report with the transaction table and expense charts.
    Report {
        /// Where to write the HTML file.
        #[arg(long, default_value = "report.html")]
        out: PathBuf,
        #[command(flatten)]
        filter: FilterArgs,
    },
}

#[derive(clap::Args, Debug)]
struct FilterArgs {
    /// Only show transactions whose description contains this text.
    #[arg(long, default_value = "")]
    search: String,
    /// Only show transactions in this category.
    #[arg(long, default_value = "")]
    category: String,
    /// Only show transactions of at least this amount.
    #[arg(long, default_value = "")]
    min_amount: String,
    /// Only show transactions of at most this amount.
    #[arg(long, default_value = "")]
    max_amount: String,
    /// Only show transactions on or after this date (YYYY-MM-DD).
    #[arg(long, default_value = "")]
    start_date: String,
    /// Only show transactions on or before this date (YYYY-MM-DD).
    #[arg(long, default_value = "")]
    end_date: String,
    /// The column to sort by.
    #[arg(long, value_enum, default_value_t = SortField::Date)]
    sort_by: SortField,
    /// The direction to sort in.
    #[arg(long, value_enum, default_value_t = SortOrder::Descending)]
    order: SortOrder,
}

impl FilterArgs {
    fn to_filter(&self) -> TransactionFilter {
        TransactionFilter::new()
            .search_text(&self.search)
            .category(&self.category)
            .min_amount(&self.min_amount)
            .max_amount(&self.max_amount)
            .start_date(&self.start_date)
            .end_date(&self.end_date)
            .sort_by(self.sort_by, self.order)
    }
}

#[derive(clap::Args, Debug)]
struct TransactionArgs {
    /// "income" or "expense".
    #[arg(long = "type")]
    kind: Option<String>,
    /// The category, e.g. "Food".
    #[arg(long)]
    category: Option<String>,
    /// The amount, e.g. 12.50.
    #[arg(long)]
    amount: Option<String>,
    /// What the transaction was for.
    #[arg(long)]
    description: Option<String>,
    /// When the transaction happened (YYYY-MM-DD).
    #[arg(long)]
    date: Option<String>,
}

impl From<TransactionArgs> for TransactionForm {
    fn from(args: TransactionArgs) -> Self {
        Self {
            kind: args.kind,
            category: args.category,
            amount: args.amount.map(serde_json::Value::String),
            description: args.description,
            date: args.date,
        }
    }
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("could not access {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("Error: {error}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<(), CliError> {
    let mut session = Session::new(ApiClient::new(&args.server, &args.token)?);

    match args.command {
        Command::List(filter) => {
            session.refresh().await?;
            print_table(&session.cache().table(&filter.to_filter()));
        }
        Command::Add(fields) => {
            let transaction = session.create(&fields.into()).await?;
            println!("Created transaction {}", transaction.id);
        }
        Command::Edit { id, fields } => {
            let transaction = session.update(id, &fields.into()).await?;
            println!("Updated transaction {}", transaction.id);
        }
        Command::Delete { id } => {
            session.delete(id).await?;
            println!("Transaction deleted");
        }
        Command::Import { file } => {
            let text = fs::read_to_string(&file).map_err(|source| CliError::Io {
                path: file.clone(),
                source,
            })?;
            let file_name = file
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| "transactions.csv".to_owned());

            let count = session.import_csv(&file_name, text).await?;
            println!("Imported {count} transactions");
        }
        Command::Export { out } => {
            let csv_text = session.api().export_csv().await?;

            match out {
                Some(path) => {
                    fs::write(&path, csv_text).map_err(|source| CliError::Io {
                        path: path.clone(),
                        source,
                    })?;
                    println!("Wrote {}", path.display());
                }
                None => print!("{csv_text}"),
            }
        }
        Command::Summary => {
            session.refresh().await?;
            print_summary(&session);
        }
        Command::Report { out, filter } => {
            session.refresh().await?;
            let report = render_report(session.cache().transactions(), &filter.to_filter());

            fs::write(&out, report).map_err(|source| CliError::Io {
                path: out.clone(),
                source,
            })?;
            println!("Wrote {}", out.display());
        }
    }

    Ok(())
}

fn print_table(rows: &[&Transaction]) {
    if rows.is_empty() {
        println!("No transactions found.");
        return;
    }

    println!(
        "{:>6}  {:<10}  {:<7}  {:<16}  {:>12}  Description",
        "ID", "Date", "Type", "Category", "Amount"
    );

    for transaction in rows {
        println!(
            "{:>6}  {:<10}  {:<7}  {:<16}  {:>12}  {}",
            transaction.id,
            transaction.occurred_on.to_string(),
            transaction.kind.as_str(),
            transaction.category,
            format_currency(transaction.amount),
            transaction.description
        );
    }
}

fn print_summary(session: &Session) {
    println!("Expenses by category");
    for total in session.cache().category_totals() {
        println!("  {:<16}  {:>12}", total.category, format_currency(total.total));
    }

    println!("Expenses by month");
    let monthly = session.cache().monthly_totals();
    for (label, total) in monthly.labels.iter().zip(&monthly.totals) {
        println!("  {:<16}  {:>12}", label, format_currency(*total));
    }
}
