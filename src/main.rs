use clap::{Args, Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use payment_lifecycle::application::manager::PaymentLifecycleManager;
use payment_lifecycle::config::{DEFAULT_DUPLICATE_WINDOW_DAYS, ManagerConfig};
use payment_lifecycle::domain::context::PaymentContext;
use payment_lifecycle::domain::ports::{
    PaymentEntryStore, PaymentEntryStoreBox, PaymentStore, PaymentStoreBox, TransactionStoreBox,
};
use payment_lifecycle::domain::request::PaymentCancellationData;
use payment_lifecycle::error::PaymentError;
use payment_lifecycle::infrastructure::clock::SystemDateService;
use payment_lifecycle::infrastructure::in_memory::{
    InMemoryPaymentEntryStore, InMemoryPaymentStore, InMemoryTransactionStore,
};
use payment_lifecycle::infrastructure::payee::StaticPayeeDirectory;
use payment_lifecycle::interfaces::csv::entry_reader::PaymentEntryReader;
use payment_lifecycle::interfaces::csv::payee_reader::PayeeReader;
use payment_lifecycle::interfaces::json::request_reader::read_initiation_request;
use std::fs::File;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Duplicate-check a payment request and create it when no duplicate exists
    Submit {
        /// Payment initiation request (JSON)
        request: PathBuf,

        #[command(flatten)]
        common: CommonArgs,

        /// Mark the caller as holding approval rights
        #[arg(long)]
        approval: bool,
    },
    /// Build a cancellation record for a stored payment, enriched with payee details
    Cancel {
        /// Payment to cancel
        #[arg(long)]
        payment_id: i64,

        /// Payee directory CSV used to resolve payee details
        #[arg(long)]
        payees: Option<PathBuf>,

        /// Cancellation reason
        #[arg(long)]
        reason: Option<String>,

        #[command(flatten)]
        common: CommonArgs,
    },
}

#[derive(Args)]
struct CommonArgs {
    /// Client the caller acts for
    #[arg(long)]
    client_id: String,

    /// Acting user
    #[arg(long)]
    user_id: String,

    /// CSV of previously committed payment entries to load before running
    #[arg(long)]
    history: Option<PathBuf>,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long)]
    db_path: Option<PathBuf>,

    /// Days either side of an entry's date searched for duplicates
    #[arg(
        long,
        default_value_t = DEFAULT_DUPLICATE_WINDOW_DAYS,
        value_parser = clap::value_parser!(i64).range(0..)
    )]
    window_days: i64,
}

struct Stores {
    payments: PaymentStoreBox,
    entries: PaymentEntryStoreBox,
    transactions: TransactionStoreBox,
}

fn in_memory_stores() -> Stores {
    Stores {
        payments: Box::new(InMemoryPaymentStore::new()),
        entries: Box::new(InMemoryPaymentEntryStore::new()),
        transactions: Box::new(InMemoryTransactionStore::new()),
    }
}

#[cfg(feature = "storage-rocksdb")]
fn open_stores(db_path: Option<&Path>) -> Result<Stores> {
    use payment_lifecycle::infrastructure::rocksdb::RocksDBStore;

    match db_path {
        Some(path) => {
            let store = RocksDBStore::open(path).into_diagnostic()?;
            Ok(Stores {
                payments: Box::new(store.clone()),
                entries: Box::new(store.clone()),
                transactions: Box::new(store),
            })
        }
        None => Ok(in_memory_stores()),
    }
}

#[cfg(not(feature = "storage-rocksdb"))]
fn open_stores(db_path: Option<&Path>) -> Result<Stores> {
    if db_path.is_some() {
        eprintln!(
            "WARNING: Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to In-Memory storage."
        );
    }
    Ok(in_memory_stores())
}

/// Loads history entries and returns the highest payment id they reference.
async fn load_history(store: &dyn PaymentEntryStore, path: &Path, config: &ManagerConfig) -> Result<i64> {
    let file = File::open(path).into_diagnostic()?;
    let reader = PaymentEntryReader::new(file, config.date_formats.clone());
    let mut last_payment_id = 0;
    for entry in reader.entries() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                eprintln!("Error reading payment entry: {}", e);
                continue;
            }
        };
        let payment_id = entry.payment_id;
        match store.store(entry).await {
            Ok(()) => last_payment_id = last_payment_id.max(payment_id),
            Err(e @ PaymentError::Conflict(_)) => eprintln!("Error reading payment entry: {}", e),
            Err(e) => return Err(e).into_diagnostic(),
        }
    }
    Ok(last_payment_id)
}

async fn load_payees(directory: &StaticPayeeDirectory, path: &Path) -> Result<()> {
    let file = File::open(path).into_diagnostic()?;
    for payee in PayeeReader::new(file).payees() {
        match payee {
            Ok(payee) => directory.register(payee).await,
            Err(e) => eprintln!("Error reading payee: {}", e),
        }
    }
    Ok(())
}

async fn build_manager(
    common: &CommonArgs,
    payees: StaticPayeeDirectory,
) -> Result<PaymentLifecycleManager> {
    let config = ManagerConfig::default().with_duplicate_window_days(common.window_days);
    let stores = open_stores(common.db_path.as_deref())?;

    if let Some(history) = &common.history {
        let last_payment_id = load_history(stores.entries.as_ref(), history, &config).await?;
        stores
            .payments
            .advance_ids(last_payment_id)
            .await
            .into_diagnostic()?;
    }

    let date_service = SystemDateService::new(config.date_formats.clone());
    Ok(PaymentLifecycleManager::new(
        stores.payments,
        stores.entries,
        stores.transactions,
        Box::new(payees),
        Box::new(date_service),
    )
    .with_config(config))
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("payment_lifecycle=warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Submit {
            request,
            common,
            approval,
        } => {
            let manager = build_manager(&common, StaticPayeeDirectory::new()).await?;
            let context = PaymentContext::new(&common.client_id, &common.user_id).with_approval(approval);

            let request = read_initiation_request(File::open(request).into_diagnostic()?)
                .into_diagnostic()?;
            let outcome = manager
                .submit_payment(&context, request)
                .await
                .into_diagnostic()?;

            println!("{}", serde_json::to_string_pretty(&outcome).into_diagnostic()?);
        }
        Command::Cancel {
            payment_id,
            payees,
            reason,
            common,
        } => {
            let directory = StaticPayeeDirectory::new();
            if let Some(path) = &payees {
                load_payees(&directory, path).await?;
            }
            let manager = build_manager(&common, directory).await?;
            let context = PaymentContext::new(&common.client_id, &common.user_id);

            let payment = manager
                .fetch_payment(payment_id, &common.client_id, Some(&context))
                .await
                .into_diagnostic()?;

            let initiation = manager
                .fetch_initiation_data(&payment)
                .await
                .into_diagnostic()?;

            let mut cancellation = PaymentCancellationData {
                payment_id: payment.id,
                reason,
                additional_details: Vec::new(),
            };
            manager
                .populate_additional_details(&mut cancellation, &initiation)
                .await;

            println!("{}", serde_json::to_string_pretty(&cancellation).into_diagnostic()?);
        }
    }

    Ok(())
}
