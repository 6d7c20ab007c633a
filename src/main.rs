//! Bepawa CLI
//!
//! Command-line front end over the Bepawa session store:
//! - Seed the demo accounts
//! - Log in, log out, show the current session
//! - Register accounts and list the directory
//! - Print and export marketplace analytics
//!
//! "Local storage" is a JSON file in the data directory, so a session
//! started by `bepawa login` is still there for the next command.

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::rc::Rc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bepawa::access::{home_page, navigation};
use bepawa::analytics::{self, format_currency, ExportTable};
use bepawa::auth::{
    AuthError, CredentialDirectory, Identity, KvDirectory, NewIdentity, Profile, Role,
    SessionStore,
};
use bepawa::config::{generate_default_config, Config, DirectoryBackend, LoggingConfig};
use bepawa::storage::FileStore;

#[derive(Parser)]
#[command(name = "bepawa")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Bepawa pharmacy marketplace")]
#[command(long_about = "Bepawa connects individuals, pharmacies, wholesalers and labs.\nManage demo accounts, sessions and marketplace analytics from the terminal.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: search standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Data directory, overrides the config file
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Seed the demo accounts if the directory is empty
    Init,

    /// Log in
    Login {
        email: String,
        #[arg(short, long)]
        password: String,
    },

    /// Log out of the current session
    Logout,

    /// Show the current session
    Whoami,

    /// Register a new account (does not log in)
    Register {
        #[arg(long)]
        email: String,
        #[arg(short, long)]
        password: String,
        /// admin, individual, retail, wholesale or lab
        #[arg(short, long)]
        role: Role,
        #[arg(short, long, default_value = "")]
        name: String,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        address: Option<String>,
        #[arg(long)]
        license_number: Option<String>,
        #[arg(long)]
        business_registration: Option<String>,
        #[arg(long)]
        tax_id: Option<String>,
        #[arg(long)]
        pharmacist_in_charge: Option<String>,
        /// Lab test categories (repeatable)
        #[arg(long = "specialization")]
        specializations: Vec<String>,
    },

    /// List registered accounts
    Users,

    /// Show the sales analytics summary
    Analytics,

    /// Export an analytics table as CSV
    Export {
        /// monthly, products, weekly or categories
        table: ExportTable,
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

type CliSession = SessionStore<Box<dyn CredentialDirectory>, Rc<FileStore>>;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    if let Some(dir) = &cli.data_dir {
        config.storage.data_dir = dir.to_string_lossy().to_string();
    }

    init_logging(&config.logging);
    let json = cli.format == "json";

    match cli.command {
        Commands::Init => {
            let session = open_session(&config)?;
            let count = session.directory().records()?.len();
            if json {
                print_json(&serde_json::json!({ "accounts": count }))?;
            } else {
                println!("Directory ready with {} accounts", count);
                println!("Data directory: {}", config.storage.data_path().display());
            }
        }

        Commands::Login { email, password } => {
            let mut session = open_session(&config)?;
            match session.login(&email, &password) {
                Ok(identity) => {
                    if json {
                        print_json(&identity)?;
                    } else {
                        println!("Logged in as {} ({})", identity.display_name(), identity.role.label());
                        println!("Home: {}", home_page(identity.role).path());
                    }
                }
                Err(e) => fail(&e, json),
            }
        }

        Commands::Logout => {
            let mut session = open_session(&config)?;
            let was = session.current().map(|i| i.email.clone());
            session.logout();
            if json {
                print_json(&serde_json::json!({ "logged_out": was }))?;
            } else {
                match was {
                    Some(email) => println!("Logged out {}", email),
                    None => println!("No active session"),
                }
            }
        }

        Commands::Whoami => {
            let session = open_session(&config)?;
            match session.current() {
                Some(identity) if json => print_json(identity)?,
                Some(identity) => print_identity(identity),
                None if json => print_json(&serde_json::Value::Null)?,
                None => println!("Not logged in"),
            }
        }

        Commands::Register {
            email,
            password,
            role,
            name,
            phone,
            address,
            license_number,
            business_registration,
            tax_id,
            pharmacist_in_charge,
            specializations,
        } => {
            let mut session = open_session(&config)?;
            let profile = Profile {
                phone,
                address,
                license_number,
                business_registration,
                tax_id,
                pharmacist_in_charge,
                specializations,
                date_of_birth: None,
            };

            match session.register(NewIdentity::new(email, role, password).name(name).profile(profile)) {
                Ok(identity) => {
                    if json {
                        print_json(&identity)?;
                    } else if identity.is_approved {
                        println!("Registered {}. You can log in now.", identity.email);
                    } else {
                        println!(
                            "Registered {}. The account is pending approval before it can log in.",
                            identity.email
                        );
                    }
                }
                Err(e) => fail(&e, json),
            }
        }

        Commands::Users => {
            let session = open_session(&config)?;
            let identities: Vec<Identity> = session
                .directory()
                .records()?
                .into_iter()
                .map(Identity::from)
                .collect();

            if json {
                print_json(&identities)?;
            } else if identities.is_empty() {
                println!("No accounts registered yet.");
            } else {
                println!("{:<15} {:<30} {:<25} {:<20} {}", "ID", "Email", "Name", "Role", "Approved");
                println!("{}", "-".repeat(100));
                for identity in identities {
                    println!(
                        "{:<15} {:<30} {:<25} {:<20} {}",
                        identity.id,
                        identity.email,
                        identity.name,
                        identity.role.label(),
                        if identity.is_approved { "yes" } else { "pending" }
                    );
                }
            }
        }

        Commands::Analytics => {
            let data = analytics::wholesale_sales();
            let summary = analytics::summarize(&data);

            if json {
                print_json(&serde_json::json!({ "summary": summary, "data": data }))?;
            } else {
                print_analytics(&data, &summary);
            }
        }

        Commands::Export { table, output } => {
            let data = analytics::wholesale_sales();
            match output {
                Some(path) => {
                    let file = std::fs::File::create(&path)
                        .with_context(|| format!("creating {:?}", path))?;
                    analytics::export_csv(&data, table, file)?;
                    println!("Exported to {:?}", path);
                }
                None => analytics::export_csv(&data, table, std::io::stdout().lock())?,
            }
        }

        Commands::Config { output } => {
            let config = generate_default_config();

            match output {
                Some(path) => {
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, &config)?;
                    println!("Config written to {:?}", path);
                }
                None => {
                    print!("{}", config);
                }
            }
        }
    }

    Ok(())
}

fn init_logging(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("bepawa={}", logging.level).into());
    let json = logging.format == "json";

    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr)))
        .with((!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr)))
        .init();
}

/// Open local storage and the configured directory, then initialize the session
fn open_session(config: &Config) -> anyhow::Result<CliSession> {
    let data_dir = config.storage.data_path();
    let storage = Rc::new(
        FileStore::open(&data_dir).with_context(|| format!("opening local storage in {:?}", data_dir))?,
    );

    let directory: Box<dyn CredentialDirectory> = match config.storage.backend {
        DirectoryBackend::Json => Box::new(KvDirectory::with_key(
            Rc::clone(&storage),
            config.storage.directory_key.clone(),
        )),
        #[cfg(feature = "sqlite")]
        DirectoryBackend::Sqlite => Box::new(bepawa::auth::SqliteDirectory::open(&data_dir)?),
        #[cfg(not(feature = "sqlite"))]
        DirectoryBackend::Sqlite => anyhow::bail!("this build does not include the sqlite backend"),
    };

    let mut session = SessionStore::new(directory, storage)
        .session_key(config.storage.session_key.clone())
        .hasher(config.auth.hasher()?)
        .seed_demo_accounts(config.auth.seed_demo_accounts);
    session.initialize();

    Ok(session)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn fail(err: &AuthError, json: bool) -> ! {
    if json {
        let body = serde_json::json!({ "error": err.code(), "message": err.to_string() });
        println!("{}", body);
    } else {
        eprintln!("{}", err);
    }
    std::process::exit(1);
}

fn print_identity(identity: &Identity) {
    println!("{} <{}>", identity.display_name(), identity.email);
    println!("Role:     {}", identity.role.label());
    println!("Approved: {}", if identity.is_approved { "yes" } else { "pending" });
    println!("Since:    {}", identity.created_at.format("%Y-%m-%d"));

    let profile = &identity.profile;
    for (label, value) in [
        ("Phone", &profile.phone),
        ("Address", &profile.address),
        ("License", &profile.license_number),
        ("Business reg.", &profile.business_registration),
        ("Tax ID", &profile.tax_id),
        ("Pharmacist", &profile.pharmacist_in_charge),
    ] {
        if let Some(value) = value {
            println!("{:<10}{}", format!("{}:", label), value);
        }
    }
    if !profile.specializations.is_empty() {
        println!("Tests:    {}", profile.specializations.join(", "));
    }

    println!();
    println!("Pages:");
    for (label, path) in navigation(identity.role) {
        println!("  {:<12} {}", label, path);
    }
}

fn print_analytics(data: &analytics::SalesDataset, summary: &analytics::SalesSummary) {
    println!("Total revenue:        {}", format_currency(summary.total_revenue));
    println!("Total orders:         {}", summary.total_orders);
    println!("Average order value:  {}", format_currency(summary.average_order_value));
    println!("Avg monthly revenue:  {}", format_currency(summary.average_monthly_revenue));
    match summary.month_over_month_growth {
        Some(growth) => println!("Month over month:     {:+.1}%", growth),
        None => println!("Month over month:     -"),
    }
    println!("Best month:           {}", summary.best_month.as_deref().unwrap_or("-"));
    println!("Avg daily orders:     {:.1}", summary.weekly_average_orders);
    println!();

    println!("{:<8} {:>16} {:>8}", "Month", "Revenue", "Orders");
    println!("{}", "-".repeat(34));
    for month in &data.monthly {
        println!("{:<8} {:>16} {:>8}", month.month, format_currency(month.revenue), month.orders);
    }
    println!();

    println!("{:<22} {:>8} {:>16}", "Top product", "Units", "Revenue");
    println!("{}", "-".repeat(48));
    for product in analytics::top_products_by_revenue(&data.top_products, 5) {
        println!(
            "{:<22} {:>8} {:>16}",
            product.name,
            product.units_sold,
            format_currency(product.revenue)
        );
    }
    println!();

    println!("{:<14} {:>9} {:>8}", "Retailers", "Count", "Share");
    println!("{}", "-".repeat(33));
    for share in analytics::category_shares(&data.retailer_categories) {
        println!("{:<14} {:>9} {:>7.1}%", share.category, share.retailers, share.percent);
    }

    if let Some(peak) = analytics::peak_day(&data.weekly_orders) {
        println!();
        println!("Busiest day: {} ({} orders)", peak.day, peak.orders);
    }
}
