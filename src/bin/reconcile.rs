// Report wallets whose cached balance differs from the sum of their transactions.
// Usage: cargo run --bin reconcile -- [--fix]

use clap::Parser;
use sqlx::PgPool;
use std::process::ExitCode;

use wallet_ledger_api::utils::decimal::to_plain_string;
use wallet_ledger_api::{database, Config};

#[derive(Parser, Debug)]
#[command(name = "reconcile", about = "Check wallet balances against their transactions")]
struct Args {
    /// Rewrite drifted balances from transaction history
    #[arg(long)]
    fix: bool,

    /// Database URL (defaults to DATABASE_URL)
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wallet_ledger_api=info".into()),
        )
        .init();

    let args = Args::parse();
    let config = Config::from_env()?;
    let database_url = args.database_url.unwrap_or(config.database_url);

    let pool = database::create_pool(&database_url, 2).await?;
    let outcome = reconcile(&pool, args.fix).await;
    pool.close().await;
    outcome
}

async fn reconcile(pool: &PgPool, fix: bool) -> anyhow::Result<ExitCode> {
    let drifted = database::wallets::find_balance_drift(pool).await?;
    if drifted.is_empty() {
        println!("All wallet balances match their transactions");
        return Ok(ExitCode::SUCCESS);
    }

    for drift in &drifted {
        println!(
            "{} ({}): balance {} expected {}",
            drift.wallet_id,
            drift.label,
            to_plain_string(&drift.balance),
            to_plain_string(&drift.expected)
        );
    }

    if !fix {
        println!("{} wallet(s) out of balance; rerun with --fix to repair", drifted.len());
        return Ok(ExitCode::FAILURE);
    }

    for drift in &drifted {
        match database::wallets::recompute_balance(pool, drift.wallet_id).await? {
            Some(balance) => println!(
                "{}: balance set to {}",
                drift.wallet_id,
                to_plain_string(&balance)
            ),
            None => println!("{}: wallet deleted meanwhile, skipped", drift.wallet_id),
        }
    }

    Ok(ExitCode::SUCCESS)
}
