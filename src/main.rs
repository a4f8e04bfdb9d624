//! Username Claimer - sequential short-username registration
//!
//! Tries random five-letter usernames with every account in `accounts.txt`,
//! applying the discount code and checking the confirmation page.

use std::env;
use std::process;
use std::sync::Arc;

use anyhow::Context;
use username_claimer::{
    accounts, logging, ApiClient, ClaimConfig, ClaimError, FileLedger, Registrar,
    RunSummary, Runner, UsernameGenerator,
};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() > 1 && (args[1] == "--help" || args[1] == "-h") {
        print_help();
        return;
    }

    if let Err(e) = username_claimer::init() {
        eprintln!("{}", e.user_message());
        process::exit(1);
    }

    let config = match ClaimConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e.user_message());
            process::exit(1);
        }
    };

    if let Err(e) = logging::init(&config.paths.log) {
        eprintln!("{}", e.user_message());
        process::exit(1);
    }

    if let Err(e) = run(config).await {
        tracing::error!("{:#}", e);
        match e.downcast_ref::<ClaimError>() {
            Some(claim_error) => eprintln!("{}", claim_error.user_message()),
            None => eprintln!("❌ Error: {:#}", e),
        }
        process::exit(1);
    }
}

async fn run(config: ClaimConfig) -> anyhow::Result<RunSummary> {
    // Credentials are validated before any client exists
    let accounts = accounts::load_accounts(&config.paths.accounts)
        .context("Error reading accounts")?;

    let candidates =
        UsernameGenerator::new(config.username_length, config.candidate_attempts).generate();
    tracing::debug!(count = candidates.len(), "Generated candidate usernames");

    let ledger = Arc::new(FileLedger::new(
        config.paths.unavailable.clone(),
        config.paths.registered.clone(),
    ));
    let client = ApiClient::new()?;
    let delay = config.delay;
    let runner = Runner::new(Registrar::new(client, config), ledger, delay);

    let summary = runner.run(&accounts, &candidates).await?;
    Ok(summary)
}

/// Print help information
fn print_help() {
    println!("Username Claimer v{}", username_claimer::VERSION);
    println!();
    println!("USAGE:");
    println!("    username-claimer");
    println!();
    println!("FILES:");
    println!("    accounts.txt                 identifier,token per line (required)");
    println!("    unavailable_usernames.txt    skip list, appended during the run");
    println!("    registered_usernames.txt     username,identifier per successful claim");
    println!("    log.txt                      timestamped copy of the console output");
    println!();
    println!("ENVIRONMENT VARIABLES (optional, also read from .env):");
    println!("    CLAIM_ACCOUNTS_FILE, CLAIM_UNAVAILABLE_FILE, CLAIM_REGISTERED_FILE, CLAIM_LOG_FILE");
    println!("    CLAIM_VERIFY_URL, CLAIM_ORDER_URL, CLAIM_CHECKOUT_BASE_URL, CLAIM_HOME_BASE_URL");
    println!("    CLAIM_DISCOUNT_CODE, CLAIM_CURRENCY, CLAIM_YEARS, CLAIM_LITE, CLAIM_SUCCESS_PHRASE");
    println!("    CLAIM_DELAY_MS (default 1000), CLAIM_USERNAME_LENGTH (default 5),");
    println!("    CLAIM_CANDIDATE_ATTEMPTS (default 1000)");
    println!("    RUST_LOG           log filter (default: info)");
}
