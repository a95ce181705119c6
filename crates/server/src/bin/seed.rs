//! cliento-seed: fill a development database with sample data.
//!
//! Uses the same environment as the server. Set `SEED_RNG=<u64>` for a
//! reproducible data set.

use rand::{SeedableRng, rngs::StdRng};

use cliento_server::auth::AuthSettings;
use cliento_server::config::Config;
use cliento_server::seed::{self, SeedPlan};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .init();

    let config = Config::from_env();
    let settings = AuthSettings {
        token_ttl_hours: config.token_ttl_hours,
        password_iterations: config.password_iterations,
    };

    let mut rng = match std::env::var("SEED_RNG").ok().and_then(|v| v.parse::<u64>().ok()) {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let pool = cliento_server::db::create_pool(&config.database_url)
        .await
        .expect("Failed to create database pool");

    if let Err(e) = cliento_server::db::migrate(&pool).await {
        tracing::error!(error = ?e, "Schema migration failed");
        std::process::exit(1);
    }

    match seed::run(&pool, &SeedPlan::default(), &settings, &mut rng).await {
        Ok(report) => {
            tracing::info!(
                "Seeded {} professionals, {} patients, {} appointments (password: {})",
                report.professionals,
                report.patients,
                report.appointments,
                seed::SEED_PASSWORD
            );
        }
        Err(e) => {
            tracing::error!(error = ?e, "Seeding failed");
            std::process::exit(1);
        }
    }
}
