use jobly_core::{CompanyRepository, JobRepository, ServerConfig, Settings};
use jobly_postgres::{connect, PostgresCompanyRepository, PostgresJobRepository, Tables};
use jobly_server::run;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_LOG_FILTER: &str =
    "jobly=info,jobly_server=info,jobly_postgres=info,jobly_restlette=info,tower_http=debug";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = Settings::from_env()?;
    if settings.open_admin {
        tracing::warn!("JOBLY_OPEN_ADMIN is set; every caller is treated as admin");
    } else if settings.admin_tokens.is_empty() {
        tracing::warn!("JOBLY_ADMIN_TOKENS is empty; all write routes will answer 401");
    }

    let tables = Tables::with_prefix(&settings.table_prefix);
    let pool = connect(&settings.database_url, &tables).await?;

    let jobs: Arc<dyn JobRepository> =
        Arc::new(PostgresJobRepository::new(pool.clone(), &tables));
    let companies: Arc<dyn CompanyRepository> =
        Arc::new(PostgresCompanyRepository::new(pool, &tables));
    let auth = settings.auth();

    run(ServerConfig {
        port: settings.port,
        jobs,
        companies,
        auth,
    })
    .await
}
