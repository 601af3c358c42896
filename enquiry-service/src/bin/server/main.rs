use std::sync::Arc;

use auth::TokenService;
use enquiry_service::config::Config;
use enquiry_service::config::StorageBackend;
use enquiry_service::domain::enquiry::ports::EnquiryServicePort;
use enquiry_service::domain::enquiry::service::EnquiryService;
use enquiry_service::domain::user::ports::UserServicePort;
use enquiry_service::domain::user::service::UserService;
use enquiry_service::inbound::http::router::create_router;
use enquiry_service::outbound::repositories::InMemoryEnquiryRepository;
use enquiry_service::outbound::repositories::InMemoryUserRepository;
use enquiry_service::outbound::repositories::PostgresEnquiryRepository;
use enquiry_service::outbound::repositories::PostgresUserRepository;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "enquiry_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "enquiry-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        backend = ?config.database.backend,
        http_port = config.server.http_port,
        issuer = %config.jwt.issuer,
        operation_timeout_secs = config.database.operation_timeout_secs,
        "Configuration loaded"
    );

    let (user_service, enquiry_service) = match config.database.backend {
        StorageBackend::Postgres => {
            let pg_pool = PgPoolOptions::new()
                .max_connections(config.database.max_connections)
                .connect(&config.database.url)
                .await?;
            tracing::info!(
                max_connections = config.database.max_connections,
                database = "postgresql",
                "Database connection pool created"
            );

            sqlx::migrate!("./migrations").run(&pg_pool).await?;
            tracing::info!(database = "postgresql", "Database migrations completed");

            let timeout = config.database.operation_timeout();
            let user_repository =
                Arc::new(PostgresUserRepository::new(pg_pool.clone(), timeout));
            let enquiry_repository =
                Arc::new(PostgresEnquiryRepository::new(pg_pool, timeout));

            let user_service: Arc<dyn UserServicePort> =
                Arc::new(UserService::new(user_repository));
            let enquiry_service: Arc<dyn EnquiryServicePort> =
                Arc::new(EnquiryService::new(enquiry_repository));

            (user_service, enquiry_service)
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; data is lost on restart");

            let user_service: Arc<dyn UserServicePort> =
                Arc::new(UserService::new(Arc::new(InMemoryUserRepository::new())));
            let enquiry_service: Arc<dyn EnquiryServicePort> = Arc::new(
                EnquiryService::new(Arc::new(InMemoryEnquiryRepository::new())),
            );

            (user_service, enquiry_service)
        }
    };

    let token_service = Arc::new(TokenService::new(
        config.jwt.secret.as_bytes(),
        config.jwt.issuer.clone(),
    ));

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(user_service, enquiry_service, token_service);

    if let Err(e) = axum::serve(http_listener, http_application).await {
        tracing::error!(error = %e, "Server error");
        return Err(e.into());
    }

    tracing::info!("Server exited successfully");

    Ok(())
}
