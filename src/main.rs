use std::sync::Arc;

use actix_web::middleware::NormalizePath;
use actix_web::web::Data;
use actix_web::{App, HttpServer, Responder, get};
use dotenvy::dotenv;
use tracing::info;
use tracing_appender::rolling;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use hrm_core::api::AppState;
use hrm_core::calendar::WorkCalendar;
use hrm_core::config::Config;
use hrm_core::db::init_db;
use hrm_core::docs::ApiDoc;
use hrm_core::routes;
use hrm_core::service::{LeaveLedger, ShiftRoster};
use hrm_core::store::MySqlStores;

#[get("/")]
async fn index() -> impl Responder {
    "HRM core API"
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let config = Config::from_env();

    // Rolling daily log
    let file_appender = rolling::daily("logs", "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_target(false)
        .with_level(true)
        .pretty()
        .init();

    info!("Server starting...");

    let pool = init_db(&config.database_url).await;
    let stores = Arc::new(MySqlStores::new(pool));

    let calendar = match &config.holiday_dates {
        Some(dates) => WorkCalendar::new(dates.iter().copied()),
        None => WorkCalendar::with_default_holidays(),
    };

    let ledger = LeaveLedger::new(
        stores.clone(),
        stores.clone(),
        stores.clone(),
        calendar,
    );
    let roster = ShiftRoster::new(
        stores.clone(),
        stores.clone(),
        stores.clone(),
        stores.clone(),
        stores.clone(),
    );
    let state = AppState::new(ledger, roster);

    let server_addr = config.server_addr.clone();
    let config_data = config.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(Data::new(state.clone()))
            .service(index)
            .configure(|cfg| routes::configure(cfg, config_data.clone()))
    })
    .bind(server_addr)?
    .run()
    .await?;

    Ok(())
}
