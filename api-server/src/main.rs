use std::{sync::Arc, time::Duration};

use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use api_server::{configure_routes, json_config, AppState, ServerConfig, Store};

fn spawn_checkpoint_task(store: Arc<Store>, every_secs: u64) {
    if every_secs == 0 {
        return;
    }
    tokio::spawn(async move {
        let every = Duration::from_secs(every_secs);
        loop {
            tokio::time::sleep(every).await;
            if let Err(e) = store.checkpoint() {
                tracing::warn!("WAL checkpoint failed: {e}");
            }
        }
    });
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::filter::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let config = ServerConfig::from_env();
    let store = Store::open(&config.data_dir)
        .map(Arc::new)
        .map_err(|e| std::io::Error::other(e.to_string()))?;

    tracing::info!(
        "starting asteroid dodger api: bind_addr={} data_dir={} json_limit_bytes={} top_scores_limit={} auth_required={}",
        config.bind_addr,
        config.data_dir.display(),
        config.json_limit_bytes,
        config.top_scores_limit,
        config.api_key.is_some()
    );

    let state = AppState::new(store.clone(), &config);
    spawn_checkpoint_task(store, config.checkpoint_secs);

    let json_limit = config.json_limit_bytes;
    let mut server = HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .expose_any_header()
            .max_age(3600);

        App::new()
            .app_data(web::Data::new(state.clone()))
            .app_data(json_config(json_limit))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .configure(configure_routes)
    })
    .keep_alive(Duration::from_secs(config.http_keep_alive_secs));

    if let Some(workers) = config.http_workers {
        server = server.workers(workers);
    }

    server.bind(&config.bind_addr)?.run().await
}
