use actix_web::{middleware, web, App, HttpServer};

use taskpile_server::config::Config;
use taskpile_server::db::Db;
use taskpile_server::{routes, session_middleware};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env();
    let db = Db::open(&config.database_path)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
    let data = web::Data::new(db);
    let secret = config.session_secret.clone();

    log::info!("server running on {}:{}", config.host, config.port);
    HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .wrap(middleware::Logger::default())
            .wrap(session_middleware(secret.as_deref()))
            .configure(routes::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
