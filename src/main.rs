use std::io;

use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use env_logger::Env;
use log::info;

use media_shelf::{config::Config, library::MediaLibrary, routes, state::AppState};

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = Config::from_env().map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    let library = MediaLibrary::open(&config.media_root)?;
    info!("Serving media from {}", library.root().display());

    let state = web::Data::new(AppState::new(library, &config));
    let bind_address = config.bind_address.clone();
    info!("Server running on http://{}", bind_address);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Logger::default())
            .wrap(routes::cors(&config.cors_allowed_origin))
            .configure(|cfg| routes::setup_routes(cfg, &config.static_dir))
    })
    .bind(bind_address)?
    .run()
    .await
}
