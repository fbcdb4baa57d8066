use actix_web::{middleware, web, App, HttpServer};
use sketchboard::config::{BIND_ADDR, MAX_PAYLOAD_BYTES, RUST_LOG};
use sketchboard::interpreter::Interpreter;
use sketchboard::server::routes;
use std::{env, io};

use tracing::info;

#[actix_web::main]
async fn main() -> io::Result<()> {
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", RUST_LOG);
    }
    tracing_subscriber::fmt::init();

    // One shared interpreter; the API key itself travels with each request
    let interpreter = web::Data::new(Interpreter::new());

    info!("serving the sketch board on {BIND_ADDR}");

    HttpServer::new(move || {
        App::new()
            .app_data(interpreter.clone())
            .app_data(web::JsonConfig::default().limit(MAX_PAYLOAD_BYTES))
            .wrap(middleware::Logger::default())
            .service(routes::index)
            .service(routes::analyze)
    })
    .bind(BIND_ADDR)?
    .run()
    .await
}
