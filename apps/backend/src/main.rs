use actix_web::{web, App, HttpServer};
use backend::middleware::request_trace::RequestTrace;
use backend::routes;
use backend::state::app_state::build_state;
use backend::Settings;

mod telemetry;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Local dev convenience; the runtime environment (docker env_file etc.)
    // normally provides these.
    dotenvy::dotenv().ok();
    telemetry::init_tracing();

    let host = std::env::var("BACKEND_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = std::env::var("BACKEND_PORT")
        .unwrap_or_else(|_| "3001".to_string())
        .parse::<u16>()
        .unwrap_or_else(|_| {
            eprintln!("BACKEND_PORT must be a valid port number");
            std::process::exit(1);
        });

    // Dial the primary database before accepting any traffic. Request
    // handlers only ever see an already-populated registry.
    let app_state = match build_state().with_settings(Settings::from_env()).build().await {
        Ok(state) => state,
        Err(e) => {
            eprintln!("Failed to build application state: {e}");
            std::process::exit(1);
        }
    };

    tracing::info!(host = %host, port = port, "starting backend");

    let data = web::Data::new(app_state);

    HttpServer::new(move || {
        App::new()
            .wrap(RequestTrace)
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
