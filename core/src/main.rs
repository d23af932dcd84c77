mod cors;

use actix_web::{
    App, HttpServer,
    web::{self},
};
use common::env_config::Config;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // get env vars
    let config = Config::from_env();
    let config_data = config.clone();

    // get info
    let is_production = config.environment == "production";
    let origin = config.cors_allowed_origin.clone();

    // init logger
    if config.console_logging_enabled {
        logger::setup().expect("Failed to set up logger");
    }

    // init db connection
    let pool = db::setup(&config.database_url, is_production)
        .await
        .expect("Failed to set up database");

    // seed the plan catalog and the bootstrap admin account
    db::plan::seed_defaults(&pool)
        .await
        .expect("Failed to seed subscription plans");
    api_auth::services::auth::ensure_admin(&pool, &config)
        .await
        .expect("Failed to seed admin account");

    HttpServer::new(move || {
        let secret = config_data.jwt_config.secret.clone();
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(config_data.clone()))
            .wrap(limiter::global_middleware(
                config_data.global_requests_per_second,
            ))
            .wrap(logger::middleware())
            .wrap(cors::middleware(&origin))
            .service(
                web::scope("/api")
                    .service(api_auth::mount_auth())
                    .service(api_subs::mount_plans())
                    .service(
                        web::scope("/dashboard")
                            .wrap(api_auth::auth_middleware(&secret))
                            .service(api_auth::mount_user())
                            .service(api_subs::mount_subs())
                            .service(api_subs::mount_plan_admin())
                            .service(api_gen::mount_gen())
                            .service(api_gen::mount_recipes())
                            .service(api_community::mount_community()),
                    ),
            )
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .workers(config.num_workers)
    .run()
    .await
}
