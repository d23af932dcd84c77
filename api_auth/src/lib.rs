use actix_web::web::{self};

use middleware::auth::AuthMiddleware;

pub mod routes {
    pub mod auth;
}

pub mod services {
    pub mod auth;
}

pub mod dtos {
    pub mod auth;
}

pub mod middleware {
    pub mod auth;
}

pub fn mount_auth() -> actix_web::Scope {
    web::scope("/auth")
        .service(routes::auth::post_register)
        .service(routes::auth::post_login)
}

/// Profile routes, mounted behind the auth middleware.
pub fn mount_user() -> actix_web::Scope {
    web::scope("/user").service(routes::auth::get_me)
}

pub fn auth_middleware(jwt_secret: &str) -> AuthMiddleware {
    AuthMiddleware::new(jwt_secret.to_string())
}
