use actix_web::web::{self};

pub mod routes {
    pub mod plan;
    pub mod sub;
}

pub mod services {
    pub mod sub;
}

pub mod dtos {
    pub mod sub;
}

/// Public plan catalog.
pub fn mount_plans() -> actix_web::Scope {
    web::scope("/plans").service(routes::plan::get_plans)
}

/// Administrative plan management, mounted behind the auth middleware.
pub fn mount_plan_admin() -> actix_web::Scope {
    web::scope("/plans").service(routes::plan::put_plan_limits)
}

/// Subscription management for the authenticated user.
pub fn mount_subs() -> actix_web::Scope {
    web::scope("/sub")
        .service(routes::sub::get_current)
        .service(routes::sub::get_usage)
        .service(routes::sub::post_upgrade)
        .service(routes::sub::post_cancel)
}
