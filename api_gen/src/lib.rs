use actix_web::web::{self};

pub mod routes {
    pub mod generation;
    pub mod recipe;
}

pub mod services {
    pub mod compose;
    pub mod generation;
}

pub mod dtos {
    pub mod generation;
}

/// Quota-gated generation endpoints.
pub fn mount_gen() -> actix_web::Scope {
    web::scope("/generate")
        .service(routes::generation::post_recipe)
        .service(routes::generation::post_video)
        .service(routes::generation::post_suggestions)
}

/// The authenticated user's recipe library.
pub fn mount_recipes() -> actix_web::Scope {
    web::scope("/recipes")
        .service(routes::recipe::get_recipes)
        .service(routes::recipe::get_recipe)
        .service(routes::recipe::delete_recipe)
}
