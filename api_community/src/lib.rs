use actix_web::web::{self};

pub mod routes {
    pub mod comment;
    pub mod post;
}

pub mod services {
    pub mod community;
}

pub mod dtos {
    pub mod community;
}

pub fn mount_community() -> actix_web::Scope {
    web::scope("/community")
        .service(routes::post::get_posts)
        .service(routes::post::get_post)
        .service(routes::post::post_post)
        .service(routes::post::put_post)
        .service(routes::post::delete_post)
        .service(routes::comment::post_comment)
        .service(routes::comment::delete_comment)
}
