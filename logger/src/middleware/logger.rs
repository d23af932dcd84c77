use std::pin::Pin;
use std::rc::Rc;
use std::time::Instant;

use actix_web::{
    Error,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};
use colored::Colorize;
use futures::future::{Ready, ready};
use std::future::Future;

pub struct LoggerMiddleware {}

impl LoggerMiddleware {
    pub fn new() -> Self {
        Self {}
    }
}

impl<S, B> Transform<S, ServiceRequest> for LoggerMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: actix_web::body::MessageBody + 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = LoggerMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(LoggerMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct LoggerMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for LoggerMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: actix_web::body::MessageBody + 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let method = req.method().to_string();
        let path = req.path().to_string();
        let srv = Rc::clone(&self.service);

        Box::pin(async move {
            let started = Instant::now();
            let res = srv.call(req).await?;

            let status = res.status();
            let status_str = if status.is_success() {
                status.as_u16().to_string().green()
            } else if status.is_client_error() {
                status.as_u16().to_string().yellow()
            } else {
                status.as_u16().to_string().red()
            };

            // claims were inserted by the auth middleware, if any
            let user = common::jwt::get_jwt_claims(res.request())
                .map(|claims| claims.user_id.to_string())
                .unwrap_or_else(|| "anonymous".to_string());

            log::info!(
                "{} {} {} {}ms user={}",
                method,
                path,
                status_str,
                started.elapsed().as_millis(),
                user
            );

            Ok(res)
        })
    }
}
