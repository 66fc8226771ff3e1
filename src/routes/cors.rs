use actix_web::{
    body::{EitherBody, MessageBody},
    dev::{ServiceRequest, ServiceResponse},
    http::header::{self, HeaderValue},
    http::Method,
    middleware::Next,
    web, Error, HttpResponse, ResponseError,
};
use log::warn;

use crate::config::AppConfig;
use crate::error::AppError;

/// Rejects requests whose `Origin` is not on the allow-list before any
/// handler runs, answers preflights, and decorates allowed responses.
pub async fn cors_handler<B>(
    req: ServiceRequest,
    next: Next<B>,
) -> Result<ServiceResponse<EitherBody<B>>, Error>
where
    B: MessageBody,
{
    let origin = req.headers().get(header::ORIGIN).cloned();
    if let Some(origin) = &origin {
        let allowed = match req.app_data::<web::Data<AppConfig>>() {
            Some(cfg) => origin.to_str().map(|o| cfg.is_origin_allowed(o)).unwrap_or(false),
            None => false,
        };
        if !allowed {
            warn!("cors rejected origin {:?} for {}", origin, req.path());
            let res = AppError::Forbidden("Not allowed by CORS".to_string())
                .error_response()
                .map_into_right_body();
            return Ok(req.into_response(res));
        }
    }

    let mut res = if req.method() == Method::OPTIONS {
        let res = HttpResponse::Ok().finish().map_into_right_body();
        req.into_response(res)
    } else {
        next.call(req).await?.map_into_left_body()
    };

    if let Some(origin) = origin {
        let headers = res.headers_mut();
        headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin);
        headers.insert(header::VARY, HeaderValue::from_static("Origin"));
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("GET, POST, PUT, PATCH, DELETE, OPTIONS"),
        );
        headers.insert(
            header::ACCESS_CONTROL_MAX_AGE,
            HeaderValue::from_static("86400"),
        );
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("Origin, X-Requested-With, Content-Type, Accept, Authorization"),
        );
    }

    Ok(res)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config;
    use actix_web::{http::StatusCode, middleware::from_fn, test, App};

    async fn ok() -> HttpResponse {
        HttpResponse::Ok().body("hi")
    }

    macro_rules! app {
        () => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new(test_config()))
                    .wrap(from_fn(cors_handler))
                    .route("/ping", web::get().to(ok)),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn unlisted_origin_never_reaches_the_handler() {
        let app = app!();
        let req = test::TestRequest::get()
            .uri("/ping")
            .insert_header(("Origin", "https://evil.example"))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["error"], "Not allowed by CORS");
    }

    #[actix_web::test]
    async fn listed_origin_gets_cors_headers() {
        let app = app!();
        let req = test::TestRequest::get()
            .uri("/ping")
            .insert_header(("Origin", "http://localhost:3000"))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(
            res.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "http://localhost:3000"
        );
    }

    #[actix_web::test]
    async fn preflight_and_originless_requests() {
        let app = app!();
        let preflight = test::TestRequest::default()
            .method(Method::OPTIONS)
            .uri("/ping")
            .insert_header(("Origin", "http://localhost:3000"))
            .to_request();
        assert_eq!(test::call_service(&app, preflight).await.status(), StatusCode::OK);

        let plain = test::TestRequest::get().uri("/ping").to_request();
        let res = test::call_service(&app, plain).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert!(res.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
    }
}
