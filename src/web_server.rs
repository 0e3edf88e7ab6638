use crate::error::AppError;
use crate::processor::Ingestor;
use crate::query::{QueryHandler, RESPONSE_HEADERS};
use actix_web::http::{Method, StatusCode};
use actix_web::{web, App, HttpResponse, HttpResponseBuilder, HttpServer};
use std::collections::HashMap;

fn with_headers(status: StatusCode) -> HttpResponseBuilder {
    let mut builder = HttpResponse::build(status);
    for header in RESPONSE_HEADERS {
        builder.insert_header(header);
    }
    builder
}

async fn search_images(
    handler: web::Data<QueryHandler>,
    query: web::Query<HashMap<String, String>>,
) -> Result<HttpResponse, AppError> {
    log::debug!("Received search request with query: {:?}", query);

    let response = handler.handle(query.get("q").map(String::as_str)).await?;
    let status =
        StatusCode::from_u16(response.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    Ok(with_headers(status).json(response.body))
}

async fn preflight() -> HttpResponse {
    with_headers(StatusCode::NO_CONTENT).finish()
}

async fn receive_event(ingestor: web::Data<Ingestor>, body: web::Bytes) -> HttpResponse {
    log::debug!("Received bucket notification ({} bytes)", body.len());

    let response = ingestor.respond(&body).await;
    let status =
        StatusCode::from_u16(response.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    HttpResponse::build(status)
        .content_type("text/plain; charset=utf-8")
        .body(response.body)
}

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/search")
            .route(web::get().to(search_images))
            .route(web::method(Method::OPTIONS).to(preflight)),
    )
    .service(web::resource("/events").route(web::post().to(receive_event)));
}

pub async fn start_web_server(
    port: u16,
    ingestor: Ingestor,
    query_handler: QueryHandler,
) -> std::io::Result<()> {
    let ingestor = web::Data::new(ingestor);
    let query_handler = web::Data::new(query_handler);

    log::info!("Starting web server on port: {}", port);

    HttpServer::new(move || {
        App::new()
            .app_data(ingestor.clone())
            .app_data(query_handler.clone())
            .configure(routes)
    })
    .bind(format!("0.0.0.0:{}", port))?
    .run()
    .await
}
