use actix_files::Files;
use actix_web::{middleware, web, App, HttpResponse, HttpServer, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use tracing::{info, warn};

use crate::dates::parse_day;
use crate::domain::{Boat, Reservation};
use crate::parser::load_manifest_from_reader;
use crate::realloc::{reallocate_on, ReallocationSummary, TracingReporter};

// In-memory fleet; nothing is persisted
pub struct AppState {
    pub boats: Mutex<Vec<Boat>>,
    /// Fixed current day, if configured; otherwise the local date is used per request
    pub today: Option<NaiveDate>,
}

impl AppState {
    pub fn new(boats: Vec<Boat>, today: Option<NaiveDate>) -> Self {
        AppState {
            boats: Mutex::new(boats),
            today,
        }
    }

    fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(crate::dates::today)
    }
}

#[derive(Deserialize)]
pub struct NewReservationRequest {
    #[serde(default)]
    client: String,
    first_day: String,
    last_day: String,
}

#[derive(Serialize)]
pub struct BoatListEntry {
    name: String,
    state_rooms: usize,
    reservations: usize,
}

#[derive(Serialize)]
pub struct ReservationCreated {
    reservation: Reservation,
    summary: ReallocationSummary,
}

fn error_json(message: impl std::fmt::Display) -> serde_json::Value {
    serde_json::json!({"success": false, "error": message.to_string()})
}

// Fleet overview
async fn list_boats(state: web::Data<AppState>) -> Result<HttpResponse> {
    let boats = state.boats.lock().unwrap();
    let entries: Vec<BoatListEntry> = boats
        .iter()
        .map(|boat| BoatListEntry {
            name: boat.name().to_string(),
            state_rooms: boat.state_rooms().len(),
            reservations: boat.reservations().count(),
        })
        .collect();
    Ok(HttpResponse::Ok().json(entries))
}

// Full boat with staterooms and reservations
async fn get_boat(name: web::Path<String>, state: web::Data<AppState>) -> Result<HttpResponse> {
    let boats = state.boats.lock().unwrap();
    match boats.iter().find(|b| b.name() == name.as_str()) {
        Some(boat) => Ok(HttpResponse::Ok().json(boat)),
        None => Ok(HttpResponse::NotFound().json(error_json(format!("Unknown boat '{}'", name)))),
    }
}

// Insert a reservation, reallocating unstarted ones if needed
async fn create_reservation(
    name: web::Path<String>,
    req: web::Json<NewReservationRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let (first_day, last_day) = match (parse_day(&req.first_day), parse_day(&req.last_day)) {
        (Ok(first), Ok(last)) => (first, last),
        (Err(e), _) | (_, Err(e)) => return Ok(HttpResponse::BadRequest().json(error_json(e))),
    };
    let today = state.today();

    // The lock is held for the whole search so nobody sees a half-moved boat
    let mut boats = state.boats.lock().unwrap();
    let Some(boat) = boats.iter_mut().find(|b| b.name() == name.as_str()) else {
        return Ok(HttpResponse::NotFound().json(error_json(format!("Unknown boat '{}'", name))));
    };

    let Some(id) = boat.next_reservation_id() else {
        return Ok(HttpResponse::BadRequest().json(error_json(format!(
            "No reservation ids left on boat '{}'",
            name
        ))));
    };
    let reservation = match Reservation::new(id, req.client.trim(), first_day, last_day) {
        Ok(r) => r,
        Err(e) => return Ok(HttpResponse::BadRequest().json(error_json(e))),
    };
    if reservation.is_started(today) {
        return Ok(HttpResponse::BadRequest().json(error_json(format!(
            "Reservation must start after {}",
            crate::dates::format_day(today)
        ))));
    }

    match reallocate_on(boat, reservation, today, &mut TracingReporter) {
        Ok(summary) => {
            let reservation = boat.find_reservation(id).cloned();
            match reservation {
                Some(reservation) => {
                    Ok(HttpResponse::Created().json(ReservationCreated { reservation, summary }))
                }
                None => Ok(HttpResponse::InternalServerError()
                    .json(error_json("Reservation missing after reallocation"))),
            }
        }
        Err(e) => {
            warn!(boat = boat.name(), error = %e, "reservation rejected");
            Ok(HttpResponse::Conflict().json(error_json(e)))
        }
    }
}

// Replace the fleet with an uploaded CSV manifest
async fn upload_manifest(body: web::Bytes, state: web::Data<AppState>) -> Result<HttpResponse> {
    match load_manifest_from_reader(body.as_ref()) {
        Ok(boats) => {
            let count = boats.len();
            *state.boats.lock().unwrap() = boats;
            info!(boats = count, "manifest loaded");
            Ok(HttpResponse::Ok().json(serde_json::json!({
                "success": true,
                "boats": count
            })))
        }
        Err(e) => Ok(HttpResponse::BadRequest().json(error_json(format!(
            "Failed to process manifest: {}",
            e
        )))),
    }
}

/// Registers the API routes on an app or test service
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/boats", web::get().to(list_boats))
        .route("/api/manifest", web::post().to(upload_manifest))
        .service(web::resource("/api/boats/{name}").route(web::get().to(get_boat)))
        .service(
            web::resource("/api/boats/{name}/reservations")
                .route(web::post().to(create_reservation)),
        );
}

pub async fn start_server(port: u16, app_state: AppState) -> std::io::Result<()> {
    let app_state = web::Data::new(app_state);

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(middleware::Logger::default())
            .service(Files::new("/static", "static").show_files_listing())
            .configure(configure)
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test};

    const MANIFEST: &str = "\
boat,state_room,reservation_id,client,first_day,last_day
Gaviota,1,1,Ana,2024-07-01,2024-07-05
Gaviota,1,2,Luis,2024-07-10,2024-07-12
Gaviota,2,,,,
";

    fn state() -> web::Data<AppState> {
        let boats = load_manifest_from_reader(MANIFEST.as_bytes()).unwrap();
        web::Data::new(AppState::new(boats, NaiveDate::from_ymd_opt(2024, 7, 3)))
    }

    #[actix_web::test]
    async fn lists_and_shows_boats() {
        let app = test::init_service(App::new().app_data(state()).configure(configure)).await;

        let req = test::TestRequest::get().uri("/api/boats").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body[0]["name"], "Gaviota");
        assert_eq!(body[0]["reservations"], 2);

        let req = test::TestRequest::get().uri("/api/boats/Nope").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn creates_reservation_and_then_conflicts() {
        let app = test::init_service(App::new().app_data(state()).configure(configure)).await;

        let req = test::TestRequest::post()
            .uri("/api/boats/Gaviota/reservations")
            .set_json(serde_json::json!({"client": "Marta", "first_day": "2024-07-10", "last_day": "2024-07-12"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["reservation"]["id"], 3);
        assert_eq!(body["reservation"]["state_room_id"], 2);

        // Both rooms are now booked on those days
        let req = test::TestRequest::post()
            .uri("/api/boats/Gaviota/reservations")
            .set_json(serde_json::json!({"first_day": "11/07/2024", "last_day": "11/07/2024"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);
    }

    #[actix_web::test]
    async fn rejects_started_or_malformed_requests() {
        let app = test::init_service(App::new().app_data(state()).configure(configure)).await;

        let req = test::TestRequest::post()
            .uri("/api/boats/Gaviota/reservations")
            .set_json(serde_json::json!({"first_day": "2024-07-02", "last_day": "2024-07-04"}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::post()
            .uri("/api/boats/Gaviota/reservations")
            .set_json(serde_json::json!({"first_day": "someday", "last_day": "2024-07-04"}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn exhausted_ids_answer_bad_request_and_keep_serving() {
        let manifest = "\
boat,state_room,reservation_id,client,first_day,last_day
Gaviota,1,4294967295,Ana,2024-07-20,2024-07-21
";
        let boats = load_manifest_from_reader(manifest.as_bytes()).unwrap();
        let data = web::Data::new(AppState::new(boats, NaiveDate::from_ymd_opt(2024, 7, 3)));
        let app = test::init_service(App::new().app_data(data.clone()).configure(configure)).await;

        let req = test::TestRequest::post()
            .uri("/api/boats/Gaviota/reservations")
            .set_json(serde_json::json!({"first_day": "2024-07-10", "last_day": "2024-07-12"}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

        // The fleet lock is still usable
        assert!(!data.boats.is_poisoned());
        let req = test::TestRequest::get().uri("/api/boats/Gaviota").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn manifest_upload_replaces_fleet() {
        let data = state();
        let app = test::init_service(App::new().app_data(data.clone()).configure(configure)).await;

        let req = test::TestRequest::post()
            .uri("/api/manifest")
            .set_payload("boat,state_room,reservation_id,client,first_day,last_day\nAlbatros,1,,,,\n")
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
        assert_eq!(data.boats.lock().unwrap()[0].name(), "Albatros");

        let req = test::TestRequest::post()
            .uri("/api/manifest")
            .set_payload("boat,state_room\nAlbatros,not-a-number\n")
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
    }
}
