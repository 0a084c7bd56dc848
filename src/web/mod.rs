// src/web/mod.rs
use crate::search::{JobRecord, JobSearch, SearchQuery};
use anyhow::Result;
use rocket::fairing::{Fairing, Info, Kind};
use rocket::http::{Header, Status};
use rocket::response::status::Custom;
use rocket::serde::json::{json, Json, Value};
use rocket::{get, routes, Build, Request, Response, Rocket, State};
use tracing::info;

/// Jobs requested when the query string does not say.
const DEFAULT_NUM_JOBS: usize = 10;

// CORS fairing: the API is consumed from browsers on other origins.
pub struct Cors;

#[rocket::async_trait]
impl Fairing for Cors {
    fn info(&self) -> Info {
        Info {
            name: "Add CORS headers to responses",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, _request: &'r Request<'_>, response: &mut Response<'r>) {
        response.set_header(Header::new("Access-Control-Allow-Origin", "*"));
        response.set_header(Header::new("Access-Control-Allow-Methods", "GET, OPTIONS"));
        response.set_header(Header::new("Access-Control-Allow-Headers", "*"));
    }
}

#[get("/jobs?<title>&<location>&<num_jobs>")]
pub async fn jobs(
    title: Option<String>,
    location: Option<String>,
    num_jobs: Option<usize>,
    search: &State<JobSearch>,
) -> Result<Json<Vec<JobRecord>>, Custom<Json<Value>>> {
    let (title, location) = match (
        title.filter(|t| !t.trim().is_empty()),
        location.filter(|l| !l.trim().is_empty()),
    ) {
        (Some(title), Some(location)) => (title, location),
        _ => {
            return Err(Custom(
                Status::BadRequest,
                Json(json!({
                    "error": "Please provide both title and location parameters"
                })),
            ))
        }
    };

    let num_jobs = num_jobs.unwrap_or(DEFAULT_NUM_JOBS);
    if num_jobs == 0 {
        return Err(Custom(
            Status::BadRequest,
            Json(json!({ "error": "num_jobs must be a positive integer" })),
        ));
    }

    info!(
        "Job search request: title='{}' location='{}' num_jobs={}",
        title, location, num_jobs
    );

    let query = SearchQuery {
        title,
        location,
        start: 0,
        max_results: num_jobs,
    };
    let records = search.search(&query).await;

    if records.is_empty() {
        return Err(Custom(
            Status::NotFound,
            Json(json!({ "message": "No jobs found" })),
        ));
    }

    Ok(Json(records))
}

#[get("/health")]
pub async fn health() -> Json<&'static str> {
    Json("OK")
}

// Handle OPTIONS requests for CORS preflight
#[rocket::options("/<_..>")]
pub async fn options() -> Status {
    Status::Ok
}

pub fn build_rocket(search: JobSearch, port: u16) -> Rocket<Build> {
    let figment = rocket::Config::figment().merge(("port", port));
    rocket::custom(figment)
        .attach(Cors)
        .manage(search)
        .mount("/", routes![jobs, health, options])
}

pub async fn start_web_server(search: JobSearch, port: u16) -> Result<()> {
    info!("Serving job search API on port {}", port);
    build_rocket(search, port).launch().await?;
    Ok(())
}
