#[macro_use] extern crate rocket;
use std::net::IpAddr;
use rocket::fairing::AdHoc;
use rocket::form::Form;
use rocket::response::Redirect;
use rocket::State;
use rocket_db_pools::{Connection, Database};
use rocket_dyn_templates::{Template, context};
use serde::Serialize;

use config::AppConfig;
use models::{RsvpInsert, RsvpWithGuests};
use store::{Db, StoreError};
use throttle::Redis;

pub mod config;
pub mod dashboard;
pub mod guests;
pub mod models;
pub mod notify;
pub mod schema;
pub mod store;
pub mod throttle;

const SUBMIT_FAILED: &str = "Failed to submit RSVP. Please try again.";
const FETCH_FAILED: &str = "Failed to fetch RSVPs.";

#[derive(FromFormField, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
enum Attendance {
    #[field(value = "yes")]
    Yes,
    #[field(value = "no")]
    No,
}

#[derive(FromForm)]
struct RsvpForm {
    attending: Attendance,
    guests: Option<String>,
    allergies: Option<String>,
}

#[get("/")]
fn index(config: &State<AppConfig>) -> Template {
    Template::render("index", context! {
        event: &config.event,
        error: Option::<&str>::None,
        attending: Option::<Attendance>::None,
        guests: "",
        allergies: "",
    })
}

#[get("/rsvp")]
fn rsvp_redir() -> Redirect {
    Redirect::to(uri!(index))
}

#[post("/rsvp", data = "<rsvp>")]
async fn rsvp_submit(
    rsvp: Form<RsvpForm>,
    config: &State<AppConfig>,
    mut db: Option<Connection<Db>>,
    mut redis: Option<Connection<Redis>>,
    client_ip: Option<IpAddr>,
) -> Template {
    let network = throttle::network_of(client_ip);

    if let Some(r) = redis.as_mut() {
        if !throttle::claim_submission(r, &network, &config.throttle).await {
            log::warn!("throttling rsvp submissions from {network}");
            return Template::render("slowdown", context! { event: &config.event });
        }
    }

    let insert = RsvpInsert::from_form(
        rsvp.attending == Attendance::Yes,
        rsvp.guests.as_deref(),
        rsvp.allergies.as_deref(),
    );

    let stored = match db.as_mut() {
        Some(db) => store::submit(db, insert).await,
        None => Err(StoreError::Unavailable),
    };

    match stored {
        Ok(record) => {
            let response = RsvpWithGuests::from(record);
            notify::spawn(config.notify.clone(), response.clone());

            Template::render("thankyou", context! {
                event: &config.event,
                attending: response.rsvp.attending,
                guests: &response.parsed_guests,
            })
        }
        Err(e) => {
            log::error!("error submitting rsvp: {e}");
            Template::render("index", context! {
                event: &config.event,
                error: SUBMIT_FAILED,
                attending: rsvp.attending,
                guests: rsvp.guests.as_deref().unwrap_or(""),
                allergies: rsvp.allergies.as_deref().unwrap_or(""),
            })
        }
    }
}

#[get("/dashboard")]
async fn rsvp_dashboard(config: &State<AppConfig>, mut db: Option<Connection<Db>>) -> Template {
    let listed = match db.as_mut() {
        Some(db) => store::list_with_guests(db).await,
        None => Err(StoreError::Unavailable),
    };

    match listed {
        Ok(rsvps) => {
            let stats = dashboard::DashboardStats::from_rsvps(&rsvps);
            Template::render("dashboard", context! {
                event: &config.event,
                error: Option::<&str>::None,
                stats: stats,
            })
        }
        Err(e) => {
            log::error!("error fetching rsvps: {e}");
            Template::render("dashboard", context! {
                event: &config.event,
                error: FETCH_FAILED,
                stats: dashboard::DashboardStats::default(),
            })
        }
    }
}

#[launch]
fn rocket() -> _ {
    rocket::build()
        .mount("/", routes![index, rsvp_redir, rsvp_submit, rsvp_dashboard])
        .attach(AdHoc::config::<AppConfig>())
        .attach(Template::fairing())
        .attach(Db::init())
        .attach(Redis::init())
}
