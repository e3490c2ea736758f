pub mod api;
pub mod auth;
pub mod tasks;

use actix_session::Session;
use actix_web::http::header::{self, ContentType};
use actix_web::{get, web, HttpResponse};

use crate::views;

pub(crate) fn redirect(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location.to_string()))
        .finish()
}

pub(crate) fn html(markup: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(markup)
}

#[get("/")]
async fn home(session: Session) -> HttpResponse {
    if crate::auth::current_user(&session).is_some() {
        redirect("/tasks")
    } else {
        redirect("/login")
    }
}

async fn not_found() -> HttpResponse {
    HttpResponse::NotFound()
        .content_type(ContentType::html())
        .body(views::not_found())
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(home)
        .service(auth::register_page)
        .service(auth::register)
        .service(auth::login_page)
        .service(auth::login)
        .service(auth::logout_page)
        .service(auth::logout)
        // Fixed task paths must register before the `{id}` matchers.
        .service(tasks::procrastinate)
        .service(tasks::new_task_page)
        .service(tasks::dashboard)
        .service(tasks::create_task)
        .service(tasks::edit_task_page)
        .service(tasks::view_task)
        .service(tasks::update_task)
        .service(tasks::delete_task)
        .service(api::list_tasks)
        .service(api::create_task)
        .service(api::get_task)
        .service(api::update_task)
        .service(api::delete_task)
        .service(api::list_users)
        .default_service(web::route().to(not_found));
}
