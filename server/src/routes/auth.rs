//! Registration, login and logout. Guest-only pages bounce authenticated
//! users to the dashboard; validation failures re-render the form with the
//! typed values filled back in.

use actix_session::Session;
use actix_web::{get, post, web, HttpResponse};
use serde::Deserialize;

use crate::db::Db;
use crate::routes::{html, redirect};
use crate::{auth, store, views};

#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(rename = "confirmPassword")]
    pub confirm_password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

#[get("/register")]
pub async fn register_page(session: Session) -> HttpResponse {
    if auth::current_user(&session).is_some() {
        return redirect("/tasks");
    }
    html(views::register(None, "", ""))
}

#[post("/register")]
pub async fn register(
    db: web::Data<Db>,
    session: Session,
    form: web::Form<RegisterForm>,
) -> HttpResponse {
    let form = form.into_inner();

    if form.password != form.confirm_password {
        return html(views::register(
            Some("Passwords do not match"),
            &form.username,
            &form.email,
        ));
    }
    if form.password.len() < 6 {
        return html(views::register(
            Some("Password must be at least 6 characters"),
            &form.username,
            &form.email,
        ));
    }

    match db.with_conn(|conn| store::user_exists(conn, &form.email, &form.username)) {
        Ok(true) => {
            return html(views::register(
                Some("User with this email or username already exists"),
                &form.username,
                &form.email,
            ));
        }
        Ok(false) => {}
        Err(err) => {
            log::error!("registration error: {err}");
            return html(views::register(
                Some("Registration failed. Please try again."),
                &form.username,
                &form.email,
            ));
        }
    }

    let hash = match auth::hash_password(&form.password) {
        Ok(hash) => hash,
        Err(err) => {
            log::error!("registration error: {err}");
            return html(views::register(
                Some("Registration failed. Please try again."),
                &form.username,
                &form.email,
            ));
        }
    };

    match db.with_conn(|conn| store::insert_user(conn, &form.username, &form.email, &hash)) {
        Ok(user) => {
            // Auto-login after registration.
            if let Err(err) = auth::log_in(&session, user.id) {
                log::error!("session error after registration: {err}");
            }
            redirect("/tasks")
        }
        Err(err) => {
            log::error!("registration error: {err}");
            html(views::register(
                Some("Registration failed. Please try again."),
                &form.username,
                &form.email,
            ))
        }
    }
}

#[get("/login")]
pub async fn login_page(session: Session) -> HttpResponse {
    if auth::current_user(&session).is_some() {
        return redirect("/tasks");
    }
    html(views::login(None, ""))
}

#[post("/login")]
pub async fn login(db: web::Data<Db>, session: Session, form: web::Form<LoginForm>) -> HttpResponse {
    let form = form.into_inner();

    let user = match db.with_conn(|conn| store::find_user_by_email(conn, &form.email)) {
        Ok(user) => user,
        Err(err) => {
            log::error!("login error: {err}");
            return html(views::login(
                Some("Login failed. Please try again."),
                &form.email,
            ));
        }
    };

    // One message for both unknown email and wrong password.
    let Some(user) = user else {
        return html(views::login(Some("Invalid email or password"), &form.email));
    };
    if !auth::verify_password(&form.password, &user.password_hash) {
        return html(views::login(Some("Invalid email or password"), &form.email));
    }

    if let Err(err) = auth::log_in(&session, user.id) {
        log::error!("session error on login: {err}");
        return html(views::login(
            Some("Login failed. Please try again."),
            &form.email,
        ));
    }
    redirect("/tasks")
}

#[get("/logout")]
pub async fn logout_page(session: Session) -> HttpResponse {
    auth::log_out(&session);
    html(views::logged_out())
}

#[post("/logout")]
pub async fn logout(session: Session) -> HttpResponse {
    auth::log_out(&session);
    redirect("/login")
}
