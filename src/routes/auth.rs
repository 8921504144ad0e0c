use crate::{
    auth::{LoginRequest, RegisterRequest},
    error::AppError,
    routes::AppState,
};
use actix_web::{get, post, web, HttpResponse, Responder};

/// Register a new user
///
/// Creates the account and returns the new `User`. The password is never echoed.
/// Duplicate usernames or emails answer `409 Conflict`.
#[post("/register")]
pub async fn register(
    state: web::Data<AppState>,
    register_data: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    let user = state.identity.register_user(&register_data)?;
    Ok(HttpResponse::Created().json(user))
}

/// Login user
///
/// Checks the credentials and returns the matching `User`.
#[post("/login")]
pub async fn login(
    state: web::Data<AppState>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    match state
        .identity
        .authenticate(&login_data.username, &login_data.password)?
    {
        Some(user) => Ok(HttpResponse::Ok().json(user)),
        None => Err(AppError::Unauthorized("Invalid username or password".into())),
    }
}

/// Every user, for the assignee picker.
#[get("/users")]
pub async fn list_users(state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    Ok(HttpResponse::Ok().json(state.identity.all_users()?))
}
