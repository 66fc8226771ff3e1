use actix_web::{http::StatusCode, web, HttpResponse};
use sea_orm::DatabaseConnection;

use crate::auth::AuthUser;
use crate::config::AppConfig;
use crate::error::AppError;
use crate::response::empty;
use crate::service::social::{FollowOutcome, UnfollowOutcome};
use crate::service::{account, profile, social};
use crate::validation::{ProfileEditRequest, SkillCatalog};

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("").route(web::get().to(list_users)))
        .service(web::resource("/").route(web::get().to(list_users)))
        .service(web::resource("/{username}/following").route(web::get().to(list_following)))
        .service(web::resource("/{username}/followers").route(web::get().to(list_followers)))
        .service(web::resource("/{username}/follow").route(web::post().to(follow_user)))
        .service(web::resource("/{username}/unfollow").route(web::delete().to(unfollow_user)))
        .service(web::resource("/activate/{token}").route(web::get().to(activate_account)))
        .service(
            web::resource("/{username}")
                .route(web::get().to(show_profile))
                .route(web::patch().to(edit_profile))
                .route(web::put().to(edit_profile))
                .route(web::delete().to(delete_account)),
        );
}

async fn list_users(db: web::Data<DatabaseConnection>) -> Result<HttpResponse, AppError> {
    let users = profile::list_users(db.get_ref()).await?;
    Ok(HttpResponse::Ok().json(users))
}

async fn show_profile(
    db: web::Data<DatabaseConnection>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let view = profile::get_profile(db.get_ref(), &path).await?;
    Ok(HttpResponse::Ok().json(view))
}

async fn edit_profile(
    db: web::Data<DatabaseConnection>,
    catalog: web::Data<SkillCatalog>,
    auth: AuthUser,
    path: web::Path<String>,
    payload: web::Json<ProfileEditRequest>,
) -> Result<HttpResponse, AppError> {
    profile::edit_profile(db.get_ref(), &catalog, &path, &auth, payload.into_inner()).await?;
    Ok(empty(StatusCode::CREATED))
}

async fn list_following(
    db: web::Data<DatabaseConnection>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let edges = social::list_following(db.get_ref(), &path).await?;
    Ok(HttpResponse::Ok().json(edges))
}

async fn list_followers(
    db: web::Data<DatabaseConnection>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let edges = social::list_followers(db.get_ref(), &path).await?;
    Ok(HttpResponse::Ok().json(edges))
}

async fn follow_user(
    db: web::Data<DatabaseConnection>,
    auth: AuthUser,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let status = match social::follow(db.get_ref(), &auth.username, &path).await? {
        FollowOutcome::Created => StatusCode::CREATED,
        FollowOutcome::Unchanged => StatusCode::NO_CONTENT,
    };
    Ok(empty(status))
}

async fn unfollow_user(
    db: web::Data<DatabaseConnection>,
    auth: AuthUser,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let status = match social::unfollow(db.get_ref(), &auth.username, &path).await? {
        UnfollowOutcome::Removed => StatusCode::RESET_CONTENT,
        UnfollowOutcome::NotFollowing => StatusCode::NO_CONTENT,
    };
    Ok(empty(status))
}

async fn delete_account(
    db: web::Data<DatabaseConnection>,
    auth: AuthUser,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    account::delete_account(db.get_ref(), &path, &auth).await?;
    Ok(empty(StatusCode::OK))
}

async fn activate_account(
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let activated = account::activate_account(db.get_ref(), &config.activation_secret, &path).await?;
    Ok(HttpResponse::Ok().json(activated))
}
