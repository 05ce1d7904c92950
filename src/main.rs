// src/main.rs

mod app_state;
mod board;
mod config;
mod error;
mod export;
mod models;
mod store;
mod team_management;
mod user_management;

use std::sync::Mutex;

use actix_cors::Cors;
use actix_web::{http, middleware::Logger, web, App, HttpServer};
use env_logger::Env;
use log::info;

use crate::app_state::AppState;
use crate::board::{
    close_board, create_board, create_task, export_board, list_boards, update_task_status,
};
use crate::team_management::{
    add_team_users, create_team, get_team, get_team_members, list_teams, remove_team_users,
    update_team,
};
use crate::user_management::{create_user, get_user, get_user_teams, list_users, update_user};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = config::Config::from_env();
    let store = store::Store::open(&config.data_dir)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    let exporter = export::TextExporter::new(&config.export_dir)?;
    let state = web::Data::new(AppState {
        store: Mutex::new(store),
        exporter,
    });

    let frontend_origin = config.frontend_origin.clone();
    info!("Server running at http://{}", config.bind_addr);

    let bind_addr = config.bind_addr.clone();
    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(&frontend_origin)
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![http::header::CONTENT_TYPE, http::header::ACCEPT])
            .supports_credentials()
            .max_age(3600);

        App::new()
            .wrap(Logger::default())
            .wrap(cors)
            .app_data(state.clone())
            // USERS
            .service(
                web::scope("/users")
                    .route("", web::post().to(create_user))
                    .route("", web::get().to(list_users))
                    .route("/{user_id}", web::get().to(get_user))
                    .route("/{user_id}", web::put().to(update_user))
                    .route("/{user_id}/teams", web::get().to(get_user_teams)),
            )
            // TEAMS
            .service(
                web::scope("/teams")
                    .route("", web::post().to(create_team))
                    .route("", web::get().to(list_teams))
                    .route("/{team_id}", web::get().to(get_team))
                    .route("/{team_id}", web::put().to(update_team))
                    .route("/{team_id}/users", web::get().to(get_team_members))
                    .route("/{team_id}/users", web::post().to(add_team_users))
                    .route("/{team_id}/users", web::delete().to(remove_team_users))
                    .route("/{team_id}/boards", web::get().to(list_boards)),
            )
            // BOARDS
            .service(
                web::scope("/boards")
                    .route("", web::post().to(create_board))
                    .route("/{board_id}/close", web::post().to(close_board))
                    .route("/{board_id}/export", web::get().to(export_board)),
            )
            // TASKS
            .service(
                web::scope("/tasks")
                    .route("", web::post().to(create_task))
                    .route("/{task_id}/status", web::put().to(update_task_status)),
            )
    })
    .bind(&bind_addr)?
    .run()
    .await
}
