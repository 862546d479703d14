use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod api;
mod auth;
mod config;
mod db;
mod entities;
mod error;
mod models;
mod services;

use config::Config;
use db::create_mysql_pool;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env().expect("Failed to load configuration");

    log::info!(
        "Starting server on {}:{}",
        config.server.host,
        config.server.port
    );
    let mysql_pool = create_mysql_pool(&config)
        .await
        .expect("Failed to create MySQL pool");

    log::info!("Database connection established");

    let openapi = api::ApiDoc::openapi();

    let server_host = config.server.host.clone();
    let server_port = config.server.port;
    HttpServer::new(move || {
        // The browser client is served from a different origin.
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header();

        App::new()
            .wrap(Logger::default())
            .wrap(cors)
            .app_data(web::Data::new(config.clone()))
            .app_data(web::Data::new(mysql_pool.clone()))
            .route(
                "/api/docs",
                web::get().to(|| async {
                    actix_web::HttpResponse::PermanentRedirect()
                        .append_header(("Location", "/api/docs/"))
                        .finish()
                }),
            )
            .service(
                SwaggerUi::new("/api/docs/{_:.*}").url("/api-docs/openapi.json", openapi.clone()),
            )
            .service(
                web::scope("/users")
                    .route("/register", web::post().to(api::users::register))
                    .route("/login", web::post().to(api::users::login))
                    .route("/user/{username}", web::get().to(api::users::get_profile))
                    .route("/follow", web::post().to(api::users::toggle_follow))
                    .route("/bio", web::put().to(api::users::update_bio))
                    .route("/password", web::put().to(api::users::change_password)),
            )
            .service(
                web::scope("/posts")
                    .route("/post", web::post().to(api::posts::create_post))
                    .route("/feed", web::get().to(api::posts::get_feed))
                    .route("/user/{username}", web::get().to(api::posts::get_user_posts))
                    .route("/{post_id}", web::delete().to(api::posts::delete_post))
                    .route("/{post_id}/like", web::post().to(api::posts::like_post))
                    .route("/{post_id}/like", web::delete().to(api::posts::unlike_post)),
            )
            .service(
                web::scope("/comments")
                    .route(
                        "/post/{post_id}",
                        web::post().to(api::comments::create_comment),
                    )
                    .route("/post/{post_id}", web::get().to(api::comments::get_comments))
                    .route(
                        "/{comment_id}",
                        web::delete().to(api::comments::delete_comment),
                    ),
            )
            .service(
                web::scope("/chats")
                    .route("/chat", web::post().to(api::chats::open_chat))
                    .route("/userChats", web::get().to(api::chats::get_user_chats))
                    .route("/chat/{chat_id}", web::get().to(api::chats::get_chat))
                    .route(
                        "/chat/{chat_id}/newMessage",
                        web::post().to(api::chats::new_message),
                    ),
            )
    })
    .bind(format!("{}:{}", server_host, server_port))?
    .run()
    .await
}
