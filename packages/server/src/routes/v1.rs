use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::config::AppConfig;
use crate::handlers;
use crate::state::AppState;

pub fn routes(config: &AppConfig) -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::navigation::navigation))
        .nest("/app", app_routes(config))
        .nest("/admin", admin_routes())
}

fn app_routes(config: &AppConfig) -> OpenApiRouter<AppState> {
    let captions = OpenApiRouter::new()
        .routes(routes!(
            handlers::caption::generate_caption,
            handlers::caption::list_captions
        ))
        .layer(handlers::caption::upload_body_limit(
            config.caption.max_upload_bytes,
        ));

    OpenApiRouter::new()
        .routes(routes!(handlers::device::register_device))
        .routes(routes!(handlers::device::me))
        .routes(routes!(handlers::device::list_styles))
        .routes(routes!(handlers::ad::start_ad))
        .routes(routes!(handlers::ad::get_ad))
        .routes(routes!(handlers::ad::complete_ad))
        .merge(captions)
}

fn admin_routes() -> OpenApiRouter<AppState> {
    use handlers::admin::{analytics, auth, platform, settings, system, user};

    OpenApiRouter::new()
        .routes(routes!(auth::login))
        .routes(routes!(analytics::analytics))
        .routes(routes!(platform::list_catalog))
        .routes(routes!(
            platform::list_platforms,
            platform::create_platform,
            platform::bulk_update_platforms
        ))
        .routes(routes!(user::list_users))
        .routes(routes!(user::grant_coins))
        .routes(routes!(system::export_data))
        .routes(routes!(system::backup_database))
        .routes(routes!(settings::get_settings, settings::update_settings))
}
