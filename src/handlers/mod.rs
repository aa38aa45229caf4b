pub mod config;
pub mod devices;
pub mod ingest;

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
            ingest::save_data_handler,
            devices::collections_handler,
            devices::latest_data_handler,
            devices::data_range_handler,
            config::connected_lights_handler,
            config::get_config_handler,
            config::save_config_handler,
        )
    )
]
pub struct IntellizonApi;
