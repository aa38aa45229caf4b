use crate::db::Storage;
use crate::errors::{AppError, ErrorMessage, ErrorType};
use crate::models::DeviceConfig;
use crate::registry::Registry;
use crate::validation::{validate_ids, validate_min_max, validate_toggle};
use std::sync::Arc;

const TEMPERATURE_BOUNDS: (f64, f64) = (-100.0, 100.0);
const HUMIDITY_BOUNDS: (f64, f64) = (0.0, 100.0);
const LIGHT_TOGGLE_BOUNDS: (f64, f64) = (0.0, 1000.0);

#[utoipa::path(
        get,
        path = "/api/intellizon-front/getConnectedLights",
        responses(
            (status = 200, description = "Connected lights, id to display name"),
            (status = 401, description = "Unauthorized", body = ErrorMessage),
        )
    )
]
pub async fn connected_lights_handler(
    registry: Arc<Registry>,
) -> Result<impl warp::Reply, warp::Rejection> {
    Ok(warp::reply::json(&registry.lights))
}

#[utoipa::path(
        get,
        path = "/api/intellizon-front/getConfig/{device}",
        params(
            ("device" = String, Path, description = "Device EUI"),
        ),
        responses(
            (status = 200, description = "Stored configuration", body = DeviceConfig),
            (status = 401, description = "Unauthorized", body = ErrorMessage),
            (status = 404, description = "No configuration for this device", body = ErrorMessage),
            (status = 500, description = "Internal Server Error", body = ErrorMessage),
        )
    )
]
pub async fn get_config_handler(
    device: String,
    storage: Storage,
) -> Result<impl warp::Reply, warp::Rejection> {
    match storage.config_for(&device).await.map_err(warp::reject::custom)? {
        Some(config) => Ok(warp::reply::json(&config)),
        None => {
            let message = format!("No configuration found for device {}", device);
            Err(warp::reject::custom(AppError::new(
                &message,
                ErrorType::NotFound,
            )))
        }
    }
}

#[utoipa::path(
        put,
        path = "/api/intellizon-front/saveConfig/{device}",
        params(
            ("device" = String, Path, description = "Device EUI"),
        ),
        request_body = DeviceConfig,
        responses(
            (status = 200, description = "Configuration replaced", body = String),
            (status = 400, description = "Failed validation", body = ErrorMessage),
            (status = 401, description = "Unauthorized", body = ErrorMessage),
            (status = 500, description = "Internal Server Error", body = ErrorMessage),
        )
    )
]
pub async fn save_config_handler(
    device: String,
    config: DeviceConfig,
    storage: Storage,
    registry: Arc<Registry>,
) -> Result<impl warp::Reply, warp::Rejection> {
    validate_config(&config, &registry)
        .map_err(|message| warp::reject::custom(AppError::new(&message, ErrorType::BadRequest)))?;

    storage
        .save_config(&device, config)
        .await
        .map_err(warp::reject::custom)?;

    log::info!("Replaced the configuration of device {}", device);

    Ok("OK")
}

// Sections checked in a fixed order, first failure wins
fn validate_config(config: &DeviceConfig, registry: &Registry) -> Result<(), String> {
    if let Some(range) = &config.temperature {
        validate_min_max(
            range.min,
            range.max,
            TEMPERATURE_BOUNDS.0,
            TEMPERATURE_BOUNDS.1,
            "temperature",
        )?;
    }
    if let Some(range) = &config.humidity {
        validate_min_max(
            range.min,
            range.max,
            HUMIDITY_BOUNDS.0,
            HUMIDITY_BOUNDS.1,
            "humidity",
        )?;
    }
    if let Some(rule) = &config.light {
        validate_toggle(
            rule.toggle,
            LIGHT_TOGGLE_BOUNDS.0,
            LIGHT_TOGGLE_BOUNDS.1,
            "light",
        )?;
        validate_ids(rule.controlled_lights.as_deref(), &registry.light_ids(), "light")?;
    }

    Ok(())
}
