use crate::db::Storage;
use crate::errors::{AppError, ErrorMessage, ErrorType};
use crate::models::{SensorReading, UplinkPayload};

#[utoipa::path(
        post,
        path = "/api/helium/saveData",
        request_body = UplinkPayload,
        responses(
            (status = 200, description = "Reading stored", body = String),
            (status = 400, description = "Missing or invalid field", body = ErrorMessage),
            (status = 401, description = "Unauthorized", body = ErrorMessage),
            (status = 500, description = "Internal Server Error", body = ErrorMessage),
        )
    )
]
pub async fn save_data_handler(
    payload: UplinkPayload,
    storage: Storage,
) -> Result<impl warp::Reply, warp::Rejection> {
    let reading = SensorReading::from_uplink(payload)
        .map_err(|message| warp::reject::custom(AppError::new(&message, ErrorType::BadRequest)))?;

    let inserted_id = storage
        .insert_reading(&reading)
        .await
        .map_err(warp::reject::custom)?;

    log::info!(
        "Stored a reading for device {} with id {}",
        reading.device_id,
        inserted_id
    );

    Ok("OK")
}
