use crate::db::Storage;
use crate::errors::{AppError, ErrorMessage, ErrorType};
use crate::models::{DeviceDescriptor, RangeQueries, SensorReading};
use crate::registry::{Registry, DEVICE_TYPE};
use chrono::{DateTime, Utc};
use std::sync::Arc;

#[utoipa::path(
        get,
        path = "/api/intellizon-front/collections",
        responses(
            (status = 200, description = "Devices with stored readings", body = [DeviceDescriptor]),
            (status = 401, description = "Unauthorized", body = ErrorMessage),
            (status = 500, description = "Internal Server Error", body = ErrorMessage),
        )
    )
]
pub async fn collections_handler(
    storage: Storage,
    registry: Arc<Registry>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let devices = storage
        .device_ids()
        .await
        .map_err(warp::reject::custom)?
        .into_iter()
        .map(|device_eui| DeviceDescriptor {
            device_name: registry.device_name(&device_eui),
            device_type: DEVICE_TYPE.to_string(),
            device_eui,
        })
        .collect::<Vec<_>>();

    Ok(warp::reply::json(&devices))
}

#[utoipa::path(
        get,
        path = "/api/intellizon-front/getLatestData/{device}",
        params(
            ("device" = String, Path, description = "Device EUI"),
        ),
        responses(
            (status = 200, description = "Latest reading, or null when the device has none", body = SensorReading),
            (status = 401, description = "Unauthorized", body = ErrorMessage),
            (status = 500, description = "Internal Server Error", body = ErrorMessage),
        )
    )
]
pub async fn latest_data_handler(
    device: String,
    storage: Storage,
) -> Result<impl warp::Reply, warp::Rejection> {
    let reading = storage
        .latest_reading(&device)
        .await
        .map_err(warp::reject::custom)?;

    Ok(warp::reply::json(&reading))
}

#[utoipa::path(
        get,
        path = "/api/intellizon-front/getDataRange/{device}",
        params(
            ("device" = String, Path, description = "Device EUI"),
            RangeQueries,
        ),
        responses(
            (status = 200, description = "Readings within the range", body = [SensorReading]),
            (status = 400, description = "Unparsable start or end date", body = ErrorMessage),
            (status = 401, description = "Unauthorized", body = ErrorMessage),
            (status = 500, description = "Internal Server Error", body = ErrorMessage),
        )
    )
]
pub async fn data_range_handler(
    device: String,
    opts: RangeQueries,
    storage: Storage,
) -> Result<impl warp::Reply, warp::Rejection> {
    let (start, end) = parse_range(&opts)
        .map_err(|message| warp::reject::custom(AppError::new(&message, ErrorType::BadRequest)))?;

    let readings = storage
        .readings_in_range(&device, start, end)
        .await
        .map_err(warp::reject::custom)?;

    Ok(warp::reply::json(&readings))
}

fn parse_range(
    opts: &RangeQueries,
) -> Result<(Option<DateTime<Utc>>, Option<DateTime<Utc>>), String> {
    let parse = |value: &str, name: &str| {
        DateTime::parse_from_rfc3339(value)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|err| format!("Invalid {} date: {}", name, err))
    };

    let start = match &opts.start {
        Some(value) => Some(parse(value, "start")?),
        None => None,
    };
    let end = match &opts.end {
        Some(value) => Some(parse(value, "end")?),
        None => None,
    };

    Ok((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn absent_bounds_stay_unbounded() {
        let opts = RangeQueries { start: None, end: None };
        assert_eq!(parse_range(&opts).unwrap(), (None, None));
    }

    #[test]
    fn rfc3339_bounds_are_parsed_to_utc() {
        let opts = RangeQueries {
            start: Some("2024-01-01T00:00:00+01:00".to_string()),
            end: Some("2024-02-01T00:00:00Z".to_string()),
        };
        let (start, end) = parse_range(&opts).unwrap();
        assert_eq!(start.unwrap(), Utc.with_ymd_and_hms(2023, 12, 31, 23, 0, 0).unwrap());
        assert_eq!(end.unwrap(), Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn unparsable_bound_is_an_error() {
        let opts = RangeQueries {
            start: Some("yesterday".to_string()),
            end: None,
        };
        assert!(parse_range(&opts).unwrap_err().contains("start"));
    }
}
