use bson::oid::ObjectId;
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, ToSchema)]
pub struct Measurement {
    pub value: f64,
    pub unit: String,
}

/// One stored reading. All readings live in a single collection with a
/// `deviceId` field; one device's history is the set of documents sharing it.
#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct SensorReading {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub id: Option<ObjectId>,
    #[serde(rename = "deviceId")]
    pub device_id: String,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub datetime: DateTime<Utc>,
    pub humidity: Measurement,
    pub temperature: Measurement,
    pub light: Measurement,
}

// Webhook body pushed by the Helium network server
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UplinkPayload {
    pub device_info: DeviceInfo,
    pub time: Option<UplinkTime>,
    pub object: UplinkObject,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeviceInfo {
    #[serde(rename = "devEui")]
    pub dev_eui: String,
}

/// The uplink `time` arrives either as an RFC 3339 string or as unix epoch
/// milliseconds, depending on the network server's codec.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum UplinkTime {
    Iso(String),
    Millis(i64),
}

impl UplinkTime {
    pub fn to_datetime(&self) -> Result<DateTime<Utc>, String> {
        match self {
            UplinkTime::Iso(value) => DateTime::parse_from_rfc3339(value)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|err| format!("Invalid time value: {}", err)),
            UplinkTime::Millis(millis) => Utc
                .timestamp_millis_opt(*millis)
                .single()
                .ok_or_else(|| format!("Invalid time value: {}", millis)),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UplinkObject {
    pub humidity: Option<f64>,
    pub temp: Option<f64>,
    pub light: Option<f64>,
}

impl SensorReading {
    /// Normalize an uplink into the stored shape. Humidity and temperature
    /// arrive as integer hundredths. Absence is checked per field so that a
    /// zero reading is still accepted.
    pub fn from_uplink(payload: UplinkPayload) -> Result<SensorReading, String> {
        let device_id = payload.device_info.dev_eui;
        if device_id.is_empty() {
            return Err("Missing required field: deviceInfo.devEui".to_string());
        }

        let datetime = match payload.time {
            Some(time) => time.to_datetime()?,
            None => return Err("Missing required field: time".to_string()),
        };

        let humidity = payload
            .object
            .humidity
            .ok_or_else(|| "Missing required field: object.humidity".to_string())?;
        let temperature = payload
            .object
            .temp
            .ok_or_else(|| "Missing required field: object.temp".to_string())?;
        let light = payload
            .object
            .light
            .ok_or_else(|| "Missing required field: object.light".to_string())?;

        Ok(SensorReading {
            id: None,
            device_id,
            datetime,
            humidity: Measurement {
                value: humidity / 100.0,
                unit: "%".to_string(),
            },
            temperature: Measurement {
                value: temperature / 100.0,
                unit: "°C".to_string(),
            },
            light: Measurement {
                value: light,
                unit: "lx".to_string(),
            },
        })
    }
}

/// Per-device alert configuration, upserted whole on every save.
#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct DeviceConfig {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<AlertRange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub humidity: Option<AlertRange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub light: Option<LightRule>,
}

#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct AlertRange {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct LightRule {
    pub toggle: Option<f64>,
    #[serde(rename = "controlledLights")]
    pub controlled_lights: Option<Vec<String>>,
}

// What the dashboard lists; derived, never stored
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeviceDescriptor {
    pub device_eui: String,
    pub device_name: String,
    pub device_type: String,
}

// Query for the getDataRange route, both bounds optional
#[derive(Debug, Serialize, Deserialize, IntoParams)]
pub struct RangeQueries {
    pub start: Option<String>,
    pub end: Option<String>,
}
