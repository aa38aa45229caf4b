use crate::errors::AppError;
use crate::models::{DeviceConfig, SensorReading};
use bson::{doc, Bson, Document};
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::options::{ClientOptions, FindOneOptions, IndexOptions, ReplaceOptions};
use mongodb::{Client, Collection, IndexModel};

const DATABASE: &str = "intellizon_helium";
const READINGS_COLLECTION: &str = "sensor_readings";
const CONFIGS_COLLECTION: &str = "device_configs";

/// Storage access layer. One client for the life of the process; the driver
/// pools connections internally, nothing is opened or torn down per request.
/// Each method performs exactly one logical operation.
#[derive(Clone)]
pub struct Storage {
    db: mongodb::Database,
}

impl Storage {
    pub async fn connect(uri: &str) -> mongodb::error::Result<Storage> {
        let options = ClientOptions::parse(uri).await?;
        let client = Client::with_options(options)?;

        Ok(Storage {
            db: client.database(DATABASE),
        })
    }

    /// Readings are addressed by `(deviceId, datetime)` on every query path.
    pub async fn ensure_indexes(&self) -> mongodb::error::Result<()> {
        let index = IndexModel::builder()
            .keys(doc! { "deviceId": 1, "datetime": 1 })
            .options(
                IndexOptions::builder()
                    .name("deviceId_datetime".to_string())
                    .build(),
            )
            .build();
        self.readings().create_index(index, None).await?;

        Ok(())
    }

    fn readings(&self) -> Collection<SensorReading> {
        self.db.collection(READINGS_COLLECTION)
    }

    fn configs(&self) -> Collection<DeviceConfig> {
        self.db.collection(CONFIGS_COLLECTION)
    }

    pub async fn insert_reading(&self, reading: &SensorReading) -> Result<Bson, AppError> {
        let result = self
            .readings()
            .insert_one(reading, None)
            .await
            .map_err(|err| AppError::from_mongo_err(err, "While inserting a reading:"))?;

        Ok(result.inserted_id)
    }

    /// Latest by insertion order, `None` when the device has no history.
    pub async fn latest_reading(&self, device: &str) -> Result<Option<SensorReading>, AppError> {
        let options = FindOneOptions::builder().sort(doc! { "_id": -1 }).build();

        self.readings()
            .find_one(doc! { "deviceId": device }, options)
            .await
            .map_err(|err| AppError::from_mongo_err(err, "While fetching the latest reading:"))
    }

    pub async fn readings_in_range(
        &self,
        device: &str,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<Vec<SensorReading>, AppError> {
        self.readings()
            .find(range_filter(device, start, end), None)
            .await
            .map_err(|err| AppError::from_mongo_err(err, "While fetching a data range:"))?
            .try_collect()
            .await
            .map_err(|err| AppError::from_mongo_err(err, "While collecting a data range:"))
    }

    pub async fn device_ids(&self) -> Result<Vec<String>, AppError> {
        let ids = self
            .readings()
            .distinct("deviceId", None, None)
            .await
            .map_err(|err| AppError::from_mongo_err(err, "While listing devices:"))?;

        Ok(ids
            .into_iter()
            .filter_map(|id| match id {
                Bson::String(id) => Some(id),
                _ => None,
            })
            .collect())
    }

    pub async fn config_for(&self, device: &str) -> Result<Option<DeviceConfig>, AppError> {
        self.configs()
            .find_one(doc! { "_id": device }, None)
            .await
            .map_err(|err| AppError::from_mongo_err(err, "While fetching a device config:"))
    }

    /// Full replace keyed by device id; the stored document is always the
    /// entire last-submitted config.
    pub async fn save_config(&self, device: &str, mut config: DeviceConfig) -> Result<(), AppError> {
        config.device_id = Some(device.to_string());

        let options = ReplaceOptions::builder().upsert(true).build();
        self.configs()
            .replace_one(doc! { "_id": device }, &config, options)
            .await
            .map_err(|err| AppError::from_mongo_err(err, "While saving a device config:"))?;

        Ok(())
    }
}

/// `>= start` and/or `<= end` on `datetime`; no bounds means the full history.
pub fn range_filter(
    device: &str,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
) -> Document {
    let mut filter = doc! { "deviceId": device };

    let mut datetime = Document::new();
    if let Some(start) = start {
        datetime.insert("$gte", start);
    }
    if let Some(end) = end {
        datetime.insert("$lte", end);
    }
    if !datetime.is_empty() {
        filter.insert("datetime", datetime);
    }

    filter
}
