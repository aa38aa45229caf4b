use crate::db::Storage;
use crate::filters::{with_auth, with_json_body, with_registry, with_storage};
use crate::handlers;
use crate::models::{DeviceConfig, RangeQueries, UplinkPayload};
use crate::registry::Registry;
use std::sync::Arc;
use warp::Filter;

pub fn all_routes(
    storage: Storage,
    registry: Arc<Registry>,
    front_secret: String,
    helium_secret: String,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    health()
        .or(collections_route(
            storage.clone(),
            registry.clone(),
            front_secret.clone(),
        ))
        .or(latest_data_route(storage.clone(), front_secret.clone()))
        .or(data_range_route(storage.clone(), front_secret.clone()))
        .or(connected_lights_route(registry.clone(), front_secret.clone()))
        .or(save_config_route(storage.clone(), registry, front_secret.clone()))
        .or(get_config_route(storage.clone(), front_secret))
        .or(save_data_route(storage, helium_secret))
}

fn health() -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    warp::path!("api" / "health")
        .and(warp::get())
        .map(|| "Le serveur IntelliZon est en marche !")
}

fn collections_route(
    storage: Storage,
    registry: Arc<Registry>,
    secret: String,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    warp::path!("api" / "intellizon-front" / "collections")
        .and(warp::get())
        .and(with_auth(secret))
        .and(with_storage(storage))
        .and(with_registry(registry))
        .and_then(handlers::devices::collections_handler)
}

fn latest_data_route(
    storage: Storage,
    secret: String,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    warp::path!("api" / "intellizon-front" / "getLatestData" / String)
        .and(warp::get())
        .and(with_auth(secret))
        .and(with_storage(storage))
        .and_then(handlers::devices::latest_data_handler)
}

fn data_range_route(
    storage: Storage,
    secret: String,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    warp::path!("api" / "intellizon-front" / "getDataRange" / String)
        .and(warp::get())
        .and(with_auth(secret))
        .and(warp::query::<RangeQueries>())
        .and(with_storage(storage))
        .and_then(handlers::devices::data_range_handler)
}

fn connected_lights_route(
    registry: Arc<Registry>,
    secret: String,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    warp::path!("api" / "intellizon-front" / "getConnectedLights")
        .and(warp::get())
        .and(with_auth(secret))
        .and(with_registry(registry))
        .and_then(handlers::config::connected_lights_handler)
}

fn save_config_route(
    storage: Storage,
    registry: Arc<Registry>,
    secret: String,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    warp::path!("api" / "intellizon-front" / "saveConfig" / String)
        .and(warp::put())
        .and(with_auth(secret))
        .and(with_json_body::<DeviceConfig>())
        .and(with_storage(storage))
        .and(with_registry(registry))
        .and_then(handlers::config::save_config_handler)
}

fn get_config_route(
    storage: Storage,
    secret: String,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    warp::path!("api" / "intellizon-front" / "getConfig" / String)
        .and(warp::get())
        .and(with_auth(secret))
        .and(with_storage(storage))
        .and_then(handlers::config::get_config_handler)
}

fn save_data_route(
    storage: Storage,
    secret: String,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    warp::path!("api" / "helium" / "saveData")
        .and(warp::post())
        .and(with_auth(secret))
        .and(with_json_body::<UplinkPayload>())
        .and(with_storage(storage))
        .and_then(handlers::ingest::save_data_handler)
}

// Auth and validation rejections happen before any storage operation, so the
// routes can be driven end to end without a running MongoDB; the driver only
// connects on the first actual operation.
#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::handle_rejection;
    use serde_json::json;

    const FRONT_SECRET: &str = "front-test-secret";
    const HELIUM_SECRET: &str = "helium-test-secret";

    async fn test_routes(
    ) -> impl Filter<Extract = (impl warp::Reply,), Error = std::convert::Infallible> + Clone {
        let storage = Storage::connect("mongodb://127.0.0.1:27017").await.unwrap();
        let registry = Arc::new(Registry::load(None).unwrap());

        all_routes(
            storage,
            registry,
            FRONT_SECRET.to_string(),
            HELIUM_SECRET.to_string(),
        )
        .recover(handle_rejection)
    }

    #[tokio::test]
    async fn health_needs_no_token() {
        let routes = test_routes().await;

        let res = warp::test::request()
            .method("GET")
            .path("/api/health")
            .reply(&routes)
            .await;

        assert_eq!(res.status(), 200);
        assert_eq!(res.body(), "Le serveur IntelliZon est en marche !");
    }

    #[tokio::test]
    async fn front_routes_reject_a_missing_token() {
        let routes = test_routes().await;

        for path in [
            "/api/intellizon-front/collections",
            "/api/intellizon-front/getLatestData/abc",
            "/api/intellizon-front/getDataRange/abc",
            "/api/intellizon-front/getConnectedLights",
            "/api/intellizon-front/getConfig/abc",
        ] {
            let res = warp::test::request().method("GET").path(path).reply(&routes).await;
            assert_eq!(res.status(), 401, "expected 401 for {}", path);
        }
    }

    #[tokio::test]
    async fn front_routes_reject_a_wrong_token() {
        let routes = test_routes().await;

        let res = warp::test::request()
            .method("GET")
            .path("/api/intellizon-front/collections")
            .header("authorization", "not-the-secret")
            .reply(&routes)
            .await;

        assert_eq!(res.status(), 401);
    }

    #[tokio::test]
    async fn helium_secret_does_not_open_front_routes() {
        let routes = test_routes().await;

        let res = warp::test::request()
            .method("GET")
            .path("/api/intellizon-front/getConnectedLights")
            .header("authorization", HELIUM_SECRET)
            .reply(&routes)
            .await;

        assert_eq!(res.status(), 401);
    }

    #[tokio::test]
    async fn connected_lights_returns_the_registry() {
        let routes = test_routes().await;

        let res = warp::test::request()
            .method("GET")
            .path("/api/intellizon-front/getConnectedLights")
            .header("authorization", FRONT_SECRET)
            .reply(&routes)
            .await;

        assert_eq!(res.status(), 200);

        let body: serde_json::Value = serde_json::from_slice(res.body()).unwrap();
        let expected = serde_json::to_value(&Registry::load(None).unwrap().lights).unwrap();
        assert_eq!(body, expected);
    }

    #[tokio::test]
    async fn save_data_rejects_a_missing_token() {
        let routes = test_routes().await;

        let res = warp::test::request()
            .method("POST")
            .path("/api/helium/saveData")
            .json(&json!({
                "deviceInfo": { "devEui": "abc" },
                "time": "2024-01-01T00:00:00Z",
                "object": { "humidity": 5500, "temp": 2200, "light": 300 }
            }))
            .reply(&routes)
            .await;

        assert_eq!(res.status(), 401);
    }

    #[tokio::test]
    async fn save_data_rejects_a_missing_measurement() {
        let routes = test_routes().await;

        let res = warp::test::request()
            .method("POST")
            .path("/api/helium/saveData")
            .header("authorization", HELIUM_SECRET)
            .json(&json!({
                "deviceInfo": { "devEui": "abc" },
                "time": "2024-01-01T00:00:00Z",
                "object": { "humidity": 5500, "light": 300 }
            }))
            .reply(&routes)
            .await;

        assert_eq!(res.status(), 400);
        let body = std::str::from_utf8(res.body()).unwrap();
        assert!(body.contains("temp"));
    }

    #[tokio::test]
    async fn save_data_rejects_a_missing_time() {
        let routes = test_routes().await;

        let res = warp::test::request()
            .method("POST")
            .path("/api/helium/saveData")
            .header("authorization", HELIUM_SECRET)
            .json(&json!({
                "deviceInfo": { "devEui": "abc" },
                "object": { "humidity": 5500, "temp": 2200, "light": 300 }
            }))
            .reply(&routes)
            .await;

        assert_eq!(res.status(), 400);
        let body = std::str::from_utf8(res.body()).unwrap();
        assert!(body.contains("time"));
    }

    #[tokio::test]
    async fn data_range_rejects_an_unparsable_date() {
        let routes = test_routes().await;

        let res = warp::test::request()
            .method("GET")
            .path("/api/intellizon-front/getDataRange/abc?start=yesterday")
            .header("authorization", FRONT_SECRET)
            .reply(&routes)
            .await;

        assert_eq!(res.status(), 400);
    }

    #[tokio::test]
    async fn save_config_rejects_min_above_max() {
        let routes = test_routes().await;

        let res = warp::test::request()
            .method("PUT")
            .path("/api/intellizon-front/saveConfig/abc")
            .header("authorization", FRONT_SECRET)
            .json(&json!({ "temperature": { "min": 8, "max": 3 } }))
            .reply(&routes)
            .await;

        assert_eq!(res.status(), 400);
        let body = std::str::from_utf8(res.body()).unwrap();
        assert!(body.contains("min"));
    }

    #[tokio::test]
    async fn save_config_rejects_an_empty_range() {
        let routes = test_routes().await;

        let res = warp::test::request()
            .method("PUT")
            .path("/api/intellizon-front/saveConfig/abc")
            .header("authorization", FRONT_SECRET)
            .json(&json!({ "humidity": {} }))
            .reply(&routes)
            .await;

        assert_eq!(res.status(), 400);
    }

    #[tokio::test]
    async fn save_config_rejects_a_non_numeric_bound() {
        let routes = test_routes().await;

        let res = warp::test::request()
            .method("PUT")
            .path("/api/intellizon-front/saveConfig/abc")
            .header("authorization", FRONT_SECRET)
            .json(&json!({ "temperature": { "min": "low" } }))
            .reply(&routes)
            .await;

        assert_eq!(res.status(), 400);
    }

    #[tokio::test]
    async fn save_config_rejects_an_out_of_range_toggle() {
        let routes = test_routes().await;

        let res = warp::test::request()
            .method("PUT")
            .path("/api/intellizon-front/saveConfig/abc")
            .header("authorization", FRONT_SECRET)
            .json(&json!({ "light": { "toggle": 1500, "controlledLights": ["a"] } }))
            .reply(&routes)
            .await;

        assert_eq!(res.status(), 400);
        let body = std::str::from_utf8(res.body()).unwrap();
        assert!(body.contains("toggle"));
    }

    #[tokio::test]
    async fn save_config_rejects_empty_controlled_lights() {
        let routes = test_routes().await;

        let res = warp::test::request()
            .method("PUT")
            .path("/api/intellizon-front/saveConfig/abc")
            .header("authorization", FRONT_SECRET)
            .json(&json!({ "light": { "toggle": 500, "controlledLights": [] } }))
            .reply(&routes)
            .await;

        assert_eq!(res.status(), 400);
    }

    #[tokio::test]
    async fn save_config_rejects_an_unknown_light_id() {
        let routes = test_routes().await;

        let res = warp::test::request()
            .method("PUT")
            .path("/api/intellizon-front/saveConfig/abc")
            .header("authorization", FRONT_SECRET)
            .json(&json!({ "light": { "toggle": 500, "controlledLights": ["unknown-id"] } }))
            .reply(&routes)
            .await;

        assert_eq!(res.status(), 400);
        let body = std::str::from_utf8(res.body()).unwrap();
        assert!(body.contains("unknown-id"));
    }
}
