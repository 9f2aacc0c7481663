use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderValue, Method, Request, Response, header};
use axum_extra::headers::{Authorization, Header};
use presence_server::app::create_app;
use presence_server::configs::{Auth, CorruptPolicy, Devices, Logger, Server, Settings, Store, User};
use tempfile::TempDir;

pub const TRUSTED_DEVICE: &str = "AAAAAAAA-BBBB-CCCC-DDDD-EEEEEEEEEEEE";
pub const USERNAME: &str = "user";
pub const PASSWORD: &str = "pass";

pub struct MockApp {
    pub router: Router,
    pub store_path: PathBuf,
    _dir: TempDir,
}

impl MockApp {
    pub async fn new() -> Self {
        Self::with_settings(|_| {}).await
    }

    pub async fn with_settings(customize: impl FnOnce(&mut Settings)) -> Self {
        let dir = TempDir::new().unwrap();

        let mut settings = Settings {
            server: Server {
                host: String::from("127.0.0.1"),
                port: 0,
            },
            logger: Logger {
                level: String::from("debug"),
            },
            store: Store {
                path: dir.path().join("geofencing.json"),
                on_corrupt: CorruptPolicy::Reset,
            },
            auth: Auth {
                users: vec![User {
                    username: USERNAME.to_string(),
                    password: PASSWORD.to_string(),
                }],
                credentials: HashMap::new(),
            },
            devices: Devices {
                trusted: HashSet::from([TRUSTED_DEVICE.to_string()]),
                skip_auth_for_trusted: true,
            },
        };
        customize(&mut settings);
        let settings = settings.normalized().unwrap();

        let store_path = settings.store.path.clone();
        let router = create_app(&Arc::new(settings)).await.unwrap();

        Self {
            router,
            store_path,
            _dir: dir,
        }
    }
}

fn basic(username: &str, password: &str) -> HeaderValue {
    let mut values: Vec<HeaderValue> = Vec::new();
    Authorization::basic(username, password).encode(&mut values);

    values.remove(0)
}

pub fn report_request(device_id: &str, action: &str, credentials: Option<(&str, &str)>) -> Request<Body> {
    let mut builder = Request::builder()
        .uri("/api/geofence")
        .method(Method::POST)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");

    if let Some((username, password)) = credentials {
        builder = builder.header(header::AUTHORIZATION, basic(username, password));
    }

    builder
        .body(Body::from(format!("device-id={device_id}&action={action}")))
        .unwrap()
}

pub fn list_request(credentials: Option<(&str, &str)>) -> Request<Body> {
    let mut builder = Request::builder().uri("/api/geofence").method(Method::GET);

    if let Some((username, password)) = credentials {
        builder = builder.header(header::AUTHORIZATION, basic(username, password));
    }

    builder.body(Body::empty()).unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
