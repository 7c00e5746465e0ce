use crate::controller::{RefreshController, RefreshOutcome, DECODE_FAILURE_MESSAGE, NO_SOURCE_MESSAGE};
use linecore::prelude::MAX_UPLOAD_BYTES;
use log::info;
use serde::Deserialize;
use serde_json::json;
use std::{net::SocketAddr, sync::Arc, thread};
use tokio::runtime::Builder;
use warp::hyper::body::Bytes;
use warp::{http::StatusCode, Filter};

fn bridge_bind_address(port: u16) -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], port))
}

#[derive(Debug, Deserialize)]
struct UploadQuery {
    name: String,
}

#[derive(Debug, Deserialize)]
struct AutoRefreshRequest {
    enabled: bool,
}

fn reply_json(
    status: StatusCode,
    value: serde_json::Value,
) -> warp::reply::WithStatus<warp::reply::Json> {
    warp::reply::with_status(warp::reply::json(&value), status)
}

/// Bridge that exposes the dashboard model and the upload/refresh controls
/// to the presentation layer.
pub struct DashboardBridge {
    controller: Arc<RefreshController>,
}

impl DashboardBridge {
    pub fn new(controller: Arc<RefreshController>, port: u16) -> Self {
        let shared = controller.clone();
        let controller_filter = warp::any().map(move || shared.clone());

        let dashboard_route = warp::path("dashboard")
            .and(warp::get())
            .and(controller_filter.clone())
            .map(|controller: Arc<RefreshController>| {
                let model = controller.model();
                let snapshot = model.read().unwrap().clone();
                warp::reply::json(&snapshot)
            });

        let session_route = warp::path("session")
            .and(warp::get())
            .and(controller_filter.clone())
            .map(|controller: Arc<RefreshController>| {
                warp::reply::json(&json!({
                    "phase": controller.phase(),
                    "file_name": controller.file_name(),
                    "auto_refresh": controller.auto_refresh_enabled(),
                    "metrics": controller.metrics(),
                }))
            });

        let upload_route = warp::path("upload")
            .and(warp::post())
            .and(warp::query::<UploadQuery>())
            .and(warp::header::optional::<String>("content-type"))
            .and(warp::body::content_length_limit(MAX_UPLOAD_BYTES + 1024))
            .and(warp::body::bytes())
            .and(controller_filter.clone())
            .map(
                |query: UploadQuery,
                 mime: Option<String>,
                 body: Bytes,
                 controller: Arc<RefreshController>| {
                    match controller.stage(&query.name, body.to_vec(), mime.as_deref()) {
                        Ok(()) => match controller.refresh() {
                            RefreshOutcome::Completed => {
                                controller.enable_auto_refresh();
                                reply_json(
                                    StatusCode::OK,
                                    json!({"status": "ok", "file": query.name}),
                                )
                            }
                            _ => {
                                let message = controller.model().read().unwrap().error.clone();
                                reply_json(
                                    StatusCode::UNPROCESSABLE_ENTITY,
                                    json!({"error": message}),
                                )
                            }
                        },
                        Err(err) => reply_json(
                            StatusCode::BAD_REQUEST,
                            json!({"error": err.to_string()}),
                        ),
                    }
                },
            );

        let refresh_route = warp::path("refresh")
            .and(warp::post())
            .and(controller_filter.clone())
            .map(|controller: Arc<RefreshController>| match controller.refresh() {
                RefreshOutcome::Completed => reply_json(StatusCode::OK, json!({"status": "ok"})),
                RefreshOutcome::Dropped => {
                    reply_json(StatusCode::ACCEPTED, json!({"status": "dropped"}))
                }
                RefreshOutcome::NoSource => {
                    reply_json(StatusCode::CONFLICT, json!({"error": NO_SOURCE_MESSAGE}))
                }
                RefreshOutcome::Failed => reply_json(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({"error": DECODE_FAILURE_MESSAGE}),
                ),
            });

        let auto_refresh_route = warp::path("auto-refresh")
            .and(warp::post())
            .and(warp::body::json())
            .and(controller_filter.clone())
            .map(
                |request: AutoRefreshRequest, controller: Arc<RefreshController>| {
                    if request.enabled {
                        controller.enable_auto_refresh();
                    } else {
                        controller.disable_auto_refresh();
                    }
                    warp::reply::json(&json!({
                        "auto_refresh": controller.auto_refresh_enabled()
                    }))
                },
            );

        let teardown_route = warp::path("session")
            .and(warp::delete())
            .and(controller_filter)
            .map(|controller: Arc<RefreshController>| {
                controller.teardown();
                warp::reply::json(&json!({"status": "ok"}))
            });

        thread::spawn(move || {
            let routes = dashboard_route
                .or(session_route)
                .or(upload_route)
                .or(refresh_route)
                .or(auto_refresh_route)
                .or(teardown_route);
            let runtime = Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("failed to build runtime");
            runtime.block_on(async move {
                warp::serve(routes).run(bridge_bind_address(port)).await;
            });
        });

        Self { controller }
    }

    pub fn publish_status(&self, message: &str) {
        info!("[bridge] {} (phase {:?})", message, self.controller.phase());
    }

    #[cfg(test)]
    pub fn snapshot(&self) -> crate::gui_bridge::model::DashboardModel {
        self.controller.model().read().unwrap().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::JsonRowsDecoder;
    use crate::generator::rows::{build_rows, to_json_bytes};
    use std::time::Duration;

    #[test]
    fn bridge_sees_what_the_controller_publishes() {
        let controller =
            RefreshController::new(Box::new(JsonRowsDecoder), Duration::from_secs(30));
        let bridge = DashboardBridge::new(controller.clone(), 39217);

        let rows = build_rows(&["1", "2"], 4).unwrap();
        let bytes = to_json_bytes(&rows).unwrap();
        controller.stage("shift.xlsx", bytes, None).unwrap();
        assert_eq!(controller.refresh(), RefreshOutcome::Completed);

        let snapshot = bridge.snapshot();
        assert_eq!(snapshot.lines.len(), 2);
        assert_eq!(snapshot.file_name.as_deref(), Some("shift.xlsx"));
    }
}
