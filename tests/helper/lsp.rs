//! LSP request/notification test utilities

use std::time::Duration;

use futures::StreamExt;
use serde_json::Value;
use tokio::sync::mpsc;
use tokio::time::timeout;
use tower::Service;
use tower_lsp::jsonrpc::{Request, Response};
use tower_lsp::lsp_types::*;
use tower_lsp::{ClientSocket, LspService};

use ballerina_connector_lsp::lsp::backend::Backend;
use ballerina_connector_lsp::lsp::protocol::{
    CONNECTOR_METHOD, CONNECTORS_METHOD, ConnectorListRequest, ConnectorRequest,
};

/// Create an LSP initialize request
pub fn create_initialize_request(id: i64, initialization_options: Option<Value>) -> Request {
    Request::build("initialize")
        .id(id)
        .params(
            serde_json::to_value(InitializeParams {
                initialization_options,
                ..Default::default()
            })
            .unwrap(),
        )
        .finish()
}

/// Create an LSP initialized notification
pub fn create_initialized_notification() -> Request {
    Request::build("initialized")
        .params(serde_json::to_value(InitializedParams {}).unwrap())
        .finish()
}

/// Create a `ballerinaConnector/connectors` request
pub fn create_connectors_request(id: i64, params: &ConnectorListRequest) -> Request {
    Request::build(CONNECTORS_METHOD)
        .id(id)
        .params(serde_json::to_value(params).unwrap())
        .finish()
}

/// Create a `ballerinaConnector/connector` request
pub fn create_connector_request(id: i64, params: &ConnectorRequest) -> Request {
    Request::build(CONNECTOR_METHOD)
        .id(id)
        .params(serde_json::to_value(params).unwrap())
        .finish()
}

/// Run initialize/initialized against a fresh service
pub async fn initialize(service: &mut LspService<Backend>, initialization_options: Option<Value>) {
    let response = service
        .call(create_initialize_request(1, initialization_options))
        .await
        .unwrap();
    assert!(response.is_some());

    service
        .call(create_initialized_notification())
        .await
        .unwrap();
}

/// Send a request and return its successful result
pub async fn call(service: &mut LspService<Backend>, request: Request) -> Value {
    let response: Response = service
        .call(request)
        .await
        .unwrap()
        .expect("Expected a response");
    let (_, result) = response.into_parts();
    result.expect("Expected a successful response")
}

/// Collect notifications in background and return a receiver
pub fn spawn_notification_collector(mut socket: ClientSocket) -> mpsc::Receiver<Request> {
    let (tx, rx) = mpsc::channel(100);

    tokio::spawn(async move {
        while let Some(notification) = socket.next().await {
            if tx.send(notification).await.is_err() {
                break;
            }
        }
    });

    rx
}

/// Wait for a `window/logMessage` notification of type ERROR from the receiver
pub async fn wait_for_error_log(rx: &mut mpsc::Receiver<Request>) -> Option<LogMessageParams> {
    let timeout_duration = Duration::from_secs(5);

    loop {
        match timeout(timeout_duration, rx.recv()).await {
            Ok(Some(notification)) => {
                if notification.method() != "window/logMessage" {
                    continue;
                }
                let params: LogMessageParams =
                    serde_json::from_value(notification.params().unwrap().clone()).unwrap();
                if params.typ == MessageType::ERROR {
                    return Some(params);
                }
                // Skip informational log messages
            }
            _ => return None,
        }
    }
}
