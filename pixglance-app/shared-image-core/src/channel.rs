//! Request/response channel used by the frontend to collect the shared path.
//!
//! There is exactly one method. Unknown names are answered with
//! [`MethodResponse::NotImplemented`] instead of an error, so a frontend
//! calling a method this build lacks gets a plain answer.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::capture::IntentCapture;
use crate::content::ContentResolver;

pub const CHANNEL_NAME: &str = "app.channel.shared.data";

pub const GET_SHARED_DATA: &str = "getSharedData";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodCall {
    pub method: String,
}

impl MethodCall {
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "camelCase")]
pub enum MethodResponse {
    Success(Option<String>),
    NotImplemented,
}

/// Dispatch `call` against the capture state.
pub fn dispatch<C: ContentResolver>(capture: &IntentCapture<C>, call: &MethodCall) -> MethodResponse {
    match call.method.as_str() {
        GET_SHARED_DATA => MethodResponse::Success(capture.take_shared_data()),
        other => {
            debug!("{}: method '{}' not implemented", CHANNEL_NAME, other);
            MethodResponse::NotImplemented
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::{Intent, IntentOrigin};
    use crate::content::testing::FakeContent;
    use crate::resolver::ReferenceResolver;

    fn capture() -> IntentCapture<FakeContent> {
        IntentCapture::new(ReferenceResolver::new(FakeContent::new(), "/nonexistent/cache"))
    }

    #[test]
    fn test_get_shared_data_consumes() {
        let capture = capture();
        capture.handle_intent(&Intent::view("/storage/emulated/0/img.png"), IntentOrigin::Launch);

        let call = MethodCall::new(GET_SHARED_DATA);
        assert_eq!(
            dispatch(&capture, &call),
            MethodResponse::Success(Some("/storage/emulated/0/img.png".into()))
        );
        assert_eq!(dispatch(&capture, &call), MethodResponse::Success(None));
    }

    #[test]
    fn test_unknown_method_is_not_implemented_and_keeps_state() {
        let capture = capture();
        capture.handle_intent(&Intent::view("/sdcard/a.png"), IntentOrigin::Launch);

        assert_eq!(
            dispatch(&capture, &MethodCall::new("getSharedFiles")),
            MethodResponse::NotImplemented
        );
        assert!(capture.has_pending());
    }

    #[test]
    fn test_response_wire_format() {
        let found = serde_json::to_value(MethodResponse::Success(Some("/a.png".into()))).unwrap();
        assert_eq!(found, serde_json::json!({"status": "success", "value": "/a.png"}));

        let empty = serde_json::to_value(MethodResponse::Success(None)).unwrap();
        assert_eq!(empty, serde_json::json!({"status": "success", "value": null}));

        let missing = serde_json::to_value(MethodResponse::NotImplemented).unwrap();
        assert_eq!(missing, serde_json::json!({"status": "notImplemented"}));
    }

    #[test]
    fn test_method_call_from_json() {
        let call: MethodCall = serde_json::from_str(r#"{"method":"getSharedData"}"#).unwrap();
        assert_eq!(call, MethodCall::new(GET_SHARED_DATA));
    }
}
