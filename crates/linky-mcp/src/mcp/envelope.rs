use serde::Serialize;

pub(crate) fn warning_hint(code: &'static str) -> Option<&'static str> {
    match code {
        "entry_not_ready" => Some(
            "The browser extension did not write this entry within the wait budget. Keep the browser open with the extension active, then call again; the entry is served from cache once it lands.",
        ),
        "browser_opener_unavailable" => Some(
            "The browser opener was not found on PATH, so nothing was opened. Set LINKY_BROWSER_CMD to a command that opens a URL (the URL is appended as the last argument).",
        ),
        "wait_cancelled" => Some("The wait was cancelled before the entry arrived."),
        "some_targets_failed" => Some(
            "Some batch members failed with an unexpected error; their siblings are unaffected. See each member's message.",
        ),
        _ => None,
    }
}

pub(crate) fn warning_hints_from(codes: &[&'static str]) -> serde_json::Value {
    let mut m = serde_json::Map::new();
    for c in codes {
        if let Some(h) = warning_hint(c) {
            m.insert((*c).to_string(), serde_json::json!(h));
        }
    }
    serde_json::Value::Object(m)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    InvalidParams,
    CacheError,
    NotConfigured,
}

impl ErrorCode {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::InvalidParams => "invalid_params",
            Self::CacheError => "cache_error",
            Self::NotConfigured => "not_configured",
        }
    }

    pub(crate) fn retryable(self) -> bool {
        match self {
            Self::CacheError => true,
            Self::InvalidParams | Self::NotConfigured => false,
        }
    }

    pub(crate) fn default_hint(self) -> &'static str {
        match self {
            Self::InvalidParams => {
                "Handles are the bare profile slug (no slashes or spaces); queries must be non-empty and short enough that the encoded entry name fits in 255 bytes."
            }
            Self::CacheError => "Check that LINKY_CACHE_DIR exists and is readable.",
            Self::NotConfigured => {
                "Check LINKY_PROFILE_BASE_URL / LINKY_SEARCH_BASE_URL are absolute http(s) URLs."
            }
        }
    }
}

impl From<&linky_core::Error> for ErrorCode {
    fn from(e: &linky_core::Error) -> Self {
        match e {
            linky_core::Error::InvalidTarget(_) => Self::InvalidParams,
            linky_core::Error::Cache(_) => Self::CacheError,
            linky_core::Error::InvalidUrl(_) | linky_core::Error::NotConfigured(_) => {
                Self::NotConfigured
            }
        }
    }
}

pub(crate) fn add_envelope_fields(payload: &mut serde_json::Value, kind: &str, elapsed_ms: u128) {
    payload["schema_version"] = serde_json::json!(super::SCHEMA_VERSION);
    payload["kind"] = serde_json::json!(kind);
    payload["elapsed_ms"] = serde_json::json!(elapsed_ms);
    // `request` is always present: null or object.
    if payload.get("request").is_none() {
        payload["request"] = serde_json::Value::Null;
    }
}

pub(crate) fn error_obj(
    code: ErrorCode,
    message: impl ToString,
    hint: impl ToString,
) -> serde_json::Value {
    #[derive(Serialize)]
    struct ErrorObject {
        code: &'static str,
        message: String,
        hint: String,
        retryable: bool,
    }

    let e = ErrorObject {
        code: code.as_str(),
        message: message.to_string(),
        hint: hint.to_string(),
        retryable: code.retryable(),
    };
    match serde_json::to_value(e) {
        Ok(v) => v,
        Err(_) => serde_json::json!({
            "code": code.as_str(),
            "message": message.to_string(),
            "hint": hint.to_string(),
            "retryable": code.retryable()
        }),
    }
}

pub(crate) fn error_from(e: &linky_core::Error) -> serde_json::Value {
    let code = ErrorCode::from(e);
    error_obj(code, e, code.default_hint())
}
