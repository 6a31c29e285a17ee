//! JSON wire format for talking to a host editor.
//!
//! Requests are single-line JSON objects `{"id": 1, "method": "apply", "params": {...}}`.
//! Responses echo the id and carry either `result` or `error`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::correlator::RequestId;
use crate::error::{EngineError, Result};
use crate::lang::LanguageVariant;
use crate::mods::{Anchor, Mod, ModContext, ModEdit, ModFailure, ModResult};
use crate::syntax::{Position, Range};

/// An incoming request line.
#[derive(Debug, Clone, Deserialize)]
pub struct Request {
    /// Absent for notifications such as `cancel`.
    #[serde(default)]
    pub id: Option<RequestId>,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

/// A decoded request.
#[derive(Debug, Clone)]
pub enum Call {
    /// List the registry.
    Mods,
    /// Run a mod.
    Apply(ApplyParams),
    /// Abandon an in-flight request.
    Cancel(CancelParams),
}

/// Parameters of `apply`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplyParams {
    #[serde(rename = "mod")]
    pub mod_name: Mod,
    pub source: String,
    #[serde(default, alias = "languageVariant")]
    pub language: LanguageVariant,
    pub anchor: Anchor,
}

impl ApplyParams {
    /// The mod context these parameters describe.
    pub fn context(&self) -> ModContext {
        ModContext::new(self.source.clone(), self.language).with_anchor(self.anchor.clone())
    }
}

/// Parameters of `cancel`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelParams {
    pub id: RequestId,
}

impl Request {
    /// Parses one request line.
    pub fn parse(line: &str) -> Result<Self> {
        serde_json::from_str(line).map_err(|e| EngineError::InvalidRequest {
            message: format!("malformed request: {e}"),
        })
    }

    /// Decodes the method and its parameters.
    pub fn call(&self) -> Result<Call> {
        let params = |e: serde_json::Error| EngineError::InvalidRequest {
            message: format!("invalid params for '{}': {e}", self.method),
        };
        match self.method.as_str() {
            "mods" | "list-mods" => Ok(Call::Mods),
            "apply" => Ok(Call::Apply(
                serde_json::from_value(self.params.clone()).map_err(params)?,
            )),
            "cancel" => Ok(Call::Cancel(
                serde_json::from_value(self.params.clone()).map_err(params)?,
            )),
            other => Err(EngineError::InvalidRequest {
                message: format!("unknown method '{other}'"),
            }),
        }
    }
}

/// Successful `apply` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditPayload {
    #[serde(rename = "mod")]
    pub mod_name: String,
    pub original_range: Range,
    pub original_source: String,
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor: Option<Position>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clipboard: Option<String>,
}

impl EditPayload {
    pub fn new(m: Mod, edit: &ModEdit) -> Self {
        Self {
            mod_name: m.name().to_string(),
            original_range: edit.range,
            original_source: edit.original.clone(),
            source: edit.replacement.clone(),
            cursor: edit.cursor,
            clipboard: edit.clipboard.clone(),
        }
    }
}

/// Payload of `mods`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModsPayload {
    pub mods: Vec<String>,
}

impl ModsPayload {
    pub fn registry() -> Self {
        Self {
            mods: Mod::names().into_iter().map(str::to_string).collect(),
        }
    }
}

/// A successful result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Payload {
    Edit(EditPayload),
    Mods(ModsPayload),
}

/// Either half of a response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Result(Payload),
    Error(ModFailure),
}

impl Outcome {
    /// Wraps the result of running `m`.
    pub fn from_mod(m: Mod, result: &ModResult) -> Self {
        match result {
            Ok(edit) => Outcome::Result(Payload::Edit(EditPayload::new(m, edit))),
            Err(failure) => Outcome::Error(failure.clone()),
        }
    }

    pub fn mods() -> Self {
        Outcome::Result(Payload::Mods(ModsPayload::registry()))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Outcome::Error(_))
    }
}

impl From<EngineError> for Outcome {
    fn from(err: EngineError) -> Self {
        Outcome::Error(ModFailure::unclassified(err.to_string()))
    }
}

/// An outgoing response line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Response {
    pub id: Option<RequestId>,
    #[serde(flatten)]
    pub outcome: Outcome,
}

impl Response {
    pub fn new(id: Option<RequestId>, outcome: Outcome) -> Self {
        Self { id, outcome }
    }

    /// Serializes to a single JSON line without the trailing newline.
    pub fn to_line(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mods::ErrorCode;
    use serde_json::json;

    #[test]
    fn test_parse_apply_with_point() {
        let request = Request::parse(
            r#"{"id": 3, "method": "apply", "params": {
                "mod": "move-left", "source": "a + b", "language": "typescript",
                "anchor": {"line": 0, "column": 2}}}"#,
        )
        .unwrap();
        let Call::Apply(params) = request.call().unwrap() else {
            panic!("expected apply");
        };
        assert_eq!(params.mod_name, Mod::MoveLeft);
        assert_eq!(params.language, LanguageVariant::Module);
        assert_eq!(params.anchor, Anchor::Point(Position::new(0, 2)));
    }

    #[test]
    fn test_parse_mods_without_params() {
        let request = Request::parse(r#"{"id": 1, "method": "mods"}"#).unwrap();
        assert!(matches!(request.call().unwrap(), Call::Mods));
    }

    #[test]
    fn test_unknown_mod_is_invalid_params() {
        let request = Request::parse(
            r#"{"id": 1, "method": "apply", "params": {"mod": "nope", "source": "",
                "anchor": {"line": 0, "column": 0}}}"#,
        )
        .unwrap();
        let err = request.call().unwrap_err();
        assert!(err.to_string().contains("invalid params for 'apply'"));
    }

    #[test]
    fn test_unknown_method() {
        let request = Request::parse(r#"{"method": "shutdown"}"#).unwrap();
        assert!(request.call().is_err());
        assert!(Request::parse("not json").is_err());
    }

    #[test]
    fn test_edit_response_shape() {
        let edit = ModEdit::new(
            "a + b",
            Range::new(Position::new(0, 0), Position::new(0, 5)),
            "b + a",
        )
        .with_cursor(Position::new(0, 2));
        let response = Response::new(Some(9), Outcome::from_mod(Mod::MoveLeft, &Ok(edit)));
        let value: Value = serde_json::from_str(&response.to_line().unwrap()).unwrap();
        assert_eq!(
            value,
            json!({
                "id": 9,
                "result": {
                    "mod": "move-left",
                    "original_range": {
                        "start": {"line": 0, "column": 0},
                        "end": {"line": 0, "column": 5}
                    },
                    "original_source": "a + b",
                    "source": "b + a",
                    "cursor": {"line": 0, "column": 2}
                }
            })
        );
    }

    #[test]
    fn test_error_response_shape() {
        let failure = ModFailure::no_match("no next item");
        let response = Response::new(Some(2), Outcome::from_mod(Mod::MoveRight, &Err(failure)));
        let value: Value = serde_json::from_str(&response.to_line().unwrap()).unwrap();
        assert_eq!(
            value,
            json!({"id": 2, "error": {"code": "NO_MATCH", "message": "no next item"}})
        );
        assert!(response.outcome.is_error());
    }

    #[test]
    fn test_mods_response_shape() {
        let response = Response::new(Some(1), Outcome::mods());
        let value: Value = serde_json::from_str(&response.to_line().unwrap()).unwrap();
        assert_eq!(value["result"]["mods"].as_array().unwrap().len(), Mod::ALL.len());
    }

    #[test]
    fn test_engine_error_is_unclassified() {
        let outcome = Outcome::from(EngineError::InvalidRequest {
            message: "bad".to_string(),
        });
        let Outcome::Error(failure) = outcome else {
            panic!("expected error");
        };
        assert_eq!(failure.code, ErrorCode::Error);
    }
}
