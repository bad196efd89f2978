pub use crate::{
    assert_error, enable_logging, get_cached_app, request::*, response::*, uuid, App, TestTeam,
};
pub use assert_json_diff::{assert_json_eq, assert_json_include};
pub use http::{header, StatusCode};
pub use reviewer_backend::error;
pub use serde_json::{json, Value};
pub use serial_test::{self, parallel, serial};
