use serde_json::Value;

use crate::assertions::assert_same;

pub const OK: u16 = 200;
pub const CREATED: u16 = 201;
pub const NO_CONTENT: u16 = 204;
pub const BAD_REQUEST: u16 = 400;
pub const FORBIDDEN: u16 = 403;
pub const NOT_FOUND: u16 = 404;

/// What the status shortcuts need from an HTTP response.
pub trait TestResponse {
    fn status(&self) -> u16;

    fn data(&self) -> &Value;
}

/// Minimal response for handlers that return a status and a JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonResponse {
    pub status: u16,
    pub data: Value,
}

impl JsonResponse {
    pub fn new(status: u16, data: Value) -> Self {
        Self { status, data }
    }
}

impl TestResponse for JsonResponse {
    fn status(&self) -> u16 {
        self.status
    }

    fn data(&self) -> &Value {
        &self.data
    }
}

/// Status-code assertions. Each returns `self` so checks can be chained,
/// and runs [`assert_same`] on the body when `expects` is non-empty.
pub trait ResponseExt: TestResponse {
    #[track_caller]
    fn ok(&self, expects: &[(&str, Value)]) -> &Self {
        self.expect_status(OK, expects)
    }

    #[track_caller]
    fn created(&self, expects: &[(&str, Value)]) -> &Self {
        self.expect_status(CREATED, expects)
    }

    #[track_caller]
    fn no_content(&self) -> &Self {
        self.expect_status(NO_CONTENT, &[])
    }

    #[track_caller]
    fn bad_request(&self, expects: &[(&str, Value)]) -> &Self {
        self.expect_status(BAD_REQUEST, expects)
    }

    #[track_caller]
    fn forbidden(&self, expects: &[(&str, Value)]) -> &Self {
        self.expect_status(FORBIDDEN, expects)
    }

    #[track_caller]
    fn not_found(&self) -> &Self {
        self.expect_status(NOT_FOUND, &[])
    }

    #[track_caller]
    fn expect_status(&self, expected: u16, expects: &[(&str, Value)]) -> &Self {
        assert_eq!(
            expected,
            self.status(),
            "status code should be {expected}: {}",
            self.data()
        );
        if !expects.is_empty() {
            assert_same(self.data(), expects);
        }
        self
    }
}

impl<R: TestResponse + ?Sized> ResponseExt for R {}
