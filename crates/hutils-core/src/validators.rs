use regex::Regex;
use std::sync::LazyLock;
use uuid::Uuid;

static CHINESE_PHONE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^1[3-9][0-9]{9}$").unwrap());
static SINGAPORE_PHONE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[689][0-9]{7}$").unwrap());

/// True for a UUID written as 32 lowercase hex digits without dashes,
/// the form our records use for `uid` columns.
pub fn is_uuid(text: &str) -> bool {
    Uuid::try_parse(text).is_ok_and(|uid| uid.simple().to_string() == text)
}

pub fn is_int(text: &str) -> bool {
    text.trim().parse::<i128>().is_ok()
}

/// Mainland China mobile number, e.g. `17600001234`.
pub fn is_chinese_phone(text: &str) -> bool {
    CHINESE_PHONE.is_match(text)
}

/// Singapore phone number, e.g. `91234567`.
pub fn is_singapore_phone(text: &str) -> bool {
    SINGAPORE_PHONE.is_match(text)
}

pub fn is_phone(text: &str) -> bool {
    is_chinese_phone(text) || is_singapore_phone(text)
}
