//! Reading handler parameters and shaping paginated payloads

use serde_json::{json, Value};

use super::MockError;

/// Borrowed view over a JSON parameter object
#[derive(Debug, Clone, Copy)]
pub struct Params<'a>(&'a Value);

impl<'a> Params<'a> {
    pub fn new(value: &'a Value) -> Self {
        Self(value)
    }

    pub fn raw(&self, key: &str) -> Option<&'a Value> {
        self.0.get(key).filter(|v| !v.is_null())
    }

    /// Trimmed, non-empty string field
    pub fn str(&self, key: &str) -> Option<&'a str> {
        self.raw(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// String field without trimming; passwords keep their whitespace
    pub fn secret(&self, key: &str) -> Option<&'a str> {
        self.raw(key).and_then(Value::as_str).filter(|s| !s.is_empty())
    }

    pub fn string_or(&self, key: &str, default: &str) -> String {
        self.str(key).unwrap_or(default).to_string()
    }

    pub fn required(&self, key: &str, code: i64, message: &str) -> Result<&'a str, MockError> {
        self.str(key)
            .ok_or_else(|| MockError::validation(code, message))
    }

    /// Unsigned integer given either as a number or a numeric string
    pub fn u64(&self, key: &str) -> Option<u64> {
        match self.raw(key)? {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn u64_or(&self, key: &str, default: u64) -> u64 {
        self.u64(key).unwrap_or(default)
    }

    pub fn bool(&self, key: &str) -> Option<bool> {
        match self.raw(key)? {
            Value::Bool(b) => Some(*b),
            Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }

    /// `(page, pageSize)`, 1-based, with zero values replaced by defaults
    pub fn page(&self, default_size: u64) -> (u64, u64) {
        let page = self.u64_or("page", 1).max(1);
        let size = match self.u64_or("pageSize", default_size) {
            0 => default_size,
            n => n,
        };
        (page, size)
    }
}

/// Slice `items` into `{list, total, page, pageSize}`
pub fn paginate(items: Vec<Value>, page: u64, page_size: u64) -> Value {
    let total = items.len();
    let skip = usize::try_from(page.saturating_sub(1).saturating_mul(page_size)).unwrap_or(usize::MAX);
    let take = usize::try_from(page_size).unwrap_or(usize::MAX);
    let list: Vec<Value> = items.into_iter().skip(skip).take(take).collect();

    json!({
        "list": list,
        "total": total,
        "page": page,
        "pageSize": page_size,
    })
}
