use serde::Serialize;
use serde_json::Value;

use super::limits::Limits;
use super::walk::{self, Shape};

pub const REASON_DEPTH: &str = "depth exceeds limit";
pub const REASON_KEYS: &str = "key count exceeds limit";

/// 结构校验结论
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ValidationResult {
    Valid,
    Invalid {
        reason: &'static str,
        observed: usize,
        limit: usize,
    },
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }
}

/// 按深度、键数量的顺序检查值树是否超出上限
///
/// 深度超限优先于键数量超限报告。遍历触及绝对层级上限时同样视为深度超限，
/// `observed` 为遍历放弃时所在的层级。
pub fn check(value: &Value, limits: &Limits) -> ValidationResult {
    let shape = match walk::measure(value) {
        Ok(shape) => shape,
        Err(exceeded) => {
            return ValidationResult::Invalid {
                reason: REASON_DEPTH,
                observed: exceeded.depth,
                limit: limits.max_depth,
            }
        }
    };
    verdict(shape, limits)
}

fn verdict(shape: Shape, limits: &Limits) -> ValidationResult {
    if shape.depth > limits.max_depth {
        return ValidationResult::Invalid {
            reason: REASON_DEPTH,
            observed: shape.depth,
            limit: limits.max_depth,
        };
    }

    if shape.keys > limits.max_keys {
        return ValidationResult::Invalid {
            reason: REASON_KEYS,
            observed: shape.keys,
            limit: limits.max_keys,
        };
    }

    ValidationResult::Valid
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rejects_excessive_depth() {
        let limits = Limits {
            max_depth: 2,
            max_keys: 100,
        };
        assert_eq!(
            check(&json!({"a": {"b": 1}}), &limits),
            ValidationResult::Invalid {
                reason: "depth exceeds limit",
                observed: 3,
                limit: 2,
            }
        );
    }

    #[test]
    fn rejects_excessive_key_count() {
        let limits = Limits {
            max_depth: 10,
            max_keys: 1,
        };
        assert_eq!(
            check(&json!({"a": 1, "b": 2}), &limits),
            ValidationResult::Invalid {
                reason: "key count exceeds limit",
                observed: 2,
                limit: 1,
            }
        );
    }

    #[test]
    fn depth_is_reported_before_keys() {
        let limits = Limits {
            max_depth: 1,
            max_keys: 0,
        };
        let result = check(&json!({"a": 1}), &limits);
        assert!(matches!(
            result,
            ValidationResult::Invalid {
                reason: REASON_DEPTH,
                ..
            }
        ));
    }

    #[test]
    fn values_at_the_limit_pass() {
        let limits = Limits {
            max_depth: 3,
            max_keys: 2,
        };
        assert!(check(&json!({"a": {"b": 1}}), &limits).is_valid());
        assert!(check(&json!(42), &limits).is_valid());
        assert!(check(&json!([]), &Limits::default()).is_valid());
    }

    #[test]
    fn verdict_reports_observed_depth() {
        let shape = Shape {
            depth: 12,
            keys: 0,
        };
        let limits = Limits::default();
        assert_eq!(
            verdict(shape, &limits),
            ValidationResult::Invalid {
                reason: REASON_DEPTH,
                observed: 12,
                limit: 10,
            }
        );
    }

    #[test]
    fn serializes_with_status_tag() {
        let invalid = ValidationResult::Invalid {
            reason: REASON_KEYS,
            observed: 5,
            limit: 4,
        };
        assert_eq!(
            serde_json::to_value(invalid).unwrap(),
            json!({
                "status": "invalid",
                "reason": "key count exceeds limit",
                "observed": 5,
                "limit": 4
            })
        );
        assert_eq!(
            serde_json::to_value(ValidationResult::Valid).unwrap(),
            json!({"status": "valid"})
        );
    }
}
