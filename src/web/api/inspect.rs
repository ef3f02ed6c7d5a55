use serde_json::Value;
use std::time::{Duration, Instant};

use crate::analysis::{self, Abort, AnalysisReport, Limits};
use crate::web::utils::errors::ApiError;

/// 校验并分析一个已解析的值
///
/// 在阻塞线程池中执行，避免大文档占用异步工作线程。`budget` 与请求超时相同：
/// 超时中间件先行返回 408 后，后台分析也会在截止时间到达时停止。
/// 校验通过时原样返回值以便回显，未通过的值逐层释放。
pub async fn inspect(
    value: Value,
    limits: Limits,
    budget: Duration,
) -> Result<(Value, AnalysisReport), ApiError> {
    let deadline = Instant::now() + budget;

    let result = tokio::task::spawn_blocking(move || {
        if let Err(rejection) = ApiError::from_verdict(analysis::check(&value, &limits)) {
            analysis::dismantle(value);
            return Err(rejection);
        }
        let report = analysis::analyze_with_abort(&value, || {
            if Instant::now() >= deadline {
                Err(Abort::TimedOut)
            } else {
                Ok(())
            }
        })?;
        Ok::<_, ApiError>((value, report))
    })
    .await;

    match result {
        Ok(outcome) => outcome,
        Err(e) => Err(ApiError::internal("Internal server error", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn returns_value_and_report() {
        let value = json!({"a": [1, 2]});
        let (echoed, report) = inspect(value.clone(), Limits::default(), Duration::from_secs(5))
            .await
            .expect("inspect");
        assert_eq!(echoed, value);
        assert_eq!(report.max_depth, 3);
        assert_eq!(report.total_keys, 1);
    }

    #[tokio::test]
    async fn rejects_before_analysis() {
        let limits = Limits {
            max_depth: 10,
            max_keys: 1,
        };
        let err = inspect(json!({"a": 1, "b": 2}), limits, Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ApiError::Validation {
                observed: 2,
                limit: 1,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn rejects_documents_far_beyond_the_limit() {
        let mut value = json!(null);
        for _ in 0..5_000 {
            value = Value::Array(vec![value]);
        }
        let err = inspect(value, Limits::default(), Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ApiError::Validation {
                observed: 5_001,
                limit: 10,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn exhausted_budget_times_out() {
        let err = inspect(json!([1, 2, 3]), Limits::default(), Duration::ZERO)
            .await
            .unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::REQUEST_TIMEOUT);
    }
}
