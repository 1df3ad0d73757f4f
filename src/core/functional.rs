//! Running one operation over many items

use std::fmt::Display;
use std::future::Future;

use crate::error::{CliError, CliResult};

/// Call `f` on every item, in order, collecting failures instead of stopping
pub fn apply_and_aggregate_errors<T, E, I, F>(items: I, mut f: F) -> CliResult<()>
where
    I: IntoIterator<Item = T>,
    F: FnMut(T) -> Result<(), E>,
    E: Display,
{
    let failures: Vec<String> = items
        .into_iter()
        .filter_map(|item| f(item).err().map(|e| format!("{:#}", e)))
        .collect();

    aggregate(failures)
}

/// Async flavour of [`apply_and_aggregate_errors`]; items are still handled
/// one at a time
pub async fn apply_and_aggregate_errors_async<T, E, I, F, Fut>(items: I, mut f: F) -> CliResult<()>
where
    I: IntoIterator<Item = T>,
    F: FnMut(T) -> Fut,
    Fut: Future<Output = Result<(), E>>,
    E: Display,
{
    let mut failures = Vec::new();
    for item in items {
        if let Err(e) = f(item).await {
            failures.push(format!("{:#}", e));
        }
    }

    aggregate(failures)
}

fn aggregate(failures: Vec<String>) -> CliResult<()> {
    if failures.is_empty() {
        Ok(())
    } else {
        Err(CliError::Aggregate(failures))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_succeed() {
        let mut seen = Vec::new();
        let result = apply_and_aggregate_errors(1..=3, |i| -> Result<(), String> {
            seen.push(i);
            Ok(())
        });
        assert!(result.is_ok());
        assert_eq!(seen, vec![1, 2, 3]);
    }

    #[test]
    fn test_failures_do_not_short_circuit() {
        let mut seen = Vec::new();
        let result = apply_and_aggregate_errors(1..=5, |i| {
            seen.push(i);
            if i % 2 == 0 {
                Err(format!("item {i} failed"))
            } else {
                Ok(())
            }
        });

        assert_eq!(seen, vec![1, 2, 3, 4, 5]);
        match result {
            Err(CliError::Aggregate(errors)) => {
                assert_eq!(errors, vec!["item 2 failed", "item 4 failed"])
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_empty_input() {
        assert!(apply_and_aggregate_errors(Vec::<u8>::new(), |_| Err("never")).is_ok());
    }

    #[tokio::test]
    async fn test_async_visits_every_item() {
        let mut seen = Vec::new();
        let result = apply_and_aggregate_errors_async(["a", "b", "c"], |id| {
            seen.push(id);
            async move {
                if id == "a" {
                    Err(anyhow::anyhow!("{id} is locked"))
                } else {
                    Ok(())
                }
            }
        })
        .await;

        assert_eq!(seen, vec!["a", "b", "c"]);
        assert_eq!(result.unwrap_err().to_string(), "1 operation(s) failed:\na is locked");
    }
}
