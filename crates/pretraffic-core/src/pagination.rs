//! Generic driver for paged listing operations.

use std::future::Future;

use cloud_ports::{Page, PortResult};

/// Drain a paged listing into one ordered `Vec`.
///
/// `fetch` is called with `None` first and then with each continuation token
/// the previous page returned, until a page comes back without one (an empty
/// token counts as none). Items keep provider order across pages.
///
/// The first rejected call aborts the drain and its error is returned; items
/// already fetched are dropped.
pub async fn fetch_all_pages<T, F, Fut>(mut fetch: F) -> PortResult<Vec<T>>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = PortResult<Page<T>>>,
{
    let mut items = Vec::new();
    let mut next_token: Option<String> = None;
    let mut pages = 0u32;

    loop {
        let page = fetch(next_token.take()).await?;
        pages += 1;
        next_token = page.continuation().map(str::to_string);
        items.extend(page.items);
        if next_token.is_none() {
            break;
        }
    }

    tracing::debug!(pages = pages, items = items.len(), "pagination drained");
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cloud_ports::PortError;
    use std::sync::Mutex;

    #[tokio::test]
    async fn test_single_page_without_token() {
        let items = fetch_all_pages(|_| async { Ok(Page::last(vec![1, 2, 3])) })
            .await
            .unwrap();
        assert_eq!(items, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_tokens_are_passed_back_in_order() {
        let seen = Mutex::new(Vec::new());
        let items = fetch_all_pages(|token: Option<String>| {
            seen.lock().unwrap().push(token.clone());
            async move {
                Ok(match token.as_deref() {
                    None => Page::with_next(vec!['a'], "t1"),
                    Some("t1") => Page::with_next(vec!['b', 'c'], "t2"),
                    _ => Page::last(vec!['d']),
                })
            }
        })
        .await
        .unwrap();

        assert_eq!(items, vec!['a', 'b', 'c', 'd']);
        assert_eq!(
            seen.into_inner().unwrap(),
            vec![None, Some("t1".to_string()), Some("t2".to_string())]
        );
    }

    #[tokio::test]
    async fn test_empty_token_terminates() {
        let calls = Mutex::new(0);
        let items = fetch_all_pages(|_| {
            *calls.lock().unwrap() += 1;
            async { Ok(Page::with_next(vec![7], "")) }
        })
        .await
        .unwrap();
        assert_eq!(items, vec![7]);
        assert_eq!(*calls.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_rejection_mid_drain_returns_no_partial_result() {
        let result: PortResult<Vec<u8>> = fetch_all_pages(|token: Option<String>| async move {
            match token {
                None => Ok(Page::with_next(vec![1], "t1")),
                Some(_) => Err(PortError::Transport("connection reset".to_string())),
            }
        })
        .await;
        assert!(matches!(result, Err(PortError::Transport(_))));
    }
}
