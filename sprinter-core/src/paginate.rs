//! Following page cursors until a listing is complete

use std::future::Future;

use tracing::debug;

use crate::model::RepoScoped;
use crate::repo::RepoId;
use crate::tracker::{Page, PageCursor, TrackerResult};

/// Fetch every page of one listing for one repository.
///
/// Pages are requested one after another and concatenated in server order.
/// The first failing page aborts the whole call and nothing fetched so far is
/// returned. Every record is tagged with `repo`'s slug.
pub async fn fetch_all<T, F, Fut>(repo: &RepoId, mut fetch_page: F) -> TrackerResult<Vec<T>>
where
    T: RepoScoped,
    F: FnMut(Option<PageCursor>) -> Fut,
    Fut: Future<Output = TrackerResult<Page<T>>>,
{
    let mut items = Vec::new();
    let mut cursor = None;
    let mut pages = 0usize;

    loop {
        let page = fetch_page(cursor.take()).await?;
        pages += 1;
        items.extend(page.items);

        match page.next {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }

    let slug = repo.slug();
    for item in &mut items {
        item.set_repo(&slug);
    }

    debug!(repo = %slug, pages, count = items.len(), "Fetched all pages");

    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Label;
    use crate::tracker::TrackerError;
    use std::cell::Cell;

    fn label(name: &str) -> Label {
        Label {
            name: name.to_string(),
            color: "ededed".to_string(),
            description: None,
            repo: String::new(),
        }
    }

    fn pages() -> Vec<Page<Label>> {
        vec![
            Page {
                items: vec![label("a"), label("b")],
                next: Some(PageCursor::new("2")),
            },
            Page {
                items: vec![label("c")],
                next: Some(PageCursor::new("3")),
            },
            Page::last(vec![label("d"), label("e"), label("f")]),
        ]
    }

    fn page_index(cursor: Option<PageCursor>) -> usize {
        cursor
            .map(|c| c.as_str().parse::<usize>().unwrap() - 1)
            .unwrap_or(0)
    }

    #[tokio::test]
    async fn test_concatenates_all_pages_in_order() {
        let repo = RepoId::new("numenta", "nupic");
        let pages = pages();

        let items = fetch_all(&repo, |cursor| {
            let page = pages[page_index(cursor)].clone();
            async move { Ok(page) }
        })
        .await
        .unwrap();

        let names: Vec<&str> = items.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c", "d", "e", "f"]);
        assert!(items.iter().all(|l| l.repo == "numenta/nupic"));
    }

    #[tokio::test]
    async fn test_single_page() {
        let repo = RepoId::new("numenta", "nupic");
        let calls = Cell::new(0);

        let items = fetch_all(&repo, |_| {
            calls.set(calls.get() + 1);
            async { Ok(Page::last(vec![label("only")])) }
        })
        .await
        .unwrap();

        assert_eq!(items.len(), 1);
        assert_eq!(calls.get(), 1);
    }

    #[tokio::test]
    async fn test_page_error_discards_partial_results() {
        let repo = RepoId::new("numenta", "nupic");
        let pages = pages();

        let result = fetch_all(&repo, |cursor| {
            let index = page_index(cursor);
            let page = pages[index].clone();
            async move {
                if index == 1 {
                    Err(TrackerError::status(500, "Server Error"))
                } else {
                    Ok(page)
                }
            }
        })
        .await;

        let err = result.unwrap_err();
        assert_eq!(err.code, Some(500));
    }
}
