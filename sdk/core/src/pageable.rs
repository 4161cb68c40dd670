use crate::request_options::NextMarker;
use futures::stream::unfold;
use futures::Stream;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

/// A response that may point at a following page.
pub trait Continuable {
    fn continuation(&self) -> Option<NextMarker>;
}

/// A stream of pages.
///
/// Each page is requested only after the previous one arrived. The stream ends
/// after the first page without a continuation marker, or right after the first
/// error.
pub struct Pageable<T> {
    stream: Pin<Box<dyn Stream<Item = crate::Result<T>> + Send>>,
}

impl<T> Pageable<T>
where
    T: Continuable + Send + 'static,
{
    pub fn new<F>(
        make_request: impl Fn(Option<NextMarker>) -> F + Clone + Send + 'static,
    ) -> Self
    where
        F: Future<Output = crate::Result<T>> + Send + 'static,
    {
        let stream = unfold(State::Init, move |state| {
            let make_request = make_request.clone();
            async move {
                let response = match state {
                    State::Init => make_request(None).await,
                    State::Continuation(marker) => make_request(Some(marker)).await,
                    State::Done => return None,
                };
                let next_state = response
                    .as_ref()
                    .ok()
                    .and_then(Continuable::continuation)
                    .map_or(State::Done, State::Continuation);
                Some((response, next_state))
            }
        });
        Self {
            stream: Box::pin(stream),
        }
    }
}

impl<T> Stream for Pageable<T> {
    type Item = crate::Result<T>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.stream.as_mut().poll_next(cx)
    }
}

impl<T> std::fmt::Debug for Pageable<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pageable").finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum State {
    Init,
    Continuation(NextMarker),
    Done,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, ErrorKind};
    use futures::StreamExt;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Debug)]
    struct Page {
        items: Vec<u32>,
        next: Option<NextMarker>,
    }

    impl Continuable for Page {
        fn continuation(&self) -> Option<NextMarker> {
            self.next.clone()
        }
    }

    fn page_for(marker: Option<NextMarker>) -> crate::Result<Page> {
        match marker.as_ref().map(NextMarker::as_str) {
            None => Ok(Page {
                items: vec![1, 2],
                next: Some(NextMarker::new("p2")),
            }),
            Some("p2") => Ok(Page {
                items: vec![3],
                next: Some(NextMarker::new("p3")),
            }),
            Some("p3") => Ok(Page {
                items: vec![4, 5],
                next: None,
            }),
            Some(other) => Err(Error::message(
                ErrorKind::Other,
                format!("unexpected marker {other}"),
            )),
        }
    }

    #[tokio::test]
    async fn follows_markers_until_exhausted() {
        let pageable = Pageable::new(|marker| async move { page_for(marker) });
        let pages: Vec<Page> = pageable
            .map(|page| page.expect("page should succeed"))
            .collect()
            .await;
        let items: Vec<u32> = pages.into_iter().flat_map(|p| p.items).collect();
        assert_eq!(items, vec![1, 2, 3, 4, 5]);
    }

    #[tokio::test]
    async fn stops_after_first_error() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let mut pageable = Pageable::new(move |marker: Option<NextMarker>| {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                match marker {
                    None => Ok(Page {
                        items: vec![1],
                        next: Some(NextMarker::new("p2")),
                    }),
                    Some(_) => Err(Error::message(ErrorKind::Io, "connection reset")),
                }
            }
        });

        assert!(pageable.next().await.unwrap().is_ok());
        assert!(pageable.next().await.unwrap().is_err());
        assert!(pageable.next().await.is_none());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
