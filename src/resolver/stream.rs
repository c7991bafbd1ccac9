//! Lazily produced location enumeration.

use super::CancellationToken;
use crate::model::Location;
use crossbeam_channel::{select, Receiver, Sender};
use std::thread;

/// A finite, lazily produced sequence of locations.
///
/// One background producer pushes locations through a bounded handoff queue.
/// The producer stops at its next suspension point when the token fires or
/// when this stream is dropped, so abandoning iteration early never leaks a
/// blocked thread. Each call to
/// [`FileResolver::all_locations`](super::FileResolver::all_locations)
/// starts a fresh producer.
#[derive(Debug)]
pub struct LocationStream {
    receiver: Option<Receiver<Location>>,
    cancel: CancellationToken,
}

impl LocationStream {
    /// Spawn a producer draining `source` into a queue of `capacity` slots.
    pub fn spawn<I>(source: I, capacity: usize, cancel: &CancellationToken) -> Self
    where
        I: Iterator<Item = Location> + Send + 'static,
    {
        let (sender, receiver) = crossbeam_channel::bounded(capacity.max(1));
        let token = cancel.clone();
        let spawned = thread::Builder::new()
            .name("location-stream".to_string())
            .spawn(move || produce(source, &sender, &token));

        match spawned {
            Ok(_) => Self {
                receiver: Some(receiver),
                cancel: cancel.clone(),
            },
            Err(e) => {
                tracing::warn!("unable to spawn location producer: {e}");
                Self::empty(cancel)
            }
        }
    }

    /// A stream that yields nothing.
    #[must_use]
    pub fn empty(cancel: &CancellationToken) -> Self {
        Self {
            receiver: None,
            cancel: cancel.clone(),
        }
    }

    /// Stop the producer and end the stream.
    pub fn cancel(&mut self) {
        self.cancel.cancel();
        self.receiver = None;
    }
}

impl Iterator for LocationStream {
    type Item = Location;

    fn next(&mut self) -> Option<Location> {
        if self.cancel.is_cancelled() {
            // Disconnects the producer if it is still blocked on a send.
            self.receiver = None;
            return None;
        }
        let next = self.receiver.as_ref()?.recv().ok();
        if next.is_none() {
            self.receiver = None;
        }
        next
    }
}

fn produce<I>(source: I, sender: &Sender<Location>, cancel: &CancellationToken)
where
    I: Iterator<Item = Location>,
{
    let mut produced = 0usize;
    for location in source {
        if cancel.is_cancelled() {
            tracing::debug!(produced, "location enumeration cancelled");
            return;
        }
        select! {
            send(sender, location) -> sent => {
                if sent.is_err() {
                    tracing::debug!(produced, "location consumer went away");
                    return;
                }
            },
            recv(cancel.signal()) -> _ => {
                tracing::debug!(produced, "location enumeration cancelled");
                return;
            },
        }
        produced += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    fn numbered(count: usize, pulled: Arc<AtomicUsize>) -> impl Iterator<Item = Location> + Send {
        (0..count).map(move |i| {
            pulled.fetch_add(1, Ordering::SeqCst);
            Location::new(format!("file-{i}"))
        })
    }

    #[test]
    fn test_yields_every_location_in_order() {
        let pulled = Arc::new(AtomicUsize::new(0));
        let token = CancellationToken::new();
        let paths: Vec<String> = LocationStream::spawn(numbered(5, pulled), 2, &token)
            .map(|l| l.access_path)
            .collect();
        assert_eq!(paths, vec!["file-0", "file-1", "file-2", "file-3", "file-4"]);
    }

    #[test]
    fn test_cancel_stops_producer() {
        let pulled = Arc::new(AtomicUsize::new(0));
        let token = CancellationToken::new();
        let mut stream = LocationStream::spawn(numbered(10_000, Arc::clone(&pulled)), 1, &token);

        assert!(stream.next().is_some());
        token.cancel();
        assert!(stream.next().is_none());

        // The producer must stop well short of the full source.
        let deadline = Instant::now() + Duration::from_secs(5);
        let mut last = pulled.load(Ordering::SeqCst);
        while Instant::now() < deadline {
            thread::sleep(Duration::from_millis(20));
            let now = pulled.load(Ordering::SeqCst);
            if now == last {
                break;
            }
            last = now;
        }
        assert!(last < 10_000, "producer kept running: {last}");
    }

    #[test]
    fn test_dropping_stream_releases_producer() {
        let pulled = Arc::new(AtomicUsize::new(0));
        let token = CancellationToken::new();
        let mut stream = LocationStream::spawn(numbered(10_000, Arc::clone(&pulled)), 1, &token);
        assert!(stream.next().is_some());
        drop(stream);

        thread::sleep(Duration::from_millis(100));
        assert!(pulled.load(Ordering::SeqCst) < 10_000);
    }
}
