// Emotion feed
// Reads JSON-lines recognition results and hands each one to the dispatcher

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{info, warn};

use crate::animator::CancelToken;
use crate::emotion::{Actuator, EmotionDispatcher, EmotionProbabilities};

/// Where recognition results come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedSource {
    Stdin,
    File(PathBuf),
}

impl FeedSource {
    /// `-` means stdin, anything else is a file path
    pub fn from_path(path: &Path) -> Self {
        if path.as_os_str() == "-" {
            FeedSource::Stdin
        } else {
            FeedSource::File(path.to_path_buf())
        }
    }

    fn open(&self) -> io::Result<Box<dyn BufRead + Send>> {
        match self {
            FeedSource::Stdin => Ok(Box::new(BufReader::new(io::stdin()))),
            FeedSource::File(path) => Ok(Box::new(BufReader::new(File::open(path)?))),
        }
    }
}

/// Dispatch every record in `reader` until EOF or cancellation, waiting
/// `pace` after each dispatched record. Lines that are not UTF-8 or not
/// JSON are skipped. Returns the number of records dispatched.
pub fn pump<A: Actuator>(mut reader: impl BufRead, dispatcher: &mut EmotionDispatcher<A>,
                         cancel: &CancelToken, pace: Duration) -> io::Result<usize> {
    let mut dispatched = 0;
    let mut buf = Vec::new();
    let mut line_no = 0;

    while !cancel.is_cancelled() {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        line_no += 1;

        let line = match std::str::from_utf8(&buf) {
            Ok(line) => line.trim(),
            Err(e) => {
                warn!(line = line_no, "skipping record: {}", e);
                continue;
            }
        };
        if line.is_empty() {
            continue;
        }

        match EmotionProbabilities::from_json(line) {
            Ok(probs) => {
                dispatcher.dispatch(&probs);
                dispatched += 1;
                if !pace.is_zero() {
                    thread::sleep(pace);
                }
            }
            Err(e) => warn!(line = line_no, "skipping record: {}", e),
        }
    }

    Ok(dispatched)
}

/// Run the feed on its own thread
pub fn spawn<A: Actuator + 'static>(source: FeedSource, mut dispatcher: EmotionDispatcher<A>,
                                    cancel: CancelToken, pace: Duration)
    -> io::Result<JoinHandle<io::Result<usize>>> {
    thread::Builder::new()
        .name("emotion-feed".to_string())
        .spawn(move || {
            info!(?source, ?pace, "📨 Reading emotion feed");
            let reader = source.open()?;
            let dispatched = pump(reader, &mut dispatcher, &cancel, pace)?;
            info!(dispatched, "emotion feed finished");
            Ok(dispatched)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{self, EyeState, Mode, SharedEyes};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::io::Cursor;
    use std::sync::{Arc, Mutex};
    use std::time::Instant;

    fn shared_eyes() -> SharedEyes {
        Arc::new(Mutex::new(EyeState::new(640, 480, StdRng::seed_from_u64(1), Instant::now())))
    }

    #[test]
    fn test_pump_skips_blank_and_bad_lines() {
        let eyes = shared_eyes();
        let mut dispatcher = EmotionDispatcher::new(eyes.clone());
        let input = Cursor::new(concat!(
            "{\"prediction\":{\"prob\":{\"anger\":0.9}}}\n",
            "\n",
            "garbage\n",
            "{\"prediction\":{\"prob\":{\"sadness\":0.9}}}\n",
        ));

        let dispatched = pump(input, &mut dispatcher, &CancelToken::new(), Duration::ZERO).unwrap();
        assert_eq!(dispatched, 2);
        assert!(matches!(state::lock(&eyes).mode, Mode::Sadness(_)));
    }

    #[test]
    fn test_pump_skips_invalid_utf8() {
        let eyes = shared_eyes();
        let mut dispatcher = EmotionDispatcher::new(eyes.clone());
        let mut input = Vec::new();
        input.extend_from_slice(b"{\"prediction\":{\"prob\":{\"anger\":0.9}}}\n");
        input.extend_from_slice(b"\xff\xfe garbage\n");
        input.extend_from_slice(b"{\"prediction\":{\"prob\":{\"sadness\":0.9}}}");

        let dispatched = pump(Cursor::new(input), &mut dispatcher, &CancelToken::new(), Duration::ZERO).unwrap();
        assert_eq!(dispatched, 2);
        assert!(matches!(state::lock(&eyes).mode, Mode::Sadness(_)));
    }

    #[test]
    fn test_pump_paces_records() {
        let mut dispatcher = EmotionDispatcher::new(shared_eyes());
        let input = Cursor::new(concat!(
            "{\"prediction\":{\"prob\":{\"happiness\":0.9}}}\n",
            "{\"prediction\":{\"prob\":{\"sadness\":0.9}}}\n",
        ));

        let started = Instant::now();
        let pace = Duration::from_millis(20);
        assert_eq!(pump(input, &mut dispatcher, &CancelToken::new(), pace).unwrap(), 2);
        assert!(started.elapsed() >= pace * 2);
    }

    #[test]
    fn test_pump_stops_when_cancelled() {
        let eyes = shared_eyes();
        let mut dispatcher = EmotionDispatcher::new(eyes.clone());
        let cancel = CancelToken::new();
        cancel.cancel();

        let input = Cursor::new("{\"prediction\":{\"prob\":{\"happiness\":1.0}}}\n");
        assert_eq!(pump(input, &mut dispatcher, &cancel, Duration::ZERO).unwrap(), 0);
        assert_eq!(state::lock(&eyes).mode, Mode::Normal);
    }

    #[test]
    fn test_source_from_path() {
        assert_eq!(FeedSource::from_path(Path::new("-")), FeedSource::Stdin);
        assert_eq!(FeedSource::from_path(Path::new("feed.jsonl")),
                   FeedSource::File(PathBuf::from("feed.jsonl")));
    }

    #[test]
    fn test_spawn_missing_file_fails() {
        let dispatcher = EmotionDispatcher::new(shared_eyes());
        let handle = spawn(FeedSource::File(PathBuf::from("/nonexistent/feed.jsonl")),
                           dispatcher, CancelToken::new(), Duration::ZERO).unwrap();
        assert!(handle.join().unwrap().is_err());
    }
}
