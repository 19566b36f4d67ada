//! Error conversion and suppression on `Result`.

use std::fmt::Display;

/// Combinators for turning one error into another, or into a fallback value.
pub trait ResultExt<T, E> {
    /// Replace the error with `f(err)`.
    fn catches<F, E2>(self, f: F) -> Result<T, E2>
    where
        F: FnOnce(E) -> E2;

    /// [`catches`](ResultExt::catches), logging the converted error.
    fn catches_logged<F, E2>(self, f: F) -> Result<T, E2>
    where
        F: FnOnce(E) -> E2,
        E2: Display;

    /// Swallow the error and return `default` instead.
    fn mutes(self, default: T) -> T;

    /// [`mutes`](ResultExt::mutes), logging the swallowed error.
    fn mutes_logged(self, default: T) -> T;
}

impl<T, E: Display> ResultExt<T, E> for Result<T, E> {
    fn catches<F, E2>(self, f: F) -> Result<T, E2>
    where
        F: FnOnce(E) -> E2,
    {
        self.map_err(f)
    }

    fn catches_logged<F, E2>(self, f: F) -> Result<T, E2>
    where
        F: FnOnce(E) -> E2,
        E2: Display,
    {
        self.map_err(|err| {
            let converted = f(err);
            tracing::error!("{converted}");
            converted
        })
    }

    fn mutes(self, default: T) -> T {
        self.unwrap_or(default)
    }

    fn mutes_logged(self, default: T) -> T {
        self.unwrap_or_else(|err| {
            tracing::error!("{err}");
            default
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DataError;
    use std::io;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Captured {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    fn with_captured_logs(run: impl FnOnce()) -> String {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();
        tracing::subscriber::with_default(subscriber, run);
        captured.text()
    }

    fn divide(a: i32, b: i32) -> Result<i32, String> {
        if b == 0 {
            Err("division by zero".to_string())
        } else {
            Ok(a / b)
        }
    }

    #[test]
    fn test_catches_maps_error() {
        let err = divide(1, 0).catches(DataError::MissingKey).unwrap_err();
        assert_eq!(err, DataError::MissingKey("division by zero".to_string()));
        assert_eq!(divide(4, 2).catches(DataError::MissingKey), Ok(2));
    }

    #[test]
    fn test_catches_logged_maps_error() {
        let err = divide(1, 0).catches_logged(|e| e.len()).unwrap_err();
        assert_eq!(err, "division by zero".len());
    }

    #[test]
    fn test_catches_logged_logs_converted_error() {
        let logs = with_captured_logs(|| {
            let _ = divide(1, 0).catches_logged(|e| DataError::MissingKey(format!("wrapped {e}")));
        });
        assert!(logs.contains("missing key 'wrapped division by zero'"), "{logs}");
    }

    #[test]
    fn test_mutes_logged_logs_original_error() {
        let logs = with_captured_logs(|| {
            assert_eq!(divide(1, 0).mutes_logged(7), 7);
        });
        assert!(logs.contains("division by zero"), "{logs}");
    }

    #[test]
    fn test_mutes() {
        assert_eq!(divide(1, 0).mutes(-1), -1);
        assert_eq!(divide(6, 3).mutes(-1), 2);
        assert_eq!(divide(1, 0).mutes_logged(0), 0);
    }
}
