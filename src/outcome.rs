use crate::error::JsonError;
use crate::span::SourceSpan;

/// The result of running a template (or any other fallible matching step).
///
/// An [`Outcome`] is in exactly one of three states:
/// - [`Outcome::Success`] carries the produced value.
/// - [`Outcome::Mismatch`] carries nothing and means "this template does not apply here". Unions
///   and optional templates absorb it and try something else.
/// - [`Outcome::Error`] is a firm, located failure. It is never downgraded back to a mismatch.
///
/// A mismatch becomes an error through [`Outcome::promote_mismatch`] once the caller knows no
/// alternative remains.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub enum Outcome<T> {
    Success(T),
    Mismatch,
    Error(JsonError),
}

/// Unwraps a successful [`Outcome`], returning any other state from the enclosing function.
#[macro_export]
macro_rules! try_outcome {
    ($outcome:expr) => {
        match $outcome {
            $crate::Outcome::Success(value) => value,
            $crate::Outcome::Mismatch => return $crate::Outcome::Mismatch,
            $crate::Outcome::Error(error) => return $crate::Outcome::Error(error),
        }
    };
}

impl<T> Outcome<T> {
    pub fn error(message: impl Into<String>, span: Option<SourceSpan>) -> Self {
        Outcome::Error(JsonError::template(message).with_span(span))
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    pub fn is_mismatch(&self) -> bool {
        matches!(self, Outcome::Mismatch)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Outcome::Error(_))
    }

    /// # Panics
    ///
    /// Panics unless the outcome is a success.
    pub fn unwrap(self) -> T {
        match self {
            Outcome::Success(value) => value,
            Outcome::Mismatch => panic!("attempted to unwrap a mismatch outcome"),
            Outcome::Error(error) => panic!("attempted to unwrap an error outcome: {error}"),
        }
    }

    pub fn unwrap_or(self, other: T) -> T {
        match self {
            Outcome::Success(value) => value,
            _ => other,
        }
    }

    /// # Panics
    ///
    /// Panics unless the outcome is an error.
    pub fn message(&self) -> &str {
        match self {
            Outcome::Error(error) => error.message(),
            _ => panic!("attempted to access the message of a non-error outcome"),
        }
    }

    /// # Panics
    ///
    /// Panics unless the outcome is an error.
    pub fn span(&self) -> Option<&SourceSpan> {
        match self {
            Outcome::Error(error) => error.span(),
            _ => panic!("attempted to access the span of a non-error outcome"),
        }
    }

    pub fn map<V>(self, mapper: impl FnOnce(T) -> V) -> Outcome<V> {
        match self {
            Outcome::Success(value) => Outcome::Success(mapper(value)),
            Outcome::Mismatch => Outcome::Mismatch,
            Outcome::Error(error) => Outcome::Error(error),
        }
    }

    pub fn and_then<V>(self, mapper: impl FnOnce(T) -> Outcome<V>) -> Outcome<V> {
        match self {
            Outcome::Success(value) => mapper(value),
            Outcome::Mismatch => Outcome::Mismatch,
            Outcome::Error(error) => Outcome::Error(error),
        }
    }

    /// Turns a mismatch into a located error; successes and errors pass through.
    pub fn promote_mismatch(self, message: impl FnOnce() -> String, span: Option<&SourceSpan>) -> Self {
        match self {
            Outcome::Mismatch => Outcome::error(message(), span.cloned()),
            other => other,
        }
    }

    /// Converts into a plain [`Result`]. A mismatch that was never promoted becomes a span-less
    /// template error.
    pub fn into_result(self) -> Result<T, JsonError> {
        match self {
            Outcome::Success(value) => Ok(value),
            Outcome::Mismatch => Err(JsonError::template(
                "Expected a value that would satisfy the template.",
            )),
            Outcome::Error(error) => Err(error),
        }
    }

    pub fn ok(self) -> Option<T> {
        match self {
            Outcome::Success(value) => Some(value),
            _ => None,
        }
    }
}

impl<T> From<Result<T, JsonError>> for Outcome<T> {
    fn from(result: Result<T, JsonError>) -> Self {
        match result {
            Ok(value) => Outcome::Success(value),
            Err(error) => Outcome::Error(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn halve(n: i32) -> Outcome<i32> {
        let n = try_outcome!(Outcome::Success(n));
        if n % 2 == 0 {
            Outcome::Success(n / 2)
        } else {
            Outcome::Mismatch
        }
    }

    #[test]
    fn map_threads_success_only() {
        assert_eq!(Outcome::Success(2).map(|n| n + 1), Outcome::Success(3));
        assert_eq!(Outcome::<i32>::Mismatch.map(|n| n + 1), Outcome::Mismatch);
        let error = Outcome::<i32>::error("bad", None);
        assert_eq!(error.clone().map(|n| n + 1), error);
    }

    #[test]
    fn and_then_chains() {
        assert_eq!(Outcome::Success(8).and_then(halve).and_then(halve), Outcome::Success(2));
        assert!(Outcome::Success(3).and_then(halve).is_mismatch());
    }

    #[test]
    fn promotion_only_touches_mismatch() {
        let promoted = Outcome::<()>::Mismatch.promote_mismatch(|| "nothing matched".into(), None);
        assert!(promoted.is_error());
        assert_eq!(promoted.message(), "nothing matched");

        let kept = Outcome::Success(1).promote_mismatch(|| unreachable!(), None);
        assert_eq!(kept, Outcome::Success(1));

        let error = Outcome::<()>::error("first", None);
        assert_eq!(error.clone().promote_mismatch(|| "second".into(), None), error);
    }

    #[test]
    #[should_panic(expected = "attempted to unwrap a mismatch outcome")]
    fn unwrapping_a_mismatch_panics() {
        Outcome::<()>::Mismatch.unwrap();
    }

    #[test]
    fn unwrap_or_falls_back() {
        assert_eq!(Outcome::Mismatch.unwrap_or(7), 7);
        assert_eq!(Outcome::Success(1).unwrap_or(7), 1);
    }
}
