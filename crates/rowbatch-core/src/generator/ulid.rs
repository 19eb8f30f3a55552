use crate::error::GenerationError;
use std::sync::{LazyLock, Mutex, PoisonError};
use ulid::{Generator, Ulid};

///
/// GENERATOR is shared process-wide so identifiers stay ordered across
/// every entity type and thread
///

static GENERATOR: LazyLock<Mutex<Generator>> = LazyLock::new(|| Mutex::new(Generator::new()));

/// Next ULID from the global monotonic generator.
///
/// Within one millisecond the random part is incremented; exhausting it is
/// reported as an overflow instead of wrapping.
pub(crate) fn generate() -> Result<Ulid, GenerationError> {
    GENERATOR
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .generate()
        .map_err(|_| GenerationError::UlidOverflow)
}

///
/// TESTS
///

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_monotonic_generation() {
        let ids = (0..1_000).map(|_| generate().unwrap()).collect::<Vec<_>>();

        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_monotonic_across_threads() {
        let handles = (0..4)
            .map(|_| std::thread::spawn(|| (0..250).map(|_| generate().unwrap()).collect::<Vec<_>>()))
            .collect::<Vec<_>>();

        let mut ids = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect::<Vec<_>>();
        let total = ids.len();
        ids.sort();
        ids.dedup();

        assert_eq!(ids.len(), total);
    }
}
