//! Multiplier selection logic.

use std::sync::Arc;

use strassen_core::registry::MultiplierFactory;
use strassen_core::{MatmulError, Multiplier, Scalar};

/// Get multipliers to run based on algorithm selection.
pub fn get_multipliers_to_run<T: Scalar>(
    algo: &str,
    factory: &dyn MultiplierFactory<T>,
) -> Result<Vec<Arc<dyn Multiplier<T>>>, MatmulError> {
    if algo.eq_ignore_ascii_case("all") {
        return factory
            .available()
            .into_iter()
            .map(|name| factory.get(name))
            .collect();
    }
    Ok(vec![factory.get(algo)?])
}
