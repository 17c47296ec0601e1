//! Multiplier factory and registry.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::multiplier::{MatmulError, Multiplier};
use crate::naive::NaiveMultiplier;
use crate::scalar::Scalar;
use crate::strassen::StrassenMultiplier;

/// Factory trait for creating multipliers.
pub trait MultiplierFactory<T: Scalar>: Send + Sync {
    /// Get or create a multiplier by name.
    fn get(&self, name: &str) -> Result<Arc<dyn Multiplier<T>>, MatmulError>;

    /// List all available multiplier names.
    fn available(&self) -> Vec<&'static str>;
}

/// Default factory with lazy creation and cache.
pub struct DefaultFactory<T> {
    cache: RwLock<HashMap<String, Arc<dyn Multiplier<T>>>>,
}

impl<T: Scalar> DefaultFactory<T> {
    /// Create a new default factory.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cache: RwLock::new(HashMap::new()),
        }
    }

    fn create_multiplier(name: &str) -> Result<Arc<dyn Multiplier<T>>, MatmulError> {
        match name {
            "naive" => Ok(Arc::new(NaiveMultiplier::new())),
            "strassen" => Ok(Arc::new(StrassenMultiplier::<T>::new())),
            _ => Err(MatmulError::Config(format!("unknown multiplier: {name}"))),
        }
    }
}

impl<T: Scalar> Default for DefaultFactory<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Scalar> MultiplierFactory<T> for DefaultFactory<T> {
    fn get(&self, name: &str) -> Result<Arc<dyn Multiplier<T>>, MatmulError> {
        let key = name.to_ascii_lowercase();
        if let Some(multiplier) = self.cache.read().get(&key) {
            return Ok(Arc::clone(multiplier));
        }

        let multiplier = Self::create_multiplier(&key)?;
        Ok(Arc::clone(
            self.cache.write().entry(key).or_insert(multiplier),
        ))
    }

    fn available(&self) -> Vec<&'static str> {
        vec!["naive", "strassen"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factory_creates_naive() {
        let factory = DefaultFactory::<f32>::new();
        assert_eq!(factory.get("naive").unwrap().name(), "Naive");
    }

    #[test]
    fn factory_creates_strassen() {
        let factory = DefaultFactory::<f64>::new();
        assert_eq!(factory.get("Strassen").unwrap().name(), "Strassen");
    }

    #[test]
    fn factory_caches() {
        let factory = DefaultFactory::<f32>::default();
        let first = factory.get("strassen").unwrap();
        let second = factory.get("strassen").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn factory_unknown_name() {
        let factory = DefaultFactory::<f32>::new();
        assert!(matches!(factory.get("winograd"), Err(MatmulError::Config(_))));
    }

    #[test]
    fn factory_available() {
        let factory = DefaultFactory::<f32>::new();
        for name in factory.available() {
            assert!(factory.get(name).is_ok());
        }
    }
}
