//! Value source trait and related types

use pulse_sens_types::{ReadError, Reading};
use std::sync::Arc;

/// Metadata about a value source
#[derive(Debug, Clone)]
pub struct SourceMetadata {
    /// Unique identifier for this source type
    pub id: String,
    /// Human-readable name
    pub name: String,
    /// Description of what this source provides
    pub description: String,
}

impl SourceMetadata {
    pub fn new(id: &str, name: &str, description: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
        }
    }
}

/// Trait for all value sources
///
/// A value source produces the quantity of interest on demand. The sampler
/// treats it as opaque, so a random generator, a fixed value and a real
/// device reader are interchangeable.
pub trait ValueSource: Send + Sync {
    /// Get metadata about this source
    fn metadata(&self) -> &SourceMetadata;

    /// Produce one reading
    ///
    /// Called once per sampling tick from the sampler's background task.
    /// Should be relatively quick; when a read can stall, configure a read
    /// timeout on the sampler.
    fn read(&self) -> Result<Reading, ReadError>;

    /// Check if this source is available on the current system
    fn is_available(&self) -> bool {
        true
    }
}

/// Shared value source for handing to a sampler
pub type SharedValueSource = Arc<dyn ValueSource>;

/// Value source backed by a closure
pub struct FnSource<F> {
    metadata: SourceMetadata,
    read_fn: F,
}

impl<F> FnSource<F>
where
    F: Fn() -> Result<Reading, ReadError> + Send + Sync,
{
    pub fn new(id: &str, read_fn: F) -> Self {
        Self {
            metadata: SourceMetadata::new(id, id, "Closure-backed value source"),
            read_fn,
        }
    }
}

impl<F> ValueSource for FnSource<F>
where
    F: Fn() -> Result<Reading, ReadError> + Send + Sync,
{
    fn metadata(&self) -> &SourceMetadata {
        &self.metadata
    }

    fn read(&self) -> Result<Reading, ReadError> {
        (self.read_fn)()
    }
}
