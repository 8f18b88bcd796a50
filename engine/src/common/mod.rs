pub mod errors;

pub use errors::{PageError, SourceError, StoreError, ThemeValidationError};
