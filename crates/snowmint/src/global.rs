//! An explicitly installed, process-wide default generator.
//!
//! Nothing is created implicitly: the hosting application installs the
//! default once at startup with the identity it was assigned, and
//! [`generate`] fails with [`Error::DefaultNotInstalled`] until it does.
//! Once installed, the default lives for the rest of the process and cannot be
//! replaced. Code that needs its own identity or clock should construct an
//! independent generator instead.
//!
//! ```
//! use snowmint::global;
//!
//! global::install(7)?;
//! let id = global::generate()?;
//! assert_eq!(id.identity(), 7);
//! # Ok::<(), snowmint::Error>(())
//! ```

use std::sync::OnceLock;

use crate::{Error, LockSnowflakeGenerator, Result, SnowflakeGenerator, SnowflakeId, WallClock};

/// The generator type backing the process-wide default.
pub type DefaultGenerator = LockSnowflakeGenerator<SnowflakeId, WallClock>;

static DEFAULT: OnceLock<DefaultGenerator> = OnceLock::new();

/// Installs a default generator for `identity` on the wall clock with
/// [`DEFAULT_EPOCH`].
///
/// # Errors
///
/// - [`Error::InvalidIdentity`] if `identity` is out of range.
/// - [`Error::DefaultAlreadyInstalled`] if a default exists already.
///
/// [`DEFAULT_EPOCH`]: crate::DEFAULT_EPOCH
pub fn install(identity: impl Into<i128>) -> Result<&'static DefaultGenerator> {
    install_with(DefaultGenerator::new(identity, WallClock::default())?)
}

/// Installs a pre-built generator as the default.
///
/// # Errors
///
/// Returns [`Error::DefaultAlreadyInstalled`] if a default exists already.
pub fn install_with(generator: DefaultGenerator) -> Result<&'static DefaultGenerator> {
    DEFAULT
        .set(generator)
        .map_err(|_| Error::DefaultAlreadyInstalled)?;
    let installed = get()?;

    #[cfg(feature = "tracing")]
    tracing::info!(
        identity = installed.identity(),
        "installed process-wide default generator"
    );

    Ok(installed)
}

/// Returns the installed default generator.
///
/// # Errors
///
/// Returns [`Error::DefaultNotInstalled`] if [`install`] was never called.
pub fn get() -> Result<&'static DefaultGenerator> {
    DEFAULT.get().ok_or(Error::DefaultNotInstalled)
}

/// Mints an ID from the installed default generator.
///
/// # Errors
///
/// - [`Error::DefaultNotInstalled`] if [`install`] was never called.
/// - Any error from [`SnowflakeGenerator::generate`].
pub fn generate() -> Result<SnowflakeId> {
    get()?.generate()
}
