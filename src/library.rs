//! Loading the native library and dispatching calls into it.

use std::ffi::OsStr;
use std::sync::Arc;

use tracing::debug;

use crate::cancel::CancelToken;
use crate::error::Result;
use crate::ffi::{
    rust_call, Api, BufferAbi, FutureAbi, ObjectAbi, RawObject, RustCallStatus, RustFutureHandle,
};
use crate::future::PendingOperation;
use crate::handle::Handle;
use crate::types::{LibraryOptions, LIBRARY_ENV};

struct Inner {
    api: Api,
    options: LibraryOptions,
    // Keeps the entry points in `api` mapped. `None` for in-process tables.
    _lib: Option<libloading::Library>,
}

/// A loaded ant_ffi library.
///
/// Cloning is cheap. Every object created through a `Library` keeps a
/// clone, so the entry points stay mapped while any object is alive.
///
/// # Example
///
/// ```no_run
/// use ant::Library;
///
/// fn main() -> ant::Result<()> {
///     let lib = Library::from_env()?;
///     let max = ant::data::chunk_max_size(&lib)?;
///     println!("chunks hold up to {} bytes", max);
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct Library {
    inner: Arc<Inner>,
}

impl Library {
    /// Load the library at `path` with default options.
    pub fn open(path: impl AsRef<OsStr>) -> Result<Self> {
        Self::open_with(path, LibraryOptions::default())
    }

    /// Load the library at `path` and resolve every entry point.
    ///
    /// Fails with [`Error::Load`](crate::Error::Load) if the file cannot be
    /// loaded or a symbol is missing.
    pub fn open_with(path: impl AsRef<OsStr>, options: LibraryOptions) -> Result<Self> {
        let path = path.as_ref();
        // SAFETY: loading runs the library's initializers; ant_ffi has none
        // with preconditions. The table is stored next to the library.
        let lib = unsafe { libloading::Library::new(path) }?;
        let api = unsafe { Api::load(&lib) }?;
        debug!(path = ?path, "loaded native library");

        Ok(Self {
            inner: Arc::new(Inner {
                api,
                options,
                _lib: Some(lib),
            }),
        })
    }

    /// Load the library named by `ANT_FFI_LIBRARY`, or the platform's
    /// default name for ant_ffi, with options from the environment.
    pub fn from_env() -> Result<Self> {
        let path = std::env::var_os(LIBRARY_ENV)
            .unwrap_or_else(|| libloading::library_filename("ant_ffi"));
        Self::open_with(path, LibraryOptions::from_env())
    }

    /// Build a library from an existing entry point table.
    ///
    /// Used for implementations of the ABI that live in this process.
    pub fn from_api(api: Api, options: LibraryOptions) -> Self {
        Self {
            inner: Arc::new(Inner {
                api,
                options,
                _lib: None,
            }),
        }
    }

    /// The entry point table.
    pub fn api(&self) -> &Api {
        &self.inner.api
    }

    /// Options applied to calls through this library.
    pub fn options(&self) -> &LibraryOptions {
        &self.inner.options
    }

    pub(crate) fn buffers(&self) -> &BufferAbi {
        &self.inner.api.buffers
    }

    /// Wrap a freshly returned object token.
    pub(crate) fn wrap(&self, kind: &'static str, token: RawObject, abi: ObjectAbi) -> Handle {
        Handle::wrap(kind, token, abi, self.inner.api.buffers)
    }

    /// Run a synchronous native call and check its status.
    pub(crate) fn call<R>(&self, op: &str, call: impl FnOnce(*mut RustCallStatus) -> R) -> Result<R> {
        // SAFETY: every caller passes the status pointer straight to one
        // entry point of this library.
        unsafe { rust_call(self.buffers(), op, call) }
    }

    /// Drive a native future to completion.
    ///
    /// Without a `cancel` token the call is bounded by
    /// [`LibraryOptions::default_timeout`], if set.
    pub(crate) fn wait<T, R>(
        &self,
        op: &str,
        future: RustFutureHandle,
        abi: FutureAbi<T>,
        cancel: Option<&CancelToken>,
        lift: impl FnOnce(T) -> Result<R>,
    ) -> Result<R> {
        let token = match (cancel, self.inner.options.default_timeout) {
            (Some(token), _) => token.clone(),
            (None, Some(timeout)) => CancelToken::with_timeout(timeout),
            (None, None) => CancelToken::new(),
        };
        PendingOperation::new(op, future, abi, self.inner.api.buffers).wait(&token, lift)
    }
}

impl std::fmt::Debug for Library {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Library")
            .field("options", &self.inner.options)
            .field("dynamic", &self.inner._lib.is_some())
            .finish()
    }
}
