//! Bundler configuration which keeps this package out of server bundles.
//!
//! [`with_server_timing_build`] decorates any bundler hook registered in a
//! [`BuildConfig`]. For server builds it registers the package as an external
//! dependency, so that the bundled server and the request handler share one
//! instance of the scoped context store, and then calls through to the
//! original hook.

use crate::SharedString;
use std::{fmt, sync::Arc};

/// The package name registered as an external dependency.
pub const PACKAGE_NAME: &str = "tempus";

/// A bundler hook which receives the bundle config and the build context.
pub type BundlerHook = Arc<dyn Fn(BundleConfig, &BuildContext) -> BundleConfig + Send + Sync>;

/// A dependency which is resolved at runtime instead of being bundled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct External {
    /// Module request to match.
    request: SharedString,
    /// Runtime expression which resolves the module.
    target: SharedString,
}

impl External {
    /// Creates a new instance.
    #[inline]
    pub fn new(request: impl Into<SharedString>, target: impl Into<SharedString>) -> Self {
        Self {
            request: request.into(),
            target: target.into(),
        }
    }

    /// Creates a new instance resolved as a CommonJS module with the same name.
    #[inline]
    pub fn commonjs(request: &'static str) -> Self {
        Self::new(request, format!("commonjs {request}"))
    }

    /// Returns the module request.
    #[inline]
    pub fn request(&self) -> &str {
        self.request.as_ref()
    }

    /// Returns the runtime target.
    #[inline]
    pub fn target(&self) -> &str {
        self.target.as_ref()
    }
}

/// Context of a single bundler invocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildContext {
    /// A flag to indicate whether the bundle targets the server.
    is_server: bool,
    /// A flag to indicate whether it is a development build.
    dev: bool,
}

impl BuildContext {
    /// Creates a new context for the server target.
    #[inline]
    pub fn server() -> Self {
        Self {
            is_server: true,
            dev: false,
        }
    }

    /// Creates a new context for the client target.
    #[inline]
    pub fn client() -> Self {
        Self {
            is_server: false,
            dev: false,
        }
    }

    /// Returns the context with the development flag.
    #[inline]
    pub fn with_dev(mut self, dev: bool) -> Self {
        self.dev = dev;
        self
    }

    /// Returns `true` if the bundle targets the server.
    #[inline]
    pub fn is_server(&self) -> bool {
        self.is_server
    }

    /// Returns `true` if it is a development build.
    #[inline]
    pub fn is_dev(&self) -> bool {
        self.dev
    }
}

/// Bundler configuration passed through the hooks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BundleConfig {
    /// External dependencies.
    externals: Vec<External>,
}

impl BundleConfig {
    /// Creates a new instance.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an external dependency.
    #[inline]
    pub fn push_external(&mut self, external: External) {
        self.externals.push(external);
    }

    /// Returns the external dependencies.
    #[inline]
    pub fn externals(&self) -> &[External] {
        &self.externals
    }
}

/// Build configuration with an optional bundler hook.
#[derive(Clone, Default)]
pub struct BuildConfig {
    /// Bundler hook.
    bundler: Option<BundlerHook>,
}

impl BuildConfig {
    /// Creates a new instance without any bundler hook.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the config with the bundler hook.
    #[inline]
    pub fn with_bundler<F>(mut self, hook: F) -> Self
    where
        F: Fn(BundleConfig, &BuildContext) -> BundleConfig + Send + Sync + 'static,
    {
        self.bundler = Some(Arc::new(hook));
        self
    }

    /// Returns the bundler hook.
    #[inline]
    pub fn bundler(&self) -> Option<&BundlerHook> {
        self.bundler.as_ref()
    }

    /// Applies the bundler hook. The bundle config is returned unchanged if there is no hook.
    #[inline]
    pub fn apply(&self, bundle: BundleConfig, ctx: &BuildContext) -> BundleConfig {
        match &self.bundler {
            Some(hook) => hook(bundle, ctx),
            None => bundle,
        }
    }
}

impl fmt::Debug for BuildConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuildConfig")
            .field("bundler", &self.bundler.is_some())
            .finish()
    }
}

/// Decorates the bundler hook so that server bundles treat this package as external.
/// Any pre-existing hook is always called through.
pub fn with_server_timing_build(config: BuildConfig) -> BuildConfig {
    let original = config.bundler;
    let hook: BundlerHook = Arc::new(move |mut bundle: BundleConfig, ctx: &BuildContext| {
        if ctx.is_server() {
            bundle.push_external(External::commonjs(PACKAGE_NAME));
        }
        match &original {
            Some(hook) => hook(bundle, ctx),
            None => bundle,
        }
    });
    BuildConfig {
        bundler: Some(hook),
    }
}
