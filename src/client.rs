//! HTTP client with rate limiting for the native AUR RPC pipeline.

#[cfg(feature = "aur")]
use std::sync::{LazyLock, Mutex};
#[cfg(feature = "aur")]
use std::time::{Duration, Instant};

#[cfg(feature = "aur")]
use crate::aur::validation::ValidationConfig;
#[cfg(feature = "aur")]
use crate::cache::{CacheConfig, CacheWrapper};
#[cfg(feature = "aur")]
use crate::error::{PoxyError, Result};
#[cfg(feature = "aur")]
use reqwest::Response;
#[cfg(feature = "aur")]
use std::future::Future;

#[cfg(feature = "aur")]
use rand::Rng;
#[cfg(feature = "aur")]
use tracing::{debug, warn};

#[cfg(feature = "aur")]
/// Rate limiter state for archlinux.org with exponential backoff.
struct ArchLinuxRateLimiter {
    /// Last request timestamp.
    last_request: Instant,
    /// Current backoff delay in milliseconds (starts at base delay, increases exponentially).
    current_backoff_ms: u64,
    /// Number of consecutive failures/rate limits.
    consecutive_failures: u32,
}

#[cfg(feature = "aur")]
/// Rate limiter for archlinux.org requests with exponential backoff.
/// Tracks last request time and implements progressive delays on failures.
static ARCHLINUX_RATE_LIMITER: LazyLock<Mutex<ArchLinuxRateLimiter>> = LazyLock::new(|| {
    Mutex::new(ArchLinuxRateLimiter {
        last_request: Instant::now(),
        current_backoff_ms: 500, // Start with 500ms base delay
        consecutive_failures: 0,
    })
});

#[cfg(feature = "aur")]
/// Semaphore to serialize archlinux.org requests (only 1 concurrent request allowed).
/// This prevents multiple async tasks from overwhelming the server even when rate limiting
/// is applied, because the rate limiter alone doesn't prevent concurrent requests that
/// start at nearly the same time from all proceeding simultaneously.
static ARCHLINUX_REQUEST_SEMAPHORE: LazyLock<std::sync::Arc<tokio::sync::Semaphore>> =
    LazyLock::new(|| std::sync::Arc::new(tokio::sync::Semaphore::new(1)));

#[cfg(feature = "aur")]
/// Base delay for archlinux.org requests (500ms).
const ARCHLINUX_BASE_DELAY_MS: u64 = 500;
#[cfg(feature = "aur")]
/// Maximum backoff delay (60 seconds).
const ARCHLINUX_MAX_BACKOFF_MS: u64 = 60_000;
#[cfg(feature = "aur")]
/// Maximum jitter in milliseconds to add to rate limiting delays (prevents thundering herd).
const JITTER_MAX_MS: u64 = 500;

/// What: Apply rate limiting specifically for archlinux.org requests with exponential backoff.
///
/// Inputs: None
///
/// Output: `OwnedSemaphorePermit` that the caller MUST hold during the request.
///
/// # Panics
/// - Panics if the archlinux.org request semaphore is closed (should never happen in practice).
///
/// Details:
/// - Acquires a semaphore permit to serialize archlinux.org requests (only 1 at a time).
/// - Uses base delay (500ms) for archlinux.org to reduce request frequency.
/// - Implements exponential backoff: increases delay on consecutive failures (500ms → 1s → 2s → 4s, max 60s).
/// - Adds random jitter (0-500ms) to prevent thundering herd when multiple clients retry simultaneously.
/// - Resets backoff after successful requests.
/// - Thread-safe via mutex guarding the rate limiter state.
/// - The returned permit MUST be held until the HTTP request completes to ensure serialization.
#[cfg(feature = "aur")]
pub async fn rate_limit_archlinux() -> tokio::sync::OwnedSemaphorePermit {
    // 1. Acquire semaphore to serialize requests (waits if another request is in progress)
    let permit = ARCHLINUX_REQUEST_SEMAPHORE
        .clone()
        .acquire_owned()
        .await
        .expect("archlinux.org request semaphore should never be closed");

    // 2. Now that we have exclusive access, compute and apply the rate limiting delay
    let delay_needed = {
        let mut limiter = match ARCHLINUX_RATE_LIMITER.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let elapsed = limiter.last_request.elapsed();
        let min_delay = Duration::from_millis(limiter.current_backoff_ms);
        let delay = if elapsed < min_delay {
            min_delay.checked_sub(elapsed).unwrap_or(Duration::ZERO)
        } else {
            Duration::ZERO
        };
        limiter.last_request = Instant::now();
        delay
    };

    if !delay_needed.is_zero() {
        // Add random jitter to prevent thundering herd when multiple clients retry simultaneously
        let jitter_ms = rand::rng().random_range(0..=JITTER_MAX_MS);
        let delay_with_jitter = delay_needed + Duration::from_millis(jitter_ms);
        #[allow(clippy::cast_possible_truncation)] // Delay will be small (max 60s = 60000ms)
        let delay_ms = delay_needed.as_millis() as u64;
        debug!(
            delay_ms,
            jitter_ms,
            total_ms = delay_with_jitter.as_millis(),
            "rate limiting archlinux.org request with jitter"
        );
        tokio::time::sleep(delay_with_jitter).await;
    }

    // 3. Return the permit - caller MUST hold it during the request
    permit
}

/// What: Increase backoff delay for archlinux.org after a failure or rate limit.
///
/// Inputs:
/// - `retry_after_seconds`: Optional retry-after value from server (in seconds).
///
/// Output: None
///
/// Details:
/// - If `retry_after_seconds` is provided, uses that value (capped at maximum).
/// - Otherwise, doubles the current backoff delay (exponential backoff).
/// - Caps backoff at maximum delay (60 seconds).
/// - Increments consecutive failure counter.
#[cfg(feature = "aur")]
pub fn increase_archlinux_backoff(retry_after_seconds: Option<u64>) {
    let mut limiter = match ARCHLINUX_RATE_LIMITER.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    limiter.consecutive_failures += 1;
    // Use Retry-After value if provided, otherwise use exponential backoff
    if let Some(retry_after) = retry_after_seconds {
        // Convert seconds to milliseconds, cap at maximum
        let retry_after_ms = (retry_after * 1000).min(ARCHLINUX_MAX_BACKOFF_MS);
        limiter.current_backoff_ms = retry_after_ms;
        warn!(
            consecutive_failures = limiter.consecutive_failures,
            retry_after_seconds = retry_after,
            backoff_ms = limiter.current_backoff_ms,
            "increased archlinux.org backoff delay using Retry-After header"
        );
    } else {
        // Double the backoff delay, capped at maximum
        limiter.current_backoff_ms = (limiter.current_backoff_ms * 2).min(ARCHLINUX_MAX_BACKOFF_MS);
        warn!(
            consecutive_failures = limiter.consecutive_failures,
            backoff_ms = limiter.current_backoff_ms,
            "increased archlinux.org backoff delay"
        );
    }
}

/// What: Reset backoff delay for archlinux.org after a successful request.
///
/// Inputs: None
///
/// Output: None
///
/// Details:
/// - Resets backoff to base delay (500ms).
/// - Resets consecutive failure counter.
#[cfg(feature = "aur")]
pub fn reset_archlinux_backoff() {
    let mut limiter = match ARCHLINUX_RATE_LIMITER.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    if limiter.consecutive_failures > 0 {
        debug!(
            previous_failures = limiter.consecutive_failures,
            previous_backoff_ms = limiter.current_backoff_ms,
            "resetting archlinux.org backoff after successful request"
        );
    }
    limiter.current_backoff_ms = ARCHLINUX_BASE_DELAY_MS;
    limiter.consecutive_failures = 0;
}

/// What: Check if a URL belongs to archlinux.org domain.
///
/// Inputs:
/// - `url`: URL string to check.
///
/// Output:
/// - `true` if URL is from archlinux.org, `false` otherwise.
///
/// Details:
/// - Checks if URL contains "archlinux.org" domain.
#[cfg(feature = "aur")]
#[must_use]
pub fn is_archlinux_url(url: &str) -> bool {
    url.contains("archlinux.org")
}

/// Per-operation retry behavior for AUR RPC requests.
#[cfg(feature = "aur")]
#[derive(Debug, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub struct RetryPolicy {
    /// Master switch; no operation retries if false.
    pub enabled: bool,
    /// Retry failed `search` requests.
    pub retry_search: bool,
    /// Retry failed `info` requests.
    pub retry_info: bool,
    /// Retry failed `comments` requests.
    pub retry_comments: bool,
    /// Retry failed `pkgbuild` requests.
    pub retry_pkgbuild: bool,
    /// Maximum number of attempts (including the first) per request.
    pub max_retries: u32,
    /// Base delay before the first retry; doubles each subsequent attempt.
    pub base_delay: Duration,
}

#[cfg(feature = "aur")]
impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            enabled: false,
            retry_search: true,
            retry_info: true,
            retry_comments: true,
            retry_pkgbuild: true,
            max_retries: 3,
            base_delay: Duration::from_millis(500),
        }
    }
}

/// Extract the `Retry-After` header from an HTTP response, in seconds.
#[cfg(feature = "aur")]
pub fn extract_retry_after(response: &Response) -> Option<u64> {
    response
        .headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse::<u64>().ok())
}

/// Run `f` with exponential-backoff retry governed by `policy`.
///
/// Retries up to `policy.max_retries` attempts total, doubling the delay
/// after each failure and respecting a `Retry-After`-driven backoff via
/// [`increase_archlinux_backoff`] / [`reset_archlinux_backoff`].
#[cfg(feature = "aur")]
pub async fn retry_with_policy<T, F, Fut>(
    policy: &RetryPolicy,
    operation: &str,
    context: &str,
    mut f: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt = 0u32;
    let mut delay = policy.base_delay;
    loop {
        attempt += 1;
        match f().await {
            Ok(value) => {
                reset_archlinux_backoff();
                return Ok(value);
            }
            Err(err) if attempt < policy.max_retries => {
                warn!(
                    operation,
                    context,
                    attempt,
                    max_retries = policy.max_retries,
                    error = %err,
                    "retrying AUR request after failure"
                );
                increase_archlinux_backoff(None);
                tokio::time::sleep(delay).await;
                delay *= 2;
            }
            Err(err) => return Err(err),
        }
    }
}

/// Invalidates cached AUR responses by operation and key.
///
/// A thin facade over [`CacheWrapper::invalidate`] so callers don't need to
/// know the cache-key-formatting conventions in [`crate::cache`].
#[cfg(feature = "aur")]
#[derive(Debug)]
pub struct CacheInvalidator<'a> {
    /// Cache being invalidated.
    cache: &'a CacheWrapper,
}

#[cfg(feature = "aur")]
impl<'a> CacheInvalidator<'a> {
    /// Build an invalidator bound to `cache`.
    pub(crate) const fn new(cache: &'a CacheWrapper) -> Self {
        Self { cache }
    }

    /// Invalidate the cached search result for `query`.
    ///
    /// # Errors
    /// Returns `Err` if the disk cache entry could not be removed.
    pub fn search(&self, query: &str) -> Result<()> {
        self.cache
            .invalidate(&crate::cache::cache_key_search(query))
            .map_err(|e| PoxyError::Parse(e.to_string()))
    }

    /// Invalidate the cached info result for `names`.
    ///
    /// # Errors
    /// Returns `Err` if the disk cache entry could not be removed.
    pub fn info(&self, names: &[&str]) -> Result<()> {
        self.cache
            .invalidate(&crate::cache::cache_key_info(names))
            .map_err(|e| PoxyError::Parse(e.to_string()))
    }

    /// Invalidate the cached comments result for `pkgname`.
    ///
    /// # Errors
    /// Returns `Err` if the disk cache entry could not be removed.
    pub fn comments(&self, pkgname: &str) -> Result<()> {
        self.cache
            .invalidate(&crate::cache::cache_key_comments(pkgname))
            .map_err(|e| PoxyError::Parse(e.to_string()))
    }

    /// Invalidate the cached PKGBUILD result for `package`.
    ///
    /// # Errors
    /// Returns `Err` if the disk cache entry could not be removed.
    pub fn pkgbuild(&self, package: &str) -> Result<()> {
        self.cache
            .invalidate(&crate::cache::cache_key_pkgbuild(package))
            .map_err(|e| PoxyError::Parse(e.to_string()))
    }
}

/// HTTP client for the native AUR RPC pipeline.
///
/// Wraps a configured [`reqwest::Client`] together with optional response
/// caching, a retry policy, and input-validation settings. Construct via
/// [`AurRpcClient::new`] for defaults or [`AurRpcClient::builder`] to
/// customize timeout, user agent, caching, and retries.
#[cfg(feature = "aur")]
#[derive(Debug)]
pub struct AurRpcClient {
    /// Underlying HTTP client.
    http: reqwest::Client,
    /// Retry policy applied to AUR RPC requests.
    retry_policy: RetryPolicy,
    /// Response cache configuration, if caching is enabled.
    cache_config: Option<CacheConfig>,
    /// Response cache, present iff `cache_config` is `Some`.
    cache: Option<CacheWrapper>,
    /// Input validation configuration.
    validation_config: ValidationConfig,
}

#[cfg(feature = "aur")]
impl AurRpcClient {
    /// Build a client with default timeout, user agent, and no caching.
    ///
    /// # Errors
    /// Returns `Err` if the underlying `reqwest::Client` fails to build.
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    /// Start a [`AurRpcClientBuilder`] with default settings.
    #[must_use]
    pub fn builder() -> AurRpcClientBuilder {
        AurRpcClientBuilder::new()
    }

    /// Access AUR-specific operations (search, info, comments, PKGBUILD).
    #[must_use]
    pub const fn aur(&self) -> crate::aur::Aur<'_> {
        crate::aur::Aur::new(self)
    }

    /// Perform an AUR API reachability check.
    ///
    /// # Errors
    /// This never returns `Err`; failures are represented in the returned
    /// [`crate::types::HealthStatus`].
    pub async fn health(&self) -> Result<crate::types::HealthStatus> {
        crate::health::check_health(&self.http, None).await
    }

    /// The underlying `reqwest::Client`, for modules issuing raw requests.
    pub(crate) const fn http_client(&self) -> &reqwest::Client {
        &self.http
    }

    /// The configured retry policy.
    pub(crate) const fn retry_policy(&self) -> &RetryPolicy {
        &self.retry_policy
    }

    /// The configured cache settings, if caching is enabled.
    pub(crate) const fn cache_config(&self) -> Option<&CacheConfig> {
        self.cache_config.as_ref()
    }

    /// The response cache, if caching is enabled.
    pub(crate) const fn cache(&self) -> Option<&CacheWrapper> {
        self.cache.as_ref()
    }

    /// The configured input-validation settings.
    pub(crate) const fn validation_config(&self) -> &ValidationConfig {
        &self.validation_config
    }

    /// Build a [`CacheInvalidator`] for manually evicting cached responses.
    ///
    /// Returns `None` if caching is disabled.
    #[must_use]
    pub fn cache_invalidator(&self) -> Option<CacheInvalidator<'_>> {
        self.cache.as_ref().map(CacheInvalidator::new)
    }
}

/// Builder for [`AurRpcClient`].
#[cfg(feature = "aur")]
#[derive(Debug)]
pub struct AurRpcClientBuilder {
    /// Request timeout.
    timeout: Duration,
    /// User-Agent header value.
    user_agent: String,
    /// Retry policy to apply.
    retry_policy: RetryPolicy,
    /// Cache configuration; `None` means caching is disabled.
    cache_config: Option<CacheConfig>,
    /// Input-validation configuration.
    validation_config: ValidationConfig,
}

#[cfg(feature = "aur")]
impl AurRpcClientBuilder {
    /// Start a new builder with poxy-core-style defaults: 30s timeout,
    /// a `poxy-core/<version>` user agent, retries disabled, caching
    /// disabled, default validation.
    #[must_use]
    pub fn new() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: format!("poxy-core/{}", env!("CARGO_PKG_VERSION")),
            retry_policy: RetryPolicy::default(),
            cache_config: None,
            validation_config: ValidationConfig::default(),
        }
    }

    /// Start from [`AurRpcClientBuilder::new`]'s defaults, then apply
    /// whichever `POXY_*` environment variables are set (see
    /// [`crate::env`]) — zero-code overrides for CI/CD and containers.
    #[must_use]
    pub fn from_env() -> Self {
        let mut builder = Self::new();
        if let Some(timeout) = crate::env::env_timeout() {
            builder = builder.timeout(timeout);
        }
        if let Some(user_agent) = crate::env::env_user_agent() {
            builder = builder.user_agent(user_agent);
        }

        let mut retry_policy = builder.retry_policy.clone();
        if let Some(enabled) = crate::env::env_retry_enabled() {
            retry_policy.enabled = enabled;
        }
        if let Some(max_retries) = crate::env::env_max_retries() {
            retry_policy.max_retries = max_retries;
        }
        if let Some(delay_ms) = crate::env::env_retry_initial_delay_ms() {
            retry_policy.base_delay = Duration::from_millis(delay_ms);
        }
        builder = builder.retry_policy(retry_policy);

        if let Some(strict) = crate::env::env_validation_strict() {
            let mut validation_config = builder.validation_config.clone();
            validation_config.strict_empty = strict;
            builder = builder.validation_config(validation_config);
        }

        builder
    }

    /// Override the request timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override the `User-Agent` header.
    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Override the retry policy.
    #[must_use]
    pub fn retry_policy(mut self, retry_policy: RetryPolicy) -> Self {
        self.retry_policy = retry_policy;
        self
    }

    /// Enable response caching with the given configuration.
    #[must_use]
    pub fn cache_config(mut self, cache_config: CacheConfig) -> Self {
        self.cache_config = Some(cache_config);
        self
    }

    /// Override input-validation settings.
    #[must_use]
    pub fn validation_config(mut self, validation_config: ValidationConfig) -> Self {
        self.validation_config = validation_config;
        self
    }

    /// Build the configured [`AurRpcClient`].
    ///
    /// # Errors
    /// Returns `Err` if the `reqwest::Client` fails to build, or if cache
    /// initialization fails (disk cache directory creation).
    pub fn build(self) -> Result<AurRpcClient> {
        let http = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(self.user_agent)
            .build()
            .map_err(PoxyError::Network)?;

        let cache = match &self.cache_config {
            Some(cfg) => Some(
                CacheWrapper::new(cfg)
                    .map_err(|e| PoxyError::Parse(format!("cache initialization failed: {e}")))?,
            ),
            None => None,
        };

        Ok(AurRpcClient {
            http,
            retry_policy: self.retry_policy,
            cache_config: self.cache_config,
            cache,
            validation_config: self.validation_config,
        })
    }
}

#[cfg(feature = "aur")]
impl Default for AurRpcClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
