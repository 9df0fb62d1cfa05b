//! Parser configuration: accessor tables, fallbacks and the compiled-query cache.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use strsim::levenshtein;

use crate::ast::{Condition, LiteralKind};
use crate::cache::{CacheProvider, LruCache, MapCache};
use crate::error::{HostError, ParseResult};
use crate::parser::Parser;
use crate::value::Value;

/// Accessor taking an integer argument, e.g. `arg(10)`.
pub type IntMethod<E> = Arc<dyn Fn(&E, i64) -> Result<Value, HostError> + Send + Sync>;

/// Accessor taking a string argument, e.g. `rec('Name')`.
pub type StrMethod<E> = Arc<dyn Fn(&E, &str) -> Result<Value, HostError> + Send + Sync>;

/// Fallback for unregistered names with an integer argument; receives the call name.
pub type DefaultIntMethod<E> =
    Arc<dyn Fn(&str, &E, i64) -> Result<Value, HostError> + Send + Sync>;

/// Fallback for unregistered names with a string argument; receives the call name.
pub type DefaultStrMethod<E> =
    Arc<dyn Fn(&str, &E, &str) -> Result<Value, HostError> + Send + Sync>;

/// Maximum Levenshtein distance to consider a name as a suggestion.
const MAX_SUGGESTION_DISTANCE: usize = 3;

/// Capacity used for `kind = "lru"` when none is given.
pub const DEFAULT_LRU_CAPACITY: usize = 256;

/// Everything the parser needs to resolve calls, plus the optional cache.
///
/// Method tables are consulted at parse time only. The resolved accessor is
/// captured inside the compiled tree, so registering, replacing or removing a
/// method later never changes a tree that was already built.
///
/// Cached trees carry the bindings they were compiled with, so a cache is
/// only valid for one set of method tables. For that reason a clone starts
/// without a cache; attach one with [`with_cache`](Self::with_cache) or
/// [`with_cache_config`](Self::with_cache_config) once its methods are set.
/// Share a single `ParseConfig` behind an `Arc` to share its cache.
///
/// # Examples
///
/// ```
/// use filterql::{CacheConfig, ParseConfig, Value};
///
/// struct Order {
///     total: i64,
/// }
///
/// let config = ParseConfig::<Order>::new()
///     .with_str_method("field", |order: &Order, name: &str| match name {
///         "total" => Ok(Value::Int(order.total)),
///         other => Err(format!("no field {}", other).into()),
///     })
///     .with_cache_config(&CacheConfig::Lru { capacity: 16 });
///
/// let cond = config.parse("field('total') >= 100").unwrap();
/// assert!(cond.matches(&Order { total: 120 }).unwrap());
/// assert!(!cond.matches(&Order { total: 80 }).unwrap());
/// ```
pub struct ParseConfig<E: ?Sized> {
    int_methods: HashMap<String, IntMethod<E>>,
    str_methods: HashMap<String, StrMethod<E>>,
    default_int: Option<DefaultIntMethod<E>>,
    default_str: Option<DefaultStrMethod<E>>,
    cache: Option<Arc<dyn CacheProvider<E>>>,
}

impl<E: ?Sized + 'static> ParseConfig<E> {
    /// Creates an empty configuration: no methods, no fallbacks, no cache.
    pub fn new() -> Self {
        Self {
            int_methods: HashMap::new(),
            str_methods: HashMap::new(),
            default_int: None,
            default_str: None,
            cache: None,
        }
    }

    /// Registers an accessor for `name(<int>)`.
    pub fn with_int_method<F>(mut self, name: impl Into<String>, method: F) -> Self
    where
        F: Fn(&E, i64) -> Result<Value, HostError> + Send + Sync + 'static,
    {
        self.int_methods.insert(name.into(), Arc::new(method));
        self
    }

    /// Registers an accessor for `name('<string>')`.
    pub fn with_str_method<F>(mut self, name: impl Into<String>, method: F) -> Self
    where
        F: Fn(&E, &str) -> Result<Value, HostError> + Send + Sync + 'static,
    {
        self.str_methods.insert(name.into(), Arc::new(method));
        self
    }

    /// Sets the accessor bound to unregistered names called with an integer.
    pub fn with_default_int_method<F>(mut self, method: F) -> Self
    where
        F: Fn(&str, &E, i64) -> Result<Value, HostError> + Send + Sync + 'static,
    {
        self.default_int = Some(Arc::new(method));
        self
    }

    /// Sets the accessor bound to unregistered names called with a string.
    pub fn with_default_str_method<F>(mut self, method: F) -> Self
    where
        F: Fn(&str, &E, &str) -> Result<Value, HostError> + Send + Sync + 'static,
    {
        self.default_str = Some(Arc::new(method));
        self
    }

    /// Uses `cache` to memoize compiled queries.
    ///
    /// Do not hand the same cache to configs whose method tables differ: a hit
    /// returns whatever tree was stored first.
    pub fn with_cache(mut self, cache: Arc<dyn CacheProvider<E>>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Builds the cache described by `config`, replacing any existing one.
    pub fn with_cache_config(mut self, config: &CacheConfig) -> Self {
        self.cache = config.build();
        self
    }

    /// The configured cache, if any.
    pub fn cache(&self) -> Option<&Arc<dyn CacheProvider<E>>> {
        self.cache.as_ref()
    }

    /// Compiles `query`, consulting the cache first. See [`Parser::parse`].
    pub fn parse(&self, query: &str) -> ParseResult<Arc<Condition<E>>> {
        Parser::parse(query, self)
    }

    /// Compiles `query` without touching the cache. See [`Parser::compile`].
    pub fn compile(&self, query: &str) -> ParseResult<Condition<E>> {
        Parser::compile(query, self)
    }

    pub(crate) fn resolve_int(&self, name: &str) -> Option<IntMethod<E>> {
        if let Some(method) = self.int_methods.get(name) {
            return Some(Arc::clone(method));
        }
        let fallback = Arc::clone(self.default_int.as_ref()?);
        tracing::trace!(name, "binding fallback int accessor");
        let name = name.to_string();
        Some(Arc::new(move |env: &E, arg: i64| fallback(&name, env, arg)))
    }

    pub(crate) fn resolve_str(&self, name: &str) -> Option<StrMethod<E>> {
        if let Some(method) = self.str_methods.get(name) {
            return Some(Arc::clone(method));
        }
        let fallback = Arc::clone(self.default_str.as_ref()?);
        tracing::trace!(name, "binding fallback string accessor");
        let name = name.to_string();
        Some(Arc::new(move |env: &E, arg: &str| fallback(&name, env, arg)))
    }

    /// Closest registered name taking the same argument type.
    pub(crate) fn suggest(&self, name: &str, kind: LiteralKind) -> Option<String> {
        match kind {
            LiteralKind::Int => find_similar_name(name, self.int_methods.keys().map(String::as_str)),
            LiteralKind::Str => find_similar_name(name, self.str_methods.keys().map(String::as_str)),
        }
    }
}

impl<E: ?Sized + 'static> Default for ParseConfig<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: ?Sized> Clone for ParseConfig<E> {
    fn clone(&self) -> Self {
        Self {
            int_methods: self.int_methods.clone(),
            str_methods: self.str_methods.clone(),
            default_int: self.default_int.clone(),
            default_str: self.default_str.clone(),
            // Trees cached under the original bindings
            cache: None,
        }
    }
}

impl<E: ?Sized> fmt::Debug for ParseConfig<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut int_names: Vec<_> = self.int_methods.keys().collect();
        int_names.sort();
        let mut str_names: Vec<_> = self.str_methods.keys().collect();
        str_names.sort();
        f.debug_struct("ParseConfig")
            .field("int_methods", &int_names)
            .field("str_methods", &str_names)
            .field("default_int", &self.default_int.is_some())
            .field("default_str", &self.default_str.is_some())
            .field("cache", &self.cache.is_some())
            .finish()
    }
}

/// Finds the best matching name using Levenshtein distance.
///
/// Returns `None` for exact matches and for anything further away than
/// [`MAX_SUGGESTION_DISTANCE`]. Ties go to the alphabetically first name so
/// the suggestion does not depend on hash map order.
fn find_similar_name<'a>(query: &str, candidates: impl Iterator<Item = &'a str>) -> Option<String> {
    let query_lower = query.to_lowercase();

    let (best_distance, best_match) = candidates
        .filter(|name| !name.is_empty())
        .map(|name| (levenshtein(&query_lower, &name.to_lowercase()), name))
        .min()?;

    if best_distance > 0 && best_distance <= MAX_SUGGESTION_DISTANCE {
        Some(best_match.to_string())
    } else {
        None
    }
}

/// Cache settings, typically read from a `[cache]` table.
///
/// ```toml
/// [cache]
/// kind = "lru"
/// capacity = 512
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum CacheConfig {
    /// Parse every query from scratch.
    #[default]
    None,
    /// Keep every compiled query for the life of the cache.
    Unbounded,
    /// Keep the `capacity` most recently used queries.
    Lru {
        /// Maximum number of entries; zero is treated as one.
        #[serde(default = "default_lru_capacity")]
        capacity: usize,
    },
}

fn default_lru_capacity() -> usize {
    DEFAULT_LRU_CAPACITY
}

impl CacheConfig {
    /// Builds the described cache, or `None` for [`CacheConfig::None`].
    pub fn build<E: ?Sized + 'static>(&self) -> Option<Arc<dyn CacheProvider<E>>> {
        match *self {
            CacheConfig::None => None,
            CacheConfig::Unbounded => Some(Arc::new(MapCache::new())),
            CacheConfig::Lru { capacity } => Some(Arc::new(LruCache::new(capacity))),
        }
    }
}
