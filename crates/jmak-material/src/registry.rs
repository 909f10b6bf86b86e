//! Material lookup by identity tags.
//!
//! The host describes a billet's material as a set of free-form tags
//! ([`MaterialIdentity`]). A [`MaterialRegistry`] resolves those tags to a
//! shared [`MaterialParameters`] by plain case-insensitive alias matching.

use std::sync::Arc;

use indexmap::IndexMap;
use smallvec::SmallVec;

use crate::builtin;
use crate::error::MaterialError;
use crate::params::MaterialParameters;

/// The material tags of a billet, e.g. `["S355J2", "steel"]`.
///
/// Most billets carry one or two tags, so the tags are stored inline.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MaterialIdentity {
    tags: SmallVec<[String; 4]>,
}

impl MaterialIdentity {
    /// Identity from any list of tags.
    pub fn new<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tags: tags.into_iter().map(Into::into).collect(),
        }
    }

    /// The tags in insertion order.
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Whether any tag equals `alias`, ignoring ASCII case.
    pub fn fits(&self, alias: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(alias))
    }
}

impl From<&str> for MaterialIdentity {
    fn from(tag: &str) -> Self {
        Self::new([tag])
    }
}

#[derive(Clone, Debug)]
struct Entry {
    aliases: SmallVec<[String; 4]>,
    params: Arc<MaterialParameters>,
}

/// Named materials and the aliases they answer to.
///
/// Registration order is preserved; [`lookup`](Self::lookup) returns the
/// first registered material with a matching alias.
#[derive(Clone, Debug, Default)]
pub struct MaterialRegistry {
    entries: IndexMap<String, Entry>,
}

impl MaterialRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry preloaded with the built-in steel grades.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        for (name, aliases, params) in builtin::all() {
            // Built-in tables are covered by tests; a failure here would be
            // a duplicate name.
            if let Err(e) = registry.register(name, aliases.iter().copied(), params) {
                tracing::error!(material = name, error = %e, "built-in material rejected");
            }
        }
        registry
    }

    /// Validate and register `params` under `name`.
    ///
    /// The name itself always counts as an alias.
    pub fn register<I, S>(
        &mut self,
        name: &str,
        aliases: I,
        params: MaterialParameters,
    ) -> Result<Arc<MaterialParameters>, MaterialError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if self.entries.contains_key(name) {
            return Err(MaterialError::DuplicateMaterial {
                material: name.to_string(),
            });
        }
        params.validate(name)?;

        let mut all: SmallVec<[String; 4]> = SmallVec::new();
        if !name.is_empty() {
            all.push(name.to_string());
        }
        all.extend(aliases.into_iter().map(Into::into));
        all.retain(|a| !a.is_empty());
        if all.is_empty() {
            return Err(MaterialError::NoAliases {
                material: name.to_string(),
            });
        }

        tracing::debug!(
            material = name,
            aliases = ?all,
            dynamic = params.dynamic.is_some(),
            static_ = params.static_.is_some(),
            metadynamic = params.metadynamic.is_some(),
            grain_growth = params.grain_growth.is_some(),
            "registered material"
        );
        let params = Arc::new(params);
        self.entries.insert(
            name.to_string(),
            Entry {
                aliases: all,
                params: Arc::clone(&params),
            },
        );
        Ok(params)
    }

    /// Parse a JSON parameter table and register it.
    pub fn register_json<I, S>(
        &mut self,
        name: &str,
        aliases: I,
        json: &str,
    ) -> Result<Arc<MaterialParameters>, MaterialError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let params = MaterialParameters::from_json(name, json)?;
        self.register(name, aliases, params)
    }

    /// The parameters of the first material whose aliases fit `identity`.
    pub fn lookup(&self, identity: &MaterialIdentity) -> Option<Arc<MaterialParameters>> {
        self.entries
            .values()
            .find(|e| e.aliases.iter().any(|a| identity.fits(a)))
            .map(|e| Arc::clone(&e.params))
    }

    /// The parameters registered under exactly `name`.
    pub fn get(&self, name: &str) -> Option<Arc<MaterialParameters>> {
        self.entries.get(name).map(|e| Arc::clone(&e.params))
    }

    /// Registered material names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of registered materials.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no material is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
