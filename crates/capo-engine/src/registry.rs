//! Adapter registry
//!
//! Maps names to adapter factories so hosts can pick a backend at runtime,
//! and recognizes which backend a node belongs to by its concrete type.
//! The two built-in adapters ("dom" and "rcdom") cannot be removed.

use capo_core::{AnalysisContext, AnalysisReport, AnalyzeOptions, Capability, TreeAdapter, analyze};
use capo_dom::DomAdapter;
use capo_html::RcDomAdapter;
use std::any::{Any, TypeId, type_name};
use std::rc::Rc;
use thiserror::Error;

/// Registry operation errors
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("An adapter named `{0}` is already registered")]
    Duplicate(String),

    #[error("Unknown adapter `{name}`; registered: {available}")]
    UnknownAdapter { name: String, available: String },

    #[error("Adapter `{adapter}` is missing the required `{capability}` capability")]
    MissingCapability {
        adapter: String,
        capability: Capability,
    },

    #[error("Built-in adapter `{0}` cannot be unregistered")]
    BuiltinRemoval(String),

    #[error("No registered adapter handles nodes of type `{shape}`; candidates: {candidates}")]
    UnknownNodeShape { shape: String, candidates: String },

    #[error("Adapter `{adapter}` is not a `{expected}`")]
    TypeMismatch {
        adapter: String,
        expected: &'static str,
    },
}

/// Public description of a registered adapter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterInfo {
    pub name: String,
    pub builtin: bool,
    /// Rust type of the adapter's node handle
    pub node_type: &'static str,
    pub capabilities: Vec<Capability>,
}

type Factory = Box<dyn Fn() -> Box<dyn Any>>;
type Runner = Box<dyn Fn(&dyn Any, &AnalysisContext, AnalyzeOptions) -> Option<AnalysisReport>>;

struct Entry {
    info: AdapterInfo,
    node_type: TypeId,
    factory: Factory,
    run: Runner,
}

/// Named adapter factories
pub struct AdapterRegistry {
    entries: Vec<Entry>,
}

impl Default for AdapterRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl AdapterRegistry {
    /// Registry without any adapters
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Registry with the live ("dom") and static ("rcdom") adapters
    pub fn with_builtins() -> Self {
        let mut registry = Self::empty();
        registry.insert(DomAdapter::NAME, true, || DomAdapter);
        registry.insert(RcDomAdapter::NAME, true, RcDomAdapter::new);
        registry
    }

    /// Register an adapter under `name`. Fails when the name is taken or
    /// the adapter lacks a required capability.
    pub fn register<A, F>(&mut self, name: &str, factory: F) -> Result<(), RegistryError>
    where
        A: TreeAdapter + 'static,
        A::Node: 'static,
        F: Fn() -> A + 'static,
    {
        if self.contains(name) {
            return Err(RegistryError::Duplicate(name.to_string()));
        }
        if let Some(capability) = factory().missing_capability() {
            return Err(RegistryError::MissingCapability {
                adapter: name.to_string(),
                capability,
            });
        }
        self.insert(name, false, factory);
        tracing::debug!("registered adapter `{}` for {}", name, type_name::<A::Node>());
        Ok(())
    }

    fn insert<A, F>(&mut self, name: &str, builtin: bool, factory: F)
    where
        A: TreeAdapter + 'static,
        A::Node: 'static,
        F: Fn() -> A + 'static,
    {
        let factory = Rc::new(factory);
        let capabilities = factory().capabilities().to_vec();

        let create = Rc::clone(&factory);
        let run = Rc::clone(&factory);
        self.entries.push(Entry {
            info: AdapterInfo {
                name: name.to_string(),
                builtin,
                node_type: type_name::<A::Node>(),
                capabilities,
            },
            node_type: TypeId::of::<A::Node>(),
            factory: Box::new(move || Box::new(create()) as Box<dyn Any>),
            run: Box::new(move |head, ctx, options| {
                let head = head.downcast_ref::<A::Node>()?;
                let adapter = run();
                Some(analyze(head, &adapter, ctx, options).to_report(&adapter))
            }),
        });
    }

    /// Remove a user adapter
    pub fn unregister(&mut self, name: &str) -> Result<(), RegistryError> {
        let index = self
            .entries
            .iter()
            .position(|e| e.info.name == name)
            .ok_or_else(|| self.unknown(name))?;
        if self.entries[index].info.builtin {
            return Err(RegistryError::BuiltinRemoval(name.to_string()));
        }
        self.entries.remove(index);
        Ok(())
    }

    /// Fails with [`RegistryError::UnknownAdapter`] when `name` is not registered
    pub fn check(&self, name: &str) -> Result<(), RegistryError> {
        self.entry(name).map(|_| ())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e.info.name == name)
    }

    /// Registered adapters in registration order
    pub fn list(&self) -> Vec<AdapterInfo> {
        self.entries.iter().map(|e| e.info.clone()).collect()
    }

    /// Build a fresh instance of the adapter registered as `name`
    pub fn create<A: 'static>(&self, name: &str) -> Result<A, RegistryError> {
        let entry = self.entry(name)?;
        (entry.factory)()
            .downcast::<A>()
            .map(|adapter| *adapter)
            .map_err(|_| RegistryError::TypeMismatch {
                adapter: name.to_string(),
                expected: type_name::<A>(),
            })
    }

    /// Name of the first registered adapter whose nodes have `node`'s type
    pub fn detect<N: 'static>(&self, _node: &N) -> Result<&str, RegistryError> {
        self.entries
            .iter()
            .find(|e| e.node_type == TypeId::of::<N>())
            .map(|e| e.info.name.as_str())
            .ok_or_else(|| RegistryError::UnknownNodeShape {
                shape: type_name::<N>().to_string(),
                candidates: self
                    .entries
                    .iter()
                    .map(|e| format!("{} ({})", e.info.name, e.info.node_type))
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }

    /// Analyze `head` with the adapter detected for its type
    pub fn analyze<N: 'static>(
        &self,
        head: &N,
        ctx: &AnalysisContext,
        options: AnalyzeOptions,
    ) -> Result<AnalysisReport, RegistryError> {
        let name = self.detect(head)?.to_string();
        self.analyze_with(&name, head, ctx, options)
    }

    /// Analyze `head` with a named adapter
    pub fn analyze_with<N: 'static>(
        &self,
        name: &str,
        head: &N,
        ctx: &AnalysisContext,
        options: AnalyzeOptions,
    ) -> Result<AnalysisReport, RegistryError> {
        let entry = self.entry(name)?;
        tracing::debug!("analyzing with adapter `{}`", name);
        (entry.run)(head, ctx, options).ok_or_else(|| RegistryError::TypeMismatch {
            adapter: name.to_string(),
            expected: type_name::<N>(),
        })
    }

    fn entry(&self, name: &str) -> Result<&Entry, RegistryError> {
        self.entries
            .iter()
            .find(|e| e.info.name == name)
            .ok_or_else(|| self.unknown(name))
    }

    fn unknown(&self, name: &str) -> RegistryError {
        RegistryError::UnknownAdapter {
            name: name.to_string(),
            available: self
                .entries
                .iter()
                .map(|e| e.info.name.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}
