#![allow(dead_code)]

//! A scriptable module that records everything that happens to it.

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::{Result, bail};
use encounterdag::errors;
use encounterdag::event::{Event, EventKind};
use encounterdag::modules::{Dep, Module, ModuleDescriptor, ModuleRegistry, ReportPayload};

/// Shared, ordered log of calls made on probes.
///
/// Entries look like `"normalize:A"`, `"A:init"`, `"A:cast@100"`,
/// `"A:complete"`, `"build:A"`.
#[derive(Debug, Clone, Default)]
pub struct Journal(Rc<RefCell<Vec<String>>>);

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, entry: String) {
        self.0.borrow_mut().push(entry);
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.borrow().clone()
    }

    /// Entries that start with `prefix`.
    pub fn matching(&self, prefix: &str) -> Vec<String> {
        self.0
            .borrow()
            .iter()
            .filter(|e| e.starts_with(prefix))
            .cloned()
            .collect()
    }

    /// Modules that received events of `kind`, in delivery order.
    pub fn receivers_of(&self, kind: &str) -> Vec<String> {
        self.0
            .borrow()
            .iter()
            .filter_map(|e| {
                let (module, rest) = e.split_once(':')?;
                let received = rest.split('@').next()?;
                let is_delivery = module != "normalize" && module != "build";
                (is_delivery && received == kind).then(|| module.to_string())
            })
            .collect()
    }
}

/// What a [`Probe`] should do.
#[derive(Debug, Clone, Default)]
pub struct ProbeBehaviour {
    /// Fail when handling the n-th delivered event (0 = `init`).
    pub fail_on_delivery: Option<usize>,
    /// Fail on any event of this kind.
    pub fail_on_kind: Option<String>,
    /// Fail in `normalize`.
    pub fail_normalize: bool,
    /// Fail in the factory.
    pub fail_build: bool,
    /// Append this event during `normalize`.
    pub append_on_normalize: Option<Event>,
    /// Remove events of this kind during `normalize`.
    pub drop_on_normalize: Option<String>,
    /// Return `None` from `output`.
    pub silent: bool,
}

impl ProbeBehaviour {
    pub fn fail_on_delivery(n: usize) -> Self {
        Self {
            fail_on_delivery: Some(n),
            ..Self::default()
        }
    }

    pub fn fail_on_kind(kind: &str) -> Self {
        Self {
            fail_on_kind: Some(kind.to_string()),
            ..Self::default()
        }
    }

    pub fn silent() -> Self {
        Self {
            silent: true,
            ..Self::default()
        }
    }
}

/// Module used to observe the engine from the outside.
#[derive(Debug)]
pub struct Probe {
    id: String,
    behaviour: ProbeBehaviour,
    journal: Journal,
    deps: Vec<Dep<Probe>>,
    delivered: usize,
    timestamps: Vec<u64>,
}

impl Probe {
    pub fn delivered(&self) -> usize {
        self.delivered
    }

    /// Timestamps of every delivered event, boundary events included.
    pub fn timestamps(&self) -> &[u64] {
        &self.timestamps
    }

    pub fn dependency_ids(&self) -> Vec<String> {
        self.deps.iter().map(|d| d.borrow().id.clone()).collect()
    }
}

impl Module for Probe {
    fn normalize(&mut self, mut events: Vec<Event>) -> Result<Vec<Event>> {
        self.journal.push(format!("normalize:{}", self.id));

        if self.behaviour.fail_normalize {
            bail!("{} refuses to normalize", self.id);
        }
        if let Some(kind) = &self.behaviour.drop_on_normalize {
            events.retain(|e| e.kind.as_str() != kind);
        }
        if let Some(extra) = &self.behaviour.append_on_normalize {
            events.push(extra.clone());
        }
        Ok(events)
    }

    fn handle_event(&mut self, event: &Event) -> Result<()> {
        let index = self.delivered;
        self.delivered += 1;
        self.timestamps.push(event.timestamp);

        match &event.kind {
            EventKind::Named(_) => self
                .journal
                .push(format!("{}:{}@{}", self.id, event.kind, event.timestamp)),
            boundary => self.journal.push(format!("{}:{}", self.id, boundary)),
        }

        if self.behaviour.fail_on_delivery == Some(index) {
            bail!("{} exploded on delivery {}", self.id, index);
        }
        if self.behaviour.fail_on_kind.as_deref() == Some(event.kind.as_str()) {
            bail!("{} cannot handle '{}'", self.id, event.kind);
        }
        Ok(())
    }

    fn output(&self) -> Option<Box<dyn ReportPayload>> {
        if self.behaviour.silent {
            return None;
        }
        Some(Box::new(format!("{} saw {} events", self.id, self.delivered)))
    }
}

/// Register a probe whose dependencies are all probes too.
pub fn register_probe(
    registry: &mut ModuleRegistry,
    descriptor: ModuleDescriptor,
    behaviour: ProbeBehaviour,
    journal: &Journal,
) -> errors::Result<()> {
    let journal = journal.clone();
    registry.register(descriptor, move |deps| {
        journal.push(format!("build:{}", deps.module()));
        if behaviour.fail_build {
            bail!("{} cannot be built", deps.module());
        }

        let resolved = deps
            .declared()
            .iter()
            .map(|id| deps.get::<Probe>(id))
            .collect::<Result<Vec<_>>>()?;

        Ok(Probe {
            id: deps.module().to_string(),
            behaviour: behaviour.clone(),
            journal: journal.clone(),
            deps: resolved,
            delivered: 0,
            timestamps: Vec::new(),
        })
    })
}

/// Register a probe with default behaviour.
pub fn plain(
    registry: &mut ModuleRegistry,
    descriptor: ModuleDescriptor,
    journal: &Journal,
) -> errors::Result<()> {
    register_probe(registry, descriptor, ProbeBehaviour::default(), journal)
}
