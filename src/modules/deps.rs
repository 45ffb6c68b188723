// src/modules/deps.rs

//! Dependency injection for module factories.

use std::any::{Any, type_name};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use anyhow::{Result, anyhow, bail};

use crate::context::ExecutionContext;
use crate::modules::Module;
use crate::types::ModuleId;

/// Typed handle to another module instance of the same run.
pub type Dep<M> = Rc<RefCell<M>>;

/// A built module instance, viewable both as a trait object (for dispatch)
/// and as `Any` (for typed lookups). Both point at the same allocation.
#[derive(Clone)]
pub(crate) struct ModuleHandle {
    dynamic: Rc<RefCell<dyn Module>>,
    any: Rc<dyn Any>,
}

impl ModuleHandle {
    pub(crate) fn new<M: Module>(module: M) -> Self {
        let rc = Rc::new(RefCell::new(module));
        let dynamic: Rc<RefCell<dyn Module>> = rc.clone();
        let any: Rc<dyn Any> = rc;
        Self { dynamic, any }
    }

    pub(crate) fn module(&self) -> &RefCell<dyn Module> {
        &self.dynamic
    }

    pub(crate) fn downcast<M: Module>(&self) -> Option<Dep<M>> {
        self.any.clone().downcast::<RefCell<M>>().ok()
    }
}

/// Injector passed to a module factory.
///
/// Only the dependencies the descriptor declared can be looked up; they are
/// always already built because the build follows dependency order.
pub struct ModuleDeps<'a> {
    module: &'a str,
    declared: &'a [ModuleId],
    built: &'a HashMap<ModuleId, ModuleHandle>,
    context: &'a Rc<ExecutionContext>,
}

impl<'a> ModuleDeps<'a> {
    pub(crate) fn new(
        module: &'a str,
        declared: &'a [ModuleId],
        built: &'a HashMap<ModuleId, ModuleHandle>,
        context: &'a Rc<ExecutionContext>,
    ) -> Self {
        Self {
            module,
            declared,
            built,
            context,
        }
    }

    /// Identifier of the module being built.
    pub fn module(&self) -> &str {
        self.module
    }

    /// Dependencies declared by the module being built, in declaration order.
    pub fn declared(&self) -> &[ModuleId] {
        self.declared
    }

    /// Shared execution context of the run.
    pub fn context(&self) -> Rc<ExecutionContext> {
        Rc::clone(self.context)
    }

    /// Look up a declared dependency as its concrete type.
    pub fn get<M: Module>(&self, id: &str) -> Result<Dep<M>> {
        if !self.declared.iter().any(|d| d == id) {
            bail!(
                "module '{}' requested '{}' without declaring it as a dependency",
                self.module,
                id
            );
        }

        let handle = self
            .built
            .get(id)
            .ok_or_else(|| anyhow!("dependency '{id}' has not been built"))?;

        handle
            .downcast::<M>()
            .ok_or_else(|| anyhow!("dependency '{id}' is not a {}", type_name::<M>()))
    }
}
