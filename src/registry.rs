//! Name-addressed lookup for tools and resources
//!
//! Populated once during process initialization and immutable afterwards;
//! duplicate registration is a startup-time programmer error.

use std::collections::HashMap;
use std::fmt;

use serde_json::{Map, Value};

use crate::errors::{DispatchError, HandlerError, RegistryError};

/// Declared kind of a tool parameter, used for binding and coercion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    String,
    Integer,
    Number,
    Boolean,
    NumberList,
}

impl ParamKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::NumberList => "number list",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ParamSpec {
    pub name: &'static str,
    pub required: bool,
    pub kind: ParamKind,
}

impl ParamSpec {
    pub const fn required(name: &'static str, kind: ParamKind) -> Self {
        Self {
            name,
            required: true,
            kind,
        }
    }

    pub const fn optional(name: &'static str, kind: ParamKind) -> Self {
        Self {
            name,
            required: false,
            kind,
        }
    }
}

/// Handler invoked with parameters already bound and coerced per the spec.
pub type ToolHandler = Box<dyn Fn(&Map<String, Value>) -> Result<Value, HandlerError> + Send + Sync>;

/// Handler invoked with no parameters at all.
pub type ResourceHandler = Box<dyn Fn() -> Result<Value, HandlerError> + Send + Sync>;

pub struct ToolDescriptor {
    pub name: String,
    pub params: Vec<ParamSpec>,
    pub handler: ToolHandler,
}

impl fmt::Debug for ToolDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolDescriptor")
            .field("name", &self.name)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

pub struct ResourceDescriptor {
    pub path: String,
    pub handler: ResourceHandler,
}

impl fmt::Debug for ResourceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceDescriptor")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

#[derive(Default)]
pub struct Registry {
    tools: HashMap<String, ToolDescriptor>,
    resources: HashMap<String, ResourceDescriptor>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_tool(
        &mut self,
        name: impl Into<String>,
        params: Vec<ParamSpec>,
        handler: ToolHandler,
    ) -> Result<(), RegistryError> {
        let name = name.into();
        if self.tools.contains_key(&name) {
            return Err(RegistryError::DuplicateName(name));
        }

        self.tools.insert(
            name.clone(),
            ToolDescriptor {
                name,
                params,
                handler,
            },
        );
        Ok(())
    }

    pub fn register_resource(
        &mut self,
        path: impl Into<String>,
        handler: ResourceHandler,
    ) -> Result<(), RegistryError> {
        let path = path.into();
        if self.resources.contains_key(&path) {
            return Err(RegistryError::DuplicateName(path));
        }

        self.resources
            .insert(path.clone(), ResourceDescriptor { path, handler });
        Ok(())
    }

    pub fn lookup_tool(&self, name: &str) -> Result<&ToolDescriptor, DispatchError> {
        self.tools
            .get(name)
            .ok_or_else(|| DispatchError::not_found(format!("unknown tool {name}")))
    }

    pub fn lookup_resource(&self, path: &str) -> Result<&ResourceDescriptor, DispatchError> {
        self.resources
            .get(path)
            .ok_or_else(|| DispatchError::not_found(format!("unknown resource {path}")))
    }

    pub fn tool_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tools.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn resource_paths(&self) -> Vec<&str> {
        let mut paths: Vec<&str> = self.resources.keys().map(String::as_str).collect();
        paths.sort_unstable();
        paths
    }
}
