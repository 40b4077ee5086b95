//! Config directives and the patches rules use to stage them

use crate::models::{Executor, LocalResourceRequirement};
use std::fmt;

/// One configuration instruction for a process scope
#[derive(Debug, Clone, PartialEq)]
pub enum Directive {
    Executor(Executor),
    Cpus(u32),
    MemoryGb(u64),
    Label(String),
    ClusterOptions(String),
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Directive::Executor(executor) => write!(f, "executor = '{}'", executor),
            Directive::Cpus(cpus) => write!(f, "cpus = {}", cpus),
            Directive::MemoryGb(gb) => write!(f, "memory = '{} GB'", gb),
            Directive::Label(label) => write!(f, "label = '{}'", label),
            Directive::ClusterOptions(options) => write!(f, "clusterOptions = '{}'", options),
        }
    }
}

/// Change to the staged directive list
#[derive(Debug, Clone, PartialEq)]
pub enum DirectiveOp {
    /// Append a directive
    Push(Directive),
    /// Drop executor directives of any other kind; put this one first unless present
    EnsureExecutor(Executor),
}

/// Facts a rule establishes for later rules and for head sizing
#[derive(Debug, Clone, PartialEq)]
pub enum Finding {
    LocalEligible,
    RecommendedCpus(u32),
    RecommendedMemoryGb(u64),
    LocalRequirement(LocalResourceRequirement),
}

/// Output of one rule evaluation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Patch {
    pub advisories: Vec<String>,
    pub ops: Vec<DirectiveOp>,
    pub findings: Vec<Finding>,
}

impl Patch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advise(mut self, advisory: impl Into<String>) -> Self {
        self.advisories.push(advisory.into());
        self
    }

    pub fn push(mut self, directive: Directive) -> Self {
        self.ops.push(DirectiveOp::Push(directive));
        self
    }

    pub fn op(mut self, op: DirectiveOp) -> Self {
        self.ops.push(op);
        self
    }

    pub fn finding(mut self, finding: Finding) -> Self {
        self.findings.push(finding);
        self
    }
}

/// Ordered directives staged for a single process
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DirectiveSet {
    items: Vec<Directive>,
}

impl DirectiveSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, op: DirectiveOp) {
        match op {
            DirectiveOp::Push(directive) => self.items.push(directive),
            DirectiveOp::EnsureExecutor(kind) => {
                self.items
                    .retain(|d| !matches!(d, Directive::Executor(e) if *e != kind));
                if !self.contains(&Directive::Executor(kind)) {
                    self.items.insert(0, Directive::Executor(kind));
                }
            }
        }
    }

    pub fn contains(&self, directive: &Directive) -> bool {
        self.items.contains(directive)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Render each directive as a config line
    pub fn lines(&self) -> Vec<String> {
        self.items.iter().map(ToString::to_string).collect()
    }
}
