//! Toolpath input model: commands grouped into a tree of nodes.

use indexmap::IndexMap;

/// Parameters of one command, keyed by their letter code.
///
/// Insertion order is kept: it decides the emission order of codes the
/// post-processor does not know.
pub type Parameters = IndexMap<char, f64>;

/// A single toolpath command, e.g. `G1 X10 Y20 F600`
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    pub opcode: String,
    pub parameters: Parameters,
}

impl Command {
    pub fn new(opcode: impl Into<String>) -> Self {
        Self {
            opcode: opcode.into(),
            parameters: Parameters::new(),
        }
    }

    /// Builder-style parameter setter. A repeated code replaces the earlier value.
    pub fn param(mut self, code: char, value: f64) -> Self {
        self.parameters.insert(code.to_ascii_uppercase(), value);
        self
    }

    pub fn get(&self, code: char) -> Option<f64> {
        self.parameters.get(&code).copied()
    }
}

/// A node of the toolpath tree
#[derive(Debug, Clone, PartialEq)]
pub enum ToolpathNode {
    /// Compound of other nodes, walked in order
    Group {
        label: String,
        children: Vec<ToolpathNode>,
    },
    /// Leaf carrying commands
    Path {
        label: String,
        commands: Vec<Command>,
    },
    /// Document object without path data (stock, fixtures...)
    Other { label: String },
}

impl ToolpathNode {
    pub fn path(label: impl Into<String>, commands: Vec<Command>) -> Self {
        ToolpathNode::Path {
            label: label.into(),
            commands,
        }
    }

    pub fn group(label: impl Into<String>, children: Vec<ToolpathNode>) -> Self {
        ToolpathNode::Group {
            label: label.into(),
            children,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            ToolpathNode::Group { label, .. }
            | ToolpathNode::Path { label, .. }
            | ToolpathNode::Other { label } => label,
        }
    }
}

/// Job record the host resolves for an operation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Job {
    pub machine: Option<String>,
    /// Unit system the host machine declares. Only reported, never applied.
    pub machine_units: Option<String>,
}

/// A top-level toolpath object handed to the post-processor
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    pub label: String,
    pub job: Option<Job>,
    pub root: ToolpathNode,
}

impl Operation {
    pub fn new(label: impl Into<String>, root: ToolpathNode) -> Self {
        Self {
            label: label.into(),
            job: None,
            root,
        }
    }

    pub fn with_job(mut self, job: Job) -> Self {
        self.job = Some(job);
        self
    }
}
