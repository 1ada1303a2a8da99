//! Compile entry point with diagnostic caching.
//!
//! The UI triggers compiles on demand (signature edits, manual requests)
//! and keeps displaying the previous compile's diagnostics while the user
//! edits. [`Compiler`] owns that cache: each compile replaces it wholesale,
//! successful or not.

use gridlang_core::Module;

use crate::diagnostics::Diagnostic;
use crate::emit::{emit_module, EmitOutput};

/// Stateful compile driver caching the most recent output.
#[derive(Debug, Clone, Default)]
pub struct Compiler {
    last: Option<EmitOutput>,
}

impl Compiler {
    /// Creates a compiler with no cached output.
    pub fn new() -> Self {
        Compiler { last: None }
    }

    /// Compiles the module and replaces the cached output.
    pub fn compile(&mut self, module: &Module) -> &EmitOutput {
        self.last.insert(emit_module(module))
    }

    /// The most recent compile's output, if any compile has run.
    pub fn last(&self) -> Option<&EmitOutput> {
        self.last.as_ref()
    }

    /// The most recent compile's diagnostics; empty before the first
    /// compile.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        self.last
            .as_ref()
            .map(|output| output.diagnostics.as_slice())
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridlang_core::node::ROOT_RETURN_SLOT;
    use gridlang_core::{GridPos, Node};

    #[test]
    fn diagnostics_persist_until_the_next_compile() {
        let mut module = Module::new("scratch");
        module.get_or_create("f", 0);
        let f = module.get_mut("f").unwrap();
        let root = f.place(Node::root(), GridPos::new(0, 0)).unwrap();

        let mut compiler = Compiler::new();
        assert!(compiler.diagnostics().is_empty());

        // No return expression yet: one diagnostic, cached.
        compiler.compile(&module);
        assert_eq!(compiler.diagnostics().len(), 1);
        assert!(!compiler.last().unwrap().success);

        // Fix the graph; the next compile replaces the cache.
        let f = module.get_mut("f").unwrap();
        let value = f.place(Node::integer(1), GridPos::new(1, 0)).unwrap();
        f.connect(value, root, ROOT_RETURN_SLOT).unwrap();

        let output = compiler.compile(&module);
        assert!(output.success);
        assert!(compiler.diagnostics().is_empty());
    }
}
