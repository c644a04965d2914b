//! Symbol table and scope management

use crate::types::Type;
use std::collections::HashMap;

/// A function symbol: signature only, functions are not values
#[derive(Debug, Clone)]
pub struct FunctionSymbol {
    pub name: String,
    pub return_type: Type,
    pub param_types: Vec<Type>,
}

impl FunctionSymbol {
    pub fn new(name: impl Into<String>, return_type: Type, param_types: Vec<Type>) -> Self {
        Self {
            name: name.into(),
            return_type,
            param_types,
        }
    }

    /// Signature rendered as `name(type, type)`
    pub fn signature(&self) -> String {
        let params: Vec<String> = self.param_types.iter().map(|t| t.to_string()).collect();
        format!("{}({})", self.name, params.join(", "))
    }
}

/// A variable symbol bound to the local slot it was declared with.
///
/// The slot index travels with the symbol so resolution can attach it to
/// every reference; shadowed names keep their own slots.
#[derive(Debug, Clone)]
pub struct VariableSymbol {
    pub name: String,
    pub ty: Type,
    pub index: u32,
}

impl VariableSymbol {
    pub fn new(name: impl Into<String>, ty: Type, index: u32) -> Self {
        Self {
            name: name.into(),
            ty,
            index,
        }
    }
}

/// A lexical scope: two independent namespaces plus an optional parent.
///
/// Functions and variables never collide; lookup walks the parent chain.
#[derive(Debug, Default)]
pub struct Scope {
    functions: HashMap<String, FunctionSymbol>,
    variables: HashMap<String, VariableSymbol>,
    parent: Option<Box<Scope>>,
}

impl Scope {
    pub fn new() -> Self {
        Self {
            functions: HashMap::new(),
            variables: HashMap::new(),
            parent: None,
        }
    }

    pub fn define_function(&mut self, symbol: FunctionSymbol) -> Result<(), String> {
        if self.functions.contains_key(&symbol.name) {
            return Err(format!("function '{}' already defined", symbol.name));
        }
        self.functions.insert(symbol.name.clone(), symbol);
        Ok(())
    }

    pub fn define_variable(&mut self, symbol: VariableSymbol) -> Result<(), String> {
        if self.variables.contains_key(&symbol.name) {
            return Err(format!(
                "variable '{}' already defined in this scope",
                symbol.name
            ));
        }
        self.variables.insert(symbol.name.clone(), symbol);
        Ok(())
    }

    pub fn lookup_function(&self, name: &str) -> Option<&FunctionSymbol> {
        if let Some(sym) = self.functions.get(name) {
            Some(sym)
        } else if let Some(parent) = &self.parent {
            parent.lookup_function(name)
        } else {
            None
        }
    }

    pub fn lookup_variable(&self, name: &str) -> Option<&VariableSymbol> {
        if let Some(sym) = self.variables.get(name) {
            Some(sym)
        } else if let Some(parent) = &self.parent {
            parent.lookup_variable(name)
        } else {
            None
        }
    }

    /// Push a new child scope
    pub fn push_child(&mut self) {
        let old_scope = std::mem::replace(self, Scope::new());
        self.parent = Some(Box::new(old_scope));
    }

    /// Take the parent scope, replacing self with the parent
    pub fn pop_to_parent(&mut self) -> bool {
        if let Some(parent) = self.parent.take() {
            *self = *parent;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shadowing_across_scopes() {
        let mut scope = Scope::new();
        scope
            .define_variable(VariableSymbol::new("x", Type::Int, 0))
            .unwrap();

        scope.push_child();
        scope
            .define_variable(VariableSymbol::new("x", Type::Bool, 1))
            .unwrap();
        assert_eq!(scope.lookup_variable("x").unwrap().ty, Type::Bool);
        assert_eq!(scope.lookup_variable("x").unwrap().index, 1);

        assert!(scope.pop_to_parent());
        assert_eq!(scope.lookup_variable("x").unwrap().ty, Type::Int);
        assert_eq!(scope.lookup_variable("x").unwrap().index, 0);
    }

    #[test]
    fn test_duplicate_in_same_scope() {
        let mut scope = Scope::new();
        scope
            .define_variable(VariableSymbol::new("x", Type::Int, 0))
            .unwrap();
        assert!(
            scope
                .define_variable(VariableSymbol::new("x", Type::Bool, 1))
                .is_err()
        );
        // The original binding survives
        assert_eq!(scope.lookup_variable("x").unwrap().ty, Type::Int);
    }

    #[test]
    fn test_separate_namespaces() {
        let mut scope = Scope::new();
        scope
            .define_function(FunctionSymbol::new("f", Type::Int, vec![Type::Int]))
            .unwrap();
        scope
            .define_variable(VariableSymbol::new("f", Type::Bool, 0))
            .unwrap();

        assert_eq!(scope.lookup_function("f").unwrap().return_type, Type::Int);
        assert_eq!(scope.lookup_variable("f").unwrap().ty, Type::Bool);
    }

    #[test]
    fn test_function_lookup_through_chain() {
        let mut scope = Scope::new();
        scope
            .define_function(FunctionSymbol::new("f", Type::Void, vec![]))
            .unwrap();
        scope.push_child();
        scope.push_child();
        assert!(scope.lookup_function("f").is_some());

        scope.pop_to_parent();
        assert!(scope.lookup_function("f").is_some());
    }

    #[test]
    fn test_signature_rendering() {
        let sym = FunctionSymbol::new("add", Type::Int, vec![Type::Int, Type::Int]);
        assert_eq!(sym.signature(), "add(int, int)");
        let sym = FunctionSymbol::new("main", Type::Int, vec![]);
        assert_eq!(sym.signature(), "main()");
    }
}
