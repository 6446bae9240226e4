use std::collections::HashSet;
use std::path::Path;

use anyhow::Result;
use tree_sitter::Node as TSNode;

use super::common::{extract_text, find_child_by_kind, TreeSitterParser};
use super::{Import, ImportKind, QualifiedRef, SourceFile};

/// Parses a single Go source file into the per-file facts the resolution
/// passes consume. Returns `Ok(None)` when the file is not valid Go: a
/// missing package clause or any syntax error disqualifies it, matching
/// the all-or-nothing behavior of a compiler front end. Errors are
/// reserved for parser construction failures, not malformed input.
pub fn parse_file(path: &Path, source: &str) -> Result<Option<SourceFile>> {
    let mut parser = TreeSitterParser::new(tree_sitter_go::language())?;
    let tree = parser.parse(source)?;
    let root = tree.root_node();
    let bytes = source.as_bytes();

    if root.has_error() {
        return Ok(None);
    }
    let Some(package_name) = declared_package(&root, bytes) else {
        return Ok(None);
    };

    let declared = top_level_declarations(&root, bytes);
    let free_idents = FreeIdentScanner::scan(&root, bytes, &declared);
    let qualified_refs = qualified_refs(&root, bytes);

    Ok(Some(SourceFile {
        path: path.to_path_buf(),
        package_name,
        declared,
        imports: imports(&root, bytes),
        free_idents,
        qualified_refs,
    }))
}

fn declared_package(root: &TSNode, source: &[u8]) -> Option<String> {
    let clause = find_child_by_kind(root, "package_clause")?;
    let ident = find_child_by_kind(&clause, "package_identifier")?;
    let name = extract_text(&ident, source);
    (!name.is_empty()).then(|| name.to_string())
}

fn imports(root: &TSNode, source: &[u8]) -> Vec<Import> {
    let mut out = Vec::new();
    let mut cursor = root.walk();
    for child in root.children(&mut cursor) {
        if child.kind() == "import_declaration" {
            collect_import_specs(&child, source, &mut out);
        }
    }
    out
}

fn collect_import_specs(node: &TSNode, source: &[u8], out: &mut Vec<Import>) {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "import_spec" => {
                if let Some(import) = import_spec(&child, source) {
                    out.push(import);
                }
            }
            "import_spec_list" => collect_import_specs(&child, source, out),
            _ => {}
        }
    }
}

fn import_spec(spec: &TSNode, source: &[u8]) -> Option<Import> {
    let path_node = spec.child_by_field_name("path")?;
    let path = extract_text(&path_node, source)
        .trim_matches(|c| c == '"' || c == '`')
        .to_string();
    let kind = match spec.child_by_field_name("name") {
        None => ImportKind::Default,
        Some(name) => match name.kind() {
            "dot" => ImportKind::Dot,
            "blank_identifier" => ImportKind::Blank,
            _ => ImportKind::Named(extract_text(&name, source).to_string()),
        },
    };
    Some(Import { path, kind })
}

/// Names this file binds at package scope. Method names live in their
/// receiver's scope, not the package scope, so method declarations
/// contribute nothing here.
fn top_level_declarations(root: &TSNode, source: &[u8]) -> Vec<String> {
    let mut out = Vec::new();
    let mut cursor = root.walk();
    for child in root.children(&mut cursor) {
        match child.kind() {
            "function_declaration" => {
                if let Some(name) = child.child_by_field_name("name") {
                    push_ident(&name, source, &mut out);
                }
            }
            "type_declaration" => {
                collect_spec_names(&child, source, &["type_spec", "type_alias"], &mut out)
            }
            "const_declaration" => collect_spec_names(&child, source, &["const_spec"], &mut out),
            "var_declaration" => collect_spec_names(&child, source, &["var_spec"], &mut out),
            _ => {}
        }
    }
    out
}

fn collect_spec_names(decl: &TSNode, source: &[u8], kinds: &[&str], out: &mut Vec<String>) {
    let mut cursor = decl.walk();
    for child in decl.children(&mut cursor) {
        if kinds.contains(&child.kind()) {
            let mut names = child.walk();
            for name in child.children_by_field_name("name", &mut names) {
                push_ident(&name, source, out);
            }
        } else if child.kind().ends_with("_spec_list") {
            collect_spec_names(&child, source, kinds, out);
        }
    }
}

fn push_ident(node: &TSNode, source: &[u8], out: &mut Vec<String>) {
    let text = extract_text(node, source);
    if !text.is_empty() && text != "_" {
        out.push(text.to_string());
    }
}

/// Collects every `qualifier.name` reference whose qualifier is a simple
/// name: selector expressions in value positions and qualified types in
/// type positions. Nested selectors contribute only their innermost pair,
/// since a compound operand is not a package qualifier.
fn qualified_refs(root: &TSNode, source: &[u8]) -> Vec<QualifiedRef> {
    let mut out = Vec::new();
    collect_qualified(root, source, &mut out);
    out
}

fn collect_qualified(node: &TSNode, source: &[u8], out: &mut Vec<QualifiedRef>) {
    match node.kind() {
        "package_clause" | "import_declaration" => return,
        "selector_expression" => {
            if let (Some(operand), Some(field)) = (
                node.child_by_field_name("operand"),
                node.child_by_field_name("field"),
            ) {
                if operand.kind() == "identifier" {
                    out.push(QualifiedRef {
                        qualifier: extract_text(&operand, source).to_string(),
                        name: extract_text(&field, source).to_string(),
                    });
                }
            }
        }
        "qualified_type" => {
            if let (Some(package), Some(name)) = (
                node.child_by_field_name("package"),
                node.child_by_field_name("name"),
            ) {
                out.push(QualifiedRef {
                    qualifier: extract_text(&package, source).to_string(),
                    name: extract_text(&name, source).to_string(),
                });
            }
            return;
        }
        _ => {}
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_qualified(&child, source, out);
    }
}

/// Approximation of a per-file unresolved-identifier list: a scope-tracked
/// walk that records every identifier read outside any binding visible in
/// the file. The file's own top-level names seed the outermost scope,
/// since package scope is forward-referencing. Universe-scope names such
/// as `nil` or `len` are not special-cased; they simply miss in every
/// candidate package during resolution.
struct FreeIdentScanner<'s> {
    source: &'s [u8],
    scopes: Vec<HashSet<String>>,
    free: Vec<String>,
    recorded: HashSet<String>,
}

impl<'s> FreeIdentScanner<'s> {
    fn scan(root: &TSNode, source: &'s [u8], top_level: &[String]) -> Vec<String> {
        let mut scanner = FreeIdentScanner {
            source,
            scopes: vec![top_level.iter().cloned().collect()],
            free: Vec::new(),
            recorded: HashSet::new(),
        };
        let mut cursor = root.walk();
        for child in root.children(&mut cursor) {
            scanner.visit(&child);
        }
        scanner.free
    }

    fn visit(&mut self, node: &TSNode) {
        match node.kind() {
            "package_clause" | "import_declaration" | "comment" => {}
            "function_declaration" | "method_declaration" | "func_literal" => {
                self.visit_function(node)
            }
            "block" | "for_statement" | "if_statement" | "expression_switch_statement"
            | "select_statement" | "expression_case" | "type_case" | "default_case"
            | "communication_case" => self.scoped_children(node),
            "type_switch_statement" => self.visit_type_switch(node),
            "short_var_declaration" => self.visit_short_var(node),
            "var_declaration" | "const_declaration" => self.visit_var_decl(node),
            "type_declaration" => self.visit_type_decl(node),
            "range_clause" => self.visit_range(node),
            "parameter_declaration"
            | "variadic_parameter_declaration"
            | "type_parameter_declaration" => {
                // Parameter names were bound by the enclosing function; only
                // the type is a reference position.
                if let Some(ty) = node.child_by_field_name("type") {
                    self.visit(&ty);
                }
            }
            "selector_expression" => {
                // The field is resolved through the operand, not the file's
                // namespace. The operand reads as a plain identifier, which
                // keeps package qualifiers in the free list the same way a
                // per-file resolver leaves them unresolved.
                if let Some(operand) = node.child_by_field_name("operand") {
                    self.visit(&operand);
                }
            }
            "qualified_type" => {}
            "keyed_element" => self.visit_keyed_element(node),
            "identifier" | "type_identifier" => {
                self.reference(extract_text(node, self.source))
            }
            "field_identifier" | "package_identifier" | "label_name" => {}
            _ => self.visit_children(node),
        }
    }

    fn visit_children(&mut self, node: &TSNode) {
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            self.visit(&child);
        }
    }

    fn scoped_children(&mut self, node: &TSNode) {
        self.scopes.push(HashSet::new());
        self.visit_children(node);
        self.scopes.pop();
    }

    fn visit_function(&mut self, node: &TSNode) {
        self.scopes.push(HashSet::new());
        // Receivers, type parameters, parameters and named results all bind
        // into the function scope before the body is read.
        for field in ["receiver", "type_parameters", "parameters", "result"] {
            if let Some(list) = node.child_by_field_name(field) {
                self.bind_parameter_names(&list);
            }
        }
        self.visit_children(node);
        self.scopes.pop();
    }

    fn bind_parameter_names(&mut self, params: &TSNode) {
        let mut cursor = params.walk();
        for decl in params.children(&mut cursor) {
            if !matches!(
                decl.kind(),
                "parameter_declaration"
                    | "variadic_parameter_declaration"
                    | "type_parameter_declaration"
            ) {
                continue;
            }
            let mut names = decl.walk();
            let bound: Vec<String> = decl
                .children_by_field_name("name", &mut names)
                .map(|name| extract_text(&name, self.source).to_string())
                .collect();
            for name in &bound {
                self.bind(name);
            }
        }
    }

    fn visit_type_switch(&mut self, node: &TSNode) {
        self.scopes.push(HashSet::new());
        // `switch v := x.(type)` binds v for every case body.
        if let Some(alias) = node.child_by_field_name("alias") {
            self.bind_expression_list(&alias);
        }
        self.visit_children(node);
        self.scopes.pop();
    }

    fn visit_short_var(&mut self, node: &TSNode) {
        // The right side reads before the left side binds.
        if let Some(right) = node.child_by_field_name("right") {
            self.visit(&right);
        }
        if let Some(left) = node.child_by_field_name("left") {
            self.bind_expression_list(&left);
        }
    }

    fn visit_var_decl(&mut self, node: &TSNode) {
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            match child.kind() {
                "var_spec" | "const_spec" => self.visit_spec(&child),
                "var_spec_list" | "const_spec_list" => {
                    let mut inner = child.walk();
                    for spec in child.children(&mut inner) {
                        if matches!(spec.kind(), "var_spec" | "const_spec") {
                            self.visit_spec(&spec);
                        }
                    }
                }
                _ => {}
            }
        }
    }

    fn visit_spec(&mut self, spec: &TSNode) {
        if let Some(ty) = spec.child_by_field_name("type") {
            self.visit(&ty);
        }
        if let Some(value) = spec.child_by_field_name("value") {
            self.visit(&value);
        }
        let mut cursor = spec.walk();
        let names: Vec<String> = spec
            .children_by_field_name("name", &mut cursor)
            .map(|name| extract_text(&name, self.source).to_string())
            .collect();
        for name in &names {
            self.bind(name);
        }
    }

    fn visit_type_decl(&mut self, node: &TSNode) {
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if matches!(child.kind(), "type_spec" | "type_alias") {
                if let Some(name) = child.child_by_field_name("name") {
                    let text = extract_text(&name, self.source).to_string();
                    self.bind(&text);
                }
                if let Some(ty) = child.child_by_field_name("type") {
                    self.visit(&ty);
                }
            }
        }
    }

    fn visit_range(&mut self, node: &TSNode) {
        if let Some(right) = node.child_by_field_name("right") {
            self.visit(&right);
        }
        let declares = {
            let mut cursor = node.walk();
            let result = node.children(&mut cursor).any(|child| child.kind() == ":=");
            result
        };
        if let Some(left) = node.child_by_field_name("left") {
            if declares {
                self.bind_expression_list(&left);
            } else {
                self.visit(&left);
            }
        }
    }

    fn visit_keyed_element(&mut self, node: &TSNode) {
        // A bare identifier before the colon is a struct-literal field
        // name, not a reference; map keys and all values are.
        let mut past_colon = false;
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if child.kind() == ":" {
                past_colon = true;
                continue;
            }
            if !past_colon && is_bare_identifier(&child) {
                continue;
            }
            self.visit(&child);
        }
    }

    fn bind_expression_list(&mut self, list: &TSNode) {
        let mut cursor = list.walk();
        for child in list.children(&mut cursor) {
            if child.kind() == "identifier" {
                let name = extract_text(&child, self.source).to_string();
                self.bind(&name);
            }
        }
    }

    fn reference(&mut self, name: &str) {
        if name == "_" || self.bound(name) || self.recorded.contains(name) {
            return;
        }
        self.recorded.insert(name.to_string());
        self.free.push(name.to_string());
    }

    fn bound(&self, name: &str) -> bool {
        self.scopes.iter().any(|scope| scope.contains(name))
    }

    fn bind(&mut self, name: &str) {
        if name != "_" {
            if let Some(scope) = self.scopes.last_mut() {
                scope.insert(name.to_string());
            }
        }
    }
}

fn is_bare_identifier(node: &TSNode) -> bool {
    match node.kind() {
        "identifier" | "field_identifier" => true,
        // Some grammar versions wrap literal elements; look through one
        // level before giving up.
        "element" | "literal_element" => {
            node.named_child_count() == 1
                && node
                    .named_child(0)
                    .map_or(false, |inner| {
                        matches!(inner.kind(), "identifier" | "field_identifier")
                    })
        }
        _ => false,
    }
}
