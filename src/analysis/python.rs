//! Python docstring coverage analysis using tree-sitter.

use std::path::Path;

use tree_sitter::{Language, Parser};

use crate::analysis::{AnalysisError, DeclarationKind, Span, UndocumentedRecord};

/// Holds a parsed tree-sitter tree and associated metadata.
///
/// Owned by the analysis call that created it; discarded once the
/// declaration records have been extracted.
pub struct ParsedFile {
    /// The tree-sitter parse tree.
    pub tree: tree_sitter::Tree,
    /// The original source code (kept for node text extraction).
    pub source: Vec<u8>,
    /// The file path (for error reporting).
    pub path: String,
}

impl ParsedFile {
    /// Get the source code as a string slice.
    pub fn source_str(&self) -> &str {
        std::str::from_utf8(&self.source).unwrap_or("")
    }

    /// Get text for a tree-sitter node.
    pub fn node_text(&self, node: tree_sitter::Node) -> &str {
        node.utf8_text(&self.source).unwrap_or("")
    }
}

/// A class or function definition site found in the tree.
#[derive(Debug, Clone)]
pub struct DeclarationNode<'tree> {
    /// The declaration name.
    pub name: String,
    /// The kind of declaration.
    pub kind: DeclarationKind,
    node: tree_sitter::Node<'tree>,
    source: &'tree [u8],
}

impl<'tree> DeclarationNode<'tree> {
    /// Source span of the whole definition.
    pub fn span(&self) -> Span {
        Span::from_node(self.node)
    }

    fn node_text(&self, node: tree_sitter::Node) -> &str {
        node.utf8_text(self.source).unwrap_or("")
    }

    /// Check whether the declaration body opens with a docstring.
    ///
    /// True iff the body is non-empty and its first statement is a bare
    /// string-literal expression statement. The check is purely structural:
    /// an empty string still counts as documentation. Comment nodes are
    /// not statements and are skipped.
    pub fn has_leading_docstring(&self) -> bool {
        let body = match self.node.child_by_field_name("body") {
            Some(b) => b,
            None => return false,
        };

        let mut cursor = body.walk();
        let first = body
            .named_children(&mut cursor)
            .find(|n| n.kind() != "comment");

        let stmt = match first {
            Some(s) if s.kind() == "expression_statement" => s,
            _ => return false,
        };

        // A bare string only: `x = "s"` or `"a", 1` do not qualify.
        if stmt.named_child_count() != 1 {
            return false;
        }

        // Adjacent literals ("a" "b") fold into a single string constant.
        matches!(
            stmt.named_child(0).map(|n| n.kind()),
            Some("string") | Some("concatenated_string")
        )
    }

    /// Ordered positional/named parameter names of a function-like node.
    ///
    /// Classes and nodes without a parameter list yield an empty vector,
    /// never an error. Keyword-only parameters (everything after `*` or
    /// `*args`), `**kwargs`, default values, and annotations are not
    /// reported; a positional-only `/` marker is skipped without ending
    /// collection.
    pub fn parameter_names(&self) -> Vec<String> {
        let mut names = Vec::new();

        let params = match self.node.child_by_field_name("parameters") {
            Some(p) => p,
            None => return names,
        };

        let mut cursor = params.walk();
        for child in params.named_children(&mut cursor) {
            match child.kind() {
                "identifier" => names.push(self.node_text(child).to_string()),
                "typed_parameter" => match child.named_child(0) {
                    Some(inner) if inner.kind() == "identifier" => {
                        names.push(self.node_text(inner).to_string());
                    }
                    // typed *args / **kwargs
                    Some(_) => break,
                    None => {}
                },
                "default_parameter" | "typed_default_parameter" => {
                    if let Some(name) = child.child_by_field_name("name") {
                        if name.kind() == "identifier" {
                            names.push(self.node_text(name).to_string());
                        }
                    }
                }
                "list_splat_pattern" | "keyword_separator" | "dictionary_splat_pattern" => break,
                // positional_separator ("/") and anything unrecognized
                _ => {}
            }
        }

        names
    }
}

/// Lazy pre-order traversal over every declaration in a parsed file.
///
/// Nested declarations (methods, inner classes, closures) surface at the
/// same flattened level, in depth-first document order. The traversal is
/// finite and restartable: a fresh iterator yields the same sequence.
pub struct Declarations<'tree> {
    stack: Vec<tree_sitter::Node<'tree>>,
    source: &'tree [u8],
}

impl<'tree> Iterator for Declarations<'tree> {
    type Item = DeclarationNode<'tree>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(node) = self.stack.pop() {
            // Push children in reverse so the leftmost subtree pops first.
            for i in (0..node.named_child_count()).rev() {
                if let Some(child) = node.named_child(i) {
                    self.stack.push(child);
                }
            }
            if let Some(decl) = classify(node, self.source) {
                return Some(decl);
            }
        }
        None
    }
}

fn classify<'tree>(
    node: tree_sitter::Node<'tree>,
    source: &'tree [u8],
) -> Option<DeclarationNode<'tree>> {
    let kind = match node.kind() {
        "class_definition" => DeclarationKind::Class,
        "function_definition" => {
            if node.child(0).map_or(false, |c| c.kind() == "async") {
                DeclarationKind::AsyncFunction
            } else {
                DeclarationKind::Function
            }
        }
        _ => return None,
    };

    let name_node = node.child_by_field_name("name")?;
    let name = name_node.utf8_text(source).ok()?.to_string();

    Some(DeclarationNode {
        name,
        kind,
        node,
        source,
    })
}

/// Python analyzer: parses source files and reports undocumented
/// declarations.
pub struct PythonAnalyzer {
    language: Language,
}

impl PythonAnalyzer {
    pub fn new() -> Self {
        Self {
            language: tree_sitter_python::LANGUAGE.into(),
        }
    }

    /// Returns the language identifier.
    pub fn language_id(&self) -> &'static str {
        "python"
    }

    /// Returns file extensions this analyzer handles (without dot).
    pub fn file_extensions(&self) -> &'static [&'static str] {
        &["py"]
    }

    fn create_parser(&self) -> Result<Parser, AnalysisError> {
        let mut parser = Parser::new();
        parser.set_language(&self.language)?;
        Ok(parser)
    }

    /// Parse a source file into a tree.
    ///
    /// Malformed syntax surfaces as `AnalysisError::Syntax`; the caller
    /// treats this as a per-file skip, never as fatal to a batch.
    pub fn parse(&self, path: &Path, source: &[u8]) -> Result<ParsedFile, AnalysisError> {
        let mut parser = self.create_parser()?;
        let tree = parser
            .parse(source, None)
            .ok_or_else(|| AnalysisError::Syntax {
                path: path.display().to_string(),
            })?;

        if tree.root_node().has_error() {
            return Err(AnalysisError::Syntax {
                path: path.display().to_string(),
            });
        }

        Ok(ParsedFile {
            tree,
            source: source.to_vec(),
            path: path.to_string_lossy().to_string(),
        })
    }

    /// Walk every class/function declaration in pre-order.
    pub fn declarations<'tree>(&self, parsed: &'tree ParsedFile) -> Declarations<'tree> {
        Declarations {
            stack: vec![parsed.tree.root_node()],
            source: &parsed.source,
        }
    }

    /// Produce the ordered undocumented-declaration records for one file.
    ///
    /// Stateless per invocation: the same parsed input yields the same
    /// output sequence.
    pub fn analyze(&self, parsed: &ParsedFile) -> Vec<UndocumentedRecord> {
        let mut records = Vec::new();

        for decl in self.declarations(parsed) {
            if decl.has_leading_docstring() {
                continue;
            }
            let parameters = match decl.kind {
                DeclarationKind::Class => Vec::new(),
                DeclarationKind::Function | DeclarationKind::AsyncFunction => {
                    decl.parameter_names()
                }
            };
            records.push(UndocumentedRecord {
                name: decl.name,
                parameters,
            });
        }

        records
    }

    /// Parse and analyze in one step.
    pub fn analyze_source(
        &self,
        path: &Path,
        source: &[u8],
    ) -> Result<Vec<UndocumentedRecord>, AnalysisError> {
        let parsed = self.parse(path, source)?;
        Ok(self.analyze(&parsed))
    }
}

impl Default for PythonAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_python(source: &str) -> (PythonAnalyzer, ParsedFile) {
        let analyzer = PythonAnalyzer::new();
        let parsed = analyzer
            .parse(Path::new("test.py"), source.as_bytes())
            .unwrap();
        (analyzer, parsed)
    }

    fn analyze(source: &str) -> Vec<UndocumentedRecord> {
        let (analyzer, parsed) = parse_python(source);
        analyzer.analyze(&parsed)
    }

    #[test]
    fn test_undocumented_class() {
        let records = analyze("class Foo:\n    pass\n");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Foo");
        assert!(records[0].parameters.is_empty());
    }

    #[test]
    fn test_undocumented_function_with_parameters() {
        let records = analyze("def bar(x, y):\n    pass\n");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "bar");
        assert_eq!(records[0].parameters, vec!["x", "y"]);
    }

    #[test]
    fn test_documented_function_not_reported() {
        let records = analyze("def baz():\n    \"\"\"doc\"\"\"\n    pass\n");
        assert!(records.is_empty());
    }

    #[test]
    fn test_default_values_ignored_names_kept() {
        let records = analyze("def qux(a, b=[]):\n    pass\n");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "qux");
        assert_eq!(records[0].parameters, vec!["a", "b"]);
    }

    #[test]
    fn test_annotations_ignored_names_kept() {
        let records = analyze("def t(a: int, b: str = \"x\"):\n    pass\n");
        assert_eq!(records[0].parameters, vec!["a", "b"]);
    }

    #[test]
    fn test_keyword_only_and_splats_not_reported() {
        let records = analyze("def f(a, b, *args, c, **kwargs):\n    pass\n");
        assert_eq!(records[0].parameters, vec!["a", "b"]);

        let records = analyze("def g(a, *, b):\n    pass\n");
        assert_eq!(records[0].parameters, vec!["a"]);
    }

    #[test]
    fn test_positional_only_marker_skipped() {
        let records = analyze("def h(a, /, b):\n    pass\n");
        assert_eq!(records[0].parameters, vec!["a", "b"]);
    }

    #[test]
    fn test_empty_docstring_counts_as_documented() {
        let records = analyze("def f():\n    \"\"\n    pass\n");
        assert!(records.is_empty());
    }

    #[test]
    fn test_string_in_assignment_is_not_a_docstring() {
        let records = analyze("def f():\n    x = \"not a docstring\"\n");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "f");
    }

    #[test]
    fn test_non_string_literal_is_not_a_docstring() {
        let records = analyze("def f():\n    42\n");
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_comment_before_docstring_still_counts() {
        let records = analyze("def f():\n    # leading comment\n    \"\"\"doc\"\"\"\n");
        assert!(records.is_empty());
    }

    #[test]
    fn test_class_docstring() {
        let records = analyze("class Documented:\n    \"\"\"doc\"\"\"\n    def method(self):\n        pass\n");
        // The class is documented, its method is not.
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "method");
        assert_eq!(records[0].parameters, vec!["self"]);
    }

    #[test]
    fn test_async_function_classified_and_reported() {
        let source = "async def fetch(url):\n    pass\n";
        let (analyzer, parsed) = parse_python(source);

        let decls: Vec<_> = analyzer.declarations(&parsed).collect();
        assert_eq!(decls.len(), 1);
        assert_eq!(decls[0].kind, DeclarationKind::AsyncFunction);

        let records = analyzer.analyze(&parsed);
        assert_eq!(records[0].name, "fetch");
        assert_eq!(records[0].parameters, vec!["url"]);
    }

    #[test]
    fn test_decorated_definitions_found_once() {
        let source = "@decorator\ndef wrapped(x):\n    pass\n";
        let records = analyze(source);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "wrapped");
    }

    #[test]
    fn test_nested_declarations_flattened_in_preorder() {
        let source = r#"
class Outer:
    def first(self):
        pass
    class Inner:
        def second(self):
            pass

def holder():
    def inner():
        pass
"#;
        let names: Vec<String> = analyze(source).into_iter().map(|r| r.name).collect();
        assert_eq!(
            names,
            vec!["Outer", "first", "Inner", "second", "holder", "inner"]
        );
    }

    #[test]
    fn test_traversal_is_restartable() {
        let (analyzer, parsed) = parse_python("class A:\n    pass\ndef b():\n    pass\n");

        let first: Vec<String> = analyzer.declarations(&parsed).map(|d| d.name).collect();
        let second: Vec<String> = analyzer.declarations(&parsed).map(|d| d.name).collect();
        assert_eq!(first, second);
        assert_eq!(first, vec!["A", "b"]);
    }

    #[test]
    fn test_analysis_is_deterministic() {
        let source = "class A:\n    pass\n\ndef b(x):\n    pass\n";
        let analyzer = PythonAnalyzer::new();

        let once = analyzer
            .analyze_source(Path::new("test.py"), source.as_bytes())
            .unwrap();
        let twice = analyzer
            .analyze_source(Path::new("test.py"), source.as_bytes())
            .unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_syntax_error_is_contained() {
        let analyzer = PythonAnalyzer::new();
        let result = analyzer.analyze_source(Path::new("broken.py"), b"def f(:\n");
        assert!(matches!(result, Err(AnalysisError::Syntax { .. })));
    }

    #[test]
    fn test_declaration_spans() {
        let (analyzer, parsed) = parse_python("def f():\n    pass\n");
        let decls: Vec<_> = analyzer.declarations(&parsed).collect();
        assert_eq!(decls[0].span().start_line, 1);
    }
}
