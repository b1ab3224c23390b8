//! A handler that dumps every event as indented text.
//!
//! The dumper tracks the namespace stack so it can print fully
//! qualified names like `::app::config::Mode`.

use std::io::Write;

use cctt_lex::{Tag, TokenId, TokenTree};
use cctt_util::{Idx, Result};

use crate::handler::Handler;

/// Writes one line per event to `out`.
pub struct Dumper<'t, 'src, W> {
    tree: &'t TokenTree<'src>,
    out: W,
    scopes: Vec<String>,
}

impl<'t, 'src, W: Write> Dumper<'t, 'src, W> {
    /// Create a dumper over the tree the walker will run on.
    pub fn new(tree: &'t TokenTree<'src>, out: W) -> Self {
        Self {
            tree,
            out,
            scopes: Vec::new(),
        }
    }

    /// The finished output sink.
    pub fn into_inner(self) -> W {
        self.out
    }

    /// The current scope as `::a::b`, or `::` at top level.
    fn current_scope(&self) -> String {
        if self.scopes.is_empty() {
            return "::".to_string();
        }
        let mut full = String::new();
        for scope in &self.scopes {
            full.push_str("::");
            full.push_str(scope);
        }
        full
    }

    /// `name` qualified by the current scope.
    fn qualified(&self, name: TokenId) -> String {
        let mut full = String::new();
        for scope in &self.scopes {
            full.push_str("::");
            full.push_str(scope);
        }
        full.push_str("::");
        full.push_str(self.tree.text(name));
        full
    }

    /// Join the identifier segments of a heading range with `::`.
    fn segment_of(&self, first_name: TokenId, past_names: TokenId) -> String {
        let mut segment = String::new();
        for index in first_name.index()..past_names.index() {
            if self.tree.tokens()[index].tags.contains(Tag::Identifier) {
                if !segment.is_empty() {
                    segment.push_str("::");
                }
                segment.push_str(self.tree.text_at(index));
            }
        }
        segment
    }
}

impl<W: Write> Handler for Dumper<'_, '_, W> {
    fn empty(&mut self) -> Result<()> {
        writeln!(self.out, "Nothing interesting.")?;
        Ok(())
    }

    fn start(&mut self) -> Result<()> {
        writeln!(self.out, "Start processing.")?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        writeln!(self.out, "All processed.")?;
        Ok(())
    }

    fn abort(&mut self) -> Result<()> {
        writeln!(self.out, "Aborted.")?;
        Ok(())
    }

    fn add_attributes(&mut self, attributes: TokenId) -> Result<()> {
        let text = match self.tree.get(attributes).pair {
            Some(close) => self.tree.span_text(attributes, close),
            None => self.tree.text(attributes),
        };
        writeln!(self.out, "  attributes: {text}")?;
        Ok(())
    }

    fn clear_attributes(&mut self) -> Result<()> {
        writeln!(self.out, "  attributes: clear")?;
        Ok(())
    }

    fn enter_namespace(&mut self, first_name: TokenId, past_names: TokenId) -> Result<()> {
        self.scopes.push(self.segment_of(first_name, past_names));
        writeln!(self.out, "  namespace {} {{", self.current_scope())?;
        Ok(())
    }

    fn leave_namespace(&mut self) -> Result<()> {
        let left = self.current_scope();
        self.scopes.pop();
        writeln!(self.out, "  }} // namespace {left} -> {}", self.current_scope())?;
        Ok(())
    }

    fn enter_enum(&mut self, name: TokenId) -> Result<()> {
        writeln!(self.out, "  enum {} {{", self.qualified(name))?;
        Ok(())
    }

    fn leave_enum(&mut self) -> Result<()> {
        writeln!(self.out, "  }} // enum")?;
        Ok(())
    }

    fn enumerator(&mut self, name: TokenId) -> Result<()> {
        writeln!(self.out, "      enumerator {}", self.tree.text(name))?;
        Ok(())
    }

    fn integral_constant(&mut self, name: TokenId) -> Result<()> {
        writeln!(self.out, "  int constant {}", self.qualified(name))?;
        Ok(())
    }

    fn structure(&mut self, name: TokenId) -> Result<()> {
        writeln!(self.out, "  struct {}", self.qualified(name))?;
        Ok(())
    }

    fn parent(&mut self, first: TokenId, last: TokenId) -> Result<()> {
        let text = if last.index() > first.index() {
            self.tree
                .span_text(first, TokenId::from_usize(last.index() - 1))
        } else {
            ""
        };
        writeln!(self.out, "      parent {text}")?;
        Ok(())
    }

    fn variable_or_function(&mut self, name: TokenId) -> Result<()> {
        writeln!(self.out, "  var or fn {}", self.qualified(name))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::walker::introspect;

    fn dumped(source: &str) -> String {
        let tree = TokenTree::new(source).expect("tree should build");
        let mut dumper = Dumper::new(&tree, Vec::new());
        // Errors still leave the dump (ending in "Aborted.") in the sink.
        let _ = introspect(&tree, &mut dumper);
        String::from_utf8(dumper.into_inner()).expect("output is utf-8")
    }

    #[test]
    fn test_empty_dump() {
        assert_eq!(dumped("int x;"), "Nothing interesting.\n");
    }

    #[test]
    fn test_enum_dump() {
        let source = "namespace a { CCTT_INTROSPECT() enum E { X, Y }; }";
        assert_eq!(
            dumped(source),
            "Start processing.\n\
             \x20 namespace ::a {\n\
             \x20 attributes: ()\n\
             \x20 enum ::a::E {\n\
             \x20     enumerator X\n\
             \x20     enumerator Y\n\
             \x20 } // enum\n\
             \x20 attributes: clear\n\
             \x20 } // namespace ::a -> ::\n\
             All processed.\n"
        );
    }

    #[test]
    fn test_struct_dump() {
        let source = "namespace n { CCTT_INTROSPECT() struct S : public A { int x; }; }";
        let output = dumped(source);
        assert!(output.contains("  struct ::n::S\n"), "got: {output}");
        assert!(output.contains("      parent A\n"), "got: {output}");
        assert!(output.contains("  namespace ::n::S {\n"), "got: {output}");
        assert!(output.contains("  var or fn ::n::S::x\n"), "got: {output}");
    }

    #[test]
    fn test_nested_namespace_dump() {
        let source = "namespace a::b { CCTT_INTROSPECT() int x; }";
        let output = dumped(source);
        assert!(output.contains("  namespace ::a::b {\n"), "got: {output}");
        assert!(output.contains("  var or fn ::a::b::x\n"), "got: {output}");
        assert!(
            output.contains("  } // namespace ::a::b -> ::\n"),
            "got: {output}"
        );
    }

    #[test]
    fn test_integral_constant_dump() {
        let source = "namespace n { CCTT_INTROSPECT() enum : int { K }; }";
        let output = dumped(source);
        assert!(output.contains("  int constant ::n::K\n"), "got: {output}");
    }

    #[test]
    fn test_aborted_dump_ends_with_aborted() {
        let source = "namespace { CCTT_INTROSPECT() int x; }";
        let output = dumped(source);
        assert!(output.starts_with("Start processing.\n"), "got: {output}");
        assert!(output.ends_with("Aborted.\n"), "got: {output}");
        assert!(!output.contains("All processed."), "got: {output}");
    }

    #[test]
    fn test_attribute_arguments_are_dumped_verbatim() {
        let source = "namespace n { CCTT_INTROSPECT(tag, id = 3) int x; }";
        let output = dumped(source);
        assert!(output.contains("  attributes: (tag, id = 3)\n"), "got: {output}");
    }
}
