//! The introspection walker.
//!
//! Traverses a token tree left to right, recognizes the declaration
//! shapes under `CCTT_INTROSPECT(...)` marks by local pattern matching,
//! and drives a [`Handler`]. The walker is read-only over the tree.

use cctt_lex::{Tag, TokenId, TokenTree};
use cctt_util::{quote, Diagnostic, Error, Idx, Location, Result};

use crate::handler::Handler;

/// The source-level attribute marker. Arguments between the
/// parentheses that follow it are not interpreted here.
pub const INTROSPECT_MARKER: &str = "CCTT_INTROSPECT";

/// Walk `tree` and drive `handler`.
///
/// If the marker identifier does not appear anywhere, only
/// [`Handler::empty`] is called. Otherwise events are bracketed by
/// [`Handler::start`] and [`Handler::finish`]; if an error occurs in
/// between (a parse error or a failing handler operation),
/// [`Handler::abort`] is notified and the error is returned.
pub fn introspect<H: Handler + ?Sized>(tree: &TokenTree<'_>, handler: &mut H) -> Result<()> {
    if !has_introspect_marker(tree) {
        return handler.empty();
    }

    let mut walker = Walker { tree, handler };
    match walker.run() {
        Ok(()) => Ok(()),
        Err(error) => {
            // The abort notification must not mask the original error.
            let _ = walker.handler.abort();
            Err(error)
        }
    }
}

fn has_introspect_marker(tree: &TokenTree<'_>) -> bool {
    (0..tree.tokens().len()).any(|i| {
        tree.tokens()[i].tags.contains(Tag::Identifier) && tree.text_at(i) == INTROSPECT_MARKER
    })
}

#[derive(Clone, Copy)]
enum EnumKind {
    /// Members of a named enum report as `enumerator`.
    Named,
    /// Members of an anonymous enum report as `integral_constant`.
    Anonymous,
}

struct NamespaceHeading {
    first_name: usize,
    past_names: usize,
}

enum StructHeading {
    /// A definition with a body; the cursor is just past its `{`.
    Definition {
        name: Option<usize>,
        bases: Option<usize>,
        default_public: bool,
    },
    /// A forward declaration; ignored.
    Forward,
}

struct Walker<'a, 'src, H: ?Sized> {
    tree: &'a TokenTree<'src>,
    handler: &'a mut H,
}

impl<H: Handler + ?Sized> Walker<'_, '_, H> {
    fn run(&mut self) -> Result<()> {
        self.handler.start()?;
        self.validate_attribute_placement()?;

        let mut i = 0;
        let end = self.tree.end_index();
        while i < end {
            if self.is(i, "}", Tag::Symbol) {
                self.handler.leave_namespace()?;
                i += 1;
                continue;
            }

            if let Some(heading) = self.parse_namespace_heading(&mut i) {
                self.handler.enter_namespace(
                    TokenId::from_usize(heading.first_name),
                    TokenId::from_usize(heading.past_names),
                )?;
                continue;
            }

            if self.parse_attributed_block_item(&mut i)? {
                continue;
            }

            i = self.next(i);
        }

        self.handler.finish()
    }

    /// Check every attribute in the source for legal placement, even
    /// the ones inside blocks the main walk skips over.
    fn validate_attribute_placement(&self) -> Result<()> {
        let end = self.tree.end_index();
        let mut i = 0;
        while i < end {
            let mut cursor = i;
            self.parse_introspect_attribute(&mut cursor)?;
            i = if cursor > i { cursor } else { i + 1 };
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // token helpers

    fn is(&self, index: usize, text: &str, tag: Tag) -> bool {
        match self.tree.tokens().get(index) {
            Some(token) => token.tags.contains(tag) && self.tree.text_at(index) == text,
            None => false,
        }
    }

    fn has_tag(&self, index: usize, tag: Tag) -> bool {
        match self.tree.tokens().get(index) {
            Some(token) => token.tags.contains(tag),
            None => false,
        }
    }

    fn is_end(&self, index: usize) -> bool {
        self.tree.tokens()[index].is_end()
    }

    fn next(&self, index: usize) -> usize {
        self.tree.next_of(index)
    }

    fn location(&self, index: usize) -> Location {
        self.tree.token_location(index)
    }

    fn snippet(&self, index: usize) -> String {
        quote(self.tree.text_at(index))
    }

    fn error(&self, index: usize, reason: &str) -> Error {
        Error::parsing(self.location(index), self.snippet(index), reason)
    }

    fn error2(&self, primary: usize, related: usize, reason: &str) -> Error {
        Error::Parsing(
            Diagnostic::new(self.location(primary), self.snippet(primary), reason)
                .with_related(self.location(related), self.snippet(related)),
        )
    }

    // ------------------------------------------------------------------
    // parsers

    /// Parse this pattern:
    ///
    /// ```text
    /// CCTT_INTROSPECT ( .... ) ....
    ///                 ^        ^
    ///                 |        `-- i will be here on success.
    ///                 `----------- returned token on success.
    /// ```
    ///
    /// Returns `None` (leaving `i` untouched) when the marker is
    /// absent. Errors when the marker is present but malformed or in an
    /// illegal place.
    fn parse_introspect_attribute(&self, i: &mut usize) -> Result<Option<TokenId>> {
        if !self.is(*i, INTROSPECT_MARKER, Tag::Identifier) {
            return Ok(None);
        }
        let marker = *i;

        if !self.is(marker + 1, "(", Tag::Symbol) {
            return Err(self.error2(
                marker + 1,
                marker,
                "missing parenthesis `()`. CCTT_INTROSPECT() or CCTT_INTROSPECT(arguments) expected.",
            ));
        }

        // Legal places are directly inside named namespaces and
        // class/struct/union bodies: every enclosing parent must be a
        // brace, and a brace directly preceded by `namespace` opens an
        // anonymous namespace.
        let mut parent = self.tree.tokens()[marker].parent;
        while let Some(brace) = parent {
            let at = brace.index();
            if !self.is(at, "{", Tag::Symbol) {
                return Err(self.error2(
                    at,
                    marker,
                    "introspection must be directly inside namespace/struct/class/union.",
                ));
            }
            if at >= 1 && self.is(at - 1, "namespace", Tag::Identifier) {
                return Err(self.error(at - 1, "anonymous namespaces cannot be introspected."));
            }
            parent = self.tree.tokens()[at].parent;
        }

        *i = self.next(marker + 1);
        Ok(Some(TokenId::from_usize(marker + 1)))
    }

    /// Parse this pattern:
    ///
    /// ```text
    /// namespace @name [:: @name] { ....
    ///             ^              ^
    ///             |              `-- i will be here on success.
    ///             `----------------- first reported name.
    /// ```
    ///
    /// The `[:: @name]` part repeats arbitrarily (C++17 nested
    /// namespace definitions). Returns `None` (leaving `i` untouched)
    /// when the pattern does not match.
    fn parse_namespace_heading(&self, i: &mut usize) -> Option<NamespaceHeading> {
        if !self.is(*i, "namespace", Tag::Identifier) {
            return None;
        }
        if !self.has_tag(*i + 1, Tag::Identifier) {
            return None;
        }

        let mut p = *i + 2;
        while self.is(p, "::", Tag::Symbol) && self.has_tag(p + 1, Tag::Identifier) {
            p += 2;
        }

        if !self.is(p, "{", Tag::Symbol) {
            return None;
        }

        let heading = NamespaceHeading {
            first_name: *i + 1,
            past_names: p,
        };
        *i = p + 1;
        Some(heading)
    }

    /// Parse these patterns:
    ///
    /// ```text
    /// enum [struct|class] [@name] [: ....] { ....
    ///                                          ^
    ///                                          `-- i will be here on success.
    /// ```
    ///
    /// A `;` before the `{` is an enum declaration and errors. Returns
    /// `None` (leaving `i` untouched) when the leading `enum` is absent.
    fn parse_enum_heading(&self, i: &mut usize) -> Result<Option<Option<usize>>> {
        let mut p = *i;
        if !self.is(p, "enum", Tag::Identifier) {
            return Ok(None);
        }
        p += 1;

        if self.is(p, "struct", Tag::Identifier) || self.is(p, "class", Tag::Identifier) {
            p += 1;
        }

        let mut name = None;
        if self.has_tag(p, Tag::Identifier) {
            name = Some(p);
            p += 1;
        }

        if self.is(p, ":", Tag::Symbol) {
            p += 1;
            let end = self.tree.end_index();
            while p < end {
                if self.is(p, "{", Tag::Symbol) || self.is(p, ";", Tag::Symbol) {
                    break;
                }
                p = self.next(p);
            }
        }

        if self.is(p, ";", Tag::Symbol) {
            return Err(self.error(p, "enum declaration cannot be introspected."));
        }
        if !self.is(p, "{", Tag::Symbol) {
            return Err(self.error(p, "failed to introspect enum."));
        }

        *i = p + 1;
        Ok(Some(name))
    }

    /// Report one enumerator, then skip to the next top-level `,` or
    /// the closing `}`.
    fn parse_enumerator(&mut self, i: &mut usize, kind: EnumKind) -> Result<()> {
        if !self.has_tag(*i, Tag::Identifier) {
            return Err(self.error(*i, "unrecognized enum item."));
        }

        let name = TokenId::from_usize(*i);
        match kind {
            EnumKind::Named => self.handler.enumerator(name)?,
            EnumKind::Anonymous => self.handler.integral_constant(name)?,
        }
        *i += 1;

        loop {
            if self.is(*i, ",", Tag::Symbol) {
                *i += 1;
                break;
            }
            if self.is(*i, "}", Tag::Symbol) {
                break;
            }
            *i = self.next(*i);
        }
        Ok(())
    }

    /// Parse an enum body between `{` and the matching `}`. A nested
    /// attribute attaches to the single enumerator that follows it.
    fn parse_enum_body(&mut self, i: &mut usize, kind: EnumKind) -> Result<()> {
        while !self.is(*i, "}", Tag::Symbol) {
            if let Some(attributes) = self.parse_introspect_attribute(i)? {
                self.handler.add_attributes(attributes)?;
                while let Some(more) = self.parse_introspect_attribute(i)? {
                    self.handler.add_attributes(more)?;
                }
                self.parse_enumerator(i, kind)?;
                self.handler.clear_attributes()?;
            } else {
                self.parse_enumerator(i, kind)?;
            }
        }
        *i += 1;
        Ok(())
    }

    /// Parse these patterns:
    ///
    /// ```text
    /// [struct|class|union] ... [@name] [final] [: bases] { ....
    ///                                                        ^
    ///                                                        `-- i will be here on success.
    ///
    /// [struct|class|union] ... [@name] [final] [: bases] ;
    /// ```
    ///
    /// `alignas(...)` and bracketed groups between the keyword and the
    /// name are skipped. The second form is a forward declaration.
    /// Returns `None` (leaving `i` untouched) when the keyword is
    /// absent.
    fn parse_struct_heading(&self, i: &mut usize) -> Result<Option<StructHeading>> {
        let mut p = *i;
        let kind = p;

        if !(self.is(p, "struct", Tag::Identifier)
            || self.is(p, "class", Tag::Identifier)
            || self.is(p, "union", Tag::Identifier))
        {
            return Ok(None);
        }
        let default_public = self.tree.text_at(p) != "class";
        p += 1;

        while !self.is_end(p)
            && (self.tree.tokens()[p].pair.is_some() || self.is(p, "alignas", Tag::Identifier))
        {
            p = self.next(p);
        }

        let mut name = None;
        if self.has_tag(p, Tag::Identifier) {
            name = Some(p);
            p += 1;
        }

        if self.is(p, "final", Tag::Identifier) {
            p += 1;
        }

        let mut bases = None;
        if self.is(p, ":", Tag::Symbol) {
            p += 1;
            bases = Some(p);
            let end = self.tree.end_index();
            while p < end {
                if self.is(p, "{", Tag::Symbol) || self.is(p, ";", Tag::Symbol) {
                    break;
                }
                p = self.next(p);
            }
        }

        if self.is(p, ";", Tag::Symbol) {
            *i = p + 1;
            return Ok(Some(StructHeading::Forward));
        }

        if !self.is(p, "{", Tag::Symbol) {
            return Err(self.error2(kind, p, "failed to introspect item."));
        }

        *i = p + 1;
        Ok(Some(StructHeading::Definition {
            name,
            bases,
            default_public,
        }))
    }

    /// Walk a base list, tracking per-base visibility:
    ///
    /// ```text
    /// [virtual|public|private|protected]* .... [, ....]* {
    /// ```
    ///
    /// Visibility starts at the class default; `public` makes a base
    /// visible, `private`/`protected` hide it, `virtual` changes
    /// nothing. Only visible bases are reported.
    fn parse_struct_bases(&mut self, bases: usize, default_public: bool) -> Result<()> {
        let mut p = bases;
        loop {
            let mut visible = default_public;
            loop {
                if self.is(p, "virtual", Tag::Identifier)
                    || self.is(p, "public", Tag::Identifier)
                    || self.is(p, "private", Tag::Identifier)
                    || self.is(p, "protected", Tag::Identifier)
                {
                    let keyword = self.tree.text_at(p);
                    if keyword != "virtual" {
                        visible = keyword == "public";
                    }
                    p += 1;
                } else {
                    break;
                }
            }

            let base_first = p;
            let mut at_body = false;
            loop {
                if self.is(p, ",", Tag::Symbol) {
                    break;
                }
                if self.is(p, "{", Tag::Symbol) {
                    at_body = true;
                    break;
                }
                p = self.next(p);
            }

            if visible {
                self.handler
                    .parent(TokenId::from_usize(base_first), TokenId::from_usize(p))?;
            }
            p += 1;

            if at_body {
                return Ok(());
            }
        }
    }

    /// Skip forward to just past the next `public :`, or to the closing
    /// `}` of the current body.
    fn skip_after_public(&self, i: &mut usize) {
        loop {
            if self.is(*i, "}", Tag::Symbol) {
                return;
            }
            if self.is(*i, "public", Tag::Identifier) && self.is(*i + 1, ":", Tag::Symbol) {
                *i += 2;
                return;
            }
            *i = self.next(*i);
        }
    }

    /// Parse a struct body between `{` and the matching `}`, starting
    /// in the given visibility. `private :` and `protected :` sections
    /// are skipped up to the next `public :`; `using` and `typedef`
    /// statements are skipped entirely.
    fn parse_struct_body(&mut self, i: &mut usize, public: bool) -> Result<()> {
        if !public {
            self.skip_after_public(i);
        }

        loop {
            if (self.is(*i, "private", Tag::Identifier)
                || self.is(*i, "protected", Tag::Identifier))
                && self.is(*i + 1, ":", Tag::Symbol)
            {
                *i += 2;
                self.skip_after_public(i);
            }

            if self.is(*i, "using", Tag::Identifier) || self.is(*i, "typedef", Tag::Identifier) {
                while !self.is(*i, ";", Tag::Symbol) && !self.is(*i, "}", Tag::Symbol) {
                    *i = self.next(*i);
                }
            }

            if self.is(*i, "}", Tag::Symbol) {
                break;
            }

            if self.parse_attributed_block_item(i)? {
                continue;
            }
            if self.parse_block_item(i)? {
                continue;
            }

            *i = self.next(*i);
        }

        *i += 1;
        Ok(())
    }

    /// Parse these patterns, starting from an identifier:
    ///
    /// ```text
    /// identifier .... name { .... } .... [; | , | { .... }] ....
    /// identifier .... name [ .... ] .... [; | , | { .... }] ....
    /// identifier .... name ( .... ) .... [; | , | { .... }] ....
    /// identifier .... name = ....   .... [; | , | { .... }] ....
    /// identifier .... name [; | ,]                          ....
    /// ```
    ///
    /// `decltype(...)` and `alignas(...)` are transparent; an
    /// `operator` followed by a symbol names the declaration. A `:`
    /// after the header introduces a constructor member-initializer
    /// list. Returns the name token, or `None` (leaving `i` untouched)
    /// when the pattern does not match.
    fn parse_variable_or_function(&self, i: &mut usize) -> Result<Option<usize>> {
        if !self.has_tag(*i, Tag::Identifier) {
            return Ok(None);
        }

        let mut p = *i;
        let mut name = None;
        loop {
            if (self.is(p, "decltype", Tag::Identifier) || self.is(p, "alignas", Tag::Identifier))
                && self.is(p + 1, "(", Tag::Symbol)
            {
                p = self.next(p + 1);
                continue;
            }

            if self.is(p, "operator", Tag::Identifier) && self.has_tag(p + 1, Tag::Symbol) {
                name = Some(p);
                p = self.next(p + 1);
                continue;
            }

            if self.is_end(p) || self.is(p, "}", Tag::Symbol) {
                return Ok(None);
            }

            if self.is(p, ";", Tag::Symbol)
                || self.is(p, ",", Tag::Symbol)
                || self.is(p, "{", Tag::Symbol)
                || self.is(p, "[", Tag::Symbol)
                || self.is(p, "(", Tag::Symbol)
                || self.is(p, "=", Tag::Symbol)
            {
                break;
            }

            p = self.next(p);
        }

        let name = name.unwrap_or(p - 1);
        let ends_statement = self.is(p, ";", Tag::Symbol) || self.is(p, ",", Tag::Symbol);
        *i = self.next(p);
        if ends_statement {
            return Ok(Some(name));
        }

        loop {
            if self.is_end(*i) {
                return Err(self.error(name, "unexpected eof."));
            }
            if self.is(*i, "}", Tag::Symbol) {
                return Err(self.error2(name, *i, "unexpected symbol."));
            }

            if self.is(*i, ";", Tag::Symbol) || self.is(*i, ",", Tag::Symbol) {
                *i += 1;
                break;
            }
            if self.is(*i, "{", Tag::Symbol) {
                *i = self.next(*i);
                break;
            }

            // constructor's member initialization list
            if self.is(*i, ":", Tag::Symbol) {
                *i += 1;
                loop {
                    if self.is_end(*i) {
                        return Err(self.error(name, "unexpected eof."));
                    }
                    if self.is(*i, "{", Tag::Symbol)
                        || self.is(*i, "(", Tag::Symbol)
                        || self.is(*i, "...", Tag::Symbol)
                    {
                        *i = self.next(*i);
                        if self.is(*i, ",", Tag::Symbol) {
                            *i += 1;
                            continue;
                        }
                        break;
                    }
                    *i = self.next(*i);
                }
                continue;
            }

            *i = self.next(*i);
        }

        Ok(Some(name))
    }

    /// Parse one block-level item: an enum, a class/struct/union, or a
    /// variable/function. Returns false (leaving `i` untouched) when
    /// nothing matches.
    fn parse_block_item(&mut self, i: &mut usize) -> Result<bool> {
        if let Some(name) = self.parse_enum_heading(i)? {
            match name {
                Some(name) => {
                    self.handler.enter_enum(TokenId::from_usize(name))?;
                    self.parse_enum_body(i, EnumKind::Named)?;
                    self.handler.leave_enum()?;
                }
                None => self.parse_enum_body(i, EnumKind::Anonymous)?,
            }
            return Ok(true);
        }

        if let Some(heading) = self.parse_struct_heading(i)? {
            match heading {
                StructHeading::Forward => {}
                StructHeading::Definition {
                    name: None,
                    default_public,
                    ..
                } => {
                    self.parse_struct_body(i, default_public)?;
                }
                StructHeading::Definition {
                    name: Some(name),
                    bases,
                    default_public,
                } => {
                    let name_id = TokenId::from_usize(name);
                    self.handler.structure(name_id)?;
                    if let Some(bases) = bases {
                        self.parse_struct_bases(bases, default_public)?;
                    }
                    self.handler
                        .enter_namespace(name_id, TokenId::from_usize(name + 1))?;
                    self.parse_struct_body(i, default_public)?;
                    self.handler.leave_namespace()?;
                }
            }
            return Ok(true);
        }

        if let Some(name) = self.parse_variable_or_function(i)? {
            if !self.is(name, "operator", Tag::Identifier) {
                self.handler.variable_or_function(TokenId::from_usize(name))?;
            }
            return Ok(true);
        }

        Ok(false)
    }

    /// Parse one or more attributes followed by exactly one block item.
    /// Returns false (leaving `i` untouched) when `i` is not an
    /// attribute; errors when attributes are not followed by a
    /// recognizable item.
    fn parse_attributed_block_item(&mut self, i: &mut usize) -> Result<bool> {
        let Some(attributes) = self.parse_introspect_attribute(i)? else {
            return Ok(false);
        };
        self.handler.add_attributes(attributes)?;
        while let Some(more) = self.parse_introspect_attribute(i)? {
            self.handler.add_attributes(more)?;
        }

        if self.parse_block_item(i)? {
            self.handler.clear_attributes()?;
            Ok(true)
        } else {
            Err(self.error(*i, "not introspectable."))
        }
    }
}
