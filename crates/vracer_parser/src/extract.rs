//! Structural extractor.
//!
//! A token-stream pass that isolates the units the analysis cares about
//! without attempting a full HDL parse: `module ... endmodule` regions,
//! `parameter`/`localparam` and net declarations, and the top-level process
//! constructs within each module body. Process bodies are delimited by
//! tracking `begin`/`end`, `fork`/`join`, `case`/`endcase`, and parenthesis
//! depth; their contents are handed to the process parser untouched.
//!
//! Unbalanced nesting is a fatal [`ParseError`]. Nested modules and
//! `generate` blocks are recognized-but-unhandled: they produce a `W201`
//! warning and are skipped.

use crate::error::ParseError;
use crate::token::{Token, VerilogToken};
use std::ops::Range;
use vracer_common::{Ident, Interner};
use vracer_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink};
use vracer_ir::{NetKind, ProcessKind};
use vracer_source::Span;

/// A module region located by the extractor.
pub struct ModuleBlock {
    /// The module name.
    pub name: Ident,
    /// Span covering `module` through `endmodule`.
    pub span: Span,
    /// Parameters from the header and the body, in source order.
    pub params: Vec<ParamDecl>,
    /// Net declarations from the port list and the body.
    pub nets: Vec<NetDecl>,
    /// Top-level process constructs in source order.
    pub processes: Vec<ProcessConstruct>,
}

/// A `parameter`/`localparam` declaration with its default kept as text.
pub struct ParamDecl {
    /// The parameter name.
    pub name: Ident,
    /// The default value, verbatim from source.
    pub default: String,
    /// The span of the name token.
    pub span: Span,
}

/// A declared net (from a port list or a body declaration).
pub struct NetDecl {
    /// The net name.
    pub name: Ident,
    /// Literal `[msb:lsb]` width, when present.
    pub width: Option<u32>,
    /// The declared kind.
    pub kind: NetKind,
    /// The span of the name token.
    pub span: Span,
}

/// A process construct located at depth 0 of a module body.
///
/// `tokens` is the index range covering the construct from its keyword
/// through the end of its body; the process parser consumes it verbatim.
pub struct ProcessConstruct {
    /// The construct kind.
    pub kind: ProcessKind,
    /// The span of the introducing keyword.
    pub span: Span,
    /// Token index range of the whole construct.
    pub tokens: Range<usize>,
}

/// Extracts all module blocks from a token stream.
///
/// Fails with a fatal [`ParseError`] on unbalanced `module`/`endmodule` or
/// `begin`/`end` nesting. Recoverable problems (stray top-level tokens,
/// skipped constructs) go to the sink.
pub fn extract_modules(
    tokens: &[Token],
    source: &str,
    interner: &Interner,
    sink: &DiagnosticSink,
) -> Result<Vec<ModuleBlock>, ParseError> {
    let mut ex = Extractor {
        tokens,
        pos: 0,
        source,
        interner,
        sink,
    };
    ex.extract_all()
}

struct Extractor<'src> {
    tokens: &'src [Token],
    pos: usize,
    source: &'src str,
    interner: &'src Interner,
    sink: &'src DiagnosticSink,
}

impl<'src> Extractor<'src> {
    // ------------------------------------------------------------------
    // Primitive operations
    // ------------------------------------------------------------------

    fn current(&self) -> VerilogToken {
        self.tokens[self.pos].kind
    }

    fn current_span(&self) -> Span {
        self.tokens[self.pos].span
    }

    fn current_offset(&self) -> u32 {
        self.current_span().start
    }

    fn current_text(&self) -> &'src str {
        let span = self.current_span();
        &self.source[span.start as usize..span.end as usize]
    }

    fn at(&self, kind: VerilogToken) -> bool {
        self.current() == kind
    }

    fn at_eof(&self) -> bool {
        self.current() == VerilogToken::Eof
    }

    fn advance(&mut self) {
        if !self.at_eof() {
            self.pos += 1;
        }
    }

    fn eat(&mut self, kind: VerilogToken) -> bool {
        if self.at(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn peek_kind(&self, offset: usize) -> VerilogToken {
        let idx = self.pos + offset;
        if idx < self.tokens.len() {
            self.tokens[idx].kind
        } else {
            VerilogToken::Eof
        }
    }

    fn error(&self, msg: &str) {
        self.sink.emit(Diagnostic::error(
            DiagnosticCode::new(Category::Error, 101),
            msg,
            self.current_span(),
        ));
    }

    fn warn_unsupported(&self, what: &str) {
        self.sink.emit(Diagnostic::warning(
            DiagnosticCode::new(Category::Warning, 201),
            format!("{what} is not supported; skipping"),
            self.current_span(),
        ));
    }

    // ------------------------------------------------------------------
    // Top level
    // ------------------------------------------------------------------

    fn extract_all(&mut self) -> Result<Vec<ModuleBlock>, ParseError> {
        let mut blocks = Vec::new();
        while !self.at_eof() {
            if self.at(VerilogToken::Module) {
                blocks.push(self.extract_module()?);
            } else if self.at(VerilogToken::Endmodule) {
                return Err(ParseError::new(
                    "'endmodule' without matching 'module'",
                    self.current_offset(),
                ));
            } else {
                self.error("expected 'module'");
                self.advance();
            }
        }
        Ok(blocks)
    }

    fn extract_module(&mut self) -> Result<ModuleBlock, ParseError> {
        let start = self.current_span();
        self.advance(); // module

        let name = if self.current().is_ident() {
            let id = self.interner.get_or_intern(self.current_text());
            self.advance();
            id
        } else {
            self.error("expected module name");
            self.interner.get_or_intern("<anonymous>")
        };

        let mut block = ModuleBlock {
            name,
            span: start,
            params: Vec::new(),
            nets: Vec::new(),
            processes: Vec::new(),
        };

        // Parameter port list: #( parameter ... )
        if self.eat(VerilogToken::Hash) {
            if self.at(VerilogToken::LeftParen) {
                self.advance();
                while !self.at(VerilogToken::RightParen) {
                    if self.at_eof() {
                        return Err(ParseError::new(
                            "unterminated parameter port list",
                            self.current_offset(),
                        ));
                    }
                    if self.eat(VerilogToken::Parameter) || self.eat(VerilogToken::Localparam) {
                        self.parse_parameter_items(&mut block.params, true)?;
                    } else {
                        self.advance();
                    }
                }
                self.advance(); // )
            } else {
                self.error("expected '(' after '#'");
            }
        }

        // Port list
        if self.at(VerilogToken::LeftParen) {
            self.parse_port_list(&mut block.nets)?;
        }

        if !self.eat(VerilogToken::Semicolon) {
            self.error("expected ';' after module header");
        }

        // Body
        loop {
            match self.current() {
                VerilogToken::Endmodule => {
                    block.span = start.merge(self.current_span());
                    self.advance();
                    return Ok(block);
                }
                VerilogToken::Eof => {
                    return Err(ParseError::new(
                        format!(
                            "unterminated module '{}'",
                            self.interner.resolve(name)
                        ),
                        start.start,
                    ));
                }
                VerilogToken::Parameter | VerilogToken::Localparam => {
                    self.advance();
                    self.parse_parameter_items(&mut block.params, false)?;
                    self.eat(VerilogToken::Semicolon);
                }
                VerilogToken::Module => {
                    self.warn_unsupported("nested module");
                    self.skip_nested_module()?;
                }
                VerilogToken::Generate => {
                    self.warn_unsupported("'generate' block");
                    self.skip_generate()?;
                }
                VerilogToken::Assign => {
                    // Continuous assignments are consumed but not modeled as
                    // processes.
                    self.skip_to_semicolon();
                }
                kind if kind.is_process_keyword() => {
                    let construct = self.extract_process()?;
                    block.processes.push(construct);
                }
                kind if kind.is_direction() || kind.is_net_type() || kind == VerilogToken::Signed => {
                    self.parse_net_decl(&mut block.nets);
                }
                _ => {
                    // Unmodeled module item (task, function, instantiation, ...)
                    self.skip_to_semicolon();
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // Declarations
    // ------------------------------------------------------------------

    /// Parses `NAME = default {, NAME = default}` items after a
    /// `parameter`/`localparam` keyword. In header position (`in_header`)
    /// items end at a top-level `,` or `)`; in body position at `,` or `;`.
    fn parse_parameter_items(
        &mut self,
        params: &mut Vec<ParamDecl>,
        in_header: bool,
    ) -> Result<(), ParseError> {
        // Optional type tokens before the first name.
        while self.current().is_net_type() || self.at(VerilogToken::Signed) {
            self.advance();
        }
        if self.at(VerilogToken::LeftBracket) {
            self.skip_brackets();
        }

        loop {
            if !self.current().is_ident() {
                self.error("expected parameter name");
                return Ok(());
            }
            let name_span = self.current_span();
            let name = self.interner.get_or_intern(self.current_text());
            self.advance();

            let mut default = String::new();
            if self.eat(VerilogToken::Equals) {
                let text_start = self.current_span().start as usize;
                let mut text_end = text_start;
                let mut depth = 0i32;
                loop {
                    match self.current() {
                        VerilogToken::LeftParen
                        | VerilogToken::LeftBracket
                        | VerilogToken::LeftBrace => depth += 1,
                        VerilogToken::RightParen if depth == 0 && in_header => break,
                        VerilogToken::RightParen
                        | VerilogToken::RightBracket
                        | VerilogToken::RightBrace => depth -= 1,
                        VerilogToken::Comma if depth == 0 => break,
                        VerilogToken::Semicolon if depth == 0 => break,
                        VerilogToken::Eof => {
                            return Err(ParseError::new(
                                "unterminated parameter default",
                                self.current_offset(),
                            ));
                        }
                        _ => {}
                    }
                    text_end = self.current_span().end as usize;
                    self.advance();
                }
                default = self.source[text_start..text_end].trim().to_string();
            }

            params.push(ParamDecl {
                name,
                default,
                span: name_span,
            });

            // Another name in this declaration? Header lists may also start a
            // fresh `parameter` keyword, handled by the caller.
            if self.at(VerilogToken::Comma)
                && (self.peek_kind(1).is_ident() && self.peek_kind(2) == VerilogToken::Equals)
            {
                self.advance();
                continue;
            }
            return Ok(());
        }
    }

    /// Parses an ANSI port list `( ... )` into net declarations.
    fn parse_port_list(&mut self, nets: &mut Vec<NetDecl>) -> Result<(), ParseError> {
        self.advance(); // (
        let mut kind: Option<NetKind> = None;
        let mut width: Option<u32> = None;
        let mut depth = 1i32;

        loop {
            match self.current() {
                VerilogToken::Eof => {
                    return Err(ParseError::new(
                        "unterminated port list",
                        self.current_offset(),
                    ));
                }
                VerilogToken::LeftParen => {
                    depth += 1;
                    self.advance();
                }
                VerilogToken::RightParen => {
                    depth -= 1;
                    self.advance();
                    if depth == 0 {
                        return Ok(());
                    }
                }
                VerilogToken::Input | VerilogToken::Output | VerilogToken::Inout => {
                    kind = Some(NetKind::Wire);
                    width = None;
                    self.advance();
                }
                VerilogToken::Reg | VerilogToken::Logic => {
                    kind = Some(NetKind::Reg);
                    self.advance();
                }
                VerilogToken::Wire => {
                    kind = Some(NetKind::Wire);
                    self.advance();
                }
                VerilogToken::Integer | VerilogToken::Int => {
                    kind = Some(NetKind::Int);
                    self.advance();
                }
                VerilogToken::Real => {
                    kind = Some(NetKind::Real);
                    self.advance();
                }
                VerilogToken::LeftBracket => {
                    width = self.parse_width();
                }
                VerilogToken::Identifier | VerilogToken::EscapedIdentifier => {
                    if let Some(k) = kind {
                        nets.push(NetDecl {
                            name: self.interner.get_or_intern(self.current_text()),
                            width,
                            kind: k,
                            span: self.current_span(),
                        });
                    }
                    // Non-ANSI bare names are declared in the body instead.
                    self.advance();
                }
                _ => self.advance(),
            }
        }
    }

    /// Parses a body net declaration: `[direction] [type] [signed] [range]
    /// name [dims] [= init] {, name ...} ;`.
    fn parse_net_decl(&mut self, nets: &mut Vec<NetDecl>) {
        let mut kind = NetKind::Wire;

        while self.current().is_direction()
            || self.current().is_net_type()
            || self.at(VerilogToken::Signed)
        {
            match self.current() {
                VerilogToken::Reg | VerilogToken::Logic => kind = NetKind::Reg,
                VerilogToken::Integer | VerilogToken::Int => kind = NetKind::Int,
                VerilogToken::Real => kind = NetKind::Real,
                VerilogToken::Wire => kind = NetKind::Wire,
                _ => {}
            }
            self.advance();
        }

        let width = if self.at(VerilogToken::LeftBracket) {
            self.parse_width()
        } else {
            None
        };

        loop {
            match self.current() {
                VerilogToken::Identifier | VerilogToken::EscapedIdentifier => {
                    nets.push(NetDecl {
                        name: self.interner.get_or_intern(self.current_text()),
                        width,
                        kind,
                        span: self.current_span(),
                    });
                    self.advance();
                    // Memory dimensions after the name.
                    while self.at(VerilogToken::LeftBracket) {
                        self.skip_brackets();
                    }
                    // Declaration initializer.
                    if self.eat(VerilogToken::Equals) {
                        let mut depth = 0i32;
                        loop {
                            match self.current() {
                                VerilogToken::LeftParen
                                | VerilogToken::LeftBracket
                                | VerilogToken::LeftBrace => depth += 1,
                                VerilogToken::RightParen
                                | VerilogToken::RightBracket
                                | VerilogToken::RightBrace => depth -= 1,
                                VerilogToken::Comma | VerilogToken::Semicolon if depth == 0 => {
                                    break
                                }
                                VerilogToken::Eof => return,
                                _ => {}
                            }
                            self.advance();
                        }
                    }
                }
                VerilogToken::Comma => {
                    self.advance();
                }
                VerilogToken::Semicolon => {
                    self.advance();
                    return;
                }
                _ => {
                    // Malformed declaration; bail at statement boundary.
                    self.skip_to_semicolon();
                    return;
                }
            }
        }
    }

    /// Parses a `[msb:lsb]` range, returning the literal width if both
    /// bounds are plain integers.
    fn parse_width(&mut self) -> Option<u32> {
        // self is at '['
        let open = self.pos;
        self.skip_brackets();
        if self.pos <= open + 1 {
            return None;
        }
        let inner = &self.tokens[open + 1..self.pos - 1];
        if inner.len() == 3
            && inner[0].kind == VerilogToken::IntLiteral
            && inner[1].kind == VerilogToken::Colon
            && inner[2].kind == VerilogToken::IntLiteral
        {
            let msb = self.literal_value(inner[0].span)?;
            let lsb = self.literal_value(inner[2].span)?;
            return Some(msb.abs_diff(lsb) + 1);
        }
        None
    }

    fn literal_value(&self, span: Span) -> Option<u32> {
        let text = &self.source[span.start as usize..span.end as usize];
        text.replace('_', "").parse().ok()
    }

    // ------------------------------------------------------------------
    // Process construct delimiting
    // ------------------------------------------------------------------

    fn extract_process(&mut self) -> Result<ProcessConstruct, ParseError> {
        let start = self.pos;
        let keyword_span = self.current_span();
        let kind = match self.current() {
            VerilogToken::Always => ProcessKind::AlwaysGeneral,
            VerilogToken::AlwaysFf => ProcessKind::AlwaysFf,
            VerilogToken::AlwaysComb => ProcessKind::AlwaysComb,
            VerilogToken::AlwaysLatch => ProcessKind::AlwaysLatch,
            VerilogToken::Initial => ProcessKind::Initial,
            VerilogToken::Final => ProcessKind::Final,
            _ => unreachable!("caller checked is_process_keyword"),
        };
        self.advance();

        // Optional sensitivity for always/always_ff; validated by the
        // process parser, only delimited here.
        if self.at(VerilogToken::At) {
            self.advance();
            if self.at(VerilogToken::Star) {
                self.advance();
            } else if self.at(VerilogToken::LeftParen) {
                self.skip_parens()?;
            } else if self.current().is_ident() {
                self.advance();
            }
            // Anything else is caught by the process parser's sensitivity
            // validation.
        }

        self.consume_statement()?;

        Ok(ProcessConstruct {
            kind,
            span: keyword_span,
            tokens: start..self.pos,
        })
    }

    /// Consumes exactly one statement, tracking block nesting.
    fn consume_statement(&mut self) -> Result<(), ParseError> {
        match self.current() {
            VerilogToken::Begin | VerilogToken::Fork | VerilogToken::Case
            | VerilogToken::Casex | VerilogToken::Casez => self.skip_balanced_block(),
            VerilogToken::If => {
                self.advance();
                self.skip_parens()?;
                self.consume_statement()?;
                if self.eat(VerilogToken::Else) {
                    self.consume_statement()?;
                }
                Ok(())
            }
            VerilogToken::For | VerilogToken::While | VerilogToken::Repeat | VerilogToken::Wait => {
                self.advance();
                self.skip_parens()?;
                if self.eat(VerilogToken::Semicolon) {
                    Ok(())
                } else {
                    self.consume_statement()
                }
            }
            VerilogToken::Forever => {
                self.advance();
                self.consume_statement()
            }
            VerilogToken::At => {
                self.advance();
                if self.at(VerilogToken::Star) {
                    self.advance();
                } else if self.at(VerilogToken::LeftParen) {
                    self.skip_parens()?;
                } else if self.current().is_ident() {
                    self.advance();
                }
                if self.eat(VerilogToken::Semicolon) {
                    Ok(())
                } else {
                    self.consume_statement()
                }
            }
            VerilogToken::Hash => {
                self.advance();
                if self.at(VerilogToken::LeftParen) {
                    self.skip_parens()?;
                } else {
                    self.advance();
                }
                if self.eat(VerilogToken::Semicolon) {
                    Ok(())
                } else {
                    self.consume_statement()
                }
            }
            VerilogToken::Semicolon => {
                self.advance();
                Ok(())
            }
            VerilogToken::Eof | VerilogToken::Endmodule => Err(ParseError::new(
                "unterminated process body",
                self.current_offset(),
            )),
            _ => {
                // Simple statement: assignment, task enable, declaration.
                let mut depth = 0i32;
                loop {
                    match self.current() {
                        VerilogToken::LeftParen
                        | VerilogToken::LeftBracket
                        | VerilogToken::LeftBrace => depth += 1,
                        VerilogToken::RightParen
                        | VerilogToken::RightBracket
                        | VerilogToken::RightBrace => depth -= 1,
                        VerilogToken::Semicolon if depth == 0 => {
                            self.advance();
                            return Ok(());
                        }
                        VerilogToken::Eof | VerilogToken::Endmodule => {
                            return Err(ParseError::new(
                                "missing ';' in process body",
                                self.current_offset(),
                            ));
                        }
                        _ => {}
                    }
                    self.advance();
                }
            }
        }
    }

    /// Skips a `begin`/`fork`/`case` block by depth counting.
    fn skip_balanced_block(&mut self) -> Result<(), ParseError> {
        let open_offset = self.current_offset();
        let mut depth = 0i32;
        loop {
            match self.current() {
                VerilogToken::Begin
                | VerilogToken::Fork
                | VerilogToken::Case
                | VerilogToken::Casex
                | VerilogToken::Casez => depth += 1,
                VerilogToken::End | VerilogToken::Join | VerilogToken::Endcase => {
                    depth -= 1;
                    if depth < 0 {
                        return Err(ParseError::new(
                            "unbalanced block terminator",
                            self.current_offset(),
                        ));
                    }
                    if depth == 0 {
                        self.advance();
                        // Optional block label after 'end'.
                        if self.at(VerilogToken::Colon) && self.peek_kind(1).is_ident() {
                            self.advance();
                            self.advance();
                        }
                        return Ok(());
                    }
                }
                VerilogToken::Eof | VerilogToken::Endmodule => {
                    return Err(ParseError::new("unbalanced 'begin'", open_offset));
                }
                _ => {}
            }
            self.advance();
        }
    }

    fn skip_parens(&mut self) -> Result<(), ParseError> {
        if !self.at(VerilogToken::LeftParen) {
            self.error("expected '('");
            return Ok(());
        }
        let open_offset = self.current_offset();
        let mut depth = 0i32;
        loop {
            match self.current() {
                VerilogToken::LeftParen => depth += 1,
                VerilogToken::RightParen => {
                    depth -= 1;
                    if depth == 0 {
                        self.advance();
                        return Ok(());
                    }
                }
                VerilogToken::Eof => {
                    return Err(ParseError::new("unbalanced '('", open_offset));
                }
                _ => {}
            }
            self.advance();
        }
    }

    fn skip_brackets(&mut self) {
        let mut depth = 0i32;
        loop {
            match self.current() {
                VerilogToken::LeftBracket => depth += 1,
                VerilogToken::RightBracket => {
                    depth -= 1;
                    if depth == 0 {
                        self.advance();
                        return;
                    }
                }
                VerilogToken::Eof => return,
                _ => {}
            }
            self.advance();
        }
    }

    fn skip_to_semicolon(&mut self) {
        while !self.at_eof()
            && !self.at(VerilogToken::Semicolon)
            && !self.at(VerilogToken::Endmodule)
        {
            self.advance();
        }
        self.eat(VerilogToken::Semicolon);
    }

    fn skip_nested_module(&mut self) -> Result<(), ParseError> {
        let open_offset = self.current_offset();
        let mut depth = 0i32;
        loop {
            match self.current() {
                VerilogToken::Module => depth += 1,
                VerilogToken::Endmodule => {
                    depth -= 1;
                    if depth == 0 {
                        self.advance();
                        return Ok(());
                    }
                }
                VerilogToken::Eof => {
                    return Err(ParseError::new("unterminated nested module", open_offset));
                }
                _ => {}
            }
            self.advance();
        }
    }

    fn skip_generate(&mut self) -> Result<(), ParseError> {
        let open_offset = self.current_offset();
        let mut depth = 0i32;
        loop {
            match self.current() {
                VerilogToken::Generate => depth += 1,
                VerilogToken::Endgenerate => {
                    depth -= 1;
                    if depth == 0 {
                        self.advance();
                        return Ok(());
                    }
                }
                VerilogToken::Eof => {
                    return Err(ParseError::new("unterminated 'generate'", open_offset));
                }
                _ => {}
            }
            self.advance();
        }
    }
}
