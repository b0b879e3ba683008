//! Process parser.
//!
//! Parses one process construct (keyword + optional sensitivity + body) into
//! its trigger set, anchor-advancing event controls, and the flat list of
//! signal references the detector consumes. The body scan is pattern-driven:
//! it recognizes assignment statements, control-flow guards, event controls,
//! and task enables, reducing LHS bit/part selects to base names and
//! harvesting RHS/guard identifiers as reads.

use crate::error::ParseError;
use crate::token::{Token, VerilogToken};
use std::ops::Range;
use vracer_common::{Ident, Interner};
use vracer_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink};
use vracer_ir::{AnchorId, AssignKind, NetKind, ProcessKind, RefMode, SignalRef, Trigger};
use vracer_source::Span;

/// The output of parsing a single process construct.
///
/// Anchor ids in `references` are local: 0 is the entry, `k` is the k-th
/// embedded event control. The IR builder turns `entry_event` and
/// `embedded_events` into named [`Anchor`](vracer_ir::Anchor)s once the
/// process label is known.
pub struct ParsedProcess {
    /// The construct kind.
    pub kind: ProcessKind,
    /// The outermost `begin : name` label, if present.
    pub label: Option<Ident>,
    /// The sensitivity anchor set.
    pub triggers: Vec<Trigger>,
    /// Display form of the entry trigger(s), e.g. `posedge clk` or `*`.
    pub entry_event: String,
    /// Display forms of embedded event controls, in lexical order.
    pub embedded_events: Vec<String>,
    /// All signal references, in lexical order.
    pub references: Vec<SignalRef>,
    /// Nets declared inside the body (e.g. `integer i;`).
    pub locals: Vec<(Ident, NetKind)>,
    /// Span of the introducing keyword.
    pub span: Span,
}

/// Parses the process construct covering `range` of the token stream.
pub fn parse_process(
    tokens: &[Token],
    range: Range<usize>,
    source: &str,
    interner: &Interner,
    sink: &DiagnosticSink,
) -> Result<ParsedProcess, ParseError> {
    let mut parser = ProcessParser {
        tokens,
        pos: range.start,
        end: range.end,
        source,
        interner,
        sink,
        anchor: 0,
        embedded_events: Vec::new(),
        references: Vec::new(),
        locals: Vec::new(),
    };
    parser.parse()
}

struct ProcessParser<'src> {
    tokens: &'src [Token],
    pos: usize,
    end: usize,
    source: &'src str,
    interner: &'src Interner,
    sink: &'src DiagnosticSink,
    anchor: u32,
    embedded_events: Vec<String>,
    references: Vec<SignalRef>,
    locals: Vec<(Ident, NetKind)>,
}

impl<'src> ProcessParser<'src> {
    // ------------------------------------------------------------------
    // Primitive operations
    // ------------------------------------------------------------------

    fn current(&self) -> VerilogToken {
        if self.pos < self.end {
            self.tokens[self.pos].kind
        } else {
            VerilogToken::Eof
        }
    }

    fn current_span(&self) -> Span {
        if self.pos < self.end {
            self.tokens[self.pos].span
        } else {
            self.tokens[self.end.saturating_sub(1)].span
        }
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

    fn at_end(&self) -> bool {
        self.pos >= self.end
    }

    fn advance(&mut self) {
        if self.pos < self.end {
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
        if idx < self.end {
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

    fn read(&mut self, signal: Ident, span: Span) {
        self.references.push(SignalRef {
            signal,
            mode: RefMode::Read,
            assign: AssignKind::None,
            anchor: AnchorId::from_raw(self.anchor),
            span,
        });
    }

    fn write(&mut self, signal: Ident, assign: AssignKind, span: Span) {
        self.references.push(SignalRef {
            signal,
            mode: RefMode::Write,
            assign,
            anchor: AnchorId::from_raw(self.anchor),
            span,
        });
    }

    // ------------------------------------------------------------------
    // Entry point
    // ------------------------------------------------------------------

    fn parse(&mut self) -> Result<ParsedProcess, ParseError> {
        let span = self.current_span();
        let kind = match self.current() {
            VerilogToken::Always => ProcessKind::AlwaysGeneral,
            VerilogToken::AlwaysFf => ProcessKind::AlwaysFf,
            VerilogToken::AlwaysComb => ProcessKind::AlwaysComb,
            VerilogToken::AlwaysLatch => ProcessKind::AlwaysLatch,
            VerilogToken::Initial => ProcessKind::Initial,
            VerilogToken::Final => ProcessKind::Final,
            _ => {
                return Err(ParseError::new(
                    "expected a process keyword",
                    self.current_offset(),
                ))
            }
        };
        self.advance();

        let (triggers, entry_event) = match kind {
            ProcessKind::AlwaysGeneral => {
                if self.at(VerilogToken::At) {
                    self.parse_sensitivity()?
                } else {
                    // Free-running `always begin ... end` / `always #5 ...`:
                    // never scheduled by a signal event.
                    (vec![Trigger::NoneInitial], "always".to_string())
                }
            }
            ProcessKind::AlwaysFf => {
                if self.at(VerilogToken::At) {
                    self.parse_sensitivity()?
                } else {
                    return Err(ParseError::new(
                        "malformed sensitivity list: 'always_ff' requires '@(...)'",
                        self.current_offset(),
                    ));
                }
            }
            ProcessKind::AlwaysComb | ProcessKind::AlwaysLatch => {
                (vec![Trigger::StarImplicit], "*".to_string())
            }
            ProcessKind::Initial => (vec![Trigger::NoneInitial], "initial".to_string()),
            ProcessKind::Final => (vec![Trigger::NoneInitial], "final".to_string()),
        };

        // Outermost `begin : name` labels the process.
        let label = if self.at(VerilogToken::Begin)
            && self.peek_kind(1) == VerilogToken::Colon
            && self.peek_kind(2).is_ident()
        {
            let span = self.tokens[self.pos + 2].span;
            let text = &self.source[span.start as usize..span.end as usize];
            Some(self.interner.get_or_intern(text))
        } else {
            None
        };

        while !self.at_end() {
            let before = self.pos;
            self.scan_statement()?;
            if self.pos == before {
                // Stray block terminator at top level; tolerate.
                self.advance();
            }
        }

        Ok(ParsedProcess {
            kind,
            label,
            triggers,
            entry_event,
            embedded_events: std::mem::take(&mut self.embedded_events),
            references: std::mem::take(&mut self.references),
            locals: std::mem::take(&mut self.locals),
            span,
        })
    }

    // ------------------------------------------------------------------
    // Sensitivity lists and event controls
    // ------------------------------------------------------------------

    /// Parses `@*`, `@ident`, or `@(item {or|, item})` after an `@`.
    fn parse_sensitivity(&mut self) -> Result<(Vec<Trigger>, String), ParseError> {
        self.advance(); // @

        if self.at(VerilogToken::Star) {
            self.advance();
            return Ok((vec![Trigger::StarImplicit], "*".to_string()));
        }
        if self.current().is_ident() {
            let sig = self.interner.get_or_intern(self.current_text());
            let desc = self.current_text().to_string();
            self.advance();
            return Ok((vec![Trigger::Level(sig)], desc));
        }
        if !self.at(VerilogToken::LeftParen) {
            return Err(ParseError::new(
                "malformed sensitivity list: expected '(', '*', or a signal after '@'",
                self.current_offset(),
            ));
        }
        self.advance(); // (

        let mut triggers = Vec::new();
        let mut parts: Vec<String> = Vec::new();
        loop {
            match self.current() {
                VerilogToken::Star => {
                    triggers.push(Trigger::StarImplicit);
                    parts.push("*".to_string());
                    self.advance();
                }
                VerilogToken::Posedge | VerilogToken::Negedge => {
                    let is_pos = self.at(VerilogToken::Posedge);
                    self.advance();
                    if !self.current().is_ident() {
                        return Err(ParseError::new(
                            "malformed sensitivity list: expected signal after edge keyword",
                            self.current_offset(),
                        ));
                    }
                    let sig = self.interner.get_or_intern(self.current_text());
                    parts.push(format!(
                        "{} {}",
                        if is_pos { "posedge" } else { "negedge" },
                        self.current_text()
                    ));
                    triggers.push(if is_pos {
                        Trigger::EdgePos(sig)
                    } else {
                        Trigger::EdgeNeg(sig)
                    });
                    self.advance();
                }
                VerilogToken::Identifier | VerilogToken::EscapedIdentifier => {
                    let sig = self.interner.get_or_intern(self.current_text());
                    parts.push(self.current_text().to_string());
                    triggers.push(Trigger::Level(sig));
                    self.advance();
                }
                _ => {
                    return Err(ParseError::new(
                        "malformed sensitivity list",
                        self.current_offset(),
                    ));
                }
            }

            match self.current() {
                VerilogToken::Comma | VerilogToken::Or => {
                    self.advance();
                }
                VerilogToken::RightParen => {
                    self.advance();
                    break;
                }
                _ => {
                    return Err(ParseError::new(
                        "malformed sensitivity list: expected ',', 'or', or ')'",
                        self.current_offset(),
                    ));
                }
            }
        }
        if triggers.is_empty() {
            return Err(ParseError::new(
                "malformed sensitivity list: empty '@()'",
                self.current_offset(),
            ));
        }
        Ok((triggers, parts.join(", ")))
    }

    /// Parses an embedded `@...` event control and advances the anchor.
    fn embedded_event(&mut self) -> Result<(), ParseError> {
        let (_, desc) = self.parse_sensitivity()?;
        self.embedded_events.push(desc);
        self.anchor = self.embedded_events.len() as u32;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Statement scanning
    // ------------------------------------------------------------------

    fn scan_statement(&mut self) -> Result<(), ParseError> {
        match self.current() {
            VerilogToken::Begin => self.scan_block(VerilogToken::End, "'begin'"),
            VerilogToken::Fork => self.scan_block(VerilogToken::Join, "'fork'"),
            VerilogToken::If => {
                self.advance();
                self.reads_in_parens()?;
                self.scan_statement()?;
                if self.eat(VerilogToken::Else) {
                    self.scan_statement()?;
                }
                Ok(())
            }
            VerilogToken::While | VerilogToken::Repeat => {
                self.advance();
                self.reads_in_parens()?;
                if self.eat(VerilogToken::Semicolon) {
                    Ok(())
                } else {
                    self.scan_statement()
                }
            }
            VerilogToken::For => {
                self.advance();
                self.scan_for_header()?;
                if self.eat(VerilogToken::Semicolon) {
                    Ok(())
                } else {
                    self.scan_statement()
                }
            }
            VerilogToken::Forever => {
                self.advance();
                self.scan_statement()
            }
            VerilogToken::Case | VerilogToken::Casex | VerilogToken::Casez => self.scan_case(),
            VerilogToken::At => {
                self.embedded_event()?;
                if self.eat(VerilogToken::Semicolon) {
                    Ok(())
                } else {
                    self.scan_statement()
                }
            }
            VerilogToken::Wait => {
                self.advance();
                // wait(...) blocks at a fresh anchor; its guard is
                // re-evaluated there, so the guard reads carry the new anchor.
                self.embedded_events.push("wait".to_string());
                self.anchor = self.embedded_events.len() as u32;
                self.reads_in_parens()?;
                if self.eat(VerilogToken::Semicolon) {
                    Ok(())
                } else {
                    self.scan_statement()
                }
            }
            VerilogToken::Hash => {
                self.advance();
                // Delay expressions never name runtime signals we model.
                if self.at(VerilogToken::LeftParen) {
                    self.skip_parens_silent()?;
                } else {
                    self.advance();
                }
                if self.eat(VerilogToken::Semicolon) {
                    Ok(())
                } else {
                    self.scan_statement()
                }
            }
            VerilogToken::Disable => {
                self.advance();
                if self.current().is_ident() {
                    self.advance();
                }
                self.eat(VerilogToken::Semicolon);
                Ok(())
            }
            VerilogToken::Assert => {
                self.advance();
                if self.at(VerilogToken::LeftParen) {
                    self.reads_in_parens()?;
                }
                if self.eat(VerilogToken::Semicolon) {
                    Ok(())
                } else if self.eat(VerilogToken::Else) {
                    self.scan_statement()
                } else {
                    self.scan_statement()?;
                    if self.eat(VerilogToken::Else) {
                        self.scan_statement()?;
                    }
                    Ok(())
                }
            }
            VerilogToken::SystemIdentifier => {
                self.advance();
                if self.at(VerilogToken::LeftParen) {
                    self.reads_in_parens()?;
                }
                self.eat(VerilogToken::Semicolon);
                Ok(())
            }
            kind if kind.is_net_type() => {
                self.scan_local_decl();
                Ok(())
            }
            VerilogToken::PlusPlus | VerilogToken::MinusMinus => {
                // Prefix increment/decrement.
                self.advance();
                if self.current().is_ident() {
                    let span = self.current_span();
                    let sig = self.interner.get_or_intern(self.current_text());
                    self.advance();
                    self.read(sig, span);
                    self.write(sig, AssignKind::Blocking, span);
                }
                self.eat(VerilogToken::Semicolon);
                Ok(())
            }
            VerilogToken::Identifier | VerilogToken::EscapedIdentifier => {
                self.scan_assignment_or_call()
            }
            VerilogToken::Semicolon => {
                self.advance();
                Ok(())
            }
            VerilogToken::End | VerilogToken::Join | VerilogToken::Endcase => {
                // Left for the enclosing block scanner.
                Ok(())
            }
            VerilogToken::Eof => Ok(()),
            _ => {
                self.advance();
                Ok(())
            }
        }
    }

    fn scan_block(&mut self, terminator: VerilogToken, opener: &str) -> Result<(), ParseError> {
        let open_offset = self.current_offset();
        self.advance(); // begin/fork
        if self.at(VerilogToken::Colon) && self.peek_kind(1).is_ident() {
            self.advance();
            self.advance();
        }
        while !self.at(terminator) {
            if self.at_end() {
                return Err(ParseError::new(
                    format!("unbalanced {opener}"),
                    open_offset,
                ));
            }
            let before = self.pos;
            self.scan_statement()?;
            if self.pos == before {
                self.advance();
            }
        }
        self.advance(); // end/join
        if self.at(VerilogToken::Colon) && self.peek_kind(1).is_ident() {
            self.advance();
            self.advance();
        }
        Ok(())
    }

    fn scan_case(&mut self) -> Result<(), ParseError> {
        let open_offset = self.current_offset();
        self.advance(); // case/casex/casez
        self.reads_in_parens()?;
        loop {
            match self.current() {
                VerilogToken::Endcase => {
                    self.advance();
                    return Ok(());
                }
                VerilogToken::Eof => {
                    return Err(ParseError::new("unbalanced 'case'", open_offset));
                }
                VerilogToken::Default => {
                    self.advance();
                    self.eat(VerilogToken::Colon);
                    self.scan_statement()?;
                }
                _ => {
                    // Case item: pattern {, pattern} : statement. Pattern
                    // identifiers are compared against the subject — reads.
                    let mut depth = 0i32;
                    loop {
                        match self.current() {
                            VerilogToken::LeftParen
                            | VerilogToken::LeftBracket
                            | VerilogToken::LeftBrace => depth += 1,
                            VerilogToken::RightParen
                            | VerilogToken::RightBracket
                            | VerilogToken::RightBrace => depth -= 1,
                            VerilogToken::Colon if depth == 0 => {
                                self.advance();
                                break;
                            }
                            VerilogToken::Identifier | VerilogToken::EscapedIdentifier => {
                                let sig = self.interner.get_or_intern(self.current_text());
                                let span = self.current_span();
                                self.read(sig, span);
                            }
                            VerilogToken::Endcase | VerilogToken::Eof => {
                                self.error("malformed case item");
                                break;
                            }
                            _ => {}
                        }
                        self.advance();
                    }
                    if !self.at(VerilogToken::Endcase) && !self.at_end() {
                        self.scan_statement()?;
                    }
                }
            }
        }
    }

    /// Harvests reads from a parenthesized guard expression.
    fn reads_in_parens(&mut self) -> Result<(), ParseError> {
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
                VerilogToken::Identifier | VerilogToken::EscapedIdentifier => {
                    let sig = self.interner.get_or_intern(self.current_text());
                    let span = self.current_span();
                    self.read(sig, span);
                }
                VerilogToken::Eof => {
                    return Err(ParseError::new("unbalanced '('", open_offset));
                }
                _ => {}
            }
            self.advance();
        }
    }

    fn skip_parens_silent(&mut self) -> Result<(), ParseError> {
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

    /// Scans a `for (init; cond; step)` header, classifying assignments in
    /// the init/step sections and reads everywhere else.
    fn scan_for_header(&mut self) -> Result<(), ParseError> {
        if !self.at(VerilogToken::LeftParen) {
            self.error("expected '(' after 'for'");
            return Ok(());
        }
        let open_offset = self.current_offset();
        let mut depth = 0i32;
        loop {
            match self.current() {
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
                VerilogToken::Identifier | VerilogToken::EscapedIdentifier => {
                    let sig = self.interner.get_or_intern(self.current_text());
                    let span = self.current_span();
                    self.advance();
                    match self.current() {
                        VerilogToken::Equals => {
                            self.advance();
                            self.write(sig, AssignKind::Blocking, span);
                        }
                        kind if kind.is_compound_assign() => {
                            self.advance();
                            self.read(sig, span);
                            self.write(sig, AssignKind::Blocking, span);
                        }
                        VerilogToken::PlusPlus | VerilogToken::MinusMinus => {
                            self.advance();
                            self.read(sig, span);
                            self.write(sig, AssignKind::Blocking, span);
                        }
                        _ => self.read(sig, span),
                    }
                }
                VerilogToken::PlusPlus | VerilogToken::MinusMinus => {
                    self.advance();
                    if self.current().is_ident() {
                        let sig = self.interner.get_or_intern(self.current_text());
                        let span = self.current_span();
                        self.advance();
                        self.read(sig, span);
                        self.write(sig, AssignKind::Blocking, span);
                    }
                }
                VerilogToken::Eof => {
                    return Err(ParseError::new("unbalanced '('", open_offset));
                }
                _ => self.advance(),
            }
        }
    }

    /// Scans a local declaration (`integer i;`, `reg tmp = 0;`) inside a
    /// process body.
    fn scan_local_decl(&mut self) {
        let kind = match self.current() {
            VerilogToken::Reg | VerilogToken::Logic => NetKind::Reg,
            VerilogToken::Integer | VerilogToken::Int => NetKind::Int,
            VerilogToken::Real => NetKind::Real,
            _ => NetKind::Wire,
        };
        self.advance();
        if self.at(VerilogToken::LeftBracket) {
            let mut depth = 0i32;
            loop {
                match self.current() {
                    VerilogToken::LeftBracket => depth += 1,
                    VerilogToken::RightBracket => {
                        depth -= 1;
                        if depth == 0 {
                            self.advance();
                            break;
                        }
                    }
                    VerilogToken::Eof => return,
                    _ => {}
                }
                self.advance();
            }
        }
        loop {
            match self.current() {
                VerilogToken::Identifier | VerilogToken::EscapedIdentifier => {
                    let sig = self.interner.get_or_intern(self.current_text());
                    self.locals.push((sig, kind));
                    self.advance();
                    if self.eat(VerilogToken::Equals) {
                        // Initializer runs at process entry; harvest reads.
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
                                VerilogToken::Identifier | VerilogToken::EscapedIdentifier => {
                                    let init_sig =
                                        self.interner.get_or_intern(self.current_text());
                                    let span = self.current_span();
                                    self.read(init_sig, span);
                                }
                                VerilogToken::Eof => return,
                                _ => {}
                            }
                            self.advance();
                        }
                    }
                }
                VerilogToken::Comma => self.advance(),
                VerilogToken::Semicolon => {
                    self.advance();
                    return;
                }
                _ => {
                    self.advance();
                    if self.at_end() {
                        return;
                    }
                }
            }
        }
    }

    /// Scans a statement starting with an identifier: an assignment, an
    /// increment/decrement, or a task enable.
    fn scan_assignment_or_call(&mut self) -> Result<(), ParseError> {
        let lhs_span = self.current_span();
        let lhs = self.interner.get_or_intern(self.current_text());
        self.advance();

        // Bit/part selects and hierarchical suffixes reduce to the base name;
        // select indices are reads.
        loop {
            if self.at(VerilogToken::LeftBracket) {
                self.reads_in_brackets();
            } else if self.at(VerilogToken::Dot) && self.peek_kind(1).is_ident() {
                self.advance();
                self.advance();
            } else {
                break;
            }
        }

        match self.current() {
            VerilogToken::Equals => {
                self.advance();
                self.write(lhs, AssignKind::Blocking, lhs_span);
                self.scan_rhs();
                Ok(())
            }
            VerilogToken::LessEquals => {
                self.advance();
                self.write(lhs, AssignKind::NonBlocking, lhs_span);
                self.scan_rhs();
                Ok(())
            }
            kind if kind.is_compound_assign() => {
                self.advance();
                self.read(lhs, lhs_span);
                self.write(lhs, AssignKind::Blocking, lhs_span);
                self.scan_rhs();
                Ok(())
            }
            VerilogToken::PlusPlus | VerilogToken::MinusMinus => {
                self.advance();
                self.read(lhs, lhs_span);
                self.write(lhs, AssignKind::Blocking, lhs_span);
                self.eat(VerilogToken::Semicolon);
                Ok(())
            }
            VerilogToken::LeftParen => {
                // Task enable: arguments are reads.
                self.reads_in_parens()?;
                self.eat(VerilogToken::Semicolon);
                Ok(())
            }
            VerilogToken::Semicolon => {
                self.advance();
                Ok(())
            }
            _ => {
                // Unmodeled statement; consume to the boundary.
                self.scan_rhs();
                Ok(())
            }
        }
    }

    /// Harvests reads until the terminating `;` (consumed).
    fn scan_rhs(&mut self) {
        let mut depth = 0i32;
        loop {
            match self.current() {
                VerilogToken::LeftParen
                | VerilogToken::LeftBracket
                | VerilogToken::LeftBrace => depth += 1,
                VerilogToken::RightParen
                | VerilogToken::RightBracket
                | VerilogToken::RightBrace => depth -= 1,
                VerilogToken::Semicolon if depth <= 0 => {
                    self.advance();
                    return;
                }
                VerilogToken::Identifier | VerilogToken::EscapedIdentifier => {
                    let sig = self.interner.get_or_intern(self.current_text());
                    let span = self.current_span();
                    self.read(sig, span);
                }
                VerilogToken::Hash => {
                    // Intra-assignment delay: skip the delay value.
                    self.advance();
                    if self.at(VerilogToken::LeftParen) {
                        let _ = self.skip_parens_silent();
                    } else {
                        self.advance();
                    }
                    continue;
                }
                VerilogToken::Eof => {
                    self.error("missing ';'");
                    return;
                }
                _ => {}
            }
            self.advance();
        }
    }

    /// Harvests reads from a bracketed select expression.
    fn reads_in_brackets(&mut self) {
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
                VerilogToken::Identifier | VerilogToken::EscapedIdentifier => {
                    let sig = self.interner.get_or_intern(self.current_text());
                    let span = self.current_span();
                    self.read(sig, span);
                }
                VerilogToken::Eof => return,
                _ => {}
            }
            self.advance();
        }
    }
}
