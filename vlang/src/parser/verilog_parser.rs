use log::debug;
use vdesign::PortDirection;

use super::ast::*;
use crate::lexer::{KeywordKind, PunctuatorKind, Token, TokenKind};
use crate::SourceSpan;

/// Structure-only Verilog parser
///
/// Recognizes module declarations, port declarations, module instantiations
/// and the blocks they may be nested in. Everything else is skipped token by
/// token, so the parser never fails on constructs it does not understand.
pub struct VerilogParser<'source> {
	source: &'source str,
	tokens: Vec<Token>,
	pos: usize,
}

fn direction_of(kind: TokenKind) -> Option<PortDirection> {
	match kind {
		TokenKind::Keyword(KeywordKind::Input) => Some(PortDirection::Input),
		TokenKind::Keyword(KeywordKind::Output) => Some(PortDirection::Output),
		TokenKind::Keyword(KeywordKind::Inout) => Some(PortDirection::Inout),
		_ => None,
	}
}

fn is_module_boundary(kind: TokenKind) -> bool {
	use KeywordKind::*;
	matches!(kind, TokenKind::Keyword(Module | Macromodule | Endmodule))
}

impl<'source> VerilogParser<'source> {
	pub fn new(source: &'source str, tokens: Vec<Token>) -> Self {
		Self { source, tokens, pos: 0 }
	}

	pub fn parse(mut self) -> SourceText {
		let mut modules = vec![];
		while let Some(kind) = self.peek_kind(0) {
			match kind {
				TokenKind::Keyword(KeywordKind::Module | KeywordKind::Macromodule) => {
					modules.push(self.parse_module());
				},
				_ => self.advance(),
			}
		}

		SourceText {
			modules,
			location: SourceSpan::new(0, self.source.len()),
		}
	}

	fn peek_kind(&self, n: usize) -> Option<TokenKind> {
		self.tokens.get(self.pos + n).map(|t| t.kind)
	}

	fn kind_at(&self, index: usize) -> Option<TokenKind> {
		self.tokens.get(index).map(|t| t.kind)
	}

	fn at(&self, kind: TokenKind) -> bool {
		self.peek_kind(0) == Some(kind)
	}

	fn at_punct(&self, punct: PunctuatorKind) -> bool {
		self.at(TokenKind::Punctuator(punct))
	}

	fn eat(&mut self, kind: TokenKind) -> bool {
		if self.at(kind) {
			self.advance();
			true
		}
		else {
			false
		}
	}

	fn eat_punct(&mut self, punct: PunctuatorKind) -> bool {
		self.eat(TokenKind::Punctuator(punct))
	}

	fn advance(&mut self) {
		if self.pos < self.tokens.len() {
			self.pos += 1;
		}
	}

	/// Span from the token at `start` to the last consumed token
	fn span_from(&self, start: usize) -> SourceSpan {
		self.span(start, self.pos)
	}

	fn span(&self, start: usize, end: usize) -> SourceSpan {
		let end = end.min(self.tokens.len());
		if start >= end {
			let offset = self.tokens.get(start).map_or(self.source.len(), |t| t.range.start());
			return SourceSpan::new(offset, 0);
		}
		self.tokens[start].range.join(&self.tokens[end - 1].range)
	}

	/// Reconstructs the text of tokens `start..end`
	fn text(&self, start: usize, end: usize) -> Option<Text> {
		let end = end.min(self.tokens.len());
		if start >= end {
			return None;
		}

		let text = self.tokens[start..end]
			.iter()
			.map(|t| &self.source[t.range.start()..t.range.end()])
			.collect();
		Some(Text {
			text,
			location: self.span(start, end),
		})
	}

	/// Skips a bracketed group starting at the current token
	///
	/// Returns the index of the closing token, or `None` when the group is
	/// not closed before the end of the module.
	fn skip_balanced(&mut self) -> Option<usize> {
		use PunctuatorKind::*;
		let mut depth = 0;
		while let Some(kind) = self.peek_kind(0) {
			match kind {
				TokenKind::Punctuator(LPar | LBracket | LBrace) => depth += 1,
				TokenKind::Punctuator(RPar | RBracket | RBrace) => {
					depth -= 1;
					if depth <= 0 {
						let close = self.pos;
						self.advance();
						return Some(close);
					}
				},
				kind if is_module_boundary(kind) => return None,
				_ => {},
			}
			self.advance();
		}
		None
	}

	/// Splits tokens `start..end` at commas that are not nested in brackets
	fn split_top_level(&self, start: usize, end: usize) -> Vec<(usize, usize)> {
		use PunctuatorKind::*;
		let mut segments = vec![];
		let mut depth = 0;
		let mut segment_start = start;
		for index in start..end {
			match self.tokens[index].kind {
				TokenKind::Punctuator(LPar | LBracket | LBrace) => depth += 1,
				TokenKind::Punctuator(RPar | RBracket | RBrace) => depth -= 1,
				TokenKind::Punctuator(Comma) if depth == 0 => {
					segments.push((segment_start, index));
					segment_start = index + 1;
				},
				_ => {},
			}
		}
		segments.push((segment_start, end));
		segments
	}

	/// Advances past the given keyword without leaving the module
	fn skip_past(&mut self, keyword: KeywordKind) {
		while let Some(kind) = self.peek_kind(0) {
			if is_module_boundary(kind) {
				return;
			}
			self.advance();
			if kind == TokenKind::Keyword(keyword) {
				return;
			}
		}
	}

	fn parse_module(&mut self) -> ModuleDeclaration {
		let start = self.pos;
		self.advance();

		let id = if self.at(TokenKind::Id) {
			self.advance();
			self.text(self.pos - 1, self.pos)
		}
		else {
			debug!("Module declaration without a name at offset {}", self.span_from(start).start());
			None
		};

		let mut parameter_port_list = None;
		if self.at_punct(PunctuatorKind::Hash) && self.peek_kind(1) == Some(TokenKind::Punctuator(PunctuatorKind::LPar)) {
			let hash = self.pos;
			self.advance();
			if let Some(close) = self.skip_balanced() {
				parameter_port_list = self.text(hash, close + 1);
			}
		}

		let port_declarations = if self.at_punct(PunctuatorKind::LPar) {
			self.parse_port_list()
		}
		else {
			vec![]
		};
		self.eat_punct(PunctuatorKind::Semicolon);

		let items = self.parse_items(None);
		self.eat(TokenKind::Keyword(KeywordKind::Endmodule));

		ModuleDeclaration {
			id,
			parameter_port_list,
			port_declarations,
			items,
			location: self.span_from(start),
		}
	}

	/// Parses an ANSI port list. Names following a declaration without
	/// their own direction keyword continue that declaration.
	fn parse_port_list(&mut self) -> Vec<PortDeclaration> {
		let open = self.pos;
		let close = match self.skip_balanced() {
			Some(close) => close,
			None => self.pos,
		};

		let mut declarations: Vec<PortDeclaration> = vec![];
		for (start, end) in self.split_top_level(open + 1, close) {
			let segment = match self.text(start, end) {
				Some(segment) => segment,
				None => continue,
			};

			match direction_of(self.tokens[start].kind) {
				Some(direction) => declarations.push(PortDeclaration {
					direction,
					declaration: segment,
				}),
				None => {
					if let Some(last) = declarations.last_mut() {
						last.declaration.text.push(',');
						last.declaration.text.push_str(&segment.text);
						last.declaration.location = last.declaration.location.join(&segment.location);
					}
				},
			}
		}
		declarations
	}

	fn parse_items(&mut self, terminator: Option<KeywordKind>) -> Vec<ModuleItem> {
		use KeywordKind::*;
		let mut items = vec![];
		while let Some(kind) = self.peek_kind(0) {
			match kind {
				TokenKind::Keyword(keyword) if Some(keyword) == terminator => break,
				kind if is_module_boundary(kind) => break,
				TokenKind::Keyword(Input | Output | Inout) => {
					items.push(ModuleItem::PortDeclaration(self.parse_port_declaration()));
				},
				TokenKind::Keyword(Begin) => items.push(ModuleItem::Block(self.parse_block(End))),
				TokenKind::Keyword(Generate) => items.push(ModuleItem::Block(self.parse_block(Endgenerate))),
				TokenKind::Keyword(Function) => self.skip_past(Endfunction),
				TokenKind::Keyword(Task) => self.skip_past(Endtask),
				TokenKind::Id => match self.parse_instantiation() {
					Some(instantiation) => items.push(ModuleItem::Instantiation(instantiation)),
					None => self.advance(),
				},
				_ => self.advance(),
			}
		}
		items
	}

	/// Parses a body-level port declaration up to the semicolon
	fn parse_port_declaration(&mut self) -> PortDeclaration {
		let start = self.pos;
		let direction = self.peek_kind(0).and_then(direction_of).unwrap_or(PortDirection::Input);
		while let Some(kind) = self.peek_kind(0) {
			if kind == TokenKind::Punctuator(PunctuatorKind::Semicolon) || is_module_boundary(kind) {
				break;
			}
			self.advance();
		}

		let declaration = self.text(start, self.pos).unwrap_or_else(|| Text {
			text: String::new(),
			location: self.span(start, start),
		});
		self.eat_punct(PunctuatorKind::Semicolon);
		PortDeclaration { direction, declaration }
	}

	fn parse_block(&mut self, end: KeywordKind) -> Block {
		let start = self.pos;
		self.advance();

		let mut label = None;
		if self.at_punct(PunctuatorKind::Colon) && self.peek_kind(1) == Some(TokenKind::Id) {
			self.advance();
			label = self.text(self.pos, self.pos + 1);
			self.advance();
		}

		let items = self.parse_items(Some(end));
		if self.eat(TokenKind::Keyword(end))
			&& end == KeywordKind::End
			&& self.at_punct(PunctuatorKind::Colon)
			&& self.peek_kind(1) == Some(TokenKind::Id)
		{
			self.advance();
			self.advance();
		}

		Block {
			label,
			items,
			location: self.span_from(start),
		}
	}

	/// Speculatively parses `module_name [#(...)] inst [range] (...) {, inst (...)};`
	/// starting at an identifier. On mismatch the position is restored.
	fn parse_instantiation(&mut self) -> Option<ModuleInstantiation> {
		let start = self.pos;
		let result = self.try_parse_instantiation(start);
		if result.is_none() {
			self.pos = start;
		}
		result
	}

	fn try_parse_instantiation(&mut self, start: usize) -> Option<ModuleInstantiation> {
		let module_id = self.text(start, start + 1)?;
		self.advance();

		let mut parameter_value_assignment = None;
		if self.eat_punct(PunctuatorKind::Hash) {
			if self.at_punct(PunctuatorKind::LPar) {
				let close = self.skip_balanced()?;
				parameter_value_assignment = self.text(start + 1, close + 1);
			}
			else if self.at(TokenKind::Number) || self.at(TokenKind::Id) {
				self.advance();
				parameter_value_assignment = self.text(start + 1, self.pos);
			}
			else {
				return None;
			}
		}

		let mut instances = vec![];
		loop {
			if !self.at(TokenKind::Id) {
				return None;
			}
			let instance_start = self.pos;
			self.advance();
			let name = self.text(instance_start, instance_start + 1)?;

			while self.at_punct(PunctuatorKind::LBracket) {
				self.skip_balanced()?;
			}

			if !self.at_punct(PunctuatorKind::LPar) {
				return None;
			}
			let open = self.pos;
			let close = self.skip_balanced()?;
			let (port_connection_list, connections) = self.parse_port_connections(open + 1, close);

			instances.push(ModuleInstance {
				name,
				port_connection_list,
				connections,
				location: self.span_from(instance_start),
			});

			if self.eat_punct(PunctuatorKind::Comma) {
				continue;
			}
			if self.eat_punct(PunctuatorKind::Semicolon) {
				break;
			}
			return None;
		}

		Some(ModuleInstantiation {
			module_id,
			parameter_value_assignment,
			instances,
			location: self.span_from(start),
		})
	}

	fn parse_port_connections(&self, start: usize, end: usize) -> (Option<Text>, Vec<PortConnection>) {
		let list = match self.text(start, end) {
			Some(list) => list,
			None => return (None, vec![]),
		};

		let connections = self
			.split_top_level(start, end)
			.into_iter()
			.map(|(s, e)| self.parse_port_connection(s, e))
			.collect();
		(Some(list), connections)
	}

	fn parse_port_connection(&self, start: usize, end: usize) -> PortConnection {
		use PunctuatorKind::*;
		let location = self.span(start, end);
		let token = |offset: usize| {
			if start + offset < end {
				self.kind_at(start + offset)
			}
			else {
				None
			}
		};

		if token(0) != Some(TokenKind::Punctuator(Dot)) {
			return PortConnection {
				port: None,
				expression: self.text(start, end),
				location,
			};
		}

		match token(1) {
			Some(TokenKind::Punctuator(Asterisk)) => PortConnection {
				port: self.text(start + 1, start + 2),
				expression: None,
				location,
			},
			Some(TokenKind::Id) => {
				let port = self.text(start + 1, start + 2);
				let expression = if token(2) == Some(TokenKind::Punctuator(LPar)) {
					let expr_end = if self.kind_at(end - 1) == Some(TokenKind::Punctuator(RPar)) {
						end - 1
					}
					else {
						end
					};
					self.text(start + 3, expr_end)
				}
				else {
					port.clone()
				};
				PortConnection {
					port,
					expression,
					location,
				}
			},
			_ => PortConnection {
				port: None,
				expression: self.text(start, end),
				location,
			},
		}
	}
}
