use super::{KeywordKind, Lexer, LexerError, LexerErrorKind, PunctuatorKind, SourceSpan, Token};
use logos::{Filter, Logos, Skip};

/// Causes lexer to consume and ignore multi-line comments (/* */)
fn consume_block_comment(lex: &mut logos::Lexer<TokenKind>) -> Filter<()> {
	match lex.remainder().find("*/") {
		Some(offset) => {
			lex.bump(offset + 2);
			Filter::Skip
		},
		None => {
			let span = lex.span();
			lex.extras.last_err = Some(LexerError {
				range: SourceSpan::new(span.start, lex.remainder().len() + span.end - span.start),
				kind: LexerErrorKind::UnterminatedBlockComment,
			});
			lex.bump(lex.remainder().len());
			Filter::Emit(())
		},
	}
}

/// Causes lexer to consume and ignore single-line comments (//)
fn consume_line_comment(lex: &mut logos::Lexer<TokenKind>) -> Skip {
	match lex.remainder().find('\n') {
		Some(offset) => lex.bump(offset + 1),
		None => lex.bump(lex.remainder().len()),
	}
	Skip
}

/// Consumes the rest of a directive line, following `\` line continuations
fn consume_directive_line(lex: &mut logos::Lexer<TokenKind>) {
	let rest = lex.remainder();
	let mut end = rest.len();
	let mut search_from = 0;
	while let Some(offset) = rest[search_from..].find('\n') {
		let newline = search_from + offset;
		if rest[..newline].trim_end_matches('\r').ends_with('\\') {
			search_from = newline + 1;
			continue;
		}
		end = newline;
		break;
	}
	lex.bump(end);
}

/// Consumes the single macro name following a directive
fn consume_directive_argument(lex: &mut logos::Lexer<TokenKind>) {
	let rest = lex.remainder();
	let trimmed = rest.trim_start_matches(|c: char| c == ' ' || c == '\t');
	let name_len = trimmed
		.find(|c: char| !(c.is_ascii_alphanumeric() || c == '_' || c == '$'))
		.unwrap_or(trimmed.len());
	lex.bump(rest.len() - trimmed.len() + name_len);
}

/// Skips compiler directives, macro usages are kept as tokens
fn consume_directive(lex: &mut logos::Lexer<TokenKind>) -> Filter<()> {
	match &lex.slice()[1..] {
		"define" | "include" | "timescale" | "line" | "pragma" | "unconnected_drive" | "begin_keywords" => {
			consume_directive_line(lex);
			Filter::Skip
		},
		"ifdef" | "ifndef" | "elsif" | "undef" | "default_nettype" => {
			consume_directive_argument(lex);
			Filter::Skip
		},
		"else" | "endif" | "resetall" | "celldefine" | "endcelldefine" | "nounconnected_drive" | "end_keywords" => {
			Filter::Skip
		},
		_ => Filter::Emit(()),
	}
}

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(extras = LogosLexerContext)]
#[logos(skip r"[ \t\r\n\f\x{FEFF}]+")]
pub enum TokenKind {
	#[token("/*", consume_block_comment)]
	#[token("//", consume_line_comment)]
	Ignored,

	/// Usage of a text macro (`` `WIDTH ``)
	#[regex(r"`[a-zA-Z_][a-zA-Z0-9_]*", consume_directive)]
	Macro,

	#[regex(r"[a-zA-Z_][a-zA-Z0-9_$]*")]
	#[regex(r"\\[^ \t\r\n\f]+")]
	Id,

	#[regex(r"\$[a-zA-Z0-9_$]+")]
	SystemId,

	#[regex(r"[0-9][0-9_]*")]
	#[regex(r"([0-9][0-9_]*)?'[sS]?[bBoOdDhH][ \t]*[0-9a-fA-FxXzZ?_]+")]
	#[regex(r"'[01xXzZ]")]
	#[regex(r"[0-9][0-9_]*\.[0-9][0-9_]*([eE][+-]?[0-9][0-9_]*)?")]
	#[regex(r"[0-9][0-9_]*[eE][+-]?[0-9][0-9_]*")]
	Number,

	#[regex(r#""([^"\\\n]|\\.)*""#)]
	String,

	#[token("always",       |_| KeywordKind::Always)]
	#[token("assign",       |_| KeywordKind::Assign)]
	#[token("begin",        |_| KeywordKind::Begin)]
	#[token("case",         |_| KeywordKind::Case)]
	#[token("casex",        |_| KeywordKind::Casex)]
	#[token("casez",        |_| KeywordKind::Casez)]
	#[token("default",      |_| KeywordKind::Default)]
	#[token("else",         |_| KeywordKind::Else)]
	#[token("end",          |_| KeywordKind::End)]
	#[token("endcase",      |_| KeywordKind::Endcase)]
	#[token("endfunction",  |_| KeywordKind::Endfunction)]
	#[token("endgenerate",  |_| KeywordKind::Endgenerate)]
	#[token("endmodule",    |_| KeywordKind::Endmodule)]
	#[token("endtask",      |_| KeywordKind::Endtask)]
	#[token("for",          |_| KeywordKind::For)]
	#[token("function",     |_| KeywordKind::Function)]
	#[token("generate",     |_| KeywordKind::Generate)]
	#[token("genvar",       |_| KeywordKind::Genvar)]
	#[token("if",           |_| KeywordKind::If)]
	#[token("initial",      |_| KeywordKind::Initial)]
	#[token("inout",        |_| KeywordKind::Inout)]
	#[token("input",        |_| KeywordKind::Input)]
	#[token("integer",      |_| KeywordKind::Integer)]
	#[token("localparam",   |_| KeywordKind::Localparam)]
	#[token("macromodule",  |_| KeywordKind::Macromodule)]
	#[token("module",       |_| KeywordKind::Module)]
	#[token("output",       |_| KeywordKind::Output)]
	#[token("parameter",    |_| KeywordKind::Parameter)]
	#[token("reg",          |_| KeywordKind::Reg)]
	#[token("signed",       |_| KeywordKind::Signed)]
	#[token("task",         |_| KeywordKind::Task)]
	#[token("wire",         |_| KeywordKind::Wire)]
	#[token("and",          |_| KeywordKind::Gate)]
	#[token("nand",         |_| KeywordKind::Gate)]
	#[token("or",           |_| KeywordKind::Gate)]
	#[token("nor",          |_| KeywordKind::Gate)]
	#[token("xor",          |_| KeywordKind::Gate)]
	#[token("xnor",         |_| KeywordKind::Gate)]
	#[token("not",          |_| KeywordKind::Gate)]
	#[token("buf",          |_| KeywordKind::Gate)]
	#[token("bufif0",       |_| KeywordKind::Gate)]
	#[token("bufif1",       |_| KeywordKind::Gate)]
	#[token("notif0",       |_| KeywordKind::Gate)]
	#[token("notif1",       |_| KeywordKind::Gate)]
	#[token("pullup",       |_| KeywordKind::Gate)]
	#[token("pulldown",     |_| KeywordKind::Gate)]
	Keyword(KeywordKind),

	#[token("=",   |_| PunctuatorKind::Assignment)]
	#[token("*",   |_| PunctuatorKind::Asterisk)]
	#[token("@",   |_| PunctuatorKind::At)]
	#[token("&",   |_| PunctuatorKind::BitwiseAnd)]
	#[token("~",   |_| PunctuatorKind::BitwiseNot)]
	#[token("|",   |_| PunctuatorKind::BitwiseOr)]
	#[token("^",   |_| PunctuatorKind::BitwiseXor)]
	#[token(":",   |_| PunctuatorKind::Colon)]
	#[token(",",   |_| PunctuatorKind::Comma)]
	#[token(".",   |_| PunctuatorKind::Dot)]
	#[token("==",  |_| PunctuatorKind::Equals)]
	#[token("===", |_| PunctuatorKind::CaseEquals)]
	#[token(">",   |_| PunctuatorKind::Greater)]
	#[token(">=",  |_| PunctuatorKind::GreaterEqual)]
	#[token("#",   |_| PunctuatorKind::Hash)]
	#[token("{",   |_| PunctuatorKind::LBrace)]
	#[token("[",   |_| PunctuatorKind::LBracket)]
	#[token("<",   |_| PunctuatorKind::Less)]
	#[token("<=",  |_| PunctuatorKind::LessEqual)]
	#[token("&&",  |_| PunctuatorKind::LogicalAnd)]
	#[token("!",   |_| PunctuatorKind::LogicalNot)]
	#[token("||",  |_| PunctuatorKind::LogicalOr)]
	#[token("(",   |_| PunctuatorKind::LPar)]
	#[token("<<",  |_| PunctuatorKind::LShift)]
	#[token("<<<", |_| PunctuatorKind::ArithLShift)]
	#[token("-",   |_| PunctuatorKind::Minus)]
	#[token("-:",  |_| PunctuatorKind::MinusColon)]
	#[token("->",  |_| PunctuatorKind::Arrow)]
	#[token("%",   |_| PunctuatorKind::Modulo)]
	#[token("!=",  |_| PunctuatorKind::NotEquals)]
	#[token("!==", |_| PunctuatorKind::CaseNotEquals)]
	#[token("+",   |_| PunctuatorKind::Plus)]
	#[token("+:",  |_| PunctuatorKind::PlusColon)]
	#[token("**",  |_| PunctuatorKind::Power)]
	#[token("?",   |_| PunctuatorKind::QuestionMark)]
	#[token("'",   |_| PunctuatorKind::Apostrophe)]
	#[token("}",   |_| PunctuatorKind::RBrace)]
	#[token("]",   |_| PunctuatorKind::RBracket)]
	#[token(")",   |_| PunctuatorKind::RPar)]
	#[token(">>",  |_| PunctuatorKind::RShift)]
	#[token(">>>", |_| PunctuatorKind::ArithRShift)]
	#[token(";",   |_| PunctuatorKind::Semicolon)]
	#[token("/",   |_| PunctuatorKind::Slash)]
	#[token("::",  |_| PunctuatorKind::DoubleColon)]
	Punctuator(PunctuatorKind),
}

/// Additional data accessed by the token callbacks
///
/// This struct is not contained in LogosLexer, but is
/// passed as an extra to logos::Lexer and hence owned
/// by it.
#[derive(Default)]
pub struct LogosLexerContext {
	/// Last lexing error (written by custom token parsing functions)
	pub last_err: Option<LexerError>,
}

/// Logos-based lexer implementation
pub struct LogosLexer<'source> {
	lexer: logos::Lexer<'source, TokenKind>,
}

/// Lexer implementation based on logos <3
impl<'source> Lexer<'source> for LogosLexer<'source> {
	/// Creates a new lexer given a source code string
	fn new(source: &'source str) -> Self {
		LogosLexer {
			lexer: TokenKind::lexer_with_extras(source, LogosLexerContext::default()),
		}
	}

	/// Processes the string and produces a vector of tokens
	///
	/// Fails on the first lexing error.
	fn process(&mut self) -> Result<Vec<Token>, LexerError> {
		let (tokens, errors) = self.process_recovering();
		match errors.into_iter().next() {
			Some(err) => Err(err),
			None => Ok(tokens),
		}
	}
}

impl<'source> LogosLexer<'source> {
	/// Processes the whole string, skipping over characters that do not
	/// form a token
	///
	/// Returns all valid tokens together with the errors encountered.
	pub fn process_recovering(&mut self) -> (Vec<Token>, Vec<LexerError>) {
		let mut tokens = Vec::<Token>::with_capacity(self.lexer.source().len() / 4);
		let mut errors = vec![];

		while let Some(token_result) = self.lexer.next() {
			match token_result {
				Ok(TokenKind::Ignored) => {
					if let Some(err) = self.lexer.extras.last_err.take() {
						errors.push(err);
					}
				},
				Ok(token_kind) => tokens.push(Token {
					kind: token_kind,
					range: SourceSpan::new_from_range(&self.lexer.span()),
				}),
				Err(_) => errors.push(self.lexer.extras.last_err.take().unwrap_or(LexerError {
					kind: LexerErrorKind::InvalidToken,
					range: SourceSpan::new_from_range(&self.lexer.span()),
				})),
			}
		}

		(tokens, errors)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	fn kinds(source: &str) -> Vec<TokenKind> {
		LogosLexer::new(source)
			.process()
			.unwrap()
			.into_iter()
			.map(|t| t.kind)
			.collect()
	}

	#[test]
	fn test_keywords_and_identifiers() {
		use KeywordKind::*;
		assert_eq!(
			kinds("module modules endmodule input_a"),
			vec![
				TokenKind::Keyword(Module),
				TokenKind::Id,
				TokenKind::Keyword(Endmodule),
				TokenKind::Id
			]
		);
	}

	#[rstest]
	#[case("8'hFF")]
	#[case("'b1010")]
	#[case("4'sd 3")]
	#[case("1_000")]
	#[case("3.14")]
	#[case("1e-9")]
	#[case("'x")]
	fn test_numbers(#[case] source: &str) {
		assert_eq!(kinds(source), vec![TokenKind::Number]);
	}

	#[test]
	fn test_special_identifiers() {
		assert_eq!(
			kinds("\\bus[0] $display a$b"),
			vec![TokenKind::Id, TokenKind::SystemId, TokenKind::Id]
		);
	}

	#[test]
	fn test_comments_and_directives() {
		let source = "`timescale 1ns/1ps\n\
			`define W \\\n 8\n\
			`ifdef SIM /* block */ wire // line\n\
			`endif\n\
			`W";
		assert_eq!(
			kinds(source),
			vec![TokenKind::Keyword(KeywordKind::Wire), TokenKind::Macro]
		);
	}

	#[test]
	fn test_token_ranges() {
		let tokens = LogosLexer::new("  a <= 1;").process().unwrap();
		assert_eq!(tokens.len(), 4);
		assert_eq!(tokens[1].kind, TokenKind::Punctuator(PunctuatorKind::LessEqual));
		assert_eq!(tokens[1].range, SourceSpan::new(4, 2));
	}

	#[test]
	fn test_invalid_token() {
		let err = LogosLexer::new("wire a; \u{00a7}").process().unwrap_err();
		assert_eq!(err.kind, LexerErrorKind::InvalidToken);
		assert_eq!(err.range.start(), 8);
	}

	#[test]
	fn test_recovering_keeps_tokens() {
		let (tokens, errors) = LogosLexer::new("input \u{00a0}y; \u{00a7} wire").process_recovering();
		let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
		assert_eq!(
			kinds,
			vec![
				TokenKind::Keyword(KeywordKind::Input),
				TokenKind::Id,
				TokenKind::Punctuator(PunctuatorKind::Semicolon),
				TokenKind::Keyword(KeywordKind::Wire),
			]
		);
		let offsets: Vec<_> = errors.iter().map(|e| (e.kind, e.range.start())).collect();
		assert_eq!(
			offsets,
			vec![(LexerErrorKind::InvalidToken, 6), (LexerErrorKind::InvalidToken, 11)]
		);
	}

	#[test]
	fn test_byte_order_mark_skipped() {
		assert_eq!(
			kinds("\u{feff}module m;"),
			vec![
				TokenKind::Keyword(KeywordKind::Module),
				TokenKind::Id,
				TokenKind::Punctuator(PunctuatorKind::Semicolon),
			]
		);
	}

	#[test]
	fn test_unterminated_block_comment() {
		let err = LogosLexer::new("wire /* never closed").process().unwrap_err();
		assert_eq!(err.kind, LexerErrorKind::UnterminatedBlockComment);
		assert_eq!(err.range, SourceSpan::new(5, 15));
	}
}
