mod diagnostic;
mod logos_lexer;

use crate::SourceSpan;
use std::fmt;
use thiserror::Error;

pub use logos_lexer::{LogosLexer, LogosLexerContext};

/// Lexer token type
/// In this case, it's defined by the Logos-based lexer implementation.
pub type TokenKind = logos_lexer::TokenKind;

/// Types of lexer errors
#[derive(Copy, Clone, Error, Debug, PartialEq, Eq)]
pub enum LexerErrorKind {
	/// Lexer couldn't match token to any regex
	#[error("Invalid token")]
	InvalidToken,

	/// Unterminated block comment
	#[error("Unterminated block comment")]
	UnterminatedBlockComment,
}

/// Lexer error
#[derive(Copy, Clone, Error, Debug)]
pub struct LexerError {
	pub range: SourceSpan,
	pub kind: LexerErrorKind,
}

impl fmt::Display for LexerError {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "{}", self.kind)
	}
}

/// Keywords the structure parser cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeywordKind {
	Always,
	Assign,
	Begin,
	Case,
	Casex,
	Casez,
	Default,
	Else,
	End,
	Endcase,
	Endfunction,
	Endgenerate,
	Endmodule,
	Endtask,
	For,
	Function,
	Generate,
	Genvar,
	If,
	Initial,
	Inout,
	Input,
	Integer,
	Localparam,
	Macromodule,
	Module,
	Output,
	Parameter,
	Reg,
	Signed,
	Task,
	Wire,

	/// Built-in gate primitive (`and`, `nand`, `buf`, ...)
	Gate,
}

/// All punctuators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PunctuatorKind {
	Apostrophe,     // '
	Arrow,          // ->
	Assignment,     // =
	Asterisk,       // *
	At,             // @
	BitwiseAnd,     // &
	BitwiseNot,     // ~
	BitwiseOr,      // |
	BitwiseXor,     // ^
	Colon,          // :
	Comma,          // ,
	Dot,            // .
	DoubleColon,    // ::
	Equals,         // ==
	CaseEquals,     // ===
	Greater,        // >
	GreaterEqual,   // >=
	Hash,           // #
	LBrace,         // {
	LBracket,       // [
	Less,           // <
	LessEqual,      // <=
	LogicalAnd,     // &&
	LogicalNot,     // !
	LogicalOr,      // ||
	LPar,           // (
	LShift,         // <<
	ArithLShift,    // <<<
	Minus,          // -
	MinusColon,     // -:
	Modulo,         // %
	NotEquals,      // !=
	CaseNotEquals,  // !==
	Plus,           // +
	PlusColon,      // +:
	Power,          // **
	QuestionMark,   // ?
	RBrace,         // }
	RBracket,       // ]
	RPar,           // )
	RShift,         // >>
	ArithRShift,    // >>>
	Semicolon,      // ;
	Slash,          // /
}

/// Token as produced by the lexer (token kind + source location)
#[derive(Debug, Copy, Clone)]
pub struct Token {
	/// Type of the token
	pub kind: TokenKind,

	/// Source code location
	pub range: SourceSpan,
}

/// Abstract lexer
pub trait Lexer<'source> {
	/// Creates a lexer for provided source code
	fn new(source: &'source str) -> Self;

	/// Processes the text and returns a vector of tokens
	fn process(&mut self) -> Result<Vec<Token>, LexerError>;
}
