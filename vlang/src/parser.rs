pub mod ast;
mod verilog_parser;

pub use verilog_parser::VerilogParser;
