//! Declared return type of a method, as written.

use crate::tokenizer::TokenKind;
use crate::unit::Unit;

/// The trimmed return type text of the function declared at `function_token`.
///
/// The signature ends at the first `{` or `;` after the parameter list. The
/// return type is the text between the `:` that follows the parameter list
/// and that boundary. An empty string means no return type is declared.
pub fn return_type(unit: &Unit, function_token: usize) -> String {
    let Some(open_paren) = unit.find_next(TokenKind::OpenParen, function_token, None) else {
        return String::new();
    };
    let Some(close_paren) = unit.matching_close(open_paren) else {
        return String::new();
    };
    let Some(boundary) = unit.find_next_of(
        &[TokenKind::OpenBrace, TokenKind::Semicolon],
        close_paren,
        None,
    ) else {
        return String::new();
    };
    match unit.find_next(TokenKind::Colon, close_paren, Some(boundary)) {
        Some(colon) => unit.text_between(colon, boundary).trim().to_string(),
        None => String::new(),
    }
}
