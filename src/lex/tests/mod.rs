use super::{lex_next, LexMode, Lexer};
use crate::token::TokenType;

fn lex_all(code: &str) -> Vec<(TokenType, String)> {
  let mut lexer = Lexer::new(code.as_bytes().to_vec());
  let mut tokens = Vec::new();
  loop {
    let t = lex_next(&mut lexer, LexMode::Standard).unwrap();
    if t.typ == TokenType::Eof {
      break;
    };
    tokens.push((t.typ, t.loc.as_str().to_string()));
  }
  tokens
}

#[test]
fn test_lex_operators_longest_match() {
  let tokens = lex_all("a>>>=b");
  assert_eq!(tokens[1].0, TokenType::ChevronRightChevronRightChevronRightEquals);
  let tokens = lex_all("a?.b");
  assert_eq!(tokens[1].0, TokenType::QuestionDot);
  let tokens = lex_all("a?.5:b");
  assert_eq!(tokens[1].0, TokenType::Question);
  assert_eq!(tokens[2], (TokenType::LiteralNumber, ".5".to_string()));
  let tokens = lex_all("a?.[0]");
  assert_eq!(tokens[1].0, TokenType::QuestionDotBracketOpen);
}

#[test]
fn test_lex_keyword_prefix_is_identifier() {
  let tokens = lex_all("newish");
  assert_eq!(tokens, vec![(TokenType::Identifier, "newish".to_string())]);
  let tokens = lex_all("new x");
  assert_eq!(tokens[0].0, TokenType::KeywordNew);
}

#[test]
fn test_lex_numbers() {
  let tokens = lex_all("1.5e3 0x1F .25 123n");
  assert_eq!(tokens[0], (TokenType::LiteralNumber, "1.5e3".to_string()));
  assert_eq!(tokens[1], (TokenType::LiteralNumber, "0x1F".to_string()));
  assert_eq!(tokens[2], (TokenType::LiteralNumber, ".25".to_string()));
  assert_eq!(tokens[3], (TokenType::LiteralBigInt, "123n".to_string()));
}

#[test]
fn test_lex_strings_and_comments() {
  let tokens = lex_all("\"a\\\"b\" /* skip */ 'c' // end\nx");
  assert_eq!(tokens[0], (TokenType::LiteralString, "\"a\\\"b\"".to_string()));
  assert_eq!(tokens[1], (TokenType::LiteralString, "'c'".to_string()));
  assert_eq!(tokens[2], (TokenType::Identifier, "x".to_string()));
}

#[test]
fn test_lex_line_terminator_flag() {
  let mut lexer = Lexer::new(b"a\nb c".to_vec());
  let a = lex_next(&mut lexer, LexMode::Standard).unwrap();
  let b = lex_next(&mut lexer, LexMode::Standard).unwrap();
  let c = lex_next(&mut lexer, LexMode::Standard).unwrap();
  assert!(!a.preceded_by_line_terminator);
  assert!(b.preceded_by_line_terminator);
  assert!(!c.preceded_by_line_terminator);
}

#[test]
fn test_lex_regex_mode() {
  let mut lexer = Lexer::new(b"/ab[/]c/gi".to_vec());
  let t = lex_next(&mut lexer, LexMode::SlashIsRegex).unwrap();
  assert_eq!(t.typ, TokenType::LiteralRegex);
  assert_eq!(t.loc.as_str(), "/ab[/]c/gi");
}
