use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::io::{self, Write};

pub mod ast;
pub mod char;
pub mod emit;
pub mod error;
pub mod lex;
pub mod minify;
pub mod num;
pub mod operator;
pub mod parse;
pub mod resolve;
pub mod source;
pub mod symbol;
pub mod token;
pub mod visit;

pub use error::SyntaxError;
pub use minify::MinifyOptions;

#[derive(Debug)]
pub enum MinifyError {
  Syntax(SyntaxError),
  Io(io::Error),
}

impl Display for MinifyError {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    match self {
      MinifyError::Syntax(err) => write!(f, "syntax error: {}", err),
      MinifyError::Io(err) => write!(f, "IO error: {}", err),
    }
  }
}

impl Error for MinifyError {}

/// Minifies UTF-8 JavaScript source with the byte-cost-driven hoisting passes
/// and frequency-ranked identifier mangling.
///
/// # Examples
///
/// ```
/// use niu_js::{minify, MinifyOptions};
///
/// let code: &[u8] = b"let answer = 42; console.log(answer);";
/// let mut out = Vec::new();
/// minify(code.to_vec(), &MinifyOptions::default(), &mut out).unwrap();
/// assert_eq!(out.as_slice(), b"let e=42;console.log(e)");
/// ```
pub fn minify<T: Write>(
  source: Vec<u8>,
  options: &MinifyOptions,
  output: &mut T,
) -> Result<(), MinifyError> {
  let minified =
    minify::minify_program(source, options).map_err(MinifyError::Syntax)?;
  output.write_all(&minified).map_err(MinifyError::Io)?;
  Ok(())
}
