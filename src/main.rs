use std::fs::File;
use std::io::{stdin, stdout, BufWriter, Read, Write};

use structopt::StructOpt;

use niu_js::{minify, MinifyOptions};

#[derive(StructOpt)]
#[structopt(
  name = "niu-js",
  about = "JavaScript post-minifier: hoists duplicated literals and globals, mangles names"
)]
struct Cli {
  /// File to minify; omit for stdin.
  #[structopt(parse(from_os_str))]
  input: Option<std::path::PathBuf>,

  /// Output destination; omit for stdout.
  #[structopt(short, long, parse(from_os_str))]
  output: Option<std::path::PathBuf>,

  /// Disable hoisting of frequently used globals.
  #[structopt(long)]
  no_hoist_globals: bool,

  /// Disable hoisting of duplicated literals.
  #[structopt(long)]
  no_hoist_duplicate_literals: bool,

  /// Rewrite `const` declarations to `let`.
  #[structopt(long)]
  consts_to_lets: bool,
}

fn main() {
  let args = Cli::from_args();
  let mut input = Vec::new();
  let mut input_file: Box<dyn Read> = match args.input {
    Some(p) => Box::new(File::open(p).expect("open input file")),
    None => Box::new(stdin()),
  };
  input_file.read_to_end(&mut input).expect("read input");
  let out_file: Box<dyn Write> = match args.output {
    Some(p) => Box::new(File::create(p).expect("open output file")),
    None => Box::new(stdout()),
  };
  let options = MinifyOptions {
    hoist_globals: !args.no_hoist_globals,
    hoist_duplicate_literals: !args.no_hoist_duplicate_literals,
    consts_to_lets: args.consts_to_lets,
  };
  let mut output = BufWriter::new(out_file);
  minify(input, &options, &mut output).expect("minify");
  output.flush().expect("flush output");
}
