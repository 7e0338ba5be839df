//! Binary that emits command-line options markdown to stdout.
//!
//! Run it to refresh the command-line options reference.

fn main() {
    print!("{}", csvviz_cli::render_options_markdown());
}
