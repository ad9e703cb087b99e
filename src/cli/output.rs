//! Terminal output helpers.
//!
//! Status lines are styled; results are printed plain so they can be copied
//! or piped. Styling is dropped when `NO_COLOR` is set or the stream is not a
//! terminal.

use std::fmt::Display;

use console::{style, Term};

fn colors_enabled(term: &Term) -> bool {
    std::env::var_os("NO_COLOR").is_none() && term.features().colors_supported()
}

/// Print an error line to stderr.
///
/// Example: `✗ PRIVATE_KEY not provided - check your environment variables`
pub fn error(msg: &str) {
    if colors_enabled(&Term::stderr()) {
        eprintln!("{} {}", style("✗").red(), msg);
    } else {
        eprintln!("✗ {}", msg);
    }
}

/// Print a hint line to stderr.
///
/// Example: `→ set PRIVATE_KEY in the environment or a .env file`
pub fn hint(msg: &str) {
    if colors_enabled(&Term::stderr()) {
        eprintln!("{} {}", style("→").cyan(), style(msg).cyan());
    } else {
        eprintln!("→ {}", msg);
    }
}

/// Print a labelled value.
///
/// Example: `  signer       0xf39F…2266`
pub fn kv(label: &str, value: impl Display) {
    if colors_enabled(&Term::stdout()) {
        println!("  {:<12} {}", style(label).dim(), style(value).bold());
    } else {
        println!("  {:<12} {}", label, value);
    }
}

/// Print a result line unstyled.
pub fn result(text: &str) {
    println!("{}", text);
}
