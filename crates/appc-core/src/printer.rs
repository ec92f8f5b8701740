//! # Pretty Printer
//!
//! Lays terms out over multiple lines in the conventional descriptor style:
//! a term that fits in the remaining width is printed compactly; otherwise
//! containers break, with elements aligned under the first one.
//!
//! ```text
//! {application,foo,
//!              [{registered,[]},
//!               {description,"x"},
//!               {vsn,"0.1.0"},
//!               {modules,[foo_a,foo_b]}]}
//! ```
//!
//! Output is a pure function of the term, so re-rendering an unchanged
//! descriptor produces identical bytes.

use crate::term::Term;

/// Line width the layout aims to stay within.
pub const WIDTH: usize = 80;

/// Render `term` in multi-line layout. No terminator is appended.
pub fn pretty(term: &Term) -> String {
    let mut out = String::new();
    write_term(&mut out, term);
    out
}

fn column(out: &str) -> usize {
    out.rsplit('\n').next().map_or(0, |line| line.chars().count())
}

fn fits(out: &str, text: &str) -> bool {
    column(out) + text.chars().count() <= WIDTH
}

fn newline_to(out: &mut String, col: usize) {
    out.push('\n');
    out.extend(std::iter::repeat(' ').take(col));
}

fn write_term(out: &mut String, term: &Term) {
    let flat = term.to_string();
    if term.is_scalar() || fits(out, &flat) {
        out.push_str(&flat);
        return;
    }
    match term {
        Term::List(items) => {
            out.push('[');
            write_items(out, items);
            out.push(']');
        }
        Term::Tuple(items) => {
            out.push('{');
            match items.split_first() {
                Some((Term::Atom(tag), rest)) if !rest.is_empty() => {
                    write_tagged(out, &tag.to_string(), rest)
                }
                _ => write_items(out, items),
            }
            out.push('}');
        }
        // Maps are rare in descriptors and stay on one line.
        _ => out.push_str(&flat),
    }
}

/// Elements of a list or untagged tuple, aligned one column after the
/// opening bracket. Runs of scalars are packed as many per line as fit.
fn write_items(out: &mut String, items: &[Term]) {
    let align = column(out);
    let pack = items.iter().all(Term::is_scalar);
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push(',');
            let flat = item.to_string();
            if !pack || !fits(out, &format!("{flat},")) {
                newline_to(out, align);
            }
        }
        write_term(out, item);
    }
}

/// `{tag, ...}` keeps the tag and any leading scalars on the first line.
/// A two-element tuple keeps its value there too; otherwise the first
/// container breaks onto a new line aligned after `{tag,` and every later
/// element follows on its own line.
fn write_tagged(out: &mut String, tag: &str, rest: &[Term]) {
    out.push_str(tag);
    out.push(',');
    let align = column(out);
    if let [value] = rest {
        write_term(out, value);
        return;
    }
    let mut broken = false;
    for (i, item) in rest.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        if broken || !item.is_scalar() || !fits(out, &format!("{item},")) {
            if column(out) != align {
                newline_to(out, align);
            }
            broken = true;
        }
        write_term(out, item);
    }
}
