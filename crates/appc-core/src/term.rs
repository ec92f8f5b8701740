//! # Term Model
//!
//! [`Term`] is a literal value as it appears in templates, vars files and
//! descriptors. Only literal syntax is modelled: there are no variables,
//! operators, or function calls.
//!
//! `Display` renders the compact single-line form (`{vsn,"1.0"}`), which
//! [`crate::parse_term`] reads back to an equal term. Multi-line layout is
//! the business of [`crate::printer`].

use std::fmt;

use crate::atom::Atom;

/// A literal term.
#[derive(Debug, Clone, PartialEq)]
pub enum Term {
    /// An atom such as `kernel` or `'Quoted Atom'`.
    Atom(Atom),
    /// An integer. Character literals (`$a`) parse to their code point.
    Integer(i64),
    /// A float such as `1.5` or `2.0e-3`.
    Float(f64),
    /// A double-quoted string, which the runtime treats as a character list.
    String(String),
    /// A binary written as `<<"text">>`.
    Binary(String),
    /// A proper list.
    List(Vec<Term>),
    /// A tuple.
    Tuple(Vec<Term>),
    /// A map, keeping the source order of its associations.
    Map(Vec<(Term, Term)>),
}

impl Term {
    /// Shorthand for an atom term.
    pub fn atom(text: impl Into<String>) -> Self {
        Term::Atom(Atom::new(text))
    }

    /// Shorthand for a string term.
    pub fn string(text: impl Into<String>) -> Self {
        Term::String(text.into())
    }

    /// Shorthand for a list of atoms.
    pub fn atom_list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Term::List(items.into_iter().map(Term::atom).collect())
    }

    /// The atom, if this term is one.
    pub fn as_atom(&self) -> Option<&Atom> {
        match self {
            Term::Atom(a) => Some(a),
            _ => None,
        }
    }

    /// The text of a string term.
    pub fn as_string(&self) -> Option<&str> {
        match self {
            Term::String(s) => Some(s),
            _ => None,
        }
    }

    /// The elements of a list term.
    pub fn as_list(&self) -> Option<&[Term]> {
        match self {
            Term::List(items) => Some(items),
            _ => None,
        }
    }

    /// The elements of a tuple term.
    pub fn as_tuple(&self) -> Option<&[Term]> {
        match self {
            Term::Tuple(items) => Some(items),
            _ => None,
        }
    }

    /// Whether this term is the atom `name`.
    pub fn is_atom(&self, name: &str) -> bool {
        matches!(self, Term::Atom(a) if a.as_str() == name)
    }

    /// Whether the term contains no nested containers.
    pub fn is_scalar(&self) -> bool {
        !matches!(self, Term::List(_) | Term::Tuple(_) | Term::Map(_))
    }
}

impl From<Atom> for Term {
    fn from(atom: Atom) -> Self {
        Term::Atom(atom)
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Atom(a) => write!(f, "{a}"),
            Term::Integer(i) => write!(f, "{i}"),
            Term::Float(x) => f.write_str(&format_float(*x)),
            Term::String(s) => write_quoted(f, s),
            Term::Binary(s) => {
                f.write_str("<<")?;
                if !s.is_empty() {
                    write_quoted(f, s)?;
                }
                f.write_str(">>")
            }
            Term::List(items) => {
                f.write_str("[")?;
                write_seq(f, items)?;
                f.write_str("]")
            }
            Term::Tuple(items) => {
                f.write_str("{")?;
                write_seq(f, items)?;
                f.write_str("}")
            }
            Term::Map(pairs) => {
                f.write_str("#{")?;
                for (i, (k, v)) in pairs.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{k} => {v}")?;
                }
                f.write_str("}")
            }
        }
    }
}

fn write_seq(f: &mut fmt::Formatter<'_>, items: &[Term]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(",")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

fn write_quoted(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    f.write_str("\"")?;
    for c in s.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\t' => f.write_str("\\t")?,
            '\r' => f.write_str("\\r")?,
            c if c.is_control() => write!(f, "\\x{{{:X}}}", c as u32)?,
            c => write!(f, "{c}")?,
        }
    }
    f.write_str("\"")
}

/// Floats always carry a fractional part so they read back as floats.
fn format_float(x: f64) -> String {
    let s = format!("{x:?}");
    match s.find('e') {
        Some(pos) if !s[..pos].contains('.') => format!("{}.0{}", &s[..pos], &s[pos..]),
        _ => s,
    }
}
