//! # Application Descriptor
//!
//! A descriptor is the single term `{application, Name, Properties}`. The
//! same shape is used by templates before substitution and by rendered
//! descriptors after it.

use crate::atom::Atom;
use crate::error::PropertyError;
use crate::printer::pretty;
use crate::property::PropertySet;
use crate::term::Term;

/// The tag of a descriptor tuple.
pub const APPLICATION_TAG: &str = "application";

/// A parsed descriptor or template.
#[derive(Debug, Clone, PartialEq)]
pub struct Descriptor {
    /// The declared application name.
    pub name: Atom,
    /// The property list, in source order.
    pub properties: PropertySet,
}

impl Descriptor {
    /// Create a descriptor.
    pub fn new(name: Atom, properties: PropertySet) -> Self {
        Self { name, properties }
    }

    /// Interpret a term as `{application, Name, Properties}`.
    pub fn from_term(term: &Term) -> Result<Self, PropertyError> {
        match term.as_tuple() {
            Some([tag, Term::Atom(name), props]) if tag.is_atom(APPLICATION_TAG) => Ok(Self {
                name: name.clone(),
                properties: PropertySet::from_term(props)?,
            }),
            _ => Err(PropertyError::NotADescriptor {
                found: truncate(&term.to_string(), 60),
            }),
        }
    }

    /// The descriptor as a term.
    pub fn to_term(&self) -> Term {
        Term::Tuple(vec![
            Term::atom(APPLICATION_TAG),
            Term::Atom(self.name.clone()),
            self.properties.to_term(),
        ])
    }

    /// The file contents for this descriptor: the laid-out term followed by
    /// the `.` terminator and a newline.
    pub fn render(&self) -> String {
        format!("{}.\n", pretty(&self.to_term()))
    }
}

fn truncate(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_term;

    #[test]
    fn reads_application_tuple() {
        let term = parse_term("{application, foo, [{vsn, \"1\"}]}.").unwrap();
        let desc = Descriptor::from_term(&term).unwrap();
        assert_eq!(desc.name, "foo");
        assert_eq!(desc.properties.get("vsn"), Some(&Term::string("1")));
        assert_eq!(desc.to_term(), term);
    }

    #[test]
    fn rejects_other_shapes() {
        for src in [
            "{app, foo, []}.",
            "{application, \"foo\", []}.",
            "{application, foo}.",
            "[application, foo, []].",
        ] {
            let term = parse_term(src).unwrap();
            assert!(
                matches!(
                    Descriptor::from_term(&term),
                    Err(PropertyError::NotADescriptor { .. })
                ),
                "accepted {src}"
            );
        }
    }

    #[test]
    fn property_errors_pass_through() {
        let term = parse_term("{application, foo, [bad]}.").unwrap();
        assert!(matches!(
            Descriptor::from_term(&term),
            Err(PropertyError::MalformedEntry { index: 0, .. })
        ));
    }

    #[test]
    fn render_is_terminated_and_reparses() {
        let desc = Descriptor::new(
            Atom::new("foo"),
            [("vsn", Term::string("1.0"))].into_iter().collect(),
        );
        let text = desc.render();
        assert_eq!(text, "{application,foo,[{vsn,\"1.0\"}]}.\n");
        let again = Descriptor::from_term(&parse_term(&text).unwrap()).unwrap();
        assert_eq!(again, desc);
    }

    #[test]
    fn long_terms_are_truncated_in_errors() {
        assert_eq!(truncate("abcdef", 3), "abc...");
        assert_eq!(truncate("abc", 3), "abc");
    }
}
